use super::record::BoxRecord;
use crate::types::Dimensions;

/// The pocket a box is wanted for, in working-frame units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) struct GapQuery {
    /// Usable width of the gap
    pub max_x: u32,
    /// Current layer thickness
    pub layer_height: u32,
    /// Room left above the layer floor
    pub max_y: u32,
    /// Depth the gap would ideally be filled to
    pub nominal_z: u32,
    /// Depth available behind the gap
    pub max_z: u32,
}

/// A box in a specific orientation together with its fit key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) struct Candidate {
    pub index: usize,
    pub extent: Dimensions,
    /// (height mismatch, unused width, depth mismatch), compared in order
    key: (u32, u32, u32),
}

/// Best candidates on the two tracks: boxes no taller than the layer, and
/// boxes taller than the layer that could open a layer-in-layer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(super) struct Selection {
    pub within: Option<Candidate>,
    pub overflow: Option<Candidate>,
}

impl Selection {
    fn consider(&mut self, index: usize, extent: Dimensions, query: &GapQuery) {
        if extent.width > query.max_x || extent.height > query.max_y || extent.length > query.max_z
        {
            return;
        }

        let unused_x = query.max_x - extent.width;
        let depth_miss = query.nominal_z.abs_diff(extent.length);
        let (track, height_miss) = if extent.height <= query.layer_height {
            (&mut self.within, query.layer_height - extent.height)
        } else {
            (&mut self.overflow, extent.height - query.layer_height)
        };

        let key = (height_miss, unused_x, depth_miss);
        if track.map_or(true, |best| key < best.key) {
            *track = Some(Candidate { index, extent, key });
        }
    }
}

/// Scans every available box in every distinct orientation against the gap.
pub(super) fn find_box(records: &[BoxRecord], query: &GapQuery) -> Selection {
    let mut selection = Selection::default();
    for (index, record) in records.iter().enumerate() {
        if !record.is_available() {
            continue;
        }
        for &axes in record.orientations() {
            selection.consider(index, record.oriented(axes), query);
        }
    }
    selection
}
