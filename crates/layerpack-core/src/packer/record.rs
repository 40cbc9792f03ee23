use crate::types::Dimensions;

/// Where a box ended up in the working frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) struct Slot {
    pub x: u32,
    pub y: u32,
    pub z: u32,
    /// Box size as laid out along working x, y and z
    pub extent: Dimensions,
}

/// Per-box bookkeeping owned by one pack run.
#[derive(Debug, Clone)]
pub(super) struct BoxRecord {
    pub dims: Dimensions,
    pub slot: Option<Slot>,
}

impl BoxRecord {
    pub fn new(dims: Dimensions) -> Self {
        Self { dims, slot: None }
    }

    /// Unplaced and not degenerate. Boxes with a zero side never take part.
    pub fn is_available(&self) -> bool {
        self.slot.is_none() && self.dims.volume() > 0
    }

    /// Distinct axis assignments to try against a gap, in selector order.
    pub fn orientations(&self) -> &'static [[usize; 3]] {
        const ALL: [[usize; 3]; 6] = [
            [0, 1, 2],
            [0, 2, 1],
            [1, 0, 2],
            [1, 2, 0],
            [2, 0, 1],
            [2, 1, 0],
        ];
        if self.dims.is_cube() {
            &ALL[..1]
        } else {
            &ALL
        }
    }

    pub fn oriented(&self, axes: [usize; 3]) -> Dimensions {
        let dims = self.dims.to_array();
        Dimensions::from_array([dims[axes[0]], dims[axes[1]], dims[axes[2]]])
    }

    /// The three ways of standing the box on the layer floor: the exposed
    /// (layer defining) side first, then the two cross-section sides.
    pub fn layer_faces(&self) -> [(u32, u32, u32); 3] {
        let Dimensions {
            width,
            height,
            length,
        } = self.dims;
        [
            (width, height, length),
            (height, width, length),
            (length, width, height),
        ]
    }

    /// Smallest distance between any side of the box and `thickness`.
    pub fn deviation(&self, thickness: u32) -> u64 {
        self.dims
            .to_array()
            .iter()
            .map(|&side| side.abs_diff(thickness) as u64)
            .min()
            .unwrap_or(0)
    }
}

pub(super) fn reset(records: &mut [BoxRecord]) {
    for record in records {
        record.slot = None;
    }
}
