use super::record::BoxRecord;
use crate::types::Dimensions;
use std::collections::BTreeMap;

/// Candidate layer thicknesses for one container orientation, each scored
/// by how well the remaining boxes match it (lower is better).
#[derive(Debug, Clone, Default)]
pub(super) struct LayerCatalog {
    layers: BTreeMap<u32, u64>,
}

impl LayerCatalog {
    /// Lists every distinct side of every available box that can stand on
    /// the floor of `pallet` as a layer thickness.
    pub fn build(records: &[BoxRecord], pallet: Dimensions) -> Self {
        let mut layers = BTreeMap::new();

        for (idx, record) in records.iter().enumerate() {
            if !record.is_available() {
                continue;
            }
            for (exposed, side_a, side_b) in record.layer_faces() {
                if exposed > pallet.height || !fits_floor(side_a, side_b, pallet) {
                    continue;
                }
                if layers.contains_key(&exposed) {
                    continue;
                }
                layers.insert(exposed, layer_score(records, idx, exposed));
            }
        }

        Self { layers }
    }

    /// Thicknesses in ascending order.
    pub fn thicknesses(&self) -> impl Iterator<Item = u32> + '_ {
        self.layers.keys().copied()
    }

    pub fn score(&self, thickness: u32) -> Option<u64> {
        self.layers.get(&thickness).copied()
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }
}

/// Picks the thickness of the next layer from the boxes still available:
/// the lowest scoring side that fits within `remaining_y`.
pub(super) fn next_layer_thickness(
    records: &[BoxRecord],
    pallet: Dimensions,
    remaining_y: u32,
) -> Option<u32> {
    let mut best: Option<(u64, u32)> = None;

    for (idx, record) in records.iter().enumerate() {
        if !record.is_available() {
            continue;
        }
        for (exposed, side_a, side_b) in record.layer_faces() {
            if exposed > remaining_y || !fits_floor(side_a, side_b, pallet) {
                continue;
            }
            let score = layer_score(records, idx, exposed);
            if best.map_or(true, |(best_score, _)| score < best_score) {
                best = Some((score, exposed));
            }
        }
    }

    best.map(|(_, thickness)| thickness)
}

/// Either ordering of the cross-section fits the pallet floor.
fn fits_floor(side_a: u32, side_b: u32, pallet: Dimensions) -> bool {
    (side_a <= pallet.width && side_b <= pallet.length)
        || (side_b <= pallet.width && side_a <= pallet.length)
}

/// Sum of the closest-side deviations of every other available box.
fn layer_score(records: &[BoxRecord], skip: usize, thickness: u32) -> u64 {
    records
        .iter()
        .enumerate()
        .filter(|&(idx, record)| idx != skip && record.is_available())
        .map(|(_, record)| record.deviation(thickness))
        .sum()
}
