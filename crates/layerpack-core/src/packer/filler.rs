use super::catalog::next_layer_thickness;
use super::record::{self, BoxRecord, Slot};
use super::scrap::{Neighbors, ScrapList};
use super::selector::{find_box, GapQuery};
use crate::types::Dimensions;

/// Room left above the front part of a layer after a taller box raised the
/// layer thickness part way through filling it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) struct Pocket {
    /// Layer thickness before it was raised
    pub base_thickness: u32,
    /// Depth at which the raised part of the layer starts
    pub depth: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) struct TrialOutcome {
    pub packed_volume: u64,
    pub packed_boxes: usize,
    pub layers: u32,
    /// Container or box volume was used up completely
    pub saturated: bool,
}

/// One complete layer-by-layer fill of a pallet starting from a given
/// thickness. All bookkeeping lives here so nested layer passes only ever
/// see their own region.
pub(super) struct Trial<'a> {
    records: &'a mut [BoxRecord],
    pallet: Dimensions,
    total_box_volume: u64,
    stop_when_full: bool,

    layer_thickness: u32,
    packed_y: u32,
    remain_y: u32,
    remain_z: u32,

    packed_volume: u64,
    packed_boxes: usize,
    saturated: bool,
}

impl<'a> Trial<'a> {
    pub fn new(records: &'a mut [BoxRecord], pallet: Dimensions, total_box_volume: u64) -> Self {
        Self {
            records,
            pallet,
            total_box_volume,
            stop_when_full: true,
            layer_thickness: 0,
            packed_y: 0,
            remain_y: pallet.height,
            remain_z: pallet.length,
            packed_volume: 0,
            packed_boxes: 0,
            saturated: false,
        }
    }

    /// Keep filling after every box or the whole pallet is used up.
    pub fn exhaustive(mut self) -> Self {
        self.stop_when_full = false;
        self
    }

    /// Resets all boxes and stacks layers from the floor up until no
    /// further layer thickness can be found.
    pub fn run(mut self, first_thickness: u32) -> TrialOutcome {
        record::reset(self.records);
        self.layer_thickness = first_thickness;
        self.packed_y = 0;
        self.remain_y = self.pallet.height;
        self.remain_z = self.pallet.length;

        let mut layers = 0;
        loop {
            layers += 1;
            let pocket = self.fill_layer(None);
            self.packed_y += self.layer_thickness;
            self.remain_y = self.pallet.height.saturating_sub(self.packed_y);

            if let Some(pocket) = pocket {
                self.fill_pocket(pocket);
            }

            if self.saturated && self.stop_when_full {
                break;
            }
            match next_layer_thickness(self.records, self.pallet, self.remain_y) {
                Some(thickness) => self.layer_thickness = thickness,
                None => break,
            }
        }

        TrialOutcome {
            packed_volume: self.packed_volume,
            packed_boxes: self.packed_boxes,
            layers,
            saturated: self.saturated,
        }
    }

    /// Fills the region above the front part of the layer just finished,
    /// between the initial and the raised layer height.
    fn fill_pocket(&mut self, pocket: Pocket) {
        let packed_y = self.packed_y;
        let remain_y = self.remain_y;

        self.remain_y = self.layer_thickness - pocket.base_thickness;
        self.packed_y = packed_y - self.layer_thickness + pocket.base_thickness;
        self.remain_z = pocket.depth;
        self.layer_thickness = self.remain_y;
        self.fill_layer(Some(pocket));

        self.packed_y = packed_y;
        self.remain_y = remain_y;
        self.remain_z = self.pallet.length;
    }

    /// Fills one layer floor until no gap can take another box. Returns the
    /// pocket opened if a taller box raised the layer.
    fn fill_layer(&mut self, mut pocket: Option<Pocket>) -> Option<Pocket> {
        let mut scrap = ScrapList::new(self.pallet.width);

        loop {
            let idx = scrap.smallest_z();
            let floor_z = scrap.segments()[idx].cum_z;
            let alone = scrap.neighbors(idx) == Neighbors::Neither;
            let gap = scrap.gap(idx, self.remain_z);

            let query = GapQuery {
                max_x: gap.width,
                layer_height: self.layer_thickness,
                max_y: self.remain_y,
                nominal_z: gap.depth,
                max_z: gap.max_depth,
            };
            let selection = find_box(self.records, &query);

            let chosen = match (selection.within, selection.overflow) {
                (Some(candidate), _) => candidate,
                (None, Some(candidate)) if pocket.is_some() || alone => {
                    if pocket.is_none() {
                        pocket = Some(Pocket {
                            base_thickness: self.layer_thickness,
                            depth: floor_z,
                        });
                    }
                    self.layer_thickness = candidate.extent.height;
                    candidate
                }
                _ => {
                    if scrap.even(idx) {
                        continue;
                    }
                    break;
                }
            };

            let x = scrap.place(idx, chosen.extent.width, chosen.extent.length);
            self.commit(
                chosen.index,
                Slot {
                    x,
                    y: self.packed_y,
                    z: floor_z,
                    extent: chosen.extent,
                },
            );
        }

        pocket
    }

    fn commit(&mut self, index: usize, slot: Slot) {
        let record = &mut self.records[index];
        record.slot = Some(slot);
        self.packed_volume += record.dims.volume();
        self.packed_boxes += 1;

        if self.packed_volume == self.pallet.volume() || self.packed_volume == self.total_box_volume
        {
            self.saturated = true;
        }
    }
}
