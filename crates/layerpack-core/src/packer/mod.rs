use crate::types::*;
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, trace, warn};

mod catalog;
mod filler;
mod orientation;
mod record;
mod scrap;
mod selector;
mod summary;

use catalog::LayerCatalog;
use filler::Trial;
use record::BoxRecord;

/// Largest number of boxes (after quantity expansion) one request may hold.
pub const MAX_BOXES: u32 = 32_767;

/// Fills a single container using a layer-based best-fit heuristic.
///
/// Every container orientation is tried with every candidate first-layer
/// thickness; the trial packing the most volume is replayed to produce the
/// final placements.
pub struct Packer {
    request: PackRequest,
    cancelled: Arc<AtomicBool>,
}

/// A box after quantity expansion.
#[derive(Debug, Clone)]
struct PackBox {
    item_id: String,
    dims: Dimensions,
}

/// Best (orientation, first thickness) combination seen by the search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Best {
    orientation: Orientation,
    thickness: u32,
    packed_volume: u64,
    packed_boxes: usize,
}

#[derive(Debug, Clone, Copy, Default)]
struct SearchStats {
    iterations: u32,
    cancelled: bool,
}

impl Packer {
    /// Validates requests and builds a new packer instance.
    pub fn new(request: PackRequest) -> Result<Self> {
        validate(&request)?;

        Ok(Self {
            request,
            cancelled: Arc::new(AtomicBool::new(false)),
        })
    }

    /// Flag that stops the search at the next trial boundary when set.
    pub fn cancel_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.cancelled)
    }

    /// Runs the full search and returns placements and leftovers.
    pub fn pack(&self) -> Result<PackResult> {
        let start = Instant::now();
        let boxes = self.expand_items();
        let mut records: Vec<BoxRecord> = boxes.iter().map(|b| BoxRecord::new(b.dims)).collect();
        let container = self.request.container.dimensions();
        let total_box_volume: u64 = boxes
            .iter()
            .map(|b| b.dims.volume())
            .filter(|&volume| volume > 0)
            .sum();

        let (best, stats) = self.search(&mut records, container, total_box_volume, start);

        record::reset(&mut records);
        if let Some(best) = best {
            let pallet = best.orientation.to_working(container);
            let replay = Trial::new(&mut records, pallet, total_box_volume)
                .exhaustive()
                .run(best.thickness);
            if replay.packed_volume != best.packed_volume
                || replay.packed_boxes != best.packed_boxes
            {
                warn!(
                    "Replay of {:?} at thickness {} packed {} boxes ({}) instead of {} ({})",
                    best.orientation,
                    best.thickness,
                    replay.packed_boxes,
                    replay.packed_volume,
                    best.packed_boxes,
                    best.packed_volume
                );
            }
        }

        let result = self.build_result(
            &boxes,
            &records,
            best,
            stats,
            total_box_volume,
            start.elapsed(),
        );

        info!(
            "Packed {}/{} boxes into '{}': {:.2}% of container volume after {} trials",
            result.summary.packed_boxes,
            boxes.len(),
            self.request.container.id,
            result.summary.volume_utilization,
            result.summary.iterations
        );

        Ok(result)
    }

    /// Duplicates items according to their requested quantity.
    fn expand_items(&self) -> Vec<PackBox> {
        let mut expanded = Vec::new();
        for item in &self.request.items {
            for n in 0..item.quantity {
                expanded.push(PackBox {
                    item_id: box_id(item, n),
                    dims: item.dimensions(),
                });
            }
        }
        expanded
    }

    /// Tries every orientation and every catalog thickness, keeping the
    /// trial that packs the most volume. Stops early on a perfect fill.
    fn search(
        &self,
        records: &mut [BoxRecord],
        container: Dimensions,
        total_box_volume: u64,
        start: Instant,
    ) -> (Option<Best>, SearchStats) {
        let mut best: Option<Best> = None;
        let mut stats = SearchStats::default();

        'orientations: for orientation in
            Orientation::search_order(container, self.request.options.cube_shortcut)
        {
            let pallet = orientation.to_working(container);
            record::reset(records);
            let catalog = LayerCatalog::build(records, pallet);
            if catalog.is_empty() {
                debug!("Orientation {:?}: no box fits", orientation);
                continue;
            }
            debug!(
                "Orientation {:?} ({}x{}x{}): {} candidate layer thicknesses",
                orientation,
                pallet.width,
                pallet.height,
                pallet.length,
                catalog.len()
            );

            for thickness in catalog.thicknesses() {
                if self.should_stop(start) {
                    stats.cancelled = true;
                    break 'orientations;
                }

                stats.iterations += 1;
                let outcome = Trial::new(records, pallet, total_box_volume).run(thickness);
                trace!(
                    "Trial {:?} thickness {} (score {}): {} boxes, volume {} in {} layers",
                    orientation,
                    thickness,
                    catalog.score(thickness).unwrap_or_default(),
                    outcome.packed_boxes,
                    outcome.packed_volume,
                    outcome.layers
                );

                if outcome.packed_volume > best.map_or(0, |b| b.packed_volume) {
                    debug!(
                        "New best: {:?} thickness {} packs volume {}",
                        orientation, thickness, outcome.packed_volume
                    );
                    best = Some(Best {
                        orientation,
                        thickness,
                        packed_volume: outcome.packed_volume,
                        packed_boxes: outcome.packed_boxes,
                    });
                }

                if outcome.saturated {
                    break 'orientations;
                }
            }
        }

        (best, stats)
    }

    fn should_stop(&self, start: Instant) -> bool {
        if self.cancelled.load(Ordering::Relaxed) {
            return true;
        }
        match self.request.options.time_limit_ms {
            Some(limit) => start.elapsed() >= Duration::from_millis(limit),
            None => false,
        }
    }
}

/// Id of the `n`th (0-based) box expanded from `item`.
fn box_id(item: &Item, n: u32) -> String {
    if item.quantity > 1 {
        format!("{}_{}", item.id, n + 1)
    } else {
        item.id.clone()
    }
}

fn validate(request: &PackRequest) -> Result<()> {
    let mut seen = HashSet::new();
    let mut total: u32 = 0;
    for item in &request.items {
        if item.id.trim().is_empty() {
            return Err(PackerError::InvalidInput(
                "Every item needs a non-empty id".to_string(),
            ));
        }
        if !seen.insert(item.id.as_str()) {
            return Err(PackerError::InvalidInput(format!(
                "Item id '{}' is used more than once",
                item.id
            )));
        }
        total = total
            .checked_add(item.quantity)
            .filter(|&total| total <= MAX_BOXES)
            .ok_or_else(|| {
                PackerError::InvalidInput(format!(
                    "At most {} boxes can be packed in one request",
                    MAX_BOXES
                ))
            })?;
    }

    // Expanded ids like "a_1" must not clash with another item's id
    let mut box_ids = HashSet::new();
    for item in &request.items {
        for n in 0..item.quantity {
            let id = box_id(item, n);
            if box_ids.contains(&id) {
                return Err(PackerError::InvalidInput(format!(
                    "Box id '{}' of item '{}' is used more than once",
                    id, item.id
                )));
            }
            box_ids.insert(id);
        }
    }

    if request.options.time_limit_ms == Some(0) {
        return Err(PackerError::InvalidInput(
            "time_limit_ms must be greater than zero".to_string(),
        ));
    }

    Ok(())
}
