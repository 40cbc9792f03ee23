use super::*;

impl Packer {
    /// Translates the replayed records into container-frame placements and
    /// gathers the run statistics.
    pub(super) fn build_result(
        &self,
        boxes: &[PackBox],
        records: &[BoxRecord],
        best: Option<Best>,
        stats: SearchStats,
        total_box_volume: u64,
        elapsed: Duration,
    ) -> PackResult {
        let container = &self.request.container;
        let orientation = best.map_or(Orientation::Xyz, |b| b.orientation);
        let (placements, leftover) =
            translate(boxes, records, orientation, container.wall_thickness);

        let container_volume = container.dimensions().volume();
        let packed_volume: u64 = placements.iter().map(|p| p.extent().volume()).sum();

        PackResult {
            container: container.clone(),
            summary: Summary {
                container_volume,
                total_box_volume,
                packed_volume,
                packed_boxes: placements.len(),
                leftover_boxes: leftover.len(),
                volume_utilization: percentage(packed_volume, container_volume),
                packed_volume_percentage: percentage(packed_volume, total_box_volume),
                orientation: best.map(|b| b.orientation),
                layer_thickness: best.map(|b| b.thickness),
                iterations: stats.iterations,
                computation_time_ms: elapsed.as_millis() as u64,
                cancelled: stats.cancelled,
            },
            placements,
            leftover,
        }
    }
}

/// Maps placed records back into the caller's frame, offset by the wall,
/// and collects everything else as leftover. Placements come out sorted by
/// (z, y, x).
pub(super) fn translate(
    boxes: &[PackBox],
    records: &[BoxRecord],
    orientation: Orientation,
    wall_thickness: u32,
) -> (Vec<Placement>, Vec<Leftover>) {
    let mut placements = Vec::new();
    let mut leftover = Vec::new();

    for (box_index, (pack_box, record)) in boxes.iter().zip(records).enumerate() {
        match record.slot {
            Some(slot) => {
                let origin =
                    orientation.to_container(Dimensions::new(slot.x, slot.y, slot.z));
                let extent = orientation.to_container(slot.extent);
                placements.push(Placement {
                    box_index,
                    item_id: pack_box.item_id.clone(),
                    x: origin.width + wall_thickness,
                    y: origin.height + wall_thickness,
                    z: origin.length + wall_thickness,
                    width: extent.width,
                    height: extent.height,
                    length: extent.length,
                    rotated: extent != pack_box.dims,
                });
            }
            None => leftover.push(Leftover {
                box_index,
                item_id: pack_box.item_id.clone(),
                width: pack_box.dims.width,
                height: pack_box.dims.height,
                length: pack_box.dims.length,
            }),
        }
    }

    placements.sort_by_key(|p| (p.z, p.y, p.x, p.box_index));
    (placements, leftover)
}

fn percentage(part: u64, whole: u64) -> f64 {
    if whole > 0 {
        part as f64 / whole as f64 * 100.0
    } else {
        0.0
    }
}
