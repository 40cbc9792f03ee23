//! Whole-result properties of the packer on generated inputs.

use layerpack_core::{
    pack, Container, Dimensions, Item, PackOptions, PackRequest, PackResult, Packer, Placement,
};
use std::collections::BTreeSet;

/// Small deterministic generator so every run sees the same boxes.
struct Lcg(u64);

impl Lcg {
    fn range(&mut self, lo: u32, hi: u32) -> u32 {
        self.0 = self
            .0
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        lo + ((self.0 >> 33) as u32) % (hi - lo + 1)
    }
}

fn random_boxes(seed: u64, count: usize, max_side: u32) -> Vec<Dimensions> {
    let mut rng = Lcg(seed);
    (0..count)
        .map(|_| {
            Dimensions::new(
                rng.range(1, max_side),
                rng.range(1, max_side),
                rng.range(1, max_side),
            )
        })
        .collect()
}

fn container(width: u32, height: u32, length: u32, wall_thickness: u32) -> Container {
    Container {
        id: "test".to_string(),
        width,
        height,
        length,
        wall_thickness,
    }
}

fn request_for(target: Container, boxes: &[Dimensions], options: PackOptions) -> PackRequest {
    PackRequest {
        container: target,
        items: boxes
            .iter()
            .enumerate()
            .map(|(i, d)| Item {
                id: format!("b{}", i),
                width: d.width,
                height: d.height,
                length: d.length,
                quantity: 1,
            })
            .collect(),
        options,
    }
}

fn overlaps(a: &Placement, b: &Placement) -> bool {
    a.x < b.x + b.width
        && b.x < a.x + a.width
        && a.y < b.y + b.height
        && b.y < a.y + a.height
        && a.z < b.z + b.length
        && b.z < a.z + a.length
}

fn assert_valid(result: &PackResult, boxes: &[Dimensions]) {
    let c = &result.container;
    let wall = c.wall_thickness;

    for placement in &result.placements {
        assert!(placement.x >= wall && placement.x + placement.width <= wall + c.width);
        assert!(placement.y >= wall && placement.y + placement.height <= wall + c.height);
        assert!(placement.z >= wall && placement.z + placement.length <= wall + c.length);

        assert_eq!(
            sorted_sides(boxes[placement.box_index]),
            sorted_sides(placement.extent()),
            "extent is not a rotation of the box"
        );
    }

    for (i, a) in result.placements.iter().enumerate() {
        for b in &result.placements[i + 1..] {
            assert!(!overlaps(a, b), "{:?} overlaps {:?}", a, b);
        }
    }

    let placed: BTreeSet<usize> = result.placements.iter().map(|p| p.box_index).collect();
    let left: BTreeSet<usize> = result.leftover.iter().map(|l| l.box_index).collect();
    assert_eq!(placed.len(), result.placements.len());
    assert_eq!(left.len(), result.leftover.len());
    assert!(placed.is_disjoint(&left));
    assert_eq!(placed.len() + left.len(), boxes.len());

    let packed: u64 = result.placements.iter().map(|p| p.extent().volume()).sum();
    assert_eq!(packed, result.summary.packed_volume);
    assert!(packed <= c.dimensions().volume());
}

fn sorted_sides(dims: Dimensions) -> [u32; 3] {
    let mut sides = [dims.width, dims.height, dims.length];
    sides.sort_unstable();
    sides
}

#[test]
fn generated_inputs_pack_without_overlap() {
    let containers = [
        container(20, 15, 25, 0),
        container(12, 12, 12, 3),
        container(30, 8, 14, 1),
    ];
    for (seed, target) in containers.iter().enumerate() {
        for count in [5, 20, 40] {
            let boxes = random_boxes(seed as u64 * 31 + count as u64, count, 9);
            let result = pack(target.clone(), &boxes).unwrap();
            assert_valid(&result, &boxes);
        }
    }
}

#[test]
fn mixed_boxes_that_cannot_all_fit() {
    let boxes = vec![
        Dimensions::new(6, 6, 6),
        Dimensions::new(6, 6, 6),
        Dimensions::new(5, 5, 5),
        Dimensions::new(5, 5, 5),
        Dimensions::new(5, 5, 5),
        Dimensions::new(3, 4, 5),
    ];
    let result = pack(container(10, 10, 10, 0), &boxes).unwrap();

    assert_valid(&result, &boxes);
    assert!(!result.leftover.is_empty());
    let leftover_volume: u64 = result
        .leftover
        .iter()
        .map(|l| boxes[l.box_index].volume())
        .sum();
    assert_eq!(
        result.summary.packed_volume + leftover_volume,
        result.summary.total_box_volume
    );
}

#[test]
fn stacked_slabs_fill_container() {
    let boxes = vec![Dimensions::new(10, 1, 10); 10];
    let result = pack(container(10, 10, 10, 0), &boxes).unwrap();

    assert_valid(&result, &boxes);
    assert!(result.leftover.is_empty());
    assert_eq!(result.summary.packed_volume, 1000);
    assert!((result.summary.volume_utilization - 100.0).abs() < 1e-9);
    // A full container ends the search after the first trial
    assert_eq!(result.summary.iterations, 1);
    for (layer, placement) in result.placements.iter().enumerate() {
        assert_eq!(placement.y, layer as u32);
    }
}

#[test]
fn repacking_same_input_is_deterministic() {
    let boxes = random_boxes(7, 30, 8);
    let first = pack(container(16, 11, 13, 2), &boxes).unwrap();
    let second = pack(container(16, 11, 13, 2), &boxes).unwrap();

    assert_eq!(first.placements, second.placements);
    assert_eq!(first.leftover, second.leftover);
    assert_eq!(first.summary.packed_volume, second.summary.packed_volume);
}

#[test]
fn cube_shortcut_does_not_break_validity() {
    let boxes = random_boxes(99, 25, 6);
    for cube_shortcut in [true, false] {
        let request = request_for(
            container(10, 10, 10, 0),
            &boxes,
            PackOptions {
                cube_shortcut,
                time_limit_ms: None,
            },
        );
        let result = Packer::new(request).unwrap().pack().unwrap();
        assert_valid(&result, &boxes);
    }
}

#[test]
fn demo_request_parses_and_packs() {
    let yaml = include_str!("../../../demos/pallet.yaml");
    let request: PackRequest = serde_yaml::from_str(yaml).unwrap();
    let result = Packer::new(request).unwrap().pack().unwrap();

    assert!(!result.placements.is_empty());
    assert!(result.summary.volume_utilization > 0.0);
    assert!(result.summary.volume_utilization <= 100.0);
}

#[test]
fn stopping_early_never_beats_full_search() {
    let boxes = random_boxes(3, 15, 7);
    let full = pack(container(14, 9, 11, 0), &boxes).unwrap();

    let packer = Packer::new(request_for(
        container(14, 9, 11, 0),
        &boxes,
        PackOptions::default(),
    ))
    .unwrap();
    packer
        .cancel_handle()
        .store(true, std::sync::atomic::Ordering::Relaxed);
    let stopped = packer.pack().unwrap();

    assert!(stopped.summary.cancelled);
    assert!(!full.summary.cancelled);
    assert!(stopped.summary.packed_volume <= full.summary.packed_volume);
    assert_valid(&stopped, &boxes);
}

#[test]
fn time_limit_stops_search_between_trials() {
    let boxes = random_boxes(11, 250, 15);
    let target = container(40, 35, 45, 2);
    let full = pack(target.clone(), &boxes).unwrap();
    assert!(!full.summary.cancelled);
    assert!(full.summary.iterations > 2);

    let limited = Packer::new(request_for(
        target,
        &boxes,
        PackOptions {
            cube_shortcut: true,
            time_limit_ms: Some(1),
        },
    ))
    .unwrap()
    .pack()
    .unwrap();

    assert!(limited.summary.cancelled);
    assert!(limited.summary.iterations < full.summary.iterations);
    assert!(limited.summary.packed_volume <= full.summary.packed_volume);
    assert_valid(&limited, &boxes);
    // Whatever trial did complete is still replayed
    if limited.summary.iterations > 0 {
        assert!(!limited.placements.is_empty());
        assert!(limited.summary.layer_thickness.is_some());
    }
}
