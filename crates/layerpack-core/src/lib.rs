//! Layer-based 3D bin packing for a single container.
//!
//! [`Packer`] takes a [`PackRequest`] (container plus boxes) and returns a
//! [`PackResult`] with the placed boxes, in the container's own frame, and
//! the boxes that did not fit.

mod packer;
pub mod svg;
pub mod types;

pub use packer::{Packer, MAX_BOXES};
pub use types::*;

/// Packs `boxes` into `container` with default options.
///
/// Box `i` is reported under `box_index == i` with item id `"box_{i}"`.
pub fn pack(container: Container, boxes: &[Dimensions]) -> Result<PackResult> {
    let items = boxes
        .iter()
        .enumerate()
        .map(|(i, dims)| Item {
            id: format!("box_{i}"),
            width: dims.width,
            height: dims.height,
            length: dims.length,
            quantity: 1,
        })
        .collect();

    Packer::new(PackRequest {
        container,
        items,
        options: PackOptions::default(),
    })?
    .pack()
}
