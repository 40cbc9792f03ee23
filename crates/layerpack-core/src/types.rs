use serde::{Deserialize, Serialize};

/// Axis-aligned size of a box or container.
///
/// Width runs along x, height along y, length along z.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
    pub length: u32,
}

impl Dimensions {
    pub const fn new(width: u32, height: u32, length: u32) -> Self {
        Self {
            width,
            height,
            length,
        }
    }

    pub fn volume(&self) -> u64 {
        self.width as u64 * self.height as u64 * self.length as u64
    }

    pub(crate) fn to_array(self) -> [u32; 3] {
        [self.width, self.height, self.length]
    }

    pub(crate) fn from_array(dims: [u32; 3]) -> Self {
        Self::new(dims[0], dims[1], dims[2])
    }

    pub(crate) fn is_cube(&self) -> bool {
        self.width == self.height && self.height == self.length
    }
}

/// Container (pallet) to be filled
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Container {
    #[serde(default)]
    pub id: String,
    pub width: u32,
    pub height: u32,
    pub length: u32,
    /// Offset added to every output coordinate. The interior dimensions
    /// above are used as given and are not reduced by the wall.
    #[serde(default)]
    pub wall_thickness: u32,
}

impl Container {
    pub fn dimensions(&self) -> Dimensions {
        Dimensions::new(self.width, self.height, self.length)
    }
}

/// Box to be packed
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Item {
    pub id: String,
    pub width: u32,
    pub height: u32,
    pub length: u32,
    #[serde(default = "default_quantity")]
    pub quantity: u32,
}

impl Item {
    pub fn dimensions(&self) -> Dimensions {
        Dimensions::new(self.width, self.height, self.length)
    }
}

fn default_quantity() -> u32 {
    1
}

/// Tuning knobs for a single pack run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackOptions {
    /// For cubic containers only the first and last container orientation
    /// are searched.
    #[serde(default = "default_true")]
    pub cube_shortcut: bool,
    /// Stop searching once this budget is spent. Checked between layer
    /// thickness trials; the best solution so far is still returned.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_limit_ms: Option<u64>,
}

impl Default for PackOptions {
    fn default() -> Self {
        Self {
            cube_shortcut: true,
            time_limit_ms: None,
        }
    }
}

fn default_true() -> bool {
    true
}

/// Input: What user provides
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackRequest {
    pub container: Container,
    pub items: Vec<Item>,
    #[serde(default)]
    pub options: PackOptions,
}

/// One of the six ways the container's axes can be laid onto the working
/// frame the search runs in. The name lists which container axis becomes
/// working x, y and z.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Orientation {
    Xyz,
    Zyx,
    Zxy,
    Yxz,
    Xzy,
    Yzx,
}

/// Placement of a box inside the container
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Placement {
    /// Position in the quantity-expanded box sequence
    pub box_index: usize,
    pub item_id: String,
    pub x: u32,
    pub y: u32,
    pub z: u32,
    pub width: u32,
    pub height: u32,
    pub length: u32,
    pub rotated: bool,
}

impl Placement {
    pub fn extent(&self) -> Dimensions {
        Dimensions::new(self.width, self.height, self.length)
    }
}

/// Box that did not make it into the container
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Leftover {
    pub box_index: usize,
    pub item_id: String,
    pub width: u32,
    pub height: u32,
    pub length: u32,
}

/// Summary statistics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Summary {
    pub container_volume: u64,
    pub total_box_volume: u64,
    pub packed_volume: u64,
    pub packed_boxes: usize,
    pub leftover_boxes: usize,
    /// Share of the container volume that is filled, in percent
    pub volume_utilization: f64,
    /// Share of the total box volume that was packed, in percent
    pub packed_volume_percentage: f64,
    /// Container orientation of the winning solution
    #[serde(skip_serializing_if = "Option::is_none")]
    pub orientation: Option<Orientation>,
    /// First layer thickness of the winning solution
    #[serde(skip_serializing_if = "Option::is_none")]
    pub layer_thickness: Option<u32>,
    /// Number of (orientation, thickness) trials evaluated
    pub iterations: u32,
    pub computation_time_ms: u64,
    /// Search stopped early through the cancel handle or time limit
    #[serde(default)]
    pub cancelled: bool,
}

/// Output: What packer returns
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackResult {
    pub container: Container,
    /// Sorted by ascending (z, y, x)
    pub placements: Vec<Placement>,
    pub leftover: Vec<Leftover>,
    pub summary: Summary,
}

/// Error type for packing
#[derive(Debug, thiserror::Error)]
pub enum PackerError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

pub type Result<T> = std::result::Result<T, PackerError>;
