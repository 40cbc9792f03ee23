use crate::types::{Dimensions, Orientation};

impl Orientation {
    /// Search order of the container orientations.
    pub const ALL: [Orientation; 6] = [
        Orientation::Xyz,
        Orientation::Zyx,
        Orientation::Zxy,
        Orientation::Yxz,
        Orientation::Xzy,
        Orientation::Yzx,
    ];

    /// Container axis (0 = width, 1 = height, 2 = length) that becomes
    /// working x, y and z respectively.
    const fn axes(self) -> [usize; 3] {
        match self {
            Orientation::Xyz => [0, 1, 2],
            Orientation::Zyx => [2, 1, 0],
            Orientation::Zxy => [2, 0, 1],
            Orientation::Yxz => [1, 0, 2],
            Orientation::Xzy => [0, 2, 1],
            Orientation::Yzx => [1, 2, 0],
        }
    }

    /// Maps a container-frame triple into the working frame.
    pub fn to_working(self, dims: Dimensions) -> Dimensions {
        let source = dims.to_array();
        let axes = self.axes();
        Dimensions::from_array([source[axes[0]], source[axes[1]], source[axes[2]]])
    }

    /// Inverse of [`Orientation::to_working`].
    pub fn to_container(self, dims: Dimensions) -> Dimensions {
        let source = dims.to_array();
        let mut out = [0; 3];
        for (working, &axis) in self.axes().iter().enumerate() {
            out[axis] = source[working];
        }
        Dimensions::from_array(out)
    }

    /// Orientations worth searching for a container of the given size.
    pub(super) fn search_order(container: Dimensions, cube_shortcut: bool) -> Vec<Orientation> {
        if cube_shortcut && container.is_cube() {
            vec![Self::ALL[0], Self::ALL[5]]
        } else {
            Self::ALL.to_vec()
        }
    }
}
