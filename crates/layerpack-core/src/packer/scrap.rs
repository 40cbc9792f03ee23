//! Skyline of the free floor inside the layer being filled.
//!
//! The layer floor is cut into strips along x. Each strip remembers where
//! it ends on x (`cum_x`, measured from the left wall) and how deep it is
//! already filled along z (`cum_z`). Strips are kept ordered by `cum_x`;
//! the left bound of a strip is the `cum_x` of its predecessor, or zero.

/// One strip of the skyline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) struct Scrap {
    pub cum_x: u32,
    pub cum_z: u32,
}

/// Which neighbours a strip has. Each case has its own gap and update
/// geometry, see [`ScrapList::gap`] and [`ScrapList::place`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Neighbors {
    Neither,
    RightOnly,
    LeftOnly,
    Both,
}

/// Bounding box of the free pocket in front of a strip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) struct Gap {
    /// Usable width along x
    pub width: u32,
    /// Depth up to the shallower-bounding neighbour (nominal fit target)
    pub depth: u32,
    /// Depth up to the back of the region being filled
    pub max_depth: u32,
}

#[derive(Debug, Clone)]
pub(super) struct ScrapList {
    width: u32,
    segments: Vec<Scrap>,
}

impl ScrapList {
    /// A fresh, empty floor of the given width.
    pub fn new(width: u32) -> Self {
        Self {
            width,
            segments: vec![Scrap {
                cum_x: width,
                cum_z: 0,
            }],
        }
    }

    #[cfg(test)]
    pub fn from_segments(width: u32, segments: Vec<Scrap>) -> Self {
        Self { width, segments }
    }

    pub fn segments(&self) -> &[Scrap] {
        &self.segments
    }

    /// Index of the first strip with the smallest filled depth.
    pub fn smallest_z(&self) -> usize {
        let mut best = 0;
        for (idx, scrap) in self.segments.iter().enumerate().skip(1) {
            if scrap.cum_z < self.segments[best].cum_z {
                best = idx;
            }
        }
        best
    }

    pub fn neighbors(&self, idx: usize) -> Neighbors {
        let left = idx > 0;
        let right = idx + 1 < self.segments.len();
        match (left, right) {
            (false, false) => Neighbors::Neither,
            (false, true) => Neighbors::RightOnly,
            (true, false) => Neighbors::LeftOnly,
            (true, true) => Neighbors::Both,
        }
    }

    /// Free pocket in front of strip `idx` when the region ends at `limit_z`.
    pub fn gap(&self, idx: usize, limit_z: u32) -> Gap {
        let scrap = self.segments[idx];
        let max_depth = limit_z.saturating_sub(scrap.cum_z);
        match self.neighbors(idx) {
            Neighbors::Neither => Gap {
                width: scrap.cum_x,
                depth: max_depth,
                max_depth,
            },
            Neighbors::RightOnly => Gap {
                width: scrap.cum_x,
                depth: self.segments[idx + 1].cum_z.saturating_sub(scrap.cum_z),
                max_depth,
            },
            Neighbors::LeftOnly | Neighbors::Both => {
                let left = self.segments[idx - 1];
                Gap {
                    width: scrap.cum_x - left.cum_x,
                    depth: left.cum_z.saturating_sub(scrap.cum_z),
                    max_depth,
                }
            }
        }
    }

    /// Records a box of footprint `box_x` by `box_z` standing in front of
    /// strip `idx` and returns the x coordinate it was given.
    ///
    /// The box is always pushed flush against a wall or a neighbour, and a
    /// strip whose new depth matches a neighbour is folded into it.
    pub fn place(&mut self, idx: usize, box_x: u32, box_z: u32) -> u32 {
        let scrap = self.segments[idx];
        let top = scrap.cum_z + box_z;

        match self.neighbors(idx) {
            Neighbors::Neither => {
                if box_x == scrap.cum_x {
                    self.segments[idx].cum_z = top;
                } else {
                    self.segments.insert(
                        idx,
                        Scrap {
                            cum_x: box_x,
                            cum_z: top,
                        },
                    );
                }
                0
            }
            Neighbors::RightOnly => {
                let right = self.segments[idx + 1];
                if box_x == scrap.cum_x {
                    if top == right.cum_z {
                        self.segments.remove(idx);
                    } else {
                        self.segments[idx].cum_z = top;
                    }
                    0
                } else {
                    let x = scrap.cum_x - box_x;
                    self.segments[idx].cum_x = x;
                    if top != right.cum_z {
                        self.segments.insert(
                            idx + 1,
                            Scrap {
                                cum_x: scrap.cum_x,
                                cum_z: top,
                            },
                        );
                    }
                    x
                }
            }
            Neighbors::LeftOnly => {
                let left = self.segments[idx - 1];
                if box_x == scrap.cum_x - left.cum_x {
                    if top == left.cum_z {
                        self.segments[idx - 1].cum_x = scrap.cum_x;
                        self.segments.remove(idx);
                    } else {
                        self.segments[idx].cum_z = top;
                    }
                } else {
                    self.extend_left(idx, box_x, top);
                }
                left.cum_x
            }
            Neighbors::Both => {
                let left = self.segments[idx - 1];
                let right = self.segments[idx + 1];
                let span = scrap.cum_x - left.cum_x;

                if left.cum_z == right.cum_z {
                    if box_x == span {
                        if top == right.cum_z {
                            self.segments[idx - 1].cum_x = right.cum_x;
                            self.segments.drain(idx..=idx + 1);
                        } else {
                            self.segments[idx].cum_z = top;
                        }
                        left.cum_x
                    } else if left.cum_x < self.width - scrap.cum_x {
                        self.extend_left(idx, box_x, top);
                        left.cum_x
                    } else {
                        self.extend_right(idx, box_x, top)
                    }
                } else if box_x == span {
                    if top == left.cum_z {
                        self.segments[idx - 1].cum_x = scrap.cum_x;
                        self.segments.remove(idx);
                    } else {
                        self.segments[idx].cum_z = top;
                    }
                    left.cum_x
                } else if top == right.cum_z {
                    self.extend_right(idx, box_x, top)
                } else {
                    self.extend_left(idx, box_x, top);
                    left.cum_x
                }
            }
        }
    }

    /// Box of width `box_x` sits against the left neighbour of `idx`.
    fn extend_left(&mut self, idx: usize, box_x: u32, top: u32) {
        let left = self.segments[idx - 1];
        if top == left.cum_z {
            self.segments[idx - 1].cum_x = left.cum_x + box_x;
        } else {
            self.segments.insert(
                idx,
                Scrap {
                    cum_x: left.cum_x + box_x,
                    cum_z: top,
                },
            );
        }
    }

    /// Box of width `box_x` sits against the right neighbour of `idx`.
    /// Returns its x coordinate.
    fn extend_right(&mut self, idx: usize, box_x: u32, top: u32) -> u32 {
        let scrap = self.segments[idx];
        let right = self.segments[idx + 1];
        let x = scrap.cum_x - box_x;
        self.segments[idx].cum_x = x;
        if top != right.cum_z {
            self.segments.insert(
                idx + 1,
                Scrap {
                    cum_x: scrap.cum_x,
                    cum_z: top,
                },
            );
        }
        x
    }

    /// Gives up on the pocket in front of strip `idx`: the strip is raised
    /// to its shallower neighbour and merged into it. Returns false when the
    /// strip spans the whole layer and there is nothing to merge with.
    pub fn even(&mut self, idx: usize) -> bool {
        match self.neighbors(idx) {
            Neighbors::Neither => false,
            Neighbors::RightOnly => {
                self.segments.remove(idx);
                true
            }
            Neighbors::LeftOnly => {
                self.segments[idx - 1].cum_x = self.segments[idx].cum_x;
                self.segments.remove(idx);
                true
            }
            Neighbors::Both => {
                let scrap = self.segments[idx];
                let left = self.segments[idx - 1];
                let right = self.segments[idx + 1];
                if left.cum_z == right.cum_z {
                    self.segments[idx - 1].cum_x = right.cum_x;
                    self.segments.drain(idx..=idx + 1);
                } else {
                    if left.cum_z < right.cum_z {
                        self.segments[idx - 1].cum_x = scrap.cum_x;
                    }
                    self.segments.remove(idx);
                }
                true
            }
        }
    }
}
