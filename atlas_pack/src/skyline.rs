// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::cmp::{self, Reverse};
use std::ops::Range;

use euclid::default::{Point2D, Rect, Size2D};
use crate::{PackError, PackRect, Placement, RectPacker};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct HeightRange {
    bounds_min: u32,
    // Exclusive max value
    bounds_max: u32,
    height: u32
}

/// Greedy packer using the skyline bottom-left heuristic.
///
/// Rectangles are placed tallest first. Each one goes wherever its top edge ends up lowest,
/// breaking ties by the area wasted underneath it and then by x position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SkylinePacker {
    dims: Size2D<u32>,
    heights: Vec<HeightRange>,
    max_used_height: u32
}

#[derive(Debug, Clone)]
struct InsertOver {
    range: Range<usize>,
    width: u32,
    height: u32,
    space_lost: u64
}

impl SkylinePacker {
    #[inline]
    pub fn new() -> SkylinePacker {
        SkylinePacker::default()
    }

    /// The highest point any placed rectangle reaches.
    pub fn max_used_height(&self) -> u32 {
        self.max_used_height
    }

    fn reset(&mut self, dims: Size2D<u32>) {
        self.dims = dims;
        self.max_used_height = 0;
        self.heights.clear();
        self.heights.push(HeightRange {
            bounds_min: 0,
            bounds_max: dims.width,
            height: 0
        });
    }

    fn calc_insert_over(&self, image_dims: Size2D<u32>) -> Option<InsertOver> {
        let mut best_range: Option<InsertOver> = None;

        for (i, start) in self.heights.iter().enumerate() {
            // Segments are sorted by x, so nothing further right can fit either.
            if start.bounds_min + image_dims.width > self.dims.width {
                break;
            }

            let mut active_range = InsertOver {
                range: i..i,
                width: 0,
                height: start.height,
                space_lost: 0
            };

            for next_height in self.heights[i..].iter() {
                if active_range.width >= image_dims.width {
                    break;
                }

                let used_width = cmp::min(next_height.width(), image_dims.width - active_range.width);
                active_range.range.end += 1;
                if next_height.height > active_range.height {
                    active_range.space_lost += active_range.width as u64 * (next_height.height - active_range.height) as u64;
                    active_range.height = next_height.height;
                } else {
                    active_range.space_lost += used_width as u64 * (active_range.height - next_height.height) as u64;
                }

                active_range.width += used_width;
            }

            let fits =
                active_range.width >= image_dims.width &&
                self.dims.height - active_range.height >= image_dims.height;
            if !fits {
                continue;
            }

            let active_is_better = match best_range {
                None => true,
                Some(ref best) =>
                    (active_range.height, active_range.space_lost) < (best.height, best.space_lost)
            };
            if active_is_better {
                best_range = Some(active_range);
            }
        }

        best_range
    }

    fn insert_over(&mut self, insert_over: InsertOver, image_dims: Size2D<u32>) -> Rect<u32> {
        let bounds_min = self.heights[insert_over.range.start].bounds_min;
        let bounds_max = bounds_min + image_dims.width;
        let insert_range = HeightRange {
            bounds_min,
            bounds_max,
            height: insert_over.height + image_dims.height
        };

        let last = insert_over.range.end - 1;
        if self.heights[last].bounds_max == bounds_max {
            self.heights.splice(insert_over.range.clone(), Some(insert_range));
        } else {
            self.heights[last].bounds_min = bounds_max;
            self.heights.splice(insert_over.range.start..last, Some(insert_range));
        }
        self.merge_around(insert_over.range.start);
        self.max_used_height = cmp::max(self.max_used_height, insert_range.height);

        Rect::new(Point2D::new(bounds_min, insert_over.height), image_dims)
    }

    /// Merge the segment at `index` with any neighbors of the same height.
    fn merge_around(&mut self, mut index: usize) {
        if index + 1 < self.heights.len() && self.heights[index + 1].height == self.heights[index].height {
            self.heights[index].bounds_max = self.heights[index + 1].bounds_max;
            self.heights.remove(index + 1);
        }
        if index > 0 && self.heights[index - 1].height == self.heights[index].height {
            self.heights[index - 1].bounds_max = self.heights[index].bounds_max;
            self.heights.remove(index);
            index -= 1;
        }
        debug_assert!(index < self.heights.len());
    }
}

impl RectPacker for SkylinePacker {
    fn pack(&mut self, canvas: Size2D<u32>, rects: &[PackRect]) -> Result<Vec<Placement>, PackError> {
        self.reset(canvas);

        let mut order: Vec<usize> = (0..rects.len()).collect();
        order.sort_by_key(|&i| Reverse((rects[i].size.height, rects[i].size.width)));

        let mut placed = Vec::with_capacity(rects.len());
        let mut unplaced = Vec::new();
        for index in order {
            let rect = rects[index];
            if rect.size.width == 0 || rect.size.height == 0 {
                placed.push((index, Placement { id: rect.id, rect: Rect::new(Point2D::zero(), rect.size) }));
                continue;
            }

            match self.calc_insert_over(rect.size) {
                Some(insert_over) => {
                    let placement = Placement {
                        id: rect.id,
                        rect: self.insert_over(insert_over, rect.size)
                    };
                    placed.push((index, placement));
                },
                None => unplaced.push(index)
            }
        }

        if unplaced.is_empty() {
            Ok(crate::in_request_order(rects, placed))
        } else {
            unplaced.sort_unstable();
            log::trace!("skyline: {} of {} rects left over in {:?}", unplaced.len(), rects.len(), canvas);
            Err(PackError {
                unplaced: unplaced.into_iter().map(|i| rects[i].id).collect()
            })
        }
    }
}

impl HeightRange {
    #[inline]
    fn width(&self) -> u32 {
        self.bounds_max - self.bounds_min
    }
}
