// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::cmp::{max, Reverse};

use euclid::default::{Point2D, Rect, Size2D};
use crate::{PackError, PackRect, Placement, RectPacker};

/// Packer that keeps a list of free slots and splits them guillotine-style.
///
/// Rectangles are placed largest area first, each into the smallest free slot that holds it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GuillotinePacker {
    slots: Vec<Rect<u32>>
}

impl GuillotinePacker {
    #[inline]
    pub fn new() -> GuillotinePacker {
        GuillotinePacker::default()
    }

    /// Find the smallest slot that will fit the given item, and carve the item out of it.
    fn place(&mut self, size: Size2D<u32>) -> Option<Rect<u32>> {
        let index = self.slots.iter().position(|slot| fits(size, slot.size))?;
        let slot = self.slots.swap_remove(index);
        let (new_1, new_2) = remaining_rects(size, slot);
        self.slots.extend([new_1, new_2].iter().cloned().filter(|r| !r.is_empty()));
        self.slots.sort_by_key(|r| r.size.width as u64 * r.size.height as u64);

        Some(Rect::new(slot.origin, size))
    }
}

impl RectPacker for GuillotinePacker {
    fn pack(&mut self, canvas: Size2D<u32>, rects: &[PackRect]) -> Result<Vec<Placement>, PackError> {
        self.slots.clear();
        self.slots.push(Rect::new(Point2D::zero(), canvas));

        let mut largest_first: Vec<usize> = (0..rects.len()).collect();
        largest_first.sort_by_key(|&i| Reverse(rects[i].area()));

        let mut placed = Vec::with_capacity(rects.len());
        let mut unplaced = Vec::new();
        for index in largest_first {
            let rect = rects[index];
            match self.place(rect.size) {
                Some(area) => placed.push((index, Placement { id: rect.id, rect: area })),
                None => unplaced.push(index)
            }
        }

        if unplaced.is_empty() {
            Ok(crate::in_request_order(rects, placed))
        } else {
            unplaced.sort_unstable();
            log::trace!("guillotine: {} of {} rects left over in {:?}", unplaced.len(), rects.len(), canvas);
            Err(PackError {
                unplaced: unplaced.into_iter().map(|i| rects[i].id).collect()
            })
        }
    }
}

fn fits(size: Size2D<u32>, container: Size2D<u32>) -> bool {
    size.width <= container.width && size.height <= container.height
}

/// Return the two remaining parts of the slot when the item is placed in its top left corner.
fn remaining_rects(dim: Size2D<u32>, Rect { origin: pos, size: slot }: Rect<u32>) -> (Rect<u32>, Rect<u32>) {
    debug_assert!(fits(dim, slot));
    let area = |w: u32, h: u32| w as u64 * h as u64;

    // Split whichever way leaves the bigger open rectangle.
    let vert_vol = max(area(slot.width, slot.height - dim.height), area(slot.width - dim.width, dim.height));
    let horiz_vol = max(area(dim.width, slot.height - dim.height), area(slot.width - dim.width, slot.height));

    if vert_vol > horiz_vol {
        //     |AA
        // ----+--
        // BBBBBBB
        // BBBBBBB
        (Rect::new(Point2D::new(pos.x + dim.width, pos.y),
                   Size2D::new(slot.width - dim.width, dim.height)),
         Rect::new(Point2D::new(pos.x, pos.y + dim.height),
                   Size2D::new(slot.width, slot.height - dim.height)))
    } else {
        //     |BB
        // ----+BB
        // AAAA|BB
        // AAAA|BB
        (Rect::new(Point2D::new(pos.x, pos.y + dim.height),
                   Size2D::new(dim.width, slot.height - dim.height)),
         Rect::new(Point2D::new(pos.x + dim.width, pos.y),
                   Size2D::new(slot.width - dim.width, slot.height)))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::test_helpers::assert_valid;
    use rand::{Rng, SeedableRng, rngs::StdRng};

    #[test]
    fn test_split_keeps_larger_slot() {
        let slot = Rect::new(Point2D::new(0, 0), Size2D::new(100, 10));
        let (a, b) = remaining_rects(Size2D::new(10, 5), slot);
        // The full-height strip to the right is the larger remainder.
        assert_eq!(Rect::new(Point2D::new(0, 5), Size2D::new(10, 5)), a);
        assert_eq!(Rect::new(Point2D::new(10, 0), Size2D::new(90, 10)), b);
    }

    #[test]
    fn test_request_order_preserved() {
        let mut packer = GuillotinePacker::new();
        let rects = [PackRect::new(3, 8, 8), PackRect::new(9, 32, 32), PackRect::new(1, 16, 16)];
        let canvas = Size2D::new(64, 64);
        let placed = packer.pack(canvas, &rects).unwrap();
        assert_valid(canvas, &rects, &placed);
        assert_eq!(Point2D::new(0, 0), placed[1].rect.origin);
    }

    #[test]
    fn test_reports_unplaced() {
        let mut packer = GuillotinePacker::new();
        let rects = [PackRect::new(0, 64, 64), PackRect::new(1, 1, 1)];
        let err = packer.pack(Size2D::new(64, 64), &rects).unwrap_err();
        assert_eq!(vec![1], err.unplaced);
    }

    #[test]
    fn test_random_never_overlaps() {
        let mut rng = StdRng::seed_from_u64(0xA71A5);
        let mut packer = GuillotinePacker::new();
        let canvas = Size2D::new(256, 256);

        for _ in 0..32 {
            let count = rng.gen_range(1, 48);
            let rects: Vec<_> = (0..count)
                .map(|i| PackRect::new(i, rng.gen_range(1, 64), rng.gen_range(1, 64)))
                .collect();
            if let Ok(placed) = packer.pack(canvas, &rects) {
                assert_valid(canvas, &rects, &placed);
            }
        }
    }
}
