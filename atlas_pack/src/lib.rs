// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Rectangle packing strategies.
//!
//! A packer takes a fixed-size canvas and a list of rectangle sizes, and either places every
//! rectangle without overlap or reports which ones didn't fit. Packers don't touch pixel data;
//! that's left to whoever owns the canvas.

pub extern crate euclid;

mod guillotine;
mod skyline;

pub use crate::guillotine::GuillotinePacker;
pub use crate::skyline::SkylinePacker;

use std::error::Error;
use std::fmt;

use euclid::default::{Rect, Size2D};

/// A rectangle to be placed, tagged with a caller-chosen id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PackRect {
    pub id: usize,
    pub size: Size2D<u32>
}

/// Where a `PackRect` ended up in the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Placement {
    pub id: usize,
    pub rect: Rect<u32>
}

/// Returned when at least one rectangle couldn't be placed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackError {
    /// Ids of every rectangle that didn't fit, in request order.
    pub unplaced: Vec<usize>
}

/// A rectangle packing heuristic.
pub trait RectPacker {
    /// Place every rectangle in `rects` inside a `canvas`-sized area.
    ///
    /// On success, returns one placement per request, in request order. Placements never overlap
    /// and always lie entirely inside the canvas. Any state left from previous calls is discarded
    /// before packing.
    fn pack(&mut self, canvas: Size2D<u32>, rects: &[PackRect]) -> Result<Vec<Placement>, PackError>;
}

impl<P: RectPacker + ?Sized> RectPacker for &'_ mut P {
    #[inline]
    fn pack(&mut self, canvas: Size2D<u32>, rects: &[PackRect]) -> Result<Vec<Placement>, PackError> {
        (**self).pack(canvas, rects)
    }
}

impl<P: RectPacker + ?Sized> RectPacker for Box<P> {
    #[inline]
    fn pack(&mut self, canvas: Size2D<u32>, rects: &[PackRect]) -> Result<Vec<Placement>, PackError> {
        (**self).pack(canvas, rects)
    }
}

impl PackRect {
    #[inline]
    pub fn new(id: usize, width: u32, height: u32) -> PackRect {
        PackRect {
            id,
            size: Size2D::new(width, height)
        }
    }

    #[inline]
    fn area(&self) -> u64 {
        self.size.width as u64 * self.size.height as u64
    }
}

impl fmt::Display for PackError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} rectangle(s) could not be placed: {:?}", self.unplaced.len(), self.unplaced)
    }
}

impl Error for PackError {}

/// Restore request order for placements produced in some other order.
fn in_request_order(rects: &[PackRect], mut placed: Vec<(usize, Placement)>) -> Vec<Placement> {
    debug_assert_eq!(rects.len(), placed.len());
    placed.sort_unstable_by_key(|&(index, _)| index);
    placed.into_iter().map(|(_, placement)| placement).collect()
}
