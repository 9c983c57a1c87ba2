// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Texture atlas baking.
//!
//! Loads or builds `Image`s in one of three pixel formats and bakes any number of them into a
//! single RGBA `Atlas`, recording where each one was placed.
//!
//! ```no_run
//! use atlas_bake::{Atlas, Image};
//!
//! let images = vec![
//!     Image::load_png("grass.png").unwrap(),
//!     Image::load_png("stone.png").unwrap(),
//! ];
//! let atlas = Atlas::bake(&images).unwrap();
//! let stone = atlas.rect(1).unwrap();
//! atlas.image().write_png("terrain.png").unwrap();
//! # let _ = stone;
//! ```

pub extern crate atlas_pack;
pub extern crate euclid;

mod atlas;
mod codec;
mod color;
mod format;
mod image;

pub use crate::atlas::{Atlas, BakeError, CANVAS_SIZES, MARGIN};
pub use crate::color::{Color, Rgba};
pub use crate::format::PixelFormat;
pub use crate::image::{Image, ImageError, ImageResult};
pub use atlas_pack::{GuillotinePacker, PackError, PackRect, Placement, RectPacker, SkylinePacker};
