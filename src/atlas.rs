// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::error::Error;
use std::fmt;

use atlas_pack::{PackRect, Placement, RectPacker, SkylinePacker};
use euclid::default::{Point2D, Rect, Size2D};

use crate::format::PixelFormat;
use crate::image::{Image, ImageError};

/// Canvas sizes tried by `Atlas::bake`, smallest first. Canvases are always square.
pub const CANVAS_SIZES: [u32; 5] = [128, 256, 512, 1024, 2048];

/// Empty space reserved to the right of and below every image, so that filtered samples don't
/// bleed between neighbors.
pub const MARGIN: u32 = 1;

/// A set of images baked into a single RGBA canvas.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Atlas {
    image: Image,
    rects: Box<[Rect<u32>]>
}

#[derive(Debug)]
pub enum BakeError {
    /// The images don't fit together in any of the `CANVAS_SIZES`.
    NoFittingSize,
    /// The canvas couldn't be allocated.
    Canvas(ImageError)
}

impl Atlas {
    /// Bake `images` using the skyline packer.
    ///
    /// The rectangle at index `i` of the result describes where `images[i]` ended up.
    pub fn bake<'a, I>(images: I) -> Result<Atlas, BakeError>
        where I: IntoIterator<Item=&'a Image>
    {
        Atlas::bake_with(&mut SkylinePacker::new(), images)
    }

    /// Bake `images`, placing them with `packer`.
    ///
    /// Picks the smallest size in `CANVAS_SIZES` the packer can fit every image into, then copies
    /// each image into an RGBA canvas of that size. Either every image is baked or the call fails
    /// without allocating a canvas.
    pub fn bake_with<'a, P, I>(packer: &mut P, images: I) -> Result<Atlas, BakeError>
        where P: RectPacker + ?Sized,
              I: IntoIterator<Item=&'a Image>
    {
        let images: Vec<&Image> = images.into_iter().collect();
        let requests: Vec<PackRect> = images.iter()
            .enumerate()
            .map(|(id, image)| PackRect::new(id, image.width() + MARGIN, image.height() + MARGIN))
            .collect();

        let (size, placements) = find_best_size(packer, &requests).ok_or(BakeError::NoFittingSize)?;
        log::info!("baking {} image(s) into a {}x{} atlas", images.len(), size, size);

        let mut canvas = Image::new(size, size, PixelFormat::Rgba).map_err(BakeError::Canvas)?;
        let mut rects = Vec::with_capacity(images.len());
        for (id, (image, placement)) in images.iter().zip(placements).enumerate() {
            assert_eq!(id, placement.id, "packer returned placements out of order");
            let origin = placement.rect.origin;
            canvas.blit(image, origin.x, origin.y);
            rects.push(Rect::new(origin, image.dims()));
        }

        Ok(Atlas {
            image: canvas,
            rects: rects.into_boxed_slice()
        })
    }

    /// The baked canvas.
    #[inline]
    pub fn image(&self) -> &Image {
        &self.image
    }

    #[inline]
    pub fn into_image(self) -> Image {
        self.image
    }

    /// Width and height of the square canvas.
    #[inline]
    pub fn size(&self) -> u32 {
        self.image.width()
    }

    #[inline]
    pub fn image_count(&self) -> usize {
        self.rects.len()
    }

    /// Where the image at `index` was copied to, without the margin.
    #[inline]
    pub fn rect(&self, index: usize) -> Option<Rect<u32>> {
        self.rects.get(index).cloned()
    }

    #[inline]
    pub fn rects(&self) -> &[Rect<u32>] {
        &self.rects
    }

    /// `rect(index)`, mapped onto the unit square for texture sampling.
    pub fn tex_coords(&self, index: usize) -> Option<Rect<f32>> {
        let scale = 1.0 / self.size() as f32;
        self.rect(index).map(|r| Rect::new(
            Point2D::new(r.origin.x as f32 * scale, r.origin.y as f32 * scale),
            Size2D::new(r.size.width as f32 * scale, r.size.height as f32 * scale)
        ))
    }
}

/// Try every candidate size until one fits all of `requests`.
fn find_best_size<P>(packer: &mut P, requests: &[PackRect]) -> Option<(u32, Vec<Placement>)>
    where P: RectPacker + ?Sized
{
    for &size in CANVAS_SIZES.iter() {
        let canvas = Size2D::new(size, size);
        match packer.pack(canvas, requests) {
            Ok(placements) => {
                assert_eq!(requests.len(), placements.len(), "packer reported success without placing everything");
                for (request, placement) in requests.iter().zip(&placements) {
                    assert!(
                        placement.rect.max_x() <= size && placement.rect.max_y() <= size &&
                        placement.rect.size == request.size,
                        "packer placed {:?} as {:?} in a {}x{} canvas", request, placement, size, size
                    );
                }
                return Some((size, placements));
            },
            Err(e) => log::debug!("{}x{} canvas rejected: {}", size, size, e)
        }
    }

    None
}

impl fmt::Display for BakeError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            BakeError::NoFittingSize => write!(
                f,
                "Images do not fit in any atlas size up to {0}x{0}",
                CANVAS_SIZES[CANVAS_SIZES.len() - 1]
            ),
            BakeError::Canvas(ref e) => write!(f, "Could not allocate atlas canvas: {}", e)
        }
    }
}

impl Error for BakeError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match *self {
            BakeError::Canvas(ref e) => Some(e),
            BakeError::NoFittingSize => None
        }
    }
}
