// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::error::Error;
use std::fmt;

use euclid::default::Size2D;
use itertools::iproduct;

use crate::color::{Color, Rgba};
use crate::format::PixelFormat;

/// An owned grid of pixels in one of the `PixelFormat`s.
///
/// Coordinates run from the top-left corner. All pixel accessors panic on out-of-bounds
/// coordinates.
#[derive(Clone, PartialEq, Eq)]
pub struct Image {
    width: u32,
    height: u32,
    format: PixelFormat,
    pixels: Box<[u8]>
}

#[derive(Debug)]
pub enum ImageError {
    /// The pixel format isn't one of the formats an `Image` can store.
    UnsupportedFormat(String),
    /// Width or height was zero.
    EmptyDimensions,
    /// The pixel store couldn't be allocated.
    Allocation { bytes: Option<usize> },
    /// A raw byte buffer didn't match the image's dimensions.
    BufferSize { expected: usize, actual: usize },
    /// The source was missing, unreadable or not a valid PNG.
    Decode(png::DecodingError),
    Encode(png::EncodingError)
}

pub type ImageResult<T> = Result<T, ImageError>;

impl Image {
    /// Allocate a zero-filled image.
    pub fn new(width: u32, height: u32, format: PixelFormat) -> ImageResult<Image> {
        let len = store_len(width, height, format)?;
        let mut pixels = Vec::new();
        pixels.try_reserve_exact(len)
            .map_err(|_| ImageError::Allocation { bytes: Some(len) })?;
        pixels.resize(len, 0);

        Ok(Image {
            width,
            height,
            format,
            pixels: pixels.into_boxed_slice()
        })
    }

    /// Take ownership of an existing byte store, laid out row by row in `format`.
    pub fn from_raw(width: u32, height: u32, format: PixelFormat, pixels: Vec<u8>) -> ImageResult<Image> {
        let expected = store_len(width, height, format)?;
        if pixels.len() != expected {
            return Err(ImageError::BufferSize { expected, actual: pixels.len() });
        }

        Ok(Image {
            width,
            height,
            format,
            pixels: pixels.into_boxed_slice()
        })
    }

    /// Build an image procedurally.
    ///
    /// `f` is called once per pixel, in row-major order: rows from top to bottom, and each row
    /// from left to right.
    pub fn from_fn<C, F>(width: u32, height: u32, format: PixelFormat, mut f: F) -> ImageResult<Image>
        where C: Color,
              F: FnMut(u32, u32) -> C
    {
        let mut image = Image::new(width, height, format)?;
        let bpp = format.bytes_per_pixel();
        let coords = iproduct!(0..height, 0..width);
        for ((y, x), bytes) in coords.zip(image.pixels.chunks_exact_mut(bpp)) {
            format.encode(f(x, y).to_rgba8(), bytes);
        }
        Ok(image)
    }

    /// Reduce the image to a single value.
    ///
    /// Pixels are visited in the same row-major order as `from_fn`.
    pub fn fold<C, A, F>(&self, init: A, mut f: F) -> A
        where C: Color,
              F: FnMut(A, u32, u32, C) -> A
    {
        let format = self.format;
        iproduct!(0..self.height, 0..self.width)
            .zip(self.pixels.chunks_exact(format.bytes_per_pixel()))
            .fold(init, |acc, ((y, x), bytes)| f(acc, x, y, C::from_rgba8(format.decode(bytes))))
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    pub fn dims(&self) -> Size2D<u32> {
        Size2D::new(self.width, self.height)
    }

    #[inline]
    pub fn format(&self) -> PixelFormat {
        self.format
    }

    /// Get the raw byte store.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.pixels
    }

    /// Give up the image, keeping its raw byte store.
    #[inline]
    pub fn into_bytes(self) -> Vec<u8> {
        self.pixels.into_vec()
    }

    /// Read a pixel in any color representation.
    #[inline]
    pub fn get<C: Color>(&self, x: u32, y: u32) -> C {
        C::from_rgba8(self.pixel(x, y))
    }

    /// Write a pixel from any color representation.
    #[inline]
    pub fn set<C: Color>(&mut self, x: u32, y: u32, color: C) {
        self.set_pixel(x, y, color.to_rgba8());
    }

    #[inline]
    pub fn pixel(&self, x: u32, y: u32) -> Rgba<u8> {
        let range = self.pixel_range(x, y);
        self.format.decode(&self.pixels[range])
    }

    #[inline]
    pub fn set_pixel(&mut self, x: u32, y: u32, color: Rgba<u8>) {
        let range = self.pixel_range(x, y);
        self.format.encode(color, &mut self.pixels[range]);
    }

    /// Copy all of `src` into this image, with its top-left corner at `(x, y)`.
    ///
    /// `src` is converted into this image's format the same way `set` would convert it.
    pub fn blit(&mut self, src: &Image, x: u32, y: u32) {
        assert!(
            x as u64 + src.width as u64 <= self.width as u64 &&
            y as u64 + src.height as u64 <= self.height as u64,
            "{}x{} image blitted at ({}, {}) leaves {}x{} image", src.width, src.height, x, y, self.width, self.height
        );

        if src.format == self.format {
            let bpp = self.format.bytes_per_pixel();
            let src_row_len = src.width as usize * bpp;
            let dst_row_len = self.width as usize * bpp;
            for (row_num, src_row) in src.pixels.chunks_exact(src_row_len).enumerate() {
                let dst_offset = (y as usize + row_num) * dst_row_len + x as usize * bpp;
                self.pixels[dst_offset..dst_offset + src_row_len].copy_from_slice(src_row);
            }
        } else {
            for (sy, sx) in iproduct!(0..src.height, 0..src.width) {
                self.set_pixel(x + sx, y + sy, src.pixel(sx, sy));
            }
        }
    }

    #[inline]
    fn pixel_range(&self, x: u32, y: u32) -> std::ops::Range<usize> {
        assert!(x < self.width && y < self.height, "pixel ({}, {}) outside {}x{} image", x, y, self.width, self.height);
        let bpp = self.format.bytes_per_pixel();
        let offset = (self.width as usize * y as usize + x as usize) * bpp;
        offset..offset + bpp
    }
}

fn store_len(width: u32, height: u32, format: PixelFormat) -> ImageResult<usize> {
    if width == 0 || height == 0 {
        return Err(ImageError::EmptyDimensions);
    }
    (width as usize)
        .checked_mul(height as usize)
        .and_then(|n| n.checked_mul(format.bytes_per_pixel()))
        .ok_or(ImageError::Allocation { bytes: None })
}

impl fmt::Debug for Image {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Image")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("format", &self.format)
            .finish()
    }
}

impl fmt::Display for ImageError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        use self::ImageError::*;

        match *self {
            UnsupportedFormat(ref s) => write!(f, "Unsupported pixel format: {}", s),
            EmptyDimensions => write!(f, "Image width and height must be non-zero"),
            Allocation { bytes: Some(bytes) } => write!(f, "Could not allocate {} bytes of pixel data", bytes),
            Allocation { bytes: None } => write!(f, "Image byte size overflows"),
            BufferSize { expected, actual } => write!(f, "Expected {} bytes of pixel data, got {}", expected, actual),
            Decode(ref e) => write!(f, "Could not decode PNG: {}", e),
            Encode(ref e) => write!(f, "Could not encode PNG: {}", e)
        }
    }
}

impl Error for ImageError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match *self {
            ImageError::Decode(ref e) => Some(e),
            ImageError::Encode(ref e) => Some(e),
            _ => None
        }
    }
}

impl From<png::DecodingError> for ImageError {
    fn from(e: png::DecodingError) -> ImageError {
        ImageError::Decode(e)
    }
}

impl From<png::EncodingError> for ImageError {
    fn from(e: png::EncodingError) -> ImageError {
        ImageError::Encode(e)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use quickcheck::quickcheck;

    #[test]
    fn test_new_is_zeroed() {
        for &format in &[PixelFormat::Alpha, PixelFormat::Rgb, PixelFormat::Rgba] {
            let image = Image::new(3, 5, format).unwrap();
            assert_eq!(3 * 5 * format.bytes_per_pixel(), image.as_bytes().len());
            assert!(image.as_bytes().iter().all(|&b| b == 0));
        }
    }

    #[test]
    fn test_empty_dimensions() {
        match Image::new(0, 4, PixelFormat::Rgba) {
            Err(ImageError::EmptyDimensions) => (),
            r => panic!("unexpected {:?}", r)
        }
    }

    #[test]
    fn test_from_raw_checks_length() {
        match Image::from_raw(2, 2, PixelFormat::Rgb, vec![0; 11]) {
            Err(ImageError::BufferSize { expected: 12, actual: 11 }) => (),
            r => panic!("unexpected {:?}", r)
        }
        let image = Image::from_raw(2, 1, PixelFormat::Rgb, vec![1, 2, 3, 4, 5, 6]).unwrap();
        assert_eq!(Rgba::new(4, 5, 6, 255), image.pixel(1, 0));
    }

    #[test]
    fn test_raw_bytes_survive_adoption() {
        let bytes = vec![10, 20, 30, 40, 50, 60, 70, 80];
        let mut image = Image::from_raw(4, 2, PixelFormat::Alpha, bytes.clone()).unwrap();
        assert_eq!(&bytes[..], image.as_bytes());
        image.set_pixel(3, 1, Rgba::new(0, 0, 0, 1));
        assert_eq!(vec![10, 20, 30, 40, 50, 60, 70, 1], image.into_bytes());
    }

    #[test]
    fn test_format_dependent_get() {
        let mut alpha = Image::new(1, 1, PixelFormat::Alpha).unwrap();
        alpha.set_pixel(0, 0, Rgba::new(1, 2, 3, 99));
        assert_eq!(Rgba::new(255, 255, 255, 99), alpha.pixel(0, 0));
        assert_eq!(Rgba::new(1.0, 1.0, 1.0, 99.0 / 255.0), alpha.get::<Rgba<f32>>(0, 0));

        let mut rgb = Image::new(1, 1, PixelFormat::Rgb).unwrap();
        rgb.set_pixel(0, 0, Rgba::new(1, 2, 3, 99));
        assert_eq!(Rgba::new(1, 2, 3, 255), rgb.pixel(0, 0));
        assert_eq!(1.0, rgb.get::<Rgba<f32>>(0, 0).a);
    }

    #[test]
    fn test_traversal_is_row_major() {
        let mut visited = Vec::new();
        let image = Image::from_fn(3, 2, PixelFormat::Rgba, |x, y| {
            visited.push((x, y));
            Rgba::new(x as u8, y as u8, 0, 255)
        }).unwrap();
        let expected = vec![(0, 0), (1, 0), (2, 0), (0, 1), (1, 1), (2, 1)];
        assert_eq!(expected, visited);

        let folded = image.fold(Vec::new(), |mut acc, x, y, c: Rgba<u8>| {
            assert_eq!(Rgba::new(x as u8, y as u8, 0, 255), c);
            acc.push((x, y));
            acc
        });
        assert_eq!(expected, folded);
    }

    #[test]
    fn test_fold_sum() {
        let image = Image::from_fn(4, 4, PixelFormat::Alpha, |x, y| Rgba::new(0u8, 0, 0, (x + y * 4) as u8)).unwrap();
        let sum = image.fold(0u32, |acc, _, _, c: Rgba<u8>| acc + c.a as u32);
        assert_eq!((0..16).sum::<u32>(), sum);
    }

    #[test]
    fn test_blit_mixed_formats() {
        let src = Image::from_fn(2, 2, PixelFormat::Rgb, |x, y| Rgba::new(x as u8 + 1, y as u8 + 1, 9, 0)).unwrap();
        let mut dst = Image::new(4, 4, PixelFormat::Rgba).unwrap();
        dst.blit(&src, 1, 2);
        assert_eq!(Rgba::new(1, 1, 9, 255), dst.pixel(1, 2));
        assert_eq!(Rgba::new(2, 2, 9, 255), dst.pixel(2, 3));
        assert_eq!(Rgba::transparent(), dst.pixel(0, 0));
        assert_eq!(Rgba::transparent(), dst.pixel(3, 3));
    }

    #[test]
    fn test_blit_same_format() {
        let src = Image::from_fn(2, 3, PixelFormat::Rgba, |x, y| Rgba::new(x as u8, y as u8, 7, 8)).unwrap();
        let mut dst = Image::new(5, 5, PixelFormat::Rgba).unwrap();
        dst.blit(&src, 3, 2);
        for (y, x) in iproduct!(0..3, 0..2) {
            assert_eq!(src.pixel(x, y), dst.pixel(3 + x, 2 + y));
        }
        assert_eq!(Rgba::transparent(), dst.pixel(2, 2));
    }

    #[test]
    #[should_panic]
    fn test_blit_out_of_bounds() {
        let src = Image::new(2, 2, PixelFormat::Rgba).unwrap();
        let mut dst = Image::new(4, 4, PixelFormat::Rgba).unwrap();
        dst.blit(&src, 3, 0);
    }

    quickcheck! {
        fn byte_set_get_idempotent(r: u8, g: u8, b: u8, a: u8) -> bool {
            [PixelFormat::Alpha, PixelFormat::Rgb, PixelFormat::Rgba].iter().all(|&format| {
                let mut image = Image::new(2, 2, format).unwrap();
                image.set_pixel(1, 1, Rgba::new(r, g, b, a));
                let once = image.pixel(1, 1);
                image.set_pixel(1, 1, once);
                image.pixel(1, 1) == once
            })
        }

        fn float_set_get_within_quantum(r: u8, g: u8, b: u8, a: u8) -> bool {
            let color = Rgba::new(r as f32 / 255.5, g as f32 / 255.5, b as f32 / 255.5, a as f32 / 255.5);
            let mut image = Image::new(1, 1, PixelFormat::Rgba).unwrap();
            image.set(0, 0, color);
            let back: Rgba<f32> = image.get(0, 0);
            let close = |x: f32, y: f32| (x - y).abs() <= 1.0 / 255.0;
            close(color.r, back.r) && close(color.g, back.g) && close(color.b, back.b) && close(color.a, back.a)
        }
    }
}
