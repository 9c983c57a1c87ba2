// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use crate::color::Rgba;
use crate::image::ImageError;

/// How pixels are laid out in an image's byte store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PixelFormat {
    /// One byte per pixel, holding alpha. Color channels read as white.
    Alpha,
    /// Three bytes per pixel. Alpha reads as opaque.
    Rgb,
    /// Four bytes per pixel.
    Rgba
}

impl PixelFormat {
    #[inline]
    pub fn bytes_per_pixel(self) -> usize {
        match self {
            PixelFormat::Alpha => 1,
            PixelFormat::Rgb => 3,
            PixelFormat::Rgba => 4
        }
    }

    /// Look up a format by its numeric code: 0 for alpha, 1 for RGB, 2 for RGBA.
    pub fn from_code(code: u8) -> Result<PixelFormat, ImageError> {
        match code {
            0 => Ok(PixelFormat::Alpha),
            1 => Ok(PixelFormat::Rgb),
            2 => Ok(PixelFormat::Rgba),
            _ => Err(ImageError::UnsupportedFormat(format!("format code {:#X}", code)))
        }
    }

    /// The format a decoded PNG of the given color type is stored in.
    ///
    /// Indexed images must be expanded by the decoder first.
    pub fn from_png(color_type: png::ColorType) -> Result<PixelFormat, ImageError> {
        use png::ColorType;
        match color_type {
            ColorType::Grayscale |
            ColorType::GrayscaleAlpha => Ok(PixelFormat::Alpha),
            ColorType::Rgb => Ok(PixelFormat::Rgb),
            ColorType::Rgba => Ok(PixelFormat::Rgba),
            ColorType::Indexed => Err(ImageError::UnsupportedFormat("indexed PNG".to_string()))
        }
    }

    pub(crate) fn png_color_type(self) -> png::ColorType {
        match self {
            PixelFormat::Alpha => png::ColorType::Grayscale,
            PixelFormat::Rgb => png::ColorType::Rgb,
            PixelFormat::Rgba => png::ColorType::Rgba
        }
    }

    /// Read one pixel out of `bytes`, which must be exactly `bytes_per_pixel` long.
    #[inline]
    pub fn decode(self, bytes: &[u8]) -> Rgba<u8> {
        debug_assert_eq!(self.bytes_per_pixel(), bytes.len());
        match self {
            PixelFormat::Alpha => Rgba::new(255, 255, 255, bytes[0]),
            PixelFormat::Rgb => Rgba::new(bytes[0], bytes[1], bytes[2], 255),
            PixelFormat::Rgba => Rgba::new(bytes[0], bytes[1], bytes[2], bytes[3])
        }
    }

    /// Write one pixel into `bytes`. Channels the format doesn't store are dropped.
    #[inline]
    pub fn encode(self, color: Rgba<u8>, bytes: &mut [u8]) {
        debug_assert_eq!(self.bytes_per_pixel(), bytes.len());
        match self {
            PixelFormat::Alpha => bytes[0] = color.a,
            PixelFormat::Rgb => bytes.copy_from_slice(&[color.r, color.g, color.b]),
            PixelFormat::Rgba => bytes.copy_from_slice(&[color.r, color.g, color.b, color.a])
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_decode_fills_missing_channels() {
        assert_eq!(Rgba::new(255, 255, 255, 7), PixelFormat::Alpha.decode(&[7]));
        assert_eq!(Rgba::new(1, 2, 3, 255), PixelFormat::Rgb.decode(&[1, 2, 3]));
        assert_eq!(Rgba::new(1, 2, 3, 4), PixelFormat::Rgba.decode(&[1, 2, 3, 4]));
    }

    #[test]
    fn test_encode_drops_channels() {
        let color = Rgba::new(10, 20, 30, 40);

        let mut a = [0; 1];
        PixelFormat::Alpha.encode(color, &mut a);
        assert_eq!([40], a);

        let mut rgb = [0; 3];
        PixelFormat::Rgb.encode(color, &mut rgb);
        assert_eq!([10, 20, 30], rgb);

        let mut rgba = [0; 4];
        PixelFormat::Rgba.encode(color, &mut rgba);
        assert_eq!([10, 20, 30, 40], rgba);
    }

    #[test]
    fn test_from_code() {
        assert_eq!(PixelFormat::Alpha, PixelFormat::from_code(0).unwrap());
        assert_eq!(PixelFormat::Rgba, PixelFormat::from_code(2).unwrap());
        match PixelFormat::from_code(3) {
            Err(ImageError::UnsupportedFormat(_)) => (),
            r => panic!("unexpected {:?}", r)
        }
    }

    #[test]
    fn test_png_color_types() {
        use png::ColorType;
        assert_eq!(PixelFormat::Alpha, PixelFormat::from_png(ColorType::Grayscale).unwrap());
        assert_eq!(PixelFormat::Alpha, PixelFormat::from_png(ColorType::GrayscaleAlpha).unwrap());
        assert_eq!(PixelFormat::Rgb, PixelFormat::from_png(ColorType::Rgb).unwrap());
        assert_eq!(PixelFormat::Rgba, PixelFormat::from_png(ColorType::Rgba).unwrap());
        assert!(PixelFormat::from_png(ColorType::Indexed).is_err());
    }
}
