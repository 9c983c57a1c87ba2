// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

/// A four-channel color.
///
/// `Rgba<u8>` holds channels in the 0-255 range, `Rgba<f32>` holds normalized channels in the
/// 0.0-1.0 range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rgba<T> {
    pub r: T,
    pub g: T,
    pub b: T,
    pub a: T
}

impl<T> Rgba<T> {
    #[inline]
    pub const fn new(r: T, g: T, b: T, a: T) -> Rgba<T> {
        Rgba{ r, g, b, a }
    }
}

impl Rgba<u8> {
    #[inline]
    pub const fn white() -> Rgba<u8> {
        Rgba::new(255, 255, 255, 255)
    }

    #[inline]
    pub const fn transparent() -> Rgba<u8> {
        Rgba::new(0, 0, 0, 0)
    }
}

/// A color representation pixels can be read and written in.
///
/// Pixel storage is always 8 bits per channel, so every representation converts through
/// `Rgba<u8>`.
pub trait Color: Copy {
    fn from_rgba8(color: Rgba<u8>) -> Self;
    fn to_rgba8(self) -> Rgba<u8>;
}

impl Color for Rgba<u8> {
    #[inline(always)]
    fn from_rgba8(color: Rgba<u8>) -> Rgba<u8> {
        color
    }

    #[inline(always)]
    fn to_rgba8(self) -> Rgba<u8> {
        self
    }
}

impl Color for Rgba<f32> {
    #[inline]
    fn from_rgba8(c: Rgba<u8>) -> Rgba<f32> {
        Rgba::new(
            c.r as f32 / 255.0,
            c.g as f32 / 255.0,
            c.b as f32 / 255.0,
            c.a as f32 / 255.0,
        )
    }

    /// Channels outside of 0.0-1.0 saturate.
    #[inline]
    fn to_rgba8(self) -> Rgba<u8> {
        let quantize = |c: f32| (c * 255.0).round() as u8;
        Rgba::new(quantize(self.r), quantize(self.g), quantize(self.b), quantize(self.a))
    }
}

/// `[r, g, b, a]`, the channel order an RGBA pixel is stored in.
impl From<[u8; 4]> for Rgba<u8> {
    #[inline]
    fn from([r, g, b, a]: [u8; 4]) -> Rgba<u8> {
        Rgba::new(r, g, b, a)
    }
}

impl From<Rgba<u8>> for [u8; 4] {
    #[inline]
    fn from(c: Rgba<u8>) -> [u8; 4] {
        [c.r, c.g, c.b, c.a]
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use quickcheck::quickcheck;

    #[test]
    fn test_float_quantization_rounds() {
        let c = Rgba::new(0.5f32, 1.0 / 255.0 * 0.49, 1.0, 0.0);
        assert_eq!(Rgba::new(128, 0, 255, 0), c.to_rgba8());
    }

    #[test]
    fn test_float_out_of_range_saturates() {
        let c = Rgba::new(-0.5f32, 1.5, 2.0, -3.0);
        assert_eq!(Rgba::new(0, 255, 255, 0), c.to_rgba8());
    }

    #[test]
    fn test_byte_array_channel_order() {
        let c = Rgba::from([1u8, 2, 3, 4]);
        assert_eq!(Rgba::new(1, 2, 3, 4), c);
        assert_eq!([1, 2, 3, 4], <[u8; 4]>::from(c));
    }

    quickcheck! {
        fn byte_to_float_and_back(r: u8, g: u8, b: u8, a: u8) -> bool {
            let c = Rgba::new(r, g, b, a);
            Rgba::<f32>::from_rgba8(c).to_rgba8() == c
        }
    }
}
