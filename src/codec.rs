// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! PNG decoding and encoding for `Image`.

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use crate::format::PixelFormat;
use crate::image::{Image, ImageError, ImageResult};

impl Image {
    /// Load a PNG file.
    ///
    /// Palette images are expanded and 16-bit channels are stripped to 8 bits. Grayscale images
    /// become `PixelFormat::Alpha` images: plain grayscale uses the gray value as alpha, and
    /// grayscale with alpha keeps its alpha channel.
    pub fn load_png<P: AsRef<Path>>(path: P) -> ImageResult<Image> {
        let path = path.as_ref();
        let result = File::open(path)
            .map_err(|e| ImageError::Decode(e.into()))
            .and_then(|file| Image::decode_png(BufReader::new(file)));
        if let Err(ref e) = result {
            log::warn!("load_png: {}: {}", path.display(), e);
        }
        result
    }

    /// Decode a PNG stream. See `load_png`.
    pub fn decode_png<R: Read>(reader: R) -> ImageResult<Image> {
        let mut decoder = png::Decoder::new(reader);
        decoder.set_transformations(
            png::Transformations::STRIP_16 | png::Transformations::EXPAND
        );

        let mut reader = decoder.read_info()?;
        let mut image_buffer = vec![0; reader.output_buffer_size()];
        let image_info = reader.next_frame(&mut image_buffer)?;
        if image_info.bit_depth != png::BitDepth::Eight {
            return Err(ImageError::UnsupportedFormat(format!("{:?}-bit PNG", image_info.bit_depth)));
        }
        let format = PixelFormat::from_png(image_info.color_type)?;

        let (width, height) = (image_info.width, image_info.height);
        let decoded_bpp = image_info.color_type.samples();
        let mut pixels = Vec::with_capacity(width as usize * height as usize * format.bytes_per_pixel());
        for row in image_buffer.chunks(image_info.line_size).take(height as usize) {
            let row = &row[..width as usize * decoded_bpp];
            match image_info.color_type {
                // Keep the alpha channel, drop the gray value.
                png::ColorType::GrayscaleAlpha => pixels.extend(row.chunks_exact(2).map(|ga| ga[1])),
                _ => pixels.extend_from_slice(row)
            }
        }

        Image::from_raw(width, height, format, pixels)
    }

    /// Write the image out as a PNG file.
    ///
    /// `PixelFormat::Alpha` images are written as 8-bit grayscale.
    pub fn write_png<P: AsRef<Path>>(&self, path: P) -> ImageResult<()> {
        let file = File::create(path.as_ref()).map_err(|e| ImageError::Encode(e.into()))?;
        self.encode_png(BufWriter::new(file))
    }

    pub fn encode_png<W: Write>(&self, writer: W) -> ImageResult<()> {
        let mut encoder = png::Encoder::new(writer, self.width(), self.height());
        encoder.set_color(self.format().png_color_type());
        encoder.set_depth(png::BitDepth::Eight);

        let mut writer = encoder.write_header()?;
        writer.write_image_data(self.as_bytes())?;
        writer.finish()?;
        Ok(())
    }
}
