// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Packs randomly sized rectangles with both strategies and writes each packing to
//! `./out/<strategy>_random.png`, one random color per rectangle.

use atlas_pack::{GuillotinePacker, PackRect, Placement, RectPacker, SkylinePacker};
use atlas_pack::euclid::default::Size2D;
use itertools::Itertools;
use rand::prelude::*;

const CANVAS: u32 = 512;

fn main() {
    let mut rng = StdRng::seed_from_u64(std::env::args().nth(1).and_then(|s| s.parse().ok()).unwrap_or(0));
    let rects: Vec<PackRect> = (0..96)
        .map(|id| PackRect::new(id, rng.gen_range(4, 96), rng.gen_range(4, 96)))
        .collect();

    std::fs::create_dir_all("./out").unwrap();
    let packers: Vec<(&str, Box<dyn RectPacker>)> = vec![
        ("skyline", Box::new(SkylinePacker::new())),
        ("guillotine", Box::new(GuillotinePacker::new())),
    ];

    for (name, mut packer) in packers {
        // Drop rectangles from the end until everything fits.
        let mut count = rects.len();
        let placed = loop {
            match packer.pack(Size2D::new(CANVAS, CANVAS), &rects[..count]) {
                Ok(placed) => break placed,
                Err(e) => count -= e.unplaced.len().min(count)
            }
        };
        println!("{}: placed {} of {} rects", name, placed.len(), rects.len());

        for (a, b) in placed.iter().tuple_combinations() {
            assert!(!a.rect.intersects(&b.rect));
        }
        output_packing(&format!("./out/{}_random.png", name), &placed, &mut rng);
    }
}

fn output_packing(path: &str, placed: &[Placement], rng: &mut StdRng) {
    let mut image = image::RgbaImage::new(CANVAS, CANVAS);
    for placement in placed {
        let color = image::Rgba([
            rng.gen_range(8, 256) as u8,
            rng.gen_range(8, 256) as u8,
            rng.gen_range(8, 256) as u8,
            255,
        ]);
        let r = placement.rect;
        for y in r.min_y()..r.max_y() {
            for x in r.min_x()..r.max_x() {
                image.put_pixel(x, y, color);
            }
        }
    }
    image.save(path).unwrap();
}
