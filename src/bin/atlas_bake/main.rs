// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Bake a set of PNG files into one atlas PNG plus a TOML manifest of where each file went.

mod config;

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::Serialize;

use atlas_bake::{Atlas, Image};
use crate::config::BakeConfig;

#[derive(Debug, Serialize)]
struct Manifest<'a> {
    size: u32,
    images: Vec<ManifestEntry<'a>>
}

#[derive(Debug, Serialize)]
struct ManifestEntry<'a> {
    path: &'a Path,
    x: u32,
    y: u32,
    width: u32,
    height: u32
}

fn main() {
    env_logger::init();

    match BakeConfig::from_args(std::env::args()).and_then(|config| config.map(run).transpose()) {
        Ok(_) => (),
        Err(e) => {
            eprintln!("error: {:#}", e);
            std::process::exit(1);
        }
    }
}

fn run(config: BakeConfig) -> anyhow::Result<()> {
    if config.inputs.is_empty() {
        anyhow::bail!("no input images given");
    }

    let mut paths: Vec<&PathBuf> = Vec::with_capacity(config.inputs.len());
    let mut images = Vec::with_capacity(config.inputs.len());
    for path in &config.inputs {
        match Image::load_png(path) {
            Ok(image) => {
                log::debug!("loaded {}: {}x{} {:?}", path.display(), image.width(), image.height(), image.format());
                paths.push(path);
                images.push(image);
            },
            Err(e) if config.strict => {
                return Err(e).with_context(|| format!("could not load {}", path.display()));
            },
            // load_png already logged the failure.
            Err(_) => ()
        }
    }

    let mut packer = config.packer.packer();
    let atlas = Atlas::bake_with(&mut packer, &images).context("could not bake atlas")?;

    atlas.image().write_png(&config.output)
        .with_context(|| format!("could not write {}", config.output.display()))?;

    let manifest = Manifest {
        size: atlas.size(),
        images: paths.iter()
            .zip(atlas.rects())
            .map(|(path, rect)| ManifestEntry {
                path: path.as_path(),
                x: rect.origin.x,
                y: rect.origin.y,
                width: rect.size.width,
                height: rect.size.height
            })
            .collect()
    };
    let manifest_path = config.manifest_path();
    fs::write(&manifest_path, toml::to_string_pretty(&manifest)?)
        .with_context(|| format!("could not write {}", manifest_path.display()))?;

    log::info!(
        "wrote {} of {} image(s) to {} ({}x{})",
        atlas.image_count(), config.inputs.len(), config.output.display(), atlas.size(), atlas.size()
    );
    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;
    use atlas_bake::{PixelFormat, Rgba};

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("atlas_bake_cli_{}_{}", std::process::id(), name));
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn write_inputs(dir: &Path) -> Vec<PathBuf> {
        let a = dir.join("a.png");
        let b = dir.join("b.png");
        Image::from_fn(10, 20, PixelFormat::Rgba, |_, _| Rgba::new(255u8, 0, 0, 255)).unwrap()
            .write_png(&a).unwrap();
        Image::from_fn(30, 5, PixelFormat::Rgb, |_, _| Rgba::new(0u8, 0, 255, 255)).unwrap()
            .write_png(&b).unwrap();
        vec![a, dir.join("missing.png"), b]
    }

    #[test]
    fn test_run_skips_unreadable_inputs() {
        let dir = scratch_dir("skip");
        let inputs = write_inputs(&dir);
        let config = BakeConfig {
            output: dir.join("out.png"),
            inputs: inputs.clone(),
            ..BakeConfig::default()
        };
        let manifest_path = config.manifest_path();
        run(config).unwrap();

        let manifest: toml::Value = toml::from_str(&fs::read_to_string(&manifest_path).unwrap()).unwrap();
        let atlas = Image::load_png(dir.join("out.png")).unwrap();
        fs::remove_dir_all(&dir).ok();

        assert_eq!(Some(128), manifest["size"].as_integer());
        assert_eq!((128, 128), (atlas.width(), atlas.height()));
        let entries = manifest["images"].as_array().unwrap();
        let found: Vec<(&str, i64, i64, i64, i64)> = entries.iter()
            .map(|e| (
                e["path"].as_str().unwrap(),
                e["x"].as_integer().unwrap(),
                e["y"].as_integer().unwrap(),
                e["width"].as_integer().unwrap(),
                e["height"].as_integer().unwrap()
            ))
            .collect();
        assert_eq!(
            vec![
                (inputs[0].to_str().unwrap(), 0, 0, 10, 20),
                (inputs[2].to_str().unwrap(), 11, 0, 30, 5),
            ],
            found
        );
        assert_eq!(Rgba::new(255, 0, 0, 255), atlas.pixel(9, 19));
        assert_eq!(Rgba::new(0, 0, 255, 255), atlas.pixel(11, 0));
    }

    #[test]
    fn test_run_strict_fails_on_unreadable_input() {
        let dir = scratch_dir("strict");
        let config = BakeConfig {
            output: dir.join("out.png"),
            strict: true,
            inputs: write_inputs(&dir),
            ..BakeConfig::default()
        };
        let result = run(config);
        let wrote_output = dir.join("out.png").exists();
        fs::remove_dir_all(&dir).ok();

        assert!(result.is_err());
        assert!(!wrote_output);
    }

    #[test]
    fn test_run_without_inputs() {
        assert!(run(BakeConfig::default()).is_err());
    }
}
