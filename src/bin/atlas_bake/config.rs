// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use getopts::Options;
use serde::Deserialize;

use atlas_bake::{GuillotinePacker, RectPacker, SkylinePacker};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PackerKind {
    Skyline,
    Guillotine
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct BakeConfig {
    /// Where the baked atlas image goes.
    pub output: PathBuf,
    /// Where the placement manifest goes. Defaults to the output path with a `.toml` extension.
    pub manifest: Option<PathBuf>,
    pub packer: PackerKind,
    /// Abort on the first image that fails to load, instead of skipping it.
    pub strict: bool,
    pub inputs: Vec<PathBuf>
}

impl Default for BakeConfig {
    fn default() -> BakeConfig {
        BakeConfig {
            output: PathBuf::from("atlas.png"),
            manifest: None,
            packer: PackerKind::Skyline,
            strict: false,
            inputs: Vec::new()
        }
    }
}

impl PackerKind {
    fn parse(s: &str) -> Option<PackerKind> {
        match s {
            "skyline" => Some(PackerKind::Skyline),
            "guillotine" => Some(PackerKind::Guillotine),
            _ => None
        }
    }

    pub fn packer(self) -> Box<dyn RectPacker> {
        match self {
            PackerKind::Skyline => Box::new(SkylinePacker::new()),
            PackerKind::Guillotine => Box::new(GuillotinePacker::new())
        }
    }
}

impl BakeConfig {
    /// Read a TOML config file. Keys left out of the file keep their defaults.
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<BakeConfig> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .with_context(|| format!("could not read config {}", path.display()))?;
        toml::from_str(&text)
            .with_context(|| format!("invalid config {}", path.display()))
    }

    /// Parse command line options and apply them on top of the config file named by `-c`, if any.
    ///
    /// Returns `Ok(None)` if only usage was requested; the usage string is printed directly.
    pub fn from_args<T: Iterator<Item=String>>(args: T) -> anyhow::Result<Option<BakeConfig>> {
        let mut opts = Options::new();
        opts.optopt("c", "config", "Read settings from a TOML file", "FILE");
        opts.optopt("o", "output", "Atlas image to write (default atlas.png)", "FILE");
        opts.optopt("m", "manifest", "Placement manifest to write", "FILE");
        opts.optopt("", "packer", "Packing strategy. PACKER = skyline | guillotine", "PACKER");
        opts.optflag("", "strict", "Fail on the first image that can't be loaded");
        opts.optflag("h", "help", "Display this message");

        let args: Vec<String> = args.collect();
        let brief = "Usage: atlas_bake [options] INPUT.png...";
        let parse = opts.parse(args.iter().skip(1))
            .map_err(|f| anyhow::anyhow!("{}\n{}", f, opts.usage(brief)))?;

        if parse.opt_present("help") {
            print!("{}", opts.usage(brief));
            return Ok(None);
        }

        let mut config = match parse.opt_str("config") {
            Some(path) => BakeConfig::load(path)?,
            None => BakeConfig::default()
        };

        if let Some(output) = parse.opt_str("output") {
            config.output = output.into();
        }
        if let Some(manifest) = parse.opt_str("manifest") {
            config.manifest = Some(manifest.into());
        }
        if let Some(packer) = parse.opt_str("packer") {
            config.packer = PackerKind::parse(&packer)
                .ok_or_else(|| anyhow::anyhow!("Unknown packer '{}'\n{}", packer, opts.usage(brief)))?;
        }
        if parse.opt_present("strict") {
            config.strict = true;
        }
        config.inputs.extend(parse.free.iter().map(PathBuf::from));

        Ok(Some(config))
    }

    pub fn manifest_path(&self) -> PathBuf {
        self.manifest.clone().unwrap_or_else(|| self.output.with_extension("toml"))
    }
}
