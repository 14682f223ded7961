//! Optional TOML configuration file plus command-line overrides.

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use maze_walk_core::{ObjectShape, PlacementMode, SessionConfig};
use serde::Deserialize;

/// Contents of a `--config` file.
#[derive(Debug, Default, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct ConfigFile {
    pub(crate) session: SessionConfig,
    pub(crate) textures: TextureConfig,
}

/// Glyph files for the terminal renderer, relative to the config file.
#[derive(Debug, Default, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct TextureConfig {
    pub(crate) wall: Option<PathBuf>,
    pub(crate) floor: Option<PathBuf>,
}

impl ConfigFile {
    pub(crate) fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file at {}", path.display()))?;
        let mut file = Self::parse(&contents)
            .with_context(|| format!("invalid config file {}", path.display()))?;

        let base = path.parent().unwrap_or_else(|| Path::new("."));
        for texture in [&mut file.textures.wall, &mut file.textures.floor] {
            if let Some(relative) = texture.take() {
                *texture = Some(base.join(relative));
            }
        }
        Ok(file)
    }

    fn parse(contents: &str) -> Result<Self> {
        toml::from_str(contents).context("failed to parse config toml contents")
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub(crate) enum PlacementArg {
    All,
    Random,
    Closest,
}

impl From<PlacementArg> for PlacementMode {
    fn from(value: PlacementArg) -> Self {
        match value {
            PlacementArg::All => Self::All,
            PlacementArg::Random => Self::Random,
            PlacementArg::Closest => Self::Closest,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub(crate) enum ShapeArg {
    Mixed,
    Pyramid,
    Sphere,
    Cylinder,
    Cube,
}

impl From<ShapeArg> for ObjectShape {
    fn from(value: ShapeArg) -> Self {
        match value {
            ShapeArg::Mixed => Self::Mixed,
            ShapeArg::Pyramid => Self::Pyramid,
            ShapeArg::Sphere => Self::Sphere,
            ShapeArg::Cylinder => Self::Cylinder,
            ShapeArg::Cube => Self::Cube,
        }
    }
}

/// Session settings shared by every subcommand.
#[derive(Args, Debug, Default)]
pub(crate) struct SessionArgs {
    /// TOML file providing defaults for every other flag
    #[arg(long)]
    config: Option<PathBuf>,

    /// Cells along each edge of the maze
    #[arg(long)]
    size: Option<u32>,

    /// Which red tiles receive collectibles
    #[arg(long, value_enum)]
    placement: Option<PlacementArg>,

    /// Run a countdown instead of keeping score
    #[arg(long)]
    timed: bool,

    /// Starting countdown in seconds
    #[arg(long)]
    initial_time: Option<u32>,

    /// Seconds added per collected object
    #[arg(long)]
    time_bonus: Option<u32>,

    /// Shape of the collectibles
    #[arg(long, value_enum)]
    shape: Option<ShapeArg>,

    /// Pause after every collection until resumed
    #[arg(long)]
    pause_on_collect: bool,

    /// Seed for reproducible mazes
    #[arg(long)]
    seed: Option<u64>,
}

impl SessionArgs {
    /// Loads the config file, if any, and applies flag overrides on top.
    pub(crate) fn resolve(&self) -> Result<ConfigFile> {
        let mut file = match &self.config {
            Some(path) => ConfigFile::load(path)?,
            None => ConfigFile::default(),
        };
        self.apply(&mut file.session);
        file.session
            .validate()
            .context("invalid session configuration")?;
        Ok(file)
    }

    fn apply(&self, config: &mut SessionConfig) {
        if let Some(size) = self.size {
            config.maze_size = size;
        }
        if let Some(placement) = self.placement {
            config.placement_mode = placement.into();
        }
        if self.timed {
            config.timed = true;
        }
        if let Some(initial_time) = self.initial_time {
            config.initial_time = initial_time;
        }
        if let Some(time_bonus) = self.time_bonus {
            config.time_bonus = time_bonus;
        }
        if let Some(shape) = self.shape {
            config.object_shape = shape.into();
        }
        if self.pause_on_collect {
            config.pause_on_collect = true;
        }
        if let Some(seed) = self.seed {
            config.seed = Some(seed);
        }
    }
}
