#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for Maze Walk adapters.
//!
//! Renderers read the maze and the session's event stream; nothing in the
//! simulation depends on this crate.

mod loading;
mod scene;

pub use loading::{LoadBarrier, Material, Palette, Surface};
pub use scene::{Compass, EntityKind, Hud, Modal, PlayerView, Scene, SceneEntity, WALL_THICKNESS};

use anyhow::Result as AnyResult;
use maze_walk_core::Input;
use std::time::Duration;

/// RGBA color used when presenting frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red channel intensity in the range 0.0..=1.0.
    pub red: f32,
    /// Green channel intensity in the range 0.0..=1.0.
    pub green: f32,
    /// Blue channel intensity in the range 0.0..=1.0.
    pub blue: f32,
    /// Alpha channel intensity in the range 0.0..=1.0.
    pub alpha: f32,
}

impl Color {
    /// Creates a new color from floating point channels.
    #[must_use]
    pub const fn new(red: f32, green: f32, blue: f32, alpha: f32) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Creates an opaque color from byte RGB values.
    #[must_use]
    pub const fn from_rgb_u8(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red: red as f32 / 255.0,
            green: green as f32 / 255.0,
            blue: blue as f32 / 255.0,
            alpha: 1.0,
        }
    }

    /// Byte RGB channels, dropping alpha.
    #[must_use]
    pub fn to_rgb_u8(self) -> [u8; 3] {
        [self.red, self.green, self.blue].map(|channel| (channel.clamp(0.0, 1.0) * 255.0).round() as u8)
    }

    /// Returns a new color lightened towards white by the provided amount.
    #[must_use]
    pub fn lighten(self, amount: f32) -> Self {
        let amount = amount.clamp(0.0, 1.0);

        Self {
            red: lighten_channel(self.red, amount),
            green: lighten_channel(self.green, amount),
            blue: lighten_channel(self.blue, amount),
            alpha: self.alpha,
        }
    }
}

fn lighten_channel(channel: f32, amount: f32) -> f32 {
    channel + (1.0 - channel) * amount
}

/// Input snapshot gathered by adapters before updating the scene.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameInput {
    /// Logical movement input triggered on this frame.
    pub input: Option<Input>,
    /// Whether the player dismissed the collection modal.
    pub resume: bool,
    /// Whether the player asked to leave.
    pub quit: bool,
}

impl FrameInput {
    /// Frame input carrying a single movement input.
    #[must_use]
    pub const fn with_input(input: Input) -> Self {
        Self {
            input: Some(input),
            resume: false,
            quit: false,
        }
    }
}

/// What the adapter should do after a frame was simulated.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FrameOutcome {
    /// Animations are in flight; keep producing frames.
    Animating,
    /// Nothing moves until the next input arrives.
    Idle,
    /// Leave the render loop.
    Exit,
}

/// Presentation descriptor consumed by rendering backends.
#[derive(Clone, Debug, PartialEq)]
pub struct Presentation {
    /// Title used by the created window or header line.
    pub window_title: String,
    /// Solid color used to clear each frame.
    pub clear_color: Color,
    /// Fallback colors for tagged entities.
    pub palette: Palette,
    /// Scene content that should be displayed.
    pub scene: Scene,
}

impl Presentation {
    /// Constructs a new presentation descriptor with the default palette.
    #[must_use]
    pub fn new<T>(window_title: T, clear_color: Color, scene: Scene) -> Self
    where
        T: Into<String>,
    {
        Self {
            window_title: window_title.into(),
            clear_color,
            palette: Palette::default(),
            scene,
        }
    }
}

/// Rendering backend capable of presenting Maze Walk scenes.
pub trait RenderingBackend {
    /// Runs the rendering backend until `update_scene` asks it to exit.
    ///
    /// The provided `update_scene` closure receives the simulated frame delta
    /// and per-frame input captured by the adapter, and mutates the scene
    /// before it is rendered.
    fn run<F>(self, presentation: Presentation, update_scene: F) -> AnyResult<()>
    where
        F: FnMut(Duration, FrameInput, &mut Scene) -> FrameOutcome;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lighten_moves_towards_white() {
        let color = Color::new(0.0, 0.5, 1.0, 0.25).lighten(0.5);
        assert_eq!(color, Color::new(0.5, 0.75, 1.0, 0.25));
    }

    #[test]
    fn lighten_clamps_the_amount() {
        let color = Color::from_rgb_u8(0, 0, 0).lighten(3.0);
        assert_eq!(color.to_rgb_u8(), [255, 255, 255]);
    }

    #[test]
    fn byte_channels_round_trip() {
        assert_eq!(Color::from_rgb_u8(12, 200, 99).to_rgb_u8(), [12, 200, 99]);
    }

    #[test]
    fn frame_input_defaults_to_nothing() {
        let input = FrameInput::default();
        assert_eq!(input.input, None);
        assert!(!input.resume && !input.quit);
        assert_eq!(
            FrameInput::with_input(Input::RotateLeft).input,
            Some(Input::RotateLeft)
        );
    }
}
