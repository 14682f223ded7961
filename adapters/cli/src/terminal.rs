//! Line-oriented terminal renderer drawing a top-down plan of the scene.

use std::{
    fs,
    io::{self, BufRead, Write},
    path::Path,
    sync::mpsc::{self, Receiver, RecvTimeoutError},
    thread,
    time::Duration,
};

use anyhow::{Context, Result};
use glam::Vec2;
use maze_walk_core::{coords, Input, Shape, TileKind};
use maze_walk_rendering::{
    Color, EntityKind, FrameInput, FrameOutcome, LoadBarrier, Material, Modal, Palette,
    Presentation, RenderingBackend, Scene, Surface,
};

const CONTROLS: &str = "w/s move, a/d turn, c continue, q quit";

/// Simulated frame length used while animations settle.
pub(crate) const FRAME: Duration = Duration::from_millis(16);

/// How long the loop waits for a line before simulating an idle frame.
const IDLE_POLL: Duration = Duration::from_millis(200);

/// Forwards lines from `reader` on a background thread.
///
/// The channel closes at end of input or after the first read error.
pub(crate) fn spawn_line_reader<R>(reader: R) -> Receiver<io::Result<String>>
where
    R: BufRead + Send + 'static,
{
    let (sender, receiver) = mpsc::channel();
    let _ = thread::spawn(move || {
        for line in reader.lines() {
            let failed = line.is_err();
            if sender.send(line).is_err() || failed {
                break;
            }
        }
    });
    receiver
}

/// Reads the first visible character of a glyph file.
pub(crate) fn load_glyph(path: &Path) -> Result<char> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read texture at {}", path.display()))?;
    contents
        .chars()
        .find(|glyph| !glyph.is_whitespace())
        .with_context(|| format!("texture {} has no visible glyph", path.display()))
}

/// Glyph overrides resolved from texture loads.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct Glyphs {
    wall: Option<char>,
    floor: Option<char>,
}

impl Glyphs {
    pub(crate) fn from_barrier(barrier: &LoadBarrier<char>) -> Self {
        let glyph = |surface| match barrier.material(surface) {
            Material::Textured(glyph) => Some(*glyph),
            Material::Fallback(_) => None,
        };
        Self {
            wall: glyph(Surface::Wall),
            floor: glyph(Surface::Floor),
        }
    }
}

/// Result of waiting on the input stream.
enum Wait {
    Line(String),
    Closed,
    Exit,
}

#[derive(Clone, Copy)]
struct Slot {
    glyph: char,
    color: Option<Color>,
}

/// Renders scenes to a writer and reads keys from a stream of input lines.
///
/// Idle frames are simulated while no line arrives, so timers keep running.
pub(crate) struct TerminalBackend<W> {
    lines: Receiver<io::Result<String>>,
    writer: W,
    glyphs: Glyphs,
    color: bool,
}

impl<W> TerminalBackend<W>
where
    W: Write,
{
    pub(crate) fn new(
        lines: Receiver<io::Result<String>>,
        writer: W,
        glyphs: Glyphs,
        color: bool,
    ) -> Self {
        Self {
            lines,
            writer,
            glyphs,
            color,
        }
    }

    fn draw(&mut self, scene: &Scene, palette: &Palette, background: Color) -> Result<()> {
        let background = self.color.then_some(background);
        let view = plan_view(scene, palette, self.glyphs, background);
        write!(self.writer, "{view}")?;
        self.draw_status(scene)
    }

    fn draw_status(&mut self, scene: &Scene) -> Result<()> {
        writeln!(self.writer, "{}", status_line(scene))?;
        if let Some(modal) = scene.hud.modal {
            writeln!(self.writer, "{}", modal_line(modal))?;
        }
        write!(self.writer, "> ")?;
        self.writer.flush().context("failed to flush terminal output")
    }

    /// Waits for the next line, simulating idle frames meanwhile.
    fn next_line<F>(&mut self, update_scene: &mut F, scene: &mut Scene) -> Result<Wait>
    where
        F: FnMut(Duration, FrameInput, &mut Scene) -> FrameOutcome,
    {
        loop {
            match self.lines.recv_timeout(IDLE_POLL) {
                Ok(line) => return line.map(Wait::Line).context("failed to read player input"),
                Err(RecvTimeoutError::Disconnected) => return Ok(Wait::Closed),
                Err(RecvTimeoutError::Timeout) => {
                    let before = scene.hud;
                    if settle(update_scene, FrameInput::default(), scene) == FrameOutcome::Exit {
                        return Ok(Wait::Exit);
                    }
                    if scene.hud != before {
                        writeln!(self.writer)?;
                        self.draw_status(scene)?;
                    }
                }
            }
        }
    }
}

impl<W> RenderingBackend for TerminalBackend<W>
where
    W: Write,
{
    fn run<F>(mut self, presentation: Presentation, mut update_scene: F) -> Result<()>
    where
        F: FnMut(Duration, FrameInput, &mut Scene) -> FrameOutcome,
    {
        let Presentation {
            window_title,
            clear_color,
            palette,
            mut scene,
        } = presentation;
        writeln!(self.writer, "{window_title}")?;
        writeln!(self.writer, "{CONTROLS}")?;

        if settle(&mut update_scene, FrameInput::default(), &mut scene) == FrameOutcome::Exit {
            return self.draw(&scene, &palette, clear_color);
        }

        loop {
            self.draw(&scene, &palette, clear_color)?;
            let line = match self.next_line(&mut update_scene, &mut scene)? {
                Wait::Line(line) => line,
                Wait::Closed => {
                    writeln!(self.writer)?;
                    return Ok(());
                }
                Wait::Exit => {
                    writeln!(self.writer)?;
                    return self.draw(&scene, &palette, clear_color);
                }
            };

            for key in line.chars().filter(|key| !key.is_whitespace()) {
                let Some(input) = frame_input(key) else {
                    writeln!(self.writer, "Unknown key {key:?} ({CONTROLS})")?;
                    continue;
                };
                if settle(&mut update_scene, input, &mut scene) == FrameOutcome::Exit {
                    return self.draw(&scene, &palette, clear_color);
                }
            }
        }
    }
}

fn settle<F>(update_scene: &mut F, input: FrameInput, scene: &mut Scene) -> FrameOutcome
where
    F: FnMut(Duration, FrameInput, &mut Scene) -> FrameOutcome,
{
    let mut outcome = update_scene(FRAME, input, scene);
    while outcome == FrameOutcome::Animating {
        outcome = update_scene(FRAME, FrameInput::default(), scene);
    }
    outcome
}

fn frame_input(key: char) -> Option<FrameInput> {
    let input = match key.to_ascii_lowercase() {
        'w' => FrameInput::with_input(Input::MoveForward),
        's' => FrameInput::with_input(Input::MoveBackward),
        'a' => FrameInput::with_input(Input::RotateLeft),
        'd' => FrameInput::with_input(Input::RotateRight),
        'c' => FrameInput {
            resume: true,
            ..FrameInput::default()
        },
        'q' => FrameInput {
            quit: true,
            ..FrameInput::default()
        },
        _ => return None,
    };
    Some(input)
}

/// Top-down plan: one character per cell and per wall slot.
///
/// A `background` enables ANSI colour, painting unoccupied slots with it.
fn plan_view(scene: &Scene, palette: &Palette, glyphs: Glyphs, background: Option<Color>) -> String {
    let span = 2 * scene.size as usize + 1;
    let mut grid = vec![
        Slot {
            glyph: ' ',
            color: None,
        };
        span * span
    ];

    for row in 0..span {
        for column in 0..span {
            let slot = &mut grid[row * span + column];
            if row % 2 == 0 && column % 2 == 0 {
                slot.glyph = '+';
            } else if row % 2 == 1 && column % 2 == 1 {
                if let Some(glyph) = glyphs.floor {
                    *slot = Slot {
                        glyph,
                        color: Some(palette.floor),
                    };
                }
            }
        }
    }

    for entity in &scene.entities {
        let glyph = match entity.kind {
            EntityKind::Floor => continue,
            EntityKind::Wall => glyphs.wall.unwrap_or(if entity.extent.x > entity.extent.y {
                '-'
            } else {
                '|'
            }),
            EntityKind::Tile { kind } => match kind {
                TileKind::Spawn => 'S',
                TileKind::Goal => 'G',
                TileKind::Red => '*',
                TileKind::Plain => continue,
            },
            EntityKind::Collectible { shape, .. } => shape_glyph(shape),
        };
        if let Some(index) = slot_index(entity.position, scene.size) {
            grid[index] = Slot {
                glyph,
                color: Some(palette.entity(entity.kind)),
            };
        }
    }

    if let Some(cell) = scene.player_cell() {
        let center = coords::world_position_of(cell, scene.size);
        if let Some(index) = slot_index(center, scene.size) {
            grid[index] = Slot {
                glyph: scene.hud.compass.needle(),
                color: None,
            };
        }
    }

    let color = background.is_some();
    let mut view = String::with_capacity(span * (span + 1) * if color { 20 } else { 1 });
    for row in grid.chunks(span) {
        if let Some(background) = background {
            let [red, green, blue] = background.to_rgb_u8();
            view.push_str(&format!("\x1b[48;2;{red};{green};{blue}m"));
        }
        for slot in row {
            match slot.color.filter(|_| color) {
                Some(tint) => {
                    let [red, green, blue] = tint.to_rgb_u8();
                    view.push_str(&format!("\x1b[38;2;{red};{green};{blue}m{}\x1b[39m", slot.glyph));
                }
                None => view.push(slot.glyph),
            }
        }
        if color {
            view.push_str("\x1b[0m");
        }
        view.push('\n');
    }
    view
}

fn slot_index(position: Vec2, size: u32) -> Option<usize> {
    let span = 2 * size as usize + 1;
    let column = (position.x + size as f32).round();
    let row = (position.y + size as f32).round();
    if column < 0.0 || row < 0.0 {
        return None;
    }
    let (column, row) = (column as usize, row as usize);
    (column < span && row < span).then_some(row * span + column)
}

fn shape_glyph(shape: Shape) -> char {
    match shape {
        Shape::Pyramid => 'A',
        Shape::Sphere => 'o',
        Shape::Cylinder => 'H',
        Shape::Cube => '#',
    }
}

fn status_line(scene: &Scene) -> String {
    let hud = &scene.hud;
    match (hud.remaining, hud.score) {
        (Some(remaining), _) => format!("Facing {} | Time left: {remaining}s", hud.compass),
        (None, Some(score)) => format!("Facing {} | Score: {score}", hud.compass),
        (None, None) => format!("Facing {}", hud.compass),
    }
}

fn modal_line(modal: Modal) -> String {
    match modal {
        Modal::Collected { shape } => format!("You found a {shape:?}! Press c to continue."),
        Modal::Won => "You reached the goal!".to_owned(),
        Modal::TimedOut => "Time is up.".to_owned(),
    }
}
