#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that boots the Maze Walk experience.

mod config;
mod terminal;

use std::{
    io,
    path::PathBuf,
    time::{Duration, Instant},
};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use maze_walk_core::{Command, Outcome};
use maze_walk_rendering::{
    Color, FrameOutcome, LoadBarrier, Palette, Presentation, RenderingBackend, Scene, Surface,
};
use maze_walk_system_session::{apply, query, Session, Tally};
use maze_walk_world::Maze;
use tracing_subscriber::EnvFilter;

use crate::{
    config::{ConfigFile, SessionArgs},
    terminal::{Glyphs, TerminalBackend},
};

const ONE_SECOND: Duration = Duration::from_secs(1);

#[derive(Parser, Debug)]
#[command(name = "maze-walk", version, about = "Walk a procedurally generated maze")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Play an interactive session in the terminal
    ///
    /// Keys are read a line at a time. Timed sessions keep counting down while
    /// waiting for input.
    Play(PlayArgs),
    /// Print a generated maze and exit
    Map {
        #[command(flatten)]
        session: SessionArgs,
    },
}

#[derive(Args, Debug)]
struct PlayArgs {
    #[command(flatten)]
    session: SessionArgs,

    /// Glyph file used to draw walls
    #[arg(long)]
    wall_texture: Option<PathBuf>,

    /// Glyph file used to draw floor cells
    #[arg(long)]
    floor_texture: Option<PathBuf>,

    /// Disable ANSI colors
    #[arg(long)]
    no_color: bool,
}

/// Entry point for the Maze Walk command-line interface.
fn main() -> Result<()> {
    install_tracing();
    let cli = Cli::parse();

    match cli.command {
        Commands::Play(args) => play(args),
        Commands::Map { session } => map(&session),
    }
}

fn install_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn map(args: &SessionArgs) -> Result<()> {
    let file = args.resolve()?;
    let session = Session::start(file.session).context("failed to start session")?;
    print!("{}", describe(query::maze(&session)));
    let _ = session.dispose();
    Ok(())
}

fn describe(maze: &Maze) -> String {
    format!(
        "{}spawn {}, goal {}, {} red tiles\n",
        maze.ascii_map(None),
        maze.center_dead_end(),
        maze.farthest_dead_end(),
        maze.red_tiles().len()
    )
}

fn play(args: PlayArgs) -> Result<()> {
    let ConfigFile { session, textures } = args.session.resolve()?;
    let wall_texture = args.wall_texture.or(textures.wall);
    let floor_texture = args.floor_texture.or(textures.floor);

    let mut session = Session::start(session).context("failed to start session")?;

    let palette = Palette::default();
    let requested = [(Surface::Wall, wall_texture), (Surface::Floor, floor_texture)];
    let mut barrier = LoadBarrier::new(
        requested
            .iter()
            .filter(|(_, path)| path.is_some())
            .map(|(surface, _)| *surface),
        palette,
    );
    for (surface, path) in &requested {
        if let Some(path) = path {
            let _ = barrier.complete(*surface, terminal::load_glyph(path));
        }
    }
    let glyphs = Glyphs::from_barrier(&barrier);

    let mut scene = Scene::build(query::maze(&session), query::collectibles(&session));
    for event in session.opening_events() {
        scene.apply_event(&event);
    }
    sync_player(&session, &mut scene);

    let presentation = Presentation::new(
        query::welcome_banner(&session),
        Color::from_rgb_u8(0, 0, 0),
        scene,
    );
    let lines = terminal::spawn_line_reader(io::BufReader::new(io::stdin()));
    let stdout = io::stdout();
    let backend = TerminalBackend::new(lines, stdout.lock(), glyphs, !args.no_color);

    let timed = query::config(&session).timed;
    let mut last_second = Instant::now();
    let mut events = Vec::new();
    backend.run(presentation, |dt, input, scene| {
        if input.quit {
            return FrameOutcome::Exit;
        }

        if timed {
            while last_second.elapsed() >= ONE_SECOND {
                last_second += ONE_SECOND;
                apply(&mut session, Command::SecondElapsed, &mut events);
            }
        }
        if input.resume {
            apply(&mut session, Command::Resume, &mut events);
        }
        if let Some(input) = input.input {
            apply(&mut session, Command::Input { input }, &mut events);
        }
        apply(&mut session, Command::Tick { dt }, &mut events);

        for event in events.drain(..) {
            scene.apply_event(&event);
        }
        sync_player(&session, scene);

        if query::is_animating(&session) && !query::is_suspended(&session) {
            FrameOutcome::Animating
        } else if query::outcome(&session).is_some() {
            FrameOutcome::Exit
        } else {
            FrameOutcome::Idle
        }
    })?;

    let tally = query::tally(&session);
    match (session.dispose(), tally) {
        (Some(Outcome::Won), Tally::Score(score)) => println!("Won with {score} collected."),
        (Some(Outcome::Won), Tally::Countdown(left)) => println!("Won with {left}s to spare."),
        (Some(Outcome::TimedOut), _) => println!("Out of time."),
        (None, _) => println!("Goodbye."),
    }
    Ok(())
}

fn sync_player(session: &Session, scene: &mut Scene) {
    scene.player.position = query::player_position(session);
    scene.player.rotation = query::player_rotation(session);
}
