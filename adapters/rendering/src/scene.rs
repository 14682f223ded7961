//! Tagged scene entities and the widgets layered over them.

use std::fmt;

use glam::Vec2;
use maze_walk_core::{
    coords::{self, CELL_SPAN},
    CellCoord, Collectible, CollectibleId, Direction, Event, Shape, TileKind,
};
use maze_walk_world::Maze;

/// Depth of a wall slab on the ground plane, in world units.
pub const WALL_THICKNESS: f32 = 0.2;

/// Explicit discriminator attached to every rendered entity.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EntityKind {
    /// One wall slab between two cells or on the border.
    Wall,
    /// The ground plane under the whole maze.
    Floor,
    /// A classified floor tile.
    Tile {
        /// Classification of the tile.
        kind: TileKind,
    },
    /// A live collectible.
    Collectible {
        /// Identifier used to remove the entity once collected.
        id: CollectibleId,
        /// Shape the collectible is drawn with.
        shape: Shape,
    },
}

/// A tagged entity on the ground plane.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SceneEntity {
    /// Discriminator chosen at construction.
    pub kind: EntityKind,
    /// Center of the entity on the ground plane.
    pub position: Vec2,
    /// Footprint along the world x and z axes.
    pub extent: Vec2,
}

impl SceneEntity {
    /// Creates a tagged entity.
    #[must_use]
    pub const fn new(kind: EntityKind, position: Vec2, extent: Vec2) -> Self {
        Self {
            kind,
            position,
            extent,
        }
    }
}

/// Compass widget state; only changes once a rotation completes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Compass {
    heading: Direction,
}

impl Compass {
    /// Compass pointing at `heading`.
    #[must_use]
    pub const fn new(heading: Direction) -> Self {
        Self { heading }
    }

    /// Cardinal direction shown.
    #[must_use]
    pub const fn heading(&self) -> Direction {
        self.heading
    }

    /// Arrow glyph for top-down views.
    #[must_use]
    pub const fn needle(&self) -> char {
        match self.heading {
            Direction::North => '^',
            Direction::East => '>',
            Direction::South => 'v',
            Direction::West => '<',
        }
    }
}

impl fmt::Display for Compass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.heading.label())
    }
}

/// Modal overlays shown on top of the scene.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Modal {
    /// A collectible was picked up and the session is suspended.
    Collected {
        /// Shape of the collectible.
        shape: Shape,
    },
    /// The goal was reached.
    Won,
    /// The countdown ran out.
    TimedOut,
}

/// On-screen widgets fed from the session's event stream.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Hud {
    /// Compass state.
    pub compass: Compass,
    /// Score, in untimed sessions.
    pub score: Option<u32>,
    /// Remaining seconds, in timed sessions.
    pub remaining: Option<u32>,
    /// Overlay currently shown, if any.
    pub modal: Option<Modal>,
    /// Shape of the most recently collected object.
    pub last_collected: Option<Shape>,
}

impl Hud {
    /// Updates widgets in response to a session event.
    pub fn apply(&mut self, event: &Event) {
        match *event {
            Event::CompassChanged { heading } => self.compass = Compass::new(heading),
            Event::ScoreChanged { score } => self.score = Some(score),
            Event::TimeChanged { remaining } => self.remaining = Some(remaining),
            Event::CollectibleCollected { shape, .. } => self.last_collected = Some(shape),
            Event::Suspended => {
                self.modal = self.last_collected.map(|shape| Modal::Collected { shape });
            }
            Event::Resumed => {
                if matches!(self.modal, Some(Modal::Collected { .. })) {
                    self.modal = None;
                }
            }
            Event::GameWon => self.modal = Some(Modal::Won),
            Event::GameOverByTimeout => self.modal = Some(Modal::TimedOut),
        }
    }
}

/// Camera placement derived from the player state.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PlayerView {
    /// Position on the ground plane.
    pub position: Vec2,
    /// Yaw in radians.
    pub rotation: f32,
}

/// Everything a renderer needs to draw one frame.
#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
    /// Cells along each edge of the maze.
    pub size: u32,
    /// Tagged static and dynamic entities.
    pub entities: Vec<SceneEntity>,
    /// Camera placement.
    pub player: PlayerView,
    /// Widget state.
    pub hud: Hud,
}

impl Scene {
    /// Lays out the floor, every wall slab once, classified tiles and collectibles.
    ///
    /// The camera starts on the spawn tile facing its open side.
    #[must_use]
    pub fn build(maze: &Maze, collectibles: &[Collectible]) -> Self {
        let size = maze.size();
        let span = size as f32 * CELL_SPAN;
        let mut entities = vec![SceneEntity::new(
            EntityKind::Floor,
            Vec2::ZERO,
            Vec2::splat(span),
        )];

        for cell in maze.cells() {
            let coord = cell.coord();
            let center = coords::world_position_of(coord, size);

            let mut sides = vec![Direction::North, Direction::West];
            if coord.y() + 1 == size {
                sides.push(Direction::South);
            }
            if coord.x() + 1 == size {
                sides.push(Direction::East);
            }
            for side in sides {
                if cell.has_wall(side) {
                    entities.push(wall_slab(center, side));
                }
            }

            let kind = maze.tile_kind(coord);
            if kind != TileKind::Plain {
                entities.push(SceneEntity::new(
                    EntityKind::Tile { kind },
                    center,
                    Vec2::splat(CELL_SPAN),
                ));
            }
        }

        entities.extend(collectibles.iter().map(|collectible| {
            SceneEntity::new(
                EntityKind::Collectible {
                    id: collectible.id,
                    shape: collectible.shape,
                },
                collectible.position,
                Vec2::splat(CELL_SPAN / 2.0),
            )
        }));

        let spawn = maze.center_dead_end();
        let heading = maze
            .cell(spawn)
            .and_then(|cell| cell.open_side())
            .unwrap_or_default();

        Self {
            size,
            entities,
            player: PlayerView {
                position: coords::world_position_of(spawn, size),
                rotation: heading.rotation(),
            },
            hud: Hud {
                compass: Compass::new(heading),
                ..Hud::default()
            },
        }
    }

    /// Applies a session event to the scene and its widgets.
    pub fn apply_event(&mut self, event: &Event) {
        if let Event::CollectibleCollected { collectible, .. } = *event {
            self.entities.retain(|entity| {
                !matches!(entity.kind, EntityKind::Collectible { id, .. } if id == collectible)
            });
        }
        self.hud.apply(event);
    }

    /// Entities carrying the wall tag.
    pub fn walls(&self) -> impl Iterator<Item = &SceneEntity> + '_ {
        self.entities
            .iter()
            .filter(|entity| entity.kind == EntityKind::Wall)
    }

    /// Cell under the player, if the camera is inside the maze.
    #[must_use]
    pub fn player_cell(&self) -> Option<CellCoord> {
        coords::cell_at(self.player.position, self.size)
    }
}

fn wall_slab(center: Vec2, side: Direction) -> SceneEntity {
    let offset = side.world_step() * (CELL_SPAN / 2.0);
    let extent = match side {
        Direction::North | Direction::South => Vec2::new(CELL_SPAN, WALL_THICKNESS),
        Direction::East | Direction::West => Vec2::new(WALL_THICKNESS, CELL_SPAN),
    };
    SceneEntity::new(EntityKind::Wall, center + offset, extent)
}
