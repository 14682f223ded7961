//! Texture load tracking with flat-colour fallbacks.

use std::collections::{BTreeMap, BTreeSet};

use anyhow::Result as AnyResult;
use maze_walk_core::{Shape, TileKind};
use tracing::{debug, warn};

use crate::{Color, EntityKind};

/// Surfaces that may carry a loaded texture.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Surface {
    /// Wall slabs.
    Wall,
    /// The ground plane.
    Floor,
}

impl Surface {
    /// Every texturable surface.
    pub const ALL: [Surface; 2] = [Surface::Wall, Surface::Floor];
}

/// Appearance resolved for a surface.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Material<T> {
    /// A successfully loaded texture.
    Textured(T),
    /// Flat color used while loading or after a failed load.
    Fallback(Color),
}

/// Flat colors used whenever no texture is available.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Palette {
    /// Wall slabs.
    pub wall: Color,
    /// Ground plane.
    pub floor: Color,
    /// Spawn tile.
    pub spawn: Color,
    /// Goal tile.
    pub goal: Color,
    /// Red tiles.
    pub red: Color,
    /// Collectibles, before shading by shape.
    pub collectible: Color,
}

impl Default for Palette {
    fn default() -> Self {
        let green = Color::from_rgb_u8(40, 160, 60);
        Self {
            wall: Color::from_rgb_u8(120, 110, 100),
            floor: Color::from_rgb_u8(60, 60, 60),
            spawn: Color::from_rgb_u8(60, 90, 200),
            goal: green,
            red: Color::from_rgb_u8(190, 40, 40),
            collectible: green.lighten(0.4),
        }
    }
}

impl Palette {
    /// Fallback color of a texturable surface.
    #[must_use]
    pub const fn surface(&self, surface: Surface) -> Color {
        match surface {
            Surface::Wall => self.wall,
            Surface::Floor => self.floor,
        }
    }

    /// Color of a tagged entity.
    #[must_use]
    pub fn entity(&self, kind: EntityKind) -> Color {
        match kind {
            EntityKind::Wall => self.wall,
            EntityKind::Floor => self.floor,
            EntityKind::Tile { kind } => match kind {
                TileKind::Spawn => self.spawn,
                TileKind::Goal => self.goal,
                TileKind::Red => self.red,
                TileKind::Plain => self.floor,
            },
            EntityKind::Collectible { shape, .. } => {
                let shade = match shape {
                    Shape::Pyramid => 0.0,
                    Shape::Sphere => 0.15,
                    Shape::Cylinder => 0.3,
                    Shape::Cube => 0.45,
                };
                self.collectible.lighten(shade)
            }
        }
    }
}

/// Join over a fixed set of independent texture loads.
///
/// Completes once every requested surface has reported, successfully or not.
/// Failed loads resolve to the palette's flat color so the maze stays playable.
#[derive(Debug)]
pub struct LoadBarrier<T> {
    outstanding: BTreeSet<Surface>,
    resolved: BTreeMap<Surface, Material<T>>,
    palette: Palette,
}

impl<T> LoadBarrier<T> {
    /// Starts waiting on one load per surface in `surfaces`.
    #[must_use]
    pub fn new<I>(surfaces: I, palette: Palette) -> Self
    where
        I: IntoIterator<Item = Surface>,
    {
        Self {
            outstanding: surfaces.into_iter().collect(),
            resolved: BTreeMap::new(),
            palette,
        }
    }

    /// Records the result of one load.
    ///
    /// Returns `false` for surfaces that were not requested or already reported.
    pub fn complete(&mut self, surface: Surface, result: AnyResult<T>) -> bool {
        if !self.outstanding.remove(&surface) {
            return false;
        }

        let material = match result {
            Ok(texture) => {
                debug!(?surface, "texture loaded");
                Material::Textured(texture)
            }
            Err(error) => {
                warn!(?surface, error = %format!("{error:#}"), "texture load failed, using flat color");
                Material::Fallback(self.palette.surface(surface))
            }
        };
        let _ = self.resolved.insert(surface, material);
        true
    }

    /// Loads still in flight.
    #[must_use]
    pub fn outstanding(&self) -> usize {
        self.outstanding.len()
    }

    /// Reports whether every requested load has reported.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.outstanding.is_empty()
    }

    /// Appearance to use for `surface` right now.
    #[must_use]
    pub fn material(&self, surface: Surface) -> Material<&T> {
        match self.resolved.get(&surface) {
            Some(Material::Textured(texture)) => Material::Textured(texture),
            Some(Material::Fallback(color)) => Material::Fallback(*color),
            None => Material::Fallback(self.palette.surface(surface)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;

    #[test]
    fn barrier_completes_once_every_load_reports() {
        let mut barrier = LoadBarrier::new(Surface::ALL, Palette::default());
        assert_eq!(barrier.outstanding(), 2);
        assert!(!barrier.is_complete());

        assert!(barrier.complete(Surface::Floor, Ok("floor.png")));
        assert!(!barrier.is_complete());
        assert!(barrier.complete(Surface::Wall, Ok("wall.png")));
        assert!(barrier.is_complete());

        assert_eq!(barrier.material(Surface::Wall), Material::Textured(&"wall.png"));
    }

    #[test]
    fn failed_loads_fall_back_to_flat_colors() {
        let palette = Palette::default();
        let mut barrier: LoadBarrier<String> = LoadBarrier::new(Surface::ALL, palette);

        assert!(barrier.complete(Surface::Wall, Err(anyhow!("missing file"))));
        assert!(barrier.complete(Surface::Floor, Ok("stone".to_owned())));

        assert!(barrier.is_complete());
        assert_eq!(barrier.material(Surface::Wall), Material::Fallback(palette.wall));
    }

    #[test]
    fn unexpected_completions_are_ignored() {
        let mut barrier = LoadBarrier::new([Surface::Wall], Palette::default());
        assert!(!barrier.complete(Surface::Floor, Ok(1)));
        assert!(barrier.complete(Surface::Wall, Ok(2)));
        assert!(!barrier.complete(Surface::Wall, Ok(3)));
        assert_eq!(barrier.material(Surface::Wall), Material::Textured(&2));
    }

    #[test]
    fn pending_surfaces_render_with_the_palette() {
        let palette = Palette::default();
        let barrier: LoadBarrier<()> = LoadBarrier::new(Surface::ALL, palette);
        assert_eq!(barrier.material(Surface::Floor), Material::Fallback(palette.floor));
    }

    #[test]
    fn collectible_colors_vary_by_shape() {
        let palette = Palette::default();
        let pyramid = palette.entity(EntityKind::Collectible {
            id: maze_walk_core::CollectibleId::new(0),
            shape: Shape::Pyramid,
        });
        let cube = palette.entity(EntityKind::Collectible {
            id: maze_walk_core::CollectibleId::new(1),
            shape: Shape::Cube,
        });
        assert_ne!(pyramid, cube);
        assert_eq!(
            palette.entity(EntityKind::Tile {
                kind: TileKind::Goal
            }),
            palette.goal
        );
    }
}
