//! Bidirectional mapping between grid cell indices and world coordinates.
//!
//! Cells sit on a uniform grid of [`CELL_SPAN`] world units centred on the
//! origin. Grid `x` maps to world `x` and grid `y` maps to world `z`, which is
//! stored in the `y` component of the [`Vec2`] ground positions used across
//! the engine.

use glam::Vec2;

use crate::CellCoord;

/// World units covered by a single cell along each axis.
pub const CELL_SPAN: f32 = 2.0;

/// World coordinate of the centre of grid index `index` in a maze of `size` cells.
#[must_use]
pub fn world_coord_of(index: u32, size: u32) -> f32 {
    index as f32 * CELL_SPAN - (size as f32 - 1.0)
}

/// Grid index nearest to `world`, or `None` when it falls outside `[0, size)`.
#[must_use]
pub fn grid_index_of(world: f32, size: u32) -> Option<u32> {
    let index = ((world + (size as f32 - 1.0)) / CELL_SPAN).round();
    if !index.is_finite() || index < 0.0 || index >= size as f32 {
        return None;
    }
    Some(index as u32)
}

/// World-space ground position of a cell centre.
#[must_use]
pub fn world_position_of(cell: CellCoord, size: u32) -> Vec2 {
    Vec2::new(world_coord_of(cell.x(), size), world_coord_of(cell.y(), size))
}

/// Cell containing a world-space ground position, if any.
#[must_use]
pub fn cell_at(position: Vec2, size: u32) -> Option<CellCoord> {
    let x = grid_index_of(position.x, size)?;
    let y = grid_index_of(position.y, size)?;
    Some(CellCoord::new(x, y))
}
