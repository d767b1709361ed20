//! Terrain collaborator
//!
//! Static, tile-based obstacles live outside the entity table. The resolver
//! asks the terrain for the tiles under a sweep and treats them like any other
//! blocking shape of the terrain's collision type. Tiles never receive
//! reactions.

use crate::foundation::math::Vec2;
use crate::physics::collision::{Aabb, CollisionShape, ShapeKind};
use crate::physics::collision_types::CollisionType;

/// A terrain shape handed to the resolver
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TileShape {
    /// World-space shape
    pub shape: CollisionShape,
    /// One-way tile, solid from above only
    pub jump_through: bool,
}

/// Source of static obstacles
pub trait Terrain {
    /// Collision type every terrain shape is registered under
    fn collision_type(&self) -> CollisionType;

    /// Append the shapes that may block a sweep covering `swept`, for a mover
    /// whose bounds at the start of the step were `previous`
    ///
    /// One-way shapes are returned with `jump_through` set whatever side the
    /// mover comes from; the resolver decides whether they block.
    fn tile_shapes(&self, swept: &Aabb, previous: &Aabb, out: &mut Vec<TileShape>);
}

/// Content of a grid cell
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Tile {
    /// Nothing
    #[default]
    Empty,
    /// Blocks from every side
    Solid,
    /// Blocks movers landing from above
    JumpThrough,
}

/// Uniform grid of tiles
#[derive(Debug, Clone)]
pub struct TileGrid {
    collision_type: CollisionType,
    origin: Vec2,
    tile_width: f32,
    tile_height: f32,
    columns: usize,
    rows: usize,
    tiles: Vec<Tile>,
}

impl TileGrid {
    /// Create an empty grid with its top-left corner at the origin
    pub fn new(collision_type: CollisionType, columns: usize, rows: usize, tile_width: f32, tile_height: f32) -> Self {
        Self {
            collision_type,
            origin: Vec2::zeros(),
            tile_width,
            tile_height,
            columns,
            rows,
            tiles: vec![Tile::Empty; columns * rows],
        }
    }

    /// Move the grid's top-left corner
    pub fn with_origin(mut self, x: f32, y: f32) -> Self {
        self.origin = Vec2::new(x, y);
        self
    }

    /// Set a cell; out-of-range cells are ignored and return `false`
    pub fn set_tile(&mut self, column: usize, row: usize, tile: Tile) -> bool {
        if column >= self.columns || row >= self.rows {
            return false;
        }
        self.tiles[row * self.columns + column] = tile;
        true
    }

    /// Read a cell; out-of-range cells are empty
    pub fn tile(&self, column: usize, row: usize) -> Tile {
        if column >= self.columns || row >= self.rows {
            return Tile::Empty;
        }
        self.tiles[row * self.columns + column]
    }

    /// Fill the outermost ring of cells
    pub fn fill_border(&mut self, tile: Tile) {
        for column in 0..self.columns {
            self.set_tile(column, 0, tile);
            self.set_tile(column, self.rows.saturating_sub(1), tile);
        }
        for row in 0..self.rows {
            self.set_tile(0, row, tile);
            self.set_tile(self.columns.saturating_sub(1), row, tile);
        }
    }

    /// World bounds of the whole grid
    #[allow(clippy::cast_precision_loss)]
    pub fn bounds(&self) -> Aabb {
        Aabb::from_edges(
            self.origin.x,
            self.origin.y,
            self.origin.x + self.columns as f32 * self.tile_width,
            self.origin.y + self.rows as f32 * self.tile_height,
        )
    }

    /// Cell range `[first, last)` covered by `min..max` along one axis
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
    fn cell_range(min: f32, max: f32, origin: f32, size: f32, count: usize) -> (usize, usize) {
        if size <= 0.0 || count == 0 {
            return (0, 0);
        }
        let first = ((min - origin) / size).floor().max(0.0);
        let last = ((max - origin) / size).ceil().min(count as f32);
        if !(first.is_finite() && last.is_finite()) || last <= first {
            return (0, 0);
        }
        (first as usize, last as usize)
    }

    #[allow(clippy::cast_precision_loss)]
    fn tile_shape(&self, column: usize, row: usize) -> CollisionShape {
        let center_x = self.origin.x + (column as f32 + 0.5) * self.tile_width;
        let center_y = self.origin.y + (row as f32 + 0.5) * self.tile_height;
        CollisionShape::new(
            ShapeKind::Rectangle { width: self.tile_width, height: self.tile_height },
            Vec2::zeros(),
            center_x,
            center_y,
        )
    }
}

impl Terrain for TileGrid {
    fn collision_type(&self) -> CollisionType {
        self.collision_type
    }

    fn tile_shapes(&self, swept: &Aabb, _previous: &Aabb, out: &mut Vec<TileShape>) {
        if swept.is_empty() {
            return;
        }
        let (first_column, last_column) = Self::cell_range(swept.left, swept.right, self.origin.x, self.tile_width, self.columns);
        let (first_row, last_row) = Self::cell_range(swept.top, swept.bottom, self.origin.y, self.tile_height, self.rows);

        for row in first_row..last_row {
            for column in first_column..last_column {
                let jump_through = match self.tile(column, row) {
                    Tile::Empty => continue,
                    Tile::Solid => false,
                    Tile::JumpThrough => true,
                };
                let shape = self.tile_shape(column, row);
                if !shape.aabb().overlaps(swept) {
                    continue;
                }
                out.push(TileShape { shape, jump_through });
            }
        }
    }
}
