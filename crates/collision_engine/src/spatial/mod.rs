//! Spatial collaborators of the collision world
//!
//! - [`camera`] - The buffered camera rectangle that drives culling
//! - [`broad_phase`] - Live-set culling around the camera
//! - [`terrain`] - Static tile obstacles supplied outside the entity table

pub mod camera;
pub mod broad_phase;
pub mod terrain;

pub use camera::{BufferMargins, CameraRegion};
pub use broad_phase::BroadPhaseCuller;
pub use terrain::{Terrain, Tile, TileGrid, TileShape};
