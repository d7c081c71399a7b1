//! Display-free simulation module
//!
//! All gameplay logic lives here. This module has no rendering or platform
//! dependencies:
//! - Terrain is mutated only through `TerrainGrid::extend`, append-only
//! - Randomness comes from a seeded RNG owned by the terrain
//! - Everything else is per-frame recomputation from explicit inputs

pub mod difficulty;
pub mod raycast;
pub mod state;
pub mod terrain;
pub mod tick;

pub use difficulty::DifficultyCurve;
pub use raycast::{RayBatch, RaycastEngine};
pub use state::{GamePhase, GameState, PlayerState};
pub use terrain::{Cell, TerrainGrid};
pub use tick::{FrameInput, tick};
