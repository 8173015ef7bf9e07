//! Game module
//!
//! World objects and everything they are built from:
//! - Identity, flags and positions
//! - Model, physics and game data blocks
//! - Sequence counters
//! - World objects, their inventories and the drop operation
//! - The landblock registry dropped objects are handed to

pub mod definition;
pub mod flags;
pub mod game_data;
pub mod guid;
pub mod landblock;
pub mod model_data;
pub mod physics_data;
pub mod position;
pub mod sequence;
pub mod world_object;
