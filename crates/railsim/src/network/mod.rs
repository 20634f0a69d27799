//! Rail network registry: stations with platforms, single-occupant blocks,
//! junctions and the block adjacency map.
//!
//! ## Data model
//! - `Station`: coordinate, ordered platforms, decorative signals
//! - `Block`: track segment holding at most one train (`BlockStatus`)
//! - `Junction`: joins blocks, switching time tracked only
//! - `RailwayNetwork`: owns all of the above plus identifier indices
//!
//! Platform assignment returns `Option<PlatformAssignment>` so a full
//! station is an explicit outcome rather than a silent skip.

mod state;
mod types;


pub use types::*;
