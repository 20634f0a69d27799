//! Train entities: static attributes (route, block sequence, schedule,
//! priority, kinematic limits) plus the mutable run state the engine
//! advances every step.

mod state;
mod types;


pub use types::*;
