//! The stepped simulation engine.
//!
//! `SimulationEngine` holds the network and the registered trains. Every run
//! works on a fresh `RunContext` built from clones of both, so runs never
//! share state and repeating a run with the same inputs reproduces it
//! exactly.
//!
//! One step, in order:
//!
//! ```text
//! drain due events -> update trains -> resolve conflicts -> snapshot -> advance clock
//! ```
//!
//! Every train update completes before any conflict is evaluated, and every
//! conflict is resolved before the snapshot is taken.

mod context;
mod report;
mod state;


pub use context::RunContext;
pub use report::RunReport;
pub use state::SimulationEngine;
