//! Data types for stations, blocks, junctions and the network registry.

use std::collections::HashMap;

use bitcode::{Decode, Encode};
use serde::{Deserialize, Serialize};

use crate::config::{DEFAULT_DWELL_TIME, DEFAULT_STATION_CAPACITY, DEFAULT_SWITCHING_TIME};

// =============================================================================
// Identifiers
// =============================================================================

/// Unique identifier for a station.
pub type StationId = String;

/// Unique identifier for a block (single-occupant track segment).
pub type BlockId = String;

/// Unique identifier for a junction.
pub type JunctionId = String;

/// Unique identifier for a platform within a station.
pub type PlatformId = String;

/// Unique identifier for a train.
pub type TrainId = String;

// =============================================================================
// Geometry
// =============================================================================

/// A 2-D point in network coordinates (metres).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, Encode, Decode)]
pub struct Coordinate {
    pub x: f64,
    pub y: f64,
}

impl Coordinate {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Straight-line distance to another point.
    pub fn distance_to(&self, other: &Coordinate) -> f64 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Linear interpolation towards `other`. `t` is clamped to `[0, 1]`.
    pub fn lerp(&self, other: &Coordinate, t: f64) -> Coordinate {
        let t = t.clamp(0.0, 1.0);
        Coordinate {
            x: self.x + (other.x - self.x) * t,
            y: self.y + (other.y - self.y) * t,
        }
    }
}

// =============================================================================
// Station
// =============================================================================

/// A platform at a station. `occupied` is true iff `occupant` is set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Encode, Decode)]
pub struct Platform {
    pub id: PlatformId,
    /// Display number (e.g. "1", "2a").
    pub number: String,
    pub occupied: bool,
    pub occupant: Option<TrainId>,
    /// Number of trains the platform is rated for. Informational only.
    pub capacity: u32,
    /// Seconds an arriving train must dwell before departing.
    pub dwell_time: f64,
}

impl Platform {
    pub fn new(id: impl Into<PlatformId>, number: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            number: number.into(),
            occupied: false,
            occupant: None,
            capacity: 2,
            dwell_time: DEFAULT_DWELL_TIME,
        }
    }

    pub fn with_dwell_time(mut self, dwell_time: f64) -> Self {
        self.dwell_time = dwell_time;
        self
    }
}

/// Signal aspect. Decorative: the engine never reads it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Encode, Decode)]
pub enum SignalAspect {
    #[default]
    Green,
    Yellow,
    Red,
}

/// A signal at a station.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Encode, Decode)]
pub struct Signal {
    pub id: String,
    /// Placement label (e.g. "N", "W").
    pub position: String,
    pub aspect: SignalAspect,
}

/// The result of placing a train on a free platform.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Encode, Decode)]
pub struct PlatformAssignment {
    pub platform_id: PlatformId,
    pub dwell_time: f64,
}

/// A station with its platforms and connected blocks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Encode, Decode)]
pub struct Station {
    pub id: StationId,
    pub name: String,
    pub code: String,
    pub position: Coordinate,
    /// Ordered; platform search takes the first free one.
    pub platforms: Vec<Platform>,
    pub signals: Vec<Signal>,
    pub connected_blocks: Vec<BlockId>,
    pub capacity: u32,
}

impl Station {
    pub fn new(id: impl Into<StationId>, name: impl Into<String>, position: Coordinate) -> Self {
        let id = id.into();
        Self {
            code: id.clone(),
            id,
            name: name.into(),
            position,
            platforms: Vec::new(),
            signals: Vec::new(),
            connected_blocks: Vec::new(),
            capacity: DEFAULT_STATION_CAPACITY,
        }
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = code.into();
        self
    }

    pub fn with_platform(mut self, platform: Platform) -> Self {
        self.platforms.push(platform);
        self
    }

    pub fn with_signal(mut self, signal: Signal) -> Self {
        self.signals.push(signal);
        self
    }

    pub fn with_connected_block(mut self, block_id: impl Into<BlockId>) -> Self {
        self.connected_blocks.push(block_id.into());
        self
    }
}

// =============================================================================
// Block
// =============================================================================

/// Occupancy state of a block.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Encode, Decode)]
pub enum BlockStatus {
    #[default]
    Free,
    Occupied,
    Maintenance,
}

impl BlockStatus {
    pub fn name(&self) -> &'static str {
        match self {
            BlockStatus::Free => "free",
            BlockStatus::Occupied => "occupied",
            BlockStatus::Maintenance => "maintenance",
        }
    }
}

/// A single-occupant track segment. `status == Occupied` iff `occupant` is
/// set; the occupant is unique at all times.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Encode, Decode)]
pub struct Block {
    pub id: BlockId,
    pub name: String,
    /// Length in metres.
    pub length: f64,
    /// Speed limit in km/h.
    pub max_speed: f64,
    pub status: BlockStatus,
    pub occupant: Option<TrainId>,
    pub connected_blocks: Vec<BlockId>,
    /// Rendering position, never read by the engine.
    pub position: Coordinate,
}

impl Block {
    pub fn new(id: impl Into<BlockId>, length: f64, max_speed: f64) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            id,
            length,
            max_speed,
            status: BlockStatus::Free,
            occupant: None,
            connected_blocks: Vec::new(),
            position: Coordinate::default(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_position(mut self, position: Coordinate) -> Self {
        self.position = position;
        self
    }

    pub fn with_connected_block(mut self, block_id: impl Into<BlockId>) -> Self {
        self.connected_blocks.push(block_id.into());
        self
    }

    pub fn under_maintenance(mut self) -> Self {
        self.status = BlockStatus::Maintenance;
        self
    }
}

// =============================================================================
// Junction
// =============================================================================

/// A junction joining blocks. Its switching time is tracked but never
/// arbitrated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Encode, Decode)]
pub struct Junction {
    pub id: JunctionId,
    pub name: String,
    pub position: Coordinate,
    pub connected_blocks: Vec<BlockId>,
    /// Seconds before a route through the junction becomes usable.
    pub switching_time: f64,
}

impl Junction {
    pub fn new(id: impl Into<JunctionId>, position: Coordinate) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            id,
            position,
            connected_blocks: Vec::new(),
            switching_time: DEFAULT_SWITCHING_TIME,
        }
    }

    pub fn with_connected_block(mut self, block_id: impl Into<BlockId>) -> Self {
        self.connected_blocks.push(block_id.into());
        self
    }
}

// =============================================================================
// Network registry
// =============================================================================

/// Stations, blocks and junctions with identifier indices and a block
/// adjacency map.
///
/// Topology is fixed once built. Each run clones the network, so the
/// occupancy fields mutated during a run never leak into the next one.
#[derive(Debug, Clone, Default)]
pub struct RailwayNetwork {
    pub(crate) stations: Vec<Station>,
    pub(crate) blocks: Vec<Block>,
    pub(crate) junctions: Vec<Junction>,
    pub(crate) adjacency: HashMap<BlockId, Vec<BlockId>>,
    pub(crate) station_index: HashMap<StationId, usize>,
    pub(crate) block_index: HashMap<BlockId, usize>,
    pub(crate) junction_index: HashMap<JunctionId, usize>,
}

/// Plain copy of the network's mutable state, for rendering and reports.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Encode, Decode)]
pub struct NetworkSnapshot {
    pub stations: Vec<Station>,
    pub blocks: Vec<Block>,
    pub junctions: Vec<Junction>,
}
