//! `RailwayNetwork` construction, lookups and occupancy operations.

use std::collections::HashMap;

use bevy::prelude::*;

use super::types::*;

impl RailwayNetwork {
    /// Build the registry and its indices. The adjacency map is taken from
    /// each block's `connected_blocks`. Duplicate identifiers keep the first
    /// record for lookups.
    pub fn new(stations: Vec<Station>, blocks: Vec<Block>, junctions: Vec<Junction>) -> Self {
        let station_index = build_index("station", stations.iter().map(|s| s.id.as_str()));
        let block_index = build_index("block", blocks.iter().map(|b| b.id.as_str()));
        let junction_index = build_index("junction", junctions.iter().map(|j| j.id.as_str()));

        let mut adjacency: HashMap<BlockId, Vec<BlockId>> = HashMap::with_capacity(blocks.len());
        for block in &blocks {
            adjacency
                .entry(block.id.clone())
                .or_insert_with(|| block.connected_blocks.clone());
        }

        Self {
            stations,
            blocks,
            junctions,
            adjacency,
            station_index,
            block_index,
            junction_index,
        }
    }

    // -------------------------------------------------------------------------
    // Lookups
    // -------------------------------------------------------------------------

    pub fn stations(&self) -> &[Station] {
        &self.stations
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn junctions(&self) -> &[Junction] {
        &self.junctions
    }

    /// True when there is nothing for a train to run on.
    pub fn is_empty(&self) -> bool {
        self.stations.is_empty() && self.blocks.is_empty()
    }

    pub fn station(&self, id: &str) -> Option<&Station> {
        self.station_index.get(id).map(|&i| &self.stations[i])
    }

    pub fn station_mut(&mut self, id: &str) -> Option<&mut Station> {
        match self.station_index.get(id) {
            Some(&i) => Some(&mut self.stations[i]),
            None => None,
        }
    }

    pub fn block(&self, id: &str) -> Option<&Block> {
        self.block_index.get(id).map(|&i| &self.blocks[i])
    }

    pub fn block_mut(&mut self, id: &str) -> Option<&mut Block> {
        match self.block_index.get(id) {
            Some(&i) => Some(&mut self.blocks[i]),
            None => None,
        }
    }

    pub fn junction(&self, id: &str) -> Option<&Junction> {
        self.junction_index.get(id).map(|&i| &self.junctions[i])
    }

    /// Blocks adjacent to `block_id`. Empty for unknown blocks.
    pub fn neighbors(&self, block_id: &str) -> &[BlockId] {
        self.adjacency
            .get(block_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Straight-line distance between two stations, if both exist.
    pub fn station_distance(&self, from: &str, to: &str) -> Option<f64> {
        let a = self.station(from)?;
        let b = self.station(to)?;
        Some(a.position.distance_to(&b.position))
    }

    // -------------------------------------------------------------------------
    // Occupancy
    // -------------------------------------------------------------------------

    /// Clear every block and platform occupant. Blocks under maintenance keep
    /// their status.
    pub fn reset_occupancy(&mut self) {
        for block in &mut self.blocks {
            block.occupant = None;
            if block.status == BlockStatus::Occupied {
                block.status = BlockStatus::Free;
            }
        }
        for station in &mut self.stations {
            for platform in &mut station.platforms {
                platform.occupied = false;
                platform.occupant = None;
            }
        }
    }

    pub fn snapshot(&self) -> NetworkSnapshot {
        NetworkSnapshot {
            stations: self.stations.clone(),
            blocks: self.blocks.clone(),
            junctions: self.junctions.clone(),
        }
    }
}

fn build_index<'a>(kind: &str, ids: impl Iterator<Item = &'a str>) -> HashMap<String, usize> {
    let mut index = HashMap::new();
    for (i, id) in ids.enumerate() {
        if index.contains_key(id) {
            warn!("Duplicate {} id '{}' ignored for lookups", kind, id);
            continue;
        }
        index.insert(id.to_string(), i);
    }
    index
}

impl Station {
    /// Place `train_id` on the first free platform.
    ///
    /// Returns `None` when every platform is taken (or the station has none);
    /// the train then holds no platform and has no dwell timer.
    pub fn assign_platform(&mut self, train_id: &str) -> Option<PlatformAssignment> {
        let platform = self.platforms.iter_mut().find(|p| p.occupant.is_none())?;
        platform.occupied = true;
        platform.occupant = Some(train_id.to_string());
        Some(PlatformAssignment {
            platform_id: platform.id.clone(),
            dwell_time: platform.dwell_time,
        })
    }

    /// Free whichever platform `train_id` occupies. Returns whether one was
    /// found.
    pub fn release_platform(&mut self, train_id: &str) -> bool {
        let Some(platform) = self
            .platforms
            .iter_mut()
            .find(|p| p.occupant.as_deref() == Some(train_id))
        else {
            return false;
        };
        platform.occupied = false;
        platform.occupant = None;
        true
    }

    pub fn free_platform_count(&self) -> usize {
        self.platforms.iter().filter(|p| p.occupant.is_none()).count()
    }
}

impl Block {
    /// Whether `train_id` may enter: the block is not under maintenance and
    /// is either free or already held by that train.
    pub fn is_available_to(&self, train_id: &str) -> bool {
        match self.status {
            BlockStatus::Maintenance => false,
            BlockStatus::Free => true,
            BlockStatus::Occupied => self.occupant.as_deref() == Some(train_id),
        }
    }

    pub fn occupy(&mut self, train_id: &str) {
        self.status = BlockStatus::Occupied;
        self.occupant = Some(train_id.to_string());
    }

    /// Release the block if `train_id` holds it.
    pub fn release(&mut self, train_id: &str) -> bool {
        if self.occupant.as_deref() != Some(train_id) {
            return false;
        }
        self.occupant = None;
        if self.status == BlockStatus::Occupied {
            self.status = BlockStatus::Free;
        }
        true
    }
}
