//! Seeded random corridor generator.
//!
//! A corridor is a straight line of stations with one block per
//! station-to-station segment. Trains run forward over a random span of it,
//! so the same seed always yields the same network and timetable.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::network::{Block, Coordinate, Platform, RailwayNetwork, Station};
use crate::train::{Train, TrainCategory};

pub struct Corridor {
    pub network: RailwayNetwork,
    pub trains: Vec<Train>,
}

const CATEGORIES: [TrainCategory; 3] = [
    TrainCategory::Express,
    TrainCategory::Local,
    TrainCategory::Freight,
];

/// Build a corridor of `stations` stations (at least 2) and `trains` trains.
pub fn random_corridor(seed: u64, stations: usize, trains: usize) -> Corridor {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let stations = stations.max(2);

    let mut x = 0.0;
    let mut station_list = Vec::with_capacity(stations);
    for i in 0..stations {
        let platforms = rng.gen_range(1..=3);
        let station = (0..platforms).fold(
            Station::new(format!("S{i}"), format!("Station {i}"), Coordinate::new(x, 0.0)),
            |s, p| {
                s.with_platform(
                    Platform::new(format!("S{i}-P{p}"), (p + 1).to_string())
                        .with_dwell_time(rng.gen_range(10.0..60.0)),
                )
            },
        );
        station_list.push(station);
        x += rng.gen_range(300.0..2000.0);
    }

    let blocks: Vec<Block> = (0..stations - 1)
        .map(|i| {
            let from = station_list[i].position;
            let to = station_list[i + 1].position;
            let mut block = Block::new(
                format!("K{i}"),
                from.distance_to(&to),
                rng.gen_range(60.0..160.0),
            )
            .with_position(from.lerp(&to, 0.5));
            if i > 0 {
                block = block.with_connected_block(format!("K{}", i - 1));
            }
            if i + 2 < stations {
                block = block.with_connected_block(format!("K{}", i + 1));
            }
            block
        })
        .collect();

    let train_list = (0..trains)
        .map(|n| {
            let start = rng.gen_range(0..stations - 1);
            let end = rng.gen_range(start + 1..stations);
            let route = (start..=end).map(|i| format!("S{i}")).collect();
            let block_sequence = (start..end).map(|i| format!("K{i}")).collect();
            let departure = rng.gen_range(0..30) as f64 * 10.0;
            Train::new(format!("T{n}"), format!("Train {n}"), route, block_sequence)
                .with_category(CATEGORIES[rng.gen_range(0..CATEGORIES.len())])
                .with_priority(rng.gen_range(1..=5))
                .with_max_speed(rng.gen_range(80.0..160.0))
                .with_schedule(departure, departure + (end - start) as f64 * 120.0)
        })
        .collect();

    Corridor {
        network: RailwayNetwork::new(station_list, blocks, Vec::new()),
        trains: train_list,
    }
}
