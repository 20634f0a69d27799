//! Canned networks and trains used across tests and benches.

use crate::network::{Block, Coordinate, Junction, Platform, RailwayNetwork, Signal, SignalAspect, Station};
use crate::train::{Train, TrainCategory};

/// Two stations `A` and `B` `length` metres apart on the x axis, one
/// platform each, joined by blocks `B1` (leaving A) and `B2` (entering B).
/// `B0` is an approach block behind A that feeds into `B1`.
pub fn two_station_line(length: f64) -> RailwayNetwork {
    let a = Station::new("A", "Alpha", Coordinate::new(0.0, 0.0))
        .with_code("ALP")
        .with_platform(Platform::new("A-1", "1"))
        .with_signal(Signal {
            id: "A-sig".into(),
            position: "E".into(),
            aspect: SignalAspect::Green,
        })
        .with_connected_block("B1");
    let b = Station::new("B", "Bravo", Coordinate::new(length, 0.0))
        .with_code("BRV")
        .with_platform(Platform::new("B-1", "1"))
        .with_connected_block("B2");
    let blocks = vec![
        Block::new("B0", length / 2.0, 160.0)
            .with_position(Coordinate::new(-length / 4.0, 0.0))
            .with_connected_block("B1"),
        Block::new("B1", length / 2.0, 160.0)
            .with_position(Coordinate::new(length / 4.0, 0.0))
            .with_connected_block("B0")
            .with_connected_block("B2"),
        Block::new("B2", length / 2.0, 160.0)
            .with_position(Coordinate::new(length * 0.75, 0.0))
            .with_connected_block("B1"),
    ];
    let junction = Junction::new("J1", Coordinate::new(length / 2.0, 0.0))
        .with_connected_block("B1")
        .with_connected_block("B2");
    RailwayNetwork::new(vec![a, b], blocks, vec![junction])
}

/// `n` platforms at terminus `T`, fed from origin `O` 500 m away. No blocks
/// are needed: trains given an empty block sequence never contend.
pub fn terminus_with_platforms(n: usize) -> RailwayNetwork {
    let origin = Station::new("O", "Origin", Coordinate::new(0.0, 0.0));
    let terminus = (1..=n).fold(
        Station::new("T", "Terminus", Coordinate::new(0.0, 500.0)),
        |station, i| station.with_platform(Platform::new(format!("T-{i}"), i.to_string())),
    );
    RailwayNetwork::new(vec![origin, terminus], vec![Block::new("OT", 500.0, 120.0)], vec![])
}

/// A train from `A` to `B` over `B1`, `B2` on [`two_station_line`].
pub fn line_train(id: &str, priority: i32, departure: f64) -> Train {
    Train::new(
        id,
        format!("Service {id}"),
        vec!["A".into(), "B".into()],
        vec!["B1".into(), "B2".into()],
    )
    .with_category(TrainCategory::Express)
    .with_priority(priority)
    .with_schedule(departure, departure + 120.0)
}

/// Like [`line_train`], but starting on the approach block `B0`. It takes
/// `B1` on departure and reaches the `B2` boundary one step after a
/// [`line_train`] that departs at the same time.
pub fn approach_train(id: &str, priority: i32) -> Train {
    Train::new(
        id,
        format!("Service {id}"),
        vec!["A".into(), "B".into()],
        vec!["B0".into(), "B1".into(), "B2".into()],
    )
    .with_category(TrainCategory::Local)
    .with_priority(priority)
    .with_schedule(0.0, 120.0)
}
