//! Block conflict detection and arbitration.
//!
//! Runs once per step after every train has been updated. Moving and waiting
//! trains that target a next block are grouped by that block, in the order
//! the groups are first encountered while walking the trains in registration
//! order. Each group then resolves to at most one grant:
//!
//! - unknown block: skipped, nobody is granted or denied
//! - block under maintenance: every requester denied
//! - block held by a train outside the group: every requester denied
//! - block held by a group member: that member keeps it, the rest are denied
//! - free block: a lone requester is granted, otherwise the policy picks
//!
//! Every denial costs the train one step of delay and bumps the conflict
//! counter, so a stand-off lasting N steps counts N conflicts per loser. A
//! denied train keeps its speed; it only stops advancing.
//!
//! A grant moves the block cursor on immediately, regardless of how far the
//! train has travelled. An unopposed train therefore claims one block per
//! step and holds the last block of its sequence while still close to its
//! origin, until it reaches its terminus.

use std::collections::HashMap;

use bevy::prelude::*;

use crate::arbitration::ArbitrationPolicy;
use crate::events::{DelayReason, EventDetail, EventJournal, EventKind, SimulationEvent};
use crate::network::{BlockId, BlockStatus, RailwayNetwork};
use crate::train::{Train, TrainStatus};

/// Trains requesting the same block in one step, as indices into the train
/// list.
#[derive(Debug, Clone, PartialEq)]
pub struct BlockRequest {
    pub block_id: BlockId,
    pub trains: Vec<usize>,
}

/// Per-step resolution counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConflictOutcome {
    pub granted: u32,
    pub denied: u32,
}

/// Group requesting trains by target block, in first-encountered order.
pub fn collect_requests(trains: &[Train]) -> Vec<BlockRequest> {
    let mut requests: Vec<BlockRequest> = Vec::new();
    let mut by_block: HashMap<&str, usize> = HashMap::new();

    for (i, train) in trains.iter().enumerate() {
        let Some(block_id) = train.requested_block() else {
            continue;
        };
        match by_block.get(block_id) {
            Some(&slot) => requests[slot].trains.push(i),
            None => {
                by_block.insert(block_id, requests.len());
                requests.push(BlockRequest {
                    block_id: block_id.to_string(),
                    trains: vec![i],
                });
            }
        }
    }
    requests
}

/// Detect and resolve every block request for this step.
///
/// `conflict_count` is incremented once per denied train.
pub fn resolve_conflicts(
    trains: &mut [Train],
    network: &mut RailwayNetwork,
    policy: ArbitrationPolicy,
    now: f64,
    dt: f64,
    journal: &mut EventJournal,
    conflict_count: &mut u64,
) -> ConflictOutcome {
    let mut outcome = ConflictOutcome::default();

    for request in collect_requests(trains) {
        let Some(block) = network.block(&request.block_id) else {
            debug!(
                "t={}: block '{}' requested by {} train(s) not in network, skipped",
                now,
                request.block_id,
                request.trains.len()
            );
            continue;
        };

        let (winner, reason) = match block.status {
            BlockStatus::Maintenance => (None, DelayReason::BlockMaintenance),
            BlockStatus::Occupied => {
                let holder = request
                    .trains
                    .iter()
                    .copied()
                    .find(|&i| block.occupant.as_deref() == Some(trains[i].id.as_str()));
                (holder, DelayReason::BlockOccupied)
            }
            BlockStatus::Free => {
                let contenders: Vec<&Train> = request.trains.iter().map(|&i| &trains[i]).collect();
                let winner = policy.select(&contenders).map(|k| request.trains[k]);
                (winner, DelayReason::LostArbitration)
            }
        };

        for &i in &request.trains {
            if Some(i) == winner {
                grant(&mut trains[i], network, &request.block_id, now, journal);
                outcome.granted += 1;
            } else {
                deny(&mut trains[i], &request.block_id, reason, now, dt, journal);
                outcome.denied += 1;
                *conflict_count += 1;
            }
        }
    }
    outcome
}

fn grant(
    train: &mut Train,
    network: &mut RailwayNetwork,
    block_id: &str,
    now: f64,
    journal: &mut EventJournal,
) {
    if let Some(previous) = train.held_block.take() {
        if previous != block_id {
            if let Some(block) = network.block_mut(&previous) {
                block.release(&train.id);
            }
        }
    }
    if let Some(block) = network.block_mut(block_id) {
        block.occupy(&train.id);
    }
    train.held_block = Some(block_id.to_string());
    train.advance_block();
    train.current_block = Some(block_id.to_string());
    train.set_status(TrainStatus::Moving);

    debug!("t={}: train {} enters block {}", now, train.id, block_id);
    journal.push(SimulationEvent::new(
        now,
        EventKind::BlockEnter,
        train.id.as_str(),
        block_id,
    ));
}

/// Hold the train at the block boundary for this step.
fn deny(
    train: &mut Train,
    block_id: &str,
    reason: DelayReason,
    now: f64,
    dt: f64,
    journal: &mut EventJournal,
) {
    train.set_status(TrainStatus::Waiting);
    train.record_delay(dt);

    debug!(
        "t={}: train {} denied block {} ({:?}), delay now {}",
        now, train.id, block_id, reason, train.delay
    );
    journal.push(
        SimulationEvent::new(now, EventKind::Delay, train.id.as_str(), block_id).with_detail(
            EventDetail::BlockConflict {
                block_id: block_id.to_string(),
                reason,
            },
        ),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::{Block, Coordinate, Station};

    fn network() -> RailwayNetwork {
        let a = Station::new("A", "A", Coordinate::new(0.0, 0.0));
        let b = Station::new("B", "B", Coordinate::new(1000.0, 0.0));
        let blocks = vec![
            Block::new("B1", 500.0, 120.0),
            Block::new("B2", 500.0, 120.0),
            Block::new("B3", 500.0, 120.0).under_maintenance(),
        ];
        RailwayNetwork::new(vec![a, b], blocks, vec![])
    }

    fn moving(id: &str, priority: i32, blocks: &[&str], network: &RailwayNetwork) -> Train {
        let mut train = Train::new(
            id,
            id,
            vec!["A".into(), "B".into()],
            blocks.iter().map(|b| b.to_string()).collect(),
        )
        .with_priority(priority);
        train.reset(network);
        train.status = TrainStatus::Moving;
        train
    }

    #[test]
    fn test_requests_grouped_in_encounter_order() {
        let net = network();
        let mut trains = vec![
            moving("T1", 1, &["B1", "B2"], &net),
            moving("T2", 1, &["B2", "B1"], &net),
            moving("T3", 1, &["B1", "B2"], &net),
        ];
        trains.push(Train::new("T4", "T4", vec![], vec!["B1".into(), "B2".into()]));

        let requests = collect_requests(&trains);
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0].block_id, "B2");
        assert_eq!(requests[0].trains, vec![0, 2]);
        assert_eq!(requests[1].block_id, "B1");
        assert_eq!(requests[1].trains, vec![1]);
    }

    #[test]
    fn test_lone_requester_granted() {
        let mut net = network();
        let mut trains = vec![moving("T1", 1, &["B1", "B2"], &net)];
        let mut journal = EventJournal::default();
        let mut conflicts = 0;

        let outcome = resolve_conflicts(
            &mut trains,
            &mut net,
            ArbitrationPolicy::Priority,
            0.0,
            1.0,
            &mut journal,
            &mut conflicts,
        );
        assert_eq!(outcome.granted, 1);
        assert_eq!(conflicts, 0);
        assert_eq!(trains[0].current_block.as_deref(), Some("B2"));
        assert_eq!(trains[0].held_block.as_deref(), Some("B2"));
        assert!(trains[0].next_block.is_none());
        assert_eq!(net.block("B2").unwrap().occupant.as_deref(), Some("T1"));
        assert_eq!(journal.of_kind(EventKind::BlockEnter).count(), 1);
    }

    #[test]
    fn test_priority_winner_and_loser_delay() {
        let mut net = network();
        let mut trains = vec![
            moving("LOW", 1, &["B1", "B2"], &net),
            moving("HIGH", 5, &["B1", "B2"], &net),
        ];
        let mut journal = EventJournal::default();
        let mut conflicts = 0;

        resolve_conflicts(
            &mut trains,
            &mut net,
            ArbitrationPolicy::Priority,
            0.0,
            1.0,
            &mut journal,
            &mut conflicts,
        );
        assert_eq!(trains[1].status, TrainStatus::Moving);
        assert_eq!(trains[0].status, TrainStatus::Waiting);
        assert_eq!(trains[0].delay, 1.0);
        assert_eq!(conflicts, 1);

        // Next step the block is held by HIGH, which no longer requests it.
        resolve_conflicts(
            &mut trains,
            &mut net,
            ArbitrationPolicy::Priority,
            1.0,
            1.0,
            &mut journal,
            &mut conflicts,
        );
        assert_eq!(trains[0].delay, 2.0);
        assert_eq!(conflicts, 2);
        let delay = journal.of_kind(EventKind::Delay).last().unwrap();
        assert_eq!(
            delay.detail,
            Some(EventDetail::BlockConflict {
                block_id: "B2".into(),
                reason: DelayReason::BlockOccupied,
            })
        );
    }

    #[test]
    fn test_denied_train_keeps_speed() {
        let mut net = network();
        let mut trains = vec![moving("T1", 1, &["B1", "B3"], &net)];
        trains[0].speed = 54.0;
        let mut journal = EventJournal::default();
        let mut conflicts = 0;

        resolve_conflicts(
            &mut trains,
            &mut net,
            ArbitrationPolicy::Priority,
            0.0,
            1.0,
            &mut journal,
            &mut conflicts,
        );
        assert_eq!(trains[0].status, TrainStatus::Waiting);
        assert_eq!(trains[0].speed, 54.0);
        assert_eq!(trains[0].time_in_status, 0.0);
    }

    #[test]
    fn test_waiting_train_granted_once_block_frees() {
        let mut net = network();
        let mut trains = vec![moving("T1", 1, &["B1", "B2"], &net)];
        trains[0].status = TrainStatus::Waiting;
        net.block_mut("B2").unwrap().occupy("OTHER");
        let mut journal = EventJournal::default();
        let mut conflicts = 0;

        resolve_conflicts(
            &mut trains,
            &mut net,
            ArbitrationPolicy::Fifo,
            0.0,
            1.0,
            &mut journal,
            &mut conflicts,
        );
        assert_eq!(trains[0].status, TrainStatus::Waiting);

        net.block_mut("B2").unwrap().release("OTHER");
        resolve_conflicts(
            &mut trains,
            &mut net,
            ArbitrationPolicy::Fifo,
            1.0,
            1.0,
            &mut journal,
            &mut conflicts,
        );
        assert_eq!(trains[0].status, TrainStatus::Moving);
        assert_eq!(trains[0].time_in_status, 0.0);
        assert_eq!(conflicts, 1);
    }

    #[test]
    fn test_maintenance_denies_everyone() {
        let mut net = network();
        let mut trains = vec![
            moving("T1", 9, &["B1", "B3"], &net),
            moving("T2", 1, &["B1", "B3"], &net),
        ];
        let mut journal = EventJournal::default();
        let mut conflicts = 0;

        let outcome = resolve_conflicts(
            &mut trains,
            &mut net,
            ArbitrationPolicy::Priority,
            0.0,
            1.0,
            &mut journal,
            &mut conflicts,
        );
        assert_eq!(outcome.granted, 0);
        assert_eq!(outcome.denied, 2);
        assert!(trains.iter().all(|t| t.status == TrainStatus::Waiting));
        assert_eq!(net.block("B3").unwrap().status, BlockStatus::Maintenance);
    }

    #[test]
    fn test_unknown_block_skipped() {
        let mut net = network();
        let mut trains = vec![moving("T1", 1, &["B1", "NOPE"], &net)];
        let mut journal = EventJournal::default();
        let mut conflicts = 0;

        let outcome = resolve_conflicts(
            &mut trains,
            &mut net,
            ArbitrationPolicy::Priority,
            0.0,
            1.0,
            &mut journal,
            &mut conflicts,
        );
        assert_eq!(outcome, ConflictOutcome::default());
        assert_eq!(trains[0].status, TrainStatus::Moving);
        assert!(journal.is_empty());
    }

    #[test]
    fn test_grant_releases_previous_block() {
        let mut net = network();
        let mut trains = vec![moving("T1", 1, &["B1", "B2", "B1"], &net)];
        let mut journal = EventJournal::default();
        let mut conflicts = 0;

        for t in 0..2 {
            resolve_conflicts(
                &mut trains,
                &mut net,
                ArbitrationPolicy::Priority,
                t as f64,
                1.0,
                &mut journal,
                &mut conflicts,
            );
        }
        assert_eq!(trains[0].held_block.as_deref(), Some("B1"));
        assert_eq!(net.block("B2").unwrap().status, BlockStatus::Free);
        assert_eq!(net.block("B1").unwrap().occupant.as_deref(), Some("T1"));
    }
}
