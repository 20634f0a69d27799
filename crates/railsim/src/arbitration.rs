//! Block arbitration policies.
//!
//! A policy picks exactly one winner from a non-empty group of trains
//! requesting the same block in the same step. Policies never mutate state
//! and are deterministic for a given input order: the group is always built
//! in train registration order.

use bitcode::{Decode, Encode};
use serde::{Deserialize, Serialize};

use crate::train::Train;

/// Closed set of arbitration rules.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Encode, Decode,
)]
#[serde(rename_all = "snake_case")]
pub enum ArbitrationPolicy {
    /// Highest `priority` wins; ties go to the first contender.
    #[default]
    Priority,
    /// Smallest time-in-current-status wins; ties go to the first contender.
    FirstCome,
    /// First contender wins.
    Fifo,
}

impl ArbitrationPolicy {
    pub const ALL: [ArbitrationPolicy; 3] = [
        ArbitrationPolicy::Priority,
        ArbitrationPolicy::FirstCome,
        ArbitrationPolicy::Fifo,
    ];

    /// External name, as accepted by [`ArbitrationPolicy::from_name`].
    pub fn name(&self) -> &'static str {
        match self {
            ArbitrationPolicy::Priority => "priority",
            ArbitrationPolicy::FirstCome => "first_come",
            ArbitrationPolicy::Fifo => "fifo",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.name() == name)
    }

    /// Index of the winning contender, or `None` for an empty group.
    pub fn select(&self, contenders: &[&Train]) -> Option<usize> {
        if contenders.is_empty() {
            return None;
        }
        let winner = match self {
            ArbitrationPolicy::Priority => first_best(contenders, |a, b| a.priority > b.priority),
            ArbitrationPolicy::FirstCome => {
                first_best(contenders, |a, b| a.time_in_status < b.time_in_status)
            }
            ArbitrationPolicy::Fifo => 0,
        };
        Some(winner)
    }
}

/// Index of the first contender no later contender beats. `beats(a, b)` must
/// be a strict comparison so ties keep the earlier index.
fn first_best(contenders: &[&Train], beats: impl Fn(&Train, &Train) -> bool) -> usize {
    let mut best = 0;
    for (i, train) in contenders.iter().enumerate().skip(1) {
        if beats(*train, contenders[best]) {
            best = i;
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    fn train(id: &str, priority: i32, time_in_status: f64) -> Train {
        let mut t = Train::new(id, id, vec![], vec![]).with_priority(priority);
        t.time_in_status = time_in_status;
        t
    }

    #[test]
    fn test_priority_highest_wins() {
        let a = train("A", 1, 0.0);
        let b = train("B", 5, 0.0);
        let c = train("C", 3, 0.0);
        assert_eq!(ArbitrationPolicy::Priority.select(&[&a, &b, &c]), Some(1));
    }

    #[test]
    fn test_priority_tie_goes_to_first() {
        let a = train("A", 4, 0.0);
        let b = train("B", 4, 0.0);
        assert_eq!(ArbitrationPolicy::Priority.select(&[&a, &b]), Some(0));
        assert_eq!(ArbitrationPolicy::Priority.select(&[&b, &a]), Some(0));
    }

    #[test]
    fn test_first_come_smallest_time_in_status_wins() {
        let x = train("X", 1, 2.0);
        let y = train("Y", 9, 10.0);
        assert_eq!(ArbitrationPolicy::FirstCome.select(&[&y, &x]), Some(1));
        assert_eq!(ArbitrationPolicy::FirstCome.select(&[&x, &y]), Some(0));
    }

    #[test]
    fn test_first_come_tie_goes_to_first() {
        let x = train("X", 1, 3.0);
        let y = train("Y", 1, 3.0);
        assert_eq!(ArbitrationPolicy::FirstCome.select(&[&y, &x]), Some(0));
    }

    #[test]
    fn test_fifo_ignores_attributes() {
        let x = train("X", 0, 100.0);
        let y = train("Y", 99, 0.0);
        assert_eq!(ArbitrationPolicy::Fifo.select(&[&x, &y]), Some(0));
    }

    #[test]
    fn test_empty_group_has_no_winner() {
        for policy in ArbitrationPolicy::ALL {
            assert_eq!(policy.select(&[]), None, "{}", policy.name());
        }
    }

    #[test]
    fn test_single_contender_wins() {
        let a = train("A", 1, 1.0);
        for policy in ArbitrationPolicy::ALL {
            assert_eq!(policy.select(&[&a]), Some(0), "{}", policy.name());
        }
    }

    #[test]
    fn test_name_round_trip() {
        for policy in ArbitrationPolicy::ALL {
            assert_eq!(ArbitrationPolicy::from_name(policy.name()), Some(policy));
        }
        assert_eq!(ArbitrationPolicy::from_name("random"), None);
    }

    #[test]
    fn test_selection_is_deterministic() {
        let a = train("A", 2, 5.0);
        let b = train("B", 2, 5.0);
        let c = train("C", 1, 1.0);
        for policy in ArbitrationPolicy::ALL {
            let first = policy.select(&[&a, &b, &c]);
            for _ in 0..10 {
                assert_eq!(policy.select(&[&a, &b, &c]), first);
            }
        }
    }
}
