//! Assertion helpers for `TestRail` tests.

use crate::network::BlockStatus;
use crate::train::TrainStatus;

use super::TestRail;

impl TestRail {
    // -----------------------------------------------------------------------
    // Assertions
    // -----------------------------------------------------------------------

    pub fn assert_train_status(&self, id: &str, expected: TrainStatus) {
        let status = self.train(id).status;
        assert_eq!(
            status, expected,
            "Expected train {id} to be {:?}, got {:?}",
            expected, status
        );
    }

    /// Assert the block is occupied by exactly `train_id`.
    pub fn assert_block_held_by(&self, block_id: &str, train_id: &str) {
        let block = match self.context().network().block(block_id) {
            Some(block) => block,
            None => panic!("Expected block {block_id} to exist"),
        };
        assert_eq!(block.status, BlockStatus::Occupied, "block {block_id}");
        assert_eq!(
            block.occupant.as_deref(),
            Some(train_id),
            "Expected block {block_id} held by {train_id}"
        );
    }

    /// Assert no step so far has broken an occupancy invariant.
    pub fn assert_no_violations(&self) {
        let violations = self.context().violations();
        assert!(
            violations.is_clean(),
            "Expected no invariant violations, got {violations:?}"
        );
    }
}
