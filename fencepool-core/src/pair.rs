//! Scheduled bouts

use serde::{Deserialize, Serialize};

use crate::opponent::{SlotId, UNSCORED};

/// Least rest a fencer should get between two bouts
///
/// A rest of 0 means the fencer is on the piste twice in a row.
pub const MIN_REST: i32 = 1;

/// One bout of a pool
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pair {
    /// 1-based position in the pool's order
    pub order: u32,
    pub a: SlotId,
    pub b: SlotId,
    /// Bouts `a` sat out since its previous appearance, `UNSCORED` for its first
    pub fitness_a: i32,
    /// Bouts `b` sat out since its previous appearance, `UNSCORED` for its first
    pub fitness_b: i32,
    /// Either side rests less than `MIN_REST`
    pub rest_error: bool,
}

impl Pair {
    pub fn new(order: u32, a: SlotId, b: SlotId) -> Self {
        Self {
            order,
            a,
            b,
            fitness_a: UNSCORED,
            fitness_b: UNSCORED,
            rest_error: false,
        }
    }

    /// True when `slot` fences in this bout
    pub fn involves(&self, slot: SlotId) -> bool {
        self.a == slot || self.b == slot
    }

    /// True when both bouts share at least one fencer
    pub fn shares_fencer_with(&self, other: &Pair) -> bool {
        other.involves(self.a) || other.involves(self.b)
    }

    /// The unordered pair as (lower slot, higher slot)
    pub fn key(&self) -> (SlotId, SlotId) {
        (self.a.min(self.b), self.a.max(self.b))
    }

    /// Worst rest among the scored sides, `UNSCORED` if neither is scored
    pub fn fitness(&self) -> i32 {
        match (self.fitness_a, self.fitness_b) {
            (UNSCORED, UNSCORED) => UNSCORED,
            (UNSCORED, f) | (f, UNSCORED) => f,
            (a, b) => a.min(b),
        }
    }

    pub(crate) fn refresh_rest_error(&mut self) {
        let too_short = |f: i32| f != UNSCORED && f < MIN_REST;
        self.rest_error = too_short(self.fitness_a) || too_short(self.fitness_b);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_involves() {
        let pair = Pair::new(1, SlotId(2), SlotId(5));
        assert!(pair.involves(SlotId(2)));
        assert!(pair.involves(SlotId(5)));
        assert!(!pair.involves(SlotId(1)));
    }

    #[test]
    fn test_key_is_unordered() {
        assert_eq!(Pair::new(1, SlotId(5), SlotId(2)).key(), (SlotId(2), SlotId(5)));
        assert_eq!(Pair::new(1, SlotId(2), SlotId(5)).key(), (SlotId(2), SlotId(5)));
    }

    #[test]
    fn test_shares_fencer() {
        let first = Pair::new(1, SlotId(1), SlotId(2));
        assert!(first.shares_fencer_with(&Pair::new(2, SlotId(2), SlotId(3))));
        assert!(!first.shares_fencer_with(&Pair::new(2, SlotId(3), SlotId(4))));
    }

    #[test]
    fn test_rest_error_threshold() {
        let mut pair = Pair::new(3, SlotId(1), SlotId(2));
        pair.refresh_rest_error();
        assert!(!pair.rest_error);

        pair.fitness_a = 0;
        pair.refresh_rest_error();
        assert!(pair.rest_error);
        assert_eq!(pair.fitness(), 0);

        pair.fitness_a = MIN_REST;
        pair.fitness_b = 4;
        pair.refresh_rest_error();
        assert!(!pair.rest_error);
        assert_eq!(pair.fitness(), MIN_REST);
    }
}
