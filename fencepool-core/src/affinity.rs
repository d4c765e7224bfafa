//! Affinity groups - competitors sharing a club, a team or a nation
//!
//! Group keys are display strings. They are interned per run into small
//! [`GroupId`]s in first-seen order, so two runs over the same list always
//! hand out the same ids.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::opponent::SlotId;

/// Interned affinity key, stable within one scheduling run
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GroupId(pub u32);

/// Competitors sharing the same affinity key
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AffinityBucket {
    pub group_id: GroupId,
    /// Members in slot order
    pub members: Vec<SlotId>,
}

impl AffinityBucket {
    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

/// Group membership of every competitor of a pool
#[derive(Clone, Debug, Default)]
pub struct AffinityIndex {
    keys: FxHashMap<String, GroupId>,
    /// Indexed by `GroupId`
    buckets: Vec<AffinityBucket>,
    /// Indexed by slot - 1
    memberships: Vec<Option<GroupId>>,
}

impl AffinityIndex {
    /// Build the index for an ordered competitor list
    ///
    /// `key` maps a competitor to its affinity key, or `None` when the
    /// competitor has no value for the criterion.
    pub fn build<T, F>(competitors: &[T], mut key: F) -> Self
    where
        F: FnMut(&T) -> Option<String>,
    {
        let mut index = Self::default();

        for (i, competitor) in competitors.iter().enumerate() {
            let slot = SlotId::from_index(i);
            let group = key(competitor).map(|k| index.intern(k));

            if let Some(group) = group {
                index.buckets[group.0 as usize].members.push(slot);
            }
            index.memberships.push(group);
        }

        index
    }

    /// Index without any grouping criterion
    pub fn ungrouped(pool_size: usize) -> Self {
        Self {
            memberships: vec![None; pool_size],
            ..Default::default()
        }
    }

    fn intern(&mut self, key: String) -> GroupId {
        if let Some(&id) = self.keys.get(&key) {
            return id;
        }

        let id = GroupId(self.buckets.len() as u32);
        self.buckets.push(AffinityBucket {
            group_id: id,
            members: Vec::new(),
        });
        self.keys.insert(key, id);
        id
    }

    /// Number of distinct groups observed
    pub fn group_count(&self) -> usize {
        self.buckets.len()
    }

    /// Number of competitors indexed
    pub fn competitor_count(&self) -> usize {
        self.memberships.len()
    }

    /// Group of a competitor, `None` when it has no key
    pub fn group_of(&self, slot: SlotId) -> Option<GroupId> {
        self.memberships.get(slot.index()).copied().flatten()
    }

    /// Size of the bucket the competitor belongs to, 0 when ungrouped
    pub fn bucket_size_of(&self, slot: SlotId) -> usize {
        self.group_of(slot)
            .and_then(|g| self.bucket(g))
            .map_or(0, AffinityBucket::len)
    }

    pub fn bucket(&self, group: GroupId) -> Option<&AffinityBucket> {
        self.buckets.get(group.0 as usize)
    }

    pub fn buckets(&self) -> &[AffinityBucket] {
        &self.buckets
    }

    /// Look up the id handed out for a key
    pub fn group_id(&self, key: &str) -> Option<GroupId> {
        self.keys.get(key).copied()
    }

    /// True when the grouping cannot constrain the order
    ///
    /// No group, a single group shared by everyone, or one group per
    /// competitor all leave nothing to separate.
    pub fn is_degenerate(&self) -> bool {
        let groups = self.group_count();
        groups == 0 || groups == 1 || groups == self.competitor_count()
    }
}
