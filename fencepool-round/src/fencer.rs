//! Roster entries

use serde::{Deserialize, Serialize};

/// A checked-in fencer
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fencer {
    pub name: String,
    #[serde(default)]
    pub club: Option<String>,
    #[serde(default)]
    pub nation: Option<String>,
    /// Seeding rank, 1 = top seed
    #[serde(default)]
    pub rank: Option<u32>,
}

impl Fencer {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            club: None,
            nation: None,
            rank: None,
        }
    }

    pub fn with_club(mut self, club: impl Into<String>) -> Self {
        self.club = Some(club.into());
        self
    }

    pub fn with_nation(mut self, nation: impl Into<String>) -> Self {
        self.nation = Some(nation.into());
        self
    }

    pub fn with_rank(mut self, rank: u32) -> Self {
        self.rank = Some(rank);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roster_entry_from_json() {
        let fencer: Fencer = serde_json::from_str(r#"{"name": "Ana", "club": "MADRID"}"#).unwrap();
        assert_eq!(fencer, Fencer::new("Ana").with_club("MADRID"));

        let fencer: Fencer =
            serde_json::from_str(r#"{"name": "Bo", "nation": "SWE", "rank": 3}"#).unwrap();
        assert_eq!(fencer.rank, Some(3));
        assert_eq!(fencer.club, None);
    }
}
