use serde::{Deserialize, Serialize};

use super::Candidate;

/// The reported outcome of a single seat-weighted jurisdiction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JurisdictionResult {
    /// Unique name of the jurisdiction.
    pub name: String,
    pub votes_a: u64,
    pub votes_b: u64,
    /// Seats awarded to whichever candidate wins this jurisdiction.
    pub seats: u32,
}

impl JurisdictionResult {
    pub fn new(name: impl Into<String>, votes_a: u64, votes_b: u64, seats: u32) -> Self {
        Self {
            name: name.into(),
            votes_a,
            votes_b,
            seats,
        }
    }

    /// The local winner of this jurisdiction, or [`Candidate::Nobody`] for a tie.
    ///
    /// Ties are never accepted by the ledger, so an accepted result always has a winner.
    pub fn winner(&self) -> Candidate {
        match self.votes_a.cmp(&self.votes_b) {
            std::cmp::Ordering::Greater => Candidate::CandidateA,
            std::cmp::Ordering::Less => Candidate::CandidateB,
            std::cmp::Ordering::Equal => Candidate::Nobody,
        }
    }
}
