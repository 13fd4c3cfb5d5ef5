use std::fmt::Display;

use serde_repr::{Deserialize_repr, Serialize_repr};

/// The possible leaders of the election.
///
/// Serialised as a small integer code: 0 for nobody, 1 and 2 for the candidates.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash, Serialize_repr, Deserialize_repr)]
#[repr(u8)]
pub enum Candidate {
    /// Nobody is leading. Never a valid winner of a single jurisdiction.
    #[default]
    Nobody = 0,
    CandidateA = 1,
    CandidateB = 2,
}

impl Display for Candidate {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            formatter,
            "{}",
            match self {
                Self::Nobody => "nobody",
                Self::CandidateA => "candidate A",
                Self::CandidateB => "candidate B",
            }
        )
    }
}
