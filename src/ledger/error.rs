use thiserror::Error;

/// Reasons the ledger refuses a mutation. A refused call never changes any state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    #[error("Caller is not the operator")]
    Unauthorized,
    #[error("Jurisdictions must have at least 1 seat")]
    InvalidSeatCount,
    #[error("There cannot be a tie")]
    TiedResult,
    #[error("Jurisdiction name must not be empty")]
    EmptyJurisdictionName,
    #[error("Result for {0} was already submitted")]
    DuplicateJurisdiction(String),
    #[error("The election has already ended")]
    ElectionClosed,
}

impl LedgerError {
    /// A stable machine-readable name for this error.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Unauthorized => "unauthorized",
            Self::InvalidSeatCount => "invalid_seat_count",
            Self::TiedResult => "tied_result",
            Self::EmptyJurisdictionName => "empty_jurisdiction_name",
            Self::DuplicateJurisdiction(_) => "duplicate_jurisdiction",
            Self::ElectionClosed => "election_closed",
        }
    }
}
