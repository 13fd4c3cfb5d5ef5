//! The election ledger: validated, seat-weighted tallying of jurisdiction results.
//!
//! Everything in here is synchronous and free of I/O. Persistence and
//! serialisation of concurrent callers are handled by [`crate::service`].

mod authority;
mod candidate;
mod election;
mod error;
mod jurisdiction;

pub use authority::{Authority, Ownership};
pub use candidate::Candidate;
pub use election::{ElectionLedger, Tally};
pub use error::LedgerError;
pub use jurisdiction::JurisdictionResult;
