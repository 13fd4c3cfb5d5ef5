use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::model::mongodb::Id;

use super::{Authority, Candidate, JurisdictionResult, LedgerError, Ownership};

/// The running state of the election: accepted jurisdiction results, seat totals,
/// and whether the election has been closed.
///
/// All mutations are gated by the [`Authority`]; a rejected call leaves the
/// ledger exactly as it was.
#[derive(Debug, Clone)]
pub struct ElectionLedger<A = Ownership> {
    jurisdictions: BTreeMap<String, JurisdictionResult>,
    seats_a: u64,
    seats_b: u64,
    ended: bool,
    authority: A,
}

/// A summary of the running totals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tally {
    pub seats_a: u64,
    pub seats_b: u64,
    pub leader: Candidate,
    pub ended: bool,
    pub jurisdictions: usize,
}

impl<A> ElectionLedger<A>
where
    A: Authority,
{
    /// Create an empty election that is accepting submissions.
    pub fn new(authority: A) -> Self {
        Self {
            jurisdictions: BTreeMap::new(),
            seats_a: 0,
            seats_b: 0,
            ended: false,
            authority,
        }
    }

    /// Rebuild an election from previously accepted results, recomputing the totals.
    pub fn restore<I>(authority: A, results: I, ended: bool) -> Self
    where
        I: IntoIterator<Item = JurisdictionResult>,
    {
        let mut ledger = Self::new(authority);
        for result in results {
            ledger.record(result);
        }
        ledger.ended = ended;
        ledger
    }

    /// Check whether `caller` may submit `result`, without changing anything.
    pub fn check_submission(
        &self,
        caller: &Id,
        result: &JurisdictionResult,
    ) -> Result<(), LedgerError> {
        self.authority.ensure_operator(caller)?;
        if self.ended {
            return Err(LedgerError::ElectionClosed);
        }
        if result.name.is_empty() {
            return Err(LedgerError::EmptyJurisdictionName);
        }
        if result.seats < 1 {
            return Err(LedgerError::InvalidSeatCount);
        }
        if result.votes_a == result.votes_b {
            return Err(LedgerError::TiedResult);
        }
        if self.jurisdictions.contains_key(&result.name) {
            return Err(LedgerError::DuplicateJurisdiction(result.name.clone()));
        }
        Ok(())
    }

    /// Accept a jurisdiction result, crediting its seats to the local winner.
    pub fn submit_result(
        &mut self,
        caller: &Id,
        result: JurisdictionResult,
    ) -> Result<(), LedgerError> {
        self.check_submission(caller, &result)?;
        self.record(result);
        Ok(())
    }

    /// Stop accepting submissions. Closing an already closed election succeeds.
    pub fn close(&mut self, caller: &Id) -> Result<(), LedgerError> {
        self.authority.ensure_operator(caller)?;
        self.ended = true;
        Ok(())
    }

    // Callers must have validated the result first.
    fn record(&mut self, result: JurisdictionResult) {
        match result.winner() {
            Candidate::CandidateA => self.seats_a += u64::from(result.seats),
            Candidate::CandidateB => self.seats_b += u64::from(result.seats),
            Candidate::Nobody => {}
        }
        self.jurisdictions.insert(result.name.clone(), result);
    }
}

impl<A> ElectionLedger<A> {
    /// The candidate with strictly more seats, or [`Candidate::Nobody`] if level.
    pub fn current_leader(&self) -> Candidate {
        match self.seats_a.cmp(&self.seats_b) {
            std::cmp::Ordering::Greater => Candidate::CandidateA,
            std::cmp::Ordering::Less => Candidate::CandidateB,
            std::cmp::Ordering::Equal => Candidate::Nobody,
        }
    }

    pub fn election_ended(&self) -> bool {
        self.ended
    }

    /// Seats won so far by the given candidate.
    pub fn seats(&self, candidate: Candidate) -> u64 {
        match candidate {
            Candidate::Nobody => 0,
            Candidate::CandidateA => self.seats_a,
            Candidate::CandidateB => self.seats_b,
        }
    }

    pub fn result_submitted(&self, name: &str) -> bool {
        self.jurisdictions.contains_key(name)
    }

    pub fn result(&self, name: &str) -> Option<&JurisdictionResult> {
        self.jurisdictions.get(name)
    }

    /// All accepted results, ordered by jurisdiction name.
    pub fn results(&self) -> impl Iterator<Item = &JurisdictionResult> {
        self.jurisdictions.values()
    }

    pub fn tally(&self) -> Tally {
        Tally {
            seats_a: self.seats_a,
            seats_b: self.seats_b,
            leader: self.current_leader(),
            ended: self.ended,
            jurisdictions: self.jurisdictions.len(),
        }
    }

    /// Recompute the seat totals from scratch, as `(seats_a, seats_b)`.
    pub fn recount(&self) -> (u64, u64) {
        self.jurisdictions
            .values()
            .fold((0, 0), |(a, b), result| match result.winner() {
                Candidate::CandidateA => (a + u64::from(result.seats), b),
                Candidate::CandidateB => (a, b + u64::from(result.seats)),
                Candidate::Nobody => (a, b),
            })
    }

    pub fn authority(&self) -> &A {
        &self.authority
    }

    pub fn authority_mut(&mut self) -> &mut A {
        &mut self.authority
    }
}
