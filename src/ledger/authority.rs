use crate::model::mongodb::Id;

use super::LedgerError;

/// Decides which callers may mutate the ledger.
pub trait Authority {
    /// Is the given caller the current operator?
    fn is_operator(&self, caller: &Id) -> bool;

    /// Reject the caller unless they are the operator.
    fn ensure_operator(&self, caller: &Id) -> Result<(), LedgerError> {
        if self.is_operator(caller) {
            Ok(())
        } else {
            Err(LedgerError::Unauthorized)
        }
    }
}

/// Single-owner authority: exactly one operator, who may hand the role on or give it up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ownership {
    operator: Option<Id>,
}

impl Ownership {
    pub fn new(operator: Id) -> Self {
        Self {
            operator: Some(operator),
        }
    }

    /// Rebuild from stored state, where `None` means the role was renounced.
    pub fn restore(operator: Option<Id>) -> Self {
        Self { operator }
    }

    /// The current operator, if the role has not been renounced.
    pub fn operator(&self) -> Option<Id> {
        self.operator
    }

    /// Hand the operator role to `new_operator`.
    pub fn transfer(&mut self, caller: &Id, new_operator: Id) -> Result<(), LedgerError> {
        self.ensure_operator(caller)?;
        self.operator = Some(new_operator);
        Ok(())
    }

    /// Give up the operator role permanently. Nobody can mutate the ledger afterwards.
    pub fn renounce(&mut self, caller: &Id) -> Result<(), LedgerError> {
        self.ensure_operator(caller)?;
        self.operator = None;
        Ok(())
    }
}

impl Authority for Ownership {
    fn is_operator(&self, caller: &Id) -> bool {
        self.operator.as_ref() == Some(caller)
    }
}
