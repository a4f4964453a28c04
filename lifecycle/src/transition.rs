//! Lifecycle state machine.
//!
//! The five states and their legal edges live in one place: an automatic
//! edge evaluated after every payment mutation, and a single [`apply`]
//! function for the user-confirmed edges. Transitions are monotonic
//! forward with one backward edge, `Retention` -> `Terminated`, used to
//! correct a mistaken termination confirmation.
//!
//! The automatic edge never runs backwards: a contract that re-gains a
//! positive balance (say, after a payment is deleted) stays `Closed`.

use chrono::NaiveDate;
use tracing::{debug, info};

use contract_ledger::{compute_ledger, Contract, ContractState, LedgerError, Result};

/// A user-confirmed lifecycle action.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LifecycleAction {
    /// Confirm termination, stamping the user-supplied date (not "now").
    /// Entry into the guarantee period is part of the same transaction.
    ConfirmTermination { date: NaiveDate },
    /// Undo a mistaken termination confirmation
    RevertTermination,
    /// Release the contract once the retained amount has been collected
    Release,
}

impl LifecycleAction {
    /// The state this action lands in when legal, for error reporting.
    fn target(&self) -> ContractState {
        match self {
            Self::ConfirmTermination { .. } => ContractState::Retention,
            Self::RevertTermination => ContractState::Terminated,
            Self::Release => ContractState::Released,
        }
    }
}

/// Evaluate the automatic `Active` -> `Closed` edge.
///
/// Fires iff the remaining balance is zero or negative while the
/// contract is `Active`; every other state passes through unchanged.
/// Must be re-run after each payment insertion, edit, or deletion,
/// against the post-mutation payment set.
pub fn evaluate_auto_transition(contract: &Contract) -> ContractState {
    if contract.state == ContractState::Active {
        let summary = compute_ledger(contract);
        if summary.remaining_balance <= 0.0 {
            debug!(
                contract_id = %contract.id,
                remaining_balance = summary.remaining_balance,
                "remaining balance reached zero"
            );
            return ContractState::Closed;
        }
    }
    contract.state
}

/// Apply a user-confirmed action, mutating the contract on success.
///
/// Any (state, action) pair outside the legal edges is rejected with
/// [`LedgerError::InvalidStateTransition`] naming both states.
pub fn apply(contract: &mut Contract, action: LifecycleAction) -> Result<ContractState> {
    let from = contract.state;
    match (from, action) {
        // Termination confirmation immediately enters the guarantee
        // period; `Terminated` as a source covers re-attempts after a
        // reversal.
        (
            ContractState::Active | ContractState::Closed | ContractState::Terminated,
            LifecycleAction::ConfirmTermination { date },
        ) => {
            contract.actual_termination_date = Some(date);
            contract.state = ContractState::Retention;
            info!(
                contract_id = %contract.id,
                from = %from,
                termination_date = %date,
                "termination confirmed, guarantee period started"
            );
            Ok(contract.state)
        }
        (ContractState::Retention, LifecycleAction::RevertTermination) => {
            contract.actual_termination_date = None;
            contract.retention_collected = false;
            contract.state = ContractState::Terminated;
            info!(contract_id = %contract.id, "termination reverted, retention data discarded");
            Ok(contract.state)
        }
        (ContractState::Retention, LifecycleAction::Release) => {
            // Release is only legal once collection has been confirmed;
            // crossing the eligibility date alone never releases.
            if !contract.retention_collected {
                return Err(LedgerError::InvalidStateTransition {
                    from,
                    to: ContractState::Released,
                });
            }
            contract.state = ContractState::Released;
            info!(contract_id = %contract.id, "retained amount collected, contract released");
            Ok(contract.state)
        }
        (from, action) => Err(LedgerError::InvalidStateTransition {
            from,
            to: action.target(),
        }),
    }
}
