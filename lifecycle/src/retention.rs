//! Guarantee retention workflow.
//!
//! Starts automatically when a contract enters `Retention`. A share of
//! the tax-inclusive total (2% by default) is held back as a performance
//! guarantee and becomes releasable a fixed period (365 days) after the
//! stamped termination date. Both figures are derived on demand from the
//! termination date, so a reversal followed by a re-termination always
//! yields fresh values. Crossing the eligibility date never releases by
//! itself; a human confirms collection and then releases.

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::debug;

use contract_ledger::{Contract, ContractState, LedgerError, Result};

/// Derived guarantee retention figures.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RetentionSummary {
    /// Amount held back as guarantee
    pub retained_amount: f64,
    /// First date the holdback may be released
    pub release_eligibility_date: NaiveDate,
}

/// Compute the retained amount and release eligibility date.
///
/// Requires a stamped termination date; rejected otherwise, since the
/// guarantee period has not started.
pub fn compute(contract: &Contract, rate: f64, period_days: i64) -> Result<RetentionSummary> {
    let termination_date =
        contract
            .actual_termination_date
            .ok_or(LedgerError::InvalidStateTransition {
                from: contract.state,
                to: ContractState::Retention,
            })?;

    Ok(RetentionSummary {
        retained_amount: contract.total_amount * rate,
        release_eligibility_date: termination_date + Duration::days(period_days),
    })
}

/// Confirm that the retained amount has been collected.
///
/// A single flag flip with no further side effects; it enables, but
/// does not itself trigger, the transition to `Released`. Legal only
/// while the contract is in `Retention`.
pub fn confirm_collected(contract: &mut Contract) -> Result<()> {
    if contract.state != ContractState::Retention {
        return Err(LedgerError::InvalidStateTransition {
            from: contract.state,
            to: ContractState::Released,
        });
    }
    contract.retention_collected = true;
    debug!(contract_id = %contract.id, "retention collection confirmed");
    Ok(())
}
