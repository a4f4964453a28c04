//! Termination workflow.
//!
//! Becomes available once received payments cover the configured share
//! of the tax-inclusive total (98% by default), evaluated continuously
//! on the unrounded ratio and independent of the current state. The
//! user arms the flow explicitly, completes a checklist, and only then
//! may confirm termination with a date of their choosing.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use contract_ledger::{received_ratio, Contract, ContractState, LedgerError, Result};

use crate::transition::{self, LifecycleAction};

/// Checklist required before termination can be confirmed.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct TerminationChecklist {
    /// Purchase order for the settlement payment has been received
    pub purchase_order_received: bool,
    /// Signed termination letter is on file
    pub letter_signed: bool,
    /// Termination date supplied by the user alongside the signed letter;
    /// this is the date that becomes `actual_termination_date`
    pub termination_date: Option<NaiveDate>,
}

impl TerminationChecklist {
    /// Whether every checklist item is satisfied.
    pub fn is_complete(&self) -> bool {
        self.purchase_order_received && self.letter_signed && self.termination_date.is_some()
    }
}

/// Whether the termination workflow may be activated for this contract.
pub fn can_activate(contract: &Contract, threshold: f64) -> bool {
    received_ratio(contract) >= threshold
}

/// Arm the termination workflow.
///
/// Rejected with [`LedgerError::NotEligible`] below the payment gate.
pub fn activate(contract: &mut Contract, threshold: f64) -> Result<()> {
    let ratio = received_ratio(contract);
    if ratio < threshold {
        warn!(
            contract_id = %contract.id,
            ratio,
            threshold,
            "termination activation below payment gate"
        );
        return Err(LedgerError::NotEligible { ratio, threshold });
    }
    contract.termination_flow_active = true;
    info!(contract_id = %contract.id, ratio, "termination workflow armed");
    Ok(())
}

/// Confirm termination.
///
/// Requires the armed flow, the payment gate, and a complete checklist;
/// on success applies the combined `-> Terminated -> Retention` edge and
/// stamps the checklist's termination date.
pub fn confirm(
    contract: &mut Contract,
    checklist: &TerminationChecklist,
    threshold: f64,
) -> Result<ContractState> {
    let ratio = received_ratio(contract);
    if !contract.termination_flow_active || ratio < threshold {
        return Err(LedgerError::NotEligible { ratio, threshold });
    }

    let date = match checklist.termination_date {
        Some(date) if checklist.purchase_order_received && checklist.letter_signed => date,
        _ => {
            warn!(
                contract_id = %contract.id,
                purchase_order_received = checklist.purchase_order_received,
                letter_signed = checklist.letter_signed,
                "termination confirmation with incomplete checklist"
            );
            return Err(LedgerError::IncompleteChecklist {
                purchase_order_received: checklist.purchase_order_received,
                letter_signed: checklist.letter_signed,
                has_termination_date: checklist.termination_date.is_some(),
            });
        }
    };

    transition::apply(contract, LifecycleAction::ConfirmTermination { date })
}
