//! Engine facade: the atomic per-contract operations.
//!
//! Each method is a single read-compute-mutate unit over one contract;
//! callers persist the contract (and its payments) together afterwards.
//! The engine holds only configuration, no contract state.

use chrono::NaiveDate;
use tracing::{debug, info};

use contract_ledger::{
    compute_ledger, total_with_tax, Contract, ContractState, DocumentStatus, EvidenceRef,
    LedgerError, LedgerSummary, Payment, PaymentId, Result,
};

use crate::config::LifecycleConfig;
use crate::retention::{self, RetentionSummary};
use crate::termination::{self, TerminationChecklist};
use crate::transition::{self, LifecycleAction};

/// Stateless facade over the ledger, state machine, and workflows.
pub struct LifecycleEngine {
    config: LifecycleConfig,
}

impl LifecycleEngine {
    /// Create an engine with the default rates.
    pub fn new() -> Self {
        Self::with_config(LifecycleConfig::default())
    }

    /// Create with custom configuration.
    pub fn with_config(config: LifecycleConfig) -> Self {
        Self { config }
    }

    /// Current configuration.
    pub fn config(&self) -> &LifecycleConfig {
        &self.config
    }

    /// Create a new active contract, deriving the tax-inclusive total
    /// from the base amount at the configured rate.
    pub fn new_contract(
        &self,
        name: impl Into<String>,
        client: impl Into<String>,
        base_amount: f64,
        start_date: NaiveDate,
        estimated_end_date: NaiveDate,
    ) -> Contract {
        let total_amount = total_with_tax(base_amount, self.config.tax.rate);
        let contract = Contract::new(
            name,
            client,
            base_amount,
            total_amount,
            start_date,
            estimated_end_date,
        );
        info!(contract_id = %contract.id, total_amount, "contract created");
        contract
    }

    /// Fold the contract's payments into its aggregate figures.
    pub fn compute_ledger(&self, contract: &Contract) -> LedgerSummary {
        compute_ledger(contract)
    }

    /// Apply the automatic `Active` -> `Closed` edge in place.
    ///
    /// Returns the (possibly unchanged) state.
    pub fn evaluate_auto_transition(&self, contract: &mut Contract) -> ContractState {
        let next = transition::evaluate_auto_transition(contract);
        if next != contract.state {
            info!(
                contract_id = %contract.id,
                from = %contract.state,
                to = %next,
                "automatic transition"
            );
            contract.state = next;
        }
        contract.state
    }

    // --- Payment mutations ------------------------------------------------

    /// Record a payment, assigning its sequence label, then re-evaluate
    /// the automatic transition on the post-mutation payment set.
    pub fn add_payment(&self, contract: &mut Contract, payment: Payment) -> Result<PaymentId> {
        Self::validate_amount(payment.amount)?;
        let payment = if payment.number.is_empty() {
            payment.with_number(format!("EST-{:02}", Self::next_sequence_number(contract)))
        } else {
            payment
        };
        let id = payment.id.clone();
        debug!(
            contract_id = %contract.id,
            payment_id = %id,
            amount = payment.amount,
            category = ?payment.category,
            "payment recorded"
        );
        contract.payments.push(payment);
        self.evaluate_auto_transition(contract);
        Ok(id)
    }

    /// Replace an existing payment wholesale, matched by id, then
    /// re-evaluate the automatic transition.
    pub fn update_payment(&self, contract: &mut Contract, updated: Payment) -> Result<()> {
        Self::validate_amount(updated.amount)?;
        let slot = contract
            .payments
            .iter_mut()
            .find(|p| p.id == updated.id)
            .ok_or_else(|| LedgerError::PaymentNotFound {
                id: updated.id.clone(),
                contract_id: contract.id.clone(),
            })?;
        *slot = updated;
        self.evaluate_auto_transition(contract);
        Ok(())
    }

    /// Remove a payment by id, then re-evaluate the automatic transition.
    ///
    /// Removal can make the remaining balance positive again; the state
    /// machine deliberately never walks `Closed` back to `Active`.
    pub fn remove_payment(&self, contract: &mut Contract, payment_id: &str) -> Result<Payment> {
        let index = contract
            .payments
            .iter()
            .position(|p| p.id == payment_id)
            .ok_or_else(|| LedgerError::PaymentNotFound {
                id: payment_id.to_string(),
                contract_id: contract.id.clone(),
            })?;
        let removed = contract.payments.remove(index);
        debug!(contract_id = %contract.id, payment_id, "payment removed");
        self.evaluate_auto_transition(contract);
        Ok(removed)
    }

    // --- Termination workflow ---------------------------------------------

    /// Whether the termination workflow may be activated (98% gate).
    pub fn can_activate_termination(&self, contract: &Contract) -> bool {
        termination::can_activate(contract, self.config.termination.threshold)
    }

    /// Arm the termination workflow.
    pub fn activate_termination(&self, contract: &mut Contract) -> Result<()> {
        termination::activate(contract, self.config.termination.threshold)
    }

    /// Confirm termination against the checklist; lands in `Retention`
    /// with the checklist's date stamped.
    pub fn confirm_termination(
        &self,
        contract: &mut Contract,
        checklist: &TerminationChecklist,
    ) -> Result<ContractState> {
        termination::confirm(contract, checklist, self.config.termination.threshold)
    }

    /// Undo a mistaken termination confirmation, discarding retention
    /// data. The flow stays armed so termination can be reattempted.
    pub fn revert_termination(&self, contract: &mut Contract) -> Result<ContractState> {
        transition::apply(contract, LifecycleAction::RevertTermination)
    }

    // --- Guarantee retention workflow -------------------------------------

    /// Derived holdback amount and release eligibility date.
    pub fn compute_retention(&self, contract: &Contract) -> Result<RetentionSummary> {
        retention::compute(
            contract,
            self.config.retention.rate,
            self.config.retention.period_days,
        )
    }

    /// Confirm the retained amount has been collected.
    pub fn confirm_retention_collected(&self, contract: &mut Contract) -> Result<()> {
        retention::confirm_collected(contract)
    }

    /// Release the contract once collection has been confirmed.
    pub fn release_retention(&self, contract: &mut Contract) -> Result<ContractState> {
        transition::apply(contract, LifecycleAction::Release)
    }

    // --- Approval gate ----------------------------------------------------

    /// Set the construction-side approval flag.
    pub fn set_construction_approved(&self, contract: &mut Contract, approved: bool) {
        contract.approvals.construction.approved = approved;
        debug!(contract_id = %contract.id, approved, "construction approval updated");
    }

    /// Set the budget-control approval flag.
    pub fn set_budget_control_approved(&self, contract: &mut Contract, approved: bool) {
        contract.approvals.budget_control.approved = approved;
        debug!(contract_id = %contract.id, approved, "budget control approval updated");
    }

    /// Append evidence to the construction-side signal.
    pub fn add_construction_evidence(
        &self,
        contract: &mut Contract,
        evidence: impl Into<EvidenceRef>,
    ) {
        contract.approvals.construction.add_evidence(evidence);
    }

    /// Append evidence to the budget-control signal.
    pub fn add_budget_control_evidence(
        &self,
        contract: &mut Contract,
        evidence: impl Into<EvidenceRef>,
    ) {
        contract.approvals.budget_control.add_evidence(evidence);
    }

    /// Update a tracked approval document on the construction signal.
    pub fn set_construction_document_status(
        &self,
        contract: &mut Contract,
        document_id: &str,
        status: DocumentStatus,
    ) -> bool {
        contract
            .approvals
            .construction
            .set_document_status(document_id, status)
    }

    /// Update a tracked approval document on the budget-control signal.
    pub fn set_budget_control_document_status(
        &self,
        contract: &mut Contract,
        document_id: &str,
        status: DocumentStatus,
    ) -> bool {
        contract
            .approvals
            .budget_control
            .set_document_status(document_id, status)
    }

    fn validate_amount(amount: f64) -> Result<()> {
        if amount <= 0.0 {
            return Err(LedgerError::InvalidAmount { amount });
        }
        Ok(())
    }

    /// Next free sequence number, one past the highest label already
    /// assigned so removals never cause a label to be reused.
    fn next_sequence_number(contract: &Contract) -> u32 {
        contract
            .payments
            .iter()
            .filter_map(|p| p.number.strip_prefix("EST-"))
            .filter_map(|n| n.parse::<u32>().ok())
            .max()
            .unwrap_or(0)
            + 1
    }
}

impl Default for LifecycleEngine {
    fn default() -> Self {
        Self::new()
    }
}
