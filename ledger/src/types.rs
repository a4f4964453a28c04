//! Core types for the contract payment ledger.
//!
//! A [`Contract`] owns its ordered set of [`Payment`]s; the advance is
//! conceptually payment zero and lives on the contract itself. Lifecycle
//! state is an explicit enum rather than scattered string checks.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

#[cfg(feature = "typescript")]
use ts_rs::TS;

use crate::approval::ApprovalGate;

/// Unique contract identifier.
pub type ContractId = String;

/// Unique payment identifier.
pub type PaymentId = String;

/// Opaque reference to supporting evidence (file id or URL).
///
/// Evidence lists are append-only from the core's perspective; removal
/// is not a defined operation.
pub type EvidenceRef = String;

/// Lifecycle state of a contract.
///
/// Transitions are monotonic in the forward direction with exactly one
/// backward edge, `Retention` -> `Terminated`, used to correct a mistaken
/// termination confirmation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
#[serde(rename_all = "snake_case")]
pub enum ContractState {
    /// Payments still being collected
    Active,
    /// Remaining balance has reached zero
    Closed,
    /// Termination confirmed; transient on the way in (entry immediately
    /// forwards to `Retention`), a resting state only after a reversal
    Terminated,
    /// Guarantee retention period running
    Retention,
    /// Retained amount collected, contract fully settled
    Released,
}

impl ContractState {
    /// Get string representation, matching the serde encoding.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Closed => "closed",
            Self::Terminated => "terminated",
            Self::Retention => "retention",
            Self::Released => "released",
        }
    }

    /// Check whether termination has been confirmed (and not reverted).
    pub fn is_terminated(&self) -> bool {
        matches!(self, Self::Terminated | Self::Retention | Self::Released)
    }
}

impl Default for ContractState {
    fn default() -> Self {
        Self::Active
    }
}

impl std::fmt::Display for ContractState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Category of an estimation payment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
#[serde(rename_all = "snake_case")]
pub enum PaymentCategory {
    /// Ordinary incremental payment against contract progress
    Partial,
    /// Final settlement payment, carries the purchase-order-received flag
    Settlement,
}

/// Review status of a payment.
///
/// Informational only: the ledger folds every payment into its totals
/// regardless of status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    /// Recorded but not yet reviewed
    Pending,
    /// Reviewed and approved
    Approved,
    /// Funds confirmed received
    Paid,
}

impl Default for PaymentStatus {
    fn default() -> Self {
        Self::Pending
    }
}

/// An estimation payment made against a contract.
///
/// Immutable once created from the ledger's point of view; edits replace
/// the record wholesale through the lifecycle engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
pub struct Payment {
    /// Unique payment ID
    pub id: PaymentId,
    /// Owning contract (back-reference, not ownership)
    pub contract_id: ContractId,
    /// Human-facing sequence label, e.g. "EST-03"
    pub number: String,
    /// Amount received; must be strictly positive
    pub amount: f64,
    /// Date the payment was made
    pub date: NaiveDate,
    /// Partial or settlement
    pub category: PaymentCategory,
    /// Free-form description
    pub description: String,
    /// Review status
    pub status: PaymentStatus,
    /// Supporting evidence references
    pub evidence: Vec<EvidenceRef>,
    /// Purchase order received; meaningful only for settlement payments
    pub purchase_order_received: bool,
}

impl Payment {
    /// Create a new payment against a contract.
    pub fn new(
        contract_id: impl Into<ContractId>,
        amount: f64,
        date: NaiveDate,
        category: PaymentCategory,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            contract_id: contract_id.into(),
            number: String::new(),
            amount,
            date,
            category,
            description: String::new(),
            status: PaymentStatus::default(),
            evidence: Vec::new(),
            purchase_order_received: false,
        }
    }

    /// Set the sequence label.
    pub fn with_number(mut self, number: impl Into<String>) -> Self {
        self.number = number.into();
        self
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Attach an evidence reference.
    pub fn with_evidence(mut self, evidence: impl Into<EvidenceRef>) -> Self {
        self.evidence.push(evidence.into());
        self
    }

    /// Mark the settlement purchase order as received.
    pub fn with_purchase_order_received(mut self, received: bool) -> Self {
        self.purchase_order_received = received;
        self
    }
}

/// A construction contract and its owned payment history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
pub struct Contract {
    /// Unique contract ID
    pub id: ContractId,
    /// Project name
    pub name: String,
    /// Client name
    pub client: String,
    /// Contract value before tax
    pub base_amount: f64,
    /// Contract value including tax; `base_amount * (1 + tax rate)`.
    /// The tax amount itself is always derived, never stored.
    pub total_amount: f64,
    /// Initial advance, payment zero of the ledger
    pub advance_amount: f64,
    /// Date the advance was paid
    pub advance_date: Option<NaiveDate>,
    /// Evidence for the advance
    pub advance_evidence: Vec<EvidenceRef>,
    /// Contract start date
    pub start_date: NaiveDate,
    /// Estimated completion date
    pub estimated_end_date: NaiveDate,
    /// Stamped on termination confirmation with the user-supplied date,
    /// cleared again on reversal
    pub actual_termination_date: Option<NaiveDate>,
    /// Current lifecycle state
    pub state: ContractState,
    /// User switch arming the termination workflow
    pub termination_flow_active: bool,
    /// Set once the retained guarantee amount has been collected
    pub retention_collected: bool,
    /// Construction-side and budget-control-side approval signals
    pub approvals: ApprovalGate,
    /// Owned payments; display order is payment date, tie-broken by id
    pub payments: Vec<Payment>,
    /// When the contract record was created
    pub created_at: DateTime<Utc>,
}

impl Contract {
    /// Create a new contract in state `Active` with no payments.
    ///
    /// `total_amount` is the tax-inclusive value; the lifecycle engine
    /// derives it from the base amount at the configured tax rate.
    pub fn new(
        name: impl Into<String>,
        client: impl Into<String>,
        base_amount: f64,
        total_amount: f64,
        start_date: NaiveDate,
        estimated_end_date: NaiveDate,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name: name.into(),
            client: client.into(),
            base_amount,
            total_amount,
            advance_amount: 0.0,
            advance_date: None,
            advance_evidence: Vec::new(),
            start_date,
            estimated_end_date,
            actual_termination_date: None,
            state: ContractState::Active,
            termination_flow_active: false,
            retention_collected: false,
            approvals: ApprovalGate::new(),
            payments: Vec::new(),
            created_at: Utc::now(),
        }
    }

    /// Set the advance payment.
    pub fn with_advance(mut self, amount: f64, date: NaiveDate) -> Self {
        self.advance_amount = amount;
        self.advance_date = Some(date);
        self
    }

    /// Derived tax amount at the contract's rate.
    pub fn tax_amount(&self) -> f64 {
        self.total_amount - self.base_amount
    }
}

/// Error types for ledger and lifecycle operations.
///
/// All of these are business-rule rejections recovered at the operation
/// boundary; none are fatal and none warrant retries.
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    /// Payment amount must be strictly positive
    #[error("invalid payment amount {amount}: must be greater than zero")]
    InvalidAmount { amount: f64 },

    /// Termination attempted below the payment-completeness threshold
    #[error("termination not eligible: received ratio {ratio:.4} is below threshold {threshold:.2}")]
    NotEligible { ratio: f64, threshold: f64 },

    /// Termination confirmed without a complete checklist
    #[error(
        "termination checklist incomplete: purchase order received={purchase_order_received}, \
         letter signed={letter_signed}, termination date set={has_termination_date}"
    )]
    IncompleteChecklist {
        purchase_order_received: bool,
        letter_signed: bool,
        has_termination_date: bool,
    },

    /// Attempted a transition the state machine does not allow
    #[error("invalid state transition from {from} to {to}")]
    InvalidStateTransition { from: ContractState, to: ContractState },

    /// Referenced payment does not exist on the contract
    #[error("payment {id} not found on contract {contract_id}")]
    PaymentNotFound { id: PaymentId, contract_id: ContractId },
}

pub type Result<T> = std::result::Result<T, LedgerError>;

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_new_contract_is_active() {
        let contract = Contract::new(
            "Torre Norte",
            "Constructora del Valle",
            100_000.0,
            116_000.0,
            date(2023, 1, 10),
            date(2023, 12, 20),
        );
        assert_eq!(contract.state, ContractState::Active);
        assert!(contract.payments.is_empty());
        assert!(contract.actual_termination_date.is_none());
        assert!(!contract.retention_collected);
    }

    #[test]
    fn test_tax_amount_is_derived() {
        let contract = Contract::new(
            "Bodega",
            "Cliente",
            100_000.0,
            116_000.0,
            date(2023, 1, 1),
            date(2023, 6, 1),
        );
        assert!((contract.tax_amount() - 16_000.0).abs() < 1e-9);
    }

    #[test]
    fn test_state_is_terminated() {
        assert!(!ContractState::Active.is_terminated());
        assert!(!ContractState::Closed.is_terminated());
        assert!(ContractState::Terminated.is_terminated());
        assert!(ContractState::Retention.is_terminated());
        assert!(ContractState::Released.is_terminated());
    }

    #[test]
    fn test_state_serde_encoding() {
        let json = serde_json::to_string(&ContractState::Retention).unwrap();
        assert_eq!(json, "\"retention\"");
        assert_eq!(ContractState::Retention.as_str(), "retention");
    }

    #[test]
    fn test_payment_builder() {
        let payment = Payment::new("c-1", 5_000.0, date(2023, 3, 1), PaymentCategory::Settlement)
            .with_number("EST-01")
            .with_description("liquidación final")
            .with_evidence("files/oc-final.pdf")
            .with_purchase_order_received(true);
        assert_eq!(payment.number, "EST-01");
        assert_eq!(payment.status, PaymentStatus::Pending);
        assert!(payment.purchase_order_received);
        assert_eq!(payment.evidence.len(), 1);
    }
}
