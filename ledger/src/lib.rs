//! Contract Payment Ledger - domain types and pure ledger arithmetic.
//!
//! Models a construction contract through its financial lifecycle: a
//! tax-inclusive total, an initial advance ("payment zero"), incremental
//! estimation payments, and the derived figures the rest of the system
//! reacts to (received total, remaining balance, progress percent).
//!
//! Everything here is a plain value or a pure function. Persistence,
//! transport, and UI are external collaborators: they hand the core a
//! contract record plus its payments and get derived figures back.
//! Derived figures are always recomputed, never trusted from storage.
//!
//! With the `typescript` feature enabled, the domain types can be exported
//! to TypeScript using ts-rs for consistency with the frontend.

pub mod approval;
pub mod ledger;
pub mod types;

// Re-export main types
pub use approval::{ApprovalDocument, ApprovalGate, ApprovalSignal, DocumentStatus};
pub use ledger::{
    compute_ledger, ordered_payments, received_ratio, received_total, tax_amount, total_with_tax,
    LedgerSummary,
};
pub use types::*;
