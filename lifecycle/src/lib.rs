//! Contract Lifecycle - state machine and closing workflows.
//!
//! Drives a contract from collection through termination and the
//! guarantee retention period:
//!
//! - **State machine**: explicit states and a single transition function
//! - **Termination workflow**: 98% payment gate plus a signed checklist
//! - **Retention workflow**: 2% holdback released 365 days after termination
//! - **Engine facade**: the atomic per-contract operations the storage
//!   and UI collaborators call
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      LifecycleEngine                        │
//! │                                                             │
//! │  ┌──────────┐   ┌────────────┐   ┌─────────────────────┐   │
//! │  │  Ledger  │──▶│ Transition │──▶│ Termination/        │   │
//! │  │  figures │   │  function  │   │ Retention workflows │   │
//! │  └──────────┘   └────────────┘   └─────────────────────┘   │
//! │        │                                                    │
//! │  ┌─────▼──────┐                                             │
//! │  │ Approvals  │  (informational, never gates transitions)   │
//! │  └────────────┘                                             │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every operation is synchronous, request-scoped computation over a
//! single contract; serializing concurrent mutations to the same
//! contract is the storage collaborator's job.

pub mod config;
pub mod engine;
pub mod retention;
pub mod termination;
pub mod transition;

// Re-export main types
pub use config::LifecycleConfig;
pub use engine::LifecycleEngine;
pub use retention::RetentionSummary;
pub use termination::TerminationChecklist;
pub use transition::LifecycleAction;
