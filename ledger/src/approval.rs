//! Approval gate: two independent sign-off signals with evidence.
//!
//! The construction side and the budget-control side each carry a boolean
//! flag, an append-only evidence list, and optionally a set of tracked
//! documents with individual review statuses. The signals are surfaced
//! alongside the lifecycle state but never consulted by it; the boolean
//! flag remains authoritative for each gate.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[cfg(feature = "typescript")]
use ts_rs::TS;

use crate::types::EvidenceRef;

/// Review status of a single tracked approval document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
#[serde(rename_all = "snake_case")]
pub enum DocumentStatus {
    /// Required but not yet provided
    Pending,
    /// File provided, awaiting review
    Uploaded,
    /// Reviewed and accepted
    Approved,
    /// Reviewed and rejected; must be re-uploaded
    Rejected,
}

/// A named document tracked within an approval signal,
/// e.g. "Catálogo de Conceptos" or "Carátula de Contrato Firmada".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
pub struct ApprovalDocument {
    /// Stable document identifier, e.g. "doc_catalogo_conceptos"
    pub id: String,
    /// Human-readable name
    pub name: String,
    /// Current review status
    pub status: DocumentStatus,
    /// When the file was uploaded
    pub uploaded_at: Option<DateTime<Utc>>,
    /// When the document was approved
    pub approved_at: Option<DateTime<Utc>>,
}

impl ApprovalDocument {
    /// Create a pending document requirement.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            status: DocumentStatus::Pending,
            uploaded_at: None,
            approved_at: None,
        }
    }
}

/// One side's sign-off: a flag plus supporting evidence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
pub struct ApprovalSignal {
    /// Whether this side has signed off
    pub approved: bool,
    /// Supporting evidence references, append-only
    pub evidence: Vec<EvidenceRef>,
    /// Tracked documents, if this signal uses per-document review
    pub documents: Vec<ApprovalDocument>,
}

impl ApprovalSignal {
    /// Create an unapproved signal with no evidence.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an evidence reference.
    pub fn add_evidence(&mut self, evidence: impl Into<EvidenceRef>) {
        self.evidence.push(evidence.into());
    }

    /// Add a document requirement to this signal.
    pub fn track_document(&mut self, id: impl Into<String>, name: impl Into<String>) {
        self.documents.push(ApprovalDocument::new(id, name));
    }

    /// Update the status of a tracked document.
    ///
    /// Stamps the upload/approval timestamp for the matching status.
    /// Returns `false` when no document with that id is tracked.
    pub fn set_document_status(&mut self, id: &str, status: DocumentStatus) -> bool {
        match self.documents.iter_mut().find(|d| d.id == id) {
            Some(doc) => {
                doc.status = status;
                match status {
                    DocumentStatus::Uploaded => doc.uploaded_at = Some(Utc::now()),
                    DocumentStatus::Approved => doc.approved_at = Some(Utc::now()),
                    _ => {}
                }
                true
            }
            None => false,
        }
    }

    /// Whether every tracked document has been approved.
    ///
    /// `false` when no documents are tracked; the plain `approved` flag
    /// is the authoritative signal either way.
    pub fn documents_complete(&self) -> bool {
        !self.documents.is_empty()
            && self.documents.iter().all(|d| d.status == DocumentStatus::Approved)
    }
}

/// The two independent approval signals carried by a contract.
///
/// Informational/advisory: no lifecycle transition depends on them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
pub struct ApprovalGate {
    /// Construction-side documentation sign-off
    pub construction: ApprovalSignal,
    /// Budget-control sign-off
    pub budget_control: ApprovalSignal,
}

impl ApprovalGate {
    /// Create a gate with both signals unapproved.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether both sides have signed off.
    pub fn fully_approved(&self) -> bool {
        self.construction.approved && self.budget_control.approved
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gate_starts_unapproved() {
        let gate = ApprovalGate::new();
        assert!(!gate.construction.approved);
        assert!(!gate.budget_control.approved);
        assert!(!gate.fully_approved());
    }

    #[test]
    fn test_fully_approved_requires_both() {
        let mut gate = ApprovalGate::new();
        gate.construction.approved = true;
        assert!(!gate.fully_approved());
        gate.budget_control.approved = true;
        assert!(gate.fully_approved());
    }

    #[test]
    fn test_evidence_is_append_only() {
        let mut signal = ApprovalSignal::new();
        signal.add_evidence("files/documentos_constructora.zip");
        signal.add_evidence("files/vobo_presupuestos.pdf");
        assert_eq!(signal.evidence.len(), 2);
    }

    #[test]
    fn test_document_tracking() {
        let mut signal = ApprovalSignal::new();
        signal.track_document("doc_catalogo", "Catálogo de Conceptos");
        signal.track_document("doc_caratula", "Carátula de Contrato Firmada");
        assert!(!signal.documents_complete());

        assert!(signal.set_document_status("doc_catalogo", DocumentStatus::Approved));
        assert!(!signal.documents_complete());

        assert!(signal.set_document_status("doc_caratula", DocumentStatus::Approved));
        assert!(signal.documents_complete());

        assert!(!signal.set_document_status("doc_missing", DocumentStatus::Uploaded));
    }

    #[test]
    fn test_no_documents_is_not_complete() {
        let signal = ApprovalSignal::new();
        assert!(!signal.documents_complete());
    }
}
