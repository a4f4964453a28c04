//! Pure ledger arithmetic over a contract and its payments.
//!
//! Every figure here is recomputed on demand from the contract record;
//! nothing is cached or trusted from storage. Display percentages are
//! rounded to the nearest integer, but threshold comparisons elsewhere
//! use the unrounded [`received_ratio`] so rounding can never trigger a
//! workflow early.

use serde::{Deserialize, Serialize};

#[cfg(feature = "typescript")]
use ts_rs::TS;

use crate::types::{Contract, Payment};

/// Aggregate financial figures derived from a contract's payment history.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
pub struct LedgerSummary {
    /// Advance plus every recorded payment
    pub received_total: f64,
    /// Tax-inclusive total minus received; negative on over-payment
    pub remaining_balance: f64,
    /// Rounded display percentage; 0 when the total is non-positive
    pub progress_percent: i64,
}

/// Fold a contract's payments into its aggregate figures.
pub fn compute_ledger(contract: &Contract) -> LedgerSummary {
    let received = received_total(contract);
    LedgerSummary {
        received_total: received,
        remaining_balance: contract.total_amount - received,
        progress_percent: progress_percent(received, contract.total_amount),
    }
}

/// Advance amount plus the sum of all payment amounts.
pub fn received_total(contract: &Contract) -> f64 {
    contract.advance_amount + contract.payments.iter().map(|p| p.amount).sum::<f64>()
}

/// Unrounded payment-completeness ratio.
///
/// Returns 0.0 for a zero or negative total so callers never divide by
/// zero; over-payment yields a ratio above 1.0.
pub fn received_ratio(contract: &Contract) -> f64 {
    if contract.total_amount <= 0.0 {
        return 0.0;
    }
    received_total(contract) / contract.total_amount
}

fn progress_percent(received: f64, total: f64) -> i64 {
    if total <= 0.0 {
        return 0;
    }
    (received / total * 100.0).round() as i64
}

/// Payments in display order: by payment date, tie-broken by id.
pub fn ordered_payments(contract: &Contract) -> Vec<&Payment> {
    let mut payments: Vec<&Payment> = contract.payments.iter().collect();
    payments.sort_by(|a, b| a.date.cmp(&b.date).then_with(|| a.id.cmp(&b.id)));
    payments
}

/// Derived tax amount for a contract.
pub fn tax_amount(contract: &Contract) -> f64 {
    contract.total_amount - contract.base_amount
}

/// Tax-inclusive total for a base amount at the given rate.
pub fn total_with_tax(base_amount: f64, tax_rate: f64) -> f64 {
    base_amount * (1.0 + tax_rate)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ContractState, PaymentCategory};
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn contract_with_total(total: f64) -> Contract {
        Contract::new(
            "Obra",
            "Cliente",
            total / 1.16,
            total,
            date(2023, 1, 1),
            date(2023, 12, 1),
        )
    }

    fn payment(contract: &Contract, amount: f64, d: NaiveDate) -> Payment {
        Payment::new(contract.id.clone(), amount, d, PaymentCategory::Partial)
    }

    #[test]
    fn test_received_total_includes_advance() {
        let mut contract = contract_with_total(100_000.0).with_advance(10_000.0, date(2023, 1, 5));
        contract.payments.push(payment(&contract, 88_000.0, date(2023, 6, 1)));

        let summary = compute_ledger(&contract);
        assert!((summary.received_total - 98_000.0).abs() < 1e-9);
        assert!((summary.remaining_balance - 2_000.0).abs() < 1e-9);
        assert_eq!(summary.progress_percent, 98);
    }

    #[test]
    fn test_summary_insertion_order_irrelevant() {
        let mut a = contract_with_total(50_000.0).with_advance(5_000.0, date(2023, 1, 2));
        let mut b = a.clone();

        let p1 = payment(&a, 20_000.0, date(2023, 3, 1));
        let p2 = payment(&a, 25_000.0, date(2023, 2, 1));
        a.payments.push(p1.clone());
        a.payments.push(p2.clone());
        b.payments.push(p2);
        b.payments.push(p1);

        assert_eq!(compute_ledger(&a), compute_ledger(&b));
    }

    #[test]
    fn test_zero_total_yields_zero_progress() {
        let mut contract = contract_with_total(0.0);
        contract.payments.push(payment(&contract, 1_000.0, date(2023, 2, 1)));

        let summary = compute_ledger(&contract);
        assert_eq!(summary.progress_percent, 0);
        assert!((received_ratio(&contract) - 0.0).abs() < 1e-12);
    }

    #[test]
    fn test_negative_total_yields_zero_progress() {
        let contract = contract_with_total(-10.0);
        assert_eq!(compute_ledger(&contract).progress_percent, 0);
        assert_eq!(received_ratio(&contract), 0.0);
    }

    #[test]
    fn test_over_payment_reports_negative_balance() {
        let mut contract = contract_with_total(10_000.0);
        contract.payments.push(payment(&contract, 12_000.0, date(2023, 2, 1)));

        let summary = compute_ledger(&contract);
        assert!(summary.remaining_balance < 0.0);
        assert!(summary.progress_percent > 100);
        assert_eq!(contract.state, ContractState::Active);
    }

    #[test]
    fn test_ratio_is_unrounded() {
        let mut contract = contract_with_total(100_000.0);
        contract.payments.push(payment(&contract, 97_600.0, date(2023, 2, 1)));

        // Displays as 98% but the exact ratio stays below the threshold.
        assert_eq!(compute_ledger(&contract).progress_percent, 98);
        assert!(received_ratio(&contract) < 0.98);
    }

    #[test]
    fn test_ordered_payments_sorts_by_date_then_id() {
        let mut contract = contract_with_total(100_000.0);
        let mut p1 = payment(&contract, 1_000.0, date(2023, 5, 1));
        let mut p2 = payment(&contract, 2_000.0, date(2023, 4, 1));
        let mut p3 = payment(&contract, 3_000.0, date(2023, 5, 1));
        p1.id = "b".to_string();
        p2.id = "c".to_string();
        p3.id = "a".to_string();
        contract.payments.extend([p1, p2, p3]);

        let ordered = ordered_payments(&contract);
        let ids: Vec<&str> = ordered.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["c", "a", "b"]);
    }

    #[test]
    fn test_total_with_tax() {
        assert!((total_with_tax(100_000.0, 0.16) - 116_000.0).abs() < 1e-6);
        let contract = contract_with_total(116_000.0);
        assert!((tax_amount(&contract) - 16_000.0).abs() < 1e-6);
    }
}
