//! Cash book: the flat income and expense register

use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::traits::BillingStore;
use crate::types::*;
use crate::utils::validation;

/// Typed request for a manual cash-book entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewCashTransaction {
    pub kind: TransactionKind,
    pub category: String,
    pub amount: BigDecimal,
    pub description: Option<String>,
    pub transaction_date: NaiveDate,
    pub payment_method_id: Option<String>,
    pub reference_number: Option<String>,
}

/// Income and expense totals over a period
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CashSummary {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub total_income: BigDecimal,
    pub total_expense: BigDecimal,
    /// total_income - total_expense
    pub net: BigDecimal,
}

/// Manager for the income/expense register. Document payments append their
/// entries directly; this manager covers manual entries and reporting.
pub struct CashBook<S: BillingStore> {
    pub(crate) storage: S,
}

impl<S: BillingStore> CashBook<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    /// Record a manual income or expense entry
    pub async fn record(
        &mut self,
        entry: NewCashTransaction,
        actor: &str,
    ) -> BillingResult<CashTransaction> {
        validation::validate_category(&entry.category)?;
        validation::validate_positive_amount(&entry.amount)?;

        let transaction = CashTransaction {
            id: new_id(),
            kind: entry.kind,
            category: entry.category,
            amount: entry.amount,
            description: entry.description,
            invoice_id: None,
            transaction_date: entry.transaction_date,
            payment_method_id: entry.payment_method_id,
            reference_number: entry.reference_number,
            created_by: actor.to_string(),
            created_at: chrono::Utc::now().naive_utc(),
        };
        self.storage.save_cash_transaction(&transaction).await?;
        Ok(transaction)
    }

    /// List entries within an optional date range
    pub async fn transactions(
        &self,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> BillingResult<Vec<CashTransaction>> {
        self.storage
            .list_cash_transactions(start_date, end_date)
            .await
    }

    /// Income, expense, and net totals within an optional date range
    pub async fn summary(
        &self,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> BillingResult<CashSummary> {
        let transactions = self.transactions(start_date, end_date).await?;

        let total_income: BigDecimal = transactions
            .iter()
            .filter(|t| t.kind == TransactionKind::Income)
            .map(|t| &t.amount)
            .sum();
        let total_expense: BigDecimal = transactions
            .iter()
            .filter(|t| t.kind == TransactionKind::Expense)
            .map(|t| &t.amount)
            .sum();
        let net = &total_income - &total_expense;

        Ok(CashSummary {
            start_date,
            end_date,
            total_income,
            total_expense,
            net,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::memory_store::MemoryStore;

    fn entry(kind: TransactionKind, amount: i32, day: u32) -> NewCashTransaction {
        NewCashTransaction {
            kind,
            category: "General".to_string(),
            amount: BigDecimal::from(amount),
            description: None,
            transaction_date: chrono::NaiveDate::from_ymd_opt(2026, 8, day).unwrap(),
            payment_method_id: None,
            reference_number: None,
        }
    }

    #[tokio::test]
    async fn summary_totals_by_kind() {
        let store = MemoryStore::new();
        let mut cash_book = CashBook::new(store);

        cash_book
            .record(entry(TransactionKind::Income, 5000, 1), "op1")
            .await
            .unwrap();
        cash_book
            .record(entry(TransactionKind::Income, 2500, 5), "op1")
            .await
            .unwrap();
        cash_book
            .record(entry(TransactionKind::Expense, 1200, 6), "op1")
            .await
            .unwrap();

        let summary = cash_book.summary(None, None).await.unwrap();
        assert_eq!(summary.total_income, BigDecimal::from(7500));
        assert_eq!(summary.total_expense, BigDecimal::from(1200));
        assert_eq!(summary.net, BigDecimal::from(6300));
    }

    #[tokio::test]
    async fn date_range_filters_entries() {
        let store = MemoryStore::new();
        let mut cash_book = CashBook::new(store);

        cash_book
            .record(entry(TransactionKind::Income, 100, 1), "op1")
            .await
            .unwrap();
        cash_book
            .record(entry(TransactionKind::Income, 200, 15), "op1")
            .await
            .unwrap();

        let first_week = cash_book
            .transactions(
                Some(chrono::NaiveDate::from_ymd_opt(2026, 8, 1).unwrap()),
                Some(chrono::NaiveDate::from_ymd_opt(2026, 8, 7).unwrap()),
            )
            .await
            .unwrap();
        assert_eq!(first_week.len(), 1);
        assert_eq!(first_week[0].amount, BigDecimal::from(100));
    }

    #[tokio::test]
    async fn invalid_entries_rejected() {
        let store = MemoryStore::new();
        let mut cash_book = CashBook::new(store);

        let mut bad_amount = entry(TransactionKind::Expense, 0, 1);
        bad_amount.amount = BigDecimal::from(0);
        assert!(cash_book.record(bad_amount, "op1").await.is_err());

        let mut bad_category = entry(TransactionKind::Expense, 10, 1);
        bad_category.category = "  ".to_string();
        assert!(cash_book.record(bad_category, "op1").await.is_err());
    }
}
