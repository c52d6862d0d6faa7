//! Core types and data structures for the billing system

use bigdecimal::BigDecimal;
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Lifecycle of a sales invoice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InvoiceStatus {
    /// Created but not yet sent to the customer
    Draft,
    /// Sent to the customer, awaiting settlement
    Sent,
    /// Fully settled
    Paid,
    /// Voided, no longer collectible
    Cancelled,
}

/// Lifecycle of a purchase order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PurchaseStatus {
    /// Placed with the supplier, goods not yet in
    Ordered,
    /// Goods received into inventory
    Received,
    /// Voided before receipt
    Cancelled,
}

/// Settlement state of a document, derived from amounts only
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PaymentStatus {
    Unpaid,
    Partial,
    Paid,
}

impl PaymentStatus {
    /// Derive the settlement state from the cumulative amount paid and the
    /// document total. Zero paid is always `Unpaid`, even on a zero-total
    /// document; anything at or above the total is `Paid`.
    pub fn from_amounts(amount_paid: &BigDecimal, total: &BigDecimal) -> Self {
        if *amount_paid <= BigDecimal::from(0) {
            PaymentStatus::Unpaid
        } else if amount_paid >= total {
            PaymentStatus::Paid
        } else {
            PaymentStatus::Partial
        }
    }
}

/// Direction of a stock-ledger entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MovementType {
    /// Goods received (purchase receipt)
    In,
    /// Goods committed out (invoice settlement)
    Out,
    /// Manual correction; the quantity carries the sign of the change
    Adjustment,
}

/// Side of the cash book an entry lands on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransactionKind {
    Income,
    Expense,
}

/// Catalog item tracked in inventory
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    /// Stock-keeping unit, unique across the catalog
    pub sku: String,
    pub cost_price: BigDecimal,
    pub selling_price: BigDecimal,
    /// On-hand quantity
    pub quantity: BigDecimal,
    /// Threshold at or below which the item counts as low stock
    pub reorder_level: BigDecimal,
    /// Unit of measure (pcs, kg, ...)
    pub unit: String,
    /// HSN classification code, carried as an opaque string
    pub hsn_code: Option<String>,
    /// GST rate percentage applied to sales of this item
    pub gst_rate: BigDecimal,
    pub created_by: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// A customer in the sales directory
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    pub id: String,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    /// Tax jurisdiction used for the interstate determination
    pub state: Option<String>,
    pub gstin: Option<String>,
    /// Balance carried in from before this system was adopted
    pub opening_balance: BigDecimal,
    pub created_by: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// A supplier in the procurement directory
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Supplier {
    pub id: String,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub state: Option<String>,
    pub gstin: Option<String>,
    pub opening_balance: BigDecimal,
    pub created_by: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Seller profile, a singleton per operator account. The `state` field is
/// the seller-side jurisdiction every document workflow requires.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompanyProfile {
    pub id: String,
    pub company_name: String,
    pub gst_number: Option<String>,
    pub pan_number: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub postal_code: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub bank_name: Option<String>,
    pub account_number: Option<String>,
    pub ifsc_code: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl CompanyProfile {
    /// Create a profile with the given trading name; address, tax, and bank
    /// details start empty and can be filled in field by field.
    pub fn new(company_name: String) -> Self {
        let now = chrono::Utc::now().naive_utc();
        Self {
            id: new_id(),
            company_name,
            gst_number: None,
            pan_number: None,
            address: None,
            city: None,
            state: None,
            postal_code: None,
            phone: None,
            email: None,
            bank_name: None,
            account_number: None,
            ifsc_code: None,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Sales invoice header. Tax aggregates and the interstate flag are fixed
/// at creation time and never recomputed from the catalog afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Invoice {
    pub id: String,
    pub invoice_number: String,
    pub customer_id: String,
    pub status: InvoiceStatus,
    pub payment_status: PaymentStatus,
    /// Cumulative payments received against this invoice
    pub amount_paid: BigDecimal,
    /// Sum of line subtotals, before tax
    pub subtotal: BigDecimal,
    pub cgst: BigDecimal,
    pub sgst: BigDecimal,
    pub igst: BigDecimal,
    /// cgst + sgst + igst
    pub tax: BigDecimal,
    /// subtotal + tax, or subtotal alone when GST was not applied
    pub total: BigDecimal,
    pub is_interstate: bool,
    pub place_of_supply: Option<String>,
    pub due_date: NaiveDate,
    pub paid_date: Option<NaiveDate>,
    pub created_by: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl Invoice {
    /// Balance still owed on this invoice
    pub fn outstanding(&self) -> BigDecimal {
        &self.total - &self.amount_paid
    }

    /// True when the invoice is past due and not fully settled
    pub fn is_overdue(&self, as_of: NaiveDate) -> bool {
        self.due_date < as_of && self.payment_status != PaymentStatus::Paid
    }
}

/// Invoice line, an immutable snapshot of the catalog item at billing time.
/// Later catalog price or rate changes never alter persisted lines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvoiceLine {
    pub id: String,
    pub invoice_id: String,
    pub product_id: String,
    pub quantity: BigDecimal,
    /// Catalog selling price, or the explicit override given at billing time
    pub unit_price: BigDecimal,
    /// quantity x unit_price, before tax
    pub line_total: BigDecimal,
    pub hsn_code: String,
    pub gst_rate: BigDecimal,
    pub cgst_amount: BigDecimal,
    pub sgst_amount: BigDecimal,
    pub igst_amount: BigDecimal,
    pub created_at: NaiveDateTime,
}

/// Purchase order header
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Purchase {
    pub id: String,
    pub purchase_number: String,
    pub supplier_id: String,
    pub status: PurchaseStatus,
    pub payment_status: PaymentStatus,
    pub amount_paid: BigDecimal,
    pub subtotal: BigDecimal,
    pub cgst: BigDecimal,
    pub sgst: BigDecimal,
    pub igst: BigDecimal,
    pub tax: BigDecimal,
    pub total: BigDecimal,
    pub is_interstate: bool,
    pub place_of_supply: Option<String>,
    pub order_date: NaiveDate,
    pub expected_date: Option<NaiveDate>,
    pub received_date: Option<NaiveDate>,
    pub notes: Option<String>,
    pub created_by: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl Purchase {
    /// Balance still owed to the supplier
    pub fn outstanding(&self) -> BigDecimal {
        &self.total - &self.amount_paid
    }
}

/// Purchase line snapshot. Unlike invoice lines, purchase lines also carry
/// the split rates, since the supplied rate is per line rather than looked
/// up from the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PurchaseLine {
    pub id: String,
    pub purchase_id: String,
    pub product_id: String,
    pub quantity: BigDecimal,
    pub unit_price: BigDecimal,
    pub line_total: BigDecimal,
    pub hsn_code: String,
    pub gst_rate: BigDecimal,
    pub cgst_rate: BigDecimal,
    pub sgst_rate: BigDecimal,
    pub igst_rate: BigDecimal,
    pub cgst_amount: BigDecimal,
    pub sgst_amount: BigDecimal,
    pub igst_amount: BigDecimal,
    pub created_at: NaiveDateTime,
}

/// A payment to record against an invoice or purchase
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentRequest {
    pub amount: BigDecimal,
    pub payment_date: NaiveDate,
    pub payment_method_id: Option<String>,
    pub reference_number: Option<String>,
    pub notes: Option<String>,
}

/// Persisted record of a single payment against a document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentRecord {
    pub id: String,
    /// Id of the invoice or purchase the payment settles
    pub document_id: String,
    pub amount: BigDecimal,
    pub payment_date: NaiveDate,
    pub payment_method_id: Option<String>,
    pub reference_number: Option<String>,
    pub notes: Option<String>,
    pub created_by: String,
    pub created_at: NaiveDateTime,
}

impl PaymentRecord {
    pub fn new(document_id: &str, request: &PaymentRequest, actor: &str) -> Self {
        Self {
            id: new_id(),
            document_id: document_id.to_string(),
            amount: request.amount.clone(),
            payment_date: request.payment_date,
            payment_method_id: request.payment_method_id.clone(),
            reference_number: request.reference_number.clone(),
            notes: request.notes.clone(),
            created_by: actor.to_string(),
            created_at: chrono::Utc::now().naive_utc(),
        }
    }
}

/// Means of payment offered to counterparties (cash, UPI, bank transfer, ...)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentMethod {
    pub id: String,
    pub name: String,
    pub created_at: NaiveDateTime,
}

/// Stock-ledger entry. Written only at the state transition that implies
/// physical movement, never at document creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockMovement {
    pub id: String,
    pub product_id: String,
    pub movement: MovementType,
    pub quantity: BigDecimal,
    /// Human-readable cause naming the triggering document event
    pub reason: Option<String>,
    pub created_by: String,
    pub created_at: NaiveDateTime,
}

impl StockMovement {
    pub fn new(
        product_id: &str,
        movement: MovementType,
        quantity: BigDecimal,
        reason: Option<String>,
        actor: &str,
    ) -> Self {
        Self {
            id: new_id(),
            product_id: product_id.to_string(),
            movement,
            quantity,
            reason,
            created_by: actor.to_string(),
            created_at: chrono::Utc::now().naive_utc(),
        }
    }
}

/// Cash-book entry: a single income or expense line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CashTransaction {
    pub id: String,
    pub kind: TransactionKind,
    pub category: String,
    pub amount: BigDecimal,
    pub description: Option<String>,
    /// Set when the entry was generated by an invoice payment
    pub invoice_id: Option<String>,
    pub transaction_date: NaiveDate,
    pub payment_method_id: Option<String>,
    pub reference_number: Option<String>,
    pub created_by: String,
    pub created_at: NaiveDateTime,
}

/// Generate a fresh record id
pub(crate) fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Generate a document number like `INV-202608-041523`: the prefix, the
/// year-month, and the low six digits of the current timestamp in
/// milliseconds.
pub(crate) fn generate_document_number(prefix: &str) -> String {
    let now = chrono::Utc::now();
    let suffix = now.timestamp_millis().rem_euclid(1_000_000);
    format!("{}-{}-{:06}", prefix, now.format("%Y%m"), suffix)
}

/// Errors surfaced by the billing system
#[derive(Debug, thiserror::Error)]
pub enum BillingError {
    /// Backend failure, carrying the backend's own message verbatim
    #[error("Storage error: {0}")]
    Storage(String),
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("Customer not found: {0}")]
    CustomerNotFound(String),
    #[error("Supplier not found: {0}")]
    SupplierNotFound(String),
    #[error("Product not found: {0}")]
    ProductNotFound(String),
    #[error("Invoice not found: {0}")]
    InvoiceNotFound(String),
    #[error("Purchase not found: {0}")]
    PurchaseNotFound(String),
    #[error("Invalid payment: {0}")]
    InvalidPayment(String),
    #[error("Tax error: {0}")]
    Tax(#[from] crate::tax::gst::GstError),
}

/// Result type for billing operations
pub type BillingResult<T> = Result<T, BillingError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payment_status_from_amounts() {
        let total = BigDecimal::from(500);
        assert_eq!(
            PaymentStatus::from_amounts(&BigDecimal::from(0), &total),
            PaymentStatus::Unpaid
        );
        assert_eq!(
            PaymentStatus::from_amounts(&BigDecimal::from(200), &total),
            PaymentStatus::Partial
        );
        assert_eq!(
            PaymentStatus::from_amounts(&BigDecimal::from(500), &total),
            PaymentStatus::Paid
        );
        assert_eq!(
            PaymentStatus::from_amounts(&BigDecimal::from(600), &total),
            PaymentStatus::Paid
        );
    }

    #[test]
    fn zero_total_unpaid_until_paid() {
        // Nothing paid means unpaid, even when the total is zero
        let zero = BigDecimal::from(0);
        assert_eq!(
            PaymentStatus::from_amounts(&zero, &zero),
            PaymentStatus::Unpaid
        );
    }

    #[test]
    fn document_number_format() {
        let number = generate_document_number("INV");
        let parts: Vec<&str> = number.split('-').collect();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0], "INV");
        assert_eq!(parts[1].len(), 6);
        assert_eq!(parts[2].len(), 6);
    }

    #[test]
    fn invoice_overdue_predicate() {
        let now = chrono::Utc::now().naive_utc();
        let invoice = Invoice {
            id: "inv1".to_string(),
            invoice_number: "INV-202601-000001".to_string(),
            customer_id: "cust1".to_string(),
            status: InvoiceStatus::Sent,
            payment_status: PaymentStatus::Partial,
            amount_paid: BigDecimal::from(100),
            subtotal: BigDecimal::from(500),
            cgst: BigDecimal::from(45),
            sgst: BigDecimal::from(45),
            igst: BigDecimal::from(0),
            tax: BigDecimal::from(90),
            total: BigDecimal::from(590),
            is_interstate: false,
            place_of_supply: Some("Kerala".to_string()),
            due_date: NaiveDate::from_ymd_opt(2026, 1, 31).unwrap(),
            paid_date: None,
            created_by: "tester".to_string(),
            created_at: now,
            updated_at: now,
        };

        assert!(invoice.is_overdue(NaiveDate::from_ymd_opt(2026, 2, 1).unwrap()));
        assert!(!invoice.is_overdue(NaiveDate::from_ymd_opt(2026, 1, 31).unwrap()));
        assert_eq!(invoice.outstanding(), BigDecimal::from(490));
    }
}
