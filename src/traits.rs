//! Traits for storage abstraction and extensibility

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::billing::invoice::CreateInvoiceRequest;
use crate::billing::purchase::CreatePurchaseRequest;
use crate::types::*;
use crate::utils::validation;

/// Storage abstraction for the billing system
///
/// The core issues per-entity reads and writes against whatever backend
/// implements this trait (PostgreSQL, SQLite, a hosted data service, or the
/// in-memory store used in tests). Every operation is an independent
/// request/response call; the backend's own error text travels back
/// verbatim inside [`BillingError::Storage`].
#[async_trait]
pub trait BillingStore: Send + Sync {
    // Catalog
    async fn save_product(&mut self, product: &Product) -> BillingResult<()>;
    async fn get_product(&self, product_id: &str) -> BillingResult<Option<Product>>;
    async fn get_product_by_sku(&self, sku: &str) -> BillingResult<Option<Product>>;
    async fn update_product(&mut self, product: &Product) -> BillingResult<()>;
    async fn list_products(&self) -> BillingResult<Vec<Product>>;

    // Directory
    async fn save_customer(&mut self, customer: &Customer) -> BillingResult<()>;
    async fn get_customer(&self, customer_id: &str) -> BillingResult<Option<Customer>>;
    async fn list_customers(&self) -> BillingResult<Vec<Customer>>;
    async fn save_supplier(&mut self, supplier: &Supplier) -> BillingResult<()>;
    async fn get_supplier(&self, supplier_id: &str) -> BillingResult<Option<Supplier>>;
    async fn list_suppliers(&self) -> BillingResult<Vec<Supplier>>;

    // Invoices
    async fn save_invoice(&mut self, invoice: &Invoice) -> BillingResult<()>;
    async fn get_invoice(&self, invoice_id: &str) -> BillingResult<Option<Invoice>>;
    async fn update_invoice(&mut self, invoice: &Invoice) -> BillingResult<()>;
    /// Delete an invoice header and any lines referencing it
    async fn delete_invoice(&mut self, invoice_id: &str) -> BillingResult<()>;
    async fn list_invoices(&self) -> BillingResult<Vec<Invoice>>;
    async fn save_invoice_lines(&mut self, lines: &[InvoiceLine]) -> BillingResult<()>;
    async fn get_invoice_lines(&self, invoice_id: &str) -> BillingResult<Vec<InvoiceLine>>;

    // Purchases
    async fn save_purchase(&mut self, purchase: &Purchase) -> BillingResult<()>;
    async fn get_purchase(&self, purchase_id: &str) -> BillingResult<Option<Purchase>>;
    async fn update_purchase(&mut self, purchase: &Purchase) -> BillingResult<()>;
    /// Delete a purchase header and any lines referencing it
    async fn delete_purchase(&mut self, purchase_id: &str) -> BillingResult<()>;
    async fn list_purchases(&self) -> BillingResult<Vec<Purchase>>;
    async fn save_purchase_lines(&mut self, lines: &[PurchaseLine]) -> BillingResult<()>;
    async fn get_purchase_lines(&self, purchase_id: &str) -> BillingResult<Vec<PurchaseLine>>;

    // Payments
    async fn save_invoice_payment(&mut self, payment: &PaymentRecord) -> BillingResult<()>;
    async fn save_purchase_payment(&mut self, payment: &PaymentRecord) -> BillingResult<()>;

    // Stock ledger
    async fn save_stock_movement(&mut self, movement: &StockMovement) -> BillingResult<()>;
    /// List stock-ledger entries, optionally for a single catalog item
    async fn list_stock_movements(
        &self,
        product_id: Option<&str>,
    ) -> BillingResult<Vec<StockMovement>>;

    // Cash ledger
    async fn save_cash_transaction(&mut self, transaction: &CashTransaction) -> BillingResult<()>;
    async fn list_cash_transactions(
        &self,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> BillingResult<Vec<CashTransaction>>;

    // Payment methods
    async fn save_payment_method(&mut self, method: &PaymentMethod) -> BillingResult<()>;
    async fn list_payment_methods(&self) -> BillingResult<Vec<PaymentMethod>>;

    // Company profile singleton
    async fn get_company_profile(&self) -> BillingResult<Option<CompanyProfile>>;
    async fn save_company_profile(&mut self, profile: &CompanyProfile) -> BillingResult<()>;
}

/// Pre-write validation of document and payment requests
///
/// Runs before any storage call, so a rejected request leaves no partial
/// writes behind.
pub trait DocumentValidator: Send + Sync {
    /// Validate an invoice creation request
    fn validate_invoice_request(&self, request: &CreateInvoiceRequest) -> BillingResult<()>;

    /// Validate a purchase creation request
    fn validate_purchase_request(&self, request: &CreatePurchaseRequest) -> BillingResult<()>;

    /// Validate a payment request (the balance check against the document
    /// happens in the workflow, which holds the document)
    fn validate_payment_request(&self, request: &PaymentRequest) -> BillingResult<()>;
}

/// Default validator encoding the workflow preconditions
pub struct DefaultDocumentValidator;

impl DocumentValidator for DefaultDocumentValidator {
    fn validate_invoice_request(&self, request: &CreateInvoiceRequest) -> BillingResult<()> {
        if request.lines.is_empty() {
            return Err(BillingError::Validation(
                "Invoice must have at least one line item".to_string(),
            ));
        }
        for line in &request.lines {
            validation::validate_positive_quantity(&line.quantity)?;
            if let Some(price) = &line.unit_price {
                validation::validate_non_negative_amount(price)?;
            }
        }
        Ok(())
    }

    fn validate_purchase_request(&self, request: &CreatePurchaseRequest) -> BillingResult<()> {
        if request.lines.is_empty() {
            return Err(BillingError::Validation(
                "Purchase must have at least one line item".to_string(),
            ));
        }
        for line in &request.lines {
            validation::validate_sku(&line.sku)?;
            if line.name.trim().is_empty() {
                return Err(BillingError::Validation(
                    "Purchase line item name cannot be empty".to_string(),
                ));
            }
            validation::validate_positive_quantity(&line.quantity)?;
            validation::validate_non_negative_amount(&line.unit_price)?;
        }
        Ok(())
    }

    fn validate_payment_request(&self, request: &PaymentRequest) -> BillingResult<()> {
        validation::validate_positive_amount(&request.amount)?;
        Ok(())
    }
}
