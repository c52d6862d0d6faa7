//! Main billing facade coordinating documents, inventory, and the cash book

use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::billing::invoice::{CreateInvoiceRequest, InvoiceManager};
use crate::billing::purchase::{CreatePurchaseRequest, PurchaseManager};
use crate::cashbook::{CashBook, CashSummary, NewCashTransaction};
use crate::inventory::{InventoryManager, NewProduct};
use crate::traits::*;
use crate::types::*;
use crate::utils::validation;

/// Contact and tax details for a new customer or supplier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartyDetails {
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub state: Option<String>,
    pub gstin: Option<String>,
    pub opening_balance: BigDecimal,
}

/// Outstanding receivables across open invoices
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReceivablesSummary {
    pub as_of: NaiveDate,
    pub open_invoices: usize,
    /// Outstanding balances plus the opening balances of customers with
    /// open invoices
    pub total_outstanding: BigDecimal,
    /// Outstanding on invoices past their due date
    pub total_overdue: BigDecimal,
}

/// Outstanding payables across open purchases
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PayablesSummary {
    pub as_of: NaiveDate,
    pub open_purchases: usize,
    /// Outstanding balances plus the opening balances of suppliers with
    /// open purchases
    pub total_outstanding: BigDecimal,
}

/// Main billing system facade
///
/// Owns the document workflows, the inventory manager, and the cash book,
/// all sharing one storage backend, and layers directory management and
/// derived reports on top.
pub struct Billing<S: BillingStore> {
    invoices: InvoiceManager<S>,
    purchases: PurchaseManager<S>,
    inventory: InventoryManager<S>,
    cash_book: CashBook<S>,
    storage: S,
}

impl<S: BillingStore + Clone> Billing<S> {
    /// Create a billing system over the given storage backend
    pub fn new(storage: S) -> Self {
        Self {
            invoices: InvoiceManager::new(storage.clone()),
            purchases: PurchaseManager::new(storage.clone()),
            inventory: InventoryManager::new(storage.clone()),
            cash_book: CashBook::new(storage.clone()),
            storage,
        }
    }

    /// Create a billing system with custom request validators
    pub fn with_validators(
        storage: S,
        invoice_validator: Box<dyn DocumentValidator>,
        purchase_validator: Box<dyn DocumentValidator>,
    ) -> Self {
        Self {
            invoices: InvoiceManager::with_validator(storage.clone(), invoice_validator),
            purchases: PurchaseManager::with_validator(storage.clone(), purchase_validator),
            inventory: InventoryManager::new(storage.clone()),
            cash_book: CashBook::new(storage.clone()),
            storage,
        }
    }

    // Invoice workflows
    pub async fn create_invoice(
        &mut self,
        request: CreateInvoiceRequest,
        actor: &str,
    ) -> BillingResult<(Invoice, Vec<InvoiceLine>)> {
        self.invoices.create_invoice(request, actor).await
    }

    pub async fn record_invoice_payment(
        &mut self,
        invoice_id: &str,
        request: PaymentRequest,
        actor: &str,
    ) -> BillingResult<Invoice> {
        self.invoices.record_payment(invoice_id, request, actor).await
    }

    pub async fn update_invoice_status(
        &mut self,
        invoice_id: &str,
        status: InvoiceStatus,
        actor: &str,
    ) -> BillingResult<Invoice> {
        self.invoices.update_status(invoice_id, status, actor).await
    }

    pub async fn get_invoice(&self, invoice_id: &str) -> BillingResult<Option<Invoice>> {
        self.invoices.get_invoice(invoice_id).await
    }

    pub async fn list_invoices(&self) -> BillingResult<Vec<Invoice>> {
        self.invoices.list_invoices().await
    }

    pub async fn invoice_lines(&self, invoice_id: &str) -> BillingResult<Vec<InvoiceLine>> {
        self.invoices.invoice_lines(invoice_id).await
    }

    // Purchase workflows
    pub async fn create_purchase(
        &mut self,
        request: CreatePurchaseRequest,
        actor: &str,
    ) -> BillingResult<(Purchase, Vec<PurchaseLine>)> {
        self.purchases.create_purchase(request, actor).await
    }

    pub async fn mark_purchase_received(
        &mut self,
        purchase_id: &str,
        actor: &str,
    ) -> BillingResult<Purchase> {
        self.purchases.mark_received(purchase_id, actor).await
    }

    pub async fn record_purchase_payment(
        &mut self,
        purchase_id: &str,
        request: PaymentRequest,
        actor: &str,
    ) -> BillingResult<Purchase> {
        self.purchases
            .record_payment(purchase_id, request, actor)
            .await
    }

    pub async fn get_purchase(&self, purchase_id: &str) -> BillingResult<Option<Purchase>> {
        self.purchases.get_purchase(purchase_id).await
    }

    pub async fn list_purchases(&self) -> BillingResult<Vec<Purchase>> {
        self.purchases.list_purchases().await
    }

    pub async fn purchase_lines(&self, purchase_id: &str) -> BillingResult<Vec<PurchaseLine>> {
        self.purchases.purchase_lines(purchase_id).await
    }

    // Inventory
    pub async fn create_product(
        &mut self,
        new_product: NewProduct,
        actor: &str,
    ) -> BillingResult<Product> {
        self.inventory.create_product(new_product, actor).await
    }

    pub async fn update_product(&mut self, product: &Product) -> BillingResult<()> {
        self.inventory.update_product(product).await
    }

    pub async fn get_product(&self, product_id: &str) -> BillingResult<Option<Product>> {
        self.inventory.get_product(product_id).await
    }

    pub async fn list_products(&self) -> BillingResult<Vec<Product>> {
        self.inventory.list_products().await
    }

    pub async fn adjust_stock(
        &mut self,
        product_id: &str,
        change: BigDecimal,
        reason: Option<String>,
        actor: &str,
    ) -> BillingResult<Product> {
        self.inventory
            .adjust_stock(product_id, change, reason, actor)
            .await
    }

    pub async fn low_stock(&self) -> BillingResult<Vec<Product>> {
        self.inventory.low_stock().await
    }

    pub async fn stock_movements(
        &self,
        product_id: Option<&str>,
    ) -> BillingResult<Vec<StockMovement>> {
        self.inventory.stock_movements(product_id).await
    }

    // Cash book
    pub async fn record_cash_transaction(
        &mut self,
        entry: NewCashTransaction,
        actor: &str,
    ) -> BillingResult<CashTransaction> {
        self.cash_book.record(entry, actor).await
    }

    pub async fn cash_transactions(
        &self,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> BillingResult<Vec<CashTransaction>> {
        self.cash_book.transactions(start_date, end_date).await
    }

    pub async fn cash_summary(
        &self,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> BillingResult<CashSummary> {
        self.cash_book.summary(start_date, end_date).await
    }

    // Directory
    pub async fn create_customer(
        &mut self,
        details: PartyDetails,
        actor: &str,
    ) -> BillingResult<Customer> {
        validation::validate_party_name(&details.name)?;

        let now = chrono::Utc::now().naive_utc();
        let customer = Customer {
            id: new_id(),
            name: details.name,
            email: details.email,
            phone: details.phone,
            address: details.address,
            state: details.state,
            gstin: details.gstin,
            opening_balance: details.opening_balance,
            created_by: actor.to_string(),
            created_at: now,
            updated_at: now,
        };
        self.storage.save_customer(&customer).await?;
        Ok(customer)
    }

    pub async fn list_customers(&self) -> BillingResult<Vec<Customer>> {
        self.storage.list_customers().await
    }

    pub async fn create_supplier(
        &mut self,
        details: PartyDetails,
        actor: &str,
    ) -> BillingResult<Supplier> {
        validation::validate_party_name(&details.name)?;

        let now = chrono::Utc::now().naive_utc();
        let supplier = Supplier {
            id: new_id(),
            name: details.name,
            email: details.email,
            phone: details.phone,
            address: details.address,
            state: details.state,
            gstin: details.gstin,
            opening_balance: details.opening_balance,
            created_by: actor.to_string(),
            created_at: now,
            updated_at: now,
        };
        self.storage.save_supplier(&supplier).await?;
        Ok(supplier)
    }

    pub async fn list_suppliers(&self) -> BillingResult<Vec<Supplier>> {
        self.storage.list_suppliers().await
    }

    pub async fn set_company_profile(&mut self, profile: CompanyProfile) -> BillingResult<()> {
        validation::validate_party_name(&profile.company_name)?;
        self.storage.save_company_profile(&profile).await
    }

    pub async fn company_profile(&self) -> BillingResult<Option<CompanyProfile>> {
        self.storage.get_company_profile().await
    }

    pub async fn add_payment_method(&mut self, name: &str) -> BillingResult<PaymentMethod> {
        validation::validate_party_name(name)?;

        let method = PaymentMethod {
            id: new_id(),
            name: name.to_string(),
            created_at: chrono::Utc::now().naive_utc(),
        };
        self.storage.save_payment_method(&method).await?;
        Ok(method)
    }

    pub async fn list_payment_methods(&self) -> BillingResult<Vec<PaymentMethod>> {
        self.storage.list_payment_methods().await
    }

    // Reports
    /// Outstanding receivables across open (not fully paid, not cancelled)
    /// invoices, including the opening balances of the customers involved
    pub async fn receivables_summary(&self, as_of: NaiveDate) -> BillingResult<ReceivablesSummary> {
        let invoices = self.storage.list_invoices().await?;

        let zero = BigDecimal::from(0);
        let mut total_outstanding = zero.clone();
        let mut total_overdue = zero;
        let mut open_invoices = 0;
        let mut customers_seen: HashSet<String> = HashSet::new();

        for invoice in invoices {
            if invoice.status == InvoiceStatus::Cancelled
                || invoice.payment_status == PaymentStatus::Paid
            {
                continue;
            }

            open_invoices += 1;
            let outstanding = invoice.outstanding();
            total_outstanding += &outstanding;
            if invoice.is_overdue(as_of) {
                total_overdue += &outstanding;
            }

            if customers_seen.insert(invoice.customer_id.clone()) {
                if let Some(customer) = self.storage.get_customer(&invoice.customer_id).await? {
                    total_outstanding += &customer.opening_balance;
                }
            }
        }

        Ok(ReceivablesSummary {
            as_of,
            open_invoices,
            total_outstanding,
            total_overdue,
        })
    }

    /// Outstanding payables across open (not fully paid, not cancelled)
    /// purchases, including the opening balances of the suppliers involved
    pub async fn payables_summary(&self, as_of: NaiveDate) -> BillingResult<PayablesSummary> {
        let purchases = self.storage.list_purchases().await?;

        let mut total_outstanding = BigDecimal::from(0);
        let mut open_purchases = 0;
        let mut suppliers_seen: HashSet<String> = HashSet::new();

        for purchase in purchases {
            if purchase.status == PurchaseStatus::Cancelled
                || purchase.payment_status == PaymentStatus::Paid
            {
                continue;
            }

            open_purchases += 1;
            total_outstanding += &purchase.outstanding();

            if suppliers_seen.insert(purchase.supplier_id.clone()) {
                if let Some(supplier) = self.storage.get_supplier(&purchase.supplier_id).await? {
                    total_outstanding += &supplier.opening_balance;
                }
            }
        }

        Ok(PayablesSummary {
            as_of,
            open_purchases,
            total_outstanding,
        })
    }
}
