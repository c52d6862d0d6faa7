//! In-memory storage implementation for testing and development

use async_trait::async_trait;
use chrono::NaiveDate;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::traits::BillingStore;
use crate::types::*;

/// In-memory [`BillingStore`] backed by shared hash maps. Clones share the
/// same underlying data, mirroring how managers share one backend.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    products: Arc<RwLock<HashMap<String, Product>>>,
    customers: Arc<RwLock<HashMap<String, Customer>>>,
    suppliers: Arc<RwLock<HashMap<String, Supplier>>>,
    invoices: Arc<RwLock<HashMap<String, Invoice>>>,
    invoice_lines: Arc<RwLock<Vec<InvoiceLine>>>,
    purchases: Arc<RwLock<HashMap<String, Purchase>>>,
    purchase_lines: Arc<RwLock<Vec<PurchaseLine>>>,
    invoice_payments: Arc<RwLock<Vec<PaymentRecord>>>,
    purchase_payments: Arc<RwLock<Vec<PaymentRecord>>>,
    stock_movements: Arc<RwLock<Vec<StockMovement>>>,
    cash_transactions: Arc<RwLock<Vec<CashTransaction>>>,
    payment_methods: Arc<RwLock<HashMap<String, PaymentMethod>>>,
    company_profile: Arc<RwLock<Option<CompanyProfile>>>,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear all data (useful for testing)
    pub fn clear(&self) {
        self.products.write().unwrap().clear();
        self.customers.write().unwrap().clear();
        self.suppliers.write().unwrap().clear();
        self.invoices.write().unwrap().clear();
        self.invoice_lines.write().unwrap().clear();
        self.purchases.write().unwrap().clear();
        self.purchase_lines.write().unwrap().clear();
        self.invoice_payments.write().unwrap().clear();
        self.purchase_payments.write().unwrap().clear();
        self.stock_movements.write().unwrap().clear();
        self.cash_transactions.write().unwrap().clear();
        self.payment_methods.write().unwrap().clear();
        *self.company_profile.write().unwrap() = None;
    }

    /// Payments recorded against an invoice (test inspection helper)
    pub fn invoice_payments_for(&self, invoice_id: &str) -> Vec<PaymentRecord> {
        self.invoice_payments
            .read()
            .unwrap()
            .iter()
            .filter(|p| p.document_id == invoice_id)
            .cloned()
            .collect()
    }

    /// Payments recorded against a purchase (test inspection helper)
    pub fn purchase_payments_for(&self, purchase_id: &str) -> Vec<PaymentRecord> {
        self.purchase_payments
            .read()
            .unwrap()
            .iter()
            .filter(|p| p.document_id == purchase_id)
            .cloned()
            .collect()
    }
}

#[async_trait]
impl BillingStore for MemoryStore {
    async fn save_product(&mut self, product: &Product) -> BillingResult<()> {
        self.products
            .write()
            .unwrap()
            .insert(product.id.clone(), product.clone());
        Ok(())
    }

    async fn get_product(&self, product_id: &str) -> BillingResult<Option<Product>> {
        Ok(self.products.read().unwrap().get(product_id).cloned())
    }

    async fn get_product_by_sku(&self, sku: &str) -> BillingResult<Option<Product>> {
        Ok(self
            .products
            .read()
            .unwrap()
            .values()
            .find(|p| p.sku == sku)
            .cloned())
    }

    async fn update_product(&mut self, product: &Product) -> BillingResult<()> {
        let mut products = self.products.write().unwrap();
        if products.contains_key(&product.id) {
            products.insert(product.id.clone(), product.clone());
            Ok(())
        } else {
            Err(BillingError::ProductNotFound(product.id.clone()))
        }
    }

    async fn list_products(&self) -> BillingResult<Vec<Product>> {
        let mut products: Vec<Product> = self.products.read().unwrap().values().cloned().collect();
        products.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(products)
    }

    async fn save_customer(&mut self, customer: &Customer) -> BillingResult<()> {
        self.customers
            .write()
            .unwrap()
            .insert(customer.id.clone(), customer.clone());
        Ok(())
    }

    async fn get_customer(&self, customer_id: &str) -> BillingResult<Option<Customer>> {
        Ok(self.customers.read().unwrap().get(customer_id).cloned())
    }

    async fn list_customers(&self) -> BillingResult<Vec<Customer>> {
        let mut customers: Vec<Customer> =
            self.customers.read().unwrap().values().cloned().collect();
        customers.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(customers)
    }

    async fn save_supplier(&mut self, supplier: &Supplier) -> BillingResult<()> {
        self.suppliers
            .write()
            .unwrap()
            .insert(supplier.id.clone(), supplier.clone());
        Ok(())
    }

    async fn get_supplier(&self, supplier_id: &str) -> BillingResult<Option<Supplier>> {
        Ok(self.suppliers.read().unwrap().get(supplier_id).cloned())
    }

    async fn list_suppliers(&self) -> BillingResult<Vec<Supplier>> {
        let mut suppliers: Vec<Supplier> =
            self.suppliers.read().unwrap().values().cloned().collect();
        suppliers.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(suppliers)
    }

    async fn save_invoice(&mut self, invoice: &Invoice) -> BillingResult<()> {
        self.invoices
            .write()
            .unwrap()
            .insert(invoice.id.clone(), invoice.clone());
        Ok(())
    }

    async fn get_invoice(&self, invoice_id: &str) -> BillingResult<Option<Invoice>> {
        Ok(self.invoices.read().unwrap().get(invoice_id).cloned())
    }

    async fn update_invoice(&mut self, invoice: &Invoice) -> BillingResult<()> {
        let mut invoices = self.invoices.write().unwrap();
        if invoices.contains_key(&invoice.id) {
            invoices.insert(invoice.id.clone(), invoice.clone());
            Ok(())
        } else {
            Err(BillingError::InvoiceNotFound(invoice.id.clone()))
        }
    }

    async fn delete_invoice(&mut self, invoice_id: &str) -> BillingResult<()> {
        if self.invoices.write().unwrap().remove(invoice_id).is_none() {
            return Err(BillingError::InvoiceNotFound(invoice_id.to_string()));
        }
        self.invoice_lines
            .write()
            .unwrap()
            .retain(|line| line.invoice_id != invoice_id);
        Ok(())
    }

    async fn list_invoices(&self) -> BillingResult<Vec<Invoice>> {
        let mut invoices: Vec<Invoice> = self.invoices.read().unwrap().values().cloned().collect();
        invoices.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(invoices)
    }

    async fn save_invoice_lines(&mut self, lines: &[InvoiceLine]) -> BillingResult<()> {
        self.invoice_lines
            .write()
            .unwrap()
            .extend(lines.iter().cloned());
        Ok(())
    }

    async fn get_invoice_lines(&self, invoice_id: &str) -> BillingResult<Vec<InvoiceLine>> {
        Ok(self
            .invoice_lines
            .read()
            .unwrap()
            .iter()
            .filter(|line| line.invoice_id == invoice_id)
            .cloned()
            .collect())
    }

    async fn save_purchase(&mut self, purchase: &Purchase) -> BillingResult<()> {
        self.purchases
            .write()
            .unwrap()
            .insert(purchase.id.clone(), purchase.clone());
        Ok(())
    }

    async fn get_purchase(&self, purchase_id: &str) -> BillingResult<Option<Purchase>> {
        Ok(self.purchases.read().unwrap().get(purchase_id).cloned())
    }

    async fn update_purchase(&mut self, purchase: &Purchase) -> BillingResult<()> {
        let mut purchases = self.purchases.write().unwrap();
        if purchases.contains_key(&purchase.id) {
            purchases.insert(purchase.id.clone(), purchase.clone());
            Ok(())
        } else {
            Err(BillingError::PurchaseNotFound(purchase.id.clone()))
        }
    }

    async fn delete_purchase(&mut self, purchase_id: &str) -> BillingResult<()> {
        if self.purchases.write().unwrap().remove(purchase_id).is_none() {
            return Err(BillingError::PurchaseNotFound(purchase_id.to_string()));
        }
        self.purchase_lines
            .write()
            .unwrap()
            .retain(|line| line.purchase_id != purchase_id);
        Ok(())
    }

    async fn list_purchases(&self) -> BillingResult<Vec<Purchase>> {
        let mut purchases: Vec<Purchase> =
            self.purchases.read().unwrap().values().cloned().collect();
        purchases.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(purchases)
    }

    async fn save_purchase_lines(&mut self, lines: &[PurchaseLine]) -> BillingResult<()> {
        self.purchase_lines
            .write()
            .unwrap()
            .extend(lines.iter().cloned());
        Ok(())
    }

    async fn get_purchase_lines(&self, purchase_id: &str) -> BillingResult<Vec<PurchaseLine>> {
        Ok(self
            .purchase_lines
            .read()
            .unwrap()
            .iter()
            .filter(|line| line.purchase_id == purchase_id)
            .cloned()
            .collect())
    }

    async fn save_invoice_payment(&mut self, payment: &PaymentRecord) -> BillingResult<()> {
        self.invoice_payments.write().unwrap().push(payment.clone());
        Ok(())
    }

    async fn save_purchase_payment(&mut self, payment: &PaymentRecord) -> BillingResult<()> {
        self.purchase_payments
            .write()
            .unwrap()
            .push(payment.clone());
        Ok(())
    }

    async fn save_stock_movement(&mut self, movement: &StockMovement) -> BillingResult<()> {
        self.stock_movements.write().unwrap().push(movement.clone());
        Ok(())
    }

    async fn list_stock_movements(
        &self,
        product_id: Option<&str>,
    ) -> BillingResult<Vec<StockMovement>> {
        let movements = self.stock_movements.read().unwrap();
        let mut filtered: Vec<StockMovement> = movements
            .iter()
            .filter(|m| product_id.is_none_or(|id| m.product_id == id))
            .cloned()
            .collect();
        filtered.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(filtered)
    }

    async fn save_cash_transaction(&mut self, transaction: &CashTransaction) -> BillingResult<()> {
        self.cash_transactions
            .write()
            .unwrap()
            .push(transaction.clone());
        Ok(())
    }

    async fn list_cash_transactions(
        &self,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> BillingResult<Vec<CashTransaction>> {
        let transactions = self.cash_transactions.read().unwrap();
        let mut filtered: Vec<CashTransaction> = transactions
            .iter()
            .filter(|txn| {
                if let Some(start) = start_date {
                    if txn.transaction_date < start {
                        return false;
                    }
                }
                if let Some(end) = end_date {
                    if txn.transaction_date > end {
                        return false;
                    }
                }
                true
            })
            .cloned()
            .collect();
        filtered.sort_by(|a, b| b.transaction_date.cmp(&a.transaction_date));
        Ok(filtered)
    }

    async fn save_payment_method(&mut self, method: &PaymentMethod) -> BillingResult<()> {
        self.payment_methods
            .write()
            .unwrap()
            .insert(method.id.clone(), method.clone());
        Ok(())
    }

    async fn list_payment_methods(&self) -> BillingResult<Vec<PaymentMethod>> {
        let mut methods: Vec<PaymentMethod> = self
            .payment_methods
            .read()
            .unwrap()
            .values()
            .cloned()
            .collect();
        methods.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(methods)
    }

    async fn get_company_profile(&self) -> BillingResult<Option<CompanyProfile>> {
        Ok(self.company_profile.read().unwrap().clone())
    }

    async fn save_company_profile(&mut self, profile: &CompanyProfile) -> BillingResult<()> {
        *self.company_profile.write().unwrap() = Some(profile.clone());
        Ok(())
    }
}
