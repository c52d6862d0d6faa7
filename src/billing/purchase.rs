//! Purchase-order creation, receiving, and payment workflows

use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::tax::gst::{is_interstate_supply, line_subtotal, LineTax};
use crate::traits::*;
use crate::types::*;

/// One requested purchase line. Purchases reference catalog items by SKU;
/// an unknown SKU is admitted into the catalog during creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PurchaseLineRequest {
    pub sku: String,
    /// Display name used when the SKU has to be auto-created
    pub name: String,
    pub quantity: BigDecimal,
    pub unit_price: BigDecimal,
    pub unit: String,
    pub hsn_code: Option<String>,
    /// GST rate for this line; purchases carry the rate per line rather
    /// than reading it from the catalog
    pub gst_rate: BigDecimal,
}

/// Typed request for the purchase creation workflow
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreatePurchaseRequest {
    pub supplier_id: String,
    pub order_date: NaiveDate,
    pub expected_date: Option<NaiveDate>,
    pub notes: Option<String>,
    pub lines: Vec<PurchaseLineRequest>,
}

/// Manager for the procurement-side document workflows
pub struct PurchaseManager<S: BillingStore> {
    pub(crate) storage: S,
    validator: Box<dyn DocumentValidator>,
}

impl<S: BillingStore> PurchaseManager<S> {
    pub fn new(storage: S) -> Self {
        Self {
            storage,
            validator: Box::new(DefaultDocumentValidator),
        }
    }

    pub fn with_validator(storage: S, validator: Box<dyn DocumentValidator>) -> Self {
        Self { storage, validator }
    }

    /// Create a purchase order from the requested lines.
    ///
    /// Lines are resolved by SKU first; a SKU the catalog does not know yet
    /// is created as a minimal raw-material entry with zero starting
    /// quantity before any document write. Header and lines are then
    /// persisted in order, with the same orphan cleanup as the invoice
    /// workflow when the line insert fails.
    pub async fn create_purchase(
        &mut self,
        request: CreatePurchaseRequest,
        actor: &str,
    ) -> BillingResult<(Purchase, Vec<PurchaseLine>)> {
        self.validator.validate_purchase_request(&request)?;

        let seller_state = self.require_seller_state().await?;

        let supplier = self
            .storage
            .get_supplier(&request.supplier_id)
            .await?
            .ok_or_else(|| BillingError::SupplierNotFound(request.supplier_id.clone()))?;

        let is_interstate = is_interstate_supply(&seller_state, supplier.state.as_deref());
        let place_of_supply = supplier
            .state
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string);

        let now = chrono::Utc::now().naive_utc();
        let purchase_id = new_id();

        let zero = BigDecimal::from(0);
        let mut subtotal = zero.clone();
        let mut cgst = zero.clone();
        let mut sgst = zero.clone();
        let mut igst = zero.clone();
        let mut lines = Vec::with_capacity(request.lines.len());

        for line in &request.lines {
            let product_id = self.resolve_or_create_product(line, actor).await?;

            let total = line_subtotal(&line.quantity, &line.unit_price);
            let tax = LineTax::calculate(&total, &line.gst_rate, is_interstate)?;

            subtotal += &total;
            cgst += &tax.cgst_amount;
            sgst += &tax.sgst_amount;
            igst += &tax.igst_amount;

            lines.push(PurchaseLine {
                id: new_id(),
                purchase_id: purchase_id.clone(),
                product_id,
                quantity: line.quantity.clone(),
                unit_price: line.unit_price.clone(),
                line_total: total,
                hsn_code: line.hsn_code.clone().unwrap_or_default(),
                gst_rate: line.gst_rate.clone(),
                cgst_rate: tax.cgst_rate,
                sgst_rate: tax.sgst_rate,
                igst_rate: tax.igst_rate,
                cgst_amount: tax.cgst_amount,
                sgst_amount: tax.sgst_amount,
                igst_amount: tax.igst_amount,
                created_at: now,
            });
        }

        let tax = &cgst + &sgst + &igst;
        let total = &subtotal + &tax;

        let purchase = Purchase {
            id: purchase_id,
            purchase_number: generate_document_number("PO"),
            supplier_id: supplier.id.clone(),
            status: PurchaseStatus::Ordered,
            payment_status: PaymentStatus::Unpaid,
            amount_paid: zero,
            subtotal,
            cgst,
            sgst,
            igst,
            tax,
            total,
            is_interstate,
            place_of_supply,
            order_date: request.order_date,
            expected_date: request.expected_date,
            received_date: None,
            notes: request.notes.clone(),
            created_by: actor.to_string(),
            created_at: now,
            updated_at: now,
        };

        self.storage.save_purchase(&purchase).await?;
        info!(
            purchase_id = %purchase.id,
            purchase_number = %purchase.purchase_number,
            "purchase header persisted"
        );

        if let Err(err) = self.storage.save_purchase_lines(&lines).await {
            warn!(
                purchase_id = %purchase.id,
                "line insert failed, removing orphaned header"
            );
            if let Err(cleanup) = self.storage.delete_purchase(&purchase.id).await {
                warn!(
                    purchase_id = %purchase.id,
                    error = %cleanup,
                    "orphaned header cleanup failed"
                );
            }
            return Err(err);
        }

        info!(
            purchase_id = %purchase.id,
            lines = lines.len(),
            total = %purchase.total,
            "purchase created"
        );
        Ok((purchase, lines))
    }

    /// Mark a purchase as received, bringing the ordered goods into stock.
    ///
    /// Each line increments the catalog item's on-hand quantity and appends
    /// one inbound stock-ledger entry. A purchase already marked received is
    /// returned unchanged, so repeated calls never double-count stock.
    pub async fn mark_received(
        &mut self,
        purchase_id: &str,
        actor: &str,
    ) -> BillingResult<Purchase> {
        let purchase = self.get_purchase_required(purchase_id).await?;

        if purchase.status == PurchaseStatus::Received {
            info!(purchase_id, "purchase already received, nothing to do");
            return Ok(purchase);
        }

        let lines = self.storage.get_purchase_lines(purchase_id).await?;
        for line in lines {
            let mut product = self
                .storage
                .get_product(&line.product_id)
                .await?
                .ok_or_else(|| BillingError::ProductNotFound(line.product_id.clone()))?;

            product.quantity += &line.quantity;
            product.updated_at = chrono::Utc::now().naive_utc();
            self.storage.update_product(&product).await?;

            let movement = StockMovement::new(
                &line.product_id,
                MovementType::In,
                line.quantity.clone(),
                Some(format!("Purchase {} received", purchase.purchase_number)),
                actor,
            );
            self.storage.save_stock_movement(&movement).await?;
        }

        let mut updated = purchase;
        updated.status = PurchaseStatus::Received;
        updated.received_date = Some(chrono::Utc::now().date_naive());
        updated.updated_at = chrono::Utc::now().naive_utc();
        self.storage.update_purchase(&updated).await?;

        info!(purchase_id = %updated.id, "purchase received into stock");
        Ok(updated)
    }

    /// Record a payment against a purchase.
    ///
    /// The amount must be positive and no more than the outstanding
    /// balance, checked before any write. Purchase payments never move
    /// stock; receiving does. Every payment appends an expense entry to the
    /// cash book.
    pub async fn record_payment(
        &mut self,
        purchase_id: &str,
        request: PaymentRequest,
        actor: &str,
    ) -> BillingResult<Purchase> {
        self.validator.validate_payment_request(&request)?;

        let purchase = self.get_purchase_required(purchase_id).await?;
        let outstanding = purchase.outstanding();
        if request.amount > outstanding {
            return Err(BillingError::InvalidPayment(format!(
                "Payment amount {} exceeds remaining balance of {}",
                request.amount, outstanding
            )));
        }

        let payment = PaymentRecord::new(purchase_id, &request, actor);
        self.storage.save_purchase_payment(&payment).await?;

        let mut updated = purchase;
        updated.amount_paid += &request.amount;
        updated.payment_status = PaymentStatus::from_amounts(&updated.amount_paid, &updated.total);
        updated.updated_at = chrono::Utc::now().naive_utc();
        self.storage.update_purchase(&updated).await?;

        let cash_entry = CashTransaction {
            id: new_id(),
            kind: TransactionKind::Expense,
            category: "Inventory Purchase".to_string(),
            amount: request.amount.clone(),
            description: Some(format!(
                "Payment for Purchase {}",
                updated.purchase_number
            )),
            invoice_id: None,
            transaction_date: request.payment_date,
            payment_method_id: request.payment_method_id.clone(),
            reference_number: request.reference_number.clone(),
            created_by: actor.to_string(),
            created_at: chrono::Utc::now().naive_utc(),
        };
        self.storage.save_cash_transaction(&cash_entry).await?;

        info!(
            purchase_id = %updated.id,
            amount = %request.amount,
            payment_status = ?updated.payment_status,
            "purchase payment recorded"
        );
        Ok(updated)
    }

    pub async fn get_purchase(&self, purchase_id: &str) -> BillingResult<Option<Purchase>> {
        self.storage.get_purchase(purchase_id).await
    }

    pub async fn get_purchase_required(&self, purchase_id: &str) -> BillingResult<Purchase> {
        self.storage
            .get_purchase(purchase_id)
            .await?
            .ok_or_else(|| BillingError::PurchaseNotFound(purchase_id.to_string()))
    }

    pub async fn list_purchases(&self) -> BillingResult<Vec<Purchase>> {
        self.storage.list_purchases().await
    }

    pub async fn purchase_lines(&self, purchase_id: &str) -> BillingResult<Vec<PurchaseLine>> {
        self.storage.get_purchase_lines(purchase_id).await
    }

    async fn require_seller_state(&self) -> BillingResult<String> {
        let profile = self.storage.get_company_profile().await?.ok_or_else(|| {
            BillingError::Validation(
                "Company profile must be set up before creating documents".to_string(),
            )
        })?;
        let state = profile
            .state
            .as_deref()
            .map(str::trim)
            .unwrap_or_default()
            .to_string();
        if state.is_empty() {
            return Err(BillingError::Validation(
                "Company profile is missing its state".to_string(),
            ));
        }
        Ok(state)
    }

    /// Look the SKU up in the catalog, creating a minimal raw-material
    /// entry when it is unknown. Auto-created items start at zero quantity;
    /// stock only arrives when the purchase is received.
    async fn resolve_or_create_product(
        &mut self,
        line: &PurchaseLineRequest,
        actor: &str,
    ) -> BillingResult<String> {
        if let Some(existing) = self.storage.get_product_by_sku(&line.sku).await? {
            return Ok(existing.id);
        }

        let now = chrono::Utc::now().naive_utc();
        let product = Product {
            id: new_id(),
            name: line.name.clone(),
            description: Some("Raw Material".to_string()),
            sku: line.sku.clone(),
            cost_price: line.unit_price.clone(),
            selling_price: line.unit_price.clone(),
            quantity: BigDecimal::from(0),
            reorder_level: BigDecimal::from(10),
            unit: line.unit.clone(),
            hsn_code: line.hsn_code.clone(),
            gst_rate: line.gst_rate.clone(),
            created_by: actor.to_string(),
            created_at: now,
            updated_at: now,
        };
        self.storage.save_product(&product).await?;
        info!(sku = %line.sku, product_id = %product.id, "catalog item auto-created for unknown SKU");
        Ok(product.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::memory_store::MemoryStore;

    async fn seeded_store() -> MemoryStore {
        let mut store = MemoryStore::new();
        let now = chrono::Utc::now().naive_utc();

        let mut profile = CompanyProfile::new("Malabar Traders".to_string());
        profile.state = Some("Kerala".to_string());
        store.save_company_profile(&profile).await.unwrap();

        store
            .save_supplier(&Supplier {
                id: "supp-remote".to_string(),
                name: "Nagpur Mills".to_string(),
                email: None,
                phone: None,
                address: None,
                state: Some("Maharashtra".to_string()),
                gstin: None,
                opening_balance: BigDecimal::from(0),
                created_by: "seed".to_string(),
                created_at: now,
                updated_at: now,
            })
            .await
            .unwrap();

        store
    }

    fn cotton_request() -> CreatePurchaseRequest {
        CreatePurchaseRequest {
            supplier_id: "supp-remote".to_string(),
            order_date: chrono::NaiveDate::from_ymd_opt(2026, 8, 1).unwrap(),
            expected_date: None,
            notes: None,
            lines: vec![PurchaseLineRequest {
                sku: "COTTON-40S".to_string(),
                name: "Cotton Yarn 40s".to_string(),
                quantity: BigDecimal::from(50),
                unit_price: BigDecimal::from(20),
                unit: "kg".to_string(),
                hsn_code: Some("5205".to_string()),
                gst_rate: BigDecimal::from(5),
            }],
        }
    }

    #[tokio::test]
    async fn unknown_sku_creates_catalog_entry_with_zero_stock() {
        let store = seeded_store().await;
        let mut manager = PurchaseManager::new(store.clone());

        let (purchase, lines) = manager
            .create_purchase(cotton_request(), "op1")
            .await
            .unwrap();

        let product = store
            .get_product_by_sku("COTTON-40S")
            .await
            .unwrap()
            .expect("auto-created");
        assert_eq!(product.quantity, BigDecimal::from(0));
        assert_eq!(product.cost_price, BigDecimal::from(20));
        assert_eq!(product.selling_price, BigDecimal::from(20));
        assert_eq!(product.reorder_level, BigDecimal::from(10));
        assert_eq!(lines[0].product_id, product.id);

        // interstate supplier, 5% on 1000
        assert!(purchase.is_interstate);
        assert_eq!(purchase.subtotal, BigDecimal::from(1000));
        assert_eq!(purchase.igst, BigDecimal::from(50));
        assert_eq!(purchase.cgst, BigDecimal::from(0));
        assert_eq!(purchase.total, BigDecimal::from(1050));
        assert_eq!(lines[0].igst_rate, BigDecimal::from(5));
    }

    #[tokio::test]
    async fn known_sku_is_reused() {
        let store = seeded_store().await;
        let mut manager = PurchaseManager::new(store.clone());

        manager
            .create_purchase(cotton_request(), "op1")
            .await
            .unwrap();
        manager
            .create_purchase(cotton_request(), "op1")
            .await
            .unwrap();

        assert_eq!(store.list_products().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn receiving_adds_stock_exactly_once() {
        let store = seeded_store().await;
        let mut manager = PurchaseManager::new(store.clone());

        let (purchase, _) = manager
            .create_purchase(cotton_request(), "op1")
            .await
            .unwrap();

        let received = manager.mark_received(&purchase.id, "op1").await.unwrap();
        assert_eq!(received.status, PurchaseStatus::Received);
        assert!(received.received_date.is_some());

        let product = store
            .get_product_by_sku("COTTON-40S")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(product.quantity, BigDecimal::from(50));

        // repeat receive must not double-count
        manager.mark_received(&purchase.id, "op1").await.unwrap();
        let product = store
            .get_product_by_sku("COTTON-40S")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(product.quantity, BigDecimal::from(50));
        assert_eq!(
            store
                .list_stock_movements(Some(&product.id))
                .await
                .unwrap()
                .len(),
            1
        );
    }

    #[tokio::test]
    async fn payments_track_status_without_stock_effects() {
        let store = seeded_store().await;
        let mut manager = PurchaseManager::new(store.clone());

        let (purchase, _) = manager
            .create_purchase(cotton_request(), "op1")
            .await
            .unwrap();

        let pay = |amount: i32| PaymentRequest {
            amount: BigDecimal::from(amount),
            payment_date: chrono::NaiveDate::from_ymd_opt(2026, 8, 7).unwrap(),
            payment_method_id: None,
            reference_number: None,
            notes: None,
        };

        let partial = manager
            .record_payment(&purchase.id, pay(500), "op1")
            .await
            .unwrap();
        assert_eq!(partial.payment_status, PaymentStatus::Partial);

        let settled = manager
            .record_payment(&purchase.id, pay(550), "op1")
            .await
            .unwrap();
        assert_eq!(settled.payment_status, PaymentStatus::Paid);

        // payments never touch stock
        let product = store
            .get_product_by_sku("COTTON-40S")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(product.quantity, BigDecimal::from(0));

        let cash = store.list_cash_transactions(None, None).await.unwrap();
        assert_eq!(cash.len(), 2);
        assert!(cash.iter().all(|t| t.kind == TransactionKind::Expense));

        let err = manager
            .record_payment(&purchase.id, pay(1), "op1")
            .await
            .unwrap_err();
        assert!(matches!(err, BillingError::InvalidPayment(_)));
    }
}
