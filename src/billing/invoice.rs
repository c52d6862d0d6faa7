//! Invoice creation, payment, and status workflows

use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::tax::gst::{is_interstate_supply, line_subtotal, LineTax};
use crate::traits::*;
use crate::types::*;

/// One requested invoice line, referencing a catalog item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvoiceLineRequest {
    pub product_id: String,
    pub quantity: BigDecimal,
    /// Overrides the catalog selling price when set
    pub unit_price: Option<BigDecimal>,
}

/// Typed request for the invoice creation workflow
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateInvoiceRequest {
    pub customer_id: String,
    pub due_date: NaiveDate,
    pub lines: Vec<InvoiceLineRequest>,
    /// When false the document carries no tax and the total equals the
    /// subtotal; line snapshots still record their computed tax amounts
    pub apply_gst: bool,
}

/// Manager for the sales-side document workflows
pub struct InvoiceManager<S: BillingStore> {
    pub(crate) storage: S,
    validator: Box<dyn DocumentValidator>,
}

impl<S: BillingStore> InvoiceManager<S> {
    pub fn new(storage: S) -> Self {
        Self {
            storage,
            validator: Box::new(DefaultDocumentValidator),
        }
    }

    pub fn with_validator(storage: S, validator: Box<dyn DocumentValidator>) -> Self {
        Self { storage, validator }
    }

    /// Create an invoice from the requested lines.
    ///
    /// The company profile must carry the seller's state and the request at
    /// least one line; both are checked before any write. Per-line tax is
    /// computed from the catalog item's GST rate and the interstate
    /// determination, which is fixed on the header at this moment. The
    /// header is persisted first, then the lines; if the line insert fails
    /// the fresh header is removed again so no orphan survives, and the
    /// storage error is surfaced unchanged.
    pub async fn create_invoice(
        &mut self,
        request: CreateInvoiceRequest,
        actor: &str,
    ) -> BillingResult<(Invoice, Vec<InvoiceLine>)> {
        self.validator.validate_invoice_request(&request)?;

        let seller_state = self.require_seller_state().await?;

        let customer = self
            .storage
            .get_customer(&request.customer_id)
            .await?
            .ok_or_else(|| BillingError::CustomerNotFound(request.customer_id.clone()))?;

        let is_interstate = is_interstate_supply(&seller_state, customer.state.as_deref());
        let place_of_supply = customer
            .state
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| seller_state.clone());

        let now = chrono::Utc::now().naive_utc();
        let invoice_id = new_id();

        let zero = BigDecimal::from(0);
        let mut subtotal = zero.clone();
        let mut cgst = zero.clone();
        let mut sgst = zero.clone();
        let mut igst = zero.clone();
        let mut lines = Vec::with_capacity(request.lines.len());

        for line in &request.lines {
            let product = self
                .storage
                .get_product(&line.product_id)
                .await?
                .ok_or_else(|| BillingError::ProductNotFound(line.product_id.clone()))?;

            let unit_price = line
                .unit_price
                .clone()
                .unwrap_or_else(|| product.selling_price.clone());
            let total = line_subtotal(&line.quantity, &unit_price);
            let tax = LineTax::calculate(&total, &product.gst_rate, is_interstate)?;

            subtotal += &total;
            cgst += &tax.cgst_amount;
            sgst += &tax.sgst_amount;
            igst += &tax.igst_amount;

            lines.push(InvoiceLine {
                id: new_id(),
                invoice_id: invoice_id.clone(),
                product_id: product.id.clone(),
                quantity: line.quantity.clone(),
                unit_price,
                line_total: total,
                hsn_code: product.hsn_code.clone().unwrap_or_default(),
                gst_rate: product.gst_rate.clone(),
                cgst_amount: tax.cgst_amount,
                sgst_amount: tax.sgst_amount,
                igst_amount: tax.igst_amount,
                created_at: now,
            });
        }

        let (cgst, sgst, igst) = if request.apply_gst {
            (cgst, sgst, igst)
        } else {
            (zero.clone(), zero.clone(), zero.clone())
        };
        let tax = &cgst + &sgst + &igst;
        let total = &subtotal + &tax;

        let invoice = Invoice {
            id: invoice_id,
            invoice_number: generate_document_number("INV"),
            customer_id: customer.id.clone(),
            status: InvoiceStatus::Draft,
            payment_status: PaymentStatus::Unpaid,
            amount_paid: zero,
            subtotal,
            cgst,
            sgst,
            igst,
            tax,
            total,
            is_interstate,
            place_of_supply: Some(place_of_supply),
            due_date: request.due_date,
            paid_date: None,
            created_by: actor.to_string(),
            created_at: now,
            updated_at: now,
        };

        self.storage.save_invoice(&invoice).await?;
        info!(
            invoice_id = %invoice.id,
            invoice_number = %invoice.invoice_number,
            "invoice header persisted"
        );

        if let Err(err) = self.storage.save_invoice_lines(&lines).await {
            warn!(
                invoice_id = %invoice.id,
                "line insert failed, removing orphaned header"
            );
            if let Err(cleanup) = self.storage.delete_invoice(&invoice.id).await {
                warn!(
                    invoice_id = %invoice.id,
                    error = %cleanup,
                    "orphaned header cleanup failed"
                );
            }
            return Err(err);
        }

        info!(
            invoice_id = %invoice.id,
            lines = lines.len(),
            total = %invoice.total,
            "invoice created"
        );
        Ok((invoice, lines))
    }

    /// Record a payment against an invoice.
    ///
    /// The amount must be positive and no more than the outstanding
    /// balance; both checks run before any write. The first payment that
    /// moves the invoice out of `Unpaid` also releases the invoiced stock.
    /// Every payment appends an income entry to the cash book.
    pub async fn record_payment(
        &mut self,
        invoice_id: &str,
        request: PaymentRequest,
        actor: &str,
    ) -> BillingResult<Invoice> {
        self.validator.validate_payment_request(&request)?;

        let invoice = self.get_invoice_required(invoice_id).await?;
        let outstanding = invoice.outstanding();
        if request.amount > outstanding {
            return Err(BillingError::InvalidPayment(format!(
                "Payment amount {} exceeds remaining balance of {}",
                request.amount, outstanding
            )));
        }

        let payment = PaymentRecord::new(invoice_id, &request, actor);
        self.storage.save_invoice_payment(&payment).await?;

        let previous_status = invoice.payment_status;
        let mut updated = invoice;
        updated.amount_paid += &request.amount;
        updated.payment_status = PaymentStatus::from_amounts(&updated.amount_paid, &updated.total);
        if updated.payment_status == PaymentStatus::Paid {
            updated.status = InvoiceStatus::Paid;
            updated.paid_date = Some(chrono::Utc::now().date_naive());
        } else {
            updated.status = InvoiceStatus::Sent;
            updated.paid_date = None;
        }
        updated.updated_at = chrono::Utc::now().naive_utc();
        self.storage.update_invoice(&updated).await?;

        if previous_status == PaymentStatus::Unpaid
            && updated.payment_status != PaymentStatus::Unpaid
        {
            let reason = format!(
                "Invoice {} - first payment received",
                updated.invoice_number
            );
            self.release_stock(&updated.id, &reason, actor).await?;
        }

        let cash_entry = CashTransaction {
            id: new_id(),
            kind: TransactionKind::Income,
            category: "Product Sales".to_string(),
            amount: request.amount.clone(),
            description: Some(format!("Payment for Invoice {}", updated.invoice_number)),
            invoice_id: Some(updated.id.clone()),
            transaction_date: request.payment_date,
            payment_method_id: request.payment_method_id.clone(),
            reference_number: request.reference_number.clone(),
            created_by: actor.to_string(),
            created_at: chrono::Utc::now().naive_utc(),
        };
        self.storage.save_cash_transaction(&cash_entry).await?;

        info!(
            invoice_id = %updated.id,
            amount = %request.amount,
            payment_status = ?updated.payment_status,
            "invoice payment recorded"
        );
        Ok(updated)
    }

    /// Update an invoice's lifecycle status.
    ///
    /// Marking an invoice paid through this path performs the same stock
    /// release as the payment path, guarded by the same "was not already
    /// paid or partial" check so the movement happens at most once per
    /// document; it also settles the payment fields in full.
    pub async fn update_status(
        &mut self,
        invoice_id: &str,
        status: InvoiceStatus,
        actor: &str,
    ) -> BillingResult<Invoice> {
        let invoice = self.get_invoice_required(invoice_id).await?;

        let was_previously_paid = matches!(
            invoice.payment_status,
            PaymentStatus::Paid | PaymentStatus::Partial
        );
        if status == InvoiceStatus::Paid && !was_previously_paid {
            let reason = format!("Invoice {} marked as paid", invoice.invoice_number);
            self.release_stock(&invoice.id, &reason, actor).await?;
        }

        let mut updated = invoice;
        updated.status = status;
        if status == InvoiceStatus::Paid {
            updated.payment_status = PaymentStatus::Paid;
            updated.amount_paid = updated.total.clone();
            updated.paid_date = Some(chrono::Utc::now().date_naive());
        }
        updated.updated_at = chrono::Utc::now().naive_utc();
        self.storage.update_invoice(&updated).await?;

        Ok(updated)
    }

    pub async fn get_invoice(&self, invoice_id: &str) -> BillingResult<Option<Invoice>> {
        self.storage.get_invoice(invoice_id).await
    }

    pub async fn get_invoice_required(&self, invoice_id: &str) -> BillingResult<Invoice> {
        self.storage
            .get_invoice(invoice_id)
            .await?
            .ok_or_else(|| BillingError::InvoiceNotFound(invoice_id.to_string()))
    }

    pub async fn list_invoices(&self) -> BillingResult<Vec<Invoice>> {
        self.storage.list_invoices().await
    }

    pub async fn invoice_lines(&self, invoice_id: &str) -> BillingResult<Vec<InvoiceLine>> {
        self.storage.get_invoice_lines(invoice_id).await
    }

    /// Seller-side jurisdiction, required before any document can be created
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

    /// Decrement on-hand quantities for every invoice line and append one
    /// outbound stock-ledger entry per line
    async fn release_stock(
        &mut self,
        invoice_id: &str,
        reason: &str,
        actor: &str,
    ) -> BillingResult<()> {
        let lines = self.storage.get_invoice_lines(invoice_id).await?;
        for line in lines {
            let mut product = self
                .storage
                .get_product(&line.product_id)
                .await?
                .ok_or_else(|| BillingError::ProductNotFound(line.product_id.clone()))?;

            product.quantity -= &line.quantity;
            product.updated_at = chrono::Utc::now().naive_utc();
            self.storage.update_product(&product).await?;

            let movement = StockMovement::new(
                &line.product_id,
                MovementType::Out,
                line.quantity.clone(),
                Some(reason.to_string()),
                actor,
            );
            self.storage.save_stock_movement(&movement).await?;
        }
        info!(invoice_id, "invoiced stock released");
        Ok(())
    }
}
