//! Basic billing walkthrough: catalog, invoice, payment, purchase, receipt

use bigdecimal::BigDecimal;
use billing_core::{
    Billing, CompanyProfile, CreateInvoiceRequest, CreatePurchaseRequest, InvoiceLineRequest,
    MemoryStore, NewProduct, PartyDetails, PaymentRequest, PurchaseLineRequest,
};
use chrono::NaiveDate;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("🧾 Billing Core - Basic Billing Example\n");

    let mut billing = Billing::new(MemoryStore::new());
    let actor = "demo-operator";

    // 1. Seller profile: the company state drives the interstate decision
    println!("🏢 Setting up Company Profile...");
    let mut profile = CompanyProfile::new("Malabar Traders".to_string());
    profile.state = Some("Kerala".to_string());
    profile.gst_number = Some("32ABCDE1234F1Z5".to_string());
    billing.set_company_profile(profile).await?;
    println!("  ✓ Malabar Traders (Kerala)\n");

    // 2. Directory and catalog
    println!("📇 Creating Directory and Catalog...");
    let customer = billing
        .create_customer(
            PartyDetails {
                name: "Chennai Wholesale".to_string(),
                email: Some("orders@chennaiwholesale.example".to_string()),
                phone: None,
                address: None,
                state: Some("Tamil Nadu".to_string()),
                gstin: None,
                opening_balance: BigDecimal::from(0),
            },
            actor,
        )
        .await?;
    println!("  ✓ Customer: {} ({})", customer.name, "Tamil Nadu");

    let supplier = billing
        .create_supplier(
            PartyDetails {
                name: "Nagpur Mills".to_string(),
                email: None,
                phone: None,
                address: None,
                state: Some("Maharashtra".to_string()),
                gstin: None,
                opening_balance: BigDecimal::from(0),
            },
            actor,
        )
        .await?;
    println!("  ✓ Supplier: {}", supplier.name);

    let product = billing
        .create_product(
            NewProduct {
                name: "Handloom Towel".to_string(),
                description: Some("Cotton handloom towel".to_string()),
                sku: "TOWEL-STD".to_string(),
                cost_price: BigDecimal::from(120),
                selling_price: BigDecimal::from(200),
                quantity: BigDecimal::from(40),
                reorder_level: BigDecimal::from(10),
                unit: "pcs".to_string(),
                hsn_code: Some("6302".to_string()),
                gst_rate: BigDecimal::from(5),
            },
            actor,
        )
        .await?;
    println!("  ✓ Product: {} ({} in stock)\n", product.name, product.quantity);

    // 3. Invoice an interstate customer
    println!("💰 Creating an Interstate Invoice...");
    let (invoice, lines) = billing
        .create_invoice(
            CreateInvoiceRequest {
                customer_id: customer.id.clone(),
                due_date: NaiveDate::from_ymd_opt(2026, 9, 30).unwrap(),
                lines: vec![InvoiceLineRequest {
                    product_id: product.id.clone(),
                    quantity: BigDecimal::from(10),
                    unit_price: None,
                }],
                apply_gst: true,
            },
            actor,
        )
        .await?;
    println!("  ✓ {} for {}", invoice.invoice_number, customer.name);
    println!("    Subtotal: ₹{}", invoice.subtotal);
    println!("    IGST:     ₹{} (interstate: {})", invoice.igst, invoice.is_interstate);
    println!("    Total:    ₹{} across {} line(s)\n", invoice.total, lines.len());

    // 4. First payment commits the stock
    println!("💸 Recording a Partial Payment...");
    let paid = billing
        .record_invoice_payment(
            &invoice.id,
            PaymentRequest {
                amount: BigDecimal::from(1000),
                payment_date: NaiveDate::from_ymd_opt(2026, 8, 7).unwrap(),
                payment_method_id: None,
                reference_number: Some("UTR-778812".to_string()),
                notes: None,
            },
            actor,
        )
        .await?;
    let restocked = billing.get_product(&product.id).await?.unwrap();
    println!("  ✓ Status: {:?}, paid ₹{} of ₹{}", paid.payment_status, paid.amount_paid, paid.total);
    println!("  ✓ Stock after first payment: {} pcs\n", restocked.quantity);

    // 5. Restock through a purchase order
    println!("📦 Ordering and Receiving Stock...");
    let (purchase, _) = billing
        .create_purchase(
            CreatePurchaseRequest {
                supplier_id: supplier.id.clone(),
                order_date: NaiveDate::from_ymd_opt(2026, 8, 7).unwrap(),
                expected_date: Some(NaiveDate::from_ymd_opt(2026, 8, 21).unwrap()),
                notes: None,
                lines: vec![PurchaseLineRequest {
                    sku: "TOWEL-STD".to_string(),
                    name: "Handloom Towel".to_string(),
                    quantity: BigDecimal::from(100),
                    unit_price: BigDecimal::from(110),
                    unit: "pcs".to_string(),
                    hsn_code: Some("6302".to_string()),
                    gst_rate: BigDecimal::from(5),
                }],
            },
            actor,
        )
        .await?;
    println!("  ✓ {} from {} for ₹{}", purchase.purchase_number, supplier.name, purchase.total);

    billing.mark_purchase_received(&purchase.id, actor).await?;
    let restocked = billing.get_product(&product.id).await?.unwrap();
    println!("  ✓ Received; stock is now {} pcs\n", restocked.quantity);

    // 6. Reports
    println!("📊 Reports:");
    let today = NaiveDate::from_ymd_opt(2026, 8, 7).unwrap();
    let receivables = billing.receivables_summary(today).await?;
    let payables = billing.payables_summary(today).await?;
    let cash = billing.cash_summary(None, None).await?;
    println!(
        "  Receivables: ₹{} across {} open invoice(s)",
        receivables.total_outstanding, receivables.open_invoices
    );
    println!(
        "  Payables:    ₹{} across {} open purchase(s)",
        payables.total_outstanding, payables.open_purchases
    );
    println!(
        "  Cash book:   income ₹{}, expense ₹{}, net ₹{}",
        cash.total_income, cash.total_expense, cash.net
    );

    println!("\n🎉 Basic billing example completed successfully!");
    Ok(())
}
