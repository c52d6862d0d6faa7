//! GST calculation examples

use bigdecimal::BigDecimal;
use billing_core::{is_interstate_supply, LineTax, TaxBreakdown};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("🧾 Billing Core - GST Calculation Examples\n");

    // 1. Intrastate vs interstate breakdown
    println!("🏢 Intrastate Supply (CGST + SGST):");
    let intra = TaxBreakdown::calculate(BigDecimal::from(10000), &BigDecimal::from(18), false)?;
    println!("  Taxable Amount: ₹{}", intra.taxable_amount);
    println!("  CGST (9%):      ₹{}", intra.cgst);
    println!("  SGST (9%):      ₹{}", intra.sgst);
    println!("  IGST:           ₹{}", intra.igst);
    println!("  Total GST:      ₹{}", intra.total_tax);
    println!("  Final Total:    ₹{}", intra.total_with_tax);
    println!();

    println!("🌍 Interstate Supply (IGST only):");
    let inter = TaxBreakdown::calculate(BigDecimal::from(10000), &BigDecimal::from(18), true)?;
    println!("  Taxable Amount: ₹{}", inter.taxable_amount);
    println!("  CGST:           ₹{}", inter.cgst);
    println!("  SGST:           ₹{}", inter.sgst);
    println!("  IGST (18%):     ₹{}", inter.igst);
    println!("  Total GST:      ₹{}", inter.total_tax);
    println!("  Final Total:    ₹{}", inter.total_with_tax);
    println!();

    // 2. The jurisdiction rule behind the flag
    println!("🗺️ Interstate Determination:");
    let cases = [
        ("Kerala", Some("Kerala")),
        ("Kerala", Some("Tamil Nadu")),
        ("Kerala", Some("kerala")),
        ("Kerala", None),
    ];
    for (seller, counterparty) in cases {
        println!(
            "  seller={seller:<8} counterparty={:<12} -> interstate: {}",
            counterparty.unwrap_or("(none)"),
            is_interstate_supply(seller, counterparty)
        );
    }
    println!();

    // 3. Per-line tax with split rates, as persisted on document lines
    println!("📋 Line Tax for 3 kg @ ₹250, 12% GST, intrastate:");
    let line_total = BigDecimal::from(3) * BigDecimal::from(250);
    let line_tax = LineTax::calculate(&line_total, &BigDecimal::from(12), false)?;
    println!("  Line Total:  ₹{line_total}");
    println!("  CGST ({}%):  ₹{}", line_tax.cgst_rate, line_tax.cgst_amount);
    println!("  SGST ({}%):  ₹{}", line_tax.sgst_rate, line_tax.sgst_amount);
    println!("  IGST ({}%):  ₹{}", line_tax.igst_rate, line_tax.igst_amount);
    println!("  Line GST:    ₹{}", line_tax.total());
    println!();

    // 4. The exactness property on an awkward amount
    println!("✅ Halves Always Sum Back to the Whole:");
    let awkward = TaxBreakdown::calculate(
        "123.45".parse::<BigDecimal>()?,
        &"12.5".parse::<BigDecimal>()?,
        false,
    )?;
    println!("  ₹123.45 @ 12.5%");
    println!("  CGST: ₹{}", awkward.cgst);
    println!("  SGST: ₹{}", awkward.sgst);
    println!(
        "  CGST + SGST = ₹{} (tax total ₹{})",
        &awkward.cgst + &awkward.sgst,
        awkward.total_tax
    );

    println!("\n🎉 GST calculation examples completed successfully!");
    Ok(())
}
