//! GST (Goods and Services Tax) computation for Indian tax compliance

use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};

/// Decide whether a supply crosses state lines.
///
/// Jurisdiction names are trimmed and compared case-insensitively. A missing
/// or empty jurisdiction on either side counts as the same state, so an
/// incomplete counterparty record never attracts spurious IGST.
pub fn is_interstate_supply(seller_state: &str, counterparty_state: Option<&str>) -> bool {
    let seller = seller_state.trim();
    let counterparty = counterparty_state.unwrap_or("").trim();
    if seller.is_empty() || counterparty.is_empty() {
        return false;
    }
    !seller.eq_ignore_ascii_case(counterparty)
}

/// Line subtotal before tax
pub fn line_subtotal(quantity: &BigDecimal, unit_price: &BigDecimal) -> BigDecimal {
    quantity * unit_price
}

/// Document-level GST breakdown for a taxable amount
///
/// Intrastate supplies split the tax equally between CGST and SGST;
/// interstate supplies carry the whole tax as IGST. In both cases
/// `cgst + sgst + igst` equals `amount * rate / 100` exactly, because the
/// halves are derived from the single computed tax total rather than
/// rounded independently.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaxBreakdown {
    /// The untaxed amount, echoed back unchanged
    pub taxable_amount: BigDecimal,
    pub cgst: BigDecimal,
    pub sgst: BigDecimal,
    pub igst: BigDecimal,
    pub total_tax: BigDecimal,
    pub total_with_tax: BigDecimal,
    pub is_interstate: bool,
}

impl TaxBreakdown {
    /// Compute the breakdown for an amount at a percentage rate.
    ///
    /// Zero amount or zero rate yields all-zero tax fields; negative inputs
    /// are rejected.
    pub fn calculate(
        taxable_amount: BigDecimal,
        rate_percent: &BigDecimal,
        is_interstate: bool,
    ) -> Result<Self, GstError> {
        let zero = BigDecimal::from(0);
        if taxable_amount < zero {
            return Err(GstError::NegativeAmount(taxable_amount));
        }
        if *rate_percent < zero {
            return Err(GstError::NegativeRate(rate_percent.clone()));
        }

        let total_tax = (&taxable_amount * rate_percent) / BigDecimal::from(100);
        let (cgst, sgst, igst) = if is_interstate {
            (zero.clone(), zero, total_tax.clone())
        } else {
            let half = &total_tax / BigDecimal::from(2);
            (half.clone(), half, zero)
        };
        let total_with_tax = &taxable_amount + &total_tax;

        Ok(Self {
            taxable_amount,
            cgst,
            sgst,
            igst,
            total_tax,
            total_with_tax,
            is_interstate,
        })
    }
}

/// Per-line GST amounts together with the split rates persisted on
/// document lines
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineTax {
    pub cgst_rate: BigDecimal,
    pub sgst_rate: BigDecimal,
    pub igst_rate: BigDecimal,
    pub cgst_amount: BigDecimal,
    pub sgst_amount: BigDecimal,
    pub igst_amount: BigDecimal,
}

impl LineTax {
    /// Compute line tax amounts and the matching rate split. Intrastate
    /// lines carry half the rate on each of CGST and SGST; interstate lines
    /// carry the whole rate as IGST.
    pub fn calculate(
        line_total: &BigDecimal,
        rate_percent: &BigDecimal,
        is_interstate: bool,
    ) -> Result<Self, GstError> {
        let breakdown = TaxBreakdown::calculate(line_total.clone(), rate_percent, is_interstate)?;

        let zero = BigDecimal::from(0);
        let (cgst_rate, sgst_rate, igst_rate) = if is_interstate {
            (zero.clone(), zero, rate_percent.clone())
        } else {
            let half_rate = rate_percent / BigDecimal::from(2);
            (half_rate.clone(), half_rate, zero)
        };

        Ok(Self {
            cgst_rate,
            sgst_rate,
            igst_rate,
            cgst_amount: breakdown.cgst,
            sgst_amount: breakdown.sgst,
            igst_amount: breakdown.igst,
        })
    }

    /// Total tax carried by the line
    pub fn total(&self) -> BigDecimal {
        &self.cgst_amount + &self.sgst_amount + &self.igst_amount
    }
}

/// GST-related errors
#[derive(Debug, thiserror::Error)]
pub enum GstError {
    #[error("Taxable amount cannot be negative: {0}")]
    NegativeAmount(BigDecimal),
    #[error("GST rate cannot be negative: {0}")]
    NegativeRate(BigDecimal),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn intrastate_breakdown_splits_in_half() {
        let calc = TaxBreakdown::calculate(BigDecimal::from(1000), &BigDecimal::from(18), false)
            .unwrap();

        assert_eq!(calc.taxable_amount, BigDecimal::from(1000));
        assert_eq!(calc.cgst, BigDecimal::from(90));
        assert_eq!(calc.sgst, BigDecimal::from(90));
        assert_eq!(calc.igst, BigDecimal::from(0));
        assert_eq!(calc.total_tax, BigDecimal::from(180));
        assert_eq!(calc.total_with_tax, BigDecimal::from(1180));
    }

    #[test]
    fn interstate_breakdown_is_igst_only() {
        let calc = TaxBreakdown::calculate(BigDecimal::from(1000), &BigDecimal::from(18), true)
            .unwrap();

        assert_eq!(calc.cgst, BigDecimal::from(0));
        assert_eq!(calc.sgst, BigDecimal::from(0));
        assert_eq!(calc.igst, BigDecimal::from(180));
        assert_eq!(calc.total_tax, BigDecimal::from(180));
    }

    #[test]
    fn components_sum_back_to_total_exactly() {
        // Odd rates and amounts must still satisfy cgst + sgst + igst ==
        // amount * rate / 100 with no independent rounding of the halves
        let cases = [
            (BigDecimal::from(999), BigDecimal::from(5)),
            (BigDecimal::from(1), BigDecimal::from(18)),
            ("123.45".parse::<BigDecimal>().unwrap(), "12.5".parse().unwrap()),
            (BigDecimal::from(7), BigDecimal::from(28)),
        ];

        for (amount, rate) in cases {
            let expected = (&amount * &rate) / BigDecimal::from(100);
            for interstate in [false, true] {
                let calc = TaxBreakdown::calculate(amount.clone(), &rate, interstate).unwrap();
                assert_eq!(&calc.cgst + &calc.sgst + &calc.igst, expected.clone());
                if interstate {
                    assert_eq!(calc.cgst, BigDecimal::from(0));
                    assert_eq!(calc.sgst, BigDecimal::from(0));
                } else {
                    assert_eq!(calc.cgst, calc.sgst);
                    assert_eq!(calc.igst, BigDecimal::from(0));
                }
            }
        }
    }

    #[test]
    fn zero_rate_and_zero_amount_are_tax_free() {
        let zero_rate = TaxBreakdown::calculate(BigDecimal::from(500), &BigDecimal::from(0), false)
            .unwrap();
        assert_eq!(zero_rate.total_tax, BigDecimal::from(0));
        assert_eq!(zero_rate.total_with_tax, BigDecimal::from(500));

        let zero_amount = TaxBreakdown::calculate(BigDecimal::from(0), &BigDecimal::from(18), true)
            .unwrap();
        assert_eq!(zero_amount.igst, BigDecimal::from(0));
        assert_eq!(zero_amount.total_with_tax, BigDecimal::from(0));
    }

    #[test]
    fn negative_inputs_are_rejected() {
        assert!(
            TaxBreakdown::calculate(BigDecimal::from(-1), &BigDecimal::from(18), false).is_err()
        );
        assert!(
            TaxBreakdown::calculate(BigDecimal::from(100), &BigDecimal::from(-5), false).is_err()
        );
    }

    #[test]
    fn line_tax_splits_rate_intrastate() {
        let tax = LineTax::calculate(&BigDecimal::from(1000), &BigDecimal::from(18), false)
            .unwrap();

        assert_eq!(tax.cgst_rate, BigDecimal::from(9));
        assert_eq!(tax.sgst_rate, BigDecimal::from(9));
        assert_eq!(tax.igst_rate, BigDecimal::from(0));
        assert_eq!(tax.cgst_amount, BigDecimal::from(90));
        assert_eq!(tax.sgst_amount, BigDecimal::from(90));
        assert_eq!(tax.total(), BigDecimal::from(180));
    }

    #[test]
    fn line_tax_keeps_whole_rate_interstate() {
        let tax = LineTax::calculate(&BigDecimal::from(1000), &BigDecimal::from(18), true)
            .unwrap();

        assert_eq!(tax.cgst_rate, BigDecimal::from(0));
        assert_eq!(tax.sgst_rate, BigDecimal::from(0));
        assert_eq!(tax.igst_rate, BigDecimal::from(18));
        assert_eq!(tax.igst_amount, BigDecimal::from(180));
        assert_eq!(tax.total(), BigDecimal::from(180));
    }

    #[test]
    fn interstate_determination() {
        assert!(is_interstate_supply("Kerala", Some("Tamil Nadu")));
        assert!(!is_interstate_supply("Kerala", Some("kerala")));
        assert!(!is_interstate_supply("Kerala", Some(" Kerala ")));
        // Missing or empty counterparty jurisdiction means intrastate
        assert!(!is_interstate_supply("Kerala", None));
        assert!(!is_interstate_supply("Kerala", Some("")));
        assert!(!is_interstate_supply("Kerala", Some("   ")));
        assert!(!is_interstate_supply("", Some("Tamil Nadu")));
    }

    #[test]
    fn line_subtotal_is_quantity_times_price() {
        let subtotal = line_subtotal(
            &"2.5".parse::<BigDecimal>().unwrap(),
            &BigDecimal::from(400),
        );
        assert_eq!(subtotal, BigDecimal::from(1000));
    }
}
