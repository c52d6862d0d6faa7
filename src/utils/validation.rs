//! Field-level validation helpers

use crate::types::*;
use bigdecimal::BigDecimal;

/// Validate that a monetary amount is strictly positive
pub fn validate_positive_amount(amount: &BigDecimal) -> BillingResult<()> {
    if *amount <= BigDecimal::from(0) {
        Err(BillingError::Validation(
            "Amount must be greater than 0".to_string(),
        ))
    } else {
        Ok(())
    }
}

/// Validate that a monetary amount is zero or more
pub fn validate_non_negative_amount(amount: &BigDecimal) -> BillingResult<()> {
    if *amount < BigDecimal::from(0) {
        Err(BillingError::Validation(
            "Amount cannot be negative".to_string(),
        ))
    } else {
        Ok(())
    }
}

/// Validate that a line quantity is strictly positive
pub fn validate_positive_quantity(quantity: &BigDecimal) -> BillingResult<()> {
    if *quantity <= BigDecimal::from(0) {
        Err(BillingError::Validation(
            "Quantity must be greater than 0".to_string(),
        ))
    } else {
        Ok(())
    }
}

/// Validate a stock-keeping unit
pub fn validate_sku(sku: &str) -> BillingResult<()> {
    if sku.trim().is_empty() {
        return Err(BillingError::Validation("SKU cannot be empty".to_string()));
    }

    if sku.len() > 64 {
        return Err(BillingError::Validation(
            "SKU cannot exceed 64 characters".to_string(),
        ));
    }

    if !sku
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-' || c == '_')
    {
        return Err(BillingError::Validation(
            "SKU can only contain alphanumeric characters, dashes, and underscores".to_string(),
        ));
    }

    Ok(())
}

/// Validate a customer, supplier, or product display name
pub fn validate_party_name(name: &str) -> BillingResult<()> {
    if name.trim().is_empty() {
        return Err(BillingError::Validation(
            "Name cannot be empty".to_string(),
        ));
    }

    if name.len() > 100 {
        return Err(BillingError::Validation(
            "Name cannot exceed 100 characters".to_string(),
        ));
    }

    Ok(())
}

/// Validate a cash-book category label
pub fn validate_category(category: &str) -> BillingResult<()> {
    if category.trim().is_empty() {
        return Err(BillingError::Validation(
            "Category cannot be empty".to_string(),
        ));
    }

    if category.len() > 100 {
        return Err(BillingError::Validation(
            "Category cannot exceed 100 characters".to_string(),
        ));
    }

    Ok(())
}
