//! Catalog management and manual stock adjustments

use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::traits::BillingStore;
use crate::types::*;
use crate::utils::validation;

/// Typed request for adding a catalog item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewProduct {
    pub name: String,
    pub description: Option<String>,
    pub sku: String,
    pub cost_price: BigDecimal,
    pub selling_price: BigDecimal,
    /// Opening on-hand quantity
    pub quantity: BigDecimal,
    pub reorder_level: BigDecimal,
    pub unit: String,
    pub hsn_code: Option<String>,
    pub gst_rate: BigDecimal,
}

/// Manager for catalog items and the stock ledger
pub struct InventoryManager<S: BillingStore> {
    pub(crate) storage: S,
}

impl<S: BillingStore> InventoryManager<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    /// Add a catalog item. The SKU must be unique across the catalog.
    pub async fn create_product(
        &mut self,
        new_product: NewProduct,
        actor: &str,
    ) -> BillingResult<Product> {
        validation::validate_party_name(&new_product.name)?;
        validation::validate_sku(&new_product.sku)?;
        validation::validate_non_negative_amount(&new_product.cost_price)?;
        validation::validate_non_negative_amount(&new_product.selling_price)?;
        validation::validate_non_negative_amount(&new_product.quantity)?;
        validation::validate_non_negative_amount(&new_product.gst_rate)?;

        if self
            .storage
            .get_product_by_sku(&new_product.sku)
            .await?
            .is_some()
        {
            return Err(BillingError::Validation(format!(
                "Product with SKU '{}' already exists",
                new_product.sku
            )));
        }

        let now = chrono::Utc::now().naive_utc();
        let product = Product {
            id: new_id(),
            name: new_product.name,
            description: new_product.description,
            sku: new_product.sku,
            cost_price: new_product.cost_price,
            selling_price: new_product.selling_price,
            quantity: new_product.quantity,
            reorder_level: new_product.reorder_level,
            unit: new_product.unit,
            hsn_code: new_product.hsn_code,
            gst_rate: new_product.gst_rate,
            created_by: actor.to_string(),
            created_at: now,
            updated_at: now,
        };
        self.storage.save_product(&product).await?;
        Ok(product)
    }

    /// Update a catalog item in place
    pub async fn update_product(&mut self, product: &Product) -> BillingResult<()> {
        validation::validate_party_name(&product.name)?;
        validation::validate_sku(&product.sku)?;

        if self.storage.get_product(&product.id).await?.is_none() {
            return Err(BillingError::ProductNotFound(product.id.clone()));
        }

        self.storage.update_product(product).await
    }

    pub async fn get_product(&self, product_id: &str) -> BillingResult<Option<Product>> {
        self.storage.get_product(product_id).await
    }

    pub async fn get_product_by_sku(&self, sku: &str) -> BillingResult<Option<Product>> {
        self.storage.get_product_by_sku(sku).await
    }

    pub async fn list_products(&self) -> BillingResult<Vec<Product>> {
        self.storage.list_products().await
    }

    /// Apply a manual correction to the on-hand quantity. The signed change
    /// is recorded in the stock ledger as an adjustment entry.
    pub async fn adjust_stock(
        &mut self,
        product_id: &str,
        change: BigDecimal,
        reason: Option<String>,
        actor: &str,
    ) -> BillingResult<Product> {
        if change == BigDecimal::from(0) {
            return Err(BillingError::Validation(
                "Stock adjustment cannot be zero".to_string(),
            ));
        }

        let mut product = self
            .storage
            .get_product(product_id)
            .await?
            .ok_or_else(|| BillingError::ProductNotFound(product_id.to_string()))?;

        product.quantity += &change;
        product.updated_at = chrono::Utc::now().naive_utc();
        self.storage.update_product(&product).await?;

        let movement = StockMovement::new(
            product_id,
            MovementType::Adjustment,
            change.clone(),
            reason,
            actor,
        );
        self.storage.save_stock_movement(&movement).await?;

        info!(product_id, change = %change, "stock adjusted");
        Ok(product)
    }

    /// Catalog items at or below their reorder level
    pub async fn low_stock(&self) -> BillingResult<Vec<Product>> {
        let products = self.storage.list_products().await?;
        Ok(products
            .into_iter()
            .filter(|p| p.quantity <= p.reorder_level)
            .collect())
    }

    pub async fn stock_movements(
        &self,
        product_id: Option<&str>,
    ) -> BillingResult<Vec<StockMovement>> {
        self.storage.list_stock_movements(product_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::memory_store::MemoryStore;

    fn widget() -> NewProduct {
        NewProduct {
            name: "Widget".to_string(),
            description: None,
            sku: "WID-1".to_string(),
            cost_price: BigDecimal::from(300),
            selling_price: BigDecimal::from(500),
            quantity: BigDecimal::from(8),
            reorder_level: BigDecimal::from(10),
            unit: "pcs".to_string(),
            hsn_code: None,
            gst_rate: BigDecimal::from(18),
        }
    }

    #[tokio::test]
    async fn duplicate_sku_rejected() {
        let store = MemoryStore::new();
        let mut inventory = InventoryManager::new(store);

        inventory.create_product(widget(), "op1").await.unwrap();
        let err = inventory.create_product(widget(), "op1").await.unwrap_err();
        assert!(matches!(err, BillingError::Validation(_)));
    }

    #[tokio::test]
    async fn adjustment_moves_quantity_and_writes_ledger() {
        let store = MemoryStore::new();
        let mut inventory = InventoryManager::new(store);

        let product = inventory.create_product(widget(), "op1").await.unwrap();

        let adjusted = inventory
            .adjust_stock(
                &product.id,
                BigDecimal::from(-3),
                Some("damaged in transit".to_string()),
                "op1",
            )
            .await
            .unwrap();
        assert_eq!(adjusted.quantity, BigDecimal::from(5));

        let movements = inventory.stock_movements(Some(&product.id)).await.unwrap();
        assert_eq!(movements.len(), 1);
        assert_eq!(movements[0].movement, MovementType::Adjustment);
        assert_eq!(movements[0].quantity, BigDecimal::from(-3));

        let err = inventory
            .adjust_stock(&product.id, BigDecimal::from(0), None, "op1")
            .await
            .unwrap_err();
        assert!(matches!(err, BillingError::Validation(_)));
    }

    #[tokio::test]
    async fn low_stock_uses_reorder_level() {
        let store = MemoryStore::new();
        let mut inventory = InventoryManager::new(store);

        inventory.create_product(widget(), "op1").await.unwrap();
        let mut plenty = widget();
        plenty.sku = "WID-2".to_string();
        plenty.quantity = BigDecimal::from(100);
        inventory.create_product(plenty, "op1").await.unwrap();

        let low = inventory.low_stock().await.unwrap();
        assert_eq!(low.len(), 1);
        assert_eq!(low[0].sku, "WID-1");
    }
}
