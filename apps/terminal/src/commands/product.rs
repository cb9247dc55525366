//! # Product Commands
//!
//! Catalog management: listing with sold counts, CRUD, stock top-ups and
//! the ingredient cost side ledger.
//!
//! ## Restock Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  restock(id, amount, cost?)                                             │
//! │       │                                                                 │
//! │       ├── amount <= 0 or cost < 0 ──► VALIDATION_ERROR (no I/O)         │
//! │       ▼                                                                 │
//! │  products.restock(id, amount)       stock += amount                     │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  cost > 0 ? ingredients.record(id, amount, cost)                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use fizz_core::validation::{validate_ingredient_cost, validate_stock_amount};
use fizz_core::{CatalogEntry, IngredientPurchase, Money, Product, ProductDraft};
use tracing::{debug, info};

use crate::error::ApiError;
use crate::state::DbState;

/// Every product, by name, with sold counts and both stock views.
pub async fn list_products(db: &DbState) -> Result<Vec<CatalogEntry>, ApiError> {
    debug!("list_products command");

    let entries = db.inner().products().list().await?;

    debug!(count = entries.len(), "Products listed");
    Ok(entries)
}

pub async fn get_product(db: &DbState, id: String) -> Result<Product, ApiError> {
    debug!(id = %id, "get_product command");

    db.inner()
        .products()
        .get_by_id(&id)
        .await?
        .ok_or_else(|| ApiError::not_found("Product", &id))
}

pub async fn get_product_by_sku(db: &DbState, sku: String) -> Result<Product, ApiError> {
    debug!(sku = %sku, "get_product_by_sku command");

    db.inner()
        .products()
        .get_by_sku(&sku)
        .await?
        .ok_or_else(|| ApiError::not_found("Product", &sku))
}

pub async fn create_product(db: &DbState, draft: ProductDraft) -> Result<Product, ApiError> {
    debug!(sku = %draft.sku, "create_product command");

    let product = db.inner().products().create(&draft).await?;

    info!(id = %product.id, sku = %product.sku, "Product created");
    Ok(product)
}

pub async fn update_product(
    db: &DbState,
    id: String,
    draft: ProductDraft,
) -> Result<Product, ApiError> {
    debug!(id = %id, "update_product command");

    let product = db.inner().products().update(&id, &draft).await?;

    info!(id = %product.id, "Product updated");
    Ok(product)
}

/// Removes a product from the catalog. Its past sales stay in the ledger.
pub async fn delete_product(db: &DbState, id: String) -> Result<(), ApiError> {
    debug!(id = %id, "delete_product command");

    db.inner().products().delete(&id).await?;

    info!(id = %id, "Product deleted");
    Ok(())
}

pub async fn add_stock(db: &DbState, id: String, amount: i64) -> Result<Product, ApiError> {
    debug!(id = %id, amount, "add_stock command");

    let product = db.inner().products().add_stock(&id, amount).await?;

    info!(id = %id, amount, stock = product.stock, "Stock added");
    Ok(product)
}

/// Records a delivery, optionally with what the ingredients cost.
///
/// A zero cost records nothing in the side ledger.
pub async fn restock(
    db: &DbState,
    id: String,
    amount: i64,
    cost: Option<Money>,
) -> Result<(), ApiError> {
    debug!(id = %id, amount, "restock command");

    validate_stock_amount(amount)?;
    if let Some(cost) = cost {
        validate_ingredient_cost(amount, cost.cents())?;
    }

    let db = db.inner();
    db.products().restock(&id, amount).await?;

    if let Some(cost) = cost.filter(|c| c.cents() > 0) {
        db.ingredients().record(&id, amount, cost).await?;
    }

    Ok(())
}

pub async fn record_ingredient_cost(
    db: &DbState,
    product_id: String,
    quantity: i64,
    cost: Money,
) -> Result<IngredientPurchase, ApiError> {
    debug!(product_id = %product_id, quantity, "record_ingredient_cost command");

    Ok(db.inner().ingredients().record(&product_id, quantity, cost).await?)
}

pub async fn total_ingredient_cost(db: &DbState) -> Result<Money, ApiError> {
    Ok(db.inner().ingredients().total_cost().await?)
}

pub async fn product_count(db: &DbState) -> Result<i64, ApiError> {
    Ok(db.inner().products().count().await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use crate::test_support::{create, plain_draft, soda_draft, terminal};

    #[tokio::test]
    async fn test_create_and_list() {
        let t = terminal().await;
        create_product(&t.db, plain_draft("B2", "Banana Chips", 4000, 3)).await.unwrap();
        create_product(&t.db, soda_draft(10)).await.unwrap();

        let entries = list_products(&t.db).await.unwrap();
        let names: Vec<_> = entries.iter().map(|e| e.product.name.as_str()).collect();
        assert_eq!(names, vec!["Banana Chips", "Fruity Soda"]);
        assert_eq!(entries[1].initial_stock, 10);
        assert_eq!(product_count(&t.db).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_create_requires_name_and_sku() {
        let t = terminal().await;

        let err = create_product(&t.db, plain_draft("", "Nameless SKU", 100, 1))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);

        let err = create_product(&t.db, plain_draft("X1", "  ", 100, 1))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
        assert_eq!(product_count(&t.db).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_create_rejects_price_above_ceiling() {
        let t = terminal().await;

        let err = create_product(&t.db, plain_draft("BIG1", "Big", i64::MAX / 2 + 1, 10))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
        assert_eq!(product_count(&t.db).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_duplicate_sku() {
        let t = terminal().await;
        create_product(&t.db, soda_draft(10)).await.unwrap();

        let err = create_product(&t.db, soda_draft(5)).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
        assert!(err.message.contains("FS001"));
    }

    #[tokio::test]
    async fn test_get_update_delete() {
        let t = terminal().await;
        let product = create(&t, soda_draft(10)).await;

        let by_sku = get_product_by_sku(&t.db, "FS001".to_string()).await.unwrap();
        assert_eq!(by_sku.id, product.id);

        let mut draft = soda_draft(10);
        draft.name = "Fruity Soda Deluxe".to_string();
        let updated = update_product(&t.db, product.id.clone(), draft).await.unwrap();
        assert_eq!(updated.name, "Fruity Soda Deluxe");

        delete_product(&t.db, product.id.clone()).await.unwrap();
        let err = get_product(&t.db, product.id).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn test_add_stock_rejects_non_positive() {
        let t = terminal().await;
        let product = create(&t, soda_draft(10)).await;

        let err = add_stock(&t.db, product.id.clone(), 0).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);

        let product = add_stock(&t.db, product.id, 5).await.unwrap();
        assert_eq!(product.stock, 15);
    }

    #[tokio::test]
    async fn test_restock_with_cost() {
        let t = terminal().await;
        let product = create(&t, soda_draft(10)).await;

        restock(&t.db, product.id.clone(), 20, Some(Money::from_cents(30000)))
            .await
            .unwrap();
        restock(&t.db, product.id.clone(), 5, Some(Money::zero()))
            .await
            .unwrap();

        let product = get_product(&t.db, product.id).await.unwrap();
        assert_eq!(product.stock, 35);
        assert_eq!(total_ingredient_cost(&t.db).await.unwrap().cents(), 30000);
    }

    #[tokio::test]
    async fn test_restock_validates_before_writing() {
        let t = terminal().await;
        let product = create(&t, soda_draft(10)).await;

        let err = restock(&t.db, product.id.clone(), 5, Some(Money::from_cents(-1)))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);

        let err = restock(&t.db, product.id.clone(), -2, None).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);

        assert_eq!(get_product(&t.db, product.id).await.unwrap().stock, 10);
    }

    #[tokio::test]
    async fn test_record_ingredient_cost() {
        let t = terminal().await;
        let product = create(&t, soda_draft(10)).await;

        let purchase = record_ingredient_cost(&t.db, product.id, 12, Money::from_cents(15050))
            .await
            .unwrap();
        assert_eq!(purchase.cost_cents, 15050);
        assert_eq!(total_ingredient_cost(&t.db).await.unwrap().cents(), 15050);
    }
}
