//! # Product Repository
//!
//! Database operations for the catalog.
//!
//! ## Key Operations
//! - Catalog listing with units sold joined from the ledger
//! - CRUD operations
//! - Stock increments (add/restock) and absolute stock writes (sales)
//!
//! ## Stock Figures
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  products.stock          ← authoritative counter (what's on the shelf)  │
//! │  SUM(transaction_items)  ← total_sold, derived from the ledger          │
//! │                                                                         │
//! │  initial_stock = stock + total_sold   (computed on read, never stored)  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Flavors and sizes live in JSON text columns; [`ProductRow`] converts
//! them on the way out.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use fizz_core::validation::{validate_product_draft, validate_stock_amount, validate_stock_level};
use fizz_core::{CatalogEntry, Product, ProductDraft, SizeVariant};

const PRODUCT_COLUMNS: &str = "p.id, p.sku, p.name, p.description, p.category, p.price_cents, \
     p.stock, p.is_customizable, p.flavors, p.sizes, p.image, p.created_at, p.updated_at";

// =============================================================================
// Row Mapping
// =============================================================================

#[derive(Debug, sqlx::FromRow)]
struct ProductRow {
    id: String,
    sku: String,
    name: String,
    description: Option<String>,
    category: String,
    price_cents: i64,
    stock: i64,
    is_customizable: bool,
    flavors: String,
    sizes: String,
    image: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<ProductRow> for Product {
    type Error = DbError;

    fn try_from(row: ProductRow) -> DbResult<Self> {
        let flavors: Vec<String> = serde_json::from_str(&row.flavors)?;
        let sizes: Vec<SizeVariant> = serde_json::from_str(&row.sizes)?;

        Ok(Product {
            id: row.id,
            sku: row.sku,
            name: row.name,
            description: row.description,
            category: row.category,
            price_cents: row.price_cents,
            stock: row.stock,
            is_customizable: row.is_customizable,
            flavors,
            sizes,
            image: row.image,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct CatalogRow {
    #[sqlx(flatten)]
    product: ProductRow,
    total_sold: i64,
}

fn clean_optional(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Size labels are stored trimmed so cart lookups match them exactly.
fn clean_sizes(sizes: &[SizeVariant]) -> Vec<SizeVariant> {
    sizes
        .iter()
        .map(|s| SizeVariant {
            label: s.label.trim().to_string(),
            ..s.clone()
        })
        .collect()
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for product database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = ProductRepository::new(pool);
///
/// let catalog = repo.list().await?;          // sorted by name, with total_sold
/// let product = repo.get_by_id("uuid").await?;
/// let product = repo.add_stock("uuid", 12).await?;
/// ```
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    /// Creates a new ProductRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    /// Lists the whole catalog sorted by name, each product paired with
    /// the units the ledger says were sold.
    pub async fn list(&self) -> DbResult<Vec<CatalogEntry>> {
        let sql = format!(
            "SELECT {PRODUCT_COLUMNS}, \
                COALESCE((SELECT SUM(ti.quantity) FROM transaction_items ti \
                          WHERE ti.product_id = p.id), 0) AS total_sold \
             FROM products p \
             ORDER BY p.name ASC, p.sku ASC"
        );

        let rows: Vec<CatalogRow> = sqlx::query_as(&sql).fetch_all(&self.pool).await?;

        let entries = rows
            .into_iter()
            .map(|row| Ok(CatalogEntry::new(Product::try_from(row.product)?, row.total_sold)))
            .collect::<DbResult<Vec<_>>>()?;

        debug!(count = entries.len(), "Listed catalog");
        Ok(entries)
    }

    /// Lists products sorted by name, without ledger totals.
    pub async fn list_products(&self) -> DbResult<Vec<Product>> {
        let sql = format!("SELECT {PRODUCT_COLUMNS} FROM products p ORDER BY p.name ASC, p.sku ASC");

        let rows: Vec<ProductRow> = sqlx::query_as(&sql).fetch_all(&self.pool).await?;
        rows.into_iter().map(Product::try_from).collect()
    }

    /// Gets a product by its ID.
    ///
    /// ## Returns
    /// * `Ok(Some(Product))` - Product found
    /// * `Ok(None)` - Product not found
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Product>> {
        let sql = format!("SELECT {PRODUCT_COLUMNS} FROM products p WHERE p.id = ?1");

        let row: Option<ProductRow> = sqlx::query_as(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(Product::try_from).transpose()
    }

    /// Gets a product by its SKU.
    pub async fn get_by_sku(&self, sku: &str) -> DbResult<Option<Product>> {
        let sql = format!("SELECT {PRODUCT_COLUMNS} FROM products p WHERE p.sku = ?1");

        let row: Option<ProductRow> = sqlx::query_as(&sql)
            .bind(sku.trim())
            .fetch_optional(&self.pool)
            .await?;

        row.map(Product::try_from).transpose()
    }

    /// Fetches several products at once, keyed by ID.
    ///
    /// IDs with no matching row are simply absent from the map.
    pub async fn get_many(&self, ids: &[String]) -> DbResult<HashMap<String, Product>> {
        let mut found = HashMap::with_capacity(ids.len());
        for id in ids {
            if found.contains_key(id) {
                continue;
            }
            if let Some(product) = self.get_by_id(id).await? {
                found.insert(id.clone(), product);
            }
        }
        Ok(found)
    }

    /// Creates a product from a validated draft.
    ///
    /// ## Returns
    /// * `Ok(Product)` - The stored product with generated ID and timestamps
    /// * `Err(DbError::Validation)` - Draft failed validation
    /// * `Err(DbError::UniqueViolation)` - SKU already exists
    pub async fn create(&self, draft: &ProductDraft) -> DbResult<Product> {
        validate_product_draft(draft)?;

        let now = Utc::now();
        let product = Product {
            id: generate_product_id(),
            sku: draft.sku.trim().to_string(),
            name: draft.name.trim().to_string(),
            description: clean_optional(&draft.description),
            category: draft.category.trim().to_string(),
            price_cents: draft.price_cents,
            stock: draft.stock,
            is_customizable: draft.is_customizable,
            flavors: draft.flavors.iter().map(|f| f.trim().to_string()).collect(),
            sizes: clean_sizes(&draft.sizes),
            image: clean_optional(&draft.image),
            created_at: now,
            updated_at: now,
        };

        self.insert(&product).await
    }

    /// Inserts a fully-formed product (seeding, imports).
    pub async fn insert(&self, product: &Product) -> DbResult<Product> {
        debug!(sku = %product.sku, "Inserting product");

        let flavors = serde_json::to_string(&product.flavors)?;
        let sizes = serde_json::to_string(&product.sizes)?;

        sqlx::query(
            r#"
            INSERT INTO products (
                id, sku, name, description, category,
                price_cents, stock, is_customizable,
                flavors, sizes, image, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)
            "#,
        )
        .bind(&product.id)
        .bind(&product.sku)
        .bind(&product.name)
        .bind(&product.description)
        .bind(&product.category)
        .bind(product.price_cents)
        .bind(product.stock)
        .bind(product.is_customizable)
        .bind(flavors)
        .bind(sizes)
        .bind(&product.image)
        .bind(product.created_at)
        .bind(product.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| match DbError::from(e) {
            DbError::UniqueViolation { field, .. } => DbError::duplicate(field, &product.sku),
            other => other,
        })?;

        info!(id = %product.id, sku = %product.sku, "Product created");
        Ok(product.clone())
    }

    /// Replaces the editable fields of a product.
    ///
    /// Past transactions are untouched: their lines carry snapshots.
    pub async fn update(&self, id: &str, draft: &ProductDraft) -> DbResult<Product> {
        validate_product_draft(draft)?;
        debug!(id = %id, "Updating product");

        let flavors: Vec<String> = draft.flavors.iter().map(|f| f.trim().to_string()).collect();
        let flavors = serde_json::to_string(&flavors)?;
        let sizes = serde_json::to_string(&clean_sizes(&draft.sizes))?;
        let sku = draft.sku.trim();

        let result = sqlx::query(
            r#"
            UPDATE products SET
                sku = ?2,
                name = ?3,
                description = ?4,
                category = ?5,
                price_cents = ?6,
                stock = ?7,
                is_customizable = ?8,
                flavors = ?9,
                sizes = ?10,
                image = ?11,
                updated_at = ?12
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .bind(sku)
        .bind(draft.name.trim())
        .bind(clean_optional(&draft.description))
        .bind(draft.category.trim())
        .bind(draft.price_cents)
        .bind(draft.stock)
        .bind(draft.is_customizable)
        .bind(flavors)
        .bind(sizes)
        .bind(clean_optional(&draft.image))
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(|e| match DbError::from(e) {
            DbError::UniqueViolation { field, .. } => DbError::duplicate(field, sku),
            other => other,
        })?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }

        self.require(id).await
    }

    /// Removes a product from the catalog.
    ///
    /// Ledger lines that reference it keep their snapshots.
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "Deleting product");

        let result = sqlx::query("DELETE FROM products WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }

        info!(id = %id, "Product deleted");
        Ok(())
    }

    /// Increments stock by `amount` and returns the updated product.
    ///
    /// ## Returns
    /// * `Err(DbError::Validation)` - `amount <= 0`, nothing written
    /// * `Err(DbError::NotFound)` - Product doesn't exist
    pub async fn add_stock(&self, id: &str, amount: i64) -> DbResult<Product> {
        validate_stock_amount(amount)?;
        debug!(id = %id, amount = amount, "Adding stock");

        let result = sqlx::query(
            r#"
            UPDATE products
            SET stock = stock + ?2, updated_at = ?3
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .bind(amount)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }

        self.require(id).await
    }

    /// Records a restock delivery.
    ///
    /// Raises the stock counter exactly like [`add_stock`](Self::add_stock);
    /// since the initial-stock figure is derived as `stock + total_sold`, it
    /// rises by the same amount.
    pub async fn restock(&self, id: &str, amount: i64) -> DbResult<()> {
        let product = self.add_stock(id, amount).await?;
        info!(id = %id, amount = amount, stock = product.stock, "Product restocked");
        Ok(())
    }

    /// Writes an absolute stock level.
    ///
    /// Used by sale reconciliation, which computes the target from a fresh
    /// read so that a retried write lands on the same value.
    pub async fn set_stock(&self, id: &str, stock: i64) -> DbResult<()> {
        validate_stock_level(stock)?;
        debug!(id = %id, stock = stock, "Setting stock");

        let result = sqlx::query("UPDATE products SET stock = ?2, updated_at = ?3 WHERE id = ?1")
            .bind(id)
            .bind(stock)
            .bind(Utc::now())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }

        Ok(())
    }

    /// Counts total products (for diagnostics and the seed binary).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    async fn require(&self, id: &str) -> DbResult<Product> {
        self.get_by_id(id)
            .await?
            .ok_or_else(|| DbError::not_found("Product", id))
    }
}

/// Helper to generate a new product ID.
pub fn generate_product_id() -> String {
    Uuid::new_v4().to_string()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Database, DbConfig};
    use fizz_core::cart::Cart;
    use fizz_core::{Money, ValidationError};

    async fn db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    fn draft(name: &str, sku: &str, stock: i64) -> ProductDraft {
        ProductDraft {
            name: name.to_string(),
            sku: sku.to_string(),
            description: Some("  ".to_string()),
            category: "Soda".to_string(),
            price_cents: 2500,
            stock,
            is_customizable: true,
            flavors: vec![" Mango ".to_string(), "Lychee".to_string()],
            sizes: vec![
                SizeVariant::new("12oz", Money::from_cents(2500), "Regular"),
                SizeVariant::new("16oz", Money::from_cents(3500), "Large"),
            ],
            image: None,
        }
    }

    #[tokio::test]
    async fn test_create_and_get() {
        let db = db().await;
        let repo = db.products();

        let created = repo.create(&draft("Fruity Soda", "FS001", 20)).await.unwrap();
        assert_eq!(created.flavors, vec!["Mango", "Lychee"]);
        assert_eq!(created.description, None);

        let fetched = repo.get_by_id(&created.id).await.unwrap().unwrap();
        assert_eq!(fetched.sku, "FS001");
        assert_eq!(fetched.sizes.len(), 2);
        assert_eq!(fetched.sizes[1].price_cents, 3500);
        assert!(fetched.is_customizable);

        let by_sku = repo.get_by_sku("FS001").await.unwrap().unwrap();
        assert_eq!(by_sku.id, created.id);

        assert!(repo.get_by_id("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_sku_rejected() {
        let db = db().await;
        let repo = db.products();

        repo.create(&draft("Fruity Soda", "FS001", 20)).await.unwrap();
        let err = repo.create(&draft("Other", "FS001", 5)).await.unwrap_err();

        match err {
            DbError::UniqueViolation { value, .. } => assert_eq!(value, "FS001"),
            other => panic!("expected UniqueViolation, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_invalid_draft_writes_nothing() {
        let db = db().await;
        let repo = db.products();

        let mut bad = draft("Fruity Soda", "FS001", 20);
        bad.price_cents = -1;

        assert!(matches!(repo.create(&bad).await, Err(DbError::Validation(_))));
        assert_eq!(repo.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_list_sorted_by_name() {
        let db = db().await;
        let repo = db.products();

        repo.create(&draft("Zesty Lime", "FS003", 1)).await.unwrap();
        repo.create(&draft("Apple Fizz", "FS002", 1)).await.unwrap();
        repo.create(&draft("Mango Pop", "FS001", 1)).await.unwrap();

        let names: Vec<String> = repo
            .list()
            .await
            .unwrap()
            .into_iter()
            .map(|e| e.product.name)
            .collect();
        assert_eq!(names, vec!["Apple Fizz", "Mango Pop", "Zesty Lime"]);
    }

    #[tokio::test]
    async fn test_update_replaces_fields() {
        let db = db().await;
        let repo = db.products();
        let created = repo.create(&draft("Fruity Soda", "FS001", 20)).await.unwrap();

        let mut edit = draft("Fruity Soda Classic", "FS001", 18);
        edit.flavors = vec!["Grape".to_string()];
        let updated = repo.update(&created.id, &edit).await.unwrap();

        assert_eq!(updated.name, "Fruity Soda Classic");
        assert_eq!(updated.stock, 18);
        assert_eq!(updated.flavors, vec!["Grape"]);
        assert!(updated.updated_at >= created.updated_at);

        assert!(matches!(
            repo.update("missing", &edit).await,
            Err(DbError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_padded_size_labels_stored_trimmed() {
        let db = db().await;
        let repo = db.products();

        let mut padded = draft("Fruity Soda", "FS001", 20);
        padded.sizes = vec![SizeVariant::new(" 16oz", Money::from_cents(3500), "Large")];
        let created = repo.create(&padded).await.unwrap();

        let fetched = repo.get_by_id(&created.id).await.unwrap().unwrap();
        assert_eq!(fetched.sizes[0].label, "16oz");

        let mut cart = Cart::new();
        cart.add(&fetched, Some("Mango"), Some("16oz")).unwrap();
        cart.add(&fetched, Some("Mango"), Some(" 16oz")).unwrap();
        assert_eq!(cart.line_count(), 1);
        assert_eq!(cart.subtotal().cents(), 7000);

        let mut edit = draft("Fruity Soda", "FS001", 20);
        edit.sizes = vec![SizeVariant::new("22oz  ", Money::from_cents(4500), "Huge")];
        let updated = repo.update(&created.id, &edit).await.unwrap();
        assert_eq!(updated.sizes[0].label, "22oz");
        assert!(updated.size("22oz").is_some());
    }

    #[tokio::test]
    async fn test_delete() {
        let db = db().await;
        let repo = db.products();
        let created = repo.create(&draft("Fruity Soda", "FS001", 20)).await.unwrap();

        repo.delete(&created.id).await.unwrap();
        assert!(repo.get_by_id(&created.id).await.unwrap().is_none());
        assert!(matches!(
            repo.delete(&created.id).await,
            Err(DbError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_add_stock_and_restock() {
        let db = db().await;
        let repo = db.products();
        let created = repo.create(&draft("Fruity Soda", "FS001", 20)).await.unwrap();

        let after = repo.add_stock(&created.id, 5).await.unwrap();
        assert_eq!(after.stock, 25);

        repo.restock(&created.id, 10).await.unwrap();
        let after = repo.get_by_id(&created.id).await.unwrap().unwrap();
        assert_eq!(after.stock, 35);

        assert!(matches!(
            repo.add_stock(&created.id, 0).await,
            Err(DbError::Validation(ValidationError::MustBePositive { .. }))
        ));
        assert!(matches!(
            repo.add_stock("missing", 1).await,
            Err(DbError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_set_stock() {
        let db = db().await;
        let repo = db.products();
        let created = repo.create(&draft("Fruity Soda", "FS001", 20)).await.unwrap();

        repo.set_stock(&created.id, 17).await.unwrap();
        assert_eq!(repo.get_by_id(&created.id).await.unwrap().unwrap().stock, 17);

        // same value twice is harmless
        repo.set_stock(&created.id, 17).await.unwrap();
        assert_eq!(repo.get_by_id(&created.id).await.unwrap().unwrap().stock, 17);

        assert!(repo.set_stock(&created.id, -1).await.is_err());
    }

    #[tokio::test]
    async fn test_get_many_skips_missing() {
        let db = db().await;
        let repo = db.products();
        let a = repo.create(&draft("A", "FS001", 1)).await.unwrap();
        let b = repo.create(&draft("B", "FS002", 1)).await.unwrap();

        let found = repo
            .get_many(&[a.id.clone(), "gone".to_string(), b.id.clone(), a.id.clone()])
            .await
            .unwrap();

        assert_eq!(found.len(), 2);
        assert!(found.contains_key(&a.id));
        assert!(found.contains_key(&b.id));
    }

    #[tokio::test]
    async fn test_list_without_sales_has_zero_sold() {
        let db = db().await;
        let repo = db.products();
        repo.create(&draft("Fruity Soda", "FS001", 20)).await.unwrap();

        let entry = &repo.list().await.unwrap()[0];
        assert_eq!(entry.total_sold, 0);
        assert_eq!(entry.current_stock, 20);
        assert_eq!(entry.initial_stock, 20);
    }
}
