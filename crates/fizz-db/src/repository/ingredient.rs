//! # Ingredient Repository
//!
//! Cost-of-goods entries recorded when stock is bought in. The dashboard
//! subtracts their sum from sales to show net profit.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::DbResult;
use fizz_core::validation::validate_ingredient_cost;
use fizz_core::{IngredientPurchase, Money};

#[derive(Debug, sqlx::FromRow)]
struct PurchaseRow {
    id: String,
    product_id: String,
    quantity: i64,
    cost_cents: i64,
    created_at: DateTime<Utc>,
}

impl From<PurchaseRow> for IngredientPurchase {
    fn from(row: PurchaseRow) -> Self {
        IngredientPurchase {
            id: row.id,
            product_id: row.product_id,
            quantity: row.quantity,
            cost_cents: row.cost_cents,
            created_at: row.created_at,
        }
    }
}

/// Repository for ingredient purchase records.
#[derive(Debug, Clone)]
pub struct IngredientRepository {
    pool: SqlitePool,
}

impl IngredientRepository {
    pub fn new(pool: SqlitePool) -> Self {
        IngredientRepository { pool }
    }

    /// Records what was paid for `quantity` units of a product's ingredients.
    pub async fn record(
        &self,
        product_id: &str,
        quantity: i64,
        cost: Money,
    ) -> DbResult<IngredientPurchase> {
        validate_ingredient_cost(quantity, cost.cents())?;

        let purchase = IngredientPurchase {
            id: Uuid::new_v4().to_string(),
            product_id: product_id.to_string(),
            quantity,
            cost_cents: cost.cents(),
            created_at: Utc::now(),
        };

        sqlx::query(
            r#"
            INSERT INTO ingredient_purchases (id, product_id, quantity, cost_cents, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
        )
        .bind(&purchase.id)
        .bind(&purchase.product_id)
        .bind(purchase.quantity)
        .bind(purchase.cost_cents)
        .bind(purchase.created_at)
        .execute(&self.pool)
        .await?;

        info!(product_id = %product_id, quantity, cost = %cost, "Ingredient cost recorded");
        Ok(purchase)
    }

    /// Sum of every recorded ingredient cost.
    pub async fn total_cost(&self) -> DbResult<Money> {
        let cents: i64 =
            sqlx::query_scalar("SELECT COALESCE(SUM(cost_cents), 0) FROM ingredient_purchases")
                .fetch_one(&self.pool)
                .await?;

        Ok(Money::from_cents(cents))
    }

    /// Purchases for one product, newest first.
    pub async fn list_for_product(&self, product_id: &str) -> DbResult<Vec<IngredientPurchase>> {
        debug!(product_id = %product_id, "Listing ingredient purchases");

        let rows: Vec<PurchaseRow> = sqlx::query_as(
            r#"
            SELECT id, product_id, quantity, cost_cents, created_at
            FROM ingredient_purchases
            WHERE product_id = ?1
            ORDER BY created_at DESC
            "#,
        )
        .bind(product_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(IngredientPurchase::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Database, DbConfig, DbError};

    #[tokio::test]
    async fn test_record_and_total() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.ingredients();

        assert_eq!(repo.total_cost().await.unwrap(), Money::zero());

        repo.record("p1", 24, Money::from_cents(30000)).await.unwrap();
        repo.record("p2", 12, Money::from_cents(15050)).await.unwrap();
        repo.record("p1", 6, Money::zero()).await.unwrap();

        assert_eq!(repo.total_cost().await.unwrap(), Money::from_cents(45050));
        assert_eq!(repo.list_for_product("p1").await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_invalid_entries_rejected() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.ingredients();

        assert!(matches!(
            repo.record("p1", 0, Money::from_cents(100)).await,
            Err(DbError::Validation(_))
        ));
        assert!(matches!(
            repo.record("p1", 1, Money::from_cents(-1)).await,
            Err(DbError::Validation(_))
        ));
        assert_eq!(repo.total_cost().await.unwrap(), Money::zero());
    }
}
