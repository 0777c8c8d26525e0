//! Stock repository for database operations

use sqlx::{PgExecutor, Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::stock::{Availability, StockWithBook},
};

#[derive(Clone)]
pub struct StockRepository {
    pool: Pool<Postgres>,
}

/// Copies of a bucket currently out on active rentals
pub(crate) async fn rented_quantity<'e, E>(executor: E, stockid: i32) -> AppResult<i64>
where
    E: PgExecutor<'e>,
{
    let rented: i64 = sqlx::query_scalar(
        r#"
        SELECT COALESCE(SUM(rentqty), 0)::BIGINT
        FROM rent
        WHERE stockid = $1 AND returned_at IS NULL
        "#,
    )
    .bind(stockid)
    .fetch_one(executor)
    .await?;
    Ok(rented)
}

impl StockRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Set the quantity of the (olid, quality) bucket, creating it when needed.
    /// Returns the bucket's stock id.
    pub async fn set_stock(&self, olid: &str, quality: i16, quantity: i32) -> AppResult<i32> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO stock (openlibraryid, quality, quantity)
            VALUES ($1, $2, 0)
            ON CONFLICT (openlibraryid, quality) DO NOTHING
            "#,
        )
        .bind(olid)
        .bind(quality)
        .execute(&mut *tx)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db) if db.is_foreign_key_violation() => {
                AppError::NotFound(format!("Book {} not found", olid))
            }
            _ => AppError::Database(e),
        })?;

        // Serializes against checkouts on the same bucket
        let stockid: i32 = sqlx::query_scalar(
            "SELECT stockid FROM stock WHERE openlibraryid = $1 AND quality = $2 FOR UPDATE",
        )
        .bind(olid)
        .bind(quality)
        .fetch_one(&mut *tx)
        .await?;

        let rented = rented_quantity(&mut *tx, stockid).await?;
        Availability { stockid, quantity, rented }.ensure_can_hold(quantity)?;

        sqlx::query("UPDATE stock SET quantity = $1 WHERE stockid = $2")
            .bind(quantity)
            .bind(stockid)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(stockid)
    }

    pub async fn list_stock_with_book(&self) -> AppResult<Vec<StockWithBook>> {
        let rows = sqlx::query_as::<_, StockWithBook>(
            r#"
            SELECT s.stockid, s.openlibraryid, s.quality, s.quantity,
                   b.isbn, b.title, b.author, b.release_year, b.publisher, b.language, b.pages
            FROM stock s
            JOIN book b ON b.openlibraryid = s.openlibraryid
            ORDER BY b.title ASC, s.quality ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    pub async fn availability(&self, stockid: i32) -> AppResult<Availability> {
        sqlx::query_as::<_, Availability>(
            r#"
            SELECT s.stockid, s.quantity,
                   COALESCE((
                       SELECT SUM(r.rentqty) FROM rent r
                       WHERE r.stockid = s.stockid AND r.returned_at IS NULL
                   ), 0)::BIGINT AS rented
            FROM stock s
            WHERE s.stockid = $1
            "#,
        )
        .bind(stockid)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Stock not found".to_string()))
    }
}
