//! Rents repository for database operations

use chrono::{DateTime, Utc};
use sqlx::{Pool, Postgres};

use super::stock::rented_quantity;
use crate::{
    error::{AppError, AppResult},
    models::{
        rent::{ActiveRent, Checkout, Rent},
        stock::Availability,
    },
};

const ACTIVE_RENT_SELECT: &str = r#"
    SELECT r.rentid, r.rentdate, r.dateuntil, r.rentqty, r.clientid,
           s.stockid, s.openlibraryid, s.quality,
           b.title, b.author,
           (r.dateuntil < NOW()) AS overdue
    FROM rent r
    JOIN stock s ON s.stockid = r.stockid
    JOIN book  b ON b.openlibraryid = s.openlibraryid
    WHERE r.returned_at IS NULL
"#;

#[derive(Clone)]
pub struct RentsRepository {
    pool: Pool<Postgres>,
}

impl RentsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    pub async fn get_by_id(&self, rentid: i32) -> AppResult<Rent> {
        sqlx::query_as::<_, Rent>(
            r#"
            SELECT rentid, rentdate, dateuntil, returned_at, rentqty, stockid, clientid
            FROM rent
            WHERE rentid = $1
            "#,
        )
        .bind(rentid)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Rent with id {} not found", rentid)))
    }

    /// Reserve copies of a stock bucket. The bucket row stays locked from the
    /// availability check until the rent row is committed, so concurrent
    /// checkouts on one bucket are serialized and can never overbook it.
    pub async fn checkout(&self, checkout: &Checkout, now: DateTime<Utc>) -> AppResult<i32> {
        let mut tx = self.pool.begin().await?;

        let quantity: i32 =
            sqlx::query_scalar("SELECT quantity FROM stock WHERE stockid = $1 FOR UPDATE")
                .bind(checkout.stock_id)
                .fetch_optional(&mut *tx)
                .await?
                .ok_or_else(|| AppError::NotFound("Stock not found".to_string()))?;

        let rented = rented_quantity(&mut *tx, checkout.stock_id).await?;
        Availability {
            stockid: checkout.stock_id,
            quantity,
            rented,
        }
        .ensure_can_rent(checkout.rent_qty)?;

        let client_exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE userid = $1)")
                .bind(checkout.client_id)
                .fetch_one(&mut *tx)
                .await?;
        if !client_exists {
            return Err(AppError::NotFound("Client not found".to_string()));
        }

        let rentid: i32 = sqlx::query_scalar(
            r#"
            INSERT INTO rent (rentdate, dateuntil, returned_at, rentqty, stockid, clientid)
            VALUES ($1, $2, NULL, $3, $4, $5)
            RETURNING rentid
            "#,
        )
        .bind(now)
        .bind(checkout.date_until)
        .bind(checkout.rent_qty)
        .bind(checkout.stock_id)
        .bind(checkout.client_id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(rentid)
    }

    /// Close an active rental; a rental that is unknown or already returned is not found
    pub async fn mark_returned(&self, rentid: i32, now: DateTime<Utc>) -> AppResult<()> {
        let result = sqlx::query(
            "UPDATE rent SET returned_at = $1 WHERE rentid = $2 AND returned_at IS NULL",
        )
        .bind(now)
        .bind(rentid)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() < 1 {
            return Err(AppError::NotFound("Rent not found or already returned".to_string()));
        }
        Ok(())
    }

    pub async fn list_active_by_client(&self, clientid: i32) -> AppResult<Vec<ActiveRent>> {
        let query = format!(
            "{} AND r.clientid = $1 ORDER BY r.rentdate DESC, r.rentid DESC",
            ACTIVE_RENT_SELECT
        );
        let rows = sqlx::query_as::<_, ActiveRent>(&query)
            .bind(clientid)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    pub async fn list_active(&self) -> AppResult<Vec<ActiveRent>> {
        let query = format!("{} ORDER BY r.rentdate DESC, r.rentid DESC", ACTIVE_RENT_SELECT);
        let rows = sqlx::query_as::<_, ActiveRent>(&query)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }
}
