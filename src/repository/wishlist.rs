//! Wishlist repository for database operations

use sqlx::{Pool, Postgres};

use crate::{
    error::AppResult,
    models::wishlist::{WishlistEntry, WishlistItem, WishlistSummary},
};

#[derive(Clone)]
pub struct WishlistRepository {
    pool: Pool<Postgres>,
}

impl WishlistRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    pub async fn list_by_user(&self, userid: i32) -> AppResult<Vec<WishlistItem>> {
        let items = sqlx::query_as::<_, WishlistItem>(
            r#"
            SELECT openlibraryid, title, author, coverurl, releaseyear, createdat
            FROM wishlist
            WHERE userid = $1
            ORDER BY createdat DESC
            "#,
        )
        .bind(userid)
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }

    pub async fn ids_by_user(&self, userid: i32) -> AppResult<Vec<String>> {
        let ids = sqlx::query_scalar(
            "SELECT openlibraryid FROM wishlist WHERE userid = $1 ORDER BY createdat DESC",
        )
        .bind(userid)
        .fetch_all(&self.pool)
        .await?;

        Ok(ids)
    }

    pub async fn exists(&self, userid: i32, olid: &str) -> AppResult<bool> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM wishlist WHERE userid = $1 AND openlibraryid = $2)",
        )
        .bind(userid)
        .bind(olid)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    /// Insert the entry or refresh its descriptive columns
    pub async fn add(&self, userid: i32, olid: &str, entry: &WishlistEntry) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO wishlist (userid, openlibraryid, title, author, coverurl, releaseyear)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (userid, openlibraryid) DO UPDATE SET
                title = EXCLUDED.title,
                author = EXCLUDED.author,
                coverurl = EXCLUDED.coverurl,
                releaseyear = EXCLUDED.releaseyear
            "#,
        )
        .bind(userid)
        .bind(olid)
        .bind(&entry.title)
        .bind(&entry.author)
        .bind(&entry.coverurl)
        .bind(&entry.releaseyear)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Returns whether an entry was deleted
    pub async fn remove(&self, userid: i32, olid: &str) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM wishlist WHERE userid = $1 AND openlibraryid = $2")
            .bind(userid)
            .bind(olid)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn admin_summary(&self) -> AppResult<Vec<WishlistSummary>> {
        let rows = sqlx::query_as::<_, WishlistSummary>(
            r#"
            SELECT openlibraryid,
                   MAX(title) AS title,
                   MAX(author) AS author,
                   MAX(coverurl) AS coverurl,
                   MAX(releaseyear) AS releaseyear,
                   COUNT(*) AS wishcount
            FROM wishlist
            GROUP BY openlibraryid
            ORDER BY wishcount DESC, openlibraryid ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }
}
