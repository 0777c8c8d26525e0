//! Books repository for database operations

use sqlx::{Pool, Postgres, QueryBuilder};

use crate::{
    error::{AppError, AppResult},
    models::book::{Book, CatalogEntry, CatalogQuery},
};

#[derive(Clone)]
pub struct BooksRepository {
    pool: Pool<Postgres>,
}

impl BooksRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    pub async fn exists(&self, olid: &str) -> AppResult<bool> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM book WHERE openlibraryid = $1)")
                .bind(olid)
                .fetch_one(&self.pool)
                .await?;
        Ok(exists)
    }

    pub async fn get(&self, olid: &str) -> AppResult<Book> {
        sqlx::query_as::<_, Book>(
            r#"
            SELECT openlibraryid, isbn, title, author, release_year, publisher, language,
                   pages, coverurl
            FROM book
            WHERE openlibraryid = $1
            "#,
        )
        .bind(olid)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Book {} not found", olid)))
    }

    /// Insert or overwrite the book; running it twice with the same record changes nothing
    pub async fn upsert_from_openlibrary(&self, book: &Book) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO book (openlibraryid, isbn, title, author, release_year, publisher,
                              language, pages, coverurl)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            ON CONFLICT (openlibraryid) DO UPDATE SET
                isbn = EXCLUDED.isbn,
                title = EXCLUDED.title,
                author = EXCLUDED.author,
                release_year = EXCLUDED.release_year,
                publisher = EXCLUDED.publisher,
                language = EXCLUDED.language,
                pages = EXCLUDED.pages,
                coverurl = EXCLUDED.coverurl,
                updatedat = NOW()
            "#,
        )
        .bind(&book.openlibraryid)
        .bind(&book.isbn)
        .bind(&book.title)
        .bind(&book.author)
        .bind(book.release_year)
        .bind(&book.publisher)
        .bind(&book.language)
        .bind(book.pages)
        .bind(&book.coverurl)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Stock buckets with their book and available count
    pub async fn list_catalog(&self, query: &CatalogQuery) -> AppResult<Vec<CatalogEntry>> {
        let mut builder = QueryBuilder::<Postgres>::new(
            r#"
            SELECT s.stockid, s.openlibraryid, b.isbn, b.title, b.author, b.release_year,
                   b.publisher, b.language, b.pages, b.coverurl,
                   s.quality AS "condition", s.quantity,
                   (s.quantity - COALESCE(r.rented, 0))::INT AS available
            FROM stock s
            JOIN book b ON b.openlibraryid = s.openlibraryid
            LEFT JOIN (
                SELECT stockid, SUM(rentqty) AS rented
                FROM rent
                WHERE returned_at IS NULL
                GROUP BY stockid
            ) r ON r.stockid = s.stockid
            WHERE TRUE
            "#,
        );

        if let Some(q) = query.q.as_deref().map(str::trim).filter(|q| !q.is_empty()) {
            let pattern = format!("%{}%", escape_like(q));
            builder
                .push(" AND (b.title ILIKE ")
                .push_bind(pattern.clone())
                .push(" OR b.author ILIKE ")
                .push_bind(pattern.clone())
                .push(" OR b.isbn ILIKE ")
                .push_bind(pattern)
                .push(")");
        }

        if query.only_in_stock.unwrap_or(false) {
            builder.push(" AND s.quantity - COALESCE(r.rented, 0) > 0");
        }

        if let Some(min) = query.min_condition {
            builder.push(" AND s.quality >= ").push_bind(min);
        }

        if let Some(author) = query.author.as_deref().filter(|a| !a.is_empty()) {
            builder.push(" AND b.author = ").push_bind(author.to_string());
        }

        if let Some(publisher) = query.publisher.as_deref().filter(|p| !p.is_empty()) {
            builder.push(" AND b.publisher = ").push_bind(publisher.to_string());
        }

        builder.push(" ").push(query.order_by());

        let entries = builder
            .build_query_as::<CatalogEntry>()
            .fetch_all(&self.pool)
            .await?;

        Ok(entries)
    }
}

/// Escape LIKE wildcards so user text matches literally
fn escape_like(input: &str) -> String {
    input
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}
