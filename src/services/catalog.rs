//! Catalog service: OpenLibrary lookups and book import

use std::sync::Arc;

use serde_json::Value;

use crate::{
    error::{AppError, AppResult},
    models::book::{Book, CatalogEntry, CatalogQuery},
    openlibrary::{self, annotate_edition_olids, book_from_edition, CatalogSource},
    repository::Repository,
};

#[derive(Clone)]
pub struct CatalogService {
    repository: Repository,
    source: Arc<dyn CatalogSource>,
}

impl CatalogService {
    pub fn new(repository: Repository, source: Arc<dyn CatalogSource>) -> Self {
        Self { repository, source }
    }

    /// Search OpenLibrary; each doc gains an `edition_olid`
    pub async fn search(
        &self,
        query: &str,
        limit: Option<i64>,
        fields: Option<String>,
    ) -> AppResult<Value> {
        let query = query.trim();
        if query.is_empty() {
            return Err(AppError::missing("q"));
        }

        let fields = fields.map(|f| f.trim().to_string()).filter(|f| !f.is_empty());
        let mut result = self
            .source
            .search(query, openlibrary::clamp_limit(limit), fields)
            .await?;
        annotate_edition_olids(&mut result);
        Ok(result)
    }

    /// Raw edition document
    pub async fn edition(&self, raw_olid: &str) -> AppResult<Value> {
        let olid = openlibrary::edition_olid(raw_olid)?;
        self.source.edition(&olid).await
    }

    /// Fetch an edition, map it to a book and upsert it
    pub async fn import_edition(&self, raw_olid: &str) -> AppResult<Book> {
        let olid = openlibrary::edition_olid(raw_olid)?;
        let edition = self.source.edition(&olid).await?;
        let book = book_from_edition(&edition, &olid);

        self.repository.books.upsert_from_openlibrary(&book).await?;
        tracing::info!(olid = %olid, title = %book.title, "Edition imported");

        Ok(book)
    }

    /// Import the edition only when it is not yet known locally
    pub async fn ensure_imported(&self, olid: &str) -> AppResult<()> {
        if !self.repository.books.exists(olid).await? {
            self.import_edition(olid).await?;
        }
        Ok(())
    }

    pub async fn get_book(&self, raw_olid: &str) -> AppResult<Book> {
        let olid = openlibrary::edition_olid(raw_olid)?;
        self.repository.books.get(&olid).await
    }

    pub async fn list_catalog(&self, query: &CatalogQuery) -> AppResult<Vec<CatalogEntry>> {
        if let Some(min) = query.min_condition {
            crate::models::stock::validate_quality(min as i64)?;
        }
        self.repository.books.list_catalog(query).await
    }
}
