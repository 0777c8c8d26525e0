//! Stock bucket service

use crate::{
    error::{AppError, AppResult},
    models::stock::{validate_quality, validate_quantity, Availability, StockWithBook},
    openlibrary,
    repository::Repository,
    services::catalog::CatalogService,
};

#[derive(Clone)]
pub struct StockService {
    repository: Repository,
    catalog: CatalogService,
}

impl StockService {
    pub fn new(repository: Repository, catalog: CatalogService) -> Self {
        Self { repository, catalog }
    }

    /// Set the quantity of the `(olid, quality)` bucket, creating it when needed.
    /// Returns the bucket id.
    pub async fn set_stock(
        &self,
        raw_olid: &str,
        quality: i64,
        quantity: i64,
        import_if_missing: bool,
    ) -> AppResult<i32> {
        let olid = openlibrary::edition_olid(raw_olid)?;
        let quality = validate_quality(quality)?;
        let quantity = validate_quantity(quantity)?;

        if import_if_missing {
            self.catalog.ensure_imported(&olid).await?;
        } else if !self.repository.books.exists(&olid).await? {
            return Err(AppError::NotFound(format!("Book {} not found", olid)));
        }

        let stockid = self.repository.stock.set_stock(&olid, quality, quantity).await?;
        tracing::info!(olid = %olid, quality, quantity, stockid, "Stock bucket set");
        Ok(stockid)
    }

    pub async fn list(&self) -> AppResult<Vec<StockWithBook>> {
        self.repository.stock.list_stock_with_book().await
    }

    pub async fn availability(&self, stockid: i32) -> AppResult<Availability> {
        if stockid < 1 {
            return Err(AppError::missing("stockId"));
        }
        self.repository.stock.availability(stockid).await
    }
}
