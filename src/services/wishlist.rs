//! Wishlist service

use crate::{
    error::AppResult,
    models::wishlist::{WishlistEntry, WishlistItem, WishlistSummary},
    openlibrary,
    repository::Repository,
};

#[derive(Clone)]
pub struct WishlistService {
    repository: Repository,
}

impl WishlistService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn list(&self, userid: i32) -> AppResult<Vec<WishlistItem>> {
        self.repository.wishlist.list_by_user(userid).await
    }

    pub async fn ids(&self, userid: i32) -> AppResult<Vec<String>> {
        self.repository.wishlist.ids_by_user(userid).await
    }

    /// Remove the entry when present, add it otherwise. Returns whether the book is now wished.
    pub async fn toggle(
        &self,
        userid: i32,
        raw_olid: &str,
        entry: &WishlistEntry,
    ) -> AppResult<bool> {
        let olid = openlibrary::any_olid(raw_olid)?;

        if self.repository.wishlist.exists(userid, &olid).await? {
            self.repository.wishlist.remove(userid, &olid).await?;
            tracing::debug!(userid, olid = %olid, "Removed from wishlist");
            Ok(false)
        } else {
            self.repository.wishlist.add(userid, &olid, entry).await?;
            tracing::debug!(userid, olid = %olid, "Added to wishlist");
            Ok(true)
        }
    }

    pub async fn remove(&self, userid: i32, raw_olid: &str) -> AppResult<()> {
        let olid = openlibrary::any_olid(raw_olid)?;
        self.repository.wishlist.remove(userid, &olid).await?;
        Ok(())
    }

    pub async fn summary(&self) -> AppResult<Vec<WishlistSummary>> {
        self.repository.wishlist.admin_summary().await
    }
}
