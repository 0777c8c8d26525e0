//! Repository layer for database operations

pub mod books;
pub mod rents;
pub mod stock;
pub mod users;
pub mod wishlist;

use sqlx::{Pool, Postgres};

/// Main repository struct holding database connection pool
#[derive(Clone)]
pub struct Repository {
    pub pool: Pool<Postgres>,
    pub books: books::BooksRepository,
    pub stock: stock::StockRepository,
    pub rents: rents::RentsRepository,
    pub users: users::UsersRepository,
    pub wishlist: wishlist::WishlistRepository,
}

impl Repository {
    /// Create a new repository with the given database pool
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self {
            books: books::BooksRepository::new(pool.clone()),
            stock: stock::StockRepository::new(pool.clone()),
            rents: rents::RentsRepository::new(pool.clone()),
            users: users::UsersRepository::new(pool.clone()),
            wishlist: wishlist::WishlistRepository::new(pool.clone()),
            pool,
        }
    }

    /// Round-trip to the database
    pub async fn ping(&self) -> crate::error::AppResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
