//! Data models for LibraryDB

pub mod book;
pub mod rent;
pub mod stock;
pub mod user;
pub mod wishlist;

// Re-export commonly used types
pub use book::{Book, CatalogEntry, CatalogQuery};
pub use rent::{ActiveRent, Checkout, Rent};
pub use stock::{Availability, StockWithBook};
pub use user::{Role, SessionUser, User};
pub use wishlist::{WishlistEntry, WishlistItem, WishlistSummary};
