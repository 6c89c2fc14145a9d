//! Domain models for the storefront.
//!
//! These are validated domain objects, separate from the database row types
//! in [`crate::db`]. All of them serialize to the JSON returned by the routes.

pub mod cart;
pub mod order;
pub mod product;
pub mod session;
pub mod user;

pub use cart::{Cart, CartItem, CartLine};
pub use order::{Order, OrderLine, OrderWithLines};
pub use product::Product;
pub use session::{CurrentUser, keys as session_keys};
pub use user::User;
