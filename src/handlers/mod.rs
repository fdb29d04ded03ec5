pub mod common;
pub mod products;
pub mod transactions;

pub use products::{products_router, ProductsState};
pub use transactions::{transactions_router, TransactionsState};
