// Product Store
pub mod products;
pub mod transaction_history;

// Transaction Service
pub mod product_store;
pub mod transactions;
