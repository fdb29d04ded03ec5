pub mod product;
pub mod transaction;
