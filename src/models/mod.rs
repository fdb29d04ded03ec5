pub mod new_transaction;
pub mod page;
pub mod transaction_kind;

pub use new_transaction::NewTransaction;
pub use page::{Page, PageRequest};
pub use transaction_kind::TransactionKind;
