/// How a transaction's free-text `type` moves stock.
///
/// Derived from the raw string at the boundary only; the raw string is what gets stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionKind {
    Purchase,
    Sale,
    Other,
}

impl TransactionKind {
    /// Case-insensitive classification of a raw `type` value
    pub fn classify(raw: &str) -> Self {
        match raw.to_lowercase().as_str() {
            "purchase" => TransactionKind::Purchase,
            "sale" => TransactionKind::Sale,
            _ => TransactionKind::Other,
        }
    }

    /// Only sales are bounded by the stock on hand
    pub fn exceeds_stock(self, quantity: i32, stock: i32) -> bool {
        self == TransactionKind::Sale && quantity > stock
    }

    /// Stock after applying `quantity`. Purchases add; every other kind subtracts,
    /// without clamping at zero. `None` on integer overflow.
    pub fn apply(self, stock: i32, quantity: i32) -> Option<i32> {
        match self {
            TransactionKind::Purchase => stock.checked_add(quantity),
            TransactionKind::Sale | TransactionKind::Other => stock.checked_sub(quantity),
        }
    }
}
