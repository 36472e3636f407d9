//! Rule books: recurring rules plus the transaction records generated from them.

pub mod rule_book;
pub mod transaction;

pub use rule_book::RuleBook;
pub use transaction::Transaction;
