//! Bulk CSV conversion of orders.
//!
//! Amounts cross the boundary through [`LocaleFormat`](crate::currency::LocaleFormat),
//! flags as literal `true`/`false`, dates as ISO `YYYY-MM-DD`.

pub mod export;
pub mod import;

pub use export::write_orders;
pub use import::{read_orders, ImportRow};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TransferError {
    #[error("CSV contains no data rows")]
    Empty,

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
