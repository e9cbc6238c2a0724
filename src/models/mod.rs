pub mod input;
pub mod milestone;
pub mod order;

pub use input::{AmountInput, FieldChange, FieldError, FieldValue, OrderChanges, OrderInput};
pub use milestone::{Milestone, Timeline};
pub use order::OrderRecord;
