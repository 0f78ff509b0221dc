//! Types that represent the core data model, such as `Record` and `Category`.
mod amount;
mod category;
mod period;
mod record;

pub use amount::{Amount, AmountError};
pub use category::Category;
pub use period::{Granularity, ReferencePeriod};
pub use record::Record;
