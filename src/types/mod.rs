mod models;
mod range;

pub use models::*;
pub use models::calendar_date::parse as parse_calendar_date;
pub use range::{DateRange, RangeKey, today};
