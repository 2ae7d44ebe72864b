//! Plain data shared by the generator, the renderer and the prompt layer.

pub mod period;
pub mod product;

pub use period::{days_in_month, is_weekday, MonthRange, YearMonth};
pub use product::{Product, TotalRange};
