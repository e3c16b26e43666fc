pub mod clock;
pub mod time;
pub mod test_utils;

pub use clock::{Clock, FixedClock, SystemClock};
pub use time::{format_12h, iso_date, ServerTime};
