pub mod logging;
pub mod time;

pub use logging::truncate_text;
pub use time::{add_minutes, format_hhmm, parse_hhmm, work_end};
