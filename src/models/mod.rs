pub mod day_summary;
pub mod entry;
pub mod tag;
