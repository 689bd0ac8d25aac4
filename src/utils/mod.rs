pub mod date;
pub mod formatting;
pub mod logging;
pub mod time;

pub use formatting::html_escape;
