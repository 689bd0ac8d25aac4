pub mod calculator;
pub mod del;
pub mod log;
pub mod manual;
pub mod report;
pub mod settings;
pub mod tags;
pub mod timer;
