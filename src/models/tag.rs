use chrono::{Datelike, NaiveDate};
use rand::seq::SliceRandom;
use serde::Serialize;

pub const WEEKDAY_NAMES: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

/// Colors handed out to new tags (and on recolor).
pub const TAG_PALETTE: [&str; 12] = [
    "#e6194b", "#3cb44b", "#4363d8", "#f58231", "#911eb4", "#46a0a0", "#f032e6", "#9a6324",
    "#800000", "#808000", "#000075", "#2f4f4f",
];

/// Maximum minutes per weekday, Monday = 0 .. Sunday = 6.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct WeekQuota(pub [i64; 7]);

impl WeekQuota {
    pub fn uniform(minutes: i64) -> Self {
        WeekQuota([minutes; 7])
    }

    pub fn minutes(&self, weekday: usize) -> i64 {
        self.0[weekday % 7]
    }

    pub fn minutes_on(&self, date: NaiveDate) -> i64 {
        self.minutes(date.weekday().num_days_from_monday() as usize)
    }

    pub fn set(&mut self, weekday: usize, minutes: i64) {
        self.0[weekday % 7] = minutes;
    }

    pub fn weekly_total(&self) -> i64 {
        self.0.iter().sum()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Tag {
    pub id: i64,
    pub name: String,
    pub color: String,
    pub quota: WeekQuota,
}

pub fn random_color() -> String {
    let mut rng = rand::thread_rng();
    TAG_PALETTE
        .choose(&mut rng)
        .copied()
        .unwrap_or(TAG_PALETTE[0])
        .to_string()
}

/// Pick a palette color different from `current` when possible.
pub fn random_color_except(current: &str) -> String {
    let mut rng = rand::thread_rng();
    let candidates: Vec<&str> = TAG_PALETTE
        .iter()
        .copied()
        .filter(|c| !c.eq_ignore_ascii_case(current))
        .collect();

    candidates
        .choose(&mut rng)
        .copied()
        .unwrap_or(TAG_PALETTE[0])
        .to_string()
}
