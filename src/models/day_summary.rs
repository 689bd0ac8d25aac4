use chrono::NaiveDate;
use serde::Serialize;

/// Accounting group: an explicit tag, or the legacy "no tag" bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum GroupKey {
    Tag(i64),
    Untagged,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GroupTotal {
    pub key: GroupKey,
    pub name: String,
    pub color: String,
    /// Worked seconds (running timer included).
    pub seconds: i64,
    pub quota_minutes: i64,
    /// `seconds - quota_minutes * 60`
    pub difference: i64,
    /// True when the running timer contributes to this group.
    pub running: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DaySummary {
    pub date: NaiveDate,
    pub groups: Vec<GroupTotal>,
    /// Sum of entry durations, each entry counted once.
    pub total_seconds: i64,
    /// Sum of the group differences.
    pub difference: i64,
    pub running: bool,
}

impl DaySummary {
    pub fn group(&self, key: GroupKey) -> Option<&GroupTotal> {
        self.groups.iter().find(|g| g.key == key)
    }
}

/// Signed difference accumulated over a period for one group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PeriodTotal {
    pub key: GroupKey,
    pub name: String,
    pub color: String,
    pub seconds: i64,
    pub quota_seconds: i64,
    pub difference: i64,
}
