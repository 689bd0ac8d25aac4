use crate::db::log::ttlog;
use crate::db::queries::tag_untagged_entries;
use crate::db::settings::set_daily_max_minutes;
use crate::db::tags::{load_tag, seed_tag_quotas};
use crate::errors::{AppError, AppResult};
use crate::models::tag::WEEKDAY_NAMES;
use crate::utils::time::{hm_to_minutes, minutes_readable};
use rusqlite::Connection;
use tracing::info;

/// `POST /settings`, one variant per `accion`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettingsRequest {
    /// `accion=max` (the default): global daily maximum.
    DailyMax { hours: i64, minutes: i64 },
    /// `accion=assign_untagged`: link every untagged entry to `tag_id`.
    AssignUntagged { tag_id: Option<i64> },
    /// `accion=seed_quotas`: set the quota of `weekdays` (0 = Monday) on every tag.
    SeedQuotas {
        weekdays: Vec<usize>,
        hours: i64,
        minutes: i64,
    },
}

pub struct SettingsLogic;

impl SettingsLogic {
    /// Applies the request in one transaction; returns the success message.
    pub fn apply(conn: &Connection, req: &SettingsRequest) -> AppResult<String> {
        let tx = conn.unchecked_transaction()?;
        let message = Self::apply_in(&tx, req)?;
        tx.commit()?;
        Ok(message)
    }

    fn apply_in(conn: &Connection, req: &SettingsRequest) -> AppResult<String> {
        match req {
            SettingsRequest::DailyMax { hours, minutes } => {
                let total = hm_to_minutes(*hours, *minutes).ok_or_else(|| {
                    AppError::validation("The daily maximum is out of range.")
                })?;
                if !(1..=24 * 60).contains(&total) {
                    return Err(AppError::validation(
                        "The daily maximum must be between 1 and 1440 minutes.",
                    ));
                }
                set_daily_max_minutes(conn, total)?;
                ttlog(conn, "settings", "daily_max", &format!("{} minutes", total))?;
                info!(minutes = total, "daily maximum updated");
                Ok(format!(
                    "Settings updated: {} per day.",
                    minutes_readable(total)
                ))
            }

            SettingsRequest::AssignUntagged { tag_id } => {
                let tag_id =
                    tag_id.ok_or_else(|| AppError::validation("Select a tag to assign."))?;
                let tag = load_tag(conn, tag_id)?
                    .ok_or_else(|| AppError::validation(format!("Unknown tag #{}.", tag_id)))?;

                let n = tag_untagged_entries(conn, tag_id)?;
                ttlog(
                    conn,
                    "settings",
                    &tag.name,
                    &format!("Assigned {} untagged entries", n),
                )?;
                info!(tag = tag_id, entries = n, "untagged entries assigned");
                Ok(format!("{} untagged entries assigned to '{}'.", n, tag.name))
            }

            SettingsRequest::SeedQuotas {
                weekdays,
                hours,
                minutes,
            } => {
                if weekdays.is_empty() {
                    return Err(AppError::validation("Select at least one weekday."));
                }
                let total = hm_to_minutes(*hours, *minutes)
                    .filter(|t| (0..=24 * 60).contains(t))
                    .ok_or_else(|| {
                        AppError::validation("Quotas must be between 0 and 1440 minutes.")
                    })?;

                let n = seed_tag_quotas(conn, weekdays, total)?;
                let days: Vec<&str> = weekdays
                    .iter()
                    .filter_map(|d| WEEKDAY_NAMES.get(*d).copied())
                    .collect();
                ttlog(
                    conn,
                    "settings",
                    "quotas",
                    &format!("{} minutes on {}", total, days.join(",")),
                )?;
                info!(minutes = total, tags = n, "tag quotas seeded");
                Ok(format!(
                    "Quota of {} set on {} for {} tags.",
                    minutes_readable(total),
                    days.join(", "),
                    n
                ))
            }
        }
    }
}
