//! Urlencoded form bodies into typed requests.
//!
//! Bodies are decoded as ordered key/value pairs so repeated keys (tag
//! checkboxes, weekday checkboxes) survive; each action is then mapped to its
//! request struct before any storage call.

use crate::core::manual::{CancelRequest, ManualRequest};
use crate::core::settings::SettingsRequest;
use crate::core::tags::TagRequest;
use crate::core::timer::StartRequest;
use crate::errors::{AppError, AppResult};
use crate::models::tag::WeekQuota;

#[derive(Debug, Clone, Default)]
pub struct FormFields(Vec<(String, String)>);

impl FormFields {
    pub fn parse(body: &str) -> AppResult<Self> {
        serde_urlencoded::from_str::<Vec<(String, String)>>(body)
            .map(FormFields)
            .map_err(|e| AppError::BadRequest(format!("malformed form body: {}", e)))
    }

    /// First value of `key`, trimmed.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.trim())
    }

    /// Non-empty trimmed text.
    pub fn text(&self, key: &str) -> Option<String> {
        self.get(key).filter(|v| !v.is_empty()).map(str::to_string)
    }

    /// Integer field; missing or empty gives `default`.
    pub fn int(&self, key: &str, default: i64) -> AppResult<i64> {
        match self.get(key) {
            None | Some("") => Ok(default),
            Some(v) => v
                .parse::<i64>()
                .map_err(|_| AppError::validation(format!("Invalid number '{}' for {}.", v, key))),
        }
    }

    /// Every non-empty value of a repeated integer field.
    pub fn ints(&self, key: &str) -> AppResult<Vec<i64>> {
        let mut out = Vec::new();
        for (k, v) in &self.0 {
            let v = v.trim();
            if k != key || v.is_empty() {
                continue;
            }
            let n = v
                .parse::<i64>()
                .map_err(|_| AppError::validation(format!("Invalid value '{}' for {}.", v, key)))?;
            if !out.contains(&n) {
                out.push(n);
            }
        }
        Ok(out)
    }

    fn quota(&self) -> AppResult<WeekQuota> {
        let mut quota = WeekQuota::default();
        for day in 0..7 {
            quota.set(day, self.int(&format!("quota_{}", day), 0)?);
        }
        Ok(quota)
    }
}

/// `POST /` by `accion`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HomeAction {
    Start(StartRequest),
    Stop,
    Manual(ManualRequest),
    Cancel(CancelRequest),
}

pub fn home_action(fields: &FormFields) -> AppResult<HomeAction> {
    match fields.get("accion").unwrap_or("") {
        "start" => Ok(HomeAction::Start(StartRequest {
            description: fields.text("description"),
            tag_ids: fields.ints("tags")?,
        })),
        "stop" => Ok(HomeAction::Stop),
        "manual" => Ok(HomeAction::Manual(ManualRequest {
            start: fields.get("start").unwrap_or("").to_string(),
            end: fields.text("end"),
            hours: fields.int("hours", 0)?,
            minutes: fields.int("minutes", 0)?,
            description: fields.text("description"),
            tag_ids: fields.ints("tags")?,
        })),
        "cancelar" => Ok(HomeAction::Cancel(CancelRequest {
            date: fields.get("date").unwrap_or("").to_string(),
            hours: fields.int("hours", 0)?,
            minutes: fields.int("minutes", 0)?,
            description: fields.text("description"),
            tag_ids: fields.ints("tags")?,
        })),
        other => Err(AppError::BadRequest(format!("unknown action '{}'", other))),
    }
}

/// `POST /tags` by `accion`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagAction {
    Create(TagRequest),
    Edit(i64, TagRequest),
}

pub fn tag_action(fields: &FormFields) -> AppResult<TagAction> {
    let req = TagRequest {
        name: fields.get("name").unwrap_or("").to_string(),
        quota: fields.quota()?,
        color: fields.text("color"),
    };

    match fields.get("accion").unwrap_or("create") {
        "create" | "" => Ok(TagAction::Create(req)),
        "edit" => {
            let raw = fields.get("id").unwrap_or("");
            let id = raw
                .parse::<i64>()
                .map_err(|_| AppError::InvalidId(raw.to_string()))?;
            Ok(TagAction::Edit(id, req))
        }
        other => Err(AppError::BadRequest(format!("unknown action '{}'", other))),
    }
}

/// `POST /settings` by `accion` (default `max`).
pub fn settings_action(fields: &FormFields) -> AppResult<SettingsRequest> {
    match fields.get("accion").unwrap_or("max") {
        "max" | "" => Ok(SettingsRequest::DailyMax {
            hours: fields.int("hours", 0)?,
            minutes: fields.int("minutes", 0)?,
        }),
        "assign_untagged" => {
            let tag_id = match fields.get("tag") {
                None | Some("") => None,
                Some(raw) => Some(
                    raw.parse::<i64>()
                        .map_err(|_| AppError::validation("Select a tag to assign."))?,
                ),
            };
            Ok(SettingsRequest::AssignUntagged { tag_id })
        }
        "seed_quotas" => {
            let weekdays = fields
                .ints("weekdays")?
                .into_iter()
                .filter(|d| (0..7).contains(d))
                .map(|d| d as usize)
                .collect();
            Ok(SettingsRequest::SeedQuotas {
                weekdays,
                hours: fields.int("hours", 0)?,
                minutes: fields.int("minutes", 0)?,
            })
        }
        other => Err(AppError::BadRequest(format!("unknown action '{}'", other))),
    }
}
