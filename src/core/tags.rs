use crate::db::log::ttlog;
use crate::db::tags::{delete_tag, insert_tag, load_tag, set_tag_color, update_tag};
use crate::errors::{AppError, AppResult};
use crate::models::tag::{Tag, WeekQuota, random_color, random_color_except};
use regex::Regex;
use rusqlite::Connection;
use std::sync::LazyLock;
use tracing::info;

pub const MAX_TAG_NAME_LEN: usize = 50;
pub const MAX_QUOTA_MINUTES: i64 = 24 * 60;

static COLOR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^#[0-9a-fA-F]{6}$").expect("valid color regex"));

/// `accion=create` / `accion=edit` on `/tags`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagRequest {
    /// Trimmed; required.
    pub name: String,
    /// Minutes per weekday (Monday first); missing fields default to 0.
    pub quota: WeekQuota,
    /// `#rrggbb`; `None` keeps the current color (edit) or picks a random one (create).
    pub color: Option<String>,
}

impl TagRequest {
    fn validate(&self) -> AppResult<()> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(AppError::validation("The tag name is required."));
        }
        if name.chars().count() > MAX_TAG_NAME_LEN {
            return Err(AppError::validation(format!(
                "The tag name cannot exceed {} characters.",
                MAX_TAG_NAME_LEN
            )));
        }
        if self
            .quota
            .0
            .iter()
            .any(|m| *m < 0 || *m > MAX_QUOTA_MINUTES)
        {
            return Err(AppError::validation(
                "Quotas must be between 0 and 1440 minutes.",
            ));
        }
        if let Some(color) = &self.color
            && !COLOR_RE.is_match(color)
        {
            return Err(AppError::validation(format!("Invalid color '{}'.", color)));
        }
        Ok(())
    }
}

/// Every id must name an existing tag.
pub fn ensure_tags_exist(conn: &Connection, tag_ids: &[i64]) -> AppResult<()> {
    for id in tag_ids {
        if load_tag(conn, *id)?.is_none() {
            return Err(AppError::validation(format!("Unknown tag #{}.", id)));
        }
    }
    Ok(())
}

pub struct TagLogic;

impl TagLogic {
    pub fn create(conn: &Connection, req: &TagRequest) -> AppResult<Tag> {
        req.validate()?;

        let name = req.name.trim().to_string();
        let color = req.color.clone().unwrap_or_else(random_color);

        let tx = conn.unchecked_transaction()?;
        let id = insert_tag(&tx, &name, &color, &req.quota)?;
        ttlog(&tx, "tag_add", &name, &format!("Created tag #{} ({})", id, color))?;
        tx.commit()?;
        info!(tag = id, name = %name, "tag created");

        Ok(Tag {
            id,
            name,
            color,
            quota: req.quota,
        })
    }

    pub fn update(conn: &Connection, id: i64, req: &TagRequest) -> AppResult<Tag> {
        req.validate()?;

        let name = req.name.trim();
        let tx = conn.unchecked_transaction()?;
        if !update_tag(&tx, id, name, &req.quota)? {
            return Err(AppError::NotFound(format!("tag {}", id)));
        }
        if let Some(color) = &req.color {
            set_tag_color(&tx, id, color)?;
        }
        ttlog(&tx, "tag_edit", name, &format!("Updated tag #{}", id))?;
        tx.commit()?;
        info!(tag = id, "tag updated");

        load_tag(conn, id)?.ok_or_else(|| AppError::NotFound(format!("tag {}", id)))
    }

    /// Fails with a validation error while the tag is referenced.
    pub fn delete(conn: &Connection, id: i64) -> AppResult<Tag> {
        let tag = load_tag(conn, id)?.ok_or_else(|| AppError::NotFound(format!("tag {}", id)))?;

        let tx = conn.unchecked_transaction()?;
        delete_tag(&tx, id)?;
        ttlog(&tx, "tag_del", &tag.name, &format!("Deleted tag #{}", id))?;
        tx.commit()?;
        info!(tag = id, "tag deleted");
        Ok(tag)
    }

    /// Reassign a random palette color.
    pub fn recolor(conn: &Connection, id: i64) -> AppResult<Tag> {
        let mut tag =
            load_tag(conn, id)?.ok_or_else(|| AppError::NotFound(format!("tag {}", id)))?;

        tag.color = random_color_except(&tag.color);
        let tx = conn.unchecked_transaction()?;
        set_tag_color(&tx, id, &tag.color)?;
        ttlog(&tx, "tag_color", &tag.name, &format!("New color {}", tag.color))?;
        tx.commit()?;
        Ok(tag)
    }
}
