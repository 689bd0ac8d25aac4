use crate::core::del::DeleteLogic;
use crate::core::manual::ManualLogic;
use crate::core::report::{
    home_view, month_log, resolve_month, settings_view, tag_rows, week_calendar,
};
use crate::core::settings::SettingsLogic;
use crate::core::tags::TagLogic;
use crate::core::timer::TimerLogic;
use crate::errors::{AppError, AppResult};
use crate::utils::date::{now, parse_date, parse_datetime, today};
use crate::web::AppState;
use crate::web::flash::{FlashKind, FlashQuery, redirect_outcome, redirect_with_message};
use crate::web::forms::{FormFields, HomeAction, TagAction, home_action, settings_action, tag_action};
use crate::web::render;
use crate::web::static_files::serve_file;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Redirect, Response};
use serde::Deserialize;

fn parse_id(raw: &str) -> AppResult<i64> {
    raw.trim()
        .parse::<i64>()
        .map_err(|_| AppError::InvalidId(raw.to_string()))
}

/// Validation errors raised while reading the form become warning flashes too.
fn apply_form<F>(location: &str, body: &str, apply: F) -> AppResult<Redirect>
where
    F: FnOnce(&FormFields) -> AppResult<String>,
{
    let fields = FormFields::parse(body)?;
    redirect_outcome(location, apply(&fields))
}

// ---------------------------
// Home
// ---------------------------

pub async fn home(
    State(state): State<AppState>,
    Query(flash): Query<FlashQuery>,
) -> AppResult<Html<String>> {
    let view = {
        let db = state.db()?;
        home_view(&db.conn, now())?
    };
    Ok(Html(render::home::page(&view, flash.flash().as_ref())))
}

pub async fn home_post(State(state): State<AppState>, body: String) -> AppResult<Redirect> {
    apply_form("/", &body, |fields| {
        let action = home_action(fields)?;
        let mut db = state.db()?;

        match action {
            HomeAction::Start(req) => {
                TimerLogic::start(&mut db, now(), &req).map(|_| "Timer started.".to_string())
            }
            HomeAction::Stop => TimerLogic::stop(&mut db, now()).map(|e| {
                format!(
                    "Timer stopped ({}).",
                    crate::utils::time::format_hms(e.duration)
                )
            }),
            HomeAction::Manual(req) => {
                ManualLogic::add_manual(&mut db, &req).map(|_| "Entry recorded.".to_string())
            }
            HomeAction::Cancel(req) => ManualLogic::add_cancellation(&mut db, &req)
                .map(|_| "Cancellation recorded.".to_string()),
        }
    })
}

// ---------------------------
// Logs
// ---------------------------

#[derive(Debug, Default, Deserialize)]
pub struct LogsQuery {
    pub month: Option<u32>,
    pub year: Option<i32>,
}

pub async fn logs(
    State(state): State<AppState>,
    Query(q): Query<LogsQuery>,
    Query(flash): Query<FlashQuery>,
) -> AppResult<Html<String>> {
    let (year, month) = resolve_month(q.month, q.year, today());
    let log = {
        let db = state.db()?;
        month_log(&db.conn, year, month, now())?
    };
    Ok(Html(render::logs::page(&log, flash.flash().as_ref())))
}

pub async fn delete_entry(
    State(state): State<AppState>,
    Path(raw): Path<String>,
) -> AppResult<Redirect> {
    let id = parse_id(&raw)?;
    let mut db = state.db()?;
    DeleteLogic::apply(&mut db, id)?;
    Ok(redirect_with_message(
        "/logs",
        "Entry deleted.",
        FlashKind::Success,
    ))
}

// ---------------------------
// Settings
// ---------------------------

pub async fn settings(
    State(state): State<AppState>,
    Query(flash): Query<FlashQuery>,
) -> AppResult<Html<String>> {
    let view = {
        let db = state.db()?;
        settings_view(&db.conn)?
    };
    Ok(Html(render::settings::page(&view, flash.flash().as_ref())))
}

pub async fn settings_post(State(state): State<AppState>, body: String) -> AppResult<Redirect> {
    apply_form("/settings", &body, |fields| {
        let req = settings_action(fields)?;
        let db = state.db()?;
        SettingsLogic::apply(&db.conn, &req)
    })
}

// ---------------------------
// Calendar
// ---------------------------

#[derive(Debug, Default, Deserialize)]
pub struct CalendarQuery {
    pub week: Option<String>,
}

pub async fn calendar(
    State(state): State<AppState>,
    Query(q): Query<CalendarQuery>,
    Query(flash): Query<FlashQuery>,
) -> AppResult<Html<String>> {
    // An unreadable week falls back to the current one.
    let reference = q
        .week
        .as_deref()
        .and_then(|w| parse_date(w).or_else(|| parse_datetime(w).map(|dt| dt.date())))
        .unwrap_or_else(today);

    let cal = {
        let db = state.db()?;
        week_calendar(&db.conn, reference, now())?
    };
    Ok(Html(render::calendar::page(&cal, flash.flash().as_ref())?))
}

// ---------------------------
// Tags
// ---------------------------

pub async fn tags(
    State(state): State<AppState>,
    Query(flash): Query<FlashQuery>,
) -> AppResult<Html<String>> {
    let rows = {
        let db = state.db()?;
        tag_rows(&db.conn)?
    };
    Ok(Html(render::tags::page(&rows, flash.flash().as_ref())))
}

pub async fn tags_post(State(state): State<AppState>, body: String) -> AppResult<Redirect> {
    apply_form("/tags", &body, |fields| {
        let action = tag_action(fields)?;
        let db = state.db()?;

        match action {
            TagAction::Create(req) => TagLogic::create(&db.conn, &req)
                .map(|t| format!("Tag '{}' created.", t.name)),
            TagAction::Edit(id, req) => TagLogic::update(&db.conn, id, &req)
                .map(|t| format!("Tag '{}' updated.", t.name)),
        }
    })
}

pub async fn tag_delete(
    State(state): State<AppState>,
    Path(raw): Path<String>,
) -> AppResult<Redirect> {
    let id = parse_id(&raw)?;
    let db = state.db()?;
    redirect_outcome(
        "/tags",
        TagLogic::delete(&db.conn, id).map(|t| format!("Tag '{}' deleted.", t.name)),
    )
}

pub async fn tag_color(
    State(state): State<AppState>,
    Path(raw): Path<String>,
) -> AppResult<Redirect> {
    let id = parse_id(&raw)?;
    let db = state.db()?;
    redirect_outcome(
        "/tags",
        TagLogic::recolor(&db.conn, id).map(|t| format!("New color for '{}'.", t.name)),
    )
}

// ---------------------------
// Static assets / fallback
// ---------------------------

pub async fn static_file(
    State(state): State<AppState>,
    Path(path): Path<String>,
) -> AppResult<Response> {
    serve_file(state.static_dir(), &path).await
}

pub async fn not_found() -> Response {
    (StatusCode::NOT_FOUND, "Page not found").into_response()
}
