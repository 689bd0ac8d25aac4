use crate::core::calculator::aggregate::{UNTAGGED_COLOR, UNTAGGED_NAME};
use crate::core::report::{DayLog, MonthLog};
use crate::models::entry::Entry;
use crate::models::tag::Tag;
use crate::utils::date::{next_month, prev_month};
use crate::utils::formatting::{chip, html_escape};
use crate::utils::time::{format_hm, minutes_readable};
use crate::web::flash::Flash;
use crate::web::render::layout::base;
use crate::web::render::{difference_span, tag_chips};

const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

const CONFIRM_SCRIPT: &str = r#"
<script>
document.querySelectorAll('a.delete').forEach(function (a) {
  a.addEventListener('click', function (ev) {
    if (!confirm('Delete this entry?')) ev.preventDefault();
  });
});
</script>
"#;

fn month_name(month: u32) -> &'static str {
    MONTH_NAMES
        .get(month.saturating_sub(1) as usize)
        .copied()
        .unwrap_or("?")
}

fn month_nav(log: &MonthLog) -> String {
    let (py, pm) = prev_month(log.year, log.month);
    let (ny, nm) = next_month(log.year, log.month);
    format!(
        r#"<div class="month-nav"><a class="btn" href="/logs?month={pm}&amp;year={py}">&laquo; Previous</a><h2>{name} {year}</h2><a class="btn" href="/logs?month={nm}&amp;year={ny}">Next &raquo;</a></div>"#,
        pm = pm,
        py = py,
        nm = nm,
        ny = ny,
        name = month_name(log.month),
        year = log.year,
    )
}

fn entry_kind(e: &Entry) -> &'static str {
    if e.is_cancellation() {
        "Cancellation"
    } else if e.is_running() {
        "Running"
    } else if e.manual {
        "Manual"
    } else {
        "Timer"
    }
}

fn entry_row(e: &Entry, tags: &[Tag]) -> String {
    let start = e
        .start
        .map(|s| s.format("%H:%M").to_string())
        .unwrap_or_else(|| "-".to_string());
    let end = match (e.end, e.is_running()) {
        (_, true) => "running".to_string(),
        (Some(end), false) if end.date() != e.date => end.format("%d/%m %H:%M").to_string(),
        (Some(end), false) => end.format("%H:%M").to_string(),
        (None, false) => "-".to_string(),
    };
    let tag_html = if e.is_untagged() {
        chip(UNTAGGED_NAME, UNTAGGED_COLOR)
    } else {
        tag_chips(tags, &e.tag_ids)
    };

    format!(
        r#"<tr class="{class}"><td>{kind}</td><td>{start}</td><td>{end}</td><td>{duration}</td><td>{tags}</td><td>{desc}</td><td><a class="delete" href="/delete/{id}">Delete</a></td></tr>"#,
        class = entry_kind(e).to_lowercase(),
        kind = entry_kind(e),
        start = start,
        end = end,
        duration = format_hm(e.duration),
        tags = tag_html,
        desc = html_escape(e.description.as_deref().unwrap_or("")),
        id = e.id,
    )
}

fn day_block(day: &DayLog, tags: &[Tag]) -> String {
    let s = &day.summary;
    let mut html = format!(
        r#"<tr class="day-row"><td colspan="4"><strong>{date}</strong></td><td>{total}</td><td>{diff}</td><td></td></tr>"#,
        date = s.date.format("%a %d/%m/%Y"),
        total = format_hm(s.total_seconds),
        diff = difference_span(s.difference, ""),
    );

    for g in &s.groups {
        if g.seconds == 0 && g.quota_minutes == 0 {
            continue;
        }
        html.push_str(&format!(
            r#"<tr class="group-row"><td></td><td colspan="3">{chip}</td><td>{worked} / {quota}</td><td>{diff}</td><td></td></tr>"#,
            chip = chip(&g.name, &g.color),
            worked = format_hm(g.seconds),
            quota = format_hm(g.quota_minutes * 60),
            diff = difference_span(g.difference, ""),
        ));
    }

    html.push_str(r#"<tr class="details"><td colspan="7"><details><summary>Entries</summary><table class="entries"><thead><tr><th>Type</th><th>Start</th><th>End</th><th>Duration</th><th>Tags</th><th>Description</th><th></th></tr></thead><tbody>"#);
    for e in &day.entries {
        html.push_str(&entry_row(e, tags));
    }
    html.push_str("</tbody></table></details></td></tr>");
    html
}

fn totals_table(log: &MonthLog) -> String {
    if log.totals.is_empty() {
        return String::new();
    }

    let mut html = String::from(
        r#"<section class="card"><h2>Accumulated this month</h2><table class="group-table"><thead><tr><th>Tag</th><th>Worked</th><th>Quota</th><th>Difference</th></tr></thead><tbody>"#,
    );
    for t in &log.totals {
        html.push_str(&format!(
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
            chip(&t.name, &t.color),
            format_hm(t.seconds),
            format_hm(t.quota_seconds),
            difference_span(t.difference, ""),
        ));
    }
    html.push_str(&format!(
        r#"</tbody><tfoot><tr><td colspan="3"><strong>Total</strong></td><td>{}</td></tr></tfoot></table></section>"#,
        difference_span(log.difference, "")
    ));
    html
}

pub fn page(log: &MonthLog, flash: Option<&Flash>) -> String {
    let mut content = String::from("<h1>Logs</h1>");
    content.push_str(&month_nav(log));

    if log.days.is_empty() {
        content.push_str(r#"<p class="empty">No entries for this month.</p>"#);
    } else {
        content.push_str(
            r#"<table class="logs"><thead><tr><th colspan="4">Day</th><th>Worked</th><th>Difference</th><th></th></tr></thead><tbody>"#,
        );
        for day in &log.days {
            content.push_str(&day_block(day, &log.tags));
        }
        content.push_str("</tbody></table>");
    }

    content.push_str(&totals_table(log));
    content.push_str(&format!(
        r#"<p class="note">Untagged entries are measured against the daily maximum of {}.</p>"#,
        minutes_readable(log.daily_max_minutes)
    ));

    base("Logs", &content, CONFIRM_SCRIPT, flash)
}
