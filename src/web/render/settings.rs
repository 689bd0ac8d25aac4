use crate::core::report::SettingsView;
use crate::models::tag::WEEKDAY_NAMES;
use crate::utils::formatting::html_escape;
use crate::web::flash::Flash;
use crate::web::render::layout::base;

fn daily_max_form(view: &SettingsView) -> String {
    format!(
        r#"<section class="card"><h2>Daily maximum</h2>
<p>Quota applied to entries without tags.</p>
<form method="post" action="/settings">
<input type="hidden" name="accion" value="max">
<label for="max_hours">Hours:</label>
<input type="number" id="max_hours" name="hours" min="0" max="24" value="{hours}">
<label for="max_minutes">Minutes:</label>
<input type="number" id="max_minutes" name="minutes" min="0" max="59" value="{minutes}">
<button type="submit" class="btn">Save</button>
</form></section>"#,
        hours = view.daily_max_minutes / 60,
        minutes = view.daily_max_minutes % 60,
    )
}

fn assign_form(view: &SettingsView) -> String {
    if view.tags.is_empty() {
        return String::new();
    }

    let options: String = view
        .tags
        .iter()
        .map(|t| format!(r#"<option value="{}">{}</option>"#, t.id, html_escape(&t.name)))
        .collect();

    format!(
        r#"<section class="card"><h2>Tag untagged entries</h2>
<p>{count} entries have no tag.</p>
<form method="post" action="/settings">
<input type="hidden" name="accion" value="assign_untagged">
<label for="assign_tag">Tag:</label>
<select id="assign_tag" name="tag"><option value="">Choose a tag</option>{options}</select>
<button type="submit" class="btn">Assign</button>
</form></section>"#,
        count = view.untagged_entries,
        options = options,
    )
}

fn seed_form(view: &SettingsView) -> String {
    if view.tags.is_empty() {
        return String::new();
    }

    let weekdays: String = WEEKDAY_NAMES
        .iter()
        .enumerate()
        .map(|(i, name)| {
            format!(
                r#"<label for="seed_day_{i}"><input type="checkbox" id="seed_day_{i}" name="weekdays" value="{i}"{checked}> {name}</label>"#,
                i = i,
                name = name,
                checked = if i < 5 { " checked" } else { "" },
            )
        })
        .collect();

    format!(
        r#"<section class="card"><h2>Set quotas for every tag</h2>
<form method="post" action="/settings">
<input type="hidden" name="accion" value="seed_quotas">
<fieldset><legend>Weekdays:</legend>{weekdays}</fieldset>
<label for="seed_hours">Hours:</label>
<input type="number" id="seed_hours" name="hours" min="0" max="24" value="0">
<label for="seed_minutes">Minutes:</label>
<input type="number" id="seed_minutes" name="minutes" min="0" max="59" value="0">
<button type="submit" class="btn">Apply</button>
</form></section>"#,
        weekdays = weekdays
    )
}

pub fn page(view: &SettingsView, flash: Option<&Flash>) -> String {
    let content = format!(
        "<h1>Settings</h1>{}{}{}",
        daily_max_form(view),
        assign_form(view),
        seed_form(view)
    );
    base("Settings", &content, "", flash)
}
