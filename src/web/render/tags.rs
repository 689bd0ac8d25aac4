use crate::core::report::TagRow;
use crate::models::tag::{Tag, WEEKDAY_NAMES, WeekQuota};
use crate::utils::formatting::{chip, html_escape};
use crate::utils::time::minutes_readable;
use crate::web::flash::Flash;
use crate::web::render::layout::base;

const CONFIRM_SCRIPT: &str = r#"
<script>
document.querySelectorAll('a.delete').forEach(function (a) {
  a.addEventListener('click', function (ev) {
    if (!confirm('Delete this tag?')) ev.preventDefault();
  });
});
</script>
"#;

/// Seven `quota_N` inputs (minutes), Monday first.
fn quota_inputs(quota: &WeekQuota, id_prefix: &str) -> String {
    let mut html = String::from(r#"<div class="quota-inputs">"#);
    for (i, name) in WEEKDAY_NAMES.iter().enumerate() {
        html.push_str(&format!(
            r#"<label for="{p}_q{i}">{name}<input type="number" id="{p}_q{i}" name="quota_{i}" min="0" max="1440" value="{v}"></label>"#,
            p = id_prefix,
            i = i,
            name = name,
            v = quota.minutes(i),
        ));
    }
    html.push_str("</div>");
    html
}

fn tag_row(row: &TagRow) -> String {
    let tag: &Tag = &row.tag;
    let prefix = format!("tag{}", tag.id);

    let delete = if row.in_use {
        r#"<span class="note">In use</span>"#.to_string()
    } else {
        format!(r#"<a class="delete" href="/tags/delete/{}">Delete</a>"#, tag.id)
    };

    format!(
        r#"<tr><td>{chip}</td><td>{weekly}</td><td>
<form method="post" action="/tags" class="tag-edit">
<input type="hidden" name="accion" value="edit">
<input type="hidden" name="id" value="{id}">
<input type="text" name="name" value="{name}" maxlength="50" required>
<input type="color" name="color" value="{color}">
{quotas}
<button type="submit" class="btn">Save</button>
</form></td><td><a href="/tags/color/{id}">New color</a> {delete}</td></tr>"#,
        chip = chip(&tag.name, &tag.color),
        weekly = minutes_readable(tag.quota.weekly_total()),
        id = tag.id,
        name = html_escape(&tag.name),
        color = html_escape(&tag.color),
        quotas = quota_inputs(&tag.quota, &prefix),
        delete = delete,
    )
}

fn create_form() -> String {
    format!(
        r#"<section class="card"><h2>New tag</h2>
<form method="post" action="/tags">
<input type="hidden" name="accion" value="create">
<label for="new_name">Name:</label>
<input type="text" id="new_name" name="name" maxlength="50" required>
<fieldset><legend>Quota per weekday (minutes):</legend>{}</fieldset>
<button type="submit" class="btn">Create</button>
</form></section>"#,
        quota_inputs(&WeekQuota::default(), "new")
    )
}

pub fn page(rows: &[TagRow], flash: Option<&Flash>) -> String {
    let mut content = String::from("<h1>Tags</h1>");

    if rows.is_empty() {
        content.push_str(r#"<p class="empty">No tags yet.</p>"#);
    } else {
        content.push_str(
            r#"<table class="tags"><thead><tr><th>Tag</th><th>Weekly quota</th><th>Edit</th><th></th></tr></thead><tbody>"#,
        );
        for row in rows {
            content.push_str(&tag_row(row));
        }
        content.push_str("</tbody></table>");
    }

    content.push_str(&create_form());
    base("Tags", &content, CONFIRM_SCRIPT, flash)
}
