//! HTML pages. Every function here is pure: view data in, markup out.

pub mod calendar;
pub mod home;
pub mod layout;
pub mod logs;
pub mod settings;
pub mod tags;

use crate::models::tag::Tag;
use crate::utils::formatting::{chip, html_escape};
use crate::utils::time::{difference_class, format_difference};

/// Signed difference with its color class. `attrs` is appended verbatim.
pub fn difference_span(seconds: i64, attrs: &str) -> String {
    format!(
        r#"<span class="difference {}"{}>{}</span>"#,
        difference_class(seconds),
        attrs,
        format_difference(seconds)
    )
}

/// One checkbox per tag, named `name`; `checked` ids start selected.
pub fn tag_checkboxes(tags: &[Tag], name: &str, id_prefix: &str, checked: &[i64]) -> String {
    let mut html = String::from(r#"<div class="tag-picker">"#);
    for tag in tags {
        let input_id = format!("{}_{}", id_prefix, tag.id);
        html.push_str(&format!(
            r#"<label for="{input_id}" class="tag-option"><input type="checkbox" id="{input_id}" name="{name}" value="{id}"{checked}> {chip}</label>"#,
            input_id = input_id,
            name = html_escape(name),
            id = tag.id,
            checked = if checked.contains(&tag.id) { " checked" } else { "" },
            chip = chip(&tag.name, &tag.color),
        ));
    }
    html.push_str("</div>");
    html
}

/// Chips for the given tag ids, in `tags` order.
pub fn tag_chips(tags: &[Tag], ids: &[i64]) -> String {
    tags.iter()
        .filter(|t| ids.contains(&t.id))
        .map(|t| chip(&t.name, &t.color))
        .collect::<Vec<_>>()
        .join(" ")
}
