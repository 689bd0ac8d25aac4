use crate::core::report::HomeView;
use crate::utils::formatting::{chip, html_escape};
use crate::utils::time::{format_hm, format_hms, minutes_readable};
use crate::web::flash::Flash;
use crate::web::render::layout::base;
use crate::web::render::{difference_span, tag_checkboxes, tag_chips};

/// Advances every `[data-tick]` element by `data-rate` seconds per second.
/// Display only: the values come from the server.
const TICK_SCRIPT: &str = r#"
<script>
(function () {
  function pad(n) { return String(n).padStart(2, '0'); }
  function hm(s) { const a = Math.abs(s); return pad(Math.floor(a / 3600)) + ':' + pad(Math.floor((a % 3600) / 60)); }
  const ticking = document.querySelectorAll('[data-tick]');
  if (!ticking.length) return;
  setInterval(function () {
    ticking.forEach(function (el) {
      const s = parseInt(el.dataset.seconds, 10) + parseInt(el.dataset.rate || '1', 10);
      el.dataset.seconds = s;
      switch (el.dataset.tick) {
        case 'clock': el.textContent = hm(s) + ':' + pad(s % 60); break;
        case 'total': el.textContent = (s < 0 ? '-' : '') + hm(s); break;
        case 'difference':
          el.textContent = (s < 0 ? '-' : '+') + hm(s);
          el.className = 'difference ' + (s < 0 ? 'negative' : 'positive');
          break;
      }
    });
  }, 1000);
})();
</script>
"#;

/// Keeps the manual form's end and duration fields in sync.
const MANUAL_FORM_SCRIPT: &str = r#"
<script>
(function () {
  const start = document.getElementById('manual_start');
  const end = document.getElementById('manual_end');
  const hours = document.getElementById('manual_hours');
  const minutes = document.getElementById('manual_minutes');
  if (!start) return;
  function pad(n) { return String(n).padStart(2, '0'); }
  function updateEnd() {
    const h = parseInt(hours.value || '0', 10);
    const m = parseInt(minutes.value || '0', 10);
    if (!start.value || (h === 0 && m === 0)) return;
    const d = new Date(new Date(start.value).getTime() + (h * 3600 + m * 60) * 1000);
    end.value = d.getFullYear() + '-' + pad(d.getMonth() + 1) + '-' + pad(d.getDate()) +
      'T' + pad(d.getHours()) + ':' + pad(d.getMinutes());
  }
  function updateDuration() {
    if (!start.value || !end.value) return;
    let diff = new Date(end.value) - new Date(start.value);
    if (diff < 0) diff = 0;
    hours.value = Math.floor(diff / 3600000);
    minutes.value = Math.floor((diff % 3600000) / 60000);
  }
  hours.addEventListener('input', updateEnd);
  minutes.addEventListener('input', updateEnd);
  start.addEventListener('change', function () { updateEnd(); updateDuration(); });
  end.addEventListener('change', updateDuration);
})();
</script>
"#;

fn tick_attrs(kind: &str, seconds: i64, rate: usize, ticking: bool) -> String {
    if ticking && rate > 0 {
        format!(
            r#" data-tick="{}" data-seconds="{}" data-rate="{}""#,
            kind, seconds, rate
        )
    } else {
        String::new()
    }
}

fn summary_section(view: &HomeView) -> String {
    let today = &view.today;
    let running_groups = today.groups.iter().filter(|g| g.running).count();

    let mut html = String::from(r#"<section class="today-summary card">"#);
    html.push_str(&format!(
        r#"<p><strong>Today:</strong> <span id="total_today"{}>{}</span> ({})</p>"#,
        tick_attrs("total", today.total_seconds, 1, today.running),
        format_hm(today.total_seconds),
        difference_span(
            today.difference,
            &tick_attrs("difference", today.difference, running_groups, today.running)
        ),
    ));

    if !today.groups.is_empty() {
        html.push_str(
            "<table class=\"group-table\"><thead><tr><th>Tag</th><th>Worked</th><th>Quota</th><th>Difference</th></tr></thead><tbody>",
        );
        for g in &today.groups {
            html.push_str(&format!(
                "<tr><td>{}</td><td><span{}>{}</span></td><td>{}</td><td>{}</td></tr>",
                chip(&g.name, &g.color),
                tick_attrs("total", g.seconds, 1, g.running),
                format_hm(g.seconds),
                format_hm(g.quota_minutes * 60),
                difference_span(g.difference, &tick_attrs("difference", g.difference, 1, g.running)),
            ));
        }
        html.push_str("</tbody></table>");
    }

    html.push_str("</section>");
    html
}

fn timer_section(view: &HomeView) -> String {
    let mut html = String::from(r#"<section class="timer card"><h2>Live timer</h2>"#);
    html.push_str(r#"<form method="post" action="/">"#);

    match &view.active {
        Some(entry) => {
            html.push_str(&format!(
                r#"<p>Elapsed: <span id="elapsed"{}>{}</span></p>"#,
                tick_attrs("clock", view.elapsed, 1, true),
                format_hms(view.elapsed)
            ));
            html.push_str(&format!(
                "<p>{} {}</p>",
                tag_chips(&view.tags, &entry.tag_ids),
                html_escape(entry.description.as_deref().unwrap_or(""))
            ));
            html.push_str(r#"<input type="hidden" name="accion" value="stop">"#);
            html.push_str(r#"<button type="submit" class="btn stop">Stop</button>"#);
        }
        None => {
            html.push_str("<p>No timer is running.</p>");
            html.push_str(r#"<input type="hidden" name="accion" value="start">"#);
            html.push_str(r#"<label for="description">Description (optional):</label>"#);
            html.push_str(r#"<input type="text" id="description" name="description" placeholder="What are you working on?">"#);
            html.push_str(&tags_field(view, "start_tag"));
            html.push_str(r#"<button type="submit" class="btn start">Start</button>"#);
        }
    }

    html.push_str("</form></section>");
    html
}

fn tags_field(view: &HomeView, id_prefix: &str) -> String {
    if view.tags.is_empty() {
        return r#"<p class="note">No tags yet. <a href="/tags">Create one</a> first.</p>"#
            .to_string();
    }
    format!(
        "<fieldset><legend>Tags:</legend>{}</fieldset>",
        tag_checkboxes(&view.tags, "tags", id_prefix, &[])
    )
}

fn manual_section(view: &HomeView) -> String {
    let mut html = String::from(r#"<section class="manual card">"#);

    html.push_str("<h2>Manual entry</h2>");
    html.push_str(r#"<form method="post" action="/">"#);
    html.push_str(r#"<input type="hidden" name="accion" value="manual">"#);
    html.push_str(r#"<label for="manual_start">Start:</label>"#);
    html.push_str(r#"<input type="datetime-local" id="manual_start" name="start" required>"#);
    html.push_str(r#"<div class="duration-and-end"><div class="duration-group">"#);
    html.push_str(r#"<label for="manual_hours">Duration (hours and minutes):</label>"#);
    html.push_str(r#"<input type="number" id="manual_hours" name="hours" min="0" value="0">"#);
    html.push_str(r#"<input type="number" id="manual_minutes" name="minutes" min="0" max="59" value="0">"#);
    html.push_str(r#"</div><div class="end-group">"#);
    html.push_str(r#"<label for="manual_end">End:</label>"#);
    html.push_str(r#"<input type="datetime-local" id="manual_end" name="end">"#);
    html.push_str("</div></div>");
    html.push_str(r#"<label for="manual_description">Description (optional):</label>"#);
    html.push_str(r#"<input type="text" id="manual_description" name="description" placeholder="Activity description">"#);
    html.push_str(&tags_field(view, "manual_tag"));
    html.push_str(r#"<button type="submit" class="btn manual">Record entry</button>"#);
    html.push_str("</form>");

    html.push_str("<h2>Cancel hours</h2>");
    html.push_str(r#"<form method="post" action="/">"#);
    html.push_str(r#"<input type="hidden" name="accion" value="cancelar">"#);
    html.push_str(r#"<label for="cancel_date">Date:</label>"#);
    html.push_str(&format!(
        r#"<input type="date" id="cancel_date" name="date" value="{}" required>"#,
        view.now.date()
    ));
    html.push_str(r#"<label for="cancel_hours">Hours:</label>"#);
    html.push_str(r#"<input type="number" id="cancel_hours" name="hours" min="0" value="0" required>"#);
    html.push_str(r#"<label for="cancel_minutes">Minutes:</label>"#);
    html.push_str(r#"<input type="number" id="cancel_minutes" name="minutes" min="0" max="59" value="0" required>"#);
    html.push_str(r#"<label for="cancel_description">Description (optional):</label>"#);
    html.push_str(r#"<input type="text" id="cancel_description" name="description" placeholder="Reason for the cancellation">"#);
    if !view.tags.is_empty() {
        html.push_str(&format!(
            "<fieldset><legend>Tags (optional):</legend>{}</fieldset>",
            tag_checkboxes(&view.tags, "tags", "cancel_tag", &[])
        ));
    }
    html.push_str(r#"<button type="submit" class="btn cancel">Cancel hours</button>"#);
    html.push_str("</form>");

    html.push_str(&format!(
        r#"<p class="note">Daily maximum for untagged entries: {}.</p>"#,
        minutes_readable(view.daily_max_minutes)
    ));
    html.push_str("</section>");
    html
}

pub fn page(view: &HomeView, flash: Option<&Flash>) -> String {
    let content = format!(
        "<h1>Time tracker</h1>{}{}{}",
        summary_section(view),
        timer_section(view),
        manual_section(view)
    );

    let scripts = format!("{}{}", TICK_SCRIPT, MANUAL_FORM_SCRIPT);
    base("Home", &content, &scripts, flash)
}
