use crate::core::report::WeekCalendar;
use crate::errors::{AppError, AppResult};
use crate::utils::formatting::chip;
use crate::utils::time::format_hm;
use crate::web::flash::Flash;
use crate::web::render::difference_span;
use crate::web::render::layout::base;
use chrono::Duration;

/// Draws the segments embedded in `#segments-data` onto the day columns.
/// `data-step` on the zoom buttons is the minutes per grid row.
const CALENDAR_SCRIPT: &str = r#"
<script>
(function () {
  const data = JSON.parse(document.getElementById('segments-data').textContent);
  const grid = document.getElementById('week-grid');
  const ROW_PX = 24;
  let step = parseInt(localStorage.getItem('calendarStep') || '60', 10);

  function pad(n) { return String(n).padStart(2, '0'); }
  function hm(min) { return pad(Math.floor(min / 60)) + ':' + pad(Math.floor(min % 60)); }

  function draw() {
    const px = ROW_PX / step;
    grid.style.setProperty('--day-height', (1440 * px) + 'px');
    grid.querySelectorAll('.hour-line').forEach(function (el) { el.remove(); });
    grid.querySelectorAll('.segment').forEach(function (el) { el.remove(); });

    grid.querySelectorAll('.day-body').forEach(function (body) {
      for (let m = 0; m < 1440; m += step) {
        const line = document.createElement('div');
        line.className = 'hour-line' + (m % 60 === 0 ? ' full' : '');
        line.style.top = (m * px) + 'px';
        if (body.dataset.day === '0') line.textContent = hm(m);
        body.appendChild(line);
      }
    });

    data.forEach(function (s) {
      const body = grid.querySelector('.day-body[data-day="' + s.day + '"]');
      if (!body) return;
      const el = document.createElement('a');
      el.className = 'segment';
      el.href = '/logs';
      el.style.top = (s.start * px) + 'px';
      el.style.height = Math.max(s.duration * px, 2) + 'px';
      el.style.background = s.color;
      el.title = hm(s.start) + ' - ' + hm(s.start + s.duration) + (s.description ? ' ' + s.description : '');
      el.textContent = s.description;
      body.appendChild(el);
    });

    document.querySelectorAll('.zoom button').forEach(function (b) {
      b.classList.toggle('active', parseInt(b.dataset.step, 10) === step);
    });
  }

  document.querySelectorAll('.zoom button').forEach(function (b) {
    b.addEventListener('click', function () {
      step = parseInt(b.dataset.step, 10);
      localStorage.setItem('calendarStep', String(step));
      draw();
    });
  });

  draw();
})();
</script>
"#;

fn week_nav(cal: &WeekCalendar) -> String {
    let prev = cal.week_start - Duration::days(7);
    let next = cal.week_start + Duration::days(7);
    let last = cal.week_start + Duration::days(6);
    format!(
        r#"<div class="week-nav"><a class="btn" href="/calendar?week={prev}">&laquo; Previous</a><h2>{from} - {to}</h2><a class="btn" href="/calendar?week={next}">Next &raquo;</a><a class="btn" href="/calendar">This week</a></div>"#,
        prev = prev,
        next = next,
        from = cal.week_start.format("%d/%m/%Y"),
        to = last.format("%d/%m/%Y"),
    )
}

fn zoom_controls() -> &'static str {
    r#"<div class="zoom"><span>Zoom:</span><button type="button" data-step="60">1h</button><button type="button" data-step="30">30m</button><button type="button" data-step="15">15m</button></div>"#
}

fn day_columns(cal: &WeekCalendar) -> String {
    let mut html = String::from(r#"<div id="week-grid" class="week-grid">"#);
    for (offset, day) in cal.days.iter().enumerate() {
        html.push_str(&format!(
            r#"<div class="day-column"><div class="day-header"><div class="day-name">{name}</div><div class="day-total">{total}</div><div>{diff}</div></div><div class="day-body" data-day="{offset}"></div></div>"#,
            name = day.date.format("%a %d/%m"),
            total = format_hm(day.total_seconds),
            diff = difference_span(day.difference, ""),
            offset = offset,
        ));
    }
    html.push_str("</div>");
    html
}

fn totals(cal: &WeekCalendar) -> String {
    let mut html = String::from(r#"<section class="card week-totals"><h2>Week so far</h2><ul>"#);
    for t in &cal.totals {
        html.push_str(&format!(
            "<li>{} {} {}</li>",
            chip(&t.name, &t.color),
            format_hm(t.seconds),
            difference_span(t.difference, "")
        ));
    }
    html.push_str(&format!(
        "</ul><p><strong>Total:</strong> {}</p></section>",
        difference_span(cal.difference, "")
    ));
    html
}

pub fn page(cal: &WeekCalendar, flash: Option<&Flash>) -> AppResult<String> {
    let json = serde_json::to_string(&cal.segments)
        .map_err(|e| AppError::Other(format!("segments to JSON: {}", e)))?;

    let mut content = String::from("<h1>Calendar</h1>");
    content.push_str(&week_nav(cal));
    content.push_str(zoom_controls());
    content.push_str(&day_columns(cal));
    content.push_str(&totals(cal));
    // `</` cannot appear inside the script element.
    content.push_str(&format!(
        r#"<script type="application/json" id="segments-data">{}</script>"#,
        json.replace("</", "<\\/")
    ));

    Ok(base("Calendar", &content, CALENDAR_SCRIPT, flash))
}
