use crate::utils::formatting::html_escape;
use crate::web::flash::{Flash, FlashKind};

const NAV: [(&str, &str); 5] = [
    ("/", "Home"),
    ("/logs", "Logs"),
    ("/calendar", "Calendar"),
    ("/tags", "Tags"),
    ("/settings", "Settings"),
];

fn flash_html(flash: Option<&Flash>) -> String {
    match flash {
        Some(f) => {
            let class = match f.kind {
                FlashKind::Success => "success",
                FlashKind::Warning => "warning",
            };
            format!(
                r#"<div class="flash-messages"><div class="flash {}">{}</div></div>"#,
                class,
                html_escape(&f.message)
            )
        }
        None => String::new(),
    }
}

/// Base page with navigation, flash message and the shared stylesheet.
pub fn base(title: &str, content: &str, scripts: &str, flash: Option<&Flash>) -> String {
    let nav: String = NAV
        .iter()
        .map(|(href, label)| format!(r#"<li><a href="{}">{}</a></li>"#, href, label))
        .collect();

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title} - rTimeTracker</title>
    <link rel="stylesheet" href="/static/style.css">
</head>
<body>
    <nav class="navbar">
        <ul>{nav}</ul>
    </nav>
    <div class="container">
        {flash}
        {content}
    </div>
    {scripts}
</body>
</html>
"#,
        title = html_escape(title),
        nav = nav,
        flash = flash_html(flash),
        content = content,
        scripts = scripts,
    )
}
