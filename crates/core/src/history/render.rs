use crate::history::HistoryEntry;
use chrono::{DateTime, TimeZone};
use std::fmt::Display;

/// Attribute marking elements that carry inspectable metadata.
pub const TOOLTIP_TOGGLE: &str = r#"data-toggle="tooltip""#;

/// en-US short date, e.g. `3/5/2024`.
pub fn format_day<Tz>(at: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    at.format("%-m/%-d/%Y").to_string()
}

pub fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// One history row: the date as the visible label, the full text as tooltip
/// metadata, and an audio player bound to `object_url`.
pub fn render_row(entry: &HistoryEntry, object_url: &str) -> String {
    format!(
        concat!(
            "<tr>",
            r##"<th scope="row"><a href="#" {toggle} "##,
            r#"data-original-title="{title}">{day}</a></th>"#,
            r#"<td><div class="d-flex align-items-center">"#,
            r#"<audio controls><source src="{src}" type="{kind}"></audio>"#,
            "</div></td>",
            "</tr>"
        ),
        toggle = TOOLTIP_TOGGLE,
        title = escape_html(entry.source_text()),
        day = format_day(&entry.created_at()),
        src = escape_html(object_url),
        kind = escape_html(entry.audio().content_type()),
    )
}
