//! Server-rendered HTML fragments for the month page.

use crate::models::{DiaryListItem, UserProfile};

pub fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

/// Labeled number
pub fn statistic(label: &str, value: &str) -> String {
    format!(
        r#"<div class="statistic"><span class="statistic-value">{}</span><span class="statistic-label">{}</span></div>"#,
        escape_html(value),
        escape_html(label)
    )
}

/// Row with a title on the left and a note on the right, a link when `href` is set
pub fn cell(title: &str, note: &str, href: Option<&str>) -> String {
    let inner = format!(
        r#"<span class="cell-title">{}</span><span class="cell-note">{}</span>"#,
        escape_html(title),
        escape_html(note)
    );
    match href {
        Some(href) => format!(
            r#"<a class="cell" href="{}">{}</a>"#,
            escape_html(href),
            inner
        ),
        None => format!(r#"<div class="cell">{}</div>"#, inner),
    }
}

pub fn split_line() -> String {
    r#"<div class="split-line"></div>"#.to_string()
}

/// Static icon row under an entry
pub fn diary_item_interact(write_url: &str) -> String {
    format!(
        r#"<div class="diary-interact"><a href="{}" title="Edit">&#9998;</a><span title="Share">&#8599;</span><span title="More">&#8943;</span></div>"#,
        escape_html(write_url)
    )
}

/// Month overview: totals, then one cell per entry
pub fn month_page(
    app_name: &str,
    month: &str,
    entries: &[DiaryListItem],
    profile: &UserProfile,
    write_url: &str,
) -> String {
    let stats = [
        statistic("Entries this month", &entries.len().to_string()),
        statistic(
            "Entries",
            &profile.total_diary.unwrap_or_default().to_string(),
        ),
        statistic("Words", &profile.total_count.to_string()),
    ]
    .concat();

    let list = entries
        .iter()
        .map(|entry| {
            let write = format!("/diary/write/{}", entry.day);
            [
                cell(&entry.day, &entry.summary, Some(&write)),
                diary_item_interact(&write),
            ]
            .concat()
        })
        .collect::<Vec<_>>()
        .join(&split_line());

    MONTH_HTML
        .replace("{{APP_NAME}}", &escape_html(app_name))
        .replace("{{MONTH}}", &escape_html(month))
        .replace("{{WRITE_URL}}", &escape_html(write_url))
        .replace("{{STATS}}", &stats)
        .replace("{{ENTRIES}}", &list)
}

const MONTH_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>{{APP_NAME}} - {{MONTH}}</title>
  <style>
    body { margin: 0; font-family: system-ui, sans-serif; background: #f7f7f8; color: #1f2937; }
    main { max-width: 640px; margin: 0 auto; padding: 24px 16px; }
    .stats { display: flex; gap: 16px; margin-bottom: 24px; }
    .statistic { flex: 1; display: flex; flex-direction: column; align-items: center; padding: 12px; background: #fff; border-radius: 12px; }
    .statistic-value { font-size: 1.5rem; font-weight: 600; }
    .statistic-label { font-size: 0.8rem; color: #6b7280; }
    .cell { display: flex; justify-content: space-between; gap: 12px; padding: 12px 4px; color: inherit; text-decoration: none; }
    .cell-note { color: #6b7280; overflow: hidden; text-overflow: ellipsis; white-space: nowrap; }
    .split-line { height: 1px; background: #e5e7eb; }
    .diary-interact { display: flex; gap: 16px; padding: 0 4px 12px; color: #9ca3af; }
    .diary-interact a { color: inherit; text-decoration: none; }
    .write { display: block; margin-top: 24px; padding: 12px; text-align: center; border-radius: 12px; background: #3b82f6; color: #fff; text-decoration: none; }
  </style>
</head>
<body>
  <main>
    <h1>{{MONTH}}</h1>
    <section class="stats">{{STATS}}</section>
    <section class="entries">{{ENTRIES}}</section>
    <a class="write" href="{{WRITE_URL}}">Write today</a>
  </main>
</body>
</html>
"#;
