//! Printable renderings of a sheet
use crate::grid::{ColumnWidth, GridRow, GridView, Preview};
use crate::model::Theme;
use anyhow::Context;
use maud::{html, Markup, PreEscaped, DOCTYPE};
use ratatui::{buffer::Buffer, layout::Rect, text::Span, widgets::Widget};
use std::fs;
use std::path::Path;

/// Default name of the HTML file written from the terminal UI
pub(crate) const DEFAULT_HTML_FILE: &str = "habitgrid.html";

static CSS: &str = "
@page { size: A4 landscape; margin: 10mm; }
* { box-sizing: border-box; }
body { font-family: sans-serif; color: #0f172a; margin: 0; padding: 24px; }
.sheet { max-width: 1100px; margin: 0 auto; }
h1 { text-align: center; font-size: 28px; margin: 0 0 8px; }
.subtitle { text-align: center; color: #64748b; margin-bottom: 20px; }
.subtitle .days { font-weight: bold; margin-left: 12px; }
table { width: 100%; border-collapse: collapse; border: 2px solid #0f172a; }
th, td { border: 1px solid #0f172a; text-align: center; height: 40px; }
th.corner { width: 9rem; text-align: left; padding: 4px 8px; }
th.corner .dates { display: block; text-align: right; font-size: 10px; color: #64748b; }
th.corner .habits { display: block; font-size: 15px; }
th.date { min-width: 32px; padding: 2px; vertical-align: bottom; }
table.narrow th.date { min-width: 28px; }
th.date .weekday { display: block; font-size: 10px; color: #94a3b8; }
th.date .day { display: block; font-family: monospace; font-weight: bold; }
td.habit { text-align: left; padding: 4px 8px; font-weight: bold; white-space: nowrap; }
td.habit .number { color: #2563eb; margin-right: 6px; }
td.blank-habit span { display: block; border-bottom: 1px dashed #cbd5e1; height: 16px; margin: 0 8px; }
.colorful th.weekend .weekday, .colorful th.weekend .day { color: #ea580c; }
.colorful h1 { color: #1d4ed8; }
.footer { display: flex; gap: 24px; margin-top: 28px; }
.box { flex: 1; border: 2px solid #0f172a; border-radius: 10px; padding: 12px 16px; position: relative; }
.box.note { flex: 1.5; }
.box .label { position: absolute; top: -10px; left: 14px; background: #fff; padding: 0 6px; font-size: 12px; font-weight: bold; }
.box p { margin: 8px 0 0; font-size: 17px; }
.colorful .box.reward { background: #eff6ff; }
.colorful .box.note { background: #fdf2f8; }
.signature { width: 10rem; display: flex; flex-direction: column; justify-content: flex-end; align-items: center; }
.signature .line { width: 100%; border-bottom: 2px solid #0f172a; margin-bottom: 6px; }
.signature span { font-size: 11px; font-weight: bold; color: #94a3b8; }
.motto .dot { margin: 0 8px; }
.motto { text-align: center; font-size: 11px; color: #94a3b8; margin-top: 24px; }
@media print {
  body { padding: 0; }
  * { background: #fff !important; color: #000 !important; }
  td.habit .number { display: none; }
}
";

/// A standalone HTML page containing only the sheet
pub(crate) fn html_document(view: &GridView) -> Markup {
    let theme_class = match view.theme {
        Theme::Monochrome => "monochrome",
        Theme::Colorful => "colorful",
    };
    let table_class = match view.column_width {
        ColumnWidth::Regular => "grid",
        ColumnWidth::Narrow => "grid narrow",
    };
    html! {
        (DOCTYPE)
        html lang="zh-CN" {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (view.title) }
                style { (PreEscaped(CSS)) }
            }
            body class=(theme_class) {
                div.sheet {
                    h1 { (view.title) }
                    div.subtitle {
                        span.range { "📅 " (view.range_label) }
                        span.days { (view.day_count_label()) }
                    }
                    table class=(table_class) {
                        thead {
                            tr {
                                th.corner {
                                    span.dates { "📅 日期" }
                                    span.habits { "📝 习惯" }
                                }
                                @for col in &view.columns {
                                    th.date.weekend[col.weekend] {
                                        span.weekday { (col.weekday_label) }
                                        span.day { (col.day) }
                                    }
                                }
                            }
                        }
                        tbody {
                            @for row in &view.rows {
                                (render_row(row, view.columns.len()))
                            }
                        }
                    }
                    div.footer {
                        div.box.reward {
                            span.label { "🎁 HOPE 奖励承诺" }
                            p { (view.reward) }
                        }
                        div.box.note {
                            span.label { "💬 LOVE 家长寄语" }
                            p { (view.note) }
                        }
                        div.signature {
                            div.line {}
                            span { "家长签名 SIGNATURE" }
                        }
                    }
                    div.motto {
                        span { "✨ 每一个小习惯，都是成长的勋章" }
                        span.dot { "·" }
                        span { "Created with 寒假打卡助手" }
                    }
                }
            }
        }
    }
}

fn render_row(row: &GridRow, cells: usize) -> Markup {
    html! {
        tr {
            @match row {
                GridRow::Habit { number, label } => {
                    td.habit {
                        span.number { (number) }
                        span.label { (label) }
                    }
                }
                GridRow::Blank => {
                    td.habit.blank-habit { span {} }
                }
            }
            @for _ in 0..cells {
                td.mark {}
            }
        }
    }
}

pub(crate) fn write_html(path: &Path, view: &GridView) -> anyhow::Result<()> {
    fs::write(path, html_document(view).into_string())
        .with_context(|| format!("failed to write {}", path.display()))?;
    tracing::info!(
        path = %path.display(),
        first = ?view.dates().next(),
        days = view.day_count(),
        blank_rows = view.blank_rows(),
        "wrote printable sheet"
    );
    Ok(())
}

/// The terminal preview of the sheet as plain lines of text
pub(crate) fn plain_text(view: &GridView) -> String {
    let preview = Preview::new(view);
    let area = Rect::new(0, 0, preview.width(), preview.height());
    let mut buffer = Buffer::empty(area);
    preview.render(area, &mut buffer);
    let mut s = buffer_lines(&buffer).join("\n");
    s.push('\n');
    s
}

/// Returns the symbols in each row of `buf` with trailing whitespace removed.
/// Cells hidden behind a wide character are skipped.
pub(crate) fn buffer_lines(buf: &Buffer) -> Vec<String> {
    let area = buf.area;
    (area.top()..area.bottom())
        .map(|y| {
            let mut line = String::new();
            let mut x = area.left();
            while x < area.right() {
                let symbol = buf[(x, y)].symbol();
                line.push_str(symbol);
                let width = u16::try_from(Span::raw(symbol).width()).unwrap_or(1);
                x = x.saturating_add(width.max(1));
            }
            line.truncate(line.trim_end().len());
            line
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Configuration;
    use pretty_assertions::assert_eq;
    use time::macros::date;

    fn count(haystack: &str, needle: &str) -> usize {
        haystack.matches(needle).count()
    }

    #[test]
    fn test_html_document() {
        let config = Configuration {
            child_name: String::from("王小明"),
            end_date: Some(date!(2026 - 01 - 28)),
            reward: String::from("去游乐园"),
            ..Configuration::default()
        };
        let html = html_document(&GridView::render(&config)).into_string();
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<title>王小明的寒假打卡表</title>"));
        assert!(html.contains("<h1>王小明的寒假打卡表</h1>"));
        assert!(html.contains("共 14 天"));
        assert!(html.contains(r#"<table class="grid">"#));
        assert_eq!(count(&html, "<tr>"), 9);
        assert_eq!(count(&html, r#"<td class="mark"></td>"#), 8 * 14);
        assert_eq!(count(&html, r#"class="date weekend""#), 4);
        assert_eq!(count(&html, "blank-habit"), 4 + 1);
        assert!(html.contains("<p>去游乐园</p>"));
        assert!(html.contains(&format!("<p>{}</p>", "_".repeat(50))));
        assert!(html.contains("<span>Created with 寒假打卡助手</span>"));
    }

    #[test]
    fn test_html_escapes_text() {
        let config = Configuration {
            child_name: String::from("<b>Tom</b>"),
            habits: vec![String::from("Read & write")],
            ..Configuration::default()
        };
        let html = html_document(&GridView::render(&config)).into_string();
        assert!(html.contains("&lt;b&gt;Tom&lt;/b&gt;的寒假打卡表"));
        assert!(html.contains("Read &amp; write"));
        assert!(!html.contains("<b>Tom</b>"));
    }

    #[test]
    fn test_html_narrow_and_colorful() {
        let config = Configuration {
            theme: Theme::Colorful,
            ..Configuration::default()
        };
        let html = html_document(&GridView::render(&config)).into_string();
        assert!(html.contains(r#"<body class="colorful">"#));
        assert!(html.contains(r#"<table class="grid narrow">"#));
    }

    #[test]
    fn test_write_html() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sheet.html");
        write_html(&path, &GridView::render(&Configuration::default())).unwrap();
        let written = fs::read_to_string(&path).unwrap();
        assert!(written.contains("寒假成长打卡表"));
    }

    #[test]
    fn test_write_html_bad_path() {
        let path = Path::new("/nonexistent-habitgrid-dir/sheet.html");
        let e = write_html(path, &GridView::render(&Configuration::default())).unwrap_err();
        assert_eq!(
            e.to_string(),
            "failed to write /nonexistent-habitgrid-dir/sheet.html"
        );
    }

    #[test]
    fn test_plain_text() {
        let text = plain_text(&GridView::render(&Configuration::default()));
        let lines = text.lines().collect::<Vec<_>>();
        assert_eq!(lines.len(), 27);
        assert_eq!(lines[0].trim(), "寒假成长打卡表");
        assert!(lines[6].starts_with(" 1 阅读30分钟"));
        assert!(text.ends_with('\n'));
    }

    #[test]
    fn test_html_long_range() {
        let config = Configuration {
            end_date: Some(date!(2031 - 07 - 08)),
            ..Configuration::default()
        };
        let view = GridView::render(&config);
        assert_eq!(view.day_count(), 2001);
        let html = html_document(&view).into_string();
        assert_eq!(count(&html, "<th class=\"date"), 2001);
        assert_eq!(count(&html, r#"<td class="mark"></td>"#), 8 * 2001);
    }

    #[test]
    fn test_plain_text_century_range() {
        let config = Configuration {
            end_date: Some(date!(2206 - 02 - 16)),
            ..Configuration::default()
        };
        let text = plain_text(&GridView::render(&config));
        let lines = text.lines().collect::<Vec<_>>();
        assert_eq!(lines.len(), 27);
        assert_eq!(lines[0].trim(), "寒假成长打卡表");
        assert!(lines[1].contains("共 65776 天"), "{}", lines[1]);
        assert!(lines[6].starts_with(" 1 阅读30分钟"));
    }

    #[test]
    fn test_buffer_lines_wide_chars() {
        let buffer = Buffer::with_lines(["打卡 ok  ", "        "]);
        assert_eq!(buffer_lines(&buffer), ["打卡 ok", ""]);
    }
}
