//! Standalone HTML page for the filtered report table

use std::io::{self, Write};

use crate::data::present::{DisplayTable, html_escape};

pub const PAGE_TITLE: &str = "Global CSRD Reports Dashboard";

pub fn write<W: Write>(writer: &mut W, display: &DisplayTable) -> io::Result<()> {
    write!(
        writer,
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title}</title>
    <style>
        body {{ font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Helvetica, Arial, sans-serif; margin: 2rem; }}
        h1 {{ font-size: 2rem; font-weight: 700; margin: 0 0 1.5rem 0; }}
        .count {{ color: #555; margin-bottom: 1rem; }}
        .csrd-table {{ border-collapse: collapse; width: 100%; }}
        .csrd-table th, .csrd-table td {{ border: 1px solid #ddd; padding: 0.4rem 0.6rem; }}
        .csrd-table thead th {{ text-align: center !important; background: #0f4c81; color: white; }}
        .csrd-table tbody tr:nth-child(even) {{ background: #f5f8fb; }}
        .csrd-table td.report-link {{ white-space: nowrap; }}
        .csrd-table td.report-link a {{ color: #0f4c81; }}
    </style>
</head>
<body>
    <h1>{title}</h1>
    <div class="count">{count} reports</div>
"#,
        title = PAGE_TITLE,
        count = display.len()
    )?;

    write_table(writer, display)?;

    writeln!(writer, "</body>\n</html>")
}

/// `<table class="csrd-table">` with anchors in the link column, whose cells
/// carry `class="report-link"`.
pub fn write_table<W: Write>(writer: &mut W, display: &DisplayTable) -> io::Result<()> {
    writeln!(writer, r#"<table class="csrd-table">"#)?;
    writeln!(writer, "  <thead>\n    <tr>")?;
    for header in &display.headers {
        writeln!(writer, "      <th>{}</th>", html_escape(header))?;
    }
    writeln!(writer, "    </tr>\n  </thead>\n  <tbody>")?;
    for row in &display.rows {
        writeln!(writer, "    <tr>")?;
        for (idx, cell) in row.iter().enumerate() {
            if display.link_column == Some(idx) {
                writeln!(writer, r#"      <td class="report-link">{}</td>"#, cell.to_markup())?;
            } else {
                writeln!(writer, "      <td>{}</td>", cell.to_markup())?;
            }
        }
        writeln!(writer, "    </tr>")?;
    }
    writeln!(writer, "  </tbody>\n</table>")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::present::DisplayCell;

    #[test]
    fn test_table_contains_anchor_and_escaped_text() {
        let display = DisplayTable {
            headers: vec!["Company".into(), "Report link".into()],
            rows: vec![vec![
                DisplayCell::Text("R&D Corp".into()),
                DisplayCell::Link {
                    href: "https://x.test/r".into(),
                    label: "R&D Corp".into(),
                },
            ]],
            link_column: Some(1),
        };
        let mut out = Vec::new();
        write(&mut out, &display).unwrap();
        let html = String::from_utf8(out).unwrap();

        assert!(html.contains("<th>Report link</th>"));
        assert!(html.contains("<td>R&amp;D Corp</td>"));
        assert!(html.contains(
            r#"<td class="report-link"><a href="https://x.test/r" target="_blank">R&amp;D Corp</a></td>"#
        ));
        assert!(html.contains("1 reports"));
        assert!(html.trim_end().ends_with("</html>"));
    }

    #[test]
    fn test_empty_table_still_has_header_row() {
        let display = DisplayTable {
            headers: vec!["Company".into()],
            ..Default::default()
        };
        let mut out = Vec::new();
        write_table(&mut out, &display).unwrap();
        let html = String::from_utf8(out).unwrap();
        assert!(html.contains("<th>Company</th>"));
        assert!(!html.contains("<td>"));
    }

    #[test]
    fn test_only_the_link_column_is_marked() {
        let display = DisplayTable {
            headers: vec!["Report link".into(), "Company".into()],
            rows: vec![vec![DisplayCell::empty(), DisplayCell::Text("Beta".into())]],
            link_column: Some(0),
        };
        let mut out = Vec::new();
        write_table(&mut out, &display).unwrap();
        let html = String::from_utf8(out).unwrap();
        assert!(html.contains(r#"<td class="report-link"></td>"#));
        assert!(html.contains("<td>Beta</td>"));

        let plain = DisplayTable {
            link_column: None,
            ..display
        };
        let mut out = Vec::new();
        write_table(&mut out, &plain).unwrap();
        assert!(!String::from_utf8(out).unwrap().contains("report-link"));
    }
}
