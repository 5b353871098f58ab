use std::fmt;

use serde::{Serialize, Serializer};

use super::model::{CellValue, ReportTable};

// ---------------------------------------------------------------------------
// DisplayCell – one rendered cell
// ---------------------------------------------------------------------------

/// A cell ready for display: plain text, or a report link labelled with the
/// company name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DisplayCell {
    Text(String),
    Link { href: String, label: String },
}

impl DisplayCell {
    pub fn empty() -> Self {
        DisplayCell::Text(String::new())
    }

    /// Anchor markup for links (opens in a new tab), escaped text otherwise.
    pub fn to_markup(&self) -> String {
        match self {
            DisplayCell::Text(s) => html_escape(s),
            DisplayCell::Link { href, label } => format!(
                r#"<a href="{}" target="_blank">{}</a>"#,
                html_escape(href),
                html_escape(label)
            ),
        }
    }

    /// The underlying value: the URL for links.
    pub fn plain(&self) -> &str {
        match self {
            DisplayCell::Text(s) => s,
            DisplayCell::Link { href, .. } => href,
        }
    }
}

impl fmt::Display for DisplayCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DisplayCell::Text(s) => write!(f, "{s}"),
            DisplayCell::Link { .. } => write!(f, "{}", self.to_markup()),
        }
    }
}

impl Serialize for DisplayCell {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

// ---------------------------------------------------------------------------
// DisplayTable
// ---------------------------------------------------------------------------

/// The filtered view rendered to strings, plus where the link column sits.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DisplayTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<DisplayCell>>,
    pub link_column: Option<usize>,
}

impl DisplayTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Render a (filtered) report table for display.
///
/// * publication dates become `YYYY-MM-DD`, missing ones an empty string
/// * the report-link column becomes a link labelled with the company, when
///   both columns exist and the row has a non-blank link and a company
/// * missing values render as empty strings everywhere
pub fn present(table: &ReportTable) -> DisplayTable {
    let roles = table.roles;
    let link_roles = roles.report_link.zip(roles.company);

    let rows = table
        .records
        .iter()
        .map(|record| {
            record
                .cells
                .iter()
                .enumerate()
                .map(|(idx, cell)| match link_roles {
                    Some((link_idx, _)) if idx == link_idx => {
                        match (&record.report_link, &record.company) {
                            (Some(href), Some(label)) => DisplayCell::Link {
                                href: href.clone(),
                                label: label.clone(),
                            },
                            _ => DisplayCell::empty(),
                        }
                    }
                    _ if Some(idx) == roles.publication_date => format_date_cell(cell),
                    _ => DisplayCell::Text(cell.to_string()),
                })
                .collect()
        })
        .collect();

    DisplayTable {
        headers: table.headers.clone(),
        rows,
        link_column: link_roles.map(|(link_idx, _)| link_idx),
    }
}

fn format_date_cell(cell: &CellValue) -> DisplayCell {
    match cell.as_date() {
        Some(d) => DisplayCell::Text(d.format("%Y-%m-%d").to_string()),
        None => DisplayCell::Text(cell.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn link_table(rows: Vec<(CellValue, CellValue)>) -> ReportTable {
        ReportTable::from_rows(
            vec![" company ".into(), "Country".into(), "Report Link".into()],
            rows.into_iter()
                .map(|(company, link)| vec![company, CellValue::text("Germany"), link])
                .collect(),
            None,
        )
    }

    #[test]
    fn test_hyperlink_scenarios() {
        let table = link_table(vec![
            (CellValue::text("Acme"), CellValue::text("https://x.test/r")),
            (CellValue::text("Beta"), CellValue::text("")),
            (CellValue::Null, CellValue::text("https://x.test/r")),
            (CellValue::text("Delta"), CellValue::Text("   ".into())),
        ]);
        let display = present(&table);

        assert_eq!(display.link_column, Some(2));
        assert_eq!(
            display.rows[0][2],
            DisplayCell::Link {
                href: "https://x.test/r".into(),
                label: "Acme".into()
            }
        );
        assert_eq!(
            display.rows[0][2].to_markup(),
            r#"<a href="https://x.test/r" target="_blank">Acme</a>"#
        );
        assert_eq!(display.rows[1][2], DisplayCell::empty());
        assert_eq!(display.rows[2][2], DisplayCell::empty());
        assert_eq!(display.rows[3][2], DisplayCell::empty());
        assert_eq!(display.rows[2][0], DisplayCell::empty());
    }

    #[test]
    fn test_link_column_stays_plain_without_company_column() {
        let table = ReportTable::from_rows(
            vec!["Name".into(), "Report link".into()],
            vec![
                vec![CellValue::text("Acme"), CellValue::text("https://x.test/r")],
                vec![CellValue::text("Beta"), CellValue::Null],
            ],
            None,
        );
        let display = present(&table);
        assert_eq!(display.link_column, None);
        assert_eq!(display.rows[0][1], DisplayCell::Text("https://x.test/r".into()));
        assert_eq!(display.rows[1][1], DisplayCell::empty());
    }

    #[test]
    fn test_dates_render_without_time() {
        let day = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let table = ReportTable::from_rows(
            vec!["Company".into(), "Publication date".into(), "Employees".into()],
            vec![
                vec![
                    CellValue::text("Acme"),
                    CellValue::DateTime(day.and_hms_opt(9, 15, 0).unwrap()),
                    CellValue::Integer(1200),
                ],
                vec![CellValue::text("Beta"), CellValue::Null, CellValue::Float(3.5)],
                vec![CellValue::text("Gamma"), CellValue::text("soon"), CellValue::Null],
            ],
            None,
        );
        let display = present(&table);
        assert_eq!(display.rows[0][1], DisplayCell::Text("2024-03-01".into()));
        assert_eq!(display.rows[1][1], DisplayCell::empty());
        assert_eq!(display.rows[2][1], DisplayCell::Text("soon".into()));
        assert_eq!(display.rows[0][2], DisplayCell::Text("1200".into()));
        assert_eq!(display.rows[1][2], DisplayCell::Text("3.5".into()));
        assert_eq!(display.rows[2][2], DisplayCell::empty());
    }

    #[test]
    fn test_non_finite_dates_render_blank() {
        let table = ReportTable::from_rows(
            vec!["Company".into(), "Publication date".into()],
            vec![
                vec![CellValue::text("Acme"), CellValue::Float(f64::NAN)],
                vec![CellValue::text("Beta"), CellValue::Float(f64::NEG_INFINITY)],
            ],
            None,
        );
        let display = present(&table);
        assert_eq!(display.rows[0][1], DisplayCell::empty());
        assert_eq!(display.rows[1][1], DisplayCell::empty());
    }

    #[test]
    fn test_markup_escapes_text_and_attributes() {
        let cell = DisplayCell::Link {
            href: "https://x.test/?a=1&b=\"2\"".into(),
            label: "A<B> & Co".into(),
        };
        assert_eq!(
            cell.to_markup(),
            r#"<a href="https://x.test/?a=1&amp;b=&quot;2&quot;" target="_blank">A&lt;B&gt; &amp; Co</a>"#
        );
        assert_eq!(DisplayCell::Text("<b>".into()).to_markup(), "&lt;b&gt;");
    }

    #[test]
    fn test_empty_table_presents_headers_only() {
        let display = present(&link_table(vec![]));
        assert!(display.is_empty());
        assert_eq!(display.headers.len(), 3);
    }
}
