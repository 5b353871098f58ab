//! Export of the filtered dashboard data.
//!
//! - **HTML**: standalone page with the display table, report links clickable
//! - **JSON**: array of row objects keyed by column header
//! - **CSV**: the filtered data, report links as plain URLs
//!
//! ```ignore
//! report::generate("reports.html", &display)?;  // format picked by extension
//! ```

pub mod html;

use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::data::present::{DisplayCell, DisplayTable};

/// Write `display` to `path`, picking the format from the file extension.
pub fn generate<P: AsRef<Path>>(path: P, display: &DisplayTable) -> Result<()> {
    let path = path.as_ref();
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    let mut file = std::fs::File::create(path)
        .with_context(|| format!("creating {}", path.display()))?;

    match ext.as_str() {
        "html" | "htm" => html::write(&mut file, display).context("writing HTML report")?,
        "json" => write_json(&mut file, display)?,
        _ => write_csv(&mut file, display)?,
    }
    log::info!("Exported {} rows to {}", display.len(), path.display());
    Ok(())
}

/// One row keyed by column header, in column order.
struct JsonRow<'a> {
    headers: &'a [String],
    cells: &'a [DisplayCell],
}

impl Serialize for JsonRow<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.cells.len()))?;
        for (header, cell) in self.headers.iter().zip(self.cells) {
            map.serialize_entry(header, cell)?;
        }
        map.end()
    }
}

/// One JSON object per row; link cells carry their anchor markup.
pub fn write_json<W: Write>(writer: &mut W, display: &DisplayTable) -> Result<()> {
    let rows: Vec<JsonRow<'_>> = display
        .rows
        .iter()
        .map(|cells| JsonRow {
            headers: &display.headers,
            cells,
        })
        .collect();
    serde_json::to_writer_pretty(writer, &rows).context("serializing JSON report")?;
    Ok(())
}

/// CSV with the header row first; link cells are written as the bare URL.
pub fn write_csv<W: Write>(writer: &mut W, display: &DisplayTable) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer
        .write_record(&display.headers)
        .context("writing CSV header")?;
    for row in &display.rows {
        csv_writer
            .write_record(row.iter().map(|cell| cell.plain()))
            .context("writing CSV row")?;
    }
    csv_writer.flush().context("flushing CSV")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value as JsonValue;

    fn display() -> DisplayTable {
        DisplayTable {
            headers: vec!["Company".into(), "Report link".into()],
            rows: vec![
                vec![
                    DisplayCell::Text("Acme".into()),
                    DisplayCell::Link {
                        href: "https://x.test/r".into(),
                        label: "Acme".into(),
                    },
                ],
                vec![DisplayCell::Text("Beta".into()), DisplayCell::empty()],
            ],
            link_column: Some(1),
        }
    }

    #[test]
    fn test_csv_writes_bare_urls() {
        let mut out = Vec::new();
        write_csv(&mut out, &display()).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines, vec!["Company,Report link", "Acme,https://x.test/r", "Beta,"]);
    }

    #[test]
    fn test_json_keeps_link_markup() {
        let mut out = Vec::new();
        write_json(&mut out, &display()).unwrap();
        let parsed: JsonValue = serde_json::from_slice(&out).unwrap();
        assert_eq!(parsed[0]["Company"], "Acme");
        assert_eq!(
            parsed[0]["Report link"],
            r#"<a href="https://x.test/r" target="_blank">Acme</a>"#
        );
        assert_eq!(parsed[1]["Report link"], "");
    }

    #[test]
    fn test_generate_dispatches_on_extension() {
        let dir = tempfile::tempdir().unwrap();
        let html_path = dir.path().join("out.HTML");
        generate(&html_path, &display()).unwrap();
        let html = std::fs::read_to_string(&html_path).unwrap();
        assert!(html.contains(r#"<table class="csrd-table">"#));

        let csv_path = dir.path().join("out.csv");
        generate(&csv_path, &display()).unwrap();
        assert!(std::fs::read_to_string(&csv_path).unwrap().starts_with("Company,"));
    }
}
