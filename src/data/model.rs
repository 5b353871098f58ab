use std::fmt;

use chrono::{NaiveDate, NaiveDateTime};

// ---------------------------------------------------------------------------
// CellValue – a single cell of the source sheet
// ---------------------------------------------------------------------------

/// A dynamically-typed cell mirroring what spreadsheet readers hand back.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Text(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    Date(NaiveDate),
    DateTime(NaiveDateTime),
    Null,
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Text(s) => write!(f, "{s}"),
            CellValue::Integer(i) => write!(f, "{i}"),
            CellValue::Float(v) if v.is_finite() => write!(f, "{v}"),
            CellValue::Float(_) => Ok(()),
            CellValue::Bool(b) => write!(f, "{b}"),
            CellValue::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            CellValue::DateTime(dt) => write!(f, "{}", dt.format("%Y-%m-%d %H:%M:%S")),
            CellValue::Null => Ok(()),
        }
    }
}

/// Strings spreadsheet tools write for a missing value (the pandas
/// `read_excel` / `read_csv` defaults).
const MISSING_MARKERS: &[&str] = &[
    "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// Whether a raw cell string stands for a missing value. Blank counts too.
pub fn is_missing_marker(s: &str) -> bool {
    let s = s.trim();
    s.is_empty() || MISSING_MARKERS.contains(&s)
}

impl CellValue {
    /// Build a text cell; blank text and missing-value markers become `Null`.
    pub fn text(s: impl Into<String>) -> Self {
        let s = s.into();
        if is_missing_marker(&s) {
            CellValue::Null
        } else {
            CellValue::Text(s)
        }
    }

    /// Build a float cell; NaN and infinities become `Null`.
    pub fn float(v: f64) -> Self {
        if v.is_finite() {
            CellValue::Float(v)
        } else {
            CellValue::Null
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }

    /// Categorical reading of the cell (country, industry, company, link).
    pub fn as_label(&self) -> Option<String> {
        match self {
            CellValue::Null => None,
            CellValue::Text(s) if s.trim().is_empty() => None,
            CellValue::Float(v) if !v.is_finite() => None,
            other => Some(other.to_string()),
        }
    }

    /// Calendar-day reading of the cell. Time of day is dropped.
    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            CellValue::Date(d) => Some(*d),
            CellValue::DateTime(dt) => Some(dt.date()),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Header normalisation and column roles
// ---------------------------------------------------------------------------

/// Flatten a raw header cell into a lookup key: surrounding whitespace is
/// trimmed and every embedded line break becomes a single space.
pub fn normalize_header(raw: &str) -> String {
    raw.trim()
        .replace("\r\n", " ")
        .replace(['\r', '\n'], " ")
}

fn match_key(header: &str) -> String {
    header.trim().to_lowercase()
}

/// Indices of the columns the dashboard gives meaning to, resolved once per
/// table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ColumnRoles {
    pub company: Option<usize>,
    pub country: Option<usize>,
    pub industry: Option<usize>,
    pub publication_date: Option<usize>,
    pub report_link: Option<usize>,
}

impl ColumnRoles {
    /// Resolve roles against (already normalised) headers.
    pub fn resolve(headers: &[String], industry_override: Option<&str>) -> Self {
        let keys: Vec<String> = headers.iter().map(|h| match_key(h)).collect();
        let find = |target: &str| keys.iter().position(|k| k == target);

        let industry = match industry_override {
            Some(name) => find(&match_key(&normalize_header(name))),
            None => keys
                .iter()
                .position(|k| k.starts_with("sasb industry"))
                .or_else(|| keys.iter().position(|k| k.contains("industry"))),
        };

        ColumnRoles {
            company: find("company"),
            country: find("country"),
            industry,
            publication_date: find("publication date"),
            report_link: find("report link"),
        }
    }

    /// Names of required roles that could not be resolved.
    pub fn missing_required(&self) -> Vec<&'static str> {
        [
            ("Company", self.company),
            ("Country", self.country),
            ("industry classification", self.industry),
            ("Publication date", self.publication_date),
        ]
        .into_iter()
        .filter(|(_, idx)| idx.is_none())
        .map(|(name, _)| name)
        .collect()
    }
}

// ---------------------------------------------------------------------------
// ReportRecord – one row of the sheet
// ---------------------------------------------------------------------------

/// A single CSRD report row with its typed attributes pulled out of `cells`.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportRecord {
    pub company: Option<String>,
    pub country: Option<String>,
    pub industry: Option<String>,
    pub publication_date: Option<NaiveDate>,
    pub report_link: Option<String>,
    /// Every column of the source row, in header order.
    pub cells: Vec<CellValue>,
}

impl ReportRecord {
    pub fn from_cells(cells: Vec<CellValue>, roles: &ColumnRoles) -> Self {
        let cell = |idx: Option<usize>| idx.and_then(|i| cells.get(i));
        let company = cell(roles.company).and_then(CellValue::as_label);
        let country = cell(roles.country).and_then(CellValue::as_label);
        let industry = cell(roles.industry).and_then(CellValue::as_label);
        let publication_date = cell(roles.publication_date).and_then(CellValue::as_date);
        let report_link = cell(roles.report_link).and_then(CellValue::as_label);

        ReportRecord {
            company,
            country,
            industry,
            publication_date,
            report_link,
            cells,
        }
    }

    pub fn cell(&self, idx: usize) -> &CellValue {
        self.cells.get(idx).unwrap_or(&CellValue::Null)
    }
}

// ---------------------------------------------------------------------------
// ReportTable – the complete loaded sheet
// ---------------------------------------------------------------------------

/// Headers, rows and resolved column roles.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportTable {
    pub headers: Vec<String>,
    pub records: Vec<ReportRecord>,
    pub roles: ColumnRoles,
}

impl ReportTable {
    /// Build a table from raw headers and rows. Headers are normalised and
    /// short rows are padded with `Null`.
    pub fn from_rows(
        raw_headers: Vec<String>,
        rows: Vec<Vec<CellValue>>,
        industry_override: Option<&str>,
    ) -> Self {
        let headers: Vec<String> = raw_headers.iter().map(|h| normalize_header(h)).collect();
        let roles = ColumnRoles::resolve(&headers, industry_override);
        let width = headers.len();

        let records = rows
            .into_iter()
            .map(|mut cells| {
                cells.resize(width, CellValue::Null);
                ReportRecord::from_cells(cells, &roles)
            })
            .collect();

        ReportTable {
            headers,
            records,
            roles,
        }
    }

    /// A new table holding the given rows (by index, in the given order)
    /// with the same headers and roles.
    pub fn select(&self, indices: &[usize]) -> Self {
        ReportTable {
            headers: self.headers.clone(),
            records: indices
                .iter()
                .filter_map(|&i| self.records.get(i).cloned())
                .collect(),
            roles: self.roles,
        }
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_header_flattens_line_breaks() {
        assert_eq!(
            normalize_header("SASB industry (SICS\r\nIndustries)"),
            "SASB industry (SICS Industries)"
        );
        assert_eq!(normalize_header("  Publication\ndate "), "Publication date");
        assert_eq!(normalize_header("a\rb"), "a b");
    }

    #[test]
    fn test_roles_match_case_insensitively() {
        let headers: Vec<String> = [" COMPANY", "country", "SASB industry (SICS® Industries)", "Publication Date", "Report link"]
            .iter()
            .map(|h| normalize_header(h))
            .collect();
        let roles = ColumnRoles::resolve(&headers, None);
        assert_eq!(roles.company, Some(0));
        assert_eq!(roles.country, Some(1));
        assert_eq!(roles.industry, Some(2));
        assert_eq!(roles.publication_date, Some(3));
        assert_eq!(roles.report_link, Some(4));
        assert!(roles.missing_required().is_empty());
    }

    #[test]
    fn test_industry_falls_back_and_honours_override() {
        let headers = vec!["Company".to_string(), "Industry group".to_string(), "Sector".to_string()];
        assert_eq!(ColumnRoles::resolve(&headers, None).industry, Some(1));
        assert_eq!(ColumnRoles::resolve(&headers, Some(" sector ")).industry, Some(2));
        assert_eq!(ColumnRoles::resolve(&headers, Some("Missing")).industry, None);
    }

    #[test]
    fn test_missing_required_lists_unresolved_roles() {
        let headers = vec!["Company".to_string(), "Report link".to_string()];
        let roles = ColumnRoles::resolve(&headers, None);
        assert_eq!(
            roles.missing_required(),
            vec!["Country", "industry classification", "Publication date"]
        );
    }

    #[test]
    fn test_record_extracts_typed_fields() {
        let table = ReportTable::from_rows(
            vec!["Company".into(), "Country".into(), "Industry".into(), "Publication date".into()],
            vec![vec![
                CellValue::text("Acme"),
                CellValue::text("  "),
                CellValue::text("Banks"),
                CellValue::DateTime(
                    NaiveDate::from_ymd_opt(2024, 3, 1)
                        .unwrap()
                        .and_hms_opt(13, 45, 0)
                        .unwrap(),
                ),
            ]],
            None,
        );
        let rec = &table.records[0];
        assert_eq!(rec.company.as_deref(), Some("Acme"));
        assert_eq!(rec.country, None);
        assert_eq!(rec.industry.as_deref(), Some("Banks"));
        assert_eq!(rec.publication_date, NaiveDate::from_ymd_opt(2024, 3, 1));
        assert_eq!(rec.report_link, None);
    }

    #[test]
    fn test_missing_markers_load_as_null() {
        for marker in ["NaN", "nan", "N/A", "NA", "null", "#N/A", " None "] {
            assert_eq!(CellValue::text(marker), CellValue::Null, "{marker}");
        }
        assert_eq!(CellValue::text("Namibia"), CellValue::Text("Namibia".into()));
        assert_eq!(CellValue::float(f64::NAN), CellValue::Null);
        assert_eq!(CellValue::float(1.5), CellValue::Float(1.5));
    }

    #[test]
    fn test_non_finite_floats_never_print() {
        assert_eq!(CellValue::Float(f64::NAN).to_string(), "");
        assert_eq!(CellValue::Float(f64::INFINITY).as_label(), None);
    }

    #[test]
    fn test_short_rows_are_padded() {
        let table = ReportTable::from_rows(
            vec!["Company".into(), "Country".into()],
            vec![vec![CellValue::text("Acme")]],
            None,
        );
        assert_eq!(table.records[0].cells.len(), 2);
        assert!(table.records[0].cell(1).is_null());
        assert!(table.records[0].cell(7).is_null());
    }
}
