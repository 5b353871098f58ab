use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use arrow::array::{Array, AsArray};
use arrow::datatypes::{
    DataType, Date32Type, Date64Type, Float32Type, Float64Type, Int32Type, Int64Type, TimeUnit,
    TimestampMicrosecondType, TimestampMillisecondType, TimestampNanosecondType,
    TimestampSecondType,
};
use calamine::{Data, Reader, open_workbook_auto};
use chrono::{Days, NaiveDate, NaiveDateTime};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::model::{CellValue, ColumnRoles, ReportTable, normalize_header};
use crate::config::LoadOptions;
use crate::error::DashboardError;

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a report table from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.xlsx` / `.xlsm` / `.xls` / `.ods` – first worksheet, header in row 1
/// * `.csv`     – header row followed by records
/// * `.json`    – `[{ "Company": "...", "Country": "...", ... }, ...]`
/// * `.parquet` – flat columns (strings, numbers, bools, dates, timestamps)
///
/// Any failure, including a missing required column, is reported as
/// [`DashboardError::DataUnavailable`]; no partial table is returned.
pub fn load_file(path: &Path, options: &LoadOptions) -> Result<ReportTable, DashboardError> {
    let table = read_table(path, options).map_err(|e| {
        log::error!("Failed to load {}: {e:#}", path.display());
        DashboardError::data_unavailable(path, &e)
    })?;
    log::info!(
        "Loaded {} reports from {} with columns {:?}",
        table.len(),
        path.display(),
        table.headers
    );
    Ok(table)
}

fn read_table(path: &Path, options: &LoadOptions) -> Result<ReportTable> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let sheet = match ext.as_str() {
        "xlsx" | "xlsm" | "xls" | "ods" => load_workbook(path)?,
        "csv" => load_csv(path)?,
        "json" => load_json(path)?,
        "parquet" | "pq" => load_parquet(path)?,
        other => bail!("Unsupported file extension: .{other}"),
    };

    build_table(sheet, options)
}

/// Header row plus raw cells, before column roles are applied.
struct RawSheet {
    headers: Vec<String>,
    rows: Vec<Vec<CellValue>>,
}

/// Validate required columns, coerce the publication-date column and build
/// the table.
fn build_table(sheet: RawSheet, options: &LoadOptions) -> Result<ReportTable> {
    let RawSheet { headers, mut rows } = sheet;
    let industry_override = options.industry_column.as_deref();

    let normalized: Vec<String> = headers.iter().map(|h| normalize_header(h)).collect();
    let roles = ColumnRoles::resolve(&normalized, industry_override);
    let missing = roles.missing_required();
    if !missing.is_empty() {
        bail!(
            "missing required column(s): {} (found {:?})",
            missing.join(", "),
            normalized
        );
    }

    if let Some(idx) = roles.publication_date {
        for row in &mut rows {
            if let Some(cell) = row.get_mut(idx) {
                let raw = std::mem::replace(cell, CellValue::Null);
                *cell = coerce_date(raw);
            }
        }
    }

    Ok(ReportTable::from_rows(normalized, rows, industry_override))
}

// ---------------------------------------------------------------------------
// Date coercion
// ---------------------------------------------------------------------------

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%d/%m/%Y", "%d.%m.%Y"];

/// Largest serial Excel can represent (9999-12-31).
const EXCEL_MAX_SERIAL: f64 = 2_958_465.0;

/// Turn a publication-date cell into a `Date`/`DateTime` where possible.
/// Cells that cannot be read as a date are returned unchanged.
fn coerce_date(cell: CellValue) -> CellValue {
    let parsed = match &cell {
        CellValue::Text(s) => parse_date_text(s.trim()),
        CellValue::Integer(i) => excel_serial_to_date(*i as f64).map(CellValue::Date),
        CellValue::Float(f) => excel_serial_to_date(*f).map(CellValue::Date),
        _ => None,
    };
    parsed.unwrap_or(cell)
}

fn parse_date_text(s: &str) -> Option<CellValue> {
    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .map(CellValue::DateTime)
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
                .map(CellValue::Date)
        })
}

fn excel_serial_to_date(serial: f64) -> Option<NaiveDate> {
    if !serial.is_finite() || serial < 1.0 || serial > EXCEL_MAX_SERIAL {
        return None;
    }
    NaiveDate::from_ymd_opt(1899, 12, 30)?.checked_add_days(Days::new(serial.floor() as u64))
}

// ---------------------------------------------------------------------------
// Workbook loader
// ---------------------------------------------------------------------------

/// First worksheet of an Excel / OpenDocument workbook. Row 1 is the header;
/// fully blank rows are skipped.
fn load_workbook(path: &Path) -> Result<RawSheet> {
    let mut workbook = open_workbook_auto(path).context("opening workbook")?;
    let range = workbook
        .worksheet_range_at(0)
        .context("workbook contains no worksheets")?
        .context("reading first worksheet")?;

    let mut rows_iter = range.rows();
    let headers: Vec<String> = rows_iter
        .next()
        .context("worksheet is empty")?
        .iter()
        .map(|c| c.to_string())
        .collect();

    let rows = rows_iter
        .map(|row| row.iter().map(workbook_cell).collect::<Vec<_>>())
        .filter(|cells| cells.iter().any(|c| !c.is_null()))
        .collect();

    Ok(RawSheet { headers, rows })
}

fn workbook_cell(cell: &Data) -> CellValue {
    match cell {
        Data::String(s) => CellValue::text(s.as_str()),
        Data::Int(i) => CellValue::Integer(*i),
        Data::Float(f) => CellValue::float(*f),
        Data::Bool(b) => CellValue::Bool(*b),
        Data::DateTime(dt) => dt
            .as_datetime()
            .map_or_else(|| CellValue::float(dt.as_f64()), CellValue::DateTime),
        Data::DateTimeIso(s) | Data::DurationIso(s) => CellValue::text(s.as_str()),
        // Empty cells and spreadsheet errors (#N/A, #REF!, …)
        _ => CellValue::Null,
    }
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout: header row with column names, one report per record. Header
/// cells may be quoted and span several lines.
///
/// Cells stay text so passthrough columns keep their exact spelling
/// (`00123`, `1.50`); only the publication-date column is coerced later.
fn load_csv(path: &Path) -> Result<RawSheet> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(path)
        .context("opening CSV")?;
    let headers: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.to_string())
        .collect();

    let mut rows = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;
        let cells: Vec<CellValue> = record.iter().map(CellValue::text).collect();
        if cells.iter().any(|c| !c.is_null()) {
            rows.push(cells);
        }
    }

    Ok(RawSheet { headers, rows })
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, the default `to_json(orient='records')`):
///
/// ```json
/// [
///   { "Company": "Acme", "Country": "Germany", "Publication date": "2024-03-01", ... },
///   ...
/// ]
/// ```
///
/// Columns are the union of all keys in first-seen order.
fn load_json(path: &Path) -> Result<RawSheet> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    let root: JsonValue = serde_json::from_str(&text).context("parsing JSON")?;

    let records = root.as_array().context("Expected top-level JSON array")?;

    let mut objects = Vec::with_capacity(records.len());
    let mut headers: Vec<String> = Vec::new();
    for (i, rec) in records.iter().enumerate() {
        let obj = rec
            .as_object()
            .with_context(|| format!("Row {i} is not a JSON object"))?;
        for key in obj.keys() {
            if !headers.contains(key) {
                headers.push(key.clone());
            }
        }
        objects.push(obj);
    }

    let rows = objects
        .into_iter()
        .map(|obj| {
            headers
                .iter()
                .map(|h| obj.get(h).map_or(CellValue::Null, json_to_cell))
                .collect()
        })
        .collect();

    Ok(RawSheet { headers, rows })
}

fn json_to_cell(val: &JsonValue) -> CellValue {
    match val {
        JsonValue::String(s) => CellValue::text(s.as_str()),
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                CellValue::Integer(i)
            } else if let Some(f) = n.as_f64() {
                CellValue::float(f)
            } else {
                CellValue::Text(n.to_string())
            }
        }
        JsonValue::Bool(b) => CellValue::Bool(*b),
        JsonValue::Null => CellValue::Null,
        other => CellValue::Text(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file of report metadata. Every column becomes a table
/// column; the first batch's schema provides the header.
///
/// Works with files written by both **Pandas** (`df.to_parquet()`) and
/// **Polars** (`df.write_parquet()`).
fn load_parquet(path: &Path) -> Result<RawSheet> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).context("reading parquet metadata")?;
    let headers: Vec<String> = builder
        .schema()
        .fields()
        .iter()
        .map(|f| f.name().clone())
        .collect();
    let reader = builder.build().context("building parquet reader")?;

    let mut rows = Vec::new();
    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        for row in 0..batch.num_rows() {
            let cells = batch
                .columns()
                .iter()
                .map(|col| extract_cell(col, row))
                .collect();
            rows.push(cells);
        }
    }

    Ok(RawSheet { headers, rows })
}

/// Extract a single cell from an Arrow column at a given row.
fn extract_cell(col: &Arc<dyn Array>, row: usize) -> CellValue {
    if col.is_null(row) {
        return CellValue::Null;
    }
    match col.data_type() {
        DataType::Utf8 => CellValue::text(col.as_string::<i32>().value(row)),
        DataType::LargeUtf8 => CellValue::text(col.as_string::<i64>().value(row)),
        DataType::Int32 => CellValue::Integer(col.as_primitive::<Int32Type>().value(row) as i64),
        DataType::Int64 => CellValue::Integer(col.as_primitive::<Int64Type>().value(row)),
        DataType::Float32 => {
            CellValue::float(col.as_primitive::<Float32Type>().value(row) as f64)
        }
        DataType::Float64 => CellValue::float(col.as_primitive::<Float64Type>().value(row)),
        DataType::Boolean => CellValue::Bool(col.as_boolean().value(row)),
        DataType::Date32 => col
            .as_primitive::<Date32Type>()
            .value_as_date(row)
            .map_or(CellValue::Null, CellValue::Date),
        DataType::Date64 => col
            .as_primitive::<Date64Type>()
            .value_as_datetime(row)
            .map_or(CellValue::Null, CellValue::DateTime),
        DataType::Timestamp(unit, _) => {
            let dt = match unit {
                TimeUnit::Second => col.as_primitive::<TimestampSecondType>().value_as_datetime(row),
                TimeUnit::Millisecond => col
                    .as_primitive::<TimestampMillisecondType>()
                    .value_as_datetime(row),
                TimeUnit::Microsecond => col
                    .as_primitive::<TimestampMicrosecondType>()
                    .value_as_datetime(row),
                TimeUnit::Nanosecond => col
                    .as_primitive::<TimestampNanosecondType>()
                    .value_as_datetime(row),
            };
            dt.map_or(CellValue::Null, CellValue::DateTime)
        }
        other => CellValue::Text(format!("{other:?}")),
    }
}
