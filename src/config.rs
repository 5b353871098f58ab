use std::path::PathBuf;

use clap::Parser;

/// Workbook the dashboard opens when no source is given.
pub const DEFAULT_SOURCE: &str = "CSRD Dashboard.xlsx";

/// Command-line / environment configuration.
#[derive(Debug, Clone, Parser)]
#[command(name = "csrd-dashboard", version, about = "Global CSRD reports dashboard")]
pub struct Args {
    /// Report metadata to open on startup (.xlsx, .xls, .ods, .csv, .json, .parquet)
    #[arg(env = "CSRD_DASHBOARD_SOURCE", default_value = DEFAULT_SOURCE)]
    pub source: PathBuf,

    /// Header of the industry classification column, if it is not the SASB one
    #[arg(long, env = "CSRD_INDUSTRY_COLUMN")]
    pub industry_column: Option<String>,
}

/// Options that influence how a source is turned into a report table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadOptions {
    pub industry_column: Option<String>,
}

impl From<&Args> for LoadOptions {
    fn from(args: &Args) -> Self {
        LoadOptions {
            industry_column: args.industry_column.clone(),
        }
    }
}
