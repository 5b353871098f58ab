use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::NaiveDate;

use crate::color::ColorMap;
use crate::data::aggregate::{CategoryCount, count_by_country, industry_distribution};
use crate::data::cache::DatasetCache;
use crate::data::filter::{DateRange, FilterOptions, FilterState, apply};
use crate::data::model::ReportTable;
use crate::data::present::{DisplayTable, present};

// ---------------------------------------------------------------------------
// Derived views
// ---------------------------------------------------------------------------

/// Everything the central panel renders, recomputed as a whole on every
/// filter change.
#[derive(Debug, Clone, Default)]
pub struct DashboardView {
    pub filtered: Option<ReportTable>,
    pub country_counts: Vec<CategoryCount>,
    pub industry_counts: Vec<CategoryCount>,
    pub display: DisplayTable,
}

impl DashboardView {
    pub fn compute(table: &ReportTable, filters: &FilterState) -> Self {
        let filtered = apply(table, filters);
        DashboardView {
            country_counts: count_by_country(&filtered),
            industry_counts: industry_distribution(&filtered),
            display: present(&filtered),
            filtered: Some(filtered),
        }
    }

    /// Number of rows passing the filters.
    pub fn visible(&self) -> usize {
        self.filtered.as_ref().map_or(0, ReportTable::len)
    }
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Loaded tables, memoized by source identity.
    cache: DatasetCache,

    /// Path of the current source.
    pub source: Option<PathBuf>,

    /// Loaded table (None until a source loads successfully).
    pub table: Option<Arc<ReportTable>>,

    /// Choices offered by the filter widgets.
    pub options: FilterOptions,

    /// Current filter selections.
    pub filters: FilterState,

    /// Values shown in the start / end date pickers.
    pub date_inputs: (NaiveDate, NaiveDate),

    /// Filtered table, chart inputs and display table.
    pub view: DashboardView,

    /// Stable bar colours per country / industry.
    pub country_colors: ColorMap,
    pub industry_colors: ColorMap,

    /// Blocking error (e.g. data unavailable) shown in the UI.
    pub status_message: Option<String>,

    /// Non-fatal filter problem shown next to the filters.
    pub filter_warning: Option<String>,
}

impl AppState {
    pub fn new(cache: DatasetCache) -> Self {
        let today = chrono::Local::now().date_naive();
        Self {
            cache,
            source: None,
            table: None,
            options: FilterOptions::default(),
            filters: FilterState::default(),
            date_inputs: (today, today),
            view: DashboardView::default(),
            country_colors: ColorMap::default(),
            industry_colors: ColorMap::default(),
            status_message: None,
            filter_warning: None,
        }
    }

    /// Load `path` (through the cache) and make it the current table. On
    /// failure the previous table is dropped; nothing is rendered from stale
    /// data.
    pub fn open(&mut self, path: &Path) {
        self.source = Some(path.to_path_buf());
        match self.cache.load(path) {
            Ok(table) => self.set_table(table),
            Err(e) => {
                self.table = None;
                self.view = DashboardView::default();
                self.options = FilterOptions::default();
                self.status_message = Some(format!("Error: {e}"));
            }
        }
    }

    /// Load the current source again; the cache only re-reads it if the
    /// file changed on disk.
    pub fn reload(&mut self) {
        if let Some(path) = self.source.clone() {
            self.open(&path);
        }
    }

    /// Ingest a loaded table: rebuild filter options and colours, reset the
    /// filters and compute the first view.
    pub fn set_table(&mut self, table: Arc<ReportTable>) {
        self.options = FilterOptions::from_table(&table);
        self.country_colors = ColorMap::new(&self.options.countries);
        self.industry_colors = ColorMap::new(&self.options.industries);
        self.table = Some(table);
        self.status_message = None;
        self.reset_filters();
    }

    /// Recompute the derived view after a filter change.
    pub fn refilter(&mut self) {
        self.filter_warning = match self.filters.validate() {
            Ok(()) => None,
            Err(e) => {
                log::warn!("{e}");
                Some(e.to_string())
            }
        };
        if let Some(table) = &self.table {
            self.view = DashboardView::compute(table, &self.filters);
            log::debug!(
                "Refiltered: {} of {} reports visible",
                self.view.visible(),
                table.len()
            );
        }
    }

    /// Clear every selection and restore the full date span.
    pub fn reset_filters(&mut self) {
        self.filters = FilterState::default();
        if let Some(span) = self.options.date_span {
            self.date_inputs = (span.start, span.end);
        }
        self.refilter();
    }

    /// Toggle a single country in the selection.
    pub fn toggle_country(&mut self, country: &str) {
        toggle(&mut self.filters.countries, country);
        self.refilter();
    }

    /// Toggle a single industry in the selection.
    pub fn toggle_industry(&mut self, industry: &str) {
        toggle(&mut self.filters.industries, industry);
        self.refilter();
    }

    /// Select every listed country (equivalent in effect to selecting none).
    pub fn select_all_countries(&mut self) {
        self.filters.countries = self.options.countries.iter().cloned().collect();
        self.refilter();
    }

    pub fn clear_countries(&mut self) {
        self.filters.countries.clear();
        self.refilter();
    }

    pub fn select_all_industries(&mut self) {
        self.filters.industries = self.options.industries.iter().cloned().collect();
        self.refilter();
    }

    pub fn clear_industries(&mut self) {
        self.filters.industries.clear();
        self.refilter();
    }

    /// Apply the date pickers' current values as the date restriction.
    pub fn apply_date_inputs(&mut self) {
        let (start, end) = self.date_inputs;
        self.filters.date_range = Some(DateRange::new(start, end));
        self.refilter();
    }
}

fn toggle(selected: &mut std::collections::BTreeSet<String>, value: &str) {
    if !selected.remove(value) {
        selected.insert(value.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const CSV: &str = "\
Company,Country,SASB industry (SICS Industries),Publication date,Report link
Acme,Germany,Banks,2024-01-10,https://x.test/acme
Beta,France,Insurance,2024-02-20,
Gamma,Germany,Insurance,2024-03-05,https://x.test/gamma
";

    fn loaded_state() -> (tempfile::TempDir, AppState) {
        state_from_csv(CSV)
    }

    fn state_from_csv(contents: &str) -> (tempfile::TempDir, AppState) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("reports.csv");
        std::fs::File::create(&path)
            .unwrap()
            .write_all(contents.as_bytes())
            .unwrap();
        let mut state = AppState::new(DatasetCache::default());
        state.open(&path);
        (dir, state)
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_open_populates_options_and_full_view() {
        let (_dir, state) = loaded_state();
        assert!(state.status_message.is_none());
        assert_eq!(state.options.countries, vec!["France", "Germany"]);
        assert_eq!(state.date_inputs, (date(2024, 1, 10), date(2024, 3, 5)));
        assert_eq!(state.view.visible(), 3);
        assert_eq!(state.view.country_counts.len(), 2);
        assert_eq!(state.view.display.link_column, Some(4));
    }

    #[test]
    fn test_toggle_and_reset() {
        let (_dir, mut state) = loaded_state();
        state.toggle_country("Germany");
        assert_eq!(state.view.visible(), 2);
        state.toggle_industry("Banks");
        assert_eq!(state.view.visible(), 1);
        state.toggle_country("Germany");
        assert_eq!(state.view.visible(), 1);

        state.reset_filters();
        assert_eq!(state.filters, FilterState::default());
        assert_eq!(state.view.visible(), 3);
    }

    #[test]
    fn test_date_range_excluding_everything_gives_empty_views() {
        let (_dir, mut state) = loaded_state();
        state.date_inputs = (date(2025, 1, 1), date(2025, 12, 31));
        state.apply_date_inputs();
        assert_eq!(state.view.visible(), 0);
        assert!(state.view.country_counts.is_empty());
        assert!(state.view.industry_counts.is_empty());
        assert!(state.view.display.is_empty());
        assert!(state.filter_warning.is_none());
    }

    #[test]
    fn test_inverted_date_inputs_warn_without_failing() {
        let (_dir, mut state) = loaded_state();
        state.date_inputs = (date(2024, 3, 1), date(2024, 1, 1));
        state.apply_date_inputs();
        assert!(state.filter_warning.is_some());
        assert_eq!(state.view.visible(), 0);
    }

    #[test]
    fn test_missing_source_reports_error_and_clears_view() {
        let (dir, mut state) = loaded_state();
        state.open(&dir.path().join("gone.xlsx"));
        assert!(state.table.is_none());
        assert_eq!(state.view.visible(), 0);
        assert!(state
            .status_message
            .as_deref()
            .unwrap()
            .contains("data unavailable"));
    }

    #[test]
    fn test_reload_serves_cached_table() {
        let (_dir, mut state) = loaded_state();
        let before = Arc::clone(state.table.as_ref().unwrap());
        state.reload();
        assert!(Arc::ptr_eq(&before, state.table.as_ref().unwrap()));
    }

    #[test]
    fn test_missing_markers_show_blank_and_are_not_counted() {
        let (_dir, state) = state_from_csv(
            "\
Company,Country,Industry,Publication date,Report ID
Acme,Germany,Banks,NaN,00123
Beta,N/A,Insurance,2024-02-20,1.50
",
        );
        assert!(state.status_message.is_none());
        let display = &state.view.display;
        assert_eq!(display.rows[0][3].to_string(), "");
        assert_eq!(display.rows[0][4].to_string(), "00123");
        assert_eq!(display.rows[1][4].to_string(), "1.50");
        assert_eq!(display.rows[1][1].to_string(), "");

        let countries: Vec<&str> = state
            .view
            .country_counts
            .iter()
            .map(|c| c.label.as_str())
            .collect();
        assert_eq!(countries, vec!["Germany"]);
        assert_eq!(state.options.countries, vec!["Germany"]);
        assert_eq!(state.date_inputs, (date(2024, 2, 20), date(2024, 2, 20)));
    }
}
