use std::collections::BTreeMap;

use super::model::{ReportRecord, ReportTable};

/// One bar of a category chart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryCount {
    pub label: String,
    pub count: usize,
}

/// Reports per country. Rows without a country are not counted.
pub fn count_by_country(table: &ReportTable) -> Vec<CategoryCount> {
    count_by(table, |r| r.country.as_deref())
}

/// Reports per industry. Rows without an industry are not counted.
pub fn industry_distribution(table: &ReportTable) -> Vec<CategoryCount> {
    count_by(table, |r| r.industry.as_deref())
}

fn count_by<'a, F>(table: &'a ReportTable, key: F) -> Vec<CategoryCount>
where
    F: Fn(&'a ReportRecord) -> Option<&'a str>,
{
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for record in &table.records {
        if let Some(label) = key(record) {
            *counts.entry(label).or_default() += 1;
        }
    }
    counts
        .into_iter()
        .map(|(label, count)| CategoryCount {
            label: label.to_string(),
            count,
        })
        .collect()
}
