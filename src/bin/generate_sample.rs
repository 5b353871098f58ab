use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{Date32Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use chrono::NaiveDate;
use parquet::arrow::ArrowWriter;

const COUNTRIES: &[&str] = &[
    "Austria", "Belgium", "Denmark", "Finland", "France", "Germany", "Italy", "Netherlands",
    "Spain", "Sweden",
];

const INDUSTRIES: &[&str] = &[
    "Commercial Banks",
    "Insurance",
    "Electric Utilities & Power Generators",
    "Oil & Gas - Exploration & Production",
    "Software & IT Services",
    "Food Retailers & Distributors",
    "Automobiles",
    "Chemicals",
];

const NAME_PARTS: &[&str] = &[
    "Nord", "Alpen", "Euro", "Baltic", "Rhein", "Atlas", "Vela", "Terra", "Lumen", "Orion",
];

const SUFFIXES: &[&str] = &["AG", "SA", "NV", "SpA", "AB", "Oyj", "plc"];

/// Same header text the published workbook uses, line break included.
const INDUSTRY_HEADER: &str = "SASB industry\n(SICS® Industries)";

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn below(&mut self, n: usize) -> usize {
        (self.next_u64() % n as u64) as usize
    }

    fn pick<'a>(&mut self, items: &[&'a str]) -> &'a str {
        items[self.below(items.len())]
    }
}

struct SampleReport {
    company: String,
    country: &'static str,
    industry: &'static str,
    published: Option<NaiveDate>,
    link: Option<String>,
    employees: i64,
}

fn generate(n: usize, rng: &mut SimpleRng) -> Result<Vec<SampleReport>> {
    let first_day = NaiveDate::from_ymd_opt(2024, 1, 1).context("invalid start date")?;
    let mut reports = Vec::with_capacity(n);

    for i in 0..n {
        let company = format!(
            "{}{} {}",
            rng.pick(NAME_PARTS),
            rng.pick(&["tec", "gen", "vest", "via", "corp"]),
            rng.pick(SUFFIXES)
        );
        // Roughly one report in fifteen has no date, one in eight no link.
        let published = (rng.below(15) != 0)
            .then(|| first_day + chrono::Days::new(rng.below(540) as u64));
        let link = (rng.below(8) != 0).then(|| {
            format!(
                "https://reports.example/{}/csrd-{i}.pdf",
                company.to_lowercase().replace(' ', "-")
            )
        });

        reports.push(SampleReport {
            company,
            country: rng.pick(COUNTRIES),
            industry: rng.pick(INDUSTRIES),
            published,
            link,
            employees: 200 + rng.below(90_000) as i64,
        });
    }
    Ok(reports)
}

fn write_parquet(path: &str, reports: &[SampleReport]) -> Result<()> {
    let epoch = NaiveDate::from_ymd_opt(1970, 1, 1).context("invalid epoch")?;

    let schema = Arc::new(Schema::new(vec![
        Field::new("Company", DataType::Utf8, false),
        Field::new("Country", DataType::Utf8, false),
        Field::new(INDUSTRY_HEADER, DataType::Utf8, false),
        Field::new("Publication date", DataType::Date32, true),
        Field::new("Report link", DataType::Utf8, true),
        Field::new("Employees", DataType::Int64, false),
    ]));

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(StringArray::from_iter_values(reports.iter().map(|r| r.company.as_str()))),
            Arc::new(StringArray::from_iter_values(reports.iter().map(|r| r.country))),
            Arc::new(StringArray::from_iter_values(reports.iter().map(|r| r.industry))),
            Arc::new(Date32Array::from(
                reports
                    .iter()
                    .map(|r| r.published.map(|d| (d - epoch).num_days() as i32))
                    .collect::<Vec<_>>(),
            )),
            Arc::new(StringArray::from(
                reports.iter().map(|r| r.link.as_deref()).collect::<Vec<_>>(),
            )),
            Arc::new(Int64Array::from_iter_values(reports.iter().map(|r| r.employees))),
        ],
    )
    .context("building record batch")?;

    let file = std::fs::File::create(path).context("creating parquet file")?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating parquet writer")?;
    writer.write(&batch).context("writing batch")?;
    writer.close().context("closing parquet writer")?;
    Ok(())
}

fn write_csv(path: &str, reports: &[SampleReport]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).context("creating CSV file")?;
    writer.write_record([
        "Company",
        "Country",
        INDUSTRY_HEADER,
        "Publication date",
        "Report link",
        "Employees",
    ])?;
    for r in reports {
        let published = r
            .published
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_default();
        writer.write_record([
            r.company.as_str(),
            r.country,
            r.industry,
            published.as_str(),
            r.link.as_deref().unwrap_or(""),
            r.employees.to_string().as_str(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

fn main() -> Result<()> {
    let mut rng = SimpleRng::new(42);
    let reports = generate(250, &mut rng)?;

    write_parquet("sample_reports.parquet", &reports)?;
    write_csv("sample_reports.csv", &reports)?;

    println!(
        "Wrote {} reports to sample_reports.parquet and sample_reports.csv",
        reports.len()
    );
    Ok(())
}
