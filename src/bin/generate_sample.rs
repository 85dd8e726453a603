//! Writes a synthetic climate debt table (`sample_climate_debt.csv` and
//! `sample_climate_debt.parquet`) for running the dashboard without the
//! real spreadsheet. Point `data-path` in `climate-debt.toml` at either file.

use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Normal};

const HEADERS: [&str; 6] = [
    "Country",
    "Year",
    "Debt (Billion USD)",
    "CO2 Emissions (Million Tons)",
    "Renewable Energy Investment (Billion USD)",
    "SDG Score",
];

const COUNTRIES: [&str; 20] = [
    "Nilonia", "Ostrava", "Kestria", "Valmora", "Dunhaven", "Porvia", "Zerath", "Callisto",
    "Marendi", "Tolvan", "Ysteria", "Brakmoor", "Quellan", "Sarnia", "Edrovia", "Lumora",
    "Halvard", "Istria", "Norrland", "Veskar",
];

const FIRST_YEAR: i32 = 2015;
const YEARS: i32 = 10;

struct Row {
    country: String,
    year: i32,
    debt: f64,
    co2: f64,
    renewable: f64,
    sdg: f64,
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

fn generate(rng: &mut StdRng) -> Result<Vec<Row>> {
    let noise = Normal::new(0.0, 1.0).context("building noise distribution")?;
    let mut rows = Vec::new();

    for country in COUNTRIES {
        let debt0 = rng.gen_range(5.0..400.0);
        let co2_0 = rng.gen_range(10.0..1500.0);
        let renew0 = rng.gen_range(0.5..40.0);
        let sdg0 = rng.gen_range(52.0..82.0);

        let debt_growth: f64 = rng.gen_range(0.01..0.07);
        let co2_trend: f64 = rng.gen_range(-0.03..0.02);
        let renew_growth: f64 = rng.gen_range(0.03..0.15);
        let sdg_step = rng.gen_range(-0.2..0.9);

        for k in 0..YEARS {
            let t = k as f64;
            let jitter = |scale: f64, rng: &mut StdRng| 1.0 + scale * noise.sample(rng);
            rows.push(Row {
                country: country.to_string(),
                year: FIRST_YEAR + k,
                debt: round2(debt0 * (1.0 + debt_growth).powf(t) * jitter(0.02, rng)),
                co2: round2((co2_0 * (1.0 + co2_trend).powf(t) * jitter(0.03, rng)).max(0.0)),
                renewable: round2(renew0 * (1.0 + renew_growth).powf(t) * jitter(0.05, rng)),
                sdg: round2((sdg0 + sdg_step * t + 0.8 * noise.sample(rng)).clamp(0.0, 100.0)),
            });
        }
    }
    Ok(rows)
}

fn write_csv(rows: &[Row], path: &str) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).with_context(|| format!("creating {path}"))?;
    writer.write_record(HEADERS)?;
    for r in rows {
        writer.write_record([
            r.country.clone(),
            r.year.to_string(),
            r.debt.to_string(),
            r.co2.to_string(),
            r.renewable.to_string(),
            r.sdg.to_string(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

fn write_parquet(rows: &[Row], path: &str) -> Result<()> {
    let schema = Arc::new(Schema::new(vec![
        Field::new(HEADERS[0], DataType::Utf8, false),
        Field::new(HEADERS[1], DataType::Int64, false),
        Field::new(HEADERS[2], DataType::Float64, false),
        Field::new(HEADERS[3], DataType::Float64, false),
        Field::new(HEADERS[4], DataType::Float64, false),
        Field::new(HEADERS[5], DataType::Float64, false),
    ]));

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(StringArray::from(
                rows.iter().map(|r| r.country.as_str()).collect::<Vec<_>>(),
            )),
            Arc::new(Int64Array::from(
                rows.iter().map(|r| r.year as i64).collect::<Vec<_>>(),
            )),
            Arc::new(Float64Array::from(rows.iter().map(|r| r.debt).collect::<Vec<_>>())),
            Arc::new(Float64Array::from(rows.iter().map(|r| r.co2).collect::<Vec<_>>())),
            Arc::new(Float64Array::from(
                rows.iter().map(|r| r.renewable).collect::<Vec<_>>(),
            )),
            Arc::new(Float64Array::from(rows.iter().map(|r| r.sdg).collect::<Vec<_>>())),
        ],
    )
    .context("building record batch")?;

    let file = std::fs::File::create(path).with_context(|| format!("creating {path}"))?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating parquet writer")?;
    writer.write(&batch).context("writing batch")?;
    writer.close().context("closing parquet writer")?;
    Ok(())
}

fn main() -> Result<()> {
    let mut rng = StdRng::seed_from_u64(42);
    let rows = generate(&mut rng)?;

    write_csv(&rows, "sample_climate_debt.csv")?;
    write_parquet(&rows, "sample_climate_debt.parquet")?;

    println!(
        "Wrote {} rows ({} countries x {} years) to sample_climate_debt.csv and .parquet",
        rows.len(),
        COUNTRIES.len(),
        YEARS
    );
    Ok(())
}
