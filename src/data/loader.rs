use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result, bail};
use arrow::array::{Array, ArrayRef, AsArray};
use arrow::compute::cast;
use arrow::datatypes::{DataType, Float64Type};
use calamine::{Data, Reader, open_workbook_auto};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;
use thiserror::Error;

use super::model::{
    COUNTRY_HEADER, ClimateDataset, CountryRecord, Metric, REQUIRED_HEADERS, YEAR_HEADER,
};

// ---------------------------------------------------------------------------
// Schema errors
// ---------------------------------------------------------------------------

/// Table-shape problems that make a file unusable as a dataset.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SchemaError {
    #[error("missing required column '{0}'")]
    MissingColumn(&'static str),
    #[error("data row {row}, column '{column}': {reason}")]
    InvalidValue {
        row: usize,
        column: &'static str,
        reason: String,
    },
    #[error("the table contains no data rows")]
    NoRows,
}

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a climate dataset from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.xlsx` / `.xlsm` / `.xls` / `.ods` – first worksheet, header in row 1
/// * `.csv`     – header row with the six column names
/// * `.json`    – `[{ "Country": "...", "Year": 2015, ... }, ...]`
/// * `.parquet` – one column per header
pub fn load_file(path: &Path) -> Result<ClimateDataset> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let dataset = match ext.as_str() {
        "xlsx" | "xlsm" | "xls" | "ods" => load_spreadsheet(path),
        "csv" => load_csv(path),
        "json" => load_json(path),
        "parquet" | "pq" => load_parquet(path),
        other => bail!("Unsupported file extension: .{other}"),
    }
    .with_context(|| format!("loading {}", path.display()))?;

    log::info!(
        "Loaded {} rows for {} countries from {} (years {:?})",
        dataset.len(),
        dataset.countries.len(),
        path.display(),
        dataset.year_bounds
    );
    Ok(dataset)
}

// ---------------------------------------------------------------------------
// Cell conversion shared by all formats
// ---------------------------------------------------------------------------

/// A format-neutral cell value.
#[derive(Debug, Clone, PartialEq)]
enum Cell {
    Text(String),
    Number(f64),
    Empty,
}

/// Position of each required header within a file's header row.
#[derive(Debug, Clone, Copy)]
struct ColumnIndex([usize; 6]);

impl ColumnIndex {
    fn locate<S: AsRef<str>>(headers: &[S]) -> Result<Self, SchemaError> {
        let mut idx = [0usize; 6];
        for (slot, required) in idx.iter_mut().zip(REQUIRED_HEADERS) {
            *slot = headers
                .iter()
                .position(|h| h.as_ref().trim() == required)
                .ok_or(SchemaError::MissingColumn(required))?;
        }
        Ok(ColumnIndex(idx))
    }
}

/// Turn the six cells of one row (in `REQUIRED_HEADERS` order) into a record.
/// `row` is the 1-based data row number used in error messages.
fn build_record(row: usize, cells: [Cell; 6]) -> Result<CountryRecord, SchemaError> {
    let [country, year, debt, co2, renew, sdg] = cells;
    Ok(CountryRecord {
        country: country_value(row, country)?,
        year: year_value(row, year)?,
        debt_billion_usd: metric_value(row, Metric::Debt, debt)?,
        co2_million_tons: metric_value(row, Metric::Co2Emissions, co2)?,
        renewable_investment_billion_usd: metric_value(row, Metric::RenewableInvestment, renew)?,
        sdg_score: metric_value(row, Metric::SdgScore, sdg)?,
    })
}

fn invalid(row: usize, column: &'static str, reason: impl Into<String>) -> SchemaError {
    SchemaError::InvalidValue {
        row,
        column,
        reason: reason.into(),
    }
}

fn country_value(row: usize, cell: Cell) -> Result<String, SchemaError> {
    match cell {
        Cell::Text(s) if !s.trim().is_empty() => Ok(s.trim().to_string()),
        Cell::Number(n) => Ok(n.to_string()),
        _ => Err(invalid(row, COUNTRY_HEADER, "empty country name")),
    }
}

fn year_value(row: usize, cell: Cell) -> Result<i32, SchemaError> {
    let n = match cell {
        Cell::Number(n) => n,
        Cell::Text(s) => s
            .trim()
            .parse::<f64>()
            .map_err(|_| invalid(row, YEAR_HEADER, format!("'{s}' is not a year")))?,
        Cell::Empty => return Err(invalid(row, YEAR_HEADER, "empty cell")),
    };
    if n.fract() != 0.0 || n < i32::MIN as f64 || n > i32::MAX as f64 {
        return Err(invalid(row, YEAR_HEADER, format!("{n} is not an integral year")));
    }
    Ok(n as i32)
}

fn metric_value(row: usize, metric: Metric, cell: Cell) -> Result<f64, SchemaError> {
    let n = match cell {
        Cell::Number(n) => n,
        Cell::Text(s) => s
            .trim()
            .parse::<f64>()
            .map_err(|_| invalid(row, metric.header(), format!("'{s}' is not a number")))?,
        Cell::Empty => return Err(invalid(row, metric.header(), "empty cell")),
    };
    if !n.is_finite() {
        return Err(invalid(row, metric.header(), format!("{n} is not finite")));
    }
    Ok(n)
}

fn finish(records: Vec<CountryRecord>) -> Result<ClimateDataset> {
    if records.is_empty() {
        return Err(SchemaError::NoRows.into());
    }
    Ok(ClimateDataset::from_records(records))
}

// ---------------------------------------------------------------------------
// Spreadsheet loader
// ---------------------------------------------------------------------------

/// First worksheet only. Fully blank rows (e.g. trailing formatting) are
/// skipped.
fn load_spreadsheet(path: &Path) -> Result<ClimateDataset> {
    let mut workbook = open_workbook_auto(path).context("opening workbook")?;
    let range = workbook
        .worksheet_range_at(0)
        .context("workbook has no worksheets")?
        .context("reading first worksheet")?;

    let mut rows = range.rows();
    let header: Vec<String> = rows
        .next()
        .context("worksheet is empty")?
        .iter()
        .map(|c| c.to_string())
        .collect();
    let columns = ColumnIndex::locate(&header)?;

    let mut records = Vec::new();
    for (i, row) in rows.enumerate() {
        if row.iter().all(|c| matches!(c, Data::Empty)) {
            continue;
        }
        let cells = columns
            .0
            .map(|col| row.get(col).map(spreadsheet_cell).unwrap_or(Cell::Empty));
        records.push(build_record(i + 1, cells)?);
    }
    finish(records)
}

fn spreadsheet_cell(data: &Data) -> Cell {
    match data {
        Data::Empty => Cell::Empty,
        Data::Float(f) => Cell::Number(*f),
        Data::Int(i) => Cell::Number(*i as f64),
        Data::String(s) => Cell::Text(s.clone()),
        other => Cell::Text(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

fn load_csv(path: &Path) -> Result<ClimateDataset> {
    let file = std::fs::File::open(path).context("opening CSV")?;
    parse_csv(file)
}

/// Parse CSV text with a header row. Extra columns are ignored and column
/// order is free.
pub fn parse_csv<R: Read>(input: R) -> Result<ClimateDataset> {
    let mut reader = csv::Reader::from_reader(input);
    let headers: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.to_string())
        .collect();
    let columns = ColumnIndex::locate(&headers)?;

    let mut records = Vec::new();
    for (i, result) in reader.records().enumerate() {
        let row = i + 1;
        let record = result.with_context(|| format!("CSV row {row}"))?;
        let cells = columns.0.map(|col| match record.get(col) {
            Some(s) if !s.trim().is_empty() => Cell::Text(s.to_string()),
            _ => Cell::Empty,
        });
        records.push(build_record(row, cells)?);
    }
    finish(records)
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Records-oriented JSON, the default `df.to_json(orient='records')`.
fn load_json(path: &Path) -> Result<ClimateDataset> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    parse_json(&text)
}

fn parse_json(text: &str) -> Result<ClimateDataset> {
    let root: JsonValue = serde_json::from_str(text).context("parsing JSON")?;
    let rows = root.as_array().context("Expected top-level JSON array")?;

    if let Some(first) = rows.first() {
        let obj = first.as_object().context("Row 1 is not a JSON object")?;
        let keys: Vec<&str> = obj.keys().map(String::as_str).collect();
        ColumnIndex::locate(&keys)?;
    }

    let mut records = Vec::with_capacity(rows.len());
    for (i, rec) in rows.iter().enumerate() {
        let row = i + 1;
        let obj = rec
            .as_object()
            .with_context(|| format!("Row {row} is not a JSON object"))?;
        let cells = REQUIRED_HEADERS.map(|h| obj.get(h).map(json_cell).unwrap_or(Cell::Empty));
        records.push(build_record(row, cells)?);
    }
    finish(records)
}

fn json_cell(val: &JsonValue) -> Cell {
    match val {
        JsonValue::Null => Cell::Empty,
        JsonValue::Number(n) => n.as_f64().map(Cell::Number).unwrap_or(Cell::Empty),
        JsonValue::String(s) => Cell::Text(s.clone()),
        other => Cell::Text(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Works with files written by both **Pandas** (`df.to_parquet()`) and
/// **Polars** (`df.write_parquet()`); integer and float columns are both
/// accepted for numeric fields.
fn load_parquet(path: &Path) -> Result<ClimateDataset> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).context("reading parquet metadata")?;
    let reader = builder.build().context("building parquet reader")?;

    let mut records = Vec::new();
    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        let schema = batch.schema();

        let mut columns: Vec<ArrayRef> = Vec::with_capacity(REQUIRED_HEADERS.len());
        for (i, header) in REQUIRED_HEADERS.into_iter().enumerate() {
            let idx = schema
                .index_of(header)
                .map_err(|_| SchemaError::MissingColumn(header))?;
            let target = if i == 0 { DataType::Utf8 } else { DataType::Float64 };
            let col = cast(batch.column(idx), &target)
                .with_context(|| format!("column '{header}' has unsupported type"))?;
            columns.push(col);
        }

        let country = columns[0].as_string::<i32>();
        let numeric: Vec<_> = columns[1..]
            .iter()
            .map(|c| c.as_primitive::<Float64Type>())
            .collect();

        for r in 0..batch.num_rows() {
            let row = records.len() + 1;
            let country_cell = if country.is_null(r) {
                Cell::Empty
            } else {
                Cell::Text(country.value(r).to_string())
            };
            let num = |k: usize| {
                if numeric[k].is_null(r) {
                    Cell::Empty
                } else {
                    Cell::Number(numeric[k].value(r))
                }
            };
            let cells = [country_cell, num(0), num(1), num(2), num(3), num(4)];
            records.push(build_record(row, cells)?);
        }
    }
    finish(records)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use arrow::array::{Float64Array, Int64Array, StringArray};
    use arrow::datatypes::{Field, Schema};
    use arrow::record_batch::RecordBatch;
    use parquet::arrow::ArrowWriter;

    use super::*;

    const HEADER: &str = "Country,Year,Debt (Billion USD),CO2 Emissions (Million Tons),\
Renewable Energy Investment (Billion USD),SDG Score";

    fn schema_error(err: &anyhow::Error) -> Option<&SchemaError> {
        err.chain().find_map(|e| e.downcast_ref::<SchemaError>())
    }

    #[test]
    fn parses_csv_with_reordered_and_extra_columns() {
        let text = "SDG Score,Country,Notes,Year,Debt (Billion USD),\
CO2 Emissions (Million Tons),Renewable Energy Investment (Billion USD)\n\
60,Nilonia,x,2015,10,50,5\n78,Nilonia,y,2024,8,40,9\n";
        let ds = parse_csv(text.as_bytes()).unwrap();
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.records[1].year, 2024);
        assert_eq!(ds.records[1].sdg_score, 78.0);
        assert_eq!(ds.records[0].renewable_investment_billion_usd, 5.0);
        assert_eq!(ds.countries, vec!["Nilonia"]);
    }

    #[test]
    fn missing_column_is_reported_by_name() {
        let text = "Country,Year,Debt (Billion USD),CO2 Emissions (Million Tons),SDG Score\n\
Nilonia,2015,10,50,60\n";
        let err = parse_csv(text.as_bytes()).unwrap_err();
        assert_eq!(
            schema_error(&err),
            Some(&SchemaError::MissingColumn(
                "Renewable Energy Investment (Billion USD)"
            ))
        );
    }

    #[test]
    fn non_numeric_metric_is_rejected() {
        let text = format!("{HEADER}\nNilonia,2015,ten,50,5,60\n");
        let err = parse_csv(text.as_bytes()).unwrap_err();
        match schema_error(&err) {
            Some(SchemaError::InvalidValue { row, column, .. }) => {
                assert_eq!(*row, 1);
                assert_eq!(*column, "Debt (Billion USD)");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn fractional_year_and_empty_cells_are_rejected() {
        let text = format!("{HEADER}\nNilonia,2015.5,10,50,5,60\n");
        assert!(parse_csv(text.as_bytes()).is_err());

        let text = format!("{HEADER}\nNilonia,2015,10,,5,60\n");
        assert!(parse_csv(text.as_bytes()).is_err());
    }

    #[test]
    fn header_only_table_has_no_rows() {
        let text = format!("{HEADER}\n");
        let err = parse_csv(text.as_bytes()).unwrap_err();
        assert_eq!(schema_error(&err), Some(&SchemaError::NoRows));
    }

    #[test]
    fn parses_records_json() {
        let text = r#"[
            {"Country": "Nilonia", "Year": 2015, "Debt (Billion USD)": 10.0,
             "CO2 Emissions (Million Tons)": 50, "Renewable Energy Investment (Billion USD)": 5,
             "SDG Score": 60.5}
        ]"#;
        let ds = parse_json(text).unwrap();
        assert_eq!(ds.len(), 1);
        assert_eq!(ds.records[0].sdg_score, 60.5);
        assert_eq!(ds.records[0].co2_million_tons, 50.0);
    }

    #[test]
    fn json_missing_column_is_reported() {
        let text = r#"[{"Country": "Nilonia", "Year": 2015}]"#;
        let err = parse_json(text).unwrap_err();
        assert_eq!(
            schema_error(&err),
            Some(&SchemaError::MissingColumn("Debt (Billion USD)"))
        );
    }

    #[test]
    fn loads_parquet_with_integer_year() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("table.parquet");

        let schema = Arc::new(Schema::new(vec![
            Field::new("Country", DataType::Utf8, false),
            Field::new("Year", DataType::Int64, false),
            Field::new("Debt (Billion USD)", DataType::Float64, false),
            Field::new("CO2 Emissions (Million Tons)", DataType::Float64, false),
            Field::new("Renewable Energy Investment (Billion USD)", DataType::Float64, false),
            Field::new("SDG Score", DataType::Float64, false),
        ]));
        let batch = RecordBatch::try_new(
            schema.clone(),
            vec![
                Arc::new(StringArray::from(vec!["Nilonia", "Ostrava"])),
                Arc::new(Int64Array::from(vec![2015, 2016])),
                Arc::new(Float64Array::from(vec![10.0, 20.0])),
                Arc::new(Float64Array::from(vec![50.0, 60.0])),
                Arc::new(Float64Array::from(vec![5.0, 6.0])),
                Arc::new(Float64Array::from(vec![60.0, 70.0])),
            ],
        )
        .unwrap();
        let file = std::fs::File::create(&path).unwrap();
        let mut writer = ArrowWriter::try_new(file, schema, None).unwrap();
        writer.write(&batch).unwrap();
        writer.close().unwrap();

        let ds = load_file(&path).unwrap();
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.countries, vec!["Nilonia", "Ostrava"]);
        assert_eq!(ds.year_bounds, Some((2015, 2016)));
    }

    #[test]
    fn missing_file_and_unknown_extension_fail() {
        assert!(load_file(Path::new("does/not/exist.xlsx")).is_err());
        assert!(load_file(Path::new("table.txt")).is_err());
    }

    fn write_workbook(path: &Path, header: &[&str], rows: &[(&str, f64, [f64; 4])]) {
        let mut workbook = rust_xlsxwriter::Workbook::new();
        let sheet = workbook.add_worksheet();
        for (col, name) in header.iter().enumerate() {
            sheet.write_string(0, col as u16, *name).unwrap();
        }
        // Row 2 is left blank; the loader must skip it.
        for (i, (country, year, metrics)) in rows.iter().enumerate() {
            let row = i as u32 + 2;
            sheet.write_string(row, 0, *country).unwrap();
            sheet.write_number(row, 1, *year).unwrap();
            for (j, value) in metrics.iter().enumerate() {
                sheet.write_number(row, j as u16 + 2, *value).unwrap();
            }
        }
        workbook.save(path).unwrap();
    }

    #[test]
    fn xlsx_through_load_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("climate.xlsx");
        write_workbook(
            &path,
            &REQUIRED_HEADERS,
            &[
                ("Nilonia", 2015.0, [10.0, 50.0, 5.0, 60.0]),
                ("Ostrava", 2015.0, [30.0, 90.0, 2.0, 70.0]),
                ("Nilonia", 2024.0, [8.0, 40.0, 9.0, 78.0]),
            ],
        );

        let ds = load_file(&path).unwrap();
        assert_eq!(ds.len(), 3);
        assert_eq!(ds.countries, vec!["Nilonia", "Ostrava"]);
        assert_eq!(ds.year_bounds, Some((2015, 2024)));
        assert_eq!(ds.records[2].year, 2024);
        assert_eq!(ds.records[1].sdg_score, 70.0);
    }

    #[test]
    fn xlsx_missing_column_is_a_schema_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("no_sdg.xlsx");
        write_workbook(
            &path,
            &REQUIRED_HEADERS[..5],
            &[("Nilonia", 2015.0, [10.0, 50.0, 5.0, 60.0])],
        );

        let err = load_file(&path).unwrap_err();
        assert!(matches!(
            schema_error(&err),
            Some(SchemaError::MissingColumn("SDG Score"))
        ));
    }

    #[test]
    fn spreadsheet_cells_map_to_neutral_cells() {
        assert_eq!(spreadsheet_cell(&Data::Int(2015)), Cell::Number(2015.0));
        assert_eq!(spreadsheet_cell(&Data::Float(12.5)), Cell::Number(12.5));
        assert_eq!(
            spreadsheet_cell(&Data::String("Nilonia".into())),
            Cell::Text("Nilonia".into())
        );
        assert_eq!(spreadsheet_cell(&Data::Empty), Cell::Empty);
        assert_eq!(spreadsheet_cell(&Data::Bool(true)), Cell::Text("true".into()));
    }
}
