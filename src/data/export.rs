use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};

use super::model::{ClimateDataset, REQUIRED_HEADERS};

// ---------------------------------------------------------------------------
// CSV export of the full table
// ---------------------------------------------------------------------------

/// Write the whole table as UTF-8 CSV: header row first, no index column.
/// The header is written even for an empty table.
pub fn write_csv<W: Write>(dataset: &ClimateDataset, out: W) -> Result<()> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(out);

    writer
        .write_record(REQUIRED_HEADERS)
        .context("writing CSV header")?;
    for (i, rec) in dataset.records.iter().enumerate() {
        writer
            .serialize(rec)
            .with_context(|| format!("writing CSV row {}", i + 1))?;
    }
    writer.flush().context("flushing CSV output")?;
    Ok(())
}

/// Export to a file on disk, replacing any existing file.
pub fn export_csv(dataset: &ClimateDataset, path: &Path) -> Result<()> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("creating {}", path.display()))?;
    write_csv(dataset, std::io::BufWriter::new(file))?;
    log::info!("Exported {} rows to {}", dataset.len(), path.display());
    Ok(())
}
