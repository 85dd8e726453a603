use std::fmt;

use serde::Serialize;

// ---------------------------------------------------------------------------
// Column headers
// ---------------------------------------------------------------------------

pub const COUNTRY_HEADER: &str = "Country";
pub const YEAR_HEADER: &str = "Year";

/// Every header a dataset file must carry, in export order.
pub const REQUIRED_HEADERS: [&str; 6] = [
    COUNTRY_HEADER,
    YEAR_HEADER,
    Metric::Debt.header(),
    Metric::Co2Emissions.header(),
    Metric::RenewableInvestment.header(),
    Metric::SdgScore.header(),
];

// ---------------------------------------------------------------------------
// Metric – one of the four numeric columns
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Metric {
    Debt,
    Co2Emissions,
    RenewableInvestment,
    SdgScore,
}

impl Metric {
    /// Fixed order used by the correlation matrix and the heatmap axes.
    pub const ALL: [Metric; 4] = [
        Metric::Debt,
        Metric::Co2Emissions,
        Metric::RenewableInvestment,
        Metric::SdgScore,
    ];

    /// Exact header text in the source spreadsheet.
    pub const fn header(self) -> &'static str {
        match self {
            Metric::Debt => "Debt (Billion USD)",
            Metric::Co2Emissions => "CO2 Emissions (Million Tons)",
            Metric::RenewableInvestment => "Renewable Energy Investment (Billion USD)",
            Metric::SdgScore => "SDG Score",
        }
    }

    /// Compact label for heatmap axes.
    pub fn short_label(self) -> &'static str {
        match self {
            Metric::Debt => "Debt",
            Metric::Co2Emissions => "CO₂",
            Metric::RenewableInvestment => "Renewables",
            Metric::SdgScore => "SDG",
        }
    }

    pub fn chart_title(self) -> &'static str {
        match self {
            Metric::Debt => "Debt Over Time",
            Metric::Co2Emissions => "CO₂ Emissions Over Time",
            Metric::RenewableInvestment => "Investment in Renewable Energy",
            Metric::SdgScore => "Sustainable Development Goal Score",
        }
    }

    /// Read this metric from a row.
    pub fn value(self, record: &CountryRecord) -> f64 {
        match self {
            Metric::Debt => record.debt_billion_usd,
            Metric::Co2Emissions => record.co2_million_tons,
            Metric::RenewableInvestment => record.renewable_investment_billion_usd,
            Metric::SdgScore => record.sdg_score,
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.header())
    }
}

// ---------------------------------------------------------------------------
// CountryRecord – one row of the sheet
// ---------------------------------------------------------------------------

/// One (country, year) observation. Serde names match the sheet headers so
/// CSV export writes header-named columns; every loader goes through
/// `loader::build_record` instead.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CountryRecord {
    #[serde(rename = "Country")]
    pub country: String,
    #[serde(rename = "Year")]
    pub year: i32,
    #[serde(rename = "Debt (Billion USD)")]
    pub debt_billion_usd: f64,
    #[serde(rename = "CO2 Emissions (Million Tons)")]
    pub co2_million_tons: f64,
    #[serde(rename = "Renewable Energy Investment (Billion USD)")]
    pub renewable_investment_billion_usd: f64,
    #[serde(rename = "SDG Score")]
    pub sdg_score: f64,
}

// ---------------------------------------------------------------------------
// ClimateDataset – the complete loaded table
// ---------------------------------------------------------------------------

/// The full table plus a few derived indices. Immutable once built.
#[derive(Debug, Clone, Default)]
pub struct ClimateDataset {
    /// All rows, in file order.
    pub records: Vec<CountryRecord>,
    /// Distinct countries in order of first appearance.
    pub countries: Vec<String>,
    /// Inclusive `(min, max)` of the Year column; `None` when empty.
    pub year_bounds: Option<(i32, i32)>,
}

impl ClimateDataset {
    pub fn from_records(records: Vec<CountryRecord>) -> Self {
        let mut countries: Vec<String> = Vec::new();
        let mut year_bounds: Option<(i32, i32)> = None;

        for rec in &records {
            if !countries.iter().any(|c| c == &rec.country) {
                countries.push(rec.country.clone());
            }
            year_bounds = Some(match year_bounds {
                None => (rec.year, rec.year),
                Some((lo, hi)) => (lo.min(rec.year), hi.max(rec.year)),
            });
        }

        ClimateDataset {
            records,
            countries,
            year_bounds,
        }
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Number of rows recorded for one country, regardless of year.
    pub fn rows_for_country(&self, country: &str) -> usize {
        self.records.iter().filter(|r| r.country == country).count()
    }
}

#[cfg(test)]
pub(crate) fn record(country: &str, year: i32, debt: f64, co2: f64, renew: f64, sdg: f64) -> CountryRecord {
    CountryRecord {
        country: country.to_string(),
        year,
        debt_billion_usd: debt,
        co2_million_tons: co2,
        renewable_investment_billion_usd: renew,
        sdg_score: sdg,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn countries_keep_first_appearance_order() {
        let ds = ClimateDataset::from_records(vec![
            record("Zedland", 2016, 1.0, 1.0, 1.0, 50.0),
            record("Aland", 2015, 1.0, 1.0, 1.0, 50.0),
            record("Zedland", 2015, 1.0, 1.0, 1.0, 50.0),
        ]);
        assert_eq!(ds.countries, vec!["Zedland", "Aland"]);
        assert_eq!(ds.year_bounds, Some((2015, 2016)));
        assert_eq!(ds.rows_for_country("Zedland"), 2);
    }

    #[test]
    fn empty_dataset_has_no_bounds() {
        let ds = ClimateDataset::from_records(Vec::new());
        assert!(ds.is_empty());
        assert!(ds.countries.is_empty());
        assert_eq!(ds.year_bounds, None);
    }

    #[test]
    fn required_headers_follow_metric_order() {
        assert_eq!(REQUIRED_HEADERS[0], "Country");
        assert_eq!(REQUIRED_HEADERS[1], "Year");
        for (i, m) in Metric::ALL.iter().enumerate() {
            assert_eq!(REQUIRED_HEADERS[i + 2], m.header());
        }
    }
}
