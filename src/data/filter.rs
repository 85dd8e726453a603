use std::fmt;

use super::model::{ClimateDataset, CountryRecord};

// ---------------------------------------------------------------------------
// Selection: which country and which years are shown
// ---------------------------------------------------------------------------

/// Inclusive year window. A reversed window (`start > end`) matches nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct YearRange {
    pub start: i32,
    pub end: i32,
}

impl YearRange {
    pub fn new(start: i32, end: i32) -> Self {
        YearRange { start, end }
    }

    pub fn contains(&self, year: i32) -> bool {
        self.start <= year && year <= self.end
    }

    /// Clamp both ends into `[lo, hi]`, keeping `start <= end`.
    pub fn clamped(self, lo: i32, hi: i32) -> Self {
        let start = self.start.clamp(lo, hi);
        let end = self.end.clamp(lo, hi).max(start);
        YearRange { start, end }
    }
}

impl fmt::Display for YearRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}–{}", self.start, self.end)
    }
}

/// The user's current filter choice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub country: String,
    pub years: YearRange,
}

impl Selection {
    pub fn new(country: impl Into<String>, years: YearRange) -> Self {
        Selection {
            country: country.into(),
            years,
        }
    }

    /// First country in the table with `default_window` clamped into the
    /// table's year bounds.
    pub fn initial(dataset: &ClimateDataset, default_window: YearRange) -> Self {
        let country = dataset.countries.first().cloned().unwrap_or_default();
        let years = match dataset.year_bounds {
            Some((lo, hi)) => {
                let clamped = default_window.clamped(lo, hi);
                if clamped != default_window {
                    log::warn!(
                        "Default year window {default_window} lies outside the data ({lo}–{hi}); using {clamped}"
                    );
                }
                clamped
            }
            None => default_window,
        };
        Selection { country, years }
    }

    /// Row predicate: same country and year inside the window.
    pub fn matches(&self, record: &CountryRecord) -> bool {
        record.country == self.country && self.years.contains(record.year)
    }
}

// ---------------------------------------------------------------------------
// Filtering
// ---------------------------------------------------------------------------

/// Rows passing the selection, in original order.
pub fn filter_records(records: &[CountryRecord], selection: &Selection) -> Vec<CountryRecord> {
    records
        .iter()
        .filter(|rec| selection.matches(rec))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::record;

    fn sample() -> ClimateDataset {
        ClimateDataset::from_records(vec![
            record("Nilonia", 2014, 12.0, 55.0, 4.0, 58.0),
            record("Nilonia", 2015, 10.0, 50.0, 5.0, 60.0),
            record("Ostrava", 2015, 30.0, 90.0, 2.0, 70.0),
            record("Nilonia", 2020, 9.0, 45.0, 7.0, 70.0),
            record("Nilonia", 2024, 8.0, 40.0, 9.0, 78.0),
            record("Ostrava", 2024, 28.0, 80.0, 6.0, 72.0),
        ])
    }

    #[test]
    fn only_matching_rows_in_original_order() {
        let ds = sample();
        let sel = Selection::new("Nilonia", YearRange::new(2015, 2024));
        let rows = filter_records(&ds.records, &sel);
        let years: Vec<i32> = rows.iter().map(|r| r.year).collect();
        assert_eq!(years, vec![2015, 2020, 2024]);
        assert!(rows.iter().all(|r| sel.matches(r)));
        assert!(rows.len() <= ds.rows_for_country("Nilonia"));
    }

    #[test]
    fn bounds_are_inclusive() {
        let ds = sample();
        let sel = Selection::new("Nilonia", YearRange::new(2024, 2024));
        let rows = filter_records(&ds.records, &sel);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].year, 2024);
    }

    #[test]
    fn filtering_is_idempotent() {
        let ds = sample();
        let sel = Selection::new("Ostrava", YearRange::new(2010, 2030));
        let once = filter_records(&ds.records, &sel);
        let twice = filter_records(&once, &sel);
        assert_eq!(once, twice);
    }

    #[test]
    fn unknown_country_or_empty_window_yields_nothing() {
        let ds = sample();
        let none = Selection::new("Atlantis", YearRange::new(2015, 2024));
        assert!(filter_records(&ds.records, &none).is_empty());

        let outside = Selection::new("Nilonia", YearRange::new(2030, 2040));
        assert!(filter_records(&ds.records, &outside).is_empty());

        let reversed = Selection::new("Nilonia", YearRange::new(2024, 2015));
        assert!(filter_records(&ds.records, &reversed).is_empty());
    }

    #[test]
    fn initial_selection_clamps_default_window() {
        let ds = sample();
        let sel = Selection::initial(&ds, YearRange::new(2015, 2024));
        assert_eq!(sel.country, "Nilonia");
        assert_eq!(sel.years, YearRange::new(2015, 2024));

        let narrow = ClimateDataset::from_records(vec![
            record("A", 2018, 1.0, 1.0, 1.0, 1.0),
            record("A", 2020, 1.0, 1.0, 1.0, 1.0),
        ]);
        let sel = Selection::initial(&narrow, YearRange::new(2015, 2024));
        assert_eq!(sel.years, YearRange::new(2018, 2020));
    }

    #[test]
    fn clamp_keeps_start_before_end() {
        let r = YearRange::new(2030, 2035).clamped(2015, 2024);
        assert_eq!(r, YearRange::new(2024, 2024));
    }
}
