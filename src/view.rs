use crate::analysis::advisor::{Recommendation, advise};
use crate::analysis::correlation::CorrelationMatrix;
use crate::data::filter::{Selection, filter_records};
use crate::data::model::{ClimateDataset, CountryRecord, Metric};

// ---------------------------------------------------------------------------
// View model: everything the dashboard draws for one selection
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    /// Line with point markers.
    Line,
    /// One bar per year, coloured by year.
    Bar,
}

/// One per-country chart: `[year, value]` points in table order.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSeries {
    pub metric: Metric,
    pub kind: ChartKind,
    pub points: Vec<[f64; 2]>,
}

impl ChartSeries {
    fn build(metric: Metric, kind: ChartKind, rows: &[CountryRecord]) -> Self {
        let points = rows
            .iter()
            .map(|r| [r.year as f64, metric.value(r)])
            .collect();
        ChartSeries {
            metric,
            kind,
            points,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DashboardView {
    pub selection: Selection,
    /// Rows of the selected country inside the year window.
    pub rows: Vec<CountryRecord>,
    /// Debt, CO₂, renewable investment and SDG charts, in that order.
    pub charts: [ChartSeries; 4],
    /// Computed over the whole table, not the selection.
    pub correlation: CorrelationMatrix,
    pub recommendation: Recommendation,
}

/// Build the complete view for one selection. Pure: the same inputs always
/// produce the same view, and an empty selection is not an error.
///
/// `correlation` belongs to the whole table, so callers compute it once per
/// dataset with [`CorrelationMatrix::compute`] and reuse it here.
pub fn render(
    dataset: &ClimateDataset,
    correlation: &CorrelationMatrix,
    selection: &Selection,
) -> DashboardView {
    let rows = filter_records(&dataset.records, selection);
    log::debug!(
        "Rendering {} in {}: {} of {} rows",
        selection.country,
        selection.years,
        rows.len(),
        dataset.len()
    );

    let charts = [
        ChartSeries::build(Metric::Debt, ChartKind::Line, &rows),
        ChartSeries::build(Metric::Co2Emissions, ChartKind::Line, &rows),
        ChartSeries::build(Metric::RenewableInvestment, ChartKind::Bar, &rows),
        ChartSeries::build(Metric::SdgScore, ChartKind::Line, &rows),
    ];
    let recommendation = advise(&selection.country, &rows);

    DashboardView {
        selection: selection.clone(),
        rows,
        charts,
        correlation: correlation.clone(),
        recommendation,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::advisor::Tier;
    use crate::data::filter::YearRange;
    use crate::data::model::record;

    fn dataset() -> ClimateDataset {
        ClimateDataset::from_records(vec![
            record("Nilonia", 2015, 10.0, 50.0, 5.0, 60.0),
            record("Ostrava", 2015, 30.0, 90.0, 2.0, 70.0),
            record("Nilonia", 2024, 8.0, 40.0, 9.0, 78.0),
            record("Ostrava", 2024, 28.0, 80.0, 6.0, 72.0),
        ])
    }

    fn render_for(ds: &ClimateDataset, selection: &Selection) -> DashboardView {
        render(ds, &CorrelationMatrix::compute(&ds.records), selection)
    }

    #[test]
    fn renders_selected_country() {
        let ds = dataset();
        let view = render_for(&ds, &Selection::new("Nilonia", YearRange::new(2015, 2024)));
        assert_eq!(view.rows.len(), 2);
        assert_eq!(view.charts[0].points, vec![[2015.0, 10.0], [2024.0, 8.0]]);
        assert_eq!(view.charts[2].kind, ChartKind::Bar);
        assert_eq!(view.charts[3].metric, Metric::SdgScore);
        assert_eq!(view.recommendation.tier, Tier::Progressing);
    }

    #[test]
    fn correlation_ignores_the_selection() {
        let ds = dataset();
        let a = render_for(&ds, &Selection::new("Nilonia", YearRange::new(2015, 2015)));
        let b = render_for(&ds, &Selection::new("Ostrava", YearRange::new(2024, 2024)));
        assert_eq!(
            a.correlation.get(Metric::Debt, Metric::SdgScore).to_bits(),
            b.correlation.get(Metric::Debt, Metric::SdgScore).to_bits()
        );
    }

    #[test]
    fn empty_selection_renders_empty_charts() {
        let ds = dataset();
        let view = render_for(&ds, &Selection::new("Nilonia", YearRange::new(2016, 2023)));
        assert!(view.rows.is_empty());
        assert!(view.charts.iter().all(ChartSeries::is_empty));
        assert_eq!(view.recommendation.tier, Tier::NoData);
    }

    #[test]
    fn uses_the_supplied_correlation_matrix() {
        let ds = dataset();
        let other = ClimateDataset::from_records(vec![
            record("X", 2015, 1.0, 3.0, 2.0, 9.0),
            record("X", 2016, 2.0, 1.0, 4.0, 7.0),
            record("X", 2017, 3.0, 2.0, 5.0, 8.0),
        ]);
        let supplied = CorrelationMatrix::compute(&other.records);
        let view = render(&ds, &supplied, &Selection::new("Nilonia", YearRange::new(2015, 2024)));
        assert_eq!(
            view.correlation.get(Metric::Debt, Metric::SdgScore).to_bits(),
            supplied.get(Metric::Debt, Metric::SdgScore).to_bits()
        );
        assert_ne!(
            view.correlation.get(Metric::Debt, Metric::SdgScore).to_bits(),
            CorrelationMatrix::compute(&ds.records)
                .get(Metric::Debt, Metric::SdgScore)
                .to_bits()
        );
    }
}
