use std::fmt;

use crate::data::model::CountryRecord;

// ---------------------------------------------------------------------------
// SDG tiers
// ---------------------------------------------------------------------------

/// Mean SDG score below this is critical.
pub const CRITICAL_BELOW: f64 = 65.0;
/// Mean SDG score at or above this is on track.
pub const ON_TRACK_FROM: f64 = 75.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    Critical,
    Progressing,
    OnTrack,
    /// No rows in the selection, so there is no mean to judge.
    NoData,
}

impl Tier {
    pub fn from_mean(mean: Option<f64>) -> Self {
        match mean {
            None => Tier::NoData,
            Some(m) if m < CRITICAL_BELOW => Tier::Critical,
            Some(m) if m < ON_TRACK_FROM => Tier::Progressing,
            Some(_) => Tier::OnTrack,
        }
    }

    pub fn message(self, country: &str) -> String {
        match self {
            Tier::Critical => format!(
                "{country} should significantly increase renewable energy investments and debt transparency."
            ),
            Tier::Progressing => format!(
                "{country} is making progress but should optimize climate debt usage for better impact."
            ),
            Tier::OnTrack => format!(
                "{country} is on track with sustainable development goals. Keep up the good work!"
            ),
            Tier::NoData => format!(
                "No data is available for {country} in the selected year range, so no recommendation can be made."
            ),
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Tier::Critical => "critical",
            Tier::Progressing => "progressing",
            Tier::OnTrack => "on track",
            Tier::NoData => "no data",
        };
        f.write_str(s)
    }
}

// ---------------------------------------------------------------------------
// Recommendation
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct Recommendation {
    pub tier: Tier,
    /// Mean SDG score of the selection; `None` for an empty selection.
    pub mean_sdg: Option<f64>,
    pub message: String,
}

/// Arithmetic mean, `None` for an empty slice.
pub fn mean(values: impl IntoIterator<Item = f64>) -> Option<f64> {
    let (sum, n) = values
        .into_iter()
        .fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
    (n > 0).then(|| sum / n as f64)
}

/// Judge one country's filtered rows by their mean SDG score.
pub fn advise(country: &str, filtered: &[CountryRecord]) -> Recommendation {
    let mean_sdg = mean(filtered.iter().map(|r| r.sdg_score));
    let tier = Tier::from_mean(mean_sdg);
    Recommendation {
        tier,
        mean_sdg,
        message: tier.message(country),
    }
}
