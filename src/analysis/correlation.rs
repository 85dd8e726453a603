use crate::data::model::{CountryRecord, Metric};

// ---------------------------------------------------------------------------
// Pearson correlation matrix over the four metrics
// ---------------------------------------------------------------------------

const N: usize = Metric::ALL.len();

/// Symmetric `N x N` matrix indexed in `Metric::ALL` order.
///
/// A metric with zero variance (or a table with fewer than two rows) has an
/// undefined correlation: every cell in its row and column is `NaN`,
/// the diagonal included.
#[derive(Debug, Clone, PartialEq)]
pub struct CorrelationMatrix {
    cells: [[f64; N]; N],
}

impl CorrelationMatrix {
    pub fn compute(records: &[CountryRecord]) -> Self {
        let columns: Vec<Vec<f64>> = Metric::ALL
            .iter()
            .map(|m| records.iter().map(|r| m.value(r)).collect())
            .collect();

        let mut cells = [[f64::NAN; N]; N];
        for i in 0..N {
            for j in i..N {
                let r = pearson(&columns[i], &columns[j]);
                cells[i][j] = r;
                cells[j][i] = r;
            }
        }

        for (i, m) in Metric::ALL.iter().enumerate() {
            if cells[i][i].is_nan() {
                log::warn!("'{m}' has zero variance; its correlations are undefined");
            }
        }
        CorrelationMatrix { cells }
    }

    pub fn get(&self, a: Metric, b: Metric) -> f64 {
        self.cells[index_of(a)][index_of(b)]
    }

    /// Rows in `Metric::ALL` order.
    pub fn rows(&self) -> &[[f64; N]; N] {
        &self.cells
    }
}

fn index_of(metric: Metric) -> usize {
    Metric::ALL
        .iter()
        .position(|m| *m == metric)
        .unwrap_or_default()
}

/// Pearson r as `Σdx·dy / sqrt(Σdx² · Σdy²)`.
///
/// The `1/n` or `1/(n-1)` factors of covariance and standard deviation
/// cancel, so this equals both the sample and population definitions.
/// A constant input is undefined even when its mean is not exactly
/// representable and the deviations come out as rounding residue.
pub fn pearson(xs: &[f64], ys: &[f64]) -> f64 {
    let n = xs.len().min(ys.len());
    if n < 2 {
        return f64::NAN;
    }
    let (xs, ys) = (&xs[..n], &ys[..n]);
    if is_constant(xs) || is_constant(ys) {
        return f64::NAN;
    }
    let mean_x = xs.iter().sum::<f64>() / n as f64;
    let mean_y = ys.iter().sum::<f64>() / n as f64;

    let mut sxy = 0.0;
    let mut sxx = 0.0;
    let mut syy = 0.0;
    for (x, y) in xs.iter().zip(ys) {
        let dx = x - mean_x;
        let dy = y - mean_y;
        sxy += dx * dy;
        sxx += dx * dx;
        syy += dy * dy;
    }

    if sxx == 0.0 || syy == 0.0 {
        return f64::NAN;
    }
    (sxy / (sxx * syy).sqrt()).clamp(-1.0, 1.0)
}

fn is_constant(values: &[f64]) -> bool {
    values.iter().all(|v| *v == values[0])
}
