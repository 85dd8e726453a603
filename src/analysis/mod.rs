//! Statistics over the loaded table: the correlation matrix behind the
//! heatmap and the SDG-based policy advisor.

pub mod advisor;
pub mod correlation;
