//! Distribution summaries behind the histogram, density, and box charts.

use crate::domain::stats::{ColumnStats, quantile};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bin {
    pub lower: f64,
    pub upper: f64,
    pub count: usize,
}

/// Equal-width bins spanning `[min, max]`; the last bin is closed on the
/// right. A constant column produces one bin of width 1 centred on it.
pub fn histogram(values: &[f64], bins: usize) -> Vec<Bin> {
    let stats = ColumnStats::from_values(values.iter().copied());
    if stats.count == 0 || bins == 0 {
        return Vec::new();
    }
    let (lo, hi) = if stats.is_constant() {
        (stats.min - 0.5, stats.max + 0.5)
    } else {
        (stats.min, stats.max)
    };
    let width = (hi - lo) / bins as f64;

    let mut out: Vec<Bin> = (0..bins)
        .map(|i| Bin {
            lower: lo + i as f64 * width,
            upper: lo + (i + 1) as f64 * width,
            count: 0,
        })
        .collect();
    for &v in values {
        let idx = (((v - lo) / width) as usize).min(bins - 1);
        out[idx].count += 1;
    }
    out
}

/// Gaussian kernel density estimate evaluated at `points` evenly spaced
/// samples across the data range, using Scott's bandwidth.
pub fn density_curve(values: &[f64], points: usize) -> Vec<(f64, f64)> {
    let stats = ColumnStats::from_values(values.iter().copied());
    let std = match stats.sample_std() {
        Some(s) if s > 0.0 => s,
        _ => return Vec::new(),
    };
    let n = stats.count as f64;
    let bandwidth = std * n.powf(-0.2);
    let norm = 1.0 / (n * bandwidth * (2.0 * std::f64::consts::PI).sqrt());
    let step = if points > 1 {
        (stats.max - stats.min) / (points - 1) as f64
    } else {
        0.0
    };

    (0..points)
        .map(|i| {
            let x = stats.min + i as f64 * step;
            let y = values
                .iter()
                .map(|&v| {
                    let u = (x - v) / bandwidth;
                    (-0.5 * u * u).exp()
                })
                .sum::<f64>()
                * norm;
            (x, y)
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq)]
pub struct BoxStats {
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub lower_whisker: f64,
    pub upper_whisker: f64,
    pub fliers: Vec<f64>,
}

/// Tukey box: whiskers reach the furthest values within 1.5 IQR of the box.
pub fn box_stats(values: &[f64]) -> Option<BoxStats> {
    let q1 = quantile(values, 0.25)?;
    let median = quantile(values, 0.5)?;
    let q3 = quantile(values, 0.75)?;
    let iqr = q3 - q1;
    let (lo_fence, hi_fence) = (q1 - 1.5 * iqr, q3 + 1.5 * iqr);

    let inside = values.iter().copied().filter(|v| *v >= lo_fence && *v <= hi_fence);
    let lower_whisker = inside.clone().fold(f64::INFINITY, f64::min);
    let upper_whisker = inside.fold(f64::NEG_INFINITY, f64::max);
    let mut fliers: Vec<f64> = values
        .iter()
        .copied()
        .filter(|v| *v < lo_fence || *v > hi_fence)
        .collect();
    fliers.sort_by(f64::total_cmp);

    Some(BoxStats {
        q1,
        median,
        q3,
        lower_whisker,
        upper_whisker,
        fliers,
    })
}
