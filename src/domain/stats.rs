//! Single-pass column statistics and order statistics.

/// Running mean/variance accumulator (Welford).
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ColumnStats {
    pub count: usize,
    pub mean: f64,
    m2: f64,
    pub min: f64,
    pub max: f64,
}

impl ColumnStats {
    pub fn from_values<I>(values: I) -> Self
    where
        I: IntoIterator<Item = f64>,
    {
        values.into_iter().fold(Self::default(), |mut acc, x| {
            acc.push(x);
            acc
        })
    }

    pub fn push(&mut self, x: f64) {
        if self.count == 0 {
            self.min = x;
            self.max = x;
        } else {
            self.min = self.min.min(x);
            self.max = self.max.max(x);
        }
        self.count += 1;
        let delta = x - self.mean;
        self.mean += delta / self.count as f64;
        self.m2 += delta * (x - self.mean);
    }

    /// Mean, or `None` for an empty column.
    pub fn mean(&self) -> Option<f64> {
        (self.count > 0).then_some(self.mean)
    }

    /// Sample (n-1) standard deviation; `None` below two values.
    pub fn sample_std(&self) -> Option<f64> {
        (self.count >= 2).then(|| (self.m2 / (self.count - 1) as f64).sqrt())
    }

    /// True when every value seen is identical.
    pub fn is_constant(&self) -> bool {
        self.count > 0 && self.min == self.max
    }
}

/// Median of the given values; `None` when empty.
pub fn median(values: &[f64]) -> Option<f64> {
    quantile(values, 0.5)
}

/// Quantile with linear interpolation between closest ranks.
pub fn quantile(values: &[f64], q: f64) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let pos = q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    let frac = pos - lo as f64;
    Some(sorted[lo] + (sorted[hi] - sorted[lo]) * frac)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn empty_stats() {
        let stats = ColumnStats::from_values(std::iter::empty());
        assert_eq!(stats.mean(), None);
        assert_eq!(stats.sample_std(), None);
        assert!(!stats.is_constant());
    }

    #[test]
    fn single_value_has_no_std() {
        let stats = ColumnStats::from_values([4.0]);
        assert_eq!(stats.mean(), Some(4.0));
        assert_eq!(stats.sample_std(), None);
    }

    #[test]
    fn known_sample_std() {
        let stats = ColumnStats::from_values([2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]);
        assert_relative_eq!(stats.mean().unwrap(), 5.0, epsilon = 1e-12);
        // population std is 2.0; sample std is sqrt(32 / 7)
        assert_relative_eq!(stats.sample_std().unwrap(), (32.0f64 / 7.0).sqrt(), epsilon = 1e-12);
        assert_eq!(stats.min, 2.0);
        assert_eq!(stats.max, 9.0);
    }

    #[test]
    fn constant_column() {
        let stats = ColumnStats::from_values([0.1, 0.1, 0.1]);
        assert!(stats.is_constant());
    }

    #[test]
    fn median_odd_and_even() {
        assert_eq!(median(&[3.0, 1.0, 2.0]), Some(2.0));
        assert_eq!(median(&[4.0, 1.0, 3.0, 2.0]), Some(2.5));
        assert_eq!(median(&[]), None);
    }

    #[test]
    fn quantiles_interpolate() {
        let v = [1.0, 2.0, 3.0, 4.0, 5.0];
        assert_eq!(quantile(&v, 0.0), Some(1.0));
        assert_eq!(quantile(&v, 0.25), Some(2.0));
        assert_eq!(quantile(&v, 1.0), Some(5.0));
        assert_relative_eq!(quantile(&[1.0, 2.0], 0.25).unwrap(), 1.25);
    }
}
