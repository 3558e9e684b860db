use crate::stats;
use serde::Serialize;

/// Summary of one country's values for a metric
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CountryStats {
    pub country: String,
    pub mean: Option<f64>,
    pub median: Option<f64>,
    /// Sample standard deviation, undefined below two values
    pub std: Option<f64>,
    pub count: usize,
}

impl CountryStats {
    pub fn from_values(country: impl Into<String>, values: &[f64]) -> Self {
        Self {
            country: country.into(),
            mean: stats::mean(values),
            median: stats::median(values),
            std: stats::sample_std(values),
            count: values.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_country_stats() {
        let stats = CountryStats::from_values("benin", &[1.0, 2.0, 3.0, 10.0]);
        assert_eq!(stats.count, 4);
        assert_relative_eq!(stats.mean.unwrap(), 4.0);
        assert_relative_eq!(stats.median.unwrap(), 2.5);
        assert_relative_eq!(stats.std.unwrap(), 4.0824829046386, epsilon = 1e-9);
    }

    #[test]
    fn test_single_value_has_no_std() {
        let stats = CountryStats::from_values("togo", &[7.0]);
        assert_eq!(stats.mean, Some(7.0));
        assert_eq!(stats.std, None);

        let empty = CountryStats::from_values("togo", &[]);
        assert_eq!(empty.count, 0);
        assert_eq!(empty.mean, None);
    }
}
