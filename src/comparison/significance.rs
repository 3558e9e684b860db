//! Tests of whether a metric differs across countries.
//!
//! Both tests take one group of values per country. Groups with no values
//! carry no information and are left out; fewer than two remaining groups
//! is degenerate input.

use crate::error::{Result, SolarError};
use crate::stats;
use serde::Serialize;
use statrs::distribution::{ChiSquared, ContinuousCDF, FisherSnedecor};
use std::fmt;

/// Tolerance, relative to the raw sum of squares, under which a sum of
/// squared deviations counts as zero
const ZERO_VARIANCE_TOLERANCE: f64 = 1e-12;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TestKind {
    Anova,
    KruskalWallis,
}

impl fmt::Display for TestKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TestKind::Anova => f.write_str("anova"),
            TestKind::KruskalWallis => f.write_str("kruskal_wallis"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SignificanceTest {
    pub kind: TestKind,
    /// F for ANOVA, H for Kruskal-Wallis
    pub statistic: f64,
    pub p_value: f64,
    pub df_between: f64,
    /// Only defined for ANOVA
    pub df_within: Option<f64>,
    /// Input had no variance to test; statistic 0 and p-value 1
    pub degenerate: bool,
}

impl SignificanceTest {
    fn degenerate(kind: TestKind, df_between: f64, df_within: Option<f64>) -> Self {
        Self {
            kind,
            statistic: 0.0,
            p_value: 1.0,
            df_between,
            df_within,
            degenerate: true,
        }
    }

    pub fn is_significant(&self, alpha: f64) -> bool {
        !self.degenerate && self.p_value < alpha
    }
}

fn non_empty<'a>(groups: &'a [(String, Vec<f64>)]) -> Vec<&'a [f64]> {
    groups
        .iter()
        .map(|(_, values)| values.as_slice())
        .filter(|values| !values.is_empty())
        .collect()
}

/// One-way analysis of variance.
///
/// Zero total variance, or no within-group degrees of freedom, is degenerate.
/// Zero within-group variance with separated group means gives F = +inf and
/// p = 0.
pub fn one_way_anova(groups: &[(String, Vec<f64>)]) -> Result<SignificanceTest> {
    let groups = non_empty(groups);
    let k = groups.len();
    let n: usize = groups.iter().map(|g| g.len()).sum();
    let df_between = k.saturating_sub(1) as f64;
    let df_within = n.saturating_sub(k) as f64;

    if k < 2 || df_within == 0.0 {
        return Ok(SignificanceTest::degenerate(
            TestKind::Anova,
            df_between,
            Some(df_within),
        ));
    }

    let all: Vec<f64> = groups.iter().flat_map(|g| g.iter().copied()).collect();
    let grand_mean = stats::mean(&all).unwrap_or(0.0);

    let (mut ss_between, mut ss_within) = (0.0, 0.0);
    for group in &groups {
        let group_mean = stats::mean(group).unwrap_or(0.0);
        ss_between += group.len() as f64 * (group_mean - grand_mean).powi(2);
        ss_within += group.iter().map(|x| (x - group_mean).powi(2)).sum::<f64>();
    }

    let raw_sum_of_squares: f64 = all.iter().map(|x| x * x).sum();
    let tolerance = ZERO_VARIANCE_TOLERANCE * raw_sum_of_squares;
    if ss_between + ss_within <= tolerance {
        return Ok(SignificanceTest::degenerate(
            TestKind::Anova,
            df_between,
            Some(df_within),
        ));
    }

    let (statistic, p_value) = if ss_within <= tolerance {
        (f64::INFINITY, 0.0)
    } else {
        let f = (ss_between / df_between) / (ss_within / df_within);
        let distribution =
            FisherSnedecor::new(df_between, df_within).map_err(SolarError::statistics)?;
        (f, distribution.sf(f))
    };

    Ok(SignificanceTest {
        kind: TestKind::Anova,
        statistic,
        p_value,
        df_between,
        df_within: Some(df_within),
        degenerate: false,
    })
}

/// Kruskal-Wallis H test on pooled ranks, corrected for ties.
///
/// All values tied is degenerate.
pub fn kruskal_wallis(groups: &[(String, Vec<f64>)]) -> Result<SignificanceTest> {
    let groups = non_empty(groups);
    let k = groups.len();
    let df_between = k.saturating_sub(1) as f64;

    let pooled: Vec<f64> = groups.iter().flat_map(|g| g.iter().copied()).collect();
    let n = pooled.len() as f64;
    if k < 2 {
        return Ok(SignificanceTest::degenerate(
            TestKind::KruskalWallis,
            df_between,
            None,
        ));
    }

    let (ranks, tie_term) = stats::average_ranks(&pooled);
    let correction = 1.0 - tie_term / (n * n * n - n);
    if correction <= 0.0 {
        return Ok(SignificanceTest::degenerate(
            TestKind::KruskalWallis,
            df_between,
            None,
        ));
    }

    let mut offset = 0;
    let mut rank_term = 0.0;
    for group in &groups {
        let rank_sum: f64 = ranks[offset..offset + group.len()].iter().sum();
        rank_term += rank_sum * rank_sum / group.len() as f64;
        offset += group.len();
    }

    let h = (12.0 / (n * (n + 1.0)) * rank_term - 3.0 * (n + 1.0)) / correction;
    let h = h.max(0.0);
    let distribution = ChiSquared::new(df_between).map_err(SolarError::statistics)?;

    Ok(SignificanceTest {
        kind: TestKind::KruskalWallis,
        statistic: h,
        p_value: distribution.sf(h),
        df_between,
        df_within: None,
        degenerate: false,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn groups(values: &[(&str, &[f64])]) -> Vec<(String, Vec<f64>)> {
        values
            .iter()
            .map(|(name, v)| (name.to_string(), v.to_vec()))
            .collect()
    }

    #[test]
    fn test_anova_separated_groups() {
        let input = groups(&[("a", &[1.0, 2.0, 3.0]), ("b", &[4.0, 5.0, 6.0])]);
        let test = one_way_anova(&input).unwrap();

        assert_relative_eq!(test.statistic, 13.5, epsilon = 1e-9);
        assert_eq!(test.df_between, 1.0);
        assert_eq!(test.df_within, Some(4.0));
        assert!(test.p_value > 0.01 && test.p_value < 0.03, "p = {}", test.p_value);
        assert!(test.is_significant(0.05));
        assert!(!test.degenerate);
    }

    #[test]
    fn test_anova_is_scale_invariant() {
        for scale in [1e-7, 1e-3, 1e4, 1e8] {
            let a: Vec<f64> = [1.0, 2.0, 3.0].iter().map(|v| v * scale).collect();
            let b: Vec<f64> = [4.0, 5.0, 6.0].iter().map(|v| v * scale).collect();
            let test = one_way_anova(&groups(&[("a", &a), ("b", &b)])).unwrap();

            assert!(!test.degenerate, "degenerate at scale {}", scale);
            assert_relative_eq!(test.statistic, 13.5, epsilon = 1e-6);
            assert!(test.p_value > 0.01 && test.p_value < 0.03, "p = {}", test.p_value);
        }
    }

    #[test]
    fn test_anova_small_magnitude_groups() {
        // sub-unit readings such as a night-time sensor offset
        let input = groups(&[
            ("a", &[0.0010, 0.0012, 0.0011]),
            ("b", &[0.0020, 0.0021, 0.0019]),
        ]);
        let test = one_way_anova(&input).unwrap();

        assert!(!test.degenerate);
        assert!(test.statistic.is_finite());
        assert!(test.statistic > 100.0, "F = {}", test.statistic);
        assert!(test.is_significant(0.05));
    }

    #[test]
    fn test_anova_identical_values_is_degenerate() {
        let input = groups(&[("a", &[5.0, 5.0, 5.0]), ("b", &[5.0, 5.0])]);
        let test = one_way_anova(&input).unwrap();

        assert!(test.degenerate);
        assert_eq!(test.statistic, 0.0);
        assert_eq!(test.p_value, 1.0);
        assert!(!test.is_significant(0.05));
    }

    #[test]
    fn test_anova_no_within_degrees_of_freedom() {
        let input = groups(&[("a", &[1.0]), ("b", &[9.0])]);
        let test = one_way_anova(&input).unwrap();
        assert!(test.degenerate);
        assert_eq!(test.df_within, Some(0.0));
    }

    #[test]
    fn test_anova_constant_groups_with_different_means() {
        let input = groups(&[("a", &[2.0, 2.0]), ("b", &[7.0, 7.0])]);
        let test = one_way_anova(&input).unwrap();
        assert!(test.statistic.is_infinite());
        assert_eq!(test.p_value, 0.0);
        assert!(!test.degenerate);
    }

    #[test]
    fn test_anova_skips_empty_groups() {
        let with_empty = groups(&[
            ("a", &[1.0, 2.0, 3.0]),
            ("b", &[]),
            ("c", &[4.0, 5.0, 6.0]),
        ]);
        let test = one_way_anova(&with_empty).unwrap();
        assert_eq!(test.df_between, 1.0);
        assert_relative_eq!(test.statistic, 13.5, epsilon = 1e-9);
    }

    #[test]
    fn test_kruskal_wallis_separated_groups() {
        let input = groups(&[("a", &[1.0, 2.0, 3.0]), ("b", &[4.0, 5.0, 6.0])]);
        let test = kruskal_wallis(&input).unwrap();

        assert_relative_eq!(test.statistic, 27.0 / 7.0, epsilon = 1e-9);
        assert_eq!(test.df_between, 1.0);
        assert_eq!(test.df_within, None);
        assert!(test.p_value > 0.04 && test.p_value < 0.06, "p = {}", test.p_value);
    }

    #[test]
    fn test_kruskal_wallis_tie_correction() {
        let input = groups(&[("a", &[1.0, 1.0, 2.0]), ("b", &[2.0, 3.0, 3.0])]);
        let test = kruskal_wallis(&input).unwrap();

        // ranks a: 1.5 1.5 3.5, b: 3.5 5.5 5.5; three tie groups of two
        let uncorrected = 12.0 / 42.0 * (6.5f64.powi(2) / 3.0 + 14.5f64.powi(2) / 3.0) - 21.0;
        let correction = 1.0 - 18.0 / 210.0;
        assert_relative_eq!(test.statistic, uncorrected / correction, epsilon = 1e-9);
    }

    #[test]
    fn test_anova_identical_values_with_offset_is_degenerate() {
        let input = groups(&[("a", &[0.1, 0.1, 0.1]), ("b", &[0.1, 0.1])]);
        let test = one_way_anova(&input).unwrap();
        assert!(test.degenerate);
    }

    #[test]
    fn test_kruskal_wallis_all_tied_is_degenerate() {
        let input = groups(&[("a", &[4.0, 4.0]), ("b", &[4.0, 4.0])]);
        let test = kruskal_wallis(&input).unwrap();
        assert!(test.degenerate);
        assert_eq!(test.statistic, 0.0);
        assert_eq!(test.p_value, 1.0);
    }
}
