//! Cross-country comparison of a cleaned metric.
//!
//! `compare` fans in one cleaned dataset per country and produces per-country
//! summary statistics, a one-way ANOVA and a Kruskal-Wallis test across the
//! countries, and a ranking by mean. Input validation happens up front: the
//! engine either returns a full result or an error, never a partial one.

pub mod ranking;
pub mod significance;
pub mod summary;

#[cfg(test)]
mod tests;

pub use ranking::{RankEntry, rank_countries};
pub use significance::{SignificanceTest, TestKind, kruskal_wallis, one_way_anova};
pub use summary::CountryStats;

use crate::columns::present_values;
use crate::config::ComparisonConfig;
use crate::error::{Result, SolarError};
use crate::models::SolarDataset;
use polars::prelude::*;
use serde::Serialize;
use std::collections::BTreeSet;
use tracing::{debug, info};

/// Everything `compare` computes for one metric
#[derive(Debug, Clone, Serialize)]
pub struct ComparisonResult {
    pub metric: String,
    /// One entry per country, ordered by country name
    pub summaries: Vec<CountryStats>,
    pub anova: SignificanceTest,
    pub kruskal_wallis: SignificanceTest,
    pub ranking: Vec<RankEntry>,
    pub significance_level: f64,
    /// Present values per country, ordered by country name
    #[serde(skip)]
    pub values: Vec<(String, Vec<f64>)>,
}

/// Compare `metric` across the given countries
pub fn compare(
    datasets: &[SolarDataset],
    metric: &str,
    config: &ComparisonConfig,
) -> Result<ComparisonResult> {
    config.validate()?;
    validate_input(datasets, metric, config)?;

    let mut values: Vec<(String, Vec<f64>)> = datasets
        .iter()
        .map(|dataset| -> Result<(String, Vec<f64>)> {
            let group = present_values(dataset.frame(), metric)?;
            Ok((dataset.country().to_string(), group))
        })
        .collect::<Result<_>>()?;
    values.sort_by(|a, b| a.0.cmp(&b.0));

    let summaries: Vec<CountryStats> = values
        .iter()
        .map(|(country, group)| CountryStats::from_values(country.as_str(), group))
        .collect();
    for stats in &summaries {
        debug!(
            "{} {}: n={} mean={:?} std={:?}",
            metric, stats.country, stats.count, stats.mean, stats.std
        );
    }

    let anova = one_way_anova(&values)?;
    let kruskal_wallis = kruskal_wallis(&values)?;
    let ranking = rank_countries(&summaries, config.rank_order);

    info!(
        "Compared {} across {} countries: F={:.3} p={:.4}, H={:.3} p={:.4}",
        metric,
        summaries.len(),
        anova.statistic,
        anova.p_value,
        kruskal_wallis.statistic,
        kruskal_wallis.p_value
    );

    Ok(ComparisonResult {
        metric: metric.to_string(),
        summaries,
        anova,
        kruskal_wallis,
        ranking,
        significance_level: config.significance_level,
        values,
    })
}

/// Run `compare` for each metric in turn
pub fn compare_all(
    datasets: &[SolarDataset],
    metrics: &[String],
    config: &ComparisonConfig,
) -> Result<Vec<ComparisonResult>> {
    metrics
        .iter()
        .map(|metric| compare(datasets, metric, config))
        .collect()
}

fn validate_input(datasets: &[SolarDataset], metric: &str, config: &ComparisonConfig) -> Result<()> {
    let mut seen = BTreeSet::new();
    for dataset in datasets {
        if !seen.insert(dataset.country()) {
            return Err(SolarError::comparison_input(format!(
                "country '{}' appears more than once",
                dataset.country()
            )));
        }
    }

    if seen.len() < config.min_countries {
        return Err(SolarError::comparison_input(format!(
            "need at least {} countries, got {}",
            config.min_countries,
            seen.len()
        )));
    }

    let missing: Vec<&str> = datasets
        .iter()
        .filter(|dataset| !dataset.has_column(metric))
        .map(|dataset| dataset.country())
        .collect();
    if !missing.is_empty() {
        return Err(SolarError::comparison_input(format!(
            "metric '{}' is missing from: {}",
            metric,
            missing.join(", ")
        )));
    }

    Ok(())
}

impl ComparisonResult {
    pub fn rank_of(&self, country: &str) -> Option<usize> {
        self.ranking
            .iter()
            .find(|entry| entry.country == country)
            .map(|entry| entry.rank)
    }

    /// metric, country, mean, median, std, count
    pub fn summary_frame(&self) -> Result<DataFrame> {
        let rows = &self.summaries;
        let frame = DataFrame::new(vec![
            Column::new("metric".into(), vec![self.metric.as_str(); rows.len()]),
            Column::new(
                "country".into(),
                rows.iter().map(|s| s.country.as_str()).collect::<Vec<_>>(),
            ),
            Column::new("mean".into(), rows.iter().map(|s| s.mean).collect::<Vec<_>>()),
            Column::new("median".into(), rows.iter().map(|s| s.median).collect::<Vec<_>>()),
            Column::new("std".into(), rows.iter().map(|s| s.std).collect::<Vec<_>>()),
            Column::new(
                "count".into(),
                rows.iter().map(|s| s.count as u64).collect::<Vec<_>>(),
            ),
        ])?;
        Ok(frame)
    }

    /// rank, country, value
    pub fn ranking_frame(&self) -> Result<DataFrame> {
        let rows = &self.ranking;
        let frame = DataFrame::new(vec![
            Column::new(
                "rank".into(),
                rows.iter().map(|r| r.rank as u32).collect::<Vec<_>>(),
            ),
            Column::new(
                "country".into(),
                rows.iter().map(|r| r.country.as_str()).collect::<Vec<_>>(),
            ),
            Column::new("value".into(), rows.iter().map(|r| r.value).collect::<Vec<_>>()),
        ])?;
        Ok(frame)
    }

    /// test, statistic, p_value, df_between, df_within, significant
    pub fn tests_frame(&self) -> Result<DataFrame> {
        let tests = [&self.anova, &self.kruskal_wallis];
        let frame = DataFrame::new(vec![
            Column::new(
                "test".into(),
                tests.iter().map(|t| t.kind.to_string()).collect::<Vec<_>>(),
            ),
            Column::new(
                "statistic".into(),
                tests.iter().map(|t| t.statistic).collect::<Vec<_>>(),
            ),
            Column::new(
                "p_value".into(),
                tests.iter().map(|t| t.p_value).collect::<Vec<_>>(),
            ),
            Column::new(
                "df_between".into(),
                tests.iter().map(|t| t.df_between).collect::<Vec<_>>(),
            ),
            Column::new(
                "df_within".into(),
                tests.iter().map(|t| t.df_within).collect::<Vec<_>>(),
            ),
            Column::new(
                "significant".into(),
                tests
                    .iter()
                    .map(|t| t.is_significant(self.significance_level))
                    .collect::<Vec<_>>(),
            ),
        ])?;
        Ok(frame)
    }

    /// Long format: one row per value, country and value
    pub fn values_frame(&self) -> Result<DataFrame> {
        let mut countries = Vec::new();
        let mut values = Vec::new();
        for (country, group) in &self.values {
            countries.extend(std::iter::repeat_n(country.as_str(), group.len()));
            values.extend_from_slice(group);
        }
        let frame = DataFrame::new(vec![
            Column::new("country".into(), countries),
            Column::new("value".into(), values),
        ])?;
        Ok(frame)
    }
}
