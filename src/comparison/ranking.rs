use super::CountryStats;
use crate::config::RankOrder;
use serde::Serialize;
use std::cmp::Ordering;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankEntry {
    /// 1-based, consecutive
    pub rank: usize,
    pub country: String,
    /// Mean of the metric; `None` when the country has no values
    pub value: Option<f64>,
}

/// Rank countries by mean.
///
/// Ties are broken by country name and countries without a mean go last,
/// so the result does not depend on the order of `summaries`.
pub fn rank_countries(summaries: &[CountryStats], order: RankOrder) -> Vec<RankEntry> {
    let mut sorted: Vec<&CountryStats> = summaries.iter().collect();
    sorted.sort_by(|a, b| {
        let by_value = match (a.mean, b.mean) {
            // means are NaN-free; -0.0 and 0.0 compare equal
            (Some(x), Some(y)) => {
                let ascending = x.partial_cmp(&y).unwrap_or(Ordering::Equal);
                match order {
                    RankOrder::Descending => ascending.reverse(),
                    RankOrder::Ascending => ascending,
                }
            }
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        };
        by_value.then_with(|| a.country.cmp(&b.country))
    });

    sorted
        .into_iter()
        .enumerate()
        .map(|(index, stats)| RankEntry {
            rank: index + 1,
            country: stats.country.clone(),
            value: stats.mean,
        })
        .collect()
}
