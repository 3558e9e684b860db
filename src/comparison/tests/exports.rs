//! Tabular exports of a comparison result

use super::dataset;
use crate::columns::float_column;
use crate::comparison::compare;
use crate::config::ComparisonConfig;
use crate::models::column_names;

fn result() -> crate::comparison::ComparisonResult {
    let datasets = vec![
        dataset("togo", "GHI", &[Some(4.0), Some(5.0), Some(6.0)]),
        dataset("benin", "GHI", &[Some(1.0), Some(2.0), Some(3.0), None]),
    ];
    compare(&datasets, "GHI", &ComparisonConfig::default()).unwrap()
}

#[test]
fn test_summary_frame() {
    let frame = result().summary_frame().unwrap();
    assert_eq!(
        column_names(&frame),
        vec!["metric", "country", "mean", "median", "std", "count"]
    );
    assert_eq!(frame.height(), 2);
    let means: Vec<Option<f64>> = float_column(&frame, "mean").unwrap().into_iter().collect();
    assert_eq!(means, vec![Some(2.0), Some(5.0)]);
}

#[test]
fn test_ranking_frame() {
    let frame = result().ranking_frame().unwrap();
    assert_eq!(column_names(&frame), vec!["rank", "country", "value"]);

    let countries: Vec<Option<&str>> = frame
        .column("country")
        .unwrap()
        .str()
        .unwrap()
        .into_iter()
        .collect();
    assert_eq!(countries, vec![Some("togo"), Some("benin")]);
    let ranks: Vec<Option<f64>> = float_column(&frame, "rank").unwrap().into_iter().collect();
    assert_eq!(ranks, vec![Some(1.0), Some(2.0)]);
}

#[test]
fn test_tests_frame() {
    let frame = result().tests_frame().unwrap();
    assert_eq!(
        column_names(&frame),
        vec!["test", "statistic", "p_value", "df_between", "df_within", "significant"]
    );
    assert_eq!(frame.height(), 2);

    let df_within: Vec<Option<f64>> = float_column(&frame, "df_within").unwrap().into_iter().collect();
    assert_eq!(df_within, vec![Some(4.0), None]);
}

#[test]
fn test_values_frame_is_long_format() {
    let frame = result().values_frame().unwrap();
    assert_eq!(column_names(&frame), vec!["country", "value"]);
    assert_eq!(frame.height(), 6);
}
