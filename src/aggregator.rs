//! Merges two city series into a chart-ready comparison

use crate::models::{
    Average, ChartDataset, ChartTrace, CitySummary, CityTimeSeries, ComparisonResult, TableRow,
};
use chrono::NaiveDate;
use std::collections::{BTreeSet, HashMap};

const TRACE_COLORS: [&str; 2] = ["#0d6efd", "#fd7e14"];
const Y_AXIS_LABEL: &str = "Max Temp (°C)";

/// Build the comparison of `series_a` against `series_b`.
///
/// The chart axis is the sorted union of both series' dates; a city without a
/// reading on an axis date gets `None` there. The raw table only lists dates
/// present in both series.
#[must_use]
pub fn compare(series_a: CityTimeSeries, series_b: CityTimeSeries) -> ComparisonResult {
    let summary_a = summarize(&series_a);
    let summary_b = summarize(&series_b);

    let average_difference = match (summary_a.average.value(), summary_b.average.value()) {
        (Some(a), Some(b)) => Average::Defined(a - b),
        _ => Average::Undefined,
    };

    let by_date_a = index_by_date(&series_a);
    let by_date_b = index_by_date(&series_b);

    let dates: Vec<NaiveDate> = by_date_a
        .keys()
        .chain(by_date_b.keys())
        .copied()
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    let traces = [(&series_a, &by_date_a), (&series_b, &by_date_b)]
        .into_iter()
        .zip(TRACE_COLORS)
        .map(|((series, by_date), color)| ChartTrace {
            label: series.label.clone(),
            color: color.to_string(),
            values: dates
                .iter()
                .map(|date| by_date.get(date).copied().flatten())
                .collect(),
        })
        .collect();

    let table = dates
        .iter()
        .filter_map(|date| {
            let a = by_date_a.get(date)?;
            let b = by_date_b.get(date)?;
            Some(TableRow {
                date: *date,
                city_a: *a,
                city_b: *b,
            })
        })
        .collect();

    let chart = ChartDataset {
        title: format!(
            "Max Daily Temperature: {} vs {}",
            series_a.label, series_b.label
        ),
        y_axis_label: Y_AXIS_LABEL.to_string(),
        dates,
        traces,
    };

    ComparisonResult {
        series_a,
        series_b,
        summary_a,
        summary_b,
        average_difference,
        chart,
        table,
    }
}

fn summarize(series: &CityTimeSeries) -> CitySummary {
    let min = series.present_values().reduce(f64::min);
    let max = series.present_values().reduce(f64::max);

    CitySummary {
        label: series.label.clone(),
        average: Average::of(series.present_values()),
        readings: series.present_values().count(),
        missing: series.missing_count(),
        min,
        max,
    }
}

// A repeated date keeps its last value.
fn index_by_date(series: &CityTimeSeries) -> HashMap<NaiveDate, Option<f64>> {
    series
        .readings
        .iter()
        .map(|r| (r.date, r.max_temperature))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DailyReading, DateRange};

    fn date(m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, m, d).unwrap()
    }

    fn series(label: &str, start: NaiveDate, values: &[Option<f64>]) -> CityTimeSeries {
        let readings = start
            .iter_days()
            .zip(values)
            .map(|(date, value)| DailyReading {
                date,
                max_temperature: *value,
            })
            .collect();
        CityTimeSeries::new(label.to_string(), readings)
    }

    #[test]
    fn test_average_ignores_missing() {
        let a = series("A", date(1, 1), &[Some(10.0), Some(20.0), None]);
        let b = series("B", date(1, 1), &[Some(1.0), Some(2.0), Some(3.0)]);
        let result = compare(a, b);

        assert_eq!(result.summary_a.average, Average::Defined(15.0));
        assert_eq!(result.summary_a.readings, 2);
        assert_eq!(result.summary_a.missing, 1);
        assert_eq!(result.summary_b.average, Average::Defined(2.0));
        assert_eq!(result.average_difference, Average::Defined(13.0));
        assert_eq!(result.summary_a.min, Some(10.0));
        assert_eq!(result.summary_a.max, Some(20.0));
    }

    #[test]
    fn test_all_missing_is_undefined_not_zero() {
        let a = series("A", date(1, 1), &[None, None]);
        let b = series("B", date(1, 1), &[Some(5.0), None]);
        let result = compare(a, b);

        assert_eq!(result.summary_a.average, Average::Undefined);
        assert_eq!(result.summary_a.min, None);
        assert_eq!(result.average_difference, Average::Undefined);
        assert_eq!(result.summary_b.average, Average::Defined(5.0));
    }

    #[test]
    fn test_chart_axis_is_union_of_dates() {
        let a = series("New York", date(3, 1), &[Some(1.0), Some(2.0)]);
        let b = series("London", date(3, 2), &[Some(7.0), Some(8.0)]);
        let result = compare(a, b);

        assert_eq!(result.chart.dates, vec![date(3, 1), date(3, 2), date(3, 3)]);
        assert_eq!(result.chart.traces[0].values, vec![Some(1.0), Some(2.0), None]);
        assert_eq!(result.chart.traces[1].values, vec![None, Some(7.0), Some(8.0)]);
        assert_eq!(result.table.len(), 1);
        assert_eq!(result.table[0].date, date(3, 2));
        assert_eq!(result.chart.title, "Max Daily Temperature: New York vs London");
    }

    #[test]
    fn test_thirty_day_range_gives_thirty_dates_and_two_traces() {
        let range = DateRange::new(date(4, 1), date(4, 30)).unwrap();
        let values: Vec<Option<f64>> = (0..30_i32).map(|i| Some(f64::from(i))).collect();
        let a = series("A", range.start(), &values);
        let b = series("B", range.start(), &values);
        let result = compare(a, b);

        assert_eq!(result.chart.dates.len(), range.num_days());
        assert_eq!(result.chart.dates.first(), Some(&range.start()));
        assert_eq!(result.chart.dates.last(), Some(&range.end()));
        assert_eq!(result.chart.traces.len(), 2);
        assert_eq!(result.chart.traces[0].label, "A");
        assert_eq!(result.chart.traces[1].label, "B");
        assert_ne!(result.chart.traces[0].color, result.chart.traces[1].color);
    }

    #[test]
    fn test_series_keep_source_order() {
        let mut a = series("A", date(5, 1), &[Some(1.0), Some(2.0)]);
        a.readings.reverse();
        let b = series("B", date(5, 1), &[Some(3.0), Some(4.0)]);
        let result = compare(a, b);

        assert_eq!(result.series_a.readings[0].date, date(5, 2));
        assert_eq!(result.chart.dates, vec![date(5, 1), date(5, 2)]);
        assert_eq!(result.chart.traces[0].values, vec![Some(1.0), Some(2.0)]);
    }
}
