use std::collections::BTreeMap;

use super::model::Record;

/// Y-axis upper bound used when there is nothing to plot.
const EMPTY_AXIS_MAX: f64 = 1000.0;

/// One year of the time series: emissions keyed by entity.
#[derive(Debug, Clone, PartialEq)]
pub struct YearPoint {
    pub year: i32,
    pub values: BTreeMap<String, f64>,
}

/// Emissions per entity over time, with a fixed Y-axis bound.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeSeries {
    /// Ascending by year, one point per year.
    pub points: Vec<YearPoint>,
    /// Entities present in the subset, first-seen order.
    pub entities: Vec<String>,
    pub y_max: f64,
}

impl TimeSeries {
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// `[year, value]` pairs for one entity, skipping years it is absent.
    pub fn series_for(&self, entity: &str) -> Vec<[f64; 2]> {
        self.points
            .iter()
            .filter_map(|p| p.values.get(entity).map(|v| [p.year as f64, *v]))
            .collect()
    }
}

/// Group `subset` by year into a [`TimeSeries`].
pub fn to_time_series(subset: &[Record]) -> TimeSeries {
    let mut by_year: BTreeMap<i32, BTreeMap<String, f64>> = BTreeMap::new();
    let mut entities: Vec<String> = Vec::new();
    let mut max = 0.0_f64;

    for rec in subset {
        by_year
            .entry(rec.year)
            .or_default()
            .insert(rec.entity.clone(), rec.annual_co2_emissions);
        if !entities.contains(&rec.entity) {
            entities.push(rec.entity.clone());
        }
        max = max.max(rec.annual_co2_emissions);
    }

    let points = by_year
        .into_iter()
        .map(|(year, values)| YearPoint { year, values })
        .collect();

    TimeSeries {
        points,
        entities,
        y_max: axis_upper_bound(max),
    }
}

/// Upper bound for a fixed axis: `max` plus a 10 % margin, rounded up to a
/// bucket that grows with the magnitude.
pub fn axis_upper_bound(max: f64) -> f64 {
    if max <= 0.0 || !max.is_finite() {
        return EMPTY_AXIS_MAX;
    }
    let upper = max * 1.1;
    let step = if upper > 1e9 {
        1e8
    } else if upper > 1e6 {
        1e5
    } else {
        1e3
    };
    (upper / step).ceil() * step
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn groups_by_year_in_ascending_order() {
        let subset = vec![
            Record::new("Afghanistan", 1941, 120.0, "Pais"),
            Record::new("Afghanistan", 1940, 100.0, "Pais"),
            Record::new("Albania", 1941, 50.0, "Pais"),
        ];
        let ts = to_time_series(&subset);

        let years: Vec<i32> = ts.points.iter().map(|p| p.year).collect();
        assert_eq!(years, vec![1940, 1941]);
        assert_eq!(ts.points[0].values.len(), 1);
        assert_eq!(ts.points[1].values["Albania"], 50.0);
        assert_eq!(ts.entities, ["Afghanistan", "Albania"]);
        assert_eq!(ts.series_for("Albania"), vec![[1941.0, 50.0]]);
    }

    #[test]
    fn afghanistan_scenario() {
        let subset = vec![
            Record::new("Afghanistan", 1940, 100.0, "Pais"),
            Record::new("Afghanistan", 1941, 120.0, "Pais"),
        ];
        let ts = to_time_series(&subset);
        assert_eq!(ts.points.len(), 2);
        assert_eq!(ts.points[0].year, 1940);
        assert_eq!(ts.points[0].values["Afghanistan"], 100.0);
        assert_eq!(ts.points[1].year, 1941);
        assert_eq!(ts.points[1].values["Afghanistan"], 120.0);
    }

    #[test]
    fn no_duplicate_years() {
        let subset: Vec<Record> = (0..30)
            .map(|i| Record::new(&format!("E{}", i % 4), 1950 + (i * 7) % 5, i as f64, "Pais"))
            .collect();
        let ts = to_time_series(&subset);
        assert!(ts.points.windows(2).all(|w| w[0].year < w[1].year));
        assert_eq!(ts.points.len(), 5);
    }

    #[test]
    fn empty_subset_has_default_axis() {
        let ts = to_time_series(&[]);
        assert!(ts.is_empty());
        assert!(ts.entities.is_empty());
        assert_eq!(ts.y_max, 1000.0);
    }

    #[test]
    fn axis_bound_buckets() {
        assert_eq!(axis_upper_bound(0.0), 1000.0);
        // 120 * 1.1 = 132 -> next 1000
        assert_eq!(axis_upper_bound(120.0), 1000.0);
        // 5.05e6 * 1.1 = 5.555e6 -> multiple of 1e5
        assert_eq!(axis_upper_bound(5_050_000.0), 5_600_000.0);
        // 2.05e9 * 1.1 = 2.255e9 -> multiple of 1e8
        assert_eq!(axis_upper_bound(2_050_000_000.0), 2_300_000_000.0);
        assert_eq!(axis_upper_bound(2_010_000_000.0), 2_300_000_000.0);
    }
}
