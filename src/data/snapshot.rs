use std::collections::BTreeMap;

use super::model::{Dataset, Record};

/// Intensity assigned to the smallest / largest positive value.
const INTENSITY_MIN: f64 = 0.2;
const INTENSITY_MAX: f64 = 1.0;

/// Logarithmic mapping from emissions to a colour intensity in
/// `[INTENSITY_MIN, INTENSITY_MAX]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LogScale {
    min: f64,
    max: f64,
}

impl LogScale {
    /// Build from the positive values of `values`. `None` if there are none.
    pub fn from_values(values: impl IntoIterator<Item = f64>) -> Option<Self> {
        let mut bounds: Option<(f64, f64)> = None;
        for v in values.into_iter().filter(|v| *v > 0.0 && v.is_finite()) {
            bounds = Some(match bounds {
                None => (v, v),
                Some((lo, hi)) => (lo.min(v), hi.max(v)),
            });
        }
        bounds.map(|(min, max)| LogScale { min, max })
    }

    pub fn domain(&self) -> (f64, f64) {
        (self.min, self.max)
    }

    /// Intensity for `value`; `None` for zero / negative / non-finite values.
    pub fn intensity(&self, value: f64) -> Option<f64> {
        if value <= 0.0 || !value.is_finite() {
            return None;
        }
        let span = self.max.ln() - self.min.ln();
        if span <= 0.0 {
            return Some(INTENSITY_MAX);
        }
        let t = ((value.ln() - self.min.ln()) / span).clamp(0.0, 1.0);
        Some(INTENSITY_MIN + t * (INTENSITY_MAX - INTENSITY_MIN))
    }
}

/// Per-country emissions for a single year.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub year: i32,
    pub values: BTreeMap<String, f64>,
    /// `None` when no country has positive emissions that year.
    pub scale: Option<LogScale>,
}

impl Snapshot {
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Value for `entity` if it is present and positive.
    pub fn value(&self, entity: &str) -> Option<f64> {
        self.values.get(entity).copied().filter(|v| *v > 0.0)
    }

    /// Colour intensity for `entity`; `None` means "no data" colour.
    pub fn intensity(&self, entity: &str) -> Option<f64> {
        let value = self.value(entity)?;
        self.scale.as_ref()?.intensity(value)
    }
}

/// Emissions of every country (`Pais`) in `year`. A later record for the same
/// country overwrites an earlier one.
pub fn snapshot(records: &[Record], year: i32) -> Snapshot {
    let values: BTreeMap<String, f64> = records
        .iter()
        .filter(|r| r.year == year && r.is_country())
        .map(|r| (r.entity.clone(), r.annual_co2_emissions))
        .collect();
    let scale = LogScale::from_values(values.values().copied());
    Snapshot {
        year,
        values,
        scale,
    }
}

/// Distinct years of the dataset, ascending.
pub fn available_years(dataset: &Dataset) -> Vec<i32> {
    dataset.years().to_vec()
}

/// `preferred` if the dataset has it, else the closest available year
/// (the earlier one on a tie). `None` for an empty dataset.
pub fn nearest_year(years: &[i32], preferred: i32) -> Option<i32> {
    years
        .iter()
        .copied()
        .min_by_key(|y| ((*y - preferred).abs(), *y))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn records() -> Vec<Record> {
        vec![
            Record::new("Chad", 2020, 10.0, "Pais"),
            Record::new("Peru", 2020, 1000.0, "Pais"),
            Record::new("Fiji", 2020, 0.0, "Pais"),
            Record::new("World", 2020, 5000.0, "Region"),
            Record::new("Chad", 2019, 9.0, "Pais"),
        ]
    }

    #[test]
    fn snapshot_keeps_countries_of_one_year() {
        let snap = snapshot(&records(), 2020);
        assert_eq!(snap.values.len(), 3);
        assert!(!snap.values.contains_key("World"));
        assert_eq!(snap.value("Chad"), Some(10.0));
        assert_eq!(snap.value("Fiji"), None);
        assert_eq!(snap.scale.unwrap().domain(), (10.0, 1000.0));
    }

    #[test]
    fn log_scale_maps_domain_to_intensity_range() {
        let snap = snapshot(&records(), 2020);
        assert!((snap.intensity("Chad").unwrap() - 0.2).abs() < 1e-12);
        assert!((snap.intensity("Peru").unwrap() - 1.0).abs() < 1e-12);

        let scale = LogScale::from_values([10.0, 1000.0]).unwrap();
        // 100 is halfway between 10 and 1000 on a log axis.
        assert!((scale.intensity(100.0).unwrap() - 0.6).abs() < 1e-12);
    }

    #[test]
    fn zero_and_missing_are_outside_the_scale() {
        let snap = snapshot(&records(), 2020);
        assert_eq!(snap.intensity("Fiji"), None);
        assert_eq!(snap.intensity("Atlantis"), None);
        assert_eq!(LogScale::from_values([0.0, -3.0]), None);
    }

    #[test]
    fn single_value_is_full_intensity() {
        let snap = snapshot(&records(), 2019);
        assert_eq!(snap.intensity("Chad"), Some(1.0));
    }

    #[test]
    fn year_without_data_is_empty() {
        let snap = snapshot(&records(), 1900);
        assert!(snap.is_empty());
        assert!(snap.scale.is_none());
    }

    #[test]
    fn years_and_nearest() {
        let ds = Dataset::from_records(records());
        let years = available_years(&ds);
        assert_eq!(years, vec![2019, 2020]);
        assert_eq!(nearest_year(&years, 2020), Some(2020));
        assert_eq!(nearest_year(&years, 2024), Some(2020));
        assert_eq!(nearest_year(&years, 1940), Some(2019));
        assert_eq!(nearest_year(&[], 2020), None);
    }
}
