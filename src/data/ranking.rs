use std::collections::{BTreeSet, HashMap};

use super::model::Record;
use crate::config::RankingConfig;

/// Marker appended to shortened labels.
const ELLIPSIS: &str = "...";

/// One bar of a ranking chart.
#[derive(Debug, Clone, PartialEq)]
pub struct RankedEntity {
    /// Full, untruncated name (tooltips).
    pub entity: String,
    /// Axis label, possibly shortened.
    pub label: String,
    /// Cumulative emissions in tons.
    pub total: f64,
}

impl RankedEntity {
    /// Total in billions of tons, rounded for axis display.
    pub fn total_billions(&self) -> f64 {
        (self.total / 1e9).round()
    }
}

/// Entities left out of a ranking: aggregate regions by exact name plus any
/// name containing a source marker such as `(GCP)`.
#[derive(Debug, Clone, Default)]
pub struct RegionExclusion {
    names: BTreeSet<String>,
    markers: Vec<String>,
}

impl RegionExclusion {
    /// Exclude nothing.
    pub fn none() -> Self {
        Self::default()
    }

    pub fn new(names: &[String], markers: &[String]) -> Self {
        RegionExclusion {
            names: names.iter().cloned().collect(),
            markers: markers.iter().filter(|m| !m.is_empty()).cloned().collect(),
        }
    }

    pub fn excludes(&self, entity: &str) -> bool {
        self.names.contains(entity) || self.markers.iter().any(|m| entity.contains(m.as_str()))
    }
}

impl From<&RankingConfig> for RegionExclusion {
    fn from(cfg: &RankingConfig) -> Self {
        RegionExclusion::new(&cfg.excluded_regions, &cfg.source_markers)
    }
}

/// Cut `name` to `max_chars` characters followed by `...` if it is longer.
pub fn truncate_label(name: &str, max_chars: usize) -> String {
    if name.chars().count() <= max_chars {
        return name.to_string();
    }
    let mut label: String = name.chars().take(max_chars).collect();
    label.push_str(ELLIPSIS);
    label
}

/// Sum emissions per entity and keep the `n` largest, descending.
///
/// Ties keep the order in which entities were first encountered.
pub fn top_by_total(
    records: &[Record],
    exclusion: &RegionExclusion,
    n: usize,
    label_max_chars: usize,
) -> Vec<RankedEntity> {
    let mut order: Vec<(&str, f64)> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for rec in records {
        if exclusion.excludes(&rec.entity) {
            continue;
        }
        let slot = *index.entry(rec.entity.as_str()).or_insert_with(|| {
            order.push((rec.entity.as_str(), 0.0));
            order.len() - 1
        });
        order[slot].1 += rec.annual_co2_emissions;
    }

    // `sort_by` is stable, so equal totals keep first-seen order.
    order.sort_by(|a, b| b.1.total_cmp(&a.1));
    order
        .into_iter()
        .take(n)
        .map(|(entity, total)| RankedEntity {
            entity: entity.to_string(),
            label: truncate_label(entity, label_max_chars),
            total,
        })
        .collect()
}

/// Top entities of the filtered subset, for side-by-side comparison.
pub fn comparison_ranking(subset: &[Record], cfg: &RankingConfig) -> Vec<RankedEntity> {
    top_by_total(
        subset,
        &RegionExclusion::none(),
        cfg.comparison_top_n,
        cfg.label_max_chars,
    )
}

/// Top individual countries over the whole dataset, regions excluded.
pub fn historical_ranking(records: &[Record], cfg: &RankingConfig) -> Vec<RankedEntity> {
    top_by_total(
        records,
        &RegionExclusion::from(cfg),
        cfg.historical_top_n,
        cfg.label_max_chars,
    )
}

/// Fixed axis bound for a ranking: largest total plus 10 %.
pub fn ranking_axis_max(ranking: &[RankedEntity]) -> f64 {
    ranking
        .iter()
        .map(|r| r.total)
        .reduce(f64::max)
        .map(|max| max * 1.1)
        .unwrap_or(1000.0)
}
