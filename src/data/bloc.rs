use std::collections::{BTreeMap, BTreeSet};

use super::model::Record;
use crate::config::BlocConfig;

const MILLION: f64 = 1e6;

/// A named group of countries.
#[derive(Debug, Clone)]
pub struct Bloc {
    pub name: String,
    members: BTreeSet<String>,
}

impl Bloc {
    pub fn new(name: &str, members: impl IntoIterator<Item = String>) -> Self {
        Bloc {
            name: name.to_string(),
            members: members.into_iter().collect(),
        }
    }

    pub fn contains(&self, entity: &str) -> bool {
        self.members.contains(entity)
    }
}

impl From<&BlocConfig> for Bloc {
    fn from(cfg: &BlocConfig) -> Self {
        Bloc::new(&cfg.name, cfg.members.iter().cloned())
    }
}

/// Member vs. non-member emissions for one year, in millions of tons.
#[derive(Debug, Clone, PartialEq)]
pub struct BlocPoint {
    pub year: i32,
    pub bloc: f64,
    pub rest: f64,
}

/// Totals and percentage shares over the whole series.
#[derive(Debug, Clone, PartialEq)]
pub struct BlocShares {
    /// Millions of tons.
    pub bloc_total: f64,
    pub rest_total: f64,
    /// Percentages rounded to one decimal.
    pub bloc_pct: f64,
    pub rest_pct: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BlocSeries {
    /// Name of the bloc the series was split by.
    pub name: String,
    pub points: Vec<BlocPoint>,
    /// `None` when both totals are zero.
    pub shares: Option<BlocShares>,
}

impl BlocSeries {
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Split country emissions of `subset` per year into bloc and rest.
///
/// Only `Pais` records count, so aggregates such as "World" are not added
/// twice.
pub fn to_bloc_series(subset: &[Record], bloc: &Bloc) -> BlocSeries {
    let mut by_year: BTreeMap<i32, (f64, f64)> = BTreeMap::new();

    for rec in subset.iter().filter(|r| r.is_country()) {
        let sums = by_year.entry(rec.year).or_insert((0.0, 0.0));
        if bloc.contains(&rec.entity) {
            sums.0 += rec.annual_co2_emissions;
        } else {
            sums.1 += rec.annual_co2_emissions;
        }
    }

    let points: Vec<BlocPoint> = by_year
        .into_iter()
        .map(|(year, (b, r))| BlocPoint {
            year,
            bloc: b / MILLION,
            rest: r / MILLION,
        })
        .collect();

    let shares = shares(&points);
    BlocSeries {
        name: bloc.name.clone(),
        points,
        shares,
    }
}

fn shares(points: &[BlocPoint]) -> Option<BlocShares> {
    let bloc_total: f64 = points.iter().map(|p| p.bloc).sum();
    let rest_total: f64 = points.iter().map(|p| p.rest).sum();
    let grand = bloc_total + rest_total;
    if grand <= 0.0 {
        return None;
    }
    Some(BlocShares {
        bloc_total,
        rest_total,
        bloc_pct: round1(bloc_total / grand * 100.0),
        rest_pct: round1(rest_total / grand * 100.0),
    })
}

fn round1(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}
