use std::collections::BTreeSet;
use std::fmt;

/// `tipo_entidad` value marking an individual country.
pub const COUNTRY_TYPE: &str = "Pais";

// ---------------------------------------------------------------------------
// Record – one row of the emissions table
// ---------------------------------------------------------------------------

/// A single observation: one entity's emissions for one year.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    /// Country, region or bloc name. Never empty.
    pub entity: String,
    pub year: i32,
    /// Metric tons of CO₂.
    pub annual_co2_emissions: f64,
    /// Entity classification (`"Pais"` for countries).
    pub tipo_entidad: String,
}

impl Record {
    pub fn new(
        entity: impl Into<String>,
        year: i32,
        emissions: f64,
        tipo_entidad: impl Into<String>,
    ) -> Self {
        Record {
            entity: entity.into(),
            year,
            annual_co2_emissions: emissions,
            tipo_entidad: tipo_entidad.into(),
        }
    }

    /// Whether this record describes an individual country.
    pub fn is_country(&self) -> bool {
        self.tipo_entidad == COUNTRY_TYPE
    }
}

// ---------------------------------------------------------------------------
// EntityTypeSelector – "all" or one specific category
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum EntityTypeSelector {
    #[default]
    All,
    Only(String),
}

impl EntityTypeSelector {
    pub fn matches(&self, tipo_entidad: &str) -> bool {
        match self {
            EntityTypeSelector::All => true,
            EntityTypeSelector::Only(t) => t == tipo_entidad,
        }
    }
}

impl fmt::Display for EntityTypeSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityTypeSelector::All => write!(f, "All types"),
            EntityTypeSelector::Only(t) if t.is_empty() => write!(f, "<unclassified>"),
            EntityTypeSelector::Only(t) => write!(f, "{t}"),
        }
    }
}

// ---------------------------------------------------------------------------
// Dataset – the complete loaded table
// ---------------------------------------------------------------------------

/// The full parsed dataset with pre-computed indices. Immutable once built.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    records: Vec<Record>,
    /// Sorted distinct entity names.
    entities: Vec<String>,
    /// Distinct `tipo_entidad` values in first-seen order.
    entity_types: Vec<String>,
    /// Distinct years, ascending.
    years: Vec<i32>,
}

impl Dataset {
    /// Build indices from the loaded records.
    pub fn from_records(records: Vec<Record>) -> Self {
        let mut entities: BTreeSet<&str> = BTreeSet::new();
        let mut years: BTreeSet<i32> = BTreeSet::new();
        let mut entity_types: Vec<String> = Vec::new();

        for rec in &records {
            entities.insert(&rec.entity);
            years.insert(rec.year);
            if !entity_types.contains(&rec.tipo_entidad) {
                entity_types.push(rec.tipo_entidad.clone());
            }
        }

        let entities = entities.into_iter().map(str::to_string).collect();
        let years = years.into_iter().collect();
        Dataset {
            records,
            entities,
            entity_types,
            years,
        }
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn entities(&self) -> &[String] {
        &self.entities
    }

    pub fn entity_types(&self) -> &[String] {
        &self.entity_types
    }

    /// Distinct years present, ascending.
    pub fn years(&self) -> &[i32] {
        &self.years
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn indices_are_built_from_records() {
        let ds = Dataset::from_records(vec![
            Record::new("Albania", 1941, 5.0, "Pais"),
            Record::new("World", 1940, 50.0, "Region"),
            Record::new("Afghanistan", 1940, 1.0, "Pais"),
            Record::new("Albania", 1940, 4.0, "Pais"),
        ]);

        assert_eq!(ds.len(), 4);
        assert_eq!(ds.entities(), ["Afghanistan", "Albania", "World"]);
        assert_eq!(ds.entity_types(), ["Pais", "Region"]);
        assert_eq!(ds.years(), [1940, 1941]);
    }

    #[test]
    fn selector_matches() {
        assert!(EntityTypeSelector::All.matches("anything"));
        let only = EntityTypeSelector::Only("Pais".into());
        assert!(only.matches("Pais"));
        assert!(!only.matches("Region"));
        assert_eq!(only.to_string(), "Pais");
    }
}
