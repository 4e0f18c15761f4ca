use std::collections::BTreeSet;

use super::model::{EntityTypeSelector, Record};
use crate::config::FilterConfig;

// ---------------------------------------------------------------------------
// Filter selection: which entities, years and entity type are shown
// ---------------------------------------------------------------------------

/// Inclusive year range. `lo > hi` is allowed and matches nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct YearRange {
    pub lo: i32,
    pub hi: i32,
}

impl YearRange {
    pub fn new(lo: i32, hi: i32) -> Self {
        YearRange { lo, hi }
    }

    pub fn contains(&self, year: i32) -> bool {
        self.lo <= year && year <= self.hi
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterSelection {
    pub entities: BTreeSet<String>,
    pub years: YearRange,
    pub entity_type: EntityTypeSelector,
}

impl FilterSelection {
    /// Whether a record passes all three predicates.
    pub fn matches(&self, rec: &Record) -> bool {
        self.entities.contains(&rec.entity)
            && self.years.contains(rec.year)
            && self.entity_type.matches(&rec.tipo_entidad)
    }
}

impl From<&FilterConfig> for FilterSelection {
    fn from(cfg: &FilterConfig) -> Self {
        FilterSelection {
            entities: cfg.default_entities.iter().cloned().collect(),
            years: YearRange::new(cfg.year_from, cfg.year_to),
            entity_type: EntityTypeSelector::All,
        }
    }
}

/// Return the records passing `selection`, in their original order.
///
/// An empty entity set or an inverted year range yields an empty subset.
pub fn filter_records(records: &[Record], selection: &FilterSelection) -> Vec<Record> {
    if selection.entities.is_empty() || selection.years.lo > selection.years.hi {
        return Vec::new();
    }
    records
        .iter()
        .filter(|rec| selection.matches(rec))
        .cloned()
        .collect()
}

// ---------------------------------------------------------------------------
// Draft / committed filter state
// ---------------------------------------------------------------------------

/// The selection being edited in the panel and the one driving the charts.
///
/// Edits only touch `draft`; [`FilterState::apply`] copies it to `committed`.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterState {
    pub draft: FilterSelection,
    pub committed: FilterSelection,
}

impl FilterState {
    pub fn new(initial: FilterSelection) -> Self {
        FilterState {
            draft: initial.clone(),
            committed: initial,
        }
    }

    /// Commit the draft. Returns whether the live selection changed.
    pub fn apply(&mut self) -> bool {
        let changed = self.committed != self.draft;
        self.committed = self.draft.clone();
        changed
    }

    /// Restore `defaults` into both the draft and the live selection.
    pub fn reset(&mut self, defaults: FilterSelection) {
        *self = FilterState::new(defaults);
    }

    pub fn is_dirty(&self) -> bool {
        self.committed != self.draft
    }

    pub fn toggle_entity(&mut self, entity: &str) {
        let selected = &mut self.draft.entities;
        if !selected.remove(entity) {
            selected.insert(entity.to_string());
        }
    }

    pub fn clear_entities(&mut self) {
        self.draft.entities.clear();
    }

    /// Select every entity of `group`, or deselect them all if they already are.
    pub fn toggle_group(&mut self, group: &[String]) {
        let selected = &mut self.draft.entities;
        if !group.is_empty() && group.iter().all(|e| selected.contains(e)) {
            for e in group {
                selected.remove(e);
            }
        } else {
            selected.extend(group.iter().cloned());
        }
    }

    pub fn set_year_lo(&mut self, lo: i32) {
        self.draft.years.lo = lo;
    }

    pub fn set_year_hi(&mut self, hi: i32) {
        self.draft.years.hi = hi;
    }

    pub fn set_entity_type(&mut self, selector: EntityTypeSelector) {
        self.draft.entity_type = selector;
    }
}

// ---------------------------------------------------------------------------
// Entity grouping by initial letter
// ---------------------------------------------------------------------------

fn initial(name: &str) -> Option<char> {
    name.chars().next().and_then(|c| c.to_uppercase().next())
}

/// Distinct uppercase initials of `entities`, sorted.
pub fn initial_letters(entities: &[String]) -> Vec<char> {
    let letters: BTreeSet<char> = entities.iter().filter_map(|e| initial(e)).collect();
    letters.into_iter().collect()
}

/// Entities whose name starts with `letter`, keeping their (sorted) order.
pub fn entities_with_initial(entities: &[String], letter: char) -> Vec<String> {
    entities
        .iter()
        .filter(|e| initial(e) == Some(letter))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dataset() -> Vec<Record> {
        vec![
            Record::new("Afghanistan", 1940, 100.0, "Pais"),
            Record::new("Albania", 1940, 50.0, "Pais"),
            Record::new("Afghanistan", 1941, 120.0, "Pais"),
            Record::new("World", 1941, 900.0, "Region"),
        ]
    }

    fn selection(entities: &[&str], lo: i32, hi: i32, ty: EntityTypeSelector) -> FilterSelection {
        FilterSelection {
            entities: entities.iter().map(|e| e.to_string()).collect(),
            years: YearRange::new(lo, hi),
            entity_type: ty,
        }
    }

    #[test]
    fn filters_by_entity_year_and_type() {
        let sel = selection(&["Afghanistan"], 1940, 1941, EntityTypeSelector::All);
        let subset = filter_records(&dataset(), &sel);
        assert_eq!(subset.len(), 2);
        assert!(subset.iter().all(|r| r.entity == "Afghanistan"));

        let sel = selection(
            &["Afghanistan", "World"],
            1941,
            1941,
            EntityTypeSelector::Only("Region".into()),
        );
        let subset = filter_records(&dataset(), &sel);
        assert_eq!(subset, vec![Record::new("World", 1941, 900.0, "Region")]);
    }

    #[test]
    fn year_bounds_are_inclusive_and_inverted_range_is_empty() {
        let sel = selection(&["Afghanistan"], 1941, 1941, EntityTypeSelector::All);
        assert_eq!(filter_records(&dataset(), &sel).len(), 1);

        let sel = selection(&["Afghanistan", "Albania"], 1941, 1940, EntityTypeSelector::All);
        assert!(filter_records(&dataset(), &sel).is_empty());
    }

    #[test]
    fn empty_entity_set_gives_empty_subset() {
        let sel = selection(&[], 1900, 2100, EntityTypeSelector::All);
        assert!(filter_records(&dataset(), &sel).is_empty());
    }

    #[test]
    fn filtering_is_idempotent() {
        let sel = selection(&["Albania", "World"], 1940, 1941, EntityTypeSelector::All);
        let once = filter_records(&dataset(), &sel);
        let twice = filter_records(&once, &sel);
        assert_eq!(once, twice);
    }

    #[test]
    fn draft_edits_do_not_touch_committed_until_apply() {
        let initial = selection(&["Albania"], 1940, 2024, EntityTypeSelector::All);
        let mut state = FilterState::new(initial.clone());

        state.toggle_entity("Afghanistan");
        state.toggle_entity("Albania");
        state.set_year_lo(1950);
        assert_eq!(state.committed, initial);
        assert!(state.is_dirty());

        assert!(state.apply());
        assert_eq!(state.committed.entities.len(), 1);
        assert!(state.committed.entities.contains("Afghanistan"));
        assert_eq!(state.committed.years.lo, 1950);
        assert!(!state.apply());

        state.reset(initial.clone());
        assert_eq!(state.draft, initial);
        assert_eq!(state.committed, initial);
    }

    #[test]
    fn toggle_group_selects_then_deselects() {
        let mut state = FilterState::new(selection(&["Chad"], 1940, 2024, EntityTypeSelector::All));
        let group = vec!["Albania".to_string(), "Algeria".to_string()];

        state.toggle_group(&group);
        assert_eq!(state.draft.entities.len(), 3);

        state.toggle_group(&group);
        assert_eq!(state.draft.entities.len(), 1);
        assert!(state.draft.entities.contains("Chad"));

        state.clear_entities();
        assert!(state.draft.entities.is_empty());
    }

    #[test]
    fn letters_and_groups() {
        let entities: Vec<String> = ["Albania", "algeria", "Brazil", "Chad"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(initial_letters(&entities), vec!['A', 'B', 'C']);
        assert_eq!(entities_with_initial(&entities, 'A'), ["Albania", "algeria"]);
        assert!(entities_with_initial(&entities, 'Z').is_empty());
    }
}
