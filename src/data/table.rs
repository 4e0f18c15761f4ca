use std::cmp::Ordering;

use super::model::Record;

/// Maximum number of page buttons shown at once.
const PAGE_WINDOW: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    Entity,
    Year,
    Emissions,
    EntityType,
}

impl SortKey {
    pub const ALL: [SortKey; 4] = [
        SortKey::Entity,
        SortKey::Year,
        SortKey::Emissions,
        SortKey::EntityType,
    ];

    pub fn title(self) -> &'static str {
        match self {
            SortKey::Entity => "Entity",
            SortKey::Year => "Year",
            SortKey::Emissions => "Emissions (t)",
            SortKey::EntityType => "Type",
        }
    }

    fn compare(self, a: &Record, b: &Record) -> Ordering {
        match self {
            SortKey::Entity => a.entity.cmp(&b.entity),
            SortKey::Year => a.year.cmp(&b.year),
            SortKey::Emissions => a.annual_co2_emissions.total_cmp(&b.annual_co2_emissions),
            SortKey::EntityType => a.tipo_entidad.cmp(&b.tipo_entidad),
        }
    }
}

/// Sort and pagination state of the data table. Pages are 1-based.
#[derive(Debug, Clone, PartialEq)]
pub struct TableView {
    pub sort_key: SortKey,
    pub descending: bool,
    pub page: usize,
    pub page_size: usize,
}

/// One page of sorted rows.
#[derive(Debug, Clone, PartialEq)]
pub struct TablePage {
    pub rows: Vec<Record>,
    pub page: usize,
    pub total_pages: usize,
    pub total_rows: usize,
}

impl TableView {
    pub fn new(page_size: usize) -> Self {
        TableView {
            sort_key: SortKey::Year,
            descending: false,
            page: 1,
            page_size: page_size.max(1),
        }
    }

    /// Sort by `key`; the active key flips direction, a new key starts
    /// ascending. Always returns to the first page.
    pub fn toggle_sort(&mut self, key: SortKey) {
        if self.sort_key == key {
            self.descending = !self.descending;
        } else {
            self.sort_key = key;
            self.descending = false;
        }
        self.page = 1;
    }

    pub fn set_page_size(&mut self, size: usize) {
        self.page_size = size.max(1);
        self.page = 1;
    }

    pub fn set_page(&mut self, page: usize) {
        self.page = page.max(1);
    }

    /// Sort `subset` and cut out the current page (clamped to the last page).
    pub fn page_of(&self, subset: &[Record]) -> TablePage {
        let mut sorted: Vec<&Record> = subset.iter().collect();
        sorted.sort_by(|a, b| {
            let ord = self.sort_key.compare(a, b);
            if self.descending { ord.reverse() } else { ord }
        });

        let total_rows = sorted.len();
        let total_pages = total_rows.div_ceil(self.page_size);
        let page = self.page.clamp(1, total_pages.max(1));
        let start = (page - 1) * self.page_size;
        let rows = sorted
            .into_iter()
            .skip(start)
            .take(self.page_size)
            .cloned()
            .collect();

        TablePage {
            rows,
            page,
            total_pages,
            total_rows,
        }
    }
}

/// Page numbers to show as buttons: up to five, centred on `current` and
/// shifted to stay inside `1..=total_pages`.
pub fn page_window(current: usize, total_pages: usize) -> Vec<usize> {
    if total_pages == 0 {
        return Vec::new();
    }
    let count = PAGE_WINDOW.min(total_pages);
    let half = PAGE_WINDOW / 2;
    let first = if total_pages <= PAGE_WINDOW || current <= half + 1 {
        1
    } else if current + half >= total_pages {
        total_pages + 1 - PAGE_WINDOW
    } else {
        current - half
    };
    (first..first + count).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows(n: usize) -> Vec<Record> {
        (0..n)
            .map(|i| Record::new(&format!("E{:02}", n - i), 2000 + i as i32, (i * 10) as f64, "Pais"))
            .collect()
    }

    #[test]
    fn default_sort_is_year_ascending() {
        let view = TableView::new(10);
        let page = view.page_of(&rows(3));
        let years: Vec<i32> = page.rows.iter().map(|r| r.year).collect();
        assert_eq!(years, vec![2000, 2001, 2002]);
        assert_eq!(page.total_pages, 1);
    }

    #[test]
    fn toggling_flips_then_switches_key() {
        let mut view = TableView::new(10);
        view.set_page(3);
        view.toggle_sort(SortKey::Year);
        assert!(view.descending);
        assert_eq!(view.page, 1);

        view.toggle_sort(SortKey::Entity);
        assert_eq!(view.sort_key, SortKey::Entity);
        assert!(!view.descending);

        let page = view.page_of(&rows(3));
        assert_eq!(page.rows[0].entity, "E01");
    }

    #[test]
    fn pages_are_cut_and_clamped() {
        let data = rows(23);
        let mut view = TableView::new(10);
        view.set_page(3);
        let page = view.page_of(&data);
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.rows.len(), 3);

        view.set_page(9);
        let page = view.page_of(&data);
        assert_eq!(page.page, 3);

        view.set_page_size(5);
        assert_eq!(view.page, 1);
        assert_eq!(view.page_of(&data).total_pages, 5);
    }

    #[test]
    fn empty_subset_has_no_pages() {
        let page = TableView::new(10).page_of(&[]);
        assert!(page.rows.is_empty());
        assert_eq!(page.total_pages, 0);
        assert_eq!(page.page, 1);
        assert!(page_window(1, 0).is_empty());
    }

    #[test]
    fn window_follows_current_page() {
        assert_eq!(page_window(1, 3), vec![1, 2, 3]);
        assert_eq!(page_window(2, 10), vec![1, 2, 3, 4, 5]);
        assert_eq!(page_window(6, 10), vec![4, 5, 6, 7, 8]);
        assert_eq!(page_window(9, 10), vec![6, 7, 8, 9, 10]);
        assert_eq!(page_window(10, 10), vec![6, 7, 8, 9, 10]);
    }
}
