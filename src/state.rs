use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, TryRecvError};

use crate::config::DashboardConfig;
use crate::data::bloc::{Bloc, BlocSeries, to_bloc_series};
use crate::data::filter::{FilterSelection, FilterState, filter_records};
use crate::data::loader;
use crate::data::model::{Dataset, Record};
use crate::data::ranking::{RankedEntity, comparison_ranking, historical_ranking};
use crate::data::snapshot::{Snapshot, nearest_year, snapshot};
use crate::data::table::TableView;
use crate::data::timeseries::{TimeSeries, to_time_series};
use crate::geo::Geography;

// ---------------------------------------------------------------------------
// Derived views
// ---------------------------------------------------------------------------

/// Everything the charts draw, recomputed in one pass from the dataset and
/// the committed selection.
#[derive(Debug, Clone)]
pub struct DashboardViews {
    pub subset: Vec<Record>,
    pub time_series: TimeSeries,
    pub comparison: Vec<RankedEntity>,
    pub bloc: BlocSeries,
    /// Depends on the full dataset only.
    pub historical: Vec<RankedEntity>,
    pub snapshot: Snapshot,
}

impl DashboardViews {
    pub fn compute(
        dataset: &Dataset,
        selection: &FilterSelection,
        map_year: i32,
        config: &DashboardConfig,
    ) -> Self {
        let subset = filter_records(dataset.records(), selection);
        DashboardViews {
            time_series: to_time_series(&subset),
            comparison: comparison_ranking(&subset, &config.ranking),
            bloc: to_bloc_series(&subset, &Bloc::from(&config.bloc)),
            historical: historical_ranking(dataset.records(), &config.ranking),
            snapshot: snapshot(dataset.records(), map_year),
            subset,
        }
    }
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    pub config: DashboardConfig,

    /// Loaded dataset; empty until a load completes (and after a failed one).
    pub dataset: Dataset,

    /// Draft and committed filter selections.
    pub filters: FilterState,

    /// Initial letter whose entities are listed in the filter panel.
    pub letter: Option<char>,

    /// Year shown on the world map.
    pub map_year: i32,

    pub table: TableView,

    /// Derived chart data for the committed selection.
    pub views: DashboardViews,

    pub geography: Option<Geography>,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,

    /// Whether a file loading operation is in progress.
    pub loading: bool,

    pending: Option<Receiver<anyhow::Result<Dataset>>>,
}

impl AppState {
    pub fn new(config: DashboardConfig) -> Self {
        let filters = FilterState::new(FilterSelection::from(&config.filters));
        let map_year = config.map.default_year;
        let dataset = Dataset::default();
        let views = DashboardViews::compute(&dataset, &filters.committed, map_year, &config);
        Self {
            table: TableView::new(config.table.default_page_size),
            config,
            dataset,
            filters,
            letter: None,
            map_year,
            views,
            geography: None,
            status_message: None,
            loading: false,
            pending: None,
        }
    }

    /// Start loading `path` on a background thread. The result is picked up
    /// by [`AppState::poll_load`].
    pub fn start_load(&mut self, path: PathBuf) {
        let (tx, rx) = mpsc::channel();
        log::info!("Loading dataset from {}", path.display());
        std::thread::spawn(move || {
            let result = loader::load_file(&path);
            // The receiver is gone only if the app closed mid-load.
            let _ = tx.send(result);
        });
        self.pending = Some(rx);
        self.loading = true;
        self.status_message = None;
    }

    /// Check for a finished background load. Returns `true` once it completed.
    pub fn poll_load(&mut self) -> bool {
        let Some(rx) = &self.pending else {
            return false;
        };
        let result = match rx.try_recv() {
            Ok(result) => result,
            Err(TryRecvError::Empty) => return false,
            Err(TryRecvError::Disconnected) => Err(anyhow::anyhow!("loader thread exited")),
        };
        self.pending = None;
        match result {
            Ok(dataset) => self.set_dataset(dataset),
            Err(e) => self.fail_load(e),
        }
        true
    }

    fn fail_load(&mut self, e: anyhow::Error) {
        log::error!("Failed to load dataset: {e:#}");
        self.status_message = Some(format!("Error: {e:#}"));
        self.loading = false;
        self.dataset = Dataset::default();
        self.letter = None;
        self.recompute();
    }

    /// Ingest a newly loaded dataset and run the initial filter pass.
    pub fn set_dataset(&mut self, dataset: Dataset) {
        self.letter = dataset
            .entities()
            .first()
            .and_then(|e| e.chars().next())
            .and_then(|c| c.to_uppercase().next());
        if let Some(year) = nearest_year(dataset.years(), self.config.map.default_year) {
            self.map_year = year;
        }
        self.dataset = dataset;
        self.status_message = None;
        self.loading = false;
        self.recompute();
    }

    /// Commit the draft selection and recompute every view.
    pub fn apply_filters(&mut self) {
        if self.filters.apply() {
            log::debug!("Filter selection committed: {:?}", self.filters.committed);
        }
        self.table.set_page(1);
        self.recompute();
    }

    /// Restore the configured default selection and recompute.
    pub fn reset_filters(&mut self) {
        self.filters
            .reset(FilterSelection::from(&self.config.filters));
        self.table.set_page(1);
        self.recompute();
    }

    /// Show a different year on the map. Only the snapshot is recomputed.
    pub fn set_map_year(&mut self, year: i32) {
        if year != self.map_year {
            self.map_year = year;
            self.views.snapshot = snapshot(self.dataset.records(), year);
        }
    }

    pub fn recompute(&mut self) {
        self.views = DashboardViews::compute(
            &self.dataset,
            &self.filters.committed,
            self.map_year,
            &self.config,
        );
    }
}
