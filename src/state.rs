use std::path::Path;

use crate::data::geo::GeoBoundaries;
use crate::data::store::DatasetStore;
use crate::view::{GenderFilter, ViewSelector};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// Survey workbook looked for in the working directory at startup.
pub const DEFAULT_WORKBOOK: &str = "immigration_tunisie_nettoye.xlsx";
/// JSON fallback tried when no workbook is present.
pub const DEFAULT_WORKBOOK_JSON: &str = "immigration_tunisie_nettoye.json";
/// Governorate boundary file for the choropleth.
pub const DEFAULT_BOUNDARIES: &str = "TN-gouvernorats.geojson";

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Loaded survey tables (None until a workbook is loaded).
    pub store: Option<DatasetStore>,

    /// Governorate boundaries. Empty until a geojson is loaded; the map
    /// view then shows every row as unmatched instead of failing.
    pub boundaries: GeoBoundaries,

    /// Page selected in the sidebar menu.
    pub view: ViewSelector,

    /// Page-local sex filter of the motives page.
    pub motives_filter: GenderFilter,

    /// Sidebar sex filter of the education & employment page.
    pub education_filter: GenderFilter,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,

    /// Unmatched gouvernorat names of the last resolved map, kept so the
    /// mismatch is logged once per change instead of once per repaint.
    warned_unmatched: Vec<String>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            store: None,
            boundaries: GeoBoundaries::default(),
            view: ViewSelector::Home,
            motives_filter: GenderFilter::All,
            education_filter: GenderFilter::All,
            status_message: None,
            warned_unmatched: Vec::new(),
        }
    }
}

impl AppState {
    /// Try the conventional file names in the working directory. Missing
    /// files are not an error at this point; the UI stays usable and the
    /// Fichier menu can load them later.
    pub fn load_default_files(&mut self) {
        let workbook = [DEFAULT_WORKBOOK, DEFAULT_WORKBOOK_JSON]
            .into_iter()
            .map(Path::new)
            .find(|p| p.exists());
        match workbook {
            Some(path) => self.load_workbook(path),
            None => {
                log::warn!("no default workbook found ({DEFAULT_WORKBOOK} / {DEFAULT_WORKBOOK_JSON})");
                self.status_message =
                    Some("Aucune donnée chargée – ouvrez un classeur via Fichier.".to_string());
            }
        }

        let boundaries = Path::new(DEFAULT_BOUNDARIES);
        if boundaries.exists() {
            self.load_boundaries(boundaries);
        } else {
            log::warn!("no default boundary file found ({DEFAULT_BOUNDARIES})");
        }
    }

    /// Load a survey workbook, replacing the current tables on success.
    pub fn load_workbook(&mut self, path: &Path) {
        match DatasetStore::load(path) {
            Ok(store) => {
                log::info!("loaded {} table(s) from {}", store.len(), path.display());
                self.store = Some(store);
                self.status_message = None;
            }
            Err(e) => {
                log::error!("failed to load workbook: {e:#}");
                self.status_message = Some(format!("Erreur: {e:#}"));
            }
        }
    }

    /// Load a governorate boundary file, replacing the current map.
    pub fn load_boundaries(&mut self, path: &Path) {
        match GeoBoundaries::load(path) {
            Ok(boundaries) => {
                log::info!(
                    "loaded {} region(s) from {}",
                    boundaries.len(),
                    path.display()
                );
                self.boundaries = boundaries;
            }
            Err(e) => {
                log::error!("failed to load boundary file: {e:#}");
                self.status_message = Some(format!("Erreur: {e:#}"));
            }
        }
    }

    /// Remember the unmatched gouvernorat set of the last resolved map.
    ///
    /// Returns true when a non-empty set differs from the previous one, so
    /// the caller logs each new mismatch exactly once. An empty set clears
    /// the memory silently; a later regression warns again.
    pub fn note_unmatched_governorates(&mut self, names: &[String]) -> bool {
        if names == self.warned_unmatched.as_slice() {
            return false;
        }
        self.warned_unmatched = names.to_vec();
        !self.warned_unmatched.is_empty()
    }

    /// The sex filter that applies to the current page.
    pub fn active_filter(&self) -> GenderFilter {
        match self.view {
            ViewSelector::Motives => self.motives_filter,
            ViewSelector::EducationActivity => self.education_filter,
            _ => GenderFilter::All,
        }
    }
}
