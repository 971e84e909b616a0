//! UI filter state with best-effort persistence.
//!
//! Persistence is a convenience, not a correctness requirement: a missing or
//! corrupt file falls back to the defaults and never fails startup.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::calendar::PeriodKey;
use crate::date_range::DateRange;
use crate::error::{RallyError, RallyResult};
use crate::filter::matchers::{ResponseFilter, VisibilityFilter};

/// Active filter dimensions, mutated by the UI layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterState {
    pub search_query: String,
    pub period: Option<PeriodKey>,
    pub tags: Vec<String>,
    pub organizer_id: Option<String>,
    pub response: Option<ResponseFilter>,
    pub visibility: VisibilityFilter,
    pub show_hidden: bool,
    pub hide_rejected: bool,
    pub date_range: Option<DateRange>,
    pub exclude_past: bool,
}

impl Default for FilterState {
    fn default() -> Self {
        FilterState {
            search_query: String::new(),
            period: None,
            tags: Vec::new(),
            organizer_id: None,
            response: None,
            visibility: VisibilityFilter::All,
            show_hidden: false,
            // Events the viewer rejected stay out of the way by default
            hide_rejected: true,
            date_range: None,
            exclude_past: false,
        }
    }
}

impl FilterState {
    /// Persisted at ~/.config/rally/filters.json
    pub fn config_path() -> RallyResult<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| RallyError::Persistence("Could not determine config directory".into()))?
            .join("rally");

        Ok(config_dir.join("filters.json"))
    }

    /// Load the persisted state, falling back to defaults on any problem.
    pub fn load() -> FilterState {
        match Self::config_path() {
            Ok(path) => Self::load_from(&path),
            Err(_) => FilterState::default(),
        }
    }

    pub fn load_from(path: &Path) -> FilterState {
        let Ok(content) = std::fs::read_to_string(path) else {
            return FilterState::default();
        };
        serde_json::from_str(&content).unwrap_or_default()
    }

    pub fn save(&self) -> RallyResult<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> RallyResult<()> {
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir)?;
        }

        let content = serde_json::to_string_pretty(self)
            .map_err(|e| RallyError::Serialization(e.to_string()))?;

        // Atomic-ish write: tmp file then rename
        let temp = path.with_extension("json.tmp");
        std::fs::write(&temp, content)?;
        std::fs::rename(&temp, path)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let state = FilterState::load_from(&dir.path().join("nope.json"));
        assert_eq!(state, FilterState::default());
        assert!(state.hide_rejected);
    }

    #[test]
    fn test_corrupt_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("filters.json");
        std::fs::write(&path, "{not json at all").unwrap();
        assert_eq!(FilterState::load_from(&path), FilterState::default());
    }

    #[test]
    fn test_save_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("filters.json");

        let state = FilterState {
            search_query: "picnic".to_string(),
            period: Some(PeriodKey::ThisWeek),
            tags: vec!["food".to_string()],
            response: Some(ResponseFilter::Going),
            visibility: VisibilityFilter::Private,
            show_hidden: true,
            ..FilterState::default()
        };
        state.save_to(&path).unwrap();

        assert_eq!(FilterState::load_from(&path), state);
    }

    #[test]
    fn test_unknown_fields_are_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("filters.json");
        std::fs::write(&path, r#"{"search_query":"q","some_future_field":1}"#).unwrap();

        let state = FilterState::load_from(&path);
        assert_eq!(state.search_query, "q");
    }
}
