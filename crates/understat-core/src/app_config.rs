use std::path::PathBuf;

/// Tuning for the browser-driven player search.
///
/// How many entries a result list reveals per step and how far it is worth
/// paging are properties of the live site, so they are configuration rather
/// than constants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchSettings {
    /// Maximum number of result entries inspected per call.
    pub max_results: usize,
    /// Maximum number of cycle steps (render polls and reveals) per call.
    pub max_cycles: u32,
    /// How long a single step waits for the result list to render.
    pub step_wait_ms: u64,
    /// Sleep between render polls within one step.
    pub poll_interval_ms: u64,
    /// Wall-clock budget for a whole resolution call.
    pub budget_secs: u64,
    pub headless: bool,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            max_results: 5,
            max_cycles: 10,
            step_wait_ms: 5_000,
            poll_interval_ms: 250,
            budget_secs: 60,
            headless: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Site root, always ending in `/`.
    pub base_url: String,
    pub log_level: String,
    pub request_timeout_secs: u64,
    pub user_agent: String,
    /// When set, pages are read from this directory instead of over HTTP.
    pub fixture_dir: Option<PathBuf>,
    pub search: SearchSettings,
}
