//! Shared limits and timings of the log explorer.

/// Rows fetched per "load more".
pub const PAGE_SIZE: u64 = 50;

/// Upper bound on rows one table can load.
pub const MAX_LOADED_ROWS: u64 = 10_000;

pub const INPUT_DEBOUNCE_MS: u32 = 500;
pub const SLIDER_DEBOUNCE_MS: u32 = 500;
pub const REMOTE_OPTIONS_DEBOUNCE_MS: u32 = 700;

/// Checkbox filters get a search box above this many options.
pub const CHECKBOX_SEARCH_THRESHOLD: usize = 4;

/// Row refresh period while live mode is on.
pub const LIVE_REFRESH_MS: u32 = 5_000;

/// Facet buckets returned per column.
pub const FACET_LIMIT: u64 = 20;
