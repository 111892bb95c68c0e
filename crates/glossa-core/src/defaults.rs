//! Centralized default constants for glossa.
//!
//! All crates reference these constants instead of defining their own
//! magic numbers.

// =============================================================================
// LINKING
// =============================================================================

/// Path prefix of the keyword page that rendered anchors point to.
pub const KEYWORD_PATH_PREFIX: &str = "/keyword/";

/// Namespace prefix of linker placeholder tokens.
pub const PLACEHOLDER_PREFIX: &str = "glossa_kw_";

/// Compiled size limit for the keyword alternation (bytes).
pub const LINKER_REGEX_SIZE_LIMIT: usize = 256 * 1024 * 1024;

// =============================================================================
// CACHE KEYS
// =============================================================================

/// Prefix shared by every key this service writes to the cache store.
pub const CACHE_PREFIX: &str = "glossa:";

/// Prefix of rendered HTML keys.
pub const HTML_KEY_PREFIX: &str = "glossa:html:";

/// Prefix of star list keys.
pub const STARS_KEY_PREFIX: &str = "glossa:stars:";

// =============================================================================
// PAGINATION
// =============================================================================

/// Entries per page on the listing endpoint.
pub const ENTRIES_PER_PAGE: i64 = 10;

// =============================================================================
// ADMINISTRATION
// =============================================================================

/// Highest entry id belonging to the seed data set.
pub const SEED_BOUNDARY: i64 = 7101;

// =============================================================================
// COLLABORATORS
// =============================================================================

/// Default spam-check endpoint.
pub const SPAM_URL: &str = "http://localhost:5050";

/// Timeout for one spam-check call (milliseconds).
pub const SPAM_TIMEOUT_MS: u64 = 2000;

/// Length of generated password salts.
pub const SALT_LENGTH: usize = 20;
