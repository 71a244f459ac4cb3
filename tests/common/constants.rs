//! Shared constants for end-to-end tests
//!
//! This module contains all constants used across the test suite.
//! When the fixture dataset changes, update only this file and fixtures.rs.

// ============================================================================
// Test Dataset Track IDs
// ============================================================================

/// "Reference Song" (1,000 streams / 100 YouTube likes / 10 TikTok likes)
pub const REFERENCE_TRACK_ID: usize = 1;

/// "Twice As Big", an exact scalar multiple of the reference
pub const SCALED_TRACK_ID: usize = 2;

/// "Silent Song", all engagement counts zero
pub const SILENT_TRACK_ID: usize = 3;

/// "Video Hit", engagement mostly on YouTube
pub const VIDEO_TRACK_ID: usize = 4;

/// "Unmatched Song", close to the reference but not a multiple; never matched by enrichment
pub const UNMATCHED_TRACK_ID: usize = 5;

/// "Broken Lookup", enrichment lookups for it fail
pub const BROKEN_LOOKUP_TRACK_ID: usize = 6;

/// Number of rows in the fixture dataset
pub const TRACK_COUNT: usize = 6;

/// Track ID absent from the fixture dataset
pub const MISSING_TRACK_ID: usize = 999_999;

/// Expected order of similar tracks for the reference track
pub const REFERENCE_SIMILAR_ORDER: [usize; 5] = [
    SCALED_TRACK_ID,
    UNMATCHED_TRACK_ID,
    BROKEN_LOOKUP_TRACK_ID,
    VIDEO_TRACK_ID,
    SILENT_TRACK_ID,
];

// ============================================================================
// Test Track Names
// ============================================================================

pub const REFERENCE_TRACK_NAME: &str = "Reference Song";
pub const SCALED_TRACK_NAME: &str = "Twice As Big";
pub const UNMATCHED_TRACK_NAME: &str = "Unmatched Song";
pub const BROKEN_LOOKUP_TRACK_NAME: &str = "Broken Lookup";

// ============================================================================
// Server Settings
// ============================================================================

/// Cache max-age configured on the test server
pub const CONTENT_CACHE_AGE_SEC: usize = 60;

/// Default number of similar tracks configured on the test server
pub const DEFAULT_TOP_N: i64 = 50;

/// Per-call enrichment timeout configured on the test server
pub const ENRICHMENT_TIMEOUT_MS: u64 = 500;

// ============================================================================
// Timeouts
// ============================================================================

/// Max time to wait for server to become ready (milliseconds)
pub const SERVER_READY_TIMEOUT_MS: u64 = 5000;

/// Interval between readiness polls (milliseconds)
pub const SERVER_READY_POLL_INTERVAL_MS: u64 = 10;

/// Timeout for individual HTTP requests (seconds)
pub const REQUEST_TIMEOUT_SECS: u64 = 10;
