//! CLI Exit Code Registry
//!
//! This is the single source of truth for all CLI exit codes.
//! Exit codes are part of the shell contract; scripts rely on them.
//!
//! # Exit Code Ranges
//!
//! | Range   | Domain           | Description                              |
//! |---------|------------------|------------------------------------------|
//! | 0       | Universal        | Success (including "no patents found")   |
//! | 1       | Universal        | General error (unspecified)              |
//! | 2       | Universal        | CLI usage error (bad args, missing file) |
//! | 3       | Universal        | Output file or token file I/O failure    |
//! | 10-19   | source           | Patent search API                        |
//! | 20-29   | profile          | Profile upload target                    |
//! | 30-39   | config           | Settings file                            |
//!
//! # Adding New Exit Codes
//!
//! 1. Add the constant in the appropriate range
//! 2. Document what triggers it
//! 3. Update the table above
//! 4. Wire it into the relevant command's error handling

use patfolio_profile::ProfileError;
use patfolio_source::SourceError;

// =============================================================================
// Universal (0-2)
// =============================================================================

/// Success - command completed without errors. A search with zero accepted
/// patents is still a success.
pub const EXIT_SUCCESS: u8 = 0;

/// General error - unspecified failure (HTTP client setup, serialization).
pub const EXIT_ERROR: u8 = 1;

/// Usage error - bad arguments, empty inventor name, unreadable input file.
pub const EXIT_USAGE: u8 = 2;

/// I/O error - an artifact or the saved token could not be written or removed.
pub const EXIT_IO_ERROR: u8 = 3;

// =============================================================================
// Source (10-19)
// =============================================================================

/// Search API failed on every attempt (status, timeout, connection).
pub const EXIT_SOURCE_UNAVAILABLE: u8 = 10;

/// Search API answered with something that is not the expected JSON.
pub const EXIT_SOURCE_PARSE: u8 = 11;

/// No API key from --api-key or the configured environment variable.
pub const EXIT_SOURCE_NOT_AUTH: u8 = 12;

// =============================================================================
// Profile (20-29)
// =============================================================================

/// No saved access token, or the token was refused.
pub const EXIT_PROFILE_NOT_AUTH: u8 = 20;

/// Profile API error outside the upload loop (profile id, listing, token
/// exchange, invalid payload file).
pub const EXIT_PROFILE_ERROR: u8 = 21;

/// Publish finished but at least one entry was rejected.
pub const EXIT_PROFILE_PARTIAL: u8 = 22;

// =============================================================================
// Config (30-39)
// =============================================================================

/// Settings file unreadable, unparsable, or invalid.
pub const EXIT_CONFIG: u8 = 30;

pub fn source_exit_code(err: &SourceError) -> u8 {
    match err {
        SourceError::InvalidQuery(_) => EXIT_USAGE,
        SourceError::SourceUnavailable { .. } => EXIT_SOURCE_UNAVAILABLE,
        SourceError::Parse(_) => EXIT_SOURCE_PARSE,
        SourceError::Config(_) => EXIT_CONFIG,
    }
}

pub fn profile_exit_code(err: &ProfileError) -> u8 {
    match err {
        ProfileError::NotAuthenticated => EXIT_PROFILE_NOT_AUTH,
        ProfileError::Io(_) => EXIT_IO_ERROR,
        ProfileError::UploadRejected { .. } => EXIT_PROFILE_PARTIAL,
        ProfileError::Network(_)
        | ProfileError::Http(..)
        | ProfileError::Validation(_)
        | ProfileError::Parse(_) => EXIT_PROFILE_ERROR,
    }
}
