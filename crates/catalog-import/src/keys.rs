//! Object key layout for the import bucket
//!
//! Freshly uploaded objects live under the staging prefix until the pipeline
//! has published every row; relocation moves them under the parsed prefix.

/// Prefix under which clients upload not-yet-processed objects.
pub const STAGED_PREFIX: &str = "uploaded/";

/// Prefix under which fully processed objects are relocated.
pub const PARSED_PREFIX: &str = "parsed/";

/// Build the staging key for a caller-supplied file name.
pub fn staged_key(file_name: &str) -> String {
    format!("{}{}", STAGED_PREFIX, file_name)
}

/// Map a staged key to its post-import location.
///
/// Only the first occurrence of the staging prefix is rewritten, so a file
/// name that itself contains `uploaded/` keeps its name intact.
pub fn parsed_key_for(staged_key: &str) -> String {
    staged_key.replacen(STAGED_PREFIX, PARSED_PREFIX, 1)
}
