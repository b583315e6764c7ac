//! Slot name encoding
//!
//! Maps a registry identifier such as `@scope/name` to a single path segment.
//! Only the first `@` and the first `/` are substituted; identifiers with more
//! separators are rejected by [`PackageSpec`](super::PackageSpec) before they
//! reach this module, so existing slot names never change.

/// Marker replacing the scope separator `@`
pub const AT_MARKER: &str = "%40";

/// Marker replacing the path separator `/`
pub const SLASH_MARKER: &str = "%2F";

/// Encode an identifier into a slot directory name
pub fn encode(identifier: &str) -> String {
    identifier
        .replacen('@', AT_MARKER, 1)
        .replacen('/', SLASH_MARKER, 1)
}

/// Decode a slot directory name back into its identifier
pub fn decode(slot_name: &str) -> String {
    slot_name
        .replacen(AT_MARKER, "@", 1)
        .replacen(SLASH_MARKER, "/", 1)
}
