//! State keys for emote packs.

use std::sync::OnceLock;

use regex::Regex;

/// Derives a URL-safe state key from a human-readable pack name.
///
/// Every run of characters outside `[0-9a-zA-Z-_.+!*'(),]` becomes a single `-`.
/// The result still has to be percent-encoded when placed in a request path.
#[must_use]
pub fn encode_pack_id(pack_name: &str) -> String {
    static INVALID_RUN: OnceLock<Regex> = OnceLock::new();
    let invalid_run = INVALID_RUN
        .get_or_init(|| Regex::new(r"[^0-9a-zA-Z\-_.+!*'(),]+").expect("Invalid regex"));

    invalid_run.replace_all(pack_name, "-").into_owned()
}
