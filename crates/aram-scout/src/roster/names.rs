// Champion name normalization.
//
// Wiki display names ("Kai'Sa", "Lee Sin") have to match the reference data
// ids ("Kaisa", "LeeSin").

use std::collections::HashMap;

/// Normalize a wiki display name to its reference-data form.
///
/// Spaces are removed, then the apostrophe rule is applied. The result never
/// contains whitespace or an apostrophe, so normalizing twice is a no-op.
pub fn normalize(raw: &str) -> String {
    let compact: String = raw.chars().filter(|c| !c.is_whitespace()).collect();
    fold_apostrophe(&compact)
}

/// `Head'Tail` becomes `Head` + lower-cased `Tail`.
///
/// Only the first two apostrophe-separated parts are kept; no champion has two
/// apostrophes yet, and a name that does would lose everything after the
/// second one.
fn fold_apostrophe(name: &str) -> String {
    let mut parts = name.split('\'');
    let head = parts.next().unwrap_or_default();
    match parts.next() {
        Some(tail) => format!("{head}{}", tail.to_lowercase()),
        None => name.to_string(),
    }
}

/// Normalize, then map through the configured alias table.
pub fn canonical(raw: &str, aliases: &HashMap<String, String>) -> String {
    let name = normalize(raw);
    match aliases.get(&name) {
        Some(alias) => alias.clone(),
        None => name,
    }
}
