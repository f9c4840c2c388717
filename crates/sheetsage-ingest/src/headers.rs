//! Header row cleanup.
//!
//! Headers are kept exactly as written, surrounding whitespace included.
//! Only names that cannot be stored as distinct columns are rewritten.

use std::collections::HashSet;

/// Make header names usable as column names: blank headers become
/// `Unnamed: <index>`, repeated headers get `.1`, `.2`, … suffixes.
///
/// Repeats are detected ignoring ASCII case, since the store cannot hold
/// both `Name` and `name` in one table.
pub fn normalize_headers<I, S>(raw: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut seen: HashSet<String> = HashSet::new();
    let mut out = Vec::new();

    for (idx, header) in raw.into_iter().enumerate() {
        let raw = header.as_ref();
        let base = if raw.trim().is_empty() {
            format!("Unnamed: {idx}")
        } else {
            raw.to_string()
        };

        let mut name = base.clone();
        let mut dup = 0;
        while seen.contains(&name.to_ascii_lowercase()) {
            dup += 1;
            name = format!("{base}.{dup}");
        }
        seen.insert(name.to_ascii_lowercase());
        out.push(name);
    }
    out
}
