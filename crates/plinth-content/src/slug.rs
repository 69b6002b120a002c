//! Slug generation
//!
//! Slugs are derived once at creation time from a title plus a millisecond
//! timestamp fragment, and never regenerated on later edits. A process-wide
//! sequence fragment keeps two identical titles created within the same
//! millisecond distinct.

use std::sync::atomic::{AtomicU64, Ordering};

static SEQUENCE: AtomicU64 = AtomicU64::new(0);

/// Derive a collection-unique slug from a title.
pub fn generate(title: &str) -> String {
    let base = slugify(title);
    let millis = chrono::Utc::now().timestamp_millis().max(0) as u64;
    let seq = SEQUENCE.fetch_add(1, Ordering::Relaxed);
    if base.is_empty() {
        format!("{}-{}", to_base36(millis), to_base36(seq))
    } else {
        format!("{}-{}-{}", base, to_base36(millis), to_base36(seq))
    }
}

/// Lowercase, dash-separated, URL-safe form of a title.
pub fn slugify(title: &str) -> String {
    let mut out = String::with_capacity(title.len());
    let mut last_dash = true;
    for c in title.chars() {
        if c.is_ascii_alphanumeric() {
            out.push(c.to_ascii_lowercase());
            last_dash = false;
        } else if !last_dash {
            out.push('-');
            last_dash = true;
        }
    }
    while out.ends_with('-') {
        out.pop();
    }
    out
}

fn to_base36(mut n: u64) -> String {
    const DIGITS: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    if n == 0 {
        return "0".to_string();
    }
    let mut buf = Vec::new();
    while n > 0 {
        buf.push(DIGITS[(n % 36) as usize]);
        n /= 36;
    }
    buf.reverse();
    String::from_utf8(buf).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_slugify_basic() {
        assert_eq!(slugify("Annual Sports Day 2026!"), "annual-sports-day-2026");
        assert_eq!(slugify("  spaced   out  "), "spaced-out");
        assert_eq!(slugify("ALL CAPS"), "all-caps");
    }

    #[test]
    fn test_slugify_non_ascii_collapses() {
        assert_eq!(slugify("café & bar"), "caf-bar");
        assert_eq!(slugify("!!!"), "");
    }

    #[test]
    fn test_generate_starts_with_title_slug() {
        let slug = generate("Opening Ceremony");
        assert!(slug.starts_with("opening-ceremony-"));
    }

    #[test]
    fn test_generate_unique_for_identical_titles_same_instant() {
        // The sequence fragment disambiguates even within one millisecond.
        let slugs: HashSet<String> = (0..100).map(|_| generate("Same Title")).collect();
        assert_eq!(slugs.len(), 100);
    }

    #[test]
    fn test_timestamp_and_sequence_fragments_are_separated() {
        // Without the separator, uniqueness would depend on the timestamp
        // fragment keeping a fixed width.
        let slug = generate("word");
        let parts: Vec<&str> = slug.split('-').collect();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0], "word");
        assert!(parts.iter().all(|p| !p.is_empty()));
    }

    #[test]
    fn test_generate_handles_empty_title() {
        let slug = generate("");
        assert!(!slug.is_empty());
        assert!(!slug.starts_with('-'));
    }

    #[test]
    fn test_base36() {
        assert_eq!(to_base36(0), "0");
        assert_eq!(to_base36(35), "z");
        assert_eq!(to_base36(36), "10");
    }
}
