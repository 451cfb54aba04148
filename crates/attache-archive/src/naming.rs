// SPDX-FileCopyrightText: 2026 Attache Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Collision-free filename generation.

/// Returns `proposed` if unused, otherwise the first `<stem>-N<ext>` candidate
/// (N = 1, 2, ...) not present in `existing`.
///
/// Pure and total: the counter is unbounded, so a free candidate always
/// exists. Callers pass the names already recorded for the same
/// (conversation, category) ledger sequence.
pub fn unique_name(existing: &[String], proposed: &str) -> String {
    if !existing.iter().any(|n| n == proposed) {
        return proposed.to_string();
    }

    let (stem, ext) = split_extension(proposed);
    let mut counter: u64 = 1;
    loop {
        let candidate = format!("{stem}-{counter}{ext}");
        if !existing.iter().any(|n| n == &candidate) {
            return candidate;
        }
        counter += 1;
    }
}

/// Reduces an untrusted name to a single safe path component.
///
/// Platform-supplied filenames and display names flow into filesystem joins,
/// so path separators must never survive: a document named
/// `../../../escape.bin` has to land inside the storage root. Separators are
/// replaced with `_`; a name that is empty or dots-only becomes `unnamed`.
pub fn sanitize_component(raw: &str) -> String {
    let cleaned: String = raw
        .chars()
        .map(|c| match c {
            '/' | '\\' => '_',
            c => c,
        })
        .collect();
    let trimmed = cleaned.trim();
    if trimmed.is_empty() || trimmed.chars().all(|c| c == '.') {
        "unnamed".to_string()
    } else {
        trimmed.to_string()
    }
}

/// Splits a filename at its last dot; the extension keeps the dot.
///
/// A leading dot is part of the stem (`.bashrc` has no extension).
fn split_extension(name: &str) -> (&str, &str) {
    match name.rfind('.') {
        Some(idx) if idx > 0 => (&name[..idx], &name[idx..]),
        _ => (name, ""),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn unused_name_is_returned_unchanged() {
        assert_eq!(unique_name(&[], "Alice-img123.jpg"), "Alice-img123.jpg");
        assert_eq!(
            unique_name(&names(&["other.jpg"]), "Alice-img123.jpg"),
            "Alice-img123.jpg"
        );
    }

    #[test]
    fn collision_inserts_counter_before_extension() {
        let existing = names(&["Alice-img123.jpg"]);
        assert_eq!(unique_name(&existing, "Alice-img123.jpg"), "Alice-img123-1.jpg");
    }

    #[test]
    fn repeated_collisions_count_upward_in_order() {
        let mut existing = Vec::new();
        for expected in ["a.png", "a-1.png", "a-2.png", "a-3.png"] {
            let got = unique_name(&existing, "a.png");
            assert_eq!(got, expected);
            existing.push(got);
        }
    }

    #[test]
    fn result_is_never_in_the_existing_set() {
        let existing = names(&["doc.pdf", "doc-1.pdf", "doc-2.pdf", "doc-4.pdf"]);
        let got = unique_name(&existing, "doc.pdf");
        assert!(!existing.contains(&got));
        assert_eq!(got, "doc-3.pdf");
    }

    #[test]
    fn name_without_extension_gets_plain_suffix() {
        let existing = names(&["README"]);
        assert_eq!(unique_name(&existing, "README"), "README-1");
    }

    #[test]
    fn leading_dot_is_not_an_extension() {
        let existing = names(&[".bashrc"]);
        assert_eq!(unique_name(&existing, ".bashrc"), ".bashrc-1");
    }

    #[test]
    fn sanitize_neutralizes_path_separators() {
        assert_eq!(
            sanitize_component("../../../escape.bin"),
            ".._.._.._escape.bin"
        );
        assert_eq!(sanitize_component("a/b\\c.jpg"), "a_b_c.jpg");
        assert!(!sanitize_component("..\\..\\up.pdf").contains('\\'));
    }

    #[test]
    fn sanitize_rejects_empty_and_dots_only_names() {
        assert_eq!(sanitize_component(""), "unnamed");
        assert_eq!(sanitize_component("  "), "unnamed");
        assert_eq!(sanitize_component("."), "unnamed");
        assert_eq!(sanitize_component(".."), "unnamed");
    }

    #[test]
    fn sanitize_keeps_ordinary_names_unchanged() {
        assert_eq!(sanitize_component("Alice-img123.jpg"), "Alice-img123.jpg");
        assert_eq!(sanitize_component("Family"), "Family");
        assert_eq!(sanitize_component(".bashrc"), ".bashrc");
    }
}
