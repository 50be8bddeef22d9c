//! Identifier helpers: quoting, case-insensitive identity and generated names

use sha2::{Digest, Sha256};

/// Quote an identifier with backticks, doubling any embedded backtick
pub fn quote(name: &str) -> String {
    format!("`{}`", name.replace('`', "``"))
}

/// Table, column and index identity is case-insensitive on the target
///
/// Only ASCII letters fold, matching [`name_key`].
pub fn same_name(a: &str, b: &str) -> bool {
    a.eq_ignore_ascii_case(b)
}

/// Normalized form used as a map key for case-insensitive lookups
pub fn name_key(name: &str) -> String {
    name.to_ascii_uppercase()
}

/// Generate the unique-key name for a single column flagged `unique`
///
/// The name is `UK_` followed by the first 24 hex digits of a SHA-256 digest
/// over the table and column names, so the same mapping always yields the same
/// name. Live indexes are never matched by this name alone; see
/// [`LiveIndexTracker`](crate::catalog::LiveIndexTracker).
pub fn unique_key_name(table: &str, column: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(format!("table`{table}`column`{column}`").as_bytes());
    let digest = format!("{:x}", hasher.finalize());
    format!("UK_{}", &digest[..24])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quote() {
        assert_eq!(quote("Parent"), "`Parent`");
        assert_eq!(quote("we`ird"), "`we``ird`");
    }

    #[test]
    fn test_same_name_ignores_case() {
        assert!(same_name("ParentTable", "PARENTTABLE"));
        assert!(!same_name("Parent", "Parents"));
    }

    #[test]
    fn test_name_key_agrees_with_same_name() {
        for (a, b) in [("café", "CAFé"), ("café", "CAFÉ"), ("Straße", "STRASSE"), ("Ab", "aB")] {
            assert_eq!(same_name(a, b), name_key(a) == name_key(b), "{a} vs {b}");
        }
        assert_eq!(name_key("café"), "CAFé");
    }

    #[test]
    fn test_unique_key_name_is_stable() {
        let first = unique_key_name("Singers", "Email");
        assert_eq!(first, unique_key_name("Singers", "Email"));
        assert_ne!(first, unique_key_name("Singers", "Phone"));
        assert!(first.starts_with("UK_"));
        assert_eq!(first.len(), 27);
    }
}
