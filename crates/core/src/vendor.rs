//! Vendor directory collaborator.
//!
//! The contract engine only needs vendor display names for selection; vendor
//! records themselves are managed elsewhere.

use async_trait::async_trait;

use crate::error::CoreError;

/// Read-only source of known vendor display names.
#[async_trait]
pub trait VendorDirectory: Send + Sync {
    /// Names ready for display: non-blank, sorted, no duplicates.
    async fn vendor_names(&self) -> Result<Vec<String>, CoreError>;
}

/// Drop blank names, trim, sort, and deduplicate.
pub fn normalize_vendor_names<I, S>(names: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut out: Vec<String> = names
        .into_iter()
        .map(|n| n.as_ref().trim().to_string())
        .filter(|n| !n.is_empty())
        .collect();
    out.sort();
    out.dedup();
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_sorts_and_drops_blanks() {
        let names = normalize_vendor_names(["Globex", "", "  Acme ", "Globex", "   "]);
        assert_eq!(names, vec!["Acme".to_string(), "Globex".to_string()]);
    }

    #[test]
    fn normalize_empty_input() {
        assert!(normalize_vendor_names(Vec::<String>::new()).is_empty());
    }
}
