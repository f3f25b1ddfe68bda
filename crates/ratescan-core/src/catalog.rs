//! The persisted product catalog: merge semantics and atomic writes.

use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::Path;

use tracing::debug;

use crate::error::CatalogError;
use crate::models::product::ProductRecord;

/// Mapping from product id to its latest resolved record. A BTreeMap keeps
/// the serialized file stable across runs.
pub type Catalog = BTreeMap<String, ProductRecord>;

/// Merge freshly extracted records into an existing catalog.
///
/// Each updated id takes the new record wholesale; ids absent from
/// `updates` are carried over untouched. Entries are never deleted by a
/// run that did not produce them.
pub fn merge(existing: &Catalog, updates: BTreeMap<String, ProductRecord>) -> Catalog {
    let mut merged = existing.clone();
    for (id, record) in updates {
        merged.insert(id, record);
    }
    merged
}

/// Load the catalog from disk. A missing file is an empty catalog, not an
/// error; unreadable or unparsable content is.
pub fn load(path: &Path) -> Result<Catalog, CatalogError> {
    if !path.exists() {
        return Ok(Catalog::new());
    }
    let content = fs::read_to_string(path).map_err(CatalogError::Read)?;
    Ok(serde_json::from_str(&content)?)
}

/// Persist the catalog atomically: write to a temp file in the target
/// directory, then rename over the destination. A failure at any step
/// leaves the previous file intact.
pub fn save(path: &Path, catalog: &Catalog) -> Result<(), CatalogError> {
    let json = serde_json::to_string_pretty(catalog)?;

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir).map_err(CatalogError::Write)?;

    let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(CatalogError::Write)?;
    tmp.write_all(json.as_bytes()).map_err(CatalogError::Write)?;
    tmp.as_file().sync_all().map_err(CatalogError::Write)?;
    tmp.persist(path).map_err(|e| CatalogError::Write(e.error))?;

    debug!(path = %path.display(), entries = catalog.len(), "catalog written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use pretty_assertions::assert_eq;

    fn record(rate: f64, term_months: u32) -> ProductRecord {
        ProductRecord {
            rate: Some(rate),
            term_months,
            updated_at: Utc.with_ymd_and_hms(2024, 1, 15, 12, 0, 0).unwrap(),
            description: None,
        }
    }

    #[test]
    fn test_merge_preserves_untouched_keys() {
        let mut existing = Catalog::new();
        existing.insert("a".to_string(), record(9.9, 60));
        existing.insert("b".to_string(), record(14.5, 36));

        let mut updates = BTreeMap::new();
        updates.insert("b".to_string(), record(12.9, 48));

        let merged = merge(&existing, updates);

        assert_eq!(merged.len(), 2);
        assert_eq!(merged["a"], record(9.9, 60));
        assert_eq!(merged["b"], record(12.9, 48));
    }

    #[test]
    fn test_merge_inserts_new_keys() {
        let existing = Catalog::new();
        let mut updates = BTreeMap::new();
        updates.insert("c".to_string(), record(7.5, 84));

        let merged = merge(&existing, updates);
        assert_eq!(merged.len(), 1);
    }

    #[test]
    fn test_merge_leaves_inputs_unchanged() {
        let mut existing = Catalog::new();
        existing.insert("a".to_string(), record(9.9, 60));

        let mut updates = BTreeMap::new();
        updates.insert("a".to_string(), record(8.9, 60));
        let _ = merge(&existing, updates);

        assert_eq!(existing["a"], record(9.9, 60));
    }

    #[test]
    fn test_load_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let catalog = load(&dir.path().join("products.json")).unwrap();
        assert!(catalog.is_empty());
    }

    #[test]
    fn test_save_then_load_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("products.json");

        let mut catalog = Catalog::new();
        catalog.insert("prime_plus".to_string(), record(9.9, 60));
        save(&path, &catalog).unwrap();

        assert_eq!(load(&path).unwrap(), catalog);
    }

    #[test]
    fn test_save_overwrites_previous_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("products.json");

        let mut first = Catalog::new();
        first.insert("a".to_string(), record(9.9, 60));
        save(&path, &first).unwrap();

        let mut second = Catalog::new();
        second.insert("a".to_string(), record(8.9, 72));
        save(&path, &second).unwrap();

        assert_eq!(load(&path).unwrap(), second);
    }

    #[test]
    fn test_save_failure_leaves_previous_file_intact() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("products.json");

        let mut catalog = Catalog::new();
        catalog.insert("a".to_string(), record(9.9, 60));
        save(&path, &catalog).unwrap();

        // A target whose parent is a regular file cannot be written.
        let bogus = path.join("nested.json");
        assert!(matches!(
            save(&bogus, &Catalog::new()),
            Err(CatalogError::Write(_))
        ));
        assert_eq!(load(&path).unwrap(), catalog);
    }

    #[test]
    fn test_corrupt_catalog_is_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("products.json");
        fs::write(&path, "{not json").unwrap();

        assert!(matches!(load(&path), Err(CatalogError::Parse(_))));
    }
}
