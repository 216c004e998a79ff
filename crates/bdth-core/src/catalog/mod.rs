//! Static furnishing reference data.
//!
//! Two read-only tables keyed by row id, loaded once from an export of the
//! game's HousingFurniture and HousingYardObject sheets.

use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{Error, Result};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    /// Sheet row id, as stored in the housing item
    pub id: u32,
    /// Inventory item id the furnishing is placed from
    #[serde(default)]
    pub item_id: u32,
    pub name: Arc<str>,
    #[serde(default)]
    pub icon: u16,
    #[serde(default)]
    pub category: Option<Arc<str>>,
}

#[derive(Debug, Default, Deserialize)]
struct CatalogFile {
    #[serde(default)]
    furniture: Vec<CatalogEntry>,
    #[serde(default)]
    yard_objects: Vec<CatalogEntry>,
}

#[derive(Debug, Clone, Default)]
pub struct Catalog {
    furniture: HashMap<u32, CatalogEntry>,
    yard_objects: HashMap<u32, CatalogEntry>,
}

impl Catalog {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path)?;
        let catalog = Self::from_json(&content)?;
        info!(
            "Loaded catalog from {}: {} furniture, {} yard objects",
            path.as_ref().display(),
            catalog.furniture.len(),
            catalog.yard_objects.len()
        );
        Ok(catalog)
    }

    pub fn from_json(content: &str) -> Result<Self> {
        let file: CatalogFile = serde_json::from_str(content)?;
        Ok(Self {
            furniture: index("furniture", file.furniture)?,
            yard_objects: index("yard_objects", file.yard_objects)?,
        })
    }

    pub fn lookup_furnishing(&self, id: u32) -> Option<&CatalogEntry> {
        self.furniture.get(&id)
    }

    pub fn lookup_yard_object(&self, id: u32) -> Option<&CatalogEntry> {
        self.yard_objects.get(&id)
    }

    /// Look an item up in the table that matches where it was placed
    pub fn lookup(&self, id: u32, outdoors: bool) -> Option<&CatalogEntry> {
        if outdoors {
            self.lookup_yard_object(id)
        } else {
            self.lookup_furnishing(id)
        }
    }

    /// Entries of one table ordered by row id
    pub fn entries(&self, outdoors: bool) -> Vec<&CatalogEntry> {
        let table = if outdoors {
            &self.yard_objects
        } else {
            &self.furniture
        };
        let mut entries: Vec<_> = table.values().collect();
        entries.sort_by_key(|entry| entry.id);
        entries
    }

    pub fn len(&self) -> usize {
        self.furniture.len() + self.yard_objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn index(table: &str, entries: Vec<CatalogEntry>) -> Result<HashMap<u32, CatalogEntry>> {
    let mut map = HashMap::with_capacity(entries.len());
    for entry in entries {
        let id = entry.id;
        if map.insert(id, entry).is_some() {
            return Err(Error::InvalidCatalog(format!(
                "duplicate {} row id {}",
                table, id
            )));
        }
    }
    Ok(map)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    const SAMPLE: &str = r#"{
        "furniture": [
            {"id": 501, "item_id": 6541, "name": "Wooden Loft", "icon": 51001, "category": "Tables"},
            {"id": 12, "name": "Oak Stool", "icon": 51002}
        ],
        "yard_objects": [
            {"id": 501, "item_id": 6000, "name": "Garden Bench", "icon": 52001}
        ]
    }"#;

    #[test]
    fn test_lookup_by_table() {
        let catalog = Catalog::from_json(SAMPLE).unwrap();

        assert_eq!(&*catalog.lookup_furnishing(501).unwrap().name, "Wooden Loft");
        assert_eq!(&*catalog.lookup_yard_object(501).unwrap().name, "Garden Bench");
        assert!(catalog.lookup_furnishing(999).is_none());
        assert_eq!(&*catalog.lookup(501, true).unwrap().name, "Garden Bench");
        assert_eq!(catalog.len(), 3);
    }

    #[test]
    fn test_optional_fields_default() {
        let catalog = Catalog::from_json(SAMPLE).unwrap();
        let stool = catalog.lookup_furnishing(12).unwrap();
        assert_eq!(stool.item_id, 0);
        assert!(stool.category.is_none());
    }

    #[test]
    fn test_entries_sorted() {
        let catalog = Catalog::from_json(SAMPLE).unwrap();
        let ids: Vec<_> = catalog.entries(false).iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![12, 501]);
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let json = r#"{"furniture": [{"id": 1, "name": "a"}, {"id": 1, "name": "b"}]}"#;
        assert!(matches!(
            Catalog::from_json(json),
            Err(Error::InvalidCatalog(_))
        ));
    }

    #[test]
    fn test_load_from_file() {
        let file = NamedTempFile::new().unwrap();
        fs::write(file.path(), SAMPLE).unwrap();

        let catalog = Catalog::load(file.path()).unwrap();
        assert!(!catalog.is_empty());
    }
}
