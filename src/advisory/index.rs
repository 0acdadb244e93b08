use crate::model::{AdvisoryIndex, AdvisoryIndexEntry, AdvisoryTable};

/// Rebuilds the module index from an already loaded table.
///
/// Useful when a caller merges tables from several loads and needs a
/// matching index without decoding the raw text again.
pub fn index_by_module(table: &AdvisoryTable) -> AdvisoryIndex {
    let mut index = AdvisoryIndex::new();

    for (id, record) in table {
        index
            .entry(record.module.clone())
            .or_default()
            .push(AdvisoryIndexEntry::new(id.clone(), record));
    }

    index
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::advisory::load_all;
    use crate::model::{AdvisoryRecord, Diagnostics};

    #[test]
    fn test_index_empty_table() {
        assert!(index_by_module(&AdvisoryTable::new()).is_empty());
    }

    #[test]
    fn test_index_groups_by_module() {
        let mut table = AdvisoryTable::new();
        table.insert("GO-1".to_string(), AdvisoryRecord::new("m1", "p"));
        table.insert("GO-2".to_string(), AdvisoryRecord::new("m2", "p"));
        table.insert("GO-3".to_string(), AdvisoryRecord::new("m1", "q"));

        let index = index_by_module(&table);

        assert_eq!(index.len(), 2);
        let ids: Vec<_> = index["m1"].iter().map(|e| e.identifier.as_str()).collect();
        assert_eq!(ids, vec!["GO-1", "GO-3"]);
        assert_eq!(index["m2"][0].identifier, "GO-2");
    }

    #[test]
    fn test_reindex_matches_loader() {
        let sources = vec![
            ("GO-1.yaml", "module: m1\nversions:\n  - fixed: v1.2.0\n"),
            ("GO-2.yaml", "module: m2\n"),
            ("GO-3.yaml", "module: m1\n"),
        ];

        let mut diagnostics = Diagnostics::new();
        let (table, index) = load_all(sources, &mut diagnostics);

        assert_eq!(index_by_module(&table), index);
    }

    #[test]
    fn test_reindex_merged_tables() {
        let mut diagnostics = Diagnostics::new();
        let (mut merged, _) = load_all([("a/GO-1.yaml", "module: m1\n")], &mut diagnostics);
        let (other, _) = load_all([("b/GO-2.yaml", "module: m1\n")], &mut diagnostics);
        merged.extend(other);

        let index = index_by_module(&merged);
        assert_eq!(index["m1"].len(), 2);
    }
}
