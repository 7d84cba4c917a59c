//! Utility functions and traits for [`Table`]

use crate::{Table, TableConfig};

/// Extension trait providing owned snapshots of a table's contents
pub trait TableExtensions {
    /// Returns copies of the keys, in no particular order
    fn keys(&self) -> Vec<Vec<u8>>;

    /// Returns copies of the values, in no particular order
    fn values(&self) -> Vec<Vec<u8>>;

    /// Returns the total number of key and value bytes held
    fn byte_len(&self) -> usize;
}

impl TableExtensions for Table {
    fn keys(&self) -> Vec<Vec<u8>> {
        self.iter().map(|(k, _)| k.to_vec()).collect()
    }

    fn values(&self) -> Vec<Vec<u8>> {
        self.iter().map(|(_, v)| v.to_vec()).collect()
    }

    fn byte_len(&self) -> usize {
        self.iter().fold(0, |total: usize, (k, v)| total.saturating_add(k.len()).saturating_add(v.len()))
    }
}

/// Creates a `Table` with the given configuration from an iterator of key-value pairs
pub fn from_iter_with_config<K, V, I>(config: TableConfig, iter: I) -> Table
where
    K: Into<Vec<u8>>,
    V: Into<Vec<u8>>,
    I: IntoIterator<Item = (K, V)>,
{
    let mut table = Table::with_config(config);
    table.extend(iter);
    table
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_iter_with_config() {
        let data = vec![("a", "1"), ("b", "2"), ("c", "3")];

        let table = from_iter_with_config(TableConfig::new().with_base_capacity(8), data);

        assert_eq!(table.search("a"), Some(&b"1"[..]));
        assert_eq!(table.search("b"), Some(&b"2"[..]));
        assert_eq!(table.search("c"), Some(&b"3"[..]));
        assert_eq!(table.len(), 3);
        assert_eq!(table.capacity(), 11);
    }

    #[test]
    fn test_keys_and_values() {
        let mut table = Table::new();
        table.insert("a", "1");
        table.insert("b", "2");
        table.insert("c", "3");

        let mut keys = table.keys();
        keys.sort(); // Sort for predictable comparison

        let mut values = table.values();
        values.sort_unstable();

        assert_eq!(keys, vec![b"a".to_vec(), b"b".to_vec(), b"c".to_vec()]);
        assert_eq!(values, vec![b"1".to_vec(), b"2".to_vec(), b"3".to_vec()]);
    }

    #[test]
    fn test_byte_len() {
        let mut table = Table::new();
        assert_eq!(table.byte_len(), 0);

        table.insert("key", "value");
        table.insert("k", "");
        assert_eq!(table.byte_len(), 9);
    }
}
