//! Basket encoding: transactions to the one-line-per-instance file the
//! mining binary reads.
//!
//! The basket file is the only channel between the RDF side and the external
//! fpgrowth process, so losslessness matters more than anything else here:
//! every item is checked against the itemset separator before a single byte
//! is written, and a violation fails the whole encode.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::BasketError;
use crate::project::Transaction;

/// Render transactions as basket file content.
///
/// One line per transaction, items joined by `itemset_sep`, every line
/// newline-terminated. Fails without producing anything if any encoded item
/// contains the itemset separator, since the file could then not be split
/// back unambiguously.
pub fn encode(
    transactions: &[Transaction],
    item_sep: &str,
    itemset_sep: &str,
) -> Result<String, BasketError> {
    let mut content = String::new();
    for txn in transactions {
        let mut line = String::new();
        for (i, item) in txn.items.iter().enumerate() {
            let token = item.encode(item_sep);
            if token.contains(itemset_sep) {
                return Err(BasketError::ReservedSeparator {
                    item: token,
                    separator: itemset_sep.to_string(),
                });
            }
            if i > 0 {
                line.push_str(itemset_sep);
            }
            line.push_str(&token);
        }
        content.push_str(&line);
        content.push('\n');
    }
    Ok(content)
}

/// Encode and write the basket file, creating the work directory if needed.
pub fn write(
    transactions: &[Transaction],
    path: &Path,
    item_sep: &str,
    itemset_sep: &str,
) -> Result<(), BasketError> {
    let content = encode(transactions, item_sep, itemset_sep)?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| BasketError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
    }
    fs::write(path, content).map_err(|e| BasketError::Io {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Deterministic basket path for a target class: `<work_dir>/rdf.<slug>.basket`.
pub fn class_basket_path(work_dir: &Path, class: &str) -> PathBuf {
    work_dir.join(format!("rdf.{}.basket", slugify(class)))
}

/// Basket path for whole-graph mining: `<work_dir>/rdf.basket`.
pub fn graph_basket_path(work_dir: &Path) -> PathBuf {
    work_dir.join("rdf.basket")
}

/// Generate a filesystem-safe slug from a class IRI or label.
pub fn slugify(term: &str) -> String {
    term.to_lowercase()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '-' })
        .collect::<String>()
        .split('-')
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::{Item, ITEM_SEP, ITEMSET_SEP};

    fn txn(items: &[(&str, &str)]) -> Transaction {
        Transaction {
            instance: "i".into(),
            items: items.iter().map(|(p, o)| Item::new(*p, *o)).collect(),
        }
    }

    #[test]
    fn encode_joins_and_terminates_lines() {
        let txns = vec![txn(&[("a", "1"), ("b", "2")]), txn(&[("c", "3")])];
        let content = encode(&txns, ITEM_SEP, ITEMSET_SEP).unwrap();
        assert_eq!(content, "a-->1|b-->2\nc-->3\n");
    }

    #[test]
    fn encode_roundtrips_through_split() {
        let txns = vec![txn(&[("a", "1"), ("b", "2")])];
        let content = encode(&txns, ITEM_SEP, ITEMSET_SEP).unwrap();
        let line = content.lines().next().unwrap();
        let recovered: Vec<Item> = line
            .split(ITEMSET_SEP)
            .map(|t| Item::decode(t, ITEM_SEP).unwrap())
            .collect();
        assert_eq!(recovered, txns[0].items);
    }

    #[test]
    fn reserved_separator_in_item_is_fatal() {
        let txns = vec![txn(&[("a", "1")]), txn(&[("bad|item", "2")])];
        let err = encode(&txns, ITEM_SEP, ITEMSET_SEP).unwrap_err();
        assert!(matches!(err, BasketError::ReservedSeparator { .. }));
    }

    #[test]
    fn write_rejects_bad_items_without_touching_disk() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("rdf.test.basket");
        let txns = vec![txn(&[("bad|item", "2")])];
        assert!(write(&txns, &path, ITEM_SEP, ITEMSET_SEP).is_err());
        assert!(!path.exists());
    }

    #[test]
    fn write_handles_non_ascii_terms() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("rdf.test.basket");
        let txns = vec![txn(&[("nimi", "Ylöjärvi")])];
        write(&txns, &path, ITEM_SEP, ITEMSET_SEP).unwrap();
        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content, "nimi-->Ylöjärvi\n");
    }

    #[test]
    fn empty_transaction_list_encodes_to_empty_file() {
        let content = encode(&[], ITEM_SEP, ITEMSET_SEP).unwrap();
        assert!(content.is_empty());
    }

    #[test]
    fn basket_paths_are_deterministic() {
        let dir = Path::new("/tmp/work");
        let a = class_basket_path(dir, "http://example.org/Person");
        let b = class_basket_path(dir, "http://example.org/Person");
        assert_eq!(a, b);
        assert_eq!(
            a.file_name().unwrap().to_str().unwrap(),
            "rdf.http-example-org-person.basket"
        );
    }

    #[test]
    fn slugify_strips_punctuation() {
        assert_eq!(slugify("http://example.org/My Class"), "http-example-org-my-class");
        assert_eq!(slugify("  spaced  out  "), "spaced-out");
    }
}
