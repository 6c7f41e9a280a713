//! Items: encoded predicate-object pairs, the atomic unit the miner sees.
//!
//! A graph instance is projected into a transaction of items, each item one
//! `predicate-->object` edge. The item separator (`-->`) joins the two halves
//! of an item; the itemset separator (`|`) joins items on a basket line. The
//! two must never collide: an item containing the itemset separator would make
//! the basket line ambiguous, which is why the encoder rejects it outright.

use serde::{Deserialize, Serialize};

/// Default separator between predicate and object within one item.
pub const ITEM_SEP: &str = "-->";

/// Default separator between items on one basket line.
pub const ITEMSET_SEP: &str = "|";

/// One predicate-object pair of a graph instance, as mined.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Item {
    /// Predicate term, as projected (possibly prefix-compacted).
    pub predicate: String,
    /// Object term, as projected (possibly prefix-compacted).
    pub object: String,
}

impl Item {
    pub fn new(predicate: impl Into<String>, object: impl Into<String>) -> Self {
        Self {
            predicate: predicate.into(),
            object: object.into(),
        }
    }

    /// Render the item in basket form: `predicate-->object`.
    pub fn encode(&self, item_sep: &str) -> String {
        format!("{}{item_sep}{}", self.predicate, self.object)
    }

    /// Parse a basket token back into an item, splitting once on the item
    /// separator. A token without the separator is not an item the projection
    /// could have written, so it yields `None` rather than a half-formed item.
    pub fn decode(token: &str, item_sep: &str) -> Option<Self> {
        token.split_once(item_sep).map(|(p, o)| Self::new(p, o))
    }
}

impl std::fmt::Display for Item {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{ITEM_SEP}{}", self.predicate, self.object)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_decode_roundtrip() {
        let item = Item::new("rdf:type", "foaf:Person");
        let token = item.encode(ITEM_SEP);
        assert_eq!(token, "rdf:type-->foaf:Person");
        assert_eq!(Item::decode(&token, ITEM_SEP).unwrap(), item);
    }

    #[test]
    fn decode_splits_only_once() {
        // Objects may themselves contain the separator text; only the first
        // occurrence delimits.
        let item = Item::decode("p-->a-->b", ITEM_SEP).unwrap();
        assert_eq!(item.predicate, "p");
        assert_eq!(item.object, "a-->b");
    }

    #[test]
    fn decode_without_separator_is_rejected() {
        assert_eq!(Item::decode("lonely", ITEM_SEP), None);
    }
}
