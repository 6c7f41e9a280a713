//! Parsing the mining binary's output files back into typed records.
//!
//! Two grammars, both line-oriented and produced by the `-v` templates the
//! invoker passes:
//!
//! - itemsets: `item... support` — whitespace-separated items with a single
//!   trailing decimal support;
//! - rules: `consequent... <- antecedent... support,confidence,lift` — split
//!   once on the literal `" <- "`, with the statistics triple as the final
//!   whitespace token of the line.
//!
//! Malformed lines are skipped with a warning rather than aborting the file;
//! the policy is uniform across both parsers. Line order is preserved, since
//! the binary emits in descending support order.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ParseError;
use crate::item::Item;

/// One mined frequent itemset with its support.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrequentItemset {
    pub items: Vec<Item>,
    pub support: f64,
}

/// One mined association rule with its statistics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssociationRule {
    pub antecedents: Vec<Item>,
    pub consequents: Vec<Item>,
    pub support: f64,
    pub confidence: f64,
    pub lift: f64,
}

/// Parse an itemset output file. Unparseable lines are skipped with a warning.
pub fn parse_itemsets(path: &Path, item_sep: &str) -> Result<Vec<FrequentItemset>, ParseError> {
    let content = fs::read_to_string(path).map_err(|e| ParseError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;

    let mut records = Vec::new();
    for (number, line) in content.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        match parse_itemset_line(line, item_sep) {
            Ok(record) => records.push(record),
            Err(e) => {
                tracing::warn!(line = number + 1, error = %e, "skipping malformed itemset line");
            }
        }
    }
    Ok(records)
}

/// Parse a rules output file. Unparseable lines are skipped with a warning.
pub fn parse_rules(path: &Path, item_sep: &str) -> Result<Vec<AssociationRule>, ParseError> {
    let content = fs::read_to_string(path).map_err(|e| ParseError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;

    let mut records = Vec::new();
    for (number, line) in content.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        match parse_rule_line(line, item_sep) {
            Ok(record) => records.push(record),
            Err(e) => {
                tracing::warn!(line = number + 1, error = %e, "skipping malformed rule line");
            }
        }
    }
    Ok(records)
}

/// Parse one itemset line: `item... support`.
pub fn parse_itemset_line(line: &str, item_sep: &str) -> Result<FrequentItemset, ParseError> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    if tokens.len() < 2 {
        return Err(ParseError::ItemsetTooShort { line: line.into() });
    }

    let (tail, items) = tokens.split_last().expect("length checked above");
    let support = decimal(tail)?;

    Ok(FrequentItemset {
        items: decode_items(items, item_sep)?,
        support,
    })
}

/// Parse one rule line: `consequent... <- antecedent... support,confidence,lift`.
pub fn parse_rule_line(line: &str, item_sep: &str) -> Result<AssociationRule, ParseError> {
    const ARROW: &str = " <- ";

    if line.matches(ARROW).count() != 1 {
        return Err(ParseError::RuleArrow { line: line.into() });
    }
    let (consequent_side, antecedent_side) =
        line.split_once(ARROW).expect("arrow counted above");

    let consequent_tokens: Vec<&str> = consequent_side.split_whitespace().collect();
    let consequents = decode_items(&consequent_tokens, item_sep)?;

    let mut antecedent_tokens: Vec<&str> = antecedent_side.split_whitespace().collect();
    let stats = antecedent_tokens
        .pop()
        .ok_or_else(|| ParseError::RuleStats {
            field: antecedent_side.into(),
        })?;

    let fields: Vec<&str> = stats.split(',').collect();
    let [support, confidence, lift] = fields.as_slice() else {
        return Err(ParseError::RuleStats {
            field: stats.into(),
        });
    };

    Ok(AssociationRule {
        antecedents: decode_items(&antecedent_tokens, item_sep)?,
        consequents,
        support: decimal(support)?,
        confidence: decimal(confidence)?,
        lift: decimal(lift)?,
    })
}

/// Decode every token as an item; a token with no separator is an error, not
/// a predicate with an empty object.
fn decode_items(tokens: &[&str], item_sep: &str) -> Result<Vec<Item>, ParseError> {
    tokens
        .iter()
        .map(|t| {
            Item::decode(t, item_sep).ok_or_else(|| ParseError::ItemToken {
                token: t.to_string(),
            })
        })
        .collect()
}

fn decimal(field: &str) -> Result<f64, ParseError> {
    field
        .parse::<f64>()
        .map_err(|_| ParseError::BadNumber {
            field: field.into(),
        })
}
