//! Namespace compaction: rewrite full IRIs to short prefixed names.
//!
//! A `PrefixMap` holds `namespace URI -> prefix` entries (the prefix includes
//! its trailing colon, e.g. `"foaf:"`). Compaction replaces a matching
//! namespace at the *start* of a term with its prefix and leaves the local
//! name verbatim. When one namespace URI is a prefix of another, the longest
//! one must win, so the alternation is built sorted by descending URI length.

use std::collections::BTreeMap;

use regex::Regex;

/// Mapping from namespace URIs to prefix tokens, with a precompiled
/// longest-first matcher.
#[derive(Debug, Clone)]
pub struct PrefixMap {
    prefixes: BTreeMap<String, String>,
    matcher: Option<Regex>,
}

impl PrefixMap {
    /// Build a prefix map from `(namespace URI, prefix)` pairs.
    ///
    /// The prefix should carry its trailing colon (`"rdf:"`). An empty set of
    /// pairs yields a map that passes every term through unchanged.
    pub fn new<I, S, T>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (S, T)>,
        S: Into<String>,
        T: Into<String>,
    {
        let prefixes: BTreeMap<String, String> = pairs
            .into_iter()
            .map(|(ns, prefix)| (ns.into(), prefix.into()))
            .collect();

        let matcher = if prefixes.is_empty() {
            None
        } else {
            // Longest namespace first, so an alternation over overlapping
            // namespaces never stops at the shorter one.
            let mut namespaces: Vec<&String> = prefixes.keys().collect();
            namespaces.sort_by_key(|ns| std::cmp::Reverse(ns.len()));
            let alternation = namespaces
                .iter()
                .map(|ns| regex::escape(ns))
                .collect::<Vec<_>>()
                .join("|");
            // Namespace URIs are fixed strings, so the pattern always compiles.
            Some(Regex::new(&format!("^(?:{alternation})")).expect("escaped alternation"))
        };

        Self { prefixes, matcher }
    }

    /// Compact a single term: replace a leading known namespace with its
    /// prefix, or return the term unchanged.
    pub fn compact(&self, term: &str) -> String {
        let Some(matcher) = &self.matcher else {
            return term.to_string();
        };
        match matcher.find(term) {
            Some(m) => {
                let prefix = &self.prefixes[m.as_str()];
                format!("{prefix}{}", &term[m.end()..])
            }
            None => term.to_string(),
        }
    }

    /// Number of registered namespaces.
    pub fn len(&self) -> usize {
        self.prefixes.len()
    }

    /// Whether the map has no entries.
    pub fn is_empty(&self) -> bool {
        self.prefixes.is_empty()
    }
}
