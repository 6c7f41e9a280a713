//! Graph projection: turn class instances into transactions of items.
//!
//! Each instance of the target class becomes one transaction holding an item
//! per predicate-object pair of that instance. With `use_subclasses` the
//! instance set is the union over the reflexive-transitive subclass closure,
//! deduplicated in first-seen order (an instance typed under two subclasses
//! must still yield exactly one transaction).

use std::collections::HashSet;

use crate::error::GraphError;
use crate::graph::GraphSource;
use crate::item::Item;
use crate::prefix::PrefixMap;

/// One projected instance: its subject term and its item list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transaction {
    /// The instance the items were projected from.
    pub instance: String,
    /// Predicate-object items, in the graph's enumeration order.
    pub items: Vec<Item>,
}

/// Project every instance of `class` into a transaction.
///
/// With `prefixes`, predicate and object terms are namespace-compacted before
/// becoming items. Zero instances yields an empty vector, not an error.
pub fn project(
    graph: &impl GraphSource,
    class: &str,
    use_subclasses: bool,
    prefixes: Option<&PrefixMap>,
) -> Result<Vec<Transaction>, GraphError> {
    let instances = if use_subclasses {
        let mut seen = HashSet::new();
        let mut union = Vec::new();
        for subclass in graph.subclasses(class)? {
            for instance in graph.instances(&subclass)? {
                if seen.insert(instance.clone()) {
                    union.push(instance);
                }
            }
        }
        union
    } else {
        graph.instances(class)?
    };

    tracing::debug!(class, use_subclasses, count = instances.len(), "projecting instances");

    instances
        .into_iter()
        .map(|instance| {
            let items = project_instance(graph, &instance, prefixes)?;
            Ok(Transaction { instance, items })
        })
        .collect()
}

/// Project every subject in the graph into a transaction, no class filter.
pub fn project_all(
    graph: &impl GraphSource,
    prefixes: Option<&PrefixMap>,
) -> Result<Vec<Transaction>, GraphError> {
    graph
        .subjects()?
        .into_iter()
        .map(|instance| {
            let items = project_instance(graph, &instance, prefixes)?;
            Ok(Transaction { instance, items })
        })
        .collect()
}

fn project_instance(
    graph: &impl GraphSource,
    instance: &str,
    prefixes: Option<&PrefixMap>,
) -> Result<Vec<Item>, GraphError> {
    let items = graph
        .predicate_objects(instance)?
        .into_iter()
        .map(|(p, o)| match prefixes {
            Some(map) => Item::new(map.compact(&p), map.compact(&o)),
            None => Item::new(p, o),
        })
        .collect();
    Ok(items)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Fixture graph: hand-written adjacency, no store behind it.
    struct Fixture {
        subclasses: Vec<(&'static str, Vec<&'static str>)>,
        instances: Vec<(&'static str, Vec<&'static str>)>,
        po: Vec<(&'static str, Vec<(&'static str, &'static str)>)>,
    }

    impl GraphSource for Fixture {
        fn classes(&self) -> Result<Vec<String>, GraphError> {
            Ok(self.instances.iter().map(|(c, _)| c.to_string()).collect())
        }

        fn subclasses(&self, class: &str) -> Result<Vec<String>, GraphError> {
            let mut closure = vec![class.to_string()];
            if let Some((_, subs)) = self.subclasses.iter().find(|(c, _)| *c == class) {
                closure.extend(subs.iter().map(|s| s.to_string()));
            }
            Ok(closure)
        }

        fn instances(&self, class: &str) -> Result<Vec<String>, GraphError> {
            Ok(self
                .instances
                .iter()
                .find(|(c, _)| *c == class)
                .map(|(_, is)| is.iter().map(|i| i.to_string()).collect())
                .unwrap_or_default())
        }

        fn predicate_objects(&self, subject: &str) -> Result<Vec<(String, String)>, GraphError> {
            Ok(self
                .po
                .iter()
                .find(|(s, _)| *s == subject)
                .map(|(_, pos)| {
                    pos.iter()
                        .map(|(p, o)| (p.to_string(), o.to_string()))
                        .collect()
                })
                .unwrap_or_default())
        }

        fn subjects(&self) -> Result<Vec<String>, GraphError> {
            Ok(self.po.iter().map(|(s, _)| s.to_string()).collect())
        }
    }

    fn fixture() -> Fixture {
        Fixture {
            subclasses: vec![("Animal", vec!["Dog"])],
            instances: vec![
                ("Animal", vec!["generic", "rex"]),
                // rex is typed under both Animal and Dog.
                ("Dog", vec!["rex"]),
            ],
            po: vec![
                ("generic", vec![("kind", "unknown")]),
                ("rex", vec![("kind", "dog"), ("name", "Rex")]),
            ],
        }
    }

    #[test]
    fn direct_instances_only_without_subclasses() {
        let txns = project(&fixture(), "Dog", false, None).unwrap();
        assert_eq!(txns.len(), 1);
        assert_eq!(txns[0].instance, "rex");
        assert_eq!(txns[0].items[0], Item::new("kind", "dog"));
    }

    #[test]
    fn subclass_union_dedupes_instances() {
        let txns = project(&fixture(), "Animal", true, None).unwrap();
        let names: Vec<&str> = txns.iter().map(|t| t.instance.as_str()).collect();
        assert_eq!(names, vec!["generic", "rex"]);
    }

    #[test]
    fn unknown_class_yields_empty_list() {
        let txns = project(&fixture(), "Mineral", false, None).unwrap();
        assert!(txns.is_empty());
    }

    #[test]
    fn prefixes_compact_both_halves() {
        let graph = Fixture {
            subclasses: vec![],
            instances: vec![("C", vec!["i"])],
            po: vec![("i", vec![("http://ex.org/p", "http://ex.org/o")])],
        };
        let map = PrefixMap::new([("http://ex.org/", "ex:")]);
        let txns = project(&graph, "C", false, Some(&map)).unwrap();
        assert_eq!(txns[0].items[0], Item::new("ex:p", "ex:o"));
    }

    #[test]
    fn project_all_covers_every_subject() {
        let txns = project_all(&fixture(), None).unwrap();
        assert_eq!(txns.len(), 2);
    }
}
