//! oxigraph-backed RDF graph.
//!
//! Wraps an oxigraph `Store`. The enumeration queries (`classes`,
//! `subjects`) run as SPARQL; the term-addressed reads (`instances`,
//! `subclasses`, `predicate_objects`) scan quad patterns directly, because a
//! boundary string may name a blank node and SPARQL cannot address those.
//! Terms are flattened to plain strings at this boundary: IRIs bare, blank
//! nodes as `_:label`, literals as their lexical form (no quotes, no
//! datatype suffix), matching the projection the basket format was defined
//! against. The same strings round-trip back in: `_:label` is parsed as a
//! blank node, anything else must be a valid IRI.

use std::collections::HashSet;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use oxigraph::io::RdfFormat;
use oxigraph::model::{BlankNode, GraphNameRef, NamedNode, Quad, Term};
use oxigraph::sparql::QueryResults;
use oxigraph::store::Store;

use crate::error::GraphError;

use super::GraphSource;

const RDF_TYPE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#type";
const RDFS_SUBCLASSOF: &str = "http://www.w3.org/2000/01/rdf-schema#subClassOf";

/// An RDF graph held in an oxigraph store.
pub struct RdfGraph {
    store: Store,
}

impl RdfGraph {
    /// Create a new empty in-memory graph.
    pub fn new() -> Result<Self, GraphError> {
        let store = Store::new().map_err(|e| GraphError::Sparql {
            message: format!("failed to create oxigraph store: {e}"),
        })?;
        Ok(Self { store })
    }

    /// Load an RDF file into the graph, guessing the syntax from the file
    /// extension. Returns the number of triples in the graph afterwards.
    pub fn load_file(&self, path: &Path) -> Result<usize, GraphError> {
        let format = match path.extension().and_then(|e| e.to_str()) {
            Some("ttl") | Some("turtle") => RdfFormat::Turtle,
            Some("nt") => RdfFormat::NTriples,
            Some("rdf") | Some("xml") | Some("owl") => RdfFormat::RdfXml,
            _ => {
                return Err(GraphError::UnknownFormat {
                    path: path.to_path_buf(),
                });
            }
        };

        let file = File::open(path).map_err(|e| GraphError::Load {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        self.store
            .load_from_reader(format, BufReader::new(file))
            .map_err(|e| GraphError::Load {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;

        self.len()
    }

    /// Number of triples in the graph.
    pub fn len(&self) -> Result<usize, GraphError> {
        self.store.len().map_err(|e| GraphError::Sparql {
            message: format!("store length query failed: {e}"),
        })
    }

    /// Whether the graph is empty.
    pub fn is_empty(&self) -> Result<bool, GraphError> {
        self.len().map(|n| n == 0)
    }

    /// Instance counts per class, optionally through the subclass closure.
    ///
    /// Returns `(class, instance count)` pairs in sorted class order, the
    /// per-class inventory used by the `classes` CLI command. A class whose
    /// term cannot be addressed (a literal in the type position, seen in
    /// loosely generated data) is skipped with a warning rather than failing
    /// the whole inventory.
    pub fn class_inventory(
        &self,
        use_subclasses: bool,
    ) -> Result<Vec<(String, usize)>, GraphError> {
        let mut inventory = Vec::new();
        for class in self.classes()? {
            match self.instance_count(&class, use_subclasses) {
                Ok(count) => inventory.push((class, count)),
                Err(e) => {
                    tracing::warn!(class, error = %e, "skipping unaddressable class");
                }
            }
        }
        Ok(inventory)
    }

    fn instance_count(&self, class: &str, use_subclasses: bool) -> Result<usize, GraphError> {
        if use_subclasses {
            let mut seen = HashSet::new();
            for sub in self.subclasses(class)? {
                for inst in self.instances(&sub)? {
                    seen.insert(inst);
                }
            }
            Ok(seen.len())
        } else {
            Ok(self.instances(class)?.len())
        }
    }

    /// Internal store reference (for direct quad insertion during ingestion).
    pub fn store(&self) -> &Store {
        &self.store
    }

    /// Run a SELECT query and map each solution through `row` in result order.
    fn select<T>(
        &self,
        sparql: &str,
        row: impl Fn(&oxigraph::sparql::QuerySolution) -> Option<T>,
    ) -> Result<Vec<T>, GraphError> {
        let results = self.store.query(sparql).map_err(|e| GraphError::Sparql {
            message: format!("SPARQL query failed: {e}"),
        })?;

        match results {
            QueryResults::Solutions(solutions) => {
                let mut rows = Vec::new();
                for solution in solutions {
                    let solution = solution.map_err(|e| GraphError::Sparql {
                        message: format!("solution error: {e}"),
                    })?;
                    if let Some(value) = row(&solution) {
                        rows.push(value);
                    }
                }
                Ok(rows)
            }
            _ => Err(GraphError::Sparql {
                message: "expected solutions from SELECT query".into(),
            }),
        }
    }

    /// Collect all default-graph quads matching the given pattern.
    fn pattern_quads(
        &self,
        subject: Option<&Node>,
        predicate: Option<&NamedNode>,
        object: Option<&Node>,
    ) -> Result<Vec<Quad>, GraphError> {
        self.store
            .quads_for_pattern(
                subject.map(|s| match s {
                    Node::Named(n) => n.as_ref().into(),
                    Node::Blank(b) => b.as_ref().into(),
                }),
                predicate.map(|p| p.as_ref()),
                object.map(|o| match o {
                    Node::Named(n) => n.as_ref().into(),
                    Node::Blank(b) => b.as_ref().into(),
                }),
                Some(GraphNameRef::DefaultGraph),
            )
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| GraphError::Sparql {
                message: format!("quad pattern scan failed: {e}"),
            })
    }
}

impl GraphSource for RdfGraph {
    fn classes(&self) -> Result<Vec<String>, GraphError> {
        self.select(
            &format!("SELECT DISTINCT ?c WHERE {{ ?s <{RDF_TYPE}> ?c }} ORDER BY ?c"),
            |solution| solution.get("c").map(term_text),
        )
    }

    fn subclasses(&self, class: &str) -> Result<Vec<String>, GraphError> {
        let subclass_of = NamedNode::new(RDFS_SUBCLASSOF).expect("valid IRI");
        let mut closure = vec![class.to_string()];
        let mut seen: HashSet<String> = closure.iter().cloned().collect();
        let mut queue = vec![class.to_string()];

        while let Some(current) = queue.pop() {
            let node = Node::parse(&current)?;
            for quad in self.pattern_quads(None, Some(&subclass_of), Some(&node))? {
                let sub = subject_text(&quad);
                if seen.insert(sub.clone()) {
                    closure.push(sub.clone());
                    queue.push(sub);
                }
            }
        }
        Ok(closure)
    }

    fn instances(&self, class: &str) -> Result<Vec<String>, GraphError> {
        let class = Node::parse(class)?;
        let rdf_type = NamedNode::new(RDF_TYPE).expect("valid IRI");
        let mut subjects: Vec<String> = self
            .pattern_quads(None, Some(&rdf_type), Some(&class))?
            .iter()
            .map(subject_text)
            .collect();
        subjects.sort();
        subjects.dedup();
        Ok(subjects)
    }

    fn predicate_objects(&self, subject: &str) -> Result<Vec<(String, String)>, GraphError> {
        let subject = Node::parse(subject)?;
        let mut pairs: Vec<(String, String)> = self
            .pattern_quads(Some(&subject), None, None)?
            .iter()
            .map(|quad| (quad.predicate.as_str().to_string(), term_text(&quad.object)))
            .collect();
        pairs.sort();
        Ok(pairs)
    }

    fn subjects(&self) -> Result<Vec<String>, GraphError> {
        self.select(
            "SELECT DISTINCT ?s WHERE { ?s ?p ?o } ORDER BY ?s",
            |solution| solution.get("s").map(term_text),
        )
    }
}

impl std::fmt::Debug for RdfGraph {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RdfGraph").finish()
    }
}

/// A boundary term string parsed back into a queryable node.
enum Node {
    Named(NamedNode),
    Blank(BlankNode),
}

impl Node {
    /// Inverse of `term_text` for the addressable positions: `_:label` is a
    /// blank node, anything else must be a valid IRI.
    fn parse(term: &str) -> Result<Self, GraphError> {
        if let Some(label) = term.strip_prefix("_:") {
            let node = BlankNode::new(label).map_err(|e| GraphError::Term {
                term: term.to_string(),
                message: e.to_string(),
            })?;
            Ok(Self::Blank(node))
        } else {
            let node = NamedNode::new(term).map_err(|e| GraphError::Term {
                term: term.to_string(),
                message: e.to_string(),
            })?;
            Ok(Self::Named(node))
        }
    }
}

/// Flatten a SPARQL result term to the plain-string projection.
fn term_text(term: &Term) -> String {
    match term {
        Term::NamedNode(n) => n.as_str().to_string(),
        Term::BlankNode(b) => b.to_string(),
        Term::Literal(l) => l.value().to_string(),
        #[allow(unreachable_patterns)]
        _ => term.to_string(),
    }
}

/// Flatten a quad's subject: named subjects print as `<iri>` and are trimmed
/// to the bare form; blank nodes already print as `_:label`.
fn subject_text(quad: &Quad) -> String {
    let text = quad.subject.to_string();
    text.strip_prefix('<')
        .and_then(|t| t.strip_suffix('>'))
        .unwrap_or(&text)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use oxigraph::model::{GraphNameRef, Literal, NamedNode, Quad};

    const EX: &str = "http://example.org/";

    fn node(local: &str) -> NamedNode {
        NamedNode::new(format!("{EX}{local}")).unwrap()
    }

    fn graph_with(quads: &[(&str, &str, &str)]) -> RdfGraph {
        let graph = RdfGraph::new().unwrap();
        for (s, p, o) in quads {
            let object: Term = if o.starts_with("http") || o.starts_with(EX) {
                NamedNode::new(*o).unwrap().into()
            } else if p.ends_with("type") || p.ends_with("subClassOf") {
                node(o).into()
            } else {
                Literal::new_simple_literal(*o).into()
            };
            let quad = Quad::new(node(s), NamedNode::new(*p).unwrap(), object, GraphNameRef::DefaultGraph);
            graph.store().insert(&quad).unwrap();
        }
        graph
    }

    #[test]
    fn classes_are_distinct_and_sorted() {
        let graph = graph_with(&[
            ("a", RDF_TYPE, "Zebra"),
            ("b", RDF_TYPE, "Ant"),
            ("c", RDF_TYPE, "Ant"),
        ]);
        let classes = graph.classes().unwrap();
        assert_eq!(classes, vec![format!("{EX}Ant"), format!("{EX}Zebra")]);
    }

    #[test]
    fn subclass_closure_is_reflexive_and_transitive() {
        let graph = graph_with(&[
            ("Dog", RDFS_SUBCLASSOF, "Mammal"),
            ("Mammal", RDFS_SUBCLASSOF, "Animal"),
        ]);
        let closure = graph.subclasses(&format!("{EX}Animal")).unwrap();
        assert!(closure.contains(&format!("{EX}Animal")));
        assert!(closure.contains(&format!("{EX}Mammal")));
        assert!(closure.contains(&format!("{EX}Dog")));
    }

    #[test]
    fn predicate_objects_flatten_literals() {
        let graph = graph_with(&[("a", &format!("{EX}name"), "Rex")]);
        let pos = graph.predicate_objects(&format!("{EX}a")).unwrap();
        assert_eq!(pos, vec![(format!("{EX}name"), "Rex".to_string())]);
    }

    #[test]
    fn blank_node_instances_are_addressable() {
        let graph = RdfGraph::new().unwrap();
        let anon = BlankNode::new("i1").unwrap();
        let ty = NamedNode::new(RDF_TYPE).unwrap();
        graph
            .store()
            .insert(&Quad::new(
                anon.clone(),
                ty,
                node("Thing"),
                GraphNameRef::DefaultGraph,
            ))
            .unwrap();
        graph
            .store()
            .insert(&Quad::new(
                anon,
                node("name"),
                Literal::new_simple_literal("anonymous"),
                GraphNameRef::DefaultGraph,
            ))
            .unwrap();

        let instances = graph.instances(&format!("{EX}Thing")).unwrap();
        assert_eq!(instances, vec!["_:i1".to_string()]);

        // The boundary string round-trips back into a queryable subject.
        let pos = graph.predicate_objects("_:i1").unwrap();
        assert_eq!(
            pos,
            vec![
                (format!("{EX}name"), "anonymous".to_string()),
                (RDF_TYPE.to_string(), format!("{EX}Thing")),
            ]
        );
    }

    #[test]
    fn anonymous_classes_appear_in_the_inventory() {
        let graph = RdfGraph::new().unwrap();
        let anon_class = BlankNode::new("restriction").unwrap();
        let ty = NamedNode::new(RDF_TYPE).unwrap();
        graph
            .store()
            .insert(&Quad::new(
                node("a"),
                ty,
                anon_class,
                GraphNameRef::DefaultGraph,
            ))
            .unwrap();

        let inventory = graph.class_inventory(false).unwrap();
        assert_eq!(inventory, vec![("_:restriction".to_string(), 1)]);
    }

    #[test]
    fn literal_classes_are_skipped_not_fatal() {
        let graph = graph_with(&[("a", RDF_TYPE, "Dog")]);
        // Generalized RDF allows a literal in the type position; it cannot be
        // addressed as a class term.
        let ty = NamedNode::new(RDF_TYPE).unwrap();
        graph
            .store()
            .insert(&Quad::new(
                node("b"),
                ty,
                Literal::new_simple_literal("not a class"),
                GraphNameRef::DefaultGraph,
            ))
            .unwrap();

        let inventory = graph.class_inventory(true).unwrap();
        assert_eq!(inventory, vec![(format!("{EX}Dog"), 1)]);
    }

    #[test]
    fn class_inventory_counts_through_closure() {
        let graph = graph_with(&[
            ("Dog", RDFS_SUBCLASSOF, "Animal"),
            ("rex", RDF_TYPE, "Dog"),
            ("ant", RDF_TYPE, "Animal"),
        ]);
        let direct = graph.class_inventory(false).unwrap();
        let animal_direct = direct
            .iter()
            .find(|(c, _)| c.ends_with("Animal"))
            .unwrap()
            .1;
        assert_eq!(animal_direct, 1);

        let closed = graph.class_inventory(true).unwrap();
        let animal_closed = closed
            .iter()
            .find(|(c, _)| c.ends_with("Animal"))
            .unwrap()
            .1;
        assert_eq!(animal_closed, 2);
    }
}
