//! Graph collaborator: the read operations the mining pipeline needs.
//!
//! The projector only ever asks four questions of a graph — what classes
//! exist, what the subclass closure of a class is, what the instances of a
//! class are, and what predicate-object pairs a subject carries. `GraphSource`
//! captures exactly that surface so tests can substitute a fixture graph and
//! the pipeline stays independent of the store implementation.

pub mod endpoint;
pub mod store;

pub use endpoint::read_graph_from_endpoint;
pub use store::RdfGraph;

use crate::error::GraphError;

/// Read-only view of an RDF graph, as consumed by the projector.
///
/// All terms cross this boundary as plain strings: IRIs bare (no angle
/// brackets), blank nodes as `_:label`, literals as their lexical form.
/// The strings round-trip: any term an implementation hands out in an
/// addressable position (a class or a subject) must be accepted back by
/// `subclasses`, `instances`, and `predicate_objects`.
pub trait GraphSource {
    /// All distinct classes that have instances, sorted.
    fn classes(&self) -> Result<Vec<String>, GraphError>;

    /// Reflexive-transitive subclass closure of `class` under
    /// `rdfs:subClassOf`. Always contains `class` itself.
    fn subclasses(&self, class: &str) -> Result<Vec<String>, GraphError>;

    /// Direct instances of `class` (subjects with `rdf:type class`).
    fn instances(&self, class: &str) -> Result<Vec<String>, GraphError>;

    /// All predicate-object pairs where `subject` is the subject, in the
    /// graph's stable enumeration order.
    fn predicate_objects(&self, subject: &str) -> Result<Vec<(String, String)>, GraphError>;

    /// All distinct subjects in the graph. Used by whole-graph mining,
    /// where every subject becomes one transaction.
    fn subjects(&self) -> Result<Vec<String>, GraphError>;
}
