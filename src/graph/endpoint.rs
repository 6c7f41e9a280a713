//! SPARQL endpoint ingestion: pull a whole remote graph into a local store.
//!
//! Issues `SELECT * WHERE { ?s ?p ?o }` against the endpoint, asks for
//! `application/sparql-results+json`, and inserts every binding as a quad in
//! the default graph. Intended for modest graphs; there is no paging.

use std::time::Duration;

use oxigraph::model::{BlankNode, GraphNameRef, Literal, NamedNode, Quad, Subject, Term};

use crate::error::GraphError;

use super::RdfGraph;

/// Default HTTP timeout for the endpoint request.
const DEFAULT_TIMEOUT_SECS: u64 = 120;

const ALL_TRIPLES: &str = "SELECT * WHERE { ?s ?p ?o }";

/// Read all triples from a SPARQL endpoint into a new in-memory graph.
pub fn read_graph_from_endpoint(endpoint: &str) -> Result<RdfGraph, GraphError> {
    let agent = ureq::AgentBuilder::new()
        .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
        .build();

    let response = agent
        .get(endpoint)
        .query("query", ALL_TRIPLES)
        .set("Accept", "application/sparql-results+json")
        .call()
        .map_err(|e| GraphError::Endpoint {
            message: format!("request to {endpoint} failed: {e}"),
        })?;

    let body: serde_json::Value = response.into_json().map_err(|e| GraphError::Endpoint {
        message: format!("invalid JSON from {endpoint}: {e}"),
    })?;

    let bindings = body["results"]["bindings"]
        .as_array()
        .ok_or_else(|| GraphError::Endpoint {
            message: format!("no results.bindings array in response from {endpoint}"),
        })?;

    let graph = RdfGraph::new()?;
    let mut inserted = 0usize;

    for binding in bindings {
        let subject = match binding_subject(&binding["s"]) {
            Some(s) => s,
            None => {
                tracing::warn!(binding = %binding["s"], "skipping binding with unusable subject");
                continue;
            }
        };
        let predicate = match binding_iri(&binding["p"]) {
            Some(p) => p,
            None => {
                tracing::warn!(binding = %binding["p"], "skipping binding with unusable predicate");
                continue;
            }
        };
        let object = binding_term(&binding["o"]).ok_or_else(|| GraphError::Endpoint {
            message: format!("unsupported object binding: {}", binding["o"]),
        })?;

        let quad = Quad::new(subject, predicate, object, GraphNameRef::DefaultGraph);
        graph
            .store()
            .insert(&quad)
            .map_err(|e| GraphError::Sparql {
                message: format!("insert failed: {e}"),
            })?;
        inserted += 1;
    }

    tracing::info!(endpoint, triples = inserted, "loaded graph from SPARQL endpoint");
    Ok(graph)
}

fn binding_iri(value: &serde_json::Value) -> Option<NamedNode> {
    if value["type"].as_str()? != "uri" {
        return None;
    }
    NamedNode::new(value["value"].as_str()?).ok()
}

fn binding_subject(value: &serde_json::Value) -> Option<Subject> {
    match value["type"].as_str()? {
        "uri" => Some(NamedNode::new(value["value"].as_str()?).ok()?.into()),
        "bnode" => Some(BlankNode::new(value["value"].as_str()?).ok()?.into()),
        _ => None,
    }
}

fn binding_term(value: &serde_json::Value) -> Option<Term> {
    match value["type"].as_str()? {
        "uri" => Some(NamedNode::new(value["value"].as_str()?).ok()?.into()),
        "bnode" => Some(BlankNode::new(value["value"].as_str()?).ok()?.into()),
        // SPARQL 1.0 endpoints report datatyped literals as "typed-literal".
        "literal" | "typed-literal" => {
            let text = value["value"].as_str()?;
            Some(Literal::new_simple_literal(text).into())
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn json(s: &str) -> serde_json::Value {
        serde_json::from_str(s).unwrap()
    }

    #[test]
    fn uri_binding_becomes_named_node() {
        let term = binding_term(&json(
            r#"{"type": "uri", "value": "http://example.org/a"}"#,
        ))
        .unwrap();
        assert!(matches!(term, Term::NamedNode(_)));
    }

    #[test]
    fn literal_bindings_become_literals() {
        for payload in [
            r#"{"type": "literal", "value": "plain"}"#,
            r#"{"type": "typed-literal", "value": "42"}"#,
        ] {
            let term = binding_term(&json(payload)).unwrap();
            assert!(matches!(term, Term::Literal(_)));
        }
    }

    #[test]
    fn unknown_binding_type_is_rejected() {
        assert!(binding_term(&json(r#"{"type": "mystery", "value": "x"}"#)).is_none());
        assert!(binding_subject(&json(r#"{"type": "literal", "value": "x"}"#)).is_none());
    }
}
