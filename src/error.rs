//! Rich diagnostic error types for the rdfmine pipeline.
//!
//! Each stage defines its own error type with miette `#[diagnostic]` derives,
//! providing error codes and help text so users can tell a graph problem
//! apart from a missing mining binary or a malformed output file.

use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

/// Top-level error type for the rdfmine pipeline.
///
/// Each variant wraps a stage-specific error, preserving the full diagnostic
/// chain (error codes, help text, source chains) through to the user.
#[derive(Debug, Error, Diagnostic)]
pub enum MineError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Graph(#[from] GraphError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Basket(#[from] BasketError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Miner(#[from] MinerError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Parse(#[from] ParseError),
}

// ---------------------------------------------------------------------------
// Graph errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum GraphError {
    #[error("SPARQL query error: {message}")]
    #[diagnostic(
        code(rdfmine::graph::sparql),
        help(
            "The SPARQL query failed. Check the query syntax and ensure \
             the oxigraph store is initialized."
        )
    )]
    Sparql { message: String },

    #[error("failed to load RDF from {path:?}: {message}")]
    #[diagnostic(
        code(rdfmine::graph::load),
        help(
            "The RDF file could not be parsed. Check that the file exists and \
             that its extension matches its syntax (.ttl, .nt, .rdf)."
        )
    )]
    Load { path: PathBuf, message: String },

    #[error("unsupported RDF file extension: {path:?}")]
    #[diagnostic(
        code(rdfmine::graph::format),
        help("Supported extensions are .ttl (Turtle), .nt (N-Triples), and .rdf/.xml (RDF/XML).")
    )]
    UnknownFormat { path: PathBuf },

    #[error("term {term:?} is not addressable as a graph node: {message}")]
    #[diagnostic(
        code(rdfmine::graph::term),
        help(
            "A graph node term must be a valid IRI, or a blank node written \
             as _:label. Literals cannot stand in the subject or class \
             position."
        )
    )]
    Term { term: String, message: String },

    #[error("SPARQL endpoint request failed: {message}")]
    #[diagnostic(
        code(rdfmine::graph::endpoint),
        help(
            "The endpoint did not return a valid SPARQL JSON result set. \
             Verify the URL is a SPARQL endpoint and is reachable."
        )
    )]
    Endpoint { message: String },
}

// ---------------------------------------------------------------------------
// Basket encoding errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum BasketError {
    #[error("item {item:?} contains the reserved itemset separator {separator:?}")]
    #[diagnostic(
        code(rdfmine::basket::reserved_separator),
        help(
            "Basket lines are split on the itemset separator, so no item may \
             contain it. Choose a different separator in MinerConfig, or \
             compact the offending term with a namespace prefix."
        )
    )]
    ReservedSeparator { item: String, separator: String },

    #[error("failed to write basket file {path:?}: {source}")]
    #[diagnostic(
        code(rdfmine::basket::io),
        help(
            "A filesystem operation failed. Check that the work directory \
             exists, has correct permissions, and that the disk is not full."
        )
    )]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

// ---------------------------------------------------------------------------
// Mining process errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum MinerError {
    #[error("failed to spawn {program}: {source}")]
    #[diagnostic(
        code(rdfmine::miner::spawn),
        help(
            "The fpgrowth executable could not be started. Install the FIM \
             package (borgelt.net/fpgrowth.html) and ensure the binary is on \
             PATH, or point MinerConfig.fpgrowth at it."
        )
    )]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{program} exited with status {status} during itemset mining")]
    #[diagnostic(
        code(rdfmine::miner::tool_unavailable),
        help(
            "Frequent itemset mining is required; a non-zero exit usually \
             means the FIM fpgrowth binary is missing or misconfigured. \
             Run it by hand against the basket file to see its own message."
        )
    )]
    ToolUnavailable { program: String, status: i32 },
}

// ---------------------------------------------------------------------------
// Output parse errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum ParseError {
    #[error("itemset line needs at least one item and a support value: {line:?}")]
    #[diagnostic(
        code(rdfmine::parse::itemset_short),
        help("Each fpgrowth itemset line is `item... support`, so two fields minimum.")
    )]
    ItemsetTooShort { line: String },

    #[error("trailing field is not a decimal number: {field:?}")]
    #[diagnostic(
        code(rdfmine::parse::bad_number),
        help(
            "The trailing statistics field must parse as decimal numbers. \
             Check that mining was invoked with the expected -v template."
        )
    )]
    BadNumber { field: String },

    #[error("token {token:?} is not a predicate-object item")]
    #[diagnostic(
        code(rdfmine::parse::item_token),
        help(
            "Every mined item should contain the predicate-object separator \
             the basket was written with. A bare token means the output was \
             mined from a different basket or with a different separator."
        )
    )]
    ItemToken { token: String },

    #[error("rule line must contain \" <- \" exactly once: {line:?}")]
    #[diagnostic(
        code(rdfmine::parse::rule_arrow),
        help(
            "fpgrowth rule output is `consequent <- antecedents stats`. A \
             missing or repeated arrow means the line is not a rule line."
        )
    )]
    RuleArrow { line: String },

    #[error("rule statistics field must be support,confidence,lift: {field:?}")]
    #[diagnostic(
        code(rdfmine::parse::rule_stats),
        help("Expected exactly three comma-separated decimals, from the -v \" %s,%c,%e\" template.")
    )]
    RuleStats { field: String },

    #[error("failed to read results file {path:?}: {source}")]
    #[diagnostic(
        code(rdfmine::parse::io),
        help(
            "The mining output file could not be read. If rule mining failed \
             this file may legitimately be absent."
        )
    )]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Convenience alias for functions returning rdfmine results.
pub type MineResult<T> = std::result::Result<T, MineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basket_error_converts_to_mine_error() {
        let err = BasketError::ReservedSeparator {
            item: "a|b".into(),
            separator: "|".into(),
        };
        let mine: MineError = err.into();
        assert!(matches!(
            mine,
            MineError::Basket(BasketError::ReservedSeparator { .. })
        ));
    }

    #[test]
    fn miner_error_converts_to_mine_error() {
        let err = MinerError::ToolUnavailable {
            program: "fpgrowth".into(),
            status: 1,
        };
        let mine: MineError = err.into();
        assert!(matches!(
            mine,
            MineError::Miner(MinerError::ToolUnavailable { .. })
        ));
    }

    #[test]
    fn error_display_messages_are_descriptive() {
        let err = MinerError::ToolUnavailable {
            program: "fpgrowth".into(),
            status: 127,
        };
        let msg = format!("{err}");
        assert!(msg.contains("fpgrowth"));
        assert!(msg.contains("127"));
    }
}
