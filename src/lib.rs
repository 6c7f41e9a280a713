//! # rdfmine
//!
//! Frequent itemset and association rule mining over RDF graphs, driven by
//! the external `fpgrowth` tool from Christian Borgelt's FIM package.
//!
//! ## Pipeline
//!
//! - **Projection** (`project`): instances of a target class become
//!   transactions of `predicate-->object` items
//! - **Compaction** (`prefix`): optional namespace-to-prefix rewriting
//! - **Encoding** (`basket`): transactions become a `|`-separated basket file
//! - **Invocation** (`fpgrowth`): two runs of the external binary, itemsets
//!   required and rules best-effort
//! - **Parsing** (`results`): output files back into typed records with
//!   support, confidence, and lift
//!
//! ## Library usage
//!
//! ```no_run
//! use rdfmine::graph::RdfGraph;
//! use rdfmine::pipeline::{MineParams, Miner, MinerConfig};
//!
//! let graph = RdfGraph::new().unwrap();
//! graph.load_file(std::path::Path::new("data.ttl")).unwrap();
//!
//! let miner = Miner::new(MinerConfig::default());
//! let params = MineParams::for_class("http://example.org/Person");
//! let outcome = miner.mine(&graph, &params).unwrap();
//! println!("{} itemsets, {} rules", outcome.itemsets.len(), outcome.rules.len());
//! ```

pub mod basket;
pub mod error;
pub mod fpgrowth;
pub mod graph;
pub mod item;
pub mod pipeline;
pub mod prefix;
pub mod project;
pub mod results;
