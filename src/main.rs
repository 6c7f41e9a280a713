//! rdfmine CLI: mine frequent patterns and association rules from RDF data.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use miette::{IntoDiagnostic, Result};

use rdfmine::graph::{read_graph_from_endpoint, RdfGraph};
use rdfmine::pipeline::{MineParams, Miner, MinerConfig};
use rdfmine::prefix::PrefixMap;

#[derive(Parser)]
#[command(name = "rdfmine", version, about = "Association mining over RDF graphs")]
struct Cli {
    /// RDF input file (.ttl, .nt, .rdf).
    #[arg(long, global = true)]
    file: Option<PathBuf>,

    /// SPARQL endpoint to read the graph from instead of a file.
    #[arg(long, global = true)]
    endpoint: Option<String>,

    /// Work directory for basket and output files.
    #[arg(long, global = true, default_value = ".")]
    work_dir: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List classes with their instance counts.
    Classes {
        /// Count instances through the subclass closure.
        #[arg(long)]
        subclasses: bool,
    },

    /// Mine frequent itemsets and association rules for a class.
    Mine {
        /// Target class IRI.
        #[arg(long)]
        class: String,

        /// Only direct instances, skipping the subclass closure.
        #[arg(long)]
        direct_only: bool,

        /// Namespace prefix pairs, `uri=prefix:`, repeatable.
        #[arg(long = "prefix", value_name = "URI=PREFIX")]
        prefixes: Vec<String>,

        /// Minimum support for itemset mining (integer percent).
        #[arg(long, default_value = "50")]
        min_support: u32,

        /// Minimum support for rule mining (integer percent).
        #[arg(long, default_value = "25")]
        min_rule_support: u32,

        /// Minimum rule confidence (integer percent).
        #[arg(long, default_value = "90")]
        min_confidence: u32,

        /// Minimum lift, scaled by 100 (200 = lift 2.00).
        #[arg(long, default_value = "200")]
        min_lift: u32,

        /// Path or name of the fpgrowth executable.
        #[arg(long, default_value = "fpgrowth")]
        fpgrowth: PathBuf,

        /// Emit results as JSON instead of text.
        #[arg(long)]
        json: bool,
    },

    /// Mine over every subject in the graph, one transaction per subject.
    MineAll {
        /// Minimum support for itemset mining (integer percent).
        #[arg(long, default_value = "30")]
        min_support: u32,

        /// Minimum support for rule mining (integer percent).
        #[arg(long, default_value = "20")]
        min_rule_support: u32,

        /// Minimum rule confidence (integer percent).
        #[arg(long, default_value = "95")]
        min_confidence: u32,

        /// Minimum lift, scaled by 100.
        #[arg(long, default_value = "200")]
        min_lift: u32,

        /// Path or name of the fpgrowth executable.
        #[arg(long, default_value = "fpgrowth")]
        fpgrowth: PathBuf,

        /// Emit results as JSON instead of text.
        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<()> {
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(3)
                .build(),
        )
    }))
    .ok(); // Ignore error if hook already set (e.g., in tests)

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let graph = load_graph(&cli)?;

    match cli.command {
        Commands::Classes { subclasses } => {
            for (class, count) in graph.class_inventory(subclasses)? {
                println!("{class}\t{count}");
            }
        }

        Commands::Mine {
            class,
            direct_only,
            prefixes,
            min_support,
            min_rule_support,
            min_confidence,
            min_lift,
            fpgrowth,
            json,
        } => {
            let miner = Miner::new(MinerConfig {
                work_dir: cli.work_dir,
                fpgrowth,
                ..Default::default()
            });
            let params = MineParams {
                use_subclasses: !direct_only,
                prefixes: parse_prefixes(&prefixes)?,
                min_support_itemsets: min_support,
                min_support_rules: min_rule_support,
                min_confidence,
                min_lift,
                ..MineParams::for_class(class)
            };
            let outcome = miner.mine(&graph, &params)?;
            report(&outcome, json)?;
        }

        Commands::MineAll {
            min_support,
            min_rule_support,
            min_confidence,
            min_lift,
            fpgrowth,
            json,
        } => {
            let miner = Miner::new(MinerConfig {
                work_dir: cli.work_dir,
                fpgrowth,
                ..Default::default()
            });
            let params = MineParams {
                min_support_itemsets: min_support,
                min_support_rules: min_rule_support,
                min_confidence,
                min_lift,
                ..MineParams::for_class(String::new())
            };
            let outcome = miner.mine_all(&graph, &params)?;
            report(&outcome, json)?;
        }
    }

    Ok(())
}

fn load_graph(cli: &Cli) -> Result<RdfGraph> {
    match (&cli.file, &cli.endpoint) {
        (Some(path), _) => {
            let graph = RdfGraph::new()?;
            let triples = graph.load_file(path)?;
            tracing::info!(path = %path.display(), triples, "loaded RDF file");
            Ok(graph)
        }
        (None, Some(endpoint)) => Ok(read_graph_from_endpoint(endpoint)?),
        (None, None) => Err(miette::miette!(
            "no input graph: pass --file <rdf-file> or --endpoint <url>"
        )),
    }
}

/// Parse repeated `uri=prefix:` arguments into a prefix map.
fn parse_prefixes(args: &[String]) -> Result<Option<PrefixMap>> {
    if args.is_empty() {
        return Ok(None);
    }
    let mut pairs = Vec::new();
    for arg in args {
        let (uri, prefix) = arg.split_once('=').ok_or_else(|| {
            miette::miette!("invalid --prefix {arg:?}, expected uri=prefix:")
        })?;
        pairs.push((uri.to_string(), prefix.to_string()));
    }
    Ok(Some(PrefixMap::new(pairs)))
}

fn report(outcome: &rdfmine::pipeline::MineOutcome, json: bool) -> Result<()> {
    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(outcome).into_diagnostic()?
        );
        return Ok(());
    }

    println!("frequent itemsets ({}):", outcome.itemsets.len());
    for set in &outcome.itemsets {
        let items: Vec<String> = set.items.iter().map(|i| i.to_string()).collect();
        println!("  {}  support={}", items.join(" "), set.support);
    }

    println!("association rules ({}):", outcome.rules.len());
    for rule in &outcome.rules {
        let ante: Vec<String> = rule.antecedents.iter().map(|i| i.to_string()).collect();
        let cons: Vec<String> = rule.consequents.iter().map(|i| i.to_string()).collect();
        println!(
            "  {} => {}  support={} confidence={} lift={}",
            ante.join(" "),
            cons.join(" "),
            rule.support,
            rule.confidence,
            rule.lift
        );
    }
    Ok(())
}
