//! Orchestration: project, encode, invoke, parse, in that order.
//!
//! `Miner` owns the configuration (work directory, binary location,
//! separators) and sequences one full mining call. Itemset mining is
//! required: encoding failures and a failing itemset run abort the call.
//! Rule mining is best-effort: its failures are logged and the call returns
//! whatever rules could be parsed, possibly none.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::basket;
use crate::error::MineResult;
use crate::fpgrowth::{self, Fpgrowth, DEFAULT_PROGRAM};
use crate::graph::GraphSource;
use crate::item::{ITEM_SEP, ITEMSET_SEP};
use crate::prefix::PrefixMap;
use crate::project::{self, Transaction};
use crate::results::{self, AssociationRule, FrequentItemset};

/// Configuration for the mining pipeline.
#[derive(Debug, Clone)]
pub struct MinerConfig {
    /// Directory for basket and output files. Never the implicit process CWD.
    pub work_dir: PathBuf,
    /// Path or name of the fpgrowth executable.
    pub fpgrowth: PathBuf,
    /// Separator between predicate and object within an item.
    pub item_sep: String,
    /// Separator between items on a basket line. Reserved: no item may
    /// contain it.
    pub itemset_sep: String,
}

impl Default for MinerConfig {
    fn default() -> Self {
        Self {
            work_dir: PathBuf::from("."),
            fpgrowth: PathBuf::from(DEFAULT_PROGRAM),
            item_sep: ITEM_SEP.to_string(),
            itemset_sep: ITEMSET_SEP.to_string(),
        }
    }
}

/// Per-call mining parameters. Thresholds are integer percentages; the lift
/// threshold shares the scale (200 = lift 2.00).
#[derive(Debug, Clone)]
pub struct MineParams {
    /// Target class IRI.
    pub class: String,
    /// Union instances across the reflexive-transitive subclass closure.
    pub use_subclasses: bool,
    /// Optional namespace compaction applied during projection.
    pub prefixes: Option<PrefixMap>,
    /// Minimum support for itemset mining.
    pub min_support_itemsets: u32,
    /// Minimum support for rule mining.
    pub min_support_rules: u32,
    /// Minimum rule confidence.
    pub min_confidence: u32,
    /// Minimum lift, scaled by 100.
    pub min_lift: u32,
}

impl MineParams {
    /// Defaults matching the classic per-class analysis: support 50/25,
    /// confidence 90, lift 2.00.
    pub fn for_class(class: impl Into<String>) -> Self {
        Self {
            class: class.into(),
            use_subclasses: true,
            prefixes: None,
            min_support_itemsets: 50,
            min_support_rules: 25,
            min_confidence: 90,
            min_lift: 200,
        }
    }
}

/// Both result lists of one mining call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MineOutcome {
    pub itemsets: Vec<FrequentItemset>,
    pub rules: Vec<AssociationRule>,
}

/// The mining pipeline facade.
#[derive(Debug, Clone)]
pub struct Miner {
    config: MinerConfig,
    runner: Fpgrowth,
}

impl Miner {
    pub fn new(config: MinerConfig) -> Self {
        let runner = Fpgrowth::new(config.fpgrowth.clone());
        Self { config, runner }
    }

    pub fn config(&self) -> &MinerConfig {
        &self.config
    }

    /// Mine frequent itemsets and association rules for one class.
    pub fn mine(&self, graph: &impl GraphSource, params: &MineParams) -> MineResult<MineOutcome> {
        let transactions = project::project(
            graph,
            &params.class,
            params.use_subclasses,
            params.prefixes.as_ref(),
        )?;
        tracing::info!(
            class = %params.class,
            transactions = transactions.len(),
            "projected class instances"
        );

        let basket_path = basket::class_basket_path(&self.config.work_dir, &params.class);
        self.mine_basket(&transactions, basket_path, params)
    }

    /// Mine over every subject in the graph, one transaction per subject.
    pub fn mine_all(&self, graph: &impl GraphSource, params: &MineParams) -> MineResult<MineOutcome> {
        let transactions = project::project_all(graph, params.prefixes.as_ref())?;
        tracing::info!(transactions = transactions.len(), "projected all subjects");

        let basket_path = basket::graph_basket_path(&self.config.work_dir);
        self.mine_basket(&transactions, basket_path, params)
    }

    fn mine_basket(
        &self,
        transactions: &[Transaction],
        basket_path: PathBuf,
        params: &MineParams,
    ) -> MineResult<MineOutcome> {
        basket::write(
            transactions,
            &basket_path,
            &self.config.item_sep,
            &self.config.itemset_sep,
        )?;
        tracing::debug!(path = %basket_path.display(), "wrote basket file");

        // Required half: any failure here aborts the call.
        self.runner.run_itemsets(
            &basket_path,
            &self.config.itemset_sep,
            params.min_support_itemsets,
        )?;
        let itemsets =
            results::parse_itemsets(&fpgrowth::itemsets_path(&basket_path), &self.config.item_sep)?;

        // Best-effort half: failures are logged, never propagated.
        if let Err(e) = self.runner.run_rules(
            &basket_path,
            &self.config.itemset_sep,
            params.min_support_rules,
            params.min_confidence,
            params.min_lift,
        ) {
            tracing::warn!(error = %e, "rule mining could not run");
        }

        let rules_file = fpgrowth::rules_path(&basket_path);
        let rules = if rules_file.exists() {
            match results::parse_rules(&rules_file, &self.config.item_sep) {
                Ok(rules) => rules,
                Err(e) => {
                    tracing::warn!(error = %e, "could not read rule output, returning none");
                    Vec::new()
                }
            }
        } else {
            tracing::debug!(path = %rules_file.display(), "no rule output produced");
            Vec::new()
        };

        tracing::info!(
            itemsets = itemsets.len(),
            rules = rules.len(),
            "mining complete"
        );
        Ok(MineOutcome { itemsets, rules })
    }
}
