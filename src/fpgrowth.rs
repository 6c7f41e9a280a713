//! External mining process boundary: Borgelt's `fpgrowth` from the FIM
//! package.
//!
//! Two invocations per basket: `-ts` for frequent itemsets, `-tr` for
//! association rules. The itemset run is required and a non-zero exit aborts
//! the call (the usual cause is a missing binary); the rule run is
//! best-effort and a non-zero exit is only logged, with parsing proceeding
//! against whatever output exists.
//!
//! Thresholds are integer percentages throughout; the lift threshold uses
//! the same scale, so `-d200` means lift >= 2.00.

use std::path::{Path, PathBuf};
use std::process::Command;

use crate::error::MinerError;

/// Default executable name, resolved through PATH.
pub const DEFAULT_PROGRAM: &str = "fpgrowth";

/// Handle on the external fpgrowth executable.
#[derive(Debug, Clone)]
pub struct Fpgrowth {
    program: PathBuf,
}

/// Output path of the itemset run: `<basket>.freq_itemsets`.
pub fn itemsets_path(basket: &Path) -> PathBuf {
    append_suffix(basket, ".freq_itemsets")
}

/// Output path of the rule run: `<basket>.freq_rules`.
pub fn rules_path(basket: &Path) -> PathBuf {
    append_suffix(basket, ".freq_rules")
}

fn append_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut os = path.as_os_str().to_os_string();
    os.push(suffix);
    PathBuf::from(os)
}

impl Fpgrowth {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Mine frequent itemsets from `basket` into `<basket>.freq_itemsets`.
    ///
    /// The `-v " %s"` template appends the support percentage to each output
    /// line, which is what the itemset parser expects. A non-zero exit is
    /// fatal: itemsets are the required half of the pipeline.
    pub fn run_itemsets(
        &self,
        basket: &Path,
        itemset_sep: &str,
        min_support: u32,
    ) -> Result<(), MinerError> {
        let out = itemsets_path(basket);
        let status = self.run(&[
            "-ts".to_string(),
            format!("-f{itemset_sep}"),
            format!("-s{min_support}"),
            "-v %s".to_string(),
            basket.display().to_string(),
            out.display().to_string(),
        ])?;

        if status != 0 {
            return Err(MinerError::ToolUnavailable {
                program: self.program.display().to_string(),
                status,
            });
        }
        Ok(())
    }

    /// Mine association rules from `basket` into `<basket>.freq_rules`.
    ///
    /// `-m2` requires at least two items across antecedent and consequent,
    /// `-el -d<lift>` selects lift as the evaluation measure with its
    /// threshold, and `-v " %s,%c,%e"` appends the support, confidence, lift
    /// triple. Returns the exit status; a non-zero status is logged here and
    /// left to the caller to treat as best-effort.
    pub fn run_rules(
        &self,
        basket: &Path,
        itemset_sep: &str,
        min_support: u32,
        min_confidence: u32,
        min_lift: u32,
    ) -> Result<i32, MinerError> {
        let out = rules_path(basket);
        let status = self.run(&[
            "-tr".to_string(),
            format!("-f{itemset_sep}"),
            format!("-s{min_support}"),
            format!("-c{min_confidence}"),
            "-m2".to_string(),
            "-el".to_string(),
            format!("-d{min_lift}"),
            "-v %s,%c,%e".to_string(),
            basket.display().to_string(),
            out.display().to_string(),
        ])?;

        if status != 0 {
            tracing::warn!(
                program = %self.program.display(),
                status,
                "rule mining exited non-zero, continuing with whatever output exists"
            );
        }
        Ok(status)
    }

    fn run(&self, args: &[String]) -> Result<i32, MinerError> {
        tracing::debug!(program = %self.program.display(), ?args, "invoking fpgrowth");
        let status = Command::new(&self.program)
            .args(args)
            .status()
            .map_err(|e| MinerError::Spawn {
                program: self.program.display().to_string(),
                source: e,
            })?;
        // A signal-terminated child has no code; fold it into the failure path.
        Ok(status.code().unwrap_or(-1))
    }
}

impl Default for Fpgrowth {
    fn default() -> Self {
        Self::new(DEFAULT_PROGRAM)
    }
}
