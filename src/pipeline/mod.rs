//! The substitution pass: probe every registered rule, apply the
//! applicable ones, report per-rule outcomes.
//!
//! Runs once per build, strictly before reachability analysis. Rules are
//! mutually independent, so the probe phase may run in parallel across
//! rules against the immutable model; application is serialized through the
//! exclusive borrow of the model, so at most one writer ever touches a type
//! node.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::Result;
use crate::model::BuildModel;
use crate::probe::probe;
use crate::rule::registry::RuleRegistry;
use crate::rule::RuleOutcome;

// ============================================================================
// Configuration
// ============================================================================

/// Configuration for a substitution pass.
#[derive(Debug, Clone, Default)]
pub struct PassConfig {
    /// Probe rules in parallel. Applications stay sequential either way.
    pub parallel_probe: bool,
}

impl PassConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable the parallel probe phase.
    pub fn with_parallel_probe(mut self, parallel: bool) -> Self {
        self.parallel_probe = parallel;
        self
    }
}

// ============================================================================
// Report
// ============================================================================

/// One rule's terminal outcome for this build.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleReport {
    /// Rule identifier.
    pub rule: String,
    /// Qualified name of the rule's target type.
    pub target: String,
    /// Whether the rule was applied or skipped.
    pub outcome: RuleOutcome,
}

/// Per-rule outcomes of a completed pass, in registration order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PassReport {
    pub outcomes: Vec<RuleReport>,
}

impl PassReport {
    /// Number of rules applied.
    pub fn applied(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|r| r.outcome == RuleOutcome::Applied)
            .count()
    }

    /// Number of rules skipped.
    pub fn skipped(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|r| r.outcome == RuleOutcome::Skipped)
            .count()
    }

    /// Outcome of a specific rule, if it ran in this pass.
    pub fn outcome_of(&self, rule: &str) -> Option<RuleOutcome> {
        self.outcomes
            .iter()
            .find(|r| r.rule == rule)
            .map(|r| r.outcome)
    }
}

// ============================================================================
// Pass
// ============================================================================

/// Run the substitution pass with default configuration.
pub fn run_pass(registry: &RuleRegistry, model: &mut BuildModel) -> Result<PassReport> {
    run_pass_with_config(registry, model, &PassConfig::default())
}

/// Run the substitution pass.
///
/// Probes every rule once (in parallel when configured), applies the
/// applicable rules one at a time in registration order, and returns the
/// per-rule report. The first mutation failure aborts the pass; a build
/// either includes a substitution or fails loudly, never a silent partial
/// result.
pub fn run_pass_with_config(
    registry: &RuleRegistry,
    model: &mut BuildModel,
    config: &PassConfig,
) -> Result<PassReport> {
    let rules: Vec<_> = registry.iter().collect();

    let probed: &BuildModel = model;
    let applicable: Vec<bool> = if config.parallel_probe {
        rules
            .par_iter()
            .map(|rule| probe(probed, rule.target()))
            .collect()
    } else {
        rules
            .iter()
            .map(|rule| probe(probed, rule.target()))
            .collect()
    };

    let mut report = PassReport::default();
    for (rule, applicable) in rules.iter().zip(applicable) {
        let outcome = if applicable {
            rule.apply_unguarded(model)?;
            RuleOutcome::Applied
        } else {
            RuleOutcome::Skipped
        };
        debug!(rule = %rule.name(), target = %rule.target().type_name(), %outcome, "rule decided");
        report.outcomes.push(RuleReport {
            rule: rule.name().to_string(),
            target: rule.target().type_name().to_string(),
            outcome,
        });
    }

    info!(
        rules = rules.len(),
        applied = report.applied(),
        skipped = report.skipped(),
        "substitution pass complete"
    );
    Ok(report)
}
