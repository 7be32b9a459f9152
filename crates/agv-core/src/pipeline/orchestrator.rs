//! The per-document run loop.
//!
//! A document moves through [`RunState`]s: the planner picks a tool order,
//! each tool's candidates are normalized, validated and appended, and after
//! every tool the cumulative list is merged and scored. The loop stops as
//! soon as the score reaches the threshold or the plan runs out.

use indexmap::IndexMap;
use tracing::{debug, info};

use super::merge::merge_candidates;
use super::normalize::normalize_candidate;
use super::planner;
use super::scoring::completeness_score;
use super::validate::validate_candidate;
use crate::error::{AgvError, Result};
use crate::extract::{self, FieldOracle, GENERIC_FEATURES};
use crate::ingest::Document;
use crate::models::{Candidate, CanonicalSpec, FieldValue, Tool};

/// Runs a single tool over a document.
pub trait Toolbox {
    /// Candidates proposed by `tool`. Tools do not fail; a tool with nothing
    /// to say returns empty or null-valued candidates.
    fn run(&self, tool: Tool, document: &Document) -> Vec<Candidate>;

    /// Whether the model-assisted tool has a backend to call.
    fn has_model_backend(&self) -> bool;
}

/// The production toolbox: regex extractors plus an optional model oracle.
#[derive(Default)]
pub struct ExtractionToolbox {
    oracle: Option<Box<dyn FieldOracle>>,
}

impl ExtractionToolbox {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_oracle(mut self, oracle: Option<Box<dyn FieldOracle>>) -> Self {
        self.oracle = oracle;
        self
    }
}

fn text_row(row: IndexMap<String, String>) -> IndexMap<String, FieldValue> {
    row.into_iter()
        .map(|(k, v)| (k, FieldValue::Text(v)))
        .collect()
}

impl Toolbox for ExtractionToolbox {
    fn run(&self, tool: Tool, document: &Document) -> Vec<Candidate> {
        let id = document.id.as_str();
        let text = document.text.as_str();

        match tool {
            Tool::VendorPatterns => extract::extract_vendor_rows(text)
                .into_iter()
                .map(|row| Candidate::from_flat(text_row(row), id, tool))
                .collect(),
            Tool::KeyValue => {
                vec![Candidate::from_key_values(extract::extract_key_values(text), id, tool)]
            }
            Tool::GenericLabels => {
                let row = extract::extract_features(text, &GENERIC_FEATURES)
                    .into_iter()
                    .map(|(k, v)| (k, FieldValue::from(v)))
                    .collect();
                vec![Candidate::from_flat(row, id, tool)]
            }
            Tool::ModelAssisted => {
                let row = match &self.oracle {
                    Some(oracle) => {
                        debug!("Asking {} backend for {}", oracle.name(), id);
                        oracle.fill(text)
                    }
                    None => IndexMap::new(),
                };
                vec![Candidate::from_flat(row, id, tool)]
            }
        }
    }

    fn has_model_backend(&self) -> bool {
        self.oracle.is_some()
    }
}

/// Why the loop stopped.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StopReason {
    /// The completeness score reached the threshold after `step`.
    ThresholdMet { step: usize, score: f64 },
    /// Every planned tool ran.
    PlanExhausted { steps: usize },
}

impl StopReason {
    /// Number of tools that ran.
    pub fn steps(&self) -> usize {
        match self {
            StopReason::ThresholdMet { step, .. } => *step,
            StopReason::PlanExhausted { steps } => *steps,
        }
    }
}

/// Position of a document in the run loop. Steps are 1-indexed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RunState {
    Planning,
    RunningTool { step: usize },
    Merging { step: usize },
    Stopped(StopReason),
}

/// Transition taken after merging and scoring `step`.
pub fn advance(step: usize, plan_len: usize, score: f64, threshold: f64) -> RunState {
    if score >= threshold {
        RunState::Stopped(StopReason::ThresholdMet { step, score })
    } else if step >= plan_len {
        RunState::Stopped(StopReason::PlanExhausted { steps: step })
    } else {
        RunState::RunningTool { step: step + 1 }
    }
}

/// Result of running one document.
#[derive(Debug, Clone, PartialEq)]
pub struct RunOutcome {
    /// Identifier of the document that was run.
    pub document_id: String,
    /// Merged record; entirely empty when no tool produced a candidate.
    pub spec: CanonicalSpec,
    pub score: f64,
    pub steps: usize,
    pub stop: StopReason,
}

/// Drives tools over documents until the record is complete enough.
pub struct Orchestrator<T: Toolbox> {
    toolbox: T,
    min_completeness: f64,
    max_steps: usize,
}

impl<T: Toolbox> Orchestrator<T> {
    /// Create an orchestrator; the threshold must lie within [0, 1].
    pub fn new(toolbox: T, min_completeness: f64, max_steps: usize) -> Result<Self> {
        if !(0.0..=1.0).contains(&min_completeness) {
            return Err(AgvError::Config(format!(
                "min_completeness must be within [0, 1], got {}",
                min_completeness
            )));
        }
        Ok(Self {
            toolbox,
            min_completeness,
            max_steps,
        })
    }

    pub fn toolbox(&self) -> &T {
        &self.toolbox
    }

    /// Tool order for a document after backend filtering and the step budget.
    pub fn plan_for(&self, document: &Document) -> Vec<Tool> {
        let mut tools = planner::plan(&document.text);
        if !self.toolbox.has_model_backend() {
            tools.retain(|t| !t.needs_model_backend());
        }
        tools.truncate(self.max_steps);
        tools
    }

    /// Process one document into a canonical record.
    pub fn run(&self, document: &Document) -> RunOutcome {
        info!("Processing: {}", document.id);

        let mut plan = Vec::new();
        let mut candidates: Vec<Candidate> = Vec::new();
        let mut score = 0.0;
        let mut state = RunState::Planning;

        let stop = loop {
            state = match state {
                RunState::Planning => {
                    plan = self.plan_for(document);
                    debug!("Plan for {}: {:?}", document.id, plan);
                    if plan.is_empty() {
                        RunState::Stopped(StopReason::PlanExhausted { steps: 0 })
                    } else {
                        RunState::RunningTool { step: 1 }
                    }
                }
                RunState::RunningTool { step } => {
                    let tool = plan[step - 1];
                    info!("Step {}/{} - tool={}", step, plan.len(), tool);
                    let produced = self.toolbox.run(tool, document);
                    debug!("{} produced {} candidate(s)", tool, produced.len());
                    candidates.extend(
                        produced
                            .into_iter()
                            .map(normalize_candidate)
                            .map(validate_candidate),
                    );
                    RunState::Merging { step }
                }
                RunState::Merging { step } => {
                    let trial = merge_candidates(&candidates);
                    score = completeness_score(&trial);
                    info!("Completeness after {}: {:.2}", plan[step - 1], score);
                    advance(step, plan.len(), score, self.min_completeness)
                }
                RunState::Stopped(reason) => break reason,
            };
        };

        if let StopReason::ThresholdMet { score, .. } = stop {
            info!(
                "Threshold reached ({:.2} >= {:.2}).",
                score, self.min_completeness
            );
        }

        RunOutcome {
            document_id: document.id.clone(),
            spec: merge_candidates(&candidates),
            score,
            steps: stop.steps(),
            stop,
        }
    }
}
