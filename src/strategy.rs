//! Strategy drafts and the save gate in front of the external strategy store.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::condition::Condition;
use crate::validator::{StrategyValidator, ValidationResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TargetOutcome {
    #[serde(rename = "home_win")]
    HomeWin,
    #[serde(rename = "away_win")]
    AwayWin,
    #[serde(rename = "draw")]
    Draw,
    #[serde(rename = "btts_yes")]
    BttsYes,
    #[serde(rename = "btts_no")]
    BttsNo,
    #[serde(rename = "over_1.5")]
    Over15,
    #[serde(rename = "over_2.5")]
    Over25,
    #[serde(rename = "over_3.5")]
    Over35,
    #[serde(rename = "under_1.5")]
    Under15,
    #[serde(rename = "under_2.5")]
    Under25,
    #[serde(rename = "under_3.5")]
    Under35,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyKind {
    #[default]
    Single,
    Accumulator,
}

/// The document submitted to the strategy store on save.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategyDraft {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default = "default_target_outcome")]
    pub target_outcome: TargetOutcome,
    #[serde(default, rename = "strategy_type")]
    pub kind: StrategyKind,
    #[serde(default = "default_is_active")]
    pub is_active: bool,
    #[serde(default)]
    pub leagues: Option<Vec<String>>,
    #[serde(default)]
    pub teams: Option<Vec<String>>,
    #[serde(default)]
    pub conditions: Vec<Condition>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StrategySubmission {
    pub strategy: StrategyDraft,
    pub advisories: ValidationResult,
}

#[derive(Debug, Error, PartialEq)]
pub enum SubmissionError {
    #[error("strategy name is empty")]
    EmptyName,
    #[error("strategy has {} conflicting condition set(s)", .0.errors.len())]
    Blocked(ValidationResult),
}

impl StrategyDraft {
    pub fn new(name: impl Into<String>, target_outcome: TargetOutcome) -> Self {
        Self {
            name: name.into(),
            description: None,
            target_outcome,
            kind: StrategyKind::Single,
            is_active: true,
            leagues: None,
            teams: None,
            conditions: Vec::new(),
        }
    }

    pub fn with_conditions(mut self, conditions: Vec<Condition>) -> Self {
        self.conditions = conditions;
        self
    }
}

impl StrategySubmission {
    pub fn to_document_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.strategy)
    }
}

/// Validates a draft and decides whether it may be saved.
///
/// Conflicts block the save. Warnings and suggestions travel with the
/// submission as advisories but are not part of the stored document.
pub fn prepare_submission(
    validator: &StrategyValidator,
    draft: StrategyDraft,
) -> Result<StrategySubmission, SubmissionError> {
    if draft.name.trim().is_empty() {
        return Err(SubmissionError::EmptyName);
    }

    let result = validator.validate(&draft.conditions);
    if !result.is_valid {
        info!(
            component = "strategy",
            event = "submission.blocked",
            name = %draft.name,
            errors = result.errors.len()
        );
        return Err(SubmissionError::Blocked(result));
    }

    info!(
        component = "strategy",
        event = "submission.ready",
        name = %draft.name,
        conditions = draft.conditions.len(),
        warnings = result.warnings.len()
    );

    Ok(StrategySubmission {
        strategy: draft,
        advisories: result,
    })
}

fn default_target_outcome() -> TargetOutcome {
    TargetOutcome::HomeWin
}

fn default_is_active() -> bool {
    true
}
