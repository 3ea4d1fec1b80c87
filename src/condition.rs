//! Typed strategy conditions.
//!
//! A [`Condition`] can only be built through [`Condition::new`] or from a
//! loosely-typed [`ConditionDraft`], so anything that reaches the validator
//! already has a known operator, a finite threshold and a positive lookback.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::metric::Metric;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operator {
    #[serde(rename = ">")]
    Gt,
    #[serde(rename = ">=")]
    Ge,
    #[serde(rename = "<")]
    Lt,
    #[serde(rename = "<=")]
    Le,
    #[serde(rename = "==", alias = "=")]
    Eq,
}

/// Which side of the value range an operator constrains.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperatorClass {
    LowerBound,
    UpperBound,
    Equality,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Entity {
    #[default]
    HomeTeam,
    AwayTeam,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Context {
    Home,
    Away,
    #[default]
    Overall,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ConditionDraft")]
pub struct Condition {
    entity: Entity,
    context: Context,
    metric: Metric,
    operator: Operator,
    value: f64,
    #[serde(rename = "last_n_games")]
    lookback: u32,
}

/// Condition as submitted by the builder form, before any checks.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ConditionDraft {
    #[serde(default)]
    pub entity: Option<String>,
    #[serde(default)]
    pub context: Option<String>,
    pub metric: String,
    pub operator: String,
    pub value: f64,
    pub last_n_games: i64,
}

#[derive(Debug, Error, PartialEq)]
pub enum ConditionError {
    #[error("metric identifier is empty")]
    EmptyMetric,
    #[error("unsupported operator: {0}")]
    UnsupportedOperator(String),
    #[error("threshold must be a finite number, got {0}")]
    NonFiniteValue(f64),
    #[error("lookback must be a positive number of matches, got {0}")]
    InvalidLookback(i64),
    #[error("unsupported entity: {0}")]
    UnsupportedEntity(String),
    #[error("unsupported context: {0}")]
    UnsupportedContext(String),
}

pub fn parse_operator(input: &str) -> Result<Operator, ConditionError> {
    match input.trim() {
        ">" => Ok(Operator::Gt),
        ">=" => Ok(Operator::Ge),
        "<" => Ok(Operator::Lt),
        "<=" => Ok(Operator::Le),
        "==" | "=" => Ok(Operator::Eq),
        other => Err(ConditionError::UnsupportedOperator(other.to_string())),
    }
}

pub fn parse_entity(input: &str) -> Result<Entity, ConditionError> {
    match input.trim() {
        "home_team" => Ok(Entity::HomeTeam),
        "away_team" => Ok(Entity::AwayTeam),
        other => Err(ConditionError::UnsupportedEntity(other.to_string())),
    }
}

pub fn parse_context(input: &str) -> Result<Context, ConditionError> {
    match input.trim() {
        "home" => Ok(Context::Home),
        "away" => Ok(Context::Away),
        "overall" => Ok(Context::Overall),
        other => Err(ConditionError::UnsupportedContext(other.to_string())),
    }
}

impl Operator {
    pub fn symbol(self) -> &'static str {
        match self {
            Self::Gt => ">",
            Self::Ge => ">=",
            Self::Lt => "<",
            Self::Le => "<=",
            Self::Eq => "==",
        }
    }

    pub fn class(self) -> OperatorClass {
        match self {
            Self::Gt | Self::Ge => OperatorClass::LowerBound,
            Self::Lt | Self::Le => OperatorClass::UpperBound,
            Self::Eq => OperatorClass::Equality,
        }
    }

    /// Whether `value` satisfies `value <op> threshold`.
    pub fn admits(self, value: f64, threshold: f64) -> bool {
        match self {
            Self::Gt => value > threshold,
            Self::Ge => value >= threshold,
            Self::Lt => value < threshold,
            Self::Le => value <= threshold,
            Self::Eq => value == threshold,
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl Condition {
    pub fn new(
        metric: Metric,
        operator: Operator,
        value: f64,
        lookback: u32,
    ) -> Result<Self, ConditionError> {
        if metric.id().is_empty() {
            return Err(ConditionError::EmptyMetric);
        }
        if !value.is_finite() {
            return Err(ConditionError::NonFiniteValue(value));
        }
        if lookback == 0 {
            return Err(ConditionError::InvalidLookback(0));
        }

        Ok(Self {
            entity: Entity::default(),
            context: Context::default(),
            metric,
            operator,
            value,
            lookback,
        })
    }

    /// Skips the checks in [`Condition::new`]; only for literals known to pass them.
    pub(crate) fn from_parts(
        entity: Entity,
        context: Context,
        metric: Metric,
        operator: Operator,
        value: f64,
        lookback: u32,
    ) -> Self {
        Self {
            entity,
            context,
            metric,
            operator,
            value,
            lookback,
        }
    }

    pub fn with_subject(mut self, entity: Entity, context: Context) -> Self {
        self.entity = entity;
        self.context = context;
        self
    }

    pub fn entity(&self) -> Entity {
        self.entity
    }

    pub fn context(&self) -> Context {
        self.context
    }

    pub fn metric(&self) -> &Metric {
        &self.metric
    }

    pub fn operator(&self) -> Operator {
        self.operator
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    /// Number of recent matches the metric is computed over, always >= 1.
    pub fn lookback(&self) -> u32 {
        self.lookback
    }

    pub fn class(&self) -> OperatorClass {
        self.operator.class()
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} (last {})",
            self.metric.label(),
            self.operator,
            self.value,
            self.lookback
        )
    }
}

impl TryFrom<ConditionDraft> for Condition {
    type Error = ConditionError;

    fn try_from(draft: ConditionDraft) -> Result<Self, Self::Error> {
        let metric = draft.metric.trim();
        if metric.is_empty() {
            return Err(ConditionError::EmptyMetric);
        }
        let operator = parse_operator(&draft.operator)?;
        let lookback = u32::try_from(draft.last_n_games)
            .ok()
            .filter(|n| *n > 0)
            .ok_or(ConditionError::InvalidLookback(draft.last_n_games))?;
        let entity = match draft.entity.as_deref() {
            Some(raw) => parse_entity(raw)?,
            None => Entity::default(),
        };
        let context = match draft.context.as_deref() {
            Some(raw) => parse_context(raw)?,
            None => Context::default(),
        };

        Ok(Condition::new(Metric::parse(metric), operator, draft.value, lookback)?
            .with_subject(entity, context))
    }
}
