//! Strategy condition validation.
//!
//! Three independent passes over the condition list:
//! - conflicts: per metric group, an empty value range or two distinct exact
//!   values. These are the only hard errors.
//! - unusual values: thresholds outside the typical band of the range table.
//! - complexity: too many conditions, or too many short lookback windows.
//!
//! Validation is pure. The validator owns its thresholds and range table and
//! can be shared across threads without locking.

use serde::Serialize;
use tracing::debug;

use crate::condition::{Condition, Context, Entity, Operator, OperatorClass};
use crate::metric::Metric;
use crate::ranges::{MetricRangeTable, RangeFit};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidatorConfig {
    /// Warn with high severity when the condition count exceeds this.
    pub high_count_threshold: usize,
    /// Warn with medium severity when the condition count exceeds this.
    pub medium_count_threshold: usize,
    /// A lookback at or below this many matches counts as short.
    pub short_lookback_max: u32,
    /// Warn when at least this many conditions use a short lookback.
    pub short_lookback_count: usize,
    /// Also flag `==` conditions whose value violates a bound on the same metric.
    pub check_equality_against_bounds: bool,
    /// Group conflicts by (entity, context, metric) instead of metric alone.
    pub group_by_subject: bool,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            high_count_threshold: 7,
            medium_count_threshold: 5,
            short_lookback_max: 3,
            short_lookback_count: 3,
            check_equality_against_bounds: false,
            group_by_subject: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Conflict,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ConflictDetail {
    EmptyRange {
        lower: f64,
        upper: f64,
    },
    MultipleExactValues {
        values: Vec<f64>,
    },
    EqualityOutsideBounds {
        value: f64,
        operator: Operator,
        bound: f64,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationError {
    pub kind: ErrorKind,
    pub metric: Metric,
    pub detail: ConflictDetail,
    pub message: String,
    pub affected_conditions: Vec<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WarningKind {
    UnusualValue,
    TooRestrictive,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationWarning {
    pub kind: WarningKind,
    pub severity: Severity,
    pub message: String,
    pub affected_conditions: Vec<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SuggestedAction {
    AdjustValue,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationSuggestion {
    pub message: String,
    pub action: Option<SuggestedAction>,
    pub condition_index: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationResult {
    pub errors: Vec<ValidationError>,
    pub warnings: Vec<ValidationWarning>,
    pub suggestions: Vec<ValidationSuggestion>,
    pub is_valid: bool,
}

impl Default for ValidationResult {
    fn default() -> Self {
        Self {
            errors: Vec::new(),
            warnings: Vec::new(),
            suggestions: Vec::new(),
            is_valid: true,
        }
    }
}

impl ValidationResult {
    pub fn has_issues(&self) -> bool {
        !(self.errors.is_empty() && self.warnings.is_empty() && self.suggestions.is_empty())
    }

    pub fn highest_severity(&self) -> Option<Severity> {
        self.warnings.iter().map(|warning| warning.severity).max()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StrategyValidator {
    config: ValidatorConfig,
    ranges: MetricRangeTable,
}

impl Default for StrategyValidator {
    fn default() -> Self {
        Self::new(ValidatorConfig::default(), MetricRangeTable::curated())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct GroupKey<'a> {
    metric: &'a Metric,
    subject: Option<(Entity, Context)>,
}

impl StrategyValidator {
    pub fn new(config: ValidatorConfig, ranges: MetricRangeTable) -> Self {
        Self { config, ranges }
    }

    pub fn config(&self) -> &ValidatorConfig {
        &self.config
    }

    pub fn ranges(&self) -> &MetricRangeTable {
        &self.ranges
    }

    pub fn validate(&self, conditions: &[Condition]) -> ValidationResult {
        let mut result = ValidationResult::default();

        if !conditions.is_empty() {
            self.check_conflicts(conditions, &mut result.errors);
            self.check_unusual_values(conditions, &mut result);
            self.check_complexity(conditions, &mut result.warnings);
        }

        result.is_valid = result.errors.is_empty();

        debug!(
            component = "strategy_validator",
            event = "validation.complete",
            conditions = conditions.len(),
            errors = result.errors.len(),
            warnings = result.warnings.len(),
            suggestions = result.suggestions.len(),
            is_valid = result.is_valid
        );

        result
    }

    fn check_conflicts(&self, conditions: &[Condition], errors: &mut Vec<ValidationError>) {
        for (key, indices) in self.group_conditions(conditions) {
            if indices.len() < 2 {
                continue;
            }

            let by_class = |class: OperatorClass| -> Vec<usize> {
                indices
                    .iter()
                    .copied()
                    .filter(|&idx| conditions[idx].class() == class)
                    .collect()
            };
            let lower = by_class(OperatorClass::LowerBound);
            let upper = by_class(OperatorClass::UpperBound);
            let equal = by_class(OperatorClass::Equality);
            let label = key.metric.label();

            if !lower.is_empty() && !upper.is_empty() {
                let tightest_lower = lower
                    .iter()
                    .map(|&idx| conditions[idx].value())
                    .fold(f64::NEG_INFINITY, f64::max);
                let tightest_upper = upper
                    .iter()
                    .map(|&idx| conditions[idx].value())
                    .fold(f64::INFINITY, f64::min);

                if tightest_lower >= tightest_upper {
                    let mut affected: Vec<usize> = lower.iter().chain(&upper).copied().collect();
                    affected.sort_unstable();
                    errors.push(ValidationError {
                        kind: ErrorKind::Conflict,
                        metric: key.metric.clone(),
                        detail: ConflictDetail::EmptyRange {
                            lower: tightest_lower,
                            upper: tightest_upper,
                        },
                        message: format!(
                            "Conflict on \"{label}\": value cannot be above {tightest_lower} \
                             and below {tightest_upper} at the same time"
                        ),
                        affected_conditions: affected,
                    });
                }
            }

            if equal.len() > 1 {
                let mut distinct: Vec<f64> = Vec::new();
                for &idx in &equal {
                    let value = conditions[idx].value();
                    if !distinct.contains(&value) {
                        distinct.push(value);
                    }
                }

                if distinct.len() > 1 {
                    let listed = distinct
                        .iter()
                        .map(|value| value.to_string())
                        .collect::<Vec<_>>()
                        .join(", ");
                    errors.push(ValidationError {
                        kind: ErrorKind::Conflict,
                        metric: key.metric.clone(),
                        detail: ConflictDetail::MultipleExactValues { values: distinct },
                        message: format!(
                            "Conflict on \"{label}\": multiple exact values ({listed})"
                        ),
                        affected_conditions: equal.clone(),
                    });
                }
            }

            if self.config.check_equality_against_bounds {
                for &eq_idx in &equal {
                    let value = conditions[eq_idx].value();
                    let violated: Vec<usize> = lower
                        .iter()
                        .chain(&upper)
                        .copied()
                        .filter(|&idx| {
                            !conditions[idx].operator().admits(value, conditions[idx].value())
                        })
                        .collect();

                    let Some(&first) = violated.first() else {
                        continue;
                    };
                    let bound = &conditions[first];
                    let mut affected = violated.clone();
                    affected.push(eq_idx);
                    affected.sort_unstable();

                    errors.push(ValidationError {
                        kind: ErrorKind::Conflict,
                        metric: key.metric.clone(),
                        detail: ConflictDetail::EqualityOutsideBounds {
                            value,
                            operator: bound.operator(),
                            bound: bound.value(),
                        },
                        message: format!(
                            "Conflict on \"{label}\": exact value {value} does not satisfy {} {}",
                            bound.operator(), bound.value()
                        ),
                        affected_conditions: affected,
                    });
                }
            }
        }
    }

    fn check_unusual_values(&self, conditions: &[Condition], result: &mut ValidationResult) {
        for (idx, condition) in conditions.iter().enumerate() {
            let Some(range) = self.ranges.get(condition.metric()) else {
                continue;
            };
            let label = condition.metric().label();
            let value = condition.value();

            let (severity, message) = match range.classify(value) {
                RangeFit::Typical => continue,
                RangeFit::Atypical => (
                    Severity::Medium,
                    format!("Value {value} for \"{label}\" is outside the typical range"),
                ),
                RangeFit::Implausible => (
                    Severity::High,
                    format!("Value {value} for \"{label}\" is highly unusual"),
                ),
            };

            result.warnings.push(ValidationWarning {
                kind: WarningKind::UnusualValue,
                severity,
                message,
                affected_conditions: vec![idx],
            });
            result.suggestions.push(ValidationSuggestion {
                message: format!(
                    "Typical values for \"{label}\": {}-{}",
                    range.typical_low, range.typical_high
                ),
                action: Some(SuggestedAction::AdjustValue),
                condition_index: Some(idx),
            });
        }
    }

    fn check_complexity(&self, conditions: &[Condition], warnings: &mut Vec<ValidationWarning>) {
        let count = conditions.len();

        if count > self.config.high_count_threshold {
            warnings.push(ValidationWarning {
                kind: WarningKind::TooRestrictive,
                severity: Severity::High,
                message: format!(
                    "{count} conditions is very restrictive, expect very few matching games"
                ),
                affected_conditions: Vec::new(),
            });
        } else if count > self.config.medium_count_threshold {
            warnings.push(ValidationWarning {
                kind: WarningKind::TooRestrictive,
                severity: Severity::Medium,
                message: format!("{count} conditions may be restrictive"),
                affected_conditions: Vec::new(),
            });
        }

        let short: Vec<usize> = conditions
            .iter()
            .enumerate()
            .filter(|(_, condition)| condition.lookback() <= self.config.short_lookback_max)
            .map(|(idx, _)| idx)
            .collect();

        if short.len() >= self.config.short_lookback_count {
            warnings.push(ValidationWarning {
                kind: WarningKind::TooRestrictive,
                severity: Severity::Medium,
                message: format!(
                    "{} conditions look at {} or fewer recent matches; \
                     short lookback windows combined may be statistically unstable",
                    short.len(),
                    self.config.short_lookback_max
                ),
                affected_conditions: short,
            });
        }
    }

    /// Groups condition indices in order of first appearance.
    fn group_conditions<'a>(&self, conditions: &'a [Condition]) -> Vec<(GroupKey<'a>, Vec<usize>)> {
        let mut groups: Vec<(GroupKey<'a>, Vec<usize>)> = Vec::new();

        for (idx, condition) in conditions.iter().enumerate() {
            let key = GroupKey {
                metric: condition.metric(),
                subject: self
                    .config
                    .group_by_subject
                    .then_some((condition.entity(), condition.context())),
            };

            match groups.iter_mut().find(|(existing, _)| *existing == key) {
                Some((_, indices)) => indices.push(idx),
                None => groups.push((key, vec![idx])),
            }
        }

        groups
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ranges::MetricRange;

    fn cond(metric: Metric, operator: Operator, value: f64) -> Condition {
        Condition::new(metric, operator, value, 5).unwrap()
    }

    fn validator_without_ranges() -> StrategyValidator {
        StrategyValidator::new(ValidatorConfig::default(), MetricRangeTable::empty())
    }

    #[test]
    fn empty_input_is_trivially_valid() {
        let result = StrategyValidator::default().validate(&[]);
        assert_eq!(result, ValidationResult::default());
        assert!(result.is_valid);
        assert!(!result.has_issues());
    }

    #[test]
    fn crossing_bounds_report_every_bound_condition() {
        let conditions = [
            cond(Metric::WinRate, Operator::Gt, 50.0),
            cond(Metric::WinRate, Operator::Ge, 65.0),
            cond(Metric::GoalsScored, Operator::Gt, 1.0),
            cond(Metric::WinRate, Operator::Lt, 60.0),
            cond(Metric::WinRate, Operator::Le, 80.0),
        ];

        let result = validator_without_ranges().validate(&conditions);

        assert!(!result.is_valid);
        assert_eq!(result.errors.len(), 1);
        let error = &result.errors[0];
        assert_eq!(error.metric, Metric::WinRate);
        assert_eq!(
            error.detail,
            ConflictDetail::EmptyRange {
                lower: 65.0,
                upper: 60.0
            }
        );
        assert_eq!(error.affected_conditions, vec![0, 1, 3, 4]);
        assert!(error.message.contains("Win Rate"));
    }

    #[test]
    fn touching_inclusive_bounds_still_conflict() {
        let conditions = [
            cond(Metric::PointsPerGame, Operator::Ge, 2.0),
            cond(Metric::PointsPerGame, Operator::Le, 2.0),
        ];
        let result = validator_without_ranges().validate(&conditions);
        assert_eq!(result.errors.len(), 1);
    }

    #[test]
    fn repeated_identical_exact_values_are_fine() {
        let same = [
            cond(Metric::DrawPercentage, Operator::Eq, 30.0),
            cond(Metric::DrawPercentage, Operator::Eq, 30.0),
        ];
        assert!(validator_without_ranges().validate(&same).is_valid);

        let different = [
            cond(Metric::DrawPercentage, Operator::Eq, 30.0),
            cond(Metric::DrawPercentage, Operator::Eq, 35.0),
            cond(Metric::DrawPercentage, Operator::Eq, 30.0),
        ];
        let result = validator_without_ranges().validate(&different);
        assert_eq!(result.errors.len(), 1);
        assert_eq!(
            result.errors[0].detail,
            ConflictDetail::MultipleExactValues {
                values: vec![30.0, 35.0]
            }
        );
        assert_eq!(result.errors[0].affected_conditions, vec![0, 1, 2]);
    }

    #[test]
    fn equality_against_bounds_is_ignored_by_default() {
        let conditions = [
            cond(Metric::GoalsScored, Operator::Eq, 5.0),
            cond(Metric::GoalsScored, Operator::Lt, 3.0),
        ];
        let result = validator_without_ranges().validate(&conditions);
        assert!(result.is_valid);
    }

    #[test]
    fn equality_against_bounds_is_flagged_when_enabled() {
        let config = ValidatorConfig {
            check_equality_against_bounds: true,
            ..ValidatorConfig::default()
        };
        let validator = StrategyValidator::new(config, MetricRangeTable::empty());

        let conditions = [
            cond(Metric::GoalsScored, Operator::Gt, 1.0),
            cond(Metric::GoalsScored, Operator::Eq, 5.0),
            cond(Metric::GoalsScored, Operator::Lt, 3.0),
        ];
        let result = validator.validate(&conditions);

        assert!(!result.is_valid);
        assert_eq!(result.errors.len(), 1);
        assert_eq!(
            result.errors[0].detail,
            ConflictDetail::EqualityOutsideBounds {
                value: 5.0,
                operator: Operator::Lt,
                bound: 3.0
            }
        );
        assert_eq!(result.errors[0].affected_conditions, vec![1, 2]);

        let satisfied = [
            cond(Metric::GoalsScored, Operator::Ge, 2.0),
            cond(Metric::GoalsScored, Operator::Eq, 2.0),
        ];
        assert!(validator.validate(&satisfied).is_valid);
    }

    #[test]
    fn subject_grouping_separates_home_and_away_constraints() {
        let conditions = [
            cond(Metric::WinRate, Operator::Gt, 60.0)
                .with_subject(Entity::HomeTeam, Context::Home),
            cond(Metric::WinRate, Operator::Lt, 40.0)
                .with_subject(Entity::AwayTeam, Context::Away),
        ];

        assert!(!validator_without_ranges().validate(&conditions).is_valid);

        let by_subject = StrategyValidator::new(
            ValidatorConfig {
                group_by_subject: true,
                ..ValidatorConfig::default()
            },
            MetricRangeTable::empty(),
        );
        assert!(by_subject.validate(&conditions).is_valid);
    }

    #[test]
    fn unusual_values_follow_the_range_table() {
        let ranges = MetricRangeTable::empty()
            .with_range(Metric::AwayForm, MetricRange::new(0.0, 3.0, 1.0, 2.0))
            .unwrap();
        let validator = StrategyValidator::new(ValidatorConfig::default(), ranges);

        let conditions = [
            cond(Metric::AwayForm, Operator::Gt, 1.5),
            cond(Metric::AwayForm, Operator::Gt, 2.5),
            cond(Metric::AwayForm, Operator::Gt, 3.5),
            cond(Metric::WinRate, Operator::Gt, 99.0),
        ];
        let result = validator.validate(&conditions);

        assert!(result.is_valid);
        assert_eq!(result.warnings.len(), 2);
        assert_eq!(result.warnings[0].severity, Severity::Medium);
        assert_eq!(result.warnings[0].affected_conditions, vec![1]);
        assert_eq!(result.warnings[1].severity, Severity::High);
        assert_eq!(result.warnings[1].affected_conditions, vec![2]);
        assert_eq!(result.suggestions.len(), 2);
        assert_eq!(result.suggestions[0].message, "Typical values for \"Away Form\": 1-2");
        assert_eq!(result.suggestions[1].condition_index, Some(2));
    }

    #[test]
    fn count_warnings_escalate_with_thresholds() {
        let validator = validator_without_ranges();
        let many = |n: usize| -> Vec<Condition> {
            (0..n)
                .map(|i| cond(Metric::Other(format!("m{i}")), Operator::Gt, 1.0))
                .collect()
        };

        assert!(validator.validate(&many(5)).warnings.is_empty());
        for n in [6, 7] {
            let result = validator.validate(&many(n));
            assert_eq!(result.warnings.len(), 1);
            assert_eq!(result.warnings[0].severity, Severity::Medium);
        }
        let result = validator.validate(&many(8));
        assert_eq!(result.warnings.len(), 1);
        assert_eq!(result.warnings[0].severity, Severity::High);
        assert_eq!(result.highest_severity(), Some(Severity::High));
    }

    #[test]
    fn short_lookbacks_add_an_independent_warning() {
        let validator = validator_without_ranges();
        let conditions: Vec<Condition> = (0..8)
            .map(|i| {
                let lookback = if i < 3 { 3 } else { 10 };
                Condition::new(Metric::Other(format!("m{i}")), Operator::Gt, 1.0, lookback)
                    .unwrap()
            })
            .collect();

        let result = validator.validate(&conditions);
        assert_eq!(result.warnings.len(), 2);
        assert_eq!(result.warnings[0].severity, Severity::High);
        assert_eq!(result.warnings[1].kind, WarningKind::TooRestrictive);
        assert_eq!(result.warnings[1].severity, Severity::Medium);
        assert_eq!(result.warnings[1].affected_conditions, vec![0, 1, 2]);

        let two_short = &conditions[1..4];
        assert!(validator.validate(two_short).warnings.is_empty());
    }

    #[test]
    fn error_order_follows_first_appearance_of_each_metric() {
        let conditions = [
            cond(Metric::GoalsConceded, Operator::Gt, 2.0),
            cond(Metric::WinRate, Operator::Gt, 70.0),
            cond(Metric::WinRate, Operator::Lt, 50.0),
            cond(Metric::GoalsConceded, Operator::Lt, 1.0),
        ];
        let result = validator_without_ranges().validate(&conditions);
        let metrics: Vec<&Metric> = result.errors.iter().map(|e| &e.metric).collect();
        assert_eq!(metrics, vec![&Metric::GoalsConceded, &Metric::WinRate]);
    }
}
