//! Strategy builder core for the betting paper-trading dashboard.
//!
//! Current implemented scope:
//! - typed strategy conditions and the metric catalog
//! - condition validation: conflicts, unusual thresholds, over-restriction
//! - strategy templates and the save gate for strategy drafts
//! - HTTP routes serving validation results to the builder form

mod condition;
mod config;
mod feedback;
mod metric;
mod observability;
mod ranges;
mod service;
mod strategy;
mod templates;
#[cfg(test)]
mod test_env;
mod validator;

pub use condition::{
    parse_context, parse_entity, parse_operator, Condition, ConditionDraft, ConditionError,
    Context, Entity, Operator, OperatorClass,
};
pub use config::{
    bind_addr_from_env, metric_ranges_from_env, metric_ranges_path_from_env,
    validator_config_from_env, ConfigError, DEFAULT_BIND_ADDR,
};
pub use feedback::render_feedback_html;
pub use metric::{
    catalog, metrics_in_category, Metric, MetricCategory, MetricDefinition, ALL_METRICS,
};
pub use observability::{
    init_logging, log_app_bind, log_app_start, log_ranges_loaded, logging_config_from_env,
    LogFormat, LoggingConfig, LoggingInitError, DEFAULT_LOG_FILTER,
};
pub use ranges::{MetricRange, MetricRangeTable, RangeFit, RangeTableError};
pub use service::{
    parse_conditions, strategy_router, RejectedRequest, ValidateRequest, STRATEGY_ROUTES,
};
pub use strategy::{
    prepare_submission, StrategyDraft, StrategyKind, StrategySubmission, SubmissionError,
    TargetOutcome,
};
pub use templates::{
    all_templates, template_by_key, templates_by_category, StrategyTemplate, TemplateCategory,
    ALL_TEMPLATE_CATEGORIES,
};
pub use validator::{
    ConflictDetail, ErrorKind, Severity, StrategyValidator, SuggestedAction, ValidationError,
    ValidationResult, ValidationSuggestion, ValidationWarning, ValidatorConfig, WarningKind,
};
