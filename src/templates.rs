//! Built-in strategy templates for a quick start in the builder.

use serde::Serialize;

use crate::condition::{Condition, Context, Entity, Operator};
use crate::metric::Metric;
use crate::strategy::{StrategyDraft, TargetOutcome};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TemplateCategory {
    Value,
    Goals,
    Form,
    Defensive,
    Special,
}

pub const ALL_TEMPLATE_CATEGORIES: [TemplateCategory; 5] = [
    TemplateCategory::Value,
    TemplateCategory::Goals,
    TemplateCategory::Form,
    TemplateCategory::Defensive,
    TemplateCategory::Special,
];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StrategyTemplate {
    pub key: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub category: TemplateCategory,
    pub category_label: &'static str,
    pub target_outcome: TargetOutcome,
    pub conditions: Vec<Condition>,
}

impl TemplateCategory {
    pub fn label(self) -> &'static str {
        match self {
            Self::Value => "Value Betting",
            Self::Goals => "Goals",
            Self::Form => "Form",
            Self::Defensive => "Defensive",
            Self::Special => "Special",
        }
    }
}

impl StrategyTemplate {
    pub fn to_draft(&self) -> StrategyDraft {
        let mut draft = StrategyDraft::new(self.name, self.target_outcome)
            .with_conditions(self.conditions.clone());
        draft.description = Some(self.description.to_string());
        draft
    }
}

// Template values are literals known to pass `Condition::new`.
fn rule(
    entity: Entity,
    context: Context,
    metric: Metric,
    operator: Operator,
    value: f64,
    lookback: u32,
) -> Condition {
    Condition::from_parts(entity, context, metric, operator, value, lookback)
}

pub fn all_templates() -> Vec<StrategyTemplate> {
    use Context::{Away, Home, Overall};
    use Entity::{AwayTeam, HomeTeam};

    vec![
        StrategyTemplate {
            key: "value_betting",
            name: "Value Betting - Favourites",
            description: "Backs in-form favourites at attractive odds",
            category: TemplateCategory::Value,
            category_label: TemplateCategory::Value.label(),
            target_outcome: TargetOutcome::HomeWin,
            conditions: vec![
                rule(HomeTeam, Home, Metric::WinRate, Operator::Gt, 60.0, 5),
                rule(HomeTeam, Home, Metric::GoalsScored, Operator::Gt, 1.5, 5),
            ],
        },
        StrategyTemplate {
            key: "btts_specialist",
            name: "BTTS Specialist",
            description: "Both teams to score, backed by a strong scoring history",
            category: TemplateCategory::Goals,
            category_label: TemplateCategory::Goals.label(),
            target_outcome: TargetOutcome::BttsYes,
            conditions: vec![
                rule(HomeTeam, Overall, Metric::BttsPercentage, Operator::Gt, 65.0, 10),
                rule(AwayTeam, Overall, Metric::BttsPercentage, Operator::Gt, 65.0, 10),
                rule(HomeTeam, Overall, Metric::GoalsScored, Operator::Gt, 1.2, 10),
            ],
        },
        StrategyTemplate {
            key: "over_goals",
            name: "Over 2.5 Goals Hunter",
            description: "High-scoring matches between attacking sides",
            category: TemplateCategory::Goals,
            category_label: TemplateCategory::Goals.label(),
            target_outcome: TargetOutcome::Over25,
            conditions: vec![
                rule(HomeTeam, Overall, Metric::GoalsScored, Operator::Gt, 2.0, 5),
                rule(AwayTeam, Overall, Metric::GoalsScored, Operator::Gt, 1.5, 5),
                rule(HomeTeam, Overall, Metric::GoalsConceded, Operator::Gt, 1.0, 5),
            ],
        },
        StrategyTemplate {
            key: "defensive_fortress",
            name: "Defensive Fortress",
            description: "Under 2.5 between sides with solid defences",
            category: TemplateCategory::Defensive,
            category_label: TemplateCategory::Defensive.label(),
            target_outcome: TargetOutcome::Under25,
            conditions: vec![
                rule(HomeTeam, Overall, Metric::GoalsConceded, Operator::Lt, 0.8, 10),
                rule(AwayTeam, Overall, Metric::GoalsConceded, Operator::Lt, 1.0, 10),
                rule(
                    HomeTeam,
                    Overall,
                    Metric::CleanSheetsPercentage,
                    Operator::Gt,
                    40.0,
                    10,
                ),
            ],
        },
        StrategyTemplate {
            key: "away_underdog",
            name: "Away Underdog Value",
            description: "Visitors in good form against a beatable host",
            category: TemplateCategory::Value,
            category_label: TemplateCategory::Value.label(),
            target_outcome: TargetOutcome::AwayWin,
            conditions: vec![
                rule(AwayTeam, Away, Metric::WinRate, Operator::Gt, 50.0, 5),
                rule(AwayTeam, Away, Metric::GoalsScored, Operator::Gt, 1.3, 5),
                rule(HomeTeam, Home, Metric::WinRate, Operator::Lt, 60.0, 5),
            ],
        },
        StrategyTemplate {
            key: "form_momentum",
            name: "Form Momentum",
            description: "Hosts on an excellent recent run",
            category: TemplateCategory::Form,
            category_label: TemplateCategory::Form.label(),
            target_outcome: TargetOutcome::HomeWin,
            conditions: vec![
                rule(HomeTeam, Overall, Metric::WinRate, Operator::Gt, 70.0, 3),
                rule(HomeTeam, Overall, Metric::PointsPerGame, Operator::Gt, 2.5, 3),
            ],
        },
        StrategyTemplate {
            key: "draw_specialist",
            name: "Draw Specialist",
            description: "Evenly matched sides that tend to draw",
            category: TemplateCategory::Special,
            category_label: TemplateCategory::Special.label(),
            target_outcome: TargetOutcome::Draw,
            conditions: vec![
                rule(HomeTeam, Overall, Metric::DrawPercentage, Operator::Gt, 35.0, 10),
                rule(AwayTeam, Overall, Metric::DrawPercentage, Operator::Gt, 35.0, 10),
                rule(HomeTeam, Overall, Metric::WinRate, Operator::Lt, 55.0, 10),
            ],
        },
    ]
}

pub fn template_by_key(key: &str) -> Option<StrategyTemplate> {
    all_templates()
        .into_iter()
        .find(|template| template.key == key)
}

pub fn templates_by_category(category: TemplateCategory) -> Vec<StrategyTemplate> {
    all_templates()
        .into_iter()
        .filter(|template| template.category == category)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validator::{Severity, StrategyValidator};

    #[test]
    fn every_template_is_saveable_under_default_validator() {
        let validator = StrategyValidator::default();
        for template in all_templates() {
            let result = validator.validate(&template.conditions);
            assert!(result.is_valid, "{} should validate", template.key);
        }
    }

    #[test]
    fn template_conditions_pass_constructor_checks() {
        for template in all_templates() {
            for condition in &template.conditions {
                let rebuilt = Condition::new(
                    condition.metric().clone(),
                    condition.operator(),
                    condition.value(),
                    condition.lookback(),
                )
                .expect("template literal should be a valid condition")
                .with_subject(condition.entity(), condition.context());
                assert_eq!(&rebuilt, condition);
            }
        }
    }

    #[test]
    fn form_momentum_points_threshold_is_flagged_as_atypical() {
        let template = template_by_key("form_momentum").unwrap();
        let result = StrategyValidator::default().validate(&template.conditions);
        assert_eq!(result.warnings.len(), 1);
        assert_eq!(result.warnings[0].severity, Severity::Medium);
        assert_eq!(result.warnings[0].affected_conditions, vec![1]);
    }

    #[test]
    fn every_template_carries_its_category_label() {
        for template in all_templates() {
            assert_eq!(template.category_label, template.category.label());
        }
        let draw = template_by_key("draw_specialist").unwrap();
        assert_eq!(draw.category_label, "Special");
        let value = template_by_key("value_betting").unwrap();
        assert_eq!(value.category_label, "Value Betting");
    }

    #[test]
    fn lookup_by_key_and_category() {
        assert!(template_by_key("draw_specialist").is_some());
        assert!(template_by_key("martingale").is_none());

        let total: usize = ALL_TEMPLATE_CATEGORIES
            .into_iter()
            .map(|category| templates_by_category(category).len())
            .sum();
        assert_eq!(total, all_templates().len());
        assert_eq!(templates_by_category(TemplateCategory::Goals).len(), 2);
    }

    #[test]
    fn template_converts_to_named_draft() {
        let draft = template_by_key("btts_specialist").unwrap().to_draft();
        assert_eq!(draft.name, "BTTS Specialist");
        assert_eq!(draft.target_outcome, TargetOutcome::BttsYes);
        assert_eq!(draft.conditions.len(), 3);
        assert!(draft.description.is_some());
    }
}
