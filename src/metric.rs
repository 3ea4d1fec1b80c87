//! Metric catalog offered by the strategy builder.
//!
//! Identifiers are normalized on parse: surrounding whitespace is dropped,
//! case is folded and dotted line spellings (`over_2.5_percentage`) map onto
//! the underscored canonical id (`over_2_5_percentage`). Anything else is
//! kept verbatim as [`Metric::Other`].

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::condition::Operator;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Metric {
    WinRate,
    PointsPerGame,
    DrawPercentage,
    LossPercentage,
    GoalsScored,
    GoalsFirstHalf,
    GoalsSecondHalf,
    ScoringFrequency,
    GoalsConceded,
    CleanSheetsPercentage,
    DefensiveSolidity,
    BttsPercentage,
    Over25Percentage,
    Over15Percentage,
    Under25Percentage,
    TotalGoalsAvg,
    HomeAdvantage,
    AwayForm,
    Other(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricCategory {
    Form,
    Attack,
    Defense,
    GoalsMarkets,
    HomeAway,
}

pub const ALL_METRICS: [Metric; 18] = [
    Metric::WinRate,
    Metric::PointsPerGame,
    Metric::DrawPercentage,
    Metric::LossPercentage,
    Metric::GoalsScored,
    Metric::GoalsFirstHalf,
    Metric::GoalsSecondHalf,
    Metric::ScoringFrequency,
    Metric::GoalsConceded,
    Metric::CleanSheetsPercentage,
    Metric::DefensiveSolidity,
    Metric::BttsPercentage,
    Metric::Over25Percentage,
    Metric::Over15Percentage,
    Metric::Under25Percentage,
    Metric::TotalGoalsAvg,
    Metric::HomeAdvantage,
    Metric::AwayForm,
];

/// Display record for one catalog entry, as served to the builder form.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricDefinition {
    pub id: String,
    pub label: &'static str,
    pub description: &'static str,
    pub unit: &'static str,
    pub category: MetricCategory,
    pub category_label: &'static str,
    pub default_operator: Operator,
    pub default_value: f64,
}

impl Metric {
    pub fn parse(input: &str) -> Self {
        let normalized = input.trim().to_ascii_lowercase().replace('.', "_");
        match normalized.as_str() {
            "win_rate" => Self::WinRate,
            "points_per_game" => Self::PointsPerGame,
            "draw_percentage" => Self::DrawPercentage,
            "loss_percentage" => Self::LossPercentage,
            "goals_scored" => Self::GoalsScored,
            "goals_first_half" => Self::GoalsFirstHalf,
            "goals_second_half" => Self::GoalsSecondHalf,
            "scoring_frequency" => Self::ScoringFrequency,
            "goals_conceded" => Self::GoalsConceded,
            "clean_sheets_percentage" => Self::CleanSheetsPercentage,
            "defensive_solidity" => Self::DefensiveSolidity,
            "btts_percentage" => Self::BttsPercentage,
            "over_2_5_percentage" => Self::Over25Percentage,
            "over_1_5_percentage" => Self::Over15Percentage,
            "under_2_5_percentage" => Self::Under25Percentage,
            "total_goals_avg" => Self::TotalGoalsAvg,
            "home_advantage" => Self::HomeAdvantage,
            "away_form" => Self::AwayForm,
            _ => Self::Other(input.trim().to_string()),
        }
    }

    pub fn id(&self) -> &str {
        match self {
            Self::WinRate => "win_rate",
            Self::PointsPerGame => "points_per_game",
            Self::DrawPercentage => "draw_percentage",
            Self::LossPercentage => "loss_percentage",
            Self::GoalsScored => "goals_scored",
            Self::GoalsFirstHalf => "goals_first_half",
            Self::GoalsSecondHalf => "goals_second_half",
            Self::ScoringFrequency => "scoring_frequency",
            Self::GoalsConceded => "goals_conceded",
            Self::CleanSheetsPercentage => "clean_sheets_percentage",
            Self::DefensiveSolidity => "defensive_solidity",
            Self::BttsPercentage => "btts_percentage",
            Self::Over25Percentage => "over_2_5_percentage",
            Self::Over15Percentage => "over_1_5_percentage",
            Self::Under25Percentage => "under_2_5_percentage",
            Self::TotalGoalsAvg => "total_goals_avg",
            Self::HomeAdvantage => "home_advantage",
            Self::AwayForm => "away_form",
            Self::Other(raw) => raw,
        }
    }

    /// Human label; unknown metrics fall back to their raw id.
    pub fn label(&self) -> &str {
        match self {
            Self::Other(raw) => raw,
            known => static_label(known),
        }
    }

    pub fn category(&self) -> Option<MetricCategory> {
        match self {
            Self::WinRate | Self::PointsPerGame | Self::DrawPercentage | Self::LossPercentage => {
                Some(MetricCategory::Form)
            }
            Self::GoalsScored
            | Self::GoalsFirstHalf
            | Self::GoalsSecondHalf
            | Self::ScoringFrequency => Some(MetricCategory::Attack),
            Self::GoalsConceded | Self::CleanSheetsPercentage | Self::DefensiveSolidity => {
                Some(MetricCategory::Defense)
            }
            Self::BttsPercentage
            | Self::Over25Percentage
            | Self::Over15Percentage
            | Self::Under25Percentage
            | Self::TotalGoalsAvg => Some(MetricCategory::GoalsMarkets),
            Self::HomeAdvantage | Self::AwayForm => Some(MetricCategory::HomeAway),
            Self::Other(_) => None,
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, Self::Other(_))
    }

    pub fn definition(&self) -> Option<MetricDefinition> {
        let (description, unit, default_operator, default_value) = match self {
            Self::WinRate => ("Share of matches won", "%", Operator::Gt, 60.0),
            Self::PointsPerGame => ("Average league points per match", "pts", Operator::Gt, 2.0),
            Self::DrawPercentage => ("Share of matches drawn", "%", Operator::Gt, 30.0),
            Self::LossPercentage => ("Share of matches lost", "%", Operator::Lt, 30.0),
            Self::GoalsScored => ("Average goals scored per match", "goals", Operator::Gt, 1.5),
            Self::GoalsFirstHalf => ("Average first-half goals", "goals", Operator::Gt, 0.8),
            Self::GoalsSecondHalf => ("Average second-half goals", "goals", Operator::Gt, 1.0),
            Self::ScoringFrequency => (
                "Share of matches with at least one goal scored",
                "%",
                Operator::Gt,
                70.0,
            ),
            Self::GoalsConceded => (
                "Average goals conceded per match",
                "goals",
                Operator::Lt,
                1.0,
            ),
            Self::CleanSheetsPercentage => (
                "Share of matches without conceding",
                "%",
                Operator::Gt,
                40.0,
            ),
            Self::DefensiveSolidity => (
                "Defensive solidity index (0-100)",
                "pts",
                Operator::Gt,
                70.0,
            ),
            Self::BttsPercentage => (
                "Share of matches where both teams scored",
                "%",
                Operator::Gt,
                60.0,
            ),
            Self::Over25Percentage => ("Share of matches with 3+ goals", "%", Operator::Gt, 60.0),
            Self::Over15Percentage => ("Share of matches with 2+ goals", "%", Operator::Gt, 75.0),
            Self::Under25Percentage => (
                "Share of matches with at most 2 goals",
                "%",
                Operator::Gt,
                60.0,
            ),
            Self::TotalGoalsAvg => ("Average total goals per match", "goals", Operator::Gt, 2.5),
            Self::HomeAdvantage => (
                "Points per game at home minus away",
                "pts",
                Operator::Gt,
                1.0,
            ),
            Self::AwayForm => ("Points per game as visitor", "pts", Operator::Gt, 1.5),
            Self::Other(_) => return None,
        };

        let category = self.category()?;
        Some(MetricDefinition {
            id: self.id().to_string(),
            label: static_label(self),
            description,
            unit,
            category,
            category_label: category.label(),
            default_operator,
            default_value,
        })
    }

    pub fn unit(&self) -> Option<&'static str> {
        self.definition().map(|definition| definition.unit)
    }

    /// Operator the builder pre-selects when this metric is picked.
    pub fn default_operator(&self) -> Option<Operator> {
        self.definition().map(|definition| definition.default_operator)
    }

    pub fn default_value(&self) -> Option<f64> {
        self.definition().map(|definition| definition.default_value)
    }
}

pub fn catalog() -> Vec<MetricDefinition> {
    ALL_METRICS.iter().filter_map(Metric::definition).collect()
}

pub fn metrics_in_category(category: MetricCategory) -> Vec<Metric> {
    ALL_METRICS
        .iter()
        .filter(|metric| metric.category() == Some(category))
        .cloned()
        .collect()
}

impl MetricCategory {
    pub fn label(self) -> &'static str {
        match self {
            Self::Form => "Form & Performance",
            Self::Attack => "Attack",
            Self::Defense => "Defense",
            Self::GoalsMarkets => "Goal Markets",
            Self::HomeAway => "Home/Away",
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl From<String> for Metric {
    fn from(raw: String) -> Self {
        Self::parse(&raw)
    }
}

impl From<Metric> for String {
    fn from(metric: Metric) -> Self {
        metric.id().to_string()
    }
}

fn static_label(metric: &Metric) -> &'static str {
    match metric {
        Metric::WinRate => "Win Rate",
        Metric::PointsPerGame => "Points per Game",
        Metric::DrawPercentage => "Draw Rate",
        Metric::LossPercentage => "Loss Rate",
        Metric::GoalsScored => "Goals Scored",
        Metric::GoalsFirstHalf => "First-Half Goals",
        Metric::GoalsSecondHalf => "Second-Half Goals",
        Metric::ScoringFrequency => "Scoring Frequency",
        Metric::GoalsConceded => "Goals Conceded",
        Metric::CleanSheetsPercentage => "Clean Sheets %",
        Metric::DefensiveSolidity => "Defensive Solidity",
        Metric::BttsPercentage => "BTTS %",
        Metric::Over25Percentage => "Over 2.5 %",
        Metric::Over15Percentage => "Over 1.5 %",
        Metric::Under25Percentage => "Under 2.5 %",
        Metric::TotalGoalsAvg => "Total Goals (avg)",
        Metric::HomeAdvantage => "Home Advantage",
        Metric::AwayForm => "Away Form",
        Metric::Other(_) => "",
    }
}
