use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::{TenderError, TenderResult};

const WEIGHT_SCALE: f64 = 100.0;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum ScoringDimension {
    Relevance,
    Profitability,
    Resources,
    Risk,
    Strategic,
}

impl ScoringDimension {
    pub const ALL: [ScoringDimension; 5] = [
        ScoringDimension::Relevance,
        ScoringDimension::Profitability,
        ScoringDimension::Resources,
        ScoringDimension::Risk,
        ScoringDimension::Strategic,
    ];
}

impl Display for ScoringDimension {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let display = match self {
            Self::Relevance => "Relevance",
            Self::Profitability => "Profitability",
            Self::Resources => "Resources",
            Self::Risk => "Risk",
            Self::Strategic => "Strategic",
        };
        write!(f, "{display}")
    }
}

#[derive(Debug, Error)]
#[error("unknown scoring dimension: {0}")]
pub struct DimensionParseError(pub String);

impl FromStr for ScoringDimension {
    type Err = DimensionParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('-', "_");
        match normalized.as_str() {
            "relevance" => Ok(Self::Relevance),
            "profitability" | "profit" => Ok(Self::Profitability),
            "resources" | "resources_feasibility" | "feasibility" => Ok(Self::Resources),
            "risk" => Ok(Self::Risk),
            "strategic" | "strategic_value" => Ok(Self::Strategic),
            _ => Err(DimensionParseError(s.to_string())),
        }
    }
}

/// The scorer always works on the [`normalized`](Self::normalized) form, so
/// weights that do not add up to 100 are rescaled rather than rejected.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ScoringWeights {
    #[serde(default = "default_relevance")]
    pub relevance: f64,
    #[serde(default = "default_profitability")]
    pub profitability: f64,
    #[serde(default = "default_resources")]
    pub resources: f64,
    #[serde(default = "default_risk")]
    pub risk: f64,
    #[serde(default = "default_strategic")]
    pub strategic: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            relevance: default_relevance(),
            profitability: default_profitability(),
            resources: default_resources(),
            risk: default_risk(),
            strategic: default_strategic(),
        }
    }
}

impl ScoringWeights {
    pub fn weight(&self, dimension: ScoringDimension) -> f64 {
        match dimension {
            ScoringDimension::Relevance => self.relevance,
            ScoringDimension::Profitability => self.profitability,
            ScoringDimension::Resources => self.resources,
            ScoringDimension::Risk => self.risk,
            ScoringDimension::Strategic => self.strategic,
        }
    }

    pub fn set_weight(&mut self, dimension: ScoringDimension, value: f64) {
        match dimension {
            ScoringDimension::Relevance => self.relevance = value,
            ScoringDimension::Profitability => self.profitability = value,
            ScoringDimension::Resources => self.resources = value,
            ScoringDimension::Risk => self.risk = value,
            ScoringDimension::Strategic => self.strategic = value,
        }
    }

    pub fn with_assignment(mut self, raw: &str) -> TenderResult<Self> {
        let (name, value) = raw.split_once('=').ok_or_else(|| {
            TenderError::InvalidWeights(format!("expected dimension=value, got {raw}"))
        })?;
        let dimension = ScoringDimension::from_str(name)
            .map_err(|e| TenderError::InvalidWeights(e.to_string()))?;
        let value = value.trim().parse::<f64>().map_err(|e| {
            TenderError::InvalidWeights(format!("{dimension} weight {value:?}: {e}"))
        })?;
        self.set_weight(dimension, value);
        self.validate()?;
        Ok(self)
    }

    pub fn total(&self) -> f64 {
        ScoringDimension::ALL
            .iter()
            .map(|dimension| self.weight(*dimension))
            .sum()
    }

    pub fn validate(&self) -> TenderResult<()> {
        check_weights(
            &ScoringDimension::ALL
                .iter()
                .map(|d| (d.to_string(), self.weight(*d)))
                .collect::<Vec<_>>(),
        )
    }

    pub fn normalized(&self) -> TenderResult<Self> {
        self.validate()?;
        let factor = WEIGHT_SCALE / self.total();
        Ok(Self {
            relevance: self.relevance * factor,
            profitability: self.profitability * factor,
            resources: self.resources * factor,
            risk: self.risk * factor,
            strategic: self.strategic * factor,
        })
    }
}

/// Buyer-facing importance of each tender attribute.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CriteriaWeights {
    pub cost_weight: f64,
    pub quality_weight: f64,
    pub delivery_weight: f64,
    pub reliability_weight: f64,
    pub technical_weight: f64,
    pub financial_weight: f64,
    pub performance_weight: f64,
    pub risk_weight: f64,
}

impl Default for CriteriaWeights {
    fn default() -> Self {
        Self {
            cost_weight: 30.0,
            quality_weight: 25.0,
            delivery_weight: 15.0,
            reliability_weight: 10.0,
            technical_weight: 10.0,
            financial_weight: 5.0,
            performance_weight: 3.0,
            risk_weight: 2.0,
        }
    }
}

impl CriteriaWeights {
    fn entries(&self) -> [(&'static str, f64); 8] {
        [
            ("cost_weight", self.cost_weight),
            ("quality_weight", self.quality_weight),
            ("delivery_weight", self.delivery_weight),
            ("reliability_weight", self.reliability_weight),
            ("technical_weight", self.technical_weight),
            ("financial_weight", self.financial_weight),
            ("performance_weight", self.performance_weight),
            ("risk_weight", self.risk_weight),
        ]
    }

    pub fn total(&self) -> f64 {
        self.entries().iter().map(|(_, v)| v).sum()
    }

    pub fn validate(&self) -> TenderResult<()> {
        check_weights(
            &self
                .entries()
                .iter()
                .map(|(name, v)| (name.to_string(), *v))
                .collect::<Vec<_>>(),
        )
    }

    pub fn normalized(&self) -> TenderResult<Self> {
        self.validate()?;
        let factor = WEIGHT_SCALE / self.total();
        Ok(Self {
            cost_weight: self.cost_weight * factor,
            quality_weight: self.quality_weight * factor,
            delivery_weight: self.delivery_weight * factor,
            reliability_weight: self.reliability_weight * factor,
            technical_weight: self.technical_weight * factor,
            financial_weight: self.financial_weight * factor,
            performance_weight: self.performance_weight * factor,
            risk_weight: self.risk_weight * factor,
        })
    }
}

fn check_weights(entries: &[(String, f64)]) -> TenderResult<()> {
    for (name, value) in entries {
        if !value.is_finite() || *value < 0.0 {
            return Err(TenderError::InvalidWeights(format!(
                "{name} must be a non-negative number, got {value}"
            )));
        }
    }
    let total: f64 = entries.iter().map(|(_, v)| v).sum();
    if !total.is_finite() {
        return Err(TenderError::InvalidWeights(
            "weights overflow when summed".to_string(),
        ));
    }
    if total <= 0.0 {
        return Err(TenderError::InvalidWeights(
            "weights must not all be zero".to_string(),
        ));
    }
    Ok(())
}

fn default_relevance() -> f64 {
    25.0
}

fn default_profitability() -> f64 {
    30.0
}

fn default_resources() -> f64 {
    20.0
}

fn default_risk() -> f64 {
    15.0
}

fn default_strategic() -> f64 {
    10.0
}
