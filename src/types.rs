use std::fmt::{Display, Formatter};
use std::str::FromStr;

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::{TenderError, TenderResult};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    pub fn multiplier(self) -> f64 {
        match self {
            Self::Low => 1.0,
            Self::Medium => 0.7,
            Self::High => 0.4,
        }
    }

    pub fn value(self) -> f64 {
        match self {
            Self::Low => 1.0,
            Self::Medium => 2.0,
            Self::High => 3.0,
        }
    }

    pub fn as_slug(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl Default for RiskLevel {
    fn default() -> Self {
        Self::Medium
    }
}

impl Display for RiskLevel {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_slug())
    }
}

#[derive(Debug, Error)]
#[error("unknown risk level: {0}")]
pub struct RiskLevelParseError(pub String);

impl FromStr for RiskLevel {
    type Err = RiskLevelParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "medium" | "med" | "moderate" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            _ => Err(RiskLevelParseError(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Capabilities {
    pub quality: f64,
    pub reliability: f64,
    pub technical: f64,
    pub financial_stability: f64,
    pub past_performance: f64,
}

pub const CAPABILITY_DEFAULTS: Capabilities = Capabilities {
    quality: 7.5,
    reliability: 7.0,
    technical: 8.0,
    financial_stability: 6.5,
    past_performance: 8.5,
};

impl Capabilities {
    pub fn mean(&self) -> f64 {
        (self.quality
            + self.reliability
            + self.technical
            + self.financial_stability
            + self.past_performance)
            / 5.0
    }

    pub fn out_of_range(&self) -> Vec<&'static str> {
        [
            ("quality", self.quality),
            ("reliability", self.reliability),
            ("technical", self.technical),
            ("financial_stability", self.financial_stability),
            ("past_performance", self.past_performance),
        ]
        .into_iter()
        .filter(|(_, value)| !(1.0..=10.0).contains(value))
        .map(|(name, _)| name)
        .collect()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TenderOffer {
    pub id: String,
    pub supplier_name: String,
    pub project_name: String,
    pub total_cost: f64,
    #[serde(default = "default_currency")]
    pub currency: String,
    pub delivery_time_days: u32,
    #[serde(default)]
    pub quality: Option<f64>,
    #[serde(default)]
    pub reliability: Option<f64>,
    #[serde(default)]
    pub technical: Option<f64>,
    #[serde(default)]
    pub financial_stability: Option<f64>,
    #[serde(default)]
    pub past_performance: Option<f64>,
    #[serde(default)]
    pub risk_level: RiskLevel,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub terms: String,
    #[serde(default)]
    pub submission_date: Option<NaiveDate>,
    #[serde(default = "default_validity_days")]
    pub validity_period_days: u32,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attachments: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_score: Option<f64>,
}

impl TenderOffer {
    pub fn new(
        id: &str,
        supplier_name: &str,
        project_name: &str,
        total_cost: f64,
        delivery_time_days: u32,
    ) -> Self {
        Self {
            id: id.to_string(),
            supplier_name: supplier_name.to_string(),
            project_name: project_name.to_string(),
            total_cost,
            currency: default_currency(),
            delivery_time_days,
            quality: None,
            reliability: None,
            technical: None,
            financial_stability: None,
            past_performance: None,
            risk_level: RiskLevel::default(),
            description: String::new(),
            terms: String::new(),
            submission_date: None,
            validity_period_days: default_validity_days(),
            attachments: Vec::new(),
            total_score: None,
        }
    }

    pub fn with_capabilities(mut self, capabilities: Capabilities) -> Self {
        self.quality = Some(capabilities.quality);
        self.reliability = Some(capabilities.reliability);
        self.technical = Some(capabilities.technical);
        self.financial_stability = Some(capabilities.financial_stability);
        self.past_performance = Some(capabilities.past_performance);
        self
    }

    pub fn with_risk(mut self, risk_level: RiskLevel) -> Self {
        self.risk_level = risk_level;
        self
    }

    pub fn with_currency(mut self, currency: &str) -> Self {
        self.currency = currency.to_string();
        self
    }

    pub fn with_description(mut self, description: &str, terms: &str) -> Self {
        self.description = description.to_string();
        self.terms = terms.to_string();
        self
    }

    pub fn with_submission(mut self, date: NaiveDate, validity_period_days: u32) -> Self {
        self.submission_date = Some(date);
        self.validity_period_days = validity_period_days;
        self
    }

    pub fn capabilities(&self) -> Capabilities {
        Capabilities {
            quality: self.quality.unwrap_or(CAPABILITY_DEFAULTS.quality),
            reliability: self.reliability.unwrap_or(CAPABILITY_DEFAULTS.reliability),
            technical: self.technical.unwrap_or(CAPABILITY_DEFAULTS.technical),
            financial_stability: self
                .financial_stability
                .unwrap_or(CAPABILITY_DEFAULTS.financial_stability),
            past_performance: self
                .past_performance
                .unwrap_or(CAPABILITY_DEFAULTS.past_performance),
        }
    }

    pub fn validate(&self) -> TenderResult<()> {
        if self.id.trim().is_empty() {
            return Err(TenderError::invalid(&self.id, "id", "must not be empty"));
        }
        if !self.total_cost.is_finite() || self.total_cost <= 0.0 {
            return Err(TenderError::invalid(
                &self.id,
                "total_cost",
                format!("must be positive, got {}", self.total_cost),
            ));
        }
        if self.delivery_time_days == 0 {
            return Err(TenderError::invalid(
                &self.id,
                "delivery_time_days",
                "must be positive",
            ));
        }
        for (name, value) in [
            ("quality", self.quality),
            ("reliability", self.reliability),
            ("technical", self.technical),
            ("financial_stability", self.financial_stability),
            ("past_performance", self.past_performance),
        ] {
            if let Some(v) = value {
                if !v.is_finite() {
                    return Err(TenderError::invalid(&self.id, name, "must be a finite number"));
                }
            }
        }
        Ok(())
    }

    pub fn expires_on(&self) -> Option<NaiveDate> {
        self.submission_date
            .map(|date| date + Duration::days(i64::from(self.validity_period_days)))
    }

    /// Offers without a submission date are treated as open.
    pub fn is_valid_on(&self, date: NaiveDate) -> bool {
        self.expires_on().map(|end| date <= end).unwrap_or(true)
    }
}

fn default_currency() -> String {
    "USD".to_string()
}

fn default_validity_days() -> u32 {
    30
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use chrono::NaiveDate;

    use crate::error::TenderError;
    use crate::types::{Capabilities, RiskLevel, TenderOffer, CAPABILITY_DEFAULTS};

    #[test]
    fn missing_capabilities_resolve_to_defaults() {
        let tender = TenderOffer::new("t-1", "Acme", "Roof", 1000.0, 10);
        let caps = tender.capabilities();
        assert_eq!(caps, CAPABILITY_DEFAULTS);
        assert!((caps.quality - 7.5).abs() < 1e-12);
        assert!((caps.technical - 8.0).abs() < 1e-12);
    }

    #[test]
    fn rejects_non_positive_cost_and_delivery() {
        let zero_cost = TenderOffer::new("t-1", "Acme", "Roof", 0.0, 10);
        assert!(matches!(
            zero_cost.validate(),
            Err(TenderError::InvalidAttribute { attribute: "total_cost", .. })
        ));

        let zero_delivery = TenderOffer::new("t-2", "Acme", "Roof", 10.0, 0);
        assert!(matches!(
            zero_delivery.validate(),
            Err(TenderError::InvalidAttribute { attribute: "delivery_time_days", .. })
        ));
    }

    #[test]
    fn out_of_range_capabilities_are_reported_not_rejected() {
        let tender = TenderOffer::new("t-1", "Acme", "Roof", 1000.0, 10).with_capabilities(
            Capabilities {
                quality: 12.0,
                reliability: 0.5,
                technical: 8.0,
                financial_stability: 8.0,
                past_performance: 8.0,
            },
        );
        assert!(tender.validate().is_ok());
        assert_eq!(
            tender.capabilities().out_of_range(),
            vec!["quality", "reliability"]
        );
    }

    #[test]
    fn risk_level_parses_loosely_and_rejects_unknown() {
        assert_eq!(RiskLevel::from_str(" HIGH ").expect("parse"), RiskLevel::High);
        assert_eq!(RiskLevel::from_str("Medium").expect("parse"), RiskLevel::Medium);
        assert!(RiskLevel::from_str("extreme").is_err());
        let err = serde_json::from_str::<RiskLevel>("\"severe\"");
        assert!(err.is_err());
    }

    #[test]
    fn validity_window_uses_submission_date() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 15).expect("date");
        let tender =
            TenderOffer::new("t-1", "Acme", "Roof", 1000.0, 10).with_submission(date, 30);
        assert_eq!(
            tender.expires_on(),
            NaiveDate::from_ymd_opt(2024, 2, 14)
        );
        assert!(tender.is_valid_on(NaiveDate::from_ymd_opt(2024, 2, 14).expect("date")));
        assert!(!tender.is_valid_on(NaiveDate::from_ymd_opt(2024, 2, 15).expect("date")));
    }

    #[test]
    fn deserializes_with_defaults() {
        let tender: TenderOffer = serde_json::from_str(
            r#"{"id":"t-9","supplier_name":"S","project_name":"P","total_cost":50.0,"delivery_time_days":5}"#,
        )
        .expect("decode");
        assert_eq!(tender.currency, "USD");
        assert_eq!(tender.risk_level, RiskLevel::Medium);
        assert_eq!(tender.validity_period_days, 30);
        assert!(tender.total_score.is_none());
    }
}
