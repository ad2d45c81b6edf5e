pub mod remote;

use serde::{Deserialize, Serialize};

use crate::error::{TenderError, TenderResult};
use crate::types::{RiskLevel, TenderOffer};

pub use remote::{
    import_tender, AnalysisService, AnalyzeRequest, AnalyzeResponse, HttpAnalysisService,
};

const DEFAULT_DELIVERY_DAYS: u32 = 30;
const DEFAULT_VALIDITY_DAYS: u32 = 30;

/// Best-effort record produced by document extraction or a remote analysis.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ExtractedTender {
    pub supplier_name: Option<String>,
    pub project_name: Option<String>,
    pub total_cost: Option<f64>,
    pub currency: Option<String>,
    pub delivery_time_days: Option<u32>,
    pub quality: Option<f64>,
    pub reliability: Option<f64>,
    pub technical: Option<f64>,
    pub financial_stability: Option<f64>,
    pub past_performance: Option<f64>,
    pub risk_level: Option<RiskLevel>,
    pub description: Option<String>,
    pub terms: Option<String>,
    #[serde(default)]
    pub confidence: f64,
}

impl ExtractedTender {
    pub fn into_offer(self, id: &str) -> TenderResult<TenderOffer> {
        let total_cost = self
            .total_cost
            .ok_or_else(|| TenderError::invalid(id, "total_cost", "missing from extracted record"))?;
        let delivery = match self.delivery_time_days {
            Some(0) | None => DEFAULT_DELIVERY_DAYS,
            Some(days) => days,
        };

        let mut offer = TenderOffer::new(
            id,
            non_blank(self.supplier_name).as_deref().unwrap_or("Unknown supplier"),
            non_blank(self.project_name).as_deref().unwrap_or("Untitled project"),
            total_cost,
            delivery,
        );
        if let Some(currency) = non_blank(self.currency) {
            offer.currency = currency;
        }
        offer.quality = self.quality;
        offer.reliability = self.reliability;
        offer.technical = self.technical;
        offer.financial_stability = self.financial_stability;
        offer.past_performance = self.past_performance;
        offer.risk_level = self.risk_level.unwrap_or_default();
        offer.description = self.description.unwrap_or_default();
        offer.terms = self.terms.unwrap_or_default();
        offer.validity_period_days = DEFAULT_VALIDITY_DAYS;
        offer.validate()?;
        Ok(offer)
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}
