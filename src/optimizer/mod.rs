pub mod reasoning;
pub mod selector;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::criteria::{CriteriaWeights, ScoringWeights};
use crate::error::TenderResult;
use crate::scoring::ScoredTender;
use crate::types::TenderOffer;

pub use reasoning::{build_reasoning, selection_reasons};
pub use selector::{select, Selection, SELECTION_SIZE};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OptimizationResult {
    pub selected_tenders: Vec<TenderOffer>,
    pub total_cost: f64,
    pub average_quality: f64,
    pub average_delivery_time: f64,
    pub risk_score: f64,
    pub overall_score: f64,
    pub reasoning: String,
    pub scored_tenders: Vec<ScoredTender>,
    pub criteria: CriteriaWeights,
}

pub fn optimize(
    tenders: &[TenderOffer],
    criteria: &CriteriaWeights,
) -> TenderResult<OptimizationResult> {
    optimize_with(tenders, criteria, &ScoringWeights::default())
}

pub fn optimize_with(
    tenders: &[TenderOffer],
    criteria: &CriteriaWeights,
    weights: &ScoringWeights,
) -> TenderResult<OptimizationResult> {
    criteria.validate()?;
    let selection = select(tenders, weights)?;
    let reasoning = build_reasoning(&selection.selected)?;
    info!(
        "optimized {} tenders: selected {}, overall score {:.2}",
        tenders.len(),
        selection.selected.len(),
        selection.overall_score
    );

    Ok(OptimizationResult {
        selected_tenders: selection
            .selected
            .iter()
            .map(|s| s.tender.clone())
            .collect(),
        total_cost: selection.total_cost,
        average_quality: selection.average_quality,
        average_delivery_time: selection.average_delivery_time,
        risk_score: selection.risk_score,
        overall_score: selection.overall_score,
        reasoning,
        scored_tenders: selection.ranked,
        criteria: *criteria,
    })
}
