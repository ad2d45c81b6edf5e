use crate::error::{TenderError, TenderResult};
use crate::scoring::ScoredTender;
use crate::types::RiskLevel;

const STRONG_RATING: f64 = 8.0;
const FAST_DELIVERY_DAYS: u32 = 30;

pub fn selection_reasons(selected: &[ScoredTender]) -> TenderResult<Vec<&'static str>> {
    let top = selected.first().ok_or(TenderError::EmptyBatch)?;
    let tender = &top.tender;
    let caps = tender.capabilities();
    let mean_cost =
        selected.iter().map(|s| s.tender.total_cost).sum::<f64>() / selected.len() as f64;

    let mut reasons = Vec::new();
    if caps.quality >= STRONG_RATING || caps.technical >= STRONG_RATING {
        reasons.push("High relevance score");
    }
    if tender.total_cost < mean_cost {
        reasons.push("Cost-effective pricing");
    }
    if caps.financial_stability >= STRONG_RATING {
        reasons.push("Strong financial stability");
    }
    if tender.delivery_time_days <= FAST_DELIVERY_DAYS {
        reasons.push("Fast delivery capability");
    }
    if caps.reliability >= STRONG_RATING {
        reasons.push("High reliability");
    }
    if tender.risk_level == RiskLevel::Low {
        reasons.push("Low risk profile");
    }
    if caps.past_performance >= STRONG_RATING {
        reasons.push("Excellent past performance");
    }
    Ok(reasons)
}

/// When no rule fires the clause stays empty, giving
/// `"Selected based on: . Top performer: ..."`.
pub fn build_reasoning(selected: &[ScoredTender]) -> TenderResult<String> {
    let reasons = selection_reasons(selected)?;
    let top = &selected[0];
    Ok(format!(
        "Selected based on: {}. Top performer: {} with {} score.",
        reasons.join(", "),
        top.tender.supplier_name,
        score_label(top.total_score())
    ))
}

// `{:.2}` alone rounds exact ties to even; ties here go up (12.125 -> 12.13).
fn score_label(score: f64) -> String {
    format!("{:.2}", (score * 100.0).round() / 100.0)
}
