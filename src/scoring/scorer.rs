use tracing::{debug, warn};

use crate::criteria::ScoringWeights;
use crate::error::{TenderError, TenderResult};
use crate::scoring::{ScoreBreakdown, ScoredTender};
use crate::types::TenderOffer;

const CAPABILITY_SCALE: f64 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BatchContext {
    pub max_cost: f64,
    pub max_delivery_days: f64,
}

impl BatchContext {
    pub fn from_batch(batch: &[TenderOffer]) -> TenderResult<Self> {
        if batch.is_empty() {
            return Err(TenderError::EmptyBatch);
        }
        for tender in batch {
            tender.validate()?;
        }
        let max_cost = batch
            .iter()
            .map(|t| t.total_cost)
            .fold(f64::MIN, f64::max);
        let max_delivery_days = batch
            .iter()
            .map(|t| f64::from(t.delivery_time_days))
            .fold(f64::MIN, f64::max);
        Ok(Self {
            max_cost,
            max_delivery_days,
        })
    }
}

pub fn score_tender(
    tender: &TenderOffer,
    batch: &[TenderOffer],
    weights: &ScoringWeights,
) -> TenderResult<ScoredTender> {
    tender.validate()?;
    let context = BatchContext::from_batch(batch)?;
    let weights = weights.normalized()?;
    Ok(score_with_context(tender, &context, &weights))
}

pub fn score_batch(
    batch: &[TenderOffer],
    weights: &ScoringWeights,
) -> TenderResult<Vec<ScoredTender>> {
    let context = BatchContext::from_batch(batch)?;
    let weights = weights.normalized()?;
    Ok(batch
        .iter()
        .map(|tender| score_with_context(tender, &context, &weights))
        .collect())
}

fn score_with_context(
    tender: &TenderOffer,
    context: &BatchContext,
    weights: &ScoringWeights,
) -> ScoredTender {
    let caps = tender.capabilities();
    let out_of_range = caps.out_of_range();
    if !out_of_range.is_empty() {
        warn!(
            "tender {} has capability ratings outside 1-10: {}",
            tender.id,
            out_of_range.join(", ")
        );
    }

    let cost_efficiency = 1.0 - tender.total_cost / context.max_cost;
    let delivery_efficiency =
        1.0 - f64::from(tender.delivery_time_days) / context.max_delivery_days;

    let relevance = ((caps.quality + caps.technical) / (2.0 * CAPABILITY_SCALE)) * weights.relevance;
    let profitability = (cost_efficiency * 0.7
        + (caps.financial_stability / CAPABILITY_SCALE) * 0.3)
        * weights.profitability;
    let resources = (delivery_efficiency * 0.6 + (caps.reliability / CAPABILITY_SCALE) * 0.4)
        * weights.resources;
    let risk = (tender.risk_level.multiplier() * 0.7
        + (caps.past_performance / CAPABILITY_SCALE) * 0.3)
        * weights.risk;
    let strategic = ((caps.quality + caps.reliability + caps.financial_stability)
        / (3.0 * CAPABILITY_SCALE))
        * weights.strategic;

    let breakdown = ScoreBreakdown {
        relevance,
        profitability,
        resources,
        risk,
        strategic,
        cost_efficiency,
        delivery_efficiency,
    };

    let mut scored = tender.clone();
    scored.total_score = Some(breakdown.composite());
    debug!(
        "tender {}: relevance={relevance:.3} profitability={profitability:.3} resources={resources:.3} risk={risk:.3} strategic={strategic:.3} total={:.3}",
        tender.id,
        breakdown.composite()
    );

    ScoredTender {
        tender: scored,
        breakdown,
    }
}

#[cfg(test)]
mod tests {
    use crate::criteria::ScoringWeights;
    use crate::error::TenderError;
    use crate::fixtures::sample_tenders;
    use crate::scoring::scorer::{score_batch, score_tender};
    use crate::types::{Capabilities, RiskLevel, TenderOffer};

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn scores_reference_batch() {
        let batch = sample_tenders();
        let scored = score_batch(&batch, &ScoringWeights::default()).expect("score");
        let xyz = &scored[1];
        assert_eq!(xyz.tender.id, "tender-2");
        assert!(close(xyz.breakdown.relevance, 21.875));
        assert!(close(xyz.breakdown.profitability, 20.175));
        assert!(close(xyz.breakdown.resources, 13.2));
        assert!(close(xyz.breakdown.risk, 14.1));
        assert!(close(xyz.breakdown.strategic, 9.0));
        assert!(close(xyz.total_score(), 78.35));

        let tech = &scored[2];
        assert!(close(tech.breakdown.cost_efficiency, 0.0));
        assert!(close(tech.breakdown.delivery_efficiency, 0.0));
    }

    #[test]
    fn composite_is_sum_of_sub_scores() {
        let batch = sample_tenders();
        for scored in score_batch(&batch, &ScoringWeights::default()).expect("score") {
            let b = scored.breakdown;
            let sum = b.relevance + b.profitability + b.resources + b.risk + b.strategic;
            assert!(close(sum, scored.total_score()));
            assert_eq!(scored.tender.total_score, Some(scored.total_score()));
        }
    }

    #[test]
    fn scoring_is_pure() {
        let batch = sample_tenders();
        let weights = ScoringWeights::default();
        let first = score_tender(&batch[0], &batch, &weights).expect("score");
        let second = score_tender(&batch[0], &batch, &weights).expect("score");
        assert_eq!(first.breakdown, second.breakdown);
        assert_eq!(
            first.total_score().to_bits(),
            second.total_score().to_bits()
        );
    }

    #[test]
    fn single_tender_has_zero_relative_efficiency() {
        let batch = vec![sample_tenders().remove(0)];
        let scored = score_tender(&batch[0], &batch, &ScoringWeights::default()).expect("score");
        assert_eq!(scored.breakdown.cost_efficiency, 0.0);
        assert_eq!(scored.breakdown.delivery_efficiency, 0.0);
        assert!(scored.total_score().is_finite());
    }

    #[test]
    fn identical_costs_give_zero_cost_efficiency() {
        let a = TenderOffer::new("a", "A", "P", 500.0, 10);
        let b = TenderOffer::new("b", "B", "P", 500.0, 20);
        let scored = score_batch(&[a, b], &ScoringWeights::default()).expect("score");
        assert!(scored.iter().all(|s| s.breakdown.cost_efficiency == 0.0));
        assert!(close(scored[0].breakdown.delivery_efficiency, 0.5));
    }

    #[test]
    fn missing_quality_and_technical_use_defaults() {
        let tender = TenderOffer::new("t-1", "Acme", "Roof", 1000.0, 10);
        let scored = score_tender(&tender, &[tender.clone()], &ScoringWeights::default())
            .expect("score");
        assert!(close(scored.breakdown.relevance, 19.375));
    }

    #[test]
    fn rejects_invalid_input() {
        let bad = TenderOffer::new("bad", "A", "P", -5.0, 10);
        let err = score_tender(&bad, &[bad.clone()], &ScoringWeights::default())
            .expect_err("negative cost must fail");
        assert!(matches!(err, TenderError::InvalidAttribute { .. }));

        let good = TenderOffer::new("good", "A", "P", 5.0, 10);
        assert_eq!(
            score_tender(&good, &[], &ScoringWeights::default()).expect_err("empty batch"),
            TenderError::EmptyBatch
        );
    }

    #[test]
    fn custom_weights_shift_the_composite() {
        let batch = sample_tenders();
        let risk_only = ScoringWeights {
            relevance: 0.0,
            profitability: 0.0,
            resources: 0.0,
            risk: 1.0,
            strategic: 0.0,
        };
        let scored = score_batch(&batch, &risk_only).expect("score");
        // low risk, past performance 8: (1.0 * 0.7 + 0.8 * 0.3) * 100
        assert!(close(scored[1].total_score(), 94.0));
        assert!(close(scored[1].breakdown.relevance, 0.0));
    }

    #[test]
    fn capability_overflow_passes_through() {
        let tender = TenderOffer::new("t-1", "Acme", "Roof", 1000.0, 10)
            .with_risk(RiskLevel::Low)
            .with_capabilities(Capabilities {
                quality: 20.0,
                reliability: 10.0,
                technical: 20.0,
                financial_stability: 10.0,
                past_performance: 10.0,
            });
        let scored = score_tender(&tender, &[tender.clone()], &ScoringWeights::default())
            .expect("score");
        assert!(close(scored.breakdown.relevance, 50.0));
    }
}
