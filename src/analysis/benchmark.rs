use crate::analysis::{
    HistoricalComparison, MarketInsights, MarketTrend, PriceRange, RiskAssessment,
    ScoreComparison,
};
use crate::error::TenderResult;
use crate::types::{RiskLevel, TenderOffer};

const PRICE_VARIATION: f64 = 0.3;
const SCORE_VARIATION: f64 = 2.0;
const MARKET_DELIVERY_DAYS: f64 = 45.0;

pub fn benchmark_tender(tender: &TenderOffer) -> TenderResult<HistoricalComparison> {
    tender.validate()?;
    let caps = tender.capabilities();

    let base_cost = tender.total_cost;
    let min_price = base_cost * (1.0 - PRICE_VARIATION);
    let max_price = base_cost * (1.0 + PRICE_VARIATION);
    let price_percentile = percentile_within(base_cost, min_price, max_price);

    let base_score = caps.mean();
    let historical_min = (base_score - SCORE_VARIATION).max(1.0);
    let historical_max = (base_score + SCORE_VARIATION).min(10.0);
    let score_percentile = percentile_within(base_score, historical_min, historical_max);

    Ok(HistoricalComparison {
        tender_id: tender.id.clone(),
        price_range: PriceRange {
            min: min_price.round(),
            max: max_price.round(),
            average: ((min_price + max_price) / 2.0).round(),
            percentile: price_percentile.round(),
        },
        score_comparison: ScoreComparison {
            historical_average: round_tenth((historical_min + historical_max) / 2.0),
            historical_max: round_tenth(historical_max),
            historical_min: round_tenth(historical_min),
            current_score: round_tenth(base_score),
            percentile: score_percentile.round(),
        },
        recommendations: recommendations(tender, price_percentile, score_percentile),
        risk_assessment: risk_assessment(tender),
        market_insights: market_insights(tender),
    })
}

fn recommendations(tender: &TenderOffer, price_pct: f64, score_pct: f64) -> Vec<String> {
    let caps = tender.capabilities();
    let mut out = Vec::new();

    if price_pct > 80.0 {
        out.push("Consider negotiating price - this tender is in the upper 20% of historical prices");
    } else if price_pct < 20.0 {
        out.push("Excellent pricing - this tender is in the lower 20% of historical prices");
    }

    if score_pct > 80.0 {
        out.push("High quality tender - consider this as a premium option");
    } else if score_pct < 40.0 {
        out.push("Quality concerns - review technical specifications carefully");
    }

    if tender.delivery_time_days > 60 {
        out.push("Long delivery time - consider impact on project timeline");
    } else if tender.delivery_time_days < 30 {
        out.push("Fast delivery - good for time-sensitive projects");
    }

    if tender.risk_level == RiskLevel::High {
        out.push("High risk profile - implement additional monitoring and controls");
    }
    if caps.financial_stability < 6.0 {
        out.push("Financial stability concerns - request additional financial documentation");
    }

    out.into_iter().map(str::to_string).collect()
}

fn risk_assessment(tender: &TenderOffer) -> RiskAssessment {
    let caps = tender.capabilities();
    let mut factors = Vec::new();
    let mut level = RiskLevel::Low;

    if tender.risk_level == RiskLevel::High {
        level = RiskLevel::High;
        factors.push("Supplier has high risk rating");
    }
    let escalations = [
        (caps.financial_stability < 6.0, "Below-average financial stability"),
        (caps.past_performance < 6.0, "Poor historical performance"),
    ];
    for (triggered, factor) in escalations {
        if triggered {
            factors.push(factor);
            level = level.max(RiskLevel::Medium);
        }
    }
    if tender.delivery_time_days > 90 {
        factors.push("Extended delivery timeline");
    }
    if caps.technical < 6.0 {
        factors.push("Technical capability concerns");
        level = level.max(RiskLevel::Medium);
    }

    let confidence = if factors.is_empty() {
        factors.push("No significant risk factors identified");
        0.9
    } else {
        0.8
    };

    RiskAssessment {
        level,
        factors: factors.into_iter().map(str::to_string).collect(),
        confidence,
    }
}

fn market_insights(tender: &TenderOffer) -> MarketInsights {
    let caps = tender.capabilities();
    let trend = if tender.total_cost > 100_000.0 {
        MarketTrend::Increasing
    } else if tender.total_cost < 50_000.0 {
        MarketTrend::Decreasing
    } else {
        MarketTrend::Stable
    };

    let mut common_risk_factors = Vec::new();
    if tender.risk_level == RiskLevel::High {
        common_risk_factors.push("Supplier financial instability".to_string());
    }
    if tender.delivery_time_days > 60 {
        common_risk_factors.push("Extended project timelines".to_string());
    }
    if caps.technical < 7.0 {
        common_risk_factors.push("Technical complexity".to_string());
    }

    let mut competitive_advantages = Vec::new();
    if caps.quality >= 8.0 {
        competitive_advantages.push("High quality standards".to_string());
    }
    if tender.delivery_time_days < 30 {
        competitive_advantages.push("Fast delivery capability".to_string());
    }
    if caps.financial_stability >= 8.0 {
        competitive_advantages.push("Strong financial position".to_string());
    }

    MarketInsights {
        trend,
        average_delivery_time: MARKET_DELIVERY_DAYS,
        common_risk_factors,
        competitive_advantages,
    }
}

fn percentile_within(value: f64, min: f64, max: f64) -> f64 {
    let span = max - min;
    if span <= 0.0 {
        return 50.0;
    }
    ((value - min) / span * 100.0).clamp(0.0, 100.0)
}

fn round_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
