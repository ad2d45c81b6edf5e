use std::collections::BTreeMap;

use crate::analysis::{AnalysisMetrics, CostAnalysis, DistributionAnalysis, SupplierAnalysis};
use crate::error::{TenderError, TenderResult};
use crate::types::TenderOffer;

const QUALITY_BUCKETS: [&str; 4] = ["excellent", "good", "fair", "poor"];
const DELIVERY_BUCKETS: [&str; 4] = ["<=30d", "31-60d", "61-90d", ">90d"];

pub fn compute_metrics(tenders: &[TenderOffer]) -> TenderResult<AnalysisMetrics> {
    if tenders.is_empty() {
        return Err(TenderError::EmptyBatch);
    }
    for tender in tenders {
        tender.validate()?;
    }

    let costs = tenders.iter().map(|t| t.total_cost).collect::<Vec<_>>();
    let qualities = tenders
        .iter()
        .map(|t| t.capabilities().quality)
        .collect::<Vec<_>>();
    let deliveries = tenders
        .iter()
        .map(|t| f64::from(t.delivery_time_days))
        .collect::<Vec<_>>();

    Ok(AnalysisMetrics {
        cost: CostAnalysis {
            min: min_of(&costs),
            max: max_of(&costs),
            average: mean(&costs),
            median: median(&costs).unwrap_or_default(),
        },
        quality: distribution(&qualities, &QUALITY_BUCKETS, quality_bucket),
        delivery: distribution(&deliveries, &DELIVERY_BUCKETS, delivery_bucket),
        suppliers: supplier_analysis(tenders),
    })
}

pub fn median(values: &[f64]) -> Option<f64> {
    let mut sorted = values
        .iter()
        .copied()
        .filter(|v| v.is_finite())
        .collect::<Vec<_>>();
    if sorted.is_empty() {
        return None;
    }
    sorted.sort_by(|a, b| a.total_cmp(b));
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    } else {
        Some(sorted[mid])
    }
}

fn distribution(
    values: &[f64],
    buckets: &[&str],
    bucket_of: fn(f64) -> &'static str,
) -> DistributionAnalysis {
    let mut counts = buckets
        .iter()
        .map(|b| (b.to_string(), 0usize))
        .collect::<BTreeMap<_, _>>();
    for value in values {
        *counts.entry(bucket_of(*value).to_string()).or_default() += 1;
    }
    DistributionAnalysis {
        min: min_of(values),
        max: max_of(values),
        average: mean(values),
        distribution: counts,
    }
}

fn quality_bucket(value: f64) -> &'static str {
    if value >= 9.0 {
        "excellent"
    } else if value >= 7.0 {
        "good"
    } else if value >= 5.0 {
        "fair"
    } else {
        "poor"
    }
}

fn delivery_bucket(days: f64) -> &'static str {
    if days <= 30.0 {
        "<=30d"
    } else if days <= 60.0 {
        "31-60d"
    } else if days <= 90.0 {
        "61-90d"
    } else {
        ">90d"
    }
}

fn supplier_analysis(tenders: &[TenderOffer]) -> SupplierAnalysis {
    let mut ratings: BTreeMap<String, Vec<f64>> = BTreeMap::new();
    for tender in tenders {
        ratings
            .entry(tender.supplier_name.clone())
            .or_default()
            .push(tender.capabilities().mean());
    }
    SupplierAnalysis {
        total_suppliers: tenders.len(),
        unique_suppliers: ratings.len(),
        supplier_performance: ratings
            .into_iter()
            .map(|(supplier, values)| (supplier, mean(&values)))
            .collect(),
    }
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

fn min_of(values: &[f64]) -> f64 {
    values.iter().copied().fold(f64::INFINITY, f64::min)
}

fn max_of(values: &[f64]) -> f64 {
    values.iter().copied().fold(f64::NEG_INFINITY, f64::max)
}
