use chrono::NaiveDate;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, Color, ContentArrangement, Row, Table};

use crate::analysis::{AnalysisMetrics, HistoricalComparison};
use crate::optimizer::OptimizationResult;
use crate::scoring::ScoredTender;
use crate::types::{RiskLevel, TenderOffer};

fn new_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

fn risk_cell(level: RiskLevel) -> Cell {
    let cell = Cell::new(level.to_string().to_uppercase());
    match level {
        RiskLevel::Low => cell.fg(Color::Green),
        RiskLevel::Medium => cell.fg(Color::Yellow),
        RiskLevel::High => cell.fg(Color::Red),
    }
}

fn validity_cell(tender: &TenderOffer, today: NaiveDate) -> Cell {
    match tender.expires_on() {
        None => Cell::new("open"),
        Some(end) if tender.is_valid_on(today) => Cell::new(end.to_string()).fg(Color::Green),
        Some(end) => Cell::new(format!("{end} (expired)")).fg(Color::Red),
    }
}

fn money(value: f64, currency: &str) -> String {
    format!("{value:.0} {currency}")
}

pub fn render_scores_table(scored: &[ScoredTender]) -> String {
    let mut table = new_table();
    table.set_header(vec![
        "Rank",
        "Tender",
        "Supplier",
        "Cost",
        "Delivery",
        "Risk",
        "Relevance",
        "Profit",
        "Resources",
        "Risk Score",
        "Strategic",
        "Total",
        "Strongest",
    ]);
    for (idx, s) in scored.iter().enumerate() {
        let b = &s.breakdown;
        table.add_row(Row::from(vec![
            Cell::new(idx + 1),
            Cell::new(&s.tender.id),
            Cell::new(&s.tender.supplier_name),
            Cell::new(money(s.tender.total_cost, &s.tender.currency)),
            Cell::new(format!("{}d", s.tender.delivery_time_days)),
            risk_cell(s.tender.risk_level),
            Cell::new(format!("{:.2}", b.relevance)),
            Cell::new(format!("{:.2}", b.profitability)),
            Cell::new(format!("{:.2}", b.resources)),
            Cell::new(format!("{:.2}", b.risk)),
            Cell::new(format!("{:.2}", b.strategic)),
            Cell::new(format!("{:.2}", s.total_score())),
            Cell::new(b.strongest_dimension()),
        ]));
    }
    table.to_string()
}

pub fn render_optimization_table(result: &OptimizationResult, today: NaiveDate) -> String {
    let mut table = new_table();
    table.set_header(vec![
        "Pick", "Tender", "Supplier", "Project", "Cost", "Score", "Expires",
    ]);
    for (idx, tender) in result.selected_tenders.iter().enumerate() {
        table.add_row(Row::from(vec![
            Cell::new(idx + 1),
            Cell::new(&tender.id),
            Cell::new(&tender.supplier_name),
            Cell::new(&tender.project_name),
            Cell::new(money(tender.total_cost, &tender.currency)),
            Cell::new(
                tender
                    .total_score
                    .map(|v| format!("{v:.2}"))
                    .unwrap_or_else(|| "-".to_string()),
            ),
            validity_cell(tender, today),
        ]));
    }

    let mut out = table.to_string();
    out.push_str(&format!(
        "\nTotal cost: {:.2}\nAverage quality: {:.2}\nAverage delivery: {:.1} days\nRisk score: {:.2}\nOverall score: {:.2}\n{}",
        result.total_cost,
        result.average_quality,
        result.average_delivery_time,
        result.risk_score,
        result.overall_score,
        result.reasoning
    ));
    out
}

pub fn render_tenders_table(tenders: &[TenderOffer], today: NaiveDate) -> String {
    let mut table = new_table();
    table.set_header(vec![
        "Tender", "Supplier", "Project", "Cost", "Delivery", "Risk", "Expires",
    ]);
    for t in tenders {
        table.add_row(Row::from(vec![
            Cell::new(&t.id),
            Cell::new(&t.supplier_name),
            Cell::new(&t.project_name),
            Cell::new(money(t.total_cost, &t.currency)),
            Cell::new(format!("{}d", t.delivery_time_days)),
            risk_cell(t.risk_level),
            validity_cell(t, today),
        ]));
    }
    table.to_string()
}

pub fn render_metrics_table(metrics: &AnalysisMetrics) -> String {
    let mut table = new_table();
    table.set_header(vec!["Metric", "Min", "Max", "Average", "Breakdown"]);
    table.add_row(vec![
        "Cost".to_string(),
        format!("{:.0}", metrics.cost.min),
        format!("{:.0}", metrics.cost.max),
        format!("{:.0}", metrics.cost.average),
        format!("median {:.0}", metrics.cost.median),
    ]);
    for (label, dist) in [("Quality", &metrics.quality), ("Delivery", &metrics.delivery)] {
        let breakdown = dist
            .distribution
            .iter()
            .map(|(bucket, count)| format!("{bucket}: {count}"))
            .collect::<Vec<_>>()
            .join(", ");
        table.add_row(vec![
            label.to_string(),
            format!("{:.1}", dist.min),
            format!("{:.1}", dist.max),
            format!("{:.2}", dist.average),
            breakdown,
        ]);
    }

    let mut suppliers = new_table();
    suppliers.set_header(vec!["Supplier", "Mean Capability"]);
    for (name, score) in &metrics.suppliers.supplier_performance {
        suppliers.add_row(vec![name.clone(), format!("{score:.2}")]);
    }

    format!(
        "{}\nSuppliers: {} offers from {} unique suppliers\n{}",
        table,
        metrics.suppliers.total_suppliers,
        metrics.suppliers.unique_suppliers,
        suppliers
    )
}

pub fn render_benchmark_table(comparison: &HistoricalComparison) -> String {
    let mut table = new_table();
    table.set_header(vec!["Measure", "Min", "Average", "Max", "Current", "Percentile"]);
    let price = &comparison.price_range;
    table.add_row(vec![
        "Price".to_string(),
        format!("{:.0}", price.min),
        format!("{:.0}", price.average),
        format!("{:.0}", price.max),
        "-".to_string(),
        format!("{:.0}", price.percentile),
    ]);
    let score = &comparison.score_comparison;
    table.add_row(vec![
        "Score".to_string(),
        format!("{:.1}", score.historical_min),
        format!("{:.1}", score.historical_average),
        format!("{:.1}", score.historical_max),
        format!("{:.1}", score.current_score),
        format!("{:.0}", score.percentile),
    ]);

    let risk = &comparison.risk_assessment;
    let insights = &comparison.market_insights;
    let mut out = format!("Benchmark for {}\n{}", comparison.tender_id, table);
    out.push_str(&format!(
        "\nRisk: {} (confidence {:.1})",
        risk.level, risk.confidence
    ));
    for factor in &risk.factors {
        out.push_str(&format!("\n  - {factor}"));
    }
    out.push_str(&format!(
        "\nMarket trend: {:?}, average delivery {:.0} days",
        insights.trend, insights.average_delivery_time
    ));
    if !comparison.recommendations.is_empty() {
        out.push_str("\nRecommendations:");
        for rec in &comparison.recommendations {
            out.push_str(&format!("\n  - {rec}"));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use crate::analysis::{benchmark_tender, compute_metrics};
    use crate::criteria::CriteriaWeights;
    use crate::fixtures::sample_tenders;
    use crate::optimizer::optimize;
    use crate::output::table::{
        render_benchmark_table, render_metrics_table, render_optimization_table,
        render_scores_table, render_tenders_table,
    };
    use crate::types::TenderOffer;

    fn day(year: i32, month: u32, date: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, date).expect("date")
    }

    #[test]
    fn optimization_table_lists_picks_and_reasoning() {
        let result = optimize(&sample_tenders(), &CriteriaWeights::default()).expect("optimize");
        let rendered = render_optimization_table(&result, day(2024, 2, 1));
        assert!(rendered.contains("XYZ Services Inc."));
        assert!(rendered.contains("78.35"));
        assert!(rendered.contains("Total cost: 410000.00"));
        assert!(rendered.contains("Selected based on:"));

        let scores = render_scores_table(&result.scored_tenders);
        assert!(scores.contains("HIGH"));
        assert!(scores.contains("21.88"));
        assert!(scores.contains("Strongest"));
        assert_eq!(scores.matches("Relevance").count(), 4);
    }

    #[test]
    fn tenders_table_shows_expiry_status() {
        let mut tenders = sample_tenders();
        tenders.push(TenderOffer::new("tender-4", "Open Co", "Fencing", 9_000.0, 14));

        // tender-1 expires 2024-02-14, tender-2 on 2024-03-05, tender-3 on 2024-03-25
        let rendered = render_tenders_table(&tenders, day(2024, 3, 1));
        assert!(rendered.contains("2024-02-14 (expired)"));
        assert!(rendered.contains("2024-03-05"));
        assert!(!rendered.contains("2024-03-05 (expired)"));
        assert!(rendered.contains("open"));

        let still_valid = render_tenders_table(&tenders, day(2024, 2, 14));
        assert!(!still_valid.contains("(expired)"));
    }

    #[test]
    fn analysis_tables_render() {
        let metrics = compute_metrics(&sample_tenders()).expect("metrics");
        let rendered = render_metrics_table(&metrics);
        assert!(rendered.contains("median 125000"));
        assert!(rendered.contains("excellent: 1"));

        let comparison = benchmark_tender(&sample_tenders()[2]).expect("benchmark");
        let rendered = render_benchmark_table(&comparison);
        assert!(rendered.starts_with("Benchmark for tender-3"));
        assert!(rendered.contains("Risk: high"));
    }
}
