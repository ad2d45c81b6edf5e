use chrono::NaiveDate;
use once_cell::sync::Lazy;

use crate::types::{Capabilities, RiskLevel, TenderOffer};

static SAMPLE_TENDERS: Lazy<Vec<TenderOffer>> = Lazy::new(build_samples);

pub fn sample_tenders() -> Vec<TenderOffer> {
    SAMPLE_TENDERS.clone()
}

fn build_samples() -> Vec<TenderOffer> {
    vec![
        TenderOffer::new(
            "tender-1",
            "ABC Construction Ltd.",
            "Office Building Renovation",
            125_000.0,
            45,
        )
        .with_capabilities(Capabilities {
            quality: 8.5,
            reliability: 8.0,
            technical: 9.0,
            financial_stability: 8.0,
            past_performance: 7.0,
        })
        .with_risk(RiskLevel::Medium)
        .with_description(
            "Comprehensive renovation services including electrical, plumbing, and structural work.",
            "Payment 30% upfront, 40% at 50% completion, 30% upon final delivery.",
        )
        .with_submission(date(2024, 1, 15), 30),
        TenderOffer::new(
            "tender-2",
            "XYZ Services Inc.",
            "IT Infrastructure Upgrade",
            85_000.0,
            30,
        )
        .with_currency("EUR")
        .with_capabilities(Capabilities {
            quality: 9.0,
            reliability: 9.0,
            technical: 8.5,
            financial_stability: 9.0,
            past_performance: 8.0,
        })
        .with_risk(RiskLevel::Low)
        .with_description(
            "Complete IT infrastructure upgrade including servers, networking, and security systems.",
            "Payment 50% upfront, 50% upon completion.",
        )
        .with_submission(date(2024, 1, 20), 45),
        TenderOffer::new(
            "tender-3",
            "Tech Solutions Corp",
            "Software Development",
            200_000.0,
            60,
        )
        .with_capabilities(Capabilities {
            quality: 7.5,
            reliability: 7.0,
            technical: 9.5,
            financial_stability: 6.0,
            past_performance: 6.0,
        })
        .with_risk(RiskLevel::High)
        .with_description(
            "Custom software development for inventory management system with mobile app.",
            "Payment 25% upfront, 25% at milestone 1, 25% at milestone 2, 25% upon delivery.",
        )
        .with_submission(date(2024, 1, 25), 60),
    ]
}

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or_default()
}
