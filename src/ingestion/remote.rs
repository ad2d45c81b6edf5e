use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::{info, warn};

use crate::config::AnalysisServiceConfig;
use crate::error::{TenderError, TenderResult};
use crate::ingestion::ExtractedTender;
use crate::types::{RiskLevel, TenderOffer};

const IMPORTED_SUPPLIER: &str = "You";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AnalyzeRequest {
    pub title: String,
    pub description: String,
    pub estimated_value: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AnalyzeResponse {
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub bid_recommendation: BidRecommendation,
    #[serde(default)]
    pub pricing_analysis: PricingAnalysis,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct BidRecommendation {
    pub bid_range_max_amt: Option<f64>,
    pub risk_level: Option<String>,
    pub reasoning: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PricingAnalysis {
    pub stats: Option<PricingStats>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PricingStats {
    pub avg_ratio: Option<f64>,
}

#[async_trait]
pub trait AnalysisService: Send + Sync {
    async fn analyze(&self, request: &AnalyzeRequest) -> TenderResult<AnalyzeResponse>;
}

pub struct HttpAnalysisService {
    client: Client,
    base_url: String,
}

impl HttpAnalysisService {
    pub fn new(config: &AnalysisServiceConfig) -> TenderResult<Self> {
        let client = Client::builder()
            .user_agent(concat!("tender-optimizer/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .build()
            .map_err(|e| TenderError::ExternalSource(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn analyze_url(&self) -> String {
        format!("{}/analyze", self.base_url)
    }
}

#[async_trait]
impl AnalysisService for HttpAnalysisService {
    async fn analyze(&self, request: &AnalyzeRequest) -> TenderResult<AnalyzeResponse> {
        let url = self.analyze_url();
        let response = self
            .client
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(|e| TenderError::ExternalSource(format!("failed POST {url}: {e}")))?;
        let status = response.status();
        let body = response.text().await.map_err(|e| {
            TenderError::ExternalSource(format!("failed reading response body: {url}: {e}"))
        })?;
        if !status.is_success() {
            let preview: String = body.chars().take(180).collect();
            return Err(TenderError::ExternalSource(format!(
                "POST {url} returned {status}: {preview}"
            )));
        }
        serde_json::from_str(&body)
            .map_err(|e| TenderError::ExternalSource(format!("invalid JSON response: {url}: {e}")))
    }
}

pub fn extracted_from_response(
    request: &AnalyzeRequest,
    response: &AnalyzeResponse,
) -> ExtractedTender {
    let risk_level = response
        .bid_recommendation
        .risk_level
        .as_deref()
        .and_then(|raw| match RiskLevel::from_str(raw) {
            Ok(level) => Some(level),
            Err(err) => {
                warn!("{err}; falling back to default risk");
                None
            }
        });
    let project_name = if response.keywords.is_empty() {
        Some(request.title.clone())
    } else {
        Some(response.keywords.join(", "))
    };

    ExtractedTender {
        supplier_name: Some(IMPORTED_SUPPLIER.to_string()),
        project_name,
        total_cost: response.bid_recommendation.bid_range_max_amt,
        currency: currency_from_estimate(&request.estimated_value),
        quality: response
            .pricing_analysis
            .stats
            .as_ref()
            .and_then(|s| s.avg_ratio)
            .map(|ratio| ratio * 10.0),
        risk_level,
        description: response.bid_recommendation.reasoning.clone(),
        confidence: 1.0,
        ..ExtractedTender::default()
    }
}

pub async fn import_tender(
    service: &dyn AnalysisService,
    request: &AnalyzeRequest,
) -> TenderResult<TenderOffer> {
    let response = service.analyze(request).await?;
    let id = import_id(request);
    let offer = extracted_from_response(request, &response).into_offer(&id)?;
    info!("imported tender {} ({})", offer.id, offer.project_name);
    Ok(offer)
}

/// Stable id so repeated imports of the same document collide.
pub fn import_id(request: &AnalyzeRequest) -> String {
    let mut hasher = Sha256::new();
    hasher.update(request.title.as_bytes());
    hasher.update([0u8]);
    hasher.update(request.description.as_bytes());
    let digest = format!("{:x}", hasher.finalize());
    format!("tender-{}", &digest[..12])
}

fn currency_from_estimate(estimated_value: &str) -> Option<String> {
    estimated_value
        .split_whitespace()
        .last()
        .filter(|token| token.len() == 3 && token.chars().all(|c| c.is_ascii_alphabetic()))
        .map(|token| token.to_ascii_uppercase())
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use axum::routing::post;
    use axum::{Json, Router};
    use serde_json::json;

    use crate::config::AnalysisServiceConfig;
    use crate::error::{TenderError, TenderResult};
    use crate::ingestion::remote::{
        extracted_from_response, import_id, import_tender, AnalysisService, AnalyzeRequest,
        AnalyzeResponse, HttpAnalysisService,
    };
    use crate::types::RiskLevel;

    struct StubService(TenderResult<AnalyzeResponse>);

    #[async_trait]
    impl AnalysisService for StubService {
        async fn analyze(&self, _request: &AnalyzeRequest) -> TenderResult<AnalyzeResponse> {
            self.0.clone()
        }
    }

    fn request() -> AnalyzeRequest {
        AnalyzeRequest {
            title: "Uploaded Tender".to_string(),
            description: "Road resurfacing works".to_string(),
            estimated_value: "1000000 SGD".to_string(),
        }
    }

    fn sample_response() -> AnalyzeResponse {
        serde_json::from_value(json!({
            "keywords": ["road", "resurfacing"],
            "similar_tenders": [],
            "bid_recommendation": {
                "bid_range_max_amt": 910000.0,
                "risk_level": "LOW",
                "reasoning": "Comparable awards cluster below estimate"
            },
            "pricing_analysis": { "stats": { "avg_ratio": 0.82 } }
        }))
        .expect("decode response")
    }

    #[test]
    fn maps_response_fields() {
        let extracted = extracted_from_response(&request(), &sample_response());
        assert_eq!(extracted.project_name.as_deref(), Some("road, resurfacing"));
        assert_eq!(extracted.total_cost, Some(910_000.0));
        assert_eq!(extracted.risk_level, Some(RiskLevel::Low));
        assert_eq!(extracted.currency.as_deref(), Some("SGD"));
        assert!((extracted.quality.unwrap_or_default() - 8.2).abs() < 1e-9);
        assert!(extracted.technical.is_none());
    }

    #[test]
    fn unknown_risk_falls_back_to_default() {
        let mut response = sample_response();
        response.bid_recommendation.risk_level = Some("volatile".to_string());
        response.pricing_analysis.stats = None;
        let offer = extracted_from_response(&request(), &response)
            .into_offer("t")
            .expect("offer");
        assert_eq!(offer.risk_level, RiskLevel::Medium);
        assert!((offer.capabilities().quality - 7.5).abs() < 1e-9);
    }

    #[test]
    fn import_ids_are_stable() {
        assert_eq!(import_id(&request()), import_id(&request()));
        let mut other = request();
        other.description.push('!');
        assert_ne!(import_id(&request()), import_id(&other));
        assert!(import_id(&request()).starts_with("tender-"));
    }

    #[tokio::test]
    async fn import_surfaces_service_failure() {
        let failing = StubService(Err(TenderError::ExternalSource("down".to_string())));
        let err = import_tender(&failing, &request()).await.expect_err("must fail");
        assert_eq!(err, TenderError::ExternalSource("down".to_string()));
    }

    #[test]
    fn import_requires_a_bid_amount() {
        let mut response = sample_response();
        response.bid_recommendation.bid_range_max_amt = None;
        let err = tokio_test::block_on(import_tender(&StubService(Ok(response)), &request()))
            .expect_err("no cost");
        assert!(matches!(err, TenderError::InvalidAttribute { .. }));
    }

    #[tokio::test]
    async fn http_service_round_trip() {
        let app = Router::new().route(
            "/analyze",
            post(|Json(body): Json<AnalyzeRequest>| async move {
                Json(json!({
                    "keywords": [body.title],
                    "bid_recommendation": { "bid_range_max_amt": 5000.0, "risk_level": "high" },
                    "pricing_analysis": {}
                }))
            }),
        );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind");
        let addr = listener.local_addr().expect("addr");
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        let service = HttpAnalysisService::new(&AnalysisServiceConfig {
            base_url: format!("http://{addr}/"),
            ..AnalysisServiceConfig::default()
        })
        .expect("client");
        let offer = import_tender(&service, &request()).await.expect("import");
        assert_eq!(offer.project_name, "Uploaded Tender");
        assert_eq!(offer.total_cost, 5000.0);
        assert_eq!(offer.risk_level, RiskLevel::High);
    }

    #[tokio::test]
    async fn http_service_reports_connection_failure() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind");
        let addr = listener.local_addr().expect("addr");
        drop(listener);

        let service = HttpAnalysisService::new(&AnalysisServiceConfig {
            base_url: format!("http://{addr}"),
            ..AnalysisServiceConfig::default()
        })
        .expect("client");
        let err = service.analyze(&request()).await.expect_err("refused");
        assert!(matches!(err, TenderError::ExternalSource(_)));
    }
}
