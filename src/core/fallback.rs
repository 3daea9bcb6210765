//! Offline stand-in for the chat backend.
//!
//! When the real transport fails, the dispatcher hands the request here and
//! gets back a plausible, deterministic response. Classification is plain
//! substring matching over an ordered rule list per persona: the first rule
//! with a matching keyword picks the template, otherwise the persona's default
//! template is used. Templates only interpolate the merchant id and scale
//! figures derived from the multiplier.

use crate::core::dispatch::{DispatchRequest, DispatchResult, DispatchSuccess};
use crate::core::persona::{ContextParams, Persona};
use serde_json::{json, Value};
use std::time::Duration;
use tracing::debug;

/// Simulated round trip applied before a synthesized response is returned.
pub const FALLBACK_LATENCY: Duration = Duration::from_millis(800);

/// Throughput the infrastructure projections are scaled from.
pub const BASELINE_TPS: u64 = 5_000;
const TPS_PER_NODE: u64 = 1_250;
const NODE_MONTHLY_COST_USD: u64 = 420;

const UNSPECIFIED_MERCHANT: &str = "unspecified merchant";
const TOKEN_PREFIX: &str = "fb-";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Template {
    GrowthDecline,
    GrowthMargin,
    GrowthConfig,
    GrowthSnapshot,
    InfraTraffic,
    InfraScale,
    InfraCost,
    InfraArchitecture,
    InfraAdvisory,
    RootCause,
    LogAnalysis,
    CodeReview,
    TransactionTrends,
    CapabilitySummary,
}

struct Rule {
    keywords: &'static [&'static str],
    template: Template,
}

struct RuleSet {
    rules: &'static [Rule],
    default: Template,
}

const GROWTH_RULES: RuleSet = RuleSet {
    rules: &[
        Rule {
            keywords: &["decline", "down"],
            template: Template::GrowthDecline,
        },
        Rule {
            keywords: &["margin", "profit"],
            template: Template::GrowthMargin,
        },
        Rule {
            keywords: &["config", "recommend"],
            template: Template::GrowthConfig,
        },
    ],
    default: Template::GrowthSnapshot,
};

const INFRA_RULES: RuleSet = RuleSet {
    rules: &[
        Rule {
            keywords: &["tps", "traffic"],
            template: Template::InfraTraffic,
        },
        Rule {
            keywords: &["scale", "capacity"],
            template: Template::InfraScale,
        },
        Rule {
            keywords: &["cost", "budget"],
            template: Template::InfraCost,
        },
        Rule {
            keywords: &["path", "architecture"],
            template: Template::InfraArchitecture,
        },
    ],
    default: Template::InfraAdvisory,
};

const GENERIC_RULES: RuleSet = RuleSet {
    rules: &[
        Rule {
            keywords: &["rca", "txn"],
            template: Template::RootCause,
        },
        Rule {
            keywords: &["log"],
            template: Template::LogAnalysis,
        },
        Rule {
            keywords: &["code", "function"],
            template: Template::CodeReview,
        },
        Rule {
            keywords: &["transaction", "trend"],
            template: Template::TransactionTrends,
        },
    ],
    default: Template::CapabilitySummary,
};

fn rules_for(persona: Persona) -> &'static RuleSet {
    match persona {
        Persona::Growth => &GROWTH_RULES,
        Persona::Infrastructure => &INFRA_RULES,
        Persona::Operations | Persona::Developer => &GENERIC_RULES,
    }
}

/// Pick the template for a lowercase message.
pub fn classify(persona: Persona, text: &str) -> Template {
    let rule_set = rules_for(persona);
    rule_set
        .rules
        .iter()
        .find(|rule| rule.keywords.iter().any(|keyword| text.contains(keyword)))
        .map(|rule| rule.template)
        .unwrap_or(rule_set.default)
}

/// Scale figures derived from the baseline throughput and a multiplier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScaleProjection {
    pub multiplier: u32,
    pub baseline_tps: u64,
    pub projected_tps: u64,
    pub nodes: u64,
    pub monthly_cost_usd: u64,
}

impl ScaleProjection {
    pub fn for_multiplier(multiplier: u32) -> Self {
        let multiplier = multiplier.max(1);
        let projected_tps = BASELINE_TPS * u64::from(multiplier);
        let nodes = projected_tps.div_ceil(TPS_PER_NODE);
        Self {
            multiplier,
            baseline_tps: BASELINE_TPS,
            projected_tps,
            nodes,
            monthly_cost_usd: nodes * NODE_MONTHLY_COST_USD,
        }
    }

    fn to_json(self) -> Value {
        json!({
            "multiplier": self.multiplier,
            "baseline_tps": self.baseline_tps,
            "projected_tps": self.projected_tps,
            "nodes": self.nodes,
            "monthly_cost_usd": self.monthly_cost_usd,
        })
    }
}

struct Rendered {
    text: String,
    data: Option<Value>,
}

impl Template {
    /// Action tag reported with responses produced by this template.
    pub fn action(self) -> &'static str {
        match self {
            Template::GrowthDecline => "growth_decline_analysis",
            Template::GrowthMargin => "growth_margin_analysis",
            Template::GrowthConfig => "growth_config_recommendation",
            Template::GrowthSnapshot => "growth_snapshot",
            Template::InfraTraffic => "infra_traffic_analysis",
            Template::InfraScale => "infra_scale_projection",
            Template::InfraCost => "infra_cost_estimate",
            Template::InfraArchitecture => "infra_architecture_review",
            Template::InfraAdvisory => "infra_advisory",
            Template::RootCause => "rca_analysis",
            Template::LogAnalysis => "log_analysis",
            Template::CodeReview => "code_review",
            Template::TransactionTrends => "transaction_trends",
            Template::CapabilitySummary => "capability_summary",
        }
    }

    fn render(self, persona: Persona, params: &ContextParams) -> Rendered {
        let merchant = params
            .merchant_id
            .as_deref()
            .unwrap_or(UNSPECIFIED_MERCHANT);
        let scale = ScaleProjection::for_multiplier(params.multiplier);

        match self {
            Template::GrowthDecline => Rendered {
                text: format!(
                    "Revenue decline analysis for {merchant}\n\
                     \n\
                     - Week-over-week volume: -12.4%\n\
                     - Largest drop: card-not-present payments (-18.1%)\n\
                     - Checkout abandonment: up 3.2 points since the last release\n\
                     \n\
                     Next steps:\n\
                     1. Compare authorization rates by issuer for the last 14 days\n\
                     2. Review payment method ordering on the checkout page"
                ),
                data: Some(json!({
                    "volume_change_pct": -12.4,
                    "cnp_change_pct": -18.1,
                    "abandonment_change_pts": 3.2,
                })),
            },
            Template::GrowthMargin => Rendered {
                text: format!(
                    "Margin breakdown for {merchant}\n\
                     \n\
                     - Gross processing volume: $1250000\n\
                     - Blended processing cost: 2.1%\n\
                     - Net margin: 1.4%\n\
                     \n\
                     Largest opportunity: route domestic debit through the lower-cost network \
                     (estimated +0.3% margin)."
                ),
                data: Some(json!({
                    "gross_volume_usd": 1_250_000,
                    "processing_cost_pct": 2.1,
                    "net_margin_pct": 1.4,
                })),
            },
            Template::GrowthConfig => Rendered {
                text: format!(
                    "Configuration recommendations for {merchant}\n\
                     \n\
                     1. Enable smart retries for soft declines\n\
                     2. Turn on network tokens for stored cards\n\
                     3. Add local payment methods for the top two cross-border markets"
                ),
                data: None,
            },
            Template::GrowthSnapshot => Rendered {
                text: format!(
                    "Growth snapshot for {merchant}\n\
                     \n\
                     - Authorization rate: 93.8%\n\
                     - Monthly active customers: 48200\n\
                     - Repeat purchase rate: 37%\n\
                     \n\
                     Ask about declines, margins, or configuration recommendations for a deeper view."
                ),
                data: Some(json!({
                    "authorization_rate_pct": 93.8,
                    "monthly_active_customers": 48_200,
                    "repeat_purchase_pct": 37,
                })),
            },
            Template::InfraTraffic => Rendered {
                text: format!(
                    "Traffic analysis for {merchant}\n\
                     \n\
                     - Baseline throughput: {} TPS\n\
                     - Projected peak at {}x: {} TPS\n\
                     - p99 gateway latency at baseline: 180 ms",
                    scale.baseline_tps, scale.multiplier, scale.projected_tps
                ),
                data: Some(scale.to_json()),
            },
            Template::InfraScale => Rendered {
                text: format!(
                    "Scale projection for {merchant} ({}x)\n\
                     \n\
                     - Baseline: {} TPS\n\
                     - Projected: {} TPS\n\
                     - Gateway nodes required: {} (at {TPS_PER_NODE} TPS per node)\n\
                     \n\
                     Pre-warm connection pools and raise database write capacity before the ramp.",
                    scale.multiplier, scale.baseline_tps, scale.projected_tps, scale.nodes
                ),
                data: Some(scale.to_json()),
            },
            Template::InfraCost => Rendered {
                text: format!(
                    "Cost estimate for {merchant} ({}x)\n\
                     \n\
                     - Projected throughput: {} TPS\n\
                     - Gateway nodes: {}\n\
                     - Estimated monthly cost: ${} (at ${NODE_MONTHLY_COST_USD} per node)",
                    scale.multiplier, scale.projected_tps, scale.nodes, scale.monthly_cost_usd
                ),
                data: Some(scale.to_json()),
            },
            Template::InfraArchitecture => Rendered {
                text: format!(
                    "Payment path review for {merchant}\n\
                     \n\
                     1. Edge load balancer -> API gateway\n\
                     2. Gateway -> risk scoring (synchronous, 40 ms budget)\n\
                     3. Router -> acquirer connectors with per-connector circuit breakers\n\
                     4. Ledger writes through an outbox to the settlement pipeline\n\
                     \n\
                     Single points of failure: none detected; risk scoring is the tightest budget."
                ),
                data: None,
            },
            Template::InfraAdvisory => Rendered {
                text: format!(
                    "Infrastructure advisory for {merchant}\n\
                     \n\
                     Current plan supports {} TPS at {}x load on {} gateway nodes.\n\
                     Ask about traffic, scaling, cost, or the payment path architecture.",
                    scale.projected_tps, scale.multiplier, scale.nodes
                ),
                data: Some(scale.to_json()),
            },
            Template::RootCause => Rendered {
                text: "Root cause analysis\n\
                       \n\
                       - Symptom: elevated transaction failures (4.2% over 30 minutes)\n\
                       - Probable cause: acquirer connector timeouts after a certificate rotation\n\
                       - Blast radius: card payments routed through the primary acquirer\n\
                       \n\
                       Mitigation: fail over to the secondary acquirer and re-run the connector health check."
                    .to_string(),
                data: Some(json!({ "failure_rate_pct": 4.2, "window_minutes": 30 })),
            },
            Template::LogAnalysis => Rendered {
                text: "Log analysis\n\
                       \n\
                       - 1284 ERROR entries in the last hour, 91% from the connector service\n\
                       - Most frequent: \"upstream request timeout after 5000ms\"\n\
                       - First occurrence lines up with the 14:02 deployment"
                    .to_string(),
                data: Some(json!({ "error_count": 1284, "dominant_source_pct": 91 })),
            },
            Template::CodeReview => Rendered {
                text: "Code review notes\n\
                       \n\
                       1. Retry loop lacks jitter; concurrent clients will retry in lockstep\n\
                       2. Idempotency key is generated after the first network call\n\
                       3. Amounts are handled as floating point; use integer minor units"
                    .to_string(),
                data: None,
            },
            Template::TransactionTrends => Rendered {
                text: "Transaction trends (last 7 days)\n\
                       \n\
                       - Daily volume: steady at about 212000 transactions\n\
                       - Success rate: 96.1% (down 0.4 points)\n\
                       - Peak hour: 19:00-20:00 local time"
                    .to_string(),
                data: Some(json!({
                    "daily_transactions": 212_000,
                    "success_rate_pct": 96.1,
                })),
            },
            Template::CapabilitySummary => Rendered {
                text: format!(
                    "{} ({})\n\
                     \n\
                     I can help with:\n\
                     - Root cause analysis for failing transactions\n\
                     - Log analysis\n\
                     - Code review\n\
                     - Transaction trends",
                    persona.display_name(),
                    persona.role()
                ),
                data: None,
            },
        }
    }
}

/// Deterministic rule-based responder used when the backend is unavailable.
#[derive(Debug, Clone)]
pub struct FallbackSynthesizer {
    latency: Duration,
}

impl Default for FallbackSynthesizer {
    fn default() -> Self {
        Self::new(FALLBACK_LATENCY)
    }
}

impl FallbackSynthesizer {
    pub fn new(latency: Duration) -> Self {
        Self { latency }
    }

    /// Build the response without the simulated delay.
    ///
    /// `request.text` is expected to be lowercase already; the dispatcher
    /// normalizes it before falling back.
    pub fn compose(&self, request: &DispatchRequest) -> DispatchSuccess {
        let params = request.params.scoped_for(request.persona);
        let template = classify(request.persona, &request.text);
        let rendered = template.render(request.persona, &params);

        let session_token = request
            .session_token
            .clone()
            .filter(|token| !token.trim().is_empty())
            .unwrap_or_else(generate_session_token);

        DispatchSuccess {
            response: rendered.text,
            session_token: Some(session_token),
            action: Some(template.action().to_string()),
            data: rendered.data,
            merchant_id: params.merchant_id,
        }
    }

    /// Compose a response after the simulated latency. Never fails.
    pub async fn synthesize(&self, request: &DispatchRequest) -> DispatchResult {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        let success = self.compose(request);
        debug!(
            persona = request.persona.id(),
            action = success.action.as_deref().unwrap_or_default(),
            "synthesized fallback response"
        );
        DispatchResult::Success(success)
    }
}

/// Random session token for conversations started while offline.
fn generate_session_token() -> String {
    let mut bytes = [0u8; 16];
    if getrandom::fill(&mut bytes).is_err() {
        let nanos = chrono::Utc::now()
            .timestamp_nanos_opt()
            .unwrap_or_default()
            .unsigned_abs();
        bytes[..8].copy_from_slice(&nanos.to_be_bytes());
        bytes[8..].copy_from_slice(&std::process::id().to_be_bytes().repeat(2));
    }
    let hex: String = bytes.iter().map(|byte| format!("{byte:02x}")).collect();
    format!("{TOKEN_PREFIX}{hex}")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(persona: Persona, text: &str, params: ContextParams) -> DispatchRequest {
        DispatchRequest {
            persona,
            text: text.to_string(),
            session_token: None,
            params,
        }
    }

    #[test]
    fn infra_scale_rule_wins_over_cost() {
        assert_eq!(
            classify(Persona::Infrastructure, "what will it cost to scale 4x?"),
            Template::InfraScale
        );
        assert_eq!(
            classify(Persona::Infrastructure, "monthly budget please"),
            Template::InfraCost
        );
        assert_eq!(
            classify(Persona::Infrastructure, "peak tps and capacity"),
            Template::InfraTraffic
        );
        assert_eq!(
            classify(Persona::Infrastructure, "hello"),
            Template::InfraAdvisory
        );
    }

    #[test]
    fn growth_rules_follow_declared_order() {
        assert_eq!(
            classify(Persona::Growth, "profit is down"),
            Template::GrowthDecline
        );
        assert_eq!(
            classify(Persona::Growth, "recommend a margin fix"),
            Template::GrowthMargin
        );
        assert_eq!(
            classify(Persona::Growth, "which config should i change"),
            Template::GrowthConfig
        );
        assert_eq!(classify(Persona::Growth, "hi"), Template::GrowthSnapshot);
    }

    #[test]
    fn generic_personas_share_one_rule_list() {
        for persona in [Persona::Operations, Persona::Developer] {
            assert_eq!(classify(persona, "rca for txn 991"), Template::RootCause);
            assert_eq!(classify(persona, "check the logs"), Template::LogAnalysis);
            assert_eq!(classify(persona, "review this function"), Template::CodeReview);
            assert_eq!(
                classify(persona, "transaction volume"),
                Template::TransactionTrends
            );
            assert_eq!(classify(persona, "hello"), Template::CapabilitySummary);
        }
    }

    #[test]
    fn scale_projection_multiplies_baseline() {
        let projection = ScaleProjection::for_multiplier(4);
        assert_eq!(projection.baseline_tps, 5_000);
        assert_eq!(projection.projected_tps, 20_000);
        assert_eq!(projection.nodes, 16);
        assert_eq!(projection.monthly_cost_usd, 16 * 420);

        assert_eq!(ScaleProjection::for_multiplier(0).projected_tps, 5_000);
    }

    #[test]
    fn scale_response_reports_projected_figure() {
        let synth = FallbackSynthesizer::new(Duration::ZERO);
        let success = synth.compose(&request(
            Persona::Infrastructure,
            "can we scale?",
            ContextParams::new(Some("m-77".to_string()), 4),
        ));

        assert_eq!(success.action.as_deref(), Some("infra_scale_projection"));
        assert!(success.response.contains("Projected: 20000 TPS"));
        assert!(success.response.contains("m-77"));
        let data = success.data.expect("scale data");
        assert_eq!(data["projected_tps"], 20_000);
        assert_eq!(success.merchant_id.as_deref(), Some("m-77"));
    }

    #[test]
    fn synthesis_is_deterministic_apart_from_token() {
        let synth = FallbackSynthesizer::new(Duration::ZERO);
        let params = ContextParams::new(Some("m-1".to_string()), 2);
        let first = synth.compose(&request(Persona::Growth, "margin check", params.clone()));
        let second = synth.compose(&request(Persona::Growth, "margin check", params));

        assert_eq!(first.action, second.action);
        assert_eq!(first.response, second.response);
        assert_eq!(first.data, second.data);
        assert_ne!(first.session_token, second.session_token);
    }

    #[test]
    fn existing_token_is_echoed_and_missing_one_generated() {
        let synth = FallbackSynthesizer::new(Duration::ZERO);
        let mut req = request(Persona::Operations, "hi", ContextParams::default());

        let generated = synth.compose(&req).session_token.expect("token");
        assert!(generated.starts_with(TOKEN_PREFIX));
        assert_eq!(generated.len(), TOKEN_PREFIX.len() + 32);

        req.session_token = Some("sess-existing".to_string());
        assert_eq!(
            synth.compose(&req).session_token.as_deref(),
            Some("sess-existing")
        );
    }

    #[test]
    fn missing_merchant_is_rendered_as_unspecified() {
        let synth = FallbackSynthesizer::new(Duration::ZERO);
        let success = synth.compose(&request(
            Persona::Growth,
            "hi",
            ContextParams::default(),
        ));
        assert!(success.response.contains(UNSPECIFIED_MERCHANT));
        assert!(success.merchant_id.is_none());
    }

    #[test]
    fn params_outside_persona_scope_are_ignored() {
        let synth = FallbackSynthesizer::new(Duration::ZERO);
        let success = synth.compose(&request(
            Persona::Developer,
            "hello",
            ContextParams::new(Some("m-9".to_string()), 8),
        ));
        assert!(!success.response.contains("m-9"));
        assert!(success.merchant_id.is_none());
    }

    #[tokio::test]
    async fn synthesize_waits_out_the_latency_and_succeeds() {
        let latency = Duration::from_millis(60);
        let synth = FallbackSynthesizer::new(latency);
        let started = std::time::Instant::now();
        let result = synth
            .synthesize(&request(Persona::Operations, "", ContextParams::default()))
            .await;
        let elapsed = started.elapsed();
        assert!(result.is_success());
        assert!(elapsed >= latency, "reply arrived after {elapsed:?}");
    }
}
