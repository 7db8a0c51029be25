//! Tip service - Short educational tips about allowance choices
//!
//! The generative provider is the primary source. Any failure to obtain a
//! usable reply degrades to the rule-based fallback from the domain layer,
//! so producing a tip never fails.

use std::{fmt, sync::Arc, time::Instant};

use domain::{TipRequest, format_amount};
use tracing::{debug, info, instrument, warn};

use crate::ports::InferencePort;

/// Where a tip's text came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TipSource {
    /// Produced by the generative provider
    Generated,
    /// Rendered from the rule-based fallback
    Fallback,
}

/// A tip ready to return to the caller
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tip {
    pub text: String,
    pub source: TipSource,
}

/// Why the generative path was abandoned
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DegradationReason {
    /// No credential configured; the provider was not called
    NotConfigured,
    /// The provider call failed
    Upstream(String),
    /// The provider answered with blank text
    EmptyReply,
}

impl fmt::Display for DegradationReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotConfigured => write!(f, "provider not configured"),
            Self::Upstream(e) => write!(f, "provider error: {e}"),
            Self::EmptyReply => write!(f, "provider returned an empty reply"),
        }
    }
}

/// Result of trying the generative path
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TipOutcome {
    Generated(String),
    Degraded(DegradationReason),
}

impl TipOutcome {
    /// Resolve to a tip, rendering the fallback for `request` when degraded
    ///
    /// The fallback ignores the degradation reason.
    #[must_use]
    pub fn into_tip(self, request: &TipRequest) -> Tip {
        match self {
            Self::Generated(text) => Tip {
                text,
                source: TipSource::Generated,
            },
            Self::Degraded(_) => Tip {
                text: request.fallback_tip(),
                source: TipSource::Fallback,
            },
        }
    }
}

/// Build the prompt sent to the generative provider
///
/// Deterministic for a given request.
#[must_use]
pub fn build_prompt(request: &TipRequest) -> String {
    format!(
        "You are a friendly money coach helping a kid learn about their allowance. \
         The kid chose to {action} a {item} that costs ${price}. \
         Their current balance is ${balance}. \
         Reply with one short educational tip of under 20 words. \
         If they chose to save or skip, praise the choice. \
         If they chose to buy, gently point out what they are trading off.",
        action = request.action(),
        item = request.item_name(),
        price = format_amount(request.price()),
        balance = format_amount(request.balance()),
    )
}

/// Service producing tips with graceful degradation
pub struct TipService {
    inference: Arc<dyn InferencePort>,
}

impl fmt::Debug for TipService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TipService")
            .field("configured", &self.inference.is_configured())
            .finish_non_exhaustive()
    }
}

impl TipService {
    /// Create a new tip service
    pub fn new(inference: Arc<dyn InferencePort>) -> Self {
        Self { inference }
    }

    /// Try the generative path once
    #[instrument(skip(self, request), fields(action = %request.kind()))]
    pub async fn attempt(&self, request: &TipRequest) -> TipOutcome {
        if !self.inference.is_configured() {
            return TipOutcome::Degraded(DegradationReason::NotConfigured);
        }

        let prompt = build_prompt(request);
        debug!(prompt = %prompt, "Requesting generated tip");

        let start = Instant::now();
        match self.inference.generate(&prompt).await {
            Ok(result) if result.content.trim().is_empty() => {
                TipOutcome::Degraded(DegradationReason::EmptyReply)
            },
            Ok(result) => {
                debug!(
                    model = %result.model,
                    tokens = ?result.tokens_used,
                    latency_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX),
                    "Tip generated"
                );
                TipOutcome::Generated(result.content)
            },
            Err(e) => TipOutcome::Degraded(DegradationReason::Upstream(e.to_string())),
        }
    }

    /// Produce a tip for `request`; never fails
    #[instrument(skip(self, request), fields(action = %request.kind(), item = %request.item_name()))]
    pub async fn generate_tip(&self, request: &TipRequest) -> Tip {
        let outcome = self.attempt(request).await;

        match &outcome {
            TipOutcome::Generated(_) => info!("Serving generated tip"),
            TipOutcome::Degraded(DegradationReason::NotConfigured) => {
                info!("Serving fallback tip: provider not configured");
            },
            TipOutcome::Degraded(reason) => warn!(%reason, "Serving fallback tip"),
        }

        outcome.into_tip(request)
    }

    /// Get the current model name
    pub fn current_model(&self) -> String {
        self.inference.current_model()
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::error::ApplicationError;
    use crate::ports::{InferenceResult, MockInferencePort};

    fn mock_inference_result(content: &str) -> InferenceResult {
        InferenceResult {
            content: content.to_string(),
            model: "test-model".to_string(),
            tokens_used: Some(42),
            latency_ms: 100,
        }
    }

    fn configured_mock() -> MockInferencePort {
        let mut mock = MockInferencePort::new();
        mock.expect_is_configured().returning(|| true);
        mock
    }

    fn buy_toy() -> TipRequest {
        TipRequest::new("buy", "toy", 5.0, 10.0).unwrap()
    }

    // ============ Prompt Tests ============

    #[test]
    fn prompt_embeds_all_fields() {
        let request = TipRequest::new("save", "bike", 120.5, 300.0).unwrap();
        let prompt = build_prompt(&request);

        assert!(prompt.contains("to save a bike"));
        assert!(prompt.contains("$120.5"));
        assert!(prompt.contains("$300"));
        assert!(prompt.contains("under 20 words"));
    }

    #[test]
    fn prompt_is_deterministic() {
        assert_eq!(build_prompt(&buy_toy()), build_prompt(&buy_toy()));
    }

    // ============ Generation Tests ============

    #[tokio::test]
    async fn generated_tip_is_returned_verbatim() {
        let mut mock = configured_mock();
        mock.expect_generate()
            .times(1)
            .returning(|_| Ok(mock_inference_result("  Wait a week, then decide! ")));

        let service = TipService::new(Arc::new(mock));
        let tip = service.generate_tip(&buy_toy()).await;

        assert_eq!(tip.text, "  Wait a week, then decide! ");
        assert_eq!(tip.source, TipSource::Generated);
    }

    #[tokio::test]
    async fn generate_receives_built_prompt() {
        let request = buy_toy();
        let expected = build_prompt(&request);

        let mut mock = configured_mock();
        mock.expect_generate()
            .withf(move |prompt| prompt == expected.as_str())
            .times(1)
            .returning(|_| Ok(mock_inference_result("ok")));

        let service = TipService::new(Arc::new(mock));
        assert_eq!(
            service.attempt(&request).await,
            TipOutcome::Generated("ok".to_string())
        );
    }

    // ============ Degradation Tests ============

    #[tokio::test]
    async fn unconfigured_provider_is_not_called() {
        let mut mock = MockInferencePort::new();
        mock.expect_is_configured().returning(|| false);
        mock.expect_generate().never();

        let service = TipService::new(Arc::new(mock));
        let request = buy_toy();

        assert_eq!(
            service.attempt(&request).await,
            TipOutcome::Degraded(DegradationReason::NotConfigured)
        );

        let tip = service.generate_tip(&request).await;
        assert_eq!(tip.text, "Buying costs $5. That's a lot! Maybe wait a week?");
        assert_eq!(tip.source, TipSource::Fallback);
    }

    #[tokio::test]
    async fn upstream_error_degrades() {
        let mut mock = configured_mock();
        mock.expect_generate()
            .returning(|_| Err(ApplicationError::Inference("timeout".to_string())));

        let service = TipService::new(Arc::new(mock));
        let request = TipRequest::new("saving", "book", 3.0, 12.5).unwrap();

        let outcome = service.attempt(&request).await;
        assert!(matches!(
            outcome,
            TipOutcome::Degraded(DegradationReason::Upstream(ref e)) if e.contains("timeout")
        ));

        let tip = service.generate_tip(&request).await;
        assert_eq!(tip.text, "Great job saving! You now have $12.5. Keep it up!");
    }

    #[tokio::test]
    async fn blank_reply_degrades() {
        let mut mock = configured_mock();
        mock.expect_generate()
            .returning(|_| Ok(mock_inference_result(" \n ")));

        let service = TipService::new(Arc::new(mock));
        let request = TipRequest::new("skip", "candy", 1.0, 2.0).unwrap();

        assert_eq!(
            service.attempt(&request).await,
            TipOutcome::Degraded(DegradationReason::EmptyReply)
        );
        assert_eq!(
            service.generate_tip(&request).await.text,
            "Before you spend, ask yourself: do I need it, or do I just want it?"
        );
    }

    #[test]
    fn fallback_ignores_reason() {
        let request = buy_toy();
        let a = TipOutcome::Degraded(DegradationReason::NotConfigured).into_tip(&request);
        let b = TipOutcome::Degraded(DegradationReason::Upstream("boom".into())).into_tip(&request);
        let c = TipOutcome::Degraded(DegradationReason::EmptyReply).into_tip(&request);
        assert_eq!(a, b);
        assert_eq!(b, c);
    }

    #[test]
    fn degradation_reason_display() {
        assert_eq!(
            DegradationReason::Upstream("Rate limit exceeded".into()).to_string(),
            "provider error: Rate limit exceeded"
        );
        assert_eq!(
            DegradationReason::NotConfigured.to_string(),
            "provider not configured"
        );
    }

    #[test]
    fn current_model_delegates() {
        let mut mock = MockInferencePort::new();
        mock.expect_current_model()
            .returning(|| "gemini-2.0-flash".to_string());
        let service = TipService::new(Arc::new(mock));
        assert_eq!(service.current_model(), "gemini-2.0-flash");
    }

    proptest! {
        #[test]
        fn prompt_mentions_item_and_amounts(
            item in "[a-z]{1,12}",
            price in 0u32..10_000u32,
            balance in 0u32..10_000u32,
        ) {
            let request =
                TipRequest::new("buy", item.clone(), f64::from(price), f64::from(balance)).unwrap();
            let prompt = build_prompt(&request);
            prop_assert!(prompt.contains(&item));
            let price_text = format!("${price}");
            let balance_text = format!("${balance}");
            prop_assert!(prompt.contains(&price_text));
            prop_assert!(prompt.contains(&balance_text));
        }
    }
}
