//! Tip request entity and the rule-based fallback tip
//!
//! The fallback tip is a pure function of the request. It is used whenever
//! the generative provider cannot produce a reply, regardless of why.

use std::fmt;

use crate::errors::DomainError;

/// Kind of financial choice a tip is about
///
/// Classification is a case-insensitive substring match on the free-form
/// action text, checked in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TipAction {
    /// The action mentions buying ("buy", "Buying", ...)
    Buy,
    /// The action mentions saving ("save", "saving for later", ...)
    Save,
    /// Anything else, e.g. "skip"
    Other,
}

impl TipAction {
    /// Classify a free-form action description
    #[must_use]
    pub fn classify(action: &str) -> Self {
        let action = action.to_lowercase();
        if action.contains("buy") {
            Self::Buy
        } else if action.contains("sav") {
            Self::Save
        } else {
            Self::Other
        }
    }
}

impl fmt::Display for TipAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Buy => write!(f, "buy"),
            Self::Save => write!(f, "save"),
            Self::Other => write!(f, "other"),
        }
    }
}

/// A request for a short educational tip about a financial choice
#[derive(Debug, Clone, PartialEq)]
pub struct TipRequest {
    action: String,
    item_name: String,
    price: f64,
    balance: f64,
}

impl TipRequest {
    /// Create a new tip request
    ///
    /// `price` and `balance` must be finite and non-negative.
    pub fn new(
        action: impl Into<String>,
        item_name: impl Into<String>,
        price: f64,
        balance: f64,
    ) -> Result<Self, DomainError> {
        check_amount("price", price)?;
        check_amount("balance", balance)?;

        Ok(Self {
            action: action.into(),
            item_name: item_name.into(),
            price,
            balance,
        })
    }

    #[must_use]
    pub fn action(&self) -> &str {
        &self.action
    }

    #[must_use]
    pub fn item_name(&self) -> &str {
        &self.item_name
    }

    #[must_use]
    pub const fn price(&self) -> f64 {
        self.price
    }

    #[must_use]
    pub const fn balance(&self) -> f64 {
        self.balance
    }

    /// Classified kind of this request's action
    #[must_use]
    pub fn kind(&self) -> TipAction {
        TipAction::classify(&self.action)
    }

    /// Rule-based tip for this request
    #[must_use]
    pub fn fallback_tip(&self) -> String {
        fallback_tip(&self.action, self.price, self.balance)
    }
}

fn check_amount(field: &str, value: f64) -> Result<(), DomainError> {
    if !value.is_finite() {
        return Err(DomainError::validation(format!("{field} must be a finite number")));
    }
    if value < 0.0 {
        return Err(DomainError::validation(format!(
            "{field} must not be negative, got {value}"
        )));
    }
    Ok(())
}

/// Render a monetary amount the way it was received
///
/// Uses the shortest representation that round-trips, so `5.0` renders as
/// `5` and `4.5` as `4.5`.
#[must_use]
#[allow(clippy::float_cmp)]
pub fn format_amount(amount: f64) -> String {
    if amount == 0.0 {
        return "0".to_string();
    }
    format!("{amount}")
}

/// Deterministic tip used when no generated tip is available
#[must_use]
pub fn fallback_tip(action: &str, price: f64, balance: f64) -> String {
    match TipAction::classify(action) {
        TipAction::Buy => format!(
            "Buying costs ${}. That's a lot! Maybe wait a week?",
            format_amount(price)
        ),
        TipAction::Save => format!(
            "Great job saving! You now have ${}. Keep it up!",
            format_amount(balance)
        ),
        TipAction::Other => {
            "Before you spend, ask yourself: do I need it, or do I just want it?".to_string()
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_buy_variants() {
        assert_eq!(TipAction::classify("buy"), TipAction::Buy);
        assert_eq!(TipAction::classify("buying"), TipAction::Buy);
        assert_eq!(TipAction::classify("BUY NOW"), TipAction::Buy);
    }

    #[test]
    fn classify_save_variants() {
        assert_eq!(TipAction::classify("save"), TipAction::Save);
        assert_eq!(TipAction::classify("saving for later"), TipAction::Save);
        assert_eq!(TipAction::classify("Savings"), TipAction::Save);
    }

    #[test]
    fn classify_other() {
        assert_eq!(TipAction::classify("skip"), TipAction::Other);
        assert_eq!(TipAction::classify("skipping"), TipAction::Other);
        assert_eq!(TipAction::classify(""), TipAction::Other);
    }

    #[test]
    fn buy_wins_over_save() {
        assert_eq!(TipAction::classify("save then buy"), TipAction::Buy);
    }

    #[test]
    fn fallback_for_buy_matches_reference_text() {
        assert_eq!(
            fallback_tip("buy", 5.0, 10.0),
            "Buying costs $5. That's a lot! Maybe wait a week?"
        );
    }

    #[test]
    fn fallback_for_save_mentions_balance() {
        let tip = fallback_tip("saving for later", 3.0, 12.5);
        assert_eq!(tip, "Great job saving! You now have $12.5. Keep it up!");
    }

    #[test]
    fn fallback_for_skip_is_generic() {
        let a = fallback_tip("skip", 1.0, 2.0);
        let b = fallback_tip("skip", 99.0, 1000.0);
        assert_eq!(a, b);
        assert!(a.contains("need"));
        assert!(a.contains("want"));
    }

    #[test]
    fn format_amount_drops_trailing_zero_fraction() {
        assert_eq!(format_amount(5.0), "5");
        assert_eq!(format_amount(4.99), "4.99");
        assert_eq!(format_amount(0.0), "0");
        assert_eq!(format_amount(-0.0), "0");
    }

    #[test]
    fn tip_request_accepts_valid_amounts() {
        let request = TipRequest::new("buy", "toy", 5.0, 10.0).unwrap();
        assert_eq!(request.action(), "buy");
        assert_eq!(request.item_name(), "toy");
        assert!((request.price() - 5.0).abs() < f64::EPSILON);
        assert!((request.balance() - 10.0).abs() < f64::EPSILON);
        assert_eq!(request.kind(), TipAction::Buy);
    }

    #[test]
    fn tip_request_rejects_negative_price() {
        let err = TipRequest::new("buy", "toy", -1.0, 10.0).unwrap_err();
        assert!(err.to_string().contains("price"));
    }

    #[test]
    fn tip_request_rejects_negative_balance() {
        assert!(TipRequest::new("save", "toy", 1.0, -0.5).is_err());
    }

    #[test]
    fn tip_request_rejects_non_finite_amounts() {
        assert!(TipRequest::new("buy", "toy", f64::NAN, 1.0).is_err());
        assert!(TipRequest::new("buy", "toy", 1.0, f64::INFINITY).is_err());
    }

    #[test]
    fn tip_request_fallback_delegates() {
        let request = TipRequest::new("Buying", "bike", 120.0, 200.0).unwrap();
        assert_eq!(request.fallback_tip(), fallback_tip("Buying", 120.0, 200.0));
    }

    #[test]
    fn tip_action_display() {
        assert_eq!(TipAction::Buy.to_string(), "buy");
        assert_eq!(TipAction::Save.to_string(), "save");
        assert_eq!(TipAction::Other.to_string(), "other");
    }
}
