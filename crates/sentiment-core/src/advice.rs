//! Investment Advice Mapping
//!
//! Total lookup from sentiment label to a fixed advisory tuple. The
//! mapping is contrarian: fear means accumulate, greed means take profit.

use serde::Serialize;

use crate::label::SentimentLabel;

/// Advisory tuple shown alongside a classification
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Advice {
    /// Advisory text
    pub advice: &'static str,

    /// Emoji shorthand for the advisory
    pub emoji: &'static str,

    /// CSS class name a presentation layer may hang styling on
    pub css_class: &'static str,
}

/// Fallback advisory for labels outside the known vocabulary
pub const UNKNOWN_ADVICE: Advice = Advice {
    advice: "Unknown sentiment. No advisory available; treat the signal as noise.",
    emoji: "❓",
    css_class: "unknown",
};

/// Map a sentiment label string to its advisory tuple.
///
/// Total: every input maps somewhere. Labels outside the five-label
/// vocabulary all map to the same [`UNKNOWN_ADVICE`].
pub fn advise(label: &str) -> Advice {
    SentimentLabel::parse(label).map_or(UNKNOWN_ADVICE, advise_label)
}

/// Advisory tuple for a known sentiment label
pub fn advise_label(label: SentimentLabel) -> Advice {
    let (advice, emoji) = match label {
        SentimentLabel::ExtremeFear => (
            "STRONG BUY: extreme fear has historically marked capitulation lows. Accumulate while others panic.",
            "🚀",
        ),
        SentimentLabel::Fear => (
            "BUY: the market is fearful. Dips like this have favored patient buyers.",
            "📈",
        ),
        SentimentLabel::Neutral => (
            "HOLD: no edge either way. Wait for a clearer signal before adding or trimming.",
            "✋",
        ),
        SentimentLabel::Greed => (
            "TAKE PROFIT: greed is building. Consider trimming exposure into strength.",
            "📉",
        ),
        SentimentLabel::ExtremeGreed => (
            "STRONG SELL: extreme greed precedes corrections. De-risk now.",
            "🛑",
        ),
    };

    Advice {
        advice,
        emoji,
        css_class: label.css_class(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extreme_fear_is_strong_buy() {
        let advice = advise("Extreme Fear");
        assert!(advice.advice.starts_with("STRONG BUY"));
        assert!(!advice.emoji.is_empty());
        assert_eq!(advice.css_class, "extreme-fear");
    }

    #[test]
    fn test_unknown_label_falls_back() {
        assert_eq!(advise("banana"), UNKNOWN_ADVICE);
        assert_eq!(advise(""), UNKNOWN_ADVICE);
    }

    #[test]
    fn test_lookup_is_exact() {
        // The vocabulary is case-sensitive
        assert_eq!(advise("extreme fear"), UNKNOWN_ADVICE);
        assert_ne!(advise("Extreme Fear"), UNKNOWN_ADVICE);
    }

    #[test]
    fn test_every_label_has_distinct_advice() {
        let mut classes = std::collections::HashSet::new();
        let mut texts = std::collections::HashSet::new();
        for label in SentimentLabel::ALL {
            let advice = advise_label(label);
            assert!(!advice.emoji.is_empty());
            classes.insert(advice.css_class);
            texts.insert(advice.advice);
        }
        assert_eq!(classes.len(), 5);
        assert_eq!(texts.len(), 5);
    }

    #[test]
    fn test_extreme_greed_advises_selling() {
        let advice = advise("Extreme Greed");
        assert!(advice.advice.starts_with("STRONG SELL"));
        assert_eq!(advice.css_class, "extreme-greed");
    }
}
