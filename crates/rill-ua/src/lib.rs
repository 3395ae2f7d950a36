//! User-agent classification.
//!
//! Decides whether a request comes from a crawler, in which case the
//! pipeline disables streaming and delivers one fully resolved flush.
//! The signature list covers the majority of crawlers, not all of them;
//! deployments extend it with [`BotDetector::with_signature`].

/// Default crawler signatures, matched case-insensitively as substrings.
pub const DEFAULT_BOT_SIGNATURES: &[&str] = &[
    "googlebot",
    "google-pagerenderer",
    "bingbot",
    "duckduckbot",
    "baiduspider",
    "yandexbot",
    "slurp",
    "applebot",
    "facebookexternalhit",
    "twitterbot",
    "linkedinbot",
];

/// Classification of a request's user-agent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    /// A regular client; streaming stays enabled.
    Human,
    /// A recognized crawler.
    Bot {
        /// The signature that matched.
        signature: String,
    },
}

impl Classification {
    /// Whether this is a crawler.
    pub fn is_bot(&self) -> bool {
        matches!(self, Self::Bot { .. })
    }
}

/// Substring classifier over the user-agent header.
#[derive(Debug, Clone)]
pub struct BotDetector {
    signatures: Vec<String>,
}

impl BotDetector {
    /// Detector with the default signature list.
    pub fn new() -> Self {
        Self {
            signatures: DEFAULT_BOT_SIGNATURES
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }

    /// Detector with no signatures (classifies everything as human).
    pub fn empty() -> Self {
        Self {
            signatures: Vec::new(),
        }
    }

    /// Add a signature to match.
    pub fn with_signature(mut self, signature: impl Into<String>) -> Self {
        self.signatures.push(signature.into().to_lowercase());
        self
    }

    /// Classify a user-agent header value. A missing header is human.
    pub fn classify(&self, user_agent: Option<&str>) -> Classification {
        let Some(ua) = user_agent else {
            return Classification::Human;
        };
        let ua = ua.to_lowercase();

        for signature in &self.signatures {
            if ua.contains(signature.as_str()) {
                return Classification::Bot {
                    signature: signature.clone(),
                };
            }
        }

        Classification::Human
    }
}

impl Default for BotDetector {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_googlebot_is_a_bot() {
        let detector = BotDetector::new();
        let class = detector.classify(Some(
            "Mozilla/5.0 (compatible; Googlebot/2.1; +http://www.google.com/bot.html)",
        ));
        assert!(class.is_bot());
    }

    #[test]
    fn test_page_renderer_signature_matches() {
        let detector = BotDetector::new();
        let class = detector.classify(Some(
            "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 Google-PageRenderer Google (+https://developers.google.com/+/web/snippet/)",
        ));
        assert_eq!(
            class,
            Classification::Bot {
                signature: "google-pagerenderer".to_string()
            }
        );
    }

    #[test]
    fn test_browser_ua_is_human() {
        let detector = BotDetector::new();
        let class = detector.classify(Some(
            "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0 Safari/537.36",
        ));
        assert_eq!(class, Classification::Human);
    }

    #[test]
    fn test_missing_header_is_human() {
        assert_eq!(BotDetector::new().classify(None), Classification::Human);
    }

    #[test]
    fn test_matching_is_case_insensitive() {
        let detector = BotDetector::new();
        assert!(detector.classify(Some("GOOGLEBOT/2.1")).is_bot());
    }

    #[test]
    fn test_custom_signature_extends_list() {
        let detector = BotDetector::empty().with_signature("InternalAuditBot");
        assert!(detector
            .classify(Some("internalauditbot/1.0"))
            .is_bot());
        assert!(!detector.classify(Some("Googlebot/2.1")).is_bot());
    }
}
