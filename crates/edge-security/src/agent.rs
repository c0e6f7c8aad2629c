//! Automated-agent classification by user agent.

use edge_core::{RenderConfig, RenderRequest};
use serde::{Deserialize, Serialize};

/// Decides whether a request comes from an automated agent (crawler, bot).
pub trait AgentClassifier: Send + Sync {
    /// Classify a client identity string. A missing identity is never automated.
    fn is_automated(&self, user_agent: Option<&str>) -> bool;

    /// Classify a request by its `User-Agent` header.
    fn classify(&self, request: &RenderRequest) -> bool {
        self.is_automated(request.user_agent())
    }
}

impl<F> AgentClassifier for F
where
    F: Fn(Option<&str>) -> bool + Send + Sync,
{
    fn is_automated(&self, user_agent: Option<&str>) -> bool {
        self(user_agent)
    }
}

/// Patterns matched by the default classifier.
pub const DEFAULT_AGENT_PATTERNS: &[&str] = &[
    "*bot*",
    "*crawl*",
    "*spider*",
    "*slurp*",
    "*archiver*",
    "*scraper*",
    "*headless*",
    "*lighthouse*",
    "*facebookexternalhit*",
    "*embedly*",
    "*preview*",
    "*validator*",
    "*monitor*",
    "curl/*",
    "wget/*",
    "python-requests/*",
    "python-urllib/*",
    "go-http-client/*",
    "java/*",
    "okhttp/*",
    "node-fetch/*",
    "axios/*",
];

/// Pattern-based user-agent classifier.
///
/// Patterns are case-insensitive and support `*` as a wildcard. A pattern
/// without a wildcard must match the whole user agent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserAgentPatterns {
    /// Patterns that mark an agent as automated.
    patterns: Vec<String>,
    /// Patterns that override a match (e.g., in-app browsers).
    exempt: Vec<String>,
}

impl Default for UserAgentPatterns {
    fn default() -> Self {
        Self {
            patterns: DEFAULT_AGENT_PATTERNS
                .iter()
                .map(|p| p.to_string())
                .collect(),
            exempt: Vec::new(),
        }
    }
}

impl UserAgentPatterns {
    /// Create a classifier with no patterns (nothing is automated).
    pub fn empty() -> Self {
        Self {
            patterns: Vec::new(),
            exempt: Vec::new(),
        }
    }

    /// Create the default classifier extended with the configured patterns.
    pub fn from_config(config: &RenderConfig) -> Self {
        Self::default().with_patterns(&config.bot_patterns)
    }

    /// Add a pattern. Bare words are matched anywhere in the user agent.
    pub fn with_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.patterns.push(normalize(&pattern.into()));
        self
    }

    /// Add multiple patterns.
    pub fn with_patterns<S: AsRef<str>>(mut self, patterns: &[S]) -> Self {
        self.patterns
            .extend(patterns.iter().map(|p| normalize(p.as_ref())));
        self
    }

    /// Exempt user agents matching a pattern (takes precedence).
    pub fn exempt(mut self, pattern: impl Into<String>) -> Self {
        self.exempt.push(normalize(&pattern.into()));
        self
    }

    /// Remove a pattern, e.g. to stop treating monitors as automated.
    pub fn without_pattern(mut self, pattern: &str) -> Self {
        let pattern = normalize(pattern);
        self.patterns.retain(|p| *p != pattern);
        self
    }

    /// Number of active patterns.
    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    /// Whether no patterns are configured.
    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}

impl AgentClassifier for UserAgentPatterns {
    fn is_automated(&self, user_agent: Option<&str>) -> bool {
        let Some(user_agent) = user_agent else {
            return false;
        };
        let user_agent = user_agent.trim().to_lowercase();
        if user_agent.is_empty() {
            return false;
        }

        if self
            .exempt
            .iter()
            .any(|p| matches_pattern(&user_agent, p))
        {
            return false;
        }

        self.patterns
            .iter()
            .any(|p| matches_pattern(&user_agent, p))
    }
}

/// Lowercase a pattern; bare words become `*word*`.
fn normalize(pattern: &str) -> String {
    let pattern = pattern.trim().to_lowercase();
    if pattern.contains('*') {
        pattern
    } else {
        format!("*{}*", pattern)
    }
}

fn matches_pattern(value: &str, pattern: &str) -> bool {
    if !pattern.contains('*') {
        return value == pattern;
    }

    let parts: Vec<&str> = pattern.split('*').collect();
    let (first, rest) = match parts.split_first() {
        Some(split) => split,
        None => return false,
    };
    let (last, middle) = match rest.split_last() {
        Some(split) => split,
        None => return value == *first,
    };

    if !value.starts_with(first) {
        return false;
    }
    let mut remaining = &value[first.len()..];

    for part in middle {
        if part.is_empty() {
            continue;
        }
        match remaining.find(part) {
            Some(idx) => remaining = &remaining[idx + part.len()..],
            None => return false,
        }
    }

    remaining.len() >= last.len() && remaining.ends_with(last)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_crawlers() {
        let classifier = UserAgentPatterns::default();
        for ua in [
            "Mozilla/5.0 (compatible; Googlebot/2.1; +http://www.google.com/bot.html)",
            "Mozilla/5.0 (compatible; bingbot/2.0; +http://www.bing.com/bingbot.htm)",
            "Mozilla/5.0 (compatible; Yahoo! Slurp; http://help.yahoo.com/help/us/ysearch/slurp)",
            "facebookexternalhit/1.1",
            "curl/8.4.0",
            "Mozilla/5.0 (X11; Linux x86_64) HeadlessChrome/120.0.0.0 Safari/537.36",
        ] {
            assert!(classifier.is_automated(Some(ua)), "{ua}");
        }
    }

    #[test]
    fn test_browsers_are_not_automated() {
        let classifier = UserAgentPatterns::default();
        for ua in [
            "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
            "Mozilla/5.0 (iPhone; CPU iPhone OS 17_1 like Mac OS X) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.1 Mobile/15E148 Safari/604.1",
            "Mozilla/5.0 (X11; Linux x86_64; rv:121.0) Gecko/20100101 Firefox/121.0",
        ] {
            assert!(!classifier.is_automated(Some(ua)), "{ua}");
        }
    }

    #[test]
    fn test_missing_or_blank_user_agent() {
        let classifier = UserAgentPatterns::default();
        assert!(!classifier.is_automated(None));
        assert!(!classifier.is_automated(Some("   ")));
    }

    #[test]
    fn test_custom_and_exempt_patterns() {
        let classifier = UserAgentPatterns::empty()
            .with_pattern("AcmeProbe")
            .with_pattern("*bot*")
            .exempt("*friendlybot*");

        assert!(classifier.is_automated(Some("acmeprobe/3")));
        assert!(classifier.is_automated(Some("somebot")));
        assert!(!classifier.is_automated(Some("FriendlyBot/1.0")));
    }

    #[test]
    fn test_without_pattern() {
        let classifier = UserAgentPatterns::default().without_pattern("*monitor*");
        assert!(!classifier.is_automated(Some("UptimeMonitor")));
        assert_eq!(classifier.len(), DEFAULT_AGENT_PATTERNS.len() - 1);
    }

    #[test]
    fn test_from_config() {
        let config = RenderConfig::new().with_bot_pattern("statuscake");
        let classifier = UserAgentPatterns::from_config(&config);
        assert!(classifier.is_automated(Some("StatusCake_Pagespeed")));
    }

    #[test]
    fn test_classify_request() {
        let classifier = UserAgentPatterns::default();
        let request = RenderRequest::new("/").with_user_agent("Googlebot/2.1");
        assert!(classifier.classify(&request));
        assert!(!classifier.classify(&RenderRequest::new("/")));
    }

    #[test]
    fn test_closure_classifier() {
        let classifier = |ua: Option<&str>| ua == Some("robot");
        assert!(classifier.is_automated(Some("robot")));
        assert!(!classifier.is_automated(Some("human")));
    }

    #[test]
    fn test_matches_pattern() {
        assert!(matches_pattern("curl/8.0", "curl/*"));
        assert!(!matches_pattern("mycurl/8.0", "curl/*"));
        assert!(matches_pattern("a-bot-b", "*bot*"));
        assert!(matches_pattern("api.v1.example", "api.*.example"));
        assert!(!matches_pattern("ab", "ab*b"));
        assert!(matches_pattern("exact", "exact"));
    }
}
