use url::Url;

/// One trusted destination: an exact host plus a path prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KnownSafeRule {
    pub host: String,
    pub path_prefix: String,
}

impl KnownSafeRule {
    pub fn new(host: impl Into<String>, path_prefix: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            path_prefix: path_prefix.into(),
        }
    }
}

/// URLs that skip classification entirely. Only http(s) URLs can match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KnownSafeList {
    rules: Vec<KnownSafeRule>,
}

impl Default for KnownSafeList {
    fn default() -> Self {
        Self::new(vec![
            KnownSafeRule::new("google.com", "/search"),
            KnownSafeRule::new("www.google.com", "/search"),
        ])
    }
}

impl KnownSafeList {
    pub fn new(rules: Vec<KnownSafeRule>) -> Self {
        Self { rules }
    }

    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    pub fn rules(&self) -> &[KnownSafeRule] {
        &self.rules
    }

    pub fn matches(&self, raw: &str) -> bool {
        let Ok(parsed) = Url::parse(raw) else {
            return false;
        };
        if !matches!(parsed.scheme(), "http" | "https") {
            return false;
        }
        let Some(host) = parsed.host_str() else {
            return false;
        };
        self.rules.iter().any(|rule| {
            rule.host.eq_ignore_ascii_case(host) && parsed.path().starts_with(&rule.path_prefix)
        })
    }
}
