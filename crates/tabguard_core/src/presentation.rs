use crate::Verdict;

/// Icon paths for the three action sizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IconSet {
    pub size_16: &'static str,
    pub size_48: &'static str,
    pub size_128: &'static str,
}

pub const SAFE_ICONS: IconSet = IconSet {
    size_16: "icons/safe16.png",
    size_48: "icons/safe48.png",
    size_128: "icons/safe128.png",
};

pub const WARNING_ICONS: IconSet = IconSet {
    size_16: "icons/warning16.png",
    size_48: "icons/warning48.png",
    size_128: "icons/warning128.png",
};

pub const THREAT_POPUP: &str = "popup.html";
pub const SAFE_POPUP: &str = "popup_safe.html";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertSeverity {
    Information,
    Warning,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    pub title: String,
    pub message: String,
    pub severity: AlertSeverity,
}

impl Alert {
    pub fn threat(verdict: &Verdict) -> Self {
        Self {
            title: "Threat detected".to_string(),
            message: format!("{} may be malicious: {}", verdict.url, verdict.display_text),
            severity: AlertSeverity::Warning,
        }
    }
}

/// Visible state for one tab.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TabPresentation {
    pub icons: IconSet,
    pub popup: &'static str,
    pub alert: Option<Alert>,
}

/// Maps `next` to icons, popup and an optional alert.
///
/// `previous` is the verdict last presented on the same tab. An alert is only
/// planned when the tab moves into a threat state for a URL it was not
/// already alerting about, so presenting the same verdict twice alerts once.
pub fn plan_presentation(previous: Option<&Verdict>, next: &Verdict) -> TabPresentation {
    if !next.is_threat {
        return TabPresentation {
            icons: SAFE_ICONS,
            popup: SAFE_POPUP,
            alert: None,
        };
    }

    let already_alerted = previous.is_some_and(|prev| prev.is_threat && prev.url == next.url);
    TabPresentation {
        icons: WARNING_ICONS,
        popup: THREAT_POPUP,
        alert: (!already_alerted).then(|| Alert::threat(next)),
    }
}
