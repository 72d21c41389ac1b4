use tabguard_core::{
    merge, Classification, RequestTracker, TabStateStore, TextPolicy, Verdict, VerdictSource,
};

fn verdict_for(url: &str, probability: f64) -> Verdict {
    merge(
        &Classification {
            url: url.to_string(),
            dataset_match: false,
            ml_probability: probability,
            genai_text: None,
            message: None,
            reported_threat: None,
        },
        &TextPolicy::default(),
    )
}

#[test]
fn sequences_increase_per_tab_and_across_tabs() {
    let mut tracker = RequestTracker::new();
    let a1 = tracker.begin(1, "https://a.example");
    let b1 = tracker.begin(2, "https://b.example");
    let a2 = tracker.begin(1, "https://c.example");

    assert!(a1.sequence < a2.sequence);
    assert_ne!(b1.sequence, a2.sequence);
    assert_eq!(tracker.latest_sequence(1), Some(a2.sequence));
    assert_eq!(tracker.current_url(1), Some("https://c.example"));
}

#[test]
fn superseded_ticket_is_not_current() {
    let mut tracker = RequestTracker::new();
    let first = tracker.begin(1, "https://a.example");
    let second = tracker.begin(1, "https://b.example");

    assert!(!tracker.is_current(&first));
    assert!(tracker.is_current(&second));
}

#[test]
fn returning_to_same_url_still_rejects_older_ticket() {
    let mut tracker = RequestTracker::new();
    let first = tracker.begin(1, "https://a.example");
    tracker.begin(1, "https://b.example");
    let third = tracker.begin(1, "https://a.example");

    assert!(!tracker.is_current(&first));
    assert!(tracker.is_current(&third));
}

#[test]
fn forgotten_tab_rejects_everything() {
    let mut tracker = RequestTracker::new();
    let ticket = tracker.begin(4, "https://a.example");
    tracker.forget(4);

    assert!(!tracker.is_current(&ticket));
    assert!(!tracker.is_unchanged(4, "https://a.example"));
}

#[test]
fn recycled_tab_id_never_reuses_a_sequence() {
    let mut tracker = RequestTracker::new();
    let before_close = tracker.begin(9, "https://a.example");
    tracker.forget(9);
    let after_reopen = tracker.begin(9, "https://a.example");

    assert!(after_reopen.sequence > before_close.sequence);
    assert!(!tracker.is_current(&before_close));
}

#[test]
fn store_keeps_newest_sequence() {
    let mut store = TabStateStore::new();
    assert!(store.accept(1, verdict_for("https://b.example", 0.9), 2));
    assert!(!store.accept(1, verdict_for("https://a.example", 0.1), 1));

    let state = store.state(1).expect("tab state");
    assert_eq!(state.last_sequence, 2);
    assert_eq!(state.current_url, "https://b.example");
    assert!(store.get(1).expect("verdict").is_threat);
}

#[test]
fn store_replaces_on_equal_or_newer_sequence() {
    let mut store = TabStateStore::new();
    assert!(store.accept(1, verdict_for("https://a.example", 0.9), 3));
    assert!(store.accept(1, verdict_for("https://a.example", 0.1), 3));
    assert!(store.accept(1, verdict_for("https://c.example", 0.1), 5));

    assert_eq!(store.len(), 1);
    assert_eq!(store.get(1).expect("verdict").url, "https://c.example");
}

#[test]
fn tabs_do_not_interact() {
    let mut store = TabStateStore::new();
    store.accept(1, verdict_for("https://one.example", 0.9), 10);
    store.accept(2, verdict_for("https://two.example", 0.1), 3);

    assert!(store.get(1).expect("tab 1").is_threat);
    assert!(!store.get(2).expect("tab 2").is_threat);
}

#[test]
fn snapshot_tracks_latest_install_and_per_tab_records() {
    let mut store = TabStateStore::new();
    store.accept(1, verdict_for("https://one.example", 0.97), 1);
    store.accept(2, Verdict::known_safe("https://www.google.com/search?q=x"), 2);

    let snapshot = store.snapshot();
    let latest = snapshot.latest.expect("latest");
    assert_eq!(latest.url, "https://www.google.com/search?q=x");
    assert!(!latest.threat);
    assert_eq!(snapshot.tabs.len(), 2);
    assert_eq!(snapshot.tabs[&1].malicious_probability, 97.0);
    assert!(snapshot.tabs[&1].threat);

    store.remove(2);
    let snapshot = store.snapshot();
    assert!(snapshot.latest.is_none());
    assert_eq!(snapshot.tabs.len(), 1);
}

#[test]
fn known_safe_and_assumed_safe_verdicts_are_not_threats() {
    let exempt = Verdict::known_safe("https://www.google.com/search?q=rust");
    assert_eq!(exempt.source, VerdictSource::GoogleExempt);
    assert!(!exempt.is_threat);

    let assumed = Verdict::assumed_safe(
        "https://down.example",
        &tabguard_core::ClassificationError::Api { status: 503 },
    );
    assert_eq!(assumed.source, VerdictSource::HeuristicOverride);
    assert!(!assumed.is_threat);
    assert!(assumed.display_text.contains("API error 503"));
}
