use guard_logging::{guard_debug, guard_info, guard_warn};

use crate::{
    merge, ClassificationResult, Effect, Msg, NavigationEvent, RequestTicket, Sequence, TabId,
    TabStateStore, Verdict, WatcherState,
};

/// Pure update function: applies a message to state and returns any effects.
///
/// Nothing here awaits, so a navigation's sequence assignment and a
/// completion's accept check can never interleave.
pub fn update(mut state: WatcherState, msg: Msg) -> (WatcherState, Vec<Effect>) {
    let effects = match msg {
        Msg::Navigated(event) => on_navigated(&mut state, event),
        Msg::ClassificationCompleted { ticket, result } => {
            on_classified(&mut state, ticket, result)
        }
        Msg::TabClosed { tab_id } => on_tab_closed(&mut state, tab_id),
        Msg::NoOp => Vec::new(),
    };

    (state, effects)
}

fn on_navigated(state: &mut WatcherState, event: NavigationEvent) -> Vec<Effect> {
    let (settings, tracker, store) = state.parts_mut();
    let NavigationEvent { tab_id, url, .. } = event;

    if url.trim().is_empty() || tracker.is_unchanged(tab_id, &url) {
        return Vec::new();
    }

    let ticket = tracker.begin(tab_id, url);
    if !settings.known_safe.matches(&ticket.url) {
        guard_debug!(
            "Classify tab={} seq={} url={}",
            ticket.tab_id,
            ticket.sequence,
            ticket.url
        );
        return vec![Effect::Classify(ticket)];
    }

    guard_debug!("Known-safe url on tab {}: {}", tab_id, ticket.url);
    let verdict = Verdict::known_safe(ticket.url);
    install(store, tab_id, verdict, ticket.sequence)
}

fn on_classified(
    state: &mut WatcherState,
    ticket: RequestTicket,
    result: ClassificationResult,
) -> Vec<Effect> {
    let (settings, tracker, store) = state.parts_mut();

    if !tracker.is_current(&ticket) {
        guard_debug!(
            "Discarding stale response tab={} seq={} url={}",
            ticket.tab_id,
            ticket.sequence,
            ticket.url
        );
        return Vec::new();
    }

    let verdict = match result {
        Ok(classification) => merge(&classification, &settings.text_policy),
        Err(err) => {
            guard_warn!(
                "Classification failed tab={} url={}: {:?}",
                ticket.tab_id,
                ticket.url,
                err
            );
            if store.get(ticket.tab_id).is_some() {
                // Keep the prior verdict rather than overwrite it with an error.
                return Vec::new();
            }
            Verdict::assumed_safe(ticket.url.clone(), &err)
        }
    };

    if verdict.is_threat {
        guard_info!(
            "Threat on tab {} ({}, {:.2}%): {}",
            ticket.tab_id,
            verdict.source.as_str(),
            verdict.probability_percent,
            verdict.url
        );
    }
    install(store, ticket.tab_id, verdict, ticket.sequence)
}

fn on_tab_closed(state: &mut WatcherState, tab_id: TabId) -> Vec<Effect> {
    let (_, tracker, store) = state.parts_mut();
    tracker.forget(tab_id);
    let mut effects = vec![Effect::ForgetTab { tab_id }];
    if store.remove(tab_id).is_some() {
        effects.push(Effect::PersistVerdicts(store.snapshot()));
    }
    effects
}

fn install(
    store: &mut TabStateStore,
    tab_id: TabId,
    verdict: Verdict,
    sequence: Sequence,
) -> Vec<Effect> {
    if !store.accept(tab_id, verdict.clone(), sequence) {
        return Vec::new();
    }
    vec![
        Effect::Present { tab_id, verdict },
        Effect::PersistVerdicts(store.snapshot()),
    ]
}
