use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tabguard_core::{Classification, ClassificationError, ClassificationResult, RequestTracker};
use tabguard_engine::{Classifier, EngineEvent, EngineHandle};

/// Answers per URL after a per-URL delay.
struct ScriptedClassifier {
    answers: HashMap<String, (Duration, ClassificationResult)>,
}

#[async_trait::async_trait]
impl Classifier for ScriptedClassifier {
    async fn classify(&self, url: &str) -> ClassificationResult {
        match self.answers.get(url) {
            Some((delay, result)) => {
                tokio::time::sleep(*delay).await;
                result.clone()
            }
            None => Err(ClassificationError::Api { status: 404 }),
        }
    }
}

fn scored(url: &str, probability: f64) -> ClassificationResult {
    Ok(Classification {
        url: url.to_string(),
        dataset_match: false,
        ml_probability: probability,
        genai_text: None,
        message: None,
        reported_threat: None,
    })
}

#[tokio::test]
async fn completions_arrive_in_finish_order_with_their_tickets() {
    let mut answers = HashMap::new();
    answers.insert(
        "https://slow.example/".to_string(),
        (Duration::from_millis(80), scored("https://slow.example/", 0.9)),
    );
    answers.insert(
        "https://fast.example/".to_string(),
        (Duration::from_millis(5), scored("https://fast.example/", 0.1)),
    );
    let mut engine = EngineHandle::new(Arc::new(ScriptedClassifier { answers }));

    let mut tracker = RequestTracker::new();
    let slow = tracker.begin(1, "https://slow.example/");
    let fast = tracker.begin(1, "https://fast.example/");
    engine.enqueue(slow.clone());
    engine.enqueue(fast.clone());

    let EngineEvent::ClassificationCompleted { ticket, .. } = engine.recv().await.unwrap();
    assert_eq!(ticket, fast);
    let EngineEvent::ClassificationCompleted { ticket, result } = engine.recv().await.unwrap();
    assert_eq!(ticket, slow);
    assert!(!tracker.is_current(&ticket));
    assert_eq!(result.unwrap().ml_probability, 0.9);
}

#[tokio::test]
async fn failures_are_delivered_as_events() {
    let mut engine = EngineHandle::new(Arc::new(ScriptedClassifier {
        answers: HashMap::new(),
    }));
    let mut tracker = RequestTracker::new();
    engine.enqueue(tracker.begin(2, "https://unknown.example/"));

    let EngineEvent::ClassificationCompleted { result, .. } = engine.recv().await.unwrap();
    assert_eq!(result, Err(ClassificationError::Api { status: 404 }));
    assert!(engine.try_recv().is_none());
}
