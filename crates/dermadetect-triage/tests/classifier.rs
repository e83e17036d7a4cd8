use std::time::Duration;

use dermadetect_core::models::risk::RiskLevel;
use dermadetect_triage::classifier::{
    AnalysisRequest, FALLBACK_RISK, ImageCountClassifier, RiskAnalyzer, classify,
};
use dermadetect_triage::error::TriageError;
use uuid::Uuid;

#[test]
fn one_image_is_low_risk() {
    assert_eq!(classify(1).unwrap(), RiskLevel::Low);
}

#[test]
fn two_images_are_medium_risk() {
    assert_eq!(classify(2).unwrap(), RiskLevel::Medium);
}

#[test]
fn three_or_more_images_are_high_risk() {
    for n in [3, 4, 7, 50] {
        assert_eq!(classify(n).unwrap(), RiskLevel::High, "n = {n}");
    }
}

#[test]
fn zero_images_cannot_be_classified() {
    assert!(matches!(classify(0), Err(TriageError::NoImages)));
}

#[test]
fn fallback_is_medium() {
    assert_eq!(FALLBACK_RISK, RiskLevel::Medium);
}

#[tokio::test(start_paused = true)]
async fn local_classifier_waits_for_the_simulated_delay() {
    let images = vec!["file:///a.jpg".to_string(), "file:///b.jpg".to_string()];
    let request = AnalysisRequest {
        session_id: Uuid::new_v4(),
        patient_id: "p1",
        images: &images,
    };
    let classifier = ImageCountClassifier::new(Duration::from_secs(2));

    let started = tokio::time::Instant::now();
    let level = classifier.analyze(&request).await.unwrap();

    assert_eq!(level, RiskLevel::Medium);
    assert!(started.elapsed() >= Duration::from_secs(2));
}
