//! End-to-end insight flow: submit answers, generate, publish, read back.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::timeout;
use tokio_util::sync::CancellationToken;

use wellbeing_survey::adapters::{CsvQuestionSource, InMemoryAnswerStore, InsightBroker, MockTextGenerator};
use wellbeing_survey::application::{
    AnswerInput, GetInsightsHandler, GetInsightsQuery, InsightCoordinator, InsightCoordinatorConfig,
    SubmitAnswersCommand, SubmitAnswersHandler,
};
use wellbeing_survey::domain::answers::InsightStatus;
use wellbeing_survey::domain::foundation::UserId;
use wellbeing_survey::domain::insights::{InsightEventKind, HOLISTIC};
use wellbeing_survey::domain::selection::CompletionDetector;
use wellbeing_survey::domain::taxonomy::{Catalog, DimensionRanks};
use wellbeing_survey::ports::{AnswerStore, GenerationError, QuestionSource};

// =============================================================================
// Test Infrastructure
// =============================================================================

const FIXTURE: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/questions.csv");

struct Harness {
    store: Arc<InMemoryAnswerStore>,
    broker: InsightBroker,
    generator: MockTextGenerator,
    coordinator: Arc<InsightCoordinator>,
    submit: SubmitAnswersHandler,
    insights: GetInsightsHandler,
    user: UserId,
}

async fn harness(generator: MockTextGenerator, excluded: &[&str]) -> Harness {
    let rows = CsvQuestionSource::new(FIXTURE).load_rows().unwrap();
    let catalog = Arc::new(Catalog::build(rows, DimensionRanks::default()).unwrap());
    let store = Arc::new(InMemoryAnswerStore::new());
    let broker = InsightBroker::spawn(64);
    let coordinator = Arc::new(InsightCoordinator::new(
        catalog.clone(),
        store.clone(),
        Arc::new(generator.clone()),
        broker.clone(),
        InsightCoordinatorConfig {
            backoff_base: Duration::from_millis(1),
            dimension_instructions: "dimension".into(),
            holistic_instructions: "holistic".into(),
            ..Default::default()
        },
    ));
    let detector = CompletionDetector::new(catalog.clone()).with_excluded(excluded.iter().copied());
    let submit = SubmitAnswersHandler::new(catalog.clone(), store.clone(), detector, coordinator.clone());
    let insights = GetInsightsHandler::new(catalog, store.clone());

    let user = UserId::new("flow-user").unwrap();
    store.create_user(&user).await.unwrap();

    Harness {
        store,
        broker,
        generator,
        coordinator,
        submit,
        insights,
        user,
    }
}

fn scale_answers(ids: impl IntoIterator<Item = u32>, value: i32) -> Vec<AnswerInput> {
    ids.into_iter()
        .map(|question_id| AnswerInput {
            question_id,
            kind: "scale".into(),
            value: Some(value),
        })
        .collect()
}

// =============================================================================
// Tests
// =============================================================================

#[tokio::test]
async fn completing_a_dimension_streams_its_insight() {
    let h = harness(
        MockTextGenerator::new().with_response(r#"Here you go: {"title":"Spirit"} Enjoy!"#),
        &[],
    )
    .await;
    let token = CancellationToken::new();
    let mut sub = h.broker.subscribe(h.user.clone(), 8, &token).await.unwrap();

    let mut answers = scale_answers([13], 2);
    answers.extend(scale_answers(56..=61, 3));
    let result = h
        .submit
        .handle(SubmitAnswersCommand {
            user_id: h.user.clone(),
            answers,
        })
        .await
        .unwrap();
    assert_eq!(result.stored, 7);
    assert_eq!(result.insights_started, vec!["Spirituality".to_string()]);

    let event = timeout(Duration::from_secs(2), sub.recv()).await.unwrap().unwrap();
    assert_eq!(event.name, "Spirituality");
    assert_eq!(event.kind, InsightEventKind::Ready);
    assert_eq!(event.payload["title"], "Spirit");

    let prompt = &h.generator.get_calls()[0];
    assert_eq!(prompt.instructions, "dimension");
    assert!(prompt.input.contains("Focus on Dimension Spirituality"));
    assert!(prompt.input.contains("Reflection: 3"));

    let done = h
        .insights
        .handle(GetInsightsQuery {
            user_id: h.user.clone(),
        })
        .await
        .unwrap();
    assert_eq!(done.len(), 1);
    assert_eq!(done["Spirituality"]["title"], "Spirit");
}

#[tokio::test]
async fn resubmitting_does_not_generate_twice() {
    let h = harness(MockTextGenerator::new().with_delay(Duration::from_millis(30)), &[]).await;

    let mut answers = scale_answers([13], 2);
    answers.extend(scale_answers(56..=61, 3));

    let (first, second) = tokio::join!(
        h.submit.handle(SubmitAnswersCommand {
            user_id: h.user.clone(),
            answers: answers.clone(),
        }),
        h.submit.handle(SubmitAnswersCommand {
            user_id: h.user.clone(),
            answers,
        }),
    );
    let started = first.unwrap().insights_started.len() + second.unwrap().insights_started.len();
    assert_eq!(started, 1);

    h.coordinator.shutdown().await;
    assert_eq!(h.generator.call_count(), 1);
}

#[tokio::test]
async fn excluded_dimensions_never_generate() {
    let h = harness(MockTextGenerator::new(), &["Spirituality"]).await;

    let mut answers = scale_answers([13], 2);
    answers.extend(scale_answers(56..=61, 3));
    let result = h
        .submit
        .handle(SubmitAnswersCommand {
            user_id: h.user.clone(),
            answers,
        })
        .await
        .unwrap();

    assert!(result.insights_started.is_empty());
    h.coordinator.shutdown().await;
    assert_eq!(h.generator.call_count(), 0);
}

#[tokio::test]
async fn persistent_failure_is_reported_and_retryable() {
    let generator = MockTextGenerator::new()
        .with_error(GenerationError::Timeout { timeout_secs: 60 })
        .with_error(GenerationError::Timeout { timeout_secs: 60 })
        .with_error(GenerationError::Timeout { timeout_secs: 60 });
    let h = harness(generator, &[]).await;
    let token = CancellationToken::new();
    let mut sub = h.broker.subscribe(h.user.clone(), 8, &token).await.unwrap();

    let mut answers = scale_answers([13], 2);
    answers.extend(scale_answers(56..=61, 3));
    h.submit
        .handle(SubmitAnswersCommand {
            user_id: h.user.clone(),
            answers: answers.clone(),
        })
        .await
        .unwrap();

    let event = timeout(Duration::from_secs(2), sub.recv()).await.unwrap().unwrap();
    assert_eq!(event.kind, InsightEventKind::Failed);
    assert_eq!(h.generator.call_count(), 3);

    let snapshot = h.store.get_user(&h.user).await.unwrap().unwrap();
    assert_eq!(
        snapshot.insight("Spirituality").map(|i| i.status),
        Some(InsightStatus::Failed)
    );

    // The next submission touching the dimension tries again.
    let retry = h
        .submit
        .handle(SubmitAnswersCommand {
            user_id: h.user.clone(),
            answers: scale_answers([61], 4),
        })
        .await
        .unwrap();
    assert_eq!(retry.insights_started, vec!["Spirituality".to_string()]);

    let event = timeout(Duration::from_secs(2), sub.recv()).await.unwrap().unwrap();
    assert_eq!(event.kind, InsightEventKind::Ready);
}

#[tokio::test]
async fn holistic_insight_is_stored_and_published() {
    let h = harness(MockTextGenerator::new().with_response(r#"{"summary":"whole"}"#), &[]).await;
    let token = CancellationToken::new();
    let mut sub = h.broker.subscribe(h.user.clone(), 8, &token).await.unwrap();

    h.submit
        .handle(SubmitAnswersCommand {
            user_id: h.user.clone(),
            answers: scale_answers(1..=12, 6),
        })
        .await
        .unwrap();

    let payload = h.coordinator.generate_holistic(&h.user).await.unwrap();
    assert_eq!(payload["summary"], "whole");

    let event = timeout(Duration::from_secs(2), sub.recv()).await.unwrap().unwrap();
    assert!(event.is_holistic());

    let prompt = &h.generator.get_calls()[0];
    assert_eq!(prompt.instructions, "holistic");
    assert!(prompt.input.contains("Physical Health: 6"));

    let done = h
        .insights
        .handle(GetInsightsQuery {
            user_id: h.user.clone(),
        })
        .await
        .unwrap();
    assert_eq!(done[HOLISTIC]["summary"], "whole");
}
