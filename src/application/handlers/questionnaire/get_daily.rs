//! GetDailyHandler - Query handler for the daily visit view.

use std::sync::Arc;

use tracing::info;

use crate::domain::daily::{plan_day, Paragraph, ParagraphCatalog};
use crate::domain::foundation::{DomainError, Timestamp, UserId};
use crate::domain::selection::{SelectionEngine, SelectionPolicy};
use crate::domain::taxonomy::Question;
use crate::ports::AnswerStore;

/// Questions offered alongside the daily paragraph.
pub const DAILY_QUESTION_COUNT: usize = 3;

/// Query for a user's daily view at a given moment.
#[derive(Debug, Clone)]
pub struct GetDailyQuery {
    pub user_id: UserId,
    pub now: Timestamp,
}

/// Streak, today's paragraph and a short window of questions.
#[derive(Debug, Clone, PartialEq)]
pub struct GetDailyResult {
    pub streak: u32,
    /// `None` once the catalog has no paragraph for today's id.
    pub paragraph: Option<Paragraph>,
    pub questions: Vec<Question>,
}

/// Handler for the daily view.
///
/// The first visit of a calendar day records the new streak and the next
/// paragraph before responding.
pub struct GetDailyHandler {
    engine: SelectionEngine,
    paragraphs: Arc<ParagraphCatalog>,
    store: Arc<dyn AnswerStore>,
}

impl GetDailyHandler {
    pub fn new(engine: SelectionEngine, paragraphs: Arc<ParagraphCatalog>, store: Arc<dyn AnswerStore>) -> Self {
        Self {
            engine,
            paragraphs,
            store,
        }
    }

    pub async fn handle(&self, query: GetDailyQuery) -> Result<GetDailyResult, DomainError> {
        // 1. Load the user's snapshot
        let answers = self
            .store
            .get_user(&query.user_id)
            .await?
            .ok_or_else(|| DomainError::user_not_found(&query.user_id))?;

        // 2. Select today's questions
        let policy = SelectionPolicy::default();
        let questions = self.engine.next_window(&answers, &policy, DAILY_QUESTION_COUNT)?;

        // 3. Record the day if it is a new one
        let plan = plan_day(&answers, query.now);
        if let Some(day) = &plan.new_day {
            self.store.new_day(&query.user_id, day).await?;
            info!(
                user_id = %query.user_id,
                streak = day.streak,
                paragraph_id = day.paragraph_id,
                "New visit day recorded"
            );
        }

        Ok(GetDailyResult {
            streak: plan.streak,
            paragraph: self.paragraphs.get(plan.paragraph_id).cloned(),
            questions,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::store::InMemoryAnswerStore;
    use crate::domain::answers::UserAnswers;
    use crate::domain::daily::NewDay;
    use crate::domain::foundation::ErrorCode;
    use crate::domain::taxonomy::{Catalog, DimensionRanks, QuestionRow, GENERAL};

    const PARAGRAPHS: &str = r#"{
        "1": {"text": {"title": "Rest"}},
        "2": {"text": {"title": "Move"}},
        "3": {"text": {"title": "Connect"}}
    }"#;

    fn engine() -> SelectionEngine {
        let catalog = Catalog::build(
            vec![
                QuestionRow::new("Body", GENERAL, GENERAL, "q1"),
                QuestionRow::new("Mind", GENERAL, GENERAL, "q2"),
                QuestionRow::new("Body", "Sleep", "Quality", "q3"),
                QuestionRow::new("Body", "Sleep", "Duration", "q4"),
                QuestionRow::new("Mind", "Focus", "Attention", "q5"),
            ],
            DimensionRanks::from_order(["Body", "Mind"]),
        )
        .unwrap();
        SelectionEngine::new(Arc::new(catalog))
    }

    fn user() -> UserId {
        UserId::new("u1").unwrap()
    }

    fn at(raw: &str) -> Timestamp {
        serde_json::from_str(&format!("\"{}\"", raw)).unwrap()
    }

    async fn setup(answers: UserAnswers) -> (GetDailyHandler, Arc<InMemoryAnswerStore>) {
        let store = Arc::new(InMemoryAnswerStore::new());
        store.insert(answers).await;
        let paragraphs = Arc::new(ParagraphCatalog::from_json(PARAGRAPHS).unwrap());
        (GetDailyHandler::new(engine(), paragraphs, store.clone()), store)
    }

    fn visited(streak: u32, last: &str, shown: &[u32]) -> UserAnswers {
        let mut answers = UserAnswers::new(user());
        for id in shown {
            answers.start_day(&NewDay {
                streak,
                paragraph_id: *id,
                visited_at: at(last),
            });
        }
        answers
    }

    fn query(now: &str) -> GetDailyQuery {
        GetDailyQuery {
            user_id: user(),
            now: at(now),
        }
    }

    fn title(result: &GetDailyResult) -> Option<&str> {
        result.paragraph.as_ref().map(|p| p.text.title.as_str())
    }

    #[tokio::test]
    async fn first_visit_starts_streak() {
        let (handler, store) = setup(UserAnswers::new(user())).await;

        let result = handler.handle(query("2024-03-10T08:00:00Z")).await.unwrap();
        assert_eq!(result.streak, 1);
        assert_eq!(title(&result), Some("Rest"));
        // Only the two dimension-level questions are offered before any answer.
        assert_eq!(result.questions.len(), 2);

        let snapshot = store.get_user(&user()).await.unwrap().unwrap();
        assert_eq!(snapshot.streak, 1);
        assert_eq!(snapshot.last_visited, Some(at("2024-03-10T08:00:00Z")));
    }

    #[tokio::test]
    async fn visit_later_today_repeats_the_day() {
        let (handler, store) = setup(visited(2, "2024-03-10T07:00:00Z", &[1, 2])).await;

        let result = handler.handle(query("2024-03-10T21:00:00Z")).await.unwrap();
        assert_eq!(result.streak, 2);
        assert_eq!(title(&result), Some("Move"));

        let snapshot = store.get_user(&user()).await.unwrap().unwrap();
        assert_eq!(snapshot.last_visited, Some(at("2024-03-10T07:00:00Z")));
    }

    #[tokio::test]
    async fn visit_after_yesterday_extends_streak() {
        let (handler, store) = setup(visited(2, "2024-03-09T23:00:00Z", &[1, 2])).await;

        let result = handler.handle(query("2024-03-10T06:00:00Z")).await.unwrap();
        assert_eq!(result.streak, 3);
        assert_eq!(title(&result), Some("Connect"));
        assert!(result.questions.len() <= DAILY_QUESTION_COUNT);

        let snapshot = store.get_user(&user()).await.unwrap().unwrap();
        assert_eq!(snapshot.streak, 3);
        assert_eq!(snapshot.current_paragraph_id(), Some(3));
    }

    #[tokio::test]
    async fn visit_after_a_gap_restarts_streak() {
        let (handler, store) = setup(visited(5, "2024-03-07T12:00:00Z", &[1])).await;

        let result = handler.handle(query("2024-03-10T06:00:00Z")).await.unwrap();
        assert_eq!(result.streak, 1);
        assert_eq!(title(&result), Some("Move"));

        let snapshot = store.get_user(&user()).await.unwrap().unwrap();
        assert_eq!(snapshot.streak, 1);
    }

    #[tokio::test]
    async fn paragraph_is_empty_past_the_catalog() {
        let (handler, _) = setup(visited(1, "2024-03-09T12:00:00Z", &[1, 2, 3])).await;

        let result = handler.handle(query("2024-03-10T06:00:00Z")).await.unwrap();
        assert_eq!(result.streak, 2);
        assert!(result.paragraph.is_none());
    }

    #[tokio::test]
    async fn unknown_user_is_not_found() {
        let store = Arc::new(InMemoryAnswerStore::new());
        let handler = GetDailyHandler::new(engine(), Arc::new(ParagraphCatalog::default()), store);

        let err = handler.handle(query("2024-03-10T06:00:00Z")).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::UserNotFound);
    }
}
