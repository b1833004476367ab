//! Visit streaks, counted in UTC calendar days.

use crate::domain::answers::UserAnswers;
use crate::domain::foundation::Timestamp;

/// How a visit relates to the previous one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisitGap {
    /// Already visited this calendar day.
    SameDay,
    /// Last visit was the previous calendar day.
    NextDay,
    /// First visit ever, or at least one whole day was skipped.
    Lapsed,
}

impl VisitGap {
    pub fn between(last_visited: Option<Timestamp>, now: Timestamp) -> Self {
        let Some(last) = last_visited else {
            return VisitGap::Lapsed;
        };
        // A last visit dated after `now` counts as today.
        match (now.date() - last.date()).num_days() {
            days if days <= 0 => VisitGap::SameDay,
            1 => VisitGap::NextDay,
            _ => VisitGap::Lapsed,
        }
    }
}

/// State recorded when a user starts a new day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewDay {
    pub streak: u32,
    pub paragraph_id: u32,
    pub visited_at: Timestamp,
}

/// What the daily view shows, and what to record if the day is new.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DailyPlan {
    pub streak: u32,
    pub paragraph_id: u32,
    pub new_day: Option<NewDay>,
}

/// Plans the daily view for a visit at `now`.
///
/// A repeat visit on the same day keeps today's streak and paragraph. Any
/// other visit moves to the next unseen paragraph and either extends the
/// streak (previous day) or restarts it at 1.
pub fn plan_day(answers: &UserAnswers, now: Timestamp) -> DailyPlan {
    let gap = VisitGap::between(answers.last_visited, now);
    if gap == VisitGap::SameDay {
        return DailyPlan {
            streak: answers.streak,
            paragraph_id: answers
                .current_paragraph_id()
                .unwrap_or_else(|| answers.next_paragraph_id()),
            new_day: None,
        };
    }

    let streak = match gap {
        VisitGap::NextDay => answers.streak.saturating_add(1),
        _ => 1,
    };
    let paragraph_id = answers.next_paragraph_id();
    DailyPlan {
        streak,
        paragraph_id,
        new_day: Some(NewDay {
            streak,
            paragraph_id,
            visited_at: now,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::UserId;

    fn at(raw: &str) -> Timestamp {
        serde_json::from_str(&format!("\"{}\"", raw)).unwrap()
    }

    fn visited(streak: u32, last: &str, shown: &[u32]) -> UserAnswers {
        let mut answers = UserAnswers::new(UserId::new("u1").unwrap());
        answers.streak = streak;
        answers.last_visited = Some(at(last));
        answers.shown_paragraphs.extend(shown);
        answers
    }

    #[test]
    fn gap_is_measured_in_calendar_days() {
        let now = at("2024-03-10T00:05:00Z");
        assert_eq!(VisitGap::between(None, now), VisitGap::Lapsed);
        assert_eq!(VisitGap::between(Some(at("2024-03-10T00:01:00Z")), now), VisitGap::SameDay);
        assert_eq!(VisitGap::between(Some(at("2024-03-09T23:59:00Z")), now), VisitGap::NextDay);
        assert_eq!(VisitGap::between(Some(at("2024-03-08T12:00:00Z")), now), VisitGap::Lapsed);
        assert_eq!(VisitGap::between(Some(at("2024-03-11T09:00:00Z")), now), VisitGap::SameDay);
    }

    #[test]
    fn first_visit_starts_streak_at_first_paragraph() {
        let answers = UserAnswers::new(UserId::new("u1").unwrap());
        let now = at("2024-03-10T08:00:00Z");
        let plan = plan_day(&answers, now);

        assert_eq!(plan.streak, 1);
        assert_eq!(plan.paragraph_id, 1);
        assert_eq!(
            plan.new_day,
            Some(NewDay {
                streak: 1,
                paragraph_id: 1,
                visited_at: now
            })
        );
    }

    #[test]
    fn same_day_repeats_todays_paragraph() {
        let answers = visited(4, "2024-03-10T07:00:00Z", &[1, 2, 3]);
        let plan = plan_day(&answers, at("2024-03-10T20:00:00Z"));

        assert_eq!(plan.streak, 4);
        assert_eq!(plan.paragraph_id, 3);
        assert!(plan.new_day.is_none());
    }

    #[test]
    fn next_day_extends_streak() {
        let answers = visited(4, "2024-03-09T22:00:00Z", &[1, 2, 3]);
        let plan = plan_day(&answers, at("2024-03-10T06:00:00Z"));

        assert_eq!(plan.streak, 5);
        assert_eq!(plan.paragraph_id, 4);
        assert!(plan.new_day.is_some());
    }

    #[test]
    fn skipped_day_restarts_streak_but_keeps_reading_on() {
        let answers = visited(4, "2024-03-07T22:00:00Z", &[1, 2, 3]);
        let plan = plan_day(&answers, at("2024-03-10T06:00:00Z"));

        assert_eq!(plan.streak, 1);
        assert_eq!(plan.paragraph_id, 4);
    }
}
