//! Averaging of latest answer values per dimension and per facet.
//!
//! Only answers carrying a value contribute; don't-know answers are skipped.
//! Averages use integer division and truncate.

use std::collections::BTreeMap;
use std::fmt::Write as _;

use crate::domain::answers::UserAnswers;
use crate::domain::taxonomy::{Dimension, DimensionRanks, Question, QuestionLevel};

use super::cat_val::CatVal;

/// Truncated integer mean, `None` when there is nothing to average.
pub fn average(values: &[i32]) -> Option<i32> {
    if values.is_empty() {
        return None;
    }
    let total: i64 = values.iter().map(|v| i64::from(*v)).sum();
    Some((total / values.len() as i64) as i32)
}

fn group_values<'q, I, F>(questions: I, answers: &UserAnswers, key: F) -> BTreeMap<String, Vec<i32>>
where
    I: IntoIterator<Item = &'q Question>,
    F: Fn(&Question) -> Option<String>,
{
    let mut groups: BTreeMap<String, Vec<i32>> = BTreeMap::new();
    for question in questions {
        let Some(name) = key(question) else {
            continue;
        };
        if let Some(value) = answers.value_of(question.id) {
            groups.entry(name).or_default().push(value);
        }
    }
    groups
}

/// Scores each dimension over the given questions, worst first.
///
/// Equal averages fall back to the rank table, then to the name so the
/// order never depends on map iteration. Dimensions without any valued
/// answer among `questions` are omitted.
pub fn score_dimensions<'q, I>(questions: I, answers: &UserAnswers, ranks: &DimensionRanks) -> Vec<CatVal>
where
    I: IntoIterator<Item = &'q Question>,
{
    let mut scored: Vec<CatVal> = group_values(questions, answers, |q| Some(q.dimension.clone()))
        .into_iter()
        .filter_map(|(name, values)| average(&values).map(|avg| CatVal::dimension(name, avg)))
        .collect();

    scored.sort_by(|a, b| {
        a.value
            .cmp(&b.value)
            .then_with(|| ranks.rank_of(&a.name).cmp(&ranks.rank_of(&b.name)))
            .then_with(|| a.name.cmp(&b.name))
    });
    scored
}

/// Scores facets keyed `"<subDimension>.<facet>"`, worst first.
///
/// Dimension- and subdimension-level questions are not facet questions and
/// are ignored.
pub fn score_facets<'q, I>(questions: I, answers: &UserAnswers) -> Vec<CatVal>
where
    I: IntoIterator<Item = &'q Question>,
{
    let mut scored: Vec<CatVal> = group_values(questions, answers, |q| {
        (q.level() == QuestionLevel::Facet).then(|| q.facet_key())
    })
    .into_iter()
    .filter_map(|(name, values)| average(&values).map(|avg| CatVal::facet(name, avg)))
    .collect();

    scored.sort_by(|a, b| a.value.cmp(&b.value).then_with(|| a.name.cmp(&b.name)));
    scored
}

/// Facet averages of one dimension rendered for a generation prompt.
///
/// ```text
/// Sleep:
/// Quality: 4
/// Rhythm: 7
/// ```
///
/// Facets without any valued answer are left out.
pub fn dimension_ratings(dimension: &Dimension, answers: &UserAnswers) -> String {
    let mut out = String::new();
    for sub in &dimension.sub_dimensions {
        let _ = writeln!(out, "{}:", sub.name);
        for facet in &sub.facets {
            let values: Vec<i32> = facet
                .questions
                .iter()
                .filter_map(|q| answers.value_of(q.id))
                .collect();
            if let Some(avg) = average(&values) {
                let _ = writeln!(out, "{}: {}", facet.name, avg);
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::answers::AnswerEvent;
    use crate::domain::foundation::{QuestionId, UserId};
    use crate::domain::taxonomy::{Catalog, QuestionRow, GENERAL};

    fn catalog() -> Catalog {
        Catalog::build(
            vec![
                QuestionRow::new("Body", GENERAL, GENERAL, "q1"),
                QuestionRow::new("Body", GENERAL, GENERAL, "q2"),
                QuestionRow::new("Mind", GENERAL, GENERAL, "q3"),
                QuestionRow::new("Body", "Sleep", GENERAL, "q4"),
                QuestionRow::new("Body", "Sleep", "Quality", "q5"),
                QuestionRow::new("Body", "Sleep", "Quality", "q6"),
                QuestionRow::new("Body", "Sleep", "Rhythm", "q7"),
                QuestionRow::new("Mind", "Focus", "Attention", "q8"),
            ],
            DimensionRanks::from_order(["Mind", "Body"]),
        )
        .unwrap()
    }

    fn answers(pairs: &[(u32, i32)]) -> UserAnswers {
        UserAnswers::with_scale_answers(UserId::new("u").unwrap(), pairs.iter().copied())
    }

    #[test]
    fn average_truncates() {
        assert_eq!(average(&[1, 2]), Some(1));
        assert_eq!(average(&[5, 5, 6]), Some(5));
        assert_eq!(average(&[]), None);
    }

    #[test]
    fn dimensions_sort_ascending() {
        let catalog = catalog();
        let answers = answers(&[(1, 8), (2, 6), (3, 3)]);
        let scored = score_dimensions(catalog.dimension_questions(), &answers, catalog.ranks());
        assert_eq!(scored, vec![CatVal::dimension("Mind", 3), CatVal::dimension("Body", 7)]);
    }

    #[test]
    fn equal_dimension_scores_break_on_rank() {
        let catalog = catalog();
        let answers = answers(&[(1, 5), (2, 5), (3, 5)]);
        let scored = score_dimensions(catalog.dimension_questions(), &answers, catalog.ranks());
        let names: Vec<&str> = scored.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Mind", "Body"]);
    }

    #[test]
    fn dont_know_answers_are_not_averaged() {
        let catalog = catalog();
        let mut answers = answers(&[(1, 2)]);
        answers.record(QuestionId::new(2), AnswerEvent::dont_know());
        answers.record(QuestionId::new(3), AnswerEvent::dont_know());

        let scored = score_dimensions(catalog.dimension_questions(), &answers, catalog.ranks());
        assert_eq!(scored, vec![CatVal::dimension("Body", 2)]);
    }

    #[test]
    fn facets_are_keyed_by_sub_dimension_and_skip_general() {
        let catalog = catalog();
        let answers = answers(&[(4, 1), (5, 4), (6, 6), (7, 2), (8, 9)]);
        let scored = score_facets(catalog.questions().values(), &answers);
        assert_eq!(
            scored,
            vec![
                CatVal::facet("Sleep.Rhythm", 2),
                CatVal::facet("Sleep.Quality", 5),
                CatVal::facet("Focus.Attention", 9),
            ]
        );
    }

    #[test]
    fn dimension_ratings_lists_facets_per_sub_dimension() {
        let catalog = catalog();
        let answers = answers(&[(5, 4), (6, 7), (7, 2)]);
        let text = dimension_ratings(catalog.dimension("Body").unwrap(), &answers);
        assert_eq!(text, "Sleep:\nQuality: 5\nRhythm: 2\n");
    }
}
