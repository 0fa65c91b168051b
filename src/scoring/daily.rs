use chrono::NaiveDate;
use rand::{Rng, SeedableRng, rngs::StdRng};
use serde::{Deserialize, Serialize};

use crate::models::question::Question;

/// Per-user daily-question state document. Every input to the selection is
/// passed in explicitly; nothing reads ambient storage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyQuestionState {
    pub date: NaiveDate,
    pub question_id: String,
    pub answered: bool,
}

/// Picks the question of the day.
///
/// A prior selection from the same day is kept as long as its question
/// still exists, so the user sees one stable question all day. Anything
/// else (a new day, a removed question, no prior state) draws fresh from
/// `seed`; the draw is deterministic for a given seed. Returns `None` when
/// the catalog is empty.
pub fn select(
    questions: &[Question],
    prior: Option<DailyQuestionState>,
    today: NaiveDate,
    seed: u64,
) -> Option<DailyQuestionState> {
    if let Some(state) = prior {
        if state.date == today && questions.iter().any(|q| q.id == state.question_id) {
            return Some(state);
        }
    }

    if questions.is_empty() {
        return None;
    }

    let index = StdRng::seed_from_u64(seed).gen_range(0..questions.len());
    Some(DailyQuestionState {
        date: today,
        question_id: questions[index].id.clone(),
        answered: false,
    })
}

/// Closes out the current selection for the rest of the day.
pub fn mark_answered(state: DailyQuestionState) -> DailyQuestionState {
    DailyQuestionState { answered: true, ..state }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn question(id: &str) -> Question {
        Question {
            id: id.to_string(),
            text: format!("Question {}", id),
            options: vec!["A".to_string(), "B".to_string()],
            correct_option_index: 0,
            points: 1,
            category: Default::default(),
            created_by: "author".to_string(),
            created_at: Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap(),
        }
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, d).unwrap()
    }

    #[test]
    fn test_same_day_keeps_prior_selection() {
        let questions = vec![question("q1"), question("q2"), question("q3")];
        let prior = DailyQuestionState {
            date: day(10),
            question_id: "q2".to_string(),
            answered: true,
        };

        // The seed must not matter while the prior selection is current.
        let state = select(&questions, Some(prior.clone()), day(10), 999).unwrap();
        assert_eq!(state, prior);
    }

    #[test]
    fn test_new_day_draws_fresh() {
        let questions = vec![question("q1"), question("q2"), question("q3")];
        let prior = DailyQuestionState {
            date: day(10),
            question_id: "q2".to_string(),
            answered: true,
        };

        let state = select(&questions, Some(prior), day(11), 7).unwrap();
        assert_eq!(state.date, day(11));
        assert!(!state.answered);
        assert!(questions.iter().any(|q| q.id == state.question_id));
    }

    #[test]
    fn test_selection_is_seed_deterministic() {
        let questions = vec![question("q1"), question("q2"), question("q3")];

        let a = select(&questions, None, day(10), 42).unwrap();
        let b = select(&questions, None, day(10), 42).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_removed_question_forces_redraw() {
        let questions = vec![question("q1")];
        let prior = DailyQuestionState {
            date: day(10),
            question_id: "gone".to_string(),
            answered: false,
        };

        let state = select(&questions, Some(prior), day(10), 3).unwrap();
        assert_eq!(state.question_id, "q1");
    }

    #[test]
    fn test_empty_catalog_yields_none() {
        assert_eq!(select(&[], None, day(10), 1), None);
    }

    #[test]
    fn test_mark_answered() {
        let state = DailyQuestionState {
            date: day(10),
            question_id: "q1".to_string(),
            answered: false,
        };

        let answered = mark_answered(state);
        assert!(answered.answered);
        assert_eq!(answered.question_id, "q1");
    }
}
