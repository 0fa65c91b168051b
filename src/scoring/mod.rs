pub mod daily;
pub mod ledger;
pub mod leaderboard;
pub mod streak;

use chrono::{DateTime, Utc};

use crate::{
    error::AppError,
    models::{
        activity::{ActivityEvent, ActivityKind, AnswerResult},
        question::Question,
        user::UserRecord,
    },
};

/// Applies one answer to a user's record and produces the resulting
/// activity event.
///
/// * Pure: no I/O, deterministic in its inputs. Persisting the returned
///   record and event is the caller's job.
/// * A question already in `completed_questions` never scores again:
///   repeat answers only bump `total_questions_answered` and append to the
///   history. The attempt counter moving on repeats is intentional,
///   preserved source behavior.
/// * Fails with `InvalidAnswerIndex` before touching anything when the
///   index is out of bounds.
pub fn apply_answer(
    mut record: UserRecord,
    question: &Question,
    selected_index: usize,
    kind: ActivityKind,
    now: DateTime<Utc>,
) -> Result<(UserRecord, ActivityEvent), AppError> {
    if selected_index >= question.options.len() {
        return Err(AppError::InvalidAnswerIndex {
            selected: selected_index,
            options: question.options.len(),
        });
    }

    let correct = selected_index == question.correct_option_index;
    let already_completed = record.completed_questions.iter().any(|id| id == &question.id);

    record.total_questions_answered += 1;

    if correct && !already_completed {
        record.correct_answers += 1;
        record.points += question.points;
        record.completed_questions.push(question.id.clone());

        let last_day = ledger::last_correct_day(&record.activity_history);
        record.streak = streak::next_streak(record.streak, last_day, now.date_naive());
    }

    let event = ActivityEvent {
        date: now,
        kind,
        question_id: question.id.clone(),
        result: if correct { AnswerResult::Correct } else { AnswerResult::Incorrect },
    };
    ledger::append(&mut record.activity_history, event.clone());
    record.last_login_at = now;

    Ok((record, event))
}
