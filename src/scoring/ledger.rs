use chrono::NaiveDate;

use crate::models::activity::{ActivityEvent, AnswerResult};

/// True if any event in the history references the question.
pub fn has_answered(history: &[ActivityEvent], question_id: &str) -> bool {
    history.iter().any(|event| event.question_id == question_id)
}

/// The latest event for a question, by timestamp. Equal timestamps resolve
/// to the later-inserted event, which is what "was the last attempt
/// correct" displays rely on.
pub fn last_event_for<'a>(
    history: &'a [ActivityEvent],
    question_id: &str,
) -> Option<&'a ActivityEvent> {
    let mut latest: Option<&ActivityEvent> = None;
    for event in history.iter().filter(|e| e.question_id == question_id) {
        match latest {
            Some(current) if event.date < current.date => {}
            _ => latest = Some(event),
        }
    }
    latest
}

/// Day of the most recent correct answer; the streak policy's input.
pub fn last_correct_day(history: &[ActivityEvent]) -> Option<NaiveDate> {
    history
        .iter()
        .filter(|event| event.result == AnswerResult::Correct)
        .map(|event| event.date)
        .max()
        .map(|date| date.date_naive())
}

/// Plain append, no dedup. Idempotence lives in the scoring engine via
/// completed-question membership, not here.
pub fn append(history: &mut Vec<ActivityEvent>, event: ActivityEvent) {
    history.push(event);
}
