use crate::models::user::UserRecord;

/// Orders records by points, descending, and caches 1-indexed ranks.
///
/// The sort is stable, so equal points keep their incoming relative order
/// and re-running on unchanged input reproduces the identical mapping.
/// Always a recomputation from scratch, never an incremental update. An
/// empty input yields an empty output.
pub fn rank_users(mut records: Vec<UserRecord>) -> Vec<UserRecord> {
    records.sort_by(|a, b| b.points.cmp(&a.points));
    for (position, record) in records.iter_mut().enumerate() {
        record.rank = (position + 1) as i64;
    }
    records
}
