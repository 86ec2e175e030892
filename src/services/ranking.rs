use crate::models::leaderboard::{Columns, LeaderboardView, ParticipantRecord, RankedEntry};

pub const DEFAULT_DISPLAY_LIMIT: usize = 100;

/// Reads the integer at the start of `s`, ignoring leading whitespace and
/// anything after the digits. Yields 0 when there are no digits.
pub fn to_int(s: &str) -> i64 {
    let s = s.trim_start();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };

    let mut value: i64 = 0;
    for b in digits.bytes().take_while(u8::is_ascii_digit) {
        value = value.saturating_mul(10).saturating_add(i64::from(b - b'0'));
    }
    if negative {
        -value
    } else {
        value
    }
}

pub fn score(record: &ParticipantRecord, columns: &Columns) -> i64 {
    to_int(record.field(&columns.skill_badges))
        .saturating_add(to_int(record.field(&columns.arcade_games)))
}

/// Orders records by descending score. Equal scores keep file order.
pub fn rank(records: Vec<ParticipantRecord>, columns: &Columns) -> Vec<RankedEntry> {
    let mut scored: Vec<(i64, ParticipantRecord)> = records
        .into_iter()
        .map(|record| (score(&record, columns), record))
        .collect();
    // sort_by is stable
    scored.sort_by(|a, b| b.0.cmp(&a.0));

    scored
        .into_iter()
        .enumerate()
        .map(|(i, (total_score, record))| entry(i + 1, total_score, record, columns))
        .collect()
}

fn entry(rank: usize, total_score: i64, record: ParticipantRecord, columns: &Columns) -> RankedEntry {
    let profile_url = record.field(&columns.profile_url).trim();
    RankedEntry {
        rank,
        name: record.field(&columns.name).to_string(),
        email: record.field(&columns.email).to_string(),
        profile_url: (!profile_url.is_empty()).then(|| profile_url.to_string()),
        all_completed: record.field(&columns.all_completed).eq_ignore_ascii_case("yes"),
        skill_badges: to_int(record.field(&columns.skill_badges)),
        arcade_games: to_int(record.field(&columns.arcade_games)),
        total_score,
        fields: record,
    }
}

/// Ranks every record, then keeps the first `limit` for display.
pub fn leaderboard_view(
    records: Vec<ParticipantRecord>,
    columns: &Columns,
    limit: usize,
) -> LeaderboardView {
    let total_participants = records.len();
    let mut entries = rank(records, columns);
    entries.truncate(limit);
    LeaderboardView {
        total_participants,
        shown: entries.len(),
        entries,
    }
}
