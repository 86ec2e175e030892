use crate::models::leaderboard::ParticipantRecord;

const BOM: char = '\u{feff}';

/// Non-blank lines with a leading BOM and trailing `\r` removed. The upload
/// validator counts rows with this too, so its row count matches `parse`.
pub fn content_lines(text: &str) -> impl Iterator<Item = &str> {
    text.strip_prefix(BOM)
        .unwrap_or(text)
        .split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .filter(|line| !line.trim().is_empty())
}

// Quotes only toggle comma splitting; `""` is not an escape.
pub fn parse(text: &str) -> Vec<ParticipantRecord> {
    let mut lines = content_lines(text);

    let headers = match lines.next() {
        Some(line) => parse_header(line),
        None => return Vec::new(),
    };

    lines
        .map(|line| {
            let mut values = split_row(line).into_iter();
            let mut record = ParticipantRecord::default();
            for header in &headers {
                record.insert(header, values.next().unwrap_or_default());
            }
            record
        })
        .collect()
}

fn parse_header(line: &str) -> Vec<String> {
    line.split(',')
        .map(|token| strip_quotes(token).trim().to_string())
        .collect()
}

fn split_row(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;

    for c in line.chars() {
        match c {
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => fields.push(finish_field(&mut current)),
            _ => current.push(c),
        }
    }
    fields.push(finish_field(&mut current));
    fields
}

fn finish_field(buf: &mut String) -> String {
    let value = strip_quotes(buf.trim()).to_string();
    buf.clear();
    value
}

/// Removes at most one quote from each end.
fn strip_quotes(s: &str) -> &str {
    let s = s.strip_prefix('"').unwrap_or(s);
    s.strip_suffix('"').unwrap_or(s)
}
