use serde::ser::{Serialize, SerializeMap, Serializer};

/// Header names of the columns the ranking and the page read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Columns {
    pub name: String,
    pub email: String,
    pub profile_url: String,
    pub all_completed: String,
    pub skill_badges: String,
    pub arcade_games: String,
}

impl Default for Columns {
    fn default() -> Self {
        Columns {
            name: "User Name".into(),
            email: "User Email".into(),
            profile_url: "Google Cloud Skills Boost Profile URL".into(),
            all_completed: "All Skill Badges & Games Completed".into(),
            skill_badges: "# of Skill Badges Completed".into(),
            arcade_games: "# of Arcade Games Completed".into(),
        }
    }
}

/// One data row keyed by header name, in header order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParticipantRecord {
    fields: Vec<(String, String)>,
}

impl ParticipantRecord {
    /// Sets `header` to `value`. A repeated header keeps its first position
    /// but takes the latest value.
    pub fn insert(&mut self, header: &str, value: String) {
        match self.fields.iter_mut().find(|(h, _)| h == header) {
            Some((_, existing)) => *existing = value,
            None => self.fields.push((header.to_string(), value)),
        }
    }

    pub fn get(&self, header: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(h, _)| h == header)
            .map(|(_, v)| v.as_str())
    }

    /// Like [`get`](Self::get) but absent columns read as empty.
    pub fn field(&self, header: &str) -> &str {
        self.get(header).unwrap_or("")
    }

    pub fn headers(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(h, _)| h.as_str())
    }
}

impl Serialize for ParticipantRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (header, value) in &self.fields {
            map.serialize_entry(header, value)?;
        }
        map.end()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedEntry {
    pub rank: usize,
    pub name: String,
    pub email: String,
    pub profile_url: Option<String>,
    pub all_completed: bool,
    pub skill_badges: i64,
    pub arcade_games: i64,
    pub total_score: i64,
    pub fields: ParticipantRecord,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardView {
    pub total_participants: usize,
    pub shown: usize,
    pub entries: Vec<RankedEntry>,
}
