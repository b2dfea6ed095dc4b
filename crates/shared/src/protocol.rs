use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::domain::{ChatRole, PatternId, PatternRecord};

/// The `patterns` column is stored either as one string or as a list of fragments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PatternText {
    Text(String),
    Fragments(Vec<String>),
}

impl PatternText {
    pub fn joined(&self) -> String {
        match self {
            Self::Text(text) => text.clone(),
            Self::Fragments(parts) => parts.concat(),
        }
    }
}

/// One row of the remote `Patterns` table. Every column is optional on the wire.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PatternRow {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<PatternId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub patterns: Option<PatternText>,
}

impl PatternRow {
    /// `position` is the zero-based row index; defaults are numbered from 1.
    /// Defaults apply only to omitted columns.
    pub fn into_record(self, position: usize) -> PatternRecord {
        let ordinal = position + 1;
        let id = self.id.unwrap_or(PatternId(ordinal as i64));
        let file_name = self
            .file_name
            .unwrap_or_else(|| format!("Pattern {ordinal}"));
        // A present but blank column stays blank; selecting it leaves no instruction.
        let pattern_text = self
            .patterns
            .map(|text| text.joined())
            .unwrap_or_else(|| format!("Preview {ordinal}"));
        PatternRecord {
            id,
            file_name,
            pattern_text,
        }
    }
}

/// Normalizes raw rows into records, keeping the first row for any repeated id.
///
/// Returns the records and the ids that were dropped as duplicates.
pub fn normalize_rows(rows: Vec<PatternRow>) -> (Vec<PatternRecord>, Vec<PatternId>) {
    let mut seen = HashSet::new();
    let mut records = Vec::with_capacity(rows.len());
    let mut duplicates = Vec::new();
    for (position, row) in rows.into_iter().enumerate() {
        let record = row.into_record(position);
        if seen.insert(record.id) {
            records.push(record);
        } else {
            duplicates.push(record.id);
        }
    }
    (records, duplicates)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessagesRequest {
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub system: String,
    pub messages: Vec<WireMessage>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WireMessage {
    pub role: ChatRole,
    pub content: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessagesResponse {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub content: Vec<ContentBlock>,
    #[serde(default)]
    pub stop_reason: Option<String>,
}

impl MessagesResponse {
    pub fn first_text(&self) -> Option<&str> {
        self.content.iter().find_map(|block| match block {
            ContentBlock::Text { text } => Some(text.as_str()),
            ContentBlock::Other => None,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentBlock {
    Text {
        text: String,
    },
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    pub error: ErrorBody,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    #[serde(rename = "type")]
    pub kind: String,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(id: Option<i64>, file_name: Option<&str>, patterns: Option<PatternText>) -> PatternRow {
        PatternRow {
            id: id.map(PatternId),
            file_name: file_name.map(str::to_string),
            patterns,
        }
    }

    #[test]
    fn fills_missing_columns_with_numbered_defaults() {
        let record = row(None, None, None).into_record(2);
        assert_eq!(record.id, PatternId(3));
        assert_eq!(record.file_name, "Pattern 3");
        assert_eq!(record.pattern_text, "Preview 3");
    }

    #[test]
    fn blank_columns_are_kept_rather_than_defaulted() {
        let rows: Vec<PatternRow> = serde_json::from_str(
            r#"[{"id": 7, "file_name": "", "patterns": ""}, {"id": 8, "patterns": []}]"#,
        )
        .expect("rows");
        let (records, _) = normalize_rows(rows);
        assert_eq!(records[0].file_name, "");
        assert_eq!(records[0].pattern_text, "");
        assert_eq!(records[1].file_name, "Pattern 2");
        assert_eq!(records[1].pattern_text, "");
    }

    #[test]
    fn joins_fragmented_pattern_text_without_separator() {
        let rows: Vec<PatternRow> = serde_json::from_str(
            r#"[{"id": 4, "file_name": "terse", "patterns": ["Be ", "terse"]}]"#,
        )
        .expect("rows");
        let (records, duplicates) = normalize_rows(rows);
        assert!(duplicates.is_empty());
        assert_eq!(records[0].pattern_text, "Be terse");
        assert_eq!(records[0].id, PatternId(4));
    }

    #[test]
    fn drops_rows_with_repeated_ids() {
        let rows = vec![
            row(Some(1), Some("socratic"), Some(PatternText::Text("Be Socratic".into()))),
            row(Some(1), Some("copy"), Some(PatternText::Text("Shadow".into()))),
            row(Some(2), Some("terse"), Some(PatternText::Text("Be terse".into()))),
        ];
        let (records, duplicates) = normalize_rows(rows);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].file_name, "socratic");
        assert_eq!(duplicates, vec![PatternId(1)]);
    }

    #[test]
    fn extracts_first_text_block_and_skips_unknown_blocks() {
        let response: MessagesResponse = serde_json::from_str(
            r#"{"id":"msg_1","content":[{"type":"thinking","thinking":"..."},{"type":"text","text":"Hello."}],"stop_reason":"end_turn"}"#,
        )
        .expect("response");
        assert_eq!(response.first_text(), Some("Hello."));
    }

    #[test]
    fn omits_empty_system_instruction_from_request() {
        let request = MessagesRequest {
            model: "m".into(),
            max_tokens: 10,
            temperature: 0.5,
            system: String::new(),
            messages: vec![WireMessage {
                role: ChatRole::User,
                content: "hi".into(),
            }],
        };
        let value = serde_json::to_value(&request).expect("json");
        assert!(value.get("system").is_none());
        assert_eq!(value["messages"][0]["role"], "user");
    }
}
