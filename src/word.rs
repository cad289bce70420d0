use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::convert::Infallible;
use std::fmt;

use crate::error::IngestError;

/// Timer duration used when a Timer entry carries no usable `time`.
pub const DEFAULT_TIMER_SECS: u32 = 30;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, strum_macros::Display,
)]
pub enum WordKind {
    #[default]
    Field,
    Free,
    Timer,
}

impl WordKind {
    pub const ALL: [WordKind; 3] = [WordKind::Field, WordKind::Free, WordKind::Timer];

    /// Parses a wire `type` string. Unknown names yield `None`; callers at the
    /// ingestion boundary fall back to `Field`.
    pub fn from_wire(name: &str) -> Option<Self> {
        let name = name.trim();
        Self::ALL
            .into_iter()
            .find(|kind| kind.to_string().eq_ignore_ascii_case(name))
    }
}

/// One normalised entry of the word list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordEntry {
    pub text: String,
    pub kind: WordKind,
    timer_seconds: Option<u32>,
}

impl WordEntry {
    pub fn field(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            kind: WordKind::Field,
            timer_seconds: None,
        }
    }

    pub fn free(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            kind: WordKind::Free,
            timer_seconds: None,
        }
    }

    pub fn timer(text: impl Into<String>, seconds: u32) -> Self {
        Self {
            text: text.into(),
            kind: WordKind::Timer,
            timer_seconds: Some(seconds.max(1)),
        }
    }

    /// Builds an entry of any kind; `timer_seconds` only sticks for timers.
    pub fn new(text: impl Into<String>, kind: WordKind, timer_seconds: Option<u32>) -> Self {
        match kind {
            WordKind::Timer => Self::timer(text, timer_seconds.unwrap_or(DEFAULT_TIMER_SECS)),
            WordKind::Free => Self::free(text),
            WordKind::Field => Self::field(text),
        }
    }

    /// Countdown length, present only for Timer entries.
    pub fn timer_seconds(&self) -> Option<u32> {
        match self.kind {
            WordKind::Timer => Some(self.timer_seconds.unwrap_or(DEFAULT_TIMER_SECS)),
            _ => None,
        }
    }
}

/// The shape entries take on the wire and on disk:
/// `{ "word": "...", "type": "Field" | "Free" | "Timer", "time": "30" | null }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawWordEntry {
    pub word: String,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub time: Option<String>,
}

impl From<&WordEntry> for RawWordEntry {
    fn from(entry: &WordEntry) -> Self {
        Self {
            word: entry.text.clone(),
            kind: Some(entry.kind.to_string()),
            time: entry.timer_seconds().map(|secs| secs.to_string()),
        }
    }
}

/// Result of pushing raw entries through the ingestion boundary.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IngestReport {
    pub entries: Vec<WordEntry>,
    pub problems: Vec<IngestError>,
    pub dropped_blank: usize,
}

impl IngestReport {
    fn log_problems(&self) {
        for problem in &self.problems {
            log::warn!("{problem}");
        }
        if self.dropped_blank > 0 {
            log::debug!("dropped {} blank entries", self.dropped_blank);
        }
    }
}

/// Validates the shape of each element of a JSON array and normalises the
/// survivors. A single bad element never spoils the rest of the list.
pub fn ingest_json(items: &[Value], default_timer_secs: u32) -> IngestReport {
    let mut report = IngestReport::default();
    for (index, item) in items.iter().enumerate() {
        match check_shape(index, item) {
            Ok(raw) => normalise_into(&mut report, index, raw, default_timer_secs),
            Err(problem) => report.problems.push(problem),
        }
    }
    report.log_problems();
    report
}

/// Normalises entries that are already known to have the right shape
/// (CSV rows, entries typed in on the command line).
pub fn ingest_raw(raws: Vec<RawWordEntry>, default_timer_secs: u32) -> IngestReport {
    ingest_rows(raws.into_iter().map(Ok::<_, Infallible>), default_timer_secs)
}

/// For sources that can fail row by row (CSV). A failed row is reported as
/// malformed and dropped; indices stay those of the source rows.
pub fn ingest_rows<I, E>(rows: I, default_timer_secs: u32) -> IngestReport
where
    I: IntoIterator<Item = Result<RawWordEntry, E>>,
    E: fmt::Display,
{
    let mut report = IngestReport::default();
    for (index, row) in rows.into_iter().enumerate() {
        match row {
            Ok(raw) => normalise_into(&mut report, index, raw, default_timer_secs),
            Err(e) => report.problems.push(IngestError::MalformedEntry {
                index,
                reason: e.to_string(),
            }),
        }
    }
    report.log_problems();
    report
}

fn check_shape(index: usize, item: &Value) -> Result<RawWordEntry, IngestError> {
    let malformed = |reason: &str| IngestError::MalformedEntry {
        index,
        reason: reason.to_string(),
    };

    let object = item.as_object().ok_or_else(|| malformed("not an object"))?;
    let word = match object.get("word") {
        Some(Value::String(word)) => word.clone(),
        Some(_) => return Err(malformed("`word` is not a string")),
        None => return Err(malformed("missing `word`")),
    };
    let kind = match object.get("type") {
        None | Some(Value::Null) => None,
        Some(Value::String(kind)) => Some(kind.clone()),
        Some(_) => return Err(malformed("`type` is not a string")),
    };
    let time = match object.get("time") {
        None | Some(Value::Null) => None,
        Some(Value::String(time)) => Some(time.clone()),
        Some(_) => return Err(malformed("`time` is neither a string nor null")),
    };

    Ok(RawWordEntry { word, kind, time })
}

fn normalise_into(
    report: &mut IngestReport,
    index: usize,
    raw: RawWordEntry,
    default_timer_secs: u32,
) {
    let text = raw.word.trim();
    if text.is_empty() {
        report.dropped_blank += 1;
        return;
    }

    let kind = match raw.kind.as_deref() {
        None => WordKind::Field,
        Some(name) => WordKind::from_wire(name).unwrap_or_else(|| {
            log::warn!("entry {index} has unknown type {name:?}, treating it as Field");
            WordKind::Field
        }),
    };

    let entry = match kind {
        WordKind::Timer => {
            let seconds = match raw.time.as_deref().map(str::trim) {
                None | Some("") => default_timer_secs,
                Some(value) => match value.parse::<u32>() {
                    Ok(secs) if secs > 0 => secs,
                    _ => {
                        report.problems.push(IngestError::TimerConfigInvalid {
                            index,
                            value: value.to_string(),
                        });
                        default_timer_secs
                    }
                },
            };
            WordEntry::timer(text, seconds)
        }
        other => WordEntry::new(text, other, None),
    };

    report.entries.push(entry);
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use serde_json::json;

    #[test]
    fn test_kind_from_wire() {
        assert_eq!(WordKind::from_wire("Timer"), Some(WordKind::Timer));
        assert_eq!(WordKind::from_wire("free"), Some(WordKind::Free));
        assert_eq!(WordKind::from_wire(" Field "), Some(WordKind::Field));
        assert_eq!(WordKind::from_wire("Bonus"), None);
    }

    #[test]
    fn test_timer_seconds_ignored_for_other_kinds() {
        let entry = WordEntry::new("coffee", WordKind::Field, Some(90));
        assert_eq!(entry.timer_seconds(), None);

        let entry = WordEntry::new("stand up", WordKind::Timer, None);
        assert_eq!(entry.timer_seconds(), Some(DEFAULT_TIMER_SECS));
    }

    #[test]
    fn test_ingest_json_normalises_entries() {
        let items = vec![
            json!({ "word": " Wifi drops ", "type": "Field", "time": null }),
            json!({ "word": "FREE", "type": "Free" }),
            json!({ "word": "Silence", "type": "Timer", "time": "10" }),
            json!({ "word": "Mystery", "type": "Bonus", "time": null }),
            json!({ "word": "No type" }),
        ];

        let report = ingest_json(&items, DEFAULT_TIMER_SECS);

        assert!(report.problems.is_empty());
        assert_eq!(
            report.entries,
            vec![
                WordEntry::field("Wifi drops"),
                WordEntry::free("FREE"),
                WordEntry::timer("Silence", 10),
                WordEntry::field("Mystery"),
                WordEntry::field("No type"),
            ]
        );
    }

    #[test]
    fn test_ingest_json_drops_malformed_entries_only() {
        let items = vec![
            json!({ "type": "Field" }),
            json!({ "word": 7, "type": "Field" }),
            json!({ "word": "ok", "type": 1 }),
            json!({ "word": "ok", "type": "Timer", "time": 15 }),
            json!("just a string"),
            json!({ "word": "kept", "type": "Field", "time": null }),
        ];

        let report = ingest_json(&items, DEFAULT_TIMER_SECS);

        assert_eq!(report.entries, vec![WordEntry::field("kept")]);
        assert_eq!(report.problems.len(), 5);
        assert!(report
            .problems
            .iter()
            .all(|p| matches!(p, IngestError::MalformedEntry { .. })));
    }

    #[test]
    fn test_ingest_defaults_invalid_timer() {
        let raws = vec![
            RawWordEntry {
                word: "Soon".into(),
                kind: Some("Timer".into()),
                time: Some("abc".into()),
            },
            RawWordEntry {
                word: "Never".into(),
                kind: Some("Timer".into()),
                time: Some("0".into()),
            },
            RawWordEntry {
                word: "Later".into(),
                kind: Some("Timer".into()),
                time: None,
            },
        ];

        let report = ingest_raw(raws, 45);

        assert_eq!(
            report.entries,
            vec![
                WordEntry::timer("Soon", 45),
                WordEntry::timer("Never", 45),
                WordEntry::timer("Later", 45),
            ]
        );
        assert_eq!(report.problems.len(), 2);
        assert_matches!(
            &report.problems[0],
            IngestError::TimerConfigInvalid { index: 0, value } if value == "abc"
        );
    }

    #[test]
    fn test_ingest_drops_blank_words() {
        let raws = vec![
            RawWordEntry {
                word: "   ".into(),
                kind: None,
                time: None,
            },
            RawWordEntry {
                word: "Printer jam".into(),
                kind: None,
                time: None,
            },
        ];

        let report = ingest_raw(raws, DEFAULT_TIMER_SECS);

        assert_eq!(report.entries, vec![WordEntry::field("Printer jam")]);
        assert_eq!(report.dropped_blank, 1);
        assert!(report.problems.is_empty());
    }

    #[test]
    fn test_raw_from_entry() {
        let raw = RawWordEntry::from(&WordEntry::timer("Hold", 20));
        assert_eq!(raw.kind.as_deref(), Some("Timer"));
        assert_eq!(raw.time.as_deref(), Some("20"));

        let raw = RawWordEntry::from(&WordEntry::free("FREE"));
        assert_eq!(raw.kind.as_deref(), Some("Free"));
        assert_eq!(raw.time, None);
    }
}
