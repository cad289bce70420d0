use include_dir::{include_dir, Dir};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::StoreError;
use crate::word::{ingest_json, ingest_rows, IngestReport, RawWordEntry, WordEntry};

static PRESET_DIR: Dir = include_dir!("$CARGO_MANIFEST_DIR/src/presets");

pub type Result<T> = std::result::Result<T, StoreError>;

/// Source of the word list. Play only needs `list`; the admin commands also
/// `replace` the whole list.
pub trait WordStore {
    fn list(&self) -> Result<Vec<WordEntry>>;
    fn replace(&mut self, entries: Vec<WordEntry>) -> Result<()>;
}

/// On-disk document: `{ "words": [ { "word", "type", "time" }, ... ] }`.
#[derive(Debug, Serialize, Deserialize)]
struct WordFile {
    words: Vec<RawWordEntry>,
}

impl WordFile {
    fn from_entries(entries: &[WordEntry]) -> Self {
        Self {
            words: entries.iter().map(RawWordEntry::from).collect(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct FileWordStore {
    path: PathBuf,
    default_timer_secs: u32,
}

impl FileWordStore {
    pub fn new<P: AsRef<Path>>(path: P, default_timer_secs: u32) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            default_timer_secs,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl WordStore for FileWordStore {
    fn list(&self) -> Result<Vec<WordEntry>> {
        if !self.path.exists() {
            log::info!("no word list at {}, starting empty", self.path.display());
            return Ok(Vec::new());
        }
        let bytes = fs::read(&self.path)?;
        let document: Value = serde_json::from_slice(&bytes)?;
        Ok(ingest_document(&document, self.default_timer_secs).entries)
    }

    fn replace(&mut self, entries: Vec<WordEntry>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_vec_pretty(&WordFile::from_entries(&entries))?;
        fs::write(&self.path, data)?;
        log::info!(
            "stored {} words at {}",
            entries.len(),
            self.path.display()
        );
        Ok(())
    }
}

/// Word list kept in memory, used by tests and as a scratch store.
#[derive(Debug, Clone, Default)]
pub struct MemoryWordStore {
    entries: Vec<WordEntry>,
}

impl MemoryWordStore {
    pub fn new(entries: Vec<WordEntry>) -> Self {
        Self { entries }
    }
}

impl WordStore for MemoryWordStore {
    fn list(&self) -> Result<Vec<WordEntry>> {
        Ok(self.entries.clone())
    }

    fn replace(&mut self, entries: Vec<WordEntry>) -> Result<()> {
        self.entries = entries;
        Ok(())
    }
}

/// Accepts `{ "words": [...] }` or a bare array. A document whose `words` is
/// not an array (an emptied file) lists as empty.
fn ingest_document(document: &Value, default_timer_secs: u32) -> IngestReport {
    let items = match document {
        Value::Array(items) => items.as_slice(),
        Value::Object(map) => match map.get("words") {
            Some(Value::Array(items)) => items.as_slice(),
            _ => {
                log::warn!("word list has no `words` array, treating it as empty");
                &[]
            }
        },
        _ => {
            log::warn!("word list is neither an object nor an array, treating it as empty");
            &[]
        }
    };
    ingest_json(items, default_timer_secs)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Json,
    Csv,
}

fn format_of(path: &Path) -> Result<Format> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or_default()
        .to_ascii_lowercase();
    match ext.as_str() {
        "json" => Ok(Format::Json),
        "csv" => Ok(Format::Csv),
        other => Err(StoreError::UnsupportedFormat(other.to_string())),
    }
}

/// Reads a word list exported earlier (or hand written) as JSON or CSV.
pub fn import_file<P: AsRef<Path>>(path: P, default_timer_secs: u32) -> Result<IngestReport> {
    let path = path.as_ref();
    match format_of(path)? {
        Format::Json => {
            let document: Value = serde_json::from_slice(&fs::read(path)?)?;
            Ok(ingest_document(&document, default_timer_secs))
        }
        Format::Csv => {
            let mut reader = csv::ReaderBuilder::new().flexible(true).from_path(path)?;
            let mut rows = Vec::new();
            for row in reader.deserialize::<RawWordEntry>() {
                match row {
                    Err(e) if e.is_io_error() => return Err(e.into()),
                    row => rows.push(row),
                }
            }
            Ok(ingest_rows(rows, default_timer_secs))
        }
    }
}

pub fn export_file<P: AsRef<Path>>(path: P, entries: &[WordEntry]) -> Result<()> {
    let path = path.as_ref();
    let format = format_of(path)?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    match format {
        Format::Json => {
            let data = serde_json::to_vec_pretty(&WordFile::from_entries(entries))?;
            fs::write(path, data)?;
        }
        Format::Csv => {
            let mut writer = csv::Writer::from_path(path)?;
            for entry in entries {
                writer.serialize(RawWordEntry::from(entry))?;
            }
            writer.flush()?;
        }
    }
    Ok(())
}

pub fn preset_names() -> Vec<String> {
    let mut names: Vec<String> = PRESET_DIR
        .files()
        .filter_map(|f| f.path().file_stem())
        .filter_map(|s| s.to_str())
        .map(str::to_string)
        .collect();
    names.sort();
    names
}

pub fn load_preset(name: &str, default_timer_secs: u32) -> Result<IngestReport> {
    let file = PRESET_DIR
        .get_file(format!("{name}.json"))
        .ok_or_else(|| StoreError::NoSuchPreset(name.to_string()))?;
    let document: Value = serde_json::from_slice(file.contents())?;
    Ok(ingest_document(&document, default_timer_secs))
}

/// Order in which entries are handed to the grid assembler.
pub fn deal<R: Rng + ?Sized>(mut entries: Vec<WordEntry>, shuffle: bool, rng: &mut R) -> Vec<WordEntry> {
    if shuffle {
        entries.shuffle(rng);
    }
    entries
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::IngestError;
    use crate::word::{WordKind, DEFAULT_TIMER_SECS};
    use assert_matches::assert_matches;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use tempfile::tempdir;

    fn sample() -> Vec<WordEntry> {
        vec![
            WordEntry::field("Someone is on mute"),
            WordEntry::free("FREE"),
            WordEntry::timer("Awkward silence", 12),
        ]
    }

    #[test]
    fn test_missing_file_lists_empty() {
        let dir = tempdir().unwrap();
        let store = FileWordStore::new(dir.path().join("words.json"), DEFAULT_TIMER_SECS);
        assert!(store.list().unwrap().is_empty());
    }

    #[test]
    fn test_replace_then_list() {
        let dir = tempdir().unwrap();
        let mut store =
            FileWordStore::new(dir.path().join("nested/words.json"), DEFAULT_TIMER_SECS);
        store.replace(sample()).unwrap();
        assert_eq!(store.list().unwrap(), sample());
    }

    #[test]
    fn test_emptied_words_field_lists_empty() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("words.json");
        fs::write(&path, r#"{ "words": "" }"#).unwrap();
        let store = FileWordStore::new(&path, DEFAULT_TIMER_SECS);
        assert!(store.list().unwrap().is_empty());
    }

    #[test]
    fn test_broken_json_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("words.json");
        fs::write(&path, "{ not json").unwrap();
        let store = FileWordStore::new(&path, DEFAULT_TIMER_SECS);
        assert_matches!(store.list(), Err(StoreError::Json(_)));
    }

    #[test]
    fn test_export_import_csv() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("words.csv");
        export_file(&path, &sample()).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("word,type,time"));

        let report = import_file(&path, DEFAULT_TIMER_SECS).unwrap();
        assert_eq!(report.entries, sample());
    }

    #[test]
    fn test_import_json_reports_bad_rows() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("import.json");
        fs::write(
            &path,
            r#"{ "words": [
                { "word": "Good", "type": "Field", "time": null },
                { "word": "Bad", "type": "Timer", "time": 5 }
            ] }"#,
        )
        .unwrap();

        let report = import_file(&path, DEFAULT_TIMER_SECS).unwrap();
        assert_eq!(report.entries, vec![WordEntry::field("Good")]);
        assert_eq!(report.problems.len(), 1);
    }

    #[test]
    fn test_import_csv_drops_only_the_bad_row() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("import.csv");
        let mut data = b"word,type,time\nGood,Field,\n".to_vec();
        data.extend_from_slice(b"\xff\xfe,Field,\n");
        data.extend_from_slice(b"Also good,Timer,5\n");
        fs::write(&path, data).unwrap();

        let report = import_file(&path, DEFAULT_TIMER_SECS).unwrap();
        assert_eq!(
            report.entries,
            vec![WordEntry::field("Good"), WordEntry::timer("Also good", 5)]
        );
        assert_eq!(report.problems.len(), 1);
        assert_matches!(
            report.problems[0],
            IngestError::MalformedEntry { index: 1, .. }
        );
    }

    #[test]
    fn test_unsupported_extension() {
        assert_matches!(
            import_file("words.txt", DEFAULT_TIMER_SECS),
            Err(StoreError::UnsupportedFormat(ext)) if ext == "txt"
        );
    }

    #[test]
    fn test_presets_are_playable() {
        let names = preset_names();
        assert!(names.contains(&"classic".to_string()));
        for name in names {
            let report = load_preset(&name, DEFAULT_TIMER_SECS).unwrap();
            assert!(report.problems.is_empty(), "preset {name} has problems");
            let non_free = report
                .entries
                .iter()
                .filter(|e| e.kind != WordKind::Free)
                .count();
            assert!(non_free >= 24, "preset {name} cannot fill a grid");
        }
    }

    #[test]
    fn test_unknown_preset() {
        assert_matches!(
            load_preset("nope", DEFAULT_TIMER_SECS),
            Err(StoreError::NoSuchPreset(_))
        );
    }

    #[test]
    fn test_deal_keeps_entries() {
        let mut rng = StdRng::seed_from_u64(7);
        let dealt = deal(sample(), false, &mut rng);
        assert_eq!(dealt, sample());

        let mut dealt = deal(sample(), true, &mut rng);
        dealt.sort_by(|a, b| a.text.cmp(&b.text));
        let mut expected = sample();
        expected.sort_by(|a, b| a.text.cmp(&b.text));
        assert_eq!(dealt, expected);
    }
}
