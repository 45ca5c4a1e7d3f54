use std::fmt;
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use tempfile::NamedTempFile;

/// Once the log grows past this, old entries are trimmed before the next append.
const MAX_LOG_SIZE: u64 = 1_048_576;

/// Default number of days before entries are prunable.
pub const PRUNE_AGE_DAYS: i64 = 30;

/// Header written at the top of a new recovery log.
const FILE_HEADER: &str = "\
<!-- agenda recovery log: data agenda could not keep in its stores.
     Corrupt store contents, failed writes and deleted records land here.
     View with: agenda recovery
     Prune old entries: agenda recovery prune -->

---
";

/// Why an entry was written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecoveryCategory {
    /// A store file was present but unparsable
    Corrupt,
    /// A store write failed; the body holds what should have been written
    Write,
    /// Records removed by delete or clear
    Delete,
}

impl fmt::Display for RecoveryCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecoveryCategory::Corrupt => write!(f, "corrupt"),
            RecoveryCategory::Write => write!(f, "write"),
            RecoveryCategory::Delete => write!(f, "delete"),
        }
    }
}

impl RecoveryCategory {
    pub fn parse_category(s: &str) -> Option<Self> {
        match s {
            "corrupt" => Some(RecoveryCategory::Corrupt),
            "write" => Some(RecoveryCategory::Write),
            "delete" => Some(RecoveryCategory::Delete),
            _ => None,
        }
    }
}

/// A single entry in the recovery log.
#[derive(Debug, Clone)]
pub struct RecoveryEntry {
    pub timestamp: DateTime<Utc>,
    pub category: RecoveryCategory,
    pub description: String,
    pub fields: Vec<(String, String)>,
    pub body: String,
}

impl RecoveryEntry {
    pub fn new(category: RecoveryCategory, description: impl Into<String>) -> Self {
        RecoveryEntry {
            timestamp: Utc::now(),
            category,
            description: description.into(),
            fields: Vec::new(),
            body: String::new(),
        }
    }

    pub fn field(mut self, key: &str, value: impl Into<String>) -> Self {
        self.fields.push((key.to_string(), value.into()));
        self
    }

    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.body = body.into();
        self
    }

    pub fn field_value(&self, key: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    fn to_markdown(&self) -> String {
        let mut out = format!(
            "## {} {}: {}\n\n",
            self.timestamp
                .to_rfc3339_opts(chrono::SecondsFormat::Secs, true),
            self.category,
            self.description,
        );

        for (key, value) in &self.fields {
            out.push_str(&format!("{}: {}\n", key, value));
        }

        if !self.body.is_empty() {
            out.push_str("\n```text\n");
            out.push_str(&self.body);
            if !self.body.ends_with('\n') {
                out.push('\n');
            }
            out.push_str("```\n");
        }

        out.push_str("\n---\n");
        out
    }

    /// JSON form for `agenda recovery --json`.
    pub fn to_json(&self) -> serde_json::Value {
        let fields: serde_json::Map<String, serde_json::Value> = self
            .fields
            .iter()
            .map(|(k, v)| (k.clone(), serde_json::Value::String(v.clone())))
            .collect();

        serde_json::json!({
            "timestamp": self.timestamp.to_rfc3339_opts(chrono::SecondsFormat::Secs, true),
            "category": self.category.to_string(),
            "description": self.description,
            "fields": fields,
            "body": self.body,
        })
    }

    pub fn to_display_markdown(&self) -> String {
        self.to_markdown()
    }
}

pub fn recovery_log_path(data_dir: &Path) -> PathBuf {
    data_dir.join(".recovery.log")
}

/// Write `content` to `path` atomically using a temp file + rename.
pub fn atomic_write(path: &Path, content: &[u8]) -> io::Result<()> {
    let dir = path.parent().unwrap_or(Path::new("."));
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(content)?;
    tmp.flush()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

/// Append an entry to the log. Failures are reported through `log` and otherwise ignored.
pub fn log_recovery(data_dir: &Path, entry: RecoveryEntry) {
    if let Err(e) = log_recovery_inner(data_dir, &entry) {
        log::warn!(
            "could not write to recovery log in {}: {}",
            data_dir.display(),
            e
        );
    }
}

/// Append `entry` unless the newest entry of its category with the same `key`
/// field already holds the same body. Repeated reads of one corrupt file log it once.
pub fn log_recovery_once(data_dir: &Path, entry: RecoveryEntry, key: &str) {
    let value = entry.field_value(key);
    let previous = read_recovery_entries(data_dir, None, None)
        .into_iter()
        .find(|e| e.category == entry.category && e.field_value(key) == value);
    if let Some(prev) = previous
        && prev.body.lines().eq(entry.body.lines())
    {
        log::debug!("recovery entry already logged: {}: {}", entry.category, entry.description);
        return;
    }
    log_recovery(data_dir, entry);
}

fn log_recovery_inner(data_dir: &Path, entry: &RecoveryEntry) -> io::Result<()> {
    std::fs::create_dir_all(data_dir)?;
    let path = recovery_log_path(data_dir);

    if let Ok(meta) = std::fs::metadata(&path)
        && meta.len() > MAX_LOG_SIZE
    {
        trim_to_size(&path, MAX_LOG_SIZE);
    }
    let needs_header = std::fs::metadata(&path).map_or(true, |m| m.len() == 0);

    let mut file = OpenOptions::new().create(true).append(true).open(&path)?;
    if needs_header {
        file.write_all(FILE_HEADER.as_bytes())?;
    }
    file.write_all(entry.to_markdown().as_bytes())?;
    log::debug!("recovery entry written: {}: {}", entry.category, entry.description);
    Ok(())
}

/// Drop entries older than `PRUNE_AGE_DAYS`, then the oldest remaining ones,
/// until the log fits in `max_bytes`. Best effort: failures are only logged.
fn trim_to_size(path: &Path, max_bytes: u64) {
    let Ok(content) = std::fs::read_to_string(path) else {
        return;
    };
    let cutoff = Utc::now() - chrono::Duration::days(PRUNE_AGE_DAYS);
    let mut entries: Vec<RecoveryEntry> = parse_entries(&content)
        .into_iter()
        .filter(|e| e.timestamp >= cutoff)
        .collect();

    let sizes: Vec<usize> = entries.iter().map(|e| e.to_markdown().len()).collect();
    let mut total = FILE_HEADER.len() + sizes.iter().sum::<usize>();
    let mut skip = 0;
    while (total as u64) > max_bytes && skip < entries.len() {
        total -= sizes[skip];
        skip += 1;
    }
    entries.drain(..skip);

    let mut out = String::from(FILE_HEADER);
    for entry in &entries {
        out.push_str(&entry.to_markdown());
    }
    match atomic_write(path, out.as_bytes()) {
        Ok(()) => log::info!(
            "trimmed recovery log {} to {} entries",
            path.display(),
            entries.len()
        ),
        Err(e) => log::warn!("could not trim recovery log {}: {}", path.display(), e),
    }
}

/// Read entries, most recent first.
pub fn read_recovery_entries(
    data_dir: &Path,
    limit: Option<usize>,
    since: Option<DateTime<Utc>>,
) -> Vec<RecoveryEntry> {
    let content = match std::fs::read_to_string(recovery_log_path(data_dir)) {
        Ok(c) => c,
        Err(_) => return Vec::new(),
    };

    let mut entries = parse_entries(&content);
    if let Some(since_dt) = since {
        entries.retain(|e| e.timestamp >= since_dt);
    }
    entries.reverse();
    if let Some(n) = limit {
        entries.truncate(n);
    }
    entries
}

fn parse_entries(content: &str) -> Vec<RecoveryEntry> {
    let mut entries = Vec::new();
    let mut lines = content.lines();

    while let Some(line) = lines.next() {
        let Some((timestamp, category, description)) =
            line.strip_prefix("## ").and_then(parse_entry_header)
        else {
            continue;
        };

        let mut fields = Vec::new();
        let mut body_lines: Vec<&str> = Vec::new();
        let mut in_code_block = false;

        for line in lines.by_ref() {
            if in_code_block {
                if line == "```" {
                    in_code_block = false;
                } else {
                    body_lines.push(line);
                }
                continue;
            }
            if line == "---" {
                break;
            }
            if line.starts_with("```") {
                in_code_block = true;
                continue;
            }
            if let Some((key, value)) = line.trim().split_once(": ") {
                fields.push((key.to_string(), value.to_string()));
            }
        }

        entries.push(RecoveryEntry {
            timestamp,
            category,
            description,
            fields,
            body: body_lines.join("\n"),
        });
    }

    entries
}

/// Parse `<rfc3339> <category>: <description>`
fn parse_entry_header(header: &str) -> Option<(DateTime<Utc>, RecoveryCategory, String)> {
    let (timestamp_str, rest) = header.split_once(' ')?;
    let timestamp = DateTime::parse_from_rfc3339(timestamp_str)
        .ok()?
        .with_timezone(&Utc);
    let (category_str, description) = rest.split_once(": ")?;
    let category = RecoveryCategory::parse_category(category_str)?;
    Some((timestamp, category, description.to_string()))
}

/// Remove entries older than `before` (default: 30 days), or every entry.
/// Returns the number of entries removed.
pub fn prune_recovery(
    data_dir: &Path,
    before: Option<DateTime<Utc>>,
    all: bool,
) -> io::Result<usize> {
    let path = recovery_log_path(data_dir);
    if !path.exists() {
        return Ok(0);
    }

    let content = std::fs::read_to_string(&path)?;
    let entries = parse_entries(&content);
    let cutoff = before.unwrap_or_else(|| Utc::now() - chrono::Duration::days(PRUNE_AGE_DAYS));

    let kept: Vec<&RecoveryEntry> = if all {
        Vec::new()
    } else {
        entries.iter().filter(|e| e.timestamp >= cutoff).collect()
    };

    let mut out = String::from(FILE_HEADER);
    for entry in &kept {
        out.push_str(&entry.to_markdown());
    }
    atomic_write(&path, out.as_bytes())?;
    Ok(entries.len() - kept.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Datelike;
    use tempfile::TempDir;

    fn make_entry(category: RecoveryCategory, desc: &str, body: &str) -> RecoveryEntry {
        RecoveryEntry::new(category, desc)
            .field("Store", "calendar_data.json")
            .body(body)
    }

    #[test]
    fn test_entry_formatting() {
        let md = make_entry(RecoveryCategory::Corrupt, "unparsable store", "{{{").to_markdown();
        assert!(md.starts_with("## "));
        assert!(md.contains("corrupt: unparsable store"));
        assert!(md.contains("Store: calendar_data.json"));
        assert!(md.contains("```text\n{{{\n```"));
        assert!(md.ends_with("---\n"));
    }

    #[test]
    fn test_log_and_read_most_recent_first() {
        let tmp = TempDir::new().unwrap();
        log_recovery(tmp.path(), make_entry(RecoveryCategory::Corrupt, "first", "a"));
        log_recovery(tmp.path(), make_entry(RecoveryCategory::Write, "second", "b"));

        let entries = read_recovery_entries(tmp.path(), None, None);
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].description, "second");
        assert_eq!(entries[1].description, "first");
    }

    #[test]
    fn test_read_with_limit() {
        let tmp = TempDir::new().unwrap();
        for i in 0..4 {
            log_recovery(
                tmp.path(),
                make_entry(RecoveryCategory::Delete, &format!("entry{}", i), ""),
            );
        }
        let entries = read_recovery_entries(tmp.path(), Some(2), None);
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].description, "entry3");
        assert_eq!(entries[1].description, "entry2");
    }

    #[test]
    fn test_body_and_fields_survive_round_trip() {
        let tmp = TempDir::new().unwrap();
        let entry = RecoveryEntry::new(RecoveryCategory::Write, "store write failed")
            .field("Target", "focusflow_tasks.json")
            .field("Error", "Permission denied")
            .body("[\n  {\n    \"task\": \"x\"\n  }\n]");
        log_recovery(tmp.path(), entry);

        let entries = read_recovery_entries(tmp.path(), None, None);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].category, RecoveryCategory::Write);
        assert_eq!(entries[0].fields.len(), 2);
        assert_eq!(entries[0].fields[1].1, "Permission denied");
        assert_eq!(entries[0].body, "[\n  {\n    \"task\": \"x\"\n  }\n]");
    }

    #[test]
    fn test_header_created_on_first_write() {
        let tmp = TempDir::new().unwrap();
        log_recovery(tmp.path(), make_entry(RecoveryCategory::Delete, "x", ""));
        let content = std::fs::read_to_string(recovery_log_path(tmp.path())).unwrap();
        assert!(content.starts_with("<!-- agenda recovery log"));
    }

    #[test]
    fn test_prune_all() {
        let tmp = TempDir::new().unwrap();
        log_recovery(tmp.path(), make_entry(RecoveryCategory::Corrupt, "x", "y"));
        assert_eq!(prune_recovery(tmp.path(), None, true).unwrap(), 1);
        assert!(read_recovery_entries(tmp.path(), None, None).is_empty());
    }

    #[test]
    fn test_prune_before_cutoff() {
        let tmp = TempDir::new().unwrap();
        let mut old = make_entry(RecoveryCategory::Delete, "old entry", "");
        old.timestamp = Utc::now() - chrono::Duration::days(60);
        log_recovery(tmp.path(), old);
        log_recovery(tmp.path(), make_entry(RecoveryCategory::Delete, "new entry", ""));

        assert_eq!(prune_recovery(tmp.path(), None, false).unwrap(), 1);
        let entries = read_recovery_entries(tmp.path(), None, None);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].description, "new entry");
    }

    #[test]
    fn test_log_once_skips_repeated_body() {
        let tmp = TempDir::new().unwrap();
        for _ in 0..3 {
            log_recovery_once(
                tmp.path(),
                make_entry(RecoveryCategory::Corrupt, "unparsable store", "{oops\n"),
                "Store",
            );
        }
        assert_eq!(read_recovery_entries(tmp.path(), None, None).len(), 1);

        log_recovery_once(
            tmp.path(),
            make_entry(RecoveryCategory::Corrupt, "unparsable store", "{oops again"),
            "Store",
        );
        let other_store = RecoveryEntry::new(RecoveryCategory::Corrupt, "unparsable store")
            .field("Store", "focusflow_tasks.json")
            .body("{oops again");
        log_recovery_once(tmp.path(), other_store, "Store");
        assert_eq!(read_recovery_entries(tmp.path(), None, None).len(), 3);
    }

    #[test]
    fn test_trim_to_size_keeps_newest() {
        let tmp = TempDir::new().unwrap();
        let mut stale = make_entry(RecoveryCategory::Delete, "stale", "s");
        stale.timestamp = Utc::now() - chrono::Duration::days(60);
        log_recovery(tmp.path(), stale);
        for i in 0..10 {
            log_recovery(
                tmp.path(),
                make_entry(RecoveryCategory::Delete, &format!("entry{}", i), &"x".repeat(200)),
            );
        }
        let path = recovery_log_path(tmp.path());
        let entry_len = make_entry(RecoveryCategory::Delete, "entry0", &"x".repeat(200))
            .to_markdown()
            .len();
        let limit = (FILE_HEADER.len() + 3 * entry_len) as u64;

        trim_to_size(&path, limit);

        assert!(std::fs::metadata(&path).unwrap().len() <= limit);
        let entries = read_recovery_entries(tmp.path(), None, None);
        let names: Vec<_> = entries.iter().map(|e| e.description.as_str()).collect();
        assert_eq!(names, vec!["entry9", "entry8", "entry7"]);
    }

    #[test]
    fn test_prune_no_log_file() {
        let tmp = TempDir::new().unwrap();
        assert_eq!(prune_recovery(tmp.path(), None, true).unwrap(), 0);
    }

    #[test]
    fn test_parse_entry_header() {
        let (ts, cat, desc) =
            parse_entry_header("2026-02-10T14:32:05Z delete: meeting 3 deleted").unwrap();
        assert_eq!(ts.year(), 2026);
        assert_eq!(cat, RecoveryCategory::Delete);
        assert_eq!(desc, "meeting 3 deleted");
        assert!(parse_entry_header("2026-02-10T14:32:05Z unknown: x").is_none());
        assert!(parse_entry_header("garbage").is_none());
    }

    #[test]
    fn test_atomic_write_overwrites() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("store.json");
        atomic_write(&path, b"[]").unwrap();
        atomic_write(&path, b"[1]").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "[1]");
    }

    #[test]
    fn test_entry_to_json() {
        let json = make_entry(RecoveryCategory::Corrupt, "bad", "content").to_json();
        assert_eq!(json["category"], "corrupt");
        assert_eq!(json["body"], "content");
        assert_eq!(json["fields"]["Store"], "calendar_data.json");
    }
}
