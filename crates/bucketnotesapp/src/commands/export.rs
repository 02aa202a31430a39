use crate::error::{NotesError, Result};
use crate::model::{Document, Note};
use crate::store::DataStore;
use chrono::{DateTime, Utc};
use flate2::write::GzEncoder;
use flate2::Compression;
use std::collections::HashSet;
use std::io::Write;
use tracing::debug;

use super::helpers::current;
use super::summary::{test_numbers, TestNumberSummary};

/// A rendered export, ready to be written to disk or sent as an attachment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportFile {
    pub file_name: String,
    pub content: Vec<u8>,
}

impl ExportFile {
    /// Content as text. Exports other than the archive are always UTF-8.
    pub fn text(&self) -> std::borrow::Cow<'_, str> {
        String::from_utf8_lossy(&self.content)
    }
}

pub const CSV_HEADER: &str = "Test Number,Count,Buckets";

fn csv_quote(field: &str) -> String {
    format!("\"{}\"", field.replace('"', "\"\""))
}

pub fn summary_csv(rows: &[TestNumberSummary]) -> String {
    let mut lines = Vec::with_capacity(rows.len() + 1);
    lines.push(CSV_HEADER.to_string());
    for row in rows {
        lines.push(format!(
            "{},{},{}",
            csv_quote(&row.test_number),
            row.count,
            csv_quote(&row.buckets.join(", "))
        ));
    }
    lines.join("\n")
}

/// CSV of the test-number summary.
pub fn csv<S: DataStore + ?Sized>(store: &S) -> Result<ExportFile> {
    csv_at(store, Utc::now())
}

pub fn csv_at<S: DataStore + ?Sized>(store: &S, now: DateTime<Utc>) -> Result<ExportFile> {
    let rows = test_numbers(&current(store)?);
    Ok(ExportFile {
        file_name: format!("all_test_numbers_{}.csv", now.timestamp_millis()),
        content: summary_csv(&rows).into_bytes(),
    })
}

/// Editor markup reduced to plain lines.
pub fn plain_text(note_text: &str) -> String {
    note_text.replace("<div>", "\n").replace("</div>", "")
}

pub fn note_txt(note: &Note) -> String {
    format!(
        "Timestamp: {}\nTest Number: {}\nNote:\n{}\n",
        note.timestamp.format("%Y-%m-%d %H:%M"),
        note.test_number,
        plain_text(&note.note_text)
    )
}

/// Plain-text export of the note identified by test number and timestamp.
pub fn note<S: DataStore + ?Sized>(
    store: &S,
    test_number: &str,
    timestamp: DateTime<Utc>,
) -> Result<ExportFile> {
    let doc = current(store)?;
    let found = doc
        .notes
        .iter()
        .find(|n| n.test_number == test_number && n.timestamp == timestamp)
        .ok_or_else(|| NotesError::NoteNotFound(format!("{} at {}", test_number, timestamp)))?;

    Ok(ExportFile {
        file_name: format!("{}.txt", sanitize_filename(&found.test_number)),
        content: note_txt(found).into_bytes(),
    })
}

/// Every note as a text file in a gzipped tarball, one directory per bucket.
pub fn archive<S: DataStore + ?Sized>(store: &S) -> Result<ExportFile> {
    let doc = current(store)?;
    let now = Utc::now();
    let mut content = Vec::new();
    write_archive(&mut content, &doc)?;
    Ok(ExportFile {
        file_name: format!("bucketnotes-{}.tar.gz", now.format("%Y-%m-%d_%H-%M-%S")),
        content,
    })
}

fn write_archive<W: Write>(writer: W, doc: &Document) -> Result<()> {
    let enc = GzEncoder::new(writer, Compression::default());
    let mut tar = tar::Builder::new(enc);
    let mut used = HashSet::new();

    for note in &doc.notes {
        let stem = format!(
            "bucketnotes/{}/{}-{}",
            sanitize_filename(&note.bucket_name),
            sanitize_filename(&note.test_number),
            note.timestamp.timestamp_millis()
        );
        let mut entry_name = format!("{stem}.txt");
        let mut seq = 2;
        while !used.insert(entry_name.clone()) {
            entry_name = format!("{stem}-{seq}.txt");
            seq += 1;
        }
        let content = note_txt(note);

        let mut header = tar::Header::new_gnu();
        header.set_size(content.len() as u64);
        header.set_mode(0o644);
        header.set_mtime(note.timestamp.timestamp().max(0) as u64);
        header.set_cksum();

        tar.append_data(&mut header, &entry_name, content.as_bytes())?;
        debug!(entry = %entry_name, "archived note");
    }

    tar.into_inner()?.finish()?;
    Ok(())
}

fn sanitize_filename(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || c == ' ' || c == '-' || c == '_' || c == '.' {
                c
            } else {
                '_'
            }
        })
        .collect();
    let trimmed = cleaned.trim().trim_start_matches('.');
    if trimmed.is_empty() {
        "_".to_string()
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::UNCATEGORIZED;
    use crate::store::memory::fixtures::StoreFixture;
    use chrono::TimeZone;
    use flate2::read::GzDecoder;
    use std::io::Read;

    #[test]
    fn csv_header_only_when_empty() {
        let fixture = StoreFixture::new();
        let file = csv(&fixture.store).unwrap();
        assert_eq!(file.text(), CSV_HEADER);
        assert!(file.file_name.starts_with("all_test_numbers_"));
        assert!(file.file_name.ends_with(".csv"));
    }

    #[test]
    fn csv_rows_quote_and_join_buckets() {
        let fixture = StoreFixture::new()
            .with_bucket("Regression", "")
            .with_note("T9", "a", "Regression")
            .with_note("T9", "b", UNCATEGORIZED)
            .with_note("say \"hi\"", "c", UNCATEGORIZED);

        let now = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
        let file = csv_at(&fixture.store, now).unwrap();
        assert_eq!(file.file_name, "all_test_numbers_1709251200000.csv");
        assert_eq!(
            file.text(),
            "Test Number,Count,Buckets\n\
             \"T9\",2,\"Regression, Uncategorized\"\n\
             \"say \"\"hi\"\"\",1,\"Uncategorized\""
        );
    }

    #[test]
    fn note_txt_strips_editor_markup() {
        let ts = Utc.with_ymd_and_hms(2024, 3, 1, 10, 15, 30).unwrap();
        let note = Note {
            test_number: "T1".into(),
            note_text: "line one<div>line two</div><div>three</div>".into(),
            bucket_name: UNCATEGORIZED.into(),
            timestamp: ts,
        };
        assert_eq!(
            note_txt(&note),
            "Timestamp: 2024-03-01 10:15\nTest Number: T1\nNote:\nline one\nline two\nthree\n"
        );
    }

    #[test]
    fn note_export_by_test_number_and_timestamp() {
        let ts = Utc.with_ymd_and_hms(2024, 3, 1, 10, 15, 30).unwrap();
        let fixture = StoreFixture::new().with_note_at("T1", UNCATEGORIZED, ts);

        let file = note(&fixture.store, "T1", ts).unwrap();
        assert_eq!(file.file_name, "T1.txt");
        assert!(file.text().contains("Test Number: T1"));

        let missing = note(&fixture.store, "T1", ts + chrono::Duration::seconds(1));
        assert!(matches!(missing, Err(NotesError::NoteNotFound(_))));
    }

    #[test]
    fn archive_holds_one_entry_per_note() {
        let ts = Utc.with_ymd_and_hms(2024, 3, 1, 10, 15, 30).unwrap();
        let fixture = StoreFixture::new()
            .with_bucket("Smoke/UI", "")
            .with_note_at("T1", "Smoke/UI", ts)
            .with_note_at("T2", UNCATEGORIZED, ts);

        let file = archive(&fixture.store).unwrap();
        assert!(file.file_name.ends_with(".tar.gz"));

        let mut tar = tar::Archive::new(GzDecoder::new(file.content.as_slice()));
        let mut names = Vec::new();
        for entry in tar.entries().unwrap() {
            let mut entry = entry.unwrap();
            let mut body = String::new();
            entry.read_to_string(&mut body).unwrap();
            assert!(body.starts_with("Timestamp: 2024-03-01 10:15"));
            names.push(entry.path().unwrap().to_string_lossy().into_owned());
        }
        assert_eq!(
            names,
            vec![
                "bucketnotes/Smoke_UI/T1-1709288130000.txt",
                "bucketnotes/Uncategorized/T2-1709288130000.txt",
            ]
        );
    }

    #[test]
    fn archive_paths_stay_unique_within_a_millisecond() {
        let ts = Utc.with_ymd_and_hms(2024, 3, 1, 10, 15, 30).unwrap();
        let fixture = StoreFixture::new()
            .with_note_at("T1", UNCATEGORIZED, ts)
            .with_note_at("T1", UNCATEGORIZED, ts)
            .with_note_at("T1", UNCATEGORIZED, ts);

        let file = archive(&fixture.store).unwrap();
        let mut tar = tar::Archive::new(GzDecoder::new(file.content.as_slice()));
        let names: Vec<String> = tar
            .entries()
            .unwrap()
            .map(|e| e.unwrap().path().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(
            names,
            vec![
                "bucketnotes/Uncategorized/T1-1709288130000.txt",
                "bucketnotes/Uncategorized/T1-1709288130000-2.txt",
                "bucketnotes/Uncategorized/T1-1709288130000-3.txt",
            ]
        );
    }

    #[test]
    fn sanitize_keeps_names_inside_their_directory() {
        assert_eq!(sanitize_filename("../etc"), "_etc");
        assert_eq!(sanitize_filename("a/b"), "a_b");
        assert_eq!(sanitize_filename(""), "_");
    }
}
