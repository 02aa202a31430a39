//! # Rendering Module
//!
//! Turns api results into terminal text. Every function returns a `String` so
//! the layout can be tested without a terminal; `commands.rs` does the printing.
//!
//! ## Layout
//!
//! Tables are laid out to [`LINE_WIDTH`] columns. Widths are measured with
//! `unicode-width`, so test numbers and bucket names with wide characters still
//! line up. Relative times come from `timeago` and are right-aligned in a fixed
//! column.

use super::styles;
use bucketnotesapp::api::{BucketCount, SearchHit, TestNumberSummary};
use bucketnotesapp::commands::export::plain_text;
use bucketnotesapp::commands::{CmdMessage, MessageLevel};
use bucketnotesapp::model::{DeletedBucket, Document, Note};
use chrono::{DateTime, SecondsFormat, Utc};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

pub const LINE_WIDTH: usize = 100;
pub const TIME_WIDTH: usize = 16;
pub const BAR_WIDTH: usize = 40;

pub fn render_messages(messages: &[CmdMessage]) -> String {
    let mut out = String::new();
    for message in messages {
        let style = match message.level {
            MessageLevel::Success => styles::success(),
            MessageLevel::Warning => styles::warning(),
        };
        out.push_str(&style.apply_to(&message.content).to_string());
        out.push('\n');
    }
    out
}

/// Active buckets with keyword and note count.
pub fn render_bucket_list(doc: &Document) -> String {
    let name_width = column_width(doc.buckets.iter().map(|b| b.name.as_str()));
    let mut out = String::new();
    for bucket in &doc.buckets {
        let count = doc.notes_in(&bucket.name).count();
        out.push_str(&format!(
            "{}  {:>5}  {}\n",
            pad_to_width(&styles::title().apply_to(&bucket.name).to_string(), &bucket.name, name_width),
            count,
            styles::muted().apply_to(&bucket.keyword)
        ));
    }
    out
}

pub fn render_deleted_buckets(deleted: &[DeletedBucket]) -> String {
    if deleted.is_empty() {
        return format!("{}\n", styles::info().apply_to("No deleted buckets."));
    }
    let name_width = column_width(deleted.iter().map(|d| d.name.as_str()));
    let mut out = String::new();
    for entry in deleted {
        let when = entry
            .deleted_at
            .map(format_time_ago)
            .unwrap_or_else(|| format!("{:>width$}", "", width = TIME_WIDTH));
        out.push_str(&format!(
            "{}  {}  {:>3} note(s)  {}\n",
            pad_to_width(&styles::deleted().apply_to(&entry.name).to_string(), &entry.name, name_width),
            styles::muted().apply_to(entry.id),
            entry.notes.len(),
            styles::time().apply_to(when)
        ));
    }
    out
}

/// Notes, one per line: full timestamp, test number, text preview, relative time.
pub fn render_notes(notes: &[Note]) -> String {
    if notes.is_empty() {
        return format!("{}\n", styles::info().apply_to("No notes."));
    }
    let tn_width = column_width(notes.iter().map(|n| n.test_number.as_str()));
    let mut out = String::new();
    for note in notes {
        out.push_str(&note_line(note, tn_width, None));
    }
    out
}

pub fn render_search(hits: &[SearchHit]) -> String {
    if hits.is_empty() {
        return format!("{}\n", styles::info().apply_to("No matching test numbers."));
    }
    let tn_width = column_width(hits.iter().map(|h| h.note.test_number.as_str()));
    let mut out = String::new();
    for hit in hits {
        out.push_str(&note_line(&hit.note, tn_width, Some(&hit.bucket)));
    }
    out
}

fn note_line(note: &Note, tn_width: usize, bucket: Option<&str>) -> String {
    let stamp = note.timestamp.to_rfc3339_opts(SecondsFormat::Millis, true);
    let prefix = match bucket {
        Some(bucket) => format!("[{}] ", bucket),
        None => String::new(),
    };
    let preview: String = plain_text(&note.note_text)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let fixed = stamp.width() + 2 + tn_width + 2 + TIME_WIDTH + 1;
    let available = LINE_WIDTH.saturating_sub(fixed);
    let body = truncate_to_width(&format!("{}{}", prefix, preview), available);
    let padding = available.saturating_sub(body.width());

    format!(
        "{}  {}  {}{} {}\n",
        styles::muted().apply_to(&stamp),
        pad_to_width(
            &styles::index().apply_to(&note.test_number).to_string(),
            &note.test_number,
            tn_width
        ),
        body,
        " ".repeat(padding),
        styles::time().apply_to(format_time_ago(note.timestamp))
    )
}

/// Test-number summary; duplicates are highlighted and marked.
pub fn render_test_numbers(rows: &[TestNumberSummary]) -> String {
    if rows.is_empty() {
        return format!("{}\n", styles::info().apply_to("No test numbers recorded."));
    }
    let tn_width = column_width(rows.iter().map(|r| r.test_number.as_str()));
    let mut out = String::new();
    for row in rows {
        let style = if row.duplicate {
            styles::duplicate()
        } else {
            styles::title()
        };
        let marker = if row.duplicate { " (duplicate)" } else { "" };
        out.push_str(&format!(
            "{}  {:>4}  {}{}\n",
            pad_to_width(&style.apply_to(&row.test_number).to_string(), &row.test_number, tn_width),
            row.count,
            styles::muted().apply_to(row.buckets.join(", ")),
            style.apply_to(marker)
        ));
    }
    out
}

/// Horizontal bar chart of notes per bucket.
pub fn render_stats(counts: &[BucketCount]) -> String {
    let name_width = column_width(counts.iter().map(|c| c.name.as_str()));
    let max = counts.iter().map(|c| c.count).max().unwrap_or(0);
    let mut out = String::new();
    for entry in counts {
        let len = if max == 0 {
            0
        } else {
            (entry.count * BAR_WIDTH).div_ceil(max)
        };
        out.push_str(&format!(
            "{}  {} {}\n",
            pad_to_width(&entry.name, &entry.name, name_width),
            styles::bar().apply_to("█".repeat(len)),
            entry.count
        ));
    }
    out
}

/// Short overview of the whole document.
pub fn render_document(doc: &Document, location: &str) -> String {
    let mut out = format!("{}\n", styles::muted().apply_to(location));
    out.push_str(&format!(
        "{} bucket(s), {} note(s), {} deleted bucket(s)\n\n",
        doc.buckets.len(),
        doc.notes.len(),
        doc.deleted_buckets.len()
    ));
    out.push_str(&render_bucket_list(doc));
    out
}

fn column_width<'a>(values: impl Iterator<Item = &'a str>) -> usize {
    values.map(|v| v.width()).max().unwrap_or(0)
}

/// Pads `styled` (whose visible text is `plain`) to `width` columns.
fn pad_to_width(styled: &str, plain: &str, width: usize) -> String {
    format!("{}{}", styled, " ".repeat(width.saturating_sub(plain.width())))
}

pub fn truncate_to_width(s: &str, max_width: usize) -> String {
    if s.width() <= max_width {
        return s.to_string();
    }
    let mut result = String::new();
    let mut current_width = 0;

    for c in s.chars() {
        let char_width = c.width().unwrap_or(0);
        if current_width + char_width > max_width.saturating_sub(1) {
            result.push('…');
            return result;
        }
        result.push(c);
        current_width += char_width;
    }

    result
}

pub fn format_time_ago(timestamp: DateTime<Utc>) -> String {
    let now = Utc::now();
    let duration = now.signed_duration_since(timestamp);

    let formatter = timeago::Formatter::new();
    let time_str = formatter.convert(duration.to_std().unwrap_or_default());

    format!("{:>width$}", time_str, width = TIME_WIDTH)
}
