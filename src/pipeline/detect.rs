//! Change detection between two snapshots.
//!
//! Produces a line-level unified diff that applies back onto the previous
//! text with standard patch semantics. The alignment is Myers (shortest
//! edit script) with no deadline, so identical inputs always give an
//! identical diff. Hunk headers are computed from running line positions
//! over the change sequence, never from the op indices.

use std::ops::Range;

use similar::{Algorithm, ChangeTag, TextDiff};

pub const PREVIOUS_LABEL: &str = "Previous Week";
pub const CURRENT_LABEL: &str = "Current Week";

/// Default number of context lines around each hunk.
pub const DEFAULT_CONTEXT: usize = 3;

const NO_NEWLINE_MARKER: &str = "\\ No newline at end of file\n";

/// Classification of the current snapshot against the previous one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChangeResult {
    /// No previous snapshot exists.
    FirstRun,
    /// Texts are equal after trimming surrounding whitespace.
    Unchanged,
    /// Texts differ; carries the unified diff.
    Changed(UnifiedDiff),
}

impl ChangeResult {
    /// Whether the run should be reported as "Changes Detected".
    pub fn is_changed(&self) -> bool {
        !matches!(self, ChangeResult::Unchanged)
    }

    pub fn label(&self) -> &'static str {
        match self {
            ChangeResult::FirstRun => "first run",
            ChangeResult::Unchanged => "unchanged",
            ChangeResult::Changed(_) => "changed",
        }
    }
}

/// Unified diff text plus line statistics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnifiedDiff {
    text: String,
    inserted: usize,
    deleted: usize,
}

impl UnifiedDiff {
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Lines present only in the current text.
    pub fn inserted(&self) -> usize {
        self.inserted
    }

    /// Lines present only in the previous text.
    pub fn deleted(&self) -> usize {
        self.deleted
    }

    pub fn change_count(&self) -> usize {
        self.inserted + self.deleted
    }
}

/// One line of the edit script with its 0-based position on each side.
#[derive(Debug, Clone, Copy)]
struct DiffLine<'a> {
    tag: ChangeTag,
    text: &'a str,
    old_pos: usize,
    new_pos: usize,
}

/// Calculator for computing diffs between snapshots.
#[derive(Debug, Clone)]
pub struct ChangeDetector {
    context_radius: usize,
    previous_label: String,
    current_label: String,
}

impl Default for ChangeDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl ChangeDetector {
    /// Three lines of context, "Previous Week" / "Current Week" headers.
    pub fn new() -> Self {
        Self {
            context_radius: DEFAULT_CONTEXT,
            previous_label: PREVIOUS_LABEL.to_string(),
            current_label: CURRENT_LABEL.to_string(),
        }
    }

    pub fn with_context(mut self, lines: usize) -> Self {
        self.context_radius = lines;
        self
    }

    pub fn with_labels(mut self, previous: impl Into<String>, current: impl Into<String>) -> Self {
        self.previous_label = previous.into();
        self.current_label = current.into();
        self
    }

    /// Compare `previous` against `current`.
    pub fn detect(&self, previous: &str, current: &str) -> ChangeResult {
        if previous.is_empty() {
            return ChangeResult::FirstRun;
        }
        if previous.trim() == current.trim() {
            return ChangeResult::Unchanged;
        }
        ChangeResult::Changed(self.diff(previous, current))
    }

    /// Unified diff of two texts, split on lines that keep their terminators.
    pub fn diff(&self, previous: &str, current: &str) -> UnifiedDiff {
        let diff = TextDiff::configure()
            .algorithm(Algorithm::Myers)
            .diff_lines(previous, current);

        let (mut old_pos, mut new_pos) = (0, 0);
        let (mut inserted, mut deleted) = (0, 0);
        let mut lines = Vec::new();
        for change in diff.iter_all_changes() {
            let tag = change.tag();
            lines.push(DiffLine {
                tag,
                text: change.value(),
                old_pos,
                new_pos,
            });
            match tag {
                ChangeTag::Equal => {
                    old_pos += 1;
                    new_pos += 1;
                }
                ChangeTag::Delete => {
                    old_pos += 1;
                    deleted += 1;
                }
                ChangeTag::Insert => {
                    new_pos += 1;
                    inserted += 1;
                }
            }
        }

        UnifiedDiff {
            text: self.render(&lines),
            inserted,
            deleted,
        }
    }

    fn render(&self, lines: &[DiffLine<'_>]) -> String {
        let hunks = hunk_ranges(lines, self.context_radius);
        if hunks.is_empty() {
            return String::new();
        }

        let mut out = format!("--- {}\n+++ {}\n", self.previous_label, self.current_label);
        for range in hunks {
            let hunk = &lines[range];
            let first = hunk[0];
            let old_len = hunk.iter().filter(|l| l.tag != ChangeTag::Insert).count();
            let new_len = hunk.iter().filter(|l| l.tag != ChangeTag::Delete).count();
            out.push_str(&format!(
                "@@ -{} +{} @@\n",
                header_range(first.old_pos, old_len),
                header_range(first.new_pos, new_len)
            ));

            for line in hunk {
                out.push(match line.tag {
                    ChangeTag::Equal => ' ',
                    ChangeTag::Delete => '-',
                    ChangeTag::Insert => '+',
                });
                out.push_str(line.text);
                if !line.text.ends_with('\n') {
                    out.push('\n');
                    out.push_str(NO_NEWLINE_MARKER);
                }
            }
        }
        out
    }
}

/// Group changed lines into hunks, merging ones whose context overlaps.
fn hunk_ranges(lines: &[DiffLine<'_>], context: usize) -> Vec<Range<usize>> {
    let mut ranges: Vec<Range<usize>> = Vec::new();
    for (idx, line) in lines.iter().enumerate() {
        if line.tag == ChangeTag::Equal {
            continue;
        }
        let start = idx.saturating_sub(context);
        let end = (idx + context + 1).min(lines.len());
        match ranges.last_mut() {
            Some(last) if start <= last.end => last.end = end,
            _ => ranges.push(start..end),
        }
    }
    ranges
}

/// `start,len` in patch notation from a 0-based start. An empty range
/// names the line before it.
fn header_range(start: usize, len: usize) -> String {
    match len {
        0 => format!("{start},0"),
        1 => format!("{}", start + 1),
        _ => format!("{},{}", start + 1, len),
    }
}

/// Convenience function to detect changes with the default detector.
pub fn detect_changes(previous: &str, current: &str) -> ChangeResult {
    ChangeDetector::new().detect(previous, current)
}
