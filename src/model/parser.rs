// File: ./src/model/parser.rs
//
// Parsing of document paragraphs and tables into the record types.
//
// Table classification and key-value field extraction are driven by
// declarative rule tables (CLASSIFY_RULES / FIELD_RULES) rather than branch
// chains, so the priority ordering is visible as data and testable on its
// own. Every function here is total: unusable rows and unmatched labels
// degrade to defaults instead of failing.

use crate::docx::{Paragraph, Table};
use crate::model::item::{ActionKind, Metadata, TableKind, TaskUpdate, TrackerItem};
use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;

// --- LABEL VOCABULARY ---

pub const LABEL_PROJECT: &str = "プロジェクト";
pub const LABEL_MINUTES: &str = "議事録";
pub const LABEL_DATE: &str = "日時";
pub const LABEL_LOCATION: &str = "場所";
pub const LABEL_PARTICIPANTS: &str = "参加者";
pub const LABEL_TASK_NAME: &str = "タスク名";
pub const LABEL_CHANGE: &str = "変更";
pub const LABEL_CONTENT: &str = "内容";
pub const LABEL_ISSUE_CONTENT: &str = "課題内容";
pub const LABEL_LATEST_STATUS: &str = "最新状況";
pub const LABEL_STRATEGY: &str = "対応方針";
pub const LABEL_TODO: &str = "ToDo";
pub const LABEL_ASSIGNEE: &str = "担当";
pub const LABEL_TITLE: &str = "タイトル";
pub const LABEL_DEADLINE: &str = "期限";
pub const LABEL_DUE: &str = "期日";
pub const LABEL_JUDGMENT: &str = "判定";
pub const LABEL_ISSUE_HALFWIDTH: &str = "課題:";
pub const LABEL_ISSUE_FULLWIDTH: &str = "課題：";
pub const LABEL_NEW_AGENDA: &str = "新規議題";
pub const LABEL_AGENDA: &str = "議題";

/// Tracked-item ids: TODO-nnn, ISSUE-nnn, NEW-ISSUE-nnn. NEW-ISSUE must be
/// matched from its own start or the embedded ISSUE-nnn would win.
static TASK_ID_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(TODO-\d+|ISSUE-\d+|NEW-ISSUE-\d+)").unwrap());

static DATE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d{4}[-/]\d{2}[-/]\d{2}").unwrap());

/// Captures the run of non-whitespace following the assignee label.
static ASSIGNEE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"担当者?[:：\s]*(\S+)").unwrap());

static PROJECT_NAME_LABEL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"プロジェクト名\s*[：:;；]\s*").unwrap());

pub static NUMBERED_HEADING_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d+\.\s+").unwrap());

/// Remove the first occurrence of `label` plus the colon-like punctuation
/// adjoining it. Interior colons (e.g. in times) survive.
fn strip_label(text: &str, label: &str) -> String {
    let without = match text.find(label) {
        Some(idx) => format!("{}{}", &text[..idx], &text[idx + label.len()..]),
        None => text.to_string(),
    };
    without
        .trim_matches(|c: char| c.is_whitespace() || matches!(c, ':' | '：' | ';' | '；'))
        .to_string()
}

/// Metadata field values additionally drop every colon, half or full width,
/// so a time like 10:00 is recorded as 1000.
fn strip_label_value(text: &str, label: &str) -> String {
    strip_label(text, label)
        .replace([':', '：'], "")
        .trim()
        .to_string()
}

// --- METADATA ---

/// Number of leading paragraphs inspected for metadata.
const METADATA_SCAN_LIMIT: usize = 10;

/// Scan the document's leading paragraphs for meeting metadata.
///
/// A Heading-4 paragraph mentioning the project sets only the project name.
/// The other checks are independent substring matches, so one paragraph may
/// fill several fields.
pub fn scan_metadata<'a, I>(paragraphs: I) -> Metadata
where
    I: IntoIterator<Item = &'a Paragraph>,
{
    let mut meta = Metadata::default();
    let mut title_set = false;

    for para in paragraphs.into_iter().take(METADATA_SCAN_LIMIT) {
        let text = para.text.trim();
        if text.is_empty() {
            continue;
        }

        let is_heading4 = para
            .style
            .as_deref()
            .is_some_and(|s| s.to_lowercase().contains("heading 4"));
        if is_heading4 && text.contains(LABEL_PROJECT) {
            meta.project_name = PROJECT_NAME_LABEL_RE.replace(text, "").trim().to_string();
            continue;
        }

        // The first scanned paragraph claims the title; after that only a
        // paragraph naming the minutes themselves may replace it.
        if !title_set || text.contains(LABEL_MINUTES) {
            meta.title = text.to_string();
            title_set = true;
        }
        if text.contains(LABEL_DATE) {
            meta.date = strip_label_value(text, LABEL_DATE);
        }
        if text.contains(LABEL_LOCATION) {
            meta.location = strip_label_value(text, LABEL_LOCATION);
        }
        if text.contains(LABEL_PARTICIPANTS) {
            meta.participants = strip_label_value(text, LABEL_PARTICIPANTS);
        }
    }

    meta
}

// --- TABLE CLASSIFICATION ---

/// One classification rule: the table text must contain at least one label
/// from every group. Rules are checked in declaration order, so earlier
/// shapes take precedence when a table mixes label families.
struct ClassifyRule {
    kind: TableKind,
    requires: &'static [&'static [&'static str]],
}

const CLASSIFY_RULES: &[ClassifyRule] = &[
    ClassifyRule {
        kind: TableKind::Progress,
        requires: &[&[LABEL_TASK_NAME], &[LABEL_CHANGE]],
    },
    ClassifyRule {
        kind: TableKind::Issue,
        requires: &[
            &[LABEL_CONTENT, LABEL_ISSUE_CONTENT],
            &[LABEL_LATEST_STATUS, LABEL_STRATEGY],
        ],
    },
    ClassifyRule {
        kind: TableKind::Task,
        requires: &[&[LABEL_TODO], &[LABEL_ASSIGNEE]],
    },
];

/// Assign a table its semantic role from its concatenated text.
pub fn classify_table(table_text: &str) -> TableKind {
    for rule in CLASSIFY_RULES {
        if rule
            .requires
            .iter()
            .all(|group| group.iter().any(|label| table_text.contains(label)))
        {
            return rule.kind;
        }
    }
    TableKind::Unrecognized
}

// --- PROGRESS TABLES ---

/// Decompose a progress table into one update per qualifying data row.
///
/// Row 0 is always the header. A data row needs at least three cells and a
/// first cell of the form "name/ID" with a recognized id; everything else is
/// skipped silently.
pub fn parse_progress_table(table: &Table) -> Vec<TaskUpdate> {
    let mut updates = Vec::new();

    for row in table.rows.iter().skip(1) {
        if row.len() < 3 {
            continue;
        }

        let cell0 = row[0].effective_text();
        let Some((name_half, id_half)) = cell0.split_once('/') else {
            continue;
        };
        let Some(id_match) = TASK_ID_RE.find(id_half) else {
            continue;
        };
        let task_id = id_match.as_str().to_string();

        let mut task_name = name_half.trim().to_string();
        if task_name.is_empty() {
            task_name = format!("タスク {task_id}");
        }

        let action_text = row[1].effective_text();
        let action = if action_text.is_empty() {
            ActionKind::LatestStatus
        } else {
            action_text
                .parse()
                .unwrap_or_else(|_| ActionKind::Other(action_text.clone()))
        };

        updates.push(TaskUpdate {
            task_name,
            task_id,
            action,
            content: row[2].effective_text(),
        });
    }

    updates
}

// --- KEY-VALUE TABLES ---

#[derive(Debug, Clone, Copy)]
enum RowPredicate {
    /// First cell contains any of these labels.
    CellZeroContains(&'static [&'static str]),
    /// First cell is exactly this label.
    CellZeroEquals(&'static str),
    /// The whole row's text contains any of these labels.
    RowTextContains(&'static [&'static str]),
}

impl RowPredicate {
    fn matches(&self, cell0: &str, row_text: &str) -> bool {
        match self {
            RowPredicate::CellZeroContains(labels) => {
                labels.iter().any(|l| cell0.contains(l))
            }
            RowPredicate::CellZeroEquals(label) => cell0 == *label,
            RowPredicate::RowTextContains(labels) => {
                labels.iter().any(|l| row_text.contains(l))
            }
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum FieldTarget {
    Title,
    Assignee,
    DueDate,
    IssueContent,
    /// Bare "内容": issue description or task body depending on the table.
    ContextualContent,
    LatestStatus,
    Strategy,
    Target,
}

struct FieldRule {
    when: RowPredicate,
    field: FieldTarget,
}

/// The key-value extraction rules, evaluated per row in this order. Rules are
/// independent: a row may feed several fields, and later rows overwrite
/// earlier writes to the same field.
const FIELD_RULES: &[FieldRule] = &[
    FieldRule {
        when: RowPredicate::CellZeroContains(&[LABEL_TODO, LABEL_TITLE]),
        field: FieldTarget::Title,
    },
    FieldRule {
        when: RowPredicate::RowTextContains(&[LABEL_ASSIGNEE]),
        field: FieldTarget::Assignee,
    },
    FieldRule {
        when: RowPredicate::RowTextContains(&[LABEL_DEADLINE, LABEL_DUE]),
        field: FieldTarget::DueDate,
    },
    FieldRule {
        when: RowPredicate::CellZeroContains(&[LABEL_ISSUE_CONTENT]),
        field: FieldTarget::IssueContent,
    },
    FieldRule {
        when: RowPredicate::CellZeroEquals(LABEL_CONTENT),
        field: FieldTarget::ContextualContent,
    },
    FieldRule {
        when: RowPredicate::CellZeroContains(&[LABEL_LATEST_STATUS]),
        field: FieldTarget::LatestStatus,
    },
    FieldRule {
        when: RowPredicate::CellZeroContains(&[LABEL_STRATEGY]),
        field: FieldTarget::Strategy,
    },
    FieldRule {
        when: RowPredicate::CellZeroContains(&[LABEL_JUDGMENT]),
        field: FieldTarget::Target,
    },
];

/// Whether the table as a whole reads as an issue description. Used to route
/// the bare "内容" label, which appears in both shapes.
fn table_reads_as_issue(table_text: &str) -> bool {
    table_text.contains(LABEL_ISSUE_CONTENT)
        || table_text.contains(LABEL_STRATEGY)
        || table_text.contains(LABEL_LATEST_STATUS)
}

fn table_reads_as_task(table_text: &str) -> bool {
    table_text.contains(LABEL_TODO) && table_text.contains(LABEL_ASSIGNEE)
}

/// Build a tracker item by scanning every row of an issue- or task-shaped
/// table against FIELD_RULES.
///
/// Label matching runs on raw cell text, not resolved control values: the
/// labels live in plain header cells, and control-backed value cells are
/// handled where the value itself is read.
pub fn parse_tracker_table(table: &Table) -> TrackerItem {
    let table_text = table.plain_text();
    let mut item = TrackerItem::default();

    for row in &table.rows {
        if row.len() < 2 {
            continue;
        }

        let row_text = row
            .iter()
            .map(|c| c.text.trim())
            .collect::<Vec<_>>()
            .join(" ");
        let cell0 = row[0].text.trim();
        let cell1 = row[1].text.trim();
        let cell2 = row.get(2).map(|c| c.text.trim()).unwrap_or("");
        // Value cells prefer column 1, falling back to column 2 (merged-cell
        // layouts put the value there).
        let value = if !cell1.is_empty() { cell1 } else { cell2 };

        for rule in FIELD_RULES {
            if !rule.when.matches(cell0, &row_text) {
                continue;
            }
            match rule.field {
                FieldTarget::Title => item.title = value.to_string(),
                FieldTarget::Assignee => {
                    if let Some(caps) = ASSIGNEE_RE.captures(&row_text) {
                        item.assignee = caps[1].to_string();
                    }
                }
                FieldTarget::DueDate => {
                    if let Some(date) = extract_due_date(&row_text) {
                        item.due_date = date;
                    }
                }
                FieldTarget::IssueContent => item.issue_content = value.to_string(),
                FieldTarget::ContextualContent => {
                    if table_reads_as_issue(&table_text) {
                        item.issue_content = value.to_string();
                    } else if table_reads_as_task(&table_text) {
                        item.content = value.to_string();
                    }
                }
                FieldTarget::LatestStatus => item.latest_status = value.to_string(),
                FieldTarget::Strategy => item.strategy = value.to_string(),
                FieldTarget::Target => item.target = value.to_string(),
            }
        }
    }

    item
}

/// First date-shaped substring that is also a real calendar date.
/// Impossible dates (month 13 and friends) are treated as absent.
fn extract_due_date(text: &str) -> Option<String> {
    let matched = DATE_RE.find(text)?.as_str();
    let normalized = matched.replace('/', "-");
    NaiveDate::parse_from_str(&normalized, "%Y-%m-%d").ok()?;
    Some(matched.to_string())
}
