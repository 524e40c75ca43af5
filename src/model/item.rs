// File: ./src/model/item.rs
use strum::{Display, EnumString};

/// Placeholder title used until the metadata scan finds a better one.
pub const DEFAULT_TITLE: &str = "議事録";

/// Meeting metadata gathered from the first paragraphs of the document.
/// Computed once before any body rendering and immutable afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Metadata {
    pub title: String,
    pub date: String,
    pub location: String,
    pub participants: String,
    pub project_name: String,
}

impl Default for Metadata {
    fn default() -> Self {
        Self {
            title: DEFAULT_TITLE.to_string(),
            date: String::new(),
            location: String::new(),
            participants: String::new(),
            project_name: String::new(),
        }
    }
}

/// The change kind reported in a progress-table row.
///
/// The canonical kinds carry fixed Japanese renderings; anything else is kept
/// verbatim in `Other` and rendered as a raw bold label. "期限" and "期日"
/// both parse as `DueDate`, which always renders "期日".
#[derive(Debug, Clone, PartialEq, Eq, Display, EnumString)]
pub enum ActionKind {
    #[strum(serialize = "最新状況")]
    LatestStatus,
    #[strum(serialize = "対応方針")]
    Strategy,
    #[strum(serialize = "期限", serialize = "期日", to_string = "期日")]
    DueDate,
    #[strum(serialize = "完了")]
    Done,
    #[strum(serialize = "中止")]
    Cancelled,
    #[strum(default, to_string = "{0}")]
    Other(String),
}

/// One status change against an existing tracked item, parsed from a
/// progress-table data row. Only rows whose first cell carries a recognized
/// task id produce an update, so `task_id` is never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskUpdate {
    pub task_name: String,
    pub task_id: String,
    pub action: ActionKind,
    pub content: String,
}

impl TaskUpdate {
    pub fn is_issue(&self) -> bool {
        self.task_id.contains("ISSUE")
    }

    pub fn is_todo(&self) -> bool {
        self.task_id.contains("TODO")
    }
}

/// A new tracked item described by an issue- or task-shaped table.
///
/// The same record type backs both shapes because the tables share most of
/// their label vocabulary; the renderer picks the fields relevant to each.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrackerItem {
    pub title: String,
    pub assignee: String,
    pub due_date: String,
    /// Task body text ("内容" in a ToDo-shaped table).
    pub content: String,
    /// Acceptance target ("判定対象").
    pub target: String,
    /// Issue description ("課題内容", or bare "内容" in an issue-shaped table).
    pub issue_content: String,
    pub latest_status: String,
    pub strategy: String,
}

impl TrackerItem {
    /// Whether the item carries enough issue substance to be worth a section.
    pub fn has_issue_fields(&self) -> bool {
        !self.issue_content.is_empty()
            || !self.latest_status.is_empty()
            || !self.strategy.is_empty()
    }
}

/// Semantic role of a body table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableKind {
    Progress,
    Issue,
    Task,
    Unrecognized,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_kind_parses_canonical_labels() {
        assert_eq!("最新状況".parse::<ActionKind>().unwrap(), ActionKind::LatestStatus);
        assert_eq!("対応方針".parse::<ActionKind>().unwrap(), ActionKind::Strategy);
        assert_eq!("完了".parse::<ActionKind>().unwrap(), ActionKind::Done);
        assert_eq!("中止".parse::<ActionKind>().unwrap(), ActionKind::Cancelled);
    }

    #[test]
    fn test_deadline_aliases_collapse_to_due_date() {
        assert_eq!("期限".parse::<ActionKind>().unwrap(), ActionKind::DueDate);
        assert_eq!("期日".parse::<ActionKind>().unwrap(), ActionKind::DueDate);
        assert_eq!(ActionKind::DueDate.to_string(), "期日");
    }

    #[test]
    fn test_unrecognized_literal_kept_verbatim() {
        let kind = "保留".parse::<ActionKind>().unwrap();
        assert_eq!(kind, ActionKind::Other("保留".to_string()));
        assert_eq!(kind.to_string(), "保留");
    }

    #[test]
    fn test_update_id_family() {
        let base = TaskUpdate {
            task_name: "設計".to_string(),
            task_id: "NEW-ISSUE-003".to_string(),
            action: ActionKind::LatestStatus,
            content: String::new(),
        };
        assert!(base.is_issue());
        assert!(!base.is_todo());
    }
}
