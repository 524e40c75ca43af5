// File: ./src/model/display.rs
//
// Markdown rendering for the record types. Every function is a pure
// formatter returning output fragments; each fragment ends with a newline and
// the final document joins fragments with "\n", which produces the blank
// lines between sections.

use crate::model::item::{ActionKind, Metadata, TaskUpdate, TrackerItem};

/// Header fragments: optional project block, title, metadata lines, rule.
pub fn render_header(meta: &Metadata) -> Vec<String> {
    let mut out = Vec::new();

    if !meta.project_name.is_empty() {
        out.push("# プロジェクト情報\n".to_string());
        out.push(format!("- プロジェクト名: {}\n", meta.project_name));
        out.push("\n".to_string());
    }

    out.push(format!("# {}\n", meta.title));

    if !meta.date.is_empty() {
        out.push(format!("**日時**: {}\n", meta.date));
    }
    if !meta.location.is_empty() {
        out.push(format!("**場所**: {}\n", meta.location));
    }
    if !meta.participants.is_empty() {
        out.push(format!("**参加者**: {}\n", meta.participants));
    }

    out.push("---\n".to_string());
    out
}

/// Render one progress update as a single fragment: a heading line keyed by
/// the id family, the action line, and a trailing blank line.
pub fn render_update(update: &TaskUpdate) -> String {
    let heading = if update.is_issue() {
        format!(
            "### 課題: {} [既存課題: {}]",
            update.task_name, update.task_id
        )
    } else if update.is_todo() {
        format!(
            "**ToDo**: {} [既存ToDo: {}を更新]",
            update.task_name, update.task_id
        )
    } else {
        format!("### {}", update.task_name)
    };

    format!("{}\n{}\n\n", heading, render_action_line(update))
}

fn render_action_line(update: &TaskUpdate) -> String {
    match &update.action {
        // Terminal states never carry content.
        ActionKind::Done => "**完了**".to_string(),
        ActionKind::Cancelled => "**中止**".to_string(),
        action => format!("**{}**: {}", action, update.content.trim()),
    }
}

/// Render an issue section. Title resolution (in-scope declaration vs. the
/// item's own title) is the walker's job; this just formats.
pub fn render_issue(item: &TrackerItem, heading_title: &str) -> Vec<String> {
    let mut out = Vec::new();
    out.push(format!("\n### 課題: {heading_title}\n"));

    for (label, value) in [
        ("課題内容", &item.issue_content),
        ("最新状況", &item.latest_status),
        ("対応方針", &item.strategy),
        ("担当者", &item.assignee),
        ("期限", &item.due_date),
    ] {
        if !value.is_empty() {
            out.push(format!("**{label}**: {value}\n"));
        }
    }

    out.push("\n".to_string());
    out
}

/// Render a task block. As a child of an in-scope issue the heading starts
/// flush (the issue section already opened the block); standalone tasks get
/// a separating blank line. Items without a title render nothing.
pub fn render_task(item: &TrackerItem, as_child: bool) -> Vec<String> {
    if item.title.is_empty() {
        return Vec::new();
    }

    let mut out = Vec::new();
    if as_child {
        out.push(format!("**ToDo**: {}\n", item.title));
    } else {
        out.push(format!("\n**ToDo**: {}\n", item.title));
    }

    out.push(format!("- 担当者: {}\n", item.assignee));
    if !item.due_date.is_empty() {
        out.push(format!("- 期日: {}\n", item.due_date));
    }
    if !item.content.is_empty() {
        out.push(format!("- 内容: {}\n", item.content));
    }
    if !item.target.is_empty() {
        out.push(format!("- 判定対象: {}\n", item.target));
    }

    out.push("\n".to_string());
    out
}
