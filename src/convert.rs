// File: ./src/convert.rs
//
// The document walker. One pass over the body blocks in original order,
// driving classification, parsing and rendering. All running state lives in
// WalkState and is threaded through the per-block steps explicitly; nothing
// here survives a conversion call.

use crate::docx::{Block, DocxDocument, Paragraph, Table};
use crate::model::display;
use crate::model::parser::{
    self, LABEL_AGENDA, LABEL_ISSUE_FULLWIDTH, LABEL_ISSUE_HALFWIDTH, LABEL_NEW_AGENDA,
    NUMBERED_HEADING_RE,
};
use crate::model::TableKind;
use std::collections::HashSet;

/// Running state for one conversion pass.
#[derive(Debug, Default)]
struct WalkState {
    /// True until the preamble separator has been seen; everything before it
    /// already went into the metadata header.
    skipping_preamble: bool,
    /// Title from the most recent "課題: <title>" paragraph, waiting to be
    /// consumed by the next task table. Issue tables borrow it without
    /// consuming it; numbered headings drop it.
    current_issue: Option<String>,
    /// Body indices of tables already rendered, so a duplicate traversal can
    /// never emit a table twice.
    rendered_tables: HashSet<usize>,
}

/// Convert a parsed document into the Markdown output text.
pub fn convert_document(doc: &DocxDocument) -> String {
    let meta = parser::scan_metadata(doc.paragraphs());
    let mut out = display::render_header(&meta);

    let mut state = WalkState {
        skipping_preamble: true,
        ..Default::default()
    };

    for (index, block) in doc.body.iter().enumerate() {
        match block {
            Block::Paragraph(para) => step_paragraph(para, &mut state, &mut out),
            Block::Table(table) => step_table(table, index, &mut state, &mut out),
        }
    }

    out.join("\n")
}

fn step_paragraph(para: &Paragraph, state: &mut WalkState, out: &mut Vec<String>) {
    let text = para.text.trim();
    if text.is_empty() {
        return;
    }

    if state.skipping_preamble {
        // The preamble ends at a horizontal rule ("---" or the heavy line).
        if text.contains("---") || text.contains('━') {
            state.skipping_preamble = false;
        }
        return;
    }

    if text.contains(LABEL_ISSUE_HALFWIDTH) || text.contains(LABEL_ISSUE_FULLWIDTH) {
        // An issue declaration: remember the title for the tables that
        // follow, emit nothing here.
        let title = text
            .replace(LABEL_ISSUE_HALFWIDTH, "")
            .replace(LABEL_ISSUE_FULLWIDTH, "")
            .replace(['[', ']'], "")
            .trim()
            .to_string();
        state.current_issue = Some(title);
    } else if NUMBERED_HEADING_RE.is_match(text) {
        out.push(format!("\n## {text}\n"));
        // A new agenda section; any pending issue declaration is stale.
        state.current_issue = None;
    } else if text.contains(LABEL_NEW_AGENDA) || text.contains(LABEL_AGENDA) {
        out.push(format!("\n{text}\n"));
    } else {
        // Plain narrative text between the sections. The issue scope is left
        // alone: a declaration may be followed by free-form description
        // before its tables arrive.
        out.push(format!("{text}\n"));
    }
}

fn step_table(table: &Table, index: usize, state: &mut WalkState, out: &mut Vec<String>) {
    if state.skipping_preamble {
        return;
    }
    if !state.rendered_tables.insert(index) {
        return;
    }

    let table_text = table.plain_text();
    match parser::classify_table(&table_text) {
        TableKind::Progress => {
            out.push("\n".to_string());
            let updates = parser::parse_progress_table(table);
            log::debug!("progress table: {} update(s)", updates.len());
            for update in &updates {
                out.push(display::render_update(update));
            }
            out.push("---\n".to_string());
        }
        TableKind::Issue => {
            let item = parser::parse_tracker_table(table);
            let heading = state.current_issue.clone().unwrap_or_else(|| {
                if item.title.is_empty() {
                    "新規課題".to_string()
                } else {
                    item.title.clone()
                }
            });
            if item.has_issue_fields() {
                out.extend(display::render_issue(&item, &heading));
            }
            // Scope survives: a task table for this issue may still follow.
        }
        TableKind::Task => {
            let item = parser::parse_tracker_table(table);
            if !item.title.is_empty() {
                let as_child = state.current_issue.is_some();
                out.extend(display::render_task(&item, as_child));
                if as_child {
                    state.current_issue = None;
                }
            }
        }
        TableKind::Unrecognized => {
            log::debug!("skipping unrecognized table at body index {index}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::docx::Cell;

    fn para(text: &str) -> Block {
        Block::Paragraph(Paragraph {
            text: text.to_string(),
            style: None,
        })
    }

    fn table(rows: &[&[&str]]) -> Block {
        Block::Table(Table {
            rows: rows
                .iter()
                .map(|row| row.iter().map(|c| Cell::new(*c)).collect())
                .collect(),
        })
    }

    fn doc(body: Vec<Block>) -> DocxDocument {
        DocxDocument { body }
    }

    /// A minimal realistic document opening: title paragraph, then the rule
    /// that ends the preamble.
    fn preamble() -> Vec<Block> {
        vec![para("議事録"), para("---")]
    }

    fn doc_with_body(rest: Vec<Block>) -> DocxDocument {
        let mut body = preamble();
        body.extend(rest);
        doc(body)
    }

    #[test]
    fn test_empty_document_renders_title_and_rule_only() {
        let md = convert_document(&doc(vec![]));
        assert_eq!(md, "# 議事録\n\n---\n");
    }

    #[test]
    fn test_preamble_skipped_until_rule() {
        let md = convert_document(&doc(vec![
            para("議事録"),
            para("日時：2026-02-05"),
            para("---"),
            para("本文です"),
        ]));
        // Metadata lands in the header; the preamble paragraphs themselves
        // are not re-emitted in the body.
        assert!(md.starts_with("# 議事録\n"));
        assert!(md.contains("**日時**: 2026-02-05\n"));
        assert!(md.ends_with("本文です\n"));
        assert_eq!(md.matches("議事録").count(), 1);
    }

    #[test]
    fn test_issue_declaration_sets_scope_and_emits_nothing() {
        let md = convert_document(&doc_with_body(vec![para("課題：ログイン機能")]));
        assert_eq!(md, "# 議事録\n\n---\n");
    }

    #[test]
    fn test_issue_scope_borrowed_by_issue_then_consumed_by_task() {
        let md = convert_document(&doc_with_body(vec![
            para("課題： [ログイン機能]"),
            table(&[
                &["内容", "ログインが失敗する"],
                &["最新状況", "調査中"],
            ]),
            table(&[&["ToDo", "修正対応"], &["担当者", "田中"]]),
            // The task above consumed the scope, so this issue table must
            // fall back to the placeholder title.
            table(&[&["内容", "別件"], &["最新状況", "未着手"]]),
        ]));

        // The issue section uses the declared title, not the table's own.
        assert!(md.contains("### 課題: ログイン機能\n"));
        assert!(md.contains("**課題内容**: ログインが失敗する"));
        assert!(md.contains("**ToDo**: 修正対応"));
        assert!(md.contains("- 担当者: 田中"));
        assert!(md.contains("### 課題: 新規課題\n"));
    }

    #[test]
    fn test_issue_table_without_substance_is_silent() {
        let md = convert_document(&doc_with_body(vec![table(&[
            &["内容", ""],
            &["最新状況", ""],
            &["対応方針", ""],
        ])]));
        assert!(!md.contains("### 課題"));
    }

    #[test]
    fn test_issue_table_falls_back_to_own_title_then_placeholder() {
        let md = convert_document(&doc_with_body(vec![table(&[
            &["タイトル", "検索が遅い"],
            &["内容", "一覧表示に10秒かかる"],
            &["最新状況", "計測中"],
        ])]));
        assert!(md.contains("### 課題: 検索が遅い\n"));

        let md = convert_document(&doc_with_body(vec![table(&[
            &["内容", "説明のみ"],
            &["最新状況", "調査中"],
        ])]));
        assert!(md.contains("### 課題: 新規課題\n"));
    }

    #[test]
    fn test_numbered_heading_clears_scope() {
        let md = convert_document(&doc_with_body(vec![
            para("課題：ログイン機能"),
            para("2. 新規議題"),
            table(&[&["内容", "説明"], &["最新状況", "調査中"]]),
        ]));
        assert!(md.contains("\n## 2. 新規議題\n"));
        // Scope was cleared by the heading, so the issue table falls back.
        assert!(md.contains("### 課題: 新規課題\n"));
        assert!(!md.contains("### 課題: ログイン機能"));
    }

    #[test]
    fn test_agenda_paragraph_keeps_scope() {
        let md = convert_document(&doc_with_body(vec![
            para("課題：ログイン機能"),
            para("新規議題について"),
            table(&[&["内容", "説明"], &["最新状況", "調査中"]]),
        ]));
        assert!(md.contains("\n新規議題について\n"));
        // Agenda text does not clear the pending declaration.
        assert!(md.contains("### 課題: ログイン機能\n"));
    }

    #[test]
    fn test_plain_text_keeps_scope() {
        let md = convert_document(&doc_with_body(vec![
            para("課題：ログイン機能"),
            para("再現手順は添付の通り"),
            table(&[&["内容", "説明"], &["最新状況", "調査中"]]),
        ]));
        assert!(md.contains("再現手順は添付の通り\n"));
        assert!(md.contains("### 課題: ログイン機能\n"));
    }

    #[test]
    fn test_progress_table_renders_updates_and_rule() {
        let md = convert_document(&doc_with_body(vec![table(&[
            &["タスク名/ID", "変更事項", "変更内容"],
            &["設計/ISSUE-001", "最新状況", "完了しました"],
            &["実装/TODO-002", "完了", ""],
        ])]));
        assert!(md.contains("### 課題: 設計 [既存課題: ISSUE-001]"));
        assert!(md.contains("**最新状況**: 完了しました"));
        assert!(md.contains("**ToDo**: 実装 [既存ToDo: TODO-002を更新]"));
        assert!(md.contains("**完了**"));
        assert!(md.trim_end().ends_with("---"));
    }

    #[test]
    fn test_table_with_same_identity_rendered_once() {
        let progress = Table {
            rows: vec![
                vec![Cell::new("タスク名/ID"), Cell::new("変更事項"), Cell::new("変更内容")],
                vec![Cell::new("設計/TODO-001"), Cell::new("完了"), Cell::new("")],
            ],
        };
        let mut state = WalkState::default();
        let mut out = Vec::new();

        step_table(&progress, 7, &mut state, &mut out);
        let rendered = out.len();
        assert!(rendered > 0);

        // A second visit to the same body index emits nothing.
        step_table(&progress, 7, &mut state, &mut out);
        assert_eq!(out.len(), rendered);

        // A different index renders again.
        step_table(&progress, 8, &mut state, &mut out);
        assert!(out.len() > rendered);
    }

    #[test]
    fn test_unrecognized_table_is_ignored() {
        let md = convert_document(&doc_with_body(vec![table(&[
            &["ただの", "表"],
            &["データ", "です"],
        ])]));
        assert_eq!(md, "# 議事録\n\n---\n");
    }
}
