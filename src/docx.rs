// File: ./src/docx.rs
//
// Reader for .docx archives. A .docx file is a zip containing WordprocessingML;
// the document body lives in word/document.xml and paragraph style names are
// resolved through word/styles.xml.
//
// The reader is deliberately shallow: it yields the ordered sequence of
// top-level paragraphs and tables with plain text and bound-control values,
// which is all the conversion engine needs. Runs, formatting and revision
// marks are flattened away.

use anyhow::{Context, Result};
use std::collections::HashMap;
use std::fs;
use std::io::Read;
use std::path::Path;

const W_NS: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";

/// One top-level element of the document body, in original order.
#[derive(Debug, Clone)]
pub enum Block {
    Paragraph(Paragraph),
    Table(Table),
}

#[derive(Debug, Clone)]
pub struct Paragraph {
    /// Trimmed plain text of the paragraph (all runs concatenated).
    pub text: String,
    /// Resolved style name (e.g. "heading 4"), or the raw style id if
    /// styles.xml did not declare a name for it.
    pub style: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct Table {
    pub rows: Vec<Vec<Cell>>,
}

/// A table cell: plain run text plus the resolved values of any content
/// controls (w:sdt, e.g. dropdown selections) embedded in the cell.
#[derive(Debug, Clone, Default)]
pub struct Cell {
    pub text: String,
    pub control_values: Vec<String>,
}

impl Cell {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            control_values: Vec::new(),
        }
    }

    pub fn with_control(text: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            control_values: vec![value.into()],
        }
    }

    /// The text this cell effectively displays. Bound-control values take
    /// precedence over surrounding run text; multiple controls are joined by
    /// a single space. Always total: absent values yield "".
    pub fn effective_text(&self) -> String {
        if self.control_values.is_empty() {
            self.text.trim().to_string()
        } else {
            self.control_values.join(" ").trim().to_string()
        }
    }
}

impl Table {
    /// Full text of the table: every cell's raw text, row-major, space-joined.
    /// Used for classification and context checks.
    pub fn plain_text(&self) -> String {
        self.rows
            .iter()
            .flat_map(|row| row.iter())
            .map(|cell| cell.text.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[derive(Debug, Clone, Default)]
pub struct DocxDocument {
    pub body: Vec<Block>,
}

impl DocxDocument {
    /// Open and parse a .docx file.
    ///
    /// Fails when the file cannot be read, is not a zip archive, or its
    /// word/document.xml part is missing or malformed. styles.xml is optional;
    /// without it style ids are reported verbatim.
    pub fn open(path: &Path) -> Result<Self> {
        let file = fs::File::open(path)
            .with_context(|| format!("could not open document: {}", path.display()))?;
        let mut archive = zip::ZipArchive::new(file)
            .with_context(|| format!("not a valid .docx archive: {}", path.display()))?;

        let styles = match read_archive_part(&mut archive, "word/styles.xml") {
            Some(xml) => parse_style_names(&xml),
            None => HashMap::new(),
        };

        let xml = read_archive_part(&mut archive, "word/document.xml")
            .with_context(|| format!("word/document.xml missing from {}", path.display()))?;

        parse_document_xml(&xml, &styles)
            .with_context(|| format!("malformed document body in {}", path.display()))
    }

    /// Body paragraphs in document order (tables skipped).
    pub fn paragraphs(&self) -> impl Iterator<Item = &Paragraph> {
        self.body.iter().filter_map(|block| match block {
            Block::Paragraph(p) => Some(p),
            Block::Table(_) => None,
        })
    }
}

fn read_archive_part(
    archive: &mut zip::ZipArchive<fs::File>,
    name: &str,
) -> Option<String> {
    let mut entry = archive.by_name(name).ok()?;
    let mut content = String::new();
    entry.read_to_string(&mut content).ok()?;
    Some(content)
}

/// Build the styleId -> style name map from word/styles.xml.
/// Unparseable styles.xml degrades to an empty map rather than failing.
pub fn parse_style_names(xml: &str) -> HashMap<String, String> {
    let mut names = HashMap::new();
    let Ok(tree) = roxmltree::Document::parse(xml) else {
        return names;
    };
    for style in tree
        .descendants()
        .filter(|n| n.has_tag_name((W_NS, "style")))
    {
        let Some(id) = style.attribute((W_NS, "styleId")) else {
            continue;
        };
        if let Some(name) = style
            .children()
            .find(|n| n.has_tag_name((W_NS, "name")))
            .and_then(|n| n.attribute((W_NS, "val")))
        {
            names.insert(id.to_string(), name.to_string());
        }
    }
    names
}

/// Parse word/document.xml into the ordered block sequence.
pub fn parse_document_xml(
    xml: &str,
    styles: &HashMap<String, String>,
) -> Result<DocxDocument> {
    let tree = roxmltree::Document::parse(xml).context("invalid XML")?;
    let Some(body) = tree
        .root_element()
        .children()
        .find(|n| n.has_tag_name((W_NS, "body")))
    else {
        return Ok(DocxDocument::default());
    };

    let mut blocks = Vec::new();
    for child in body.children().filter(|n| n.is_element()) {
        match child.tag_name().name() {
            "p" => blocks.push(Block::Paragraph(parse_paragraph(&child, styles))),
            "tbl" => blocks.push(Block::Table(parse_table(&child))),
            _ => {} // sectPr and friends
        }
    }
    Ok(DocxDocument { body: blocks })
}

fn parse_paragraph(node: &roxmltree::Node, styles: &HashMap<String, String>) -> Paragraph {
    let mut text = String::new();
    for t in node
        .descendants()
        .filter(|n| n.has_tag_name((W_NS, "t")))
    {
        if let Some(run_text) = t.text() {
            text.push_str(run_text);
        }
    }

    let style = node
        .children()
        .find(|n| n.has_tag_name((W_NS, "pPr")))
        .and_then(|ppr| {
            ppr.children()
                .find(|n| n.has_tag_name((W_NS, "pStyle")))
        })
        .and_then(|s| s.attribute((W_NS, "val")))
        .map(|id| styles.get(id).cloned().unwrap_or_else(|| id.to_string()));

    Paragraph {
        text: text.trim().to_string(),
        style,
    }
}

fn parse_table(node: &roxmltree::Node) -> Table {
    let mut rows = Vec::new();
    for tr in node.children().filter(|n| n.has_tag_name((W_NS, "tr"))) {
        let mut cells = Vec::new();
        for tc in tr.children().filter(|n| n.has_tag_name((W_NS, "tc"))) {
            cells.push(parse_cell(&tc));
        }
        rows.push(cells);
    }
    Table { rows }
}

fn parse_cell(tc: &roxmltree::Node) -> Cell {
    // Plain text: per-paragraph run text, excluding anything nested inside a
    // content control. Paragraphs are joined by newlines like the cell would
    // display them.
    let mut paragraphs = Vec::new();
    for p in tc.children().filter(|n| n.has_tag_name((W_NS, "p"))) {
        let mut para_text = String::new();
        for t in p.descendants().filter(|n| n.has_tag_name((W_NS, "t"))) {
            if t.ancestors().any(|a| a.has_tag_name((W_NS, "sdt"))) {
                continue;
            }
            if let Some(run_text) = t.text() {
                para_text.push_str(run_text);
            }
        }
        paragraphs.push(para_text);
    }

    // One value per content control; empty controls are dropped so that a
    // cell with only blank controls falls back to its plain text.
    let mut control_values = Vec::new();
    for sdt in tc.descendants().filter(|n| n.has_tag_name((W_NS, "sdt"))) {
        let value = sdt
            .descendants()
            .filter(|n| n.has_tag_name((W_NS, "t")))
            .filter_map(|t| t.text())
            .collect::<Vec<_>>()
            .join(" ")
            .trim()
            .to_string();
        if !value.is_empty() {
            control_values.push(value);
        }
    }

    Cell {
        text: paragraphs.join("\n"),
        control_values,
    }
}
