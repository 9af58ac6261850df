//! Code block extraction from Markdown chapters.
//!
//! Fenced blocks become [`CodeBlock`]s carrying the classes a renderer would
//! emit: `language-<lang>` for the first info-string token and one class per
//! remaining token.

use pulldown_cmark::{CodeBlockKind, Event, Parser, Tag, TagEnd};

use crate::playground::CodeBlock;

/// Info-string tokens that keep a rust block off the playground.
const NON_PLAYGROUND_TAGS: [&str; 2] = ["noplayground", "ignore"];

/// Split an info string such as `rust,editable edition2021` into classes.
pub fn info_classes(info: &str) -> Vec<String> {
    let mut tokens = info
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|t| !t.is_empty());

    let mut classes = Vec::new();
    if let Some(language) = tokens.next() {
        classes.push(format!("language-{}", language));
    }
    classes.extend(tokens.map(str::to_string));
    classes
}

/// Strip boring-line markers (`# ` prefix or a bare `#`) from rust code.
///
/// Returns the cleaned text and the indices of boring lines.
pub fn strip_boring_lines(code: &str) -> (String, Vec<usize>) {
    let mut text = String::with_capacity(code.len());
    let mut boring = Vec::new();

    for (index, line) in code.split_inclusive('\n').enumerate() {
        let content = line.trim_end_matches(['\n', '\r']);
        let ending = &line[content.len()..];
        let trimmed = content.trim_start();

        if trimmed == "#" {
            boring.push(index);
            text.push_str(ending);
        } else if let Some(rest) = trimmed.strip_prefix("# ") {
            boring.push(index);
            text.push_str(rest);
            text.push_str(ending);
        } else {
            text.push_str(line);
        }
    }

    (text, boring)
}

fn build_block(info: &str, code: String) -> CodeBlock {
    let classes = info_classes(info);
    let is_rust = classes.first().map(String::as_str) == Some("language-rust");

    if !is_rust {
        return CodeBlock::new(code, classes);
    }

    let (text, boring) = strip_boring_lines(&code);
    let playground = !classes.iter().any(|c| NON_PLAYGROUND_TAGS.contains(&c.as_str()));
    let block = if playground {
        CodeBlock::playground(text, classes)
    } else {
        CodeBlock::new(text, classes)
    };
    block.with_boring_lines(boring)
}

/// Collect every fenced code block in document order.
pub fn extract_blocks(markdown: &str) -> Vec<CodeBlock> {
    let mut blocks = Vec::new();
    let mut current: Option<(String, String)> = None;

    for event in Parser::new(markdown) {
        match event {
            Event::Start(Tag::CodeBlock(CodeBlockKind::Fenced(info))) => {
                current = Some((info.to_string(), String::new()));
            }
            Event::Text(text) => {
                if let Some((_, code)) = current.as_mut() {
                    code.push_str(&text);
                }
            }
            Event::End(TagEnd::CodeBlock) => {
                if let Some((info, code)) = current.take() {
                    blocks.push(build_block(&info, code));
                }
            }
            _ => {}
        }
    }

    tracing::debug!(blocks = blocks.len(), "Extracted code blocks");
    blocks
}
