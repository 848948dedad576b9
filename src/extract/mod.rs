//! Fenced code block extraction from model responses.

use std::{ops::Range, sync::OnceLock};

use regex::Regex;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeBlock {
    pub language: Option<String>,
    pub code: String,
    /// Byte range of the whole fenced block (fences included) in the source text.
    pub span: Range<usize>,
}

fn fence_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // opening fence, optional tag up to end of line, lazy body, closing fence
    RE.get_or_init(|| Regex::new(r"(?s)```([^\n`]*)\n(.*?)```").expect("valid fence regex"))
}

/// First block tagged `c`, else the first block of any language.
pub fn find_code_block(text: &str) -> Option<CodeBlock> {
    let mut first: Option<CodeBlock> = None;

    for caps in fence_re().captures_iter(text) {
        let (Some(whole), Some(tag), Some(body)) = (caps.get(0), caps.get(1), caps.get(2)) else {
            continue;
        };
        let tag = tag.as_str().trim();
        let block = CodeBlock {
            language: (!tag.is_empty()).then(|| tag.to_string()),
            code: body.as_str().trim().to_string(),
            span: whole.range(),
        };
        if tag.eq_ignore_ascii_case("c") {
            return Some(block);
        }
        if first.is_none() {
            first = Some(block);
        }
    }

    first
}

pub fn extract_code(text: &str) -> Option<String> {
    find_code_block(text).map(|b| b.code)
}

/// The response with the chosen block cut out.
pub fn explanation(text: &str, block: &CodeBlock) -> String {
    let mut rest = String::with_capacity(text.len());
    rest.push_str(&text[..block.span.start]);
    rest.push_str(&text[block.span.end..]);
    rest.trim().to_string()
}
