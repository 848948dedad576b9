//! Question loading: blank-line separated blocks with optional `#stdin:` lines.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use thiserror::Error;

const STDIN_DIRECTIVE: &str = "#stdin:";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    /// 1-based position in the input.
    pub index: usize,
    pub text: String,
    /// Simulated input for this question; falls back to the runner default.
    pub stdin: Option<String>,
}

#[derive(Debug, Error)]
pub enum QuestionFileError {
    #[error("File not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("Failed to read file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl Question {
    /// First `max_chars` characters of the text, with `...` when cut.
    pub fn preview(&self, max_chars: usize) -> String {
        match self.text.char_indices().nth(max_chars) {
            Some((end, _)) => format!("{}...", &self.text[..end]),
            None => self.text.clone(),
        }
    }
}

pub fn load_questions(path: &Path) -> Result<Vec<Question>, QuestionFileError> {
    if !path.is_file() {
        return Err(QuestionFileError::NotFound(path.to_path_buf()));
    }
    let content = fs::read_to_string(path).map_err(|source| QuestionFileError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(split_questions(&content))
}

pub fn split_questions(content: &str) -> Vec<Question> {
    let mut segments: Vec<Vec<&str>> = Vec::new();
    let mut current: Vec<&str> = Vec::new();

    for line in content.lines() {
        if line.trim().is_empty() {
            if !current.is_empty() {
                segments.push(std::mem::take(&mut current));
            }
        } else {
            current.push(line);
        }
    }
    if !current.is_empty() {
        segments.push(current);
    }

    segments
        .into_iter()
        .map(|lines| parse_segment(&lines))
        .enumerate()
        .map(|(i, (text, stdin))| Question { index: i + 1, text, stdin })
        .collect()
}

/// A segment made only of directives is a question in its own right and keeps its text.
fn parse_segment(lines: &[&str]) -> (String, Option<String>) {
    let mut body = Vec::with_capacity(lines.len());
    let mut input: Vec<&str> = Vec::new();

    for line in lines {
        match line.trim_start().strip_prefix(STDIN_DIRECTIVE) {
            Some(rest) => input.push(rest.strip_prefix(' ').unwrap_or(rest)),
            None => body.push(*line),
        }
    }

    let text = body.join("\n").trim().to_string();
    if text.is_empty() {
        return (lines.join("\n").trim().to_string(), None);
    }
    let stdin = (!input.is_empty()).then(|| {
        let mut s = input.join("\n");
        s.push('\n');
        s
    });
    (text, stdin)
}
