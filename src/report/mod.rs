//! Report document: a flat list of sections rendered to HTML or Markdown.

use std::{
    fs,
    path::{Path, PathBuf},
    str::FromStr,
};

use anyhow::{bail, Context, Result};

use crate::{extract, pipeline::SolutionRecord};

mod html;
mod markdown;

pub const REPORT_TITLE: &str = "C Programming Solutions";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    Html,
    Markdown,
}

impl ReportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ReportFormat::Html => "html",
            ReportFormat::Markdown => "md",
        }
    }
}

impl FromStr for ReportFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "html" | "htm" => Ok(ReportFormat::Html),
            "markdown" | "md" => Ok(ReportFormat::Markdown),
            other => bail!("Unsupported report format: {other} (expected html or markdown)"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportSection {
    Heading { level: u8, text: String },
    Paragraph(String),
    /// Source code, monospace; an untagged block is taken to be C.
    Code { language: Option<String>, code: String },
    /// Any other monospace text, e.g. a raw response with no code block.
    Preformatted(String),
    /// Program output, rendered with inverted colours.
    Output(String),
    PageBreak,
}

#[derive(Debug, Clone)]
pub struct Report {
    pub title: String,
    pub sections: Vec<ReportSection>,
}

impl Report {
    pub fn render(&self, format: ReportFormat) -> String {
        match format {
            ReportFormat::Html => html::render(self),
            ReportFormat::Markdown => markdown::render(self),
        }
    }
}

pub fn build_report(records: &[SolutionRecord]) -> Report {
    let mut sections = Vec::with_capacity(records.len() * 8);

    for record in records {
        sections.push(ReportSection::Heading {
            level: 1,
            text: format!("Question {}", record.question.index),
        });
        sections.push(ReportSection::Paragraph(record.question.text.clone()));

        sections.push(ReportSection::Heading { level: 2, text: "Solution".into() });
        let raw = record.solution.text();
        match extract::find_code_block(raw).filter(|_| record.solution.code().is_some()) {
            Some(block) => {
                let prose = extract::explanation(raw, &block);
                if !prose.is_empty() {
                    sections.push(ReportSection::Paragraph(prose));
                }
                sections.push(ReportSection::Paragraph("C Code:".into()));
                sections.push(ReportSection::Code { language: block.language, code: block.code });
            }
            None => sections.push(ReportSection::Preformatted(raw.to_string())),
        }

        sections.push(ReportSection::Heading { level: 2, text: "Output".into() });
        sections.push(ReportSection::Output(record.execution.message()));
        sections.push(ReportSection::PageBreak);
    }

    Report { title: REPORT_TITLE.to_string(), sections }
}

pub fn write_report(report: &Report, format: ReportFormat, path: &Path) -> Result<PathBuf> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {:?}", parent))?;
        }
    }

    fs::write(path, report.render(format))
        .with_context(|| format!("Failed to write report {:?}", path))?;

    Ok(path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        execution::RunError,
        pipeline::{Execution, Skip, Solution},
        questions::split_questions,
    };

    fn records() -> Vec<SolutionRecord> {
        let mut qs = split_questions("Print hello.\n\nAdd <two> & numbers.\n\nBroken one.");
        let third = qs.pop().unwrap();
        let second = qs.pop().unwrap();
        let first = qs.pop().unwrap();
        vec![
            SolutionRecord {
                question: first,
                solution: Solution::Generated {
                    raw_response: "Simple.\n```c\nint main(void) { puts(\"hello\"); }\n```".into(),
                    code: Some("int main(void) { puts(\"hello\"); }".into()),
                },
                execution: Execution::Ran(Ok("hello".into())),
            },
            SolutionRecord {
                question: second,
                solution: Solution::Failed,
                execution: Execution::NotAttempted(Skip::GenerationFailed),
            },
            SolutionRecord {
                question: third,
                solution: Solution::Generated {
                    raw_response: "```c\nint main( {\n```".into(),
                    code: Some("int main( {".into()),
                },
                execution: Execution::Ran(Err(RunError::CompileFailed {
                    diagnostics: "error: expected ')'".into(),
                })),
            },
        ]
    }

    #[test]
    fn one_block_of_sections_per_record() {
        let report = build_report(&records());
        let headings: Vec<&str> = report
            .sections
            .iter()
            .filter_map(|s| match s {
                ReportSection::Heading { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(
            headings,
            vec![
                "Question 1", "Solution", "Output",
                "Question 2", "Solution", "Output",
                "Question 3", "Solution", "Output",
            ]
        );
        let breaks = report.sections.iter().filter(|s| **s == ReportSection::PageBreak).count();
        assert_eq!(breaks, 3);
    }

    #[test]
    fn code_and_prose_are_separated() {
        let report = build_report(&records()[..1]);
        assert!(report.sections.contains(&ReportSection::Paragraph("Simple.".into())));
        assert!(report.sections.contains(&ReportSection::Paragraph("C Code:".into())));
        assert!(report.sections.contains(&ReportSection::Code {
            language: Some("c".into()),
            code: "int main(void) { puts(\"hello\"); }".into(),
        }));
        assert!(report.sections.contains(&ReportSection::Output("hello".into())));
    }

    #[test]
    fn fallback_block_keeps_its_language_tag() {
        let mut record = records().remove(0);
        record.solution = Solution::Generated {
            raw_response: "Close enough.\n```cpp\nint main() {}\n```".into(),
            code: Some("int main() {}".into()),
        };
        let report = build_report(std::slice::from_ref(&record));
        assert!(report.sections.contains(&ReportSection::Code {
            language: Some("cpp".into()),
            code: "int main() {}".into(),
        }));
        assert!(report
            .render(ReportFormat::Html)
            .contains("<code class=\"language-cpp\">int main() {}</code>"));
        assert!(report.render(ReportFormat::Markdown).contains("```cpp\nint main() {}\n```"));
    }

    #[test]
    fn failed_generation_shows_sentinels() {
        let report = build_report(&records()[1..2]);
        assert!(report
            .sections
            .contains(&ReportSection::Preformatted("Failed to generate solution.".into())));
        assert!(report.sections.contains(&ReportSection::Output("N/A".into())));
    }

    #[test]
    fn compile_failure_output_keeps_diagnostics() {
        let report = build_report(&records()[2..]);
        assert!(report
            .sections
            .contains(&ReportSection::Output("Compilation failed:\nerror: expected ')'".into())));
    }

    #[test]
    fn html_escapes_and_paginates() {
        let html = build_report(&records()).render(ReportFormat::Html);
        assert_eq!(html.matches("<section class=\"record\">").count(), 3);
        assert_eq!(html.matches("class=\"page-break\"").count(), 3);
        assert!(html.contains("Add &lt;two&gt; &amp; numbers."));
        assert!(html.contains("<pre class=\"output\">hello</pre>"));
        let q1 = html.find("Question 1").unwrap();
        let q2 = html.find("Question 2").unwrap();
        assert!(q1 < q2);
    }

    #[test]
    fn markdown_uses_fences_and_page_breaks() {
        let md = build_report(&records()).render(ReportFormat::Markdown);
        assert!(md.starts_with("# C Programming Solutions\n"));
        assert!(md.contains("```c\nint main(void) { puts(\"hello\"); }\n```"));
        assert!(md.contains("```text\nhello\n```"));
        assert_eq!(md.matches("\\pagebreak").count(), 3);
    }

    #[test]
    fn format_parsing() {
        assert_eq!("HTML".parse::<ReportFormat>().unwrap(), ReportFormat::Html);
        assert_eq!("md".parse::<ReportFormat>().unwrap(), ReportFormat::Markdown);
        assert!("docx".parse::<ReportFormat>().is_err());
    }

    #[test]
    fn write_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out").join("report.md");
        let report = build_report(&records());
        let written = write_report(&report, ReportFormat::Markdown, &path).unwrap();
        assert_eq!(written, path);
        assert!(std::fs::read_to_string(&path).unwrap().contains("## Output"));
    }
}
