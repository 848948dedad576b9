use super::{Report, ReportSection};

pub(super) fn render(report: &Report) -> String {
    let mut output = String::new();
    output.push_str(&format!("# {}\n\n", report.title));

    for section in &report.sections {
        match section {
            ReportSection::Heading { level, text } => {
                let prefix = "#".repeat((*level as usize + 1).min(6));
                output.push_str(&format!("{} {}\n\n", prefix, text));
            }
            ReportSection::Paragraph(text) => {
                output.push_str(&format!("{}\n\n", text));
            }
            ReportSection::Code { language, code } => {
                push_fenced(&mut output, language.as_deref().unwrap_or("c"), code)
            }
            ReportSection::Preformatted(text) => push_fenced(&mut output, "", text),
            ReportSection::Output(text) => push_fenced(&mut output, "text", text),
            ReportSection::PageBreak => {
                output.push_str("\\pagebreak\n\n---\n\n");
            }
        }
    }

    output
}

fn push_fenced(output: &mut String, lang: &str, body: &str) {
    let fence = "`".repeat(longest_backtick_run(body).max(2) + 1);
    output.push_str(&format!("{fence}{lang}\n{body}\n{fence}\n\n"));
}

fn longest_backtick_run(text: &str) -> usize {
    let mut longest = 0;
    let mut run = 0;
    for c in text.chars() {
        if c == '`' {
            run += 1;
            longest = longest.max(run);
        } else {
            run = 0;
        }
    }
    longest
}
