use super::{Report, ReportSection};

const STYLE: &str = "body { font-family: system-ui, sans-serif; max-width: 800px; margin: 0 auto; padding: 2rem; }
    p { white-space: pre-wrap; }
    pre { font-family: ui-monospace, Consolas, monospace; background: #f4f4f4; padding: 0.75rem; overflow-x: auto; }
    pre.output { background: #111; color: #f4f4f4; }
    .page-break { break-after: page; page-break-after: always; }";

pub(super) fn render(report: &Report) -> String {
    let mut html = String::new();
    html.push_str("<!DOCTYPE html>\n<html>\n<head>\n");
    html.push_str(&format!("  <title>{}</title>\n", escape(&report.title)));
    html.push_str("  <meta charset=\"utf-8\">\n");
    html.push_str(&format!("  <style>\n    {}\n  </style>\n", STYLE));
    html.push_str("</head>\n<body>\n");
    html.push_str(&format!("  <h1>{}</h1>\n", escape(&report.title)));

    let mut in_record = false;
    for section in &report.sections {
        match section {
            ReportSection::Heading { level: 1, text } => {
                if in_record {
                    html.push_str("  </section>\n");
                }
                html.push_str("  <section class=\"record\">\n");
                in_record = true;
                html.push_str(&format!("    <h2>{}</h2>\n", escape(text)));
            }
            ReportSection::Heading { level, text } => {
                // the document title owns <h1>
                let tag = (level + 1).min(6);
                html.push_str(&format!("    <h{tag}>{}</h{tag}>\n", escape(text)));
            }
            ReportSection::Paragraph(text) => {
                html.push_str(&format!("    <p>{}</p>\n", escape(text)));
            }
            ReportSection::Code { language, code } => {
                html.push_str(&format!(
                    "    <pre><code class=\"language-{}\">{}</code></pre>\n",
                    escape(&language.as_deref().unwrap_or("c").to_ascii_lowercase()),
                    escape(code)
                ));
            }
            ReportSection::Preformatted(text) => {
                html.push_str(&format!("    <pre>{}</pre>\n", escape(text)));
            }
            ReportSection::Output(text) => {
                html.push_str(&format!("    <pre class=\"output\">{}</pre>\n", escape(text)));
            }
            ReportSection::PageBreak => {
                html.push_str("    <div class=\"page-break\"></div>\n");
                if in_record {
                    html.push_str("  </section>\n");
                    in_record = false;
                }
            }
        }
    }
    if in_record {
        html.push_str("  </section>\n");
    }

    html.push_str("</body>\n</html>\n");
    html
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
