//! Console status lines (stdout), coloured only on a terminal.

use std::io;

use is_terminal::IsTerminal;
use owo_colors::OwoColorize;

use crate::pipeline::RunSummary;

pub struct TextPrinter {
    pub color: bool,
}

impl Default for TextPrinter {
    fn default() -> Self {
        let color = std::env::var_os("NO_COLOR").is_none() && io::stdout().is_terminal();
        Self { color }
    }
}

impl TextPrinter {
    pub fn found(&self, count: usize) {
        println!("{}", self.found_line(count));
    }

    pub fn saved(&self, path: &std::path::Path) {
        println!("{}", self.saved_line(path));
    }

    pub fn summary(&self, summary: &RunSummary) {
        println!("{}", self.summary_line(summary));
    }

    fn found_line(&self, count: usize) -> String {
        let text = format!("Found {} questions.", count);
        if self.color { text.cyan().to_string() } else { text }
    }

    fn saved_line(&self, path: &std::path::Path) -> String {
        let text = format!("Document saved to {}", path.display());
        if self.color { text.green().to_string() } else { text }
    }

    fn summary_line(&self, s: &RunSummary) -> String {
        let ok = format!("{} executed successfully", s.succeeded);
        let failed = format!("{} failed", s.failed);
        if self.color {
            format!("{} questions, {}, {}", s.total, ok.green(), failed.yellow())
        } else {
            format!("{} questions, {}, {}", s.total, ok, failed)
        }
    }
}
