use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug, Clone)]
#[command(
    name = "solvedoc",
    about = "Generate, compile and document solutions to C programming questions",
    version
)]
pub struct Cli {
    /// Text file of questions separated by blank lines.
    #[arg(value_name = "QUESTIONS_FILE")]
    pub questions: PathBuf,

    /// Large language model to use.
    #[arg(long)]
    pub model: Option<String>,

    /// Randomness of generated output.
    #[arg(long, value_parser = clap::value_parser!(f32))]
    pub temperature: Option<f32>,

    /// Token budget for each generated solution.
    #[arg(long = "max-tokens")]
    pub max_tokens: Option<u32>,

    /// Where to write the document.
    ///
    /// Defaults to C_Programming_Solutions.<ext> in the working directory.
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Document format (html|markdown).
    #[arg(long)]
    pub format: Option<String>,

    /// Questions processed concurrently.
    #[arg(short = 'j', long)]
    pub workers: Option<usize>,

    /// Simulated stdin for questions without a `#stdin:` line.
    ///
    /// Escapes such as \n are decoded, e.g. --stdin '3 4\n'.
    #[arg(long)]
    pub stdin: Option<String>,

    /// C compiler invoked as `<compiler> <source> -o <binary>`.
    #[arg(long)]
    pub compiler: Option<String>,

    /// Log at debug level (RUST_LOG takes precedence).
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }
}
