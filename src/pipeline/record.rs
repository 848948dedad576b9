use crate::{execution::RunError, questions::Question};

pub const FAILED_SOLUTION: &str = "Failed to generate solution.";
pub const NOT_APPLICABLE: &str = "N/A";
pub const NO_CODE: &str = "No executable code found in the solution.";

#[derive(Debug)]
pub enum Solution {
    Generated {
        raw_response: String,
        code: Option<String>,
    },
    Failed,
}

impl Solution {
    /// Text shown in the document when no code could be pulled out.
    pub fn text(&self) -> &str {
        match self {
            Solution::Generated { raw_response, .. } => raw_response,
            Solution::Failed => FAILED_SOLUTION,
        }
    }

    pub fn code(&self) -> Option<&str> {
        match self {
            Solution::Generated { code, .. } => code.as_deref(),
            Solution::Failed => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Skip {
    GenerationFailed,
    NoCode,
}

#[derive(Debug)]
pub enum Execution {
    NotAttempted(Skip),
    Ran(Result<String, RunError>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Success,
    Error,
}

impl Execution {
    pub fn status(&self) -> Status {
        match self {
            Execution::Ran(Ok(_)) => Status::Success,
            _ => Status::Error,
        }
    }

    pub fn message(&self) -> String {
        match self {
            Execution::NotAttempted(Skip::GenerationFailed) => NOT_APPLICABLE.to_string(),
            Execution::NotAttempted(Skip::NoCode) => NO_CODE.to_string(),
            Execution::Ran(Ok(output)) => output.clone(),
            Execution::Ran(Err(e)) => e.to_string(),
        }
    }
}

#[derive(Debug)]
pub struct SolutionRecord {
    pub question: Question,
    pub solution: Solution,
    pub execution: Execution,
}
