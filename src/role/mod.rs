//! Prompt texts sent with every solution request.

use crate::llm::{ChatMessage, Role};

pub const SYSTEM_ROLE: &str =
    "You are an expert C programmer that provides detailed and accurate programming solutions.";

pub fn solution_prompt(question: &str) -> String {
    format!(
        "You are an expert C programmer. Provide a clear and concise solution to the following programming problem.\nInclude the C code with proper formatting in a ```c fenced block.\nOnly output the code. Do not write anything else such as an explanation.\n\nProblem:\n{question}\n\nSolution:"
    )
}

/// System/user message pair for one question.
pub fn solution_messages(question: &str) -> Vec<ChatMessage> {
    vec![
        ChatMessage::new(Role::System, SYSTEM_ROLE),
        ChatMessage::new(Role::User, solution_prompt(question)),
    ]
}
