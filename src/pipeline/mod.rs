//! Per-question generate → extract → run, fanned out over a bounded pool.

use futures::stream::{self, StreamExt};
use tracing::{info, warn};

use crate::{
    execution::{compile_and_run, RunnerConfig},
    extract::extract_code,
    llm::{ChatOptions, GenerationError, LlmClient},
    questions::Question,
    role::solution_messages,
};

mod record;

const PREVIEW_CHARS: usize = 60;

pub use record::{Execution, Skip, Solution, SolutionRecord, Status};

pub async fn generate_solution(
    client: &LlmClient,
    opts: &ChatOptions,
    question: &str,
) -> Result<String, GenerationError> {
    client.chat(&solution_messages(question), opts).await
}

pub async fn process_question(
    client: &LlmClient,
    opts: &ChatOptions,
    runner: &RunnerConfig,
    question: Question,
) -> SolutionRecord {
    info!(
        question = question.index,
        preview = %question.preview(PREVIEW_CHARS),
        "processing question"
    );

    let raw_response = match generate_solution(client, opts, &question.text).await {
        Ok(text) => text,
        Err(e) => {
            warn!(question = question.index, error = %e, "solution generation failed");
            return SolutionRecord {
                question,
                solution: Solution::Failed,
                execution: Execution::NotAttempted(Skip::GenerationFailed),
            };
        }
    };

    let code = extract_code(&raw_response);
    let execution = match code.as_deref() {
        Some(code) => {
            let result = compile_and_run(runner, code, question.stdin.as_deref()).await;
            if let Err(e) = &result {
                warn!(question = question.index, error = %e, "compile/run failed");
            }
            Execution::Ran(result)
        }
        None => {
            warn!(question = question.index, "no fenced code block in response");
            Execution::NotAttempted(Skip::NoCode)
        }
    };

    info!(question = question.index, status = ?execution.status(), "question finished");
    SolutionRecord {
        question,
        solution: Solution::Generated { raw_response, code },
        execution,
    }
}

/// Runs every question with at most `workers` in flight; output keeps input order.
pub async fn process_all(
    client: &LlmClient,
    opts: &ChatOptions,
    runner: &RunnerConfig,
    questions: Vec<Question>,
    workers: usize,
) -> Vec<SolutionRecord> {
    stream::iter(questions)
        .map(|q| process_question(client, opts, runner, q))
        .buffered(workers.max(1))
        .collect()
        .await
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
}

impl RunSummary {
    pub fn from_records(records: &[SolutionRecord]) -> Self {
        let succeeded = records
            .iter()
            .filter(|r| r.execution.status() == Status::Success)
            .count();
        Self {
            total: records.len(),
            succeeded,
            failed: records.len() - succeeded,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::record::{FAILED_SOLUTION, NOT_APPLICABLE, NO_CODE};
    use super::*;
    use crate::{llm::GeneratorConfig, questions::split_questions};
    use wiremock::matchers::{body_string_contains, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn generator(server: &MockServer) -> GeneratorConfig {
        GeneratorConfig {
            api_key: None,
            base_url: format!("{}/v1", server.uri()),
            model: "gpt-4o-mini".into(),
            max_tokens: 1500,
            temperature: 0.2,
            request_timeout: Duration::from_secs(5),
        }
    }

    fn runner(dir: &tempfile::TempDir, compiler: &str) -> RunnerConfig {
        RunnerConfig {
            compiler: compiler.into(),
            compiler_args: Vec::new(),
            compile_timeout: Duration::from_secs(10),
            run_timeout: Duration::from_secs(3),
            default_stdin: "42\n".into(),
            work_dir: dir.path().to_path_buf(),
        }
    }

    fn reply(content: &str) -> ResponseTemplate {
        ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "choices": [{"message": {"role": "assistant", "content": content}}]
        }))
    }

    #[tokio::test]
    async fn generation_failure_is_contained() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(401).set_body_string("bad key"))
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let gen = generator(&server);
        let client = LlmClient::new(&gen).unwrap();
        let records = process_all(
            &client,
            &gen.chat_options(),
            &runner(&dir, "solvedoc-no-such-compiler"),
            split_questions("Q1\n\nQ2"),
            2,
        )
        .await;

        assert_eq!(records.len(), 2);
        for r in &records {
            assert_eq!(r.solution.text(), FAILED_SOLUTION);
            assert_eq!(r.execution.message(), NOT_APPLICABLE);
            assert_eq!(r.execution.status(), Status::Error);
        }
    }

    #[tokio::test]
    async fn response_without_code_is_never_compiled() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(reply("I cannot write code for this."))
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let gen = generator(&server);
        let client = LlmClient::new(&gen).unwrap();
        // A compiler that does not exist would turn any compile attempt into an Io error.
        let record = process_question(
            &client,
            &gen.chat_options(),
            &runner(&dir, "solvedoc-no-such-compiler"),
            split_questions("Explain pointers.").remove(0),
        )
        .await;

        assert!(matches!(record.execution, Execution::NotAttempted(Skip::NoCode)));
        assert_eq!(record.execution.message(), NO_CODE);
        assert_eq!(record.solution.text(), "I cannot write code for this.");
    }

    #[tokio::test]
    async fn results_keep_input_order_with_parallel_workers() {
        let server = MockServer::start().await;
        for n in 1..=5 {
            Mock::given(method("POST"))
                .and(body_string_contains(format!("Question number {n}.")))
                .respond_with(
                    reply(&format!("answer {n}")).set_delay(Duration::from_millis(50 * (6 - n))),
                )
                .mount(&server)
                .await;
        }

        let dir = tempfile::tempdir().unwrap();
        let gen = generator(&server);
        let client = LlmClient::new(&gen).unwrap();
        let input = (1..=5)
            .map(|n| format!("Question number {n}."))
            .collect::<Vec<_>>()
            .join("\n\n");
        let records = process_all(
            &client,
            &gen.chat_options(),
            &runner(&dir, "solvedoc-no-such-compiler"),
            split_questions(&input),
            3,
        )
        .await;

        let answers: Vec<&str> = records.iter().map(|r| r.solution.text()).collect();
        assert_eq!(answers, vec!["answer 1", "answer 2", "answer 3", "answer 4", "answer 5"]);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn extracted_code_is_compiled_and_run() {
        let server = MockServer::start().await;
        let script = "```c\nprintf '#!/bin/sh\\nread n\\necho \"square $((n * n))\"\\n' > \"$2\"\nchmod +x \"$2\"\n```";
        Mock::given(method("POST"))
            .respond_with(reply(script))
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let gen = generator(&server);
        let client = LlmClient::new(&gen).unwrap();
        let records = process_all(
            &client,
            &gen.chat_options(),
            &runner(&dir, "sh"),
            split_questions("Square a number.\n#stdin: 9\n\nSquare the default."),
            2,
        )
        .await;

        assert_eq!(records[0].execution.message(), "square 81");
        assert_eq!(records[1].execution.message(), "square 1764");
        assert_eq!(
            RunSummary::from_records(&records),
            RunSummary { total: 2, succeeded: 2, failed: 0 }
        );
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }
}
