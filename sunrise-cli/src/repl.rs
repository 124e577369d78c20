//! Interactive question loop.

use std::io::Write;

use anyhow::Result;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use sunrise_rag::HospitalAssistant;
use tracing::warn;

/// A blocking source of input lines.
pub trait LineReader {
    /// Read one line. `Ok(None)` ends the session.
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>>;
}

impl LineReader for DefaultEditor {
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>> {
        match self.readline(prompt) {
            Ok(line) => {
                if !line.trim().is_empty() {
                    if let Err(err) = self.add_history_entry(line.trim()) {
                        warn!(error = %err, "could not record history");
                    }
                }
                Ok(Some(line))
            }
            Err(ReadlineError::Interrupted | ReadlineError::Eof) => Ok(None),
            Err(err) => Err(err.into()),
        }
    }
}

/// Answer questions from `reader` until it is exhausted, writing each answer
/// to `out`. Blank lines are skipped. Returns the number of answered questions.
///
/// Reading blocks the current thread, so this must run on a multi-threaded
/// tokio runtime.
pub async fn run<R, W>(
    reader: &mut R,
    assistant: &HospitalAssistant,
    out: &mut W,
) -> Result<usize>
where
    R: LineReader,
    W: Write,
{
    let mut answered = 0;
    while let Some(line) = tokio::task::block_in_place(|| reader.read_line("> "))? {
        let question = line.trim();
        if question.is_empty() {
            continue;
        }
        let answer = assistant.answer_query(question).await;
        writeln!(out, "{answer}\n")?;
        answered += 1;
    }
    Ok(answered)
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use sunrise_rag::{Corpus, GenerationProvider, NO_CONTEXT_MESSAGE, RagConfig};

    use super::*;

    struct Scripted(VecDeque<&'static str>);

    impl LineReader for Scripted {
        fn read_line(&mut self, _prompt: &str) -> Result<Option<String>> {
            Ok(self.0.pop_front().map(str::to_string))
        }
    }

    #[derive(Default)]
    struct Echo {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl GenerationProvider for Echo {
        async fn generate(&self, _prompt: &str) -> sunrise_rag::Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok("Visiting hours are 10am-8pm daily.".to_string())
        }

        fn name(&self) -> &str {
            "Echo"
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn answers_each_question_and_skips_blank_lines() {
        let generator = Arc::new(Echo::default());
        let assistant = HospitalAssistant::builder()
            .config(RagConfig::default())
            .corpus(Arc::new(Corpus::new(["Visiting hours are 10am-8pm daily"])))
            .generation_provider(generator.clone())
            .build()
            .unwrap();

        let mut reader = Scripted(VecDeque::from(["when can I visit", "   ", "", "zzzz"]));
        let mut out = Vec::new();
        let answered = run(&mut reader, &assistant, &mut out).await.unwrap();

        assert_eq!(answered, 2);
        assert_eq!(generator.calls.load(Ordering::SeqCst), 1);
        let printed = String::from_utf8(out).unwrap();
        assert_eq!(
            printed,
            format!("Visiting hours are 10am-8pm daily.\n\n{NO_CONTEXT_MESSAGE}\n\n")
        );
    }
}
