//! The interactive read-send-print loop.
//!
//! Generic over reader and writer so the loop runs against in-memory
//! buffers in tests. Standard output carries only the reply transcript
//! (`AI: <text>` lines); the prompt goes to stderr alongside the logs so
//! a piped stdout stays clean.

use anyhow::Result;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::debug;

use crate::session::ChatSession;

const PROMPT: &str = "\nYou: ";

/// Drives the session until end-of-input or the first failed exchange.
///
/// Each iteration: prompt, block for one line, forward it verbatim
/// (empty lines included, only the line terminator stripped), print the
/// reply. End-of-input returns `Ok(())`; any send failure propagates and
/// ends the session.
pub async fn run<R, W>(session: &mut ChatSession, mut input: R, mut output: W) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    loop {
        eprint!("{PROMPT}");

        let mut line = String::new();
        let read = input.read_line(&mut line).await?;
        if read == 0 {
            debug!("End of input after {} turns", session.turn_count());
            return Ok(());
        }

        if line.ends_with('\n') {
            line.pop();
            if line.ends_with('\r') {
                line.pop();
            }
        }

        let reply = session.send_message(&line).await?;
        output.write_all(format!("AI: {reply}\n").as_bytes()).await?;
        output.flush().await?;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ChatError;
    use crate::llm::{ChatModel, Content};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    /// Pops scripted replies in order; counts how often it was called.
    struct ScriptedModel {
        replies: Mutex<Vec<Result<String, ChatError>>>,
        calls: Arc<AtomicUsize>,
        last_input: Arc<Mutex<String>>,
    }

    impl ScriptedModel {
        fn new(replies: Vec<Result<String, ChatError>>) -> Self {
            Self {
                replies: Mutex::new(replies),
                calls: Arc::new(AtomicUsize::new(0)),
                last_input: Arc::new(Mutex::new(String::new())),
            }
        }
    }

    #[async_trait]
    impl ChatModel for ScriptedModel {
        async fn generate(&self, history: &[Content]) -> Result<String, ChatError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Some(last) = history.last() {
                *self.last_input.lock().unwrap() = last.text.clone();
            }
            self.replies.lock().unwrap().remove(0)
        }

        fn description(&self) -> String {
            "scripted (test)".to_string()
        }
    }

    async fn run_transcript(
        input: &str,
        replies: Vec<Result<String, ChatError>>,
    ) -> (Result<()>, String, usize) {
        let model = ScriptedModel::new(replies);
        let calls = model.calls.clone();
        let mut session = ChatSession::new(Box::new(model));
        let mut output = Vec::new();
        let result = run(&mut session, input.as_bytes(), &mut output).await;
        (
            result,
            String::from_utf8(output).unwrap(),
            calls.load(Ordering::SeqCst),
        )
    }

    #[tokio::test]
    async fn test_replies_in_input_order() {
        let (result, transcript, _) = run_transcript(
            "Hello\nWhat is 2+2?\n",
            vec![Ok("Hi there".to_string()), Ok("4".to_string())],
        )
        .await;
        result.unwrap();
        assert_eq!(transcript, "AI: Hi there\nAI: 4\n");
    }

    #[tokio::test]
    async fn test_one_reply_line_per_input_line() {
        let inputs = "a\nb\nc\nd\n";
        let replies = (0..4).map(|i| Ok(format!("r{i}"))).collect();
        let (result, transcript, calls) = run_transcript(inputs, replies).await;
        result.unwrap();
        let reply_lines: Vec<&str> = transcript
            .lines()
            .filter(|l| l.starts_with("AI: "))
            .collect();
        assert_eq!(reply_lines.len(), 4);
        assert_eq!(reply_lines, vec!["AI: r0", "AI: r1", "AI: r2", "AI: r3"]);
        assert_eq!(calls, 4);
    }

    #[tokio::test]
    async fn test_immediate_eof_is_clean_exit() {
        let (result, transcript, calls) = run_transcript("", vec![]).await;
        result.unwrap();
        assert!(transcript.is_empty());
        assert_eq!(calls, 0);
    }

    #[tokio::test]
    async fn test_failure_stops_reading_input() {
        // Three input lines, failure on the second send: one reply line,
        // an error, and no third call.
        let (result, transcript, calls) = run_transcript(
            "one\ntwo\nthree\n",
            vec![
                Ok("first".to_string()),
                Err(ChatError::Transport("connection reset".to_string())),
            ],
        )
        .await;
        assert!(result.is_err());
        assert_eq!(transcript, "AI: first\n");
        assert_eq!(calls, 2);
    }

    #[tokio::test]
    async fn test_error_propagates_as_chat_error() {
        let (result, _, _) = run_transcript(
            "hi\n",
            vec![Err(ChatError::Transport("unreachable".to_string()))],
        )
        .await;
        let err = result.unwrap_err();
        assert!(err.downcast_ref::<ChatError>().is_some());
    }

    #[tokio::test]
    async fn test_empty_line_is_sent() {
        let (result, transcript, calls) =
            run_transcript("\n", vec![Ok("you said nothing".to_string())]).await;
        result.unwrap();
        assert_eq!(transcript, "AI: you said nothing\n");
        assert_eq!(calls, 1);
    }

    #[tokio::test]
    async fn test_input_not_trimmed() {
        let model = ScriptedModel::new(vec![Ok("ok".to_string())]);
        let last_input = model.last_input.clone();
        let mut session = ChatSession::new(Box::new(model));
        let mut output = Vec::new();
        // Leading/trailing spaces survive; only the terminator is stripped.
        run(&mut session, "  spaced  \n".as_bytes(), &mut output)
            .await
            .unwrap();
        assert_eq!(*last_input.lock().unwrap(), "  spaced  ");
    }

    #[tokio::test]
    async fn test_crlf_terminator_stripped() {
        let model = ScriptedModel::new(vec![Ok("ok".to_string())]);
        let last_input = model.last_input.clone();
        let mut session = ChatSession::new(Box::new(model));
        let mut output = Vec::new();
        run(&mut session, "windows line\r\n".as_bytes(), &mut output)
            .await
            .unwrap();
        assert_eq!(*last_input.lock().unwrap(), "windows line");
        assert_eq!(String::from_utf8(output).unwrap(), "AI: ok\n");
    }

    #[tokio::test]
    async fn test_last_line_without_newline() {
        let (result, transcript, _) =
            run_transcript("no newline", vec![Ok("fine".to_string())]).await;
        result.unwrap();
        assert_eq!(transcript, "AI: fine\n");
    }
}
