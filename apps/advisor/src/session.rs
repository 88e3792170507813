//! Session Loop — drives one interactive run: load the resume, ask for the
//! initial critique, then answer follow-up questions until the user stops.

use std::path::{Path, PathBuf};

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{info, warn};

use crate::errors::AppError;
use crate::extractor::{extract, preview};
use crate::llm_client::{ChatClient, Conversation, Message};
use crate::prompts::build_initial_prompt;

pub const PATH_PROMPT: &str = "Enter the path to the resume PDF: ";
pub const FOLLOW_UP_PROMPT: &str =
    "\nAsk a follow-up question about improving your resume (press Enter to finish): ";
pub const SESSION_END: &str = "\nEnding session.\n";
const PREVIEW_CHARS: usize = 500;

/// Case-insensitive answers that end the follow-up loop, besides a blank line.
const EXIT_SIGNALS: &[&str] = &["quit", "exit", "q", "no", "n"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionOutcome {
    /// Follow-up questions that received an answer.
    pub follow_ups: usize,
}

pub struct Session<'a> {
    client: &'a dyn ChatClient,
    conversation: Conversation,
}

impl<'a> Session<'a> {
    pub fn new(client: &'a dyn ChatClient) -> Self {
        Self {
            client,
            conversation: Conversation::new(),
        }
    }

    #[cfg(test)]
    pub fn conversation(&self) -> &Conversation {
        &self.conversation
    }

    /// Full run: asks for a PDF path, extracts it, then hands over to `converse`.
    /// Extraction failures are fatal and happen before any request is sent.
    pub async fn run<R, W>(
        &mut self,
        input: &mut R,
        output: &mut W,
    ) -> Result<SessionOutcome, AppError>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        write_flush(output, PATH_PROMPT).await?;
        let line = read_line(input).await?.ok_or(AppError::NoInput)?;
        let path = clean_path(&line);

        let resume_text = load_resume(&path)?;
        let preview_text = preview(&resume_text, PREVIEW_CHARS);
        write_flush(
            output,
            &format!("\nExtracted Resume Text Preview:\n\n{preview_text}\n"),
        )
        .await?;

        self.converse(&resume_text, input, output).await
    }

    /// Sends the initial analysis for `resume_text`, then loops on follow-ups.
    pub async fn converse<R, W>(
        &mut self,
        resume_text: &str,
        input: &mut R,
        output: &mut W,
    ) -> Result<SessionOutcome, AppError>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        self.conversation.push(Message::user(build_initial_prompt(resume_text)));

        write_flush(output, "\nAnalyzing resume with the language model...\n\n").await?;
        let feedback = self.client.complete(&self.conversation).await?;
        write_flush(output, &format!("Model Feedback:\n\n{feedback}\n")).await?;
        self.conversation.push(Message::assistant(feedback));

        let mut follow_ups = 0;
        loop {
            write_flush(output, FOLLOW_UP_PROMPT).await?;
            let Some(line) = read_line(input).await? else {
                break;
            };
            let question = line.trim();
            if is_exit_signal(question) {
                break;
            }

            self.conversation.push(Message::user(question));
            write_flush(output, "\nProcessing your follow-up question...\n\n").await?;

            match self.client.complete(&self.conversation).await {
                Ok(reply) => {
                    write_flush(output, &format!("Follow-Up Advice:\n\n{reply}\n")).await?;
                    self.conversation.push(Message::assistant(reply));
                    follow_ups += 1;
                }
                Err(e) => {
                    // Unanswered question is retracted; the user may rephrase or retry.
                    warn!("Follow-up request failed: {e}");
                    self.conversation.pop();
                    write_flush(output, &format!("Request failed: {e}\n")).await?;
                }
            }
        }

        write_flush(output, SESSION_END).await?;
        info!(
            "Session finished after {follow_ups} follow-up question(s), {} messages exchanged",
            self.conversation.len()
        );
        Ok(SessionOutcome { follow_ups })
    }
}

fn load_resume(path: &Path) -> Result<String, AppError> {
    let text = extract(path)?;
    if text.trim().is_empty() {
        return Err(AppError::EmptyDocument(path.to_path_buf()));
    }
    Ok(text)
}

/// Strips whitespace and the quotes terminals add around dragged-in paths.
fn clean_path(raw: &str) -> PathBuf {
    PathBuf::from(raw.trim().trim_matches('"'))
}

fn is_exit_signal(input: &str) -> bool {
    let input = input.trim();
    input.is_empty() || EXIT_SIGNALS.iter().any(|s| input.eq_ignore_ascii_case(s))
}

async fn read_line<R>(input: &mut R) -> std::io::Result<Option<String>>
where
    R: AsyncBufRead + Unpin,
{
    let mut line = String::new();
    if input.read_line(&mut line).await? == 0 {
        return Ok(None);
    }
    Ok(Some(line))
}

async fn write_flush<W>(output: &mut W, text: &str) -> std::io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    output.write_all(text.as_bytes()).await?;
    output.flush().await
}
