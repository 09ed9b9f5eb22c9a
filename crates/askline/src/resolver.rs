//! Prompt resolution.
//!
//! [`resolve`] drives a [`LineReader`] until the request produces a value
//! or fails:
//!
//! ```text
//! read ──► trim ──► empty? ──► validators ──► value
//!  ▲  │               │  no default │ rejected, retry
//!  │  └ countdown     └─────────────┤
//!  └────────────────────────────────┘
//! ```
//!
//! With a timeout the read is split into one-tick reads so the message can
//! show the remaining seconds. When the countdown runs out and the request
//! allows it, the default enters the pipeline as if it had been typed. Every
//! retry starts over from the top, countdown included.

use tracing::{debug, trace};

use crate::reader::{LineReader, ReadOutcome, ReadRequest};
use crate::request::PromptRequest;
use crate::validator::run_chain;
use crate::{Answer, PromptError, ValidationFailure};

/// What the read phase produced.
enum Input {
    Line(String),
    Expired,
}

/// Resolve `request` by reading from `reader`.
///
/// # Errors
///
/// - [`PromptError::Timeout`] when the countdown expires and no default may
///   be used
/// - [`PromptError::Validation`] when a validator rejects the input and the
///   request does not retry
/// - [`PromptError::Cancelled`] when the input ends
/// - [`PromptError::Io`] when the reader fails
pub async fn resolve<R>(request: &PromptRequest, reader: &mut R) -> Result<Answer, PromptError>
where
    R: LineReader + ?Sized,
{
    debug!(
        message = request.message(),
        timeout = ?request.timeout(),
        validators = request.validators().len(),
        "resolving prompt"
    );

    let mut attempt: u32 = 0;
    loop {
        attempt += 1;

        let raw = match read_input(request, reader).await? {
            Input::Line(line) => line,
            Input::Expired => match request.default_value() {
                Some(default) if request.use_default_on_timeout() => {
                    debug!("prompt timed out, using default");
                    default.to_string()
                }
                _ => return Err(PromptError::Timeout),
            },
        };

        let value = if request.trim() {
            raw.trim().to_string()
        } else {
            raw
        };

        let value = if value.is_empty() {
            match request.default_value() {
                Some(default) => default.to_string(),
                None => {
                    trace!(attempt, "empty input without default");
                    continue;
                }
            }
        } else {
            value
        };

        match run_chain(request.validators(), Answer::String(value)).await {
            Ok(answer) => {
                debug!(attempt, "prompt resolved");
                return Ok(answer);
            }
            Err(err) if request.retry() => {
                debug!(attempt, "validation failed, asking again");
                if !err.message().is_empty() {
                    reader.notify(err.message()).await?;
                }
            }
            Err(err) => {
                debug!(attempt, "validation failed");
                return Err(ValidationFailure::new(err, request.clone()).into());
            }
        }
    }
}

/// Read one line, counting down the timeout if there is one.
async fn read_input<R>(request: &PromptRequest, reader: &mut R) -> Result<Input, PromptError>
where
    R: LineReader + ?Sized,
{
    let Some(seconds) = request.timeout() else {
        let prompt = request.render(None);
        let read = ReadRequest::new(&prompt).silent(request.silent(), request.replace());
        return match reader.read(&read).await? {
            ReadOutcome::Line(line) => Ok(Input::Line(line)),
            ReadOutcome::Closed => Err(PromptError::Cancelled),
            ReadOutcome::TimedOut => Err(PromptError::Timeout),
        };
    };

    let mut remaining = seconds;
    while remaining > 0 {
        let prompt = request.render(Some(remaining));
        let read = ReadRequest::new(&prompt)
            .silent(request.silent(), request.replace())
            .idle_timeout(Some(request.tick()));

        match reader.read(&read).await? {
            ReadOutcome::Line(line) => return Ok(Input::Line(line)),
            ReadOutcome::Closed => return Err(PromptError::Cancelled),
            ReadOutcome::TimedOut => {
                remaining -= 1;
                trace!(remaining, "countdown tick");
            }
        }
    }

    debug!(seconds, "countdown expired");
    reader.release().await?;
    Ok(Input::Expired)
}
