//! Line readers.
//!
//! The resolver never touches a terminal directly. It asks a [`LineReader`]
//! to show a prompt and hand back one line, which keeps the retry and
//! timeout logic testable without a TTY:
//!
//! - [`StreamReader`] - reads from any tokio stream pair, including stdio
//!   through [`SharedStdin`]
//! - [`MockLineReader`] - scripted input with a transcript of every write

use std::io;
use std::time::Duration;

use async_trait::async_trait;

mod mock;
mod stdin;
mod stream;

pub use mock::{MockEvent, MockLineReader};
pub use stdin::SharedStdin;
pub use stream::{StdioReader, StreamReader};

/// Parameters of a single read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadRequest<'a> {
    /// Text shown before the cursor.
    pub prompt: &'a str,
    /// Suppress echo of typed characters.
    pub silent: bool,
    /// In silent mode, written once per typed character.
    pub replace: Option<&'a str>,
    /// Give up when no byte arrives for this long.
    pub idle_timeout: Option<Duration>,
}

impl<'a> ReadRequest<'a> {
    /// A plain, echoing, blocking read.
    pub fn new(prompt: &'a str) -> Self {
        Self {
            prompt,
            silent: false,
            replace: None,
            idle_timeout: None,
        }
    }

    pub fn silent(mut self, silent: bool, replace: Option<&'a str>) -> Self {
        self.silent = silent;
        self.replace = replace;
        self
    }

    pub fn idle_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.idle_timeout = timeout;
        self
    }
}

/// What a read produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadOutcome {
    /// A complete line, without its terminator.
    Line(String),
    /// The idle timeout elapsed. Any partial input was discarded.
    TimedOut,
    /// Input ended before anything was typed.
    Closed,
}

/// Presents a prompt and captures one line of input.
///
/// A call to [`read`](Self::read) that returns a line, reports closed input
/// or fails tears down whatever it set up (raw mode, partial buffers) before
/// it returns. A read that times out may keep its terminal state for the
/// next tick of a countdown; the caller ends such a session with
/// [`release`](Self::release).
#[async_trait]
pub trait LineReader: Send {
    /// Show `request.prompt` and read one line.
    async fn read(&mut self, request: &ReadRequest<'_>) -> io::Result<ReadOutcome>;

    /// Write `message` followed by a line break to the output.
    async fn notify(&mut self, message: &str) -> io::Result<()>;

    /// Drop any state kept after a timed out read.
    async fn release(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[async_trait]
impl<R: LineReader + ?Sized> LineReader for &mut R {
    async fn read(&mut self, request: &ReadRequest<'_>) -> io::Result<ReadOutcome> {
        (**self).read(request).await
    }

    async fn notify(&mut self, message: &str) -> io::Result<()> {
        (**self).notify(message).await
    }

    async fn release(&mut self) -> io::Result<()> {
        (**self).release().await
    }
}

#[async_trait]
impl<R: LineReader + ?Sized> LineReader for Box<R> {
    async fn read(&mut self, request: &ReadRequest<'_>) -> io::Result<ReadOutcome> {
        (**self).read(request).await
    }

    async fn notify(&mut self, message: &str) -> io::Result<()> {
        (**self).notify(message).await
    }

    async fn release(&mut self) -> io::Result<()> {
        (**self).release().await
    }
}

/// What to write for each typed character.
pub(crate) enum Echo<'a> {
    Verbatim,
    Mask(&'a str),
    Hidden,
}

impl<'a> Echo<'a> {
    pub(crate) fn new(request: &ReadRequest<'a>) -> Self {
        match (request.silent, request.replace) {
            (false, _) => Self::Verbatim,
            (true, Some(mask)) if !mask.is_empty() => Self::Mask(mask),
            (true, _) => Self::Hidden,
        }
    }

    pub(crate) fn visible(&self) -> bool {
        !matches!(self, Self::Hidden)
    }

    pub(crate) fn render(&self, ch: char) -> Option<String> {
        match self {
            Self::Verbatim => Some(ch.to_string()),
            Self::Mask(mask) => Some((*mask).to_string()),
            Self::Hidden => None,
        }
    }
}
