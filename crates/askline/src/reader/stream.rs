//! Line reader over tokio byte streams.

use std::io::{self, IsTerminal};
use std::time::Duration;

use async_trait::async_trait;
use crossterm::terminal::{self, Clear, ClearType};
use crossterm::Command;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt, Stdout};
use tracing::trace;

use super::{Echo, LineReader, ReadOutcome, ReadRequest, SharedStdin};

const BACKSPACE: u8 = 0x08;
const DELETE: u8 = 0x7f;
const CTRL_C: u8 = 0x03;
const CTRL_D: u8 = 0x04;
const ERASE: &str = "\x08 \x08";

/// [`StreamReader`] attached to the process's stdin and stdout.
pub type StdioReader = StreamReader<SharedStdin, Stdout>;

/// Reads lines from an input stream, echoing to an output stream.
///
/// Characters are echoed by the reader itself: verbatim in normal mode,
/// not at all in silent mode, or as the replace string in silent mode when
/// one is set. When attached to a real terminal ([`stdio`](Self::stdio)),
/// raw mode is held for every read so the terminal's own echo and line
/// editing stay out of the way. A read that times out keeps raw mode for the
/// next tick of the countdown; it is restored by the next read that ends
/// otherwise, by [`release`](LineReader::release), or when the reader is
/// dropped.
///
/// # Example
///
/// ```
/// use askline::reader::{LineReader, ReadOutcome, ReadRequest, StreamReader};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let mut reader = StreamReader::new(&b"hello\n"[..], Vec::new());
/// let outcome = reader.read(&ReadRequest::new("name: ")).await.unwrap();
/// assert_eq!(outcome, ReadOutcome::Line("hello".to_string()));
/// assert_eq!(reader.output(), b"name: hello\n");
/// # }
/// ```
#[derive(Debug)]
pub struct StreamReader<R, W> {
    input: R,
    output: W,
    terminal: bool,
    raw: Option<RawModeGuard>,
}

impl StdioReader {
    /// Reader on stdin/stdout, using raw mode when both are terminals.
    ///
    /// Stdin is read through [`SharedStdin`], so any number of stdio readers
    /// can be created one after another without losing input.
    pub fn stdio() -> Self {
        let terminal = std::io::stdin().is_terminal() && std::io::stdout().is_terminal();
        Self {
            input: SharedStdin::new(),
            output: tokio::io::stdout(),
            terminal,
            raw: None,
        }
    }
}

impl<R, W> StreamReader<R, W>
where
    R: AsyncRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send,
{
    /// Reader on arbitrary streams. Never touches terminal modes.
    pub fn new(input: R, output: W) -> Self {
        Self {
            input,
            output,
            terminal: false,
            raw: None,
        }
    }

    /// Everything written so far, for readers over an in-memory sink.
    pub fn output(&self) -> &W {
        &self.output
    }

    /// Split the reader back into its streams.
    pub fn into_inner(self) -> (R, W) {
        (self.input, self.output)
    }

    fn newline(&self) -> &'static str {
        if self.terminal {
            "\r\n"
        } else {
            "\n"
        }
    }

    async fn write(&mut self, text: &str) -> io::Result<()> {
        self.output.write_all(text.as_bytes()).await
    }

    /// `None` when the idle timeout elapsed, `Some(None)` at end of input.
    async fn next_byte(&mut self, idle: Option<Duration>) -> io::Result<Option<Option<u8>>> {
        let mut buf = [0u8; 1];
        let n = match idle {
            Some(idle) => match tokio::time::timeout(idle, self.input.read(&mut buf)).await {
                Ok(n) => n?,
                Err(_) => return Ok(None),
            },
            None => self.input.read(&mut buf).await?,
        };
        Ok(Some((n > 0).then_some(buf[0])))
    }

    /// Move back to the start of the line so the next prompt redraws it.
    async fn abandon_line(&mut self) -> io::Result<()> {
        if self.terminal {
            let mut clear = String::from("\r");
            Clear(ClearType::CurrentLine)
                .write_ansi(&mut clear)
                .map_err(|_| io::Error::new(io::ErrorKind::Other, "failed to encode clear"))?;
            self.write(&clear).await
        } else {
            let newline = self.newline();
            self.write(newline).await
        }
    }
}

#[async_trait]
impl<R, W> LineReader for StreamReader<R, W>
where
    R: AsyncRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send,
{
    async fn read(&mut self, request: &ReadRequest<'_>) -> io::Result<ReadOutcome> {
        self.write(request.prompt).await?;
        self.output.flush().await?;

        let raw = match self.raw.take() {
            Some(raw) => raw,
            None => RawModeGuard::acquire(self.terminal)?,
        };
        let echo = Echo::new(request);
        let mut line = LineBuffer::default();

        loop {
            let byte = match self.next_byte(request.idle_timeout).await? {
                Some(byte) => byte,
                None => {
                    trace!(partial = !line.is_empty(), "read idle timeout");
                    self.abandon_line().await?;
                    self.output.flush().await?;
                    self.raw = Some(raw);
                    return Ok(ReadOutcome::TimedOut);
                }
            };

            match byte {
                None => {
                    if line.is_empty() {
                        return Ok(ReadOutcome::Closed);
                    }
                    break;
                }
                Some(CTRL_D) if self.terminal => {
                    if line.is_empty() {
                        return Ok(ReadOutcome::Closed);
                    }
                    break;
                }
                Some(CTRL_C) if self.terminal => return Ok(ReadOutcome::Closed),
                Some(b'\n') => break,
                Some(b'\r') if self.terminal => break,
                Some(b'\r') => {}
                Some(BACKSPACE | DELETE) => {
                    if line.pop() && echo.visible() {
                        self.write(ERASE).await?;
                        self.output.flush().await?;
                    }
                }
                Some(byte) => {
                    if let Some(ch) = line.push(byte) {
                        if let Some(shown) = echo.render(ch) {
                            self.write(&shown).await?;
                            self.output.flush().await?;
                        }
                    }
                }
            }
        }

        let newline = self.newline();
        self.write(newline).await?;
        self.output.flush().await?;
        Ok(ReadOutcome::Line(line.finish()))
    }

    async fn notify(&mut self, message: &str) -> io::Result<()> {
        self.write(message).await?;
        let newline = self.newline();
        self.write(newline).await?;
        self.output.flush().await
    }

    async fn release(&mut self) -> io::Result<()> {
        self.raw = None;
        Ok(())
    }
}

/// Raw mode held for one read or one countdown. Restored on drop, whatever
/// the exit path.
#[derive(Debug)]
struct RawModeGuard {
    active: bool,
}

impl RawModeGuard {
    fn acquire(enable: bool) -> io::Result<Self> {
        if enable {
            terminal::enable_raw_mode()?;
        }
        Ok(Self { active: enable })
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        if self.active {
            let _ = terminal::disable_raw_mode();
        }
    }
}

/// Accumulates bytes into a string, decoding UTF-8 as characters complete.
#[derive(Debug, Default)]
struct LineBuffer {
    text: String,
    pending: Vec<u8>,
}

impl LineBuffer {
    /// Feed one byte. Returns the character it completed, if any.
    fn push(&mut self, byte: u8) -> Option<char> {
        self.pending.push(byte);
        match std::str::from_utf8(&self.pending) {
            Ok(s) => {
                let ch = s.chars().next();
                self.text.push_str(s);
                self.pending.clear();
                ch
            }
            // incomplete multi-byte sequence
            Err(e) if e.error_len().is_none() => None,
            Err(_) => {
                self.pending.clear();
                self.text.push(char::REPLACEMENT_CHARACTER);
                Some(char::REPLACEMENT_CHARACTER)
            }
        }
    }

    /// Remove the last character. Returns whether one was removed.
    fn pop(&mut self) -> bool {
        if !self.pending.is_empty() {
            self.pending.clear();
            return false;
        }
        self.text.pop().is_some()
    }

    fn is_empty(&self) -> bool {
        self.text.is_empty() && self.pending.is_empty()
    }

    fn finish(mut self) -> String {
        if !self.pending.is_empty() {
            self.text.push(char::REPLACEMENT_CHARACTER);
        }
        self.text
    }
}
