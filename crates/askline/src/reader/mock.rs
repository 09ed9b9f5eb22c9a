//! Scripted line reader for tests.

use std::collections::VecDeque;
use std::io;

use async_trait::async_trait;

use super::{Echo, LineReader, ReadOutcome, ReadRequest};

/// One step of a [`MockLineReader`] script.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockEvent {
    /// The user types this line and presses Enter.
    Line(String),
    /// Nothing is typed for one idle period.
    ///
    /// Reads without an idle timeout keep waiting, so the event is skipped.
    Idle,
    /// The input stream ends.
    Close,
}

/// Mock reader that replays scripted input and records every write.
///
/// Once the script runs out the user goes silent: reads with an idle timeout
/// time out, reads without one see the input close.
///
/// # Example
///
/// ```
/// use askline::reader::MockLineReader;
///
/// let reader = MockLineReader::with_lines(["", "orange"]);
/// assert!(reader.renders().is_empty());
/// ```
#[derive(Debug, Clone, Default)]
pub struct MockLineReader {
    events: VecDeque<MockEvent>,
    transcript: Vec<String>,
    renders: Vec<String>,
    notices: Vec<String>,
    releases: usize,
}

impl MockLineReader {
    /// Create a reader with an empty script.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a reader that answers each read with the next line.
    pub fn with_lines(lines: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self::with_events(lines.into_iter().map(|line| MockEvent::Line(line.into())))
    }

    /// Create a reader from an explicit script.
    pub fn with_events(events: impl IntoIterator<Item = MockEvent>) -> Self {
        Self {
            events: events.into_iter().collect(),
            ..Self::default()
        }
    }

    /// Append a line to the script.
    pub fn push_line(&mut self, line: impl Into<String>) -> &mut Self {
        self.events.push_back(MockEvent::Line(line.into()));
        self
    }

    /// Append `count` idle periods to the script.
    pub fn push_idle(&mut self, count: usize) -> &mut Self {
        self.events
            .extend(std::iter::repeat(MockEvent::Idle).take(count));
        self
    }

    /// Every write in order: prompts, echoed characters, line breaks and
    /// notices.
    pub fn transcript(&self) -> &[String] {
        &self.transcript
    }

    /// Every prompt shown, in order.
    pub fn renders(&self) -> &[String] {
        &self.renders
    }

    /// Every notice written, in order.
    pub fn notices(&self) -> &[String] {
        &self.notices
    }

    /// How many times a countdown session was released.
    pub fn releases(&self) -> usize {
        self.releases
    }

    /// Number of scripted events not consumed yet.
    pub fn remaining(&self) -> usize {
        self.events.len()
    }

    /// Position of the first write equal to `text`.
    pub fn first_write(&self, text: &str) -> Option<usize> {
        self.transcript.iter().position(|w| w == text)
    }

    /// Position of the last write equal to `text`.
    pub fn last_write(&self, text: &str) -> Option<usize> {
        self.transcript.iter().rposition(|w| w == text)
    }

    fn write(&mut self, text: impl Into<String>) {
        self.transcript.push(text.into());
    }
}

#[async_trait]
impl LineReader for MockLineReader {
    async fn read(&mut self, request: &ReadRequest<'_>) -> io::Result<ReadOutcome> {
        self.write(request.prompt);
        self.renders.push(request.prompt.to_string());

        loop {
            match self.events.pop_front() {
                Some(MockEvent::Line(line)) => {
                    let echo = Echo::new(request);
                    for ch in line.chars() {
                        if let Some(shown) = echo.render(ch) {
                            self.write(shown);
                        }
                    }
                    self.write("\n");
                    return Ok(ReadOutcome::Line(line));
                }
                Some(MockEvent::Idle) if request.idle_timeout.is_some() => {
                    self.write("\n");
                    return Ok(ReadOutcome::TimedOut);
                }
                Some(MockEvent::Idle) => continue,
                Some(MockEvent::Close) => return Ok(ReadOutcome::Closed),
                None if request.idle_timeout.is_some() => {
                    self.write("\n");
                    return Ok(ReadOutcome::TimedOut);
                }
                None => return Ok(ReadOutcome::Closed),
            }
        }
    }

    async fn notify(&mut self, message: &str) -> io::Result<()> {
        self.write(format!("{}\n", message));
        self.notices.push(message.to_string());
        Ok(())
    }

    async fn release(&mut self) -> io::Result<()> {
        self.releases += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn replays_lines_in_order() {
        let mut reader = MockLineReader::with_lines(["a", "b"]);
        let request = ReadRequest::new("> ");
        assert_eq!(
            reader.read(&request).await.unwrap(),
            ReadOutcome::Line("a".to_string())
        );
        assert_eq!(
            reader.read(&request).await.unwrap(),
            ReadOutcome::Line("b".to_string())
        );
        assert_eq!(reader.read(&request).await.unwrap(), ReadOutcome::Closed);
        assert_eq!(reader.renders().len(), 3);
    }

    #[tokio::test]
    async fn echoes_characters_individually() {
        let mut reader = MockLineReader::with_lines(["zz"]);
        reader.read(&ReadRequest::new("p: ")).await.unwrap();
        assert_eq!(reader.transcript(), ["p: ", "z", "z", "\n"]);
    }

    #[tokio::test]
    async fn masks_silent_input() {
        let mut reader = MockLineReader::with_lines(["zz", "zz"]);
        reader
            .read(&ReadRequest::new("p: ").silent(true, None))
            .await
            .unwrap();
        reader
            .read(&ReadRequest::new("p: ").silent(true, Some("*")))
            .await
            .unwrap();
        assert_eq!(reader.transcript(), ["p: ", "\n", "p: ", "*", "*", "\n"]);
    }

    #[tokio::test]
    async fn idle_only_counts_with_a_timeout() {
        let mut reader =
            MockLineReader::with_events([MockEvent::Idle, MockEvent::Line("x".into())]);
        let outcome = reader.read(&ReadRequest::new("> ")).await.unwrap();
        assert_eq!(outcome, ReadOutcome::Line("x".to_string()));

        let mut reader = MockLineReader::new();
        reader.push_idle(1).push_line("x");
        let request = ReadRequest::new("> ").idle_timeout(Some(Duration::from_secs(1)));
        assert_eq!(reader.read(&request).await.unwrap(), ReadOutcome::TimedOut);
        assert_eq!(reader.remaining(), 1);
    }

    #[tokio::test]
    async fn notices_are_recorded_with_newline() {
        let mut reader = MockLineReader::new();
        reader.notify("Invalid choice: bleh").await.unwrap();
        assert_eq!(reader.transcript(), ["Invalid choice: bleh\n"]);
        assert_eq!(reader.notices(), ["Invalid choice: bleh"]);
    }
}
