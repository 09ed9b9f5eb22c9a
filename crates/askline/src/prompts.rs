//! Prompt flavours.
//!
//! Each flavour fills in its own option defaults, adds its built-in
//! validators in front of the caller's, and hands the request to
//! [`resolve`](crate::resolve).

use tracing::debug;

use crate::reader::{LineReader, StdioReader};
use crate::resolver::resolve;
use crate::value::{loosely_equal, render};
use crate::{
    Answer, PromptError, PromptOptions, PromptRequest, ValidationError, ValidationFailure, Validator,
};

/// Asks questions through a [`LineReader`].
///
/// # Example
///
/// ```
/// use askline::{reader::MockLineReader, PromptOptions, Prompter};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> Result<(), askline::PromptError> {
/// let mut prompter = Prompter::new(MockLineReader::with_lines(["y", "2"]));
///
/// let proceed = prompter.confirm("Proceed? ", PromptOptions::new()).await?;
/// let level = prompter.choose("Level? ", [1, 2, 3], PromptOptions::new()).await?;
///
/// assert!(proceed);
/// assert_eq!(level, 2);
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Prompter<R: LineReader = StdioReader> {
    reader: R,
}

impl Prompter<StdioReader> {
    /// Prompter on the process's stdin and stdout.
    pub fn stdio() -> Self {
        Self::new(StdioReader::stdio())
    }
}

impl<R: LineReader> Prompter<R> {
    /// Create a prompter around `reader`.
    pub fn new(reader: R) -> Self {
        Self { reader }
    }

    /// The underlying reader.
    pub fn reader(&self) -> &R {
        &self.reader
    }

    pub fn reader_mut(&mut self) -> &mut R {
        &mut self.reader
    }

    pub fn into_reader(self) -> R {
        self.reader
    }

    /// Resolve a prebuilt request.
    pub async fn resolve(&mut self, request: &PromptRequest) -> Result<Answer, PromptError> {
        resolve(request, &mut self.reader).await
    }

    /// Ask for a line of text.
    ///
    /// Trims input by default. The result is a string unless a validator
    /// turns it into something else.
    pub async fn prompt(
        &mut self,
        message: impl Into<String>,
        options: PromptOptions,
    ) -> Result<Answer, PromptError> {
        let request = PromptRequest::new(message, options.or_trim(true))?;
        self.resolve(&request).await
    }

    /// Ask for a secret without echoing it.
    ///
    /// Input is not trimmed and an empty answer is accepted unless the
    /// caller sets another default.
    pub async fn password(
        &mut self,
        message: impl Into<String>,
        options: PromptOptions,
    ) -> Result<Answer, PromptError> {
        let options = options.or_silent(true).or_trim(false).or_default("");
        let request = PromptRequest::new(message, options)?;
        self.resolve(&request).await
    }

    /// Ask for one of `choices`.
    ///
    /// The typed answer `"1"` matches the choice `1`; the returned value is
    /// the matching choice itself. Anything else fails with
    /// `Invalid choice: <input>` and, by default, asks again.
    pub async fn choose<I>(
        &mut self,
        message: impl Into<String>,
        choices: I,
        options: PromptOptions,
    ) -> Result<Answer, PromptError>
    where
        I: IntoIterator,
        I::Item: Into<Answer>,
    {
        let choices: Vec<Answer> = choices.into_iter().map(Into::into).collect();
        debug!(choices = choices.len(), "choose prompt");
        let options = options
            .or_trim(false)
            .prepend_validators(vec![choice_validator(choices)]);
        let request = PromptRequest::new(message, options)?;
        self.resolve(&request).await
    }

    /// Ask a yes/no question.
    ///
    /// Accepts `y`, `yes`, `1` and `n`, `no`, `0` in any case.
    pub async fn confirm(
        &mut self,
        message: impl Into<String>,
        options: PromptOptions,
    ) -> Result<bool, PromptError> {
        let options = options
            .or_trim(false)
            .prepend_validators(vec![
                boolean_validator(),
                choice_validator(vec![Answer::Bool(true), Answer::Bool(false)]),
            ]);
        let request = PromptRequest::new(message, options)?;
        let answer = self.resolve(&request).await?;

        // caller validators run after the built-ins and may replace the boolean
        answer.as_bool().ok_or_else(|| {
            PromptError::Validation(ValidationFailure::new(
                ValidationError::new(format!("Invalid choice: {}", render(&answer))),
                request,
            ))
        })
    }
}

/// Validator accepting only values loosely equal to one of `choices`.
///
/// Returns the matching choice, so `"1"` against `[1, 2, 3]` yields `1`.
pub fn choice_validator(choices: Vec<Answer>) -> Validator {
    Validator::new(move |value| {
        choices
            .iter()
            .find(|choice| loosely_equal(&value, choice))
            .cloned()
            .ok_or_else(|| ValidationError::new(format!("Invalid choice: {}", render(&value))))
    })
}

/// Validator mapping yes/no words to booleans.
///
/// Unknown values pass through untouched so a later validator can reject
/// them with the original text.
pub fn boolean_validator() -> Validator {
    Validator::new(|value| Ok(coerce_bool(&value).map(Answer::Bool).unwrap_or(value)))
}

fn coerce_bool(value: &Answer) -> Option<bool> {
    match value {
        Answer::Bool(b) => Some(*b),
        Answer::String(s) => match s.to_lowercase().as_str() {
            "y" | "yes" | "1" => Some(true),
            "n" | "no" | "0" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

/// Ask for a line of text on stdin/stdout. See [`Prompter::prompt`].
pub async fn prompt(message: impl Into<String>, options: PromptOptions) -> Result<Answer, PromptError> {
    Prompter::new(StdioReader::stdio()).prompt(message, options).await
}

/// Ask for a secret on stdin/stdout. See [`Prompter::password`].
pub async fn password(
    message: impl Into<String>,
    options: PromptOptions,
) -> Result<Answer, PromptError> {
    Prompter::new(StdioReader::stdio()).password(message, options).await
}

/// Ask for one of `choices` on stdin/stdout. See [`Prompter::choose`].
pub async fn choose<I>(
    message: impl Into<String>,
    choices: I,
    options: PromptOptions,
) -> Result<Answer, PromptError>
where
    I: IntoIterator,
    I::Item: Into<Answer>,
{
    Prompter::new(StdioReader::stdio()).choose(message, choices, options).await
}

/// Ask a yes/no question on stdin/stdout. See [`Prompter::confirm`].
pub async fn confirm(message: impl Into<String>, options: PromptOptions) -> Result<bool, PromptError> {
    Prompter::new(StdioReader::stdio()).confirm(message, options).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reader::MockLineReader;
    use serde_json::json;

    #[tokio::test]
    async fn choice_validator_returns_typed_choice() {
        let validator = choice_validator(vec![json!(1), json!(2), json!(3)]);
        assert_eq!(validator.validate(json!("1")).await.unwrap(), json!(1));
    }

    #[tokio::test]
    async fn choice_validator_rejects_with_raw_value() {
        let validator = choice_validator(vec![json!("apple"), json!("orange")]);
        let err = validator.validate(json!("bleh")).await.unwrap_err();
        assert_eq!(err.message(), "Invalid choice: bleh");
    }

    #[tokio::test]
    async fn boolean_validator_passes_unknown_values_through() {
        let validator = boolean_validator();
        assert_eq!(validator.validate(json!("YES")).await.unwrap(), json!(true));
        assert_eq!(validator.validate(json!("n")).await.unwrap(), json!(false));
        assert_eq!(validator.validate(json!(true)).await.unwrap(), json!(true));
        assert_eq!(validator.validate(json!("bleh")).await.unwrap(), json!("bleh"));
    }

    #[tokio::test]
    async fn prompt_trims_by_default() {
        let mut prompter = Prompter::new(MockLineReader::with_lines([" foo "]));
        let value = prompter.prompt("prompt: ", PromptOptions::new()).await.unwrap();
        assert_eq!(value, json!("foo"));
    }

    #[tokio::test]
    async fn non_string_default_fails_before_rendering() {
        let mut prompter = Prompter::new(MockLineReader::with_lines(["x"]));
        let err = prompter
            .prompt("prompt: ", PromptOptions::new().default_value(1))
            .await
            .unwrap_err();
        assert!(matches!(err, PromptError::Config(_)));
        assert_eq!(err.to_string(), "The default option value must be a string");
        assert!(prompter.reader().renders().is_empty());
    }

    #[tokio::test]
    async fn password_accepts_empty_input() {
        let mut prompter = Prompter::new(MockLineReader::with_lines([""]));
        let value = prompter
            .password("password: ", PromptOptions::new())
            .await
            .unwrap();
        assert_eq!(value, json!(""));
    }

    #[tokio::test]
    async fn confirm_returns_bool() {
        let mut prompter = Prompter::new(MockLineReader::with_lines(["Y"]));
        assert!(prompter.confirm("ok? ", PromptOptions::new()).await.unwrap());
    }

    #[tokio::test]
    async fn choose_timeout_default_resolves_to_typed_choice() {
        let mut prompter = Prompter::new(MockLineReader::new());
        let options = PromptOptions::new()
            .timeout(1)
            .default_value("1")
            .use_default_on_timeout(true);
        let value = prompter.choose("n? ", [1, 2, 3], options).await.unwrap();
        assert_eq!(value, json!(1));
    }

    #[tokio::test]
    async fn confirm_rejects_validator_replacing_bool() {
        let mut prompter = Prompter::new(MockLineReader::with_lines(["y"]));
        let options = PromptOptions::new().validator(Validator::new(|_| Ok(json!("maybe"))));
        let err = prompter.confirm("ok? ", options).await.unwrap_err();
        assert_eq!(err.to_string(), "Invalid choice: maybe");
    }
}
