//! Prompt options and validated requests.
//!
//! [`PromptOptions`] is what callers build: every field is optional so each
//! prompt flavour can fill in its own defaults. [`PromptRequest`] is the
//! checked, fully-populated form the resolver consumes.

use std::time::Duration;

use tracing::debug;

use crate::error::NON_STRING_DEFAULT;
use crate::{Answer, PromptError, Validator};

/// Length of one countdown tick.
pub const DEFAULT_TICK: Duration = Duration::from_secs(1);

/// Placeholder replaced by the remaining seconds while a timeout runs.
pub const TIMEOUT_PLACEHOLDER: &str = "{timeout}";

/// Caller-facing prompt configuration.
///
/// Unset fields take the defaults of the prompt flavour they are passed to:
///
/// | field           | `prompt` | `password` | `choose` / `confirm` |
/// |-----------------|----------|------------|----------------------|
/// | `trim`          | `true`   | `false`    | `false`              |
/// | `retry`         | `true`   | `true`     | `true`               |
/// | `silent`        | `false`  | `true`     | `false`              |
/// | `default_value` | none     | `""`       | none                 |
///
/// # Example
///
/// ```
/// use askline::PromptOptions;
///
/// let options = PromptOptions::new()
///     .default_value("main")
///     .timeout(10)
///     .use_default_on_timeout(true);
/// # let _ = options;
/// ```
#[derive(Debug, Clone, Default)]
pub struct PromptOptions {
    pub(crate) default: Option<Answer>,
    pub(crate) trim: Option<bool>,
    pub(crate) retry: Option<bool>,
    pub(crate) silent: Option<bool>,
    pub(crate) replace: Option<String>,
    pub(crate) timeout: Option<u64>,
    pub(crate) use_default_on_timeout: bool,
    pub(crate) validators: Vec<Validator>,
    pub(crate) tick: Option<Duration>,
}

impl PromptOptions {
    /// Create empty options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Value used when the user enters nothing.
    ///
    /// Must be a string; anything else makes the prompt fail with a
    /// configuration error before it is shown.
    pub fn default_value(mut self, value: impl Into<Answer>) -> Self {
        self.default = Some(value.into());
        self
    }

    /// Strip surrounding whitespace from the input.
    pub fn trim(mut self, trim: bool) -> Self {
        self.trim = Some(trim);
        self
    }

    /// Re-prompt when a validator rejects the input.
    pub fn retry(mut self, retry: bool) -> Self {
        self.retry = Some(retry);
        self
    }

    /// Do not echo typed characters.
    pub fn silent(mut self, silent: bool) -> Self {
        self.silent = Some(silent);
        self
    }

    /// In silent mode, echo this string once per typed character.
    pub fn replace(mut self, mask: impl Into<String>) -> Self {
        self.replace = Some(mask.into());
        self
    }

    /// Give up after this many seconds without input.
    ///
    /// The message may contain `{timeout}`, which is replaced by the
    /// remaining seconds and redrawn every tick. Zero disables the timeout.
    pub fn timeout(mut self, seconds: u64) -> Self {
        self.timeout = Some(seconds);
        self
    }

    /// Resolve to the default instead of failing when the timeout expires.
    pub fn use_default_on_timeout(mut self, enabled: bool) -> Self {
        self.use_default_on_timeout = enabled;
        self
    }

    /// Append a validator to the chain.
    pub fn validator(mut self, validator: Validator) -> Self {
        self.validators.push(validator);
        self
    }

    /// Append several validators to the chain, in order.
    pub fn validators(mut self, validators: impl IntoIterator<Item = Validator>) -> Self {
        self.validators.extend(validators);
        self
    }

    /// Override the countdown tick length. Defaults to one second.
    pub fn tick(mut self, tick: Duration) -> Self {
        self.tick = Some(tick);
        self
    }

    pub(crate) fn or_trim(mut self, trim: bool) -> Self {
        self.trim.get_or_insert(trim);
        self
    }

    pub(crate) fn or_silent(mut self, silent: bool) -> Self {
        self.silent.get_or_insert(silent);
        self
    }

    pub(crate) fn or_default(mut self, value: impl Into<Answer>) -> Self {
        self.default.get_or_insert_with(|| value.into());
        self
    }

    /// Put `validators` ahead of the caller's own.
    pub(crate) fn prepend_validators(mut self, validators: Vec<Validator>) -> Self {
        let own = std::mem::replace(&mut self.validators, validators);
        self.validators.extend(own);
        self
    }
}

/// A validated prompt, ready to resolve.
///
/// Requests are cheap to clone, which is how a failed request is handed
/// back to the caller for a later retry.
#[derive(Debug, Clone)]
pub struct PromptRequest {
    message: String,
    default: Option<String>,
    trim: bool,
    retry: bool,
    silent: bool,
    replace: Option<String>,
    timeout: Option<u64>,
    use_default_on_timeout: bool,
    validators: Vec<Validator>,
    tick: Duration,
}

impl PromptRequest {
    /// Build a request from options.
    ///
    /// Unset `trim`, `retry` and `silent` fall back to `true`, `true` and
    /// `false`. Fails with [`PromptError::Config`] when the default is not a
    /// string.
    pub fn new(message: impl Into<String>, options: PromptOptions) -> Result<Self, PromptError> {
        let PromptOptions {
            default,
            trim,
            retry,
            silent,
            replace,
            timeout,
            use_default_on_timeout,
            validators,
            tick,
        } = options;

        let default = match default {
            None => None,
            Some(Answer::String(s)) => Some(s),
            Some(other) => {
                debug!(default = %other, "rejecting non-string default");
                return Err(PromptError::config(NON_STRING_DEFAULT));
            }
        };

        Ok(Self {
            message: message.into(),
            default,
            trim: trim.unwrap_or(true),
            retry: retry.unwrap_or(true),
            silent: silent.unwrap_or(false),
            replace,
            timeout: timeout.filter(|&secs| secs > 0),
            use_default_on_timeout,
            validators,
            tick: tick.unwrap_or(DEFAULT_TICK),
        })
    }

    /// The message as written, placeholder included.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// The message as displayed with `remaining` seconds left.
    pub fn render(&self, remaining: Option<u64>) -> String {
        match remaining {
            Some(secs) => self
                .message
                .replace(TIMEOUT_PLACEHOLDER, &secs.to_string()),
            None => self.message.clone(),
        }
    }

    pub fn default_value(&self) -> Option<&str> {
        self.default.as_deref()
    }

    pub fn trim(&self) -> bool {
        self.trim
    }

    pub fn retry(&self) -> bool {
        self.retry
    }

    pub fn silent(&self) -> bool {
        self.silent
    }

    pub fn replace(&self) -> Option<&str> {
        self.replace.as_deref()
    }

    /// Countdown length in seconds, if any.
    pub fn timeout(&self) -> Option<u64> {
        self.timeout
    }

    pub fn use_default_on_timeout(&self) -> bool {
        self.use_default_on_timeout
    }

    pub fn validators(&self) -> &[Validator] {
        &self.validators
    }

    pub fn tick(&self) -> Duration {
        self.tick
    }
}
