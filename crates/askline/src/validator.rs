//! Validators and validator chains.
//!
//! A [`Validator`] inspects a candidate answer and either returns it
//! (possibly transformed) or rejects it with a [`ValidationError`].
//! Validators may be synchronous or asynchronous; both are stored as a
//! function returning a boxed future so a chain can run them uniformly.

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use futures::future::{self, BoxFuture, FutureExt};
use tracing::trace;

use crate::{Answer, ValidationError};

type ValidatorFn =
    dyn Fn(Answer) -> BoxFuture<'static, Result<Answer, ValidationError>> + Send + Sync;

/// A single step of a validator chain.
///
/// Cloning is cheap: the underlying function is reference counted.
///
/// # Example
///
/// ```
/// use askline::{Answer, ValidationError, Validator};
///
/// let not_root = Validator::new(|value: Answer| {
///     if value == "root" {
///         Err(ValidationError::new("Pick another user name"))
///     } else {
///         Ok(value)
///     }
/// });
/// # let _ = not_root;
/// ```
#[derive(Clone)]
pub struct Validator {
    func: Arc<ValidatorFn>,
}

impl Validator {
    /// Create a validator from a synchronous function.
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(Answer) -> Result<Answer, ValidationError> + Send + Sync + 'static,
    {
        Self {
            func: Arc::new(move |value| future::ready(f(value)).boxed()),
        }
    }

    /// Create a validator from an asynchronous function.
    pub fn from_async<F, Fut>(f: F) -> Self
    where
        F: Fn(Answer) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Answer, ValidationError>> + Send + 'static,
    {
        Self {
            func: Arc::new(move |value| f(value).boxed()),
        }
    }

    /// Create a validator that only checks the value.
    ///
    /// The answer passes through unchanged when `check` returns `true`,
    /// otherwise the validator fails with `message`.
    pub fn check<F>(check: F, message: impl Into<String>) -> Self
    where
        F: Fn(&Answer) -> bool + Send + Sync + 'static,
    {
        let message = message.into();
        Self::new(move |value| {
            if check(&value) {
                Ok(value)
            } else {
                Err(ValidationError::new(message.clone()))
            }
        })
    }

    /// Run the validator against a value.
    pub async fn validate(&self, value: Answer) -> Result<Answer, ValidationError> {
        (self.func)(value).await
    }
}

impl fmt::Debug for Validator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Validator").finish_non_exhaustive()
    }
}

/// Run `validators` in order, feeding each the previous output.
///
/// Stops at the first failure; later validators are not invoked.
pub async fn run_chain(validators: &[Validator], value: Answer) -> Result<Answer, ValidationError> {
    let mut value = value;
    for (step, validator) in validators.iter().enumerate() {
        trace!(step, "running validator");
        value = validator.validate(value).await?;
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    fn append(suffix: &'static str) -> Validator {
        Validator::new(move |value: Answer| {
            let text = value.as_str().unwrap_or_default();
            Ok(Answer::from(format!("{}{}", text, suffix)))
        })
    }

    #[tokio::test]
    async fn empty_chain_returns_input() {
        let result = run_chain(&[], json!("raw")).await.unwrap();
        assert_eq!(result, json!("raw"));
    }

    #[tokio::test]
    async fn chain_feeds_previous_output() {
        let chain = vec![append("-a"), append("-b")];
        let result = run_chain(&chain, json!("x")).await.unwrap();
        assert_eq!(result, json!("x-a-b"));
    }

    #[tokio::test]
    async fn chain_short_circuits_on_failure() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let chain = vec![
            Validator::check(|_| false, "nope"),
            Validator::new(move |value| {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok(value)
            }),
        ];

        let err = run_chain(&chain, json!("x")).await.unwrap_err();
        assert_eq!(err.message(), "nope");
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn async_validators_are_awaited_in_order() {
        let chain = vec![
            Validator::from_async(|value: Answer| async move {
                tokio::time::sleep(Duration::from_millis(50)).await;
                let n: i64 = value
                    .as_str()
                    .and_then(|s| s.parse().ok())
                    .ok_or_else(|| ValidationError::new("not a number"))?;
                Ok::<_, ValidationError>(Answer::from(n))
            }),
            Validator::new(|value: Answer| {
                let n = value.as_i64().unwrap_or_default();
                Ok(Answer::from(n * 2))
            }),
        ];

        let result = run_chain(&chain, json!("21")).await.unwrap();
        assert_eq!(result, json!(42));
    }

    #[tokio::test]
    async fn check_passes_value_through() {
        let validator = Validator::check(|v| v.is_string(), "must be text");
        assert_eq!(validator.validate(json!("ok")).await.unwrap(), json!("ok"));
        assert_eq!(
            validator.validate(json!(3)).await.unwrap_err().message(),
            "must be text"
        );
    }
}
