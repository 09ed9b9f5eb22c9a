//! Single-question interactive prompts.
//!
//! `askline` asks the user one question and resolves to a value: it reads a
//! line, trims it, substitutes a default for empty input, counts down an
//! optional timeout, and runs the answer through a chain of validators that
//! may transform or reject it.
//!
//! # Quick Start
//!
//! ```no_run
//! use askline::{PromptOptions, Validator, ValidationError};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), askline::PromptError> {
//! let name = askline::prompt("Name: ", PromptOptions::new()).await?;
//!
//! let port = askline::prompt(
//!     "Port [8080]: ",
//!     PromptOptions::new().default_value("8080").validator(Validator::new(|v| {
//!         v.as_str()
//!             .and_then(|s| s.parse::<u16>().ok())
//!             .map(Into::into)
//!             .ok_or_else(|| ValidationError::new("Port must be a number"))
//!     })),
//! )
//! .await?;
//!
//! let fruit = askline::choose("Apple or orange? ", ["apple", "orange"], PromptOptions::new()).await?;
//! let sure = askline::confirm("Continue in {timeout}s? ", PromptOptions::new()
//!     .timeout(10)
//!     .default_value("n")
//!     .use_default_on_timeout(true)).await?;
//! # let _ = (name, port, fruit, sure);
//! # Ok(())
//! # }
//! ```
//!
//! # Architecture
//!
//! ```text
//! prompt / password / choose / confirm     option defaults + built-in validators
//!          │
//!          ▼
//!       resolve                            read, trim, default, validate, retry
//!          │
//!          ▼
//!     LineReader                           StreamReader (stdio) or MockLineReader
//! ```
//!
//! # Testing
//!
//! Every entry point has a [`Prompter`] counterpart that takes any
//! [`LineReader`](reader::LineReader), so prompts can be driven by a script:
//!
//! ```
//! use askline::{reader::MockLineReader, PromptOptions, Prompter};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let mut prompter = Prompter::new(MockLineReader::with_lines(["", "Ada"]));
//! let name = prompter.prompt("Name: ", PromptOptions::new()).await.unwrap();
//!
//! assert_eq!(name, "Ada");
//! assert_eq!(prompter.reader().renders().len(), 2);
//! # }
//! ```

mod error;
mod prompts;
pub mod reader;
mod request;
mod resolver;
mod validator;
pub mod value;

pub use error::{PromptError, ValidationError, ValidationFailure};
pub use prompts::{
    boolean_validator, choice_validator, choose, confirm, password, prompt, Prompter,
};
pub use request::{PromptOptions, PromptRequest, DEFAULT_TICK, TIMEOUT_PLACEHOLDER};
pub use resolver::resolve;
pub use validator::{run_chain, Validator};

/// A resolved answer.
///
/// Raw input is always a string; validators may turn it into a number, a
/// boolean or any other JSON value.
pub type Answer = serde_json::Value;
