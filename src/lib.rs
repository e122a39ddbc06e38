//! # tarot-reader
//!
//! AI 塔羅占卜：抽出聖三角牌陣，組成提示詞，並向 Gemini 取得解牌結果。
//!
//! Draws a past / present / future tarot spread, turns it into a prompt and asks a remote
//! `generateContent` endpoint for an interpretation.
//!
//! ## Overview
//!
//! The interesting part is [`InterpretationClient`]: it posts a prompt to a primary endpoint,
//! retries transient failures with a short linear backoff, falls back to a second endpoint,
//! and reports every failure as a typed [`Error`] with an [`ErrorKind`].
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use tarot_reader::{build_prompt, Deck, InterpretationClientBuilder};
//!
//! #[tokio::main]
//! async fn main() -> tarot_reader::Result<()> {
//!     let client = InterpretationClientBuilder::from_env().build()?;
//!     let deck = Deck::bundled()?;
//!
//!     let draws = deck.draw_spread(&mut rand::thread_rng())?;
//!     let prompt = build_prompt("請問我本週的財運？", &draws, None);
//!     let reading = client.get_interpretation(&prompt).await?;
//!     println!("{}", reading);
//!
//!     client.close();
//!     Ok(())
//! }
//! ```
//!
//! ## Module Organization
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`client`] | Interpretation client, builder, retry policy |
//! | [`config`] | Environment-driven configuration |
//! | [`transport`] | Closable pooled HTTP transport |
//! | [`types`] | Request and response envelopes |
//! | [`deck`] | Card dataset and spread drawing |
//! | [`prompt`] | Question validation and prompt assembly |

pub mod client;
pub mod config;
pub mod deck;
pub mod prompt;
pub mod transport;
pub mod types;

pub use client::{Endpoint, InterpretationClient, InterpretationClientBuilder, RetryPolicy};
pub use config::ClientConfig;
pub use deck::{Card, Deck, DrawnCard, Orientation, Position};
pub use prompt::{build_prompt, validate_question, Aspect};

/// Result type alias for the library
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for the library
pub mod error;
pub use error::{Error, ErrorContext, ErrorKind};
