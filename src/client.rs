//! Interpretation client.
//!
//! Keep the public surface small: build a client, ask for interpretations, close it.
//! Implementation details are split into submodules under `src/client/`.

pub mod builder;
pub mod core;
pub mod endpoint;
mod execution;
mod policy;
mod validation;

pub use builder::InterpretationClientBuilder;
pub use self::core::InterpretationClient;
pub use endpoint::Endpoint;
pub use policy::RetryPolicy;
