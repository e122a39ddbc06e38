//! 提示词校验：空白提示词在任何网络请求前即被拒绝。
//!
//! Prompt validation.

use crate::{Error, ErrorContext, Result};

/// Reject prompts that are empty or consist only of whitespace.
pub(crate) fn validate_prompt(prompt: &str) -> Result<()> {
    if prompt.trim().is_empty() {
        return Err(Error::invalid_input_with_context(
            "prompt must contain at least one non-whitespace character",
            ErrorContext::new()
                .with_field_path("prompt")
                .with_source("prompt_validator"),
        ));
    }
    Ok(())
}
