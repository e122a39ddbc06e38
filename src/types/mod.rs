//! 类型系统模块：Gemini generateContent 请求与响应信封。
//!
//! # Types Module
//!
//! Strongly-typed request and response envelopes for the `generateContent` endpoint.
//!
//! | Type | Description |
//! |------|-------------|
//! | [`GenerateContentRequest`] | Outbound envelope: one content, one text part |
//! | [`GenerateContentResponse`] | Inbound envelope, validated by [`extract_interpretation_text`] |

pub mod envelope;

pub use envelope::{
    extract_interpretation_text, parse_response, Candidate, CandidateContent, Content,
    GenerateContentRequest, GenerateContentResponse, Part, ResponsePart,
};
