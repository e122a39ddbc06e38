//! 提示词组装：把问题与抽牌结果组成完整的解牌提示词。
//!
//! Prompt assembly for a reading. The interpretation client receives the result verbatim.

use crate::deck::DrawnCard;
use crate::{Error, ErrorContext, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt::Write as _;
use std::str::FromStr;

pub const MIN_QUESTION_CHARS: usize = 5;
pub const MAX_QUESTION_CHARS: usize = 100;

static MEANINGFUL: Lazy<Regex> = Lazy::new(|| Regex::new(r"[\p{L}\p{N}]").expect("valid regex"));

/// Focus of a reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Aspect {
    Love,
    Career,
    Wealth,
    Relationships,
    Growth,
}

impl Aspect {
    pub const ALL: [Aspect; 5] = [
        Aspect::Love,
        Aspect::Career,
        Aspect::Wealth,
        Aspect::Relationships,
        Aspect::Growth,
    ];

    pub fn key(self) -> &'static str {
        match self {
            Aspect::Love => "love",
            Aspect::Career => "career",
            Aspect::Wealth => "wealth",
            Aspect::Relationships => "relationships",
            Aspect::Growth => "growth",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Aspect::Love => "感情",
            Aspect::Career => "事業",
            Aspect::Wealth => "財運",
            Aspect::Relationships => "人際",
            Aspect::Growth => "自我成長",
        }
    }
}

impl FromStr for Aspect {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().to_lowercase();
        Aspect::ALL
            .into_iter()
            .find(|a| a.key() == wanted || a.label() == wanted)
            .ok_or_else(|| {
                Error::invalid_input_with_context(
                    format!("不支援的占卜分類：{}", s),
                    ErrorContext::new()
                        .with_field_path("aspect")
                        .with_details(
                            Aspect::ALL
                                .iter()
                                .map(|a| a.key())
                                .collect::<Vec<_>>()
                                .join(", "),
                        )
                        .with_source("aspect_parser"),
                )
            })
    }
}

/// Check a user question and return it trimmed.
///
/// The question must be 5 to 100 characters and contain at least one letter or digit.
pub fn validate_question(question: &str) -> Result<&str> {
    let trimmed = question.trim();
    let chars = trimmed.chars().count();
    let reject = |msg: &str| {
        Error::invalid_input_with_context(
            msg,
            ErrorContext::new()
                .with_field_path("question")
                .with_source("question_validator"),
        )
    };

    if chars < MIN_QUESTION_CHARS {
        return Err(reject("問題至少需要 5 個字。"));
    }
    if chars > MAX_QUESTION_CHARS {
        return Err(reject("問題最多 100 個字。"));
    }
    if !MEANINGFUL.is_match(trimmed) {
        return Err(reject("請輸入具體問題，避免僅使用符號。"));
    }
    Ok(trimmed)
}

/// Build the reading prompt for a question and its drawn cards.
pub fn build_prompt(question: &str, draws: &[DrawnCard], aspect: Option<Aspect>) -> String {
    let mut out = String::new();
    out.push_str("你是一位專業的塔羅占卜師，擁有豐富的牌義解讀經驗。\n");
    out.push_str("請根據以下聖三角牌陣（過去—現在—未來）的抽牌結果，為用戶提供深入且具有洞察力的解讀。\n\n");
    let _ = writeln!(out, "用戶的問題：「{}」", question);
    if let Some(aspect) = aspect {
        let _ = writeln!(out, "占卜面向：{}", aspect.label());
    }
    out.push_str("\n--- 抽牌結果 ---\n\n");

    let sections: Vec<String> = draws.iter().map(|d| format_card(d, aspect)).collect();
    out.push_str(&sections.join("\n\n"));

    out.push_str("\n\n--- 解讀要求 ---\n\n");
    out.push_str("請嚴格依照以下標題與順序輸出：\n");
    out.push_str("### 全局概述\n");
    for d in draws {
        let _ = writeln!(out, "### 分項解析（{}）", d.position);
    }
    out.push_str("### 行動建議\n\n");
    out.push_str("規則：\n");
    out.push_str("- 每一段都要呼應用戶問題中的關鍵詞。\n");
    out.push_str("- 「行動建議」請提供 2-3 條、可立即執行、具體可操作的建議。\n");
    out.push_str("- 不可省略任何段落標題。\n\n");
    out.push_str("語氣要求：溫暖而專業，既有神秘感又具備實用性。請結合牌面細節給出有針對性的解讀。\n");
    out.push_str("請使用繁體中文回答。");
    out
}

fn format_card(drawn: &DrawnCard, aspect: Option<Aspect>) -> String {
    let meaning = drawn.meaning();
    let mut out = String::new();
    let _ = write!(
        out,
        "【{}】{}（{}）",
        drawn.position, drawn.card.name, drawn.orientation
    );
    if let Some(element) = &drawn.card.element {
        let _ = write!(out, "\n  元素：{}", element);
    }
    let _ = write!(out, "\n  核心牌義：{}", meaning.core);

    let aspect_line = match aspect {
        Some(Aspect::Love) => meaning.love.as_deref().map(|m| ("感情牌義".to_string(), m)),
        Some(Aspect::Career) => meaning.career.as_deref().map(|m| ("事業牌義".to_string(), m)),
        Some(other) => Some((format!("{}參考牌義", other.label()), meaning.core.as_str())),
        None => None,
    };
    if let Some((label, text)) = aspect_line {
        let _ = write!(out, "\n  {}：{}", label, text);
    }
    if let Some(advice) = &meaning.action_advice {
        let _ = write!(out, "\n  行動建議：{}", advice);
    }
    out
}
