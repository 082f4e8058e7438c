//! Prompt/response bridge
//!
//! Each operation builds one prompt, sends it to the text-generation
//! service and hands back the response text untouched. The only local
//! logic is the cheap pre-check in [`VerseBridge::check_reference`].

use crate::llm::{LlmError, LlmRequest, LlmService};
use crate::prompts;
use std::sync::Arc;

/// How a reference was judged by the plausibility check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Plausibility {
    /// Rejected locally: no colon and no digit. No remote call was made.
    Rejected,
    /// The service answered; `true` when the answer contained "yes".
    Remote(bool),
    /// The service call failed; `true` when the reference has a colon.
    Fallback(bool),
}

impl Plausibility {
    pub fn is_valid(self) -> bool {
        match self {
            Self::Rejected => false,
            Self::Remote(valid) | Self::Fallback(valid) => valid,
        }
    }
}

/// First code point of each block of ten decimal digits (general category
/// Nd) outside ASCII.
const DECIMAL_ZEROS: &[u32] = &[
    0x0660, 0x06F0, 0x07C0, 0x0966, 0x09E6, 0x0A66, 0x0AE6, 0x0B66, 0x0BE6, 0x0C66, 0x0CE6,
    0x0D66, 0x0DE6, 0x0E50, 0x0ED0, 0x0F20, 0x1040, 0x1090, 0x17E0, 0x1810, 0x1946, 0x19D0,
    0x1A80, 0x1A90, 0x1B50, 0x1BB0, 0x1C40, 0x1C50, 0xA620, 0xA8D0, 0xA900, 0xA9D0, 0xA9F0,
    0xAA50, 0xABF0, 0xFF10, 0x104A0, 0x10D30, 0x11066, 0x110F0, 0x11136, 0x111D0, 0x112F0,
    0x11450, 0x114D0, 0x11650, 0x116C0, 0x11730, 0x118E0, 0x11950, 0x11C50, 0x11D50, 0x11DA0,
    0x11F50, 0x16A60, 0x16AC0, 0x16B50, 0x1E140, 0x1E2F0, 0x1E4F0, 0x1E950, 0x1FBF0,
];

/// Digit forms that are not decimal digits but still have a digit value:
/// superscripts, subscripts, circled and parenthesized digits and the like.
/// Roman numerals and vulgar fractions have no digit value.
const DIGIT_RANGES: &[(u32, u32)] = &[
    (0x00B2, 0x00B3),
    (0x00B9, 0x00B9),
    (0x1369, 0x1371),
    (0x2070, 0x2070),
    (0x2074, 0x2079),
    (0x2080, 0x2089),
    (0x2460, 0x2468),
    (0x2474, 0x247C),
    (0x2488, 0x2490),
    (0x24EA, 0x24EA),
    (0x24F5, 0x24FD),
    (0x24FF, 0x24FF),
    (0x2776, 0x277E),
    (0x2780, 0x2788),
    (0x278A, 0x2792),
    (0x1D7CE, 0x1D7FF),
    (0x1F100, 0x1F10A),
];

/// Whether `c` has a digit value: decimal digits in any script plus
/// superscript/circled forms. Letter-like numerals (`Ⅱ`) and fractions
/// (`½`) are not digits.
pub fn is_digit(c: char) -> bool {
    if c.is_ascii_digit() {
        return true;
    }
    if c.is_ascii() || !c.is_numeric() {
        return false;
    }
    let cp = u32::from(c);
    DECIMAL_ZEROS.iter().any(|&zero| (zero..zero + 10).contains(&cp))
        || DIGIT_RANGES
            .iter()
            .any(|&(lo, hi)| (lo..=hi).contains(&cp))
}

/// Cheap local gate: anything without a colon or a digit cannot be a
/// chapter/verse reference.
pub fn passes_precheck(reference: &str) -> bool {
    reference.contains(':') || reference.chars().any(is_digit)
}

pub struct VerseBridge {
    llm: Arc<dyn LlmService>,
}

impl VerseBridge {
    pub fn new(llm: Arc<dyn LlmService>) -> Self {
        Self { llm }
    }

    pub fn model_id(&self) -> &str {
        self.llm.model_id()
    }

    async fn ask(&self, prompt: String) -> Result<String, LlmError> {
        let response = self.llm.complete(&LlmRequest::new(prompt)).await?;
        Ok(response.text)
    }

    /// Fetch the text of a passage. The reference is not validated here.
    pub async fn get_verse_text(&self, reference: &str) -> Result<String, LlmError> {
        self.ask(prompts::verse_text_prompt(reference)).await
    }

    pub async fn verse_explain(&self, verse_text: &str) -> Result<String, LlmError> {
        self.ask(prompts::explanation_prompt(verse_text)).await
    }

    /// Judge a user's explanation. The verdict is free text; it is usually
    /// "True" or "False" but is never parsed.
    pub async fn truth_finder(
        &self,
        verse_text: &str,
        user_explanation: &str,
    ) -> Result<String, LlmError> {
        self.ask(prompts::truth_prompt(verse_text, user_explanation))
            .await
    }

    pub async fn check_reference(&self, reference: &str) -> Plausibility {
        if !passes_precheck(reference) {
            return Plausibility::Rejected;
        }

        match self.ask(prompts::plausibility_prompt(reference)).await {
            Ok(answer) => Plausibility::Remote(answer.to_lowercase().contains("yes")),
            Err(e) => {
                let valid = reference.contains(':');
                tracing::warn!(
                    error = %e,
                    kind = e.kind.as_str(),
                    valid,
                    "Plausibility check failed, using colon heuristic"
                );
                Plausibility::Fallback(valid)
            }
        }
    }

    pub async fn is_bible_verse(&self, reference: &str) -> bool {
        self.check_reference(reference).await.is_valid()
    }
}
