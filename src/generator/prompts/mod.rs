//! Prompt catalogue: one template per (language, family). Templates carry
//! `{title}`, `{content}`, `{question}`, `{combined_content}`, and
//! `{hierarchy_context}` placeholders, filled in by the caller.

mod de;
mod en;

use crate::domain::models::{Difficulty, Language};

/// A named template slot in the catalogue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PromptFamily {
    Easy,
    Medium,
    Hard,
    Mixed,
    AnswerAndChunks,
    Hierarchical,
    CrossPage,
    LongEasy,
    LongMedium,
    LongHard,
    LongMixed,
}

impl PromptFamily {
    /// The family used to generate a single question at the given
    /// difficulty, picking the short- or long-form slot consistently (no
    /// family is ever left unbound for a given `is_short`/difficulty pair).
    pub fn for_difficulty(difficulty: Difficulty, is_short: bool) -> Self {
        use Difficulty::*;
        match (difficulty, is_short) {
            (Easy, true) => PromptFamily::Easy,
            (Easy, false) => PromptFamily::LongEasy,
            (Medium, true) => PromptFamily::Medium,
            (Medium, false) => PromptFamily::LongMedium,
            (Hard, true) => PromptFamily::Hard,
            (Hard, false) => PromptFamily::LongHard,
            (Mixed, true) => PromptFamily::Mixed,
            (Mixed, false) => PromptFamily::LongMixed,
            // Balanced draws its per-question difficulty from the mixed
            // levels and never reaches this slot directly; fall back to the
            // mixed family so a caller is never left without a template.
            (Balanced, true) => PromptFamily::Mixed,
            (Balanced, false) => PromptFamily::LongMixed,
        }
    }
}

/// Looks up the template text for `family` in `language`.
pub fn template(language: Language, family: PromptFamily) -> &'static str {
    match language {
        Language::En => en::template(family),
        Language::De => de::template(family),
    }
}

/// Substitutes `{title}`/`{content}`/`{question}`/`{combined_content}`/
/// `{hierarchy_context}` placeholders present in `template`.
pub fn render(
    template: &str,
    title: &str,
    content: &str,
    question: Option<&str>,
    combined_content: Option<&str>,
    hierarchy_context: Option<&str>,
) -> String {
    let mut out = template
        .replace("{title}", title)
        .replace("{content}", content);
    if let Some(q) = question {
        out = out.replace("{question}", q);
    }
    if let Some(c) = combined_content {
        out = out.replace("{combined_content}", c);
    }
    if let Some(h) = hierarchy_context {
        out = out.replace("{hierarchy_context}", h);
    }
    out
}
