use super::PromptFamily;

pub fn template(family: PromptFamily) -> &'static str {
    match family {
        PromptFamily::Easy => EASY,
        PromptFamily::Medium => MEDIUM,
        PromptFamily::Hard => HARD,
        PromptFamily::Mixed => MIXED,
        PromptFamily::AnswerAndChunks => ANSWER_AND_CHUNKS,
        PromptFamily::Hierarchical => HIERARCHICAL,
        PromptFamily::CrossPage => CROSS_PAGE,
        PromptFamily::LongEasy => LONG_EASY,
        PromptFamily::LongMedium => LONG_MEDIUM,
        PromptFamily::LongHard => LONG_HARD,
        PromptFamily::LongMixed => LONG_MIXED,
    }
}

const EASY: &str = "\
You are reading a short internal wiki page titled \"{title}\".

{content}

Write one easy, factual question a new team member could answer just by \
reading the page above. Return only the question.";

const MEDIUM: &str = "\
You are reading a wiki page titled \"{title}\".

{content}

Write one question of moderate difficulty that requires connecting two or \
more details from the page above. Return only the question.";

const HARD: &str = "\
You are reading a wiki page titled \"{title}\".

{content}

Write one hard question that requires synthesizing several parts of the \
page above and cannot be answered by quoting a single sentence. Return only \
the question.";

const MIXED: &str = "\
You are reading a wiki page titled \"{title}\".

{content}

Write one question about the page above. Vary the difficulty naturally; do \
not explain your choice. Return only the question.";

const ANSWER_AND_CHUNKS: &str = "\
You are reading a wiki page titled \"{title}\".

{content}

Answer the following question using only the page above:

{question}

Return the answer, and the exact sentences or passages from the page that \
support it.";

const HIERARCHICAL: &str = "\
You are reading a wiki page titled \"{title}\", part of this section of the \
wiki:

{hierarchy_context}

{content}

Write one question about the page above that a reader who knows the \
surrounding section would naturally ask. Return only the question.";

const CROSS_PAGE: &str = "\
You are reading several related wiki pages:

{combined_content}

Write one question whose answer requires information from more than one of \
the pages above. Return only the question.";

const LONG_EASY: &str = "\
You are reading a long internal wiki page titled \"{title}\".

{content}

Write one easy, factual question a new team member could answer just by \
reading the page above. Return only the question.";

const LONG_MEDIUM: &str = "\
You are reading a long wiki page titled \"{title}\".

{content}

Write one question of moderate difficulty that requires connecting two or \
more details scattered across the page above. Return only the question.";

const LONG_HARD: &str = "\
You are reading a long wiki page titled \"{title}\".

{content}

Write one hard question that requires synthesizing several distant parts of \
the page above and cannot be answered by quoting a single sentence. Return \
only the question.";

const LONG_MIXED: &str = "\
You are reading a long wiki page titled \"{title}\".

{content}

Write one question about the page above. Vary the difficulty naturally; do \
not explain your choice. Return only the question.";
