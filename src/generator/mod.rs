//! LLM-backed question/answer/chunk generation, calibrated to each page's
//! length and keyed to a configurable difficulty-distribution policy.

mod prompts;

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use rand::Rng;
use reqwest::Client;
use serde::{de::DeserializeOwned, Deserialize, Serialize};

use crate::asyncio::run_limited;
use crate::domain::config::GeneratorConfig;
use crate::domain::models::{
    AnswerSchema, Difficulty, Generation, Language, QuestionSchema, TaskResult, QA,
};
use crate::domain::ports::{GenerationStream, Generator};
use crate::error::GeneratorError;
use prompts::{render, template, PromptFamily};

const WORD_COUNT_THRESHOLDS: [usize; 4] = [500, 1000, 2000, 4000];
const MAX_STRUCTURED_ATTEMPTS: u32 = 3;

/// Drives structured-output calls against an OpenRouter-compatible chat
/// completions endpoint.
pub struct OpenRouterClient {
    http: Client,
    api_key: String,
    base_url: String,
    model: String,
    max_tokens: u32,
    temperature: f64,
}

impl OpenRouterClient {
    pub fn new(api_key: String, config: &GeneratorConfig) -> Self {
        let http = Client::builder()
            .timeout(Duration::from_secs(120))
            .build()
            .expect("failed to build LLM HTTP client");
        Self {
            http,
            api_key,
            base_url: config.base_url.clone(),
            model: config.model.clone(),
            max_tokens: config.max_tokens,
            temperature: config.temperature,
        }
    }

    async fn chat_once(
        &self,
        prompt: &str,
        schema_name: &str,
        schema: &serde_json::Value,
    ) -> Result<String, GeneratorError> {
        let request = ChatRequest {
            model: self.model.clone(),
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: prompt.to_string(),
            }],
            temperature: self.temperature,
            max_tokens: self.max_tokens,
            response_format: ResponseFormat::JsonSchema {
                json_schema: JsonSchemaSpec {
                    name: schema_name.to_string(),
                    strict: true,
                    schema: schema.clone(),
                },
            },
        };

        let url = format!("{}/chat/completions", self.base_url.trim_end_matches('/'));
        let res = self
            .http
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        if !res.status().is_success() {
            let code = res.status().as_u16();
            let message = res.text().await.unwrap_or_default();
            return Err(GeneratorError::ApiError { code, message });
        }

        let parsed: ChatResponse = res.json().await?;
        let content = parsed
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .unwrap_or_default();
        Ok(content)
    }

    /// Issues a structured-output request, retrying up to
    /// `MAX_STRUCTURED_ATTEMPTS` times when the model's response does not
    /// conform to `T`'s shape before surfacing a transport-level failure.
    async fn request_structured<T: DeserializeOwned>(
        &self,
        prompt: &str,
        schema_name: &str,
        schema: &serde_json::Value,
    ) -> Result<T, GeneratorError> {
        let mut last_reason = String::new();
        for attempt in 1..=MAX_STRUCTURED_ATTEMPTS {
            let content = self.chat_once(prompt, schema_name, schema).await?;
            match serde_json::from_str::<T>(&content) {
                Ok(value) => return Ok(value),
                Err(err) => {
                    last_reason = err.to_string();
                    tracing::warn!(attempt, error = %last_reason, "structured output did not conform, retrying");
                }
            }
        }
        Err(GeneratorError::StructuralMismatch {
            retries: MAX_STRUCTURED_ATTEMPTS,
            reason: last_reason,
        })
    }
}

#[derive(Debug, Clone, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f64,
    max_tokens: u32,
    response_format: ResponseFormat,
}

#[derive(Debug, Clone, Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ResponseFormat {
    JsonSchema { json_schema: JsonSchemaSpec },
}

#[derive(Debug, Clone, Serialize)]
struct JsonSchemaSpec {
    name: String,
    strict: bool,
    schema: serde_json::Value,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    #[serde(default)]
    content: String,
}

fn question_schema() -> serde_json::Value {
    serde_json::json!({
        "type": "object",
        "properties": { "question": { "type": "string" } },
        "required": ["question"],
        "additionalProperties": false
    })
}

fn answer_schema() -> serde_json::Value {
    serde_json::json!({
        "type": "object",
        "properties": {
            "answer": { "type": "string" },
            "chunks": { "type": "array", "items": { "type": "string" } }
        },
        "required": ["answer", "chunks"],
        "additionalProperties": false
    })
}

/// Computes how many questions to generate for a page, scaling with its word
/// count: the first threshold not exceeded by `content`'s word count selects
/// the slot, plus one so short pages still get a single question.
pub fn num_questions(content: &str) -> usize {
    let words = content.split_whitespace().count();
    let idx = WORD_COUNT_THRESHOLDS
        .iter()
        .position(|&threshold| words <= threshold)
        .unwrap_or(WORD_COUNT_THRESHOLDS.len());
    idx + 1
}

/// Draws `num_questions` independent, weighted difficulty picks: 30% easy,
/// 40% medium, 30% hard.
pub fn mixed_distribution(num_questions: usize) -> Vec<Difficulty> {
    const WEIGHTED: [(Difficulty, f64); 3] = [
        (Difficulty::Easy, 0.3),
        (Difficulty::Medium, 0.4),
        (Difficulty::Hard, 0.3),
    ];
    let mut rng = rand::thread_rng();
    (0..num_questions)
        .map(|_| {
            let roll: f64 = rng.gen();
            let mut cumulative = 0.0;
            for (difficulty, weight) in WEIGHTED {
                cumulative += weight;
                if roll < cumulative {
                    return difficulty;
                }
            }
            Difficulty::Hard
        })
        .collect()
}

/// Distributes `num_questions` as evenly as possible across
/// easy/medium/hard (counts differ by at most one), then shuffles the
/// resulting sequence. For three or fewer questions, takes a prefix of
/// `[Easy, Medium, Hard]` instead of cycling.
pub fn balanced_distribution(num_questions: usize) -> Vec<Difficulty> {
    const LEVELS: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];
    if num_questions <= LEVELS.len() {
        return LEVELS[..num_questions].to_vec();
    }
    let base = num_questions / LEVELS.len();
    let rem = num_questions % LEVELS.len();
    let mut result = Vec::with_capacity(num_questions);
    for (i, level) in LEVELS.iter().enumerate() {
        let count = base + usize::from(i < rem);
        result.extend(std::iter::repeat(*level).take(count));
    }
    use rand::seq::SliceRandom;
    result.shuffle(&mut rand::thread_rng());
    result
}

/// Groups `text`'s words into chunks of `chunk_size` words each, rejoined
/// with single spaces.
pub fn chunks(text: &str, chunk_size: usize) -> Vec<String> {
    let words: Vec<&str> = text.split_whitespace().collect();
    if words.is_empty() {
        return Vec::new();
    }
    words
        .chunks(chunk_size.max(1))
        .map(|group| group.join(" "))
        .collect()
}

pub struct LlmGenerator {
    client: OpenRouterClient,
    config: GeneratorConfig,
}

impl LlmGenerator {
    pub fn new(client: OpenRouterClient, config: GeneratorConfig) -> Self {
        Self { client, config }
    }

    fn difficulties_for(&self, result: &TaskResult, n: usize) -> Vec<Difficulty> {
        match result.difficulty {
            Difficulty::Mixed => mixed_distribution(n),
            Difficulty::Balanced => balanced_distribution(n),
            other => std::iter::repeat(other).take(n).collect(),
        }
    }

    async fn ask_question(
        &self,
        result: &TaskResult,
        difficulty: Difficulty,
    ) -> Result<QuestionSchema, GeneratorError> {
        let family = PromptFamily::for_difficulty(difficulty, self.config.is_short);
        let prompt = render(
            template(result.language, family),
            &result.title,
            &result.content,
            None,
            None,
            None,
        );
        self.client
            .request_structured(&prompt, "question", &question_schema())
            .await
    }

    async fn ask_answer(
        &self,
        result: &TaskResult,
        question: &str,
    ) -> Result<AnswerSchema, GeneratorError> {
        let prompt = render(
            template(result.language, PromptFamily::AnswerAndChunks),
            &result.title,
            &result.content,
            Some(question),
            None,
            None,
        );
        self.client
            .request_structured(&prompt, "answer", &answer_schema())
            .await
    }
}

#[async_trait]
impl Generator for LlmGenerator {
    async fn generate(&self, result: &TaskResult) -> Result<Option<Generation>, GeneratorError> {
        let n = num_questions(&result.content);
        let difficulties = self.difficulties_for(result, n);

        let question_futures: Vec<_> = difficulties
            .iter()
            .map(|&difficulty| self.ask_question(result, difficulty))
            .collect();
        let question_results = run_limited(question_futures, self.config.concurrency).await;
        let questions: Vec<String> = question_results
            .into_iter()
            .filter_map(|r| match r {
                Ok(q) => Some(q.question),
                Err(err) => {
                    tracing::warn!(error = %err, "question request failed, dropping slot");
                    None
                }
            })
            .collect();

        if questions.is_empty() {
            return Ok(None);
        }

        let answer_futures: Vec<_> = questions
            .iter()
            .map(|question| self.ask_answer(result, question))
            .collect();
        let answer_results = run_limited(answer_futures, self.config.concurrency).await;

        let qas: Vec<QA> = questions
            .into_iter()
            .zip(answer_results)
            .filter_map(|(question, answer)| match answer {
                Ok(answer) if !answer.chunks.is_empty() => Some(QA {
                    question,
                    answer: answer.answer,
                    chunks: answer.chunks,
                }),
                Ok(_) => None,
                Err(err) => {
                    tracing::warn!(error = %err, "answer request failed, dropping question");
                    None
                }
            })
            .collect();

        if qas.is_empty() {
            return Ok(None);
        }

        Ok(Some(Generation {
            question_answers: qas,
            references: vec![result.clone()],
            language: result.language,
        }))
    }

    async fn generate_from_batch(
        &self,
        results: &[TaskResult],
    ) -> Result<GenerationStream<'_>, GeneratorError> {
        let mut groups: HashMap<Language, Vec<&TaskResult>> = HashMap::new();
        for result in results {
            groups.entry(result.language).or_default().push(result);
        }

        let mut generations = Vec::new();
        for (language, group) in groups {
            let combined_content = group
                .iter()
                .map(|r| format!("Document {}: {}", r.title, r.content))
                .collect::<Vec<_>>()
                .join("\n\n");

            let prompt = render(
                template(language, PromptFamily::CrossPage),
                "",
                "",
                None,
                Some(&combined_content),
                None,
            );
            let question: QuestionSchema = match self
                .client
                .request_structured(&prompt, "question", &question_schema())
                .await
            {
                Ok(q) => q,
                Err(err) => {
                    tracing::warn!(error = %err, "cross-page question request failed, skipping group");
                    continue;
                }
            };

            let answer_prompt = render(
                template(language, PromptFamily::AnswerAndChunks),
                "",
                &combined_content,
                Some(&question.question),
                None,
                None,
            );
            let answer: AnswerSchema = match self
                .client
                .request_structured(&answer_prompt, "answer", &answer_schema())
                .await
            {
                Ok(a) => a,
                Err(err) => {
                    tracing::warn!(error = %err, "cross-page answer request failed, skipping group");
                    continue;
                }
            };

            if answer.chunks.is_empty() {
                continue;
            }

            generations.push(Generation {
                question_answers: vec![QA {
                    question: question.question,
                    answer: answer.answer,
                    chunks: answer.chunks,
                }],
                references: group.into_iter().cloned().collect(),
                language,
            });
        }

        Ok(Box::pin(tokio_stream::iter(generations)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn num_questions_scales_with_word_count() {
        assert_eq!(num_questions(&"word ".repeat(100)), 1);
        assert_eq!(num_questions(&"word ".repeat(600)), 2);
        assert_eq!(num_questions(&"word ".repeat(1500)), 3);
        assert_eq!(num_questions(&"word ".repeat(3000)), 4);
        assert_eq!(num_questions(&"word ".repeat(5000)), 5);
    }

    #[test]
    fn balanced_distribution_is_a_prefix_for_small_counts() {
        assert_eq!(balanced_distribution(1), vec![Difficulty::Easy]);
        assert_eq!(
            balanced_distribution(2),
            vec![Difficulty::Easy, Difficulty::Medium]
        );
        assert_eq!(
            balanced_distribution(3),
            vec![Difficulty::Easy, Difficulty::Medium, Difficulty::Hard]
        );
    }

    #[test]
    fn balanced_distribution_counts_differ_by_at_most_one() {
        let dist = balanced_distribution(10);
        assert_eq!(dist.len(), 10);
        let easy = dist.iter().filter(|d| **d == Difficulty::Easy).count();
        let medium = dist.iter().filter(|d| **d == Difficulty::Medium).count();
        let hard = dist.iter().filter(|d| **d == Difficulty::Hard).count();
        let counts = [easy, medium, hard];
        assert_eq!(easy + medium + hard, 10);
        assert!(counts.iter().max().unwrap() - counts.iter().min().unwrap() <= 1);
    }

    #[test]
    fn mixed_distribution_yields_requested_count() {
        let dist = mixed_distribution(50);
        assert_eq!(dist.len(), 50);
    }

    #[test]
    fn chunks_groups_words_by_size() {
        let text = "one two three four five";
        let grouped = chunks(text, 2);
        assert_eq!(grouped, vec!["one two", "three four", "five"]);
    }

    #[test]
    fn chunks_of_empty_text_is_empty() {
        assert!(chunks("", 1000).is_empty());
    }

    #[test]
    fn easy_medium_hard_mixed_short_slots_are_bound_without_the_historical_typo() {
        for difficulty in [
            Difficulty::Easy,
            Difficulty::Medium,
            Difficulty::Hard,
            Difficulty::Mixed,
        ] {
            let family = PromptFamily::for_difficulty(difficulty, true);
            let text = template(Language::En, family);
            assert!(!text.is_empty());
        }
    }
}
