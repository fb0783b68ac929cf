//! Integration tests for the LLM generator.
//!
//! These tests make real API calls to OpenRouter.
//! Run with: OPENROUTER_API_KEY=your_key cargo test --test llm_integration -- --ignored

use docslurp::domain::config::GeneratorConfig;
use docslurp::domain::models::{Difficulty, Language, TaskResult};
use docslurp::domain::ports::Generator;
use docslurp::generator::{LlmGenerator, OpenRouterClient};

fn get_test_api_key() -> String {
    std::env::var("OPENROUTER_API_KEY")
        .expect("OPENROUTER_API_KEY environment variable must be set for integration tests")
}

fn test_config() -> GeneratorConfig {
    GeneratorConfig {
        model: "google/gemini-2.5-flash-preview-05-20".into(),
        language: "en".into(),
        max_tokens: 512,
        temperature: 0.0,
        base_url: "https://openrouter.ai/api/v1".into(),
        difficulty_ratio: "easy".into(),
        concurrency: 2,
        is_short: true,
        batch_size: 1,
        enabled: true,
        disabled: false,
    }
}

fn create_test_generator() -> LlmGenerator {
    let config = test_config();
    let client = OpenRouterClient::new(get_test_api_key(), &config);
    LlmGenerator::new(client, config)
}

fn sample_result() -> TaskResult {
    TaskResult {
        title: "Vacation policy".into(),
        url: "123".into(),
        status_code: 200,
        headers: Default::default(),
        content: "Employees accrue two days of paid leave per month, capped at 30 days. \
                   Unused leave carries over into the next calendar year but expires after \
                   24 months of accrual."
            .into(),
        hash: "deadbeef".into(),
        language: Language::En,
        difficulty: Difficulty::Easy,
        temperature: 0.0,
    }
}

#[tokio::test]
#[ignore] // Run with: cargo test --test llm_integration -- --ignored
async fn generates_a_grounded_question_answer_pair() {
    let generator = create_test_generator();
    let result = sample_result();

    let generation = generator
        .generate(&result)
        .await
        .expect("generation request failed")
        .expect("expected at least one question/answer pair");

    assert!(!generation.question_answers.is_empty());
    for qa in &generation.question_answers {
        assert!(!qa.question.is_empty());
        assert!(!qa.answer.is_empty());
        assert!(!qa.chunks.is_empty());
    }
}

#[tokio::test]
#[ignore]
async fn generates_a_cross_page_question_from_a_batch() {
    let generator = create_test_generator();
    let first = sample_result();
    let mut second = sample_result();
    second.title = "Sick leave policy".into();
    second.url = "456".into();
    second.content = "Sick leave is unlimited but requires a doctor's note after three \
                        consecutive days of absence."
        .into();

    let mut stream = generator
        .generate_from_batch(&[first, second])
        .await
        .expect("batch generation request failed");

    use futures::stream::StreamExt;
    let mut generations = Vec::new();
    while let Some(generation) = stream.next().await {
        generations.push(generation);
    }
    assert!(!generations.is_empty());
}
