//! Ticket-status summarization via chat completion.
//!
//! One call per detected change: a fixed prompt pair asking, in Chinese,
//! whether and when tickets go on sale. The answer comes back annotated
//! with token usage and an estimated cost so every paid call is visible
//! in the delivered message.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use openai_client::{ChatRequest, Message, OpenAIClient, Usage};
use tracing::{debug, warn};

use crate::error::SummarizeError;

/// Cost per million input tokens, USD.
const INPUT_COST_PER_MTOK: f64 = 1.10;

/// Cost per million output tokens, USD.
const OUTPUT_COST_PER_MTOK: f64 = 4.40;

/// Output-token ceiling for one summarization call.
const MAX_COMPLETION_TOKENS: u32 = 1000;

/// System prompt fixing the assistant's role and response language.
pub const SYSTEM_PROMPT: &str = "你是一個判定售票資訊的中文助手。請用簡潔的中文回答。";

/// User prompt template; `{page_text}` is replaced with the page's
/// visible text.
pub const USER_PROMPT_TEMPLATE: &str = r#"這是一個售票網站的網站文字。我目標是要買日本2026 F1賽道的票。
請問有什麼票務資訊？
請簡潔用中文回答，只需要跟購票相關資訊就好。
尤其是「是否/何時開賣」
或是「網頁已不再明確提供售票資訊請盡早檢查網址」
{page_text}"#;

/// Render the user prompt for one page's visible text.
pub fn format_user_prompt(page_text: &str) -> String {
    USER_PROMPT_TEMPLATE.replace("{page_text}", page_text)
}

/// Estimated cost in USD for one call's token usage.
pub fn estimated_cost(input_tokens: u32, output_tokens: u32) -> f64 {
    input_tokens as f64 * INPUT_COST_PER_MTOK / 1e6
        + output_tokens as f64 * OUTPUT_COST_PER_MTOK / 1e6
}

/// A cost-annotated summarization answer.
///
/// Constructed fresh on every summarizer invocation, never cached.
#[derive(Debug, Clone)]
pub struct SummaryResult {
    /// The model's answer, trimmed.
    pub text: String,

    /// Tokens in the prompt.
    pub input_tokens: u32,

    /// Tokens in the completion.
    pub output_tokens: u32,

    /// Total tokens billed.
    pub total_tokens: u32,

    /// Estimated cost in USD for this call.
    pub estimated_cost_usd: f64,

    /// When the summary was produced.
    pub created_at: DateTime<Utc>,
}

impl SummaryResult {
    /// Build a result from answer text and usage counters.
    pub fn new(text: impl Into<String>, usage: &Usage) -> Self {
        Self {
            text: text.into(),
            input_tokens: usage.prompt_tokens,
            output_tokens: usage.completion_tokens,
            total_tokens: usage.total_tokens,
            estimated_cost_usd: estimated_cost(usage.prompt_tokens, usage.completion_tokens),
            created_at: Utc::now(),
        }
    }

    /// Final message text: the answer with token-usage and cost lines
    /// appended.
    pub fn notification_text(&self) -> String {
        format!(
            "{}\n🔢 token 使用：輸入 {}、輸出 {}\n💰 預估費用：${:.5} USD",
            self.text, self.input_tokens, self.output_tokens, self.estimated_cost_usd
        )
    }
}

/// Summarization capability over normalized page text.
#[async_trait]
pub trait Summarizer: Send + Sync {
    async fn summarize(&self, page_text: &str) -> Result<SummaryResult, SummarizeError>;
}

/// Chat-completion-backed summarizer with a fixed prompt pair.
pub struct TicketSummarizer {
    client: OpenAIClient,
    model: String,
}

impl TicketSummarizer {
    pub fn new(client: OpenAIClient, model: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
        }
    }
}

#[async_trait]
impl Summarizer for TicketSummarizer {
    async fn summarize(&self, page_text: &str) -> Result<SummaryResult, SummarizeError> {
        let request = ChatRequest::new(&self.model)
            .message(Message::system(SYSTEM_PROMPT))
            .message(Message::user(format_user_prompt(page_text)));

        // o-series models take max_completion_tokens and reject a
        // temperature override; older chat models still use max_tokens.
        // Temperature stays unset either way.
        let request = if ChatRequest::uses_max_completion_tokens(&self.model) {
            request.max_completion_tokens(MAX_COMPLETION_TOKENS)
        } else {
            request.max_tokens(MAX_COMPLETION_TOKENS)
        };

        let response = self.client.chat_completion(request).await?;

        let usage = response.usage.unwrap_or_else(|| {
            warn!(model = %self.model, "no usage block in completion response");
            Usage::default()
        });

        let result = SummaryResult::new(response.content.trim(), &usage);
        debug!(
            model = %self.model,
            input_tokens = result.input_tokens,
            output_tokens = result.output_tokens,
            cost_usd = result.estimated_cost_usd,
            "page summarized"
        );

        Ok(result)
    }
}
