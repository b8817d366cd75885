use std::sync::Arc;
use std::time::Instant;

use crate::error::AppError;
use crate::models::{AnalysisRequest, AnalysisResult, AnalysisStats, PromptPayload};
use crate::services::csv::{parse_csv, summarize};
use crate::services::llm_client::LlmClient;
use crate::services::prompt::build_prompt;
use crate::services::tokens::estimate_tokens;

pub const TEMPERATURE: f32 = 0.7;
pub const MAX_TOKENS: u32 = 4000;

const EMPTY_CSV_MESSAGE: &str = "CSV文件内容为空";

/// Runs one CSV analysis end to end: summarize, prompt, call the model, report usage.
#[derive(Clone)]
pub struct ReportAnalyzer {
    client: Arc<dyn LlmClient>,
}

impl ReportAnalyzer {
    pub fn new(client: Arc<dyn LlmClient>) -> Self {
        Self { client }
    }

    pub async fn analyze(&self, request: AnalysisRequest) -> Result<AnalysisResult, AppError> {
        let start = Instant::now();
        let AnalysisRequest { csv_text, instruction, mode, model } = request;

        if csv_text.trim_start_matches('\u{feff}').trim().is_empty() {
            return Err(AppError::Validation(EMPTY_CSV_MESSAGE.to_string()));
        }

        tracing::info!("Parsing CSV data ({} bytes)...", csv_text.len());
        let parse_start = Instant::now();
        let dataset = parse_csv(&csv_text)?;
        tracing::info!(
            "Parsed {} records with {} fields in {:?}",
            dataset.len(),
            dataset.headers().len(),
            parse_start.elapsed()
        );

        if dataset.is_empty() {
            return Err(AppError::Validation(EMPTY_CSV_MESSAGE.to_string()));
        }

        let summary_start = Instant::now();
        let formatted = summarize(&dataset);
        tracing::info!(
            "Summarized dataset: {} chars, took {:?}",
            formatted.chars().count(),
            summary_start.elapsed()
        );

        let prompt = build_prompt(&formatted, &instruction, mode)?;
        let payload = PromptPayload {
            system_prompt: prompt.system_prompt,
            user_prompt: prompt.user_prompt,
            model,
            temperature: TEMPERATURE,
            max_tokens: MAX_TOKENS,
        };

        tracing::info!("Calling model {} in {} mode...", payload.model, mode);
        let llm_start = Instant::now();
        let response = self.client.complete(&payload).await?;
        tracing::info!("Model answered in {:?}", llm_start.elapsed());

        let content = response
            .first_content()
            .filter(|content| !content.trim().is_empty())
            .ok_or_else(|| {
                tracing::error!("Model response had no usable choice: {:?}", response);
                AppError::Upstream("AI模型返回数据格式异常".to_string())
            })?
            .to_string();

        let input_tokens = estimate_tokens(&payload.user_prompt);
        let output_tokens = estimate_tokens(&content);
        let total_time_seconds = round_seconds(start.elapsed().as_secs_f64());

        tracing::info!(
            "Analysis completed in {:.2}s (input ~{} tokens, output ~{} tokens)",
            total_time_seconds,
            input_tokens,
            output_tokens
        );

        Ok(AnalysisResult {
            content,
            stats: AnalysisStats {
                total_time_seconds,
                input_tokens,
                output_tokens,
                total_tokens: input_tokens + output_tokens,
            },
        })
    }
}

// two decimals, as reported to clients
fn round_seconds(seconds: f64) -> f64 {
    (seconds * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ChatCompletionResponse, Choice, ChoiceMessage};
    use crate::services::prompt::AnalysisMode;
    use async_trait::async_trait;

    struct EchoModel;

    #[async_trait]
    impl LlmClient for EchoModel {
        async fn complete(&self, payload: &PromptPayload) -> Result<ChatCompletionResponse, AppError> {
            Ok(ChatCompletionResponse {
                choices: vec![Choice {
                    message: Some(ChoiceMessage {
                        role: Some("assistant".to_string()),
                        content: Some(format!("model={}", payload.model)),
                    }),
                }],
            })
        }
    }

    #[test]
    fn analyze_reports_usage() {
        let analyzer = ReportAnalyzer::new(Arc::new(EchoModel));
        let result = tokio_test::block_on(analyzer.analyze(AnalysisRequest {
            csv_text: "name,city\nAlice,NY\nBob,NY\nCarol,LA\n".to_string(),
            instruction: "summarize".to_string(),
            mode: AnalysisMode::Text,
            model: "grok-2-1212".to_string(),
        }))
        .unwrap();

        assert_eq!(result.content, "model=grok-2-1212");
        // "model", "=", "grok", "-", "2", "-", "1212"
        assert_eq!(result.stats.output_tokens, 7);
        assert_eq!(result.stats.total_tokens, result.stats.input_tokens + 7);
    }

    #[test]
    fn rounds_to_two_decimals() {
        assert_eq!(round_seconds(1.23456), 1.23);
        assert_eq!(round_seconds(1.999), 2.0);
        assert_eq!(round_seconds(0.0), 0.0);
    }
}
