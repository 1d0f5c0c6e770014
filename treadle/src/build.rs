//! Builds runner components from [`BuildConfig`].
//!
//! The Planner and Replanner share one plain chat client; the solver gets its
//! own client with the web-search tool registered and tool choice Auto so the
//! model may stop searching and answer.

use std::sync::Arc;

use async_openai::config::OpenAIConfig;

use crate::agent::{PlanExecuteRunner, RunnerOptions};
use crate::config::BuildConfig;
use crate::llm::{ChatOpenAI, LlmClient, ToolChoiceMode};
use crate::solver::{ReactSolver, Solver};
use crate::tool_source::{MockToolSource, ToolSource, ToolSourceError, WebSearchToolsSource};

/// Error when building a runner from config.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("no LLM available: set OPENAI_API_KEY (and optionally MODEL)")]
    NoLlm,
    #[error("failed to list tools: {0}")]
    Tools(#[from] ToolSourceError),
}

fn openai_config_from(config: &BuildConfig) -> Result<(OpenAIConfig, String), BuildError> {
    let api_key = config
        .openai_api_key
        .as_deref()
        .filter(|s| !s.is_empty())
        .ok_or(BuildError::NoLlm)?;
    let model = config
        .model
        .as_deref()
        .filter(|s| !s.is_empty())
        .unwrap_or("gpt-4o-mini")
        .to_string();
    let mut openai_config = OpenAIConfig::new().with_api_key(api_key);
    if let Some(ref base) = config.openai_base_url {
        if !base.is_empty() {
            openai_config = openai_config.with_api_base(base.trim_end_matches('/'));
        }
    }
    Ok((openai_config, model))
}

/// Builds the chat LLM shared by the Planner and Replanner stages.
pub fn build_stage_llm(config: &BuildConfig) -> Result<Arc<dyn LlmClient>, BuildError> {
    let (openai_config, model) = openai_config_from(config)?;
    Ok(Arc::new(ChatOpenAI::with_config(openai_config, model)))
}

/// Builds the solver's tool source: Exa-backed web search when `exa_api_key`
/// is set, otherwise an empty source (the solver then answers from model
/// knowledge alone).
pub fn build_tool_source(config: &BuildConfig) -> Arc<dyn ToolSource> {
    match config.exa_api_key.as_deref().filter(|s| !s.is_empty()) {
        Some(key) => Arc::new(WebSearchToolsSource::new(key)),
        None => {
            tracing::warn!("EXA_API_KEY not set, solver runs without web search");
            Arc::new(MockToolSource::new(vec![], String::new()))
        }
    }
}

/// Builds the Executor's solver: a ReAct loop over an LLM with the tool
/// source's tools registered.
pub async fn build_solver(config: &BuildConfig) -> Result<Arc<dyn Solver>, BuildError> {
    let (openai_config, model) = openai_config_from(config)?;
    let tools = build_tool_source(config);
    let tool_list = tools.list_tools().await?;
    let mut llm = ChatOpenAI::with_config(openai_config, model);
    if !tool_list.is_empty() {
        llm = llm
            .with_tools(tool_list)
            .with_tool_choice(ToolChoiceMode::Auto);
    }
    Ok(Arc::new(ReactSolver::new(Arc::new(llm), tools)))
}

/// Builds a full runner from config. Stage timeouts keep their default.
pub async fn build_runner(config: &BuildConfig) -> Result<PlanExecuteRunner, BuildError> {
    let stage_llm = build_stage_llm(config)?;
    let solver = build_solver(config).await?;
    Ok(PlanExecuteRunner::new(RunnerOptions {
        planner_llm: Some(Arc::clone(&stage_llm)),
        replanner_llm: Some(stage_llm),
        solver: Some(solver),
        max_cycles: config.max_cycles,
        stage_timeout: None,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_with_keys() -> BuildConfig {
        BuildConfig {
            openai_api_key: Some("sk-test".to_string()),
            exa_api_key: Some("exa-test".to_string()),
            ..Default::default()
        }
    }

    /// **Scenario**: without an OpenAI key nothing LLM-backed can be built.
    #[tokio::test]
    async fn missing_openai_key_is_no_llm() {
        let config = BuildConfig::default();
        assert!(matches!(build_stage_llm(&config), Err(BuildError::NoLlm)));
        assert!(matches!(
            build_solver(&config).await,
            Err(BuildError::NoLlm)
        ));

        let config = BuildConfig {
            openai_api_key: Some(String::new()),
            ..Default::default()
        };
        assert!(matches!(build_stage_llm(&config), Err(BuildError::NoLlm)));
    }

    /// **Scenario**: the Exa key decides whether the solver sees a websearch tool.
    #[tokio::test]
    async fn tool_source_follows_exa_key() {
        let with_key = build_tool_source(&config_with_keys());
        let tools = with_key.list_tools().await.unwrap();
        assert_eq!(tools.len(), 1);
        assert_eq!(tools[0].name, "websearch");

        let without_key = build_tool_source(&BuildConfig::default());
        assert!(without_key.list_tools().await.unwrap().is_empty());
    }

    /// **Scenario**: a keyed config builds a complete runner without touching
    /// the network.
    #[tokio::test]
    async fn keyed_config_builds_runner() {
        assert!(build_runner(&config_with_keys()).await.is_ok());
    }
}
