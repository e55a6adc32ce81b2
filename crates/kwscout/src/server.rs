//! MCP (Model Context Protocol) server implementation.
//!
//! Exposes keyword extraction to AI assistants over stdio. The server is a
//! presentation layer: every tool delegates to `kwscout_core` and returns the
//! same JSON the CLI prints with `--json`.

use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{CallToolResult, Content, Implementation, ServerCapabilities, ServerInfo};
use rmcp::schemars;
use rmcp::{ErrorData as McpError, ServerHandler, tool, tool_handler, tool_router};

use kwscout_core::providers::serpapi::SerpApiClient;
use kwscout_core::{AnalysisResult, CandidateFilter, Collaborators, Config, KeywordAnalyzer};

use crate::commands::extract::extract_from_text;

/// Parameters for the `get_info` tool.
#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct GetInfoParams {
    /// Output format: "text" or "json"
    #[serde(default = "default_format")]
    pub format: String,
}

fn default_format() -> String {
    "text".to_string()
}

/// Parameters for the `extract_keywords` tool.
#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct ExtractKeywordsParams {
    /// Text to mine. Blank lines separate documents.
    pub text: String,
    /// Seed keyword the text was gathered for.
    pub keyword: String,
    /// Only return candidates of this type.
    #[serde(default)]
    pub filter: CandidateFilter,
}

/// Parameters for the `analyze_keyword` tool.
#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct AnalyzeKeywordParams {
    /// Seed keyword to search for.
    pub keyword: String,
    /// Only return candidates of this type.
    #[serde(default)]
    pub filter: CandidateFilter,
}

/// MCP server exposing keyword analysis to AI assistants.
#[derive(Clone)]
pub struct KeywordServer {
    config: Config,
    max_input: Option<usize>,
    tool_router: rmcp::handler::server::router::tool::ToolRouter<Self>,
}

impl Default for KeywordServer {
    fn default() -> Self {
        Self::new(Config::default(), Some(kwscout_core::DEFAULT_MAX_INPUT_BYTES))
    }
}

#[tool_router]
impl KeywordServer {
    /// Create a server that analyzes with `config`.
    pub fn new(config: Config, max_input: Option<usize>) -> Self {
        Self {
            config,
            max_input,
            tool_router: Self::tool_router(),
        }
    }

    /// Get project information.
    #[tool(description = "Get project name, version, and description")]
    #[tracing::instrument(skip(self), fields(otel.kind = "server"))]
    fn get_info(
        &self,
        Parameters(params): Parameters<GetInfoParams>,
    ) -> Result<CallToolResult, McpError> {
        tracing::debug!(tool = "get_info", format = %params.format, "executing MCP tool");

        let info = serde_json::json!({
            "name": env!("CARGO_PKG_NAME"),
            "version": env!("CARGO_PKG_VERSION"),
            "description": env!("CARGO_PKG_DESCRIPTION"),
        });

        let text = if params.format == "json" {
            serde_json::to_string_pretty(&info)
                .map_err(|e| McpError::internal_error(format!("serialization error: {e}"), None))?
        } else {
            format!(
                "{} v{}\n{}",
                env!("CARGO_PKG_NAME"),
                env!("CARGO_PKG_VERSION"),
                env!("CARGO_PKG_DESCRIPTION"),
            )
        };

        tracing::info!(tool = "get_info", "MCP tool completed");
        Ok(CallToolResult::success(vec![Content::text(text)]))
    }

    /// Rank keywords in supplied text.
    #[tool(
        description = "Rank single words, two-word and three-word phrases in the given text, flag purchase intent, and append configured synonyms. Offline."
    )]
    #[tracing::instrument(skip(self, params), fields(otel.kind = "server", keyword = %params.keyword))]
    fn extract_keywords(
        &self,
        Parameters(params): Parameters<ExtractKeywordsParams>,
    ) -> Result<CallToolResult, McpError> {
        tracing::debug!(tool = "extract_keywords", bytes = params.text.len(), "executing MCP tool");

        if let Some(max) = self.max_input.filter(|&max| params.text.len() > max) {
            return Err(McpError::invalid_params(
                format!("input too large: {} bytes (limit: {max} bytes)", params.text.len()),
                None,
            ));
        }
        let keyword = require_keyword(&params.keyword)?;

        let analyzer = KeywordAnalyzer::new(self.config.analysis.clone())
            .map_err(|e| McpError::internal_error(e.to_string(), None))?;
        let result = extract_from_text(&analyzer, keyword, &params.text).filtered(params.filter);

        tracing::info!(tool = "extract_keywords", candidates = result.candidates.len(), "MCP tool completed");
        json_result(&result)
    }

    /// Run a live analysis through SerpApi.
    #[tool(
        description = "Search the web for a keyword and rank related terms from the results, with competition level, autocomplete suggestions and trend interest. Requires a SerpApi key."
    )]
    #[tracing::instrument(skip(self, params), fields(otel.kind = "server", keyword = %params.keyword))]
    async fn analyze_keyword(
        &self,
        Parameters(params): Parameters<AnalyzeKeywordParams>,
    ) -> Result<CallToolResult, McpError> {
        tracing::debug!(tool = "analyze_keyword", "executing MCP tool");

        let keyword = require_keyword(&params.keyword)?.to_string();
        let config = self.config.clone();

        // The HTTP client blocks; build, use and drop it off the async runtime.
        let result = tokio::task::spawn_blocking(move || live_analysis(&config, &keyword))
            .await
            .map_err(|e| McpError::internal_error(format!("analysis task failed: {e}"), None))?
            .map_err(|e| McpError::invalid_request(e, None))?
            .filtered(params.filter);

        tracing::info!(tool = "analyze_keyword", candidates = result.candidates.len(), "MCP tool completed");
        json_result(&result)
    }
}

fn live_analysis(config: &Config, keyword: &str) -> Result<AnalysisResult, String> {
    let analyzer = KeywordAnalyzer::new(config.analysis.clone()).map_err(|e| e.to_string())?;
    let client = SerpApiClient::new(&config.serp, &config.trends).map_err(|e| e.to_string())?;

    let mut collaborators = Collaborators::none().with_search(&client);
    if config.trends.enabled {
        collaborators = collaborators.with_trends(&client);
        if config.trends.per_candidate {
            collaborators = collaborators.with_candidate_trends();
        }
    }
    if config.suggestions.enabled {
        collaborators = collaborators.with_suggestions(&client);
    }
    if config.competitors.enabled && config.competitors.max_competitors > 0 {
        collaborators = collaborators.with_competitors(config.competitors.max_competitors);
    }
    Ok(analyzer.analyze(keyword, &collaborators))
}

fn require_keyword(keyword: &str) -> Result<&str, McpError> {
    let keyword = keyword.trim();
    if keyword.is_empty() {
        return Err(McpError::invalid_params("keyword must not be blank", None));
    }
    Ok(keyword)
}

fn json_result(result: &AnalysisResult) -> Result<CallToolResult, McpError> {
    let text = serde_json::to_string_pretty(result)
        .map_err(|e| McpError::internal_error(format!("serialization error: {e}"), None))?;
    Ok(CallToolResult::success(vec![Content::text(text)]))
}

#[tool_handler]
impl ServerHandler for KeywordServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: Default::default(),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: env!("CARGO_PKG_NAME").to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                ..Default::default()
            },
            instructions: Some(format!(
                "{} MCP server. Use extract_keywords on text you already have; \
                 analyze_keyword searches the web and needs a SerpApi key.",
                env!("CARGO_PKG_NAME"),
            )),
        }
    }
}
