use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::Serialize;
use serde_json::Value;

use searchdeck_cli::{
    assets,
    config::RuntimeConfig,
    feedback,
    resource_api::{self, ResourceApiError},
    search_api::{self, AuthHeaders, SearchApiError, SearchOutcome},
};
use searchdeck_core::envelope::{RequestEnvelope, build_request};
use searchdeck_core::notice::{
    CODE_DOCUMENT_FETCH_FAILED, CODE_QUERY_SUCCEEDED, CODE_SEARCH_FAILED, CODE_VALIDATION_FAILED,
    MessageCatalog,
};
use searchdeck_core::params::{FilterEntry, QueryParameters};
use searchdeck_core::results::filter_hits;
use searchdeck_core::share_link::{ShareLink, build_share_url, parse_share_url};
use searchdeck_core::validate::validate_submit;
use searchdeck_view::ViewMeta;

#[derive(Debug, Parser)]
#[command(author, version, about = "Operator console for the retrieval search service")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Submit a question and print the filtered result view JSON.
    Search {
        #[command(flatten)]
        query: QueryArgs,
        /// Seed the query state from a document share link.
        #[arg(long)]
        from_link: Option<String>,
        /// Output mode: render-ready view JSON or service envelope JSON.
        #[arg(long, value_enum, default_value_t = OutputMode::View)]
        mode: OutputMode,
    },
    /// Fetch the document a share link points at and print its view JSON.
    Document {
        /// Document share link to resolve.
        #[arg(long)]
        link: String,
        /// Write the fetched bytes here instead of the file's own name.
        #[arg(long)]
        out: Option<PathBuf>,
        /// Output mode: render-ready view JSON or service envelope JSON.
        #[arg(long, value_enum, default_value_t = OutputMode::View)]
        mode: OutputMode,
    },
    /// Build a document share link for the given parameters.
    Share {
        #[command(flatten)]
        query: QueryArgs,
        /// File the link opens, as reported by a result row.
        #[arg(long)]
        file_name: String,
        /// Document name the link pins its filter to.
        #[arg(long)]
        doc_name: String,
        /// Output mode: plain URL or service envelope JSON.
        #[arg(long, value_enum, default_value_t = OutputMode::View)]
        mode: OutputMode,
    },
}

/// Per-invocation overrides for the query state. Anything left unset falls
/// back to the share link (when one seeds the command), then the
/// environment, then the field default.
#[derive(Debug, Args)]
struct QueryArgs {
    /// Question to ask the search service.
    #[arg(long)]
    question: Option<String>,
    /// Index the retrieval layer searches.
    #[arg(long)]
    index_id: Option<String>,
    /// Search service base endpoint.
    #[arg(long)]
    search_url: Option<String>,
    /// Resource service base endpoint.
    #[arg(long)]
    resource_url: Option<String>,
    /// Generation backend base url, forwarded as the api-endpoint header.
    #[arg(long)]
    llm_base_url: Option<String>,
    /// Generation backend key, forwarded as the api-key header.
    #[arg(long)]
    llm_key: Option<String>,
    /// Generation model name.
    #[arg(long)]
    model_name: Option<String>,
    /// Generation deployment name.
    #[arg(long)]
    deployment_name: Option<String>,
    /// Metadata filter row as key=value; repeatable.
    #[arg(long)]
    filter: Vec<String>,
    /// Toggle the retrieval stage.
    #[arg(long)]
    retrieval: Option<bool>,
    /// Toggle the vector index source.
    #[arg(long)]
    vector: Option<bool>,
    /// Toggle the sparse index source.
    #[arg(long)]
    sparse: Option<bool>,
    /// Toggle rank fusion over the index sources.
    #[arg(long)]
    rrf: Option<bool>,
    /// Toggle the model-assisted metadata filter.
    #[arg(long)]
    metadata_filter: Option<bool>,
    /// Toggle answer generation.
    #[arg(long)]
    generate: Option<bool>,
    /// Ranked hits kept per source.
    #[arg(long)]
    top_k: Option<u32>,
    /// Candidate pool fetched before filtering.
    #[arg(long)]
    pre_filter_k: Option<u32>,
    /// Maximum tokens the generation step may emit.
    #[arg(long)]
    max_tokens: Option<u32>,
    /// Generation sampling temperature.
    #[arg(long)]
    temperature: Option<f64>,
    /// Hits handed to the generation prompt.
    #[arg(long)]
    generation_top_k: Option<u32>,
    /// Generation attempts before the service gives up.
    #[arg(long)]
    attempts: Option<u32>,
    /// Console base URL used when building share links.
    #[arg(long)]
    share_base: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
#[value(rename_all = "kebab-case")]
enum OutputMode {
    ServiceJson,
    View,
}

impl Cli {
    fn command_name(&self) -> &'static str {
        match &self.command {
            Commands::Search { .. } => "search",
            Commands::Document { .. } => "document",
            Commands::Share { .. } => "share",
        }
    }

    fn output_mode(&self) -> OutputMode {
        match &self.command {
            Commands::Search { mode, .. }
            | Commands::Document { mode, .. }
            | Commands::Share { mode, .. } => *mode,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ErrorKind {
    User,
    Runtime,
}

#[derive(Debug, PartialEq, Eq)]
struct AppError {
    kind: ErrorKind,
    message: String,
    notice_code: Option<u32>,
}

impl AppError {
    fn user(message: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::User,
            message: message.into(),
            notice_code: None,
        }
    }

    fn runtime(message: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::Runtime,
            message: message.into(),
            notice_code: None,
        }
    }

    fn with_notice_code(mut self, code: u32) -> Self {
        self.notice_code = Some(code);
        self
    }

    fn from_search_api(error: SearchApiError, catalog: &MessageCatalog) -> Self {
        let detail = match &error {
            SearchApiError::Rejected { message, .. } if !message.is_empty() => message.clone(),
            other => other.to_string(),
        };
        let notice = catalog.failure_with_message(&detail, Some(CODE_SEARCH_FAILED));
        AppError::runtime(notice.render()).with_notice_code(CODE_SEARCH_FAILED)
    }

    fn from_resource_api(_error: ResourceApiError, catalog: &MessageCatalog) -> Self {
        let notice = catalog.failure(CODE_DOCUMENT_FETCH_FAILED);
        AppError::runtime(notice.render()).with_notice_code(CODE_DOCUMENT_FETCH_FAILED)
    }

    fn exit_code(&self) -> i32 {
        match self.kind {
            ErrorKind::User => 2,
            ErrorKind::Runtime => 1,
        }
    }

    fn code(&self) -> &'static str {
        match self.kind {
            ErrorKind::User => "searchdeck.user",
            ErrorKind::Runtime => "searchdeck.runtime",
        }
    }
}

fn main() {
    let cli = Cli::parse();
    let command = cli.command_name();
    let mode = cli.output_mode();

    match run(cli) {
        Ok(output) => {
            println!("{output}");
        }
        Err(error) => {
            match mode {
                OutputMode::ServiceJson => {
                    println!("{}", serialize_service_error(command, &error));
                }
                OutputMode::View => {
                    eprintln!("error: {}", error.message);
                }
            }
            std::process::exit(error.exit_code());
        }
    }
}

fn run(cli: Cli) -> Result<String, AppError> {
    run_with(
        cli,
        RuntimeConfig::from_env,
        search_api::submit_query,
        resource_api::fetch_document,
    )
}

fn run_with<LoadConfig, SubmitQuery, FetchDocument>(
    cli: Cli,
    load_config: LoadConfig,
    submit_query: SubmitQuery,
    fetch_document: FetchDocument,
) -> Result<String, AppError>
where
    LoadConfig: Fn() -> RuntimeConfig,
    SubmitQuery: Fn(&RequestEnvelope, &AuthHeaders, &str) -> Result<SearchOutcome, SearchApiError>,
    FetchDocument: Fn(&str, &str) -> Result<Vec<u8>, ResourceApiError>,
{
    match cli.command {
        Commands::Search {
            query,
            from_link,
            mode,
        } => {
            let config = load_config();
            let (catalog, app_version) = load_notices(&config);

            let link = from_link
                .as_deref()
                .map(parse_share_url)
                .transpose()
                .map_err(|error| AppError::user(error.to_string()))?;

            let params = resolve_params(&query, &config, link.as_ref())?;
            validate_submit(&params).map_err(|error| {
                let notice =
                    catalog.failure_with_message(&error.to_string(), Some(CODE_VALIDATION_FAILED));
                AppError::user(notice.render()).with_notice_code(CODE_VALIDATION_FAILED)
            })?;

            let envelope = build_request(&params);
            let auth = AuthHeaders {
                llm_base_url: params.llm_base_url.clone(),
                llm_key: params.llm_key.clone(),
            };
            let outcome = submit_query(&envelope, &auth, &params.search_service_url)
                .map_err(|error| AppError::from_search_api(error, &catalog))?;

            let filtered = filter_hits(
                &outcome.answer.top_k_list,
                params.rrf_enabled,
                params.vector_enabled,
                params.sparse_enabled,
            );

            let share_base = resolve_share_base(&query, &config);
            let meta = build_meta(app_version, Some(&outcome));
            let mut payload =
                feedback::search_view(&outcome.answer, &filtered, &params, &share_base, meta);
            let completed = catalog.success(CODE_QUERY_SUCCEEDED);
            if !completed.text.is_empty() {
                payload = payload.with_notice(completed.text);
            }
            render_view(mode, "search", payload)
        }
        Commands::Document { link, out, mode } => {
            let config = load_config();
            let (catalog, app_version) = load_notices(&config);

            let share =
                parse_share_url(&link).map_err(|error| AppError::user(error.to_string()))?;
            if share.file_name.is_empty() {
                return Err(AppError::user("share link does not name a file"));
            }

            let params = share.document_view_params();
            let resource_base = if params.resource_service_url.is_empty() {
                config
                    .resource_url
                    .clone()
                    .ok_or_else(|| AppError::user("resource service endpoint must not be empty"))?
            } else {
                params.resource_service_url.clone()
            };

            let bytes = fetch_document(&share.file_name, &resource_base)
                .map_err(|error| AppError::from_resource_api(error, &catalog))?;

            let target = out.unwrap_or_else(|| PathBuf::from(&share.file_name));
            std::fs::write(&target, &bytes).map_err(|error| {
                AppError::runtime(format!("failed to write {}: {error}", target.display()))
            })?;

            let kind = resource_api::classify_file_name(&share.file_name);
            let saved_to = target.display().to_string();
            let meta = build_meta(app_version, None);
            let payload = feedback::document_view(
                &share.file_name,
                &share.doc_name,
                kind,
                bytes.len() as u64,
                Some(saved_to.as_str()),
                &params,
                meta,
            );
            render_view(mode, "document", payload)
        }
        Commands::Share {
            query,
            file_name,
            doc_name,
            mode,
        } => {
            let config = load_config();
            let params = resolve_params(&query, &config, None)?;
            let share_base = resolve_share_base(&query, &config);
            let url = build_share_url(&share_base, &params, &file_name, &doc_name);
            render_share(mode, url)
        }
    }
}

fn load_notices(config: &RuntimeConfig) -> (MessageCatalog, Option<String>) {
    let catalog = assets::load_message_catalog(&config.assets_dir)
        .unwrap_or_else(|_| MessageCatalog::empty());
    let app_version = assets::load_app_version(&config.assets_dir).ok();
    (catalog, app_version)
}

/// Flags win over link-carried state, which wins over environment defaults.
fn resolve_params(
    query: &QueryArgs,
    config: &RuntimeConfig,
    link: Option<&ShareLink>,
) -> Result<QueryParameters, AppError> {
    let mut params = link.map(|link| link.params.clone()).unwrap_or_default();
    apply_config_defaults(&mut params, config);
    apply_flags(&mut params, query)?;
    Ok(params)
}

fn apply_config_defaults(params: &mut QueryParameters, config: &RuntimeConfig) {
    if params.search_service_url.is_empty() {
        if let Some(url) = &config.search_url {
            params.search_service_url = url.clone();
        }
    }
    if params.resource_service_url.is_empty() {
        if let Some(url) = &config.resource_url {
            params.resource_service_url = url.clone();
        }
    }
    if params.llm_base_url.is_empty() {
        if let Some(url) = &config.llm_base_url {
            params.llm_base_url = url.clone();
        }
    }
    if params.llm_key.is_empty() {
        if let Some(key) = &config.llm_key {
            params.llm_key = key.clone();
        }
    }
    if params.index_id.is_empty() {
        if let Some(index_id) = &config.index_id {
            params.index_id = index_id.clone();
        }
    }
}

fn apply_flags(params: &mut QueryParameters, query: &QueryArgs) -> Result<(), AppError> {
    if let Some(question) = &query.question {
        params.question = question.clone();
    }
    if let Some(index_id) = &query.index_id {
        params.index_id = index_id.clone();
    }
    if let Some(url) = &query.search_url {
        params.search_service_url = url.clone();
    }
    if let Some(url) = &query.resource_url {
        params.resource_service_url = url.clone();
    }
    if let Some(url) = &query.llm_base_url {
        params.llm_base_url = url.clone();
    }
    if let Some(key) = &query.llm_key {
        params.llm_key = key.clone();
    }
    if let Some(model_name) = &query.model_name {
        params.model_name = model_name.clone();
    }
    if let Some(deployment_name) = &query.deployment_name {
        params.deployment_name = deployment_name.clone();
    }
    if let Some(retrieval) = query.retrieval {
        params.retrieval_enabled = retrieval;
    }
    if let Some(vector) = query.vector {
        params.vector_enabled = vector;
    }
    if let Some(sparse) = query.sparse {
        params.sparse_enabled = sparse;
    }
    if let Some(rrf) = query.rrf {
        params.rrf_enabled = rrf;
    }
    if let Some(metadata_filter) = query.metadata_filter {
        params.custom_metadata_filter_enabled = metadata_filter;
    }
    if let Some(generate) = query.generate {
        params.generation_enabled = generate;
    }
    if let Some(top_k) = query.top_k {
        params.top_k = top_k;
    }
    if let Some(pre_filter_k) = query.pre_filter_k {
        params.pre_filter_fetch_k = pre_filter_k;
    }
    if let Some(max_tokens) = query.max_tokens {
        params.max_tokens = max_tokens;
    }
    if let Some(temperature) = query.temperature {
        params.temperature = temperature;
    }
    if let Some(generation_top_k) = query.generation_top_k {
        params.generation_top_k = generation_top_k;
    }
    if let Some(attempts) = query.attempts {
        params.total_attempts = attempts;
    }
    for raw in &query.filter {
        params.filter_entries.push(parse_filter_flag(raw)?);
    }
    Ok(())
}

fn parse_filter_flag(raw: &str) -> Result<FilterEntry, AppError> {
    let Some((key, value)) = raw.split_once('=') else {
        return Err(AppError::user(format!(
            "invalid --filter '{raw}' (expected key=value)"
        )));
    };
    Ok(FilterEntry::new(key, value))
}

fn resolve_share_base(query: &QueryArgs, config: &RuntimeConfig) -> String {
    query
        .share_base
        .clone()
        .or_else(|| config.share_base.clone())
        .unwrap_or_default()
}

fn build_meta(app_version: Option<String>, outcome: Option<&SearchOutcome>) -> ViewMeta {
    let mut meta = ViewMeta::new();
    if let Some(version) = app_version {
        meta = meta.with_app_version(version);
    }
    if let Some(outcome) = outcome {
        if !outcome.timestamp.is_empty() {
            meta = meta.with_served_at(outcome.timestamp.clone());
        }
        if outcome.response_time_in_secs > 0.0 {
            meta = meta.with_served_in_secs(outcome.response_time_in_secs);
        }
    }
    meta
}

#[derive(Debug, Serialize)]
struct ServiceErrorEnvelope {
    code: &'static str,
    message: String,
    details: Option<Value>,
}

#[derive(Debug, Serialize)]
struct ServiceEnvelope {
    schema_version: &'static str,
    command: &'static str,
    ok: bool,
    result: Option<Value>,
    error: Option<ServiceErrorEnvelope>,
}

fn render_view(
    mode: OutputMode,
    command: &'static str,
    payload: searchdeck_view::View,
) -> Result<String, AppError> {
    match mode {
        OutputMode::View => payload
            .to_json()
            .map_err(|err| AppError::runtime(format!("failed to serialize view: {err}"))),
        OutputMode::ServiceJson => {
            let result = serde_json::to_value(payload)
                .map_err(|err| AppError::runtime(format!("failed to serialize view: {err}")))?;
            serialize_service_result(command, result)
        }
    }
}

fn render_share(mode: OutputMode, url: String) -> Result<String, AppError> {
    match mode {
        OutputMode::View => Ok(url),
        OutputMode::ServiceJson => {
            serialize_service_result("share", serde_json::json!({ "share_url": url }))
        }
    }
}

fn serialize_service_result(command: &'static str, result: Value) -> Result<String, AppError> {
    serde_json::to_string(&ServiceEnvelope {
        schema_version: "v1",
        command,
        ok: true,
        result: Some(result),
        error: None,
    })
    .map_err(|err| AppError::runtime(format!("failed to serialize service envelope: {err}")))
}

fn serialize_service_error(command: &'static str, error: &AppError) -> String {
    let envelope = ServiceEnvelope {
        schema_version: "v1",
        command,
        ok: false,
        result: None,
        error: Some(ServiceErrorEnvelope {
            code: error.code(),
            message: error.message.clone(),
            details: error
                .notice_code
                .map(|code| serde_json::json!({ "notice_code": code })),
        }),
    };

    serde_json::to_string(&envelope).unwrap_or_else(|serialize_error| {
        serde_json::json!({
            "schema_version": "v1",
            "command": command,
            "ok": false,
            "result": Value::Null,
            "error": {
                "code": "internal.serialize",
                "message": format!("failed to serialize service error envelope: {serialize_error}"),
                "details": Value::Null,
            }
        })
        .to_string()
    })
}
