//! CLI command implementations
//!
//! Each command follows the same sequence:
//! 1. Load and validate configuration
//! 2. Read one request from stdin
//! 3. Build the query tree (all validation happens here)
//! 4. Load documents and execute (query only)
//! 5. Write one response to stdout

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::document::{Document, DocumentQuery, QueryDescriptor};
use crate::executor::{ExecutionOptions, QueryExecutor, ResultSet};
use crate::observability::{log_event_with_fields, Event, Logger, MetricsRegistry, Severity};
use crate::repository::MemoryRepository;

use super::args::Command;
use super::errors::{CliError, CliResult};
use super::io::{read_request, write_error, write_response};

/// Configuration file structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Path to a JSON array of documents (required)
    pub data_file: PathBuf,

    /// Minimum log severity (optional, default "info")
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Keep at most this many rows after sorting (optional)
    #[serde(default)]
    pub max_results: Option<usize>,

    /// Refuse data files with more documents than this (optional)
    #[serde(default)]
    pub max_items: Option<usize>,

    /// Directory relative paths resolve against
    #[serde(skip)]
    base_dir: PathBuf,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Config {
    /// Load configuration from file
    pub fn load(path: &Path) -> CliResult<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| CliError::config_error(format!("Failed to read config: {}", e)))?;

        let mut config: Config = serde_json::from_str(&content)
            .map_err(|e| CliError::config_error(format!("Invalid config JSON: {}", e)))?;

        config.base_dir = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();
        config.validate()?;

        Ok(config)
    }

    fn validate(&self) -> CliResult<()> {
        if self.data_file.as_os_str().is_empty() {
            return Err(CliError::config_error("data_file must not be empty"));
        }

        if Severity::parse(&self.log_level).is_none() {
            return Err(CliError::config_error(format!(
                "Invalid log_level: '{}'. Must be one of trace, info, warn, error, fatal.",
                self.log_level
            )));
        }

        if self.max_results == Some(0) {
            return Err(CliError::config_error("max_results must be > 0"));
        }

        if self.max_items == Some(0) {
            return Err(CliError::config_error("max_items must be > 0"));
        }

        Ok(())
    }

    /// Data file path, resolved against the config file's directory
    pub fn data_path(&self) -> PathBuf {
        if self.data_file.is_absolute() {
            self.data_file.clone()
        } else {
            self.base_dir.join(&self.data_file)
        }
    }

    /// Configured minimum log severity
    pub fn severity(&self) -> Severity {
        Severity::parse(&self.log_level).unwrap_or(Severity::Info)
    }

    /// Options applied to every execution
    pub fn execution_options(&self) -> ExecutionOptions {
        ExecutionOptions {
            limit: self.max_results,
        }
    }
}

/// Body of a query or explain request
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct QueryRequest {
    /// Query tree to build
    pub query: QueryDescriptor,
}

impl QueryRequest {
    /// Parses a request value
    pub fn from_value(value: Value) -> CliResult<Self> {
        serde_json::from_value(value)
            .map_err(|e| CliError::invalid_request(format!("Invalid query request: {}", e)))
    }
}

/// Main CLI entry point
///
/// Parses arguments and dispatches to the appropriate command.
/// This is the only function that main.rs should call.
pub fn run() -> CliResult<()> {
    let cli = super::args::Cli::parse_args();
    run_command(cli.command)
}

/// Run the appropriate command based on CLI args.
///
/// A failing command still writes an error response before returning.
pub fn run_command(cmd: Command) -> CliResult<()> {
    let result = match &cmd {
        Command::Query { config } => query(config),
        Command::Explain { config } => explain(config),
    };

    if let Err(e) = &result {
        write_error(e.code_str(), e.message())?;
    }
    result
}

/// Execute a single query from stdin and exit
pub fn query(config_path: &Path) -> CliResult<()> {
    let config = load_config(config_path)?;
    let request = read_request()?;
    let data = execute_request(&config, request)?;
    write_response(data)
}

/// Describe a single query from stdin and exit
pub fn explain(config_path: &Path) -> CliResult<()> {
    load_config(config_path)?;
    let request = read_request()?;
    let data = explain_request(request)?;
    write_response(data)
}

fn load_config(config_path: &Path) -> CliResult<Config> {
    let config = Config::load(config_path)?;
    Logger::set_min_severity(config.severity());

    let path = config_path.to_string_lossy();
    log_event_with_fields(
        Event::ConfigLoaded,
        &[("path", path.as_ref()), ("log_level", config.log_level.as_str())],
    );

    Ok(config)
}

/// Loads the configured data file into a repository.
///
/// The file must hold a JSON array of objects. Documents keep file order.
pub fn load_documents(config: &Config) -> CliResult<MemoryRepository<Document>> {
    let path = config.data_path();
    let content = fs::read_to_string(&path).map_err(|e| {
        CliError::data_error(format!("Failed to read data file {}: {}", path.display(), e))
    })?;

    let values: Vec<Value> = serde_json::from_str(&content).map_err(|e| {
        CliError::data_error(format!("Data file must be a JSON array: {}", e))
    })?;

    let mut repository = match config.max_items {
        Some(max) => MemoryRepository::with_max_items(max),
        None => MemoryRepository::new(),
    };

    for (position, value) in values.into_iter().enumerate() {
        if !value.is_object() {
            return Err(CliError::data_error(format!(
                "Document at position {} is not a JSON object",
                position
            )));
        }
        repository.insert(Document::new(value))?;
    }

    let path = path.to_string_lossy();
    log_event_with_fields(
        Event::ItemsLoaded,
        &[
            ("count", repository.count().to_string().as_str()),
            ("path", path.as_ref()),
        ],
    );

    Ok(repository)
}

fn build_query(request: Value, metrics: &MetricsRegistry) -> CliResult<DocumentQuery> {
    let request = QueryRequest::from_value(request)?;
    log_event_with_fields(
        Event::QueryReceived,
        &[("leaves", request.query.leaf_count().to_string().as_str())],
    );

    match request.query.build() {
        Ok(query) => {
            log_event_with_fields(Event::QueryBuilt, &[("query", query.unique_label().as_str())]);
            Ok(query)
        }
        Err(e) => {
            metrics.increment_queries_rejected();
            log_event_with_fields(
                Event::QueryRejected,
                &[("code", e.code().code()), ("reason", e.message())],
            );
            Err(e.into())
        }
    }
}

/// Builds and executes one request against the configured documents,
/// returning the response data.
pub fn execute_request(config: &Config, request: Value) -> CliResult<Value> {
    let metrics = MetricsRegistry::new();
    let query = build_query(request, &metrics)?;
    let repository = load_documents(config)?;

    let result = QueryExecutor::new(&repository)
        .with_metrics(&metrics)
        .with_options(config.execution_options())
        .execute(&*query);

    let result = match result {
        Ok(result) => result,
        Err(e) => {
            log_event_with_fields(
                Event::QueryFailed,
                &[("code", e.code().code()), ("reason", e.message())],
            );
            return Err(e.into());
        }
    };

    log_event_with_fields(
        Event::QueryExecuted,
        &[
            ("metrics", metrics.to_json().as_str()),
            ("query", result.query_label()),
        ],
    );

    Ok(result_to_json(&result))
}

fn result_to_json(result: &ResultSet<'_, Document>) -> Value {
    let rows: Vec<Value> = result
        .iter()
        .map(|token| {
            json!({
                "item": token.owner_id(),
                "sequence": token.sequence(),
                "fields": token.fields(),
            })
        })
        .collect();

    json!({
        "query": result.query_label(),
        "count": result.count(),
        "truncated": result.stats().limit_applied,
        "rows": rows,
    })
}

/// Builds one request and describes it, returning the response data.
pub fn explain_request(request: Value) -> CliResult<Value> {
    let metrics = MetricsRegistry::new();
    let query = build_query(request, &metrics)?;

    let sort_keys: Vec<Value> = query
        .sort_keys()
        .iter()
        .map(|key| {
            json!({
                "label": key.label,
                "comparator": key.comparator.name(),
            })
        })
        .collect();

    let label = query.unique_label();
    log_event_with_fields(Event::ExplainComplete, &[("query", label.as_str())]);

    Ok(json!({
        "query": label,
        "sort_keys": sort_keys,
        "field_labels": query.field_labels(),
        "supports_unpopulated_check": query.supports_unpopulated_check(),
    }))
}
