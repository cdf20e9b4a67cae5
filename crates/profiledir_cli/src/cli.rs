//! Command-line surface: flags, subcommands and their request mapping.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use profiledir_api::{ApiConfig, ApiRequest, Method};
use std::path::{Path, PathBuf};

#[derive(Debug, Parser)]
#[command(name = "profiledir", version, about = "Portfolio profile directory")]
pub struct Cli {
    /// SQLite database file (overrides PROFILEDIR_DB_PATH).
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    /// trace|debug|info|warn|error (overrides PROFILEDIR_LOG_LEVEL).
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Absolute directory for rolling log files (overrides PROFILEDIR_LOG_DIR).
    #[arg(long, global = true)]
    pub log_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Check that the service answers.
    Health,
    /// Create a profile from a JSON file.
    Add {
        #[arg(long)]
        file: PathBuf,
    },
    /// Replace the profile whose email matches the one in the JSON file.
    Update {
        #[arg(long)]
        file: PathBuf,
    },
    /// List every profile, newest first.
    List,
    /// Case-insensitive substring search.
    Search { query: String },
    /// List projects across profiles.
    Projects {
        /// Exact, case-sensitive skill tag.
        #[arg(long)]
        skill: Option<String>,
    },
    /// Most frequent skills.
    TopSkills {
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Send a raw request, e.g. `request GET /search?q=ada`.
    Request {
        method: String,
        target: String,
        #[arg(long)]
        body: Option<String>,
    },
}

impl Cli {
    /// Environment configuration with command-line overrides applied.
    pub fn config(&self) -> ApiConfig {
        let mut config = ApiConfig::from_env();
        if let Some(db) = &self.db {
            config.db_path = db.clone();
        }
        if let Some(level) = &self.log_level {
            config.log_level = level.clone();
        }
        if let Some(dir) = &self.log_dir {
            config.log_dir = Some(dir.clone());
        }
        config
    }
}

impl Command {
    /// Builds the API request this command stands for.
    pub fn to_request(&self) -> Result<ApiRequest> {
        let request = match self {
            Self::Health => ApiRequest::get("/health"),
            Self::Add { file } => ApiRequest::post("/profile", read_body(file)?),
            Self::Update { file } => ApiRequest::put("/profile", read_body(file)?),
            Self::List => ApiRequest::get("/profile"),
            Self::Search { query } => ApiRequest::get("/search").with_query("q", query),
            Self::Projects { skill } => match skill {
                Some(skill) => ApiRequest::get("/projects").with_query("skill", skill),
                None => ApiRequest::get("/projects"),
            },
            Self::TopSkills { limit } => match limit {
                Some(limit) => {
                    ApiRequest::get("/skills/top").with_query("limit", &limit.to_string())
                }
                None => ApiRequest::get("/skills/top"),
            },
            Self::Request {
                method,
                target,
                body,
            } => {
                let method = method.parse::<Method>().map_err(anyhow::Error::msg)?;
                let request = ApiRequest::new(method, target.clone());
                match body {
                    Some(body) => request.with_body(body.clone()),
                    None => request,
                }
            }
        };
        Ok(request)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Health => "health",
            Self::Add { .. } => "add",
            Self::Update { .. } => "update",
            Self::List => "list",
            Self::Search { .. } => "search",
            Self::Projects { .. } => "projects",
            Self::TopSkills { .. } => "top-skills",
            Self::Request { .. } => "request",
        }
    }
}

fn read_body(path: &Path) -> Result<String> {
    std::fs::read_to_string(path)
        .with_context(|| format!("failed to read profile file `{}`", path.display()))
}
