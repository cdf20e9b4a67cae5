//! Route table and per-route handlers.
//!
//! # Invariants
//! - Each request builds its own repository over the shared connection and
//!   runs exactly one core operation.
//! - `GET /profile` renders the identifier-free listing projection;
//!   `GET /search` and `POST /profile` render full stored documents.

use crate::config::ApiConfig;
use crate::error::ApiError;
use crate::request::{ApiRequest, ApiResponse, Method, QueryParams};
use log::{error, info, warn};
use profiledir_core::db::{open_db, open_db_in_memory, DbResult};
use profiledir_core::{
    list_projects, normalize_top_skills_limit, search_profiles, top_skills, ProfileDraft,
    ProfileService, ProfileSummary, SqliteProfileRepository, UpdateOutcome,
};
use rusqlite::Connection;
use serde::Serialize;
use serde_json::{json, Map, Value};
use std::time::Instant;

const API_PREFIX: &str = "/api";

/// Known request paths.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Health,
    Profile,
    Search,
    Projects,
    TopSkills,
}

impl Route {
    /// Resolves a request path; trailing slashes are ignored.
    pub fn resolve(path: &str) -> Option<Self> {
        let path = path.trim_end_matches('/');
        if path == "/health" {
            return Some(Self::Health);
        }

        let path = path.strip_prefix(API_PREFIX).unwrap_or(path);
        match path {
            "/profile" => Some(Self::Profile),
            "/search" => Some(Self::Search),
            "/projects" => Some(Self::Projects),
            "/skills/top" => Some(Self::TopSkills),
            _ => None,
        }
    }

    fn label(self) -> &'static str {
        match self {
            Self::Health => "health",
            Self::Profile => "profile",
            Self::Search => "search",
            Self::Projects => "projects",
            Self::TopSkills => "skills_top",
        }
    }
}

/// Profile directory API bound to one SQLite connection.
pub struct ProfileApi {
    conn: Connection,
}

impl ProfileApi {
    /// Opens (and migrates) the database named by `config.db_path`.
    pub fn open(config: &ApiConfig) -> DbResult<Self> {
        Ok(Self::from_connection(open_db(&config.db_path)?))
    }

    /// Opens a private in-memory directory.
    pub fn in_memory() -> DbResult<Self> {
        Ok(Self::from_connection(open_db_in_memory()?))
    }

    /// Wraps an already migrated connection.
    pub fn from_connection(conn: Connection) -> Self {
        Self { conn }
    }

    /// Runs one request to completion and renders its response.
    pub fn handle(&mut self, request: &ApiRequest) -> ApiResponse {
        let started_at = Instant::now();
        let (route, result) = match request.split_target() {
            Ok((path, params)) => {
                let route = Route::resolve(path);
                let result = match route {
                    Some(route) => dispatch(&mut self.conn, route, request, &params),
                    None => Err(ApiError::NotFound),
                };
                (route, result)
            }
            Err(err) => (None, Err(err)),
        };

        let route_label = route.map_or("unknown", Route::label);
        let elapsed_ms = started_at.elapsed().as_millis();
        match result {
            Ok(response) => {
                info!(
                    "event=api_request module=api status=ok method={} route={route_label} http_status={} duration_ms={elapsed_ms}",
                    request.method, response.status
                );
                response
            }
            Err(err) => {
                if let ApiError::Internal(detail) = &err {
                    error!(
                        "event=api_request module=api status=error method={} route={route_label} http_status=500 duration_ms={elapsed_ms} error={detail}",
                        request.method
                    );
                } else {
                    warn!(
                        "event=api_request module=api status=rejected method={} route={route_label} http_status={} duration_ms={elapsed_ms}",
                        request.method,
                        err.status()
                    );
                }
                err.into_response()
            }
        }
    }
}

fn dispatch(
    conn: &mut Connection,
    route: Route,
    request: &ApiRequest,
    params: &QueryParams,
) -> Result<ApiResponse, ApiError> {
    if route == Route::Health {
        return match request.method {
            Method::Get => Ok(ApiResponse::new(200, json!({ "status": "OK" }))),
            _ => Err(ApiError::MethodNotAllowed),
        };
    }

    let repo = SqliteProfileRepository::try_new(conn)?;
    match (route, request.method) {
        (Route::Profile, Method::Post) => {
            let draft = parse_draft(request)?;
            let mut service = ProfileService::new(repo);
            let profile = service.create(&draft)?;

            let mut body = Map::new();
            body.insert("message".to_string(), json!("Profile Created"));
            body.insert("profile".to_string(), serde_json::to_value(&profile)?);
            Ok(ApiResponse::new(201, Value::Object(body)))
        }
        (Route::Profile, Method::Put) => {
            let draft = parse_draft(request)?;
            let mut service = ProfileService::new(repo);
            let outcome = service.update(&draft.email, &draft)?;

            Ok(ApiResponse::new(
                201,
                json!({
                    "message": "Profile updated",
                    "matched": matches!(outcome, UpdateOutcome::Replaced(_)),
                }),
            ))
        }
        (Route::Profile, Method::Get) => {
            let service = ProfileService::new(repo);
            let profiles: Vec<ProfileSummary> = service
                .list()?
                .into_iter()
                .map(ProfileSummary::from)
                .collect();
            envelope(200, "profiles", &profiles)
        }
        (Route::Search, Method::Get) => {
            let query = params.get("q").unwrap_or_default();
            let results = if query.is_empty() {
                ProfileService::new(repo).list()?
            } else {
                search_profiles(&repo, query)?
            };
            envelope(200, "results", &results)
        }
        (Route::Projects, Method::Get) => {
            let projects = list_projects(&repo, params.get("skill"))?;
            envelope(200, "projects", &projects)
        }
        (Route::TopSkills, Method::Get) => {
            let limit = match params.get("limit").map(str::trim) {
                Some(raw) if !raw.is_empty() => Some(
                    raw.parse::<usize>()
                        .map_err(|_| ApiError::BadRequest(format!("invalid limit `{raw}`")))?,
                ),
                _ => None,
            };
            let skills = top_skills(&repo, normalize_top_skills_limit(limit))?;
            envelope(200, "topSkills", &skills)
        }
        _ => Err(ApiError::MethodNotAllowed),
    }
}

fn parse_draft(request: &ApiRequest) -> Result<ProfileDraft, ApiError> {
    let body = request
        .body
        .as_deref()
        .filter(|body| !body.trim().is_empty())
        .ok_or_else(|| ApiError::BadRequest("request body is required".to_string()))?;
    serde_json::from_str(body).map_err(|err| {
        ApiError::BadRequest(format!(
            "invalid profile body at line {} column {}",
            err.line(),
            err.column()
        ))
    })
}

fn envelope<T: Serialize + ?Sized>(
    status: u16,
    key: &str,
    value: &T,
) -> Result<ApiResponse, ApiError> {
    let mut body = Map::new();
    body.insert(key.to_string(), serde_json::to_value(value)?);
    Ok(ApiResponse::new(status, Value::Object(body)))
}

#[cfg(test)]
mod tests {
    use super::Route;

    #[test]
    fn routes_resolve_with_and_without_api_prefix() {
        assert_eq!(Route::resolve("/profile"), Some(Route::Profile));
        assert_eq!(Route::resolve("/api/profile/"), Some(Route::Profile));
        assert_eq!(Route::resolve("/api/skills/top"), Some(Route::TopSkills));
        assert_eq!(Route::resolve("/health"), Some(Route::Health));
        assert_eq!(Route::resolve("/api/health"), None);
        assert_eq!(Route::resolve("/profiles"), None);
    }
}
