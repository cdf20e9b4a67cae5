//! Profile repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Persist profile documents across the `profiles` table and its child
//!   tables (skills, projects, project skills, work).
//! - Provide listing in newest-first order and scanning in insertion order.
//!
//! # Invariants
//! - A profile and all of its child rows are written in one `IMMEDIATE`
//!   transaction; a failed write leaves no partial rows.
//! - Update replaces the whole document but keeps `id` and `created_at`.
//! - Child sequences are read back in the order they were submitted.

use crate::db::DbError;
use crate::model::profile::{
    Links, Profile, ProfileDraft, ProfileId, ProfileValidationError, Project, Work,
};
use once_cell::sync::Lazy;
use regex::Regex;
use rusqlite::{
    params, Connection, ErrorCode, OptionalExtension, Row, Transaction, TransactionBehavior,
};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

const PROFILE_SELECT_SQL: &str = "SELECT
    id,
    name,
    email,
    education,
    has_links,
    link_github,
    link_linkedin,
    link_portfolio,
    created_at,
    updated_at
FROM profiles";

const REQUIRED_TABLES: [&str; 5] = [
    "profiles",
    "profile_skills",
    "profile_projects",
    "project_skills",
    "profile_work",
];

static UNIQUE_VIOLATION_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"UNIQUE constraint failed: (\w+)\.(\w+)").expect("valid unique violation regex")
});

pub type RepoResult<T> = Result<T, RepoError>;

/// Field protected by a storage-level uniqueness constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UniqueField {
    /// `profiles.email`.
    Email,
    /// `profile_projects.title`, shared across all profiles.
    ProjectTitle,
    /// `profile_work.company`, shared across all profiles.
    WorkCompany,
}

impl UniqueField {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Email => "email",
            Self::ProjectTitle => "project title",
            Self::WorkCompany => "work company",
        }
    }

    fn from_constraint(table: &str, column: &str) -> Option<Self> {
        match (table, column) {
            ("profiles", "email") => Some(Self::Email),
            ("profile_projects", "title") => Some(Self::ProjectTitle),
            ("profile_work", "company") => Some(Self::WorkCompany),
            _ => None,
        }
    }
}

/// Repository error for profile persistence and queries.
#[derive(Debug)]
pub enum RepoError {
    Validation(ProfileValidationError),
    Db(DbError),
    /// No profile has the given email.
    NotFound(String),
    Conflict(UniqueField),
    InvalidData(String),
    MissingRequiredTable(&'static str),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(_) => write!(f, "profile not found"),
            Self::Conflict(field) => write!(f, "profile {} already exists", field.as_str()),
            Self::InvalidData(message) => write!(f, "invalid persisted profile data: {message}"),
            Self::MissingRequiredTable(table) => write!(f, "missing required table `{table}`"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ProfileValidationError> for RepoError {
    fn from(value: ProfileValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        match unique_violation(&value) {
            Some(field) => Self::Conflict(field),
            None => Self::Db(DbError::Sqlite(value)),
        }
    }
}

/// Row order for [`ProfileRepository::list_profiles`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ProfileOrder {
    /// `created_at` descending; later inserts win ties.
    #[default]
    NewestFirst,
    /// Insertion order, the order read engines scan in.
    Insertion,
}

impl ProfileOrder {
    fn order_by(self) -> &'static str {
        match self {
            Self::NewestFirst => "created_at DESC, rowid DESC",
            Self::Insertion => "rowid ASC",
        }
    }
}

/// Repository interface for the profile collection.
pub trait ProfileRepository {
    /// Persists a new profile and returns its generated id.
    fn create_profile(&mut self, draft: &ProfileDraft) -> RepoResult<ProfileId>;
    /// Replaces the whole document of the profile whose email equals `email`.
    ///
    /// Returns `RepoError::NotFound` when no profile matches.
    fn replace_profile(&mut self, email: &str, draft: &ProfileDraft) -> RepoResult<ProfileId>;
    fn get_profile(&self, id: ProfileId) -> RepoResult<Option<Profile>>;
    fn find_by_email(&self, email: &str) -> RepoResult<Option<Profile>>;
    fn list_profiles(&self, order: ProfileOrder) -> RepoResult<Vec<Profile>>;
}

/// SQLite-backed profile repository.
pub struct SqliteProfileRepository<'conn> {
    conn: &'conn mut Connection,
}

impl<'conn> SqliteProfileRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    ///
    /// # Errors
    /// - `RepoError::MissingRequiredTable` when the schema is incomplete.
    pub fn try_new(conn: &'conn mut Connection) -> RepoResult<Self> {
        for table in REQUIRED_TABLES {
            if !table_exists(conn, table)? {
                return Err(RepoError::MissingRequiredTable(table));
            }
        }
        Ok(Self { conn })
    }
}

impl ProfileRepository for SqliteProfileRepository<'_> {
    fn create_profile(&mut self, draft: &ProfileDraft) -> RepoResult<ProfileId> {
        draft.validate()?;

        let id = Uuid::new_v4();
        let id_text = id.to_string();
        let now = now_epoch_ms();
        let links = draft.links.clone().unwrap_or_default();

        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        tx.execute(
            "INSERT INTO profiles (
                id,
                name,
                email,
                education,
                has_links,
                link_github,
                link_linkedin,
                link_portfolio,
                created_at,
                updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?9);",
            params![
                id_text.as_str(),
                draft.name.as_str(),
                draft.email.as_str(),
                draft.education.as_deref(),
                bool_to_int(draft.links.is_some()),
                links.github.as_deref(),
                links.linkedin.as_deref(),
                links.portfolio.as_deref(),
                now,
            ],
        )?;
        insert_children(&tx, id_text.as_str(), draft)?;
        tx.commit()?;

        Ok(id)
    }

    fn replace_profile(&mut self, email: &str, draft: &ProfileDraft) -> RepoResult<ProfileId> {
        draft.validate()?;

        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        let Some(id_text) = tx
            .query_row(
                "SELECT id FROM profiles WHERE email = ?1;",
                [email],
                |row| row.get::<_, String>(0),
            )
            .optional()?
        else {
            return Err(RepoError::NotFound(email.to_string()));
        };
        let id = parse_profile_id(&id_text)?;
        let links = draft.links.clone().unwrap_or_default();

        tx.execute(
            "UPDATE profiles
             SET
                name = ?2,
                email = ?3,
                education = ?4,
                has_links = ?5,
                link_github = ?6,
                link_linkedin = ?7,
                link_portfolio = ?8,
                updated_at = MAX(?9, created_at)
             WHERE id = ?1;",
            params![
                id_text.as_str(),
                draft.name.as_str(),
                draft.email.as_str(),
                draft.education.as_deref(),
                bool_to_int(draft.links.is_some()),
                links.github.as_deref(),
                links.linkedin.as_deref(),
                links.portfolio.as_deref(),
                now_epoch_ms(),
            ],
        )?;
        delete_children(&tx, id_text.as_str())?;
        insert_children(&tx, id_text.as_str(), draft)?;
        tx.commit()?;

        Ok(id)
    }

    fn get_profile(&self, id: ProfileId) -> RepoResult<Option<Profile>> {
        let conn = &*self.conn;
        let mut stmt = conn.prepare(&format!("{PROFILE_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_profile_row(conn, row)?));
        }

        Ok(None)
    }

    fn find_by_email(&self, email: &str) -> RepoResult<Option<Profile>> {
        let conn = &*self.conn;
        let mut stmt = conn.prepare(&format!("{PROFILE_SELECT_SQL} WHERE email = ?1;"))?;
        let mut rows = stmt.query([email])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_profile_row(conn, row)?));
        }

        Ok(None)
    }

    fn list_profiles(&self, order: ProfileOrder) -> RepoResult<Vec<Profile>> {
        let conn = &*self.conn;
        let mut stmt = conn.prepare(&format!(
            "{PROFILE_SELECT_SQL} ORDER BY {};",
            order.order_by()
        ))?;
        let mut rows = stmt.query([])?;
        let mut profiles = Vec::new();
        while let Some(row) = rows.next()? {
            profiles.push(parse_profile_row(conn, row)?);
        }
        Ok(profiles)
    }
}

fn insert_children(
    tx: &Transaction<'_>,
    profile_id: &str,
    draft: &ProfileDraft,
) -> RepoResult<()> {
    for (position, skill) in draft.skills.iter().enumerate() {
        tx.execute(
            "INSERT INTO profile_skills (profile_id, position, skill) VALUES (?1, ?2, ?3);",
            params![profile_id, position_to_db(position), skill.as_str()],
        )?;
    }

    for (position, project) in draft.projects.iter().enumerate() {
        let project_position = position_to_db(position);
        tx.execute(
            "INSERT INTO profile_projects (profile_id, position, title, description, link)
             VALUES (?1, ?2, ?3, ?4, ?5);",
            params![
                profile_id,
                project_position,
                project.title.as_str(),
                project.description.as_deref(),
                project.link.as_deref(),
            ],
        )?;
        for (skill_position, skill) in project.skills.iter().enumerate() {
            tx.execute(
                "INSERT INTO project_skills (profile_id, project_position, position, skill)
                 VALUES (?1, ?2, ?3, ?4);",
                params![
                    profile_id,
                    project_position,
                    position_to_db(skill_position),
                    skill.as_str(),
                ],
            )?;
        }
    }

    for (position, work) in draft.work.iter().enumerate() {
        tx.execute(
            "INSERT INTO profile_work (profile_id, position, role, company) VALUES (?1, ?2, ?3, ?4);",
            params![
                profile_id,
                position_to_db(position),
                work.role.as_str(),
                work.company.as_str(),
            ],
        )?;
    }

    Ok(())
}

fn delete_children(tx: &Transaction<'_>, profile_id: &str) -> RepoResult<()> {
    for table in [
        "project_skills",
        "profile_projects",
        "profile_skills",
        "profile_work",
    ] {
        tx.execute(
            &format!("DELETE FROM {table} WHERE profile_id = ?1;"),
            [profile_id],
        )?;
    }
    Ok(())
}

fn parse_profile_row(conn: &Connection, row: &Row<'_>) -> RepoResult<Profile> {
    let id_text: String = row.get("id")?;
    let id = parse_profile_id(&id_text)?;

    let links = match row.get::<_, i64>("has_links")? {
        0 => None,
        1 => Some(Links {
            github: row.get("link_github")?,
            linkedin: row.get("link_linkedin")?,
            portfolio: row.get("link_portfolio")?,
        }),
        other => {
            return Err(RepoError::InvalidData(format!(
                "invalid has_links value `{other}` in profiles.has_links"
            )));
        }
    };

    Ok(Profile {
        id,
        name: row.get("name")?,
        email: row.get("email")?,
        education: row.get("education")?,
        skills: load_profile_skills(conn, &id_text)?,
        projects: load_projects(conn, &id_text)?,
        work: load_work(conn, &id_text)?,
        links,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}

fn load_profile_skills(conn: &Connection, profile_id: &str) -> RepoResult<Vec<String>> {
    let mut stmt = conn.prepare(
        "SELECT skill FROM profile_skills WHERE profile_id = ?1 ORDER BY position ASC;",
    )?;
    let mut rows = stmt.query([profile_id])?;
    let mut skills = Vec::new();
    while let Some(row) = rows.next()? {
        skills.push(row.get(0)?);
    }
    Ok(skills)
}

fn load_projects(conn: &Connection, profile_id: &str) -> RepoResult<Vec<Project>> {
    let mut stmt = conn.prepare(
        "SELECT position, title, description, link
         FROM profile_projects
         WHERE profile_id = ?1
         ORDER BY position ASC;",
    )?;
    let mut skills_stmt = conn.prepare(
        "SELECT skill
         FROM project_skills
         WHERE profile_id = ?1 AND project_position = ?2
         ORDER BY position ASC;",
    )?;

    let mut rows = stmt.query([profile_id])?;
    let mut projects = Vec::new();
    while let Some(row) = rows.next()? {
        let position: i64 = row.get("position")?;
        let mut skill_rows = skills_stmt.query(params![profile_id, position])?;
        let mut skills = Vec::new();
        while let Some(skill_row) = skill_rows.next()? {
            skills.push(skill_row.get(0)?);
        }

        projects.push(Project {
            title: row.get("title")?,
            description: row.get("description")?,
            link: row.get("link")?,
            skills,
        });
    }
    Ok(projects)
}

fn load_work(conn: &Connection, profile_id: &str) -> RepoResult<Vec<Work>> {
    let mut stmt = conn.prepare(
        "SELECT role, company FROM profile_work WHERE profile_id = ?1 ORDER BY position ASC;",
    )?;
    let mut rows = stmt.query([profile_id])?;
    let mut work = Vec::new();
    while let Some(row) = rows.next()? {
        work.push(Work {
            role: row.get("role")?,
            company: row.get("company")?,
        });
    }
    Ok(work)
}

fn unique_violation(err: &rusqlite::Error) -> Option<UniqueField> {
    let rusqlite::Error::SqliteFailure(failure, Some(message)) = err else {
        return None;
    };
    if failure.code != ErrorCode::ConstraintViolation {
        return None;
    }
    let captures = UNIQUE_VIOLATION_RE.captures(message)?;
    UniqueField::from_constraint(captures.get(1)?.as_str(), captures.get(2)?.as_str())
}

fn parse_profile_id(value: &str) -> RepoResult<ProfileId> {
    Uuid::parse_str(value)
        .map_err(|_| RepoError::InvalidData(format!("invalid uuid value `{value}` in profiles.id")))
}

fn table_exists(conn: &Connection, table: &str) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn now_epoch_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| i64::try_from(elapsed.as_millis()).unwrap_or(i64::MAX))
        .unwrap_or(0)
}

fn position_to_db(position: usize) -> i64 {
    i64::try_from(position).unwrap_or(i64::MAX)
}

fn bool_to_int(value: bool) -> i64 {
    if value {
        1
    } else {
        0
    }
}
