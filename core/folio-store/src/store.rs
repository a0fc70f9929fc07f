//! The SQLite store behind the share pipeline.

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::Utc;
use folio_model::{
    BackendResult, FeatureData, LinkData, ProfileData, ProjectData, SectionData, ShareAdmin,
    ShareBackend, ShareRecord, ViewEvent,
};
use folio_types::{FeatureId, LinkId, OwnerId, ProjectId, SectionId, ShareToken, ViewId};
use rusqlite::{params, Connection, OptionalExtension};
use tracing::debug;

use crate::error::StoreResult;

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS portfolio_shares (
    owner_id    TEXT PRIMARY KEY,
    share_token TEXT NOT NULL UNIQUE,
    active      INTEGER NOT NULL DEFAULT 1,
    created_at  TEXT NOT NULL,
    updated_at  TEXT NOT NULL
);
CREATE TABLE IF NOT EXISTS profiles (
    owner_id    TEXT PRIMARY KEY,
    name        TEXT NOT NULL DEFAULT '',
    photo       TEXT NOT NULL DEFAULT '',
    email       TEXT NOT NULL DEFAULT '',
    telephone   TEXT NOT NULL DEFAULT '',
    role        TEXT NOT NULL DEFAULT '',
    tagline     TEXT NOT NULL DEFAULT '',
    description TEXT NOT NULL DEFAULT ''
);
CREATE TABLE IF NOT EXISTS sections (
    id         TEXT PRIMARY KEY,
    owner_id   TEXT NOT NULL,
    title      TEXT NOT NULL,
    created_at TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_sections_owner ON sections(owner_id);
CREATE TABLE IF NOT EXISTS projects (
    id          TEXT PRIMARY KEY,
    section_id  TEXT NOT NULL,
    title       TEXT NOT NULL,
    description TEXT,
    created_at  TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_projects_section ON projects(section_id);
CREATE TABLE IF NOT EXISTS links (
    id         TEXT PRIMARY KEY,
    project_id TEXT NOT NULL,
    title      TEXT NOT NULL,
    url        TEXT NOT NULL,
    created_at TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_links_project ON links(project_id);
CREATE TABLE IF NOT EXISTS features (
    id         TEXT PRIMARY KEY,
    project_id TEXT NOT NULL,
    title      TEXT NOT NULL,
    created_at TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_features_project ON features(project_id);
CREATE TABLE IF NOT EXISTS portfolio_views (
    id          TEXT PRIMARY KEY,
    share_token TEXT NOT NULL,
    referrer    TEXT NOT NULL,
    user_agent  TEXT NOT NULL,
    viewed_at   TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_views_token ON portfolio_views(share_token);
";

/// SQLite-backed implementation of [`ShareBackend`] and [`ShareAdmin`].
///
/// All queries are short single-row or small-range reads, so the
/// connection sits behind a plain mutex; the guard is never held across an
/// await point.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Opens (or creates) the database at `path` and applies the schema.
    pub fn open(path: &Path) -> StoreResult<Self> {
        let conn = Connection::open(path)?;
        Self::from_connection(conn)
    }

    /// Opens an in-memory database. Used by tests and ephemeral demos.
    pub fn open_in_memory() -> StoreResult<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> StoreResult<Self> {
        conn.execute_batch(SCHEMA)?;
        debug!("schema applied");
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn conn(&self) -> MutexGuard<'_, Connection> {
        // Queries never panic while holding the lock, but recover from
        // poisoning anyway rather than cascading the panic.
        self.conn.lock().unwrap_or_else(|e| e.into_inner())
    }

    // ── owner-side writes (editing surface and tests) ─────────────────

    /// Inserts or replaces the owner's profile.
    pub fn put_profile(&self, owner: OwnerId, profile: &ProfileData) -> StoreResult<()> {
        self.conn().execute(
            "INSERT INTO profiles
                 (owner_id, name, photo, email, telephone, role, tagline, description)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
             ON CONFLICT(owner_id) DO UPDATE SET
                 name = excluded.name, photo = excluded.photo,
                 email = excluded.email, telephone = excluded.telephone,
                 role = excluded.role, tagline = excluded.tagline,
                 description = excluded.description",
            params![
                owner.to_string(),
                profile.name,
                profile.photo,
                profile.email,
                profile.telephone,
                profile.role,
                profile.tagline,
                profile.description,
            ],
        )?;
        Ok(())
    }

    /// Appends a section for the owner, returning its id.
    pub fn add_section(&self, owner: OwnerId, title: &str) -> StoreResult<SectionId> {
        let id = SectionId::new();
        self.conn().execute(
            "INSERT INTO sections (id, owner_id, title, created_at) VALUES (?1, ?2, ?3, ?4)",
            params![id.to_string(), owner.to_string(), title, Utc::now()],
        )?;
        Ok(id)
    }

    /// Appends a project to a section, returning its id.
    pub fn add_project(
        &self,
        section: SectionId,
        title: &str,
        description: Option<&str>,
    ) -> StoreResult<ProjectId> {
        let id = ProjectId::new();
        self.conn().execute(
            "INSERT INTO projects (id, section_id, title, description, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![id.to_string(), section.to_string(), title, description, Utc::now()],
        )?;
        Ok(id)
    }

    /// Appends a link to a project, returning its id.
    pub fn add_link(&self, project: ProjectId, title: &str, url: &str) -> StoreResult<LinkId> {
        let id = LinkId::new();
        self.conn().execute(
            "INSERT INTO links (id, project_id, title, url, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![id.to_string(), project.to_string(), title, url, Utc::now()],
        )?;
        Ok(id)
    }

    /// Appends a feature bullet to a project, returning its id.
    pub fn add_feature(&self, project: ProjectId, title: &str) -> StoreResult<FeatureId> {
        let id = FeatureId::new();
        self.conn().execute(
            "INSERT INTO features (id, project_id, title, created_at) VALUES (?1, ?2, ?3, ?4)",
            params![id.to_string(), project.to_string(), title, Utc::now()],
        )?;
        Ok(id)
    }

    /// Number of recorded views for a token. Test/ops observation helper;
    /// nothing on the public path reads views back.
    pub fn view_count(&self, token: &ShareToken) -> StoreResult<u64> {
        let count: u64 = self.conn().query_row(
            "SELECT COUNT(*) FROM portfolio_views WHERE share_token = ?1",
            params![token.as_str()],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    // ── sync internals behind the async traits ────────────────────────

    fn fetch_share_record(&self, token: &ShareToken) -> StoreResult<Option<ShareRecord>> {
        let conn = self.conn();
        let row = conn
            .query_row(
                "SELECT owner_id, share_token, active, created_at, updated_at
                 FROM portfolio_shares WHERE share_token = ?1",
                params![token.as_str()],
                |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, bool>(2)?,
                        row.get(3)?,
                        row.get(4)?,
                    ))
                },
            )
            .optional()?;

        row.map(|(owner, token, active, created_at, updated_at)| {
            Ok(ShareRecord {
                owner: OwnerId::parse(&owner)?,
                token: ShareToken::parse(&token)
                    .map_err(|e| crate::StoreError::InvalidData(e.to_string()))?,
                active,
                created_at,
                updated_at,
            })
        })
        .transpose()
    }

    fn fetch_record_for_owner(&self, owner: OwnerId) -> StoreResult<Option<ShareRecord>> {
        let conn = self.conn();
        let row = conn
            .query_row(
                "SELECT share_token, active, created_at, updated_at
                 FROM portfolio_shares WHERE owner_id = ?1",
                params![owner.to_string()],
                |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, bool>(1)?,
                        row.get(2)?,
                        row.get(3)?,
                    ))
                },
            )
            .optional()?;

        row.map(|(token, active, created_at, updated_at)| {
            Ok(ShareRecord {
                owner,
                token: ShareToken::parse(&token)
                    .map_err(|e| crate::StoreError::InvalidData(e.to_string()))?,
                active,
                created_at,
                updated_at,
            })
        })
        .transpose()
    }

    fn fetch_profile(&self, owner: OwnerId) -> StoreResult<ProfileData> {
        let conn = self.conn();
        let profile = conn
            .query_row(
                "SELECT name, photo, email, telephone, role, tagline, description
                 FROM profiles WHERE owner_id = ?1",
                params![owner.to_string()],
                |row| {
                    Ok(ProfileData {
                        name: row.get(0)?,
                        photo: row.get(1)?,
                        email: row.get(2)?,
                        telephone: row.get(3)?,
                        role: row.get(4)?,
                        tagline: row.get(5)?,
                        description: row.get(6)?,
                    })
                },
            )
            .optional()?;
        // No stored profile renders as an empty one, not an error.
        Ok(profile.unwrap_or_default())
    }

    fn fetch_section_graph(&self, owner: OwnerId) -> StoreResult<Vec<SectionData>> {
        let conn = self.conn();

        let mut stmt = conn.prepare(
            "SELECT id, title FROM sections WHERE owner_id = ?1
             ORDER BY created_at ASC, id ASC",
        )?;
        let section_rows = stmt
            .query_map(params![owner.to_string()], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        let mut sections = Vec::with_capacity(section_rows.len());
        for (section_id, title) in section_rows {
            let id = SectionId::parse(&section_id)?;
            let projects = Self::fetch_projects(&conn, &section_id)?;
            sections.push(SectionData { id, title, projects });
        }
        Ok(sections)
    }

    fn fetch_projects(conn: &Connection, section_id: &str) -> StoreResult<Vec<ProjectData>> {
        let mut stmt = conn.prepare(
            "SELECT id, title, description FROM projects WHERE section_id = ?1
             ORDER BY created_at ASC, id ASC",
        )?;
        let rows = stmt
            .query_map(params![section_id], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, Option<String>>(2)?,
                ))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        let mut projects = Vec::with_capacity(rows.len());
        for (project_id, title, description) in rows {
            projects.push(ProjectData {
                id: ProjectId::parse(&project_id)?,
                title,
                // NULL descriptions normalize to empty, never absent
                description: description.unwrap_or_default(),
                links: Self::fetch_links(conn, &project_id)?,
                features: Self::fetch_features(conn, &project_id)?,
            });
        }
        Ok(projects)
    }

    fn fetch_links(conn: &Connection, project_id: &str) -> StoreResult<Vec<LinkData>> {
        let mut stmt = conn.prepare(
            "SELECT id, title, url FROM links WHERE project_id = ?1
             ORDER BY created_at ASC, id ASC",
        )?;
        let rows = stmt
            .query_map(params![project_id], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                ))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        rows.into_iter()
            .map(|(id, title, url)| {
                Ok(LinkData {
                    id: LinkId::parse(&id)?,
                    title,
                    url,
                })
            })
            .collect()
    }

    fn fetch_features(conn: &Connection, project_id: &str) -> StoreResult<Vec<FeatureData>> {
        let mut stmt = conn.prepare(
            "SELECT id, title FROM features WHERE project_id = ?1
             ORDER BY created_at ASC, id ASC",
        )?;
        let rows = stmt
            .query_map(params![project_id], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        rows.into_iter()
            .map(|(id, title)| {
                Ok(FeatureData {
                    id: FeatureId::parse(&id)?,
                    title,
                })
            })
            .collect()
    }

    fn insert_view(&self, event: &ViewEvent) -> StoreResult<()> {
        self.conn().execute(
            "INSERT INTO portfolio_views (id, share_token, referrer, user_agent, viewed_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                ViewId::new().to_string(),
                event.token.as_str(),
                event.referrer,
                event.user_agent,
                event.viewed_at,
            ],
        )?;
        Ok(())
    }

    fn upsert_record(&self, owner: OwnerId, token: ShareToken) -> StoreResult<ShareRecord> {
        let now = Utc::now();
        self.conn().execute(
            "INSERT INTO portfolio_shares (owner_id, share_token, active, created_at, updated_at)
             VALUES (?1, ?2, 1, ?3, ?3)
             ON CONFLICT(owner_id) DO UPDATE SET
                 share_token = excluded.share_token,
                 active = 1,
                 updated_at = excluded.updated_at",
            params![owner.to_string(), token.as_str(), now],
        )?;
        self.fetch_record_for_owner(owner)?.ok_or_else(|| {
            crate::StoreError::InvalidData("share record missing after upsert".into())
        })
    }

    fn update_active(&self, owner: OwnerId, active: bool) -> StoreResult<()> {
        self.conn().execute(
            "UPDATE portfolio_shares SET active = ?2, updated_at = ?3 WHERE owner_id = ?1",
            params![owner.to_string(), active, Utc::now()],
        )?;
        Ok(())
    }
}

#[async_trait]
impl ShareBackend for SqliteStore {
    async fn share_record(&self, token: &ShareToken) -> BackendResult<Option<ShareRecord>> {
        Ok(self.fetch_share_record(token)?)
    }

    async fn profile(&self, owner: OwnerId) -> BackendResult<ProfileData> {
        Ok(self.fetch_profile(owner)?)
    }

    async fn section_graph(&self, owner: OwnerId) -> BackendResult<Vec<SectionData>> {
        Ok(self.fetch_section_graph(owner)?)
    }

    async fn record_view(&self, event: ViewEvent) -> BackendResult<()> {
        Ok(self.insert_view(&event)?)
    }
}

#[async_trait]
impl ShareAdmin for SqliteStore {
    async fn share_record_for_owner(&self, owner: OwnerId) -> BackendResult<Option<ShareRecord>> {
        Ok(self.fetch_record_for_owner(owner)?)
    }

    async fn upsert_share_record(
        &self,
        owner: OwnerId,
        token: ShareToken,
    ) -> BackendResult<ShareRecord> {
        Ok(self.upsert_record(owner, token)?)
    }

    async fn set_share_active(&self, owner: OwnerId, active: bool) -> BackendResult<()> {
        Ok(self.update_active(owner, active)?)
    }
}
