//! Authenticated repository session.
//!
//! A [`Session`] wraps one instance's HTTP endpoint: it logs in, resolves
//! the configured sub-repository, and prefixes scoped request paths with
//! `repositories/{id}/`. All requests are blocking; records are pipelined
//! one at a time, so a single agent per role is enough.
//!
//! The sub-repository scope is mutable for exactly one caller: format
//! conversion operates above sub-repositories, so it takes a
//! [`ScopeGuard`] that clears the scope and restores it on drop, on every
//! exit path.

use std::ops::{Deref, DerefMut};
use std::time::Duration;

use serde::Deserialize;

use eadsync_core::error::ApiError;
use eadsync_core::job::SyncJob;
use eadsync_core::types::{RepoTarget, Role};

use crate::error::ClientError;

/// Page size for listing endpoints, matching the upstream client default.
pub(crate) const PAGE_SIZE: u32 = 50;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

#[derive(Debug, Deserialize)]
struct LoginResponse {
    session: String,
}

#[derive(Debug, Deserialize)]
struct RepositorySummary {
    uri: String,
    repo_code: String,
}

/// An authenticated session against one repository instance, pinned to a
/// resolved sub-repository scope.
pub struct Session {
    agent: ureq::Agent,
    base_url: String,
    token: String,
    role: Role,
    repo_id: Option<u32>,
}

impl Session {
    /// Authenticate and resolve the sub-repository for one role of the job.
    ///
    /// An unresolvable sub-repository aborts the run: this is the one
    /// startup failure that must not be swallowed.
    pub fn open(role: Role, job: &SyncJob) -> Result<Session, ClientError> {
        let agent = ureq::AgentBuilder::new().timeout(REQUEST_TIMEOUT).build();
        let mut session = Session {
            agent,
            base_url: job.url(role).trim_end_matches('/').to_string(),
            token: String::new(),
            role,
            repo_id: None,
        };

        session.token = session.login(job.username(role), job.password(role))?;

        // Validation guarantees a target is present for both roles.
        let target = job
            .repo_target(role)
            .ok_or(ApiError::Transport("missing repository target".to_string()))?;
        let repo_id = session
            .resolve_repository(&target)
            .ok_or(ClientError::InvalidRepository { role, target })?;
        session.repo_id = Some(repo_id);

        tracing::info!("[{role}] using {} (repositories/{repo_id})", session.base_url);
        Ok(session)
    }

    fn login(&self, username: &str, password: &str) -> Result<String, ClientError> {
        let url = format!("{}/users/{username}/login", self.base_url);
        let response = self
            .agent
            .post(&url)
            .query("password", password)
            .call()
            .map_err(|e| ClientError::Login {
                role: self.role,
                username: username.to_string(),
                source: to_api_error(e),
            })?;
        let body: LoginResponse = read_json(response).map_err(|e| ClientError::Login {
            role: self.role,
            username: username.to_string(),
            source: e,
        })?;
        Ok(body.session)
    }

    /// Resolve a repo target to its numeric id, verifying it exists.
    fn resolve_repository(&self, target: &RepoTarget) -> Option<u32> {
        match target {
            RepoTarget::Id(id) => {
                self.get_unscoped(&format!("repositories/{id}"), &[]).ok()?;
                Some(*id)
            }
            RepoTarget::Code(code) => {
                let response = self.get_unscoped("repositories", &[]).ok()?;
                let repos: Vec<RepositorySummary> = read_json(response).ok()?;
                repos
                    .iter()
                    .find(|r| r.repo_code.eq_ignore_ascii_case(code))
                    .and_then(|r| r.uri.rsplit('/').next())
                    .and_then(|id| id.parse().ok())
            }
        }
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// The currently-selected sub-repository, if any.
    pub fn repo_scope(&self) -> Option<u32> {
        self.repo_id
    }

    /// Clear the sub-repository scope until the guard drops.
    pub fn clear_repo_scope(&mut self) -> ScopeGuard<'_> {
        let prior = self.repo_id.take();
        ScopeGuard {
            session: self,
            prior,
        }
    }

    // -----------------------------------------------------------------------
    // Request plumbing
    // -----------------------------------------------------------------------

    /// Scope-relative path → absolute URL.
    fn url_for(&self, path: &str) -> String {
        match self.repo_id {
            Some(id) => format!("{}/repositories/{id}/{path}", self.base_url),
            None => format!("{}/{path}", self.base_url),
        }
    }

    fn get_unscoped(&self, path: &str, query: &[(&str, &str)]) -> Result<ureq::Response, ApiError> {
        self.call_with_query(
            self.agent.get(&format!("{}/{path}", self.base_url)),
            query,
        )
    }

    pub(crate) fn get(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<ureq::Response, ApiError> {
        self.call_with_query(self.agent.get(&self.url_for(path)), query)
    }

    pub(crate) fn post_string(&self, path: &str, body: &str) -> Result<ureq::Response, ApiError> {
        self.agent
            .post(&self.url_for(path))
            .set("X-ArchivesSpace-Session", &self.token)
            .send_string(body)
            .map_err(to_api_error)
    }

    pub(crate) fn delete(&self, path: &str) -> Result<ureq::Response, ApiError> {
        self.agent
            .delete(&self.url_for(path))
            .set("X-ArchivesSpace-Session", &self.token)
            .call()
            .map_err(to_api_error)
    }

    fn call_with_query(
        &self,
        request: ureq::Request,
        query: &[(&str, &str)],
    ) -> Result<ureq::Response, ApiError> {
        let mut request = request.set("X-ArchivesSpace-Session", &self.token);
        for (key, value) in query {
            request = request.query(key, value);
        }
        request.call().map_err(to_api_error)
    }

    #[cfg(test)]
    pub(crate) fn stub(role: Role, repo_id: Option<u32>) -> Session {
        Session {
            agent: ureq::agent(),
            base_url: "http://localhost:0".to_string(),
            token: "stub".to_string(),
            role,
            repo_id,
        }
    }
}

/// RAII view of a session with its sub-repository scope cleared.
///
/// Dropping the guard restores the prior scope, so success, error, and
/// early-return paths all leave the session the way they found it.
pub struct ScopeGuard<'a> {
    session: &'a mut Session,
    prior: Option<u32>,
}

impl Deref for ScopeGuard<'_> {
    type Target = Session;

    fn deref(&self) -> &Session {
        self.session
    }
}

impl DerefMut for ScopeGuard<'_> {
    fn deref_mut(&mut self) -> &mut Session {
        self.session
    }
}

impl Drop for ScopeGuard<'_> {
    fn drop(&mut self) {
        self.session.repo_id = self.prior.take();
    }
}

// ---------------------------------------------------------------------------
// Response helpers
// ---------------------------------------------------------------------------

pub(crate) fn to_api_error(err: ureq::Error) -> ApiError {
    match err {
        ureq::Error::Status(status, response) => ApiError::Status {
            status,
            body: response.into_string().unwrap_or_default(),
        },
        ureq::Error::Transport(transport) => ApiError::Transport(transport.to_string()),
    }
}

pub(crate) fn read_body(response: ureq::Response) -> Result<String, ApiError> {
    response
        .into_string()
        .map_err(|e| ApiError::Transport(e.to_string()))
}

pub(crate) fn read_json<T: serde::de::DeserializeOwned>(
    response: ureq::Response,
) -> Result<T, ApiError> {
    let body = read_body(response)?;
    Ok(serde_json::from_str(&body)?)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scoped_and_unscoped_paths() {
        let mut session = Session::stub(Role::Destination, Some(3));
        assert_eq!(
            session.url_for("batch_imports"),
            "http://localhost:0/repositories/3/batch_imports"
        );

        let guard = session.clear_repo_scope();
        assert_eq!(
            guard.url_for("plugins/jsonmodel_from_format/resource/ead"),
            "http://localhost:0/plugins/jsonmodel_from_format/resource/ead"
        );
    }

    #[test]
    fn scope_guard_restores_on_drop() {
        let mut session = Session::stub(Role::Destination, Some(7));
        {
            let guard = session.clear_repo_scope();
            assert_eq!(guard.repo_scope(), None);
        }
        assert_eq!(session.repo_scope(), Some(7));
    }

    #[test]
    fn scope_guard_restores_on_error_path() {
        fn fails_midway(session: &mut Session) -> Result<(), ApiError> {
            let _guard = session.clear_repo_scope();
            Err(ApiError::Transport("connection reset".to_string()))
        }

        let mut session = Session::stub(Role::Destination, Some(2));
        let result = fails_midway(&mut session);
        assert!(result.is_err());
        assert_eq!(session.repo_scope(), Some(2));
    }

    #[test]
    fn scope_guard_restores_absent_scope_too() {
        let mut session = Session::stub(Role::Source, None);
        {
            let _guard = session.clear_repo_scope();
        }
        assert_eq!(session.repo_scope(), None);
    }

    #[test]
    fn transport_errors_map_without_status() {
        // A request against an unroutable endpoint yields a transport error,
        // never a status.
        let session = Session::stub(Role::Source, None);
        let err = session.get("resources", &[]).unwrap_err();
        assert!(matches!(err, ApiError::Transport(_)));
    }
}
