use base64::{engine::general_purpose::STANDARD, Engine as _};
use jenkins_core::{AdminError, NewLocalUser};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;
use std::time::Duration;
use tracing::{debug, info, warn};
use ureq::Agent;

use crate::envelope::{self, Empty, LocalUserData, PermissionCatalog, PermissionChanges, PermissionsData};
use crate::error::{JenkinsError, Result};
use crate::templates::{
    Command, CommandTemplates, NewUserParams, NoParams, PermissionParams, UserParams,
};

/// Path of the script console's plain-text endpoint
const SCRIPT_ENDPOINT: &str = "/scriptText";

/// CSRF crumb issuer; answers 404 when CSRF protection is off
const CRUMB_ENDPOINT: &str = "/crumbIssuer/api/json";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Build the agent used for script calls.
///
/// Status codes are not turned into errors so the body of a failed call can
/// be reported.
pub fn build_agent(timeout: Duration) -> Agent {
    Agent::config_builder()
        .timeout_global(Some(timeout))
        .http_status_as_error(false)
        .build()
        .into()
}

/// `Authorization` header value for a user and password or API token
pub fn basic_auth(username: &str, token: &str) -> String {
    format!("Basic {}", STANDARD.encode(format!("{}:{}", username, token)))
}

/// CSRF token to echo back as a request header
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Crumb {
    pub crumb_request_field: String,
    pub crumb: String,
}

/// Jenkins script console client
///
/// Each operation renders one Groovy script, posts it to `/scriptText`, and
/// decodes the JSON envelope the script prints.
pub struct JenkinsClient {
    agent: Agent,
    base_url: String,
    auth_header: Option<String>,
    templates: CommandTemplates,
    crumb: OnceLock<Option<Crumb>>,
}

impl JenkinsClient {
    /// Create a client authenticating with Basic Auth.
    ///
    /// The password may be a user API token.
    pub fn new(base_url: &str, username: &str, password: &str) -> Self {
        Self::with_agent(
            build_agent(DEFAULT_TIMEOUT),
            base_url,
            Some(basic_auth(username, password)),
        )
    }

    /// Create a client from a preconfigured agent
    pub fn with_agent(agent: Agent, base_url: &str, auth_header: Option<String>) -> Self {
        Self {
            agent,
            base_url: base_url.trim_end_matches('/').to_string(),
            auth_header,
            templates: CommandTemplates::new(),
            crumb: OnceLock::new(),
        }
    }

    /// Fetch the CSRF crumb once per client.
    ///
    /// The agent keeps the session cookie the crumb is bound to, so
    /// password logins pass CSRF protection as well as API tokens.
    pub fn crumb(&self) -> Result<Option<&Crumb>> {
        if let Some(crumb) = self.crumb.get() {
            return Ok(crumb.as_ref());
        }
        let fetched = self.fetch_crumb()?;
        Ok(self.crumb.get_or_init(|| fetched).as_ref())
    }

    fn fetch_crumb(&self) -> Result<Option<Crumb>> {
        let url = format!("{}{}", self.base_url, CRUMB_ENDPOINT);

        let mut request = self.agent.get(&url).header("Accept", "application/json");
        if let Some(auth) = &self.auth_header {
            request = request.header("Authorization", auth);
        }

        let mut response = request.call()?;
        let status = response.status().as_u16();
        let body = response.body_mut().read_to_string()?;

        match status {
            200 => {
                let crumb: Crumb = serde_json::from_str(&body)?;
                debug!(field = %crumb.crumb_request_field, "crumb issued");
                Ok(Some(crumb))
            }
            404 => {
                debug!("crumb issuer disabled");
                Ok(None)
            }
            _ => Err(JenkinsError::Status { status, body }),
        }
    }

    /// Post script text and return the raw response body.
    ///
    /// Any status other than 200 is an error carrying the status and body.
    pub fn execute(&self, script: &str) -> Result<String> {
        let crumb = self.crumb()?;
        let url = format!("{}{}", self.base_url, SCRIPT_ENDPOINT);

        let mut request = self.agent.post(&url).header("Accept", "application/json");
        if let Some(auth) = &self.auth_header {
            request = request.header("Authorization", auth);
        }
        if let Some(crumb) = crumb {
            request = request.header(crumb.crumb_request_field.as_str(), crumb.crumb.as_str());
        }

        let mut response = request.send_form([("script", script)])?;
        let status = response.status().as_u16();
        let body = response.body_mut().read_to_string()?;

        if status != 200 {
            return Err(JenkinsError::Status { status, body });
        }

        Ok(body)
    }

    fn run<P, T>(&self, command: Command, params: &P) -> Result<T>
    where
        P: Serialize,
        T: DeserializeOwned + Default,
    {
        let script = self.templates.render(command, params)?;
        debug!(%command, script_bytes = script.len(), "executing script");

        let body = self.execute(&script)?;
        debug!(%command, response_bytes = body.len(), "script completed");

        envelope::decode(&body)
    }

    pub fn get_local_user(&self, username: &str) -> Result<LocalUserData> {
        self.run(Command::GetLocalUser, &UserParams { username })
    }

    pub fn create_local_user(&self, user: &NewLocalUser) -> Result<()> {
        check_username(&user.username)?;

        let params = NewUserParams {
            username: &user.username,
            password: &user.password,
            fullname: &user.fullname,
            email: &user.email,
            description: user.effective_description(),
        };
        let _: Empty = self.run(Command::CreateLocalUser, &params)?;
        info!(username = %user.username, "created local user");
        Ok(())
    }

    pub fn delete_local_user(&self, username: &str) -> Result<()> {
        check_username(username)?;

        let _: Empty = self.run(Command::DeleteLocalUser, &UserParams { username })?;
        info!(%username, "deleted local user");
        Ok(())
    }

    pub fn get_user_permissions(&self, username: &str) -> Result<PermissionsData> {
        self.run(Command::GetUserPermissions, &UserParams { username })
    }

    /// Grant permissions without revoking anything
    pub fn create_user_permissions(
        &self,
        username: &str,
        permissions: &[String],
    ) -> Result<PermissionChanges> {
        self.change_permissions(Command::CreateUserPermissions, username, permissions)
    }

    /// Make the user's grants exactly `permissions`
    pub fn update_user_permissions(
        &self,
        username: &str,
        permissions: &[String],
    ) -> Result<PermissionChanges> {
        self.change_permissions(Command::UpdateUserPermissions, username, permissions)
    }

    pub fn delete_user_permissions(&self, username: &str) -> Result<PermissionChanges> {
        self.change_permissions(Command::DeleteUserPermissions, username, &[])
    }

    /// Canonical names of every grantable permission, sorted
    pub fn list_permissions(&self) -> Result<Vec<String>> {
        let catalog: PermissionCatalog = self.run(Command::ListPermissions, &NoParams {})?;
        Ok(catalog.permissions)
    }

    fn change_permissions(
        &self,
        command: Command,
        username: &str,
        permissions: &[String],
    ) -> Result<PermissionChanges> {
        check_username(username)?;

        let changes: PermissionChanges = self.run(
            command,
            &PermissionParams {
                username,
                permissions,
            },
        )?;

        // Unknown names are skipped server-side rather than failing the call
        if !changes.unknown.is_empty() {
            warn!(
                %username,
                unknown = ?changes.unknown,
                "ignored permission names with no grantable permission"
            );
        }
        info!(
            %command,
            %username,
            granted = ?changes.granted,
            revoked = ?changes.revoked,
            "updated global matrix"
        );

        Ok(changes)
    }
}

fn check_username(username: &str) -> Result<()> {
    jenkins_core::validate_username(username).map_err(|e| match e {
        AdminError::InvalidInput(msg) => JenkinsError::InvalidInput(msg),
        other => JenkinsError::InvalidInput(other.to_string()),
    })
}
