//! Collaborator listing against the GitHub REST API.

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use tracing::{error, info};

const GITHUB_API: &str = "https://api.github.com";
const USER_AGENT: &str = "buildlog-archiver";

/// GitHub basic-auth credentials, taken from the environment.
#[derive(Debug)]
pub struct Credentials {
    pub user: String,
    pub token: String,
}

impl Credentials {
    pub fn new_from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        let user =
            std::env::var("GITHUB_USER").context("GITHUB_USER environment variable not set")?;
        let token =
            std::env::var("GITHUB_TOKEN").context("GITHUB_TOKEN environment variable not set")?;
        info!(user = %user, "GitHub credentials loaded from environment");
        Ok(Credentials { user, token })
    }
}

#[derive(Debug, Deserialize)]
struct Collaborator {
    login: String,
    permissions: Option<Permissions>,
}

#[derive(Debug, Deserialize)]
struct Permissions {
    #[serde(default)]
    pull: bool,
}

/// Fetch the repository's collaborators and return the logins with pull
/// (read) access, in the order the API returned them.
pub async fn list_pull_collaborators(
    owner: &str,
    repo: &str,
    creds: &Credentials,
) -> Result<Vec<String>> {
    let url = format!("{GITHUB_API}/repos/{owner}/{repo}/collaborators");
    info!(url = %url, "Fetching collaborators");

    let body = reqwest::Client::new()
        .get(&url)
        .basic_auth(&creds.user, Some(&creds.token))
        .header(reqwest::header::USER_AGENT, USER_AGENT)
        .header(reqwest::header::ACCEPT, "application/vnd.github+json")
        .send()
        .await
        .context("collaborators request failed")?
        .text()
        .await
        .context("failed to read collaborators response body")?;

    parse_pull_collaborators(&body)
}

/// Response-shape rules, kept pure so they are testable offline:
/// an object with a `message` field is an upstream error echoed back
/// verbatim; an array is the collaborator list; an entry without a
/// permissions field means the response shape is not what we expect.
pub fn parse_pull_collaborators(body: &str) -> Result<Vec<String>> {
    let value: serde_json::Value =
        serde_json::from_str(body).context("collaborators response was not valid JSON")?;

    if let Some(message) = value.get("message").and_then(|m| m.as_str()) {
        error!(message = %message, "GitHub API returned an error payload");
        bail!("{message}");
    }

    let collaborators: Vec<Collaborator> =
        serde_json::from_value(value).context("unexpected collaborators response shape")?;

    let mut readers = Vec::new();
    for collaborator in collaborators {
        let Some(permissions) = collaborator.permissions else {
            error!(login = %collaborator.login, "Collaborator entry is missing the permissions field");
            bail!(
                "collaborator entry for {} is missing the permissions field",
                collaborator.login
            );
        };
        if permissions.pull {
            readers.push(collaborator.login);
        }
    }
    Ok(readers)
}
