use std::time::Duration;

use async_trait::async_trait;
use metrics::counter;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{Value, json};

use crate::{DeployApi, DeployError, Deployment, PublishRequest};

const ENTRY_FILE: &str = "index.html";
const CONFIG_FILE: &str = "vercel.json";
const DEPLOYMENTS_PATH: &str = "/v13/deployments";

#[derive(Debug, Deserialize)]
struct DeploymentResponse {
    url: Option<String>,
    #[serde(default)]
    alias: Vec<String>,
    uid: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: Option<ErrorDetail>,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    message: Option<String>,
}

/// Reqwest-backed client for the Vercel deployments endpoint.
pub struct HttpVercelApi {
    http: Client,
    token: String,
    api_base: String,
    timeout: Duration,
}

impl HttpVercelApi {
    pub fn new(
        http: Client,
        token: impl Into<String>,
        api_base: impl Into<String>,
        timeout: Duration,
    ) -> Self {
        Self {
            http,
            token: token.into(),
            api_base: api_base.into(),
            timeout,
        }
    }

    fn endpoint(&self) -> String {
        format!("{}{}", self.api_base.trim_end_matches('/'), DEPLOYMENTS_PATH)
    }
}

#[async_trait]
impl DeployApi for HttpVercelApi {
    async fn publish(&self, request: PublishRequest) -> Result<Deployment, DeployError> {
        let name = sanitize_project_name(&request.desired_name);
        let payload = deployment_payload(&name, &request.content);

        let response = self
            .http
            .post(self.endpoint())
            .bearer_auth(&self.token)
            .timeout(self.timeout)
            .json(&payload)
            .send()
            .await
            .map_err(classify_transport)?;

        let status = response.status();
        let body = response.text().await.map_err(classify_transport)?;

        if !status.is_success() {
            let message = upstream_message(&body);
            let err = classify_failure(&name, message);
            counter!("sitebot_deploys_total", "outcome" => err.outcome()).increment(1);
            tracing::warn!(status = status.as_u16(), name = %name, "deployment failed");
            return Err(err);
        }

        let parsed: DeploymentResponse = serde_json::from_str(&body)
            .map_err(|err| DeployError::UnexpectedResponse(err.to_string()))?;
        let deployment = deployment_from_response(&name, parsed)?;
        counter!("sitebot_deploys_total", "outcome" => "success").increment(1);
        tracing::info!(name = %name, url = %deployment.url, "deployment succeeded");
        Ok(deployment)
    }
}

/// Maps a desired name onto the platform's identifier charset: lowercase
/// alphanumerics and hyphens, everything else becomes a hyphen.
pub fn sanitize_project_name(desired: &str) -> String {
    desired
        .to_lowercase()
        .chars()
        .map(|c| {
            if c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' {
                c
            } else {
                '-'
            }
        })
        .collect()
}

fn deployment_payload(name: &str, content: &str) -> Value {
    json!({
        "name": name,
        "files": [
            { "file": ENTRY_FILE, "data": content },
            { "file": CONFIG_FILE, "data": single_page_config() },
        ],
        "projectSettings": { "framework": null },
        "target": "production",
    })
}

/// Hosting config routing every path to the entry file.
fn single_page_config() -> String {
    let config = json!({
        "builds": [
            { "src": ENTRY_FILE, "use": "@vercel/static" }
        ],
        "routes": [
            { "src": "/(.*)", "dest": "/index.html" }
        ]
    });
    serde_json::to_string_pretty(&config).unwrap_or_default()
}

fn upstream_message(body: &str) -> String {
    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.error)
        .and_then(|e| e.message)
        .unwrap_or_else(|| body.to_string())
}

fn classify_failure(name: &str, message: String) -> DeployError {
    let lowered = message.to_lowercase();
    let conflict = ["already owned", "already exists", "reserved"]
        .iter()
        .any(|needle| lowered.contains(needle));
    if conflict {
        DeployError::NameConflict {
            name: name.to_string(),
            message,
        }
    } else {
        DeployError::Upstream { message }
    }
}

fn classify_transport(err: reqwest::Error) -> DeployError {
    if err.is_timeout() {
        DeployError::Timeout
    } else {
        DeployError::Transport(err)
    }
}

fn deployment_from_response(
    name: &str,
    response: DeploymentResponse,
) -> Result<Deployment, DeployError> {
    let host = response
        .alias
        .first()
        .cloned()
        .or(response.url)
        .ok_or_else(|| DeployError::UnexpectedResponse("no url in response".into()))?;
    let url = if host.starts_with("https://") || host.starts_with("http://") {
        host
    } else {
        format!("https://{host}")
    };
    Ok(Deployment {
        name: name.to_string(),
        url,
        deployment_id: response.uid.unwrap_or_default(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_lowercases_and_replaces() {
        assert_eq!(sanitize_project_name("My Site!"), "my-site-");
        assert_eq!(sanitize_project_name("already-ok-123"), "already-ok-123");
        assert_eq!(sanitize_project_name("Caf\u{e9}"), "caf-");
    }

    #[test]
    fn payload_contains_entry_and_config_files() {
        let payload = deployment_payload("my-site", "<h1>hi</h1>");
        assert_eq!(payload["name"], "my-site");
        assert_eq!(payload["target"], "production");
        assert_eq!(payload["projectSettings"]["framework"], Value::Null);
        assert_eq!(payload["files"][0]["file"], "index.html");
        assert_eq!(payload["files"][0]["data"], "<h1>hi</h1>");
        assert_eq!(payload["files"][1]["file"], "vercel.json");
    }

    #[test]
    fn config_routes_all_paths_to_entry() {
        let config: Value = serde_json::from_str(&single_page_config()).unwrap();
        assert_eq!(config["builds"][0]["use"], "@vercel/static");
        assert_eq!(config["routes"][0]["src"], "/(.*)");
        assert_eq!(config["routes"][0]["dest"], "/index.html");
    }

    #[test]
    fn conflict_messages_are_distinguished() {
        let err = classify_failure("my-site", "Project \"my-site\" is already owned by you".into());
        assert!(matches!(err, DeployError::NameConflict { .. }));

        let err = classify_failure("my-site", "internal error".into());
        assert!(matches!(err, DeployError::Upstream { .. }));
    }

    #[test]
    fn upstream_message_prefers_error_body() {
        let body = r#"{"error":{"message":"name is reserved"}}"#;
        assert_eq!(upstream_message(body), "name is reserved");
        assert_eq!(upstream_message("plain text"), "plain text");
    }

    #[test]
    fn url_prefers_alias_over_deployment_url() {
        let response = DeploymentResponse {
            url: Some("my-site-abc123.vercel.app".into()),
            alias: vec!["my-site.vercel.app".into()],
            uid: Some("dpl_1".into()),
        };
        let deployment = deployment_from_response("my-site", response).unwrap();
        assert_eq!(deployment.url, "https://my-site.vercel.app");
        assert_eq!(deployment.deployment_id, "dpl_1");
    }

    #[test]
    fn url_falls_back_to_deployment_host() {
        let response = DeploymentResponse {
            url: Some("my-site-abc123.vercel.app".into()),
            alias: vec![],
            uid: Some("dpl_2".into()),
        };
        let deployment = deployment_from_response("my-site", response).unwrap();
        assert_eq!(deployment.url, "https://my-site-abc123.vercel.app");
    }

    #[test]
    fn missing_url_is_an_unexpected_response() {
        let response = DeploymentResponse {
            url: None,
            alias: vec![],
            uid: None,
        };
        assert!(matches!(
            deployment_from_response("my-site", response),
            Err(DeployError::UnexpectedResponse(_))
        ));
    }
}
