//! Thin client for the Telegram Bot API: long polling, message sending
//! and document downloads.

use std::time::Duration;

use anyhow::{Context, Result, anyhow, bail};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};

/// Extra slack on top of the long-poll window so the HTTP request does not
/// give up before Telegram does.
const POLL_GRACE: Duration = Duration::from_secs(10);
const CALL_TIMEOUT: Duration = Duration::from_secs(15);

#[derive(Debug, Clone, Deserialize)]
pub struct TelegramUpdate {
    pub update_id: i64,
    #[serde(default)]
    pub message: Option<TelegramMessage>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TelegramMessage {
    pub message_id: i64,
    pub chat: TelegramChat,
    #[serde(default)]
    pub from: Option<TelegramUser>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub document: Option<TelegramDocument>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TelegramChat {
    pub id: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TelegramUser {
    pub id: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TelegramDocument {
    pub file_id: String,
    #[serde(default)]
    pub file_name: Option<String>,
    #[serde(default)]
    pub file_size: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
struct TelegramResponse<T> {
    ok: bool,
    result: Option<T>,
    description: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct SentMessage {
    message_id: i64,
}

#[derive(Debug, Clone, Deserialize)]
struct TelegramFile {
    file_path: Option<String>,
}

#[async_trait]
pub trait TelegramApi: Send + Sync {
    async fn get_updates(&self, offset: i64, timeout_secs: u64) -> Result<Vec<TelegramUpdate>>;
    /// Sends a Markdown message, optionally with a reply keyboard or
    /// inline button markup. Returns the sent message id.
    async fn send_message(
        &self,
        chat_id: i64,
        text: &str,
        reply_markup: Option<Value>,
    ) -> Result<i64>;
    async fn edit_message_text(&self, chat_id: i64, message_id: i64, text: &str) -> Result<()>;
    async fn delete_message(&self, chat_id: i64, message_id: i64) -> Result<()>;
    /// Resolves an uploaded document to its content via getFile plus the
    /// file download endpoint.
    async fn download_document(&self, file_id: &str) -> Result<String>;
}

#[derive(Clone)]
pub struct HttpTelegramApi {
    client: Client,
    token: String,
    api_base: String,
}

impl HttpTelegramApi {
    pub fn new(client: Client, token: impl Into<String>, api_base: impl Into<String>) -> Self {
        Self {
            client,
            token: token.into(),
            api_base: api_base.into(),
        }
    }

    fn url(&self, method: &str) -> String {
        format!(
            "{}/bot{}/{}",
            self.api_base.trim_end_matches('/'),
            self.token,
            method
        )
    }

    fn file_url(&self, file_path: &str) -> String {
        format!(
            "{}/file/bot{}/{}",
            self.api_base.trim_end_matches('/'),
            self.token,
            file_path
        )
    }

    async fn call<T: DeserializeOwned>(
        &self,
        method: &str,
        payload: Value,
        timeout: Duration,
    ) -> Result<T> {
        let res = self
            .client
            .post(self.url(method))
            .timeout(timeout)
            .json(&payload)
            .send()
            .await
            .with_context(|| format!("telegram {method} request"))?;
        let status = res.status();
        if !status.is_success() {
            let body = res.text().await.unwrap_or_default();
            bail!("telegram {method} {status}: {body}");
        }
        let body: TelegramResponse<T> = res
            .json()
            .await
            .with_context(|| format!("decode telegram {method} response"))?;
        if !body.ok {
            bail!(
                "telegram {method} failed: {}",
                body.description.unwrap_or_else(|| "unknown error".into())
            );
        }
        body.result
            .ok_or_else(|| anyhow!("telegram {method} returned no result"))
    }
}

#[async_trait]
impl TelegramApi for HttpTelegramApi {
    async fn get_updates(&self, offset: i64, timeout_secs: u64) -> Result<Vec<TelegramUpdate>> {
        let payload = json!({
            "offset": offset,
            "timeout": timeout_secs,
            "allowed_updates": ["message"],
        });
        self.call(
            "getUpdates",
            payload,
            Duration::from_secs(timeout_secs) + POLL_GRACE,
        )
        .await
    }

    async fn send_message(
        &self,
        chat_id: i64,
        text: &str,
        reply_markup: Option<Value>,
    ) -> Result<i64> {
        let mut payload = json!({
            "chat_id": chat_id,
            "text": text,
            "parse_mode": "Markdown",
        });
        if let Some(markup) = reply_markup {
            payload["reply_markup"] = markup;
        }
        let sent: SentMessage = self.call("sendMessage", payload, CALL_TIMEOUT).await?;
        Ok(sent.message_id)
    }

    async fn edit_message_text(&self, chat_id: i64, message_id: i64, text: &str) -> Result<()> {
        let payload = json!({
            "chat_id": chat_id,
            "message_id": message_id,
            "text": text,
        });
        // Result is the edited message or `true`; either way only `ok` matters.
        let _: Value = self.call("editMessageText", payload, CALL_TIMEOUT).await?;
        Ok(())
    }

    async fn delete_message(&self, chat_id: i64, message_id: i64) -> Result<()> {
        let payload = json!({
            "chat_id": chat_id,
            "message_id": message_id,
        });
        let _: Value = self.call("deleteMessage", payload, CALL_TIMEOUT).await?;
        Ok(())
    }

    async fn download_document(&self, file_id: &str) -> Result<String> {
        let file: TelegramFile = self
            .call("getFile", json!({ "file_id": file_id }), CALL_TIMEOUT)
            .await?;
        let file_path = file
            .file_path
            .ok_or_else(|| anyhow!("telegram getFile returned no file_path"))?;

        let res = self
            .client
            .get(self.file_url(&file_path))
            .timeout(CALL_TIMEOUT)
            .send()
            .await
            .context("telegram file download request")?;
        let status = res.status();
        if !status.is_success() {
            bail!("telegram file download {status}");
        }
        res.text().await.context("read telegram file download")
    }
}
