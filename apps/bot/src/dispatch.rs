//! Conversation dispatch: normalizes Telegram updates into events and
//! drives the create-site state machine against the session store.
//!
//! Everything here talks to traits (`TelegramApi`, `DeployApi`,
//! `SessionStore`), so transitions are testable without any transport.

use std::sync::Arc;

use anyhow::Result;
use metrics::counter;
use sitebot_core::{PublishedSite, UserId, validate_html_upload, validate_site_name};
use sitebot_deploy::{DeployApi, DeployError, Deployment, PublishRequest};
use sitebot_session::{Session, SharedSessionStore, Step};

use crate::keyboards;
use crate::telegram_api::{TelegramApi, TelegramDocument, TelegramMessage, TelegramUpdate};
use crate::texts;

pub struct Bot {
    telegram: Arc<dyn TelegramApi>,
    deploy: Arc<dyn DeployApi>,
    sessions: SharedSessionStore,
}

#[derive(Debug)]
enum Event {
    Start,
    CreateSite,
    MySites,
    Help,
    Cancel,
    Text(String),
    Document(TelegramDocument),
}

/// Maps a message onto an event. Reserved menu labels win over free text
/// even mid-conversation; unknown slash commands and empty messages are
/// dropped.
fn classify(msg: &TelegramMessage) -> Option<Event> {
    if let Some(doc) = &msg.document {
        return Some(Event::Document(doc.clone()));
    }
    let text = msg.text.as_deref()?.trim();
    if text.is_empty() {
        return None;
    }
    match text {
        keyboards::CREATE_SITE => Some(Event::CreateSite),
        keyboards::MY_SITES => Some(Event::MySites),
        keyboards::HELP => Some(Event::Help),
        keyboards::CANCEL => Some(Event::Cancel),
        _ if text.starts_with("/start") => Some(Event::Start),
        _ if text.starts_with('/') => None,
        _ => Some(Event::Text(text.to_string())),
    }
}

impl Bot {
    pub fn new(
        telegram: Arc<dyn TelegramApi>,
        deploy: Arc<dyn DeployApi>,
        sessions: SharedSessionStore,
    ) -> Self {
        Self {
            telegram,
            deploy,
            sessions,
        }
    }

    pub async fn handle_update(&self, update: TelegramUpdate) -> Result<()> {
        let Some(msg) = update.message else {
            return Ok(());
        };
        let Some(from) = msg.from.as_ref() else {
            return Ok(());
        };
        let user = UserId(from.id);
        let chat = msg.chat.id;

        let Some(event) = classify(&msg) else {
            counter!("sitebot_updates_total", "kind" => "ignored").increment(1);
            return Ok(());
        };
        counter!("sitebot_updates_total", "kind" => "handled").increment(1);

        let session = self.sessions.load(user).await?.unwrap_or_default();
        match event {
            Event::Start => {
                self.telegram
                    .send_message(chat, texts::WELCOME, Some(keyboards::main_menu()))
                    .await?;
            }
            Event::Help => {
                self.telegram
                    .send_message(chat, texts::HELP, Some(keyboards::main_menu()))
                    .await?;
            }
            Event::CreateSite => self.handle_create(chat, user, session).await?,
            Event::Cancel => self.handle_cancel(chat, user, session).await?,
            Event::MySites => self.handle_my_sites(chat, &session).await?,
            Event::Text(text) => self.handle_text(chat, user, session, &text).await?,
            Event::Document(doc) => self.handle_document(chat, user, session, doc).await?,
        }
        Ok(())
    }

    async fn handle_create(&self, chat: i64, user: UserId, mut session: Session) -> Result<()> {
        session.step = Step::AwaitingName;
        self.sessions.save(user, session).await?;
        self.telegram
            .send_message(chat, texts::ASK_NAME, Some(keyboards::cancel_only()))
            .await?;
        Ok(())
    }

    async fn handle_cancel(&self, chat: i64, user: UserId, mut session: Session) -> Result<()> {
        session.reset_step();
        self.sessions.save(user, session).await?;
        self.telegram
            .send_message(chat, texts::CANCELLED, Some(keyboards::main_menu()))
            .await?;
        Ok(())
    }

    async fn handle_my_sites(&self, chat: i64, session: &Session) -> Result<()> {
        let text = if session.sites.is_empty() {
            texts::MY_SITES_EMPTY.to_string()
        } else {
            texts::my_sites(&session.sites)
        };
        self.telegram
            .send_message(chat, &text, Some(keyboards::main_menu()))
            .await?;
        Ok(())
    }

    async fn handle_text(
        &self,
        chat: i64,
        user: UserId,
        mut session: Session,
        text: &str,
    ) -> Result<()> {
        // Free text only means something while a name is awaited.
        if session.step != Step::AwaitingName {
            return Ok(());
        }
        match validate_site_name(text) {
            Ok(()) => {
                session.step = Step::AwaitingFile {
                    name: text.to_string(),
                };
                self.sessions.save(user, session).await?;
                self.telegram
                    .send_message(chat, &texts::ask_file(text), Some(keyboards::cancel_only()))
                    .await?;
            }
            Err(err) => {
                self.telegram
                    .send_message(chat, &texts::validation(&err), None)
                    .await?;
            }
        }
        Ok(())
    }

    async fn handle_document(
        &self,
        chat: i64,
        user: UserId,
        mut session: Session,
        doc: TelegramDocument,
    ) -> Result<()> {
        let Step::AwaitingFile { name } = session.step.clone() else {
            return Ok(());
        };

        let file_name = doc.file_name.clone().unwrap_or_default();
        if let Err(err) = validate_html_upload(&file_name, doc.file_size) {
            self.telegram
                .send_message(chat, &texts::validation(&err), None)
                .await?;
            return Ok(());
        }

        let loading = self
            .telegram
            .send_message(chat, texts::PROCESSING, None)
            .await?;
        let outcome = self
            .fetch_and_publish(chat, loading, &name, &doc.file_id)
            .await;
        if let Err(err) = self.telegram.delete_message(chat, loading).await {
            tracing::debug!(error = %err, "could not delete progress message");
        }

        // Deployment finished one way or the other: back to idle. A
        // conflict sends the user through naming again (known friction,
        // kept on purpose).
        session.reset_step();
        match outcome {
            Ok(deployment) => {
                session.sites.push(PublishedSite::new(
                    &deployment.name,
                    &deployment.url,
                    &deployment.deployment_id,
                ));
                self.sessions.save(user, session).await?;
                self.telegram
                    .send_message(
                        chat,
                        &texts::success(&deployment.name, &deployment.url),
                        Some(keyboards::open_site_button(&deployment.url)),
                    )
                    .await?;
                self.telegram
                    .send_message(chat, texts::CHOOSE_NEXT, Some(keyboards::main_menu()))
                    .await?;
            }
            Err(user_message) => {
                self.sessions.save(user, session).await?;
                self.telegram
                    .send_message(chat, &user_message, Some(keyboards::main_menu()))
                    .await?;
            }
        }
        Ok(())
    }

    /// Fetches the uploaded file and publishes it. Failures come back as
    /// the user-facing message; details are logged here and never bubble
    /// up to the polling loop.
    async fn fetch_and_publish(
        &self,
        chat: i64,
        loading: i64,
        name: &str,
        file_id: &str,
    ) -> Result<Deployment, String> {
        let content = match self.telegram.download_document(file_id).await {
            Ok(content) => content,
            Err(err) => {
                tracing::error!(error = %err, "failed to fetch uploaded document");
                return Err(texts::FETCH_FAILED.into());
            }
        };

        if let Err(err) = self
            .telegram
            .edit_message_text(chat, loading, texts::DEPLOYING)
            .await
        {
            tracing::debug!(error = %err, "could not update progress message");
        }

        let request = PublishRequest {
            desired_name: name.to_string(),
            content,
        };
        match self.deploy.publish(request).await {
            Ok(deployment) => Ok(deployment),
            Err(DeployError::NameConflict { name, .. }) => Err(texts::name_conflict(&name)),
            Err(err) => {
                tracing::error!(error = %err, "deployment failed");
                Err(texts::deploy_failed(&err.to_string()))
            }
        }
    }
}
