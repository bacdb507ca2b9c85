use std::sync::RwLock;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode, header};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tokio::sync::watch;

use super::{CatalogService, EntryOrder, parse_callback_token};
use crate::config::ClientConfig;
use crate::error::{Error, Result};
use crate::types::{CatalogEntry, Category, EntryPatch, Identity, NewEntry, Session};

const RETURN_REPRESENTATION: &str = "return=representation";

/// Error body shapes returned by the REST, storage and auth endpoints.
#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    message: Option<String>,
    msg: Option<String>,
    error_description: Option<String>,
    error: Option<String>,
}

impl ErrorBody {
    fn into_message(self) -> Option<String> {
        self.message
            .or(self.msg)
            .or(self.error_description)
            .or(self.error)
    }
}

#[derive(Debug, Deserialize)]
struct AuthUser {
    id: String,
    email: Option<String>,
}

/// Client for a hosted PostgREST-style backend with object storage and auth.
pub struct RestCatalogService {
    client: Client,
    base_url: String,
    api_key: String,
    entries_table: String,
    categories_table: String,
    access_token: RwLock<Option<String>>,
    sessions: watch::Sender<Option<Session>>,
}

impl RestCatalogService {
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let base_url = config.service_url()?.to_string();
        let api_key = config.api_key.clone().unwrap_or_default();
        let client = Client::builder().timeout(Duration::from_secs(30)).build()?;
        let (sessions, _) = watch::channel(None);

        Ok(Self {
            client,
            base_url,
            api_key,
            entries_table: config.entries_table.clone(),
            categories_table: config.categories_table.clone(),
            access_token: RwLock::new(None),
            sessions,
        })
    }

    /// Resumes a session saved by a previous sign-in.
    #[must_use]
    pub fn with_access_token(self, token: impl Into<String>) -> Self {
        self.set_access_token(Some(token.into()));
        self
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn token(&self) -> Option<String> {
        self.access_token
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    fn set_access_token(&self, token: Option<String>) {
        *self
            .access_token
            .write()
            .unwrap_or_else(|e| e.into_inner()) = token;
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.request_with_token(method, path, self.token().as_deref())
    }

    fn request_with_token(&self, method: Method, path: &str, token: Option<&str>) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!(%method, %url, "catalog request");
        self.client
            .request(method, &url)
            .header("apikey", &self.api_key)
            .bearer_auth(token.unwrap_or(&self.api_key))
    }

    fn row_path(table: &str, id: &str) -> String {
        format!("/rest/v1/{}?id=eq.{}", table, urlencoding::encode(id))
    }

    async fn handle_response<T: DeserializeOwned>(resp: Response) -> Result<T> {
        if resp.status().is_success() {
            Ok(resp.json().await?)
        } else {
            Err(Self::error_from(resp).await)
        }
    }

    async fn error_from(resp: Response) -> Error {
        let status = resp.status();
        let body = resp.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorBody>(&body)
            .ok()
            .and_then(ErrorBody::into_message)
            .unwrap_or_else(|| {
                if body.trim().is_empty() {
                    status
                        .canonical_reason()
                        .unwrap_or("Server error (no details provided)")
                        .to_string()
                } else {
                    body
                }
            });
        Error::Remote {
            status: status.as_u16(),
            message,
        }
    }

    async fn fetch_user(&self, token: &str) -> Result<Option<Identity>> {
        let resp = self
            .request_with_token(Method::GET, "/auth/v1/user", Some(token))
            .send()
            .await?;
        if resp.status() == StatusCode::UNAUTHORIZED || resp.status() == StatusCode::FORBIDDEN {
            return Ok(None);
        }
        let user: AuthUser = Self::handle_response(resp).await?;
        Ok(Some(Identity {
            id: user.id,
            email: user.email,
        }))
    }

    fn authorize_url(&self, provider: &str, redirect_to: &str) -> String {
        format!(
            "{}/auth/v1/authorize?provider={}&redirect_to={}",
            self.base_url,
            urlencoding::encode(provider),
            urlencoding::encode(redirect_to)
        )
    }
}

#[async_trait]
impl CatalogService for RestCatalogService {
    async fn list_entries(&self, order: EntryOrder) -> Result<Vec<CatalogEntry>> {
        let path = format!(
            "/rest/v1/{}?select=*&order={}",
            self.entries_table,
            order.as_query()
        );
        let resp = self.request(Method::GET, &path).send().await?;
        Self::handle_response(resp).await
    }

    async fn list_categories(&self) -> Result<Vec<Category>> {
        let path = format!("/rest/v1/{}?select=*", self.categories_table);
        let resp = self.request(Method::GET, &path).send().await?;
        Self::handle_response(resp).await
    }

    async fn insert_entry(&self, entry: &NewEntry) -> Result<CatalogEntry> {
        let path = format!("/rest/v1/{}", self.entries_table);
        let resp = self
            .request(Method::POST, &path)
            .header("Prefer", RETURN_REPRESENTATION)
            .json(&[entry])
            .send()
            .await?;
        let rows: Vec<CatalogEntry> = Self::handle_response(resp).await?;
        rows.into_iter().next().ok_or_else(|| Error::Remote {
            status: 200,
            message: "Server returned an empty response".to_string(),
        })
    }

    async fn update_entry(&self, id: &str, patch: &EntryPatch) -> Result<CatalogEntry> {
        let resp = self
            .request(Method::PATCH, &Self::row_path(&self.entries_table, id))
            .header("Prefer", RETURN_REPRESENTATION)
            .json(patch)
            .send()
            .await?;
        let rows: Vec<CatalogEntry> = Self::handle_response(resp).await?;
        rows.into_iter().next().ok_or(Error::NotFound)
    }

    async fn delete_entry(&self, id: &str) -> Result<()> {
        let resp = self
            .request(Method::DELETE, &Self::row_path(&self.entries_table, id))
            .header("Prefer", RETURN_REPRESENTATION)
            .send()
            .await?;
        let rows: Vec<serde_json::Value> = Self::handle_response(resp).await?;
        if rows.is_empty() {
            return Err(Error::NotFound);
        }
        Ok(())
    }

    async fn upload_asset(
        &self,
        bucket: &str,
        name: &str,
        bytes: Bytes,
        content_type: &str,
    ) -> Result<String> {
        let bucket = urlencoding::encode(bucket);
        let name = urlencoding::encode(name);
        let resp = self
            .request(Method::POST, &format!("/storage/v1/object/{bucket}/{name}"))
            .header(header::CONTENT_TYPE, content_type)
            .header("x-upsert", "false")
            .body(bytes)
            .send()
            .await?;
        if !resp.status().is_success() {
            return Err(Self::error_from(resp).await);
        }
        Ok(format!(
            "{}/storage/v1/object/public/{bucket}/{name}",
            self.base_url
        ))
    }

    async fn current_session(&self) -> Result<Option<Session>> {
        let Some(token) = self.token() else {
            return Ok(None);
        };
        match self.fetch_user(&token).await? {
            Some(user) => Ok(Some(Session {
                access_token: token,
                user,
            })),
            None => {
                tracing::debug!("stored access token was rejected");
                Ok(None)
            }
        }
    }

    async fn sign_in(&self, provider: &str, redirect_to: &str) -> Result<String> {
        Ok(self.authorize_url(provider, redirect_to))
    }

    async fn complete_sign_in(&self, callback: &str) -> Result<Session> {
        let token = parse_callback_token(callback).ok_or(Error::Unauthorized)?;
        let user = self.fetch_user(&token).await?.ok_or(Error::Unauthorized)?;

        self.set_access_token(Some(token.clone()));
        let session = Session {
            access_token: token,
            user,
        };
        self.sessions.send_replace(Some(session.clone()));
        Ok(session)
    }

    async fn sign_out(&self) -> Result<()> {
        if let Some(token) = self.token() {
            let result = self
                .request_with_token(Method::POST, "/auth/v1/logout", Some(&token))
                .send()
                .await;
            match result {
                Ok(resp) if !resp.status().is_success() => {
                    tracing::warn!(status = %resp.status(), "logout was not acknowledged");
                }
                Err(e) => tracing::warn!("logout request failed: {e}"),
                Ok(_) => {}
            }
        }
        self.set_access_token(None);
        self.sessions.send_replace(None);
        Ok(())
    }

    fn subscribe_sessions(&self) -> watch::Receiver<Option<Session>> {
        self.sessions.subscribe()
    }
}
