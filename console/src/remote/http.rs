//! REST adapter for the remote contracts
//!
//! One [`ApiClient`] per process, shared by a typed [`HttpResource`] per
//! entity kind. Failures are mapped onto [`ConsoleError`]:
//! 404 is `NotFound`, 400/422 is `Rejected`, any other non-2xx is `Server`.

use std::marker::PhantomData;

use async_trait::async_trait;
use reqwest::{Method, RequestBuilder, Response, StatusCode, Url};
use serde::{de::DeserializeOwned, Serialize};
use shared::{EntityId, ListQuery, Page, Region};

use super::endpoints::{ApiResource, ScanEndpoint, Writable};
use super::{ExactLookup, ListSource, Lookup, Mutations, OptionRequest, RegionSource};
use crate::config::ApiConfig;
use crate::error::{ConsoleError, ConsoleResult};

/// Shared HTTP plumbing: base URL, timeout and optional bearer token
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
    token: Option<String>,
}

impl ApiClient {
    pub fn new(config: &ApiConfig) -> ConsoleResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| ConsoleError::Configuration(format!("http client: {}", e)))?;
        let base_url = Url::parse(&config.base_url)
            .map_err(|e| ConsoleError::Configuration(format!("api.base_url: {}", e)))?;
        if base_url.cannot_be_a_base() {
            return Err(ConsoleError::Configuration(format!(
                "api.base_url cannot be a base: {}",
                config.base_url
            )));
        }

        Ok(Self {
            http,
            base_url,
            token: config.token.clone().filter(|t| !t.is_empty()),
        })
    }

    /// Typed resource sharing this client
    pub fn resource<T>(&self) -> HttpResource<T> {
        HttpResource {
            client: self.clone(),
            _model: PhantomData,
        }
    }

    /// Append percent-encoded path segments to the base URL
    fn url(&self, segments: &[&str]) -> ConsoleResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ConsoleError::Configuration("api.base_url cannot be a base".into()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        tracing::debug!("api request {} {}", method, url);
        let builder = self.http.request(method, url);
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    pub async fn get_json<R: DeserializeOwned>(
        &self,
        segments: &[&str],
        params: &[(&'static str, String)],
    ) -> ConsoleResult<R> {
        let url = self.url(segments)?;
        let resp = self.request(Method::GET, url).query(params).send().await?;
        Ok(check(resp).await?.json::<R>().await?)
    }

    pub async fn send_json<B, R>(&self, method: Method, segments: &[&str], body: &B) -> ConsoleResult<R>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let url = self.url(segments)?;
        let resp = self.request(method, url).json(body).send().await?;
        Ok(check(resp).await?.json::<R>().await?)
    }

    pub async fn delete(&self, segments: &[&str]) -> ConsoleResult<()> {
        let url = self.url(segments)?;
        let resp = self.request(Method::DELETE, url).send().await?;
        check(resp).await?;
        Ok(())
    }
}

/// Map a non-2xx response onto the error taxonomy
async fn check(resp: Response) -> ConsoleResult<Response> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }

    let path = resp.url().path().to_string();
    let body = resp.text().await.unwrap_or_default();
    let message = error_message(&body);
    tracing::debug!(status = status.as_u16(), %path, %message, "api error");

    Err(match status {
        StatusCode::NOT_FOUND => ConsoleError::NotFound(path),
        StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => ConsoleError::Rejected {
            status: status.as_u16(),
            message,
        },
        _ => ConsoleError::Server {
            status: status.as_u16(),
            message,
        },
    })
}

/// The API reports failures as `{"message": ...}`; fall back to the raw body
fn error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(str::to_string))
        .unwrap_or_else(|| body.trim().to_string())
}

/// Typed access to one collection of the API
#[derive(Debug, Clone)]
pub struct HttpResource<T> {
    client: ApiClient,
    _model: PhantomData<fn() -> T>,
}

#[async_trait]
impl<T: ApiResource> ListSource<T> for HttpResource<T> {
    async fn list_page(&self, query: &ListQuery) -> ConsoleResult<Page<T>> {
        self.client
            .get_json(&[T::PATH], &T::list_params(query))
            .await
    }
}

#[async_trait]
impl<T: ScanEndpoint> ExactLookup<T> for HttpResource<T> {
    fn normalize_code(&self, code: &str) -> String {
        T::normalize_code(code)
    }

    async fn lookup_exact(&self, code: &str) -> ConsoleResult<Lookup<T>> {
        let code = T::normalize_code(code);
        if code.is_empty() {
            return Ok(Lookup::NotFound);
        }
        let mut segments: Vec<&str> = T::LOOKUP.to_vec();
        segments.push(code.as_str());

        let found = if T::RETURNS_LIST {
            self.client
                .get_json::<Vec<T>>(&segments, &[])
                .await
                .map(Lookup::from_rows)
        } else {
            self.client.get_json::<T>(&segments, &[]).await.map(Lookup::One)
        };

        match found {
            Err(ConsoleError::NotFound(_)) => Ok(Lookup::NotFound),
            other => other,
        }
    }
}

#[async_trait]
impl<T: Writable> Mutations<T> for HttpResource<T> {
    type Create = T::Create;
    type Update = T::Update;

    async fn create(&self, payload: &Self::Create) -> ConsoleResult<T> {
        self.client
            .send_json(Method::POST, &[T::PATH], payload)
            .await
    }

    async fn update(&self, id: EntityId, payload: &Self::Update) -> ConsoleResult<T> {
        let id = id.to_string();
        self.client
            .send_json(Method::PATCH, &[T::PATH, id.as_str()], payload)
            .await
    }

    async fn remove(&self, id: EntityId) -> ConsoleResult<()> {
        let id = id.to_string();
        self.client.delete(&[T::PATH, id.as_str()]).await
    }
}

/// Country and province options
#[derive(Debug, Clone)]
pub struct HttpRegions {
    client: ApiClient,
}

impl HttpRegions {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }
}

fn filter_param(request: &OptionRequest) -> Vec<(&'static str, String)> {
    if request.query.is_empty() {
        Vec::new()
    } else {
        vec![("filter", request.query.clone())]
    }
}

#[async_trait]
impl RegionSource for HttpRegions {
    async fn countries(&self, request: &OptionRequest) -> ConsoleResult<Vec<Region>> {
        self.client
            .get_json(&["countries"], &filter_param(request))
            .await
    }

    async fn provinces(&self, request: &OptionRequest) -> ConsoleResult<Vec<Region>> {
        let Some(country) = request.parent else {
            return Ok(Vec::new());
        };
        let country = country.to_string();
        self.client
            .get_json(&["countries", country.as_str(), "provinces"], &filter_param(request))
            .await
    }
}
