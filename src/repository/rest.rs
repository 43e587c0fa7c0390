use std::sync::Arc;
use std::time::Duration;

use reqwest::{Client, Method, RequestBuilder};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::domain::types::TypeConstraintError;
use crate::models::page::{ListBody, Page};
use crate::repository::errors::{RepositoryError, RepositoryResult};

/// Pages of a paginated list endpoint read before giving up.
pub const DEFAULT_MAX_LIST_PAGES: usize = 1000;

/// Clinic REST API client.
///
/// One instance without token is shared by the whole application; handlers
/// derive a per-request copy carrying the user's access token with
/// [`RestRepository::with_token`]. Copies share the connection pool.
#[derive(Clone, Debug)]
pub struct RestRepository {
    http: Client,
    base_url: Arc<str>,
    access: Option<Arc<str>>,
    max_list_pages: usize,
}

impl RestRepository {
    pub fn new(base_url: &str, timeout: Duration) -> RepositoryResult<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| RepositoryError::Unexpected(format!("HTTP client: {err}")))?;
        Ok(Self {
            http,
            base_url: Arc::from(base_url.trim_end_matches('/')),
            access: None,
            max_list_pages: DEFAULT_MAX_LIST_PAGES,
        })
    }

    /// Limits how many pages [`RestRepository::get_list`] follows.
    pub fn with_max_list_pages(mut self, max_list_pages: usize) -> Self {
        self.max_list_pages = max_list_pages.max(1);
        self
    }

    pub fn with_token(&self, access: &str) -> Self {
        Self {
            http: self.http.clone(),
            base_url: self.base_url.clone(),
            access: Some(Arc::from(access)),
            max_list_pages: self.max_list_pages,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let builder = self.http.request(method, self.url(path));
        match &self.access {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// Sends the request and returns the body of a successful response.
    async fn execute(&self, method: Method, builder: RequestBuilder) -> RepositoryResult<String> {
        let response = builder.send().await?;
        let status = response.status();
        let body = response.text().await?;
        log::debug!("{method} {status}");
        if status.is_success() {
            Ok(body)
        } else {
            Err(RepositoryError::from_response(&method, status, &body))
        }
    }

    pub(crate) async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> RepositoryResult<T> {
        let body = self
            .execute(Method::GET, self.request(Method::GET, path).query(query))
            .await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// GET that maps 404 to `None`.
    pub(crate) async fn get_optional<T: DeserializeOwned>(
        &self,
        path: &str,
    ) -> RepositoryResult<Option<T>> {
        match self.get(path, &[]).await {
            Ok(value) => Ok(Some(value)),
            Err(RepositoryError::NotFound) => Ok(None),
            Err(err) => Err(err),
        }
    }

    /// GET of a list endpoint, paginated or not. Paginated lists are read
    /// page by page until the backend reports no `next` page.
    pub(crate) async fn get_list<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> RepositoryResult<Vec<T>> {
        let mut items = Vec::new();
        for page in 1..=self.max_list_pages {
            let mut pairs = query.to_vec();
            if page > 1 {
                pairs.push(("page", page.to_string()));
            }
            let body: ListBody<T> = self.get(path, &pairs).await?;
            let (rows, more) = body.into_parts();
            items.extend(rows);
            if !more {
                return Ok(items);
            }
        }
        Err(RepositoryError::Unexpected(format!(
            "{path} has more than {} pages",
            self.max_list_pages
        )))
    }

    pub(crate) async fn get_page<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> RepositoryResult<Page<T>> {
        self.get(path, query).await
    }

    pub(crate) async fn send<B, T>(&self, method: Method, path: &str, body: &B) -> RepositoryResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let builder = self.request(method.clone(), path).json(body);
        let body = self.execute(method, builder).await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Like [`RestRepository::send`] for endpoints whose answer is not needed.
    pub(crate) async fn send_discard<B>(&self, method: Method, path: &str, body: &B) -> RepositoryResult<()>
    where
        B: Serialize + ?Sized,
    {
        let builder = self.request(method.clone(), path).json(body);
        self.execute(method, builder).await.map(|_| ())
    }

    pub(crate) async fn delete(&self, path: &str) -> RepositoryResult<()> {
        self.execute(Method::DELETE, self.request(Method::DELETE, path))
            .await
            .map(|_| ())
    }
}

/// Converts wire rows into domain values.
pub(crate) fn convert_all<R, D>(rows: Vec<R>) -> RepositoryResult<Vec<D>>
where
    D: TryFrom<R, Error = TypeConstraintError>,
{
    rows.into_iter()
        .map(|row| D::try_from(row).map_err(RepositoryError::from))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn urls_join_base_and_path() {
        let repo = RestRepository::new("http://backend/api/", Duration::from_secs(1)).unwrap();
        assert_eq!(repo.url("pacientes/"), "http://backend/api/pacientes/");
        assert_eq!(repo.url("/turnos/3/"), "http://backend/api/turnos/3/");
        assert!(repo.access.is_none());
        assert_eq!(repo.with_token("abc").access.as_deref(), Some("abc"));
        assert_eq!(repo.max_list_pages, DEFAULT_MAX_LIST_PAGES);

        let limited = repo.with_max_list_pages(0).with_token("abc");
        assert_eq!(limited.max_list_pages, 1);
    }
}
