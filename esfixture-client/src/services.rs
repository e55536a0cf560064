//! Request builders, one per endpoint. Each finishes with `send().await`.

use crate::client::Client;
use crate::error::{ClientError, Result};
use crate::types::{
    CountResponse, CreateIndexResponse, DeleteIndexResponse, FlushResponse, GetResponse,
    IndexResponse,
};
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;

/// `PUT /{index}` with the mapping sent verbatim as the body.
pub struct CreateIndexService<'a> {
    client: &'a Client,
    index: String,
    body: Option<String>,
}

impl<'a> CreateIndexService<'a> {
    pub(crate) fn new(client: &'a Client, index: String) -> Self {
        Self {
            client,
            index,
            body: None,
        }
    }

    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Returns `None` when the cluster answers with a `null` body.
    pub async fn send(self) -> Result<Option<CreateIndexResponse>> {
        let response = self
            .client
            .perform_request(Method::PUT, &[self.index.as_str()], &[], self.body)
            .await?
            .error_for_status()?;
        self.client.decode(&response.body)
    }
}

/// `DELETE /{index}`
pub struct DeleteIndexService<'a> {
    client: &'a Client,
    index: String,
}

impl<'a> DeleteIndexService<'a> {
    pub(crate) fn new(client: &'a Client, index: String) -> Self {
        Self { client, index }
    }

    pub async fn send(self) -> Result<Option<DeleteIndexResponse>> {
        let response = self
            .client
            .perform_request(Method::DELETE, &[self.index.as_str()], &[], None)
            .await?
            .error_for_status()?;
        self.client.decode(&response.body)
    }
}

/// `HEAD /{index}`
pub struct IndexExistsService<'a> {
    client: &'a Client,
    index: String,
}

impl<'a> IndexExistsService<'a> {
    pub(crate) fn new(client: &'a Client, index: String) -> Self {
        Self { client, index }
    }

    pub async fn send(self) -> Result<bool> {
        let response = self
            .client
            .perform_request(Method::HEAD, &[self.index.as_str()], &[], None)
            .await?;
        match response.status {
            StatusCode::OK => Ok(true),
            StatusCode::NOT_FOUND => Ok(false),
            status => Err(ClientError::from_response(status, &response.body)),
        }
    }
}

/// `PUT /{index}/{type}/{id}`, or `POST /{index}/{type}` when no id is given.
pub struct IndexService<'a> {
    client: &'a Client,
    index: Option<String>,
    doc_type: Option<String>,
    id: Option<String>,
    routing: Option<String>,
    parent: Option<String>,
    refresh: Option<String>,
    body: Option<String>,
}

impl<'a> IndexService<'a> {
    pub(crate) fn new(client: &'a Client) -> Self {
        Self {
            client,
            index: None,
            doc_type: None,
            id: None,
            routing: None,
            parent: None,
            refresh: None,
            body: None,
        }
    }

    pub fn index(mut self, index: impl Into<String>) -> Self {
        self.index = Some(index.into());
        self
    }

    pub fn doc_type(mut self, doc_type: impl Into<String>) -> Self {
        self.doc_type = Some(doc_type.into());
        self
    }

    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn routing(mut self, routing: impl Into<String>) -> Self {
        self.routing = Some(routing.into());
        self
    }

    pub fn parent(mut self, parent: impl Into<String>) -> Self {
        self.parent = Some(parent.into());
        self
    }

    /// `true`, `false` or `wait_for`
    pub fn refresh(mut self, refresh: impl Into<String>) -> Self {
        self.refresh = Some(refresh.into());
        self
    }

    pub fn body_string(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    pub fn body_json<T: Serialize + ?Sized>(mut self, doc: &T) -> Result<Self> {
        self.body = Some(serde_json::to_string(doc)?);
        Ok(self)
    }

    fn validate(&self) -> Result<()> {
        let mut missing = Vec::new();
        if self.index.is_none() {
            missing.push("Index");
        }
        if self.doc_type.is_none() {
            missing.push("Type");
        }
        if self.body.is_none() {
            missing.push("Body");
        }
        if missing.is_empty() {
            Ok(())
        } else {
            Err(ClientError::Validation(missing))
        }
    }

    pub async fn send(self) -> Result<IndexResponse> {
        self.validate()?;
        let index = self.index.unwrap_or_default();
        let doc_type = self.doc_type.unwrap_or_default();

        let mut params = Vec::new();
        if let Some(routing) = self.routing {
            params.push(("routing", routing));
        }
        if let Some(parent) = self.parent {
            params.push(("parent", parent));
        }
        if let Some(refresh) = self.refresh {
            params.push(("refresh", refresh));
        }

        let (method, path) = match &self.id {
            Some(id) => (Method::PUT, vec![index.as_str(), doc_type.as_str(), id.as_str()]),
            None => (Method::POST, vec![index.as_str(), doc_type.as_str()]),
        };
        let response = self
            .client
            .perform_request(method, &path, &params, self.body)
            .await?
            .error_for_status()?;
        self.client.decode(&response.body)
    }
}

/// `POST /{indices}/_flush`
pub struct FlushService<'a> {
    client: &'a Client,
    indices: Vec<String>,
}

impl<'a> FlushService<'a> {
    pub(crate) fn new(client: &'a Client) -> Self {
        Self {
            client,
            indices: Vec::new(),
        }
    }

    pub fn index(mut self, index: impl Into<String>) -> Self {
        self.indices.push(index.into());
        self
    }

    pub async fn send(self) -> Result<FlushResponse> {
        let joined = self.indices.join(",");
        let path: Vec<&str> = if joined.is_empty() {
            vec!["_flush"]
        } else {
            vec![joined.as_str(), "_flush"]
        };
        let response = self
            .client
            .perform_request(Method::POST, &path, &[], None)
            .await?
            .error_for_status()?;
        self.client.decode(&response.body)
    }
}

/// `GET /{index}/{type}/{id}`; the type defaults to `_all`.
pub struct GetService<'a> {
    client: &'a Client,
    index: Option<String>,
    doc_type: Option<String>,
    id: Option<String>,
    routing: Option<String>,
    parent: Option<String>,
}

impl<'a> GetService<'a> {
    pub(crate) fn new(client: &'a Client) -> Self {
        Self {
            client,
            index: None,
            doc_type: None,
            id: None,
            routing: None,
            parent: None,
        }
    }

    pub fn index(mut self, index: impl Into<String>) -> Self {
        self.index = Some(index.into());
        self
    }

    pub fn doc_type(mut self, doc_type: impl Into<String>) -> Self {
        self.doc_type = Some(doc_type.into());
        self
    }

    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn routing(mut self, routing: impl Into<String>) -> Self {
        self.routing = Some(routing.into());
        self
    }

    pub fn parent(mut self, parent: impl Into<String>) -> Self {
        self.parent = Some(parent.into());
        self
    }

    /// Fetches the document. A missing document is a `404` error, check it
    /// with [`ClientError::is_not_found`].
    pub async fn send<T: DeserializeOwned>(self) -> Result<GetResponse<T>> {
        let mut missing = Vec::new();
        if self.index.is_none() {
            missing.push("Index");
        }
        if self.id.is_none() {
            missing.push("Id");
        }
        if !missing.is_empty() {
            return Err(ClientError::Validation(missing));
        }

        let index = self.index.unwrap_or_default();
        let doc_type = self.doc_type.unwrap_or_else(|| "_all".to_string());
        let id = self.id.unwrap_or_default();

        let mut params = Vec::new();
        if let Some(routing) = self.routing {
            params.push(("routing", routing));
        }
        if let Some(parent) = self.parent {
            params.push(("parent", parent));
        }

        let response = self
            .client
            .perform_request(Method::GET, &[index.as_str(), doc_type.as_str(), id.as_str()], &params, None)
            .await?
            .error_for_status()?;
        self.client.decode(&response.body)
    }
}

/// `GET /{indices}[/{types}]/_count`
pub struct CountService<'a> {
    client: &'a Client,
    indices: Vec<String>,
    types: Vec<String>,
}

impl<'a> CountService<'a> {
    pub(crate) fn new(client: &'a Client) -> Self {
        Self {
            client,
            indices: Vec::new(),
            types: Vec::new(),
        }
    }

    pub fn index(mut self, index: impl Into<String>) -> Self {
        self.indices.push(index.into());
        self
    }

    pub fn doc_type(mut self, doc_type: impl Into<String>) -> Self {
        self.types.push(doc_type.into());
        self
    }

    pub async fn send(self) -> Result<u64> {
        let indices = if self.indices.is_empty() {
            "_all".to_string()
        } else {
            self.indices.join(",")
        };
        let types = self.types.join(",");
        let mut path = vec![indices.as_str()];
        if !types.is_empty() {
            path.push(types.as_str());
        }
        path.push("_count");

        let response = self
            .client
            .perform_request(Method::GET, &path, &[], None)
            .await?
            .error_for_status()?;
        let count: CountResponse = self.client.decode(&response.body)?;
        Ok(count.count)
    }
}
