//! Index creation and document seeding.
//!
//! Every step is issued sequentially and the first failure aborts the run.

use crate::error::{HarnessError, Result};
use crate::fixtures::{
    self, COMMENT_TYPE, FIXTURE_INDICES, INDEX_NAME, ORDER_TYPE, TWEET_NOSOURCE_TYPE, TWEET_TYPE,
};
use crate::mapping::Mapping;
use esfixture_client::{Client, CreateIndexResponse, FlushResponse, IndexResponse};
use serde::Serialize;
use serde_json::Value;

/// One write of the seeding plan.
#[derive(Debug, Clone, PartialEq)]
pub struct SeedDocument {
    pub doc_type: String,
    pub id: String,
    pub routing: Option<String>,
    pub parent: Option<String>,
    pub body: Value,
}

impl SeedDocument {
    pub fn new<T: Serialize>(doc_type: &str, id: impl Into<String>, doc: &T) -> Result<Self> {
        Ok(Self {
            doc_type: doc_type.to_string(),
            id: id.into(),
            routing: None,
            parent: None,
            body: serde_json::to_value(doc)?,
        })
    }

    pub fn routing(mut self, routing: impl Into<String>) -> Self {
        self.routing = Some(routing.into());
        self
    }

    pub fn parent(mut self, parent: impl Into<String>) -> Self {
        self.parent = Some(parent.into());
        self
    }
}

/// Identifies a written document.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DocumentRef {
    pub index: String,
    pub doc_type: String,
    pub id: String,
}

/// Ordered documents for a single index. Ids are unique per document type.
#[derive(Debug, Clone, PartialEq)]
pub struct SeedPlan {
    index: String,
    documents: Vec<SeedDocument>,
}

impl SeedPlan {
    pub fn new(index: impl Into<String>) -> Self {
        Self {
            index: index.into(),
            documents: Vec::new(),
        }
    }

    /// Three tweets, one comment under tweet 3 and eight orders.
    pub fn full() -> Result<Self> {
        let [t1, t2, t3] = fixtures::tweets();
        let mut plan = Self::new(INDEX_NAME)
            .push(SeedDocument::new(TWEET_TYPE, "1", &t1)?)?
            .push(SeedDocument::new(TWEET_TYPE, "2", &t2)?)?
            .push(SeedDocument::new(TWEET_TYPE, "3", &t3)?.routing("someroutingkey"))?
            .push(SeedDocument::new(COMMENT_TYPE, "1", &fixtures::comment())?.parent("3"))?;
        for (i, order) in fixtures::orders().iter().enumerate() {
            plan = plan.push(SeedDocument::new(ORDER_TYPE, i.to_string(), order)?)?;
        }
        Ok(plan)
    }

    /// The first two tweets stored under the source-less type.
    pub fn no_source() -> Result<Self> {
        let [t1, t2, _] = fixtures::tweets();
        Self::new(INDEX_NAME)
            .push(SeedDocument::new(TWEET_NOSOURCE_TYPE, "1", &t1)?)?
            .push(SeedDocument::new(TWEET_NOSOURCE_TYPE, "2", &t2)?)
    }

    /// Appends `doc`, rejecting a second document with the same type and id.
    pub fn push(mut self, doc: SeedDocument) -> Result<Self> {
        if self
            .documents
            .iter()
            .any(|d| d.doc_type == doc.doc_type && d.id == doc.id)
        {
            return Err(HarnessError::DuplicateDocument {
                doc_type: doc.doc_type,
                id: doc.id,
            });
        }
        self.documents.push(doc);
        Ok(self)
    }

    pub fn index(&self) -> &str {
        &self.index
    }

    pub fn documents(&self) -> &[SeedDocument] {
        &self.documents
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Number of documents per type.
    pub fn count_by_type(&self, doc_type: &str) -> usize {
        self.documents
            .iter()
            .filter(|d| d.doc_type == doc_type)
            .count()
    }
}

/// Deletes every fixture index. A missing index counts as deleted; anything
/// else is a [`HarnessError::Cleanup`].
pub async fn cleanup_indices(client: &Client) -> Result<()> {
    for index in FIXTURE_INDICES {
        match client.delete_index(index).send().await {
            Ok(_) => tracing::debug!("[SETUP] deleted index {}", index),
            Err(e) if e.is_index_not_found() => {
                tracing::debug!("[SETUP] index {} did not exist", index)
            }
            Err(e) => {
                return Err(HarnessError::Cleanup {
                    index: index.to_string(),
                    source: e,
                })
            }
        }
    }
    Ok(())
}

/// Creates both fixture indices from the same mapping.
pub async fn provision_indices(
    client: &Client,
    mapping: &Mapping,
) -> Result<Vec<CreateIndexResponse>> {
    let mut acks = Vec::with_capacity(FIXTURE_INDICES.len());
    for index in FIXTURE_INDICES {
        let ack = client
            .create_index(index)
            .body(mapping.as_str())
            .send()
            .await
            .map_err(|e| HarnessError::Provisioning {
                step: format!("create index {}", index),
                source: e,
            })?
            .ok_or_else(|| HarnessError::NullAcknowledgment {
                index: index.to_string(),
            })?;
        tracing::info!(
            "[SETUP] created index {} (acknowledged={})",
            index,
            ack.acknowledged
        );
        acks.push(ack);
    }
    Ok(acks)
}

/// Writes `plan` in order, stopping at the first failure, then flushes.
pub async fn seed_documents(client: &Client, plan: &SeedPlan) -> Result<Vec<DocumentRef>> {
    let mut written = Vec::with_capacity(plan.len());

    for doc in plan.documents() {
        let response = write_document(client, plan.index(), doc).await?;
        tracing::debug!(
            "[SEED] {}/{}/{} version={}",
            response.index,
            doc.doc_type,
            response.id,
            response.version
        );
        written.push(DocumentRef {
            index: plan.index().to_string(),
            doc_type: doc.doc_type.clone(),
            id: doc.id.clone(),
        });
    }

    flush_fixture(client, plan.index()).await?;
    tracing::info!("[SEED] wrote {} documents to {}", written.len(), plan.index());
    Ok(written)
}

async fn write_document(client: &Client, index: &str, doc: &SeedDocument) -> Result<IndexResponse> {
    let step = || format!("index {}/{}/{}", index, doc.doc_type, doc.id);

    let mut service = client
        .index()
        .index(index)
        .doc_type(doc.doc_type.as_str())
        .id(doc.id.as_str());
    if let Some(routing) = &doc.routing {
        service = service.routing(routing.as_str());
    }
    if let Some(parent) = &doc.parent {
        service = service.parent(parent.as_str());
    }

    service
        .body_json(&doc.body)
        .map_err(|e| HarnessError::Provisioning {
            step: step(),
            source: e,
        })?
        .send()
        .await
        .map_err(|e| HarnessError::Provisioning {
            step: step(),
            source: e,
        })
}

/// Makes seeded documents visible to reads.
pub async fn flush_fixture(client: &Client, index: &str) -> Result<FlushResponse> {
    let response = client
        .flush()
        .index(index)
        .send()
        .await
        .map_err(|e| HarnessError::Provisioning {
            step: format!("flush {}", index),
            source: e,
        })?;
    tracing::debug!(
        "[SEED] flushed {} ({}/{} shards)",
        index,
        response.shards.successful,
        response.shards.total
    );
    Ok(response)
}
