#![allow(dead_code)]

use esfixture::{Harness, HarnessConfig, RecordingReporter};
use serde_json::{json, Value};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};
use wiremock::matchers::any;
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

/// Mocks mounted by individual tests use the default priority and win over
/// the in-memory cluster.
const CLUSTER_PRIORITY: u8 = u8::MAX;

#[derive(Debug, Clone, PartialEq)]
pub struct StoredDoc {
    pub doc_type: String,
    pub id: String,
    pub routing: Option<String>,
    pub parent: Option<String>,
    pub source: Value,
    pub version: u64,
    /// Set by flush; counts only see visible documents.
    pub visible: bool,
}

impl StoredDoc {
    fn shard_key(&self) -> Option<&str> {
        self.routing.as_deref().or(self.parent.as_deref())
    }
}

#[derive(Debug, Default)]
struct IndexState {
    mapping: String,
    docs: Vec<StoredDoc>,
}

#[derive(Default)]
struct ClusterState {
    indices: Mutex<BTreeMap<String, IndexState>>,
    warnings: Vec<String>,
}

struct ClusterResponder(Arc<ClusterState>);

impl Respond for ClusterResponder {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        let mut template = self.0.handle(request);
        for warning in &self.0.warnings {
            template = template.append_header("Warning", warning.as_str());
        }
        template
    }
}

fn shards() -> Value {
    json!({"total": 1, "successful": 1, "failed": 0})
}

fn es_error(status: u16, error_type: &str, reason: String) -> ResponseTemplate {
    ResponseTemplate::new(status).set_body_json(json!({
        "error": {"type": error_type, "reason": reason},
        "status": status
    }))
}

fn index_not_found(index: &str) -> ResponseTemplate {
    es_error(404, "index_not_found_exception", format!("no such index [{}]", index))
}

impl ClusterState {
    fn handle(&self, request: &Request) -> ResponseTemplate {
        let segments: Vec<String> = request
            .url
            .path_segments()
            .map(|s| s.filter(|p| !p.is_empty()).map(str::to_string).collect())
            .unwrap_or_default();
        let segments: Vec<&str> = segments.iter().map(String::as_str).collect();
        let query: BTreeMap<String, String> = request.url.query_pairs().into_owned().collect();
        let mut indices = self.indices.lock().unwrap();

        match (request.method.as_str(), segments.as_slice()) {
            ("GET", []) => ResponseTemplate::new(200).set_body_json(json!({
                "name": "fake-node",
                "cluster_name": "esfixture",
                "version": {"number": "5.6.16"},
                "tagline": "You Know, for Search"
            })),
            ("HEAD", [index]) => {
                ResponseTemplate::new(if indices.contains_key(*index) { 200 } else { 404 })
            }
            ("DELETE", [index]) => match indices.remove(*index) {
                Some(_) => ResponseTemplate::new(200).set_body_json(json!({"acknowledged": true})),
                None => index_not_found(index),
            },
            ("PUT", [index]) => {
                if indices.contains_key(*index) {
                    return es_error(
                        400,
                        "resource_already_exists_exception",
                        format!("index [{}] already exists", index),
                    );
                }
                indices.insert(
                    index.to_string(),
                    IndexState {
                        mapping: String::from_utf8_lossy(&request.body).into_owned(),
                        docs: Vec::new(),
                    },
                );
                ResponseTemplate::new(200).set_body_json(json!({
                    "acknowledged": true,
                    "shards_acknowledged": true,
                    "index": index
                }))
            }
            ("POST", [index, "_flush"]) => match indices.get_mut(*index) {
                Some(state) => {
                    state.docs.iter_mut().for_each(|d| d.visible = true);
                    ResponseTemplate::new(200).set_body_json(json!({"_shards": shards()}))
                }
                None => index_not_found(index),
            },
            ("GET", [index, "_count"]) => count(&indices, index, None),
            ("GET", [index, types, "_count"]) => count(&indices, index, Some(*types)),
            ("PUT" | "POST", [index, doc_type, id]) => {
                let Some(state) = indices.get_mut(*index) else {
                    return index_not_found(index);
                };
                let source: Value = match serde_json::from_slice(&request.body) {
                    Ok(v) => v,
                    Err(e) => return es_error(400, "mapper_parsing_exception", e.to_string()),
                };
                let previous = state
                    .docs
                    .iter()
                    .position(|d| d.doc_type == *doc_type && d.id == *id);
                let version = previous.map_or(1, |i| state.docs[i].version + 1);
                let doc = StoredDoc {
                    doc_type: doc_type.to_string(),
                    id: id.to_string(),
                    routing: query.get("routing").cloned(),
                    parent: query.get("parent").cloned(),
                    source,
                    version,
                    visible: false,
                };
                match previous {
                    Some(i) => state.docs[i] = doc,
                    None => state.docs.push(doc),
                }
                ResponseTemplate::new(if version == 1 { 201 } else { 200 }).set_body_json(json!({
                    "_index": index,
                    "_type": doc_type,
                    "_id": id,
                    "_version": version,
                    "result": if version == 1 { "created" } else { "updated" },
                    "_shards": shards(),
                    "created": version == 1
                }))
            }
            ("GET", [index, doc_type, id]) => {
                let Some(state) = indices.get(*index) else {
                    return index_not_found(index);
                };
                let key = query.get("routing").or(query.get("parent")).map(String::as_str);
                let found = state.docs.iter().find(|d| {
                    (*doc_type == "_all" || d.doc_type == *doc_type)
                        && d.id == *id
                        && d.shard_key() == key
                });
                match found {
                    Some(doc) => {
                        let mut body = json!({
                            "_index": index,
                            "_type": doc.doc_type,
                            "_id": doc.id,
                            "_version": doc.version,
                            "found": true
                        });
                        if let Some(routing) = doc.shard_key() {
                            body["_routing"] = json!(routing);
                        }
                        if let Some(parent) = &doc.parent {
                            body["_parent"] = json!(parent);
                        }
                        if doc.doc_type != "tweet-nosource" {
                            body["_source"] = doc.source.clone();
                        }
                        ResponseTemplate::new(200).set_body_json(body)
                    }
                    None => ResponseTemplate::new(404).set_body_json(json!({
                        "_index": index,
                        "_type": doc_type,
                        "_id": id,
                        "found": false
                    })),
                }
            }
            (method, _) => es_error(
                400,
                "illegal_argument_exception",
                format!("no handler for {} {}", method, request.url.path()),
            ),
        }
    }
}

fn count(
    indices: &BTreeMap<String, IndexState>,
    index: &str,
    types: Option<&str>,
) -> ResponseTemplate {
    let Some(state) = indices.get(index) else {
        return index_not_found(index);
    };
    let wanted: Option<Vec<&str>> = types.map(|t| t.split(',').collect());
    let count = state
        .docs
        .iter()
        .filter(|d| d.visible)
        .filter(|d| {
            wanted
                .as_ref()
                .map_or(true, |w| w.contains(&d.doc_type.as_str()))
        })
        .count();
    ResponseTemplate::new(200).set_body_json(json!({"count": count, "_shards": shards()}))
}

/// In-memory stand-in for a single-node cluster, served over HTTP.
pub struct FakeCluster {
    pub server: MockServer,
    state: Arc<ClusterState>,
}

impl FakeCluster {
    pub async fn start() -> Self {
        Self::start_with_warnings(&[]).await
    }

    /// Every response carries one `Warning` header per entry, in order.
    pub async fn start_with_warnings(warnings: &[&str]) -> Self {
        let server = MockServer::start().await;
        let state = Arc::new(ClusterState {
            indices: Mutex::new(BTreeMap::new()),
            warnings: warnings.iter().map(|w| w.to_string()).collect(),
        });
        Mock::given(any())
            .respond_with(ClusterResponder(state.clone()))
            .with_priority(CLUSTER_PRIORITY)
            .mount(&server)
            .await;
        Self { server, state }
    }

    pub fn url(&self) -> String {
        self.server.uri()
    }

    pub fn config(&self) -> HarnessConfig {
        HarnessConfig::default().with_url(self.url())
    }

    /// Index left behind by an earlier run.
    pub fn insert_stale_index(&self, name: &str) {
        self.state
            .indices
            .lock()
            .unwrap()
            .insert(name.to_string(), IndexState::default());
    }

    pub fn has_index(&self, name: &str) -> bool {
        self.state.indices.lock().unwrap().contains_key(name)
    }

    pub fn mapping_of(&self, name: &str) -> Option<String> {
        self.state
            .indices
            .lock()
            .unwrap()
            .get(name)
            .map(|s| s.mapping.clone())
    }

    pub fn documents(&self, name: &str) -> Vec<StoredDoc> {
        self.state
            .indices
            .lock()
            .unwrap()
            .get(name)
            .map(|s| s.docs.clone())
            .unwrap_or_default()
    }

    /// `METHOD /path` of every request received so far, in order.
    pub async fn requests(&self) -> Vec<String> {
        self.server
            .received_requests()
            .await
            .unwrap_or_default()
            .iter()
            .map(|r| format!("{} {}", r.method, r.url.path()))
            .collect()
    }
}

pub fn harness_for(config: HarnessConfig) -> (Harness<RecordingReporter>, Arc<RecordingReporter>) {
    esfixture::logging::init_test_tracing();
    let reporter = Arc::new(RecordingReporter::new());
    let harness = Harness::new(config, reporter.clone()).unwrap();
    (harness, reporter)
}

/// Address nothing listens on.
pub fn unreachable_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let url = format!("http://{}", listener.local_addr().unwrap());
    drop(listener);
    url
}
