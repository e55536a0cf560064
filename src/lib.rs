//! # esfixture
//!
//! Integration-test harness for the [`esfixture_client`] Elasticsearch binding.
//!
//! A [`Harness`] turns an environment-derived [`HarnessConfig`] into a ready
//! [`Fixture`]: a client with the selected decoding strictness, a deprecation
//! monitor reporting `Warning` headers, and the `elastic-test` /
//! `elastic-test2` indices provisioned and optionally seeded.
//!
//! ```rust,no_run
//! use esfixture::{Harness, TestReporter};
//! use std::sync::Arc;
//!
//! # async fn run() {
//! let harness = Harness::from_env(Arc::new(TestReporter::new("test_get"))).unwrap();
//! let fixture = harness.must(harness.setup_client_and_add_docs(vec![]).await);
//!
//! let count = fixture.client().count().index("elastic-test").send().await.unwrap();
//! assert_eq!(count, 12);
//! # }
//! ```
//!
//! Environment:
//!
//! | Variable | Effect |
//! |----------|--------|
//! | `ESFIXTURE_URL` | cluster endpoint |
//! | `ESFIXTURE_DEPRECATIONS` | `off`, `log` or `fail` |
//! | `ESFIXTURE_STRICT_DECODER` | reject unknown response fields |
//! | `ESFIXTURE_MAPPING` | alternative mapping file |

pub mod config;
pub mod decoder;
pub mod deprecation;
pub mod error;
pub mod fixtures;
pub mod harness;
pub mod logging;
pub mod mapping;
pub mod provision;
pub mod reporter;

pub use config::{CiEnvironment, DecoderPolicy, DeprecationPolicy, HarnessConfig};
pub use decoder::apply_decoder_policy;
pub use deprecation::{install_deprecation_monitor, DeprecationMonitor};
pub use error::{HarnessError, Result};
pub use fixtures::{
    random_string, Comment, Doctype, Order, PercolatorQuery, SuggestField, Tweet, FIXTURE_INDICES,
    INDEX_NAME, INDEX_NAME_2,
};
pub use harness::{Fixture, FixtureState, Harness};
pub use mapping::Mapping;
pub use provision::{
    cleanup_indices, flush_fixture, provision_indices, seed_documents, DocumentRef, SeedDocument,
    SeedPlan,
};
pub use reporter::{Entry, FatalReporter, Recorder, RecordingReporter, TestReporter};

pub use esfixture_client;
