//! # esfixture-client
//!
//! A deliberately thin async binding to the Elasticsearch REST API: index
//! creation and deletion, single-document indexing, flush, get and count.
//!
//! Two slots on [`Client`] are meant to be swapped by test harnesses:
//!
//! - the [`Decoder`] that turns response bodies into typed records
//!   ([`DefaultDecoder`] ignores unknown fields, [`StrictDecoder`] rejects them);
//! - an optional [`ResponseObserver`] that sees the status and headers of every
//!   response before its body is read.
//!
//! ```rust,no_run
//! use esfixture_client::{Client, ClientOption};
//!
//! # async fn run() -> esfixture_client::Result<()> {
//! let client = Client::new(vec![ClientOption::Url("http://127.0.0.1:9200".into())]).await?;
//! client.flush().index("elastic-test").send().await?;
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod decoder;
pub mod error;
pub mod observer;
pub mod services;
pub mod types;

pub use client::{Client, ClientBuilder, ClientOption, RawResponse, DEFAULT_URL};
pub use decoder::{decode_with, DecodeError, DecodeTarget, Decoder, DefaultDecoder, StrictDecoder};
pub use error::{ClientError, Result};
pub use observer::{RequestInfo, ResponseHead, ResponseObserver};
pub use types::*;
