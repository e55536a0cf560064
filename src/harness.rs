//! Test setup entry points.
//!
//! Each `setup_*` method builds a client, wires in the decoder policy and the
//! deprecation monitor, drops stale fixture indices and then provisions as much
//! of the fixture as the method promises. Steps run one after another and the
//! first failure is returned.

use crate::config::HarnessConfig;
use crate::decoder::apply_decoder_policy;
use crate::deprecation::install_deprecation_monitor;
use crate::error::{HarnessError, Result};
use crate::mapping::Mapping;
use crate::provision::{cleanup_indices, provision_indices, seed_documents, DocumentRef, SeedPlan};
use crate::reporter::{FatalReporter, Recorder};
use esfixture_client::{Client, ClientBuilder, ClientOption};
use std::sync::Arc;

/// How far a fixture has been provisioned. Transitions only move forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FixtureState {
    Uninitialized,
    ClientReady,
    IndicesCleaned,
    IndicesCreated,
    DocumentsSeeded,
    Flushed,
}

impl FixtureState {
    pub fn can_advance_to(self, next: FixtureState) -> bool {
        use FixtureState::*;
        matches!(
            (self, next),
            (Uninitialized, ClientReady)
                | (ClientReady, IndicesCleaned)
                | (IndicesCleaned, IndicesCreated)
                | (IndicesCreated, DocumentsSeeded)
                | (IndicesCreated, Flushed)
                | (DocumentsSeeded, Flushed)
        )
    }
}

/// A configured client plus what has been provisioned for it.
#[derive(Debug)]
pub struct Fixture {
    client: Client,
    state: FixtureState,
    seeded: Vec<DocumentRef>,
}

impl Fixture {
    fn new(client: Client) -> Self {
        Self {
            client,
            state: FixtureState::Uninitialized,
            seeded: Vec::new(),
        }
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    pub fn into_client(self) -> Client {
        self.client
    }

    pub fn state(&self) -> FixtureState {
        self.state
    }

    /// Documents written by the seeding step, in write order.
    pub fn seeded(&self) -> &[DocumentRef] {
        &self.seeded
    }

    pub fn advance(&mut self, next: FixtureState) -> Result<()> {
        if !self.state.can_advance_to(next) {
            return Err(HarnessError::InvalidTransition {
                from: self.state,
                to: next,
            });
        }
        tracing::trace!("[SETUP] fixture {:?} -> {:?}", self.state, next);
        self.state = next;
        Ok(())
    }
}

pub struct Harness<R: FatalReporter + 'static> {
    config: HarnessConfig,
    mapping: Mapping,
    reporter: Arc<R>,
}

impl<R: FatalReporter + 'static> Harness<R> {
    pub fn new(config: HarnessConfig, reporter: Arc<R>) -> Result<Self> {
        let mapping = match &config.mapping_path {
            Some(path) => Mapping::from_file(path)?,
            None => Mapping::embedded()?,
        };
        if let Some(ci) = &config.ci {
            tracing::info!(
                "[SETUP] running under {} (toolchain: {})",
                ci.provider,
                ci.toolchain.as_deref().unwrap_or("unknown")
            );
        }
        tracing::debug!(
            "[SETUP] harness url={} decoder={:?} deprecations={}",
            config.url,
            config.decoder,
            config.deprecations
        );
        Ok(Self {
            config,
            mapping,
            reporter,
        })
    }

    /// Harness configured from `ESFIXTURE_*` variables.
    pub fn from_env(reporter: Arc<R>) -> Result<Self> {
        Self::new(HarnessConfig::from_env()?, reporter)
    }

    pub fn config(&self) -> &HarnessConfig {
        &self.config
    }

    pub fn mapping(&self) -> &Mapping {
        &self.mapping
    }

    pub fn reporter(&self) -> &Arc<R> {
        &self.reporter
    }

    /// Builds a client and removes both fixture indices.
    ///
    /// The configured URL is applied before `options`, so an explicit
    /// [`ClientOption::Url`] wins.
    pub async fn setup_client(&self, options: Vec<ClientOption>) -> Result<Fixture> {
        let mut client = ClientBuilder::new()
            .url(self.config.url.as_str())
            .options(options)
            .build()
            .await
            .map_err(HarnessError::Construction)?;

        apply_decoder_policy(&mut client, self.config.decoder);
        let recorder: Arc<dyn Recorder> = self.reporter.clone();
        install_deprecation_monitor(&mut client, self.config.deprecations, recorder);

        let mut fixture = Fixture::new(client);
        fixture.advance(FixtureState::ClientReady)?;

        cleanup_indices(fixture.client()).await?;
        fixture.advance(FixtureState::IndicesCleaned)?;
        Ok(fixture)
    }

    /// [`Self::setup_client`], then both fixture indices from the mapping.
    pub async fn setup_client_and_create_indices(
        &self,
        options: Vec<ClientOption>,
    ) -> Result<Fixture> {
        let mut fixture = self.setup_client(options).await?;
        provision_indices(fixture.client(), &self.mapping).await?;
        fixture.advance(FixtureState::IndicesCreated)?;
        Ok(fixture)
    }

    /// Like [`Self::setup_client_and_create_indices`] with request and
    /// response bodies written to the trace log.
    pub async fn setup_client_and_create_indices_with_trace_log(
        &self,
        mut options: Vec<ClientOption>,
    ) -> Result<Fixture> {
        options.push(ClientOption::TraceLog(true));
        self.setup_client_and_create_indices(options).await
    }

    /// Indices plus the full tweet, comment and order corpus, flushed.
    pub async fn setup_client_and_add_docs(&self, options: Vec<ClientOption>) -> Result<Fixture> {
        self.seed(options, SeedPlan::full()?).await
    }

    /// Indices plus two tweets of the source-less type, flushed.
    pub async fn setup_client_and_add_docs_no_source(
        &self,
        options: Vec<ClientOption>,
    ) -> Result<Fixture> {
        self.seed(options, SeedPlan::no_source()?).await
    }

    async fn seed(&self, options: Vec<ClientOption>, plan: SeedPlan) -> Result<Fixture> {
        let mut fixture = self.setup_client_and_create_indices(options).await?;
        fixture.seeded = seed_documents(fixture.client(), &plan).await?;
        fixture.advance(FixtureState::DocumentsSeeded)?;
        fixture.advance(FixtureState::Flushed)?;
        Ok(fixture)
    }

    /// Unwraps a setup result, aborting the test through the reporter on error.
    pub fn must<T>(&self, result: Result<T>) -> T {
        match result {
            Ok(value) => value,
            Err(e) => self.reporter.fatal(&e.to_string()),
        }
    }
}
