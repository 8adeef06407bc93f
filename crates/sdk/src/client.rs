//! The client facade
//!
//! [`CorezoidClient`] owns one validated [`ClientConfig`] and one HTTP
//! session for its lifetime. The session is released when the client is
//! dropped.

use std::sync::Arc;

use corezoid_core::{
    codec, Clock, HttpTransport, OperationBatch, ReferenceGenerator, RequestTransport, ResponseView,
    SystemClock, TimestampReferenceGenerator,
};
use corezoid_domain::constants::DEFAULT_MAX_BATCH_SIZE;
use corezoid_domain::{ClientConfig, ConvId, CorezoidError, Operation, Result, TaskData};
use corezoid_infra::config::{self, ConfigOverrides};
use corezoid_infra::ReqwestTransport;
use tracing::{debug, instrument};

/// Synchronous client for the Corezoid JSON API.
///
/// Every call blocks the current thread for the HTTP round trip, retries
/// included. Independent clients share no state and may be used from
/// different threads.
pub struct CorezoidClient {
    config: ClientConfig,
    transport: RequestTransport,
    references: Arc<dyn ReferenceGenerator>,
}

impl CorezoidClient {
    /// Client over the default HTTP transport.
    ///
    /// # Errors
    /// Returns `CorezoidError::Config` if the login or secret is empty or the
    /// HTTP client cannot be built.
    pub fn new(config: ClientConfig) -> Result<Self> {
        Self::builder(config).build()
    }

    /// Client configured from `COREZOID_*` environment variables and
    /// defaults.
    ///
    /// # Errors
    /// See [`CorezoidClient::new`]; unparsable numeric variables are also
    /// `CorezoidError::Config`.
    pub fn from_env() -> Result<Self> {
        Self::from_overrides(ConfigOverrides::default())
    }

    /// Client configured from explicit values, falling back to the
    /// environment and then to defaults.
    ///
    /// # Errors
    /// See [`CorezoidClient::from_env`].
    pub fn from_overrides(overrides: ConfigOverrides) -> Result<Self> {
        Self::new(config::resolve(overrides)?)
    }

    /// Builder for a client over `config`.
    pub fn builder(config: ClientConfig) -> CorezoidClientBuilder {
        CorezoidClientBuilder::new(config)
    }

    /// Configuration the client was built with.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Send `operations` as one signed request.
    ///
    /// A response with `request_proc == "error"` is returned as an
    /// unsuccessful [`ResponseView`], not as an error.
    ///
    /// # Errors
    /// - `CorezoidError::Validation` if `operations` is empty; nothing is
    ///   sent
    /// - `CorezoidError::Connection` if no HTTP response arrived within the
    ///   retry budget
    /// - `CorezoidError::Api` for a non-2xx status
    /// - `CorezoidError::MalformedResponse` if the body is not a JSON
    ///   envelope
    #[instrument(skip_all, fields(ops = operations.len()))]
    pub fn send(&self, operations: &[Operation]) -> Result<ResponseView> {
        if operations.is_empty() {
            return Err(CorezoidError::Validation("No operations to send".into()));
        }
        self.transport.send(operations)
    }

    /// Send every operation in `batch`. The batch is left untouched; clear
    /// it to reuse it.
    ///
    /// # Errors
    /// `CorezoidError::Validation` if the batch is empty, otherwise as
    /// [`CorezoidClient::send`].
    pub fn send_batch(&self, batch: &OperationBatch) -> Result<ResponseView> {
        if batch.is_empty() {
            return Err(CorezoidError::Validation("Batch is empty".into()));
        }
        debug!(size = batch.size(), "sending batch");
        self.send(batch.snapshot())
    }

    /// Empty batch with the default capacity.
    pub fn create_batch(&self) -> OperationBatch {
        self.create_batch_with_capacity(DEFAULT_MAX_BATCH_SIZE)
    }

    /// Empty batch holding at most `max_batch_size` operations.
    pub fn create_batch_with_capacity(&self, max_batch_size: usize) -> OperationBatch {
        OperationBatch::with_reference_generator(max_batch_size, Arc::clone(&self.references))
    }

    /// Create one task. A reference is generated when `reference` is `None`;
    /// it is echoed back in the result.
    ///
    /// # Errors
    /// As [`CorezoidClient::send`].
    pub fn create_task(
        &self,
        conv_id: impl Into<ConvId>,
        data: TaskData,
        reference: Option<String>,
    ) -> Result<ResponseView> {
        let reference = reference.unwrap_or_else(|| self.references.next_reference());
        self.send(&[codec::build_create(conv_id, reference, data)])
    }

    /// # Errors
    /// As [`CorezoidClient::send`].
    pub fn modify_task(
        &self,
        conv_id: impl Into<ConvId>,
        reference: impl Into<String>,
        data: TaskData,
    ) -> Result<ResponseView> {
        self.send(&[codec::build_modify_by_ref(conv_id, reference, data)])
    }

    /// # Errors
    /// As [`CorezoidClient::send`].
    pub fn modify_task_by_id(
        &self,
        conv_id: impl Into<ConvId>,
        obj_id: impl Into<String>,
        data: TaskData,
    ) -> Result<ResponseView> {
        self.send(&[codec::build_modify_by_id(conv_id, obj_id, data)])
    }

    /// # Errors
    /// As [`CorezoidClient::send`].
    pub fn get_task(&self, conv_id: impl Into<ConvId>, reference: impl Into<String>) -> Result<ResponseView> {
        self.send(&[codec::build_get_by_ref(conv_id, reference)])
    }

    /// # Errors
    /// As [`CorezoidClient::send`].
    pub fn get_task_by_id(&self, conv_id: impl Into<ConvId>, obj_id: impl Into<String>) -> Result<ResponseView> {
        self.send(&[codec::build_get_by_id(conv_id, obj_id)])
    }

    /// Upload a process scheme (JSON text) into a folder.
    ///
    /// # Errors
    /// As [`CorezoidClient::send`].
    pub fn upload_schema(
        &self,
        folder_id: impl Into<ConvId>,
        scheme: impl Into<String>,
        async_mode: bool,
    ) -> Result<ResponseView> {
        self.send(&[codec::build_schema_upload(folder_id, scheme, async_mode)])
    }
}

impl std::fmt::Debug for CorezoidClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CorezoidClient").field("config", &self.config).finish_non_exhaustive()
    }
}

/// Builder for [`CorezoidClient`] with replaceable collaborators.
pub struct CorezoidClientBuilder {
    config: ClientConfig,
    http: Option<Arc<dyn HttpTransport>>,
    clock: Option<Arc<dyn Clock>>,
    references: Option<Arc<dyn ReferenceGenerator>>,
}

impl CorezoidClientBuilder {
    /// Builder with default collaborators.
    pub fn new(config: ClientConfig) -> Self {
        Self { config, http: None, clock: None, references: None }
    }

    /// Replace the reqwest transport, e.g. with a test double.
    pub fn http_transport(mut self, http: Arc<dyn HttpTransport>) -> Self {
        self.http = Some(http);
        self
    }

    /// Source of `X-API-Timestamp` and of the seconds in generated
    /// references.
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Override how batch references are generated.
    pub fn reference_generator(mut self, references: Arc<dyn ReferenceGenerator>) -> Self {
        self.references = Some(references);
        self
    }

    /// # Errors
    /// Returns `CorezoidError::Config` if the configuration is invalid or the
    /// default HTTP transport cannot be built.
    pub fn build(self) -> Result<CorezoidClient> {
        self.config.validate()?;

        let http = match self.http {
            Some(http) => http,
            None => Arc::new(ReqwestTransport::from_config(&self.config)?),
        };
        let clock = self.clock.unwrap_or_else(|| Arc::new(SystemClock));
        let references = self
            .references
            .unwrap_or_else(|| Arc::new(TimestampReferenceGenerator::new(Arc::clone(&clock))));
        let transport = RequestTransport::with_clock(&self.config, http, clock)?;

        debug!(api_url = %self.config.api_url, "client ready");
        Ok(CorezoidClient { config: self.config, transport, references })
    }
}

impl std::fmt::Debug for CorezoidClientBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CorezoidClientBuilder")
            .field("config", &self.config)
            .field("custom_http", &self.http.is_some())
            .field("custom_clock", &self.clock.is_some())
            .field("custom_references", &self.references.is_some())
            .finish()
    }
}
