//! Signed request construction and response decoding
//!
//! [`RequestTransport`] turns a slice of operations into one signed POST:
//! the envelope is serialized canonically once, signed over
//! `timestamp || body`, handed to the [`HttpTransport`] port, and the reply
//! is decoded into a [`ResponseView`].
//!
//! Failure handling:
//! - no HTTP response after the port's retries: `CorezoidError::Connection`
//! - non-2xx status: `CorezoidError::Api`, even if the body also reports a
//!   failure
//! - body not an envelope object: `CorezoidError::MalformedResponse`
//! - `request_proc == "error"`: returned as an unsuccessful view, never
//!   retried

use std::fmt;
use std::sync::Arc;

use corezoid_domain::{
    AuthHeaders, ClientConfig, CorezoidError, HttpRequest, HttpResponse, Operation,
    RequestEnvelope, Result,
};
use tracing::{debug, error, instrument, trace, warn};

use crate::ports::{Clock, HttpTransport, SystemClock};
use crate::response::ResponseView;
use crate::signature::{self, Signer};

/// Signs, sends and decodes request envelopes for one API login.
pub struct RequestTransport {
    http: Arc<dyn HttpTransport>,
    clock: Arc<dyn Clock>,
    signer: Signer,
    api_login: String,
    api_url: String,
}

impl RequestTransport {
    /// # Errors
    /// Returns `CorezoidError::Config` if `config` fails validation.
    pub fn new(config: &ClientConfig, http: Arc<dyn HttpTransport>) -> Result<Self> {
        Self::with_clock(config, http, Arc::new(SystemClock))
    }

    /// # Errors
    /// Returns `CorezoidError::Config` if `config` fails validation.
    pub fn with_clock(
        config: &ClientConfig,
        http: Arc<dyn HttpTransport>,
        clock: Arc<dyn Clock>,
    ) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            http,
            clock,
            signer: Signer::new(&config.api_secret)?,
            api_login: config.api_login.clone(),
            api_url: config.api_url.clone(),
        })
    }

    /// Endpoint every request is posted to.
    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    /// Headers authenticating `content` at `timestamp`.
    pub fn auth_headers(&self, timestamp: String, content: &str) -> AuthHeaders {
        AuthHeaders {
            api_login: self.api_login.clone(),
            signature: self.signer.sign(&timestamp, content),
            timestamp,
        }
    }

    /// Serialize and sign `operations` into a ready-to-send POST.
    ///
    /// # Errors
    /// Returns `CorezoidError::Serialization` if the envelope cannot be
    /// encoded.
    pub fn prepare(&self, operations: &[Operation]) -> Result<HttpRequest> {
        let body = RequestEnvelope::new(operations).to_canonical_json()?;
        let headers = self.auth_headers(signature::timestamp(self.clock.as_ref()), &body);
        trace!(body = %body, "prepared request body");
        Ok(HttpRequest { url: self.api_url.clone(), body, headers: headers.to_pairs() })
    }

    /// Send `operations` as one signed request.
    ///
    /// # Errors
    /// See the module documentation for the failure taxonomy.
    #[instrument(skip_all, fields(ops = operations.len(), url = %self.api_url))]
    pub fn send(&self, operations: &[Operation]) -> Result<ResponseView> {
        let request = self.prepare(operations)?;
        debug!(bytes = request.body.len(), "sending request envelope");

        let response = self.http.post(&request).inspect_err(|err| {
            error!(error = %err, kind = err.label(), "request could not be delivered");
        })?;

        decode_response(response)
    }
}

impl fmt::Debug for RequestTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestTransport")
            .field("api_login", &self.api_login)
            .field("api_url", &self.api_url)
            .finish_non_exhaustive()
    }
}

/// Map a completed HTTP exchange to a view or an API-level error.
///
/// # Errors
/// `CorezoidError::Api` for non-2xx statuses, `MalformedResponse` for
/// bodies that are not an envelope object.
pub fn decode_response(response: HttpResponse) -> Result<ResponseView> {
    debug!(status = response.status, "received response");

    if !response.is_success() {
        let engine_message = ResponseView::parse(&response.body)
            .ok()
            .and_then(|view| view.error_message().map(str::to_owned));
        warn!(
            status = response.status,
            engine_message = engine_message.as_deref().unwrap_or(""),
            "engine returned non-success status"
        );
        return Err(CorezoidError::Api { status: response.status, body: response.body });
    }

    let view = ResponseView::parse(&response.body).inspect_err(|err| {
        error!(error = %err, "engine returned an unreadable body");
    })?;

    if view.is_success() {
        debug!(results = view.results().len(), "request processed");
    } else {
        warn!(
            error_message = view.error_message().unwrap_or(""),
            "engine rejected the request"
        );
    }

    Ok(view)
}
