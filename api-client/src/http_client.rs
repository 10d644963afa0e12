// HTTP client for the PDFShift API

use crate::config::ClientConfig;
use crate::errors::PdfShiftError;
use pdfshift_core::{ConversionRequest, ConversionResult};
use serde_json::Value;
use std::path::Path;

/// PDFShift API client
///
/// Holds the transport and the credential. Requests are issued one at a time;
/// nothing is retried.
#[derive(Debug, Clone)]
pub struct PdfShiftClient {
    http: reqwest::Client,
    config: ClientConfig,
}

/// What [`PdfShiftClient::convert_to`] produced
#[derive(Debug, Clone, PartialEq)]
pub enum ConvertOutcome {
    /// No output path was given: the conversion result itself
    Data(ConversionResult),

    /// The result was written to the output path; number of bytes written
    Saved(usize),
}

impl PdfShiftClient {
    /// Create a new client
    ///
    /// # Arguments
    /// * `config` - API key, base URL and optional timeout
    pub fn new(config: ClientConfig) -> Result<Self, PdfShiftError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build()?;

        Ok(Self { http, config })
    }

    /// Create a client from `PDFSHIFT_API_KEY` / `PDFSHIFT_API_BASE`
    pub fn from_env() -> Result<Self, PdfShiftError> {
        Self::new(ClientConfig::from_env())
    }

    /// Use a caller-built transport (proxies, TLS roots, timeouts).
    ///
    /// `config.timeout` is ignored; configure it on `http` instead.
    pub fn with_http_client(config: ClientConfig, http: reqwest::Client) -> Self {
        Self { http, config }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn api_key(&self) -> Option<&str> {
        self.config.api_key.as_deref()
    }

    pub fn set_api_key(&mut self, api_key: impl Into<String>) {
        self.config.api_key = Some(api_key.into());
    }

    /// Start a conversion job with no options set
    pub fn conversion(&self) -> Conversion {
        self.conversion_with(ConversionRequest::new())
    }

    /// Start a conversion job from prepared options
    pub fn conversion_with(&self, request: ConversionRequest) -> Conversion {
        Conversion {
            client: self.clone(),
            request,
            data: None,
        }
    }

    /// Fetch the credit status of the account (GET /credits/)
    ///
    /// # Returns
    /// The JSON document returned by the service
    pub async fn credits(&self) -> Result<Value, PdfShiftError> {
        let api_key = self.require_api_key()?;
        let url = self.config.endpoint("credits");
        tracing::debug!("Requesting credits from {}", url);

        let response = self
            .http
            .get(&url)
            .basic_auth(api_key, Some(""))
            .send()
            .await?;

        let status = response.status().as_u16();
        let body = response.bytes().await?;

        if status != 200 {
            return Err(self.failure("credits", status, &body));
        }

        serde_json::from_slice(&body).map_err(|_| {
            tracing::warn!("Credits response is not valid JSON");
            PdfShiftError::InvalidResponse { status }
        })
    }

    /// Submit a request to POST /convert/
    ///
    /// # Arguments
    /// * `request` - Complete option set, including `source`
    ///
    /// # Returns
    /// The document bytes, or storage metadata when `filename` is set
    pub async fn send(
        &self,
        request: &ConversionRequest,
    ) -> Result<ConversionResult, PdfShiftError> {
        let api_key = self.require_api_key()?;
        let url = self.config.endpoint("convert");
        tracing::debug!(
            "Submitting conversion to {} ({} options)",
            url,
            request.options().len()
        );

        let response = self
            .http
            .post(&url)
            .basic_auth(api_key, Some(""))
            .json(request)
            .send()
            .await?;

        let status = response.status().as_u16();
        let body = response.bytes().await?;

        if status != 200 {
            return Err(self.failure("convert", status, &body));
        }

        if request.is_stored_remotely() {
            let metadata = serde_json::from_slice(&body).map_err(|_| {
                tracing::warn!("Stored conversion response is not valid JSON");
                PdfShiftError::InvalidResponse { status }
            })?;
            tracing::info!("Conversion stored remotely");
            return Ok(ConversionResult::Stored(metadata));
        }

        tracing::info!("Conversion successful: {} bytes", body.len());
        Ok(ConversionResult::Binary(body.to_vec()))
    }

    /// Convert `source` with `options` in one call
    ///
    /// # Arguments
    /// * `source` - URL or raw HTML
    /// * `options` - Conversion options
    /// * `output` - Where to write the result; `None` returns it instead
    pub async fn convert_to(
        &self,
        source: impl Into<String>,
        options: impl Into<ConversionRequest>,
        output: Option<&Path>,
    ) -> Result<ConvertOutcome, PdfShiftError> {
        let mut conversion = self.conversion_with(options.into());
        conversion.convert(source).await?;

        match output {
            Some(path) => conversion.save(path).await.map(ConvertOutcome::Saved),
            None => match conversion.into_data() {
                Some(data) => Ok(ConvertOutcome::Data(data)),
                None => Err(PdfShiftError::no_data()),
            },
        }
    }

    fn require_api_key(&self) -> Result<&str, PdfShiftError> {
        match self.api_key() {
            Some(key) => Ok(key),
            None => {
                tracing::warn!("No API key configured; request not sent");
                Err(PdfShiftError::missing_api_key())
            }
        }
    }

    fn failure(&self, endpoint: &str, status: u16, body: &[u8]) -> PdfShiftError {
        let error = crate::errors::classify(status, body);
        tracing::warn!("PDFShift {} failed with status {}: {}", endpoint, status, error);
        error
    }
}

/// A single conversion job: its options and, once converted, its result
#[derive(Debug, Clone)]
pub struct Conversion {
    client: PdfShiftClient,
    request: ConversionRequest,
    data: Option<ConversionResult>,
}

impl Conversion {
    pub fn options(&self) -> &ConversionRequest {
        &self.request
    }

    /// Options stay editable after a conversion; nothing is reset
    pub fn options_mut(&mut self) -> &mut ConversionRequest {
        &mut self.request
    }

    pub fn into_options(self) -> ConversionRequest {
        self.request
    }

    /// Convert `source` using the current options
    ///
    /// On failure the previous result, if any, is kept.
    pub async fn convert(
        &mut self,
        source: impl Into<String>,
    ) -> Result<&ConversionResult, PdfShiftError> {
        self.request.set_source(source);
        let result = self.client.send(&self.request).await?;
        Ok(self.data.insert(result))
    }

    /// Result of the last successful conversion
    pub fn data(&self) -> Option<&ConversionResult> {
        self.data.as_ref()
    }

    pub fn into_data(self) -> Option<ConversionResult> {
        self.data
    }

    /// Write the last result to `path`
    ///
    /// # Returns
    /// Number of bytes written
    pub async fn save(&self, path: impl AsRef<Path>) -> Result<usize, PdfShiftError> {
        let data = self.data.as_ref().ok_or_else(PdfShiftError::no_data)?;
        let bytes = data.to_bytes()?;
        let path = path.as_ref();

        tokio::fs::write(path, &bytes).await?;
        tracing::info!("Saved {} bytes to {}", bytes.len(), path.display());

        Ok(bytes.len())
    }
}
