//! HTTP transport seam between the dispatcher and the network
//!
//! The dispatcher never blocks on a response: it hands a fully-built request
//! to a [`Transport`] together with a completion delegate and returns to its
//! own loop. The production transport drives the exchange on a private tokio
//! runtime, so the delegate fires on one of that runtime's threads.

use crate::errors::ModwatchError;

/// Sentinel status reported through the failure continuation when the
/// exchange never produced an HTTP response (connect, TLS, timeout). Not a
/// real status code, but deliberately indistinguishable in handling from a
/// remote rejection.
pub const TRANSPORT_FAILED: u16 = 0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

/// One fully-built outbound request: everything the transport needs, with
/// the API-variant mapping already applied by the dispatcher.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,
    pub url: String,
    pub headers: Vec<(&'static str, String)>,
}

/// Invoked exactly once per issued request with the response status and raw
/// body, on whatever thread the transport completes the exchange.
pub type Completion = Box<dyn FnOnce(u16, Vec<u8>) + Send + 'static>;

pub trait Transport: Send + Sync {
    fn send(&self, request: ApiRequest, done: Completion);
}

/// Production transport: reqwest over rustls, one exchange at a time as far
/// as the dispatcher is concerned, completions delivered from a dedicated
/// single-worker tokio runtime.
pub struct HttpTransport {
    runtime: tokio::runtime::Runtime,
    client: reqwest::Client,
}

impl HttpTransport {
    /// Builds the transport, trusting `ca_bundle` (PEM) in addition to the
    /// system roots when given.
    pub fn new(ca_bundle: Option<&[u8]>) -> Result<Self, ModwatchError> {
        let mut builder = reqwest::Client::builder().use_rustls_tls();
        if let Some(pem) = ca_bundle {
            let certs = reqwest::Certificate::from_pem_bundle(pem)
                .map_err(|e| ModwatchError::ConfigError(format!("bad CA bundle: {}", e)))?;
            for cert in certs {
                builder = builder.add_root_certificate(cert);
            }
        }
        let client = builder.build()?;
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .enable_all()
            .build()?;
        Ok(Self { runtime, client })
    }
}

impl Transport for HttpTransport {
    fn send(&self, request: ApiRequest, done: Completion) {
        let client = self.client.clone();
        self.runtime.spawn(async move {
            let mut builder = match request.method {
                Method::Get => client.get(&request.url),
                Method::Post => client.post(&request.url),
            };
            for (name, value) in &request.headers {
                builder = builder.header(*name, value);
            }
            match builder.send().await {
                Ok(response) => {
                    let status = response.status().as_u16();
                    let body = match response.bytes().await {
                        Ok(bytes) => bytes.to_vec(),
                        Err(err) => {
                            log::debug!("failed to read body from {}: {}", request.url, err);
                            Vec::new()
                        }
                    };
                    done(status, body);
                }
                Err(err) => {
                    log::debug!("transport failure for {}: {}", request.url, err);
                    done(TRANSPORT_FAILED, Vec::new());
                }
            }
        });
    }
}
