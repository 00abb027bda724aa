use crate::error::{AvrError, Result};
use crate::protocol::{Request, Response, Service};
use reqwest::Url;
use serde_json::Value;
use std::time::Duration;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Per-call HTTP transport for the device's control endpoint
///
/// Holds no protocol state: every call is an independent POST to
/// `http://<host>:<port>/sony/<service>`.
#[derive(Debug)]
pub(crate) struct Transport {
    http: reqwest::Client,
    base: Url,
    host: String,
    port: u16,
}

impl Transport {
    pub(crate) fn new(host: impl Into<String>, port: u16) -> Result<Self> {
        let host = host.into();
        let base = base_url(&host, port)?;
        let http = reqwest::Client::builder().timeout(REQUEST_TIMEOUT).build()?;

        Ok(Self {
            http,
            base,
            host,
            port,
        })
    }

    pub(crate) fn host(&self) -> &str {
        &self.host
    }

    pub(crate) fn port(&self) -> u16 {
        self.port
    }

    /// Send one request to a service endpoint and classify the reply
    ///
    /// A protocol-level `[code, message]` error takes precedence over a
    /// non-success HTTP status: the device's reported reason is the richer
    /// signal when both are present.
    pub(crate) async fn call(&self, service: Service, request: Request) -> Result<Value> {
        let url = self
            .base
            .join(service.as_str())
            .map_err(|e| AvrError::InvalidAddress(e.to_string()))?;

        let json = serde_json::to_string(&request)?;
        tracing::debug!("Sending to {}: {}", url, json);

        let reply = self
            .http
            .post(url)
            .header("Content-Type", "application/json")
            .body(json)
            .send()
            .await?;
        let http_error = reply.error_for_status_ref().err();
        let text = reply.text().await?;
        tracing::debug!("Received: {}", text);

        match serde_json::from_str::<Response>(&text) {
            Ok(response) => {
                if let Some(error) = response.error {
                    return Err(AvrError::Device {
                        code: error.code(),
                        message: error.message().to_owned(),
                    });
                }
                if let Some(http) = http_error {
                    return Err(AvrError::Http(http));
                }
                if response.id != Some(request.id) {
                    tracing::warn!(
                        "response id {:?} does not match request id {}",
                        response.id,
                        request.id
                    );
                }
                response.into_payload().ok_or_else(|| {
                    AvrError::InvalidResponse("reply carried neither result nor error".to_owned())
                })
            }
            Err(e) => match http_error {
                Some(http) => Err(AvrError::Http(http)),
                None => Err(AvrError::Json(e)),
            },
        }
    }
}

/// Build the `/sony/` base URL, rejecting syntactically invalid hosts
fn base_url(host: &str, port: u16) -> Result<Url> {
    if host.is_empty() || host.contains(['/', '?', '#', '@', ' ']) {
        return Err(AvrError::InvalidAddress(host.to_owned()));
    }
    Url::parse(&format!("http://{host}:{port}/sony/"))
        .map_err(|e| AvrError::InvalidAddress(format!("{host}: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_for_ip_address() {
        let url = base_url("192.168.1.100", 54480).unwrap();
        assert_eq!(url.as_str(), "http://192.168.1.100:54480/sony/");
    }

    #[test]
    fn base_url_for_hostname() {
        let url = base_url("speaker.local", 54480).unwrap();
        assert_eq!(url.host_str(), Some("speaker.local"));
        assert_eq!(url.port(), Some(54480));
    }

    #[test]
    fn service_endpoints_join_under_base() {
        let url = base_url("192.168.1.100", 54480).unwrap();
        let endpoint = url.join(Service::AvContent.as_str()).unwrap();
        assert_eq!(endpoint.as_str(), "http://192.168.1.100:54480/sony/avContent");
    }

    #[test]
    fn malformed_hosts_are_rejected() {
        for host in ["", "host with spaces", "host/path", "user@host", "host?x"] {
            let err = base_url(host, 54480).unwrap_err();
            assert!(matches!(err, AvrError::InvalidAddress(_)), "host {host:?}");
        }
    }
}
