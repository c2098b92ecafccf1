//! Choreo deployment API client

use crate::api::payload::DeploymentRequest;
use crate::{DeployError, Result, APP_NAME, VERSION};
use tracing::{debug, info};

/// Client posting deployment requests to the Choreo API
pub struct DeployClient {
    client: reqwest::Client,
    domain: String,
}

impl DeployClient {
    /// Create a new client for the API at `domain`, given without a trailing `/`
    pub fn new(domain: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(format!("{}/{}", APP_NAME, VERSION))
            .build()
            .map_err(DeployError::Http)?;

        Ok(Self {
            client,
            domain: domain.to_string(),
        })
    }

    /// Endpoint a request should go to.
    ///
    /// `None` when the request carries no registry token.
    pub fn endpoint(&self, request: &DeploymentRequest) -> Option<String> {
        if request.registry_token().is_empty() {
            return None;
        }

        let path = if request.is_container() {
            "image/deploy-byoc"
        } else {
            "image/deploy"
        };
        Some(format!("{}/{}", self.domain, path))
    }

    /// Post the request once
    pub async fn deploy(&self, request: &DeploymentRequest) -> Result<()> {
        let url = self.endpoint(request).ok_or(DeployError::MissingToken)?;

        info!(url = %url, "Sending request to Choreo API");
        let response = self
            .client
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(|e| classify(e, &url))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await?;
            return Err(DeployError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        debug!(status = status.as_u16(), "Deployment accepted");
        Ok(())
    }
}

/// Separate "nothing came back" from other transport failures
fn classify(err: reqwest::Error, url: &str) -> DeployError {
    if err.is_connect() || err.is_timeout() || err.is_request() {
        DeployError::NoResponse {
            method: "POST".to_string(),
            url: url.to_string(),
            reason: err.to_string(),
        }
    } else {
        DeployError::Http(err)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::config::tests::source_args;
    use crate::config::DeployConfig;
    use crate::registry::credentials::RegistrySummary;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::{TcpListener, TcpStream};
    use tokio::task::JoinHandle;

    fn request(token: &str, container: bool) -> DeploymentRequest {
        let mut args = source_args();
        args.token = Some(token.to_string());
        args.is_container_deployment = Some(container.to_string());
        let config = DeployConfig::from_args(&args).unwrap();
        DeploymentRequest::build(&config, RegistrySummary::default(), None)
    }

    async fn read_request(socket: &mut TcpStream) -> String {
        let mut buf = Vec::new();
        let mut chunk = [0u8; 4096];
        loop {
            let n = socket.read(&mut chunk).await.unwrap();
            if n == 0 {
                break;
            }
            buf.extend_from_slice(&chunk[..n]);

            let text = String::from_utf8_lossy(&buf);
            if let Some(header_end) = text.find("\r\n\r\n") {
                let content_length = text[..header_end]
                    .lines()
                    .filter_map(|line| line.split_once(':'))
                    .find(|(name, _)| name.eq_ignore_ascii_case("content-length"))
                    .and_then(|(_, value)| value.trim().parse::<usize>().ok())
                    .unwrap_or(0);
                if buf.len() >= header_end + 4 + content_length {
                    break;
                }
            }
        }
        String::from_utf8_lossy(&buf).to_string()
    }

    /// Mock upstream answering exactly one request
    pub(crate) async fn serve_once(
        status_line: &'static str,
        body: &'static str,
    ) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let received = read_request(&mut socket).await;
            let response = format!(
                "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status_line,
                body.len(),
                body
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            received
        });

        (format!("http://{}", addr), handle)
    }

    #[test]
    fn test_endpoint_selection() {
        // source_args() passes the domain with a trailing slash
        let config = DeployConfig::from_args(&source_args()).unwrap();
        let client = DeployClient::new(&config.domain).unwrap();

        assert_eq!(
            client.endpoint(&request("token", false)).as_deref(),
            Some("https://api.example.com/image/deploy")
        );
        assert_eq!(
            client.endpoint(&request("token", true)).as_deref(),
            Some("https://api.example.com/image/deploy-byoc")
        );
        assert_eq!(client.endpoint(&request("", false)), None);
    }

    #[tokio::test]
    async fn test_empty_token_sends_nothing() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let client = DeployClient::new(&format!("http://{}", addr)).unwrap();

        let err = client.deploy(&request("", false)).await.unwrap_err();
        assert!(matches!(err, DeployError::MissingToken));

        let accepted =
            tokio::time::timeout(std::time::Duration::from_millis(100), listener.accept()).await;
        assert!(accepted.is_err(), "no connection should have been made");
    }

    #[tokio::test]
    async fn test_successful_deploy() {
        let (url, server) = serve_once("200 OK", "{}").await;
        let client = DeployClient::new(&url).unwrap();

        client.deploy(&request("token", false)).await.unwrap();

        let received = server.await.unwrap();
        assert!(received.starts_with("POST /image/deploy HTTP/1.1"));
        assert!(received.contains(r#""registry_token":"token""#));
        assert!(received.contains(r#""image_ports":[]"#));
    }

    #[tokio::test]
    async fn test_rejected_deploy_carries_body() {
        let (url, server) = serve_once("400 Bad Request", r#"{"error":"bad request"}"#).await;
        let client = DeployClient::new(&url).unwrap();

        let err = client.deploy(&request("token", true)).await.unwrap_err();
        match err {
            DeployError::Rejected { status, body } => {
                assert_eq!(status, 400);
                assert_eq!(body, r#"{"error":"bad request"}"#);
            }
            other => panic!("unexpected error: {}", other),
        }

        let received = server.await.unwrap();
        assert!(received.starts_with("POST /image/deploy-byoc HTTP/1.1"));
    }

    #[tokio::test]
    async fn test_unreachable_api() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = DeployClient::new(&format!("http://{}", addr)).unwrap();
        let err = client.deploy(&request("token", false)).await.unwrap_err();
        assert!(matches!(err, DeployError::NoResponse { ref method, .. } if method == "POST"));
    }
}
