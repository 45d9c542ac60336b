use crate::error::AppError;
use std::time::Duration;

const USER_AGENT: &str = concat!("league_recap/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub status_text: String,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Plain GET. Non-2xx statuses come back as responses, only transport
/// failures are errors.
pub trait Transport: Send + Sync {
    fn get(&self, url: &str, headers: &[(&str, &str)]) -> Result<HttpResponse, AppError>;
}

pub struct UreqTransport {
    agent: ureq::Agent,
}

impl UreqTransport {
    pub fn new() -> Self {
        let agent = ureq::AgentBuilder::new()
            .user_agent(USER_AGENT)
            .timeout_connect(Duration::from_secs(10))
            .build();
        UreqTransport { agent }
    }
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for UreqTransport {
    fn get(&self, url: &str, headers: &[(&str, &str)]) -> Result<HttpResponse, AppError> {
        let mut request = self.agent.get(url);
        for (name, value) in headers {
            request = request.set(name, value);
        }

        match request.call() {
            Ok(resp) | Err(ureq::Error::Status(_, resp)) => into_response(resp),
            Err(e) => Err(AppError::HttpError(e.to_string())),
        }
    }
}

fn into_response(resp: ureq::Response) -> Result<HttpResponse, AppError> {
    let status = resp.status();
    let status_text = resp.status_text().to_string();
    let body = resp
        .into_string()
        .map_err(|e| AppError::HttpError(e.to_string()))?;

    Ok(HttpResponse {
        status,
        status_text,
        body,
    })
}
