use log::debug;
use serde::Deserialize;

/// Response of the checkout-session endpoint
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct CheckoutSession {
    #[serde(default)]
    pub url: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum BillingError {
    #[error("network error: {0}")]
    Network(String),
    #[error("invalid response: {0}")]
    InvalidResponse(String),
    #[error("cannot open {url}: {detail}")]
    Navigation { url: String, detail: String },
}

/// Creates billing checkout sessions
pub trait SessionClient: Send + Sync + 'static {
    fn create_session(&self) -> Result<CheckoutSession, BillingError>;
}

/// [`SessionClient`] that POSTs to an HTTP endpoint returning JSON
pub struct HttpSessionClient {
    endpoint: String,
    agent: ureq::Agent,
}

impl HttpSessionClient {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            agent: ureq::agent(),
        }
    }
}

impl SessionClient for HttpSessionClient {
    fn create_session(&self) -> Result<CheckoutSession, BillingError> {
        debug!("Creating checkout session at {}", self.endpoint);
        let resp = self
            .agent
            .post(&self.endpoint)
            .set("Accept", "application/json")
            .set("Content-Type", "application/json")
            .set("User-Agent", "docview")
            .send_string("{}")
            .map_err(|e| BillingError::Network(e.to_string()))?;

        let body = resp
            .into_string()
            .map_err(|e| BillingError::InvalidResponse(e.to_string()))?;

        parse_session(&body)
    }
}

/// Parse a checkout-session body; an empty or blank `url` counts as absent
pub fn parse_session(body: &str) -> Result<CheckoutSession, BillingError> {
    let mut session: CheckoutSession =
        serde_json::from_str(body).map_err(|e| BillingError::InvalidResponse(e.to_string()))?;
    if session.url.as_deref().is_some_and(|url| url.trim().is_empty()) {
        session.url = None;
    }
    Ok(session)
}

/// Sends the user somewhere outside the application
pub trait Navigator {
    fn navigate(&self, url: &str) -> Result<(), BillingError>;
}

/// Opens URLs in the system browser
#[derive(Clone, Copy, Debug, Default)]
pub struct BrowserNavigator;

impl Navigator for BrowserNavigator {
    fn navigate(&self, url: &str) -> Result<(), BillingError> {
        open::that(url).map_err(|e| BillingError::Navigation {
            url: url.to_string(),
            detail: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_url_field() {
        let session = parse_session(r#"{"url":"https://pay.test/c/1"}"#).unwrap();
        assert_eq!(session.url.as_deref(), Some("https://pay.test/c/1"));
    }

    #[test]
    fn missing_null_and_blank_url_are_absent() {
        for body in [r#"{}"#, r#"{"url":null}"#, r#"{"url":"  "}"#] {
            assert_eq!(parse_session(body).unwrap().url, None, "{body}");
        }
    }

    #[test]
    fn malformed_body_is_invalid_response() {
        assert!(matches!(
            parse_session("<html>"),
            Err(BillingError::InvalidResponse(_))
        ));
    }
}
