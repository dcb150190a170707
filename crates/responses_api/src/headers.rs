use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE, USER_AGENT};

use crate::config::ResponsesApiConfig;
use crate::error::ResponsesApiError;

const JSON: &str = "application/json";

/// Headers sent with every `/responses` POST.
pub fn build_headers(config: &ResponsesApiConfig) -> Result<HeaderMap, ResponsesApiError> {
    let api_key = config.api_key.trim();
    if api_key.is_empty() {
        return Err(ResponsesApiError::MissingApiKey);
    }

    let mut bearer = HeaderValue::from_str(&format!("Bearer {api_key}")).map_err(|_| {
        ResponsesApiError::InvalidRequest("API key contains characters not allowed in a header".to_owned())
    })?;
    bearer.set_sensitive(true);

    let mut headers = HeaderMap::with_capacity(4);
    headers.insert(AUTHORIZATION, bearer);
    headers.insert(ACCEPT, HeaderValue::from_static(JSON));
    headers.insert(CONTENT_TYPE, HeaderValue::from_static(JSON));
    if let Ok(agent) = HeaderValue::from_str(&user_agent()) {
        headers.insert(USER_AGENT, agent);
    }
    Ok(headers)
}

/// `kit/<version> (<os>; <arch>)`
pub fn user_agent() -> String {
    format!(
        "kit/{} ({}; {})",
        env!("CARGO_PKG_VERSION"),
        std::env::consts::OS,
        std::env::consts::ARCH
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_key_is_rejected() {
        let error = build_headers(&ResponsesApiConfig::new("   ")).expect_err("blank key");
        assert!(matches!(error, ResponsesApiError::MissingApiKey));
    }

    #[test]
    fn key_is_trimmed_into_a_sensitive_bearer() {
        let headers = build_headers(&ResponsesApiConfig::new(" sk-test ")).expect("headers");

        let auth = &headers[AUTHORIZATION];
        assert_eq!(auth, "Bearer sk-test");
        assert!(auth.is_sensitive());
        assert_eq!(headers[CONTENT_TYPE], JSON);
        assert!(headers[USER_AGENT]
            .to_str()
            .expect("ascii agent")
            .starts_with("kit/"));
    }

    #[test]
    fn key_with_newline_is_an_invalid_request() {
        let error = build_headers(&ResponsesApiConfig::new("sk-\ntest")).expect_err("bad key");
        assert!(matches!(error, ResponsesApiError::InvalidRequest(_)));
    }
}
