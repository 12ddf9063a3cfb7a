//! Client IP and User-Agent extraction.

use std::convert::Infallible;
use std::net::SocketAddr;

use axum::extract::{ConnectInfo, FromRequestParts};
use axum::http::HeaderMap;
use axum::http::header::USER_AGENT;
use axum::http::request::Parts;

use lexdesk_auth::ClientInfo;

/// Client metadata for a new session.
///
/// The IP comes from the first `X-Forwarded-For` hop, falling back to the
/// socket peer address.
#[derive(Debug, Clone, Default)]
pub struct ClientMeta(pub ClientInfo);

impl ClientMeta {
    /// Consumes the extractor.
    pub fn into_inner(self) -> ClientInfo {
        self.0
    }
}

fn forwarded_ip(headers: &HeaderMap) -> Option<String> {
    headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|ip| !ip.is_empty())
        .map(String::from)
}

impl<S> FromRequestParts<S> for ClientMeta
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let ip_address = forwarded_ip(&parts.headers).or_else(|| {
            parts
                .extensions
                .get::<ConnectInfo<SocketAddr>>()
                .map(|ConnectInfo(addr)| addr.ip().to_string())
        });

        let user_agent = parts
            .headers
            .get(USER_AGENT)
            .and_then(|v| v.to_str().ok())
            .map(String::from);

        Ok(ClientMeta(ClientInfo::new(ip_address, user_agent)))
    }
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;

    use super::*;

    #[test]
    fn test_first_forwarded_hop_wins() {
        let mut headers = HeaderMap::new();
        headers.insert(
            "x-forwarded-for",
            HeaderValue::from_static("203.0.113.9, 10.0.0.1"),
        );
        assert_eq!(forwarded_ip(&headers).as_deref(), Some("203.0.113.9"));
    }

    #[test]
    fn test_missing_forwarded_header() {
        assert_eq!(forwarded_ip(&HeaderMap::new()), None);
    }
}
