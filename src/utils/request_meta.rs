use std::convert::Infallible;
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;

use axum::{
    async_trait,
    body::Body,
    extract::{ConnectInfo, FromRequestParts, State},
    http::{header, request::Parts, HeaderMap, Request},
    middleware::Next,
    response::Response,
};

/// Client address and user agent for the current request.
#[derive(Debug, Clone, Default)]
pub struct ClientInfo {
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
}

/// Peers whose `x-forwarded-for` / `x-real-ip` headers are believed.
#[derive(Debug, Clone, Default)]
pub struct TrustedProxies(Arc<Vec<IpAddr>>);

impl TrustedProxies {
    pub fn new(proxies: Vec<IpAddr>) -> Self {
        Self(Arc::new(proxies))
    }

    pub fn contains(&self, ip: IpAddr) -> bool {
        self.0.contains(&ip)
    }
}

impl ClientInfo {
    /// Uses the forwarded address only when the socket peer is a trusted proxy;
    /// otherwise the peer address itself identifies the client.
    pub fn resolve(headers: &HeaderMap, peer: Option<IpAddr>, trusted: &TrustedProxies) -> Self {
        let user_agent = headers
            .get(header::USER_AGENT)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.chars().take(512).collect::<String>());

        let ip_address = match peer {
            Some(peer) if trusted.contains(peer) => {
                forwarded_address(headers).unwrap_or_else(|| peer.to_string())
            }
            Some(peer) => peer.to_string(),
            None => return Self { ip_address: None, user_agent },
        };

        Self {
            ip_address: Some(ip_address),
            user_agent,
        }
    }

    pub fn rate_key(&self) -> String {
        self.ip_address.clone().unwrap_or_else(|| "anonymous".to_string())
    }
}

fn forwarded_address(headers: &HeaderMap) -> Option<String> {
    let forwarded = headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|v| !v.is_empty());
    let real_ip = headers
        .get("x-real-ip")
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty());
    forwarded
        .or(real_ip)
        .and_then(|raw| raw.parse::<IpAddr>().ok())
        .map(|ip| ip.to_string())
}

fn peer_address(extensions: &axum::http::Extensions) -> Option<IpAddr> {
    extensions
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip())
}

/// Resolves the client once per request and stores it in the extensions.
pub async fn client_info_middleware(
    State(trusted): State<TrustedProxies>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    let client = ClientInfo::resolve(req.headers(), peer_address(req.extensions()), &trusted);
    req.extensions_mut().insert(client);
    next.run(req).await
}

#[async_trait]
impl<S> FromRequestParts<S> for ClientInfo
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        if let Some(client) = parts.extensions.get::<ClientInfo>() {
            return Ok(client.clone());
        }
        Ok(Self::resolve(
            &parts.headers,
            peer_address(&parts.extensions),
            &TrustedProxies::default(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn proxied_headers() -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert("x-forwarded-for", HeaderValue::from_static("201.1.2.3, 10.0.0.1"));
        headers.insert("x-real-ip", HeaderValue::from_static("10.0.0.9"));
        headers.insert(header::USER_AGENT, HeaderValue::from_static("Mozilla/5.0"));
        headers
    }

    #[test]
    fn trusted_proxy_forwards_first_address() {
        let proxy: IpAddr = "10.0.0.1".parse().unwrap();
        let trusted = TrustedProxies::new(vec![proxy]);
        let info = ClientInfo::resolve(&proxied_headers(), Some(proxy), &trusted);
        assert_eq!(info.ip_address.as_deref(), Some("201.1.2.3"));
        assert_eq!(info.user_agent.as_deref(), Some("Mozilla/5.0"));
    }

    #[test]
    fn untrusted_peer_cannot_spoof_its_address() {
        let peer: IpAddr = "198.51.100.20".parse().unwrap();
        let info = ClientInfo::resolve(&proxied_headers(), Some(peer), &TrustedProxies::default());
        assert_eq!(info.ip_address.as_deref(), Some("198.51.100.20"));
    }

    #[test]
    fn trusted_proxy_without_headers_falls_back_to_peer() {
        let proxy: IpAddr = "10.0.0.1".parse().unwrap();
        let trusted = TrustedProxies::new(vec![proxy]);
        let mut headers = HeaderMap::new();
        headers.insert("x-forwarded-for", HeaderValue::from_static("not-an-ip"));
        let info = ClientInfo::resolve(&headers, Some(proxy), &trusted);
        assert_eq!(info.ip_address.as_deref(), Some("10.0.0.1"));
    }

    #[test]
    fn unknown_peer_yields_anonymous_key() {
        let info = ClientInfo::resolve(&proxied_headers(), None, &TrustedProxies::default());
        assert!(info.ip_address.is_none());
        assert_eq!(info.rate_key(), "anonymous");
    }
}
