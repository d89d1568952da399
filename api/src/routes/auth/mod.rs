//! Authentication route handlers
//!
//! Account registration and e-mail confirmation, login, refresh token
//! rotation, logout, session management and password reset/change.

pub mod email;
pub mod login;
pub mod logout;
pub mod password;
pub mod refresh;
pub mod register;
pub mod sessions;

use std::net::SocketAddr;

use actix_web::{http::header::USER_AGENT, HttpRequest};

/// Client address, honouring `Forwarded`/`X-Forwarded-For`
pub(crate) fn client_ip(req: &HttpRequest) -> Option<String> {
    let info = req.connection_info();
    info.realip_remote_addr().map(|addr| {
        addr.parse::<SocketAddr>()
            .map(|socket| socket.ip().to_string())
            .unwrap_or_else(|_| addr.to_string())
    })
}

pub(crate) fn user_agent(req: &HttpRequest) -> Option<String> {
    req.headers()
        .get(USER_AGENT)
        .and_then(|value| value.to_str().ok())
        .map(|value| value.chars().take(512).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    #[test]
    fn test_client_ip_strips_port() {
        let req = TestRequest::default()
            .peer_addr("10.1.2.3:52811".parse().unwrap())
            .to_http_request();
        assert_eq!(client_ip(&req).as_deref(), Some("10.1.2.3"));
    }

    #[test]
    fn test_client_ip_prefers_forwarded_for() {
        let req = TestRequest::default()
            .insert_header(("x-forwarded-for", "203.0.113.9"))
            .peer_addr("10.1.2.3:52811".parse().unwrap())
            .to_http_request();
        assert_eq!(client_ip(&req).as_deref(), Some("203.0.113.9"));
    }

    #[test]
    fn test_user_agent() {
        let req = TestRequest::default()
            .insert_header((USER_AGENT, "Mozilla/5.0"))
            .to_http_request();
        assert_eq!(user_agent(&req).as_deref(), Some("Mozilla/5.0"));
        assert!(user_agent(&TestRequest::default().to_http_request()).is_none());
    }
}
