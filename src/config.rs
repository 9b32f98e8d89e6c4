//! Portal Configuration
//!
//! Deployment-fixed settings read from environment variables: where the
//! portal binds, where each embedded console lives, and where the identity
//! provider's session endpoints are. Poll timing is deliberately not
//! configurable; those are fixed constants in [`crate::auth::poller`].

use crate::console::ConsoleKind;
use serde::{Deserialize, Serialize};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};

/// Portal server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortalConfig {
    /// Bind address (default: 127.0.0.1)
    pub bind_addr: IpAddr,
    /// Port number (default: 8080)
    pub port: u16,
    /// Allowed CORS origins for the browser shell
    pub cors_origins: Vec<String>,
    /// Enable request logging
    pub log_requests: bool,

    /// Monitoring dashboard base URL
    pub monitoring_url: String,
    /// Object-storage console base URL
    pub object_storage_url: String,
    /// Database-admin console base URL
    pub database_admin_url: String,
    /// Tracing UI base URL
    pub tracing_url: String,
    /// Identity-admin console base URL
    pub identity_admin_url: String,

    /// Identity provider session-check endpoint
    pub identity_session_url: String,
    /// Identity provider logout endpoint
    pub identity_logout_url: String,

    /// Where to send the user when no intended route is stored
    pub default_destination: String,
}

impl Default for PortalConfig {
    fn default() -> Self {
        Self {
            bind_addr: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: 8080,
            cors_origins: vec![
                "http://localhost:8080".to_string(),
                "http://127.0.0.1:8080".to_string(),
            ],
            log_requests: true,
            monitoring_url: "http://127.0.0.1:3000/".to_string(),
            object_storage_url: "http://127.0.0.1:9001/".to_string(),
            database_admin_url: "http://127.0.0.1:5050/".to_string(),
            tracing_url: "http://127.0.0.1:16686/".to_string(),
            identity_admin_url: "http://127.0.0.1:8180/admin/".to_string(),
            identity_session_url: "http://127.0.0.1:8180/realms/portal/protocol/openid-connect/userinfo"
                .to_string(),
            identity_logout_url: "http://127.0.0.1:8180/realms/portal/protocol/openid-connect/logout"
                .to_string(),
            default_destination: "/home".to_string(),
        }
    }
}

impl PortalConfig {
    /// Create config from environment variables
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(addr) = std::env::var("PORTAL_BIND_ADDR") {
            if let Ok(parsed) = addr.parse() {
                config.bind_addr = parsed;
            }
        }

        if let Ok(port) = std::env::var("PORTAL_PORT") {
            if let Ok(parsed) = port.parse() {
                config.port = parsed;
            }
        }

        if let Ok(origins) = std::env::var("PORTAL_CORS_ORIGINS") {
            let parsed: Vec<String> = origins
                .split(',')
                .map(|o| o.trim().to_string())
                .filter(|o| !o.is_empty())
                .collect();
            if !parsed.is_empty() {
                config.cors_origins = parsed;
            }
        }

        if let Ok(val) = std::env::var("PORTAL_LOG_REQUESTS") {
            config.log_requests = val == "true" || val == "1";
        }

        if let Ok(url) = std::env::var("PORTAL_MONITORING_URL") {
            config.monitoring_url = url;
        }
        if let Ok(url) = std::env::var("PORTAL_OBJECT_STORAGE_URL") {
            config.object_storage_url = url;
        }
        if let Ok(url) = std::env::var("PORTAL_DATABASE_ADMIN_URL") {
            config.database_admin_url = url;
        }
        if let Ok(url) = std::env::var("PORTAL_TRACING_URL") {
            config.tracing_url = url;
        }
        if let Ok(url) = std::env::var("PORTAL_IDENTITY_ADMIN_URL") {
            config.identity_admin_url = url;
        }
        if let Ok(url) = std::env::var("PORTAL_IDENTITY_SESSION_URL") {
            config.identity_session_url = url;
        }
        if let Ok(url) = std::env::var("PORTAL_IDENTITY_LOGOUT_URL") {
            config.identity_logout_url = url;
        }
        if let Ok(path) = std::env::var("PORTAL_DEFAULT_DESTINATION") {
            config.default_destination = path;
        }

        if !config.is_localhost() {
            tracing::warn!(
                "Portal binding to {} - ensure an authenticating proxy sits in front",
                config.bind_addr
            );
        }

        config
    }

    /// Base URL of one embedded console
    pub fn console_url(&self, kind: ConsoleKind) -> &str {
        match kind {
            ConsoleKind::Monitoring => &self.monitoring_url,
            ConsoleKind::ObjectStorage => &self.object_storage_url,
            ConsoleKind::DatabaseAdmin => &self.database_admin_url,
            ConsoleKind::Tracing => &self.tracing_url,
            ConsoleKind::IdentityAdmin => &self.identity_admin_url,
        }
    }

    /// Check if bound to localhost only
    pub fn is_localhost(&self) -> bool {
        match self.bind_addr {
            IpAddr::V4(addr) => addr.is_loopback(),
            IpAddr::V6(addr) => addr.is_loopback(),
        }
    }

    /// Get the socket address
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind_addr, self.port)
    }

    /// Get the base URL for this server
    pub fn base_url(&self) -> String {
        format!("http://{}:{}", self.bind_addr, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_localhost() {
        let config = PortalConfig::default();
        assert!(config.is_localhost());
        assert_eq!(config.port, 8080);
    }

    #[test]
    fn test_socket_addr() {
        let config = PortalConfig::default();
        let addr = config.socket_addr();
        assert_eq!(addr.port(), 8080);
        assert!(addr.ip().is_loopback());
    }

    #[test]
    fn test_every_console_has_a_url() {
        let config = PortalConfig::default();
        for kind in ConsoleKind::ALL {
            assert!(!config.console_url(kind).is_empty());
        }
    }

    #[test]
    fn test_default_destination() {
        let config = PortalConfig::default();
        assert_eq!(config.default_destination, "/home");
    }
}
