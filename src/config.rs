use std::net::SocketAddr;

/// Service configuration, read once at startup from environment variables
/// and passed explicitly into the layers that need it.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Interface to bind (from ASTROCHART_HOST).
    pub host: String,
    /// Port for the HTTP API (from ASTROCHART_PORT).
    pub port: u16,
}

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 3000;

impl AppConfig {
    /// Load configuration from environment variables, falling back to the
    /// defaults for anything unset or unparseable.
    pub fn from_env() -> Self {
        let host = std::env::var("ASTROCHART_HOST").unwrap_or_else(|_| DEFAULT_HOST.to_string());
        let port = std::env::var("ASTROCHART_PORT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_PORT);

        Self { host, port }
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::from_env()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bind_addr_joins_host_and_port() {
        let config = AppConfig {
            host: "0.0.0.0".to_string(),
            port: 8080,
        };
        assert_eq!(config.bind_addr(), "0.0.0.0:8080");
    }

    #[test]
    fn bind_addr_parses_as_socket_addr() {
        let config = AppConfig {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
        };
        assert!(config.bind_addr().parse::<SocketAddr>().is_ok());
    }
}
