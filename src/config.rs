use clap::Parser;
use std::time::Duration;
use url::Url;

pub const DEFAULT_STORE_URL: &str = "https://67db1e961fd9e43fe473a653.mockapi.io/api";

#[derive(Debug, Clone, Parser)]
#[command(name = "users-crud", about = "Web front-end for a remote users API")]
pub struct Config {
    /// Address the web front-end listens on.
    #[arg(long, env = "USERS_CRUD_HTTP_ADDR", default_value = "0.0.0.0:3000")]
    pub http_addr: String,

    /// Base URL of the remote store; users live under `<base>/users`.
    #[arg(long, env = "USERS_CRUD_STORE_URL", default_value = DEFAULT_STORE_URL)]
    pub store_url: Url,

    #[arg(long, env = "USERS_CRUD_STORE_TIMEOUT_SECS", default_value_t = 10)]
    pub store_timeout_secs: u64,
}

impl Config {
    pub fn store_timeout(&self) -> Duration {
        Duration::from_secs(self.store_timeout_secs.max(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = Config::try_parse_from(["users-crud"]).unwrap();
        assert_eq!(config.http_addr, "0.0.0.0:3000");
        assert_eq!(config.store_url.as_str(), DEFAULT_STORE_URL);
        assert_eq!(config.store_timeout(), Duration::from_secs(10));
    }

    #[test]
    fn flags_override() {
        let config = Config::try_parse_from([
            "users-crud",
            "--http-addr",
            "127.0.0.1:8080",
            "--store-url",
            "http://localhost:4000/api",
            "--store-timeout-secs",
            "0",
        ])
        .unwrap();
        assert_eq!(config.http_addr, "127.0.0.1:8080");
        assert_eq!(config.store_url.host_str(), Some("localhost"));
        assert_eq!(config.store_timeout(), Duration::from_secs(1));
    }

    #[test]
    fn rejects_bad_url() {
        assert!(Config::try_parse_from(["users-crud", "--store-url", "not a url"]).is_err());
    }
}
