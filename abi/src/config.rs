use crate::Error;
use serde::{Deserialize, Serialize};
use std::fs;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    pub db: DbConfig,
    pub server: ServerConfig,
    pub mail: MailConfig,
    pub admin: AdminConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DbConfig {
    /// sqlx connection url, e.g. `sqlite:reservations.db?mode=rwc`.
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MailConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    /// Sender address for confirmation mail.
    pub from: String,
    /// Operator copy of every confirmation.
    pub operator: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdminConfig {
    pub username: String,
    pub password: String,
}

fn default_max_connections() -> u32 {
    5
}

impl Config {
    pub fn load(path: impl AsRef<str>) -> Result<Self, Error> {
        let path = shellexpand::tilde(path.as_ref()).into_owned();
        let content =
            fs::read_to_string(&path).map_err(|_| Error::ConfigReadError(path.clone()))?;
        serde_yaml::from_str(&content).map_err(|_| Error::ConfigParseError(path))
    }
}

impl ServerConfig {
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn url(&self, https: bool) -> String {
        let scheme = if https { "https" } else { "http" };
        format!("{}://{}", scheme, self.addr())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_should_load_from_yaml() {
        let config = Config::load("../service/fixtures/config.yml").unwrap();
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.db.max_connections, 1);
        assert_eq!(config.admin.username, "admin");
        assert_eq!(config.server.url(false), "http://127.0.0.1:3000");
    }
}
