use serde::{Deserialize, Serialize};
use url::Url;

pub const DEFAULT_SERVER_URL: &str = "http://localhost:5002";
pub const ENV_TTS_SERVER_URL: &str = "TTS_SERVER_URL";
pub const ENV_TTS_SPEAKER_ID: &str = "TTS_SPEAKER_ID";
pub const ENV_TTS_STYLE_WAV: &str = "TTS_STYLE_WAV";

/// Identifiers of the surface elements the session reads from and writes to.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ElementIds {
    pub text: String,
    pub speaker_id: String,
    pub style_wav: String,
    pub submit: String,
    pub message: String,
    pub history: String,
}

impl Default for ElementIds {
    fn default() -> Self {
        Self {
            text: "text".to_owned(),
            speaker_id: "speaker_id".to_owned(),
            style_wav: "style_wav".to_owned(),
            submit: "speak-button".to_owned(),
            message: "message".to_owned(),
            history: "results-table".to_owned(),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ServerUrl(Url);

impl ServerUrl {
    pub fn parse(value: &str) -> Result<Self, ConfigError> {
        let url = Url::parse(value.trim()).map_err(ConfigError::InvalidServerUrl)?;
        match url.scheme() {
            "http" | "https" => Ok(Self(url)),
            other => Err(ConfigError::UnsupportedScheme(other.to_owned())),
        }
    }

    pub fn as_url(&self) -> &Url {
        &self.0
    }
}

impl Default for ServerUrl {
    fn default() -> Self {
        Self(Url::parse(DEFAULT_SERVER_URL).expect("DEFAULT_SERVER_URL is a valid url"))
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ClientConfig {
    pub server_url: ServerUrl,
    pub ids: ElementIds,
    pub default_speaker_id: Option<String>,
    pub default_style_wav: Option<String>,
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid server url: {0}")]
    InvalidServerUrl(url::ParseError),
    #[error("server url scheme must be http or https, got {0:?}")]
    UnsupportedScheme(String),
}

pub trait Env {
    fn var(&self, key: &str) -> Option<String>;
}

#[derive(Clone, Debug, Default)]
pub struct StdEnv;

impl Env for StdEnv {
    fn var(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

#[derive(Clone, Debug, Default)]
pub struct MapEnv {
    vars: std::collections::BTreeMap<String, String>,
}

impl MapEnv {
    pub fn with_var(mut self, key: &str, value: &str) -> Self {
        self.vars.insert(key.to_owned(), value.to_owned());
        self
    }
}

impl Env for MapEnv {
    fn var(&self, key: &str) -> Option<String> {
        self.vars.get(key).cloned()
    }
}

pub fn resolve_server_url(
    cli_value: Option<String>,
    env: &impl Env,
) -> Result<ServerUrl, ConfigError> {
    let raw = resolve_string_with_default(cli_value, ENV_TTS_SERVER_URL, env, DEFAULT_SERVER_URL);
    ServerUrl::parse(&raw)
}

pub fn resolve_string_with_default(
    cli_value: Option<String>,
    env_key: &str,
    env: &impl Env,
    default: &str,
) -> String {
    match cli_value {
        Some(v) => v,
        None => env.var(env_key).unwrap_or_else(|| default.to_owned()),
    }
}

pub fn resolve_optional_string(
    cli_value: Option<String>,
    env_key: &str,
    env: &impl Env,
) -> Option<String> {
    match cli_value {
        Some(v) => Some(v),
        None => env.var(env_key),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_url_cli_takes_precedence_over_env() {
        let env = MapEnv::default().with_var(ENV_TTS_SERVER_URL, "http://env:5002");
        let url = resolve_server_url(Some("https://cli.example".to_owned()), &env)
            .expect("valid url");
        assert_eq!(url.as_url().host_str(), Some("cli.example"));
    }

    #[test]
    fn server_url_env_used_when_cli_missing() {
        let env = MapEnv::default().with_var(ENV_TTS_SERVER_URL, "http://env:5002");
        let url = resolve_server_url(None, &env).expect("valid url");
        assert_eq!(url.as_url().host_str(), Some("env"));
        assert_eq!(url.as_url().port(), Some(5002));
    }

    #[test]
    fn server_url_defaults_to_localhost() {
        let url = resolve_server_url(None, &MapEnv::default()).expect("valid url");
        assert_eq!(url, ServerUrl::default());
        assert_eq!(url.as_url().as_str(), "http://localhost:5002/");
    }

    #[test]
    fn server_url_rejects_non_http_schemes() {
        let err = ServerUrl::parse("ftp://example.com").unwrap_err();
        assert_eq!(err, ConfigError::UnsupportedScheme("ftp".to_owned()));
    }

    #[test]
    fn server_url_rejects_garbage() {
        assert!(matches!(
            ServerUrl::parse("not a url"),
            Err(ConfigError::InvalidServerUrl(_))
        ));
    }

    #[test]
    fn optional_string_falls_back_to_env() {
        let env = MapEnv::default().with_var(ENV_TTS_SPEAKER_ID, "p225");
        assert_eq!(
            resolve_optional_string(None, ENV_TTS_SPEAKER_ID, &env),
            Some("p225".to_owned())
        );
        assert_eq!(resolve_optional_string(None, ENV_TTS_STYLE_WAV, &env), None);
    }

    #[test]
    fn resolve_string_with_default_default_used_when_both_missing() {
        let env = MapEnv::default();
        let v = resolve_string_with_default(None, ENV_TTS_SERVER_URL, &env, "def");
        assert_eq!(v, "def");
    }
}
