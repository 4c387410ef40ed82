//! Remote delivery of log records

use std::fmt;
use std::time::Duration;

use ureq::Agent;

use super::LogRecord;
use crate::config::LogSinkConfig;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    Transport(String),
    /// Non-2xx answer from the collector
    Status(u16),
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Transport(msg) => write!(f, "request failed: {}", msg),
            Self::Status(code) => write!(f, "collector answered with status {}", code),
        }
    }
}

impl std::error::Error for TransportError {}

pub trait LogTransport: Send + Sync {
    fn send(&self, record: &LogRecord) -> Result<(), TransportError>;

    fn name(&self) -> &'static str;
}

/// `POST {endpoint}` with the record as JSON body
pub struct HttpLogTransport {
    endpoint: String,
    token: Option<String>,
    agent: Agent,
}

impl HttpLogTransport {
    pub fn new(config: &LogSinkConfig) -> Self {
        let agent = Agent::config_builder()
            .timeout_global(Some(Duration::from_secs(config.timeout_secs.max(1))))
            .build()
            .into();

        Self {
            endpoint: config.endpoint.clone(),
            token: config
                .token
                .as_deref()
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .map(String::from),
            agent,
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl LogTransport for HttpLogTransport {
    fn send(&self, record: &LogRecord) -> Result<(), TransportError> {
        let mut request = self.agent.post(&self.endpoint);
        if let Some(ref token) = self.token {
            request = request.header("Authorization", format!("Bearer {}", token));
        }

        request.send_json(record).map_err(|e| match e {
            ureq::Error::StatusCode(code) => TransportError::Status(code),
            other => TransportError::Transport(other.to_string()),
        })?;
        Ok(())
    }

    fn name(&self) -> &'static str {
        "http"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::log_sink::{Level, Package, Stack};

    #[test]
    fn test_blank_token_is_ignored() {
        let config = LogSinkConfig {
            token: Some("   ".into()),
            ..Default::default()
        };
        let transport = HttpLogTransport::new(&config);
        assert!(transport.token.is_none());
        assert_eq!(transport.endpoint(), config.endpoint);
    }

    #[test]
    fn test_unreachable_collector_fails() {
        let config = LogSinkConfig {
            endpoint: "http://127.0.0.1:9/logs".into(),
            timeout_secs: 1,
            ..Default::default()
        };
        let record = LogRecord {
            stack: Stack::Backend,
            level: Level::Info,
            package: Package::Api,
            message: "hello".into(),
        };
        assert!(matches!(
            HttpLogTransport::new(&config).send(&record),
            Err(TransportError::Transport(_))
        ));
    }
}
