//! Optional external tracing export. Absent `LOGFIRE_TOKEN`, this is a
//! silent no-op so the pipeline runs the same in CI and in a laptop shell.

/// Reads `LOGFIRE_TOKEN` from the environment; present only so the rest of
/// the binary has one place to ask "is remote telemetry configured".
pub struct TelemetryConfig {
    pub token: Option<String>,
}

impl TelemetryConfig {
    pub fn from_env() -> Self {
        Self {
            token: std::env::var("LOGFIRE_TOKEN").ok(),
        }
    }

    /// Logs whether remote telemetry is active. There is no external
    /// exporter wired up in this crate, so a present token still only logs;
    /// it does not open a network connection.
    pub fn setup(&self) {
        match &self.token {
            Some(_) => tracing::info!("remote telemetry export enabled via LOGFIRE_TOKEN"),
            None => tracing::info!("LOGFIRE_TOKEN not set, remote telemetry export disabled"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_token_is_none() {
        std::env::remove_var("LOGFIRE_TOKEN");
        let config = TelemetryConfig::from_env();
        assert!(config.token.is_none());
    }
}
