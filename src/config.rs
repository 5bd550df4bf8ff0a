use tracing::debug;

/// Contextual parameters stamped onto every normalized record.
#[derive(Clone, Debug)]
pub struct NormalizerConfig {
    pub zone_name: Option<String>,
    pub server_name: String,
}

impl NormalizerConfig {
    pub fn new(zone_name: Option<String>, server_name: impl Into<String>) -> Self {
        Self {
            zone_name,
            server_name: server_name.into(),
        }
    }

    /// Config whose server name is the local host's name.
    pub fn for_local_server(zone_name: Option<String>) -> Self {
        Self::new(zone_name, local_server_name())
    }

    /// Zone name used for FQDN derivation, `None` when unset or empty.
    pub fn zone(&self) -> Option<&str> {
        self.zone_name.as_deref().filter(|z| !z.is_empty())
    }

    pub fn server_name(&self) -> &str {
        &self.server_name
    }
}

/// Local host name, falling back to `COMPUTERNAME`, `HOSTNAME`, then `localhost`.
pub fn local_server_name() -> String {
    match hostname::get() {
        Ok(name) if !name.is_empty() => return name.to_string_lossy().into_owned(),
        Ok(_) => debug!("host name is empty, trying environment"),
        Err(err) => debug!("failed to read host name: {err}"),
    }

    ["COMPUTERNAME", "HOSTNAME"]
        .iter()
        .filter_map(|var| std::env::var(var).ok())
        .find(|name| !name.trim().is_empty())
        .unwrap_or_else(|| "localhost".to_string())
}
