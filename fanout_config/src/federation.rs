use serde::Deserialize;

const fn default_federation_enabled() -> bool { true }

#[derive(Clone, Deserialize)]
pub struct FederationConfig {
    // Disables delivery of retractions to remote servers
    #[serde(default = "default_federation_enabled")]
    pub enabled: bool,
}

impl Default for FederationConfig {
    fn default() -> Self {
        Self {
            enabled: default_federation_enabled(),
        }
    }
}
