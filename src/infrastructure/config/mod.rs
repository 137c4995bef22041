use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};

/// Service configuration. Defaults are overridden by `sheetpress.toml`,
/// which is in turn overridden by `SHEETPRESS_`-prefixed environment
/// variables.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub host: String,
    pub port: u16,
    /// Admission-control cap applied before the pipeline is invoked.
    pub max_upload_bytes: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            max_upload_bytes: 50 * 1024 * 1024,
        }
    }
}

impl Settings {
    pub fn load() -> Result<Self, figment::Error> {
        Figment::from(Serialized::defaults(Settings::default()))
            .merge(Toml::file("sheetpress.toml"))
            .merge(Env::prefixed("SHEETPRESS_"))
            .extract()
    }
}
