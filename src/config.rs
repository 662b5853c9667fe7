use anyhow::Result;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct Config {
    pub service: ServiceConfig,
    pub audio: AudioSettings,
    pub analysis: AnalysisSettings,
    pub crm: CrmSettings,
}

#[derive(Debug, Deserialize)]
pub struct ServiceConfig {
    pub name: String,
    pub http: HttpConfig,
}

#[derive(Debug, Deserialize)]
pub struct HttpConfig {
    pub bind: String,
    pub port: u16,
}

#[derive(Debug, Deserialize)]
pub struct AudioSettings {
    pub sample_rate: u32,
    pub channels: u16,
    pub buffer_duration_ms: u64,
    /// When set, every recorded payload is archived here before upload
    pub recordings_path: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AnalysisSettings {
    pub base_url: String,
    pub request_timeout_secs: u64,
}

#[derive(Debug, Deserialize)]
pub struct CrmSettings {
    pub base_url: String,
}

impl Config {
    pub fn load(path: &str) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(path))
            .build()?;

        Ok(settings.try_deserialize()?)
    }
}
