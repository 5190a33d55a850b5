use serde_derive::Deserialize;

#[derive(Deserialize, Debug, Clone)]
pub struct AppConfig {
    pub device_id: Option<String>,
    pub target: TargetConfig,
    pub report: ReportConfig,
    pub scan: Option<ScanConfig>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct TargetConfig {
    /// Advertised local name to search for, compared byte-for-byte.
    pub name: String,
}

#[derive(Deserialize, Debug, Clone)]
pub struct ReportConfig {
    pub host: String,
    pub port: Option<u16>,
    pub path: Option<String>,
    pub timeout_seconds: Option<u64>,
}

#[derive(Deserialize, Debug, Default, Clone)]
pub struct ScanConfig {
    pub sample_interval_ms: Option<u64>,
    pub scan_window_ms: Option<u64>,
    pub max_results: Option<usize>,
}
