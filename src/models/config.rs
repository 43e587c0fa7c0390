//! Configuration model loaded from external sources.

use serde::Deserialize;

fn default_api_timeout_secs() -> u64 {
    10
}

fn default_api_max_list_pages() -> usize {
    1000
}

fn default_clinic_name() -> String {
    "Consultorio Odontológico".to_string()
}

fn default_items_per_page() -> usize {
    20
}

#[derive(Clone, Debug, Deserialize)]
/// Basic configuration shared across handlers.
pub struct ServerConfig {
    pub domain: String,
    pub address: String,
    pub port: u16,
    pub templates_dir: String,
    pub secret: String,
    /// Root of the clinic REST API, e.g. `http://localhost:8000/api`.
    pub api_base_url: String,
    #[serde(default = "default_api_timeout_secs")]
    pub api_timeout_secs: u64,
    /// Pages read from a paginated backend list before failing.
    #[serde(default = "default_api_max_list_pages")]
    pub api_max_list_pages: usize,
    #[serde(default = "default_clinic_name")]
    pub clinic_name: String,
    #[serde(default = "default_items_per_page")]
    pub items_per_page: usize,
    /// Fail odontogram computation on unknown treatments and surfaces.
    #[serde(default)]
    pub odontogram_strict: bool,
}
