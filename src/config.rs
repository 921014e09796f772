pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000";

pub const ENV_API_BASE_URL: &str = "SHOWROOM_API_BASE_URL";
pub const ENV_FAKE_BACKEND: &str = "SHOWROOM_FAKE_BACKEND";

#[derive(Debug, Clone)]
pub struct Config {
    pub api_base_url: String,
    pub use_fake_backend: bool,
    pub logger_timezone: chrono::FixedOffset,
    pub window_size: [f32; 2],
    pub accepted_image_types: Vec<&'static str>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            use_fake_backend: false,
            logger_timezone: local_offset(),
            window_size: [1200.0, 800.0],
            accepted_image_types: vec!["image/jpeg", "image/png", "image/gif"],
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(url) = lookup(ENV_API_BASE_URL) {
            let url = url.trim().trim_end_matches('/');
            if !url.is_empty() {
                config.api_base_url = url.to_string();
            }
        }

        if let Some(flag) = lookup(ENV_FAKE_BACKEND) {
            config.use_fake_backend = matches!(
                flag.trim().to_lowercase().as_str(),
                "1" | "true" | "yes" | "on"
            );
        }

        config
    }

    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.api_base_url, path.trim_start_matches('/'))
    }
}

fn local_offset() -> chrono::FixedOffset {
    *chrono::Local::now().offset()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn defaults_to_loopback() {
        let config = Config::from_lookup(lookup(&[]));
        assert_eq!(config.api_base_url, "http://localhost:8000");
        assert!(!config.use_fake_backend);
        assert_eq!(
            config.endpoint("/api/getmodels"),
            "http://localhost:8000/api/getmodels"
        );
    }

    #[test]
    fn reads_base_url_and_trims_slash() {
        let config = Config::from_lookup(lookup(&[(ENV_API_BASE_URL, "https://models.example/")]));
        assert_eq!(
            config.endpoint("api/predict"),
            "https://models.example/api/predict"
        );
    }

    #[test]
    fn blank_base_url_keeps_default() {
        let config = Config::from_lookup(lookup(&[(ENV_API_BASE_URL, "  ")]));
        assert_eq!(config.api_base_url, DEFAULT_API_BASE_URL);
    }

    #[test]
    fn fake_backend_flag() {
        assert!(Config::from_lookup(lookup(&[(ENV_FAKE_BACKEND, "TRUE")])).use_fake_backend);
        assert!(Config::from_lookup(lookup(&[(ENV_FAKE_BACKEND, "1")])).use_fake_backend);
        assert!(!Config::from_lookup(lookup(&[(ENV_FAKE_BACKEND, "0")])).use_fake_backend);
    }
}
