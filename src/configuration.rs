use serde_aux::field_attributes::deserialize_number_from_string;

#[derive(serde::Deserialize, Clone)]
pub struct Settings {
    pub application: ApplicationSettings,
    pub api_keys: ApiKeySettings,
}

#[derive(serde::Deserialize, Clone)]
pub struct ApplicationSettings {
    pub host: String,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub port: u16,
}

#[derive(serde::Deserialize, Clone)]
pub struct ApiKeySettings {
    pub firecrawl: Option<String>,
}

pub fn get_configuration() -> Result<Settings, config::ConfigError> {
    let settings = config::Config::builder()
        .add_source(config::File::with_name("configuration"))
        .add_source(
            config::Environment::with_prefix("APP")
                .prefix_separator("_")
                .separator("__"),
        )
        .build()?;

    settings.try_deserialize::<Settings>()
}

impl Settings {
    /// Resolve the Firecrawl API key. The environment variable takes
    /// precedence over the configuration file; first non-empty wins.
    pub fn firecrawl_api_key(&self) -> Option<String> {
        first_non_empty(
            std::env::var("FIRECRAWL_API_KEY").ok(),
            self.api_keys.firecrawl.clone(),
        )
    }
}

fn first_non_empty(env_value: Option<String>, configured: Option<String>) -> Option<String> {
    env_value
        .filter(|key| !key.trim().is_empty())
        .or_else(|| configured.filter(|key| !key.trim().is_empty()))
}

#[cfg(test)]
mod tests {
    use crate::configuration::first_non_empty;

    #[test]
    fn env_value_wins_over_configured() {
        let key = first_non_empty(Some("env-key".to_string()), Some("file-key".to_string()));
        assert_eq!(key, Some("env-key".to_string()));
    }

    #[test]
    fn blank_env_value_falls_back_to_configured() {
        let key = first_non_empty(Some("   ".to_string()), Some("file-key".to_string()));
        assert_eq!(key, Some("file-key".to_string()));
    }

    #[test]
    fn absent_everywhere_is_none() {
        assert_eq!(first_non_empty(None, None), None);
        assert_eq!(first_non_empty(None, Some("".to_string())), None);
    }
}
