use serde_derive::Deserialize;

#[derive(Deserialize, Debug, Default, Clone)]
pub struct AppConfig {
    #[serde(default)]
    pub listen: ListenConfig,
    #[serde(default)]
    pub dispatch: DispatchConfig,
}

#[derive(Deserialize, Debug, Default, Clone)]
pub struct ListenConfig {
    pub host: Option<String>,
    pub port: Option<u16>,
}

#[derive(Deserialize, Debug, Default, Clone)]
pub struct DispatchConfig {
    pub shell: Option<String>,
    pub default_interval_seconds: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config() {
        let config_str = r#"
            [listen]
            host = "127.0.0.1"
            port = 9300

            [dispatch]
            shell = "/bin/bash"
            default_interval_seconds = 60
        "#;
        let config: AppConfig = toml::de::from_str(config_str).unwrap();
        assert!(config.listen.host.as_deref() == Some("127.0.0.1"));
        assert!(config.listen.port == Some(9300));
        assert!(config.dispatch.shell.as_deref() == Some("/bin/bash"));
        assert!(config.dispatch.default_interval_seconds == Some(60));
    }

    #[test]
    fn test_empty_config() {
        let config: AppConfig = toml::de::from_str("").unwrap();
        assert!(config.listen.host.is_none());
        assert!(config.listen.port.is_none());
        assert!(config.dispatch.default_interval_seconds.is_none());
    }
}
