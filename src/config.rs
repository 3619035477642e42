use std::path::PathBuf;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub lastfm: LastFmConfig,
    #[serde(default)]
    pub tag: TagConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct LastFmConfig {
    /// API 키 풀. 클라이언트가 생성 시 하나를 골라 사용한다.
    #[serde(default)]
    pub api_keys: Vec<String>,
}

impl LastFmConfig {
    pub fn is_configured(&self) -> bool {
        self.api_keys.iter().any(|key| !key.is_empty())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct TagConfig {
    /// 앨범 내 위치 대신 처리 순번을 트랙 번호로 기록할지 여부.
    #[serde(default)]
    pub order_number_in_tag: bool,
}

pub fn config_path() -> PathBuf {
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    PathBuf::from(home)
        .join(".config")
        .join("tagfm")
        .join("config.toml")
}

pub fn load_config() -> Config {
    let path = config_path();
    if !path.exists() {
        return Config::default();
    }
    match std::fs::read_to_string(&path) {
        Ok(content) => toml::from_str(&content).unwrap_or_default(),
        Err(_) => Config::default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_config() {
        let content = r#"
            [lastfm]
            api_keys = ["abc", "def"]

            [tag]
            order_number_in_tag = true
        "#;
        let config: Config = toml::from_str(content).expect("설정 파싱 실패");
        assert_eq!(config.lastfm.api_keys, vec!["abc", "def"]);
        assert!(config.lastfm.is_configured());
        assert!(config.tag.order_number_in_tag);
    }

    #[test]
    fn test_empty_config_defaults() {
        let config: Config = toml::from_str("").expect("설정 파싱 실패");
        assert!(!config.lastfm.is_configured());
        assert!(!config.tag.order_number_in_tag);
    }
}
