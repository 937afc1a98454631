use config::{Config, ConfigError, File};
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone, Default)]
pub struct ReadmitConfig {
    #[serde(default)]
    pub model: ModelConfig,
    #[serde(default)]
    pub http: HttpConfig,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ModelConfig {
    /// Artifact format: "onnx" (default) or "linear".
    pub backend: String,
    /// Empty means the fixed default filename in the working directory.
    pub artifact_path: String,
    pub input_name: String,
    pub output_name: String,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            backend: "onnx".to_string(),
            artifact_path: String::new(),
            input_name: "float_input".to_string(),
            output_name: "probabilities".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct HttpConfig {
    pub host: String,
    pub port: u16,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8767,
        }
    }
}

impl ReadmitConfig {
    /// Load configuration, tolerating a missing file.
    ///
    /// Every field has a default; the model artifact stays the only
    /// load-or-halt input at startup.
    pub fn load(path: &str) -> Result<Self, ConfigError> {
        let s = Config::builder()
            .add_source(File::with_name(path).required(false))
            .build()?;
        s.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_yields_defaults() {
        let config = ReadmitConfig::load("/nonexistent/readmit.toml").expect("load");
        assert_eq!(config.model.backend, "onnx");
        assert_eq!(config.model.artifact_path, "");
        assert_eq!(config.model.input_name, "float_input");
        assert_eq!(config.model.output_name, "probabilities");
        assert_eq!(config.http.host, "127.0.0.1");
        assert_eq!(config.http.port, 8767);
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let dir = tempfile::tempdir().expect("tmpdir");
        let path = dir.path().join("readmit.toml");
        std::fs::write(&path, "[model]\nbackend = \"linear\"\n").expect("write");

        let config = ReadmitConfig::load(path.to_str().expect("utf-8 path")).expect("load");
        assert_eq!(config.model.backend, "linear");
        assert_eq!(config.model.input_name, "float_input");
        assert_eq!(config.http.port, 8767);
    }

    #[test]
    fn test_full_file_overrides() {
        let dir = tempfile::tempdir().expect("tmpdir");
        let path = dir.path().join("readmit.toml");
        std::fs::write(
            &path,
            r#"
[model]
backend = "onnx"
artifact_path = "~/models/readmission.onnx"
input_name = "input"
output_name = "output_probability"

[http]
host = "0.0.0.0"
port = 9000
"#,
        )
        .expect("write");

        let config = ReadmitConfig::load(path.to_str().expect("utf-8 path")).expect("load");
        assert_eq!(config.model.artifact_path, "~/models/readmission.onnx");
        assert_eq!(config.model.input_name, "input");
        assert_eq!(config.model.output_name, "output_probability");
        assert_eq!(config.http.host, "0.0.0.0");
        assert_eq!(config.http.port, 9000);
    }

    #[test]
    fn test_default_matches_missing_file() {
        let loaded = ReadmitConfig::load("/nonexistent/readmit.toml").expect("load");
        let default = ReadmitConfig::default();
        assert_eq!(loaded.model.backend, default.model.backend);
        assert_eq!(loaded.http.port, default.http.port);
    }
}
