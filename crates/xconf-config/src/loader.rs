//! Configuration file loading.

use std::{fs, path::Path};

use tracing::debug;

use crate::error::ConfigError;
use crate::merge::OverrideOptions;
use crate::Config;

/// Load one document; the format follows the file extension.
pub fn load_config(path: impl AsRef<Path>) -> Result<Config, ConfigError> {
    let path = path.as_ref();
    let data = fs::read_to_string(path)?;
    match path.extension().and_then(|s| s.to_str()).unwrap_or("") {
        "json" | "jsonc" => {
            let stripped = json_comments::StripComments::new(data.as_bytes());
            Ok(serde_json::from_reader(stripped)?)
        }
        "yaml" | "yml" => Ok(serde_yaml::from_str(&data)?),
        "toml" => Ok(toml::from_str(&data)?),
        _ => Err(ConfigError::UnsupportedFormat),
    }
}

/// Load `paths[0]` and override it with each following file in order.
pub fn load_configs<P: AsRef<Path>>(
    paths: &[P],
    options: &OverrideOptions,
) -> Result<Config, ConfigError> {
    let Some((first, rest)) = paths.split_first() else {
        return Err(ConfigError::Validation("no config file given".into()));
    };
    let mut config = load_file(first.as_ref())?;
    for path in rest {
        let path = path.as_ref();
        let other = load_file(path)?;
        config.override_with(other, &path.display().to_string(), options);
    }
    Ok(config)
}

fn load_file(path: &Path) -> Result<Config, ConfigError> {
    debug!(path = %path.display(), "loading config");
    load_config(path).map_err(|e| e.context(format!("failed to load {}", path.display())))
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    fn write_temp(suffix: &str, body: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
        file.write_all(body.as_bytes()).unwrap();
        file
    }

    #[test]
    fn jsonc_comments_are_stripped() {
        let file = write_temp(
            ".jsonc",
            r#"{
                // local socks proxy
                "inbounds": [{"protocol": "socks", "port": 1080}] /* trailing */
            }"#,
        );
        let cfg = load_config(file.path()).unwrap();
        assert_eq!(cfg.inbounds.len(), 1);
    }

    #[test]
    fn unknown_extension() {
        let file = write_temp(".ini", "port = 1");
        assert!(matches!(
            load_config(file.path()),
            Err(ConfigError::UnsupportedFormat)
        ));
    }

    #[test]
    fn empty_path_list() {
        let paths: [&str; 0] = [];
        let err = load_configs(&paths, &OverrideOptions::default()).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
    }
}
