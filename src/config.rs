use crate::error::{KitReportError, Result};
use kit_report_common::DuplicateKeyPolicy;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};

pub const DEFAULT_CATALOG_FILE: &str = "Cadastro Kits.xlsx";
pub const DEFAULT_MATERIALS_FILE: &str = "Materias Kits.xlsx";
pub const DEFAULT_LOGO_URL: &str =
    "https://www.contrex.com.br/wp-content/themes/contrex_2019/images/logo_footer.png";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// キット台帳（Cadastro Kits）
    pub catalog_source: PathBuf,
    /// キット資材表（Materias Kits）
    pub materials_source: PathBuf,
    /// ロゴ取得元URL（None ならロゴなし）
    pub logo_source: Option<String>,
    /// ロゴのキャッシュ先（None ならユーザーキャッシュディレクトリ）
    pub logo_cache_path: Option<PathBuf>,
    pub duplicate_policy: DuplicateKeyPolicy,
    pub logo_timeout_seconds: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            catalog_source: PathBuf::from(DEFAULT_CATALOG_FILE),
            materials_source: PathBuf::from(DEFAULT_MATERIALS_FILE),
            logo_source: Some(DEFAULT_LOGO_URL.to_string()),
            logo_cache_path: None,
            duplicate_policy: DuplicateKeyPolicy::FirstWins,
            logo_timeout_seconds: 20,
        }
    }
}

/// コマンドラインからの上書き
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub catalog_source: Option<PathBuf>,
    pub materials_source: Option<PathBuf>,
    pub logo_source: Option<String>,
    pub logo_cache_path: Option<PathBuf>,
    pub no_logo: bool,
    pub strict_catalog: bool,
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// ファイルがなければ既定値
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| KitReportError::Config("diretório home não encontrado".into()))?;
        Ok(home.join(".config").join("kit-report").join("config.json"))
    }

    pub fn with_overrides(mut self, overrides: &ConfigOverrides) -> Self {
        if let Some(path) = &overrides.catalog_source {
            self.catalog_source = path.clone();
        }
        if let Some(path) = &overrides.materials_source {
            self.materials_source = path.clone();
        }
        if let Some(url) = &overrides.logo_source {
            self.logo_source = Some(url.clone());
        }
        if let Some(path) = &overrides.logo_cache_path {
            self.logo_cache_path = Some(path.clone());
        }
        if overrides.no_logo {
            self.logo_source = None;
        }
        if overrides.strict_catalog {
            self.duplicate_policy = DuplicateKeyPolicy::Reject;
        }
        self
    }

    /// ロゴのキャッシュ先（明示指定がなければURLから決定）
    pub fn resolved_logo_cache_path(&self) -> Option<PathBuf> {
        if let Some(path) = &self.logo_cache_path {
            return Some(path.clone());
        }
        let url = self.logo_source.as_deref()?;
        let cache_dir = dirs::cache_dir()?;
        Some(cache_dir.join("kit-report").join(logo_cache_file_name(url)))
    }
}

/// URLごとに異なるキャッシュファイル名
pub fn logo_cache_file_name(url: &str) -> String {
    let digest = hex::encode(Sha256::digest(url.as_bytes()));
    let extension = url
        .rsplit('/')
        .next()
        .and_then(|name| name.rsplit_once('.'))
        .map(|(_, ext)| ext.to_lowercase())
        .filter(|ext| matches!(ext.as_str(), "png" | "jpg" | "jpeg"))
        .unwrap_or_else(|| "img".to_string());
    format!("logo-{}.{}", &digest[..16], extension)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_load_missing_file_returns_default() {
        let dir = tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("none.json")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");
        let config = Config {
            catalog_source: PathBuf::from("/dados/Cadastro Kits.xlsx"),
            logo_source: None,
            duplicate_policy: DuplicateKeyPolicy::Reject,
            ..Default::default()
        };
        config.save_to(&path).unwrap();
        assert_eq!(Config::load_from(&path).unwrap(), config);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"materials_source": "m.xlsx"}"#).unwrap();
        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.materials_source, PathBuf::from("m.xlsx"));
        assert_eq!(config.catalog_source, PathBuf::from(DEFAULT_CATALOG_FILE));
        assert_eq!(config.logo_source.as_deref(), Some(DEFAULT_LOGO_URL));
    }

    #[test]
    fn test_overrides() {
        let overrides = ConfigOverrides {
            catalog_source: Some(PathBuf::from("c.xlsx")),
            logo_cache_path: Some(PathBuf::from("/tmp/logo.png")),
            strict_catalog: true,
            ..Default::default()
        };
        let config = Config::default().with_overrides(&overrides);
        assert_eq!(config.catalog_source, PathBuf::from("c.xlsx"));
        assert_eq!(config.materials_source, PathBuf::from(DEFAULT_MATERIALS_FILE));
        assert_eq!(config.duplicate_policy, DuplicateKeyPolicy::Reject);
        assert_eq!(config.resolved_logo_cache_path(), Some(PathBuf::from("/tmp/logo.png")));

        let no_logo = Config::default().with_overrides(&ConfigOverrides { no_logo: true, ..Default::default() });
        assert_eq!(no_logo.logo_source, None);
    }

    #[test]
    fn test_logo_cache_file_name() {
        let a = logo_cache_file_name(DEFAULT_LOGO_URL);
        let b = logo_cache_file_name("https://example.com/logo.jpg");
        assert!(a.starts_with("logo-"));
        assert!(a.ends_with(".png"));
        assert!(b.ends_with(".jpg"));
        assert_ne!(a, b);
        assert_eq!(a, logo_cache_file_name(DEFAULT_LOGO_URL));
        assert!(logo_cache_file_name("https://example.com/logo").ends_with(".img"));
    }
}
