//! Configuration file handling.
//!
//! The configuration file (by default `$HOME/.expense-sheet/config.json`) names the target
//! spreadsheet and worksheet, the service account credentials, and optionally overrides the
//! category list and the listen address of the HTTP server.

use crate::model::Categories;
use crate::{utils, Result};
use anyhow::{bail, ensure, Context};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const APP_NAME: &str = "expense-sheet";
const CONFIG_VERSION: u8 = 1;
const CREDENTIALS_JSON: &str = "credentials.json";
const DEFAULT_LISTEN: &str = "127.0.0.1:8080";

/// The `Config` object represents the configuration of the app. You instantiate it by loading a
/// `config.json` file. Relative paths inside the file are resolved against the directory that
/// holds it.
#[derive(Debug, Clone)]
pub struct Config {
    root: PathBuf,
    config_path: PathBuf,
    config_file: ConfigFile,
    target: SheetTarget,
    categories: Categories,
}

/// Where expenses are appended.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct SheetTarget {
    spreadsheet_id: String,
    worksheet_name: String,
}

impl SheetTarget {
    pub fn new(spreadsheet_id: impl Into<String>, worksheet_name: impl Into<String>) -> Self {
        Self {
            spreadsheet_id: spreadsheet_id.into(),
            worksheet_name: worksheet_name.into(),
        }
    }

    pub fn spreadsheet_id(&self) -> &str {
        &self.spreadsheet_id
    }

    pub fn worksheet_name(&self) -> &str {
        &self.worksheet_name
    }
}

impl Config {
    /// Writes a new configuration file at `path` and returns the loaded configuration.
    ///
    /// # Arguments
    /// - `path` - Where to write `config.json`. Its parent directory is created if needed.
    /// - `sheet_url` - The URL of the Google Sheet, or the bare spreadsheet ID.
    /// - `worksheet_name` - The tab that expenses are appended to.
    /// - `credentials_path` - The service account key. Defaults to `credentials.json` next to the
    ///   config file.
    ///
    /// # Errors
    /// - Returns an error if the file already exists or any file operation fails.
    pub async fn create(
        path: impl Into<PathBuf>,
        sheet_url: &str,
        worksheet_name: &str,
        credentials_path: Option<PathBuf>,
    ) -> Result<Self> {
        let path = path.into();
        if path.exists() {
            bail!("The config file already exists '{}'", path.display());
        }
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            utils::make_dir(parent)
                .await
                .context("Unable to create the config directory")?;
        }

        let config_file = ConfigFile {
            sheet_url: sheet_url.to_string(),
            worksheet_name: worksheet_name.to_string(),
            credentials_path,
            ..ConfigFile::default()
        };
        config_file.check()?;
        config_file.save(&path).await?;
        Self::load(path).await
    }

    /// This will
    /// - validate that the config file exists and parse it
    /// - extract the spreadsheet ID from the sheet URL
    /// - return the loaded configuration object
    pub async fn load(config_path: impl Into<PathBuf>) -> Result<Self> {
        let maybe_relative = config_path.into();
        if !maybe_relative.is_file() {
            bail!("The config file is missing '{}'", maybe_relative.display())
        }
        let config_path = utils::canonicalize(&maybe_relative).await?;
        let root = config_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();
        let config_file = ConfigFile::load(&config_path).await?;
        Self::from_file(root, config_path, config_file)
    }

    fn from_file(root: PathBuf, config_path: PathBuf, config_file: ConfigFile) -> Result<Self> {
        let spreadsheet_id = extract_spreadsheet_id(&config_file.sheet_url)
            .context("Failed to extract spreadsheet ID from sheet URL")?
            .to_string();
        let target = SheetTarget::new(spreadsheet_id, config_file.worksheet_name.clone());
        let categories = match &config_file.categories {
            Some(labels) => Categories::new(
                labels
                    .iter()
                    .map(|s| s.trim())
                    .filter(|s| !s.is_empty()),
            ),
            None => Categories::default(),
        };
        Ok(Self {
            root,
            config_path,
            config_file,
            target,
            categories,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    pub fn sheet_url(&self) -> &str {
        &self.config_file.sheet_url
    }

    pub fn spreadsheet_id(&self) -> &str {
        self.target.spreadsheet_id()
    }

    pub fn worksheet_name(&self) -> &str {
        self.target.worksheet_name()
    }

    pub fn target(&self) -> &SheetTarget {
        &self.target
    }

    pub fn categories(&self) -> &Categories {
        &self.categories
    }

    /// The address the HTTP server binds to when none is given on the command line.
    pub fn listen(&self) -> &str {
        self.config_file
            .listen
            .as_deref()
            .unwrap_or(DEFAULT_LISTEN)
    }

    /// Returns the stored `credentials_path` if it is absolute, otherwise resolves the relative
    /// path against the config file's directory.
    pub fn credentials_path(&self) -> PathBuf {
        let p = self.config_file.credentials_path();
        if p.is_absolute() {
            return p;
        }
        self.root.join(p)
    }
}

/// Represents the serialization and deserialization format of the configuration file.
///
/// Example configuration:
/// ```json
/// {
///   "app_name": "expense-sheet",
///   "config_version": 1,
///   "sheet_url": "https://docs.google.com/spreadsheets/d/7KpXm2RfZwNJgs84QhVYno5DU6iM9Wlr3bCzAv1txRpL",
///   "worksheet_name": "Gastos",
///   "credentials_path": "credentials.json",
///   "listen": "0.0.0.0:8080"
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq)]
struct ConfigFile {
    /// Application name, should always be "expense-sheet"
    app_name: String,

    /// Configuration file version
    config_version: u8,

    /// URL of the Google Sheet, or its bare ID
    sheet_url: String,

    /// The tab that expenses are appended to
    worksheet_name: String,

    /// Path to the service account key (optional, relative to config.json or absolute)
    /// Defaults to credentials.json next to config.json if not specified
    #[serde(default, skip_serializing_if = "Option::is_none")]
    credentials_path: Option<PathBuf>,

    /// Replaces the built-in category list when present
    #[serde(default, skip_serializing_if = "Option::is_none")]
    categories: Option<Vec<String>>,

    /// Address for `serve`, e.g. "0.0.0.0:8080"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    listen: Option<String>,
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            app_name: APP_NAME.to_string(),
            config_version: CONFIG_VERSION,
            sheet_url: String::new(),
            worksheet_name: String::new(),
            credentials_path: None,
            categories: None,
            listen: None,
        }
    }
}

impl ConfigFile {
    /// Loads a ConfigFile asynchronously from the specified path.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed, or if its contents are invalid
    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = utils::read(path)
            .await
            .with_context(|| format!("Failed to read config file at {}", path.display()))?;

        let config: ConfigFile = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file at {}", path.display()))?;

        config
            .check()
            .with_context(|| format!("Invalid config file at {}", path.display()))?;
        Ok(config)
    }

    /// Saves the ConfigFile to the specified path.
    pub async fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let p = path.as_ref();
        let data = serde_json::to_string_pretty(self).context("Unable to serialize config")?;
        utils::write(p, data)
            .await
            .context("Unable to write config file")
    }

    fn check(&self) -> Result<()> {
        ensure!(
            self.app_name == APP_NAME,
            "Invalid app_name in config file: expected '{}', got '{}'",
            APP_NAME,
            self.app_name
        );
        ensure!(
            !self.sheet_url.trim().is_empty(),
            "The sheet_url must not be empty"
        );
        ensure!(
            !self.worksheet_name.trim().is_empty(),
            "The worksheet_name must not be empty"
        );
        if let Some(categories) = &self.categories {
            ensure!(
                categories.iter().any(|c| !c.trim().is_empty()),
                "The categories list must not be empty"
            );
        }
        Ok(())
    }

    /// Gets the credentials path, `credentials.json` when not specified.
    pub fn credentials_path(&self) -> PathBuf {
        self.credentials_path
            .clone()
            .unwrap_or_else(|| PathBuf::from(CREDENTIALS_JSON))
    }
}

/// Extracts the spreadsheet ID from a Google Sheets URL
///
/// # Arguments
/// * `url` - The Google Sheets URL (e.g., "https://docs.google.com/spreadsheets/d/SPREADSHEET_ID/...")
///   or a bare spreadsheet ID
///
/// # Returns
/// The spreadsheet ID or an error if the URL format is invalid.
fn extract_spreadsheet_id(url: &str) -> Result<&str> {
    let url = url.trim();
    if !url.contains('/') {
        ensure!(!url.is_empty(), "The spreadsheet ID is empty");
        return Ok(url);
    }

    // URL format: https://docs.google.com/spreadsheets/d/SPREADSHEET_ID/...
    // or: https://docs.google.com/spreadsheets/d/SPREADSHEET_ID?foo=bar
    let parts: Vec<&str> = url.split('/').collect();
    for (i, part) in parts.iter().enumerate() {
        if *part == "d" && i + 1 < parts.len() {
            // Extract the ID and remove any query parameters or fragments
            let id_part = parts[i + 1];
            let id = id_part
                .split('?')
                .next()
                .unwrap_or(id_part)
                .split('#')
                .next()
                .unwrap_or(id_part);
            ensure!(!id.is_empty(), "The spreadsheet ID in the URL is empty");
            return Ok(id);
        }
    }
    Err(anyhow::anyhow!(
        "Invalid Google Sheets URL format. Expected: https://docs.google.com/spreadsheets/d/SPREADSHEET_ID"
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::CategoryRegistry;
    use tempfile::TempDir;

    const SHEET_URL: &str =
        "https://docs.google.com/spreadsheets/d/7KpXm2RfZwNJgs84QhVYno5DU6iM9Wlr3bCzAv1txRpL/edit";

    #[tokio::test]
    async fn test_config_create() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("home").join("config.json");

        let config = Config::create(&path, SHEET_URL, "Gastos", None)
            .await
            .unwrap();

        assert_eq!(SHEET_URL, config.sheet_url());
        assert_eq!(
            "7KpXm2RfZwNJgs84QhVYno5DU6iM9Wlr3bCzAv1txRpL",
            config.spreadsheet_id()
        );
        assert_eq!("Gastos", config.worksheet_name());
        assert!(config.config_path().is_file());
        assert_eq!(
            config.credentials_path(),
            config.root().join(CREDENTIALS_JSON)
        );
        assert_eq!(config.listen(), DEFAULT_LISTEN);
        assert_eq!(config.categories(), &Categories::default());
    }

    #[tokio::test]
    async fn test_config_create_refuses_to_overwrite() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        Config::create(&path, SHEET_URL, "Gastos", None)
            .await
            .unwrap();
        assert!(Config::create(&path, SHEET_URL, "Otra", None).await.is_err());
    }

    #[tokio::test]
    async fn test_config_load_with_overrides() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        let content = r#"{
            "app_name": "expense-sheet",
            "config_version": 1,
            "sheet_url": "MySheetIDX",
            "worksheet_name": "Gastos 2025",
            "credentials_path": "/etc/expense/key.json",
            "categories": ["Luz", "Mascotas"],
            "listen": "0.0.0.0:9000"
        }"#;
        utils::write(&path, content).await.unwrap();

        let config = Config::load(&path).await.unwrap();
        assert_eq!(config.spreadsheet_id(), "MySheetIDX");
        assert_eq!(config.worksheet_name(), "Gastos 2025");
        assert_eq!(
            config.credentials_path(),
            PathBuf::from("/etc/expense/key.json")
        );
        assert!(config.categories().is_known("Mascotas"));
        assert!(!config.categories().is_known("Arriendo"));
        assert_eq!(config.listen(), "0.0.0.0:9000");
    }

    #[tokio::test]
    async fn test_config_load_missing() {
        let dir = TempDir::new().unwrap();
        assert!(Config::load(dir.path().join("config.json")).await.is_err());
    }

    #[tokio::test]
    async fn test_config_load_rejects_wrong_app() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        let content = r#"{
            "app_name": "budget-tracker",
            "config_version": 1,
            "sheet_url": "abc",
            "worksheet_name": "Gastos"
        }"#;
        utils::write(&path, content).await.unwrap();
        assert!(Config::load(&path).await.is_err());
    }

    #[tokio::test]
    async fn test_config_load_rejects_empty_categories() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        let content = r#"{
            "app_name": "expense-sheet",
            "config_version": 1,
            "sheet_url": "abc",
            "worksheet_name": "Gastos",
            "categories": []
        }"#;
        utils::write(&path, content).await.unwrap();
        assert!(Config::load(&path).await.is_err());
    }

    #[tokio::test]
    async fn test_config_file_save_and_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        let original = ConfigFile {
            sheet_url: "https://docs.google.com/spreadsheets/d/test123".to_string(),
            worksheet_name: "Gastos".to_string(),
            credentials_path: Some(PathBuf::from("secrets/key.json")),
            ..ConfigFile::default()
        };
        original.save(&path).await.unwrap();
        let loaded = ConfigFile::load(&path).await.unwrap();
        assert_eq!(original, loaded);
    }

    #[test]
    fn test_extract_spreadsheet_id() {
        assert_eq!(
            extract_spreadsheet_id(SHEET_URL).unwrap(),
            "7KpXm2RfZwNJgs84QhVYno5DU6iM9Wlr3bCzAv1txRpL"
        );
        assert_eq!(
            extract_spreadsheet_id("https://docs.google.com/spreadsheets/d/abc?usp=sharing").unwrap(),
            "abc"
        );
        assert_eq!(
            extract_spreadsheet_id("https://docs.google.com/spreadsheets/d/abc#gid=0").unwrap(),
            "abc"
        );
        assert_eq!(extract_spreadsheet_id("abc").unwrap(), "abc");
        assert!(extract_spreadsheet_id("").is_err());
        assert!(extract_spreadsheet_id("https://example.com/spreadsheets").is_err());
    }
}
