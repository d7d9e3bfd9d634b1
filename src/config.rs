use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::error::{AttendanceError, AttendanceResult};

pub const CONFIG_FILE_NAME: &str = "config.json";
pub const CONFIG_PATH_ENV: &str = "MONTHLY_ATTENDANCE_CONFIG";
pub const ACCESS_TOKEN_ENV: &str = "GOOGLE_ACCESS_TOKEN";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub calendar_id: String,
    /// Events with exactly this title mark a work day.
    pub work_day_title: String,
    /// Written into the attendance column for every work day.
    pub work_start_time: String,
    pub work_spreadsheet_ids: Vec<String>,
    pub work_document_template_id: String,
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    #[serde(default)]
    pub oauth2_token_file_name: Option<String>,
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(".")
}

/// Only the field we need out of a cached OAuth2 token.
#[derive(Deserialize)]
struct CachedToken {
    access_token: String,
}

impl Config {
    /// Directory of the running executable, where `config.json` lives.
    pub fn base_dir() -> AttendanceResult<PathBuf> {
        let exe = env::current_exe()?;
        Ok(exe
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from(".")))
    }

    /// `$MONTHLY_ATTENDANCE_CONFIG`, or `config.json` next to the executable.
    pub fn default_path() -> AttendanceResult<PathBuf> {
        match env::var_os(CONFIG_PATH_ENV) {
            Some(path) => Ok(PathBuf::from(path)),
            None => Ok(Self::base_dir()?.join(CONFIG_FILE_NAME)),
        }
    }

    pub fn load(path: &Path) -> AttendanceResult<Self> {
        info!("Loading configuration from {}", path.display());
        let content = fs::read_to_string(path).map_err(|e| {
            AttendanceError::Config(format!("failed to open {}: {}", path.display(), e))
        })?;
        Self::from_json(&content)
    }

    pub fn from_json(content: &str) -> AttendanceResult<Self> {
        let config: Config = serde_json::from_str(content)
            .map_err(|e| AttendanceError::Config(format!("failed to decode config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> AttendanceResult<()> {
        let required = [
            ("calendar_id", &self.calendar_id),
            ("work_day_title", &self.work_day_title),
            ("work_start_time", &self.work_start_time),
            ("work_document_template_id", &self.work_document_template_id),
        ];
        for (name, value) in required {
            if value.trim().is_empty() {
                return Err(AttendanceError::Config(format!("{name} must not be empty")));
            }
        }

        if self.work_spreadsheet_ids.is_empty() {
            return Err(AttendanceError::Config(
                "work_spreadsheet_ids must list at least one spreadsheet".to_string(),
            ));
        }
        if self.work_spreadsheet_ids.iter().any(|id| id.trim().is_empty()) {
            return Err(AttendanceError::Config(
                "work_spreadsheet_ids must not contain empty ids".to_string(),
            ));
        }

        Ok(())
    }

    /// Bearer token for the Google APIs: `$GOOGLE_ACCESS_TOKEN` if set,
    /// otherwise `access_token` of the cached token file.
    pub fn access_token(&self, base_dir: &Path) -> AttendanceResult<String> {
        self.resolve_access_token(env::var(ACCESS_TOKEN_ENV).ok(), base_dir)
    }

    fn resolve_access_token(
        &self,
        from_env: Option<String>,
        base_dir: &Path,
    ) -> AttendanceResult<String> {
        if let Some(token) = from_env.filter(|t| !t.trim().is_empty()) {
            info!("Using access token from {}", ACCESS_TOKEN_ENV);
            return Ok(token);
        }

        let Some(file_name) = &self.oauth2_token_file_name else {
            return Err(AttendanceError::Config(format!(
                "set {ACCESS_TOKEN_ENV} or oauth2_token_file_name"
            )));
        };

        let path = base_dir.join(file_name);
        info!("Reading access token from {}", path.display());
        let content = fs::read_to_string(&path).map_err(|e| {
            AttendanceError::Config(format!("failed to read token {}: {}", path.display(), e))
        })?;
        let token: CachedToken = serde_json::from_str(&content)
            .map_err(|e| AttendanceError::Config(format!("failed to decode oauth token: {}", e)))?;
        Ok(token.access_token)
    }
}
