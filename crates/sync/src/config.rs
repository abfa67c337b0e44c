use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

pub const SUPABASE_URL: &str = "SUPABASE_URL";
pub const SUPABASE_SERVICE_ROLE_KEY: &str = "SUPABASE_SERVICE_ROLE_KEY";
pub const SHEETS_USERS_URL: &str = "SHEETS_USERS_URL";
pub const SHEETS_APPS_URL: &str = "SHEETS_APPS_URL";

const REQUIRED_KEYS: [&str; 4] = [
    SUPABASE_URL,
    SUPABASE_SERVICE_ROLE_KEY,
    SHEETS_USERS_URL,
    SHEETS_APPS_URL,
];

#[derive(Clone)]
pub struct SyncConfig {
    pub store_url: String,
    pub service_role_key: String,
    pub users_sheet_url: String,
    pub apps_sheet_url: String,
    pub http_timeout_ms: u64,
}

impl std::fmt::Debug for SyncConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SyncConfig")
            .field("store_url", &self.store_url)
            .field("service_role_key", &"<redacted>")
            .field("users_sheet_url", &self.users_sheet_url)
            .field("apps_sheet_url", &self.apps_sheet_url)
            .field("http_timeout_ms", &self.http_timeout_ms)
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartupError {
    pub code: &'static str,
    pub message: String,
}

impl std::fmt::Display for StartupError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

impl std::error::Error for StartupError {}

impl SyncConfig {
    pub fn load() -> Result<Self, StartupError> {
        let mut merged = HashMap::new();

        if let Ok(config_path) = std::env::var("SHEETSYNC_CONFIG_PATH") {
            let config_path = config_path.trim();
            if !config_path.is_empty() {
                let file_kv = parse_env_file(Path::new(config_path), EnvFileMode::Strict)?;
                merged.extend(file_kv);
            }
        }

        merged.extend(std::env::vars());

        Self::from_kv(&merged)
    }

    pub fn from_kv(kv: &HashMap<String, String>) -> Result<Self, StartupError> {
        let missing = REQUIRED_KEYS
            .iter()
            .copied()
            .filter(|key| nonempty(kv, key).is_none())
            .collect::<Vec<_>>();
        if !missing.is_empty() {
            return Err(StartupError {
                code: "ERR_MISSING_CONFIG",
                message: format!("missing required config keys: {}", missing.join(", ")),
            });
        }

        let http_timeout_ms = parse_u64(
            kv.get("SHEETSYNC_HTTP_TIMEOUT_MS"),
            0,
            "SHEETSYNC_HTTP_TIMEOUT_MS",
        )?;

        Ok(Self {
            store_url: nonempty(kv, SUPABASE_URL).unwrap_or_default(),
            service_role_key: nonempty(kv, SUPABASE_SERVICE_ROLE_KEY).unwrap_or_default(),
            users_sheet_url: nonempty(kv, SHEETS_USERS_URL).unwrap_or_default(),
            apps_sheet_url: nonempty(kv, SHEETS_APPS_URL).unwrap_or_default(),
            http_timeout_ms,
        })
    }

    pub fn http_timeout(&self) -> Option<Duration> {
        (self.http_timeout_ms > 0).then(|| Duration::from_millis(self.http_timeout_ms))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum EnvFileMode {
    Strict,
    // env.local for the browser bundle: lines without `=` are skipped, not rejected.
    SkipMalformed,
}

pub(crate) fn parse_env_file(
    path: &Path,
    mode: EnvFileMode,
) -> Result<HashMap<String, String>, StartupError> {
    let contents = std::fs::read_to_string(path).map_err(|_| StartupError {
        code: "ERR_CONFIG_FILE_READ",
        message: format!("failed to read config file at {}", path.display()),
    })?;

    let mut kv = HashMap::new();

    for (idx, raw_line) in contents.lines().enumerate() {
        let line = raw_line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let Some((key, value)) = line.split_once('=') else {
            if mode == EnvFileMode::SkipMalformed {
                continue;
            }
            return Err(StartupError {
                code: "ERR_CONFIG_FILE_PARSE",
                message: format!("invalid config line {} (expected KEY=VALUE)", idx + 1),
            });
        };

        let key = key.trim();
        if key.is_empty() && mode == EnvFileMode::SkipMalformed {
            continue;
        }
        if key.is_empty() {
            return Err(StartupError {
                code: "ERR_CONFIG_FILE_PARSE",
                message: format!("invalid config line {} (empty key)", idx + 1),
            });
        }

        kv.insert(key.to_string(), strip_quotes(value.trim()));
    }

    Ok(kv)
}

fn strip_quotes(s: &str) -> String {
    let bytes = s.as_bytes();
    if bytes.len() >= 2 {
        let first = bytes[0];
        let last = bytes[bytes.len() - 1];
        if (first == b'"' && last == b'"') || (first == b'\'' && last == b'\'') {
            return s[1..bytes.len() - 1].to_string();
        }
    }
    s.to_string()
}

pub(crate) fn nonempty(kv: &HashMap<String, String>, key: &str) -> Option<String> {
    kv.get(key)
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
        .map(|v| v.to_string())
}

fn parse_u64(value: Option<&String>, default: u64, key: &'static str) -> Result<u64, StartupError> {
    match value {
        None => Ok(default),
        Some(v) if v.trim().is_empty() => Ok(default),
        Some(v) => v.trim().parse::<u64>().map_err(|_| StartupError {
            code: "ERR_INVALID_CONFIG",
            message: format!("{} must be an integer", key),
        }),
    }
}
