use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::config::{EnvFileMode, StartupError, nonempty, parse_env_file};

pub const SUPABASE_ANON_KEY: &str = "SUPABASE_ANON_KEY";

// Only the public pair is exposed to the browser; service key and sheet URLs stay server-side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClientEnv {
    #[serde(rename = "SUPABASE_URL")]
    pub supabase_url: String,
    #[serde(rename = "SUPABASE_ANON_KEY")]
    pub supabase_anon_key: String,
}

impl ClientEnv {
    pub fn from_kv(kv: &HashMap<String, String>) -> Result<Self, StartupError> {
        match (
            nonempty(kv, crate::config::SUPABASE_URL),
            nonempty(kv, SUPABASE_ANON_KEY),
        ) {
            (Some(supabase_url), Some(supabase_anon_key)) => Ok(Self {
                supabase_url,
                supabase_anon_key,
            }),
            _ => Err(StartupError {
                code: "ERR_MISSING_CONFIG",
                message: "SUPABASE_URL or SUPABASE_ANON_KEY missing in env.local".to_string(),
            }),
        }
    }

    pub fn render(&self) -> Result<String, serde_json::Error> {
        Ok(format!("window.__ENV__={};", serde_json::to_string(self)?))
    }
}

pub fn output_path(env_path: &Path) -> PathBuf {
    env_path
        .parent()
        .unwrap_or_else(|| Path::new("."))
        .join("env.js")
}

pub fn generate(env_path: &Path) -> Result<PathBuf, StartupError> {
    if !env_path.exists() {
        return Err(StartupError {
            code: "ERR_CONFIG_FILE_READ",
            message: format!(
                "{} not found; create it with SUPABASE_URL and SUPABASE_ANON_KEY",
                env_path.display()
            ),
        });
    }

    let kv = parse_env_file(env_path, EnvFileMode::SkipMalformed)?;
    let client_env = ClientEnv::from_kv(&kv)?;
    let rendered = client_env.render().map_err(|err| StartupError {
        code: "ERR_ENV_JS_RENDER",
        message: err.to_string(),
    })?;

    let out = output_path(env_path);
    std::fs::write(&out, rendered).map_err(|err| StartupError {
        code: "ERR_ENV_JS_WRITE",
        message: format!("failed to write {}: {}", out.display(), err),
    })?;

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "sheetsync_envjs_{}_{}",
            name,
            std::process::id()
        ));
        std::fs::create_dir_all(&dir).expect("temp dir create should succeed");
        dir
    }

    #[test]
    fn render_emits_window_assignment() {
        let env = ClientEnv {
            supabase_url: "https://proj.supabase.co".to_string(),
            supabase_anon_key: "anon".to_string(),
        };
        assert_eq!(
            env.render().expect("render should succeed"),
            r#"window.__ENV__={"SUPABASE_URL":"https://proj.supabase.co","SUPABASE_ANON_KEY":"anon"};"#
        );
    }

    #[test]
    fn generate_writes_only_public_keys() {
        let dir = temp_dir("ok");
        let env_path = dir.join("env.local");
        std::fs::write(
            &env_path,
            "SUPABASE_URL=https://p.example\nSUPABASE_ANON_KEY=anon\nSUPABASE_SERVICE_ROLE_KEY=secret\n",
        )
        .expect("env.local should be writable");

        let out = generate(&env_path).expect("generate should succeed");
        let written = std::fs::read_to_string(&out).expect("env.js should be readable");
        let _ = std::fs::remove_dir_all(&dir);

        assert_eq!(out.file_name().and_then(|n| n.to_str()), Some("env.js"));
        assert!(written.contains("\"SUPABASE_ANON_KEY\":\"anon\""));
        assert!(!written.contains("secret"));
    }

    #[test]
    fn generate_skips_lines_without_separator() {
        let dir = temp_dir("loose");
        let env_path = dir.join("env.local");
        std::fs::write(
            &env_path,
            "# public keys\nexport\nSUPABASE_URL=https://p.example\n=orphan\nSUPABASE_ANON_KEY=anon\n",
        )
        .expect("env.local should be writable");

        let out = generate(&env_path).expect("generate should succeed");
        let written = std::fs::read_to_string(&out).expect("env.js should be readable");
        let _ = std::fs::remove_dir_all(&dir);

        assert_eq!(
            written,
            r#"window.__ENV__={"SUPABASE_URL":"https://p.example","SUPABASE_ANON_KEY":"anon"};"#
        );
    }

    #[test]
    fn generate_requires_both_keys() {
        let dir = temp_dir("missing");
        let env_path = dir.join("env.local");
        std::fs::write(&env_path, "SUPABASE_URL=https://p.example\n")
            .expect("env.local should be writable");

        let err = generate(&env_path).unwrap_err();
        let _ = std::fs::remove_dir_all(&dir);

        assert_eq!(err.code, "ERR_MISSING_CONFIG");
    }

    #[test]
    fn generate_reports_missing_file() {
        let err = generate(Path::new("/nonexistent/sheetsync/env.local")).unwrap_err();
        assert_eq!(err.code, "ERR_CONFIG_FILE_READ");
    }
}
