use std::collections::HashMap;

use serde::{Deserialize, Serialize};

pub type RawCsvRecord = HashMap<String, String>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Table {
    Apps,
    UserApps,
}

impl Table {
    pub fn as_str(self) -> &'static str {
        match self {
            Table::Apps => "apps",
            Table::UserApps => "user_apps",
        }
    }

    pub fn conflict_columns(self) -> &'static [&'static str] {
        match self {
            Table::Apps => &["app_no"],
            Table::UserApps => &["email", "app_no"],
        }
    }
}

impl std::fmt::Display for Table {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppRecord {
    pub app_no: String,
    pub label: String,
    pub url: String,
}

impl AppRecord {
    pub fn is_complete(&self) -> bool {
        !self.app_no.is_empty() && !self.label.is_empty() && !self.url.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserAppRecord {
    pub email: String,
    pub app_no: String,
    pub allowed: bool,
    pub editor: bool,
}

impl UserAppRecord {
    pub fn is_complete(&self) -> bool {
        !self.email.is_empty() && !self.app_no.is_empty()
    }
}
