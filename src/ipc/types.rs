use std::path::PathBuf;

use rusqlite::Connection;
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct Request {
    pub id: String,
    pub method: String,
    #[serde(default)]
    pub params: serde_json::Value,
}

pub struct AppState {
    pub workspace: Option<PathBuf>,
    pub db: Option<Connection>,
    /// Current identity, if any. Data handlers refuse to run without one;
    /// the shell re-opens an account after an identity change.
    pub user_id: Option<String>,
    pub user_email: Option<String>,
}
