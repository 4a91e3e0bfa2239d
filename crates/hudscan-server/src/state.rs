//! Per-account JSON state persistence.

use std::io;
use std::path::PathBuf;

use serde_json::Value;
use tracing::debug;

/// File-backed store for arbitrary per-account JSON state.
///
/// Each account is one `<account>.json` file under the state directory.
/// Account names are restricted to `[A-Za-z0-9_-]` so they can never
/// escape the directory.
pub struct StateStore {
    dir: PathBuf,
}

impl StateStore {
    /// Open a store rooted at `dir`, creating the directory if needed.
    pub fn new(dir: PathBuf) -> io::Result<Self> {
        std::fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    /// Whether `name` is an acceptable account identifier.
    pub fn valid_account(name: &str) -> bool {
        !name.is_empty()
            && name
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    }

    fn path_for(&self, account: &str) -> PathBuf {
        self.dir.join(format!("{}.json", account))
    }

    /// Read an account's state. Unknown accounts read as an empty object.
    pub fn get(&self, account: &str) -> io::Result<Value> {
        let path = self.path_for(account);
        if !path.exists() {
            return Ok(Value::Object(serde_json::Map::new()));
        }
        let content = std::fs::read_to_string(&path)?;
        serde_json::from_str(&content)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e.to_string()))
    }

    /// Replace an account's state.
    pub fn set(&self, account: &str, state: &Value) -> io::Result<()> {
        let path = self.path_for(account);
        let content = serde_json::to_string_pretty(state)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e.to_string()))?;
        std::fs::write(&path, content)?;
        debug!("Saved state for account {} to {}", account, path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_unknown_account_reads_empty_object() {
        let dir = tempfile::tempdir().unwrap();
        let store = StateStore::new(dir.path().to_path_buf()).unwrap();

        assert_eq!(store.get("nobody").unwrap(), json!({}));
    }

    #[test]
    fn test_set_then_get_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = StateStore::new(dir.path().to_path_buf()).unwrap();

        let state = json!({"现金": "1250", "runs": 3});
        store.set("player1", &state).unwrap();

        assert_eq!(store.get("player1").unwrap(), state);
    }

    #[test]
    fn test_set_replaces_previous_state() {
        let dir = tempfile::tempdir().unwrap();
        let store = StateStore::new(dir.path().to_path_buf()).unwrap();

        store.set("player1", &json!({"a": 1})).unwrap();
        store.set("player1", &json!({"b": 2})).unwrap();

        assert_eq!(store.get("player1").unwrap(), json!({"b": 2}));
    }

    #[test]
    fn test_account_name_validation() {
        assert!(StateStore::valid_account("player_1"));
        assert!(StateStore::valid_account("a-b-c"));
        assert!(!StateStore::valid_account(""));
        assert!(!StateStore::valid_account("../escape"));
        assert!(!StateStore::valid_account("with space"));
        assert!(!StateStore::valid_account("dot.json"));
    }
}
