use serde::Deserialize;

const IN_MEMORY: &str = ":memory:";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StoreConfig {
    /// SQLite file path, or `:memory:` for a private in-memory database.
    pub path: String,
    /// How long a statement waits on a locked database before failing.
    pub busy_timeout_ms: u32,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: String::from("pos.sqlite3"),
            busy_timeout_ms: 5_000,
        }
    }
}

impl StoreConfig {
    #[must_use]
    pub fn in_memory() -> Self {
        Self {
            path: String::from(IN_MEMORY),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }
}
