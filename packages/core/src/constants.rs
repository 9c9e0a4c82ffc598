// ABOUTME: Application-wide constants and data directory resolution
// ABOUTME: Sync topic name, default comment author and local store paths

use std::env;
use std::path::PathBuf;

use blueprint_config::{BLUEPRINT_DATA_DIR, HOME};

/// Name of the broadcast topic shared by every open instance of the application
pub const SYNC_CHANNEL_NAME: &str = "blueprint_ai_sync";

/// Author label attached to comments when none is configured
pub const DEFAULT_COMMENT_AUTHOR: &str = "Collaborator";

/// Get the path to the Blueprint directory (~/.blueprint)
///
/// `BLUEPRINT_DATA_DIR` takes precedence, then `HOME` (useful for tests),
/// then the platform home directory.
pub fn blueprint_dir() -> PathBuf {
    if let Ok(dir) = env::var(BLUEPRINT_DATA_DIR) {
        return PathBuf::from(dir);
    }

    if let Ok(home) = env::var(HOME) {
        PathBuf::from(home).join(".blueprint")
    } else {
        dirs::home_dir()
            .unwrap_or_else(env::temp_dir)
            .join(".blueprint")
    }
}

/// Get the path to the local store database (~/.blueprint/blueprint.db)
pub fn database_file() -> PathBuf {
    blueprint_dir().join("blueprint.db")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_dir_override() {
        let previous = env::var(BLUEPRINT_DATA_DIR).ok();
        env::set_var(BLUEPRINT_DATA_DIR, "/srv/blueprint-data");

        assert_eq!(blueprint_dir(), PathBuf::from("/srv/blueprint-data"));
        assert_eq!(
            database_file(),
            PathBuf::from("/srv/blueprint-data/blueprint.db")
        );

        match previous {
            Some(value) => env::set_var(BLUEPRINT_DATA_DIR, value),
            None => env::remove_var(BLUEPRINT_DATA_DIR),
        }
    }
}
