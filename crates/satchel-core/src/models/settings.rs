use serde::{Deserialize, Deserializer, Serialize};

/// Per-account settings stored by the account backend.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserSettings {
    /// The backend's SQLite schema stores this as 0/1.
    #[serde(deserialize_with = "bool_from_int")]
    pub dark_mode: bool,
    #[serde(default)]
    pub username: String,
}

impl Default for UserSettings {
    fn default() -> Self {
        // Matches the backend's defaults for a fresh account
        Self {
            dark_mode: true,
            username: String::new(),
        }
    }
}

fn bool_from_int<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Bool(bool),
        Int(i64),
    }

    Ok(match Flag::deserialize(deserializer)? {
        Flag::Bool(value) => value,
        Flag::Int(value) => value != 0,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dark_mode_parses_from_sqlite_integers() {
        let on: UserSettings = serde_json::from_str(r#"{"dark_mode": 1, "username": ""}"#).unwrap();
        assert!(on.dark_mode);

        let off: UserSettings =
            serde_json::from_str(r#"{"dark_mode": 0, "username": "ada"}"#).unwrap();
        assert!(!off.dark_mode);
        assert_eq!(off.username, "ada");
    }

    #[test]
    fn dark_mode_parses_from_booleans() {
        let parsed: UserSettings =
            serde_json::from_str(r#"{"dark_mode": false, "username": "x"}"#).unwrap();
        assert!(!parsed.dark_mode);
    }

    #[test]
    fn serializes_as_boolean() {
        let settings = UserSettings {
            dark_mode: true,
            username: "ada".to_string(),
        };
        let json = serde_json::to_value(&settings).unwrap();
        assert_eq!(json["dark_mode"], true);
        assert_eq!(json["username"], "ada");
    }
}
