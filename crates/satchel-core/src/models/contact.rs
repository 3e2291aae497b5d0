use serde::{Deserialize, Serialize};

/// A contact as stored by the contacts service.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Contact {
    pub id: i64,
    #[serde(rename = "firstName")]
    pub first_name: String,
    #[serde(rename = "lastName")]
    pub last_name: String,
    pub email: String,
}

impl Contact {
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }

    /// Case-insensitive match against first name, last name, or email
    pub fn matches(&self, filter: &str) -> bool {
        if filter.is_empty() {
            return true;
        }
        let needle = filter.to_lowercase();
        self.first_name.to_lowercase().contains(&needle)
            || self.last_name.to_lowercase().contains(&needle)
            || self.email.to_lowercase().contains(&needle)
    }
}

/// Payload for creating or updating a contact.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ContactDraft {
    #[serde(rename = "firstName")]
    pub first_name: String,
    #[serde(rename = "lastName")]
    pub last_name: String,
    pub email: String,
}

/// Envelope of `GET /contacts`.
#[derive(Debug, Clone, Deserialize)]
pub struct ContactsResponse {
    pub contacts: Vec<Contact>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_contacts_envelope() {
        let json = r#"{
            "contacts": [
                {"id": 1, "firstName": "Ada", "lastName": "Lovelace", "email": "ada@example.org"},
                {"id": 2, "firstName": "Alan", "lastName": "Turing", "email": "alan@example.org"}
            ]
        }"#;

        let parsed: ContactsResponse = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.contacts.len(), 2);
        assert_eq!(parsed.contacts[0].first_name, "Ada");
        assert_eq!(parsed.contacts[0].display_name(), "Ada Lovelace");
    }

    #[test]
    fn draft_serializes_camel_case() {
        let draft = ContactDraft {
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            email: "ada@example.org".to_string(),
        };
        let json = serde_json::to_value(&draft).unwrap();
        assert_eq!(json["firstName"], "Ada");
        assert_eq!(json["lastName"], "Lovelace");
        assert_eq!(json["email"], "ada@example.org");
    }

    #[test]
    fn filter_matches_any_field_case_insensitively() {
        let contact = Contact {
            id: 1,
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            email: "ada@example.org".to_string(),
        };

        assert!(contact.matches(""));
        assert!(contact.matches("ada"));
        assert!(contact.matches("LOVE"));
        assert!(contact.matches("example.org"));
        assert!(!contact.matches("turing"));
    }
}
