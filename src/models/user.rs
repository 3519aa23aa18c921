use serde::{Deserialize, Deserializer, Serialize};

/// A user record as exchanged over HTTP and handed to templates.
///
/// Field names on the wire are hyphenated (`user-name`, `first-name`, ...).
/// Missing or `null` fields decode to empty strings, so a record with an
/// empty `username` doubles as the "no such user" value.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct User {
    #[serde(rename = "user-name", deserialize_with = "null_as_empty")]
    pub username: String,

    #[serde(deserialize_with = "null_as_empty")]
    pub password: String,

    #[serde(rename = "first-name", deserialize_with = "null_as_empty")]
    pub first_name: String,

    #[serde(rename = "last-name", deserialize_with = "null_as_empty")]
    pub last_name: String,

    #[serde(deserialize_with = "null_as_empty")]
    pub email: String,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

impl User {
    /// True for the zero-valued record returned when a lookup misses.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.username.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_with_hyphenated_keys() {
        let user = User {
            username: "test".to_string(),
            password: "pwd".to_string(),
            first_name: "lou".to_string(),
            last_name: "garwood".to_string(),
            email: "louis@mail.com".to_string(),
        };

        assert_eq!(
            serde_json::to_string(&user).unwrap(),
            r#"{"user-name":"test","password":"pwd","first-name":"lou","last-name":"garwood","email":"louis@mail.com"}"#
        );
    }

    #[test]
    fn missing_fields_decode_to_empty_strings() {
        let user: User =
            serde_json::from_str(r#"{"user-name":"test1","password":"pass"}"#).unwrap();

        assert_eq!(user.username, "test1");
        assert_eq!(user.password, "pass");
        assert!(user.first_name.is_empty());
        assert!(user.email.is_empty());
    }

    #[test]
    fn null_fields_decode_to_empty_strings() {
        let user: User =
            serde_json::from_str(r#"{"user-name":"n","password":null,"email":null}"#).unwrap();

        assert_eq!(user.username, "n");
        assert!(user.password.is_empty());
        assert!(user.email.is_empty());
    }

    #[test]
    fn default_user_is_empty() {
        assert!(User::default().is_empty());
    }
}
