//! The `{error, msg, data}` object every script prints as its only output

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{JenkinsError, Result};

#[derive(Debug, Deserialize)]
struct RawEnvelope {
    error: bool,
    msg: String,
    #[serde(default)]
    data: serde_json::Value,
}

/// Decode a script response body into the operation's payload.
///
/// `error: true` becomes [`JenkinsError::Script`] carrying `msg` verbatim and
/// `data` is not looked at. A missing or `null` `data` decodes as the
/// payload's default.
pub fn decode<T>(body: &str) -> Result<T>
where
    T: DeserializeOwned + Default,
{
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return Err(JenkinsError::Protocol(
            "script produced no output".to_string(),
        ));
    }

    let envelope: RawEnvelope = serde_json::from_str(trimmed)?;
    if envelope.error {
        return Err(JenkinsError::Script(envelope.msg));
    }

    if envelope.data.is_null() {
        return Ok(T::default());
    }
    serde_json::from_value(envelope.data).map_err(|e| {
        JenkinsError::Protocol(format!("unexpected data in response envelope: {}", e))
    })
}

fn empty_if_null<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Option::unwrap_or_default)
}

fn empty_vec_if_null<'de, D>(deserializer: D) -> std::result::Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<Vec<String>>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// `data` of a user lookup; an absent user is the empty object
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalUserData {
    #[serde(default, deserialize_with = "empty_if_null")]
    pub username: String,
    #[serde(default, deserialize_with = "empty_if_null")]
    pub fullname: String,
    #[serde(default, deserialize_with = "empty_if_null")]
    pub email: String,
    #[serde(default, deserialize_with = "empty_if_null")]
    pub password_hash: String,
    #[serde(default, deserialize_with = "empty_if_null")]
    pub description: String,
}

/// `data` of a permission lookup
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionsData {
    #[serde(default, deserialize_with = "empty_if_null")]
    pub username: String,
    #[serde(default, deserialize_with = "empty_vec_if_null")]
    pub permissions: Vec<String>,
}

/// `data` of a permission mutation: what the script actually changed
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionChanges {
    #[serde(default, deserialize_with = "empty_if_null")]
    pub username: String,
    #[serde(default, deserialize_with = "empty_vec_if_null")]
    pub granted: Vec<String>,
    #[serde(default, deserialize_with = "empty_vec_if_null")]
    pub revoked: Vec<String>,
    /// Requested names with no grantable permission; skipped, not failed
    #[serde(default, deserialize_with = "empty_vec_if_null")]
    pub unknown: Vec<String>,
}

/// `data` of a catalog listing
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionCatalog {
    #[serde(default, deserialize_with = "empty_vec_if_null")]
    pub permissions: Vec<String>,
}

/// `data` of operations that return nothing
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Empty {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_user_payload() {
        let body = r##"{"error":false,"msg":"","data":{"username":"alice","fullname":"Alice A","email":"a@x.com","password_hash":"#jbcrypt:abc","description":"Managed by Terraform"}}"##;
        let user: LocalUserData = decode(body).unwrap();
        assert_eq!(user.username, "alice");
        assert_eq!(user.password_hash, "#jbcrypt:abc");
        assert_eq!(user.description, "Managed by Terraform");
    }

    #[test]
    fn empty_data_object_is_an_absent_user() {
        let user: LocalUserData = decode(r#"{"error":false,"msg":"","data":{}}"#).unwrap();
        assert_eq!(user, LocalUserData::default());
    }

    #[test]
    fn null_fields_decode_as_empty_strings() {
        let user: LocalUserData =
            decode(r#"{"error":false,"msg":"","data":{"username":"admin","email":null}}"#)
                .unwrap();
        assert_eq!(user.username, "admin");
        assert_eq!(user.email, "");
    }

    #[test]
    fn error_envelope_surfaces_msg_verbatim() {
        let body = r#"{"error":true,"msg":"Jenkins is not using local user database","data":{"unexpected":1}}"#;
        let err = decode::<LocalUserData>(body).unwrap_err();
        assert!(matches!(err, JenkinsError::Script(_)));
        assert_eq!(err.to_string(), "Jenkins is not using local user database");
    }

    #[test]
    fn missing_error_or_msg_is_a_protocol_failure() {
        assert!(matches!(
            decode::<Empty>(r#"{"msg":"","data":{}}"#),
            Err(JenkinsError::Envelope(_))
        ));
        assert!(matches!(
            decode::<Empty>(r#"{"error":false,"data":{}}"#),
            Err(JenkinsError::Envelope(_))
        ));
    }

    #[test]
    fn non_json_body_is_a_protocol_failure() {
        let err = decode::<Empty>("groovy.lang.MissingPropertyException: No such property").unwrap_err();
        assert!(matches!(err, JenkinsError::Envelope(_)));
        assert!(matches!(decode::<Empty>("  \n"), Err(JenkinsError::Protocol(_))));
    }

    #[test]
    fn wrong_data_shape_is_a_protocol_failure() {
        let err =
            decode::<PermissionsData>(r#"{"error":false,"msg":"","data":{"permissions":"Job/Build"}}"#)
                .unwrap_err();
        assert!(matches!(err, JenkinsError::Protocol(_)));
    }

    #[test]
    fn trailing_newline_from_println_is_accepted() {
        let perms: PermissionsData = decode(
            "{\"error\":false,\"msg\":\"\",\"data\":{\"username\":\"bob\",\"permissions\":[\"Job/Build\"]}}\n",
        )
        .unwrap();
        assert_eq!(perms.permissions, vec!["Job/Build".to_string()]);
    }

    #[test]
    fn mutation_payload_defaults_when_fields_are_absent() {
        let changes: PermissionChanges =
            decode(r#"{"error":false,"msg":"Permissions for user bob is created","data":{}}"#)
                .unwrap();
        assert_eq!(changes, PermissionChanges::default());

        let changes: PermissionChanges = decode(
            r#"{"error":false,"msg":"","data":{"username":"bob","granted":["Job/Build"],"revoked":[],"unknown":["Job/Teleport"]}}"#,
        )
        .unwrap();
        assert_eq!(changes.granted, vec!["Job/Build".to_string()]);
        assert_eq!(changes.unknown, vec!["Job/Teleport".to_string()]);
    }

    #[test]
    fn missing_data_decodes_as_default() {
        let empty: Empty = decode(r#"{"error":false,"msg":"done"}"#).unwrap();
        assert_eq!(empty, Empty {});
    }
}
