//! The signed-in user's profile.
//!
//! The backend may send an empty string for a user who never set a phone
//! number; that reads as `None`. A phone number that is present must pass
//! [`PhoneNumber`] validation.

use serde::{Deserialize, Deserializer, Serialize};

use crate::types::PhoneNumber;

/// Profile details shown on the account screens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub phone: Option<PhoneNumber>,
}

/// Body of a phone number update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhoneUpdate {
    pub phone_number: PhoneNumber,
}

fn blank_as_none<'de, D>(deserializer: D) -> Result<Option<PhoneNumber>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)? {
        Some(s) if !s.trim().is_empty() => PhoneNumber::parse(&s)
            .map(Some)
            .map_err(serde::de::Error::custom),
        _ => Ok(None),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_phone_reads_as_none() {
        let profile: Profile =
            serde_json::from_str(r#"{"username":"amine","email":"a@souk.tn","phone":""}"#).unwrap();
        assert_eq!(profile.phone, None);

        let profile: Profile = serde_json::from_str(r#"{"username":"amine"}"#).unwrap();
        assert_eq!(profile.phone, None);
        assert_eq!(profile.email, None);
    }

    #[test]
    fn test_phone_is_validated() {
        let profile: Profile = serde_json::from_str(r#"{"phone":"+21698123456"}"#).unwrap();
        assert_eq!(profile.phone.unwrap().national(), "98123456");

        assert!(serde_json::from_str::<Profile>(r#"{"phone":"+21671123456"}"#).is_err());
    }

    #[test]
    fn test_phone_update_wire_shape() {
        let update = PhoneUpdate {
            phone_number: PhoneNumber::parse("55123456").unwrap(),
        };
        assert_eq!(
            serde_json::to_string(&update).unwrap(),
            r#"{"phoneNumber":"+21655123456"}"#
        );
    }
}
