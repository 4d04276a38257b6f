//! User records exchanged with the user service, and the identity-provider
//! attributes they are built from.

use serde::{Deserialize, Serialize};

use crate::error::DecodeError;
use crate::types::{InstitutionId, RoleName, Username};

/// A role assignment, serialized as `{ "name": "..." }`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Role {
    name: RoleName,
}

impl Role {
    pub fn new(name: impl Into<RoleName>) -> Self {
        Self { name: name.into() }
    }

    pub fn name(&self) -> &RoleName {
        &self.name
    }
}

/// Canonical user profile held by the user service.
///
/// A `User` obtained by deserialization always has a non-blank username and
/// institution id; payloads missing either are rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "UserPayload")]
pub struct User {
    username: Username,
    institution_id: InstitutionId,
    roles: Vec<Role>,
}

impl User {
    pub fn new(
        username: impl Into<Username>,
        institution_id: impl Into<InstitutionId>,
        roles: Vec<Role>,
    ) -> Self {
        Self {
            username: username.into(),
            institution_id: institution_id.into(),
            roles,
        }
    }

    pub fn username(&self) -> &Username {
        &self.username
    }

    pub fn institution_id(&self) -> &InstitutionId {
        &self.institution_id
    }

    /// Roles in the order the service returned them.
    pub fn roles(&self) -> &[Role] {
        &self.roles
    }

    /// Whether the user holds a role with the given name.
    pub fn has_role(&self, name: &str) -> bool {
        self.roles.iter().any(|role| role.name.as_str() == name)
    }
}

/// Wire shape of a user before the required fields are checked.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct UserPayload {
    username: Option<Username>,
    institution_id: Option<InstitutionId>,
    #[serde(default)]
    roles: Vec<Role>,
}

impl TryFrom<UserPayload> for User {
    type Error = DecodeError;

    fn try_from(payload: UserPayload) -> Result<Self, Self::Error> {
        let username = payload
            .username
            .filter(|u| !u.is_blank())
            .ok_or(DecodeError::MissingField("username"))?;
        let institution_id = payload
            .institution_id
            .filter(|i| !i.is_blank())
            .ok_or(DecodeError::MissingField("institutionId"))?;

        Ok(Self {
            username,
            institution_id,
            roles: payload.roles,
        })
    }
}

/// Attributes the identity provider attaches to an authenticated user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserAttributes {
    /// External identity id, e.g. "alice@example.org"
    #[serde(rename = "custom:feideId", default)]
    pub feide_id: Option<String>,
    #[serde(rename = "custom:orgNumber", default)]
    pub org_number: Option<String>,
    #[serde(rename = "custom:affiliation", default)]
    pub affiliation: Option<String>,
    #[serde(rename = "given_name", default)]
    pub given_name: Option<String>,
    #[serde(rename = "family_name", default)]
    pub family_name: Option<String>,
}

impl UserAttributes {
    /// Build the user to provision for these attributes.
    ///
    /// The external identity id becomes the username and the organization
    /// number becomes the institution id. Returns `None` when either is
    /// missing or blank.
    pub fn new_user(&self, roles: Vec<Role>) -> Option<User> {
        let username = non_blank(self.feide_id.as_deref())?;
        let institution_id = non_blank(self.org_number.as_deref())?;
        Some(User::new(username, institution_id, roles))
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_deserialization() {
        let json = r#"{
            "username": "alice",
            "institutionId": "194.0.0.0",
            "roles": [{ "name": "Creator" }, { "name": "Curator" }]
        }"#;

        let user: User = serde_json::from_str(json).unwrap();
        assert_eq!(user.username().as_str(), "alice");
        assert_eq!(user.institution_id().as_str(), "194.0.0.0");
        assert_eq!(user.roles().len(), 2);
        assert_eq!(user.roles()[1].name().as_str(), "Curator");
        assert!(user.has_role("Creator"));
        assert!(!user.has_role("Admin"));
    }

    #[test]
    fn test_user_roles_default_to_empty() {
        let user: User =
            serde_json::from_str(r#"{"username": "alice", "institutionId": "inst"}"#).unwrap();
        assert!(user.roles().is_empty());
    }

    #[test]
    fn test_user_requires_username_and_institution() {
        let missing_username = serde_json::from_str::<User>(r#"{"institutionId": "inst"}"#);
        assert!(missing_username.is_err());

        let blank_institution =
            serde_json::from_str::<User>(r#"{"username": "alice", "institutionId": " "}"#);
        assert!(blank_institution.is_err());
    }

    #[test]
    fn test_user_attributes_deserialization() {
        let json = r#"{
            "custom:feideId": "alice@example.org",
            "custom:orgNumber": "194.0.0.0",
            "custom:affiliation": "[member, employee]",
            "given_name": "Alice",
            "family_name": "Example",
            "email": "ignored@example.org"
        }"#;

        let attrs: UserAttributes = serde_json::from_str(json).unwrap();
        assert_eq!(attrs.feide_id.as_deref(), Some("alice@example.org"));
        assert_eq!(attrs.org_number.as_deref(), Some("194.0.0.0"));
        assert_eq!(attrs.affiliation.as_deref(), Some("[member, employee]"));
        assert_eq!(attrs.given_name.as_deref(), Some("Alice"));
        assert_eq!(attrs.family_name.as_deref(), Some("Example"));
    }

    #[test]
    fn test_new_user_from_attributes() {
        let attrs = UserAttributes {
            feide_id: Some("alice@example.org".to_string()),
            org_number: Some("194.0.0.0".to_string()),
            ..Default::default()
        };

        let user = attrs.new_user(vec![Role::new("Creator")]).unwrap();
        assert_eq!(user.username().as_str(), "alice@example.org");
        assert_eq!(user.institution_id().as_str(), "194.0.0.0");
        assert!(user.has_role("Creator"));
    }

    #[test]
    fn test_new_user_requires_identity_and_org() {
        let no_org = UserAttributes {
            feide_id: Some("alice@example.org".to_string()),
            org_number: Some("".to_string()),
            ..Default::default()
        };
        assert!(no_org.new_user(Vec::new()).is_none());
        assert!(UserAttributes::default().new_user(Vec::new()).is_none());
    }
}
