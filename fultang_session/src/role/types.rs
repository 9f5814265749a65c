use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::role::errors::RoleError;

/// Umbrella role the backend assigns to every staff member.
pub const PERSONNEL_ROLE: &str = "personnel";

/// User record as returned by the backend.
///
/// Staff members come back with `role == "personnel"` and their job title in
/// `poste`; everybody else (e.g. `admin`) carries their role directly.
/// Fields the session layer does not interpret are kept verbatim in `profile`
/// so that a stored record round-trips unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawUser", into = "RawUser")]
pub enum User {
    Personnel(PersonnelUser),
    DirectRole(DirectRoleUser),
}

#[derive(Debug, Clone, PartialEq)]
pub struct PersonnelUser {
    pub id: i64,
    /// Job title: medecin, infirmier, receptioniste, caissier, ...
    pub poste: String,
    pub profile: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DirectRoleUser {
    pub id: i64,
    pub role: String,
    pub profile: Map<String, Value>,
}

/// Wire shape of a user record.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct RawUser {
    id: i64,
    role: String,
    #[serde(flatten)]
    rest: Map<String, Value>,
}

impl TryFrom<RawUser> for User {
    type Error = RoleError;

    fn try_from(raw: RawUser) -> Result<Self, Self::Error> {
        let RawUser { id, role, mut rest } = raw;

        if role != PERSONNEL_ROLE {
            return Ok(User::DirectRole(DirectRoleUser {
                id,
                role,
                profile: rest,
            }));
        }

        let poste = match rest.remove("poste") {
            Some(Value::String(poste)) => poste,
            Some(Value::Null) | None => return Err(RoleError::MissingPoste),
            Some(other) => return Err(RoleError::InvalidPoste(other.to_string())),
        };

        Ok(User::Personnel(PersonnelUser {
            id,
            poste,
            profile: rest,
        }))
    }
}

impl From<User> for RawUser {
    fn from(user: User) -> Self {
        match user {
            User::Personnel(PersonnelUser { id, poste, profile }) => {
                let mut rest = profile;
                rest.insert("poste".to_string(), Value::String(poste));
                RawUser {
                    id,
                    role: PERSONNEL_ROLE.to_string(),
                    rest,
                }
            }
            User::DirectRole(DirectRoleUser { id, role, profile }) => RawUser {
                id,
                role,
                rest: profile,
            },
        }
    }
}

impl User {
    pub fn id(&self) -> i64 {
        match self {
            User::Personnel(p) => p.id,
            User::DirectRole(d) => d.id,
        }
    }

    /// Raw backend role (`"personnel"` for staff members).
    pub fn role(&self) -> &str {
        match self {
            User::Personnel(_) => PERSONNEL_ROLE,
            User::DirectRole(d) => &d.role,
        }
    }

    pub fn poste(&self) -> Option<&str> {
        match self {
            User::Personnel(p) => Some(&p.poste),
            User::DirectRole(_) => None,
        }
    }

    pub fn profile(&self) -> &Map<String, Value> {
        match self {
            User::Personnel(p) => &p.profile,
            User::DirectRole(d) => &d.profile,
        }
    }

    /// String-valued profile field, if present.
    pub fn profile_str(&self, key: &str) -> Option<&str> {
        self.profile().get(key).and_then(Value::as_str)
    }

    /// Name shown in page headers: "prenom nom" for staff, the login or
    /// e-mail otherwise.
    pub fn display_name(&self) -> String {
        match (self.profile_str("prenom"), self.profile_str("nom")) {
            (Some(prenom), Some(nom)) => format!("{prenom} {nom}"),
            (None, Some(nom)) => nom.to_string(),
            (Some(prenom), None) => prenom.to_string(),
            (None, None) => self
                .profile_str("login")
                .or_else(|| self.profile_str("email"))
                .map(str::to_string)
                .unwrap_or_else(|| format!("user #{}", self.id())),
        }
    }
}
