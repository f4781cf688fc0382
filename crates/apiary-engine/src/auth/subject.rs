//! Access subjects for unit-level authorization.
//!
//! The token service resolves a credential into one of these subjects; the
//! engine consumes them as opaque identities. A unit-master credential may
//! carry a unit-user override, downgrading its scope to act as that user.

/// Resolved access subject of a unit-level request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnitSubject {
    /// The unit master credential: full administrative scope.
    UnitMaster,
    /// A unit administrator: same scope as the master for cell lifecycle.
    UnitAdmin,
    /// A unit user identified by its subject string.
    UnitUser(String),
    /// A unit-local unit user (promoted via in-cell authentication).
    UnitLocal(String),
    /// No credential presented.
    Anonymous,
    /// A credential that failed to parse or verify.
    Invalid,
}

impl UnitSubject {
    /// True for subjects with administrative scope over the whole unit.
    #[must_use]
    pub const fn is_admin(&self) -> bool {
        matches!(self, Self::UnitMaster | Self::UnitAdmin)
    }

    /// The owning-identity string carried by user-scoped subjects.
    #[must_use]
    pub fn subject(&self) -> Option<&str> {
        match self {
            Self::UnitUser(s) | Self::UnitLocal(s) => Some(s),
            _ => None,
        }
    }

    /// Applies a unit-user override: an administrative credential acting on
    /// behalf of a specific unit user is downgraded to that user's scope.
    /// Non-administrative subjects ignore the override.
    #[must_use]
    pub fn downgrade(self, unit_user_override: Option<&str>) -> Self {
        match (&self, unit_user_override) {
            (Self::UnitMaster | Self::UnitAdmin, Some(user)) => Self::UnitUser(user.to_string()),
            _ => self,
        }
    }
}

impl std::fmt::Display for UnitSubject {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnitMaster => f.write_str("unit-master"),
            Self::UnitAdmin => f.write_str("unit-admin"),
            Self::UnitUser(s) => write!(f, "unit-user:{s}"),
            Self::UnitLocal(s) => write!(f, "unit-local:{s}"),
            Self::Anonymous => f.write_str("anonymous"),
            Self::Invalid => f.write_str("invalid"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn master_downgrades_to_unit_user() {
        let subject = UnitSubject::UnitMaster.downgrade(Some("vet"));
        assert_eq!(subject, UnitSubject::UnitUser("vet".to_string()));
    }

    #[test]
    fn user_ignores_override() {
        let subject = UnitSubject::UnitUser("vet".to_string()).downgrade(Some("hmc"));
        assert_eq!(subject, UnitSubject::UnitUser("vet".to_string()));
    }

    #[test]
    fn no_override_keeps_master() {
        assert_eq!(UnitSubject::UnitMaster.downgrade(None), UnitSubject::UnitMaster);
    }
}
