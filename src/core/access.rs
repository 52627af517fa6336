//! Authorization derived from external VCS roles.
//!
//! Repository access implies secret access: a caller's capability level is
//! whatever their role on the backing repository maps to. Roles are resolved
//! live through a [`VcsRoleProvider`] and mapped by a provider-specific
//! [`RoleMapper`] table; unmatched roles always fall to the most restrictive
//! level, never upward.

use tracing::debug;

use crate::error::{AccessError, Result};

/// Ordered permission tier derived from a VCS role.
///
/// Total order: `None < Read < Triage < Write < Maintain < Admin`. Any check
/// that requires a level also accepts every level above it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CapabilityLevel {
    None,
    Read,
    Triage,
    Write,
    Maintain,
    Admin,
}

impl CapabilityLevel {
    /// Integer rank for comparisons and display: read=0 .. admin=4, none=-1.
    pub fn rank(self) -> i8 {
        match self {
            CapabilityLevel::None => -1,
            CapabilityLevel::Read => 0,
            CapabilityLevel::Triage => 1,
            CapabilityLevel::Write => 2,
            CapabilityLevel::Maintain => 3,
            CapabilityLevel::Admin => 4,
        }
    }

    /// Whether this level satisfies a required minimum.
    pub fn satisfies(self, minimum: CapabilityLevel) -> bool {
        self >= minimum
    }
}

impl std::fmt::Display for CapabilityLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            CapabilityLevel::None => "none",
            CapabilityLevel::Read => "read",
            CapabilityLevel::Triage => "triage",
            CapabilityLevel::Write => "write",
            CapabilityLevel::Maintain => "maintain",
            CapabilityLevel::Admin => "admin",
        };
        write!(f, "{}", name)
    }
}

/// Per-provider mapping from raw VCS role strings to capability levels.
///
/// One variant per supported VCS platform, selected at construction. Matching
/// is case-insensitive against the provider's own role vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoleMapper {
    GitHub,
    GitLab,
    Bitbucket,
}

impl RoleMapper {
    /// Map a raw role string to a capability level.
    ///
    /// Unknown roles map to [`CapabilityLevel::None`], the most restrictive
    /// level. Access is never inferred upward from an unrecognized string.
    pub fn to_capability_level(self, raw_role: &str) -> CapabilityLevel {
        let role = raw_role.trim().to_ascii_lowercase();
        match self {
            RoleMapper::GitHub => match role.as_str() {
                "pull" | "read" => CapabilityLevel::Read,
                "triage" => CapabilityLevel::Triage,
                "push" | "write" => CapabilityLevel::Write,
                "maintain" => CapabilityLevel::Maintain,
                "admin" => CapabilityLevel::Admin,
                _ => CapabilityLevel::None,
            },
            RoleMapper::GitLab => match role.as_str() {
                "guest" => CapabilityLevel::Read,
                "reporter" => CapabilityLevel::Triage,
                "developer" => CapabilityLevel::Write,
                "maintainer" => CapabilityLevel::Maintain,
                "owner" => CapabilityLevel::Admin,
                _ => CapabilityLevel::None,
            },
            RoleMapper::Bitbucket => match role.as_str() {
                "read" => CapabilityLevel::Read,
                "write" => CapabilityLevel::Write,
                "admin" => CapabilityLevel::Admin,
                _ => CapabilityLevel::None,
            },
        }
    }
}

/// External collaborator: looks up a user's raw role on a repository.
///
/// Real implementations call the VCS API; tests use a static table.
pub trait VcsRoleProvider: Send + Sync {
    /// The raw role string for `username` on `owner/repo`.
    fn user_role(&self, token: &str, owner: &str, repo: &str, username: &str) -> Result<String>;
}

/// The caller of a gated operation, identified by bearer token and repository.
#[derive(Debug, Clone)]
pub struct Caller {
    pub token: String,
    pub owner: String,
    pub repo: String,
    pub username: String,
}

/// Resolves a caller's current capability level and gates operations on it.
pub struct CapabilityResolver {
    mapper: RoleMapper,
    roles: Box<dyn VcsRoleProvider>,
}

impl CapabilityResolver {
    pub fn new(mapper: RoleMapper, roles: Box<dyn VcsRoleProvider>) -> Self {
        Self { mapper, roles }
    }

    /// Resolve the caller's capability level right now.
    ///
    /// Always hits the role provider: levels are never cached across a
    /// suspension point, so a revoked role takes effect immediately.
    pub fn current_level(&self, caller: &Caller) -> Result<CapabilityLevel> {
        let raw = self
            .roles
            .user_role(&caller.token, &caller.owner, &caller.repo, &caller.username)?;
        let level = self.mapper.to_capability_level(&raw);
        debug!(username = %caller.username, role = %raw, level = %level, "resolved capability");
        Ok(level)
    }

    /// Require at least `minimum` for the caller, re-resolving the live role.
    ///
    /// # Errors
    ///
    /// Returns `AccessError::PermissionDenied` before any side effect when the
    /// caller's level is below the minimum.
    pub fn require(&self, caller: &Caller, minimum: CapabilityLevel) -> Result<CapabilityLevel> {
        let actual = self.current_level(caller)?;
        if !actual.satisfies(minimum) {
            return Err(AccessError::PermissionDenied {
                required: minimum,
                actual,
            }
            .into());
        }
        Ok(actual)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use std::collections::HashMap;

    /// Static role table for tests.
    pub struct StaticRoles(pub HashMap<String, String>);

    impl VcsRoleProvider for StaticRoles {
        fn user_role(&self, _: &str, _: &str, _: &str, username: &str) -> Result<String> {
            self.0.get(username).cloned().ok_or_else(|| {
                AccessError::RoleLookupFailed {
                    username: username.to_string(),
                    reason: "unknown user".to_string(),
                }
                .into()
            })
        }
    }

    fn resolver(mapper: RoleMapper, roles: &[(&str, &str)]) -> CapabilityResolver {
        let table = roles
            .iter()
            .map(|(u, r)| (u.to_string(), r.to_string()))
            .collect();
        CapabilityResolver::new(mapper, Box::new(StaticRoles(table)))
    }

    fn caller(username: &str) -> Caller {
        Caller {
            token: "tok".to_string(),
            owner: "acme".to_string(),
            repo: "api".to_string(),
            username: username.to_string(),
        }
    }

    #[test]
    fn test_levels_strictly_ordered() {
        use CapabilityLevel::*;
        let levels = [None, Read, Triage, Write, Maintain, Admin];
        for pair in levels.windows(2) {
            assert!(pair[0] < pair[1]);
            assert!(pair[0].rank() < pair[1].rank());
        }
    }

    #[test]
    fn test_higher_level_satisfies_lower_minimum() {
        assert!(CapabilityLevel::Admin.satisfies(CapabilityLevel::Write));
        assert!(CapabilityLevel::Write.satisfies(CapabilityLevel::Write));
        assert!(!CapabilityLevel::Triage.satisfies(CapabilityLevel::Write));
    }

    #[test]
    fn test_github_role_table() {
        let m = RoleMapper::GitHub;
        assert_eq!(m.to_capability_level("pull"), CapabilityLevel::Read);
        assert_eq!(m.to_capability_level("triage"), CapabilityLevel::Triage);
        assert_eq!(m.to_capability_level("push"), CapabilityLevel::Write);
        assert_eq!(m.to_capability_level("maintain"), CapabilityLevel::Maintain);
        assert_eq!(m.to_capability_level("admin"), CapabilityLevel::Admin);
    }

    #[test]
    fn test_role_matching_is_case_insensitive() {
        let m = RoleMapper::GitHub;
        assert_eq!(m.to_capability_level("ADMIN"), CapabilityLevel::Admin);
        assert_eq!(m.to_capability_level("  Push "), CapabilityLevel::Write);
    }

    #[test]
    fn test_unknown_role_maps_to_most_restrictive() {
        assert_eq!(
            RoleMapper::GitHub.to_capability_level("superuser"),
            CapabilityLevel::None
        );
        assert_eq!(
            RoleMapper::GitLab.to_capability_level(""),
            CapabilityLevel::None
        );
        // Bitbucket has no triage tier; a gitlab role string means nothing there.
        assert_eq!(
            RoleMapper::Bitbucket.to_capability_level("maintainer"),
            CapabilityLevel::None
        );
    }

    #[test]
    fn test_require_passes_at_or_above_minimum() {
        let resolver = resolver(RoleMapper::GitHub, &[("alice", "maintain")]);
        let level = resolver
            .require(&caller("alice"), CapabilityLevel::Write)
            .unwrap();
        assert_eq!(level, CapabilityLevel::Maintain);
    }

    #[test]
    fn test_require_denies_below_minimum() {
        let resolver = resolver(RoleMapper::GitHub, &[("bob", "pull")]);
        let err = resolver
            .require(&caller("bob"), CapabilityLevel::Write)
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Access(AccessError::PermissionDenied {
                required: CapabilityLevel::Write,
                actual: CapabilityLevel::Read,
            })
        ));
    }

    #[test]
    fn test_require_surfaces_lookup_failure() {
        let resolver = resolver(RoleMapper::GitHub, &[]);
        assert!(matches!(
            resolver.require(&caller("ghost"), CapabilityLevel::Read),
            Err(Error::Access(AccessError::RoleLookupFailed { .. }))
        ));
    }
}
