//! Permission checks for command invocations.
//!
//! Checks run in a fixed order (owner, group, private); the first failing
//! one decides which denial the user sees.

use crate::commands::PermissionFlags;
use crate::config::Owners;

/// Reason a command invocation was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Denial {
    OwnerOnly,
    GroupOnly,
    PrivateOnly,
}

impl Denial {
    /// i18n key of the denial message.
    pub fn key(self) -> &'static str {
        match self {
            Self::OwnerOnly => "errors.owner_only",
            Self::GroupOnly => "errors.group_only",
            Self::PrivateOnly => "errors.private_only",
        }
    }
}

/// Permission checker.
///
/// Bot owners (from `OWNER_NUMBER` / `OWNER_LID`) pass the owner check;
/// scope checks apply to everyone.
#[derive(Debug, Clone)]
pub struct Permissions {
    owners: Owners,
}

impl Permissions {
    pub fn new(owners: Owners) -> Self {
        Self { owners }
    }

    #[inline]
    pub fn is_bot_owner(&self, identity: &str) -> bool {
        self.owners.contains(identity)
    }

    /// Check `flags` for an invocation by `identity` in a group or direct chat.
    pub fn check(&self, flags: PermissionFlags, identity: &str, is_group: bool) -> Result<(), Denial> {
        if flags.owner_only && !self.is_bot_owner(identity) {
            return Err(Denial::OwnerOnly);
        }
        if flags.group_only && !is_group {
            return Err(Denial::GroupOnly);
        }
        if flags.private_only && is_group {
            return Err(Denial::PrivateOnly);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn permissions() -> Permissions {
        Permissions::new(Owners {
            numbers: vec!["100".into()],
            linked_ids: vec!["lid-7".into()],
        })
    }

    #[test]
    fn owner_only_accepts_both_identity_forms() {
        let flags = PermissionFlags {
            owner_only: true,
            ..Default::default()
        };
        let perms = permissions();
        assert_eq!(perms.check(flags, "100", false), Ok(()));
        assert_eq!(perms.check(flags, "lid-7", true), Ok(()));
        assert_eq!(perms.check(flags, "200", false), Err(Denial::OwnerOnly));
    }

    #[test]
    fn owner_check_comes_first() {
        let flags = PermissionFlags {
            owner_only: true,
            group_only: true,
            private_only: false,
        };
        assert_eq!(
            permissions().check(flags, "200", false),
            Err(Denial::OwnerOnly)
        );
        assert_eq!(
            permissions().check(flags, "100", false),
            Err(Denial::GroupOnly)
        );
    }

    #[test]
    fn scope_checks() {
        let group = PermissionFlags {
            group_only: true,
            ..Default::default()
        };
        let private = PermissionFlags {
            private_only: true,
            ..Default::default()
        };
        let perms = permissions();
        assert_eq!(perms.check(group, "200", true), Ok(()));
        assert_eq!(perms.check(private, "200", true), Err(Denial::PrivateOnly));
        assert_eq!(perms.check(PermissionFlags::default(), "200", true), Ok(()));
    }
}
