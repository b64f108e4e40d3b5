//! Device authorization for users.
//!
//! Pure resolver over the inputs a caller assembles from the user record,
//! its assigned device groups, and the tenant defaults. Evaluation order:
//! the admin user sees everything; a blank device ID is never authorized;
//! a matching preferred device authorizes (and in `only` mode is the sole
//! grant); a user with no group assignments falls back to the tenant
//! default; otherwise the device must appear in some assigned group.

use std::collections::HashSet;

use crate::models::user::PreferredDeviceAuth;

/// Device group ID granting access to every device in the account.
pub const DEVICE_GROUP_ALL: &str = "all";

/// Inputs to a device-authorization decision.
#[derive(Debug, Clone)]
pub struct DeviceAuthorizationInput<'a> {
    /// True for the reserved account super-user.
    pub is_admin: bool,
    /// Device being checked.
    pub device_id: &'a str,
    /// The user's preferred device, if any.
    pub preferred_device_id: Option<&'a str>,
    /// Tenant policy for preferred-device authorization.
    pub preferred_device_auth: PreferredDeviceAuth,
    /// Device groups assigned to the user.
    pub assigned_groups: &'a [String],
    /// Of the assigned groups, those that contain `device_id`.
    pub groups_containing_device: &'a HashSet<String>,
    /// Tenant default when the user has no group assignments.
    pub default_authorization: bool,
}

/// Decides whether the user may access the device.
pub fn is_authorized_device(input: &DeviceAuthorizationInput<'_>) -> bool {
    if input.is_admin {
        return true;
    }

    if input.device_id.trim().is_empty() {
        return false;
    }

    if input.preferred_device_auth != PreferredDeviceAuth::Disabled {
        if let Some(preferred) = input.preferred_device_id {
            if !preferred.is_empty() && preferred.eq_ignore_ascii_case(input.device_id) {
                return true;
            }
        }
        if input.preferred_device_auth == PreferredDeviceAuth::Only {
            return false;
        }
    }

    if input.assigned_groups.is_empty() {
        return input.default_authorization;
    }

    for group in input.assigned_groups {
        if group.eq_ignore_ascii_case(DEVICE_GROUP_ALL) {
            return true;
        }
        if input.groups_containing_device.contains(group) {
            return true;
        }
    }

    false
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input<'a>(
        device_id: &'a str,
        assigned_groups: &'a [String],
        groups_containing_device: &'a HashSet<String>,
    ) -> DeviceAuthorizationInput<'a> {
        DeviceAuthorizationInput {
            is_admin: false,
            device_id,
            preferred_device_id: None,
            preferred_device_auth: PreferredDeviceAuth::Disabled,
            assigned_groups,
            groups_containing_device,
            default_authorization: true,
        }
    }

    #[test]
    fn test_admin_is_always_authorized() {
        let groups = vec![];
        let containing = HashSet::new();
        let mut inp = input("", &groups, &containing);
        inp.is_admin = true;
        inp.default_authorization = false;
        // even a blank device ID passes for the admin user
        assert!(is_authorized_device(&inp));
    }

    #[test]
    fn test_blank_device_id_is_denied() {
        let groups = vec![];
        let containing = HashSet::new();
        assert!(!is_authorized_device(&input("", &groups, &containing)));
        assert!(!is_authorized_device(&input("   ", &groups, &containing)));
    }

    #[test]
    fn test_no_groups_falls_back_to_tenant_default() {
        let groups = vec![];
        let containing = HashSet::new();

        let mut inp = input("truck-1", &groups, &containing);
        assert!(is_authorized_device(&inp));

        inp.default_authorization = false;
        assert!(!is_authorized_device(&inp));
    }

    #[test]
    fn test_group_all_authorizes_everything() {
        let groups = vec!["ALL".to_string()];
        let containing = HashSet::new();
        let mut inp = input("truck-1", &groups, &containing);
        inp.default_authorization = false;
        assert!(is_authorized_device(&inp));
    }

    #[test]
    fn test_membership_in_assigned_group() {
        let groups = vec!["east".to_string(), "west".to_string()];
        let mut containing = HashSet::new();
        containing.insert("west".to_string());

        let mut inp = input("truck-1", &groups, &containing);
        inp.default_authorization = false;
        assert!(is_authorized_device(&inp));
    }

    #[test]
    fn test_no_membership_in_any_assigned_group() {
        let groups = vec!["east".to_string()];
        let containing = HashSet::new();
        let mut inp = input("truck-1", &groups, &containing);
        inp.default_authorization = true; // default does not apply once groups exist
        assert!(!is_authorized_device(&inp));
    }

    #[test]
    fn test_preferred_device_match_authorizes() {
        let groups = vec!["east".to_string()];
        let containing = HashSet::new();
        let mut inp = input("Truck-1", &groups, &containing);
        inp.preferred_device_auth = PreferredDeviceAuth::Enabled;
        inp.preferred_device_id = Some("truck-1");
        // case-insensitive match, and it bypasses the group check
        assert!(is_authorized_device(&inp));
    }

    #[test]
    fn test_preferred_device_only_mode_denies_everything_else() {
        let groups = vec![DEVICE_GROUP_ALL.to_string()];
        let containing = HashSet::new();
        let mut inp = input("truck-2", &groups, &containing);
        inp.preferred_device_auth = PreferredDeviceAuth::Only;
        inp.preferred_device_id = Some("truck-1");
        // group "all" would authorize, but only-mode short-circuits first
        assert!(!is_authorized_device(&inp));

        inp.device_id = "truck-1";
        assert!(is_authorized_device(&inp));
    }

    #[test]
    fn test_preferred_device_disabled_mode_ignores_preference() {
        let groups = vec![];
        let containing = HashSet::new();
        let mut inp = input("truck-1", &groups, &containing);
        inp.preferred_device_id = Some("truck-1");
        inp.default_authorization = false;
        // Disabled mode never consults the preferred device
        assert!(!is_authorized_device(&inp));
    }

    #[test]
    fn test_blank_preferred_device_never_matches() {
        let groups = vec![];
        let containing = HashSet::new();
        let mut inp = input("truck-1", &groups, &containing);
        inp.preferred_device_auth = PreferredDeviceAuth::Only;
        inp.preferred_device_id = Some("");
        assert!(!is_authorized_device(&inp));
    }
}
