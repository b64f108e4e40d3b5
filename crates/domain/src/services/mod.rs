//! Domain services for the FleetTrack tenant entity layer.
//!
//! Services contain business logic that operates on domain models.

pub mod authorization;
pub mod delegation;
pub mod password_policy;
pub mod providers;
pub mod provisioning;

pub use authorization::{is_authorized_device, DeviceAuthorizationInput, DEVICE_GROUP_ALL};
pub use delegation::{
    PropertySource, ResolvedProperties, SmsConfig, SmtpConfig,
};
pub use password_policy::{
    suspend_time_for_failed_logins, GeneralPasswordHandler, PasswordEncoding, PasswordHandler,
    PasswordHandlerRegistry, PasswordPolicy, PasswordPolicyError,
};
pub use providers::{
    DataPushProvider, ElogHosProvider, NoopDataPushProvider, NoopElogHosProvider, ProviderError,
    ProviderRegistry,
};
pub use provisioning::{
    build_account, build_driver, build_temp_account, build_user, ProvisioningError,
    TempAccountProfile,
};
