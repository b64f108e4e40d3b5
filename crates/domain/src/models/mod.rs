//! Domain models for the FleetTrack tenant entity layer.

pub mod account;
pub mod credentials;
pub mod driver;
pub mod lifecycle;
pub mod units;
pub mod user;

pub use account::{Account, AccountType, ALL_PRIVATE_LABELS, SYSTEM_ADMIN_ACCOUNT_ID};
pub use credentials::CredentialState;
pub use driver::{Driver, DutyStatus, ElogState};
pub use units::{
    AltitudeUnits, AreaUnits, CurrencyUnits, DistanceUnits, EconomyUnits, ForceUnits,
    GeocoderMode, LatLonFormat, MassUnits, PressureUnits, SpeedUnits, TemperatureUnits,
    VolumeUnits,
};
pub use user::{AccessLevel, PreferredDeviceAuth, User, ADMIN_USER_ID};
