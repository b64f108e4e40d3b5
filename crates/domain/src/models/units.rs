//! Unit-of-measure enumerations and conversions.
//!
//! Each physical quantity is an enumerated variant set; each variant carries
//! a multiplier relative to a canonical base unit (km/h, km, liters, kPa,
//! km/L, Celsius, kg, m/s², m², meters). `convert_from_*` multiplies a base
//! value into the variant's unit, `convert_to_*` divides back. Two variant
//! sets deviate from the multiplicative rule: liters-per-100km is a
//! reciprocal of km/L, and temperature is an affine Celsius/Fahrenheit pair.
//!
//! Default units are not stored per quantity. They chain off the distance
//! preference at read time: miles imply US gallons, which imply psi, mpg,
//! and pounds; anything else implies liters, kPa, km/L, and kilograms.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Speed, relative to km/h.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpeedUnits {
    Mph,
    Kph,
    Knots,
}

impl SpeedUnits {
    pub fn multiplier(&self) -> f64 {
        match self {
            SpeedUnits::Mph => 0.621371192,
            SpeedUnits::Kph => 1.0,
            SpeedUnits::Knots => 0.539956803,
        }
    }

    pub fn convert_from_kph(&self, v: f64) -> f64 {
        v * self.multiplier()
    }

    pub fn convert_to_kph(&self, v: f64) -> f64 {
        v / self.multiplier()
    }

    /// Default speed units for a distance preference.
    pub fn default_for_distance(distance: DistanceUnits) -> Self {
        if distance == DistanceUnits::Miles {
            SpeedUnits::Mph
        } else {
            SpeedUnits::Kph
        }
    }

    pub fn code(&self) -> i16 {
        match self {
            SpeedUnits::Mph => 0,
            SpeedUnits::Kph => 1,
            SpeedUnits::Knots => 2,
        }
    }

    pub fn from_code(code: i16) -> Option<Self> {
        match code {
            0 => Some(SpeedUnits::Mph),
            1 => Some(SpeedUnits::Kph),
            2 => Some(SpeedUnits::Knots),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SpeedUnits::Mph => "mph",
            SpeedUnits::Kph => "kph",
            SpeedUnits::Knots => "knots",
        }
    }
}

impl FromStr for SpeedUnits {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "mph" => Ok(SpeedUnits::Mph),
            "kph" | "km/h" => Ok(SpeedUnits::Kph),
            "knots" => Ok(SpeedUnits::Knots),
            _ => Err(format!("Invalid speed units: {}", s)),
        }
    }
}

impl fmt::Display for SpeedUnits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Distance, relative to kilometers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DistanceUnits {
    Miles,
    Km,
    #[serde(rename = "nm")]
    NauticalMiles,
}

impl DistanceUnits {
    pub fn multiplier(&self) -> f64 {
        match self {
            DistanceUnits::Miles => 0.621371192,
            DistanceUnits::Km => 1.0,
            DistanceUnits::NauticalMiles => 0.539956803,
        }
    }

    pub fn convert_from_km(&self, v: f64) -> f64 {
        v * self.multiplier()
    }

    pub fn convert_to_km(&self, v: f64) -> f64 {
        v / self.multiplier()
    }

    pub fn code(&self) -> i16 {
        match self {
            DistanceUnits::Miles => 0,
            DistanceUnits::Km => 1,
            DistanceUnits::NauticalMiles => 2,
        }
    }

    pub fn from_code(code: i16) -> Option<Self> {
        match code {
            0 => Some(DistanceUnits::Miles),
            1 => Some(DistanceUnits::Km),
            2 => Some(DistanceUnits::NauticalMiles),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DistanceUnits::Miles => "miles",
            DistanceUnits::Km => "km",
            DistanceUnits::NauticalMiles => "nm",
        }
    }
}

impl FromStr for DistanceUnits {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "miles" | "mi" => Ok(DistanceUnits::Miles),
            "km" => Ok(DistanceUnits::Km),
            "nm" => Ok(DistanceUnits::NauticalMiles),
            _ => Err(format!("Invalid distance units: {}", s)),
        }
    }
}

impl fmt::Display for DistanceUnits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Altitude, relative to meters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AltitudeUnits {
    Feet,
    Meters,
}

impl AltitudeUnits {
    pub fn multiplier(&self) -> f64 {
        match self {
            AltitudeUnits::Feet => 3.28083990,
            AltitudeUnits::Meters => 1.0,
        }
    }

    pub fn convert_from_meters(&self, v: f64) -> f64 {
        v * self.multiplier()
    }

    pub fn convert_to_meters(&self, v: f64) -> f64 {
        v / self.multiplier()
    }

    /// Default altitude units for a distance preference.
    pub fn default_for_distance(distance: DistanceUnits) -> Self {
        if distance == DistanceUnits::Miles {
            AltitudeUnits::Feet
        } else {
            AltitudeUnits::Meters
        }
    }

    pub fn code(&self) -> i16 {
        match self {
            AltitudeUnits::Feet => 0,
            AltitudeUnits::Meters => 1,
        }
    }

    pub fn from_code(code: i16) -> Option<Self> {
        match code {
            0 => Some(AltitudeUnits::Feet),
            1 => Some(AltitudeUnits::Meters),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AltitudeUnits::Feet => "feet",
            AltitudeUnits::Meters => "meters",
        }
    }
}

impl FromStr for AltitudeUnits {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "feet" | "ft" => Ok(AltitudeUnits::Feet),
            "meters" | "m" => Ok(AltitudeUnits::Meters),
            _ => Err(format!("Invalid altitude units: {}", s)),
        }
    }
}

impl fmt::Display for AltitudeUnits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Volume, relative to liters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VolumeUnits {
    #[serde(rename = "usgal")]
    UsGallons,
    Liters,
    #[serde(rename = "ukgal")]
    UkGallons,
}

impl VolumeUnits {
    pub fn multiplier(&self) -> f64 {
        match self {
            VolumeUnits::UsGallons => 0.264172052,
            VolumeUnits::Liters => 1.0,
            VolumeUnits::UkGallons => 0.219969248,
        }
    }

    pub fn convert_from_liters(&self, v: f64) -> f64 {
        v * self.multiplier()
    }

    pub fn convert_to_liters(&self, v: f64) -> f64 {
        v / self.multiplier()
    }

    /// Default volume units for a distance preference.
    pub fn default_for_distance(distance: DistanceUnits) -> Self {
        if distance == DistanceUnits::Miles {
            VolumeUnits::UsGallons
        } else {
            VolumeUnits::Liters
        }
    }

    pub fn code(&self) -> i16 {
        match self {
            VolumeUnits::UsGallons => 0,
            VolumeUnits::Liters => 1,
            VolumeUnits::UkGallons => 2,
        }
    }

    pub fn from_code(code: i16) -> Option<Self> {
        match code {
            0 => Some(VolumeUnits::UsGallons),
            1 => Some(VolumeUnits::Liters),
            2 => Some(VolumeUnits::UkGallons),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            VolumeUnits::UsGallons => "usgal",
            VolumeUnits::Liters => "liters",
            VolumeUnits::UkGallons => "ukgal",
        }
    }
}

impl FromStr for VolumeUnits {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "usgal" | "gal" | "gallons" => Ok(VolumeUnits::UsGallons),
            "liters" | "litres" | "l" => Ok(VolumeUnits::Liters),
            "ukgal" => Ok(VolumeUnits::UkGallons),
            _ => Err(format!("Invalid volume units: {}", s)),
        }
    }
}

impl fmt::Display for VolumeUnits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Fuel economy, relative to km/L.
///
/// `Lp100km` is a reciprocal unit (liters consumed per 100 km), so its
/// conversions invert rather than scale. A zero input always converts to
/// zero; an unknown economy must never become infinity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EconomyUnits {
    Mpg,
    Kpl,
    Lp100km,
}

impl EconomyUnits {
    pub fn multiplier(&self) -> f64 {
        match self {
            EconomyUnits::Mpg => 2.35214583,
            EconomyUnits::Kpl => 1.0,
            EconomyUnits::Lp100km => 0.01,
        }
    }

    pub fn convert_from_kpl(&self, v: f64) -> f64 {
        match self {
            EconomyUnits::Lp100km => {
                if v == 0.0 {
                    0.0
                } else {
                    1.0 / (v * self.multiplier())
                }
            }
            _ => v * self.multiplier(),
        }
    }

    pub fn convert_to_kpl(&self, v: f64) -> f64 {
        match self {
            EconomyUnits::Lp100km => {
                if v == 0.0 {
                    0.0
                } else {
                    1.0 / (v * self.multiplier())
                }
            }
            _ => v / self.multiplier(),
        }
    }

    /// Default economy units for a volume preference.
    pub fn default_for_volume(volume: VolumeUnits) -> Self {
        if volume == VolumeUnits::UsGallons {
            EconomyUnits::Mpg
        } else {
            EconomyUnits::Kpl
        }
    }

    pub fn code(&self) -> i16 {
        match self {
            EconomyUnits::Mpg => 0,
            EconomyUnits::Kpl => 1,
            EconomyUnits::Lp100km => 2,
        }
    }

    pub fn from_code(code: i16) -> Option<Self> {
        match code {
            0 => Some(EconomyUnits::Mpg),
            1 => Some(EconomyUnits::Kpl),
            2 => Some(EconomyUnits::Lp100km),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            EconomyUnits::Mpg => "mpg",
            EconomyUnits::Kpl => "kpl",
            EconomyUnits::Lp100km => "lp100km",
        }
    }
}

impl FromStr for EconomyUnits {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "mpg" => Ok(EconomyUnits::Mpg),
            "kpl" | "km/l" => Ok(EconomyUnits::Kpl),
            "lp100km" | "l/100km" => Ok(EconomyUnits::Lp100km),
            _ => Err(format!("Invalid economy units: {}", s)),
        }
    }
}

impl fmt::Display for EconomyUnits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Pressure, relative to kPa.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PressureUnits {
    Kpa,
    Psi,
    Mmhg,
    Bar,
}

impl PressureUnits {
    pub fn multiplier(&self) -> f64 {
        match self {
            PressureUnits::Kpa => 1.0,
            PressureUnits::Psi => 0.145037738,
            PressureUnits::Mmhg => 7.50061561,
            PressureUnits::Bar => 0.01,
        }
    }

    pub fn convert_from_kpa(&self, v: f64) -> f64 {
        v * self.multiplier()
    }

    pub fn convert_to_kpa(&self, v: f64) -> f64 {
        v / self.multiplier()
    }

    /// Default pressure units for a volume preference.
    pub fn default_for_volume(volume: VolumeUnits) -> Self {
        if volume == VolumeUnits::UsGallons {
            PressureUnits::Psi
        } else {
            PressureUnits::Kpa
        }
    }

    pub fn code(&self) -> i16 {
        match self {
            PressureUnits::Kpa => 0,
            PressureUnits::Psi => 1,
            PressureUnits::Mmhg => 2,
            PressureUnits::Bar => 3,
        }
    }

    pub fn from_code(code: i16) -> Option<Self> {
        match code {
            0 => Some(PressureUnits::Kpa),
            1 => Some(PressureUnits::Psi),
            2 => Some(PressureUnits::Mmhg),
            3 => Some(PressureUnits::Bar),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PressureUnits::Kpa => "kpa",
            PressureUnits::Psi => "psi",
            PressureUnits::Mmhg => "mmhg",
            PressureUnits::Bar => "bar",
        }
    }
}

impl FromStr for PressureUnits {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "kpa" => Ok(PressureUnits::Kpa),
            "psi" => Ok(PressureUnits::Psi),
            "mmhg" => Ok(PressureUnits::Mmhg),
            "bar" => Ok(PressureUnits::Bar),
            _ => Err(format!("Invalid pressure units: {}", s)),
        }
    }
}

impl fmt::Display for PressureUnits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Temperature. Conversion is affine, not multiplicative; Fahrenheit is the
/// only non-identity branch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemperatureUnits {
    F,
    C,
}

impl TemperatureUnits {
    pub fn convert_from_c(&self, v: f64) -> f64 {
        match self {
            TemperatureUnits::F => v * 9.0 / 5.0 + 32.0,
            TemperatureUnits::C => v,
        }
    }

    pub fn convert_to_c(&self, v: f64) -> f64 {
        match self {
            TemperatureUnits::F => (v - 32.0) * 5.0 / 9.0,
            TemperatureUnits::C => v,
        }
    }

    /// Default temperature units for a distance preference.
    pub fn default_for_distance(distance: DistanceUnits) -> Self {
        if distance == DistanceUnits::Miles {
            TemperatureUnits::F
        } else {
            TemperatureUnits::C
        }
    }

    pub fn code(&self) -> i16 {
        match self {
            TemperatureUnits::F => 0,
            TemperatureUnits::C => 1,
        }
    }

    pub fn from_code(code: i16) -> Option<Self> {
        match code {
            0 => Some(TemperatureUnits::F),
            1 => Some(TemperatureUnits::C),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TemperatureUnits::F => "f",
            TemperatureUnits::C => "c",
        }
    }
}

impl FromStr for TemperatureUnits {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "f" | "fahrenheit" => Ok(TemperatureUnits::F),
            "c" | "celsius" => Ok(TemperatureUnits::C),
            _ => Err(format!("Invalid temperature units: {}", s)),
        }
    }
}

impl fmt::Display for TemperatureUnits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Mass, relative to kilograms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MassUnits {
    Kg,
    Lb,
}

impl MassUnits {
    pub fn multiplier(&self) -> f64 {
        match self {
            MassUnits::Kg => 1.0,
            MassUnits::Lb => 2.20462262,
        }
    }

    pub fn convert_from_kg(&self, v: f64) -> f64 {
        v * self.multiplier()
    }

    pub fn convert_to_kg(&self, v: f64) -> f64 {
        v / self.multiplier()
    }

    /// Default mass units for a volume preference (US gallons imply pounds).
    pub fn default_for_volume(volume: VolumeUnits) -> Self {
        if volume == VolumeUnits::UsGallons {
            MassUnits::Lb
        } else {
            MassUnits::Kg
        }
    }

    pub fn code(&self) -> i16 {
        match self {
            MassUnits::Kg => 0,
            MassUnits::Lb => 1,
        }
    }

    pub fn from_code(code: i16) -> Option<Self> {
        match code {
            0 => Some(MassUnits::Kg),
            1 => Some(MassUnits::Lb),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MassUnits::Kg => "kg",
            MassUnits::Lb => "lb",
        }
    }
}

impl FromStr for MassUnits {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "kg" => Ok(MassUnits::Kg),
            "lb" | "lbs" => Ok(MassUnits::Lb),
            _ => Err(format!("Invalid mass units: {}", s)),
        }
    }
}

impl fmt::Display for MassUnits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Acceleration/force, relative to m/s².
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ForceUnits {
    #[serde(rename = "mpss")]
    MetersPerSecSq,
    #[serde(rename = "cmpss")]
    CmPerSecSq,
    G,
    #[serde(rename = "mphps")]
    MphPerSec,
}

impl ForceUnits {
    pub fn multiplier(&self) -> f64 {
        match self {
            ForceUnits::MetersPerSecSq => 1.0,
            ForceUnits::CmPerSecSq => 100.0,
            ForceUnits::G => 0.101971621,
            ForceUnits::MphPerSec => 2.23693629,
        }
    }

    pub fn convert_from_mpss(&self, v: f64) -> f64 {
        v * self.multiplier()
    }

    pub fn convert_to_mpss(&self, v: f64) -> f64 {
        v / self.multiplier()
    }

    pub fn code(&self) -> i16 {
        match self {
            ForceUnits::MetersPerSecSq => 0,
            ForceUnits::CmPerSecSq => 1,
            ForceUnits::G => 2,
            ForceUnits::MphPerSec => 3,
        }
    }

    pub fn from_code(code: i16) -> Option<Self> {
        match code {
            0 => Some(ForceUnits::MetersPerSecSq),
            1 => Some(ForceUnits::CmPerSecSq),
            2 => Some(ForceUnits::G),
            3 => Some(ForceUnits::MphPerSec),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ForceUnits::MetersPerSecSq => "mpss",
            ForceUnits::CmPerSecSq => "cmpss",
            ForceUnits::G => "g",
            ForceUnits::MphPerSec => "mphps",
        }
    }
}

impl FromStr for ForceUnits {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "mpss" => Ok(ForceUnits::MetersPerSecSq),
            "cmpss" => Ok(ForceUnits::CmPerSecSq),
            "g" => Ok(ForceUnits::G),
            "mphps" => Ok(ForceUnits::MphPerSec),
            _ => Err(format!("Invalid force units: {}", s)),
        }
    }
}

impl fmt::Display for ForceUnits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Area, relative to m².
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AreaUnits {
    #[serde(rename = "sqm")]
    SquareMeters,
    #[serde(rename = "sqft")]
    SquareFeet,
    #[serde(rename = "sqmi")]
    SquareMiles,
    Acres,
}

impl AreaUnits {
    pub fn multiplier(&self) -> f64 {
        match self {
            AreaUnits::SquareMeters => 1.0,
            AreaUnits::SquareFeet => 10.7639104,
            AreaUnits::SquareMiles => 3.86102159e-7,
            AreaUnits::Acres => 2.47105381e-4,
        }
    }

    pub fn convert_from_sqm(&self, v: f64) -> f64 {
        v * self.multiplier()
    }

    pub fn convert_to_sqm(&self, v: f64) -> f64 {
        v / self.multiplier()
    }

    pub fn code(&self) -> i16 {
        match self {
            AreaUnits::SquareMeters => 0,
            AreaUnits::SquareFeet => 1,
            AreaUnits::SquareMiles => 2,
            AreaUnits::Acres => 3,
        }
    }

    pub fn from_code(code: i16) -> Option<Self> {
        match code {
            0 => Some(AreaUnits::SquareMeters),
            1 => Some(AreaUnits::SquareFeet),
            2 => Some(AreaUnits::SquareMiles),
            3 => Some(AreaUnits::Acres),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AreaUnits::SquareMeters => "sqm",
            AreaUnits::SquareFeet => "sqft",
            AreaUnits::SquareMiles => "sqmi",
            AreaUnits::Acres => "acres",
        }
    }
}

impl FromStr for AreaUnits {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "sqm" => Ok(AreaUnits::SquareMeters),
            "sqft" => Ok(AreaUnits::SquareFeet),
            "sqmi" => Ok(AreaUnits::SquareMiles),
            "acres" => Ok(AreaUnits::Acres),
            _ => Err(format!("Invalid area units: {}", s)),
        }
    }
}

impl fmt::Display for AreaUnits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Display currency. Stored as the ISO 4217 code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CurrencyUnits {
    Usd,
    Cad,
    Eur,
    Gbp,
    Mxn,
    Aud,
}

impl CurrencyUnits {
    pub fn iso_code(&self) -> &'static str {
        match self {
            CurrencyUnits::Usd => "usd",
            CurrencyUnits::Cad => "cad",
            CurrencyUnits::Eur => "eur",
            CurrencyUnits::Gbp => "gbp",
            CurrencyUnits::Mxn => "mxn",
            CurrencyUnits::Aud => "aud",
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            CurrencyUnits::Usd | CurrencyUnits::Cad | CurrencyUnits::Mxn | CurrencyUnits::Aud => {
                "$"
            }
            CurrencyUnits::Eur => "€",
            CurrencyUnits::Gbp => "£",
        }
    }
}

impl FromStr for CurrencyUnits {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "usd" => Ok(CurrencyUnits::Usd),
            "cad" => Ok(CurrencyUnits::Cad),
            "eur" => Ok(CurrencyUnits::Eur),
            "gbp" => Ok(CurrencyUnits::Gbp),
            "mxn" => Ok(CurrencyUnits::Mxn),
            "aud" => Ok(CurrencyUnits::Aud),
            _ => Err(format!("Invalid currency: {}", s)),
        }
    }
}

impl fmt::Display for CurrencyUnits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.iso_code())
    }
}

/// Latitude/longitude display format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LatLonFormat {
    /// Decimal degrees, e.g. `39.12345`
    Deg,
    /// Degrees/minutes/seconds, e.g. `39°7'24"`
    Dms,
    /// Degrees/decimal minutes, e.g. `39°7.41'`
    Dm,
}

impl LatLonFormat {
    pub fn code(&self) -> i16 {
        match self {
            LatLonFormat::Deg => 0,
            LatLonFormat::Dms => 1,
            LatLonFormat::Dm => 2,
        }
    }

    pub fn from_code(code: i16) -> Option<Self> {
        match code {
            0 => Some(LatLonFormat::Deg),
            1 => Some(LatLonFormat::Dms),
            2 => Some(LatLonFormat::Dm),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LatLonFormat::Deg => "deg",
            LatLonFormat::Dms => "dms",
            LatLonFormat::Dm => "dm",
        }
    }

    /// Formats a single coordinate component (latitude or longitude).
    pub fn format(&self, coord: f64) -> String {
        match self {
            LatLonFormat::Deg => format!("{:.5}", coord),
            LatLonFormat::Dms => {
                let sign = if coord < 0.0 { "-" } else { "" };
                let abs = coord.abs();
                let deg = abs.floor();
                let min = ((abs - deg) * 60.0).floor();
                let sec = (abs - deg - min / 60.0) * 3600.0;
                format!("{}{}\u{00B0}{}'{:.0}\"", sign, deg as i64, min as i64, sec)
            }
            LatLonFormat::Dm => {
                let sign = if coord < 0.0 { "-" } else { "" };
                let abs = coord.abs();
                let deg = abs.floor();
                let min = (abs - deg) * 60.0;
                format!("{}{}\u{00B0}{:.2}'", sign, deg as i64, min)
            }
        }
    }
}

impl FromStr for LatLonFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "deg" => Ok(LatLonFormat::Deg),
            "dms" => Ok(LatLonFormat::Dms),
            "dm" => Ok(LatLonFormat::Dm),
            _ => Err(format!("Invalid lat/lon format: {}", s)),
        }
    }
}

impl fmt::Display for LatLonFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Reverse-geocoding mode for an account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GeocoderMode {
    None,
    Geozone,
    Partial,
    Full,
}

impl GeocoderMode {
    /// True when any reverse-geocoding is performed.
    pub fn is_enabled(&self) -> bool {
        *self != GeocoderMode::None
    }

    /// True when full address lookups are performed.
    pub fn is_full(&self) -> bool {
        *self == GeocoderMode::Full
    }

    pub fn code(&self) -> i16 {
        match self {
            GeocoderMode::None => 0,
            GeocoderMode::Geozone => 1,
            GeocoderMode::Partial => 2,
            GeocoderMode::Full => 3,
        }
    }

    pub fn from_code(code: i16) -> Option<Self> {
        match code {
            0 => Some(GeocoderMode::None),
            1 => Some(GeocoderMode::Geozone),
            2 => Some(GeocoderMode::Partial),
            3 => Some(GeocoderMode::Full),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            GeocoderMode::None => "none",
            GeocoderMode::Geozone => "geozone",
            GeocoderMode::Partial => "partial",
            GeocoderMode::Full => "full",
        }
    }
}

impl FromStr for GeocoderMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "none" => Ok(GeocoderMode::None),
            "geozone" => Ok(GeocoderMode::Geozone),
            "partial" => Ok(GeocoderMode::Partial),
            "full" => Ok(GeocoderMode::Full),
            _ => Err(format!("Invalid geocoder mode: {}", s)),
        }
    }
}

impl fmt::Display for GeocoderMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
