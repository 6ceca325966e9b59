//! Closed enumerations shared by requests and decoded records.
//!
//! # Design
//! The service sends and accepts plain strings for categories, breast sides
//! and units. Each is represented here as a closed enum with an explicit
//! wire string; decoding an unknown string is an error, never a default.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

/// Event category of a logged transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatType {
    Wet,
    Feeding,
    Stool,
    Weight,
    Note,
    Sleep,
    Pumping,
    Kick,
}

impl StatType {
    pub const ALL: [StatType; 8] = [
        StatType::Wet,
        StatType::Feeding,
        StatType::Stool,
        StatType::Weight,
        StatType::Note,
        StatType::Sleep,
        StatType::Pumping,
        StatType::Kick,
    ];

    /// Category label as it appears in event names (`AddWet`, `RemoveWet`).
    pub fn as_str(self) -> &'static str {
        match self {
            StatType::Wet => "Wet",
            StatType::Feeding => "Feeding",
            StatType::Stool => "Stool",
            StatType::Weight => "Weight",
            StatType::Note => "Note",
            StatType::Sleep => "Sleep",
            StatType::Pumping => "Pumping",
            StatType::Kick => "Kick",
        }
    }
}

impl fmt::Display for StatType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StatType {
    type Err = ();

    /// Case-sensitive match against the category labels.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        StatType::ALL
            .into_iter()
            .find(|stat| stat.as_str() == s)
            .ok_or(())
    }
}

/// Which side a feeding or pumping session used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BreastSide {
    #[default]
    Unspecified,
    Left,
    Right,
    Both,
}

impl BreastSide {
    pub fn as_str(self) -> &'static str {
        match self {
            BreastSide::Unspecified => "",
            BreastSide::Left => "left",
            BreastSide::Right => "right",
            BreastSide::Both => "both",
        }
    }
}

impl FromStr for BreastSide {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "" => Ok(BreastSide::Unspecified),
            "left" => Ok(BreastSide::Left),
            "right" => Ok(BreastSide::Right),
            "both" => Ok(BreastSide::Both),
            _ => Err(()),
        }
    }
}

impl Serialize for BreastSide {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Unit for bottle and pumping amounts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum UnitOfMeasurement {
    #[default]
    None,
    Ounces,
    Millilitres,
}

impl UnitOfMeasurement {
    pub fn as_str(self) -> &'static str {
        match self {
            UnitOfMeasurement::None => "",
            UnitOfMeasurement::Ounces => "oz",
            UnitOfMeasurement::Millilitres => "ml",
        }
    }
}

impl FromStr for UnitOfMeasurement {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "" => Ok(UnitOfMeasurement::None),
            "oz" => Ok(UnitOfMeasurement::Ounces),
            "ml" => Ok(UnitOfMeasurement::Millilitres),
            _ => Err(()),
        }
    }
}

impl Serialize for UnitOfMeasurement {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}
