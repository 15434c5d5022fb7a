//! Core record types for driverboard.
//!
//! This module defines the driver record as the backend returns it, the five
//! user-editable fields, and the request body sent on create and update.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

/// Server-assigned identifier of a driver record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DriverId(pub u64);

impl fmt::Display for DriverId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for DriverId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(Self)
    }
}

/// Number of races won, kept as the text the user typed.
///
/// The backend stores whatever it is sent, so it may come back as a JSON
/// string or a JSON number. It is always sent as a string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "RawRacesWon", into = "String")]
pub struct RacesWon(String);

#[derive(Deserialize)]
#[serde(untagged)]
enum RawRacesWon {
    Text(String),
    Integer(i64),
    Float(f64),
}

impl From<RawRacesWon> for RacesWon {
    fn from(raw: RawRacesWon) -> Self {
        match raw {
            RawRacesWon::Text(text) => Self(text),
            RawRacesWon::Integer(n) => Self(n.to_string()),
            RawRacesWon::Float(n) => Self(n.to_string()),
        }
    }
}

impl From<RacesWon> for String {
    fn from(value: RacesWon) -> Self {
        value.0
    }
}

impl From<String> for RacesWon {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for RacesWon {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl RacesWon {
    /// The value as entered.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RacesWon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Creation time of a record, kept exactly as the backend sent it.
///
/// The parsed instant drives relative times. The original text is what gets
/// written back on update, so precision and offset survive a save.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CreatedAt {
    raw: String,
    at: DateTime<Utc>,
}

impl CreatedAt {
    /// Stamp a new record, formatted as `2024-05-01T12:00:00.000Z`.
    #[must_use]
    pub fn new(at: DateTime<Utc>) -> Self {
        Self {
            raw: at.to_rfc3339_opts(SecondsFormat::Millis, true),
            at,
        }
    }

    /// Parse a backend value, keeping its text.
    ///
    /// # Errors
    ///
    /// Fails if the value is not an RFC 3339 timestamp.
    pub fn parse(raw: impl Into<String>) -> Result<Self, chrono::ParseError> {
        let raw = raw.into();
        let at = DateTime::parse_from_rfc3339(&raw)?.with_timezone(&Utc);
        Ok(Self { raw, at })
    }

    /// The instant, in UTC.
    #[must_use]
    pub fn instant(&self) -> DateTime<Utc> {
        self.at
    }

    /// The value as it is sent on the wire.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

impl From<DateTime<Utc>> for CreatedAt {
    fn from(at: DateTime<Utc>) -> Self {
        Self::new(at)
    }
}

impl fmt::Display for CreatedAt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl Serialize for CreatedAt {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.raw)
    }
}

impl<'de> Deserialize<'de> for CreatedAt {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Self::parse(raw).map_err(de::Error::custom)
    }
}

// json-server stores whatever it is sent, `null` included.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// A driver record as stored by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Driver {
    /// Server-assigned identifier.
    pub id: DriverId,
    /// Driver name.
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    /// Races won.
    #[serde(default, deserialize_with = "null_as_default")]
    pub races_won: RacesWon,
    /// Favorite track.
    #[serde(default, deserialize_with = "null_as_default")]
    pub fav_track: String,
    /// Racing team.
    #[serde(default, deserialize_with = "null_as_default")]
    pub team_name: String,
    /// URL of the driver's photo.
    #[serde(default, rename = "photoURL", deserialize_with = "null_as_default")]
    pub photo_url: String,
    /// When the record was first created. Never changes after creation.
    pub created_at: CreatedAt,
}

impl Driver {
    /// The five user-editable values as they are displayed.
    #[must_use]
    pub fn fields(&self) -> DriverFields {
        DriverFields {
            name: self.name.clone(),
            races_won: self.races_won.as_str().to_string(),
            fav_track: self.fav_track.clone(),
            team_name: self.team_name.clone(),
            photo_url: self.photo_url.clone(),
        }
    }
}

/// One of the five user-editable fields of a driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    /// Driver name.
    Name,
    /// Races won.
    RacesWon,
    /// Favorite track.
    FavTrack,
    /// Racing team.
    TeamName,
    /// Photo URL.
    PhotoUrl,
}

impl Field {
    /// All fields in display order.
    pub const ALL: [Self; 5] = [
        Self::Name,
        Self::RacesWon,
        Self::FavTrack,
        Self::TeamName,
        Self::PhotoUrl,
    ];

    /// Input name used by the creation form and the edit inputs.
    #[must_use]
    pub fn input_name(self) -> &'static str {
        match self {
            Self::Name => "driverName",
            Self::RacesWon => "racesWon",
            Self::FavTrack => "favTrack",
            Self::TeamName => "teamName",
            Self::PhotoUrl => "photoURL",
        }
    }

    /// Heading shown above the value on a card.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Name => "Driver Name",
            Self::RacesWon => "Number Of Races Won",
            Self::FavTrack => "Favorite Track",
            Self::TeamName => "Racing Team",
            Self::PhotoUrl => "Photo",
        }
    }

    /// Look a field up by its input name.
    #[must_use]
    pub fn from_input_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.input_name() == name)
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.input_name())
    }
}

/// The five user-editable values, all as raw text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DriverFields {
    /// Driver name.
    pub name: String,
    /// Races won, unparsed.
    pub races_won: String,
    /// Favorite track.
    pub fav_track: String,
    /// Racing team.
    pub team_name: String,
    /// Photo URL.
    pub photo_url: String,
}

impl DriverFields {
    /// Read one field.
    #[must_use]
    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::Name => &self.name,
            Field::RacesWon => &self.races_won,
            Field::FavTrack => &self.fav_track,
            Field::TeamName => &self.team_name,
            Field::PhotoUrl => &self.photo_url,
        }
    }

    /// Overwrite one field.
    pub fn set(&mut self, field: Field, value: impl Into<String>) {
        let value = value.into();
        match field {
            Field::Name => self.name = value,
            Field::RacesWon => self.races_won = value,
            Field::FavTrack => self.fav_track = value,
            Field::TeamName => self.team_name = value,
            Field::PhotoUrl => self.photo_url = value,
        }
    }
}

/// Body of `POST /drivers` and `PUT /drivers/:id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DriverPayload {
    /// Driver name.
    pub name: String,
    /// Races won, sent as typed.
    pub races_won: RacesWon,
    /// Favorite track.
    pub fav_track: String,
    /// Racing team.
    pub team_name: String,
    /// Photo URL.
    #[serde(rename = "photoURL")]
    pub photo_url: String,
    /// Creation time: now for a new record, the original value on update.
    pub created_at: CreatedAt,
}

impl DriverPayload {
    /// Build a payload from field values and a creation time.
    #[must_use]
    pub fn new(fields: DriverFields, created_at: CreatedAt) -> Self {
        Self {
            name: fields.name,
            races_won: RacesWon::from(fields.races_won),
            fav_track: fields.fav_track,
            team_name: fields.team_name,
            photo_url: fields.photo_url,
            created_at,
        }
    }
}
