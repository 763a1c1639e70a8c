use serde::{Deserialize, Serialize};

/// Identifier of a track. Saves use both JSON strings and numbers.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct TrackId(pub String);

impl TrackId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    fn unnamed() -> Self {
        Self(String::new())
    }
}

impl<'de> Deserialize<'de> for TrackId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Str(String),
            Num(serde_json::Number),
        }

        Ok(match Repr::deserialize(deserializer)? {
            Repr::Str(s) => Self(s),
            Repr::Num(n) => Self(n.to_string()),
        })
    }
}

/// A `[longitude, latitude]` position in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coord {
    pub lon: f64,
    pub lat: f64,
}

impl Coord {
    pub const fn new(lon: f64, lat: f64) -> Self {
        Self { lon, lat }
    }

    pub fn is_finite(self) -> bool {
        self.lon.is_finite() && self.lat.is_finite()
    }
}

impl Serialize for Coord {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        [self.lon, self.lat].serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Coord {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let v = Vec::<f64>::deserialize(deserializer)?;
        match v.as_slice() {
            // Trailing values (altitude etc.) are ignored.
            [lon, lat, ..] => Ok(Self::new(*lon, *lat)),
            _ => Err(serde::de::Error::custom(
                "coordinate must be an array [lon, lat]",
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    #[serde(default = "TrackId::unnamed")]
    pub id: TrackId,
    #[serde(default)]
    pub coords: Vec<Coord>,
}

impl Track {
    pub fn new(id: impl Into<String>, coords: Vec<Coord>) -> Self {
        Self {
            id: TrackId::new(id),
            coords,
        }
    }
}

/// How many physical lanes a track group models.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LaneType {
    Parallel,
    Quad,
    /// Also what unrecognized lane types read as.
    #[default]
    #[serde(other)]
    Single,
}

impl LaneType {
    /// Share of a segment's length credited to each member track.
    pub fn divisor(self) -> u32 {
        match self {
            Self::Single => 1,
            Self::Parallel => 2,
            Self::Quad => 4,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackGroup {
    #[serde(default, alias = "type", alias = "lanes")]
    pub lane_type: LaneType,
    #[serde(default, alias = "tracks", alias = "trackIDs")]
    pub track_ids: Vec<TrackId>,
}

impl TrackGroup {
    pub fn new(lane_type: LaneType, ids: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            lane_type,
            track_ids: ids.into_iter().map(TrackId::new).collect(),
        }
    }
}
