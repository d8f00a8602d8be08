//! Data transfer objects for web requests and responses.
//!
//! Field names are camelCase on the wire. Request fields are optional at
//! the serde level so a missing field can be reported as a validation
//! failure rather than a parse failure.

use serde::{Deserialize, Serialize};

use crate::domain::{Station, StationId};
use crate::service::{LineUpdate, LineView, NewLine, NewSection};

/// A required request field was absent.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{0} is required")]
pub struct MissingField(pub &'static str);

fn required<T>(field: &'static str, value: Option<T>) -> Result<T, MissingField> {
    value.ok_or(MissingField(field))
}

/// Request to register a station.
#[derive(Debug, Deserialize)]
pub struct CreateStationRequest {
    /// Station name
    pub name: Option<String>,
}

impl CreateStationRequest {
    /// Extract the station name.
    pub fn into_name(self) -> Result<String, MissingField> {
        required("name", self.name)
    }
}

/// A station in responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StationResponse {
    /// Station id
    pub id: u64,

    /// Station name
    pub name: String,
}

/// Request to create a line with its first section.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateLineRequest {
    /// Line name, unique across lines
    pub name: Option<String>,

    /// Display color (e.g. "bg-red-900")
    pub color: Option<String>,

    /// Upstream end of the first section
    pub up_station_id: Option<u64>,

    /// Downstream end of the first section
    pub down_station_id: Option<u64>,

    /// Length of the first section
    pub distance: Option<i64>,
}

impl CreateLineRequest {
    /// Check that every field is present.
    pub fn into_new_line(self) -> Result<NewLine, MissingField> {
        Ok(NewLine {
            name: required("name", self.name)?,
            color: required("color", self.color)?,
            up_station: StationId(required("upStationId", self.up_station_id)?),
            down_station: StationId(required("downStationId", self.down_station_id)?),
            distance: required("distance", self.distance)?,
        })
    }
}

/// Request to change a line's name and/or color.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateLineRequest {
    /// New name
    pub name: Option<String>,

    /// New color
    pub color: Option<String>,
}

impl From<UpdateLineRequest> for LineUpdate {
    fn from(req: UpdateLineRequest) -> Self {
        LineUpdate {
            name: req.name,
            color: req.color,
        }
    }
}

/// Request to register a section on a line.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSectionRequest {
    /// Upstream station of the new section
    pub up_station_id: Option<u64>,

    /// Downstream station of the new section
    pub down_station_id: Option<u64>,

    /// Section length
    pub distance: Option<i64>,
}

impl CreateSectionRequest {
    /// Check that every field is present.
    pub fn into_new_section(self) -> Result<NewSection, MissingField> {
        Ok(NewSection {
            up_station: StationId(required("upStationId", self.up_station_id)?),
            down_station: StationId(required("downStationId", self.down_station_id)?),
            distance: required("distance", self.distance)?,
        })
    }
}

/// Query string for removing a line's last station.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoveSectionQuery {
    /// Station to remove; must be the line's last station
    pub station_id: Option<u64>,
}

impl RemoveSectionQuery {
    /// Extract the station to remove.
    pub fn into_station(self) -> Result<StationId, MissingField> {
        required("stationId", self.station_id).map(StationId)
    }
}

/// A line with its stations in order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineResponse {
    /// Line id
    pub id: u64,

    /// Line name
    pub name: String,

    /// Line color
    pub color: String,

    /// Stations from first to last
    pub stations: Vec<StationResponse>,
}

/// Error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
}

// Conversion implementations

impl From<&Station> for StationResponse {
    fn from(station: &Station) -> Self {
        StationResponse {
            id: station.id().get(),
            name: station.name().to_string(),
        }
    }
}

impl From<LineView> for LineResponse {
    fn from(view: LineView) -> Self {
        LineResponse {
            id: view.id.get(),
            name: view.name,
            color: view.color,
            stations: view.stations.iter().map(StationResponse::from).collect(),
        }
    }
}
