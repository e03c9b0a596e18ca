//! Categorical dimensions that frequency tables can be built over.

use crate::types::{AccidentRecord, Column};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dimension {
    DayOfWeek,
    Month,
    Severity,
    District,
    UrbanOrRural,
    LightConditions,
    WeatherConditions,
    RoadSurfaceConditions,
    VehicleType,
    Casualties,
    Vehicles,
    JunctionControl,
    SpeedLimit,
}

impl Dimension {
    /// Column the dimension is read or derived from.
    pub fn source_column(self) -> Column {
        match self {
            Dimension::DayOfWeek | Dimension::Month => Column::AccidentDate,
            Dimension::Severity => Column::AccidentSeverity,
            Dimension::District => Column::LocalAuthorityDistrict,
            Dimension::UrbanOrRural => Column::UrbanOrRuralArea,
            Dimension::LightConditions => Column::LightConditions,
            Dimension::WeatherConditions => Column::WeatherConditions,
            Dimension::RoadSurfaceConditions => Column::RoadSurfaceConditions,
            Dimension::VehicleType => Column::VehicleType,
            Dimension::Casualties => Column::NumberOfCasualties,
            Dimension::Vehicles => Column::NumberOfVehicles,
            Dimension::JunctionControl => Column::JunctionControl,
            Dimension::SpeedLimit => Column::SpeedLimit,
        }
    }

    /// Label used as the value column header in exports.
    pub fn label(self) -> &'static str {
        match self {
            Dimension::DayOfWeek => "Day",
            Dimension::Month => "Month",
            other => other.source_column().header(),
        }
    }

    /// Value of this dimension for one record, `None` when missing.
    pub fn value(self, record: &AccidentRecord) -> Option<String> {
        match self {
            Dimension::DayOfWeek => record.day.map(str::to_string),
            Dimension::Month => record.month.map(str::to_string),
            Dimension::Severity => record.severity.clone(),
            Dimension::District => record.district.clone(),
            Dimension::UrbanOrRural => record.urban_or_rural.clone(),
            Dimension::LightConditions => record.light_conditions.clone(),
            Dimension::WeatherConditions => record.weather_conditions.clone(),
            Dimension::RoadSurfaceConditions => record.road_surface_conditions.clone(),
            Dimension::VehicleType => record.vehicle_type.clone(),
            Dimension::Casualties => record.casualties.map(|n| n.to_string()),
            Dimension::Vehicles => record.vehicles.map(|n| n.to_string()),
            Dimension::JunctionControl => record.junction_control.clone(),
            Dimension::SpeedLimit => record.speed_limit.map(|n| n.to_string()),
        }
    }
}
