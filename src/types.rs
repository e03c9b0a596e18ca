use crate::calendar::{self, CalendarFields};
use crate::util::{clean_text, parse_count_safe};
use chrono::NaiveDate;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use tabled::Tabled;

/// Known columns of the accident attribute table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Column {
    AccidentDate,
    AccidentSeverity,
    NumberOfCasualties,
    NumberOfVehicles,
    LocalAuthorityDistrict,
    UrbanOrRuralArea,
    LightConditions,
    WeatherConditions,
    RoadSurfaceConditions,
    VehicleType,
    JunctionControl,
    SpeedLimit,
}

static COLUMNS_BY_HEADER: Lazy<HashMap<&'static str, Column>> =
    Lazy::new(|| Column::ALL.iter().map(|c| (c.header(), *c)).collect());

impl Column {
    pub const ALL: [Column; 12] = [
        Column::AccidentDate,
        Column::AccidentSeverity,
        Column::NumberOfCasualties,
        Column::NumberOfVehicles,
        Column::LocalAuthorityDistrict,
        Column::UrbanOrRuralArea,
        Column::LightConditions,
        Column::WeatherConditions,
        Column::RoadSurfaceConditions,
        Column::VehicleType,
        Column::JunctionControl,
        Column::SpeedLimit,
    ];

    /// Header text as it appears in the input file.
    pub fn header(self) -> &'static str {
        match self {
            Column::AccidentDate => "Accident Date",
            Column::AccidentSeverity => "Accident_Severity",
            Column::NumberOfCasualties => "Number_of_Casualties",
            Column::NumberOfVehicles => "Number_of_Vehicles",
            Column::LocalAuthorityDistrict => "Local_Authority_(District)",
            Column::UrbanOrRuralArea => "Urban_or_Rural_Area",
            Column::LightConditions => "Light_Conditions",
            Column::WeatherConditions => "Weather_Conditions",
            Column::RoadSurfaceConditions => "Road_Surface_Conditions",
            Column::VehicleType => "Vehicle_Type",
            Column::JunctionControl => "Junction_Control",
            Column::SpeedLimit => "Speed_limit",
        }
    }

    pub fn from_header(header: &str) -> Option<Column> {
        COLUMNS_BY_HEADER.get(header.trim()).copied()
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.header())
    }
}

/// One CSV row as read from disk; every cell is optional text.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawRow {
    #[serde(rename = "Accident Date", default)]
    pub accident_date: Option<String>,
    #[serde(rename = "Accident_Severity", default)]
    pub accident_severity: Option<String>,
    #[serde(rename = "Number_of_Casualties", default)]
    pub number_of_casualties: Option<String>,
    #[serde(rename = "Number_of_Vehicles", default)]
    pub number_of_vehicles: Option<String>,
    #[serde(rename = "Local_Authority_(District)", default)]
    pub local_authority_district: Option<String>,
    #[serde(rename = "Urban_or_Rural_Area", default)]
    pub urban_or_rural_area: Option<String>,
    #[serde(rename = "Light_Conditions", default)]
    pub light_conditions: Option<String>,
    #[serde(rename = "Weather_Conditions", default)]
    pub weather_conditions: Option<String>,
    #[serde(rename = "Road_Surface_Conditions", default)]
    pub road_surface_conditions: Option<String>,
    #[serde(rename = "Vehicle_Type", default)]
    pub vehicle_type: Option<String>,
    #[serde(rename = "Junction_Control", default)]
    pub junction_control: Option<String>,
    #[serde(rename = "Speed_limit", default)]
    pub speed_limit: Option<String>,
}

/// A cleaned accident record with derived calendar fields.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AccidentRecord {
    pub date: Option<NaiveDate>,
    pub year: Option<i32>,
    pub month: Option<&'static str>,
    pub day: Option<&'static str>,
    pub severity: Option<String>,
    pub casualties: Option<i64>,
    pub vehicles: Option<i64>,
    pub district: Option<String>,
    pub urban_or_rural: Option<String>,
    pub light_conditions: Option<String>,
    pub weather_conditions: Option<String>,
    pub road_surface_conditions: Option<String>,
    pub vehicle_type: Option<String>,
    pub junction_control: Option<String>,
    pub speed_limit: Option<i64>,
}

impl AccidentRecord {
    pub fn from_raw(row: RawRow) -> Self {
        let CalendarFields {
            date,
            year,
            month,
            day,
        } = calendar::derive(row.accident_date.as_deref());
        Self {
            date,
            year,
            month,
            day,
            severity: clean_text(row.accident_severity.as_deref()),
            casualties: parse_count_safe(row.number_of_casualties.as_deref()),
            vehicles: parse_count_safe(row.number_of_vehicles.as_deref()),
            district: clean_text(row.local_authority_district.as_deref()),
            urban_or_rural: clean_text(row.urban_or_rural_area.as_deref()),
            light_conditions: clean_text(row.light_conditions.as_deref()),
            weather_conditions: clean_text(row.weather_conditions.as_deref()),
            road_surface_conditions: clean_text(row.road_surface_conditions.as_deref()),
            vehicle_type: clean_text(row.vehicle_type.as_deref()),
            junction_control: clean_text(row.junction_control.as_deref()),
            speed_limit: parse_count_safe(row.speed_limit.as_deref()),
        }
    }
}

#[derive(Debug, Serialize, Tabled, Clone, PartialEq)]
pub struct FrequencyRow {
    #[serde(rename = "Value")]
    #[tabled(rename = "Value")]
    pub value: String,
    #[serde(rename = "Count")]
    #[tabled(rename = "Count")]
    pub count: usize,
    #[serde(rename = "Share")]
    #[tabled(rename = "Share")]
    pub share: String,
}

#[derive(Debug, Serialize, Tabled, Clone, PartialEq)]
pub struct MonthlyRow {
    #[serde(rename = "Date")]
    #[tabled(rename = "Date")]
    pub date: NaiveDate,
    #[serde(rename = "Accidents")]
    #[tabled(rename = "Accidents")]
    pub accidents: usize,
}

#[derive(Debug, Serialize, Tabled, Clone, PartialEq)]
pub struct SeverityMonthlyRow {
    #[serde(rename = "Date")]
    #[tabled(rename = "Date")]
    pub date: NaiveDate,
    #[serde(rename = "Accident_Severity")]
    #[tabled(rename = "Accident_Severity")]
    pub severity: String,
    #[serde(rename = "Accidents")]
    #[tabled(rename = "Accidents")]
    pub accidents: usize,
}

#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq, Default)]
pub struct SummaryMetrics {
    pub total_accidents: usize,
    pub total_casualties: i64,
    pub total_vehicles: i64,
    pub unique_districts: usize,
}
