use crate::aggregate::{
    frequency_count, monthly_count, monthly_severity_count, summarize, FrequencyTable,
    MonthlySeries, SeverityMonthlySeries,
};
use crate::dimension::Dimension;
use crate::filter::{filter_records, FilterSelection};
use crate::loader::Dataset;
use crate::types::{AccidentRecord, Column, SummaryMetrics};
use serde::Serialize;
use tracing::{debug, info};

/// What a section plots.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionKind {
    Monthly,
    MonthlyBySeverity,
    Frequency(Dimension),
}

impl SectionKind {
    /// Columns the section reads, in the order they are reported when missing.
    fn required_columns(self) -> Vec<Column> {
        match self {
            SectionKind::Monthly => vec![Column::AccidentDate],
            SectionKind::MonthlyBySeverity => vec![Column::AccidentSeverity, Column::AccidentDate],
            SectionKind::Frequency(d) => vec![d.source_column()],
        }
    }

    fn uses_severity(self) -> bool {
        self.required_columns().contains(&Column::AccidentSeverity)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct SectionSpec {
    pub key: &'static str,
    pub heading: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub kind: SectionKind,
}

/// Dashboard sections in display order.
pub const SECTIONS: [SectionSpec; 15] = [
    SectionSpec {
        key: "accidents_over_time",
        heading: "Time-Based Analysis",
        title: "Accidents Over Time",
        description: "Number of accidents per month over the selected period.",
        kind: SectionKind::Monthly,
    },
    SectionSpec {
        key: "accidents_by_day",
        heading: "Time-Based Analysis",
        title: "Accidents by Day of the Week",
        description: "Number of accidents occurring on each day of the week.",
        kind: SectionKind::Frequency(Dimension::DayOfWeek),
    },
    SectionSpec {
        key: "accidents_by_month",
        heading: "Time-Based Analysis",
        title: "Accidents by Month",
        description: "Number of accidents for each month name across all years.",
        kind: SectionKind::Frequency(Dimension::Month),
    },
    SectionSpec {
        key: "severity_distribution",
        heading: "Severity Analysis",
        title: "Accident Severity Distribution",
        description: "Proportion of accidents by severity.",
        kind: SectionKind::Frequency(Dimension::Severity),
    },
    SectionSpec {
        key: "severity_over_time",
        heading: "Severity Analysis",
        title: "Accidents by Severity Over Time",
        description: "Accidents per month split by severity.",
        kind: SectionKind::MonthlyBySeverity,
    },
    SectionSpec {
        key: "accidents_by_district",
        heading: "Location Analysis",
        title: "Accidents by Local Authority (District)",
        description: "Number of accidents by district.",
        kind: SectionKind::Frequency(Dimension::District),
    },
    SectionSpec {
        key: "urban_or_rural",
        heading: "Location Analysis",
        title: "Urban or Rural Area",
        description: "Number of accidents in urban and rural areas.",
        kind: SectionKind::Frequency(Dimension::UrbanOrRural),
    },
    SectionSpec {
        key: "light_conditions",
        heading: "Environmental Conditions",
        title: "Accidents by Light Conditions",
        description: "Number of accidents under each light condition.",
        kind: SectionKind::Frequency(Dimension::LightConditions),
    },
    SectionSpec {
        key: "weather_conditions",
        heading: "Environmental Conditions",
        title: "Accidents by Weather Conditions",
        description: "Number of accidents under each weather condition.",
        kind: SectionKind::Frequency(Dimension::WeatherConditions),
    },
    SectionSpec {
        key: "road_surface_conditions",
        heading: "Environmental Conditions",
        title: "Accidents by Road Surface Conditions",
        description: "Number of accidents on each road surface condition.",
        kind: SectionKind::Frequency(Dimension::RoadSurfaceConditions),
    },
    SectionSpec {
        key: "vehicle_type",
        heading: "Vehicle and Casualty Analysis",
        title: "Accidents by Vehicle Type",
        description: "Number of accidents involving each vehicle type.",
        kind: SectionKind::Frequency(Dimension::VehicleType),
    },
    SectionSpec {
        key: "casualties_per_accident",
        heading: "Vehicle and Casualty Analysis",
        title: "Number of Casualties",
        description: "How many accidents had each exact number of casualties.",
        kind: SectionKind::Frequency(Dimension::Casualties),
    },
    SectionSpec {
        key: "vehicles_per_accident",
        heading: "Vehicle and Casualty Analysis",
        title: "Number of Vehicles Involved",
        description: "How many accidents involved each exact number of vehicles.",
        kind: SectionKind::Frequency(Dimension::Vehicles),
    },
    SectionSpec {
        key: "junction_control",
        heading: "Additional Insights",
        title: "Accidents by Junction Control",
        description: "Number of accidents at each type of junction control.",
        kind: SectionKind::Frequency(Dimension::JunctionControl),
    },
    SectionSpec {
        key: "speed_limit",
        heading: "Additional Insights",
        title: "Accidents by Speed Limit",
        description: "Number of accidents in areas with each speed limit.",
        kind: SectionKind::Frequency(Dimension::SpeedLimit),
    },
];

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "rows", rename_all = "snake_case")]
pub enum SectionContent {
    Monthly(MonthlySeries),
    MonthlyBySeverity(SeverityMonthlySeries),
    Frequency(FrequencyTable),
    Skipped { missing_column: &'static str },
}

impl SectionContent {
    pub fn is_skipped(&self) -> bool {
        matches!(self, SectionContent::Skipped { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardSection {
    pub key: &'static str,
    pub heading: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    /// Header for the value column in exports.
    pub label: &'static str,
    pub content: SectionContent,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dashboard {
    pub selection: FilterSelection,
    pub summary: SummaryMetrics,
    pub notices: Vec<String>,
    pub sections: Vec<DashboardSection>,
}

impl Dashboard {
    pub fn section(&self, key: &str) -> Option<&DashboardSection> {
        self.sections.iter().find(|s| s.key == key)
    }
}

pub fn missing_column_notice(column: Column) -> String {
    format!("Column '{}' not found in the dataset.", column)
}

fn build_section(
    spec: &SectionSpec,
    dataset: &Dataset,
    filtered: &[AccidentRecord],
) -> DashboardSection {
    let missing = spec
        .kind
        .required_columns()
        .into_iter()
        .find(|c| !dataset.has_column(*c));
    let content = if let Some(column) = missing {
        debug!(section = spec.key, column = column.header(), "Skipping section");
        SectionContent::Skipped {
            missing_column: column.header(),
        }
    } else {
        match spec.kind {
            SectionKind::Monthly => SectionContent::Monthly(monthly_count(filtered)),
            SectionKind::MonthlyBySeverity => {
                SectionContent::MonthlyBySeverity(monthly_severity_count(filtered))
            }
            SectionKind::Frequency(d) => SectionContent::Frequency(frequency_count(filtered, d)),
        }
    };
    let label = match spec.kind {
        SectionKind::Frequency(d) => d.label(),
        SectionKind::Monthly | SectionKind::MonthlyBySeverity => "Date",
    };
    DashboardSection {
        key: spec.key,
        heading: spec.heading,
        title: spec.title,
        description: spec.description,
        label,
        content,
    }
}

/// Filter the dataset and recompute every section and the summary.
pub fn build_dashboard(dataset: &Dataset, selection: &FilterSelection) -> Dashboard {
    let filtered = filter_records(dataset.records(), selection);

    let mut notices: Vec<String> = dataset
        .missing_columns()
        .into_iter()
        .map(missing_column_notice)
        .collect();
    if filtered.is_empty() {
        notices.push("No accidents match the current selection.".to_string());
    }

    // Severity sections are omitted entirely without the column.
    let sections: Vec<DashboardSection> = SECTIONS
        .iter()
        .filter(|spec| dataset.has_column(Column::AccidentSeverity) || !spec.kind.uses_severity())
        .map(|spec| build_section(spec, dataset, &filtered))
        .collect();

    let summary = summarize(&filtered);
    info!(
        accidents = summary.total_accidents,
        casualties = summary.total_casualties,
        sections = sections.iter().filter(|s| !s.content.is_skipped()).count(),
        "Dashboard recomputed"
    );

    Dashboard {
        selection: selection.clone(),
        summary,
        notices,
        sections,
    }
}
