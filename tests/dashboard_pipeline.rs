use accident_dashboard::aggregate::{frequency_count, summarize};
use accident_dashboard::dimension::Dimension;
use accident_dashboard::output::export_dashboard;
use accident_dashboard::reports::SectionContent;
use accident_dashboard::{
    filter_records, load_dataset, Column, Error, FilterSelection, Session,
};
use chrono::NaiveDate;
use std::fs;
use std::io::Write;
use std::sync::Arc;
use tempfile::NamedTempFile;

const FULL_HEADER: &str = "Accident Date,Accident_Severity,Number_of_Casualties,Number_of_Vehicles,\
Local_Authority_(District),Urban_or_Rural_Area,Light_Conditions,Weather_Conditions,\
Road_Surface_Conditions,Vehicle_Type,Junction_Control,Speed_limit";

fn write_fixture(header: &str, rows: &[&str]) -> NamedTempFile {
    let mut f = NamedTempFile::new().unwrap();
    writeln!(f, "{}", header).unwrap();
    for row in rows {
        writeln!(f, "{}", row).unwrap();
    }
    f.flush().unwrap();
    f
}

fn full_fixture() -> NamedTempFile {
    write_fixture(
        FULL_HEADER,
        &[
            "2020-01-05,Fatal,1,2,Leeds,Urban,Daylight,Fine no high winds,Dry,Car,Give way or uncontrolled,30",
            "2020-01-20,Slight,2,1,York,Rural,Darkness - no lighting,Raining no high winds,Wet or damp,Motorcycle over 500cc,Auto traffic signal,60",
            "2020-02-01,Serious,1,2,Leeds,Urban,Daylight,Fine no high winds,Dry,Car,,30",
            "2021-03-10,Fatal,3,3,Bradford,Urban,Daylight,Snowing no high winds,Snow,Van / Goods 3.5 tonnes mgw or under,Give way or uncontrolled,40",
            "not recorded,Slight,1,1,Leeds,Urban,Daylight,Fine no high winds,Dry,Car,Give way or uncontrolled,30",
        ],
    )
}

#[test]
fn test_load_and_render_defaults() {
    let f = full_fixture();
    let (ds, report) = load_dataset(f.path()).unwrap();
    assert_eq!(report.loaded_rows, 5);
    assert_eq!(report.null_dates, 1);
    assert!(ds.missing_columns().is_empty());

    let session = Session::new(Arc::new(ds));
    let dash = session.render();

    // The undated row cannot match any year.
    assert_eq!(dash.summary.total_accidents, 4);
    assert_eq!(dash.summary.total_casualties, 7);
    assert_eq!(dash.summary.total_vehicles, 8);
    assert_eq!(dash.summary.unique_districts, 3);
    assert_eq!(dash.sections.len(), 15);

    match &dash.section("junction_control").unwrap().content {
        SectionContent::Frequency(t) => {
            assert_eq!(t.missing(), 1);
            assert_eq!(t.get(Some("Give way or uncontrolled")), 2);
            assert_eq!(t.total(), 4);
        }
        other => panic!("unexpected {:?}", other),
    }
    match &dash.section("severity_over_time").unwrap().content {
        SectionContent::MonthlyBySeverity(s) => {
            let jan = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
            assert_eq!(s.get(jan, "Fatal"), 1);
            assert_eq!(s.get(jan, "Slight"), 1);
            assert_eq!(s.len(), 4);
        }
        other => panic!("unexpected {:?}", other),
    }
}

#[test]
fn test_filter_change_recomputes_everything() {
    let f = full_fixture();
    let (ds, _) = load_dataset(f.path()).unwrap();
    let mut session = Session::new(Arc::new(ds));

    session.set_years([2020]);
    session.set_severities(["Fatal".to_string(), "Serious".to_string()]);
    let dash = session.render();
    assert_eq!(dash.summary.total_accidents, 2);
    assert_eq!(dash.summary.total_casualties, 2);
    assert_eq!(dash.summary.unique_districts, 1);

    match &dash.section("accidents_by_month").unwrap().content {
        SectionContent::Frequency(t) => {
            assert_eq!(t.get(Some("January")), 1);
            assert_eq!(t.get(Some("February")), 1);
        }
        other => panic!("unexpected {:?}", other),
    }
}

#[test]
fn test_severity_column_absent() {
    let f = write_fixture(
        "Accident Date,Number_of_Casualties,Local_Authority_(District)",
        &["2020-01-05,1,Leeds", "2020-06-05,2,York", "2021-01-01,1,Leeds"],
    );
    let (ds, _) = load_dataset(f.path()).unwrap();
    assert!(!ds.has_column(Column::AccidentSeverity));

    let sel = FilterSelection::from_requested(&ds, &[2020], &[]).unwrap();
    assert_eq!(sel.severities, None);
    let filtered = filter_records(ds.records(), &sel);
    assert_eq!(filtered.len(), 2);

    let err = FilterSelection::from_requested(&ds, &[], &["Fatal".to_string()]).unwrap_err();
    assert!(matches!(err, Error::InvalidSelection { .. }));

    let dash = Session::with_selection(Arc::new(ds), sel).render();
    assert!(dash.section("severity_distribution").is_none());
    assert!(dash.section("weather_conditions").unwrap().content.is_skipped());
    assert!(dash
        .notices
        .iter()
        .any(|n| n == "Column 'Accident_Severity' not found in the dataset."));
}

#[test]
fn test_frequency_tables_conserve_filtered_count() {
    let f = full_fixture();
    let (ds, _) = load_dataset(f.path()).unwrap();
    let sel = FilterSelection::all_observed(&ds);
    let filtered = filter_records(ds.records(), &sel);
    for dim in [
        Dimension::DayOfWeek,
        Dimension::Month,
        Dimension::District,
        Dimension::SpeedLimit,
        Dimension::Casualties,
        Dimension::Vehicles,
    ] {
        assert_eq!(frequency_count(&filtered, dim).total(), filtered.len(), "{:?}", dim);
    }
    assert_eq!(summarize(&filtered).total_accidents, filtered.len());
}

#[test]
fn test_export_round_trip_to_disk() {
    let f = full_fixture();
    let (ds, _) = load_dataset(f.path()).unwrap();
    let dash = Session::new(Arc::new(ds)).render();

    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("nested/out");
    let written = export_dashboard(&out, &dash).unwrap();
    assert_eq!(written.len(), 17);

    let casualties = fs::read_to_string(out.join("casualties_per_accident.csv")).unwrap();
    assert_eq!(casualties, "Number_of_Casualties,Count\n1,2\n2,1\n3,1\n");

    let json: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(out.join("dashboard.json")).unwrap()).unwrap();
    assert_eq!(json["selection"]["years"], serde_json::json!([2020, 2021]));
}

#[test]
fn test_missing_input_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let err = load_dataset(dir.path().join("All_Attribute_Table.csv")).unwrap_err();
    assert!(matches!(err, Error::FileNotFound { .. }));
}

#[test]
fn test_cp1252_export_keeps_every_row_and_clean_totals() {
    let mut f = NamedTempFile::new().unwrap();
    writeln!(f, "{}", FULL_HEADER).unwrap();
    f.write_all(b"2020-01-05,Slight,-3,1,Leeds,Urban,Daylight,Dry,Dry,Car,,30\n")
        .unwrap();
    f.write_all(b"2020-01-06,Slight,1,1,Ynys M\xf4n,Rural,Daylight,Dry,Dry,Car,,30.0\n")
        .unwrap();
    f.flush().unwrap();

    let (ds, report) = load_dataset(f.path()).unwrap();
    assert_eq!(report.loaded_rows, 2);
    assert_eq!(report.parse_errors, 0);

    let dash = Session::new(Arc::new(ds)).render();
    assert_eq!(dash.summary.total_accidents, 2);
    assert_eq!(dash.summary.total_casualties, 1);
    assert_eq!(dash.summary.unique_districts, 2);
    match &dash.section("speed_limit").unwrap().content {
        SectionContent::Frequency(t) => {
            assert_eq!(t.len(), 1);
            assert_eq!(t.get(Some("30")), 2);
        }
        other => panic!("unexpected content {:?}", other),
    }
}
