//! Generate a heat report for validation testing

use chrono::{TimeZone, Utc};

fn main() {
    let json = r#"{
        "utc_offset_seconds": 32400,
        "current": { "temperature_2m": 31.2, "wind_speed_10m": 9.4, "relative_humidity_2m": 74 },
        "hourly": {
            "time": ["2024-07-15T21:00", "2024-07-15T22:00", "2024-07-15T23:00", "2024-07-16T00:00"],
            "temperature_2m": [31.2, 30.8, 30.1, 29.6],
            "wind_speed_10m": [9.4, 8.7, 8.1, 7.5],
            "relative_humidity_2m": [74, 76, 79, 81]
        }
    }"#;

    let now = Utc.with_ymd_and_hms(2024, 7, 15, 12, 0, 0).unwrap();

    match wetbulb::open_meteo_to_report(json, now) {
        Ok(report) => print!("{report}"),
        Err(e) => eprintln!("Error: {e:?}"),
    }
}
