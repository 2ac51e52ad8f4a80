use data_adapters::weather::units::{
    air_quality_label, format_temperature, format_wind_speed, round1, wind_direction, Units,
};

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

#[test]
fn compass_points() {
    assert_eq!(wind_direction(0.0), "N");
    assert_eq!(wind_direction(90.0), "E");
    assert_eq!(wind_direction(180.0), "S");
    assert_eq!(wind_direction(270.0), "W");
    assert_eq!(wind_direction(359.0), "N");
    assert_eq!(wind_direction(360.0), "N");
    assert_eq!(wind_direction(22.5), "NNE");
    assert_eq!(wind_direction(315.0), "NW");
}

#[test]
fn compass_ties_round_to_even_sector() {
    // 11.25 sits between N (0) and NNE (1); 33.75 between NNE (1) and NE (2).
    assert_eq!(wind_direction(11.25), "N");
    assert_eq!(wind_direction(33.75), "NE");
}

#[test]
fn negative_bearings_wrap() {
    assert_eq!(wind_direction(-90.0), "W");
}

#[test]
fn kelvin_conversions() {
    assert!(close(format_temperature(293.15, Units::Metric), 20.0));
    assert!(close(format_temperature(293.15, Units::Imperial), 68.0));
    assert!(close(format_temperature(0.0, Units::Metric), -273.1));
}

#[test]
fn wind_speed_conversions() {
    assert!(close(format_wind_speed(3.6, Units::Metric), 3.6));
    assert!(close(format_wind_speed(10.0, Units::Imperial), 22.4));
}

#[test]
fn rounding_to_one_decimal() {
    assert!(close(round1(12.345), 12.3));
    assert!(close(round1(-0.04), 0.0));
}

#[test]
fn rounding_uses_stored_binary_value() {
    assert!(close(round1(0.35), 0.3));
    assert!(close(round1(0.45), 0.5));
    assert!(close(format_wind_speed(0.35, Units::Metric), 0.3));
}

#[test]
fn unit_labels() {
    assert_eq!(Units::default(), Units::Metric);
    assert_eq!(Units::Metric.temperature_label(), "°C");
    assert_eq!(Units::Imperial.temperature_label(), "°F");
    assert_eq!(Units::Metric.wind_label(), "m/s");
    assert_eq!(Units::Imperial.wind_label(), "mph");
    assert_eq!(Units::Imperial.as_str(), "imperial");
}

#[test]
fn air_quality_labels() {
    let labels: Vec<_> = (0..=6).map(air_quality_label).collect();
    assert_eq!(
        labels,
        ["Unknown", "Good", "Fair", "Moderate", "Poor", "Very Poor", "Unknown"]
    );
}
