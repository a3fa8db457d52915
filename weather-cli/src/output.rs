use chrono::NaiveDateTime;
use weather_core::{Units, WeatherReport};

pub fn render_report(report: &WeatherReport, units: Units, fetched_at: NaiveDateTime) -> String {
    format!(
        "City:        {}\n\
         Temperature: {:.1} {}\n\
         Humidity:    {}%\n\
         Conditions:  {}\n\
         Icon:        {}\n\
         Updated:     {}",
        report.city_name,
        report.temperature,
        units.temperature_symbol(),
        report.humidity_percent,
        report.description,
        report.icon_url(),
        fetched_at.format("%Y-%m-%d %H:%M"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn renders_all_fields() {
        let report = WeatherReport {
            city_name: "London".into(),
            temperature: 15.0,
            humidity_percent: 80,
            description: "Clear".into(),
            icon_id: "01d".into(),
        };
        let at = NaiveDate::from_ymd_opt(2024, 5, 1)
            .unwrap()
            .and_hms_opt(9, 30, 0)
            .unwrap();

        let text = render_report(&report, Units::Metric, at);

        assert!(text.contains("City:        London"));
        assert!(text.contains("Temperature: 15.0 °C"));
        assert!(text.contains("Humidity:    80%"));
        assert!(text.contains("Conditions:  Clear"));
        assert!(text.contains("http://openweathermap.org/img/wn/01d.png"));
        assert!(text.contains("Updated:     2024-05-01 09:30"));
    }

    #[test]
    fn uses_unit_symbol() {
        let report = WeatherReport {
            city_name: "Austin".into(),
            temperature: 88.4,
            humidity_percent: 40,
            description: "hot".into(),
            icon_id: "01d".into(),
        };
        let at = NaiveDate::from_ymd_opt(2024, 7, 4)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap();

        let text = render_report(&report, Units::Imperial, at);

        assert!(text.contains("Temperature: 88.4 °F"));
    }
}
