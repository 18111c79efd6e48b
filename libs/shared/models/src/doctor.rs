use chrono::Weekday;
use serde::{Deserialize, Serialize};

/// Window applied when a doctor record carries no availability.
pub const DEFAULT_AVAILABILITY: &str = "09:00-17:00";

/// Working days applied when a doctor record carries none.
pub const DEFAULT_WORKING_DAYS: [Weekday; 3] = [Weekday::Mon, Weekday::Wed, Weekday::Fri];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Doctor {
    pub doctor_identity_number: String,
    pub name: String,
    pub specialization: String,
    #[serde(default)]
    pub contact: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub hospital_name: String,
    #[serde(default)]
    pub hospital_location: String,
    /// Raw `HH:MM-HH:MM` text as entered by an admin.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub availability: Option<String>,
    #[serde(
        default,
        with = "weekday_names",
        skip_serializing_if = "Option::is_none"
    )]
    pub working_days: Option<Vec<Weekday>>,
}

impl Doctor {
    /// Availability text, with blank or missing values resolved to the default window.
    pub fn availability_or_default(&self) -> &str {
        match self.availability.as_deref().map(str::trim) {
            Some(raw) if !raw.is_empty() => raw,
            _ => DEFAULT_AVAILABILITY,
        }
    }

    pub fn working_days_or_default(&self) -> Vec<Weekday> {
        match &self.working_days {
            Some(days) if !days.is_empty() => days.clone(),
            _ => DEFAULT_WORKING_DAYS.to_vec(),
        }
    }

    pub fn working_day_names(&self) -> Vec<&'static str> {
        self.working_days_or_default()
            .into_iter()
            .map(weekday_name)
            .collect()
    }
}

pub fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

/// Stores working days as full English weekday names ("Monday").
pub mod weekday_names {
    use chrono::Weekday;
    use serde::{de::Error, Deserialize, Deserializer, Serializer};

    use super::weekday_name;

    pub fn serialize<S>(days: &Option<Vec<Weekday>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match days {
            Some(days) => serializer.collect_seq(days.iter().map(|d| weekday_name(*d))),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Vec<Weekday>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let names: Option<Vec<String>> = Option::deserialize(deserializer)?;
        names
            .map(|names| {
                names
                    .iter()
                    .map(|name| {
                        name.trim()
                            .parse::<Weekday>()
                            .map_err(|_| D::Error::custom(format!("unknown weekday '{}'", name)))
                    })
                    .collect()
            })
            .transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doctor(availability: Option<&str>) -> Doctor {
        Doctor {
            doctor_identity_number: "D100".to_string(),
            name: "Dr. Asha Rao".to_string(),
            specialization: "Cardiology".to_string(),
            contact: String::new(),
            email: String::new(),
            hospital_name: String::new(),
            hospital_location: String::new(),
            availability: availability.map(str::to_string),
            working_days: None,
        }
    }

    #[test]
    fn missing_or_blank_availability_resolves_to_default() {
        assert_eq!(doctor(None).availability_or_default(), DEFAULT_AVAILABILITY);
        assert_eq!(doctor(Some("  ")).availability_or_default(), DEFAULT_AVAILABILITY);
        assert_eq!(doctor(Some("10:00-12:00")).availability_or_default(), "10:00-12:00");
    }

    #[test]
    fn working_days_decode_from_full_names() {
        let parsed: Doctor = serde_json::from_value(json!({
            "doctor_identity_number": "D1",
            "name": "Dr. Lee",
            "specialization": "ENT",
            "working_days": ["Tuesday", "Thursday"]
        }))
        .unwrap();

        assert_eq!(parsed.working_days, Some(vec![Weekday::Tue, Weekday::Thu]));
        assert_eq!(parsed.availability, None);

        let encoded = serde_json::to_value(&parsed).unwrap();
        assert_eq!(encoded["working_days"], json!(["Tuesday", "Thursday"]));
        assert!(encoded.get("availability").is_none());
    }

    #[test]
    fn unknown_weekday_is_rejected_on_read() {
        let parsed = serde_json::from_value::<Doctor>(json!({
            "doctor_identity_number": "D1",
            "name": "Dr. Lee",
            "specialization": "ENT",
            "working_days": ["Funday"]
        }));
        assert!(parsed.is_err());
    }

    #[test]
    fn default_working_days_are_monday_wednesday_friday() {
        assert_eq!(doctor(None).working_day_names(), vec!["Monday", "Wednesday", "Friday"]);
    }
}
