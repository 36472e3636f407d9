use std::{convert::Infallible, fmt, str::FromStr};

use serde::{de::Deserializer, Deserialize, Serialize, Serializer};

use super::time_interval::{TimeInterval, TimeUnit};

/// How often a recurring rule fires.
///
/// Values outside the known set are kept verbatim as `Unrecognized` and behave
/// like `Monthly` everywhere a cadence or multiplier is needed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum Frequency {
    Daily,
    Weekly,
    BiWeekly,
    #[default]
    Monthly,
    Quarterly,
    Annually,
    Custom,
    Unrecognized(String),
}

impl Frequency {
    pub fn parse(value: &str) -> Self {
        match value {
            "daily" => Frequency::Daily,
            "weekly" => Frequency::Weekly,
            "bi-weekly" => Frequency::BiWeekly,
            "monthly" => Frequency::Monthly,
            "quarterly" => Frequency::Quarterly,
            "annually" => Frequency::Annually,
            "custom" => Frequency::Custom,
            other => Frequency::Unrecognized(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Frequency::Daily => "daily",
            Frequency::Weekly => "weekly",
            Frequency::BiWeekly => "bi-weekly",
            Frequency::Monthly => "monthly",
            Frequency::Quarterly => "quarterly",
            Frequency::Annually => "annually",
            Frequency::Custom => "custom",
            Frequency::Unrecognized(raw) => raw,
        }
    }

    pub fn is_recognized(&self) -> bool {
        !matches!(self, Frequency::Unrecognized(_))
    }

    /// Step between consecutive occurrences.
    ///
    /// Custom frequencies use their own interval when both parts are present
    /// and the interval is at least one; anything else steps one calendar month.
    pub fn interval(
        &self,
        custom_interval: Option<u32>,
        custom_unit: Option<TimeUnit>,
    ) -> TimeInterval {
        match self {
            Frequency::Daily => TimeInterval::new(1, TimeUnit::Day),
            Frequency::Weekly => TimeInterval::new(1, TimeUnit::Week),
            Frequency::BiWeekly => TimeInterval::new(2, TimeUnit::Week),
            Frequency::Quarterly => TimeInterval::new(3, TimeUnit::Month),
            Frequency::Annually => TimeInterval::new(1, TimeUnit::Year),
            Frequency::Custom => match (custom_interval.filter(|every| *every > 0), custom_unit) {
                (Some(every), Some(unit)) => TimeInterval::new(every, unit),
                _ => TimeInterval::new(1, TimeUnit::Month),
            },
            Frequency::Monthly | Frequency::Unrecognized(_) => {
                TimeInterval::new(1, TimeUnit::Month)
            }
        }
    }

    pub fn label(&self, custom_interval: Option<u32>, custom_unit: Option<TimeUnit>) -> String {
        match self {
            Frequency::Daily => "Daily".into(),
            Frequency::Weekly => "Weekly".into(),
            Frequency::BiWeekly => "Bi-weekly".into(),
            Frequency::Monthly => "Monthly".into(),
            Frequency::Quarterly => "Quarterly".into(),
            Frequency::Annually => "Annually".into(),
            Frequency::Custom => self.interval(custom_interval, custom_unit).label(),
            Frequency::Unrecognized(raw) => format!("Monthly ({raw})"),
        }
    }
}

impl FromStr for Frequency {
    type Err = Infallible;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Ok(Frequency::parse(value))
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Frequency {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Frequency {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        Ok(Frequency::parse(&value))
    }
}
