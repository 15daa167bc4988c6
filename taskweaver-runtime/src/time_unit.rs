use std::time::Duration;

/// Unit applied to bare numeric interval settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimeUnit {
    #[default]
    Milliseconds,
    Seconds,
    Minutes,
    Hours,
    Days,
}

impl std::str::FromStr for TimeUnit {
    type Err = String;

    /// Accepts the full lowercase names only ("milliseconds", "seconds", ...).
    /// Shorthand such as "5s" goes through [`TimeUnit::parse_duration`].
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "milliseconds" => Ok(TimeUnit::Milliseconds),
            "seconds" => Ok(TimeUnit::Seconds),
            "minutes" => Ok(TimeUnit::Minutes),
            "hours" => Ok(TimeUnit::Hours),
            "days" => Ok(TimeUnit::Days),
            _ => Err(format!("invalid time unit: {}", s)),
        }
    }
}

impl TimeUnit {
    /// Duration of `value` units. Saturates instead of overflowing.
    pub fn to_duration(self, value: u64) -> Duration {
        let millis = match self {
            TimeUnit::Milliseconds => value,
            TimeUnit::Seconds => value.saturating_mul(1_000),
            TimeUnit::Minutes => value.saturating_mul(60_000),
            TimeUnit::Hours => value.saturating_mul(3_600_000),
            TimeUnit::Days => value.saturating_mul(86_400_000),
        };
        Duration::from_millis(millis)
    }

    /// Parse shorthand like "500ms", "2s", "10m", "1h", "1d".
    ///
    /// Suffixes are lowercase only and must follow the number directly.
    pub fn parse_duration(s: &str) -> Option<Duration> {
        let s = s.trim();
        let split_pos = s.find(|c: char| !c.is_ascii_digit())?;
        if split_pos == 0 {
            return None;
        }

        let (num_str, unit_str) = s.split_at(split_pos);
        let value = num_str.parse::<u64>().ok()?;

        let unit = match unit_str {
            "ms" => TimeUnit::Milliseconds,
            "s" => TimeUnit::Seconds,
            "m" => TimeUnit::Minutes,
            "h" => TimeUnit::Hours,
            "d" => TimeUnit::Days,
            _ => return None,
        };

        Some(unit.to_duration(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shorthand_suffixes() {
        assert_eq!(TimeUnit::parse_duration("500ms"), Some(Duration::from_millis(500)));
        assert_eq!(TimeUnit::parse_duration(" 2s "), Some(Duration::from_secs(2)));
        assert_eq!(TimeUnit::parse_duration("5m"), Some(Duration::from_secs(300)));
        assert_eq!(TimeUnit::parse_duration("1h"), Some(Duration::from_secs(3_600)));
        assert_eq!(TimeUnit::parse_duration("1d"), Some(Duration::from_secs(86_400)));
    }

    #[test]
    fn shorthand_rejects_malformed_input() {
        assert_eq!(TimeUnit::parse_duration("250"), None);
        assert_eq!(TimeUnit::parse_duration("s"), None);
        assert_eq!(TimeUnit::parse_duration("5S"), None);
        assert_eq!(TimeUnit::parse_duration("5 s"), None);
        assert_eq!(TimeUnit::parse_duration("-5s"), None);
    }

    #[test]
    fn full_names_parse() {
        assert_eq!("Seconds".parse::<TimeUnit>(), Ok(TimeUnit::Seconds));
        assert!("secs".parse::<TimeUnit>().is_err());
        assert_eq!(TimeUnit::Minutes.to_duration(2), Duration::from_secs(120));
    }
}
