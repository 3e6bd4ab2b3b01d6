use chrono::NaiveDate;

/// Per-field checks run after the required check. Blank values skip them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Validator {
    MaxLength(usize),
    Numeric,
    Integer,
    NonNegative,
    /// 0 to 100 inclusive.
    Percent,
    /// `YYYY-MM-DD`.
    Date,
    /// Uppercase letters, digits and `-`.
    Code,
}

impl Validator {
    pub fn check(self, label: &str, value: &str) -> Result<(), String> {
        let value = value.trim();
        match self {
            Validator::MaxLength(max) => {
                if value.chars().count() > max {
                    return Err(format!("{label} must be at most {max} characters"));
                }
            }
            Validator::Numeric => {
                if value.parse::<f64>().map(f64::is_finite) != Ok(true) {
                    return Err(format!("{label} must be a number"));
                }
            }
            Validator::Integer => {
                if value.parse::<i64>().is_err() {
                    return Err(format!("{label} must be a whole number"));
                }
            }
            Validator::NonNegative => {
                if value.parse::<f64>().is_ok_and(|number| number < 0.0) {
                    return Err(format!("{label} must not be negative"));
                }
            }
            Validator::Percent => match value.parse::<f64>() {
                Ok(number) if (0.0..=100.0).contains(&number) => {}
                _ => return Err(format!("{label} must be between 0 and 100")),
            },
            Validator::Date => {
                if NaiveDate::parse_from_str(value, "%Y-%m-%d").is_err() {
                    return Err(format!("{label} must be a date (YYYY-MM-DD)"));
                }
            }
            Validator::Code => {
                let valid = !value.is_empty()
                    && value
                        .chars()
                        .all(|ch| ch.is_ascii_uppercase() || ch.is_ascii_digit() || ch == '-');
                if !valid {
                    return Err(format!(
                        "{label} may only contain uppercase letters, digits and dashes"
                    ));
                }
            }
        }
        Ok(())
    }
}

pub fn check_required(label: &str, value: &str) -> Result<(), String> {
    if value.trim().is_empty() {
        return Err(format!("{label} is required"));
    }
    Ok(())
}
