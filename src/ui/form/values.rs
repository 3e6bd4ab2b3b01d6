use std::collections::BTreeMap;

use chrono::NaiveDate;

use super::FormError;

/// Raw string values keyed by field name.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FormValues(BTreeMap<String, String>);

fn invalid(field: &str, reason: impl Into<String>) -> FormError {
    FormError::InvalidValue {
        field: field.to_string(),
        reason: reason.into(),
    }
}

impl FormValues {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: &str, value: impl Into<String>) -> Self {
        self.set(name, value);
        self
    }

    pub fn set(&mut self, name: &str, value: impl Into<String>) {
        self.0.insert(name.to_string(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    pub fn text(&self, name: &str) -> String {
        self.get(name).unwrap_or("").trim().to_string()
    }

    pub fn optional_text(&self, name: &str) -> Option<String> {
        let text = self.text(name);
        (!text.is_empty()).then_some(text)
    }

    pub fn number(&self, name: &str) -> Result<f64, FormError> {
        let raw = self.text(name);
        raw.parse::<f64>()
            .ok()
            .filter(|value| value.is_finite())
            .ok_or_else(|| invalid(name, format!("`{raw}` is not a number")))
    }

    pub fn integer(&self, name: &str) -> Result<i64, FormError> {
        let raw = self.text(name);
        if raw.is_empty() {
            return Ok(0);
        }
        raw.parse::<i64>()
            .map_err(|_| invalid(name, format!("`{raw}` is not a whole number")))
    }

    pub fn optional_integer(&self, name: &str) -> Result<Option<i64>, FormError> {
        let raw = self.text(name);
        if raw.is_empty() {
            return Ok(None);
        }
        raw.parse::<i64>()
            .map(Some)
            .map_err(|_| invalid(name, format!("`{raw}` is not a whole number")))
    }

    pub fn flag(&self, name: &str) -> bool {
        matches!(self.get(name).map(str::trim), Some("true" | "on" | "1"))
    }

    pub fn optional_date(&self, name: &str) -> Result<Option<NaiveDate>, FormError> {
        let raw = self.text(name);
        if raw.is_empty() {
            return Ok(None);
        }
        NaiveDate::parse_from_str(&raw, "%Y-%m-%d")
            .map(Some)
            .map_err(|_| invalid(name, format!("`{raw}` is not a date (YYYY-MM-DD)")))
    }

    pub fn ensure(&self, name: &str, ok: bool, reason: &str) -> Result<(), FormError> {
        if ok {
            Ok(())
        } else {
            Err(invalid(name, reason))
        }
    }
}

pub fn flag_value(flag: bool) -> &'static str {
    if flag {
        "true"
    } else {
        "false"
    }
}

pub fn optional_id_value(id: Option<i64>) -> String {
    id.map(|id| id.to_string()).unwrap_or_default()
}

pub fn optional_date_value(date: Option<NaiveDate>) -> String {
    date.map(|date| date.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}
