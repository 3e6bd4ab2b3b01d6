pub mod validators;
pub mod values;

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use dioxus::prelude::*;

pub use validators::Validator;
pub use values::FormValues;

use validators::check_required;

/// Props handed to a custom field renderer.
#[derive(Clone, PartialEq)]
pub struct FieldContext {
    pub name: &'static str,
    pub label: &'static str,
    pub value: String,
    pub error: Option<String>,
    pub disabled: bool,
    pub on_change: EventHandler<String>,
}

/// Typed render callback for fields the built-in kinds cannot express.
#[derive(Clone, Copy)]
pub struct CustomRender(pub fn(&FieldContext) -> Element);

impl CustomRender {
    pub fn render(&self, context: &FieldContext) -> Element {
        (self.0)(context)
    }
}

impl PartialEq for CustomRender {
    fn eq(&self, other: &Self) -> bool {
        self.0 as usize == other.0 as usize
    }
}

impl fmt::Debug for CustomRender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("CustomRender(..)")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
}

impl SelectOption {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }

    pub fn from_lookup(options: &[(i64, String)]) -> Vec<SelectOption> {
        options
            .iter()
            .map(|(id, label)| SelectOption::new(id.to_string(), label.clone()))
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum FieldKind {
    Text,
    Number,
    Textarea,
    Select(Vec<SelectOption>),
    Checkbox,
    Date,
    File { accept: &'static str },
    Custom(CustomRender),
}

#[derive(Debug, Clone, PartialEq)]
pub struct FormField {
    pub name: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
    pub required: bool,
    pub placeholder: Option<&'static str>,
    pub validators: Vec<Validator>,
}

impl FormField {
    pub fn new(name: &'static str, label: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            label,
            kind,
            required: false,
            placeholder: None,
            validators: Vec::new(),
        }
    }

    pub fn text(name: &'static str, label: &'static str) -> Self {
        Self::new(name, label, FieldKind::Text)
    }

    pub fn number(name: &'static str, label: &'static str) -> Self {
        Self::new(name, label, FieldKind::Number).validate(Validator::Numeric)
    }

    pub fn textarea(name: &'static str, label: &'static str) -> Self {
        Self::new(name, label, FieldKind::Textarea)
    }

    pub fn select(name: &'static str, label: &'static str, options: Vec<SelectOption>) -> Self {
        Self::new(name, label, FieldKind::Select(options))
    }

    pub fn checkbox(name: &'static str, label: &'static str) -> Self {
        Self::new(name, label, FieldKind::Checkbox)
    }

    pub fn date(name: &'static str, label: &'static str) -> Self {
        Self::new(name, label, FieldKind::Date).validate(Validator::Date)
    }

    pub fn file(name: &'static str, label: &'static str, accept: &'static str) -> Self {
        Self::new(name, label, FieldKind::File { accept })
    }

    pub fn custom(name: &'static str, label: &'static str, render: fn(&FieldContext) -> Element) -> Self {
        Self::new(name, label, FieldKind::Custom(CustomRender(render)))
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn placeholder(mut self, placeholder: &'static str) -> Self {
        self.placeholder = Some(placeholder);
        self
    }

    pub fn validate(mut self, validator: Validator) -> Self {
        self.validators.push(validator);
        self
    }

    /// First failing check wins. Checkboxes are never blank.
    pub fn check(&self, value: &str) -> Result<(), String> {
        if matches!(self.kind, FieldKind::Checkbox) {
            return Ok(());
        }
        if value.trim().is_empty() {
            if self.required {
                check_required(self.label, value)?;
            }
            return Ok(());
        }
        if let FieldKind::Select(options) = &self.kind {
            if !options.iter().any(|option| option.value == value) {
                return Err(format!("{} has an unknown option", self.label));
            }
        }
        for validator in &self.validators {
            validator.check(self.label, value)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormError {
    #[error("{0} field(s) need attention")]
    Invalid(usize),
    #[error("{field}: {reason}")]
    InvalidValue { field: String, reason: String },
}

/// Values plus touched flags and per-field errors for one open dialog.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FormState {
    values: FormValues,
    touched: BTreeSet<String>,
    errors: BTreeMap<String, String>,
}

impl FormState {
    pub fn new(fields: &[FormField], initial: FormValues) -> Self {
        let mut values = FormValues::default();
        for field in fields {
            let value = initial.get(field.name).unwrap_or_else(|| match field.kind {
                FieldKind::Checkbox => "false",
                _ => "",
            });
            values.set(field.name, value);
        }
        Self {
            values,
            touched: BTreeSet::new(),
            errors: BTreeMap::new(),
        }
    }

    pub fn values(&self) -> &FormValues {
        &self.values
    }

    pub fn value(&self, name: &str) -> &str {
        self.values.get(name).unwrap_or("")
    }

    pub fn error(&self, name: &str) -> Option<&str> {
        self.errors.get(name).map(String::as_str)
    }

    pub fn is_touched(&self, name: &str) -> bool {
        self.touched.contains(name)
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    fn revalidate(&mut self, field: &FormField) {
        match field.check(self.value(field.name)) {
            Ok(()) => {
                self.errors.remove(field.name);
            }
            Err(message) => {
                self.errors.insert(field.name.to_string(), message);
            }
        }
    }

    /// Validates on change only once the field has been touched.
    pub fn set_value(&mut self, fields: &[FormField], name: &str, value: impl Into<String>) {
        self.values.set(name, value);
        if !self.touched.contains(name) {
            return;
        }
        if let Some(field) = fields.iter().find(|field| field.name == name) {
            self.revalidate(field);
        }
    }

    pub fn blur(&mut self, fields: &[FormField], name: &str) {
        self.touched.insert(name.to_string());
        if let Some(field) = fields.iter().find(|field| field.name == name) {
            self.revalidate(field);
        }
    }

    pub fn validate_all(&mut self, fields: &[FormField]) -> bool {
        for field in fields {
            self.touched.insert(field.name.to_string());
            self.revalidate(field);
        }
        !self.has_errors()
    }

    /// Blocked while any field reports an error.
    pub fn submit(&mut self, fields: &[FormField]) -> Result<FormValues, FormError> {
        if !self.validate_all(fields) {
            return Err(FormError::Invalid(self.errors.len()));
        }
        Ok(self.values.clone())
    }

    /// Surfaces an error from converting submitted values on its field.
    pub fn record_error(&mut self, err: &FormError) {
        if let FormError::InvalidValue { field, reason } = err {
            self.touched.insert(field.clone());
            self.errors.insert(field.clone(), reason.clone());
        }
    }
}
