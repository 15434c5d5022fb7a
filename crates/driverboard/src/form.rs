//! The driver creation form.
//!
//! The form has one named input per editable field (`driverName`, `racesWon`,
//! `favTrack`, `teamName`, `photoURL`). Values are kept as typed; nothing is
//! parsed or validated before submission.

use crate::driver::{DriverFields, Field};
use crate::error::{Error, Result};

/// Current values of the creation form's inputs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DriverForm {
    values: DriverFields,
}

impl DriverForm {
    /// An empty form.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a form from `(name, value)` pairs, as read from a page.
    ///
    /// Inputs with other names are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingFormInput`] if any of the five required inputs
    /// is absent.
    pub fn from_inputs<I, K, V>(inputs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut values = DriverFields::default();
        let mut seen = [false; Field::ALL.len()];

        for (name, value) in inputs {
            if let Some(field) = Field::from_input_name(name.as_ref()) {
                values.set(field, value);
                if let Some(pos) = Field::ALL.iter().position(|f| *f == field) {
                    seen[pos] = true;
                }
            }
        }

        if let Some(pos) = seen.iter().position(|present| !present) {
            return Err(Error::missing_form_input(Field::ALL[pos].input_name()));
        }

        Ok(Self { values })
    }

    /// Read one input.
    #[must_use]
    pub fn value(&self, field: Field) -> &str {
        self.values.get(field)
    }

    /// Set one input by field.
    pub fn set_field(&mut self, field: Field, value: impl Into<String>) {
        self.values.set(field, value);
    }

    /// Set one input by its name.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownFormInput`] if the form has no such input.
    pub fn set(&mut self, name: &str, value: impl Into<String>) -> Result<()> {
        let field = Field::from_input_name(name).ok_or_else(|| Error::UnknownFormInput {
            name: name.to_string(),
        })?;
        self.values.set(field, value);
        Ok(())
    }

    /// All five values as entered.
    #[must_use]
    pub fn values(&self) -> &DriverFields {
        &self.values
    }

    /// Clear every input.
    pub fn reset(&mut self) {
        self.values = DriverFields::default();
    }

    /// Whether every input is empty.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        Field::ALL.iter().all(|f| self.value(*f).is_empty())
    }
}
