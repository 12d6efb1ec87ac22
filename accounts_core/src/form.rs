use crate::field::{FieldType, FieldValue, Problem};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The canonical keys of the account form, as the server names them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(test, derive(proptest_derive::Arbitrary))]
pub enum FieldKey {
    FirstName,
    LastName,
    Phone,
    Email,
    Password,
}

impl FieldKey {
    /// The JSON key for this field.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::FirstName => "first_name",
            Self::LastName => "last_name",
            Self::Phone => "phone",
            Self::Email => "email",
            Self::Password => "password",
        }
    }

    /// What the user sees next to the input.
    pub fn label(self) -> &'static str {
        match self {
            Self::FirstName => "First Name",
            Self::LastName => "Surname",
            Self::Phone => "Phone",
            Self::Email => "Email",
            Self::Password => "Password",
        }
    }

    /// How keystrokes in this field get filtered.
    pub fn field_type(self) -> FieldType {
        match self {
            Self::FirstName | Self::LastName => FieldType::Text,
            Self::Phone => FieldType::Number,
            Self::Email => FieldType::Email,
            Self::Password => FieldType::Password,
        }
    }
}

/// Which fields a form shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    /// Just the credentials.
    Login,

    /// Everything: used both to create and to update an account.
    Registration,
}

impl FormMode {
    /// The fields to render, in order.
    pub fn fields(self) -> &'static [FieldKey] {
        match self {
            Self::Login => &[FieldKey::Email, FieldKey::Password],
            Self::Registration => &[
                FieldKey::FirstName,
                FieldKey::LastName,
                FieldKey::Phone,
                FieldKey::Email,
                FieldKey::Password,
            ],
        }
    }
}

/// A field that stops the form from being sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("{}: {problem}", .field.label())]
pub struct Invalid {
    pub field: FieldKey,
    pub problem: Problem,
}

/// The body sent to the account endpoints. Every key is optional; a missing
/// key is left out of the JSON entirely, which is not the same as sending an
/// empty string.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FormData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<FieldValue>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<FieldValue>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<FieldValue>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<FieldValue>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<FieldValue>,
}

impl FormData {
    /// A form with every field for `mode` present and empty.
    pub fn blank(mode: FormMode) -> Self {
        let mut form = Self::default();
        for key in mode.fields() {
            form.set(*key, FieldValue::empty());
        }
        form
    }

    /// Get the value for a field, if present.
    pub fn get(&self, key: FieldKey) -> Option<&FieldValue> {
        self.slot(key).as_ref()
    }

    /// Set the value for a field.
    pub fn set(&mut self, key: FieldKey, value: FieldValue) {
        *self.slot_mut(key) = Some(value);
    }

    /// Check every field `mode` shows, in order, before sending the form.
    ///
    /// ## Errors
    ///
    /// Returns the first field that isn't ready, and why.
    pub fn validate(&self, mode: FormMode) -> Result<(), Invalid> {
        for field in mode.fields() {
            field
                .field_type()
                .check(self.get(*field))
                .map_err(|problem| Invalid {
                    field: *field,
                    problem,
                })?;
        }

        Ok(())
    }

    /// Copy the fields named in `keys` out of a JSON object, as returned by
    /// the details endpoint. A key the server did not send (or sent as
    /// something other than a string or number) ends up absent.
    pub fn fill_from_json(
        &mut self,
        keys: &[FieldKey],
        data: &serde_json::Map<String, serde_json::Value>,
    ) {
        for key in keys {
            *self.slot_mut(*key) = data.get(key.as_str()).and_then(FieldValue::from_json);
        }
    }

    fn slot(&self, key: FieldKey) -> &Option<FieldValue> {
        match key {
            FieldKey::FirstName => &self.first_name,
            FieldKey::LastName => &self.last_name,
            FieldKey::Phone => &self.phone,
            FieldKey::Email => &self.email,
            FieldKey::Password => &self.password,
        }
    }

    fn slot_mut(&mut self, key: FieldKey) -> &mut Option<FieldValue> {
        match key {
            FieldKey::FirstName => &mut self.first_name,
            FieldKey::LastName => &mut self.last_name,
            FieldKey::Phone => &mut self.phone,
            FieldKey::Email => &mut self.email,
            FieldKey::Password => &mut self.password,
        }
    }
}
