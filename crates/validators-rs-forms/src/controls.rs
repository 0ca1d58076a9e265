//! Form sources and controls.
//!
//! The engine does not scan documents itself. It asks a [`FormSource`] for
//! the declared rules, resolves control ids to [`ControlHandle`]s and reads
//! control values through it. [`MemoryForm`] is a self-contained source
//! that can be built in code or deserialized from JSON:
//!
//! ```
//! use validators_rs_forms::controls::{FormSource, MemoryForm};
//!
//! let form: MemoryForm = serde_json::from_str(r#"{
//!     "controls": [
//!         { "id": "email", "tag": "input", "type": "email", "value": "ada@example.com" },
//!         { "id": "terms", "tag": "input", "type": "checkbox", "value": "yes", "checked": false }
//!     ],
//!     "validators": [
//!         { "data-validate": "email", "data-control": "email", "data-message": "Invalid email" }
//!     ]
//! }"#).unwrap();
//!
//! let terms = form.resolve_control("terms").unwrap();
//! assert_eq!(form.read_control_value(&terms).unwrap(), "");
//! assert_eq!(form.discover_rules().unwrap().len(), 1);
//! ```

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use validators_rs_core::error::{ValidatorsError, ValidatorsResult};

use crate::rules::Rule;

/// A resolved reference to a control.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ControlHandle(String);

impl ControlHandle {
    /// Creates a handle for the control with the given id.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The control id.
    pub fn id(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ControlHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Where rules and control values come from.
pub trait FormSource: Send + Sync {
    /// Returns the declared rules in document order.
    fn discover_rules(&self) -> ValidatorsResult<Vec<Rule>>;

    /// Resolves a control id, or `None` if no such control exists.
    fn resolve_control(&self, id: &str) -> Option<ControlHandle>;

    /// Reads the current string value of a resolved control.
    ///
    /// Multi-selects join their selected values with `,`. Checkboxes and
    /// radios yield their value only when checked. Elements that carry no
    /// value are a configuration error.
    fn read_control_value(&self, control: &ControlHandle) -> ValidatorsResult<String>;
}

/// One `<option>` of a select.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectOption {
    /// The option's value.
    pub value: String,
    /// Whether the option is selected.
    #[serde(default)]
    pub selected: bool,
}

/// A form element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "tag", rename_all = "lowercase")]
pub enum Element {
    /// An `<input>` of any type.
    Input {
        /// The input type (`text`, `checkbox`, `radio`, ...).
        #[serde(rename = "type", default = "default_input_type")]
        input_type: String,
        /// The value attribute.
        #[serde(default)]
        value: String,
        /// Checked state, for checkboxes and radios.
        #[serde(default)]
        checked: bool,
    },
    /// A `<textarea>`.
    Textarea {
        /// The current text.
        #[serde(default)]
        value: String,
    },
    /// A `<select>`, single or multiple.
    Select {
        /// The options, in document order.
        #[serde(default)]
        options: Vec<SelectOption>,
    },
    /// Any element that does not carry a value.
    Other {
        /// The element's tag name.
        name: String,
    },
}

fn default_input_type() -> String {
    "text".to_string()
}

impl Element {
    /// A text input.
    pub fn text(value: impl Into<String>) -> Self {
        Self::Input {
            input_type: default_input_type(),
            value: value.into(),
            checked: false,
        }
    }

    /// A checkbox input.
    pub fn checkbox(value: impl Into<String>, checked: bool) -> Self {
        Self::Input {
            input_type: "checkbox".to_string(),
            value: value.into(),
            checked,
        }
    }

    /// A radio input.
    pub fn radio(value: impl Into<String>, checked: bool) -> Self {
        Self::Input {
            input_type: "radio".to_string(),
            value: value.into(),
            checked,
        }
    }

    /// A textarea.
    pub fn textarea(value: impl Into<String>) -> Self {
        Self::Textarea {
            value: value.into(),
        }
    }

    /// A select with `(value, selected)` options.
    pub fn select<'a>(options: impl IntoIterator<Item = (&'a str, bool)>) -> Self {
        Self::Select {
            options: options
                .into_iter()
                .map(|(value, selected)| SelectOption {
                    value: value.to_string(),
                    selected,
                })
                .collect(),
        }
    }

    /// An element without a value, such as a `<div>`.
    pub fn other(name: impl Into<String>) -> Self {
        Self::Other { name: name.into() }
    }

    /// The string value validation sees for this element.
    ///
    /// # Errors
    ///
    /// Returns [`ValidatorsError::UnsupportedElement`] for [`Element::Other`].
    pub fn validation_value(&self, id: &str) -> ValidatorsResult<String> {
        match self {
            Self::Input {
                input_type,
                value,
                checked,
            } => {
                let checkable = input_type.eq_ignore_ascii_case("checkbox")
                    || input_type.eq_ignore_ascii_case("radio");
                if checkable && !checked {
                    Ok(String::new())
                } else {
                    Ok(value.clone())
                }
            }
            Self::Textarea { value } => Ok(value.clone()),
            Self::Select { options } => Ok(options
                .iter()
                .filter(|option| option.selected)
                .map(|option| option.value.as_str())
                .collect::<Vec<_>>()
                .join(",")),
            Self::Other { name } => Err(ValidatorsError::UnsupportedElement {
                id: id.to_string(),
                tag: name.clone(),
            }),
        }
    }
}

/// A control: an element with an id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Control {
    /// The control id.
    pub id: String,
    /// The element.
    #[serde(flatten)]
    pub element: Element,
}

/// An in-memory form: controls plus validator declarations.
///
/// Validators are kept as attribute maps, in document order, and parsed
/// with [`Rule::from_attributes`] on every discovery. When two controls
/// share an id the first one wins.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryForm {
    /// The controls, in document order.
    #[serde(default)]
    pub controls: Vec<Control>,
    /// Validator declarations, in document order.
    #[serde(default)]
    pub validators: Vec<HashMap<String, String>>,
}

impl MemoryForm {
    /// Creates an empty form.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a form from its JSON representation.
    ///
    /// # Errors
    ///
    /// Returns [`ValidatorsError::ConfigurationError`] on malformed JSON.
    pub fn from_json(json: &str) -> ValidatorsResult<Self> {
        serde_json::from_str(json)
            .map_err(|e| ValidatorsError::ConfigurationError(format!("Invalid form definition: {e}")))
    }

    /// Adds a control.
    #[must_use]
    pub fn with_control(mut self, id: impl Into<String>, element: Element) -> Self {
        self.controls.push(Control {
            id: id.into(),
            element,
        });
        self
    }

    /// Adds a validator declaration.
    #[must_use]
    pub fn with_validator<K, V>(mut self, attributes: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.validators.push(
            attributes
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        );
        self
    }

    /// Returns the control with the given id.
    pub fn control(&self, id: &str) -> Option<&Control> {
        self.controls.iter().find(|control| control.id == id)
    }

    /// Replaces the value of a text-like control, or the checked state of
    /// a checkbox/radio when `value` equals its value attribute.
    ///
    /// Returns `false` if the control does not exist.
    pub fn set_value(&mut self, id: &str, new_value: impl Into<String>) -> bool {
        let Some(control) = self.controls.iter_mut().find(|control| control.id == id) else {
            return false;
        };
        let new_value = new_value.into();
        match &mut control.element {
            Element::Input {
                input_type,
                value,
                checked,
            } if input_type.eq_ignore_ascii_case("checkbox")
                || input_type.eq_ignore_ascii_case("radio") =>
            {
                *checked = *value == new_value;
            }
            Element::Input { value, .. } | Element::Textarea { value } => *value = new_value,
            Element::Select { options } => {
                let selected: Vec<&str> = new_value.split(',').collect();
                for option in options {
                    option.selected = selected.contains(&option.value.as_str());
                }
            }
            Element::Other { .. } => {}
        }
        true
    }
}

impl FormSource for MemoryForm {
    fn discover_rules(&self) -> ValidatorsResult<Vec<Rule>> {
        self.validators.iter().map(Rule::from_attributes).collect()
    }

    fn resolve_control(&self, id: &str) -> Option<ControlHandle> {
        self.control(id).map(|control| ControlHandle::new(&control.id))
    }

    fn read_control_value(&self, control: &ControlHandle) -> ValidatorsResult<String> {
        self.control(control.id())
            .ok_or_else(|| ValidatorsError::ControlNotFound(control.id().to_string()))?
            .element
            .validation_value(control.id())
    }
}
