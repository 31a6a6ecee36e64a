//! Parsed model structure.
//!
//! Only what a structural check needs is kept: metadata, component and
//! variable names, units and bindings as written, initial values, and
//! protocol rows. Expressions are stored verbatim and never evaluated.

use std::collections::BTreeMap;

/// A successfully loaded model.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Model {
    /// Metadata annotations from the `[[model]]` header, including `name`.
    pub meta: BTreeMap<String, String>,
    /// Components in file order.
    pub components: Vec<Component>,
    /// Initial values of state variables, in file order.
    pub initial_values: Vec<InitialValue>,
    /// Rows of the `[[protocol]]` section, if any.
    pub protocol: Vec<ProtocolEvent>,
}

impl Model {
    /// The model's `name` annotation, if present.
    pub fn name(&self) -> Option<&str> {
        self.meta.get("name").map(String::as_str)
    }

    /// Whether the model header carries the annotation `key`.
    pub fn has_meta(&self, key: &str) -> bool {
        self.meta.contains_key(key)
    }

    /// Look up a component by name.
    pub fn component(&self, name: &str) -> Option<&Component> {
        self.components.iter().find(|c| c.name == name)
    }

    /// Fully qualified names (`component.variable`) of all state variables.
    pub fn states(&self) -> Vec<String> {
        self.components
            .iter()
            .flat_map(|c| {
                c.variables
                    .iter()
                    .filter(|v| v.is_state)
                    .map(move |v| format!("{}.{}", c.name, v.name))
            })
            .collect()
    }
}

/// A `[component]` section.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Component {
    /// Component name.
    pub name: String,
    /// Component-level metadata.
    pub meta: BTreeMap<String, String>,
    /// Variables, in file order. Nested variables are named `parent.child`.
    pub variables: Vec<Variable>,
    /// Imported names from `use` lines: (qualified source, local alias).
    pub imports: Vec<(String, String)>,
    /// 1-based line of the section header.
    pub line: usize,
}

impl Component {
    /// Look up a variable by (possibly nested) name.
    pub fn variable(&self, name: &str) -> Option<&Variable> {
        self.variables.iter().find(|v| v.name == name)
    }
}

/// A variable definition inside a component.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Variable {
    /// Name relative to the component.
    pub name: String,
    /// Right-hand side expression as written.
    pub expression: String,
    /// Defined with `dot(name) = ...`.
    pub is_state: bool,
    /// Unit from `in [unit]`.
    pub unit: Option<String>,
    /// External binding from `bind label`.
    pub binding: Option<String>,
    /// Label from `label name`.
    pub label: Option<String>,
    /// Variable-level metadata.
    pub meta: BTreeMap<String, String>,
    /// 1-based line of the definition.
    pub line: usize,
}

/// An initial value assignment from the model header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InitialValue {
    /// Component name.
    pub component: String,
    /// Variable name within the component.
    pub variable: String,
    /// Value expression as written.
    pub value: String,
    /// 1-based line of the assignment.
    pub line: usize,
}

/// One row of a `[[protocol]]` section.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProtocolEvent {
    /// Stimulus level.
    pub level: f64,
    /// When the event starts.
    pub start: EventStart,
    /// Duration.
    pub duration: f64,
    /// Repeat period, `0` for a single event.
    pub period: f64,
    /// Number of repeats, `0` for indefinitely.
    pub multiplier: f64,
}

/// Start column of a protocol row.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EventStart {
    /// Absolute start time.
    At(f64),
    /// `next`: directly after the previous event ends.
    Next,
}
