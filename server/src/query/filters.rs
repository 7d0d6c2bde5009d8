//! Filter conditions and the filter model
//!
//! A filter model is the ordered set of user-authored conditions for one
//! query-builder session. Each condition binds a schema field to a
//! type-appropriate comparison operator and value; all conditions are
//! conjunctive, so order affects display only.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::schema::{FieldType, NamespaceSchema};

/// Comparison operators accepted by the store's query API
///
/// `In` and `NotIn` are part of the wire token set and round-trip through
/// serialization, but the model never emits them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FilterOperator {
    Eq,
    NotEq,
    Gt,
    Gte,
    Lt,
    Lte,
    In,
    NotIn,
    Contains,
    NotContains,
}

/// Typed filter payload
///
/// Boolean fields carry `true`/`false`, numeric fields carry a number,
/// everything else carries a string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilterValue {
    Bool(bool),
    Number(serde_json::Number),
    Text(String),
}

impl FilterValue {
    /// The default payload for a field type: `true` for booleans, `0` for
    /// numbers, the empty string for everything else
    pub fn default_for(field_type: &FieldType) -> Self {
        match field_type {
            FieldType::Boolean => Self::Bool(true),
            FieldType::Number => Self::Number(0.into()),
            _ => Self::Text(String::new()),
        }
    }
}

/// Legal operators for a field type
///
/// Unknown types get the boolean-style pair.
pub fn operators_for(field_type: &FieldType) -> &'static [FilterOperator] {
    use FilterOperator::*;
    match field_type {
        FieldType::Boolean => &[Eq, NotEq],
        FieldType::Number => &[Eq, NotEq, Gt, Gte, Lt, Lte],
        FieldType::String => &[Eq, NotEq, Contains, NotContains],
        _ => &[Eq, NotEq],
    }
}

/// The default operator for a field type: the first legal one
pub fn default_operator_for(field_type: &FieldType) -> FilterOperator {
    operators_for(field_type)[0]
}

/// One user-authored predicate
///
/// The id is generated at creation, stable for the condition's lifetime and
/// used only for UI identity and removal. It is never sent to the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterCondition {
    pub id: String,
    pub field: String,
    pub operator: FilterOperator,
    pub value: FilterValue,
}

impl FilterCondition {
    /// Create a condition for a field with type-derived defaults
    pub fn new(field: impl Into<String>, field_type: &FieldType) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            field: field.into(),
            operator: default_operator_for(field_type),
            value: FilterValue::default_for(field_type),
        }
    }
}

/// Ordered set of active filter conditions plus the pending field selection
#[derive(Debug, Clone, Default)]
pub struct FilterModel {
    conditions: Vec<FilterCondition>,
    selected_field: Option<String>,
}

impl FilterModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a model from conditions submitted by the browser
    pub fn from_conditions(conditions: Vec<FilterCondition>) -> Self {
        Self {
            conditions,
            selected_field: None,
        }
    }

    pub fn conditions(&self) -> &[FilterCondition] {
        &self.conditions
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    /// Set the pending field selection for the next added condition
    pub fn select_field(&mut self, field: impl Into<String>) {
        self.selected_field = Some(field.into());
    }

    pub fn selected_field(&self) -> Option<&str> {
        self.selected_field.as_deref()
    }

    /// Append a condition for the currently selected field
    ///
    /// A no-op when nothing is selected or the selection is empty. The new
    /// condition takes the field type's default operator and value; the
    /// pending selection is cleared. Fields missing from the schema degrade
    /// to the string-style defaults.
    pub fn add_condition(&mut self, schema: &NamespaceSchema) -> Option<&FilterCondition> {
        let field = self.selected_field.take()?;
        if field.is_empty() {
            return None;
        }
        let field_type = schema.field_type(&field);
        self.conditions
            .push(FilterCondition::new(field, &field_type));
        self.conditions.last()
    }

    /// Replace the condition with a matching id; unknown ids are a no-op
    pub fn update_condition(&mut self, updated: FilterCondition) {
        if let Some(existing) = self.conditions.iter_mut().find(|c| c.id == updated.id) {
            *existing = updated;
        }
    }

    /// Change a condition's operator
    ///
    /// The value always resets to the field type's default, never to any
    /// previously held value.
    pub fn set_operator(
        &mut self,
        id: &str,
        operator: FilterOperator,
        schema: &NamespaceSchema,
    ) {
        if let Some(condition) = self.conditions.iter_mut().find(|c| c.id == id) {
            condition.operator = operator;
            condition.value = FilterValue::default_for(&schema.field_type(&condition.field));
        }
    }

    /// Remove the condition with a matching id; unknown ids are a no-op
    pub fn remove_condition(&mut self, id: &str) {
        self.conditions.retain(|c| c.id != id);
    }

    /// Drop every condition
    pub fn clear(&mut self) {
        self.conditions.clear();
    }
}
