//! Query compilation
//!
//! Turns the filter model plus ordering/search/limit state into the exact
//! request shape the store's query API expects. Compilation is a pure,
//! synchronous transform: no I/O, and no failure on well-typed input, so it
//! is safe to call on every state change.

use serde::de::Error as DeError;
use serde::ser::SerializeTuple;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use super::filters::{FilterModel, FilterOperator, FilterValue};
use super::schema::NamespaceSchema;

/// Result limit bounds
pub const MAX_TOP_K: i64 = 1200;
/// Default result limit
pub const DEFAULT_TOP_K: u32 = 100;

/// Sort direction; new order selections start descending
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderDirection {
    Asc,
    Desc,
}

impl OrderDirection {
    pub fn toggled(self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }
}

/// The active order specification (at most one)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderSpec {
    pub field: String,
    pub direction: OrderDirection,
}

impl OrderSpec {
    /// Selecting a new field resets direction to descending
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: OrderDirection::Desc,
        }
    }

    pub fn toggle_direction(&mut self) {
        self.direction = self.direction.toggled();
    }
}

/// The active full-text search selection (at most one)
///
/// Collected alongside the filter state but independent of it: switching the
/// field keeps the query text and phrase flag, unlike the operator-change
/// value reset on filter conditions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FullTextSearchSpec {
    pub field: String,
    #[serde(default)]
    pub query: String,
    #[serde(default)]
    pub use_phrase_matching: bool,
}

impl FullTextSearchSpec {
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            query: String::new(),
            use_phrase_matching: false,
        }
    }

    /// Move the selection to another field, keeping query text and phrase flag
    pub fn with_field(self, field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            ..self
        }
    }
}

/// Result-size bound, clamped to `[0, 1200]` on every edit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResultLimit(u32);

impl ResultLimit {
    pub fn new(requested: i64) -> Self {
        Self(requested.clamp(0, MAX_TOP_K) as u32)
    }

    pub fn get(self) -> u32 {
        self.0
    }
}

impl Default for ResultLimit {
    fn default() -> Self {
        Self(DEFAULT_TOP_K)
    }
}

/// One compiled predicate: `[field, operator, value]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterClause(pub String, pub FilterOperator, pub FilterValue);

/// The compiled filter expression
///
/// A single condition is flattened rather than wrapped; two or more become a
/// conjunction node. The model has no concept of disjunction.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryFilters {
    Clause(FilterClause),
    And(Vec<FilterClause>),
}

impl Serialize for QueryFilters {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Clause(clause) => clause.serialize(serializer),
            Self::And(clauses) => {
                let mut node = serializer.serialize_tuple(2)?;
                node.serialize_element("And")?;
                node.serialize_element(clauses)?;
                node.end()
            }
        }
    }
}

impl<'de> Deserialize<'de> for QueryFilters {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        // A conjunction node is the two-element `["And", [...]]` shape; a
        // clause is the three-element triple.
        if let Value::Array(items) = &value
            && items.len() == 2
            && items[0] == "And"
        {
            let clauses =
                serde_json::from_value(items[1].clone()).map_err(DeError::custom)?;
            return Ok(Self::And(clauses));
        }
        serde_json::from_value(value)
            .map(Self::Clause)
            .map_err(DeError::custom)
    }
}

/// The order specification on the wire: `[field, "asc"|"desc"]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankBy(pub String, pub OrderDirection);

/// A backend-ready query request, constructed fresh per submission
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompiledQueryRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filters: Option<QueryFilters>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rank_by: Option<RankBy>,
    pub top_k: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub include_attributes: Option<Vec<String>>,
}

/// Compile the current query-builder state into one store request
///
/// The full-text search selection is accepted so the whole submission travels
/// together, but it is not part of the compiled request; filtering and
/// full-text search are independently specified features.
pub fn compile_query(
    model: &FilterModel,
    order_by: Option<&OrderSpec>,
    full_text_search: Option<&FullTextSearchSpec>,
    top_k: ResultLimit,
    schema: Option<&NamespaceSchema>,
) -> CompiledQueryRequest {
    let mut clauses: Vec<FilterClause> = model
        .conditions()
        .iter()
        .map(|c| FilterClause(c.field.clone(), c.operator, c.value.clone()))
        .collect();

    let filters = match clauses.len() {
        0 => None,
        1 => Some(QueryFilters::Clause(clauses.remove(0))),
        _ => Some(QueryFilters::And(clauses)),
    };

    let rank_by = order_by.map(|o| RankBy(o.field.clone(), o.direction));

    if let Some(fts) = full_text_search {
        tracing::debug!(
            field = %fts.field,
            phrase_matching = fts.use_phrase_matching,
            "full-text search selection is not part of the compiled request"
        );
    }

    CompiledQueryRequest {
        filters,
        rank_by,
        top_k: top_k.get(),
        include_attributes: schema.map(NamespaceSchema::include_attributes),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::filters::FilterCondition;
    use serde_json::json;

    fn schema() -> NamespaceSchema {
        NamespaceSchema::from_value(&json!({
            "age": {"type": "number"},
            "name": {"type": "string"},
            "bio": {"type": "string", "full_text_search": true},
            "embedding": {"type": "[f32;128]"},
        }))
        .unwrap()
    }

    fn condition(field: &str, operator: FilterOperator, value: FilterValue) -> FilterCondition {
        FilterCondition {
            id: field.to_string(),
            field: field.to_string(),
            operator,
            value,
        }
    }

    #[test]
    fn zero_conditions_compile_to_no_filters() {
        let request = compile_query(
            &FilterModel::new(),
            None,
            None,
            ResultLimit::default(),
            None,
        );
        assert!(request.filters.is_none());
        assert!(request.rank_by.is_none());
        assert!(request.include_attributes.is_none());
        assert_eq!(request.top_k, 100);
    }

    #[test]
    fn single_condition_is_flattened() {
        let model = FilterModel::from_conditions(vec![condition(
            "age",
            FilterOperator::Gt,
            FilterValue::Number(21.into()),
        )]);
        let request = compile_query(&model, None, None, ResultLimit::default(), None);
        assert_eq!(
            serde_json::to_value(&request.filters).unwrap(),
            json!(["age", "Gt", 21])
        );
    }

    #[test]
    fn multiple_conditions_form_a_conjunction_in_insertion_order() {
        let model = FilterModel::from_conditions(vec![
            condition("age", FilterOperator::Gt, FilterValue::Number(21.into())),
            condition("active", FilterOperator::Eq, FilterValue::Bool(true)),
        ]);
        let request = compile_query(&model, None, None, ResultLimit::default(), None);
        assert_eq!(
            serde_json::to_value(&request.filters).unwrap(),
            json!(["And", [["age", "Gt", 21], ["active", "Eq", true]]])
        );
    }

    #[test]
    fn insertion_order_survives_remove_and_readd() {
        let schema = schema();
        let mut model = FilterModel::new();
        model.select_field("age");
        let age_id = model.add_condition(&schema).unwrap().id.clone();
        model.select_field("name");
        model.add_condition(&schema);

        model.remove_condition(&age_id);
        model.select_field("age");
        let readded_id = model.add_condition(&schema).unwrap().id.clone();
        model.update_condition(FilterCondition {
            id: readded_id,
            field: "age".to_string(),
            operator: FilterOperator::Gt,
            value: FilterValue::Number(21.into()),
        });

        let request = compile_query(&model, None, None, ResultLimit::default(), None);
        assert_eq!(
            serde_json::to_value(&request.filters).unwrap(),
            json!(["And", [["name", "Eq", ""], ["age", "Gt", 21]]])
        );
    }

    #[test]
    fn order_spec_compiles_to_rank_by() {
        let order = OrderSpec {
            field: "score".to_string(),
            direction: OrderDirection::Asc,
        };
        let request = compile_query(
            &FilterModel::new(),
            Some(&order),
            None,
            ResultLimit::default(),
            None,
        );
        assert_eq!(
            serde_json::to_value(&request.rank_by).unwrap(),
            json!(["score", "asc"])
        );
    }

    #[test]
    fn direction_toggle_is_an_involution() {
        let mut order = OrderSpec {
            field: "score".to_string(),
            direction: OrderDirection::Asc,
        };
        order.toggle_direction();
        order.toggle_direction();
        assert_eq!(order.direction, OrderDirection::Asc);
    }

    #[test]
    fn new_order_field_starts_descending() {
        assert_eq!(OrderSpec::new("score").direction, OrderDirection::Desc);
    }

    #[test]
    fn top_k_is_clamped() {
        assert_eq!(ResultLimit::new(-5).get(), 0);
        assert_eq!(ResultLimit::new(5000).get(), 1200);
        assert_eq!(ResultLimit::new(300).get(), 300);
    }

    #[test]
    fn include_attributes_come_from_the_schema() {
        let request = compile_query(
            &FilterModel::new(),
            None,
            None,
            ResultLimit::default(),
            Some(&schema()),
        );
        assert_eq!(
            request.include_attributes,
            Some(vec![
                "age".to_string(),
                "name".to_string(),
                "bio".to_string()
            ])
        );
    }

    #[test]
    fn full_text_search_never_reaches_the_request() {
        let fts = FullTextSearchSpec {
            field: "bio".to_string(),
            query: "hello".to_string(),
            use_phrase_matching: true,
        };
        let request = compile_query(
            &FilterModel::new(),
            None,
            Some(&fts),
            ResultLimit::default(),
            Some(&schema()),
        );
        let wire = serde_json::to_string(&request).unwrap();
        assert!(!wire.contains("bio\",\"hello"));
        assert!(!wire.contains("full_text_search"));
        assert!(request.rank_by.is_none());
    }

    #[test]
    fn fts_field_switch_preserves_query_and_flag() {
        let mut fts = FullTextSearchSpec::new("bio");
        fts.query = "rust dashboards".to_string();
        fts.use_phrase_matching = true;

        let switched = fts.with_field("title");
        assert_eq!(switched.field, "title");
        assert_eq!(switched.query, "rust dashboards");
        assert!(switched.use_phrase_matching);
    }

    #[test]
    fn end_to_end_wire_shape() {
        let model = FilterModel::from_conditions(vec![condition(
            "age",
            FilterOperator::Gt,
            FilterValue::Number(21.into()),
        )]);
        let request = compile_query(&model, None, None, ResultLimit::new(50), Some(&schema()));
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({
                "filters": ["age", "Gt", 21],
                "top_k": 50,
                "include_attributes": ["age", "name", "bio"],
            })
        );
    }

    #[test]
    fn integer_values_stay_integers_on_the_wire() {
        let clause = FilterClause(
            "age".to_string(),
            FilterOperator::Gt,
            FilterValue::Number(21.into()),
        );
        assert_eq!(serde_json::to_string(&clause).unwrap(), r#"["age","Gt",21]"#);
    }

    #[test]
    fn reserved_operators_round_trip() {
        let wire = json!(["tags", "In", "a,b"]);
        let parsed: QueryFilters = serde_json::from_value(wire.clone()).unwrap();
        assert_eq!(
            parsed,
            QueryFilters::Clause(FilterClause(
                "tags".to_string(),
                FilterOperator::In,
                FilterValue::Text("a,b".to_string()),
            ))
        );
        assert_eq!(serde_json::to_value(&parsed).unwrap(), wire);
    }

    #[test]
    fn conjunction_round_trips() {
        let wire = json!(["And", [["age", "Gte", 18], ["name", "NotContains", "bot"]]]);
        let parsed: QueryFilters = serde_json::from_value(wire.clone()).unwrap();
        assert!(matches!(&parsed, QueryFilters::And(clauses) if clauses.len() == 2));
        assert_eq!(serde_json::to_value(&parsed).unwrap(), wire);
    }

    #[test]
    fn compiled_request_round_trips() {
        let wire = json!({
            "filters": ["And", [["age", "Gt", 21], ["active", "Eq", true]]],
            "rank_by": ["score", "desc"],
            "top_k": 25,
            "include_attributes": ["age", "active", "score"],
        });
        let parsed: CompiledQueryRequest = serde_json::from_value(wire.clone()).unwrap();
        assert_eq!(serde_json::to_value(&parsed).unwrap(), wire);
    }
}
