use serde::Deserialize;

use crate::model::PlanNode;

/// Errors loading an execution-plan document.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// The document wasn't valid JSON, or didn't match the expected shape.
    #[error("invalid plan document: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Deserialize)]
struct PlanDoc {
    #[serde(rename = "Plan")]
    plan: PlanNodeDoc,
}

#[derive(Deserialize)]
struct PlanNodeDoc {
    #[serde(rename = "Node Type")]
    node_type: String,
    #[serde(rename = "Relation Name", default)]
    relation_name: Option<String>,
    #[serde(rename = "Index Name", default)]
    index_name: Option<String>,
    #[serde(rename = "Startup Cost", default)]
    startup_cost: f64,
    #[serde(rename = "Total Cost", default)]
    total_cost: f64,
    #[serde(rename = "Plan Rows", default)]
    plan_rows: f64,
    #[serde(rename = "Actual Rows", default)]
    actual_rows: f64,
    #[serde(rename = "Plans", default)]
    plans: Vec<PlanNodeDoc>,
}

impl From<PlanNodeDoc> for PlanNode {
    fn from(doc: PlanNodeDoc) -> Self {
        PlanNode {
            node_type: doc.node_type,
            relation_name: doc.relation_name,
            index_name: doc.index_name,
            startup_cost: doc.startup_cost,
            total_cost: doc.total_cost,
            plan_rows: doc.plan_rows,
            actual_rows: doc.actual_rows,
            children: doc.plans.into_iter().map(PlanNode::from).collect(),
        }
    }
}

impl PlanNode {
    /// Parses an execution-plan document (spec §6): a root object with a
    /// `Plan` field, `Plans` nesting as children. Unknown fields are
    /// ignored; missing numeric fields default to zero.
    pub fn from_json(text: &str) -> Result<PlanNode, LoadError> {
        let doc: PlanDoc = serde_json::from_str(text)?;
        tracing::debug!(node_type = %doc.plan.node_type, "loaded execution plan document");
        Ok(PlanNode::from(doc.plan))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loads_a_nested_plan_document() {
        let json = r#"{
            "Plan": {
                "Node Type": "Nested Loop",
                "Total Cost": 120.5,
                "Plan Rows": 100,
                "Plans": [
                    {"Node Type": "Seq Scan", "Relation Name": "users", "Total Cost": 50.0, "Plan Rows": 1000},
                    {"Node Type": "Index Scan", "Index Name": "orders_user_id_idx", "Total Cost": 10.0, "Plan Rows": 5}
                ]
            }
        }"#;
        let root = PlanNode::from_json(json).unwrap();
        assert_eq!(root.node_type, "Nested Loop");
        assert_eq!(root.children.len(), 2);
        assert_eq!(root.children[0].relation_name.as_deref(), Some("users"));
        assert_eq!(root.children[1].index_name.as_deref(), Some("orders_user_id_idx"));
    }

    #[test]
    fn missing_numeric_fields_default_to_zero() {
        let json = r#"{"Plan": {"Node Type": "Result"}}"#;
        let root = PlanNode::from_json(json).unwrap();
        assert_eq!(root.total_cost, 0.0);
        assert_eq!(root.plan_rows, 0.0);
        assert!(root.children.is_empty());
    }

    #[test]
    fn unknown_fields_are_ignored() {
        let json = r#"{"Plan": {"Node Type": "Result", "Parallel Aware": false}, "Extra": 1}"#;
        assert!(PlanNode::from_json(json).is_ok());
    }

    #[test]
    fn malformed_json_is_a_json_error() {
        let err = PlanNode::from_json("not json").unwrap_err();
        assert!(matches!(err, LoadError::Json(_)));
    }
}
