//! # sqlens-plan
//!
//! The execution-plan model, JSON loader, and cost/bottleneck analyzer
//! (C7): loads a plan document shaped like an `EXPLAIN (FORMAT JSON)`
//! output, then walks it to produce a performance [`Analysis`]. Like
//! `sqlens-schema`'s validator, analysis never fails outright — every rule
//! either matches or doesn't, there's no error case to report.

#![deny(missing_docs)]
#![deny(unused_imports)]

mod analyzer;
mod loader;
mod model;

pub use analyzer::{analyze, Analysis, Bottleneck, Issue, Severity};
pub use loader::LoadError;
pub use model::PlanNode;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn end_to_end_load_and_analyze() {
        let json = r#"{
            "Plan": {
                "Node Type": "Nested Loop",
                "Total Cost": 20100.0,
                "Plan Rows": 1,
                "Plans": [
                    {
                        "Node Type": "Seq Scan",
                        "Relation Name": "orders",
                        "Total Cost": 20000.0,
                        "Plan Rows": 50000
                    },
                    {
                        "Node Type": "Index Scan",
                        "Index Name": "users_pkey",
                        "Relation Name": "users",
                        "Total Cost": 5.0,
                        "Plan Rows": 1
                    }
                ]
            }
        }"#;
        let plan = PlanNode::from_json(json).unwrap();
        let analysis = analyze(&plan);

        assert!(analysis
            .issues
            .iter()
            .any(|i| i.node_type == "Seq Scan" && i.severity == Severity::High));
        assert!(analysis.score < 100);
        assert!(analysis
            .bottlenecks
            .iter()
            .any(|b| b.relation_name.as_deref() == Some("orders")));
        assert!(!analysis.recommendations.is_empty());
    }
}
