use crate::model::PlanNode;

/// A full table scan above this estimated row count is flagged
/// high-severity (spec §4.6 names the rule but not a concrete number).
const FULL_SCAN_ROW_THRESHOLD: f64 = 10_000.0;

/// A nested loop whose outer input is estimated above this row count is
/// flagged high-severity.
const NESTED_LOOP_OUTER_THRESHOLD: f64 = 10_000.0;

/// A node whose own cost (total cost minus the sum of its children's) is
/// at least this fraction of its total cost is flagged as a bottleneck
/// issue, independent of [`find_bottlenecks`]'s plan-wide ranking.
const SELF_COST_BOTTLENECK_RATIO: f64 = 0.5;

/// [`find_bottlenecks`] keeps nodes whose cost share of the whole plan
/// exceeds this fraction (spec §4.6: "keeping nodes above 20% contribution").
const BOTTLENECK_CONTRIBUTION_THRESHOLD: f64 = 0.20;

const HIGH_PENALTY: u32 = 30;
const MEDIUM_PENALTY: u32 = 15;
const LOW_PENALTY: u32 = 5;

/// An issue's severity, used both to describe it and to size its score
/// penalty (spec §4.6: "penalized per issue by severity low=5/medium=15/high=30").
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, serde::Serialize, serde::Deserialize)]
pub enum Severity {
    /// Worth noting, unlikely to matter in practice.
    Low,
    /// Likely to matter at moderate data volume.
    Medium,
    /// Likely to dominate query latency.
    High,
}

impl Severity {
    fn penalty(self) -> u32 {
        match self {
            Severity::Low => LOW_PENALTY,
            Severity::Medium => MEDIUM_PENALTY,
            Severity::High => HIGH_PENALTY,
        }
    }
}

/// One finding produced while walking a plan tree.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Issue {
    /// How severe this issue is, and how much it costs the score.
    pub severity: Severity,
    /// A human-readable description.
    pub message: String,
    /// The offending node's operator, e.g. `"Seq Scan"`.
    pub node_type: String,
    /// The offending node's table, if it names one.
    pub relation_name: Option<String>,
}

/// A plan node ranked by its share of the whole plan's cost (spec §4.6
/// `FindBottlenecks`).
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Bottleneck {
    /// The node's operator.
    pub node_type: String,
    /// The node's table, if it names one.
    pub relation_name: Option<String>,
    /// This node's total cost divided by the whole plan's total cost.
    pub contribution: f64,
}

/// The result of analyzing a plan tree (spec §4.6): a performance score,
/// the issues found, plain-language recommendations, and a ranked
/// bottleneck list.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Analysis {
    /// Overall score in `[0, 100]`; 100 is issue-free.
    pub score: u8,
    /// Every issue found while walking the tree.
    pub issues: Vec<Issue>,
    /// Plain-language suggestions derived from the issues.
    pub recommendations: Vec<String>,
    /// Nodes contributing more than 20% of the plan's total cost, highest
    /// first.
    pub bottlenecks: Vec<Bottleneck>,
}

/// Walks `plan` and produces an [`Analysis`] (spec §4.6). Never fails: an
/// unrecognized node type is just a node with no rule matched against it.
pub fn analyze(plan: &PlanNode) -> Analysis {
    let _span = tracing::debug_span!("analyze_plan", node_type = %plan.node_type).entered();

    let mut issues = Vec::new();
    collect_issues(plan, &mut issues);

    let recommendations = issues.iter().map(recommend_for).collect();

    let mut bottlenecks = Vec::new();
    find_bottlenecks(plan, plan.total_cost, &mut bottlenecks);
    bottlenecks.sort_by(|a, b| b.contribution.partial_cmp(&a.contribution).unwrap());

    let penalty: u32 = issues.iter().map(|issue| issue.severity.penalty()).sum();
    let score = 100u32.saturating_sub(penalty).min(100) as u8;

    for issue in &issues {
        tracing::trace!(?issue.severity, node_type = %issue.node_type, "plan issue found");
    }

    Analysis {
        score,
        issues,
        recommendations,
        bottlenecks,
    }
}

fn collect_issues(node: &PlanNode, issues: &mut Vec<Issue>) {
    if node.node_type == "Seq Scan" && node.plan_rows > FULL_SCAN_ROW_THRESHOLD {
        issues.push(Issue {
            severity: Severity::High,
            message: format!(
                "full table scan over an estimated {:.0} rows",
                node.plan_rows
            ),
            node_type: node.node_type.clone(),
            relation_name: node.relation_name.clone(),
        });
    }

    if node.node_type == "Nested Loop" {
        if let Some(outer) = node.children.first() {
            if outer.plan_rows > NESTED_LOOP_OUTER_THRESHOLD {
                issues.push(Issue {
                    severity: Severity::High,
                    message: format!(
                        "nested loop over an outer input of an estimated {:.0} rows",
                        outer.plan_rows
                    ),
                    node_type: node.node_type.clone(),
                    relation_name: node.relation_name.clone(),
                });
            }
        }
    }

    if node.node_type == "Sort" && !node.children.iter().any(is_index_scan) {
        issues.push(Issue {
            severity: Severity::Medium,
            message: "sort with no index-providing child; an index might avoid it".to_string(),
            node_type: node.node_type.clone(),
            relation_name: node.relation_name.clone(),
        });
    }

    let children_cost: f64 = node.children.iter().map(|c| c.total_cost).sum();
    let self_cost = node.total_cost - children_cost;
    if node.total_cost > 0.0 && self_cost / node.total_cost >= SELF_COST_BOTTLENECK_RATIO {
        issues.push(Issue {
            severity: Severity::Medium,
            message: format!(
                "this node's own cost ({self_cost:.1}) dominates its {} children's combined cost ({children_cost:.1})",
                node.children.len()
            ),
            node_type: node.node_type.clone(),
            relation_name: node.relation_name.clone(),
        });
    }

    for child in &node.children {
        collect_issues(child, issues);
    }
}

fn is_index_scan(node: &PlanNode) -> bool {
    node.node_type.contains("Index")
}

fn recommend_for(issue: &Issue) -> String {
    match issue.node_type.as_str() {
        "Seq Scan" => match &issue.relation_name {
            Some(table) => format!("consider adding an index on '{table}' to avoid the full scan"),
            None => "consider adding an index to avoid the full scan".to_string(),
        },
        "Nested Loop" => "consider a hash or merge join for the large outer input".to_string(),
        "Sort" => "consider an index that provides the required ordering".to_string(),
        _ => issue.message.clone(),
    }
}

/// Returns every node whose cost share of `total_plan_cost` exceeds
/// [`BOTTLENECK_CONTRIBUTION_THRESHOLD`], unsorted (the caller sorts).
fn find_bottlenecks(node: &PlanNode, total_plan_cost: f64, out: &mut Vec<Bottleneck>) {
    if total_plan_cost > 0.0 {
        let contribution = node.total_cost / total_plan_cost;
        if contribution > BOTTLENECK_CONTRIBUTION_THRESHOLD {
            out.push(Bottleneck {
                node_type: node.node_type.clone(),
                relation_name: node.relation_name.clone(),
                contribution,
            });
        }
    }
    for child in &node.children {
        find_bottlenecks(child, total_plan_cost, out);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scan(relation: &str, total_cost: f64, plan_rows: f64) -> PlanNode {
        PlanNode {
            node_type: "Seq Scan".to_string(),
            relation_name: Some(relation.to_string()),
            index_name: None,
            startup_cost: 0.0,
            total_cost,
            plan_rows,
            actual_rows: plan_rows,
            children: Vec::new(),
        }
    }

    #[test]
    fn flags_full_table_scan_above_threshold() {
        let plan = scan("users", 500.0, 50_000.0);
        let analysis = analyze(&plan);
        assert!(analysis.issues.iter().any(|i| i.severity == Severity::High));
        assert!(analysis.score < 100);
    }

    #[test]
    fn small_scan_is_clean() {
        let plan = scan("users", 5.0, 10.0);
        let analysis = analyze(&plan);
        assert!(analysis.issues.is_empty());
        assert_eq!(analysis.score, 100);
    }

    #[test]
    fn flags_nested_loop_over_large_outer() {
        let plan = PlanNode {
            node_type: "Nested Loop".to_string(),
            relation_name: None,
            index_name: None,
            startup_cost: 0.0,
            total_cost: 1000.0,
            plan_rows: 1.0,
            actual_rows: 1.0,
            children: vec![scan("users", 500.0, 20_000.0), scan("orders", 10.0, 1.0)],
        };
        let analysis = analyze(&plan);
        assert!(analysis
            .issues
            .iter()
            .any(|i| i.node_type == "Nested Loop" && i.severity == Severity::High));
    }

    #[test]
    fn sort_without_index_child_is_flagged() {
        let plan = PlanNode {
            node_type: "Sort".to_string(),
            relation_name: None,
            index_name: None,
            startup_cost: 0.0,
            total_cost: 20.0,
            plan_rows: 10.0,
            actual_rows: 10.0,
            children: vec![scan("users", 10.0, 10.0)],
        };
        let analysis = analyze(&plan);
        assert!(analysis.issues.iter().any(|i| i.node_type == "Sort"));
    }

    #[test]
    fn sort_with_index_scan_child_is_not_flagged_for_missing_index() {
        let mut index_scan = scan("users", 5.0, 10.0);
        index_scan.node_type = "Index Scan".to_string();
        index_scan.index_name = Some("users_pkey".to_string());
        let plan = PlanNode {
            node_type: "Sort".to_string(),
            relation_name: None,
            index_name: None,
            startup_cost: 0.0,
            total_cost: 10.0,
            plan_rows: 10.0,
            actual_rows: 10.0,
            children: vec![index_scan],
        };
        let analysis = analyze(&plan);
        assert!(!analysis
            .issues
            .iter()
            .any(|i| i.node_type == "Sort" && i.message.contains("index")));
    }

    #[test]
    fn finds_bottleneck_above_twenty_percent_contribution() {
        let plan = PlanNode {
            node_type: "Hash Join".to_string(),
            relation_name: None,
            index_name: None,
            startup_cost: 0.0,
            total_cost: 100.0,
            plan_rows: 1.0,
            actual_rows: 1.0,
            children: vec![scan("big_table", 80.0, 10.0), scan("small_table", 5.0, 10.0)],
        };
        let analysis = analyze(&plan);
        assert!(analysis
            .bottlenecks
            .iter()
            .any(|b| b.relation_name.as_deref() == Some("big_table")));
        assert!(!analysis
            .bottlenecks
            .iter()
            .any(|b| b.relation_name.as_deref() == Some("small_table")));
    }

    #[test]
    fn score_is_capped_at_zero() {
        let mut plan = scan("users", 500.0, 50_000.0);
        plan.node_type = "Nested Loop".to_string();
        plan.children = vec![
            scan("a", 10.0, 50_000.0),
            scan("b", 10.0, 50_000.0),
            scan("c", 10.0, 50_000.0),
            scan("d", 10.0, 50_000.0),
        ];
        let analysis = analyze(&plan);
        assert_eq!(analysis.score, 0);
    }
}
