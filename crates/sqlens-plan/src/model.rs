/// One node of an execution plan tree (spec §3, §4.6, §6), shaped after the
/// `EXPLAIN (FORMAT JSON)` plan documents this is modeled on: a node type,
/// optional relation/index names, cost/row estimates, and child nodes.
#[derive(Clone, Debug, PartialEq)]
pub struct PlanNode {
    /// The node's operator, e.g. `"Seq Scan"`, `"Nested Loop"`, `"Sort"`.
    pub node_type: String,
    /// The table this node scans, if it's a scan node.
    pub relation_name: Option<String>,
    /// The index this node uses, if it's an index-based scan.
    pub index_name: Option<String>,
    /// The planner's estimated cost before this node produces its first row.
    pub startup_cost: f64,
    /// The planner's estimated total cost to exhaust this node.
    pub total_cost: f64,
    /// The planner's estimated row count.
    pub plan_rows: f64,
    /// The row count actually observed, if this came from an `ANALYZE` run.
    pub actual_rows: f64,
    /// Child plan nodes (this node's inputs).
    pub children: Vec<PlanNode>,
}
