pub mod project_cost;

pub use project_cost::{analyze_project_cost, ProjectCostAnalysis};
