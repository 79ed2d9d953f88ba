mod balance_analyzer;
mod rebalancer;

pub use balance_analyzer::{
    deficit, format_counts, format_distribution, target_count, ClassShare, DistributionStats,
};
pub use rebalancer::{
    allocate, balance_dataset, execute_plan, plan_class, plan_classes, plan_rebalance,
    AugmentRequest, BalanceReport, ClassAction, ClassPlan, FailedRequest, RebalanceOutcome,
    RebalancePlan,
};
