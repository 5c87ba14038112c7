//! Route scheduler
//!
//! One scheduler per wallet. Drives the per-wallet state machine through
//! its phases (Idle, RunningRoute, InterStepDelay, RouteComplete, Failed,
//! Exhausted), executing steps strictly in route order with a randomized
//! delay between them, and counting every attempted route against the
//! configured budget whether it completed or was abandoned.
//!
//! The scheduler never returns an error: every per-step failure is caught
//! at the executor boundary, recorded, and converted into a route-level
//! outcome so one wallet's trouble cannot leak into another's run.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

use super::executor::{StepExecutor, StepStatus};
use crate::chain::ChainClient;
use crate::config::{RouteSelection, RunConfig};
use crate::routes::Route;

/// Scheduler phase, logged on every transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalletPhase {
    Idle,
    RunningRoute,
    InterStepDelay,
    RouteComplete,
    Exhausted,
    Failed,
}

/// Outcome of one executed (or attempted) step.
#[derive(Debug, Clone, Serialize)]
pub struct StepRecord {
    pub step_index: usize,
    pub action: String,
    /// "confirmed", "timeout_continue", or an error kind
    pub outcome: String,
    pub tx_hash: Option<String>,
}

/// Outcome of one attempted route.
#[derive(Debug, Clone, Serialize)]
pub struct RouteRecord {
    /// Index into the route template collection
    pub route_index: usize,
    pub label: String,
    pub completed: bool,
    pub error: Option<String>,
    pub steps: Vec<StepRecord>,
}

/// Per-wallet summary produced when the scheduler reaches Exhausted.
#[derive(Debug, Clone, Serialize)]
pub struct WalletReport {
    pub address: String,
    pub routes_attempted: u32,
    pub routes_completed: u32,
    pub routes_failed: u32,
    /// True when no route was abandoned (cleanly Exhausted rather than
    /// Failed-then-Exhausted)
    pub clean: bool,
    pub routes: Vec<RouteRecord>,
    pub final_balances: BTreeMap<String, f64>,
}

/// Per-route working state: created when a route starts, folded into the
/// report when it finishes. Exclusively owned by this wallet's task.
struct ExecutionContext {
    route_index: usize,
    label: String,
    steps: Vec<StepRecord>,
    error: Option<String>,
}

impl ExecutionContext {
    fn into_record(self, completed: bool) -> RouteRecord {
        RouteRecord {
            route_index: self.route_index,
            label: self.label,
            completed,
            error: self.error,
            steps: self.steps,
        }
    }
}

/// Executes routes for one wallet until the route budget is exhausted.
pub struct RouteScheduler {
    address: String,
    client: Arc<dyn ChainClient>,
    executor: StepExecutor,
    routes: Arc<Vec<Route>>,
    config: Arc<RunConfig>,
}

impl RouteScheduler {
    pub fn new(
        address: String,
        client: Arc<dyn ChainClient>,
        routes: Arc<Vec<Route>>,
        config: Arc<RunConfig>,
    ) -> Self {
        let executor = StepExecutor::new(
            client.clone(),
            config.swap_percentage,
            Duration::from_secs(config.confirmation_timeout_secs),
            config.rpc_retry_attempts,
            Duration::from_millis(config.rpc_retry_backoff_ms),
        );
        Self {
            address,
            client,
            executor,
            routes,
            config,
        }
    }

    /// Run to exhaustion and report. Infallible: failures become route
    /// outcomes, never errors.
    pub async fn run(self) -> WalletReport {
        let mut rng = StdRng::from_entropy();
        let mut phase = WalletPhase::Idle;
        let mut records: Vec<RouteRecord> = Vec::new();
        let mut attempted: u32 = 0;

        loop {
            if let Some(budget) = self.config.routes_count {
                if attempted >= budget {
                    break;
                }
            }

            let route_index = self.select_route(&mut rng, attempted);
            let route = &self.routes[route_index];
            self.transition(&mut phase, WalletPhase::RunningRoute);
            info!(
                wallet = %self.address,
                route = route_index,
                label = %route.label(route_index),
                "Starting route"
            );

            let (ctx, completed) = self.run_route(route, route_index, &mut phase, &mut rng).await;
            attempted += 1;

            let next = if completed {
                WalletPhase::RouteComplete
            } else {
                WalletPhase::Failed
            };
            self.transition(&mut phase, next);
            records.push(ctx.into_record(completed));

            let more_remaining = self.config.routes_count.map_or(true, |b| attempted < b);
            if more_remaining {
                self.transition(&mut phase, WalletPhase::Idle);
            }
        }

        self.transition(&mut phase, WalletPhase::Exhausted);
        let final_balances = crate::chain::snapshot_balances(self.client.as_ref(), &self.address).await;

        let routes_completed = records.iter().filter(|r| r.completed).count() as u32;
        let routes_failed = attempted - routes_completed;
        info!(
            wallet = %self.address,
            attempted,
            completed = routes_completed,
            failed = routes_failed,
            "Wallet exhausted its route budget"
        );

        WalletReport {
            address: self.address,
            routes_attempted: attempted,
            routes_completed,
            routes_failed,
            clean: routes_failed == 0,
            routes: records,
            final_balances,
        }
    }

    fn select_route(&self, rng: &mut StdRng, attempted: u32) -> usize {
        match self.config.route_selection {
            RouteSelection::Sequential => attempted as usize % self.routes.len(),
            RouteSelection::Random => rng.gen_range(0..self.routes.len()),
        }
    }

    /// Execute one route's steps in declared order. Abandons the remainder
    /// on the first non-continuable failure.
    async fn run_route(
        &self,
        route: &Route,
        route_index: usize,
        phase: &mut WalletPhase,
        rng: &mut StdRng,
    ) -> (ExecutionContext, bool) {
        let mut ctx = ExecutionContext {
            route_index,
            label: route.label(route_index),
            steps: Vec::with_capacity(route.steps.len()),
            error: None,
        };

        let last = route.steps.len() - 1;
        for (step_index, step) in route.steps.iter().enumerate() {
            info!(
                wallet = %self.address,
                route = route_index,
                step = step_index,
                action = %step.action(),
                "Executing step"
            );

            match self.executor.execute(step).await {
                Ok(status) => {
                    ctx.steps.push(StepRecord {
                        step_index,
                        action: step.action().name().to_string(),
                        outcome: status.label().to_string(),
                        tx_hash: Some(status.tx_hash().to_string()),
                    });
                    if matches!(status, StepStatus::TimedOut { .. }) {
                        warn!(
                            wallet = %self.address,
                            route = route_index,
                            step = step_index,
                            "Step outcome unknown after timeout, continuing"
                        );
                    }
                }
                Err(e) => {
                    warn!(
                        wallet = %self.address,
                        route = route_index,
                        step = step_index,
                        action = %step.action(),
                        error_kind = e.kind(),
                        error = %e,
                        "Step failed, abandoning remainder of route"
                    );
                    ctx.steps.push(StepRecord {
                        step_index,
                        action: step.action().name().to_string(),
                        outcome: e.kind().to_string(),
                        tx_hash: None,
                    });
                    ctx.error = Some(e.to_string());
                    return (ctx, false);
                }
            }

            if step_index < last {
                self.transition(phase, WalletPhase::InterStepDelay);
                let (min, max) = self.config.delay_step;
                let secs = if max > min { rng.gen_range(min..=max) } else { min };
                debug!(wallet = %self.address, delay_secs = secs, "Inter-step delay");
                tokio::time::sleep(Duration::from_secs_f64(secs)).await;
                self.transition(phase, WalletPhase::RunningRoute);
            }
        }

        (ctx, true)
    }

    fn transition(&self, phase: &mut WalletPhase, next: WalletPhase) {
        if *phase != next {
            debug!(wallet = %self.address, from = ?phase, to = ?next, "Scheduler phase change");
            *phase = next;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::mock::MockChainClient;
    use crate::routes::parse_routes;

    fn test_config(routes_count: Option<u32>, percentage: bool) -> Arc<RunConfig> {
        let mut config = RunConfig::default();
        config.delay_step = (0.0, 0.0);
        config.routes_count = routes_count;
        config.swap_percentage = percentage;
        config.confirmation_timeout_secs = 1;
        config.rpc_retry_attempts = 2;
        config.rpc_retry_backoff_ms = 1;
        Arc::new(config)
    }

    fn scheduler(
        client: Arc<MockChainClient>,
        routes: &str,
        config: Arc<RunConfig>,
    ) -> RouteScheduler {
        let routes = Arc::new(parse_routes(routes, config.swap_percentage).unwrap());
        RouteScheduler::new("0xwallet".into(), client, routes, config)
    }

    const CYCLE: &str = r#"[{ "steps": [
        { "action": "swap", "params": { "token_in": "WETH", "token_out": "USDC", "amount_in": 0.05 } },
        { "action": "swap", "params": { "token_in": "USDC", "token_out": "PURR", "amount_in": 0.9 } },
        { "action": "swap", "params": { "token_in": "PURR", "token_out": "WETH", "amount_in": 0.9 } }
    ]}]"#;

    #[tokio::test]
    async fn steps_execute_in_declared_order_with_balance_flow() {
        let client = Arc::new(MockChainClient::new([("WETH", 1.0)]));
        let report = scheduler(client.clone(), CYCLE, test_config(Some(1), true))
            .run()
            .await;

        assert_eq!(report.routes_attempted, 1);
        assert_eq!(report.routes_completed, 1);
        assert!(report.clean);

        let submissions = client.submissions();
        assert_eq!(submissions.len(), 3);
        // Declared order, amounts chained through live balances:
        // 0.05 x 1.0 WETH, then 0.9 of the 0.05 USDC, then 0.9 of that.
        assert_eq!(submissions[0].token_in, "WETH");
        assert!((submissions[0].amount - 0.05).abs() < 1e-12);
        assert_eq!(submissions[1].token_in, "USDC");
        assert!((submissions[1].amount - 0.045).abs() < 1e-12);
        assert_eq!(submissions[2].token_in, "PURR");
        assert!((submissions[2].amount - 0.0405).abs() < 1e-12);
    }

    #[tokio::test]
    async fn route_budget_is_exact() {
        let client = Arc::new(MockChainClient::new([("HYPE", 100.0), ("WETH", 100.0)]));
        let routes = r#"[{ "steps": [ { "action": "wrap", "params": { "amount_in": 0.01 } } ]}]"#;
        let report = scheduler(client.clone(), routes, test_config(Some(3), true))
            .run()
            .await;

        assert_eq!(report.routes_attempted, 3);
        assert_eq!(client.submissions().len(), 3);
    }

    #[tokio::test]
    async fn failed_route_counts_and_later_routes_still_run() {
        let client = Arc::new(MockChainClient::new([("WETH", 1.0)]));
        // First confirmation reverts: route 1 abandons at step 0 and the
        // remaining two steps never submit. Route 2 then runs fully.
        client.fail_next_confirmation_with_revert();

        let report = scheduler(client.clone(), CYCLE, test_config(Some(2), true))
            .run()
            .await;

        assert_eq!(report.routes_attempted, 2);
        assert_eq!(report.routes_completed, 1);
        assert_eq!(report.routes_failed, 1);
        assert!(!report.clean);

        // 1 submission for the abandoned route + 3 for the complete one.
        assert_eq!(client.submissions().len(), 4);
        assert!(!report.routes[0].completed);
        assert_eq!(report.routes[0].steps.len(), 1);
        assert_eq!(report.routes[0].steps[0].outcome, "transaction_rejected");
        assert!(report.routes[1].completed);
    }

    #[tokio::test]
    async fn insufficient_balance_abandons_route_not_wallet() {
        // No USDC at all: the first step fails before submitting, but the
        // next route attempt still starts from scratch.
        let client = Arc::new(MockChainClient::new([("WETH", 1.0)]));
        let routes = r#"[{ "steps": [
            { "action": "swap", "params": { "token_in": "USDC", "token_out": "PURR", "amount_in": 0.9 } },
            { "action": "swap", "params": { "token_in": "PURR", "token_out": "WETH", "amount_in": 0.9 } }
        ]}]"#;
        let report = scheduler(client.clone(), routes, test_config(Some(2), true))
            .run()
            .await;

        assert_eq!(report.routes_attempted, 2);
        assert_eq!(report.routes_failed, 2);
        for route in &report.routes {
            assert_eq!(route.steps.len(), 1);
            assert_eq!(route.steps[0].outcome, "insufficient_balance");
        }
        // Nothing was ever submitted.
        assert!(client.submissions().is_empty());
    }

    #[tokio::test]
    async fn sequential_selection_cycles_routes() {
        let client = Arc::new(MockChainClient::new([("HYPE", 100.0), ("WETH", 100.0)]));
        let routes = r#"[
            { "name": "a", "steps": [ { "action": "wrap", "params": { "amount_in": 0.01 } } ]},
            { "name": "b", "steps": [ { "action": "unwrap", "params": { "amount_in": 0.01 } } ]}
        ]"#;
        let report = scheduler(client, routes, test_config(Some(4), true)).run().await;

        let order: Vec<&str> = report.routes.iter().map(|r| r.label.as_str()).collect();
        assert_eq!(order, ["a", "b", "a", "b"]);
    }

    #[tokio::test]
    async fn exhausted_report_includes_final_balances() {
        let client = Arc::new(MockChainClient::new([("HYPE", 2.0), ("WETH", 1.0)]));
        let routes = r#"[{ "steps": [ { "action": "wrap", "params": { "amount_in": 0.5 } } ]}]"#;
        let report = scheduler(client, routes, test_config(Some(1), true)).run().await;

        // 0.5 of 2.0 HYPE wrapped.
        assert!((report.final_balances["HYPE"] - 1.0).abs() < 1e-12);
        assert!((report.final_balances["WETH"] - 2.0).abs() < 1e-12);
    }
}
