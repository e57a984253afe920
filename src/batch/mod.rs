//! Campaign batch orchestration.
//!
//! Runs one benefit calculation over a selected worker set. Workers are
//! isolated failure boundaries: one worker's missing data or duplicate
//! record never aborts the rest of the campaign. The per-worker pipelines
//! fan out over a bounded worker pool; the profit-share benefit runs a
//! sequential first phase to fix its distribution denominators before the
//! fan-out.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{info, warn};
use uuid::Uuid;

use crate::calculation::{
    BatchTotals, RemunerationBase, RemunerationHistory, apply_deductions, compute_cts,
    compute_gratificacion, compute_utilidades, compute_vacaciones, resolve_base, resolve_period,
    vacation_period,
};
use crate::config::EngineConfig;
use crate::error::{EngineError, EngineResult};
use crate::gateway::{PersistenceGateway, RecordFilter, WorkerDirectory};
use crate::lifecycle::LifecycleManager;
use crate::models::{
    BenefitPeriod, BenefitRecord, BenefitType, PeriodTag, RecordState, WorkerSnapshot,
};

/// The parameters of one campaign run.
#[derive(Debug, Clone)]
pub struct BatchRequest {
    /// The benefit to calculate.
    pub benefit_type: BenefitType,
    /// The campaign tag. Continuous-accrual benefits use `Annual`.
    pub tag: PeriodTag,
    /// The campaign year.
    pub year: i32,
    /// Who runs the campaign; recorded as `calculated_by` on every record.
    pub actor: String,
    /// The fiscal-year company profit; required for the profit share only.
    pub company_profit: Option<Decimal>,
    /// The reference date for continuous accruals. Defaults to today.
    pub as_of: Option<NaiveDate>,
}

/// One worker's failure inside a batch.
#[derive(Debug, Clone)]
pub struct BatchFailure {
    /// The worker whose pipeline failed.
    pub worker_id: String,
    /// Why it failed.
    pub reason: EngineError,
}

/// The outcome of a campaign run.
#[derive(Debug, Clone, Default)]
pub struct BatchOutcome {
    /// The records calculated and persisted, ordered by worker id.
    pub succeeded: Vec<BenefitRecord>,
    /// The per-worker failures, ordered by worker id.
    pub failed: Vec<BatchFailure>,
}

/// A cooperative cancellation handle shared between a batch and its caller.
///
/// Cancellation is checked before each worker's pipeline starts; pipelines
/// already running complete normally.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    /// Creates a flag in the not-cancelled state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests cancellation of the batch.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    /// Returns true once cancellation has been requested.
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Runs campaign batches against the engine's collaborators.
///
/// Fresh records are persisted directly as `Calculated`; the recalculation
/// of an observed record is a lifecycle transition and goes through the
/// orchestrator's [`LifecycleManager`], which audits it and guards against
/// concurrent transitions on the same record.
pub struct BatchOrchestrator {
    gateway: Arc<dyn PersistenceGateway>,
    lifecycle: Arc<LifecycleManager<dyn PersistenceGateway>>,
    directory: Arc<dyn WorkerDirectory>,
    history: Arc<dyn RemunerationHistory>,
    config: Arc<EngineConfig>,
    max_concurrency: usize,
}

impl BatchOrchestrator {
    /// Creates an orchestrator with the default worker-pool width.
    pub fn new(
        gateway: Arc<dyn PersistenceGateway>,
        directory: Arc<dyn WorkerDirectory>,
        history: Arc<dyn RemunerationHistory>,
        config: Arc<EngineConfig>,
    ) -> Self {
        let lifecycle = Arc::new(LifecycleManager::new(Arc::clone(&gateway)));
        Self {
            gateway,
            lifecycle,
            directory,
            history,
            config,
            max_concurrency: 8,
        }
    }

    /// Overrides the number of worker pipelines running at once.
    pub fn with_max_concurrency(mut self, max_concurrency: usize) -> Self {
        self.max_concurrency = max_concurrency.max(1);
        self
    }

    /// Runs one campaign over the requested workers.
    ///
    /// Each worker is processed independently; failures are collected per
    /// worker instead of aborting the batch. The whole batch fails only when
    /// its inputs are unusable (an illegal campaign, a missing company profit
    /// for the profit share) or the worker directory is unreachable.
    pub async fn run_batch(
        &self,
        worker_ids: &[String],
        request: &BatchRequest,
        cancel: &CancelFlag,
    ) -> EngineResult<BatchOutcome> {
        let as_of = request.as_of.unwrap_or_else(|| Utc::now().date_naive());
        let selection_period = self.selection_period(request, as_of)?;

        let predicate: Box<dyn Fn(&WorkerSnapshot) -> bool> = match request.benefit_type {
            BenefitType::Cts => Box::new(WorkerSnapshot::is_cts_eligible),
            _ => Box::new(|_| true),
        };
        let eligible: HashMap<String, WorkerSnapshot> = self
            .directory
            .list_eligible_workers(request.benefit_type, &selection_period, predicate.as_ref())?
            .into_iter()
            .map(|w| (w.id.clone(), w))
            .collect();

        let mut failed = Vec::new();
        let mut selected = Vec::new();
        for worker_id in worker_ids {
            match eligible.get(worker_id) {
                Some(worker) => selected.push(worker.clone()),
                None => failed.push(BatchFailure {
                    worker_id: worker_id.clone(),
                    reason: EngineError::WorkerNotEligible {
                        worker_id: worker_id.clone(),
                        benefit_type: request.benefit_type,
                    },
                }),
            }
        }

        // The profit share needs its distribution denominators fixed over
        // the selected set before any share is computed, so the bases are
        // resolved sequentially first.
        let mut prepared: HashMap<String, RemunerationBase> = HashMap::new();
        let mut profit_share: Option<(Decimal, BatchTotals)> = None;
        if request.benefit_type == BenefitType::Utilidades {
            let profit =
                request
                    .company_profit
                    .ok_or_else(|| EngineError::InvalidPeriod {
                        benefit_type: BenefitType::Utilidades,
                        tag: request.tag,
                        message: "the fiscal-year company profit is required".to_string(),
                    })?;
            let period = resolve_period(request.benefit_type, request.tag, request.year)?;
            let mut retained = Vec::new();
            let mut pairs = Vec::new();
            for worker in selected {
                match resolve_base(&worker, &period, self.history.as_ref()) {
                    Ok(base) => pairs.push((worker, base)),
                    Err(reason) => failed.push(BatchFailure {
                        worker_id: worker.id.clone(),
                        reason,
                    }),
                }
            }
            let totals = BatchTotals::from_workers(pairs.iter().map(|(w, b)| (w, b)));
            for (worker, base) in pairs {
                prepared.insert(worker.id.clone(), base);
                retained.push(worker);
            }
            selected = retained;
            profit_share = Some((profit, totals));
        }

        let semaphore = Arc::new(Semaphore::new(self.max_concurrency));
        let mut join_set = JoinSet::new();
        for worker in selected {
            let gateway = Arc::clone(&self.gateway);
            let lifecycle = Arc::clone(&self.lifecycle);
            let history = Arc::clone(&self.history);
            let config = Arc::clone(&self.config);
            let request = request.clone();
            let cancel = cancel.clone();
            let semaphore = Arc::clone(&semaphore);
            let base = prepared.remove(&worker.id);
            join_set.spawn(async move {
                let worker_id = worker.id.clone();
                let _permit = match semaphore.acquire_owned().await {
                    Ok(permit) => permit,
                    Err(_) => {
                        return (
                            worker_id.clone(),
                            Err(EngineError::Cancelled { worker_id }),
                        );
                    }
                };
                if cancel.is_cancelled() {
                    return (
                        worker_id.clone(),
                        Err(EngineError::Cancelled { worker_id }),
                    );
                }
                let result = calculate_worker(
                    gateway.as_ref(),
                    lifecycle.as_ref(),
                    history.as_ref(),
                    &config,
                    &request,
                    &worker,
                    as_of,
                    profit_share,
                    base,
                );
                (worker_id, result)
            });
        }

        let mut succeeded = Vec::new();
        while let Some(joined) = join_set.join_next().await {
            match joined {
                Ok((_, Ok(record))) => succeeded.push(record),
                Ok((worker_id, Err(reason))) => failed.push(BatchFailure { worker_id, reason }),
                Err(join_err) => {
                    warn!(error = %join_err, "worker pipeline task failed to join");
                }
            }
        }

        succeeded.sort_by(|a, b| a.worker_id.cmp(&b.worker_id));
        failed.sort_by(|a, b| a.worker_id.cmp(&b.worker_id));
        info!(
            benefit = %request.benefit_type,
            year = request.year,
            succeeded = succeeded.len(),
            failed = failed.len(),
            "campaign batch finished"
        );
        Ok(BatchOutcome { succeeded, failed })
    }

    /// The period the worker directory is queried with. Continuous accruals
    /// have no campaign window, so the year up to the reference date is used.
    fn selection_period(
        &self,
        request: &BatchRequest,
        as_of: NaiveDate,
    ) -> EngineResult<BenefitPeriod> {
        match request.benefit_type {
            BenefitType::Vacaciones => {
                let start = NaiveDate::from_ymd_opt(request.year, 1, 1).unwrap_or_default();
                Ok(BenefitPeriod {
                    benefit_type: BenefitType::Vacaciones,
                    tag: PeriodTag::Annual,
                    year: request.year,
                    start,
                    end: as_of.max(start),
                    service_months: 0,
                })
            }
            _ => resolve_period(request.benefit_type, request.tag, request.year),
        }
    }
}

/// Runs one worker's calculation pipeline and persists the resulting record.
#[allow(clippy::too_many_arguments)]
fn calculate_worker(
    gateway: &dyn PersistenceGateway,
    lifecycle: &LifecycleManager<dyn PersistenceGateway>,
    history: &dyn RemunerationHistory,
    config: &EngineConfig,
    request: &BatchRequest,
    worker: &WorkerSnapshot,
    as_of: NaiveDate,
    profit_share: Option<(Decimal, BatchTotals)>,
    prepared_base: Option<RemunerationBase>,
) -> EngineResult<BenefitRecord> {
    let (period, reuse, gross) = match request.benefit_type {
        BenefitType::Vacaciones => {
            let reset = worker.vacation_reset_date.unwrap_or(worker.hire_date);
            let (period, service) = vacation_period(reset, as_of, request.year);
            let reuse = check_duplicates(gateway, worker, request, period.tag)?;
            let base = resolve_base(worker, &period, history)?;
            let gross = compute_vacaciones(worker, &period, &service, &base, config)?;
            return assemble_record(
                gateway, lifecycle, config, request, worker, &period, gross, reuse,
            );
        }
        _ => {
            let period = resolve_period(request.benefit_type, request.tag, request.year)?;
            let reuse = check_duplicates(gateway, worker, request, period.tag)?;
            let base = match prepared_base {
                Some(base) => base,
                None => resolve_base(worker, &period, history)?,
            };
            let gross = match request.benefit_type {
                BenefitType::Cts => compute_cts(worker, &period, &base, config)?,
                BenefitType::Gratificacion => {
                    compute_gratificacion(worker, &period, &base, config)?
                }
                BenefitType::Utilidades => {
                    let (profit, totals) =
                        profit_share.ok_or_else(|| EngineError::InvalidPeriod {
                            benefit_type: BenefitType::Utilidades,
                            tag: request.tag,
                            message: "the fiscal-year company profit is required".to_string(),
                        })?;
                    compute_utilidades(worker, &period, &base, config, profit, &totals)?
                }
                BenefitType::Vacaciones => unreachable!("handled above"),
            };
            (period, reuse, gross)
        }
    };
    assemble_record(gateway, lifecycle, config, request, worker, &period, gross, reuse)
}

/// Checks for an existing record of this worker, benefit and period.
///
/// A non-observed record blocks the calculation; an observed record is
/// recalculated in place, returning its code and stored version.
fn check_duplicates(
    gateway: &dyn PersistenceGateway,
    worker: &WorkerSnapshot,
    request: &BatchRequest,
    tag: PeriodTag,
) -> EngineResult<Option<(String, u64)>> {
    let existing = gateway.load_by_filter(&RecordFilter::by_worker_period(
        &worker.id,
        request.benefit_type,
        tag,
        request.year,
    ))?;
    let mut reuse = None;
    for record in existing {
        if record.state == RecordState::Observed {
            reuse = Some((record.code, record.version));
        } else {
            return Err(EngineError::DuplicateCalculation {
                worker_id: worker.id.clone(),
                record_code: record.code,
                state: record.state,
            });
        }
    }
    Ok(reuse)
}

/// Applies deductions, assembles the record and persists it as `Calculated`.
///
/// A reused observed record is replaced through the lifecycle manager, so
/// the recalculation is audited and fails with `StaleState` when the record
/// moved since the duplicate scan.
#[allow(clippy::too_many_arguments)]
fn assemble_record(
    gateway: &dyn PersistenceGateway,
    lifecycle: &LifecycleManager<dyn PersistenceGateway>,
    config: &EngineConfig,
    request: &BatchRequest,
    worker: &WorkerSnapshot,
    period: &BenefitPeriod,
    gross: crate::calculation::GrossBenefit,
    reuse: Option<(String, u64)>,
) -> EngineResult<BenefitRecord> {
    let outcome = apply_deductions(&worker.id, gross.gross, &worker.tax_profile, config.deductions())?;

    let (code, version) = match &reuse {
        Some((code, stored_version)) => (code.clone(), stored_version + 1),
        None => (new_record_code(request.benefit_type, request.year), 1),
    };

    let record = BenefitRecord {
        code,
        worker_id: worker.id.clone(),
        worker_name: worker.full_name.clone(),
        area: worker.area.clone(),
        benefit_type: request.benefit_type,
        period_tag: period.tag,
        year: request.year,
        period_start: period.start,
        period_end: period.end,
        service: gross.service,
        remuneration: gross.breakdown,
        days_generated: gross.days_generated,
        extraordinary_bonus: gross.extraordinary_bonus,
        gross_amount: gross.gross,
        deductions: outcome.lines,
        total_deductions: outcome.total,
        net_amount: outcome.net,
        banking: worker.banking.clone(),
        state: RecordState::Calculated,
        observation: None,
        calculated_at: Utc::now(),
        approved_at: None,
        paid_at: None,
        calculated_by: request.actor.clone(),
        approved_by: None,
        paid_by: None,
        receipt_number: None,
        config_version: config.version().to_string(),
        version,
    };
    match reuse {
        Some((_, stored_version)) => lifecycle.replace_calculation(stored_version, record),
        None => gateway.save(&record),
    }
}

/// Generates a record code like `CTS-2025-a1b2c3d4`.
fn new_record_code(benefit_type: BenefitType, year: i32) -> String {
    let id = Uuid::new_v4().simple().to_string();
    format!("{}-{}-{}", benefit_type.code_prefix(), year, &id[..8])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculation::testutil::{test_config, test_worker};
    use crate::gateway::{InMemoryDirectory, InMemoryGateway, StaticRemunerationHistory};
    use crate::models::LaborRegime;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn ids(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    fn orchestrator(
        workers: Vec<WorkerSnapshot>,
    ) -> (BatchOrchestrator, Arc<InMemoryGateway>) {
        let gateway = Arc::new(InMemoryGateway::new());
        let orchestrator = BatchOrchestrator::new(
            Arc::clone(&gateway) as Arc<dyn PersistenceGateway>,
            Arc::new(InMemoryDirectory::new(workers)),
            Arc::new(StaticRemunerationHistory::default()),
            Arc::new(test_config()),
        );
        (orchestrator, gateway)
    }

    fn grati_request() -> BatchRequest {
        BatchRequest {
            benefit_type: BenefitType::Gratificacion,
            tag: PeriodTag::FirstHalf,
            year: 2025,
            actor: "admin".to_string(),
            company_profit: None,
            as_of: None,
        }
    }

    #[tokio::test]
    async fn test_batch_calculates_and_persists_records() {
        let workers = vec![
            test_worker("w_001", Some(dec("2500.00"))),
            test_worker("w_002", Some(dec("1800.00"))),
        ];
        let (orchestrator, gateway) = orchestrator(workers);

        let outcome = orchestrator
            .run_batch(&ids(&["w_001", "w_002"]), &grati_request(), &CancelFlag::new())
            .await
            .unwrap();

        assert_eq!(outcome.succeeded.len(), 2);
        assert!(outcome.failed.is_empty());
        assert_eq!(gateway.record_count(), 2);

        let first = &outcome.succeeded[0];
        assert_eq!(first.worker_id, "w_001");
        assert!(first.code.starts_with("GRA-2025-"));
        assert_eq!(first.state, RecordState::Calculated);
        assert_eq!(first.gross_amount, dec("2500.00"));
        // ONP 13% + income tax 8%
        assert_eq!(first.total_deductions, dec("525.00"));
        assert_eq!(first.net_amount, dec("1975.00"));
        assert_eq!(first.extraordinary_bonus, Some(dec("225.00")));
        assert_eq!(first.config_version, "2025-01");
        assert_eq!(first.calculated_by, "admin");
        assert!(first.totals_consistent());
    }

    #[tokio::test]
    async fn test_one_workers_failure_is_isolated() {
        let workers = vec![
            test_worker("w_001", Some(dec("2500.00"))),
            test_worker("w_002", None),
            test_worker("w_003", Some(dec("1800.00"))),
        ];
        let (orchestrator, gateway) = orchestrator(workers);

        let outcome = orchestrator
            .run_batch(
                &ids(&["w_001", "w_002", "w_003"]),
                &grati_request(),
                &CancelFlag::new(),
            )
            .await
            .unwrap();

        assert_eq!(outcome.succeeded.len(), 2);
        assert_eq!(outcome.failed.len(), 1);
        assert_eq!(outcome.failed[0].worker_id, "w_002");
        assert!(matches!(
            outcome.failed[0].reason,
            EngineError::IncompleteRemunerationData { .. }
        ));
        assert_eq!(gateway.record_count(), 2);
    }

    #[tokio::test]
    async fn test_unknown_worker_is_not_eligible() {
        let workers = vec![test_worker("w_001", Some(dec("2500.00")))];
        let (orchestrator, _gateway) = orchestrator(workers);

        let outcome = orchestrator
            .run_batch(&ids(&["w_001", "w_999"]), &grati_request(), &CancelFlag::new())
            .await
            .unwrap();

        assert_eq!(outcome.succeeded.len(), 1);
        assert_eq!(outcome.failed.len(), 1);
        assert!(matches!(
            outcome.failed[0].reason,
            EngineError::WorkerNotEligible { .. }
        ));
    }

    #[tokio::test]
    async fn test_cts_excludes_non_private_regime() {
        let mut cas_worker = test_worker("w_002", Some(dec("1800.00")));
        cas_worker.labor_regime = LaborRegime::Cas;
        let workers = vec![test_worker("w_001", Some(dec("1000.00"))), cas_worker];
        let (orchestrator, _gateway) = orchestrator(workers);

        let request = BatchRequest {
            benefit_type: BenefitType::Cts,
            tag: PeriodTag::FirstHalf,
            year: 2025,
            actor: "admin".to_string(),
            company_profit: None,
            as_of: None,
        };
        let outcome = orchestrator
            .run_batch(&ids(&["w_001", "w_002"]), &request, &CancelFlag::new())
            .await
            .unwrap();

        assert_eq!(outcome.succeeded.len(), 1);
        assert_eq!(outcome.succeeded[0].worker_id, "w_001");
        assert!(matches!(
            outcome.failed[0].reason,
            EngineError::WorkerNotEligible {
                benefit_type: BenefitType::Cts,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_existing_record_blocks_recalculation() {
        let workers = vec![test_worker("w_001", Some(dec("2500.00")))];
        let (orchestrator, _gateway) = orchestrator(workers);
        let request = grati_request();

        let first = orchestrator
            .run_batch(&ids(&["w_001"]), &request, &CancelFlag::new())
            .await
            .unwrap();
        assert_eq!(first.succeeded.len(), 1);

        let second = orchestrator
            .run_batch(&ids(&["w_001"]), &request, &CancelFlag::new())
            .await
            .unwrap();

        assert!(second.succeeded.is_empty());
        match &second.failed[0].reason {
            EngineError::DuplicateCalculation {
                record_code, state, ..
            } => {
                assert_eq!(record_code, &first.succeeded[0].code);
                assert_eq!(*state, RecordState::Calculated);
            }
            other => panic!("Expected DuplicateCalculation, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_observed_record_is_recalculated_in_place() {
        let workers = vec![test_worker("w_001", Some(dec("2500.00")))];
        let (orchestrator, gateway) = orchestrator(workers);
        let request = grati_request();

        let first = orchestrator
            .run_batch(&ids(&["w_001"]), &request, &CancelFlag::new())
            .await
            .unwrap();
        let mut observed = first.succeeded[0].clone();
        observed.state = RecordState::Observed;
        observed.observation = Some("monto errado".to_string());
        observed.version = 2;
        gateway.save(&observed).unwrap();

        let second = orchestrator
            .run_batch(&ids(&["w_001"]), &request, &CancelFlag::new())
            .await
            .unwrap();

        assert_eq!(second.succeeded.len(), 1);
        let recalculated = &second.succeeded[0];
        assert_eq!(recalculated.code, observed.code);
        assert_eq!(recalculated.version, 3);
        assert_eq!(recalculated.state, RecordState::Calculated);
        assert!(recalculated.observation.is_none());
        assert_eq!(gateway.record_count(), 1);

        // The in-place recalculation is a transition and must be audited.
        let audits = gateway.audit_log();
        assert_eq!(audits.len(), 1);
        assert_eq!(audits[0].record_code, observed.code);
        assert_eq!(audits[0].from_state, RecordState::Observed);
        assert_eq!(audits[0].to_state, RecordState::Calculated);
        assert_eq!(audits[0].actor, "admin");
    }

    #[tokio::test]
    async fn test_utilidades_distributes_over_selected_set() {
        let mut a = test_worker("w_001", Some(dec("2500.00")));
        a.days_worked = 300;
        let mut b = test_worker("w_002", Some(dec("2500.00")));
        b.days_worked = 100;
        let (orchestrator, _gateway) = orchestrator(vec![a, b]);

        let request = BatchRequest {
            benefit_type: BenefitType::Utilidades,
            tag: PeriodTag::Annual,
            year: 2024,
            actor: "admin".to_string(),
            company_profit: Some(dec("1000000")),
            as_of: None,
        };
        let outcome = orchestrator
            .run_batch(&ids(&["w_001", "w_002"]), &request, &CancelFlag::new())
            .await
            .unwrap();

        assert_eq!(outcome.succeeded.len(), 2);
        // days half: 25000 * 300/400 = 18750; remuneration half: 12500
        assert_eq!(outcome.succeeded[0].gross_amount, dec("31250.00"));
        assert_eq!(outcome.succeeded[1].gross_amount, dec("18750.00"));
    }

    #[tokio::test]
    async fn test_utilidades_without_profit_fails_the_batch() {
        let workers = vec![test_worker("w_001", Some(dec("2500.00")))];
        let (orchestrator, _gateway) = orchestrator(workers);

        let request = BatchRequest {
            benefit_type: BenefitType::Utilidades,
            tag: PeriodTag::Annual,
            year: 2024,
            actor: "admin".to_string(),
            company_profit: None,
            as_of: None,
        };
        let result = orchestrator
            .run_batch(&ids(&["w_001"]), &request, &CancelFlag::new())
            .await;

        assert!(matches!(
            result.unwrap_err(),
            EngineError::InvalidPeriod { .. }
        ));
    }

    #[tokio::test]
    async fn test_vacaciones_accrue_from_reset_date() {
        let mut worker = test_worker("w_001", Some(dec("3000.00")));
        worker.vacation_reset_date = Some(NaiveDate::from_ymd_opt(2025, 1, 1).unwrap());
        let (orchestrator, _gateway) = orchestrator(vec![worker]);

        let request = BatchRequest {
            benefit_type: BenefitType::Vacaciones,
            tag: PeriodTag::Annual,
            year: 2025,
            actor: "admin".to_string(),
            company_profit: None,
            as_of: Some(NaiveDate::from_ymd_opt(2025, 7, 1).unwrap()),
        };
        let outcome = orchestrator
            .run_batch(&ids(&["w_001"]), &request, &CancelFlag::new())
            .await
            .unwrap();

        assert_eq!(outcome.succeeded.len(), 1);
        let record = &outcome.succeeded[0];
        assert_eq!(record.days_generated, Some(dec("15.00")));
        assert_eq!(record.gross_amount, dec("1500.00"));
        assert!(record.code.starts_with("VAC-2025-"));
    }

    #[tokio::test]
    async fn test_cancelled_batch_fails_pending_workers() {
        let workers = vec![
            test_worker("w_001", Some(dec("2500.00"))),
            test_worker("w_002", Some(dec("1800.00"))),
        ];
        let (orchestrator, gateway) = orchestrator(workers);
        let cancel = CancelFlag::new();
        cancel.cancel();

        let outcome = orchestrator
            .run_batch(&ids(&["w_001", "w_002"]), &grati_request(), &cancel)
            .await
            .unwrap();

        assert!(outcome.succeeded.is_empty());
        assert_eq!(outcome.failed.len(), 2);
        assert!(outcome
            .failed
            .iter()
            .all(|f| matches!(f.reason, EngineError::Cancelled { .. })));
        assert_eq!(gateway.record_count(), 0);
    }

    #[tokio::test]
    async fn test_record_codes_are_unique() {
        let workers = vec![
            test_worker("w_001", Some(dec("2500.00"))),
            test_worker("w_002", Some(dec("2500.00"))),
        ];
        let (orchestrator, _gateway) = orchestrator(workers);

        let outcome = orchestrator
            .run_batch(&ids(&["w_001", "w_002"]), &grati_request(), &CancelFlag::new())
            .await
            .unwrap();

        assert_ne!(outcome.succeeded[0].code, outcome.succeeded[1].code);
    }
}
