//! End-to-end tests over the public engine API: campaign batches, the
//! record lifecycle and campaign summaries, wired to the in-memory
//! collaborators and the shipped municipal configuration.

use std::sync::Arc;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::str::FromStr;

use benefit_engine::batch::{BatchOrchestrator, BatchRequest, CancelFlag};
use benefit_engine::config::{ConfigLoader, EngineConfig};
use benefit_engine::error::EngineError;
use benefit_engine::gateway::{
    InMemoryDirectory, InMemoryGateway, PersistenceGateway, RecordFilter,
    StaticRemunerationHistory, WorkerDirectory,
};
use benefit_engine::lifecycle::{DELETE_CONFIRMATION, LifecycleManager};
use benefit_engine::models::{
    AccountType, BankingDetails, BenefitType, Currency, LaborRegime, PensionScheme, PeriodTag,
    RecordState, TaxProfile, WorkerSnapshot,
};
use benefit_engine::summary::summarize;

fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

fn worker(id: &str, name: &str, area: &str, basic: Option<&str>) -> WorkerSnapshot {
    WorkerSnapshot {
        id: id.to_string(),
        national_id: "45678901".to_string(),
        full_name: name.to_string(),
        area: area.to_string(),
        position: "Asistente administrativo".to_string(),
        hire_date: NaiveDate::from_ymd_opt(2022, 3, 1).unwrap(),
        vacation_reset_date: None,
        labor_regime: LaborRegime::Regime728,
        basic_remuneration: basic.map(dec),
        family_allowance: Decimal::ZERO,
        days_worked: 280,
        tax_profile: TaxProfile {
            pension: PensionScheme::Onp,
            income_tax_exempt: false,
        },
        banking: BankingDetails {
            bank: "BCP".to_string(),
            account_type: AccountType::Savings,
            account_number: "191-12345678-0-01".to_string(),
            currency: Currency::Pen,
        },
    }
}

fn municipal_config() -> EngineConfig {
    ConfigLoader::load("config/municipal").unwrap().into_config()
}

struct Engine {
    gateway: Arc<InMemoryGateway>,
    orchestrator: BatchOrchestrator,
    lifecycle: LifecycleManager<InMemoryGateway>,
}

fn engine(workers: Vec<WorkerSnapshot>) -> Engine {
    let gateway = Arc::new(InMemoryGateway::new());
    let directory: Arc<dyn WorkerDirectory> = Arc::new(InMemoryDirectory::new(workers));
    let history = Arc::new(StaticRemunerationHistory::default());
    let config = Arc::new(municipal_config());
    Engine {
        gateway: Arc::clone(&gateway),
        orchestrator: BatchOrchestrator::new(
            Arc::clone(&gateway) as Arc<dyn PersistenceGateway>,
            directory,
            history,
            config,
        ),
        lifecycle: LifecycleManager::new(gateway),
    }
}

fn ids(names: &[&str]) -> Vec<String> {
    names.iter().map(|n| n.to_string()).collect()
}

fn request(benefit_type: BenefitType, tag: PeriodTag, year: i32) -> BatchRequest {
    BatchRequest {
        benefit_type,
        tag,
        year,
        actor: "admin".to_string(),
        company_profit: None,
        as_of: None,
    }
}

#[tokio::test]
async fn test_gratificacion_pipeline_runs_to_payment() {
    let engine = engine(vec![worker("w_001", "María Quispe", "Rentas", Some("2500.00"))]);

    let outcome = engine
        .orchestrator
        .run_batch(
            &ids(&["w_001"]),
            &request(BenefitType::Gratificacion, PeriodTag::FirstHalf, 2025),
            &CancelFlag::new(),
        )
        .await
        .unwrap();
    assert_eq!(outcome.succeeded.len(), 1);
    let calculated = &outcome.succeeded[0];
    assert_eq!(calculated.gross_amount, dec("2500.00"));
    // ONP 13% = 325.00, income tax 8% = 200.00
    assert_eq!(calculated.net_amount, dec("1975.00"));
    assert_eq!(calculated.extraordinary_bonus, Some(dec("225.00")));

    let approved = engine.lifecycle.approve(calculated, "tesorero").unwrap();
    let paid = engine.lifecycle.disburse(&approved, "cajero").unwrap();

    assert_eq!(paid.state, RecordState::Paid);
    assert!(paid.receipt_number.is_some());
    assert_eq!(paid.paid_by.as_deref(), Some("cajero"));
    // calculate (no transition audit), approve, disburse
    assert_eq!(engine.gateway.audit_log().len(), 2);
}

#[tokio::test]
async fn test_cts_pipeline_deposits_with_bonus_sixth() {
    let mut w = worker("w_001", "María Quispe", "Rentas", Some("1000.00"));
    w.family_allowance = dec("50.00");
    let gateway = Arc::new(InMemoryGateway::new());
    let history = Arc::new(StaticRemunerationHistory::default());
    let orchestrator = BatchOrchestrator::new(
        Arc::clone(&gateway) as Arc<dyn PersistenceGateway>,
        Arc::new(InMemoryDirectory::new(vec![w])),
        history,
        Arc::new(municipal_config()),
    );
    let lifecycle = LifecycleManager::new(Arc::clone(&gateway));

    let outcome = orchestrator
        .run_batch(
            &ids(&["w_001"]),
            &request(BenefitType::Cts, PeriodTag::FirstHalf, 2025),
            &CancelFlag::new(),
        )
        .await
        .unwrap();

    let record = &outcome.succeeded[0];
    // (1000 + 50) * 6 / 12 = 525.00
    assert_eq!(record.gross_amount, dec("525.00"));
    assert!(record.code.starts_with("CTS-2025-"));
    assert_eq!(record.period_start, NaiveDate::from_ymd_opt(2024, 11, 1).unwrap());

    let approved = lifecycle.approve(record, "tesorero").unwrap();
    let deposited = lifecycle.disburse(&approved, "cajero").unwrap();
    assert_eq!(deposited.state, RecordState::Deposited);
}

#[tokio::test]
async fn test_batch_isolates_worker_with_missing_data() {
    let engine = engine(vec![
        worker("w_001", "María Quispe", "Rentas", Some("2500.00")),
        worker("w_002", "Jorge Huamán", "Limpieza Pública", Some("1800.00")),
        worker("w_003", "Rosa Díaz", "Rentas", None),
        worker("w_004", "Luis Mamani", "Serenazgo", Some("2000.00")),
        worker("w_005", "Ana Ccopa", "Serenazgo", Some("2200.00")),
    ]);

    let outcome = engine
        .orchestrator
        .run_batch(
            &ids(&["w_001", "w_002", "w_003", "w_004", "w_005"]),
            &request(BenefitType::Gratificacion, PeriodTag::SecondHalf, 2025),
            &CancelFlag::new(),
        )
        .await
        .unwrap();

    assert_eq!(outcome.succeeded.len(), 4);
    assert_eq!(outcome.failed.len(), 1);
    assert_eq!(outcome.failed[0].worker_id, "w_003");
    assert!(matches!(
        outcome.failed[0].reason,
        EngineError::IncompleteRemunerationData { .. }
    ));
    assert_eq!(engine.gateway.record_count(), 4);
}

#[tokio::test]
async fn test_observed_record_is_corrected_and_reapproved() {
    let engine = engine(vec![worker("w_001", "María Quispe", "Rentas", Some("2500.00"))]);
    let req = request(BenefitType::Gratificacion, PeriodTag::FirstHalf, 2025);

    let outcome = engine
        .orchestrator
        .run_batch(&ids(&["w_001"]), &req, &CancelFlag::new())
        .await
        .unwrap();
    let calculated = &outcome.succeeded[0];

    let approved = engine.lifecycle.approve(calculated, "tesorero").unwrap();
    let observed = engine
        .lifecycle
        .observe(&approved, "contador", "monto errado")
        .unwrap();
    assert_eq!(observed.state, RecordState::Observed);
    assert!(observed.approved_by.is_none());

    // Recalculation reuses the observed record's code.
    let second = engine
        .orchestrator
        .run_batch(&ids(&["w_001"]), &req, &CancelFlag::new())
        .await
        .unwrap();
    let recalculated = &second.succeeded[0];
    assert_eq!(recalculated.code, observed.code);
    assert_eq!(recalculated.state, RecordState::Calculated);
    assert_eq!(recalculated.version, observed.version + 1);

    let reapproved = engine.lifecycle.approve(recalculated, "tesorero").unwrap();
    assert_eq!(reapproved.state, RecordState::Approved);
    assert_eq!(engine.gateway.record_count(), 1);
    // approve, observe, recalculate, re-approve: every transition audited.
    assert_eq!(engine.gateway.audit_log().len(), 4);
}

#[tokio::test]
async fn test_lifecycle_rejects_state_skips_and_locked_deletes() {
    let engine = engine(vec![worker("w_001", "María Quispe", "Rentas", Some("2500.00"))]);

    let outcome = engine
        .orchestrator
        .run_batch(
            &ids(&["w_001"]),
            &request(BenefitType::Gratificacion, PeriodTag::FirstHalf, 2025),
            &CancelFlag::new(),
        )
        .await
        .unwrap();
    let calculated = &outcome.succeeded[0];

    // No skipping straight to payment.
    assert!(matches!(
        engine.lifecycle.disburse(calculated, "cajero").unwrap_err(),
        EngineError::InvalidTransition { .. }
    ));

    let approved = engine.lifecycle.approve(calculated, "tesorero").unwrap();

    // Approval locks the record against deletion.
    assert!(matches!(
        engine
            .lifecycle
            .delete(&approved, "admin", DELETE_CONFIRMATION)
            .unwrap_err(),
        EngineError::RecordLocked { .. }
    ));

    // A second approver cannot take over.
    assert!(matches!(
        engine.lifecycle.approve(&approved, "contador").unwrap_err(),
        EngineError::InvalidTransition { .. }
    ));

    // The original approver's retry is idempotent.
    let again = engine.lifecycle.approve(&approved, "tesorero").unwrap();
    assert_eq!(again, approved);
}

#[tokio::test]
async fn test_deleted_record_leaves_the_summary() {
    let engine = engine(vec![
        worker("w_001", "María Quispe", "Rentas", Some("1000.00")),
        worker("w_002", "Jorge Huamán", "Rentas", Some("1000.00")),
    ]);

    let outcome = engine
        .orchestrator
        .run_batch(
            &ids(&["w_001", "w_002"]),
            &request(BenefitType::Gratificacion, PeriodTag::FirstHalf, 2025),
            &CancelFlag::new(),
        )
        .await
        .unwrap();

    let before = summarize(&engine.gateway.load_by_filter(&RecordFilter::default()).unwrap());
    assert_eq!(before.record_count, 2);
    assert_eq!(before.total_net, dec("1580.00"));

    engine
        .lifecycle
        .delete(&outcome.succeeded[0], "admin", DELETE_CONFIRMATION)
        .unwrap();

    let after = summarize(&engine.gateway.load_by_filter(&RecordFilter::default()).unwrap());
    assert_eq!(after.record_count, 1);
    assert_eq!(after.total_net, dec("790.00"));
    assert_eq!(after.by_area["Rentas"].record_count, 1);
}

#[tokio::test]
async fn test_utilidades_batch_distributes_the_pool() {
    let mut a = worker("w_001", "María Quispe", "Rentas", Some("3000.00"));
    a.days_worked = 250;
    let mut b = worker("w_002", "Jorge Huamán", "Limpieza Pública", Some("1500.00"));
    b.days_worked = 150;
    let engine = engine(vec![a, b]);

    let req = BatchRequest {
        benefit_type: BenefitType::Utilidades,
        tag: PeriodTag::Annual,
        year: 2024,
        actor: "admin".to_string(),
        company_profit: Some(dec("800000")),
        as_of: None,
    };
    let outcome = engine
        .orchestrator
        .run_batch(&ids(&["w_001", "w_002"]), &req, &CancelFlag::new())
        .await
        .unwrap();

    assert_eq!(outcome.succeeded.len(), 2);
    let total: Decimal = outcome.succeeded.iter().map(|r| r.gross_amount).sum();
    // pool = 800000 * 0.05 = 40000, recomposed within per-worker rounding
    assert!((total - dec("40000.00")).abs() <= dec("0.02"));
}

#[tokio::test]
async fn test_cancelled_batch_produces_no_records() {
    let engine = engine(vec![
        worker("w_001", "María Quispe", "Rentas", Some("2500.00")),
        worker("w_002", "Jorge Huamán", "Rentas", Some("1800.00")),
    ]);
    let cancel = CancelFlag::new();
    cancel.cancel();

    let outcome = engine
        .orchestrator
        .run_batch(
            &ids(&["w_001", "w_002"]),
            &request(BenefitType::Gratificacion, PeriodTag::FirstHalf, 2025),
            &cancel,
        )
        .await
        .unwrap();

    assert!(outcome.succeeded.is_empty());
    assert_eq!(outcome.failed.len(), 2);
    assert_eq!(engine.gateway.record_count(), 0);
}
