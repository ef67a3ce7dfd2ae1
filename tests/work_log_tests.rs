use pretty_assertions::assert_eq;
use uuid::Uuid;

use edifica::database::models::{
    BulkEntryInput, BulkWorkLogInput, UpdateWorkLogInput, WorkLogQuery, WorkLogState,
};
use edifica::error::AppError;
use edifica::services::{BulkEntryService, LedgerService, SettlementService};

mod common;
use common::{Tenant, date, dec, try_pool};

fn row(worker_id: Uuid, regular: &str, overtime: &str) -> BulkEntryInput {
    BulkEntryInput {
        worker_id,
        regular_hours: dec(regular),
        overtime_hours: dec(overtime),
    }
}

#[actix_rt::test]
async fn rate_snapshot_survives_a_raise() {
    let Some(pool) = try_pool().await else { return };
    let tenant = Tenant::create(&pool).await;
    let worker = tenant.worker(&pool, "Marko", "20.00").await;
    let project = tenant.project(&pool, "Harbour", "OPEN").await;
    let bulk = BulkEntryService::new(pool.clone());

    let first = bulk
        .submit(
            tenant.company_id,
            BulkWorkLogInput {
                project_id: project,
                date: date(2024, 1, 10),
                entries: vec![row(worker, "8", "0")],
            },
        )
        .await
        .unwrap();

    tenant.set_rate(&pool, worker, "25.00").await;

    let second = bulk
        .submit(
            tenant.company_id,
            BulkWorkLogInput {
                project_id: project,
                date: date(2024, 1, 11),
                entries: vec![row(worker, "8", "0")],
            },
        )
        .await
        .unwrap();

    assert_eq!(first[0].hourly_rate_at_time, dec("20.00"));
    assert_eq!(second[0].hourly_rate_at_time, dec("25.00"));

    let ledger = LedgerService::new(pool.clone());
    let pending = ledger.list_pending(tenant.company_id).await.unwrap();
    let stored = pending
        .iter()
        .find(|log| log.entry.id == first[0].id)
        .expect("first entry still pending");
    assert_eq!(stored.entry.hourly_rate_at_time, dec("20.00"));

    let receipt = SettlementService::new(pool.clone())
        .settle_worker(tenant.company_id, worker, None, None)
        .await
        .unwrap();
    assert_eq!(receipt.payout.total_amount, dec("360.00"));
}

#[actix_rt::test]
async fn zero_hour_rows_are_not_stored() {
    let Some(pool) = try_pool().await else { return };
    let tenant = Tenant::create(&pool).await;
    let busy = tenant.worker(&pool, "Ivana", "18.00").await;
    let idle = tenant.worker(&pool, "Josip", "18.00").await;
    let project = tenant.project(&pool, "Depot", "OPEN").await;

    let created = BulkEntryService::new(pool.clone())
        .submit(
            tenant.company_id,
            BulkWorkLogInput {
                project_id: project,
                date: date(2024, 2, 1),
                entries: vec![row(busy, "8", "0"), row(idle, "0", "0")],
            },
        )
        .await
        .unwrap();

    assert_eq!(created.len(), 1);
    assert_eq!(created[0].worker_id, busy);
    assert_eq!(created[0].state, WorkLogState::Pending);

    let all = LedgerService::new(pool.clone())
        .list_all(tenant.company_id, &WorkLogQuery::default())
        .await
        .unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].worker.first_name, "Ivana");
    assert_eq!(all[0].project_name, "Depot");
}

#[actix_rt::test]
async fn unknown_worker_rolls_back_the_whole_submission() {
    let Some(pool) = try_pool().await else { return };
    let tenant = Tenant::create(&pool).await;
    let other = Tenant::create(&pool).await;
    let worker = tenant.worker(&pool, "Ana", "20.00").await;
    let foreign_worker = other.worker(&pool, "Luka", "20.00").await;
    let project = tenant.project(&pool, "Bridge", "OPEN").await;

    let err = BulkEntryService::new(pool.clone())
        .submit(
            tenant.company_id,
            BulkWorkLogInput {
                project_id: project,
                date: date(2024, 2, 2),
                entries: vec![row(worker, "8", "0"), row(foreign_worker, "8", "0")],
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));

    let all = LedgerService::new(pool.clone())
        .list_all(tenant.company_id, &WorkLogQuery::default())
        .await
        .unwrap();
    assert!(all.is_empty());
}

#[actix_rt::test]
async fn project_of_another_tenant_is_not_found() {
    let Some(pool) = try_pool().await else { return };
    let tenant = Tenant::create(&pool).await;
    let other = Tenant::create(&pool).await;
    let worker = tenant.worker(&pool, "Ana", "20.00").await;
    let foreign_project = other.project(&pool, "Elsewhere", "OPEN").await;

    let err = BulkEntryService::new(pool.clone())
        .submit(
            tenant.company_id,
            BulkWorkLogInput {
                project_id: foreign_project,
                date: date(2024, 2, 2),
                entries: vec![row(worker, "8", "0")],
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[actix_rt::test]
async fn tenants_never_see_each_others_logs() {
    let Some(pool) = try_pool().await else { return };
    let tenant = Tenant::create(&pool).await;
    let other = Tenant::create(&pool).await;
    let worker = tenant.worker(&pool, "Petra", "22.00").await;
    let project = tenant.project(&pool, "Tower", "OPEN").await;

    let created = BulkEntryService::new(pool.clone())
        .submit(
            tenant.company_id,
            BulkWorkLogInput {
                project_id: project,
                date: date(2024, 3, 1),
                entries: vec![row(worker, "8", "1")],
            },
        )
        .await
        .unwrap();
    let id = created[0].id;

    let ledger = LedgerService::new(pool.clone());
    assert!(ledger.list_pending(other.company_id).await.unwrap().is_empty());
    assert!(
        ledger
            .list_all(other.company_id, &WorkLogQuery::default())
            .await
            .unwrap()
            .is_empty()
    );

    let update = UpdateWorkLogInput {
        regular_hours: Some(dec("2")),
        ..Default::default()
    };
    assert!(matches!(
        ledger.update(other.company_id, id, update).await,
        Err(AppError::NotFound(_))
    ));
    assert!(matches!(
        ledger.delete(other.company_id, id).await,
        Err(AppError::NotFound(_))
    ));

    let settlement = SettlementService::new(pool.clone());
    assert!(matches!(
        settlement.settle_worker(other.company_id, worker, None, None).await,
        Err(AppError::NotFound(_))
    ));

    assert_eq!(ledger.list_pending(tenant.company_id).await.unwrap().len(), 1);
}

#[actix_rt::test]
async fn settled_entries_are_locked_against_edits_and_deletion() {
    let Some(pool) = try_pool().await else { return };
    let tenant = Tenant::create(&pool).await;
    let worker = tenant.worker(&pool, "Tomislav", "20.00").await;
    let project = tenant.project(&pool, "School", "OPEN").await;

    let created = BulkEntryService::new(pool.clone())
        .submit(
            tenant.company_id,
            BulkWorkLogInput {
                project_id: project,
                date: date(2024, 3, 4),
                entries: vec![row(worker, "8", "0")],
            },
        )
        .await
        .unwrap();
    let id = created[0].id;

    SettlementService::new(pool.clone())
        .settle_worker(tenant.company_id, worker, None, None)
        .await
        .unwrap();

    let ledger = LedgerService::new(pool.clone());
    assert!(matches!(
        ledger.delete(tenant.company_id, id).await,
        Err(AppError::InvalidState(_))
    ));

    let update = UpdateWorkLogInput {
        overtime_hours: Some(dec("3")),
        ..Default::default()
    };
    assert!(matches!(
        ledger.update(tenant.company_id, id, update).await,
        Err(AppError::InvalidState(_))
    ));

    let settled = ledger.list_settled(tenant.company_id).await.unwrap();
    assert_eq!(settled.len(), 1);
    assert_eq!(settled[0].entry.overtime_hours, dec("0.00"));
}

#[actix_rt::test]
async fn pending_entries_can_be_corrected_and_deleted() {
    let Some(pool) = try_pool().await else { return };
    let tenant = Tenant::create(&pool).await;
    let worker = tenant.worker(&pool, "Nikola", "20.00").await;
    let project = tenant.project(&pool, "Mall", "OPEN").await;
    let second_project = tenant.project(&pool, "Annex", "OPEN").await;

    let created = BulkEntryService::new(pool.clone())
        .submit(
            tenant.company_id,
            BulkWorkLogInput {
                project_id: project,
                date: date(2024, 3, 5),
                entries: vec![row(worker, "8", "0")],
            },
        )
        .await
        .unwrap();
    let id = created[0].id;

    let ledger = LedgerService::new(pool.clone());
    let updated = ledger
        .update(
            tenant.company_id,
            id,
            UpdateWorkLogInput {
                date: Some(date(2024, 3, 6)),
                project_id: Some(second_project),
                regular_hours: Some(dec("7.5")),
                overtime_hours: Some(dec("1")),
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.date, date(2024, 3, 6));
    assert_eq!(updated.project_id, second_project);
    assert_eq!(updated.regular_hours, dec("7.50"));
    assert_eq!(updated.overtime_hours, dec("1.00"));
    assert_eq!(updated.hourly_rate_at_time, dec("20.00"));

    let in_range = ledger
        .list_all(
            tenant.company_id,
            &WorkLogQuery {
                from: Some(date(2024, 3, 6)),
                to: Some(date(2024, 3, 6)),
            },
        )
        .await
        .unwrap();
    assert_eq!(in_range.len(), 1);
    assert_eq!(in_range[0].project_name, "Annex");

    ledger.delete(tenant.company_id, id).await.unwrap();
    assert!(ledger.list_pending(tenant.company_id).await.unwrap().is_empty());
    assert!(matches!(
        ledger.delete(tenant.company_id, id).await,
        Err(AppError::NotFound(_))
    ));
}
