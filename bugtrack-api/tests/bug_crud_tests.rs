//! End-to-end CRUD tests for the bug collection.
//!
//! These tests run against a live PostgreSQL instance configured through
//! the BUGTRACK_DB_* environment variables and are gated behind the
//! `db-tests` feature:
//!
//! ```sh
//! cargo test -p bugtrack-api --features db-tests
//! ```
//!
//! Each test isolates its records behind a unique assignee so tests can
//! share one database.

#![cfg(feature = "db-tests")]

use bugtrack_api::{types::total_pages, ApiResult, BugFilter, BugPayload, DbClient, DbConfig};
use bugtrack_core::{Priority, Severity, Status};
use uuid::Uuid;

fn test_db() -> ApiResult<DbClient> {
    let config = DbConfig::from_env();
    DbClient::from_config(&config)
}

fn unique_assignee() -> String {
    format!("crud-test-{}", Uuid::now_v7())
}

fn payload(title: &str, assignee: &str) -> BugPayload {
    BugPayload {
        title: Some(title.to_string()),
        description: Some("Integration test record".to_string()),
        reported_by: Some("integration-suite".to_string()),
        assigned_to: Some(assignee.to_string()),
        ..Default::default()
    }
}

async fn setup(db: &DbClient) -> ApiResult<()> {
    db.migrate().await
}

#[tokio::test]
async fn full_crud_chain() -> ApiResult<()> {
    let db = test_db()?;
    setup(&db).await?;
    let assignee = unique_assignee();

    // Create with only required fields (plus the isolation assignee):
    // defaults must apply.
    let validated = payload("Full CRUD chain", &assignee).validate()?;
    let created = db.bug_create(&validated).await?;
    assert_eq!(created.severity, Severity::Medium);
    assert_eq!(created.status, Status::Open);
    assert_eq!(created.priority, Priority::Medium);
    assert_eq!(created.reported_by, "integration-suite");
    assert!(created.tags.is_empty());
    assert_eq!(created.created_at, created.updated_at);

    // Get returns the stored record.
    let fetched = db.bug_get(created.bug_id).await?.expect("bug should exist");
    assert_eq!(fetched, created);

    // Update is a full replacement and refreshes updated_at.
    let mut replacement = payload("Full CRUD chain (edited)", &assignee);
    replacement.status = Some(Status::Resolved);
    replacement.severity = Some(Severity::Critical);
    replacement.tags = Some(vec!["regression".to_string()]);
    let updated = db
        .bug_update(created.bug_id, &replacement.validate()?)
        .await?
        .expect("bug should exist");
    assert_eq!(updated.bug_id, created.bug_id);
    assert_eq!(updated.title, "Full CRUD chain (edited)");
    assert_eq!(updated.status, Status::Resolved);
    assert_eq!(updated.severity, Severity::Critical);
    assert_eq!(updated.tags, vec!["regression".to_string()]);
    assert_eq!(updated.created_at, created.created_at);
    assert!(updated.updated_at > created.updated_at);

    let refetched = db.bug_get(created.bug_id).await?.expect("bug should exist");
    assert_eq!(refetched, updated);

    // Delete, then get must find nothing.
    assert!(db.bug_delete(created.bug_id).await?);
    assert!(db.bug_get(created.bug_id).await?.is_none());

    // Second delete on the same identifier reports nothing deleted.
    assert!(!db.bug_delete(created.bug_id).await?);

    Ok(())
}

#[tokio::test]
async fn update_and_delete_of_unknown_id_report_absence() -> ApiResult<()> {
    let db = test_db()?;
    setup(&db).await?;

    let ghost = Uuid::now_v7();
    let validated = payload("Ghost", &unique_assignee()).validate()?;

    assert!(db.bug_update(ghost, &validated).await?.is_none());
    assert!(!db.bug_delete(ghost).await?);
    assert!(db.bug_get(ghost).await?.is_none());

    Ok(())
}

#[tokio::test]
async fn status_filter_matches_only_that_status() -> ApiResult<()> {
    let db = test_db()?;
    setup(&db).await?;
    let assignee = unique_assignee();

    for (i, status) in [Status::Open, Status::InProgress, Status::Open, Status::Closed]
        .into_iter()
        .enumerate()
    {
        let mut p = payload(&format!("Filter target {}", i), &assignee);
        p.status = Some(status);
        db.bug_create(&p.validate()?).await?;
    }

    let filter = BugFilter {
        status: Some("Open".to_string()),
        assigned_to: Some(assignee.clone()),
        ..Default::default()
    };

    let bugs = db.bug_list(&filter, 10, 0).await?;
    assert_eq!(bugs.len(), 2);
    assert!(bugs.iter().all(|b| b.status == Status::Open));
    assert_eq!(db.bug_count(&filter).await?, 2);

    // The multi-word wire form works as a filter value too.
    let filter = BugFilter {
        status: Some("In Progress".to_string()),
        assigned_to: Some(assignee.clone()),
        ..Default::default()
    };
    assert_eq!(db.bug_count(&filter).await?, 1);

    // An unknown filter value matches nothing: empty page, zero total.
    let filter = BugFilter {
        status: Some("Reopened".to_string()),
        assigned_to: Some(assignee),
        ..Default::default()
    };
    assert!(db.bug_list(&filter, 10, 0).await?.is_empty());
    assert_eq!(db.bug_count(&filter).await?, 0);

    Ok(())
}

#[tokio::test]
async fn pagination_respects_limit_and_sorts_newest_first() -> ApiResult<()> {
    let db = test_db()?;
    setup(&db).await?;
    let assignee = unique_assignee();

    for i in 0..7 {
        db.bug_create(&payload(&format!("Page item {}", i), &assignee).validate()?)
            .await?;
    }

    let filter = BugFilter {
        assigned_to: Some(assignee),
        ..Default::default()
    };
    let limit = 3i64;
    let total = db.bug_count(&filter).await?;
    assert_eq!(total, 7);
    assert_eq!(total_pages(total, limit), 3);

    let mut seen = Vec::new();
    for page in 1..=3i64 {
        let bugs = db.bug_list(&filter, limit, (page - 1) * limit).await?;
        assert!(bugs.len() as i64 <= limit);
        // Newest first within and across pages.
        for pair in bugs.windows(2) {
            assert!(pair[0].created_at >= pair[1].created_at);
        }
        seen.extend(bugs.into_iter().map(|b| b.bug_id));
    }

    assert_eq!(seen.len(), 7);
    seen.sort();
    seen.dedup();
    assert_eq!(seen.len(), 7, "pages must not overlap");

    // Walking past the last page yields an empty page.
    assert!(db.bug_list(&filter, limit, 3 * limit).await?.is_empty());

    Ok(())
}
