//! Tests for the journal lock.

use super::*;
use crate::config::Config;
use crate::context::WorkspaceContext;
use crate::error::BrigadeError;
use chrono::{Duration as ChronoDuration, Utc};
use std::time::Duration;
use tempfile::TempDir;

fn create_test_workspace() -> (TempDir, WorkspaceContext) {
    let temp = TempDir::new().unwrap();
    std::fs::create_dir_all(temp.path().join(".brigade")).unwrap();
    let ctx = WorkspaceContext::at(temp.path());
    (temp, ctx)
}

fn holder_aged(action: &str, minutes: i64) -> LockHolder {
    LockHolder {
        owner: "ops@build-host".to_string(),
        pid: Some(4242),
        created_at: Utc::now() - ChronoDuration::minutes(minutes),
        action: action.to_string(),
    }
}

fn write_holder(ctx: &WorkspaceContext, holder: &LockHolder) {
    std::fs::create_dir_all(&ctx.locks_dir).unwrap();
    std::fs::write(
        ctx.journal_lock_path(),
        serde_json::to_string(holder).unwrap(),
    )
    .unwrap();
}

#[test]
fn test_acquire_records_holder() {
    let (_temp, ctx) = create_test_workspace();
    let config = Config::default();

    let _lock = acquire_journal_lock(&ctx, "session start", Duration::ZERO).unwrap();

    let held = journal_lock_info(&ctx, &config).unwrap().unwrap();
    assert_eq!(held.holder.action, "session start");
    assert_eq!(held.holder.pid, Some(std::process::id()));
    assert!(held.holder.owner.contains('@'));
    assert!(!held.is_stale);
}

#[test]
fn test_drop_releases_lock() {
    let (_temp, ctx) = create_test_workspace();

    {
        let _lock = acquire_journal_lock(&ctx, "test", Duration::ZERO).unwrap();
        assert!(ctx.journal_lock_path().exists());
    }

    assert!(!ctx.journal_lock_path().exists());
}

#[test]
fn test_second_acquire_names_current_holder() {
    let (_temp, ctx) = create_test_workspace();

    let _lock = acquire_journal_lock(&ctx, "first", Duration::ZERO).unwrap();
    let err = acquire_journal_lock(&ctx, "second", Duration::from_millis(50)).unwrap_err();

    assert!(matches!(err, BrigadeError::LockError(_)));
    let msg = err.to_string();
    assert!(msg.contains("held by another process"));
    assert!(msg.contains("action: first"));
}

#[test]
fn test_waiting_acquire_succeeds_after_release() {
    let (_temp, ctx) = create_test_workspace();
    let lock = acquire_journal_lock(&ctx, "first", Duration::ZERO).unwrap();

    std::thread::scope(|s| {
        let waiter = s.spawn(|| acquire_journal_lock(&ctx, "second", Duration::from_secs(5)));
        std::thread::sleep(Duration::from_millis(50));
        drop(lock);
        assert!(waiter.join().unwrap().is_ok());
    });
}

#[test]
fn test_lock_info_none_when_free() {
    let (_temp, ctx) = create_test_workspace();
    assert!(journal_lock_info(&ctx, &Config::default()).unwrap().is_none());
}

#[test]
fn test_stale_lock_is_reported_and_clearable() {
    let (_temp, ctx) = create_test_workspace();
    write_holder(&ctx, &holder_aged("session finish", 120));

    let config = Config::default();
    let held = journal_lock_info(&ctx, &config).unwrap().unwrap();
    assert!(held.is_stale);
    assert_eq!(held.holder.owner, "ops@build-host");

    let cleared = clear_journal_lock(&ctx, &config).unwrap();
    assert_eq!(cleared.holder.action, "session finish");
    assert!(!ctx.journal_lock_path().exists());
}

#[test]
fn test_unreadable_lock_is_lock_error() {
    let (_temp, ctx) = create_test_workspace();
    std::fs::create_dir_all(&ctx.locks_dir).unwrap();
    std::fs::write(ctx.journal_lock_path(), "not json").unwrap();

    let err = journal_lock_info(&ctx, &Config::default()).unwrap_err();
    assert!(matches!(err, BrigadeError::LockError(_)));
}

#[test]
fn test_clear_missing_lock_fails() {
    let (_temp, ctx) = create_test_workspace();
    let err = clear_journal_lock(&ctx, &Config::default()).unwrap_err();
    assert!(err.to_string().contains("does not exist"));
}

#[test]
fn test_holder_age_formats() {
    assert_eq!(holder_aged("x", 5).age(), "5m");
    assert_eq!(holder_aged("x", 125).age(), "2h 5m");
    assert_eq!(holder_aged("x", 50 * 60).age(), "2d 2h");
}
