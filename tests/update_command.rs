#![allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
//! Integration tests for the `jau` update pipeline.

mod common;

use common::{ScriptedExecutor, context};
use jtools::commands::update;
use jtools::error::Failure;
use jtools::logging::TaskStatus;
use jtools::tasks::update::update_tasks;

#[test]
fn pipeline_step_names() {
    let tasks = update_tasks();
    let names: Vec<&str> = tasks.iter().map(|t| t.name()).collect();
    insta::assert_snapshot!("update_step_names", names.join("\n"));
}

#[test]
fn full_run_issues_every_command_in_order() {
    let (ctx, exec, log) = context(ScriptedExecutor::new(), false);
    update::run(&ctx).unwrap();
    assert_eq!(
        exec.calls(),
        vec![
            "sudo dnf install -y rpmconf dnf-plugins-core",
            "sudo dnf makecache --refresh",
            "sudo dnf upgrade -y",
            "sudo rpmconf -a",
            "dnf check-update --security",
            "sudo dnf autoremove -y",
            "sudo dnf clean all",
            "flatpak update -y",
            "flatpak uninstall --unused -y",
        ]
    );
    let tasks = log.tasks();
    assert_eq!(tasks.len(), 9);
    assert_eq!(tasks[4], ("Apply security updates".to_string(), TaskStatus::Skipped));
    assert!(tasks.iter().filter(|(n, _)| n != "Apply security updates").all(|(_, s)| *s == TaskStatus::Ok));
}

#[test]
fn pending_security_updates_are_installed() {
    let (ctx, exec, _) = context(ScriptedExecutor::new().fail("check-update", 100), false);
    update::run(&ctx).unwrap();
    let calls = exec.calls();
    let check = calls.iter().position(|c| c == "dnf check-update --security").unwrap();
    assert_eq!(calls[check + 1], "sudo dnf upgrade -y --security");
}

#[test]
fn failing_step_stops_the_pipeline() {
    let (ctx, exec, log) = context(ScriptedExecutor::new().fail("dnf upgrade -y", 1), false);
    let err = update::run(&ctx).unwrap_err();
    assert_eq!(err.code(), 6);
    assert_eq!(exec.calls().len(), 3);
    let tasks = log.tasks();
    assert_eq!(tasks.last().unwrap(), &("Apply updates".to_string(), TaskStatus::Failed));
}

#[test]
fn missing_flatpak_skips_its_steps() {
    let (ctx, exec, log) = context(ScriptedExecutor::new().missing("flatpak"), false);
    update::run(&ctx).unwrap();
    assert!(!exec.calls().iter().any(|c| c.starts_with("flatpak")));
    let skipped = log
        .tasks()
        .into_iter()
        .filter(|(_, s)| *s == TaskStatus::Skipped)
        .count();
    assert_eq!(skipped, 3);
}

#[test]
fn dry_run_changes_nothing() {
    let (ctx, exec, log) = context(ScriptedExecutor::new(), true);
    update::run(&ctx).unwrap();
    assert!(exec.calls().is_empty());
    assert!(log.tasks().iter().all(|(_, s)| *s == TaskStatus::DryRun));
}

#[test]
fn missing_sudo_is_code_3() {
    let (ctx, exec, _) = context(ScriptedExecutor::new().missing("sudo"), false);
    assert_eq!(update::run(&ctx).unwrap_err().code(), 3);
    assert!(exec.calls().is_empty());
}
