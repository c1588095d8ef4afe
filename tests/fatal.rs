//! Behavior that ends the process.
//!
//! Each scenario lives in a `child_*` test that does nothing unless the test binary was re-executed
//! by the matching parent test, which then checks the exit status and standard error of the child.

use anyhow::{Result, ensure};
use std::process::{Command, Output};
use tryframe::{ASSERT_ERROR, Identity, MAX_REGISTRATIONS, Try, assert, location, throw, throw_at};

const CHILD_ENV: &str = "TRYFRAME_FATAL_CHILD";

static DISK_FULL: Identity = Identity::new("Disk full");
static NAMELESS: Identity = Identity::anonymous();
static HANDLED: Identity = Identity::new("Handled elsewhere");

fn is_child(name: &str) -> bool {
    std::env::var_os(CHILD_ENV).is_some_and(|child| child == name)
}

fn run_child(name: &str) -> Result<(Output, String)> {
    let output = Command::new(std::env::current_exe()?)
        .args([name, "--exact", "--nocapture", "--test-threads=1"])
        .env(CHILD_ENV, name)
        .output()?;
    let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
    Ok((output, stderr))
}

fn diagnostic(stderr: &str) -> &str {
    stderr
        .lines()
        .find(|line| line.contains("Uncaught exception"))
        .unwrap_or_default()
}

#[test]
fn child_uncaught() {
    if !is_child("child_uncaught") {
        return;
    }
    Try::new().catch(&HANDLED, |_| ()).run(|| {
        eprintln!("record: body");
        throw_at(&DISK_FULL, location!());
    });
    eprintln!("record: unreachable");
}

#[test]
fn uncaught_exception_aborts() -> Result<()> {
    let (output, stderr) = run_child("child_uncaught")?;
    ensure!(!output.status.success(), "child exited successfully: {stderr}");
    ensure!(stderr.contains("record: body"), "body did not run: {stderr}");
    ensure!(!stderr.contains("record: unreachable"), "control resumed: {stderr}");
    let diagnostic = diagnostic(&stderr);
    let line = diagnostic
        .strip_prefix("tests/fatal.rs:child_uncaught:")
        .or_else(|| diagnostic.strip_prefix("tests\\fatal.rs:child_uncaught:"))
        .and_then(|rest| rest.strip_suffix(": Uncaught exception `Disk full`"));
    ensure!(
        line.is_some_and(|line| line.parse::<u32>().is_ok()),
        "unexpected diagnostic {diagnostic:?}",
    );
    Ok(())
}

#[test]
fn child_uncaught_anonymous() {
    if !is_child("child_uncaught_anonymous") {
        return;
    }
    eprintln!("record: address {:p}", &NAMELESS);
    throw(&NAMELESS);
}

#[test]
fn uncaught_anonymous_exception_reports_address() -> Result<()> {
    let (output, stderr) = run_child("child_uncaught_anonymous")?;
    ensure!(!output.status.success(), "child exited successfully: {stderr}");
    let address = stderr
        .lines()
        .find_map(|line| line.strip_prefix("record: address "))
        .unwrap_or_default()
        .to_owned();
    ensure!(!address.is_empty(), "address was not recorded: {stderr}");
    ensure!(
        diagnostic(&stderr) == format!("Uncaught exception @{address}"),
        "unexpected diagnostic: {stderr}",
    );
    Ok(())
}

#[test]
fn child_uncaught_with_cleanup() {
    if !is_child("child_uncaught_with_cleanup") {
        return;
    }
    Try::<()>::new()
        .finally(|| eprintln!("record: outer cleanup"))
        .run(|| {
            Try::<()>::new().run(|| {
                Try::<()>::new()
                    .finally(|| eprintln!("record: inner cleanup"))
                    .run(|| throw(&DISK_FULL));
            });
        });
    eprintln!("record: unreachable");
}

#[test]
fn uncaught_exception_runs_cleanup_then_aborts() -> Result<()> {
    let (output, stderr) = run_child("child_uncaught_with_cleanup")?;
    ensure!(!output.status.success(), "child exited successfully: {stderr}");
    ensure!(!stderr.contains("record: unreachable"), "control resumed: {stderr}");
    let inner = stderr.find("record: inner cleanup");
    let outer = stderr.find("record: outer cleanup");
    let diagnostic = stderr.find("Uncaught exception `Disk full`");
    ensure!(diagnostic.is_some(), "missing diagnostic: {stderr}");
    if cfg!(uncaught_cleanup = "run") {
        ensure!(
            inner < outer && outer < diagnostic && inner.is_some(),
            "cleanups out of order: {stderr}",
        );
    } else {
        ensure!(inner.is_none() && outer.is_none(), "cleanup ran: {stderr}");
    }
    Ok(())
}

#[test]
fn child_unhandled_assertion() {
    if !is_child("child_unhandled_assertion") {
        return;
    }
    assert(1 + 1 == 3);
}

#[test]
fn unhandled_assertion_aborts() -> Result<()> {
    let (output, stderr) = run_child("child_unhandled_assertion")?;
    ensure!(!output.status.success(), "child exited successfully: {stderr}");
    ensure!(
        diagnostic(&stderr) == "Uncaught exception `Assertion failed`",
        "unexpected diagnostic: {stderr}",
    );
    Ok(())
}

#[test]
fn child_handled_assertion() {
    if !is_child("child_handled_assertion") {
        return;
    }
    Try::new()
        .catch(&ASSERT_ERROR, |_| eprintln!("record: caught"))
        .run(|| assert(1 == 2));
}

#[test]
fn handled_assertion_exits_normally() -> Result<()> {
    let (output, stderr) = run_child("child_handled_assertion")?;
    ensure!(output.status.success(), "child failed: {stderr}");
    let records: Vec<_> = stderr
        .lines()
        .filter_map(|line| line.strip_prefix("record: "))
        .collect();
    ensure!(records == ["caught"], "unexpected records {records:?}");
    Ok(())
}

#[test]
fn child_too_many_handlers() {
    if !is_child("child_too_many_handlers") {
        return;
    }
    let mut block = Try::new();
    for _ in 0..=MAX_REGISTRATIONS {
        block = block.catch(&HANDLED, |_| ());
    }
    block.run(|| eprintln!("record: body"));
}

#[test]
fn child_too_many_clauses_with_cleanup() {
    if !is_child("child_too_many_clauses_with_cleanup") {
        return;
    }
    let mut block = Try::new();
    for _ in 0..MAX_REGISTRATIONS {
        block = block.catch(&HANDLED, |_| ());
    }
    block
        .finally(|| eprintln!("record: cleanup"))
        .run(|| eprintln!("record: body"));
}

#[test]
fn registration_overflow_exits_before_body() -> Result<()> {
    for child in ["child_too_many_handlers", "child_too_many_clauses_with_cleanup"] {
        let (output, stderr) = run_child(child)?;
        ensure!(output.status.code() == Some(1), "{child}: unexpected status {:?}", output.status);
        ensure!(!stderr.contains("record: "), "{child}: block ran: {stderr}");
        ensure!(
            stderr.contains(&format!("more than {MAX_REGISTRATIONS} clauses")),
            "{child}: unexpected diagnostic: {stderr}",
        );
    }
    Ok(())
}

#[test]
fn child_swallowed_transfer() {
    if !is_child("child_swallowed_transfer") {
        return;
    }
    Try::new()
        .catch(&HANDLED, |_| eprintln!("record: handled"))
        .run(|| {
            Try::<()>::new().run(|| {
                let _ = std::panic::catch_unwind(|| -> () { throw(&HANDLED) });
                eprintln!("record: inner body resumed");
            });
            eprintln!("record: after inner block");
        });
    eprintln!("record: unreachable");
}

#[test]
fn swallowed_transfer_aborts() -> Result<()> {
    let (output, stderr) = run_child("child_swallowed_transfer")?;
    ensure!(!output.status.success(), "child exited successfully: {stderr}");
    if cfg!(unix) {
        ensure!(output.status.code().is_none(), "child exited instead of aborting: {stderr}");
    }
    let records: Vec<_> = stderr
        .lines()
        .filter_map(|line| line.strip_prefix("record: "))
        .collect();
    ensure!(records == ["inner body resumed"], "unexpected records {records:?}");
    ensure!(
        stderr.contains(
            "tryframe: block completed while not on top of the stack. \
             The process will now terminate."
        ),
        "unexpected diagnostic: {stderr}",
    );
    ensure!(!stderr.contains("panicked"), "consistency check panicked: {stderr}");
    Ok(())
}
