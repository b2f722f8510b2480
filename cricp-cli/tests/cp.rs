use predicates::prelude::*;
use rstest::rstest;

use cricp_test_utils::FakeRuntime;

mod common;

#[rstest]
#[case::no_args(&[])]
#[case::one_arg(&["web:/etc/hosts"])]
#[case::three_args(&["a", "b", "c"])]
fn test_cp_wrong_arg_count(#[case] paths: &[&str]) {
    // The endpoint does not exist; a usage error proves no connection was tried.
    let dir = tempfile::tempdir().unwrap();
    common::cricp()
        .arg("--runtime-endpoint")
        .arg(format!("unix://{}", dir.path().join("absent.sock").display()))
        .arg("cp")
        .args(paths)
        .assert()
        .failure()
        .stderr(predicate::str::contains("usage: cp <src> <dst>"));
}

#[test]
fn test_cp_out_of_container() {
    let ctx = common::TestContext::new(
        FakeRuntime::containerd().with_container("abc123", "web"),
        &["abc123"],
    );
    std::fs::write(ctx.rootfs("abc123").join("etc/hosts"), "10.0.0.5 web\n").unwrap();
    let dst = ctx.state.path().join("hosts.bak");

    ctx.cmd()
        .args(["cp", "web:/etc/hosts", dst.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::is_empty());

    assert_eq!(std::fs::read_to_string(&dst).unwrap(), "10.0.0.5 web\n");
}

#[test]
fn test_cp_into_container() {
    let ctx = common::TestContext::new(
        FakeRuntime::containerd().with_container("abc123", "web"),
        &["abc123"],
    );
    let src = ctx.state.path().join("app.conf");
    std::fs::write(&src, "listen 8080\n").unwrap();

    ctx.cmd()
        .args(["cp", src.to_str().unwrap(), "web:/etc/app.conf"])
        .assert()
        .success();

    assert_eq!(
        std::fs::read_to_string(ctx.rootfs("abc123").join("etc/app.conf")).unwrap(),
        "listen 8080\n"
    );
}

#[test]
fn test_cp_unknown_container() {
    let ctx = common::TestContext::new(
        FakeRuntime::containerd().with_container("abc123", "web"),
        &["abc123"],
    );

    ctx.cmd()
        .args(["cp", "cache:/etc/hosts", "/tmp/cricp-never-written"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no container matches pattern 'cache'"));
}

#[test]
fn test_cp_ambiguous_container() {
    let ctx = common::TestContext::new(
        FakeRuntime::containerd()
            .with_container("abc123", "web")
            .with_container("def456", "web-canary"),
        &["abc123", "def456"],
    );

    ctx.cmd()
        .args(["cp", "web:/etc/hosts", "/tmp/cricp-never-written"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("web (abc123, running)"))
        .stderr(predicate::str::contains("web-canary (def456, running)"));
}

#[test]
fn test_cp_unsupported_runtime() {
    let ctx = common::TestContext::new(
        FakeRuntime::new("cri-o").with_container("abc123", "web"),
        &["abc123"],
    );

    ctx.cmd()
        .args(["cp", "web:/etc/hosts", "/tmp/cricp-never-written"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("copy not supported for runtime 'cri-o'"));
}

#[test]
fn test_cp_container_not_mounted() {
    let ctx = common::TestContext::new(
        FakeRuntime::containerd().with_container("abc123", "web"),
        &[],
    );

    ctx.cmd()
        .args(["cp", "web:/etc/hosts", "/tmp/cricp-never-written"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("could not find the rootfs for container abc123"));
}

#[test]
fn test_cp_copy_failure_reported() {
    let ctx = common::TestContext::new(
        FakeRuntime::containerd().with_container("abc123", "web"),
        &["abc123"],
    );

    ctx.cmd()
        .args(["cp", "web:/etc/missing", "/tmp/cricp-never-written"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("copy:"))
        .stderr(predicate::str::contains("missing"));
}

#[test]
fn test_cp_unreachable_runtime() {
    let dir = tempfile::tempdir().unwrap();
    common::cricp()
        .arg("--runtime-endpoint")
        .arg(format!("unix://{}", dir.path().join("absent.sock").display()))
        .args(["cp", "web:/etc/hosts", "/tmp/cricp-never-written"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("rpc transport"));
}

#[test]
fn test_cp_endpoint_from_env() {
    let ctx = common::TestContext::new(
        FakeRuntime::containerd().with_container("abc123", "web"),
        &["abc123"],
    );
    std::fs::write(ctx.rootfs("abc123").join("etc/hostname"), "web\n").unwrap();
    let dst = ctx.state.path().join("hostname");

    common::cricp()
        .env("CONTAINER_RUNTIME_ENDPOINT", ctx.server.endpoint())
        .arg("--mount-table")
        .arg(ctx.mounts())
        .args(["cp", "web:/etc/hostname", dst.to_str().unwrap()])
        .assert()
        .success();

    assert_eq!(std::fs::read_to_string(&dst).unwrap(), "web\n");
}
