use std::time::Duration;

use polyrun::{ExecutionRequest, Pipeline};

use super::{fixture_source, leftover, scratch_root, test_config, test_pipeline};

#[tokio::test]
#[ignore = "waits for the full 10 second timeout"]
async fn scenario_b_python_infinite_loop() {
    let root = scratch_root();
    let result = test_pipeline(&root)
        .execute(&ExecutionRequest::from_filename("while True: pass", "script.py"))
        .await
        .expect("Execution failed");

    assert!(!result.success);
    assert_eq!(result.error, "Execution timed out (exceeded 10 seconds)");
    assert_eq!(result.execution_time, 10);
    assert_eq!(result.output, "");
    assert_eq!(leftover(&root), 0);
}

#[tokio::test]
async fn short_timeout_kills_forked_children() {
    let root = scratch_root();
    let mut config = test_config(&root);
    config.timeout = 2;
    let pipeline = Pipeline::new(config);

    let result = pipeline
        .execute(&ExecutionRequest::from_filename(
            fixture_source("fork_sleep.py"),
            "script.py",
        ))
        .await
        .expect("Execution failed");

    assert!(!result.success);
    assert_eq!(result.error, "Execution timed out (exceeded 2 seconds)");
    assert_eq!(result.execution_time, 2);

    // Give the kernel a moment, then make sure no sleeper survived
    tokio::time::sleep(Duration::from_millis(500)).await;
    let survivors = std::process::Command::new("pgrep")
        .args(["-f", "time.sleep\\(60\\)"])
        .output()
        .expect("pgrep available");
    assert!(
        survivors.stdout.is_empty(),
        "surviving processes: {}",
        String::from_utf8_lossy(&survivors.stdout)
    );
    assert_eq!(leftover(&root), 0);
}

#[tokio::test]
async fn compiled_infinite_loop_times_out() {
    let root = scratch_root();
    let mut config = test_config(&root);
    config.timeout = 1;
    let pipeline = Pipeline::new(config);

    let result = pipeline
        .execute(&ExecutionRequest::from_filename(
            "int main(void) { for (;;) {} }",
            "spin.c",
        ))
        .await
        .expect("Execution failed");

    assert!(!result.success);
    assert_eq!(result.execution_time, 1);
    assert_eq!(leftover(&root), 0);
}

#[tokio::test]
async fn infinite_fixture_times_out_with_short_limit() {
    let root = scratch_root();
    let mut config = test_config(&root);
    config.timeout = 1;

    let result = Pipeline::new(config)
        .execute(&ExecutionRequest::from_filename(fixture_source("infinite.py"), "loop.py"))
        .await
        .expect("Execution failed");

    assert_eq!(result.error, "Execution timed out (exceeded 1 seconds)");
}
