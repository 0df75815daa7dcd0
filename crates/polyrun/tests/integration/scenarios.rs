use polyrun::{ExecutionRequest, PipelineError, ResolveError, SupportedLanguage};

use super::{fixture_source, leftover, scratch_root, test_pipeline};

#[tokio::test]
async fn scenario_a_python_hello() {
    let root = scratch_root();
    let result = test_pipeline(&root)
        .execute(&ExecutionRequest::from_filename("print('hello')", "script.py"))
        .await
        .expect("Execution failed");

    assert_eq!(result.output, "hello\n");
    assert_eq!(result.error, "");
    assert!(result.success);
    assert_eq!(result.execution_time, 0);
    assert_eq!(result.language, SupportedLanguage::Python);
    assert_eq!(leftover(&root), 0);
}

#[tokio::test]
async fn scenario_c_c_compile_error() {
    let root = scratch_root();
    let result = test_pipeline(&root)
        .execute(&ExecutionRequest::from_filename(
            fixture_source("compile_error.c"),
            "program.c",
        ))
        .await
        .expect("Execution failed");

    assert!(!result.success);
    assert!(result.error.starts_with("Compilation error: "));
    assert_eq!(result.output, "");
    assert_eq!(result.execution_time, 0);
    assert_eq!(result.language, SupportedLanguage::C);
    assert_eq!(leftover(&root), 0);
}

#[tokio::test]
async fn scenario_d_java_without_public_class() {
    let root = scratch_root();
    let result = test_pipeline(&root)
        .execute(&ExecutionRequest::from_filename(
            fixture_source("no_public_class.java"),
            "Hidden.java",
        ))
        .await
        .expect("Execution failed");

    assert!(!result.success);
    assert_eq!(result.error, "Could not find public class name in Java code");
    assert_eq!(leftover(&root), 0);
}

#[tokio::test]
async fn scenario_e_unsupported_extension() {
    let root = scratch_root();
    let err = test_pipeline(&root)
        .execute(&ExecutionRequest::from_filename("puts 'hi'", "script.rb"))
        .await
        .expect_err("ruby must be rejected");

    assert!(err.is_client_error());
    assert!(matches!(
        err,
        PipelineError::Unsupported(ResolveError::UnsupportedExtension(ref ext)) if ext == ".rb"
    ));
    assert_eq!(leftover(&root), 0);
}

#[tokio::test]
async fn python_runtime_failure_is_in_band() {
    let root = scratch_root();
    let result = test_pipeline(&root)
        .execute(&ExecutionRequest::from_filename(
            "print('before')\nraise SystemExit('boom')",
            "script.py",
        ))
        .await
        .expect("Execution failed");

    assert!(!result.success);
    assert_eq!(result.output, "before\n");
    assert!(result.error.contains("boom"));
    assert_eq!(result.execution_time, 0);
}

#[tokio::test]
async fn python_by_language_tag() {
    let root = scratch_root();
    let result = test_pipeline(&root)
        .execute(&ExecutionRequest::from_language("print(6 * 7)", "Python"))
        .await
        .expect("Execution failed");

    assert!(result.success);
    assert_eq!(result.output, "42\n");
}

#[tokio::test]
async fn identical_requests_are_idempotent() {
    let root = scratch_root();
    let pipeline = test_pipeline(&root);
    let request = ExecutionRequest::from_filename(fixture_source("exit_code.c"), "program.c");

    let first = pipeline.execute(&request).await.expect("first run");
    let second = pipeline.execute(&request).await.expect("second run");

    assert_eq!(first, second);
    assert_eq!(leftover(&root), 0);
}
