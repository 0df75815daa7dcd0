use polyrun::{ExecutionRequest, SupportedLanguage};

use super::{fixture_source, leftover, scratch_root, test_pipeline};

#[tokio::test]
async fn test_c_hello() {
    let root = scratch_root();
    let result = test_pipeline(&root)
        .execute(&ExecutionRequest::from_filename(fixture_source("hello.c"), "program.c"))
        .await
        .expect("Execution failed");

    assert!(result.success, "stderr: {}", result.error);
    assert_eq!(result.output, "Hello from C\n");
    assert_eq!(result.language, SupportedLanguage::C);
}

#[tokio::test]
async fn test_c_non_zero_exit() {
    let root = scratch_root();
    let result = test_pipeline(&root)
        .execute(&ExecutionRequest::from_filename(fixture_source("exit_code.c"), "program.c"))
        .await
        .expect("Execution failed");

    assert!(!result.success);
    assert_eq!(result.error, "failing on purpose\n");
    assert_eq!(result.execution_time, 0);
}

#[tokio::test]
async fn test_cpp_hello() {
    let root = scratch_root();
    let result = test_pipeline(&root)
        .execute(&ExecutionRequest::from_filename(fixture_source("hello.cpp"), "program.cpp"))
        .await
        .expect("Execution failed");

    assert!(result.success, "stderr: {}", result.error);
    assert_eq!(result.output, "Hello from C++\n");
    assert_eq!(result.language, SupportedLanguage::Cpp);
    assert_eq!(leftover(&root), 0);
}

#[tokio::test]
async fn test_cpp_compile_error() {
    let root = scratch_root();
    let result = test_pipeline(&root)
        .execute(&ExecutionRequest::from_filename("int main() { return }", "program.cpp"))
        .await
        .expect("Execution failed");

    assert!(!result.success);
    assert!(result.error.starts_with("Compilation error: "));
    assert!(result.error.len() > "Compilation error: ".len());
}

#[tokio::test]
async fn test_java_hello() {
    let root = scratch_root();
    let result = test_pipeline(&root)
        .execute(&ExecutionRequest::from_filename(fixture_source("Hello.java"), "Hello.java"))
        .await
        .expect("Execution failed");

    assert!(result.success, "stderr: {}", result.error);
    assert_eq!(result.output, "Hello from Java\n");
    assert_eq!(result.language, SupportedLanguage::Java);
    assert_eq!(leftover(&root), 0);
}

#[tokio::test]
async fn test_java_class_name_independent_of_filename() {
    let root = scratch_root();
    let result = test_pipeline(&root)
        .execute(&ExecutionRequest::from_filename(fixture_source("Hello.java"), "whatever.java"))
        .await
        .expect("Execution failed");

    assert!(result.success, "stderr: {}", result.error);
    assert_eq!(result.output, "Hello from Java\n");
}

#[tokio::test]
async fn test_java_compile_error() {
    let root = scratch_root();
    let code = "public class Broken { public static void main(String[] a) { int x = } }";
    let result = test_pipeline(&root)
        .execute(&ExecutionRequest::from_filename(code, "Broken.java"))
        .await
        .expect("Execution failed");

    assert!(!result.success);
    assert!(result.error.starts_with("Compilation error: "));
    assert_eq!(result.output, "");
}
