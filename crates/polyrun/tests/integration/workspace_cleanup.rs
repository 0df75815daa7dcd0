use polyrun::{ExecutionRequest, Pipeline};

use super::{fixture_source, leftover, scratch_root, test_config};

#[tokio::test]
async fn every_outcome_leaves_root_empty() {
    let root = scratch_root();
    let pipeline = Pipeline::new(test_config(&root));

    let requests = [
        ExecutionRequest::from_filename("print('ok')", "a.py"),
        ExecutionRequest::from_filename("import sys; sys.exit(1)", "a.py"),
        ExecutionRequest::from_filename(fixture_source("compile_error.c"), "program.c"),
        ExecutionRequest::from_filename(fixture_source("hello.cpp"), "program.cpp"),
        ExecutionRequest::from_filename(fixture_source("no_public_class.java"), "X.java"),
        ExecutionRequest::from_filename(fixture_source("Hello.java"), "Hello.java"),
        ExecutionRequest::from_filename("x", "x.rb"),
    ];

    for request in &requests {
        let _ = pipeline.execute(request).await;
        assert_eq!(leftover(&root), 0, "workspace left behind for {:?}", request.target);
    }
}

#[tokio::test]
async fn concurrent_requests_do_not_interfere() {
    let root = scratch_root();
    let pipeline = Pipeline::new(test_config(&root));

    let mut handles = Vec::new();
    for i in 0..8 {
        let pipeline = pipeline.clone();
        handles.push(tokio::spawn(async move {
            let code = format!("print({i})");
            let result = pipeline
                .execute(&ExecutionRequest::from_filename(code, "script.py"))
                .await
                .expect("Execution failed");
            (i, result)
        }));
    }

    for handle in handles {
        let (i, result) = handle.await.expect("task panicked");
        assert!(result.success);
        assert_eq!(result.output, format!("{i}\n"));
    }
    assert_eq!(leftover(&root), 0);
}
