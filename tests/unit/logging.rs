use super::*;

#[test]
fn test_failure_hint_names_log_dir() {
    let (_writer, worker) = tracing_appender::non_blocking(std::io::sink());
    let dir = std::env::temp_dir().join("zbook-hint").join("logs");
    let guard = LoggingGuard {
        _guard: worker,
        log_dir: dir.clone(),
    };

    assert_eq!(guard.log_dir(), dir.as_path());
    assert!(guard.failure_hint().ends_with(&dir.display().to_string()));
}
