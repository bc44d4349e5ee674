use pricecast_monitor::setup_logging;
use tempfile::tempdir;

#[test]
fn test_file_layer_writes_json_lines() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("run.log");

    let guard = setup_logging("info", false, Some(&path)).unwrap();
    tracing::info!(symbol = "AAPL", "pipeline stage finished");
    tracing::debug!("filtered out");
    drop(guard);

    let contents = std::fs::read_to_string(&path).unwrap();
    assert!(contents.contains("pipeline stage finished"));
    assert!(contents.contains("\"symbol\":\"AAPL\""));
    assert!(!contents.contains("filtered out"));

    assert!(setup_logging("info", false, None).is_err());
}
