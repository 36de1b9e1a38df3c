#![cfg(feature = "runtime")]

use std::fs;

use backoffice_tables::domain::query::PageResetPolicy;
use backoffice_tables::domain::types::SortOrder;
use backoffice_tables::models::config::TableConfig;

#[test]
fn missing_files_fall_back_to_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let config = TableConfig::load(dir.path(), "local").unwrap();
    assert_eq!(config, TableConfig::default());
}

#[test]
fn profile_overrides_default_file() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("default.yaml"),
        "quiet_period_ms: 300\ndefault_limit: 20\npage_size_options: [20, 50]\n",
    )
    .unwrap();
    fs::write(
        dir.path().join("staging.yaml"),
        "default_sort_order: asc\npage_reset: preserve\n",
    )
    .unwrap();

    let config = TableConfig::load(dir.path(), "staging").unwrap();

    assert_eq!(config.quiet_period_ms, 300);
    assert_eq!(config.default_limit.get(), 20);
    assert_eq!(config.page_size_options, vec![20, 50]);
    assert_eq!(config.default_sort_order, SortOrder::Asc);
    assert_eq!(config.page_reset, PageResetPolicy::Preserve);
}

#[test]
fn default_limit_must_be_offered() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("default.yaml"),
        "default_limit: 25\npage_size_options: [10, 20]\n",
    )
    .unwrap();

    assert!(TableConfig::load(dir.path(), "local").is_err());
}

#[test]
fn zero_default_limit_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("default.yaml"), "default_limit: 0\n").unwrap();

    assert!(TableConfig::load(dir.path(), "local").is_err());
}
