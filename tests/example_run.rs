//! Integration tests for the `example run` command.
use mesm::cli::RunOpts;
use mesm::cli::example::handle_example_run_command;
use mesm::settings::Settings;
use std::fs;
use tempfile::tempdir;

/// An integration test for the `example run` command.
#[test]
fn test_handle_example_run_command() {
    unsafe { std::env::set_var("MESM_LOG_LEVEL", "off") };

    let tempdir = tempdir().unwrap();
    let opts = RunOpts {
        output_dir: Some(tempdir.path().to_path_buf()),
        overwrite: false,
    };
    handle_example_run_command("simple", &opts, Some(Settings::default())).unwrap();

    let summary = fs::read_to_string(tempdir.path().join("cost_summary.csv")).unwrap();
    assert!(summary.starts_with("item,value,unit\n"));
    assert!(summary.contains("\nresidual,"));
}
