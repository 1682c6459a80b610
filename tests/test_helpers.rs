#![allow(dead_code)]

use assert_cmd::Command;
use std::path::Path;

/// Creates a `Command` for the `daybook` binary with a clean environment whose
/// data directory is `data_dir`.
pub fn daybook_command(data_dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("daybook").expect("daybook binary not built");
    configure_daybook_command(&mut cmd, data_dir);
    cmd
}

/// Applies the standard non-interactive environment to an existing `Command`.
pub fn configure_daybook_command(cmd: &mut Command, data_dir: &Path) {
    cmd.env_clear();
    if let Ok(path) = std::env::var("PATH") {
        cmd.env("PATH", path);
    }
    if let Ok(tmpdir) = std::env::var("TMPDIR") {
        cmd.env("TMPDIR", tmpdir);
    }
    cmd.env("HOME", data_dir)
        .env("DAYBOOK_DIR", data_dir)
        .env("DAYBOOK_EDITOR", "true")
        .env("DAYBOOK_LOG_LEVEL", "warn");
}

/// A small entry document as a user might save it.
pub fn sample_entry_json(weather: &str, summary: &str) -> String {
    serde_json::json!({
        "version": "4.0",
        "environment": {
            "temperature_c": "12-18",
            "weather_condition": weather,
            "air_quality_index": 40
        },
        "personal_care": {
            "hair_oil": "Almond"
        },
        "daily_activity_summary": summary
    })
    .to_string()
}
