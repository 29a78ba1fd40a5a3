//! Integration tests for stepbase
//!
//! The first half exercises the library against an on-disk preference
//! store; the second half runs the `stepbase` binary with `STEPBASE_HOME`
//! pointed at a temporary directory so every test is isolated.

use assert_cmd::Command;
use predicates::prelude::*;
use stepbase::config::Config;
use stepbase::permission::StaticPermissionGate;
use stepbase::sensor::{ReplaySource, SensorDelay};
use stepbase::storage::{KeyValueStore, PreferenceStore, BASELINE_STEPS_KEY};
use stepbase::tracker::{StepBaselineTracker, StepCounterSession, TrackingState};
use tempfile::{tempdir, TempDir};

// =============================================================================
// Test Helpers
// =============================================================================

/// Creates a preference store in a temporary directory.
/// Returns the store and the temp directory (which must be kept alive).
fn create_test_store() -> (PreferenceStore, TempDir) {
    let dir = tempdir().expect("Failed to create temp directory");
    let store =
        PreferenceStore::open(&dir.path().join("prefs.db")).expect("Failed to open test store");
    (store, dir)
}

/// Builds a `stepbase` command isolated to `home`.
fn stepbase(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("stepbase").expect("binary should build");
    cmd.env("STEPBASE_HOME", home.path())
        .env("NO_COLOR", "1")
        .env_remove("RUST_LOG");
    cmd
}

/// Creates a data directory where activity recognition is already granted.
fn granted_home() -> TempDir {
    let home = tempdir().expect("Failed to create temp directory");
    stepbase(&home)
        .args(["config", "set", "permission_granted", "true"])
        .assert()
        .success();
    home
}

// =============================================================================
// Library Tests
// =============================================================================

mod library_tests {
    use super::*;

    #[tokio::test]
    async fn test_baseline_survives_simulated_restart() {
        let (store, dir) = create_test_store();

        let mut tracker = StepBaselineTracker::load(store).await;
        assert_eq!(tracker.on_sensor_event(1000.0), 0);
        tracker.flush().await;
        drop(tracker);

        let reopened =
            PreferenceStore::open(&dir.path().join("prefs.db")).expect("Failed to reopen store");
        let mut tracker = StepBaselineTracker::load(reopened).await;

        assert_eq!(tracker.baseline(), Some(1000.0));
        assert_eq!(tracker.on_sensor_event(1500.0), 500);
        assert_eq!(tracker.on_sensor_event(800.0), 0);
    }

    #[tokio::test]
    async fn test_session_over_sqlite_store() {
        let (store, _dir) = create_test_store();
        store
            .set_float(BASELINE_STEPS_KEY, 1000.0)
            .await
            .expect("seed baseline");

        let tracker = StepBaselineTracker::load(store).await;
        let mut session = StepCounterSession::new(
            tracker,
            ReplaySource::from_readings([1200.0, 1350.0]),
            StaticPermissionGate::new(true),
            SensorDelay::Normal,
        );

        assert_eq!(session.resume(), TrackingState::Tracking);
        session.run().await;
        let report = session.shutdown().await;

        assert_eq!(report.steps_today, 350);
        assert_eq!(report.baseline, Some(1000.0));
    }

    #[tokio::test]
    async fn test_config_gate_blocks_tracking() {
        let (store, _dir) = create_test_store();
        let tracker = StepBaselineTracker::load(store.clone()).await;
        let mut session = StepCounterSession::new(
            tracker,
            ReplaySource::from_readings([5000.0]),
            Config::default(),
            SensorDelay::Normal,
        );

        assert_eq!(session.resume(), TrackingState::PermissionRequired);
        let report = session.shutdown().await;

        assert_eq!(report.steps_today, 0);
        assert_eq!(
            store.get_float(BASELINE_STEPS_KEY).await.unwrap(),
            None,
            "no baseline should be captured without permission"
        );
    }

    #[tokio::test]
    async fn test_steps_never_decrease_for_increasing_readings() {
        let (store, _dir) = create_test_store();
        let mut tracker = StepBaselineTracker::load(store).await;

        let mut previous = 0;
        for reading in [300.0, 300.0, 301.0, 450.0, 451.5, 2_000.0] {
            let steps = tracker.on_sensor_event(reading);
            assert!(steps >= previous, "{steps} < {previous} at {reading}");
            previous = steps;
        }
        assert_eq!(previous, 1700);
    }
}

// =============================================================================
// Binary Tests
// =============================================================================

mod binary_tests {
    use super::*;

    #[test]
    fn test_record_without_permission() {
        let home = tempdir().expect("Failed to create temp directory");

        stepbase(&home)
            .args(["record", "1000"])
            .assert()
            .success()
            .stdout(predicate::str::contains("permission is required"));

        stepbase(&home)
            .arg("status")
            .assert()
            .success()
            .stdout(predicate::str::contains("not set"));
    }

    #[test]
    fn test_record_sets_baseline_then_counts() {
        let home = granted_home();

        stepbase(&home)
            .args(["record", "1000"])
            .assert()
            .success()
            .stdout(predicate::str::contains("Steps today: 0"));

        stepbase(&home)
            .args(["record", "1200", "1500"])
            .assert()
            .success()
            .stdout(predicate::str::contains("Steps today: 500"));

        stepbase(&home)
            .args(["record", "800"])
            .assert()
            .success()
            .stdout(predicate::str::contains("Steps today: 0"));
    }

    #[test]
    fn test_record_json_output() {
        let home = granted_home();

        stepbase(&home).args(["record", "40"]).assert().success();

        let output = stepbase(&home)
            .args(["record", "100", "--format", "json"])
            .output()
            .expect("run stepbase");
        assert!(output.status.success());

        let report: serde_json::Value =
            serde_json::from_slice(&output.stdout).expect("stdout should be JSON");
        assert_eq!(report["steps_today"], 60);
        assert_eq!(report["baseline"], 40.0);
        assert_eq!(report["state"], "paused");
    }

    #[test]
    fn test_status_json_shows_baseline() {
        let home = granted_home();

        stepbase(&home).args(["record", "2500"]).assert().success();

        let output = stepbase(&home)
            .args(["status", "--format", "json"])
            .output()
            .expect("run stepbase");
        assert!(output.status.success());

        let status: serde_json::Value =
            serde_json::from_slice(&output.stdout).expect("stdout should be JSON");
        assert_eq!(status["baseline"]["value"], 2500.0);
        assert_eq!(status["permission"], "granted");
        assert_eq!(status["sensor_delay"], "normal");
    }

    #[test]
    fn test_reset_starts_new_count() {
        let home = granted_home();

        stepbase(&home).args(["record", "1000"]).assert().success();

        stepbase(&home)
            .arg("reset")
            .assert()
            .success()
            .stdout(predicate::str::contains("Baseline cleared"));

        stepbase(&home)
            .args(["record", "5000", "5025"])
            .assert()
            .success()
            .stdout(predicate::str::contains("Steps today: 25"));

        stepbase(&home).arg("reset").assert().success();
        stepbase(&home)
            .arg("reset")
            .assert()
            .success()
            .stdout(predicate::str::contains("No baseline stored"));
    }

    #[test]
    fn test_replay_from_stdin() {
        let home = granted_home();

        stepbase(&home)
            .arg("replay")
            .write_stdin("# walk to work\n100\n\n175\n")
            .assert()
            .success()
            .stdout(predicate::str::contains("Steps today: 75"));
    }

    #[test]
    fn test_replay_from_stdin_without_permission() {
        let home = tempdir().expect("Failed to create temp directory");

        stepbase(&home)
            .arg("replay")
            .write_stdin("100\n175\n")
            .assert()
            .success()
            .stdout(predicate::str::contains("permission is required"))
            .stdout(predicate::str::contains("config set permission_granted true"));
    }

    #[test]
    fn test_status_warns_about_baseline_from_earlier_day() {
        let home = granted_home();
        stepbase(&home).args(["record", "1000"]).assert().success();

        stepbase(&home)
            .arg("status")
            .assert()
            .success()
            .stdout(predicate::str::contains("day(s) ago").not());

        let two_days_ago = chrono::Utc::now() - chrono::Duration::days(2);
        let conn = rusqlite::Connection::open(home.path().join("step_preferences.db"))
            .expect("open preference file");
        conn.execute(
            "UPDATE preferences SET updated_at = ?1",
            [two_days_ago.to_rfc3339()],
        )
        .expect("backdate baseline");
        drop(conn);

        stepbase(&home)
            .arg("status")
            .assert()
            .success()
            .stdout(predicate::str::contains("day(s) ago"));
    }

    #[test]
    fn test_replay_from_file() {
        let home = granted_home();
        let file = home.path().join("readings.txt");
        std::fs::write(&file, "10\n20\n35\n").expect("write readings");

        stepbase(&home)
            .arg("replay")
            .arg(&file)
            .assert()
            .success()
            .stdout(predicate::str::contains("Steps today: 25"));
    }

    #[test]
    fn test_replay_rejects_bad_line() {
        let home = granted_home();

        stepbase(&home)
            .arg("replay")
            .write_stdin("100\nlots\n")
            .assert()
            .failure()
            .stderr(predicate::str::contains("Line 2"));
    }

    #[test]
    fn test_config_set_and_get() {
        let home = tempdir().expect("Failed to create temp directory");

        stepbase(&home)
            .args(["config", "set", "sensor_delay", "game"])
            .assert()
            .success();

        stepbase(&home)
            .args(["config", "get", "sensor_delay"])
            .assert()
            .success()
            .stdout(predicate::str::contains("game"));

        assert!(home.path().join("config.yaml").exists());
    }

    #[test]
    fn test_config_set_unknown_key_fails() {
        let home = tempdir().expect("Failed to create temp directory");

        stepbase(&home)
            .args(["config", "set", "baseline", "0"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Unknown config key"));
    }

    #[test]
    fn test_permission_not_required() {
        let home = tempdir().expect("Failed to create temp directory");

        stepbase(&home)
            .args(["config", "set", "runtime_permission_required", "false"])
            .assert()
            .success();

        stepbase(&home)
            .args(["record", "7", "19"])
            .assert()
            .success()
            .stdout(predicate::str::contains("Steps today: 12"));
    }
}
