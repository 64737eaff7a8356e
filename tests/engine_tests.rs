//! Engine scenario tests
//!
//! Drives the binary against the sample snapshot: authorization
//! decisions, aggregation figures, and alert scans end to end.

mod common;

use common::TestEnvironment;
use predicates::prelude::*;

// ─────────────────────────────────────────────────────────────────
// Snapshot Management
// ─────────────────────────────────────────────────────────────────

#[test]
fn test_data_init_and_validate() {
    let env = TestEnvironment::new();

    env.cmd()
        .args(["data", "validate"])
        .assert()
        .success()
        .stdout(predicate::str::contains("6 user(s)"))
        .stdout(predicate::str::contains("2 meeting(s)"))
        .stdout(predicate::str::contains("4 goal(s)"));
}

#[test]
fn test_data_init_refuses_overwrite() {
    let env = TestEnvironment::new();

    common::engine_cmd()
        .args(["data", "init", "--path"])
        .arg(&env.data_path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));

    common::engine_cmd()
        .args(["data", "init", "--force", "--path"])
        .arg(&env.data_path)
        .assert()
        .success();
}

// ─────────────────────────────────────────────────────────────────
// Profile Field Decisions
// ─────────────────────────────────────────────────────────────────

#[test]
fn test_self_views_own_salary() {
    let env = TestEnvironment::new();

    env.cmd()
        .args(["check", "field", "--actor", "jd", "--target", "jd", "--field", "salary"])
        .assert()
        .success()
        .stdout(predicate::str::contains("allowed"));
}

#[test]
fn test_self_edits_own_name_but_not_salary() {
    let env = TestEnvironment::new();

    env.cmd()
        .args(["check", "field", "--actor", "jd", "--target", "jd", "--field", "name", "--write"])
        .assert()
        .success();

    env.cmd()
        .args(["check", "field", "--actor", "jd", "--target", "jd", "--field", "salary", "--write"])
        .assert()
        .failure()
        .code(30)
        .stderr(predicate::str::contains("Not authorized"));
}

#[test]
fn test_manager_reads_report_profile() {
    let env = TestEnvironment::new();

    env.cmd()
        .args(["check", "field", "--actor", "sj", "--target", "jd", "--field", "qis"])
        .assert()
        .success();
}

#[test]
fn test_super_admin_edits_salary_across_departments() {
    let env = TestEnvironment::new();

    env.cmd()
        .args(["check", "field", "--actor", "mw", "--target", "cw", "--field", "salary", "--write"])
        .assert()
        .success();
}

#[test]
fn test_employee_denied_on_peer_profile() {
    let env = TestEnvironment::new();

    env.cmd()
        .args(["check", "field", "--actor", "jd", "--target", "aj", "--field", "qis"])
        .assert()
        .failure()
        .code(30);
}

#[test]
fn test_hidden_and_absent_targets_look_identical() {
    let env = TestEnvironment::new();

    // cw exists but is outside jd's visibility; "ghost" does not exist
    let hidden = env
        .cmd()
        .args(["check", "field", "--actor", "jd", "--target", "cw", "--field", "qis"])
        .output()
        .unwrap();
    let absent = env
        .cmd()
        .args(["check", "field", "--actor", "jd", "--target", "ghost", "--field", "qis"])
        .output()
        .unwrap();

    assert!(!hidden.status.success());
    assert!(!absent.status.success());
    assert_eq!(hidden.status.code(), absent.status.code());
    assert_eq!(hidden.stderr, absent.stderr);
}

// ─────────────────────────────────────────────────────────────────
// Entry Decisions
// ─────────────────────────────────────────────────────────────────

#[test]
fn test_subject_sees_shared_entry() {
    let env = TestEnvironment::new();

    env.cmd()
        .args(["check", "entry", "--actor", "jd", "--meeting", "m1", "--entry", "e1"])
        .assert()
        .success();
}

#[test]
fn test_subject_denied_manager_only_entry() {
    let env = TestEnvironment::new();

    // e6 is the manager-only feedback entry about jd
    env.cmd()
        .args(["check", "entry", "--actor", "jd", "--meeting", "m1", "--entry", "e6"])
        .assert()
        .failure()
        .code(30);
}

#[test]
fn test_direct_manager_reads_and_edits_manager_only_entry() {
    let env = TestEnvironment::new();

    env.cmd()
        .args(["check", "entry", "--actor", "sj", "--meeting", "m1", "--entry", "e6"])
        .assert()
        .success();

    env.cmd()
        .args(["check", "entry", "--actor", "sj", "--meeting", "m1", "--entry", "e6", "--write"])
        .assert()
        .success();
}

#[test]
fn test_peer_employee_denied_manager_only_entry() {
    let env = TestEnvironment::new();

    env.cmd()
        .args(["check", "entry", "--actor", "aj", "--meeting", "m1", "--entry", "e6"])
        .assert()
        .failure()
        .code(30)
        .stderr(predicate::str::contains("Not authorized"));
}

#[test]
fn test_super_admin_audits_manager_only_entry() {
    let env = TestEnvironment::new();

    env.cmd()
        .args(["check", "entry", "--actor", "mw", "--meeting", "m1", "--entry", "e6"])
        .assert()
        .success();
}

#[test]
fn test_missing_meeting_is_redacted() {
    let env = TestEnvironment::new();

    env.cmd()
        .args(["check", "entry", "--actor", "jd", "--meeting", "m999", "--entry", "e1"])
        .assert()
        .failure()
        .code(30)
        .stderr(predicate::str::contains("Not authorized"));
}

// ─────────────────────────────────────────────────────────────────
// Reports
// ─────────────────────────────────────────────────────────────────

#[test]
fn test_team_report() {
    let env = TestEnvironment::new();

    // Sarah's active reports: John 88, Alice 85, Bob 72
    env.cmd()
        .args(["report", "team", "--manager", "sj"])
        .assert()
        .success()
        .stdout(predicate::str::contains("average QIS 81.7"))
        .stdout(predicate::str::contains("John Doe"))
        .stdout(predicate::str::contains("Bob Smith"));
}

#[test]
fn test_team_report_ranking_order() {
    let env = TestEnvironment::new();

    let output = env
        .cmd()
        .args(["report", "team", "--manager", "sj"])
        .output()
        .unwrap();
    let stdout = String::from_utf8(output.stdout).unwrap();

    let john = stdout.find("John Doe").unwrap();
    let alice = stdout.find("Alice Johnson").unwrap();
    let bob = stdout.find("Bob Smith").unwrap();
    assert!(john < alice && alice < bob, "ranking must be QIS descending");
}

#[test]
fn test_team_report_without_reports_is_no_data() {
    let env = TestEnvironment::new();

    // mw has no direct reports; the answer is an explicit no-data
    // state, never a zero average
    env.cmd()
        .args(["report", "team", "--manager", "mw"])
        .assert()
        .failure()
        .code(40)
        .stderr(predicate::str::contains("No data"));
}

#[test]
fn test_department_report() {
    let env = TestEnvironment::new();

    env.cmd()
        .args(["report", "department", "--name", "Design"])
        .assert()
        .success()
        .stdout(predicate::str::contains("average QIS 91.0"));
}

#[test]
fn test_all_departments_report() {
    let env = TestEnvironment::new();

    env.cmd()
        .args(["report", "department"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Engineering"))
        .stdout(predicate::str::contains("Design"))
        .stdout(predicate::str::contains("IT"));
}

#[test]
fn test_company_report() {
    let env = TestEnvironment::new();

    env.cmd()
        .args(["report", "company"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Total users:    6"))
        .stdout(predicate::str::contains("Active users:   6"))
        .stdout(predicate::str::contains("Average QIS:    87.2"));
}

#[test]
fn test_goal_report() {
    let env = TestEnvironment::new();

    // John has four goals, one at 100%
    env.cmd()
        .args(["report", "goals", "--user", "jd"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1/4 completed (25% completion rate)"))
        .stdout(predicate::str::contains("Mentor Junior Developer"))
        .stdout(predicate::str::contains("in-progress"));
}

#[test]
fn test_goal_report_without_goals_is_no_data() {
    let env = TestEnvironment::new();

    env.cmd()
        .args(["report", "goals", "--user", "sj"])
        .assert()
        .failure()
        .code(40)
        .stderr(predicate::str::contains("No data"));
}

#[test]
fn test_meeting_list() {
    let env = TestEnvironment::new();

    env.cmd()
        .args(["meeting", "list", "--user", "jd"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[completed] 10-10-10 Meeting - 7/15/2024"))
        .stdout(predicate::str::contains("[upcoming] 10-10-10 Meeting - 10/15/2024"))
        .stdout(predicate::str::contains("achievement: 2"))
        .stdout(predicate::str::contains("goal: 2"))
        .stdout(predicate::str::contains("feedback: 1"));
}

#[test]
fn test_trend_delta() {
    common::engine_cmd()
        .args(["report", "trend", "--scores", "82,85,84,87,88,88"])
        .assert()
        .success()
        .stdout(predicate::str::contains("+0.0"));
}

#[test]
fn test_trend_insufficient_data() {
    common::engine_cmd()
        .args(["report", "trend", "--scores", "88"])
        .assert()
        .failure()
        .code(40)
        .stderr(predicate::str::contains("Insufficient data"));
}

// ─────────────────────────────────────────────────────────────────
// Alerts
// ─────────────────────────────────────────────────────────────────

const AS_OF: &str = "2024-10-15T12:00:00Z";

#[test]
fn test_alerts_flag_low_performer() {
    let env = TestEnvironment::new();

    // Bob Smith is active with QIS 72, below the default threshold of 75
    env.cmd()
        .args(["alerts", "--as-of", AS_OF])
        .assert()
        .success()
        .stdout(predicate::str::contains("[high]"))
        .stdout(predicate::str::contains("Bob Smith"))
        .stdout(predicate::str::contains("72"));
}

#[test]
fn test_alerts_sorted_high_before_low() {
    let env = TestEnvironment::new();

    let output = env
        .cmd()
        .args(["alerts", "--as-of", AS_OF])
        .output()
        .unwrap();
    let stdout = String::from_utf8(output.stdout).unwrap();

    let high = stdout.find("[high]").unwrap();
    let low = stdout.find("[low]").unwrap();
    assert!(high < low);
}

#[test]
fn test_alerts_are_idempotent() {
    let env = TestEnvironment::new();

    let first = env
        .cmd()
        .args(["alerts", "--as-of", AS_OF])
        .output()
        .unwrap();
    let second = env
        .cmd()
        .args(["alerts", "--as-of", AS_OF])
        .output()
        .unwrap();

    assert!(first.status.success());
    assert_eq!(first.stdout, second.stdout);
}

#[test]
fn test_alerts_json_output() {
    let env = TestEnvironment::new();

    env.cmd()
        .args(["--json", "alerts", "--as-of", AS_OF])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"priority\": \"high\""))
        .stdout(predicate::str::contains("qis-low-bs"));
}

// ─────────────────────────────────────────────────────────────────
// Directory Listings
// ─────────────────────────────────────────────────────────────────

#[test]
fn test_user_list_search() {
    let env = TestEnvironment::new();

    env.cmd()
        .args(["user", "list", "--search", "johnson"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Alice Johnson"))
        .stdout(predicate::str::contains("Sarah Johnson"))
        .stdout(predicate::str::contains("John Doe").not());
}

#[test]
fn test_user_list_role_and_department_filters() {
    let env = TestEnvironment::new();

    env.cmd()
        .args(["user", "list", "--role", "employee", "--department", "Engineering"])
        .assert()
        .success()
        .stdout(predicate::str::contains("John Doe"))
        .stdout(predicate::str::contains("Bob Smith"))
        .stdout(predicate::str::contains("Carol Williams").not())
        .stdout(predicate::str::contains("Sarah Johnson").not());
}

#[test]
fn test_user_list_shows_performance_band() {
    let env = TestEnvironment::new();

    let output = env
        .cmd()
        .args(["user", "list", "--search", "bob"])
        .output()
        .unwrap();
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("average"), "QIS 72 maps to the average band");
}

#[test]
fn test_user_list_unknown_role_filter_fails() {
    let env = TestEnvironment::new();

    env.cmd()
        .args(["user", "list", "--role", "wizard"])
        .assert()
        .failure()
        .code(10)
        .stderr(predicate::str::contains("Unknown role"));
}
