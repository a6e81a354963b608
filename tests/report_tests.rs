mod common;

use backup_monitor::{
    BackupChecker, CheckMode, ReportMode, SendDecision, Service, ServiceCheckStatus,
    ServiceType, SilentReporter,
};
use common::{date, path_str, subdir, touch};
use tempfile::tempdir;

#[test]
fn test_build_report_keeps_service_order() {
    let tmp = tempdir().unwrap();
    let sales = subdir(tmp.path(), "sales");
    let hr = subdir(tmp.path(), "hr");
    touch(&sales, "sales_2026_01_21.bak");

    let services = vec![
        Service {
            name: "Sales".to_string(),
            path: path_str(&sales),
            check_mode: CheckMode::NameDate,
            ..Service::default()
        },
        Service {
            name: "HR".to_string(),
            path: path_str(&hr),
            ..Service::default()
        },
        Service {
            name: "Branches".to_string(),
            path: path_str(tmp.path()),
            service_type: ServiceType::Group,
            child_folders: vec!["sales".to_string()],
            ..Service::default()
        },
    ];

    let report = BackupChecker::new().build_report(&services, date(2026, 1, 21), &SilentReporter);

    let names: Vec<_> = report.services.iter().map(|r| r.service_name.as_str()).collect();
    assert_eq!(names, vec!["Sales", "HR", "Branches"]);
    assert_eq!(report.services[0].status, ServiceCheckStatus::Ok);
    assert_eq!(report.services[1].status, ServiceCheckStatus::Fail);
    assert_eq!(report.services[2].status, ServiceCheckStatus::Ok);

    let counts = report.leaf_counts();
    assert_eq!(counts.ok, 2);
    assert_eq!(counts.fail, 1);
    assert_eq!(report.send_decision(ReportMode::FailOnly), SendDecision::Send);

    let text = report.render(ReportMode::FailOnly);
    assert!(text.contains("[FAIL] HR: no files found"));
    assert!(!text.contains("[OK] Sales"));
}
