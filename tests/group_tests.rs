mod common;

use backup_monitor::{
    BackupChecker, CheckMode, FileTimeSource, Service, ServiceCheckStatus, ServiceType,
};
use common::{date, path_str, subdir, touch, touch_at};
use tempfile::tempdir;

fn file_time_child(name: &str, path: &std::path::Path, required: bool) -> Service {
    Service {
        name: name.to_string(),
        path: path_str(path),
        check_mode: CheckMode::FileTime,
        file_time_source: FileTimeSource::LastWriteTime,
        required,
        ..Service::default()
    }
}

fn group(children: Vec<Service>) -> Service {
    Service {
        name: "Group".to_string(),
        service_type: ServiceType::Group,
        children,
        ..Service::default()
    }
}

#[test]
fn test_required_fail_makes_group_fail() {
    let tmp = tempdir().unwrap();
    let ok_dir = subdir(tmp.path(), "ok");
    let fail_dir = subdir(tmp.path(), "fail");
    let optional_dir = subdir(tmp.path(), "optional");
    touch_at(&ok_dir, "backup_ok.bak", date(2026, 1, 21), 1);
    touch_at(&optional_dir, "backup_opt.bak", date(2026, 1, 21), 1);

    let service = group(vec![
        file_time_child("RequiredOk", &ok_dir, true),
        file_time_child("RequiredFail", &fail_dir, true),
        file_time_child("OptionalOk", &optional_dir, false),
    ]);

    let result = BackupChecker::new().check_service(&service, date(2026, 1, 21));

    assert_eq!(result.status, ServiceCheckStatus::Fail);
    assert_eq!(result.message, "required: 1/2 OK; optional FAIL: 0");
    assert_eq!(result.children.len(), 3);
    assert_eq!(
        result.details,
        vec!["RequiredFail: FAIL (no files found)".to_string()]
    );
}

#[test]
fn test_optional_fail_makes_group_warning() {
    let tmp = tempdir().unwrap();
    let ok_dir = subdir(tmp.path(), "ok");
    let optional_dir = subdir(tmp.path(), "optional");
    touch_at(&ok_dir, "backup_ok.bak", date(2026, 1, 21), 1);

    let service = group(vec![
        file_time_child("RequiredOk", &ok_dir, true),
        file_time_child("OptionalFail", &optional_dir, false),
    ]);

    let result = BackupChecker::new().check_service(&service, date(2026, 1, 21));

    assert_eq!(result.status, ServiceCheckStatus::Warning);
    assert_eq!(result.last_observed_backup_date, Some(date(2026, 1, 21)));
}

#[test]
fn test_child_error_dominates() {
    let tmp = tempdir().unwrap();
    let ok_dir = subdir(tmp.path(), "ok");
    touch_at(&ok_dir, "backup_ok.bak", date(2026, 1, 21), 1);

    let service = group(vec![
        file_time_child("RequiredOk", &ok_dir, true),
        file_time_child("Missing", &tmp.path().join("missing"), false),
    ]);

    let result = BackupChecker::new().check_service(&service, date(2026, 1, 21));

    assert_eq!(result.status, ServiceCheckStatus::Error);
    assert_eq!(result.children[1].status, ServiceCheckStatus::Error);
}

#[test]
fn test_group_without_children_fails() {
    let service = group(vec![]);
    let result = BackupChecker::new().check_service(&service, date(2026, 1, 21));
    assert_eq!(result.status, ServiceCheckStatus::Fail);
    assert_eq!(result.message, "group has no children");
}

#[test]
fn test_child_folders_are_synthesized() {
    let tmp = tempdir().unwrap();
    let north = subdir(tmp.path(), "north");
    let south = subdir(tmp.path(), "south");
    touch(&north, "north_2026_01_20.bak");
    touch(&south, "south_2026_01_19.bak");
    touch(&south, "unrelated_2026_01_20.bak");

    let service = Service {
        name: "Branches".to_string(),
        path: path_str(tmp.path()),
        service_type: ServiceType::Group,
        expected_day_offset: 1,
        child_folders: vec!["north".to_string(), "south".to_string(), " ".to_string()],
        ..Service::default()
    };

    let result = BackupChecker::new().check_service(&service, date(2026, 1, 21));

    assert_eq!(result.status, ServiceCheckStatus::Fail);
    assert_eq!(result.children.len(), 2);
    assert_eq!(result.children[0].service_name, "north");
    assert_eq!(result.children[0].status, ServiceCheckStatus::Ok);
    // keyword "south" filters out the unrelated file dated on the expected day
    assert_eq!(result.children[1].service_name, "south");
    assert_eq!(result.children[1].status, ServiceCheckStatus::Fail);
    assert_eq!(result.last_observed_backup_date, Some(date(2026, 1, 20)));
    assert!(service.children.is_empty());
}

#[test]
fn test_nested_groups() {
    let tmp = tempdir().unwrap();
    let a = subdir(tmp.path(), "a");
    let b = subdir(tmp.path(), "b");
    touch_at(&a, "a.bak", date(2026, 1, 21), 3);
    touch_at(&b, "b.bak", date(2026, 1, 21), 3);

    let inner = Service {
        name: "Inner".to_string(),
        service_type: ServiceType::Group,
        children: vec![file_time_child("B", &b, true)],
        ..Service::default()
    };
    let outer = group(vec![file_time_child("A", &a, true), inner]);

    let result = BackupChecker::new().check_service(&outer, date(2026, 1, 21));

    assert_eq!(result.status, ServiceCheckStatus::Ok);
    assert_eq!(result.children[1].service_name, "Inner");
    assert_eq!(result.children[1].children.len(), 1);
    assert_eq!(result.found_count, 2);
}

#[test]
fn test_children_keep_input_order() {
    let tmp = tempdir().unwrap();
    let names: Vec<String> = (0..12).map(|i| format!("child_{:02}", i)).collect();
    let children = names
        .iter()
        .map(|name| {
            let dir = subdir(tmp.path(), name);
            touch_at(&dir, "x.bak", date(2026, 1, 21), 5);
            file_time_child(name, &dir, true)
        })
        .collect();

    let result = BackupChecker::new().check_service(&group(children), date(2026, 1, 21));

    let got: Vec<_> = result.children.iter().map(|c| c.service_name.clone()).collect();
    assert_eq!(got, names);
}
