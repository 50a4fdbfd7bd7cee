use department_core::db::open_db_in_memory;
use department_core::{Department, DepartmentRepository, DepartmentStore};

#[test]
fn transient_department_serializes_null_id() {
    let department = Department::new("Payroll", "Building A");

    let json = serde_json::to_value(&department).unwrap();
    assert_eq!(json["id"], serde_json::Value::Null);
    assert_eq!(json["name"], "Payroll");
    assert_eq!(json["location"], "Building A");
}

#[test]
fn persisted_department_serializes_assigned_id() {
    let conn = open_db_in_memory().unwrap();
    let mut store = DepartmentStore::new(&conn);
    store.create_table().unwrap();

    let department = store.create("Payroll", "Building A, 5th Floor").unwrap();
    let id = department.borrow().id().unwrap();

    let json = serde_json::to_value(&*department.borrow()).unwrap();
    assert_eq!(json["id"], id);
    assert_eq!(
        department.borrow().to_string(),
        format!("<Department {id}: Payroll, Building A, 5th Floor>")
    );
}
