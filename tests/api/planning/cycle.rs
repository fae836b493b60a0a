use crate::helpers::{
    add_employee, add_project, archive_project, get_json_response_body,
    mount_email_server, wait_for_emails, TestApp,
};
use serde_json::{json, Value};
use test_context::test_context;

pub fn cycle_body(start: &str, end: &str, employee_ids: &[&str]) -> Value {
    json!({
        "title": "Early shift",
        "start": start,
        "end": end,
        "employeeIds": employee_ids,
        "multipleAssignment": employee_ids.len() > 1,
        "rotationFrequency": 1,
        "rotationUnit": "DAYS",
        "shifts": [
            { "startHour": 6, "startMinute": 0, "endHour": 14, "endMinute": 0 }
        ],
        "includeSaturday": false,
        "includeSunday": false
    })
}

#[test_context(TestApp)]
#[tokio::test]
async fn should_create_weekday_entries_and_send_one_email(app: &mut TestApp) {
    mount_email_server(app).await;
    let project_id = add_project(app, "Parochial House").await;
    let ted = add_employee(app, "ted", true).await;

    // 4th to 10th November 2024 runs Monday to Sunday.
    let response = app
        .post_cycle(&project_id, &cycle_body("2024-11-04", "2024-11-10", &[&ted]))
        .await;
    assert_eq!(response.status().as_u16(), 201);
    let entries = get_json_response_body(response).await;
    assert_eq!(entries.as_array().unwrap().len(), 5);

    let emails = wait_for_emails(app, 1).await;
    assert_eq!(emails.len(), 1);
    let body = emails[0].get("HtmlBody").unwrap().as_str().unwrap();
    assert_eq!(body.matches("You've been assigned").count(), 5);
    assert!(body.starts_with(
        "Project Parochial House: You've been assigned for slot \
         04/11/2024 06:00 -> 04/11/2024 14:00"
    ));

    let planning = get_json_response_body(app.get_planning(&project_id).await).await;
    let planning = planning.as_array().unwrap();
    assert_eq!(planning.len(), 5);
    assert_eq!(planning[0].get("start").unwrap(), "2024-11-04T06:00:00");
    assert_eq!(planning[4].get("start").unwrap(), "2024-11-08T06:00:00");
}

#[test_context(TestApp)]
#[tokio::test]
async fn should_rotate_shifts_and_include_weekends(app: &mut TestApp) {
    let project_id = add_project(app, "Parochial House").await;

    let mut body = cycle_body("2024-11-04", "2024-11-10", &[]);
    body["includeSaturday"] = json!(true);
    body["includeSunday"] = json!(true);
    body["rotationFrequency"] = json!(2);
    body["shifts"] = json!([
        { "startHour": 6, "startMinute": 0, "endHour": 14, "endMinute": 0 },
        { "startHour": 22, "startMinute": 0, "endHour": 6, "endMinute": 0 }
    ]);

    let response = app.post_cycle(&project_id, &body).await;
    assert_eq!(response.status().as_u16(), 201);

    let planning = get_json_response_body(app.get_planning(&project_id).await).await;
    let starts: Vec<&str> = planning
        .as_array()
        .unwrap()
        .iter()
        .map(|entry| entry.get("start").unwrap().as_str().unwrap())
        .collect();
    assert_eq!(
        starts,
        vec![
            "2024-11-04T06:00:00",
            "2024-11-05T06:00:00",
            "2024-11-06T22:00:00",
            "2024-11-07T22:00:00",
            "2024-11-08T06:00:00",
            "2024-11-09T06:00:00",
            "2024-11-10T22:00:00",
        ]
    );
    let last = planning.as_array().unwrap().last().unwrap();
    assert_eq!(last.get("end").unwrap(), "2024-11-11T06:00:00");
}

#[test_context(TestApp)]
#[tokio::test]
async fn should_return_400_for_invalid_cycles(app: &mut TestApp) {
    let project_id = add_project(app, "Parochial House").await;
    let archived_id = add_project(app, "Rugged Island").await;
    archive_project(app, &archived_id).await;
    let jack = add_employee(app, "jack", false).await;

    let mut unknown_unit = cycle_body("2024-11-04", "2024-11-10", &[]);
    unknown_unit["rotationUnit"] = json!("MONTHS");
    let mut no_frequency = cycle_body("2024-11-04", "2024-11-10", &[]);
    no_frequency["rotationFrequency"] = json!(0);
    let mut no_shifts = cycle_body("2024-11-04", "2024-11-10", &[]);
    no_shifts["shifts"] = json!([]);
    let mut bad_hour = cycle_body("2024-11-04", "2024-11-10", &[]);
    bad_hour["shifts"] =
        json!([{ "startHour": 25, "startMinute": 0, "endHour": 6, "endMinute": 0 }]);

    let test_cases = [
        (project_id.as_str(), unknown_unit),
        (project_id.as_str(), no_frequency),
        (project_id.as_str(), no_shifts),
        (project_id.as_str(), bad_hour),
        (project_id.as_str(), cycle_body("2024-11-10", "2024-11-04", &[])),
        (project_id.as_str(), cycle_body("2024-11-04", "2024-11-10", &[&jack])),
        (archived_id.as_str(), cycle_body("2024-11-04", "2024-11-10", &[])),
    ];

    for (project_id, body) in test_cases.iter() {
        let response = app.post_cycle(project_id, body).await;
        assert_eq!(response.status().as_u16(), 400, "Failed for input: {body}");
    }

    let planning = get_json_response_body(app.get_planning(&project_id).await).await;
    assert!(planning.as_array().unwrap().is_empty());
}
