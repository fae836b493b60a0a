use super::cycle::cycle_body;
use crate::helpers::{
    add_employee, add_project, archive_project, entry_body,
    get_json_response_body, mount_email_server, random_id, wait_for_emails,
    TestApp,
};
use planning_manager::ErrorResponse;
use test_context::test_context;

#[test_context(TestApp)]
#[tokio::test]
async fn should_report_valid_entry_without_storing_it(app: &mut TestApp) {
    let project_id = add_project(app, "Parochial House").await;
    let ted = add_employee(app, "ted", true).await;

    let response = app
        .post_validate_planning(
            &project_id,
            &entry_body("2024-11-04T09:00", "2024-11-04T17:00", &[&ted]),
        )
        .await;
    assert_eq!(response.status().as_u16(), 200);
    let report = get_json_response_body(response).await;
    assert_eq!(report.get("valid").unwrap(), true);
    assert!(report.get("comments").unwrap().as_array().unwrap().is_empty());

    let planning = get_json_response_body(app.get_planning(&project_id).await).await;
    assert!(planning.as_array().unwrap().is_empty());
}

#[test_context(TestApp)]
#[tokio::test]
async fn should_report_conflicts_and_unknown_employees(app: &mut TestApp) {
    mount_email_server(app).await;
    let project_id = add_project(app, "Parochial House").await;
    let ted = add_employee(app, "ted", true).await;
    let jack = add_employee(app, "jack", false).await;

    app.post_planning(
        &project_id,
        &entry_body("2024-11-04T09:00", "2024-11-04T17:00", &[&ted]),
    )
    .await;
    wait_for_emails(app, 1).await;

    let unknown = random_id();
    let response = app
        .post_validate_planning(
            &project_id,
            &entry_body("2024-11-04T16:00", "2024-11-04T20:00", &[&ted, &jack, &unknown]),
        )
        .await;
    assert_eq!(response.status().as_u16(), 200);
    let report = get_json_response_body(response).await;
    assert_eq!(report.get("valid").unwrap(), false);

    let messages: Vec<&str> = report
        .get("comments")
        .unwrap()
        .as_array()
        .unwrap()
        .iter()
        .map(|comment| comment.get("message").unwrap().as_str().unwrap())
        .collect();
    let not_found = format!("Employee {unknown} could not be found");
    assert_eq!(
        messages,
        vec![
            "Could not assign ted for slot 04/11/2024 16:00 -> 04/11/2024 20:00. \
             Employee is already assigned to another project or doesn't work at that time",
            "jack is not enabled or doesn't have the proper role",
            not_found.as_str(),
        ]
    );
}

#[test_context(TestApp)]
#[tokio::test]
async fn should_report_cycle_conflicts(app: &mut TestApp) {
    mount_email_server(app).await;
    let project_id = add_project(app, "Parochial House").await;
    let ted = add_employee(app, "ted", true).await;

    app.post_planning(
        &project_id,
        &entry_body("2024-11-05T13:00", "2024-11-05T15:00", &[&ted]),
    )
    .await;
    wait_for_emails(app, 1).await;

    let response = app
        .post_validate_cycle(&project_id, &cycle_body("2024-11-04", "2024-11-06", &[&ted]))
        .await;
    assert_eq!(response.status().as_u16(), 200);
    let report = get_json_response_body(response).await;
    assert_eq!(report.get("valid").unwrap(), false);

    let comments = report.get("comments").unwrap().as_array().unwrap();
    assert_eq!(comments.len(), 1);
    assert_eq!(comments[0].get("userId").unwrap(), ted.as_str());
    assert_eq!(comments[0].get("commentType").unwrap(), "WARNING");

    let planning = get_json_response_body(app.get_planning(&project_id).await).await;
    assert_eq!(planning.as_array().unwrap().len(), 1);
}

#[test_context(TestApp)]
#[tokio::test]
async fn should_return_400_when_entry_breaks_planning_rules(app: &mut TestApp) {
    let project_id = add_project(app, "Parochial House").await;
    let closed_id = add_project(app, "Lovely Girls Competition").await;
    archive_project(app, &closed_id).await;
    let ted = add_employee(app, "ted", true).await;
    let dougal = add_employee(app, "dougal", true).await;

    let mut shared =
        entry_body("2024-11-04T09:00", "2024-11-04T17:00", &[&ted, &dougal]);
    shared["multipleAssignment"] = false.into();
    let backwards = entry_body("2024-11-04T17:00", "2024-11-04T09:00", &[&ted]);
    let on_archived = entry_body("2024-11-04T09:00", "2024-11-04T17:00", &[&ted]);

    let test_cases = [
        (
            project_id.as_str(),
            shared,
            "Multiple assignment is not allowed for this entry",
        ),
        (project_id.as_str(), backwards, "Start cannot be after end"),
        (
            closed_id.as_str(),
            on_archived,
            "Cannot create new planning entry on archived project",
        ),
    ];

    for (project_id, body, error) in test_cases {
        let response = app.post_validate_planning(project_id, &body).await;
        assert_eq!(
            response.status().as_u16(),
            400,
            "Failed for input: {:?}",
            body
        );
        let response = response
            .json::<ErrorResponse>()
            .await
            .expect("Could not deserialize response body to ErrorResponse");
        assert_eq!(response.error, error);
    }

    for project_id in [&project_id, &closed_id] {
        let planning =
            get_json_response_body(app.get_planning(project_id).await).await;
        assert!(planning.as_array().unwrap().is_empty());
    }
}

#[test_context(TestApp)]
#[tokio::test]
async fn should_return_404_when_validating_for_unknown_project(app: &mut TestApp) {
    let ted = add_employee(app, "ted", true).await;

    let response = app
        .post_validate_planning(
            &random_id(),
            &entry_body("2024-11-04T09:00", "2024-11-04T17:00", &[&ted]),
        )
        .await;
    assert_eq!(response.status().as_u16(), 404);
}
