use crate::helpers::{add_project, get_json_response_body, random_id, TestApp};
use serde_json::json;
use test_context::test_context;

fn project_schema() -> serde_json::Value {
    json!({
      "$schema": "http://json-schema.org/draft-04/schema#",
      "type": "object",
      "properties": {
        "id": { "type": "string", "minLength": 36, "maxLength": 36 },
        "projectName": { "type": "string", "minLength": 1, "maxLength": 255 },
        "description": { "type": ["string", "null"] },
        "createdAt": { "type": "string" },
        "updatedAt": { "type": ["string", "null"] },
        "archived": { "type": "boolean" },
        "projectType": { "enum": ["WORK", "HOLIDAYS", "SICKNESS", "ABSENCE"] }
      },
      "required": ["id", "projectName", "createdAt", "archived", "projectType"]
    })
}

#[test_context(TestApp)]
#[tokio::test]
async fn should_return_201_for_new_projects(app: &mut TestApp) {
    let project_names = ["Craggy Island Parish", "Lovely Girls Competition"];

    for project_name in project_names.iter() {
        let response = app
            .post_project(&json!({
                "projectName": project_name,
                "description": "Father Ted's business",
                "projectType": "WORK"
            }))
            .await;
        assert_eq!(
            response.status().as_u16(),
            201,
            "Failed to create new project for project name: {project_name}"
        );

        let body = get_json_response_body(response).await;
        assert!(
            jsonschema::is_valid(&project_schema(), &body),
            "response does not match schema"
        );
        assert_eq!(body.get("projectName").unwrap(), project_name);
        assert!(body.get("updatedAt").unwrap().is_null());
    }

    let body = get_json_response_body(app.get_projects().await).await;
    let projects = body.as_array().expect("Expected a list of projects");
    assert_eq!(projects.len(), 2);
    assert_eq!(projects[0].get("projectName").unwrap(), project_names[0]);
}

#[test_context(TestApp)]
#[tokio::test]
async fn should_return_200_and_keep_creation_time_on_update(app: &mut TestApp) {
    let project_id = add_project(app, "Craggy Island Parish").await;
    let created = get_json_response_body(app.get_project(&project_id).await).await;

    let response = app
        .post_project(&json!({
            "id": project_id,
            "projectName": "Rugged Island Parish",
            "projectType": "HOLIDAYS"
        }))
        .await;
    assert_eq!(response.status().as_u16(), 200);

    let updated = get_json_response_body(response).await;
    assert_eq!(updated.get("id"), created.get("id"));
    assert_eq!(updated.get("createdAt"), created.get("createdAt"));
    assert!(updated.get("updatedAt").unwrap().is_string());
    assert_eq!(updated.get("projectType").unwrap(), "HOLIDAYS");

    let body = get_json_response_body(app.get_projects().await).await;
    assert_eq!(body.as_array().unwrap().len(), 1);
}

#[test_context(TestApp)]
#[tokio::test]
async fn should_return_400_for_invalid_input(app: &mut TestApp) {
    let response = app
        .post_project(&json!({ "projectName": "", "projectType": "WORK" }))
        .await;
    assert_eq!(response.status().as_u16(), 400);
    let body = get_json_response_body(response).await;
    assert!(
        body.get("messages")
            .and_then(|messages| messages.get("projectName"))
            .is_some(),
        "Expected a message for projectName: {body}"
    );

    let response = app
        .post_project(&json!({ "projectName": "Parish", "projectType": "PARTY" }))
        .await;
    assert_eq!(response.status().as_u16(), 400);
}

#[test_context(TestApp)]
#[tokio::test]
async fn should_return_422_if_malformed_request(app: &mut TestApp) {
    let test_cases = [
        json!({ "projectName": true, "projectType": "WORK" }),
        json!({ "projectName": "Parish" }),
        json!({ "id": "not-a-uuid", "projectName": "Parish", "projectType": "WORK" }),
    ];

    for test_case in test_cases.iter() {
        let response = app.post_project(test_case).await;
        assert_eq!(
            response.status().as_u16(),
            422,
            "Failed for input: {test_case:?}"
        );
    }
}

#[test_context(TestApp)]
#[tokio::test]
async fn should_return_404_for_unknown_project(app: &mut TestApp) {
    add_project(app, "Craggy Island Parish").await;

    assert_eq!(app.get_project(&random_id()).await.status().as_u16(), 404);
    assert_eq!(app.get_planning(&random_id()).await.status().as_u16(), 404);
}
