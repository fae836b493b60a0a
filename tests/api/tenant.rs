use crate::helpers::{add_project, get_json_response_body, TestApp};
use planning_manager::ErrorResponse;
use test_context::test_context;

#[test_context(TestApp)]
#[tokio::test]
async fn should_return_400_without_group_header(app: &mut TestApp) {
    let response = app.get_projects_for_group(None).await;
    assert_eq!(response.status().as_u16(), 400);

    let body = response
        .json::<ErrorResponse>()
        .await
        .expect("Could not deserialize response body to ErrorResponse");
    assert_eq!(body.error, "Missing group header");
}

#[test_context(TestApp)]
#[tokio::test]
async fn should_return_400_for_malformed_group(app: &mut TestApp) {
    for group in ["a", "acme-1", "acme corp"] {
        let response = app.get_projects_for_group(Some(group)).await;
        assert_eq!(response.status().as_u16(), 400, "Failed for group: {group}");
    }
}

#[test_context(TestApp)]
#[tokio::test]
async fn should_return_404_for_unknown_group(app: &mut TestApp) {
    let response = app.get_projects_for_group(Some("globex")).await;
    assert_eq!(response.status().as_u16(), 404);
}

#[test_context(TestApp)]
#[tokio::test]
async fn should_resolve_group_case_insensitively(app: &mut TestApp) {
    add_project(app, "Parochial House").await;

    let response = app.get_projects_for_group(Some("ACME")).await;
    assert_eq!(response.status().as_u16(), 200);
    let body = get_json_response_body(response).await;
    assert_eq!(body.as_array().unwrap().len(), 1);
}

#[test_context(TestApp)]
#[tokio::test]
async fn should_not_let_another_group_overwrite_a_project(app: &mut TestApp) {
    let project_id = add_project(app, "Parochial House").await;
    app.register_group("globex").await;

    let response = app
        .post_project_for_group(
            "globex",
            &serde_json::json!({
                "id": project_id,
                "projectName": "Taken over",
                "projectType": "WORK",
                "archived": true
            }),
        )
        .await;
    // A shared database refuses the id, separate stores take it as new.
    assert!(matches!(response.status().as_u16(), 200 | 409));

    let response = app.get_project(&project_id).await;
    assert_eq!(response.status().as_u16(), 200);
    let body = get_json_response_body(response).await;
    assert_eq!(body["projectName"], "Parochial House");
    assert_eq!(body["archived"], false);

    let response = app.get_projects().await;
    let body = get_json_response_body(response).await;
    assert_eq!(body.as_array().unwrap().len(), 1);
}
