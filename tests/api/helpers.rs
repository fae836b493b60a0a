use planning_manager::{
    app_state::AppState,
    domain::{Email, Group, Role, User, UserStore},
    services::{
        data_stores::{HashmapPlanningStore, HashmapUserStore},
        notification_channel,
        postmark_email_client::PostmarkEmailClient,
        GroupRegistry, TenantStores,
    },
    utils::constants::{test, GROUP_HEADER},
    Application,
};
use reqwest::{Client, Response};
use secrecy::Secret;
use serde_json::Value;
use std::{sync::Arc, time::Duration};
use test_context::AsyncTestContext;
use uuid::Uuid;
use wiremock::{
    matchers::method, matchers::path, Mock, MockServer, Request,
    ResponseTemplate,
};

pub struct TestApp {
    pub address: String,
    pub email_server: MockServer,
    pub http_client: reqwest::Client,
    pub stores: TenantStores,
    pub registry: Arc<GroupRegistry>,
}

impl TestApp {
    pub async fn new() -> Self {
        let group =
            Group::parse(test::GROUP).expect("Failed to parse test group");
        let stores = TenantStores::new(
            group,
            Arc::new(HashmapPlanningStore::default()),
            Arc::new(HashmapUserStore::default()),
        );
        let registry = Arc::new(GroupRegistry::default());
        registry
            .register(stores.clone())
            .await
            .expect("Failed to register test group");

        let email_server = MockServer::start().await;
        let base_url = email_server.uri();
        let email_client = Arc::new(configure_postmark_email_client(base_url));
        let (notifier, worker) = notification_channel(16, email_client);
        tokio::spawn(worker.run());

        let app_state = AppState::new(registry.clone(), notifier);

        let app = Application::build(app_state, test::APP_ADDRESS)
            .await
            .expect("Failed to build app");
        let address = format!("http://{}", app.address.clone());

        #[allow(clippy::let_underscore_future)]
        let _ = tokio::spawn(app.run());

        let http_client = reqwest::Client::new();

        Self {
            address,
            email_server,
            http_client,
            stores,
            registry,
        }
    }

    /// Registers another group with empty in-memory stores.
    pub async fn register_group(&self, name: &str) -> TenantStores {
        let group = Group::parse(name).expect("Failed to parse group");
        let stores = TenantStores::new(
            group,
            Arc::new(HashmapPlanningStore::default()),
            Arc::new(HashmapUserStore::default()),
        );
        self.registry
            .register(stores.clone())
            .await
            .expect("Failed to register group");
        stores
    }

    pub async fn post_project<Body>(&self, body: &Body) -> Response
    where
        Body: serde::Serialize,
    {
        self.post_project_for_group(test::GROUP, body).await
    }

    pub async fn post_project_for_group<Body>(
        &self,
        group: &str,
        body: &Body,
    ) -> Response
    where
        Body: serde::Serialize,
    {
        self.http_client
            .post(format!("{}/projects", &self.address))
            .header(GROUP_HEADER, group)
            .json(body)
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn get_projects(&self) -> Response {
        self.get_projects_for_group(Some(test::GROUP)).await
    }

    pub async fn get_projects_for_group(&self, group: Option<&str>) -> Response {
        let mut request =
            self.http_client.get(format!("{}/projects", &self.address));
        if let Some(group) = group {
            request = request.header(GROUP_HEADER, group);
        }
        request.send().await.expect("Failed to execute request")
    }

    pub async fn get_project(&self, project_id: &str) -> Response {
        self.http_client
            .get(format!("{}/projects/{project_id}", &self.address))
            .header(GROUP_HEADER, test::GROUP)
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn get_planning(&self, project_id: &str) -> Response {
        self.http_client
            .get(format!("{}/projects/{project_id}/planning", &self.address))
            .header(GROUP_HEADER, test::GROUP)
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn post_planning<Body>(
        &self,
        project_id: &str,
        body: &Body,
    ) -> Response
    where
        Body: serde::Serialize,
    {
        self.http_client
            .post(format!("{}/projects/{project_id}/planning", &self.address))
            .header(GROUP_HEADER, test::GROUP)
            .json(body)
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn post_validate_planning<Body>(
        &self,
        project_id: &str,
        body: &Body,
    ) -> Response
    where
        Body: serde::Serialize,
    {
        self.http_client
            .post(format!(
                "{}/projects/{project_id}/planning/validate",
                &self.address
            ))
            .header(GROUP_HEADER, test::GROUP)
            .json(body)
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn post_cycle<Body>(&self, project_id: &str, body: &Body) -> Response
    where
        Body: serde::Serialize,
    {
        self.http_client
            .post(format!(
                "{}/projects/{project_id}/planning/cycle",
                &self.address
            ))
            .header(GROUP_HEADER, test::GROUP)
            .json(body)
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn post_validate_cycle<Body>(
        &self,
        project_id: &str,
        body: &Body,
    ) -> Response
    where
        Body: serde::Serialize,
    {
        self.http_client
            .post(format!(
                "{}/projects/{project_id}/planning/cycle/validate",
                &self.address
            ))
            .header(GROUP_HEADER, test::GROUP)
            .json(body)
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn get_assignments(&self, employee_id: &str) -> Response {
        self.http_client
            .get(format!("{}/planning/assignments/{employee_id}", &self.address))
            .header(GROUP_HEADER, test::GROUP)
            .send()
            .await
            .expect("Failed to execute request")
    }
}

impl AsyncTestContext for TestApp {
    async fn setup() -> TestApp {
        TestApp::new().await
    }

    async fn teardown(self) {}
}

fn configure_postmark_email_client(base_url: String) -> PostmarkEmailClient {
    let postmark_auth_token = Secret::new("auth_token".to_owned());

    let sender =
        Email::parse(Secret::new(test::email_client::SENDER.to_owned()))
            .expect("Failed to parse sender email");

    let http_client = Client::builder()
        .timeout(test::email_client::TIMEOUT)
        .build()
        .expect("Failed to build HTTP client");

    PostmarkEmailClient::new(base_url, sender, postmark_auth_token, http_client)
}

pub async fn get_json_response_body(response: Response) -> Value {
    let body: Value = response
        .json()
        .await
        .expect("failed to parse response body JSON");
    body
}

pub async fn mount_email_server(app: &TestApp) {
    Mock::given(path("/email"))
        .and(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&app.email_server)
        .await;
}

/// Polls the mock Postmark server until `count` emails arrived or two
/// seconds passed.
pub async fn wait_for_emails(app: &TestApp, count: usize) -> Vec<Value> {
    let mut received = Vec::new();
    for _ in 0..100 {
        received = app
            .email_server
            .received_requests()
            .await
            .unwrap_or_default();
        if received.len() >= count {
            break;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    received
        .iter()
        .map(|request: &Request| {
            request.body_json::<Value>().expect("email body is not JSON")
        })
        .collect()
}

pub async fn add_project(app: &TestApp, name: &str) -> String {
    let response = app
        .post_project(&serde_json::json!({
            "projectName": name,
            "projectType": "WORK"
        }))
        .await;

    assert_eq!(
        response.status().as_u16(),
        201,
        "Failed to add new project with name: {name}"
    );

    let body = get_json_response_body(response).await;
    body.get("id")
        .expect("No ID in response")
        .as_str()
        .expect("ID is not a string")
        .to_owned()
}

pub async fn archive_project(app: &TestApp, project_id: &str) {
    let response = app
        .post_project(&serde_json::json!({
            "id": project_id,
            "projectName": "Archived",
            "projectType": "WORK",
            "archived": true
        }))
        .await;
    assert_eq!(response.status().as_u16(), 200, "Failed to archive project");
}

/// Employees have no route of their own; they are seeded into the store.
pub async fn add_employee(app: &TestApp, username: &str, enabled: bool) -> String {
    let email = Email::parse(Secret::new(format!("{username}@craggy.ie")))
        .expect("Failed to parse email");
    let mut user = User::new(username.to_owned(), email, vec![Role::User]);
    user.enabled = enabled;
    let id = user.id.to_string();
    app.stores
        .user_store
        .add_user(user)
        .await
        .expect("Failed to add employee");
    id
}

pub fn random_id() -> String {
    Uuid::new_v4().to_string()
}

pub fn entry_body(start: &str, end: &str, employee_ids: &[&str]) -> Value {
    serde_json::json!({
        "title": "Tea round",
        "start": start,
        "end": end,
        "employeeIds": employee_ids,
        "multipleAssignment": employee_ids.len() > 1
    })
}
