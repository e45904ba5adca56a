//! Test helpers for inbound HTTP handlers.

use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::{App, test, web};
use serde_json::Value;

use super::configure_api;
use super::state::HttpState;
use crate::domain::ports::{
    MockPermissionCommand, MockPermissionQuery, MockRoleCommand, MockRoleQuery, MockUserCommand,
    MockUserQuery,
};

/// One mock per driving port. Tests set expectations on the ones they use;
/// any call to an untouched mock fails the test.
#[derive(Default)]
pub(crate) struct MockPorts {
    pub permissions: MockPermissionCommand,
    pub permissions_query: MockPermissionQuery,
    pub roles: MockRoleCommand,
    pub roles_query: MockRoleQuery,
    pub users: MockUserCommand,
    pub users_query: MockUserQuery,
}

impl MockPorts {
    pub(crate) fn into_state(self) -> HttpState {
        HttpState {
            permissions: Arc::new(self.permissions),
            permissions_query: Arc::new(self.permissions_query),
            roles: Arc::new(self.roles),
            roles_query: Arc::new(self.roles_query),
            users: Arc::new(self.users),
            users_query: Arc::new(self.users_query),
        }
    }
}

/// Send `request` through the full `/api/v1` scope and decode the JSON body.
pub(crate) async fn call_json(ports: MockPorts, request: test::TestRequest) -> (StatusCode, Value) {
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(ports.into_state()))
            .service(web::scope("/api/v1").configure(configure_api)),
    )
    .await;
    let response = test::call_service(&app, request.to_request()).await;
    let status = response.status();
    let body = test::read_body(response).await;
    let value = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body).expect("JSON response body")
    };
    (status, value)
}
