//! # Auth Handler Tests
//!
//! Drive the full router with `oneshot`, so the auth gate, response mapping
//! and envelope are exercised together with the handlers.


use super::*;
use crate::test_utils::{body_json, create_user, json_request, setup_test_db, test_app, test_tokens};
use axum::http::StatusCode;
use serde_json::json;
use tower::ServiceExt;
