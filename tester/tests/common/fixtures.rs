//! Test fixtures: canned responses of a well-behaved library service

use serde_json::{Value, json};

use shared::HttpMethod;
use tester::core::scenario::{SHORTCUT_OTP, TEST_PASSWORD};
use tester::types::{ApiRequest, HttpOutcome};

pub struct TestFixtures;

impl TestFixtures {
    pub const EMAIL: &'static str = "tester_4242@xan.id";
    pub const TOKEN: &'static str = "jwt-fixture-token";
    pub const BOOK_ID: u64 = 7;
    pub const TRANSACTION_ID: u64 = 31;
    pub const STEP_COUNT: usize = 11;

    /// Endpoints of the library flow in execution order; steps 9 and 10
    /// already rendered with [`Self::BOOK_ID`]
    pub fn expected_endpoints() -> Vec<String> {
        [
            "POST /auth/register",
            "POST /auth/register",
            "POST /auth/otp",
            "POST /auth/otp",
            "POST /auth/login",
            "POST /auth/login",
            "GET /auth/me",
            "GET /books",
            "POST /transactions/borrow/7",
            "POST /transactions/return/7",
            "GET /transactions/history",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect()
    }

    pub fn success(data: Value) -> HttpOutcome {
        HttpOutcome::Success {
            status: 200,
            body: json!({ "status": "success", "message": "ok", "data": data }),
        }
    }

    pub fn error(status: u16, message: &str) -> HttpOutcome {
        HttpOutcome::Failure {
            status,
            body: json!({ "status": "error", "message": message, "data": null }),
        }
    }

    /// Answer a request the way the real service would
    pub fn respond(request: &ApiRequest) -> HttpOutcome {
        let body = request.body.clone().unwrap_or(Value::Null);
        let field = |name: &str| body.get(name).and_then(Value::as_str).unwrap_or_default().to_string();
        let authorized = request.bearer.as_deref() == Some(Self::TOKEN);

        match (request.method, request.path.as_str()) {
            (HttpMethod::Post, "/auth/register") if field("email").contains('@') => {
                Self::success(json!({ "email": field("email") }))
            }
            (HttpMethod::Post, "/auth/register") => Self::error(400, "invalid email format"),
            (HttpMethod::Post, "/auth/otp") if field("otp") == SHORTCUT_OTP && !field("email").is_empty() => {
                Self::success(json!(null))
            }
            (HttpMethod::Post, "/auth/otp") => Self::error(400, "invalid otp"),
            (HttpMethod::Post, "/auth/login") if field("password") == TEST_PASSWORD => {
                Self::success(json!({ "token": Self::TOKEN }))
            }
            (HttpMethod::Post, "/auth/login") => Self::error(401, "Invalid email or password"),
            (_, _) if request.path != "/books" && !authorized => Self::error(401, "unauthorized"),
            (HttpMethod::Get, "/auth/me") => Self::success(json!({ "email": Self::EMAIL })),
            (HttpMethod::Get, "/books") => Self::success(json!([
                { "id": Self::BOOK_ID, "title": "Laskar Pelangi" },
                { "id": 9, "title": "Bumi Manusia" }
            ])),
            (HttpMethod::Post, "/transactions/borrow/7") => {
                Self::success(json!({ "id": Self::TRANSACTION_ID, "book_id": Self::BOOK_ID }))
            }
            (HttpMethod::Post, "/transactions/return/7") => Self::success(json!({ "id": Self::TRANSACTION_ID })),
            (HttpMethod::Get, "/transactions/history") => Self::success(json!([{ "id": Self::TRANSACTION_ID }])),
            _ => Self::error(404, "not found"),
        }
    }
}
