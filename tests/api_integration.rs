//! Integration tests for the onboarding REST API.
//!
//! Each test spins up an Axum server on a random port backed by an
//! in-memory database and the plain-text extractor, then drives it over
//! real HTTP with reqwest.

use std::sync::Arc;
use std::time::Duration;

use reqwest::multipart::{Form, Part};
use serde_json::Value;
use tokio::net::TcpListener;
use tokio::time::timeout;

use bank_onboard::accounts::AccountService;
use bank_onboard::api::{AppState, api_routes};
use bank_onboard::pipeline::Coordinator;
use bank_onboard::scanner::{DocumentScanner, PlainTextExtractor};
use bank_onboard::store::{Database, LibSqlBackend};
use bank_onboard::tools::ToolRegistry;
use bank_onboard::tools::builtin::register_pipeline_tools;
use bank_onboard::validation::Validator;

/// Maximum time any test is allowed to run before we consider it hung.
const TEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Start the API on a random port, return its base URL.
async fn start_server() -> String {
    let db: Arc<dyn Database> = Arc::new(LibSqlBackend::new_memory().await.unwrap());
    let coordinator = Arc::new(Coordinator::new(
        Arc::new(DocumentScanner::new(Arc::new(PlainTextExtractor::new()))),
        Arc::new(Validator::default()),
        Arc::new(AccountService::new(Arc::clone(&db))),
        Arc::clone(&db),
    ));
    let tools = Arc::new(ToolRegistry::new());
    register_pipeline_tools(&tools, &coordinator);
    let app = api_routes(AppState::new(coordinator, tools, db), 1024 * 1024);

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    // Give the server a moment to start accepting connections.
    tokio::time::sleep(Duration::from_millis(50)).await;

    format!("http://127.0.0.1:{port}")
}

fn document(name: &str, text: &str) -> Part {
    Part::bytes(text.as_bytes().to_vec())
        .file_name(name.to_string())
        .mime_str("text/plain")
        .unwrap()
}

/// A document set that satisfies every customer-level check.
fn full_document_form() -> Form {
    Form::new()
        .part(
            "documents",
            document(
                "drivers_license.txt",
                "Name: Jane Doe\nDOB: 1990-01-01\nLicense Number: D1234567",
            ),
        )
        .part(
            "documents",
            document("ssn_card.txt", "SSN: 123-45-6789\nName: Jane Doe"),
        )
        .part(
            "documents",
            document(
                "utility_bill.txt",
                "Address: 1 Main St\nCity: Springfield\nState: IL\nZip: 62701",
            ),
        )
        .part(
            "documents",
            document(
                "employment_letter.txt",
                "Employer: Acme Corp\nPosition: Engineer\nSalary: $85,000",
            ),
        )
}

async fn post_documents(client: &reqwest::Client, base: &str, form: Form) -> (u16, Value) {
    let resp = client
        .post(format!("{base}/api/process-documents"))
        .multipart(form)
        .send()
        .await
        .unwrap();
    let status = resp.status().as_u16();
    (status, resp.json().await.unwrap())
}

#[tokio::test]
async fn full_document_set_completes_onboarding() {
    timeout(TEST_TIMEOUT, async {
        let base = start_server().await;
        let client = reqwest::Client::new();

        let (status, body) = post_documents(&client, &base, full_document_form()).await;
        assert_eq!(status, 200);
        assert_eq!(body["success"], true);

        let data = &body["data"];
        assert_eq!(data["status"], "completed");
        assert_eq!(data["bank_account"]["status"], "active");
        assert_eq!(data["bank_account"]["account_type"], "checking");
        assert_eq!(data["customer_data"]["first_name"], "Jane");
        assert_eq!(
            data["customer_data"]["social_security_number"],
            "***-**-6789"
        );
        assert_eq!(data["documents"].as_array().unwrap().len(), 4);

        // The SSN appears nowhere in full, not even inside the documents.
        assert!(!body.to_string().contains("123-45-6789"));
        let ssn_doc = data["documents"]
            .as_array()
            .unwrap()
            .iter()
            .find(|d| d["type"] == "social_security_card")
            .unwrap();
        assert_eq!(
            ssn_doc["extracted_data"]["social_security_number"],
            "***-**-6789"
        );

        // The account is persisted and reachable by number and by customer.
        let number = data["bank_account"]["account_number"].as_str().unwrap();
        let account: Value = client
            .get(format!("{base}/api/accounts/{number}"))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(account["account"]["status"], "active");

        let customer_id = data["customer_data"]["id"].as_str().unwrap();
        let owned: Value = client
            .get(format!("{base}/api/customers/{customer_id}/accounts"))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(owned["accounts"].as_array().unwrap().len(), 1);

        // And the run was recorded.
        let runs: Value = client
            .get(format!("{base}/api/runs"))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        let runs = runs["runs"].as_array().unwrap();
        assert_eq!(runs.len(), 1);
        assert_eq!(runs[0]["status"], "completed");
        assert_eq!(runs[0]["account_number"], number);
    })
    .await
    .expect("test timed out");
}

#[tokio::test]
async fn missing_documents_is_bad_request() {
    timeout(TEST_TIMEOUT, async {
        let base = start_server().await;
        let client = reqwest::Client::new();

        let form = Form::new().text("note", "no files here");
        let (status, body) = post_documents(&client, &base, form).await;
        assert_eq!(status, 400);
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], "No documents provided");
    })
    .await
    .expect("test timed out");
}

#[tokio::test]
async fn incomplete_documents_fail_validation() {
    timeout(TEST_TIMEOUT, async {
        let base = start_server().await;
        let client = reqwest::Client::new();

        let form = Form::new().part(
            "documents",
            document("ssn_card.txt", "SSN: 123-45-6789"),
        );
        let (status, body) = post_documents(&client, &base, form).await;
        assert_eq!(status, 200);
        assert_eq!(body["data"]["status"], "validation_failed");
        assert!(body["data"].get("bank_account").is_none());
        assert!(!body["data"]["validation_issues"].as_array().unwrap().is_empty());
    })
    .await
    .expect("test timed out");
}

#[tokio::test]
async fn scanner_test_endpoint_returns_documents_only() {
    timeout(TEST_TIMEOUT, async {
        let base = start_server().await;
        let client = reqwest::Client::new();

        let form = Form::new().part(
            "documents",
            document("passport.txt", "Name: Jane Q Doe\nPassport Number: X1234567"),
        );
        let resp = client
            .post(format!("{base}/api/test/document-scanner"))
            .multipart(form)
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 200);
        let body: Value = resp.json().await.unwrap();
        let docs = body["scanned_documents"].as_array().unwrap();
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0]["type"], "passport");
        assert_eq!(docs[0]["extracted_data"]["first_name"], "Jane Q");
        assert_eq!(docs[0]["extracted_data"]["last_name"], "Doe");
        assert_eq!(docs[0]["verification_status"], "pending");
    })
    .await
    .expect("test timed out");
}

#[tokio::test]
async fn health_and_agent_status() {
    timeout(TEST_TIMEOUT, async {
        let base = start_server().await;
        let client = reqwest::Client::new();

        let health: Value = client
            .get(format!("{base}/api/health"))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(health["status"], "healthy");
        assert!(health["timestamp"].is_string());

        let status: Value = client
            .get(format!("{base}/api/agents/status"))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        for agent in ["coordinator", "document_scanner", "validator", "account_creator"] {
            assert_eq!(status[agent], "active", "agent {agent}");
        }
        assert!(status["timestamp"].is_string());

        let agents: Value = client
            .get(format!("{base}/api/agents"))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(agents["agents"].as_array().unwrap().len(), 4);
    })
    .await
    .expect("test timed out");
}

#[tokio::test]
async fn account_lifecycle_through_tools_and_routes() {
    timeout(TEST_TIMEOUT, async {
        let base = start_server().await;
        let client = reqwest::Client::new();

        let tools: Value = client
            .get(format!("{base}/api/tools"))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(tools["tools"].as_array().unwrap().len(), 5);

        let created: Value = client
            .post(format!("{base}/api/tools/create_bank_account"))
            .json(&serde_json::json!({"customer_id": "cust-42", "account_type": "savings"}))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(created["success"], true);
        assert_eq!(created["result"]["status"], "pending");
        let number = created["result"]["account_number"].as_str().unwrap().to_string();

        let resp = client
            .post(format!("{base}/api/accounts/{number}/activate"))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 200);

        // Active → suspended is allowed, suspended → pending is not.
        let resp = client
            .post(format!("{base}/api/accounts/{number}/status"))
            .json(&serde_json::json!({"status": "suspended"}))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 200);
        let body: Value = resp.json().await.unwrap();
        assert_eq!(body["account"]["status"], "suspended");

        let resp = client
            .post(format!("{base}/api/accounts/{number}/status"))
            .json(&serde_json::json!({"status": "pending"}))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 409);

        let resp = client
            .post(format!("{base}/api/accounts/9999999999/activate"))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 404);
    })
    .await
    .expect("test timed out");
}
