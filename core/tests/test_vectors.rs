//! Verify build/parse methods against JSON test vectors stored in `test-vectors/`.
//!
//! Each vector file describes inputs, expected requests, simulated responses,
//! and expected parse results or errors. Comparing parsed JSON (not raw
//! strings) avoids false negatives from field-ordering differences.

use sam_client::{
    AccessPolicyMembership, AccessPolicyResponseEntry, ClientError, HttpMethod, HttpRequest, HttpResponse,
    ResourcesClient,
};
use serde_json::Value;

const BASE_URL: &str = "http://localhost:8080";

fn client() -> ResourcesClient {
    ResourcesClient::new(BASE_URL)
}

/// Parse the method string from test vectors into `HttpMethod`.
fn parse_method(s: &str) -> HttpMethod {
    match s {
        "GET" => HttpMethod::Get,
        "POST" => HttpMethod::Post,
        "PUT" => HttpMethod::Put,
        "DELETE" => HttpMethod::Delete,
        other => panic!("unknown method: {other}"),
    }
}

fn load(raw: &str) -> Vec<Value> {
    let vectors: Value = serde_json::from_str(raw).unwrap();
    vectors["cases"].as_array().unwrap().clone()
}

fn input<'a>(case: &'a Value, key: &str) -> &'a str {
    case["input"][key].as_str().unwrap()
}

fn check_request(name: &str, req: &HttpRequest, expected: &Value) {
    assert_eq!(req.method, parse_method(expected["method"].as_str().unwrap()), "{name}: method");
    assert_eq!(req.url, format!("{BASE_URL}{}", expected["path"].as_str().unwrap()), "{name}: url");
    assert_eq!(req.header("accept"), Some("application/json"), "{name}: accept");
    match &expected["body"] {
        Value::Null => assert!(req.body.is_none(), "{name}: body should be None"),
        body => {
            let sent: Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
            assert_eq!(&sent, body, "{name}: body");
            assert_eq!(req.header("content-type"), Some("application/json"), "{name}: content-type");
        }
    }
}

fn simulated(case: &Value) -> HttpResponse {
    let sim = &case["simulated_response"];
    HttpResponse {
        status: sim["status"].as_u64().unwrap() as u16,
        headers: Vec::new(),
        body: sim["body"].as_str().unwrap().to_string(),
    }
}

/// Compare a parse result with `expected_result` or `expected_error`.
fn check_result<T>(name: &str, case: &Value, result: Result<T, ClientError>, expected: impl FnOnce(&Value) -> T)
where
    T: PartialEq + std::fmt::Debug,
{
    if let Some(expected_error) = case.get("expected_error") {
        let err = result.unwrap_err();
        let status = expected_error["status"].as_u64().unwrap() as u16;
        assert_eq!(err.status(), Some(status), "{name}: status");
        assert_eq!(
            err.report().unwrap().message,
            expected_error["message"].as_str().unwrap(),
            "{name}: message"
        );
    } else {
        let value = result.unwrap();
        let want = match case.get("expected_result") {
            Some(v) => expected(v),
            None => expected(&Value::Null),
        };
        assert_eq!(value, want, "{name}: parsed result");
    }
}

// ---------------------------------------------------------------------------
// Create
// ---------------------------------------------------------------------------

#[test]
fn create_resource_test_vectors() {
    let c = client();
    for case in load(include_str!("../../test-vectors/create_resource.json")) {
        let name = case["name"].as_str().unwrap();

        let req = c
            .build_create_resource(input(&case, "resourceTypeName"), input(&case, "resourceId"))
            .unwrap();
        check_request(name, &req, &case["expected_request"]);

        let result = c.parse_create_resource(simulated(&case));
        check_result(name, &case, result, |_| ());
    }
}

// ---------------------------------------------------------------------------
// Overwrite policy
// ---------------------------------------------------------------------------

#[test]
fn overwrite_policy_test_vectors() {
    let c = client();
    for case in load(include_str!("../../test-vectors/overwrite_policy.json")) {
        let name = case["name"].as_str().unwrap();
        let policy: AccessPolicyMembership = serde_json::from_value(case["input"]["policy"].clone()).unwrap();

        let req = c
            .build_overwrite_policy(
                input(&case, "resourceTypeName"),
                input(&case, "resourceId"),
                input(&case, "policyName"),
                &policy,
            )
            .unwrap();
        check_request(name, &req, &case["expected_request"]);

        let result = c.parse_overwrite_policy(simulated(&case));
        check_result(name, &case, result, |v| serde_json::from_value(v.clone()).unwrap());
    }
}

// ---------------------------------------------------------------------------
// List policies
// ---------------------------------------------------------------------------

#[test]
fn list_resource_policies_test_vectors() {
    let c = client();
    for case in load(include_str!("../../test-vectors/list_resource_policies.json")) {
        let name = case["name"].as_str().unwrap();

        let req = c
            .build_list_resource_policies(input(&case, "resourceTypeName"), input(&case, "resourceId"))
            .unwrap();
        check_request(name, &req, &case["expected_request"]);

        let result = c.parse_list_resource_policies(simulated(&case));
        check_result(name, &case, result, |v| {
            serde_json::from_value::<Vec<AccessPolicyResponseEntry>>(v.clone()).unwrap()
        });
    }
}

// ---------------------------------------------------------------------------
// Resource action
// ---------------------------------------------------------------------------

#[test]
fn resource_action_test_vectors() {
    let c = client();
    for case in load(include_str!("../../test-vectors/resource_action.json")) {
        let name = case["name"].as_str().unwrap();

        let req = c
            .build_resource_action(
                input(&case, "resourceTypeName"),
                input(&case, "resourceId"),
                input(&case, "action"),
            )
            .unwrap();
        check_request(name, &req, &case["expected_request"]);

        let result = c.parse_resource_action(simulated(&case));
        check_result(name, &case, result, |v| v.as_bool().unwrap());
    }
}
