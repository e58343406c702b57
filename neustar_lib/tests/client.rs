//! End-to-end tests of the façade against an in-process stub server.

mod helpers;

use helpers::stub_server::{StubResponse, StubServer};
use neustar_lib::alerting::NewAlertPolicyParameters;
use neustar_lib::instant_testing::InstantTestParameters;
use neustar_lib::monitoring::{
    AggregateSampleParameters, CreateMonitorParameters, SampleRequestParameters,
    UpdateMonitorParameters,
};
use neustar_lib::scripting::ScriptCreateParameters;
use neustar_lib::{Client, Credentials, Error, FixedClock, Outcome};
use std::collections::HashSet;
use std::time::Duration;

const NOW: i64 = 1_700_000_000;
const SIG_AT_NOW: &str = "93e03d2ee15856238b89f2524d19fa96";

fn client_for(server: &StubServer) -> Client {
    Client::builder(Credentials::new("k", "s"))
        .base_url(server.url())
        .clock(FixedClock(NOW))
        .timeout(Duration::from_secs(5))
        .build()
        .unwrap()
}

#[tokio::test]
async fn list_monitors_decodes_envelope() {
    let server = StubServer::start(vec![StubResponse::json(
        200,
        r#"{"data":{"items":[{"id":"m1","name":"home"}]}}"#,
    )])
    .await;
    let client = client_for(&server);

    let outcome = client.monitoring().list().await.unwrap();
    assert_eq!(outcome.status(), 200);
    let monitors = outcome.ok().unwrap();
    assert_eq!(monitors.len(), 1);
    assert_eq!(monitors[0].id, "m1");
    assert_eq!(monitors[0].name, "home");

    let requests = server.requests();
    assert_eq!(requests.len(), 1);
    let req = &requests[0];
    assert_eq!(req.method, "GET");
    assert_eq!(req.path, "/monitor/1.0");
    assert_eq!(req.query.get("apikey").map(String::as_str), Some("k"));
    assert_eq!(req.query.get("sig").map(String::as_str), Some(SIG_AT_NOW));
    assert_eq!(req.header("accept"), Some("application/json"));
    assert!(req
        .header("user-agent")
        .unwrap()
        .starts_with(&format!("neustar-rs/{}", neustar_lib::VERSION)));
}

#[tokio::test]
async fn delete_failure_is_rejected_not_error() {
    let server = StubServer::start(vec![StubResponse::json(500, "")]).await;
    let client = client_for(&server);

    let outcome = client.monitoring().delete("m1").await.unwrap();
    match outcome {
        Outcome::Rejected(ref e) => {
            assert_eq!(e.status_code, 500);
            assert!(e.response_data.is_none());
        }
        Outcome::Success { .. } => panic!("expected a rejection"),
    }
    assert_eq!(outcome.status(), 500);

    let req = &server.requests()[0];
    assert_eq!(req.method, "DELETE");
    assert_eq!(req.path, "/monitor/1.0/m1");
}

#[tokio::test]
async fn delete_success() {
    let server = StubServer::start(vec![StubResponse::json(200, "")]).await;
    let client = client_for(&server);
    let outcome = client.monitoring().delete("m1").await.unwrap();
    assert_eq!(outcome, Outcome::Success { status: 200, value: () });
}

#[tokio::test]
async fn create_monitor_posts_json() {
    let server = StubServer::start(vec![StubResponse::json(
        201,
        r#"{"data":{"items":{"id":"new1"}}}"#,
    )])
    .await;
    let client = client_for(&server);

    let mut params = CreateMonitorParameters::new("home", 5, "london,tokyo");
    params.test_script = Some("script1".into());
    params.browser = Some("FF".into());
    let created = client
        .monitoring()
        .create(&params)
        .await
        .unwrap()
        .into_result()
        .unwrap();
    assert_eq!(created.id, "new1");

    let req = &server.requests()[0];
    assert_eq!(req.method, "POST");
    assert_eq!(req.path, "/monitor/1.0");
    assert_eq!(req.header("content-type"), Some("application/json"));
    let body: serde_json::Value = serde_json::from_str(&req.body).unwrap();
    assert_eq!(
        body,
        serde_json::json!({
            "name": "home",
            "interval": 5,
            "testScript": "script1",
            "locations": "london,tokyo",
            "browser": "FF"
        })
    );
}

#[tokio::test]
async fn update_monitor_puts_json() {
    let server = StubServer::start(vec![StubResponse::json(200, "{}")]).await;
    let client = client_for(&server);
    let params = UpdateMonitorParameters {
        active: Some(false),
        ..Default::default()
    };
    let outcome = client.monitoring().update("m1", &params).await.unwrap();
    assert!(outcome.is_success());

    let req = &server.requests()[0];
    assert_eq!(req.method, "PUT");
    assert_eq!(req.path, "/monitor/1.0/m1");
    assert_eq!(req.body, r#"{"active":false}"#);
}

#[tokio::test]
async fn invalid_input_fails_before_any_request() {
    let server = StubServer::start(vec![StubResponse::json(200, "{}")]).await;
    let client = client_for(&server);

    let params = CreateMonitorParameters::new("home", 77, "london");
    let err = client.monitoring().create(&params).await.unwrap_err();
    match err {
        Error::Validation(v) => {
            assert_eq!(v.field, "interval");
            assert_eq!(v.value, "77");
        }
        other => panic!("unexpected error: {other}"),
    }

    let params = AggregateSampleParameters {
        group_by: Some("month".into()),
        ..Default::default()
    };
    let err = client.monitoring().aggregate("m1", &params).await.unwrap_err();
    assert!(matches!(err, Error::Validation(_)));

    let params = NewAlertPolicyParameters {
        name: "ops".into(),
        strikes: 9,
        ..Default::default()
    };
    let err = client.alerting().create_policy(&params).await.unwrap_err();
    assert!(matches!(err, Error::Validation(_)));

    assert!(server.requests().is_empty());
}

#[tokio::test]
async fn samples_send_date_range() {
    let server = StubServer::start(vec![StubResponse::json(
        200,
        r#"{"data":{"items":[{"id":"s1","duration":1200.5},{"id":"s2"}],"count":2,"offset":0,"more":true}}"#,
    )])
    .await;
    let client = client_for(&server);

    let params = SampleRequestParameters {
        start_date: Some("2012-03-01T12:00".into()),
        end_date: Some("2012-03-02".into()),
        offset: Some(0),
    };
    let page = client
        .monitoring()
        .samples("m1", &params)
        .await
        .unwrap()
        .ok()
        .unwrap();
    assert_eq!(page.items.len(), 2);
    assert_eq!(page.items[0].id, "s1");
    assert_eq!(page.items[0].duration, Some(1200.5));
    assert_eq!(page.more, Some(true));

    let req = &server.requests()[0];
    assert_eq!(req.path, "/monitor/1.0/m1/sample");
    let keys: HashSet<&str> = req.query.keys().map(String::as_str).collect();
    let expected: HashSet<&str> = ["startDate", "endDate", "offset", "apikey", "sig"]
        .into_iter()
        .collect();
    assert_eq!(keys, expected);
    assert_eq!(
        req.query.get("startDate").map(String::as_str),
        Some("2012-03-01T12:00")
    );
}

#[tokio::test]
async fn aggregate_and_summary_paths() {
    let server = StubServer::start(vec![
        StubResponse::json(
            200,
            r#"{"data":{"items":[{"count":12,"avg":800.0,"location":"london","tp90":950}]}}"#,
        ),
        StubResponse::json(
            200,
            r#"{"data":{"items":[{"status":"Active","avgUptimeDay":100.0,"sampleCountDay":288}]}}"#,
        ),
    ])
    .await;
    let client = client_for(&server);

    let params = AggregateSampleParameters {
        frequency: Some("hour".into()),
        group_by: Some("location".into()),
        ..Default::default()
    };
    let page = client
        .monitoring()
        .aggregate("m1", &params)
        .await
        .unwrap()
        .into_result()
        .unwrap();
    assert_eq!(page.items[0].count, 12);
    assert_eq!(page.items[0].location.as_deref(), Some("london"));

    let summary = client
        .monitoring()
        .summary("m1")
        .await
        .unwrap()
        .into_result()
        .unwrap();
    assert_eq!(summary[0].sample_count_day, 288);

    let requests = server.requests();
    assert_eq!(requests[0].path, "/monitor/1.0/m1/aggregate");
    assert_eq!(
        requests[0].query.get("groupBy").map(String::as_str),
        Some("location")
    );
    assert_eq!(requests[1].path, "/monitor/1.0/m1/summary");
}

#[tokio::test]
async fn malformed_success_body_is_decode_error() {
    let server = StubServer::start(vec![StubResponse::json(200, "{\"data\": [")]).await;
    let client = client_for(&server);
    let err = client.monitoring().list().await.unwrap_err();
    assert!(matches!(err, Error::Decode(_)));
}

#[tokio::test]
async fn rejection_carries_error_body() {
    let server = StubServer::start(vec![StubResponse::json(
        404,
        r#"{"error":{"message":"Item with Id m9 not found","code":"MON_0001"}}"#,
    )])
    .await;
    let client = client_for(&server);

    let outcome = client.monitoring().get("m9").await.unwrap();
    assert_eq!(outcome.status(), 404);
    match outcome.into_result() {
        Err(Error::Api(e)) => {
            assert_eq!(e.message, "Item with Id m9 not found");
            assert_eq!(e.code.as_deref(), Some("MON_0001"));
        }
        other => panic!("unexpected: {other:?}"),
    }
}

#[tokio::test]
async fn per_call_timeout() {
    let server = StubServer::start(vec![
        StubResponse::json(200, r#"{"data":{"items":[]}}"#).delayed(Duration::from_secs(3))
    ])
    .await;
    let client = client_for(&server);
    let err = client
        .monitoring()
        .with_timeout(Duration::from_millis(200))
        .locations()
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Timeout(_)), "got {err}");
}

#[tokio::test]
async fn connection_refused_is_transport_error() {
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let client = Client::builder(Credentials::new("k", "s"))
        .base_url(format!("http://127.0.0.1:{}/", port))
        .build()
        .unwrap();
    let err = client.scripting().list().await.unwrap_err();
    assert!(matches!(err, Error::Transport(_)), "got {err}");
}

#[tokio::test]
async fn policies_scripts_and_instant_tests() {
    let server = StubServer::start(vec![
        StubResponse::json(
            200,
            r#"{"data":{"items":[{"id":"p1","name":"ops","strikes":2,"emailAddresses":["ops@example.com"]}]}}"#,
        ),
        StubResponse::json(
            200,
            r#"{"id":"p2","name":"oncall","strikes":1,"emailAddresses":["a@example.com"]}"#,
        ),
        StubResponse::json(
            200,
            r#"{"data":{"items":[{"id":"s1","version":"2","name":"checkout"}]}}"#,
        ),
        StubResponse::json(200, r#"{"data":{"items":{"id":"job1"}}}"#),
        StubResponse::json(
            200,
            r#"{"data":{"items":[{"id":"job1","status":"COMPLETE","locations":[{"location":"london"}]}]}}"#,
        ),
    ])
    .await;
    let client = client_for(&server);

    let policies = client
        .alerting()
        .list_policies()
        .await
        .unwrap()
        .ok()
        .unwrap();
    assert_eq!(policies[0].name, "ops");

    let created = client
        .alerting()
        .create_policy(&NewAlertPolicyParameters {
            name: "oncall".into(),
            email_addresses: vec!["a@example.com".into()],
            strikes: 1,
            description: None,
        })
        .await
        .unwrap()
        .ok()
        .unwrap();
    assert_eq!(created.id.as_deref(), Some("p2"));

    let scripts = client.scripting().list().await.unwrap().ok().unwrap();
    assert_eq!(scripts[0].version.as_deref(), Some("2"));

    let job = client
        .instant_testing()
        .create(&InstantTestParameters {
            url: "https://example.com".into(),
            ..Default::default()
        })
        .await
        .unwrap()
        .ok()
        .unwrap();
    assert_eq!(job.id, "job1");

    let jobs = client
        .instant_testing()
        .get_job("job1")
        .await
        .unwrap()
        .ok()
        .unwrap();
    assert_eq!(jobs[0].locations[0].location.as_deref(), Some("london"));

    let paths: Vec<(String, String)> = server
        .requests()
        .into_iter()
        .map(|r| (r.method, r.path))
        .collect();
    let expected: Vec<(String, String)> = [
        ("GET", "/alert/1.0/policy"),
        ("POST", "/alert/1.0/policy"),
        ("GET", "/script/1.0"),
        ("POST", "/tools/instanttest/1.0"),
        ("GET", "/tools/instanttest/1.0/job1"),
    ]
    .into_iter()
    .map(|(m, p)| (m.to_string(), p.to_string()))
    .collect();
    assert_eq!(paths, expected);
}

#[tokio::test]
async fn har_script_creation_and_job_location() {
    let server = StubServer::start(vec![
        StubResponse::json(200, r#"{"log":{"version":"1.2","entries":[]}}"#),
        StubResponse::json(200, r#"{"data":{"items":{"id":"s9","name":"checkout"}}}"#),
        StubResponse::json(
            200,
            r#"{"data":{"items":[{"location":"london","status":"COMPLETE","responseCode":200}]}}"#,
        ),
    ])
    .await;
    let client = client_for(&server);

    let har = client
        .monitoring()
        .raw_sample_data("m1", "s1")
        .await
        .unwrap()
        .into_result()
        .unwrap();
    assert_eq!(har["log"]["version"], "1.2");

    let script = client
        .scripting()
        .create(&ScriptCreateParameters {
            name: "checkout".into(),
            description: None,
            script_body: "open https://example.com".into(),
        })
        .await
        .unwrap()
        .into_result()
        .unwrap();
    assert_eq!(script.id, "s9");

    let runs = client
        .instant_testing()
        .get_job_by_location("job1", "london")
        .await
        .unwrap()
        .into_result()
        .unwrap();
    assert_eq!(runs[0].response_code, Some(200));

    let requests = server.requests();
    assert_eq!(requests[0].path, "/monitor/1.0/m1/sample/s1");
    assert_eq!(requests[1].method, "POST");
    assert_eq!(requests[1].path, "/script/1.0");
    let body: serde_json::Value = serde_json::from_str(&requests[1].body).unwrap();
    assert_eq!(body["scriptBody"], "open https://example.com");
    assert_eq!(requests[2].path, "/tools/instanttest/1.0/job1/london");
}

#[tokio::test]
async fn delete_accepts_any_2xx() {
    let server = StubServer::start(vec![
        StubResponse::json(204, ""),
        StubResponse::json(202, ""),
    ])
    .await;
    let client = client_for(&server);

    let outcome = client.monitoring().delete("m1").await.unwrap();
    assert_eq!(outcome, Outcome::Success { status: 204, value: () });
    let outcome = client.monitoring().delete("m2").await.unwrap();
    assert_eq!(outcome.status(), 202);
    assert!(outcome.is_success());
}

#[tokio::test]
async fn location_names_are_left_to_the_service() {
    let server = StubServer::start(vec![StubResponse::json(
        200,
        r#"{"data":{"items":{"id":"new2"}}}"#,
    )])
    .await;
    let client = client_for(&server);

    let params = CreateMonitorParameters::new("home", 5, "frankfurt-2,");
    let created = client
        .monitoring()
        .create(&params)
        .await
        .unwrap()
        .into_result()
        .unwrap();
    assert_eq!(created.id, "new2");

    let params = CreateMonitorParameters::new("home", 5, " , ");
    let err = client.monitoring().create(&params).await.unwrap_err();
    match err {
        Error::Validation(v) => assert_eq!(v.field, "locations"),
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(server.requests().len(), 1);
}
