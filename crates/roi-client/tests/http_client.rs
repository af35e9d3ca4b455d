//! End-to-end tests of `HttpSimulatorApi` against a local warp service.

use pretty_assertions::assert_eq;
use roi_client::{ApiError, ClientConfig, HttpSimulatorApi, SimulatorApi};
use roi_core::{NewScenario, ReportRequest, ScenarioId, SimulationInputs};
use serde_json::{json, Value};
use std::net::SocketAddr;
use warp::http::{Response, StatusCode};
use warp::reply::{json as json_reply, with_status};
use warp::Filter;

fn spawn_service() -> SocketAddr {
    let simulate = warp::path!("api" / "simulate")
        .and(warp::post())
        .and(warp::body::json())
        .map(|body: Value| {
            let field = |key: &str| body.get(key).and_then(Value::as_f64);
            match (
                field("labor_cost_manual"),
                field("error_savings"),
                field("auto_cost"),
            ) {
                (Some(labor), Some(errors), Some(auto)) => {
                    let monthly = ((labor + errors - auto) * 1.1 * 100.0).round() / 100.0;
                    let payback = field("implementation_cost")
                        .map(|cost| ((cost / monthly) * 100.0).round() / 100.0);
                    with_status(
                        json_reply(&json!({
                            "results": {
                                "monthly_savings": monthly,
                                "payback_months": payback,
                                "roi_percentage": null,
                                "boost_factor": 1.1,
                            }
                        })),
                        StatusCode::OK,
                    )
                }
                _ => with_status(
                    json_reply(&json!({"error": "Missing required field: auto_cost"})),
                    StatusCode::BAD_REQUEST,
                ),
            }
        });

    let list = warp::path!("api" / "scenarios").and(warp::get()).map(|| {
        json_reply(&json!({
            "scenarios": [
                {"id": 1, "scenario_name": "Baseline", "created_at": "2024-05-01T10:00:00"},
                {"id": 2, "scenario_name": "Aggressive", "created_at": "2024-05-02T11:30:00.250000"},
            ]
        }))
    });

    let save = warp::path!("api" / "scenarios")
        .and(warp::post())
        .and(warp::body::json())
        .map(|body: Value| {
            let name = body
                .get("scenario_name")
                .and_then(Value::as_str)
                .unwrap_or_default();
            if name.is_empty() {
                with_status(
                    json_reply(&json!({"error": "scenario_name is required"})),
                    StatusCode::BAD_REQUEST,
                )
            } else {
                with_status(json_reply(&json!({"id": 3})), StatusCode::CREATED)
            }
        });

    let detail = warp::path!("api" / "scenarios" / i64)
        .and(warp::get())
        .map(|id: i64| {
            if id == 1 {
                with_status(
                    json_reply(&json!({
                        "id": 1,
                        "scenario_name": "Baseline",
                        "created_at": "2024-05-01T10:00:00",
                        "inputs_json": "{\"labor_cost_manual\": 5000, \"error_savings\": 1500, \"auto_cost\": 2000}",
                        "results_json": "{\"monthly_savings\": 4950.0, \"boost_factor\": 1.1}",
                    })),
                    StatusCode::OK,
                )
            } else {
                with_status(
                    json_reply(&json!({"error": "Scenario not found"})),
                    StatusCode::NOT_FOUND,
                )
            }
        });

    let delete = warp::path!("api" / "scenarios" / i64)
        .and(warp::delete())
        .map(|id: i64| {
            let status = if id == 1 {
                StatusCode::NO_CONTENT
            } else {
                StatusCode::NOT_FOUND
            };
            with_status(warp::reply(), status)
        });

    let report = warp::path!("api" / "report" / "generate")
        .and(warp::post())
        .and(warp::body::json())
        .map(|body: Value| {
            if body.get("email").and_then(Value::as_str) == Some("fail@example.com") {
                return Response::builder()
                    .status(StatusCode::SERVICE_UNAVAILABLE)
                    .header("content-type", "application/json")
                    .body(br#"{"error": "Report service unavailable"}"#.to_vec())
                    .unwrap();
            }
            Response::builder()
                .status(StatusCode::OK)
                .header("content-type", "application/pdf")
                .header(
                    "content-disposition",
                    r#"attachment; filename="roi.pdf"; filename*=UTF-8''roi%20report.pdf"#,
                )
                .body(b"%PDF-1.4 fake".to_vec())
                .unwrap()
        });

    let health = warp::path!("api" / "health")
        .and(warp::get())
        .map(|| json_reply(&json!({"status": "ok"})));

    let routes = simulate
        .or(list)
        .or(save)
        .or(detail)
        .or(delete)
        .or(report)
        .or(health);

    let (addr, server) = warp::serve(routes).bind_ephemeral(([127, 0, 0, 1], 0));
    tokio::spawn(server);
    addr
}

fn client(addr: SocketAddr) -> HttpSimulatorApi {
    HttpSimulatorApi::new(&ClientConfig::new().with_base_url(format!("http://{addr}"))).unwrap()
}

fn sample_inputs() -> SimulationInputs {
    SimulationInputs::with_required(5000.0, 1500.0, 2000.0)
}

#[tokio::test]
async fn simulate_returns_results() {
    let api = client(spawn_service());

    let request = sample_inputs()
        .with_implementation_cost(9900.0)
        .to_request()
        .unwrap();
    let result = api.simulate(&request).await.unwrap();

    assert_eq!(result.monthly_savings, Some(4950.0));
    assert_eq!(result.payback_months, Some(2.0));
    assert_eq!(result.roi_percentage, None);
    assert_eq!(result.boost_factor, 1.1);
}

#[tokio::test]
async fn scenarios_are_listed() {
    let api = client(spawn_service());

    let scenarios = api.list_scenarios().await.unwrap();
    assert_eq!(scenarios.len(), 2);
    assert_eq!(scenarios[0].id, ScenarioId(1));
    assert_eq!(scenarios[1].scenario_name, "Aggressive");
    assert!(scenarios[1].created_at().is_some());
}

#[tokio::test]
async fn save_surfaces_server_message() {
    let api = client(spawn_service());

    let scenario = NewScenario::new("Q3", &sample_inputs()).unwrap();
    api.save_scenario(&scenario).await.unwrap();

    let nameless = NewScenario {
        scenario_name: String::new(),
        inputs: sample_inputs().to_request().unwrap(),
    };
    let err = api.save_scenario(&nameless).await.unwrap_err();
    assert_eq!(err.status(), Some(400));
    assert_eq!(err.user_message("Failed to save scenario"), "scenario_name is required");
}

#[tokio::test]
async fn scenario_detail_is_decoded() {
    let api = client(spawn_service());

    let detail = api.get_scenario(ScenarioId(1)).await.unwrap();
    assert_eq!(detail.inputs(), sample_inputs());
    assert_eq!(detail.results().unwrap().monthly_savings, Some(4950.0));

    let err = api.get_scenario(ScenarioId(99)).await.unwrap_err();
    assert_eq!(
        err,
        ApiError::Status {
            status: 404,
            message: Some("Scenario not found".to_string()),
        }
    );
}

#[tokio::test]
async fn delete_is_judged_by_status() {
    let api = client(spawn_service());

    api.delete_scenario(ScenarioId(1)).await.unwrap();

    let err = api.delete_scenario(ScenarioId(7)).await.unwrap_err();
    assert_eq!(err.status(), Some(404));
    assert_eq!(err.user_message("Failed to delete scenario"), "Failed to delete scenario");
}

#[tokio::test]
async fn report_keeps_headers_and_body() {
    let api = client(spawn_service());

    let request = ReportRequest::new("a@b.c", &sample_inputs()).unwrap();
    let report = api.generate_report(&request).await.unwrap();

    assert_eq!(report.bytes, b"%PDF-1.4 fake".to_vec());
    assert_eq!(report.content_type.as_deref(), Some("application/pdf"));
    assert_eq!(
        report
            .content_disposition
            .as_deref()
            .and_then(roi_core::filename_from_content_disposition),
        Some("roi report.pdf".to_string())
    );

    let request = ReportRequest::new("fail@example.com", &sample_inputs()).unwrap();
    let err = api.generate_report(&request).await.unwrap_err();
    assert_eq!(err.user_message("Failed to generate report"), "Report service unavailable");
}

#[tokio::test]
async fn health_check() {
    let api = client(spawn_service());
    assert!(api.health().await.unwrap().is_ok());
}

#[tokio::test]
async fn unreachable_service_is_a_transport_error() {
    let addr = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap()
    };
    let api = client(addr);

    let err = api.list_scenarios().await.unwrap_err();
    assert!(matches!(err, ApiError::Transport(_)), "got {err:?}");
    assert_eq!(err.user_message("Failed to load scenarios"), "Failed to load scenarios");
}
