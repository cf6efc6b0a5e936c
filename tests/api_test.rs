//! HTTP contract tests against the in-memory repository

mod support;

use std::sync::Arc;

use dvc_exp_api::experiment::{ExperimentRef, ParameterSet};
use dvc_exp_api::mapper::parse_experiment_list;
use dvc_exp_api::repository::MemoryRepository;
use serde_json::json;
use support::{error_code, send_json, send_raw, spawn_app};

fn seeded() -> Arc<MemoryRepository> {
    let repo = Arc::new(MemoryRepository::new());
    repo.insert(
        ExperimentRef::new("ded11c0", "addle-hill"),
        ParameterSet::from_yaml_str("data_ingestion:\n  test_size: 0.2\n").unwrap(),
    );
    repo.insert(
        ExperimentRef::new("1a2b3c4", "bushy-oaks"),
        ParameterSet::from_yaml_str(concat!(
            "data_ingestion:\n",
            "  test_size: 0.25\n",
            "feature_engineering:\n",
            "  max_features: 50\n",
            "model_building:\n",
            "  n_estimators: 22\n",
            "  random_state: 2\n",
        ))
        .unwrap(),
    );
    repo.insert_without_params(ExperimentRef::new("9f8e7d6", "bare-exp"));
    repo.insert_malformed(ExperimentRef::new("5a5a5a5", "broken-exp"), "bad yaml");
    repo
}

// =============================================================================
// Example scenario
// =============================================================================

#[tokio::test]
async fn test_example_scenario() {
    let repo = Arc::new(MemoryRepository::new());
    repo.insert(
        ExperimentRef::new("ded11c0", "addle-hill"),
        ParameterSet::from_yaml_str("data_ingestion:\n  test_size: 0.2\n").unwrap(),
    );
    let addr = spawn_app(repo).await;

    let (status, body) = send_raw(addr, "GET", "/experiments").await;
    assert_eq!(status, 200);
    assert_eq!(
        body,
        r#"[{"commit_hash":"ded11c0","experiment_name":"addle-hill"}]"#
    );

    let (status, body) = send_raw(addr, "GET", "/experiments/addle-hill/params").await;
    assert_eq!(status, 200);
    assert_eq!(body, r#"{"data_ingestion":{"test_size":0.2}}"#);

    let (status, body) = send_json(addr, "POST", "/experiments/addle-hill/apply").await;
    assert_eq!(status, 200);
    assert_eq!(
        body,
        json!({
            "success": true,
            "message": concat!(
                "Changes for experiment 'addle-hill' ",
                "have been applied to your current workspace."
            ),
            "experiment_name": "addle-hill"
        })
    );
}

// =============================================================================
// List
// =============================================================================

#[tokio::test]
async fn test_empty_list_is_ok() {
    let addr = spawn_app(Arc::new(MemoryRepository::new())).await;
    let (status, body) = send_json(addr, "GET", "/experiments").await;
    assert_eq!(status, 200);
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn test_list_order_follows_repository() {
    let addr = spawn_app(seeded()).await;
    let (status, body) = send_json(addr, "GET", "/experiments").await;
    assert_eq!(status, 200);
    let names: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["experiment_name"].as_str().unwrap())
        .collect();
    assert_eq!(names, ["addle-hill", "bushy-oaks", "bare-exp", "broken-exp"]);
}

// =============================================================================
// Params
// =============================================================================

#[tokio::test]
async fn test_params_same_for_name_and_hash() {
    let repo = seeded();
    let addr = spawn_app(Arc::clone(&repo)).await;

    let (_, list) = send_json(addr, "GET", "/experiments").await;
    for exp in list.as_array().unwrap() {
        let name = exp["experiment_name"].as_str().unwrap();
        let hash = exp["commit_hash"].as_str().unwrap();

        let (name_status, by_name) =
            send_json(addr, "GET", &format!("/experiments/{name}/params")).await;
        let (hash_status, by_hash) =
            send_json(addr, "GET", &format!("/experiments/{hash}/params")).await;
        assert_eq!(name_status, hash_status, "{name} vs {hash}");
        if name_status == 200 {
            assert_eq!(by_name, by_hash, "{name} vs {hash}");
        } else {
            assert_eq!(error_code(&by_name), error_code(&by_hash));
        }
    }
}

#[tokio::test]
async fn test_git_ref_style_names_are_addressable() {
    let repo = Arc::new(MemoryRepository::new());
    for exp in parse_experiment_list("main:\n\tded11c0 [lr=0.01]\n\t1a2b3c4 [run+v2]\n") {
        repo.insert(exp, ParameterSet::from_yaml_str("a:\n  b: 1\n").unwrap());
    }
    let addr = spawn_app(Arc::clone(&repo)).await;

    for (name, hash) in [("lr=0.01", "ded11c0"), ("run+v2", "1a2b3c4")] {
        let (name_status, by_name) =
            send_json(addr, "GET", &format!("/experiments/{name}/params")).await;
        let (hash_status, by_hash) =
            send_json(addr, "GET", &format!("/experiments/{hash}/params")).await;
        assert_eq!(name_status, 200, "{name}: {by_name}");
        assert_eq!(hash_status, 200, "{hash}: {by_hash}");
        assert_eq!(by_name, by_hash);
    }

    let (status, body) = send_json(addr, "POST", "/experiments/lr=0.01/apply").await;
    assert_eq!(status, 200);
    assert_eq!(body["experiment_name"], json!("lr=0.01"));
    assert_eq!(repo.applied().as_deref(), Some("lr=0.01"));
}

#[tokio::test]
async fn test_params_passthrough_nested() {
    let addr = spawn_app(seeded()).await;
    let (status, body) = send_json(addr, "GET", "/experiments/bushy-oaks/params").await;
    assert_eq!(status, 200);
    assert_eq!(body["feature_engineering"]["max_features"], json!(50));
    assert_eq!(body["model_building"]["random_state"], json!(2));
}

#[tokio::test]
async fn test_params_unknown_experiment_is_404() {
    let addr = spawn_app(seeded()).await;
    let (status, body) = send_json(addr, "GET", "/experiments/no-such-exp/params").await;
    assert_eq!(status, 404);
    assert_eq!(error_code(&body), "experiment_not_found");
}

#[tokio::test]
async fn test_params_missing_file_is_404() {
    let addr = spawn_app(seeded()).await;
    let (status, body) = send_json(addr, "GET", "/experiments/bare-exp/params").await;
    assert_eq!(status, 404);
    assert_eq!(error_code(&body), "params_not_found");
}

#[tokio::test]
async fn test_params_malformed_file_is_400() {
    let addr = spawn_app(seeded()).await;
    let (status, body) = send_json(addr, "GET", "/experiments/broken-exp/params").await;
    assert_eq!(status, 400);
    assert_eq!(error_code(&body), "malformed_params");
}

// =============================================================================
// Apply
// =============================================================================

#[tokio::test]
async fn test_apply_twice_same_shape() {
    let repo = seeded();
    let addr = spawn_app(Arc::clone(&repo)).await;

    let (status1, first) = send_json(addr, "POST", "/experiments/bushy-oaks/apply").await;
    let (status2, second) = send_json(addr, "POST", "/experiments/1a2b3c4/apply").await;
    assert_eq!(status1, 200);
    assert_eq!(status2, 200);
    assert_eq!(first, second);
    assert_eq!(first["success"], json!(true));
    assert_eq!(first["experiment_name"], json!("bushy-oaks"));
    assert_eq!(repo.applied().as_deref(), Some("bushy-oaks"));
}

#[tokio::test]
async fn test_apply_unknown_is_404() {
    let repo = seeded();
    let addr = spawn_app(Arc::clone(&repo)).await;
    let (status, body) = send_json(addr, "POST", "/experiments/ghost/apply").await;
    assert_eq!(status, 404);
    assert_eq!(error_code(&body), "experiment_not_found");
    assert!(repo.applied().is_none());
}

#[tokio::test]
async fn test_apply_requires_post() {
    let addr = spawn_app(seeded()).await;
    let (status, _) = send_raw(addr, "GET", "/experiments/addle-hill/apply").await;
    assert_eq!(status, 405);
}

// =============================================================================
// Identifier validation
// =============================================================================

#[tokio::test]
async fn test_malformed_ids_rejected_before_repository() {
    let repo = seeded();
    let addr = spawn_app(Arc::clone(&repo)).await;

    for raw in [
        "..%2F..%2Fetc%2Fpasswd",
        "a%3Brm%20-rf",
        "%24(id)",
        "--force",
        "x%7Cy",
        "%2E%2E",
        "%60id%60",
    ] {
        for (method, suffix) in [("GET", "params"), ("POST", "apply")] {
            let (status, body) =
                send_json(addr, method, &format!("/experiments/{raw}/{suffix}")).await;
            assert_eq!(status, 400, "{method} {raw}/{suffix}");
            assert_eq!(error_code(&body), "invalid_experiment_id");
        }
    }

    assert_eq!(repo.calls(), 0);
    assert!(repo.applied().is_none());
}

// =============================================================================
// Ambient endpoints
// =============================================================================

#[tokio::test]
async fn test_root_and_health() {
    let addr = spawn_app(Arc::new(MemoryRepository::new())).await;

    let (status, body) = send_json(addr, "GET", "/").await;
    assert_eq!(status, 200);
    assert_eq!(body["message"], json!("DVC Experiments API"));
    assert!(body["endpoints"]["GET /experiments"].is_string());

    let (status, body) = send_json(addr, "GET", "/healthz").await;
    assert_eq!(status, 200);
    assert_eq!(body, json!({"status": "ok"}));
}
