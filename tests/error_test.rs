//! Tests for error types

use dvc_exp_api::{Error, ErrorClass};

#[test]
fn test_invalid_experiment_id_error() {
    let error = Error::InvalidExperimentId {
        id: "../etc".to_string(),
        reason: "must not contain '..'",
    };
    let error_str = format!("{error}");
    assert!(error_str.contains("Invalid experiment identifier"));
    assert!(error_str.contains("../etc"));
    assert_eq!(error.class(), ErrorClass::BadRequest);
    assert_eq!(error.code(), "invalid_experiment_id");
}

#[test]
fn test_experiment_not_found_error() {
    let error = Error::ExperimentNotFound("addle-hill".to_string());
    assert_eq!(format!("{error}"), "Experiment 'addle-hill' not found");
    assert_eq!(error.class(), ErrorClass::NotFound);
}

#[test]
fn test_params_not_found_error() {
    let error = Error::ParamsNotFound("addle-hill".to_string());
    assert_eq!(
        format!("{error}"),
        "Parameters not found for experiment 'addle-hill'"
    );
    assert_eq!(error.class(), ErrorClass::NotFound);
    assert_eq!(error.code(), "params_not_found");
}

#[test]
fn test_malformed_params_error() {
    let error = Error::MalformedParams {
        experiment: "addle-hill".to_string(),
        reason: "params.yaml: unable to read".to_string(),
    };
    let error_str = format!("{error}");
    assert!(error_str.contains("Malformed parameters"));
    assert!(error_str.contains("unable to read"));
    assert_eq!(error.class(), ErrorClass::BadRequest);
}

#[test]
fn test_command_failed_error() {
    let error = Error::CommandFailed {
        command: "dvc exp apply addle-hill".to_string(),
        status: "exit status: 1".to_string(),
    };
    let error_str = format!("{error}");
    assert!(error_str.contains("dvc exp apply addle-hill"));
    assert!(error_str.contains("exit status: 1"));
    assert_eq!(error.class(), ErrorClass::Internal);
}

#[test]
fn test_command_timeout_error() {
    let error = Error::CommandTimeout {
        command: "dvc exp show --json".to_string(),
        secs: 30,
    };
    assert!(format!("{error}").contains("timed out after 30s"));
    assert_eq!(error.code(), "command_timeout");
}

#[test]
fn test_unexpected_output_error() {
    let error = Error::UnexpectedOutput {
        command: "dvc exp show --json".to_string(),
        reason: "invalid JSON".to_string(),
    };
    assert!(format!("{error}").contains("Unexpected output"));
    assert_eq!(error.class(), ErrorClass::Internal);
}

#[test]
fn test_io_error_conversion() {
    let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
    let error: Error = io_error.into();
    let error_str = format!("{error}");
    assert!(error_str.contains("IO error"));
    assert_eq!(error.code(), "internal");
}

#[test]
fn test_config_error() {
    let error = Error::Config("server.port: invalid type".to_string());
    let error_str = format!("{error}");
    assert_eq!(error_str, "Configuration error: server.port: invalid type");
    assert_eq!(error.code(), "internal");
}

#[test]
fn test_error_debug() {
    let error = Error::ExperimentNotFound("x".to_string());
    let debug_str = format!("{error:?}");
    assert!(debug_str.contains("ExperimentNotFound"));
}

#[test]
fn test_result_type_alias_error() {
    fn returns_error() -> dvc_exp_api::Result<i32> {
        Err(Error::ExperimentNotFound("ghost".to_string()))
    }

    let result = returns_error();
    assert!(result.is_err());
}
