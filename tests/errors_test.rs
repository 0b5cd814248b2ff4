// ABOUTME: Tests for the error taxonomy, HTTP status mapping, and error response bodies
// ABOUTME: Checks which codes the waterfall treats as source failures
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

use std::error::Error;

use tattvam::errors::{AppError, ErrorCode, ErrorResponse};

#[test]
fn test_error_code_http_status() {
    assert_eq!(ErrorCode::InvalidInput.http_status(), 400);
    assert_eq!(ErrorCode::MissingRequiredField.http_status(), 400);
    assert_eq!(ErrorCode::ResourceNotFound.http_status(), 404);
    assert_eq!(ErrorCode::ResourceAlreadyExists.http_status(), 409);
    assert_eq!(ErrorCode::ExternalServiceUnavailable.http_status(), 502);
    assert_eq!(ErrorCode::ExternalRateLimited.http_status(), 503);
    assert_eq!(ErrorCode::DatabaseError.http_status(), 500);
}

#[test]
fn test_external_codes() {
    assert!(ErrorCode::ExternalServiceError.is_external());
    assert!(ErrorCode::ExternalServiceUnavailable.is_external());
    assert!(ErrorCode::ExternalAuthFailed.is_external());
    assert!(ErrorCode::ExternalRateLimited.is_external());

    assert!(!ErrorCode::ResourceNotFound.is_external());
    assert!(!ErrorCode::ConfigError.is_external());
    assert!(!ErrorCode::DatabaseError.is_external());
}

#[test]
fn test_constructor_messages() {
    let err = AppError::not_found("Product 123");
    assert_eq!(err.code, ErrorCode::ResourceNotFound);
    assert_eq!(err.message, "Product 123 not found");

    let err = AppError::missing_field("barcode");
    assert_eq!(err.code, ErrorCode::MissingRequiredField);
    assert_eq!(err.message, "barcode is required");

    let err = AppError::already_exists("Product 123");
    assert_eq!(err.message, "Product 123 already exists");

    let err = AppError::external_unavailable("usda", "timed out");
    assert_eq!(err.code, ErrorCode::ExternalServiceUnavailable);
    assert_eq!(err.message, "usda: timed out");

    let err = AppError::config_invalid("bad order");
    assert_eq!(err.to_string(), "Configuration is invalid: bad order");
}

#[test]
fn test_error_response_body() {
    let response = ErrorResponse::from(&AppError::not_found("Product 9"));
    assert_eq!(response.status, 404);

    let json = serde_json::to_value(&response).unwrap();
    assert_eq!(json["code"], "RESOURCE_NOT_FOUND");
    assert_eq!(json["message"], "Product 9 not found");
}

#[test]
fn test_serde_errors_convert() {
    let parse_error = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
    let err = AppError::from(parse_error);
    assert_eq!(err.code, ErrorCode::SerializationError);
    assert!(err.source().is_some());
}
