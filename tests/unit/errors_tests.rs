/*!
 * Tests for error types
 */

use localgen::errors::{AppError, ProviderError};

/// Test provider error messages
#[test]
fn test_provider_error_display_shouldIncludeDetails() {
    let error = ProviderError::ApiError {
        status_code: 404,
        message: "model 'qwen2.5:0.5b' not found".to_string(),
    };
    assert_eq!(
        error.to_string(),
        "Backend responded with error: 404 - model 'qwen2.5:0.5b' not found"
    );

    let error = ProviderError::BackendUnavailable("server down".to_string());
    assert_eq!(error.to_string(), "Backend unavailable: server down");
}

/// Test conversions into the application error
#[test]
fn test_app_error_from_withVariousSources_shouldMapVariants() {
    let error: AppError = ProviderError::ModelNotFound("x".to_string()).into();
    assert!(matches!(error, AppError::Provider(_)));

    let error: AppError = std::io::Error::new(std::io::ErrorKind::NotFound, "gone").into();
    assert!(matches!(error, AppError::File(_)));

    let error: AppError = anyhow::anyhow!("odd").into();
    assert_eq!(error.to_string(), "Unknown error: odd");
}
