use jobdigest_core::{
    ConfigError, CoreError, ErrorExt, ErrorReporter, JobBoardApiError, LedgerError, LlmError,
    MailError, ScrapeError,
};

#[test]
fn test_error_codes() {
    let board_error = CoreError::JobBoardApi(JobBoardApiError::InvalidApiKey);
    assert_eq!(board_error.error_code(), "JOB_BOARD_API");

    let scrape_error = CoreError::Scrape(ScrapeError::EmptyDocument {
        url: "https://example.com/job/1".to_string(),
    });
    assert_eq!(scrape_error.error_code(), "SCRAPE");

    let llm_error = CoreError::Llm(LlmError::InvalidApiKey {
        provider: "gemini".to_string(),
    });
    assert_eq!(llm_error.error_code(), "LLM");

    let ledger_error = CoreError::Ledger(LedgerError::BucketUnavailable {
        bucket: "seen-jobs".to_string(),
    });
    assert_eq!(ledger_error.error_code(), "LEDGER");

    let mail_error = CoreError::Mail(MailError::SendFailed {
        reason: "connection reset".to_string(),
    });
    assert_eq!(mail_error.error_code(), "MAIL");

    let config_error = CoreError::Config(ConfigError::MissingField {
        field: "resume".to_string(),
    });
    assert_eq!(config_error.error_code(), "CONFIG");
}

#[test]
fn test_fatal_classification() {
    // Secret and config failures abort the run.
    let missing_secret = CoreError::Config(ConfigError::MissingEnvironmentVariable {
        var_name: "SENDER_PASSWORD".to_string(),
    });
    assert!(missing_secret.is_fatal());

    let permission = CoreError::PermissionDenied {
        operation: "access s3://bucket/resume.pdf".to_string(),
    };
    assert!(permission.is_fatal());

    // Per-posting failures degrade to exclusion.
    let scrape = CoreError::Scrape(ScrapeError::RequestTimeout {
        url: "https://example.com/job/1".to_string(),
    });
    assert!(!scrape.is_fatal());

    let llm = CoreError::Llm(LlmError::InvalidResponseFormat {
        provider: "gemini".to_string(),
        details: "missing summary".to_string(),
    });
    assert!(!llm.is_fatal());

    // A rejected LLM key kills every analysis, so it is fatal.
    let llm_key = CoreError::Llm(LlmError::InvalidApiKey {
        provider: "gemini".to_string(),
    });
    assert!(llm_key.is_fatal());
}

#[test]
fn test_user_friendly_messages() {
    let board_error = CoreError::JobBoardApi(JobBoardApiError::InvalidApiKey);
    let message = board_error.user_friendly_message();
    assert!(!message.is_empty());
    assert!(message.contains("API key"));

    let config_error = CoreError::Config(ConfigError::MissingField {
        field: "recipient_address".to_string(),
    });
    let message = config_error.user_friendly_message();
    assert!(message.contains("recipient_address"));

    let env_error = CoreError::Config(ConfigError::MissingEnvironmentVariable {
        var_name: "GEMINI_API_KEY".to_string(),
    });
    assert!(env_error.user_friendly_message().contains("GEMINI_API_KEY"));
}

#[test]
fn test_error_reporter() {
    let reporter = ErrorReporter::new()
        .with_error_reporting(true)
        .with_warning_reporting(true);
    let error = CoreError::JobBoardApi(JobBoardApiError::ServerError { status_code: 503 });

    // This test just ensures the methods don't panic
    reporter.report_error(&error);
    reporter.report_warning(&error);
}
