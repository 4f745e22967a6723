//! AWS error classification and handling
//!
//! Provides typed errors for AWS SDK operations using the `.code()` method
//! instead of string matching on Debug format. Teardown only distinguishes
//! three cases: the resource is already gone, the request never left the
//! machine because DNS failed, and everything else.

use aws_sdk_s3::error::{ProvideErrorMetadata, SdkError};
use thiserror::Error;

/// AWS error categories for retry and cleanup logic
#[derive(Debug, Clone, Error)]
pub enum AwsError {
    /// Resource was not found (safe to skip in cleanup)
    #[error("Resource not found: {resource_type} '{resource_id}'")]
    NotFound {
        resource_type: &'static str,
        resource_id: String,
    },

    /// Endpoint host name could not be resolved (transient, retryable)
    #[error("Name resolution failed: {message}")]
    NameResolution { message: String },

    /// Rate limit exceeded after the SDK's own retries
    #[error("Rate limit exceeded")]
    Throttled,

    /// Generic AWS SDK error with code and message
    #[error("AWS error: {message}")]
    Sdk {
        code: Option<String>,
        message: String,
    },
}

impl AwsError {
    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, AwsError::NotFound { .. })
    }

    /// Check if this is a transient name-resolution failure
    pub fn is_name_resolution(&self) -> bool {
        matches!(self, AwsError::NameResolution { .. })
    }

    /// Get a user-friendly suggestion for resolving this error, if available.
    pub fn suggestion(&self) -> Option<String> {
        match self {
            AwsError::Sdk { code: Some(c), .. } => suggestion_for_code(c),
            AwsError::Throttled => suggestion_for_code("Throttling"),
            _ => None,
        }
    }
}

/// Known AWS error codes for "not found" conditions
const NOT_FOUND_CODES: &[&str] = &[
    "NoSuchBucket",
    "NoSuchKey",
    "NoSuchVersion",
    "DBClusterNotFoundFault",
    "ResourceNotFoundException",
];

/// Codes that only mean "not found" when the message says so
const QUALIFIED_NOT_FOUND: &[(&str, &str)] = &[
    // CloudFormation: "Stack with id sf-flow-abc123 does not exist"
    ("ValidationError", "does not exist"),
    // Athena: "WorkGroup sf-wg-abc123 is not found."
    ("InvalidRequestException", "not found"),
];

/// Known AWS error codes for throttling/rate limiting
const THROTTLING_CODES: &[&str] = &[
    "Throttling",
    "ThrottlingException",
    "TooManyRequestsException",
    "RequestLimitExceeded",
    "SlowDown",
];

/// Fragments a resolver error carries when the host could not be resolved
const NAME_RESOLUTION_MARKERS: &[&str] = &[
    "dns error",
    "failed to lookup address",
    "Temporary failure in name resolution",
    "Name or service not known",
    "nodename nor servname",
    "EAI_AGAIN",
];

/// Classify an AWS SDK error using the error code.
pub fn classify_aws_error(code: Option<&str>, message: Option<&str>) -> AwsError {
    let message = message.unwrap_or("Unknown error").to_string();

    match code {
        Some(c) if NOT_FOUND_CODES.contains(&c) => AwsError::NotFound {
            resource_type: "resource",
            resource_id: message,
        },
        Some(c)
            if QUALIFIED_NOT_FOUND
                .iter()
                .any(|(code, fragment)| *code == c && message.contains(fragment)) =>
        {
            AwsError::NotFound {
                resource_type: "resource",
                resource_id: message,
            }
        }
        Some(c) if THROTTLING_CODES.contains(&c) => AwsError::Throttled,
        _ => AwsError::Sdk {
            code: code.map(|s| s.to_string()),
            message,
        },
    }
}

/// Classify a typed SDK error.
///
/// Dispatch failures never reach AWS and carry no error code, so the
/// connector error is inspected for resolver failures first.
pub fn classify_sdk_error<E, R>(error: &SdkError<E, R>) -> AwsError
where
    E: ProvideErrorMetadata + std::error::Error + 'static,
    R: std::fmt::Debug,
{
    if let SdkError::DispatchFailure(failure) = error {
        let detail = format!("{failure:?}");
        if failure.is_io() && is_name_resolution_message(&detail) {
            return AwsError::NameResolution { message: detail };
        }
        return AwsError::Sdk {
            code: None,
            message: detail,
        };
    }

    classify_aws_error(error.code(), error.message())
}

fn is_name_resolution_message(message: &str) -> bool {
    NAME_RESOLUTION_MARKERS
        .iter()
        .any(|marker| message.contains(marker))
}

/// Try each listed operation error type against an error-chain link.
macro_rules! classify_link {
    ($cause:expr, $($op:ty),+ $(,)?) => {
        $(
            if let Some(e) = $cause.downcast_ref::<SdkError<$op>>() {
                return classify_sdk_error(e);
            }
        )+
    };
}

/// Classify an error from an anyhow::Error by extracting the AWS error code.
///
/// Walks the error chain looking for an already-classified [`AwsError`] or
/// an SDK operation error from one of the services teardown calls. Falls
/// back to string matching on the Debug representation if no typed error is
/// found.
pub fn classify_anyhow_error(error: &anyhow::Error) -> AwsError {
    use aws_sdk_appflow::operation as appflow;
    use aws_sdk_athena::operation as athena;
    use aws_sdk_cloudformation::operation as cfn;
    use aws_sdk_cloudwatchlogs::operation as logs;
    use aws_sdk_quicksight::operation as quicksight;
    use aws_sdk_rds::operation as rds;
    use aws_sdk_s3::operation as s3;

    for cause in error.chain() {
        if let Some(e) = cause.downcast_ref::<AwsError>() {
            return e.clone();
        }

        classify_link!(
            cause,
            s3::list_object_versions::ListObjectVersionsError,
            s3::delete_object::DeleteObjectError,
            cfn::list_stacks::ListStacksError,
            cfn::list_stack_resources::ListStackResourcesError,
            cfn::describe_stacks::DescribeStacksError,
            cfn::update_termination_protection::UpdateTerminationProtectionError,
            cfn::delete_stack::DeleteStackError,
            athena::list_work_groups::ListWorkGroupsError,
            athena::delete_work_group::DeleteWorkGroupError,
            rds::modify_db_cluster::ModifyDBClusterError,
            logs::describe_log_groups::DescribeLogGroupsError,
            logs::delete_log_group::DeleteLogGroupError,
            quicksight::delete_dashboard::DeleteDashboardError,
            appflow::list_flows::ListFlowsError,
            appflow::delete_flow::DeleteFlowError,
        );
    }

    // Fallback: extract error code from debug string representation
    let debug_str = format!("{:?}", error);
    if is_name_resolution_message(&debug_str) {
        return AwsError::NameResolution {
            message: error.to_string(),
        };
    }
    if let Some(code) = extract_error_code(&debug_str) {
        return classify_aws_error(Some(&code), Some(&debug_str));
    }

    AwsError::Sdk {
        code: None,
        message: error.to_string(),
    }
}

/// Convert a "not found" failure into `Ok(None)`.
///
/// Any other error is returned unchanged.
pub fn ignore_not_found<T>(result: anyhow::Result<T>) -> anyhow::Result<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(e) if classify_anyhow_error(&e).is_not_found() => Ok(None),
        Err(e) => Err(e),
    }
}

/// Extract an AWS error code from a debug string representation
fn extract_error_code(debug_str: &str) -> Option<String> {
    for code in NOT_FOUND_CODES.iter().chain(THROTTLING_CODES) {
        if debug_str.contains(code) {
            return Some((*code).to_string());
        }
    }

    // Try to extract any code from `code: Some("...")` pattern
    if let Some(start) = debug_str.find("code: Some(\"") {
        let rest = &debug_str[start + 12..];
        if let Some(end) = rest.find('"') {
            return Some(rest[..end].to_string());
        }
    }

    None
}

/// Error code to user-friendly suggestion mapping
const SUGGESTIONS: &[(&str, &str)] = &[
    (
        "AccessDenied",
        "The credentials in use lack permission for this call. Check the profile passed with --profile.",
    ),
    (
        "AccessDeniedException",
        "The credentials in use lack permission for this call. Check the profile passed with --profile.",
    ),
    (
        "ExpiredToken",
        "Session credentials have expired. Refresh them (e.g. `aws sso login`) and re-run.",
    ),
    (
        "UnrecognizedClientException",
        "The access key is not valid in this region or account.",
    ),
    (
        "Throttling",
        "AWS API rate limit hit. Re-running teardown is safe; completed steps are skipped.",
    ),
];

/// Get a user-friendly suggestion for a known error code.
fn suggestion_for_code(code: &str) -> Option<String> {
    SUGGESTIONS
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, s)| (*s).to_string())
}
