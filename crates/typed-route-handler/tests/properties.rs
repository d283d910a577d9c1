//! Property tests for the error response builder and the params parser.

use http::{Request, Response, StatusCode};
use proptest::prelude::*;
use std::sync::Arc;
use typed_route_core::response::ApiResponse;
use typed_route_core::{
    safe_parse_params, ApiError, ApiErrorKind, Issue, RouteContext, RouteError, RouteParams,
    ValidationError,
};
use typed_route_handler::{build_error_response, handler, INTERNAL_SERVER_ERROR, VALIDATION_ERROR};
use typed_route_schema::Shape;
use typed_route_test::RecordingLog;

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .build()
        .unwrap()
}

fn convert(error: RouteError) -> Response<ApiResponse<()>> {
    build_error_response(error, None, &RecordingLog::new()).unwrap()
}

proptest! {
    #[test]
    fn test_api_error_status_and_message_preserved(
        status in 400u16..600,
        message in "[a-zA-Z0-9 ]{1,40}",
    ) {
        let status = StatusCode::from_u16(status).unwrap();
        let error = ApiError::with_message(ApiErrorKind::Custom(status), message.clone());
        let response = convert(error.into());

        prop_assert_eq!(response.status(), status);
        let body = response.body().error().unwrap();
        prop_assert_eq!(&body.error, &message);
        prop_assert!(body.issues.is_none());
    }

    #[test]
    fn test_validation_issue_count_preserved(
        messages in prop::collection::vec(".{0,20}", 1..8),
    ) {
        let issues: Vec<Issue> = messages
            .iter()
            .enumerate()
            .map(|(index, message)| Issue::at([format!("field{index}")], message.clone()))
            .collect();
        let response = convert(ValidationError::new("test", issues).into());

        prop_assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = response.body().error().unwrap();
        prop_assert_eq!(body.error.as_str(), VALIDATION_ERROR);
        let issues = body.issues.as_ref().unwrap();
        prop_assert_eq!(issues.len(), messages.len());
        prop_assert!(issues.iter().all(|issue| !issue.message.trim().is_empty()));
    }

    #[test]
    fn test_unrecognized_errors_always_500(detail in ".{0,60}") {
        let log = RecordingLog::new();
        let error = RouteError::unhandled(anyhow::anyhow!(detail));
        let response: Response<ApiResponse<()>> =
            build_error_response(error, None, &log).unwrap();

        prop_assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        prop_assert_eq!(response.body().error().unwrap().error.as_str(), INTERNAL_SERVER_ERROR);
        prop_assert_eq!(log.unhandled(), 1);
    }

    #[test]
    fn test_safe_parse_is_idempotent(id in ".{0,12}") {
        let schema = Shape::object([("id", Shape::integer().minimum(1.0).required())]);
        let context = RouteContext::new([("id", id.as_str())].into_iter().collect::<RouteParams>());

        let (first, second) = runtime().block_on(async {
            let first = safe_parse_params(&context, &schema).await.unwrap();
            let second = safe_parse_params(&context, &schema).await.unwrap();
            (first, second)
        });

        prop_assert_eq!(first, second);
    }

    #[test]
    fn test_wrapper_logs_exactly_one_exit(status in 200u16..600) {
        let log = Arc::new(RecordingLog::new());
        let status = StatusCode::from_u16(status).unwrap();
        let wrapped = handler(move |_req: Request<()>, _ctx: RouteContext| async move {
            if status.is_success() {
                Ok(typed_route_core::response::empty::<()>(status))
            } else {
                Err(RouteError::from(ApiError::new(ApiErrorKind::Custom(status))))
            }
        })
        .request_log(log.clone());

        let request = Request::get("/prop").body(()).unwrap();
        let response = runtime()
            .block_on(wrapped.call(request, RouteContext::default()))
            .unwrap();

        prop_assert_eq!(response.status(), status);
        prop_assert_eq!(log.entries(), 1);
        prop_assert_eq!(log.exits(), 1);
        prop_assert_eq!(log.last_status(), Some(status));
    }
}
