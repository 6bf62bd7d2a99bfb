//! Handler invocation and response writing.

use crate::{
    BindConfig, BindingPlan, Handler, HandlerOutput, RequestContext, RequestId, Responder,
    ResponseSink, ReturnStrategy, Returned,
};
use http::StatusCode;
use satchel_extract::{ExtractionContext, ExtractionError};
use std::io::{self, Write};

/// Invokes the plan's handler with hydrated props and writes its result.
///
/// | Strategy | Returned | Written |
/// |----------|----------|---------|
/// | no-response | nothing | whatever the handler wrote |
/// | error-response | `Some(text)` | status 500, body `text` |
/// | error-response | `None` | nothing |
/// | structured-response | `Some(responder)` | headers, status, then body or error text |
/// | structured-response | `None` | nothing |
///
/// # Errors
///
/// Returns the first write failure, typically a dropped connection.
///
/// # Panics
///
/// Panics if the handler's output does not match the plan's strategy, which
/// means a [`HandlerOutput`] implementation is inconsistent with its shape.
pub fn dispatch<H, Args>(
    plan: &BindingPlan<H, Args>,
    props: H::Props,
    request_id: RequestId,
    request: &ExtractionContext,
    sink: &mut dyn ResponseSink,
) -> io::Result<()>
where
    H: Handler<Args>,
{
    let strategy = plan.strategy();
    let writer: Option<&mut dyn ResponseSink> = if strategy.passes_writer() {
        Some(&mut *sink as &mut dyn ResponseSink)
    } else {
        None
    };
    let ctx = RequestContext::new(request_id, request, writer);
    let returned = plan.handler().call(ctx, props).into_returned();

    match (strategy, returned) {
        (ReturnStrategy::NoResponse, Returned::Unit)
        | (ReturnStrategy::ErrorResponse, Returned::Error(None))
        | (ReturnStrategy::StructuredResponse, Returned::Responder(None)) => Ok(()),
        (ReturnStrategy::ErrorResponse, Returned::Error(Some(text))) => {
            sink.set_status(StatusCode::INTERNAL_SERVER_ERROR);
            sink.write_all(text.as_bytes())
        }
        (ReturnStrategy::StructuredResponse, Returned::Responder(Some(responder))) => {
            write_responder(responder, sink)
        }
        (strategy, returned) => panic!(
            "handler output {returned:?} does not match the {strategy} strategy of plan {plan}"
        ),
    }
}

fn write_responder(mut responder: Box<dyn Responder>, sink: &mut dyn ResponseSink) -> io::Result<()> {
    if let Some(headers) = responder.headers() {
        let target = sink.headers_mut();
        for (name, value) in headers {
            target.append(name.clone(), value.clone());
        }
    }
    sink.set_status(responder.status());

    if let Some(mut body) = responder.take_body() {
        io::copy(&mut body, &mut *sink)?;
    } else if let Some(text) = responder.error_text() {
        sink.write_all(text.as_bytes())?;
    }
    Ok(())
}

/// Answers a request whose props could not be hydrated.
///
/// The status and body come from `config`; see [`BindConfig::status_for`]
/// and [`BindConfig::body_for`].
pub fn reject(sink: &mut dyn ResponseSink, err: &ExtractionError, config: &BindConfig) -> io::Result<()> {
    let status = config.status_for(err);
    sink.set_status(status);
    sink.write_all(config.body_for(err, status).as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::UserProps;
    use crate::{BasicResponder, BufferedResponse, Capabilities, ReturnShape};
    use http::{header, HeaderValue, Uri};
    use satchel_extract::ExtractionContextBuilder;

    fn request() -> ExtractionContext {
        ExtractionContextBuilder::new()
            .uri(Uri::from_static("/?UserID=user1&Active=1"))
            .build()
    }

    fn run<H, Args>(handler: H) -> BufferedResponse
    where
        H: Handler<Args>,
    {
        let plan = BindingPlan::build(handler).unwrap();
        let request = request();
        let props = crate::hydrate(&plan, &request).unwrap();
        let mut sink = BufferedResponse::new();
        dispatch(&plan, props, RequestId::new(), &request, &mut sink).unwrap();
        sink
    }

    #[test]
    fn test_no_response_handler_owns_writer() {
        fn handler(mut ctx: RequestContext<'_>, props: UserProps) {
            let writer = ctx.writer().expect("writer for no-response handlers");
            writer.set_status(StatusCode::ACCEPTED);
            writer.write_all(props.user_id.as_bytes()).unwrap();
        }

        let response = run(handler);
        assert_eq!(response.status(), StatusCode::ACCEPTED);
        assert_eq!(response.body(), b"user1");
    }

    #[test]
    fn test_no_response_handler_writing_nothing() {
        fn handler(_props: UserProps) {}

        let response = run(handler);
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.body().is_empty());
    }

    #[test]
    fn test_error_handler_gets_no_writer() {
        fn handler(mut ctx: RequestContext<'_>, _props: UserProps) -> Result<(), String> {
            if ctx.writer().is_some() {
                return Err("writer leaked".into());
            }
            Ok(())
        }

        let response = run(handler);
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.body().is_empty());
    }

    #[test]
    fn test_error_text_becomes_500() {
        fn handler(_props: UserProps) -> Result<(), String> {
            Err("boom".into())
        }

        let response = run(handler);
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(response.body(), b"boom");
    }

    #[test]
    fn test_responder_without_body() {
        fn handler(_props: UserProps) -> BasicResponder {
            crate::ok()
        }

        let response = run(handler);
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.body().is_empty());
    }

    #[test]
    fn test_responder_with_body() {
        fn handler(_props: UserProps) -> BasicResponder {
            crate::unauthorized("bad thing happened :(")
        }

        let response = run(handler);
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(response.body(), b"bad thing happened :(");
    }

    #[test]
    fn test_responder_headers_are_written() {
        fn handler(props: UserProps) -> Box<dyn Responder> {
            Box::new(
                BasicResponder::new(StatusCode::CREATED)
                    .with_header(header::LOCATION, HeaderValue::from_static("/users/user1"))
                    .with_body(props.user_id),
            )
        }

        let response = run(handler);
        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(response.headers()[header::LOCATION], "/users/user1");
        assert_eq!(response.body(), b"user1");
    }

    #[test]
    fn test_responder_error_text_fallback() {
        fn handler(_props: UserProps) -> BasicResponder {
            BasicResponder::new(StatusCode::CONFLICT).with_error_text("already exists")
        }

        let response = run(handler);
        assert_eq!(response.status(), StatusCode::CONFLICT);
        assert_eq!(response.body(), b"already exists");
    }

    #[test]
    fn test_absent_responder_writes_nothing() {
        fn handler(_props: UserProps) -> Option<BasicResponder> {
            None
        }

        let response = run(handler);
        assert!(!response.is_committed());
        assert!(response.body().is_empty());
    }

    #[test]
    #[should_panic(expected = "does not match")]
    fn test_inconsistent_output_panics() {
        struct Liar;

        impl HandlerOutput for Liar {
            fn shape() -> ReturnShape {
                ReturnShape::single(Capabilities::ERROR)
            }

            fn into_returned(self) -> Returned {
                Returned::Unit
            }
        }

        fn handler(_props: UserProps) -> Liar {
            Liar
        }

        let _ = run(handler);
    }

    #[test]
    fn test_write_failure_is_returned() {
        struct Broken(BufferedResponse);

        impl Write for Broken {
            fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
                Err(io::Error::new(io::ErrorKind::BrokenPipe, "connection closed"))
            }

            fn flush(&mut self) -> io::Result<()> {
                Ok(())
            }
        }

        impl ResponseSink for Broken {
            fn set_status(&mut self, status: StatusCode) {
                self.0.set_status(status);
            }

            fn status(&self) -> StatusCode {
                self.0.status()
            }

            fn headers_mut(&mut self) -> &mut http::HeaderMap {
                self.0.headers_mut()
            }
        }

        fn handler(_props: UserProps) -> Result<(), String> {
            Err("boom".into())
        }

        let plan = BindingPlan::build(handler).unwrap();
        let request = request();
        let props = crate::hydrate(&plan, &request).unwrap();
        let mut sink = Broken(BufferedResponse::new());

        let err = dispatch(&plan, props, RequestId::new(), &request, &mut sink).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::BrokenPipe);
        assert_eq!(sink.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_reject_writes_status_and_detail() {
        let err = ExtractionError::no_source("user_id");
        let mut sink = BufferedResponse::new();
        reject(&mut sink, &err, &BindConfig::default()).unwrap();

        assert_eq!(sink.status(), StatusCode::BAD_REQUEST);
        assert!(String::from_utf8_lossy(sink.body()).contains("user_id"));
    }
}
