use crate::routes::forward;
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use common::error::diagnostics::DiagnosticMessage;
use common::error::trace_as_string;
use components::PipelineError;
use serde::Serialize;
use shared_clients::cluster::ClusterError;
use shared_clients::jolokia::JolokiaError;
use shared_clients::kafka::KafkaConnectClientError;
use std::error::Error as StdError;
use thiserror::Error;
use tracing::error;

#[derive(Debug, Serialize)]
struct BadRequestBody<'a> {
    message: &'a str,
}

#[derive(Debug, Serialize)]
struct ServerErrorBody<'a> {
    message: &'a str,
    trace: Option<String>,
}

/// Everything a handler can fail with, mapped onto an HTTP response.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("bad request: {context}")]
    BadRequest { context: DiagnosticMessage },
    #[error(transparent)]
    Cluster(#[from] ClusterError),
    #[error(transparent)]
    KafkaConnect(#[from] KafkaConnectClientError),
    #[error(transparent)]
    Pipeline(#[from] PipelineError),
    #[error(transparent)]
    Metrics(#[from] JolokiaError),
    #[error("internal error: {context}")]
    Internal {
        context: DiagnosticMessage,
        #[source]
        source: Option<Box<dyn StdError + Send + Sync>>,
    },
}

impl ApiError {
    #[track_caller]
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest {
            context: DiagnosticMessage::new(message.into()),
        }
    }

    #[track_caller]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            context: DiagnosticMessage::new(message.into()),
            source: None,
        }
    }

    /// Caller-facing message, without the call-site suffix.
    pub fn message(&self) -> String {
        match self {
            Self::BadRequest { context } | Self::Internal { context, .. } => {
                context.message().to_string()
            }
            Self::Cluster(err) => err.message().to_string(),
            Self::KafkaConnect(KafkaConnectClientError::FailedToConnect { context, .. }) => {
                context.message().to_string()
            }
            Self::KafkaConnect(KafkaConnectClientError::Remote { body, .. }) => body.clone(),
            Self::Pipeline(err) => err.message().to_string(),
            Self::Metrics(err) => err.message().to_string(),
        }
    }

    fn is_caller_error(&self) -> bool {
        matches!(
            self,
            Self::BadRequest { .. }
                | Self::Cluster(ClusterError::InvalidCluster { .. })
                | Self::Pipeline(PipelineError::UnknownType { .. })
        )
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::BadRequest { .. } => StatusCode::BAD_REQUEST,
            Self::Cluster(ClusterError::InvalidCluster { .. }) => StatusCode::BAD_REQUEST,
            Self::Cluster(ClusterError::Configuration { .. }) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::KafkaConnect(KafkaConnectClientError::FailedToConnect { .. }) => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            Self::KafkaConnect(KafkaConnectClientError::Remote { status, .. }) => {
                StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY)
            }
            Self::Pipeline(PipelineError::UnknownType { .. }) => StatusCode::BAD_REQUEST,
            Self::Pipeline(PipelineError::Probe { .. }) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Metrics(JolokiaError::Unreachable { .. }) => StatusCode::SERVICE_UNAVAILABLE,
            Self::Metrics(JolokiaError::InvalidUrl { .. }) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();

        // Kafka Connect's own error body goes back untouched.
        if let Self::KafkaConnect(KafkaConnectClientError::Remote {
            content_type, body, ..
        }) = self
        {
            return forward(status, content_type.as_deref(), body.clone());
        }

        let message = self.message();
        if self.is_caller_error() {
            return HttpResponse::build(status).json(BadRequestBody { message: &message });
        }

        error!("{}", self);
        HttpResponse::build(status).json(ServerErrorBody {
            message: &message,
            trace: Some(trace_as_string(self)),
        })
    }
}
