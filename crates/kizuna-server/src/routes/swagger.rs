//! OpenAPI Documentation
//!
//! Centralized API documentation using utoipa.

use utoipa::OpenApi;

use crate::models::{
    ConnectionBundle,
    InboundCallRequest,
    InboundCallResponse,
    // Call models
    InitiateCallRequest,
    OutboundCallRequest,
    OutboundCallResult,
    // Webhook models
    PostCallEvent,
    // History models
    ScoreHistoryResponse,
    // Tool models
    ToolRequest,
    ToolResponse,
    WebhookAck,
};

#[derive(OpenApi)]
#[openapi(
    paths(
        super::call::initiate_call,
        super::call::outbound_call,
        super::inbound::inbound_call,
        super::tools::invoke_tool,
        super::webhook::post_call,
        super::users::score_history,
    ),
    components(schemas(
        InitiateCallRequest,
        ConnectionBundle,
        OutboundCallRequest,
        OutboundCallResult,
        InboundCallRequest,
        InboundCallResponse,
        ToolRequest,
        ToolResponse,
        PostCallEvent,
        WebhookAck,
        ScoreHistoryResponse,
    )),
    tags(
        (name = "Call", description = "Call lifecycle and admission"),
        (name = "Tools", description = "In-call tool dispatch"),
        (name = "Webhook", description = "Signed platform events"),
        (name = "User", description = "Score audit trail"),
    )
)]
pub struct ApiDoc;
