//! Handled Message Shapes
//!
//! The interceptor reacts to a short allow-list of DAP messages. Each one is
//! a variant here; everything else lands in `Unhandled` and is ignored.

use log::trace;
use serde::de::DeserializeOwned;
use serde_json::Value;

use super::protocol::{
    ContinuedEventBody, EvaluateArguments, ProtocolMessage, Scope, ScopesArguments,
    ScopesResponseBody, StoppedEventBody, Variable, VariablesArguments, VariablesResponseBody,
};

/// Messages travelling from the client to the debug adapter
#[derive(Debug, Clone, PartialEq)]
pub enum InboundMessage {
    /// `scopes` request for a frame
    ScopesRequest { seq: i64, frame_id: i64 },
    /// `variables` request for a container reference
    VariablesRequest { seq: i64, variables_reference: i64 },
    /// `evaluate` with a blank expression: pushes a new active frame id
    FrameIdSentinel { frame_id: Option<i64> },
    /// Anything outside the allow-list
    Unhandled,
}

impl InboundMessage {
    pub fn classify(value: &Value) -> Self {
        let request = match ProtocolMessage::from_value(value) {
            Ok(ProtocolMessage::Request(request)) => request,
            Ok(other) => {
                trace!("Ignoring inbound {}", other.label());
                return InboundMessage::Unhandled;
            }
            Err(e) => {
                trace!("Ignoring undecodable inbound message: {}", e);
                return InboundMessage::Unhandled;
            }
        };

        match request.command.as_str() {
            "scopes" => match arguments::<ScopesArguments>(&request.arguments) {
                Some(args) => InboundMessage::ScopesRequest {
                    seq: request.seq,
                    frame_id: args.frame_id,
                },
                None => InboundMessage::Unhandled,
            },
            "variables" => match arguments::<VariablesArguments>(&request.arguments) {
                Some(args) => InboundMessage::VariablesRequest {
                    seq: request.seq,
                    variables_reference: args.variables_reference,
                },
                None => InboundMessage::Unhandled,
            },
            "evaluate" => match arguments::<EvaluateArguments>(&request.arguments) {
                Some(args) if args.expression.trim().is_empty() => {
                    InboundMessage::FrameIdSentinel {
                        frame_id: args.frame_id,
                    }
                }
                _ => InboundMessage::Unhandled,
            },
            _ => InboundMessage::Unhandled,
        }
    }
}

/// Messages travelling from the debug adapter to the client
#[derive(Debug, Clone, PartialEq)]
pub enum OutboundMessage {
    /// `stopped` event that names a thread (breakpoint hit, step finished)
    Stopped { thread_id: i64, reason: String },
    /// `continued` event
    Continued { thread_id: Option<i64> },
    /// Successful `variables` response
    VariablesResponse {
        request_seq: i64,
        variables: Vec<Variable>,
    },
    /// Successful `scopes` response
    ScopesResponse { request_seq: i64, scopes: Vec<Scope> },
    /// Anything outside the allow-list
    Unhandled,
}

impl OutboundMessage {
    pub fn classify(value: &Value) -> Self {
        let message = match ProtocolMessage::from_value(value) {
            Ok(message) => message,
            Err(e) => {
                trace!("Ignoring undecodable outbound message: {}", e);
                return OutboundMessage::Unhandled;
            }
        };

        let label = message.label();
        let classified = match message {
            ProtocolMessage::Event(event) => match event.event.as_str() {
                "stopped" => match body::<StoppedEventBody>(&event.body) {
                    Some(StoppedEventBody {
                        thread_id: Some(thread_id),
                        reason,
                    }) => OutboundMessage::Stopped { thread_id, reason },
                    _ => OutboundMessage::Unhandled,
                },
                "continued" => OutboundMessage::Continued {
                    thread_id: body::<ContinuedEventBody>(&event.body)
                        .and_then(|b| b.thread_id),
                },
                _ => OutboundMessage::Unhandled,
            },
            ProtocolMessage::Response(response) if response.success => {
                match response.command.as_str() {
                    "variables" => match body::<VariablesResponseBody>(&response.body) {
                        Some(b) => OutboundMessage::VariablesResponse {
                            request_seq: response.request_seq,
                            variables: b.variables,
                        },
                        None => OutboundMessage::Unhandled,
                    },
                    "scopes" => match body::<ScopesResponseBody>(&response.body) {
                        Some(b) => OutboundMessage::ScopesResponse {
                            request_seq: response.request_seq,
                            scopes: b.scopes,
                        },
                        None => OutboundMessage::Unhandled,
                    },
                    _ => OutboundMessage::Unhandled,
                }
            }
            _ => OutboundMessage::Unhandled,
        };
        if classified == OutboundMessage::Unhandled {
            trace!("Ignoring outbound {}", label);
        }
        classified
    }
}

fn arguments<T: DeserializeOwned>(arguments: &Option<Value>) -> Option<T> {
    decode(arguments, "arguments")
}

fn body<T: DeserializeOwned>(body: &Option<Value>) -> Option<T> {
    decode(body, "body")
}

fn decode<T: DeserializeOwned>(value: &Option<Value>, what: &str) -> Option<T> {
    let value = value.as_ref()?;
    match serde_json::from_value(value.clone()) {
        Ok(decoded) => Some(decoded),
        Err(e) => {
            trace!("Ignoring message with malformed {}: {}", what, e);
            None
        }
    }
}
