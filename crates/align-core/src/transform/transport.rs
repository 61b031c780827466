//! Claude Code accepts `http` but not the legacy `streamable-http` name.

use crate::error::TransformError;
use crate::model::ServerModel;

use super::{Transform, normalized_transport};

#[derive(Debug, Default, Clone, Copy)]
pub struct TransportNormalization;

impl Transform for TransportNormalization {
    fn name(&self) -> &'static str {
        "transport-normalization"
    }

    fn apply(&self, servers: &mut ServerModel) -> Result<(), TransformError> {
        for (_, server) in servers.iter_mut() {
            let is_streamable = server
                .get_str("type")
                .and_then(normalized_transport)
                .is_some_and(|t| t == "http");
            if is_streamable {
                server.insert("type", "http");
            }
        }
        Ok(())
    }
}
