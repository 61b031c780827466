//! Gemini's settings validator rejects several keys other agents accept.

use crate::error::TransformError;
use crate::model::ServerModel;

use super::Transform;

const UNSUPPORTED_KEYS: [&str; 4] = ["autoApprove", "disabled", "gallery", "type"];

#[derive(Debug, Default, Clone, Copy)]
pub struct FieldStripping;

impl Transform for FieldStripping {
    fn name(&self) -> &'static str {
        "field-stripping"
    }

    fn apply(&self, servers: &mut ServerModel) -> Result<(), TransformError> {
        for (_, server) in servers.iter_mut() {
            for key in UNSUPPORTED_KEYS {
                server.remove(key);
            }
        }
        Ok(())
    }
}
