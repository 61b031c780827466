//! Codex reads the GitHub MCP token from an environment variable instead of a
//! literal `Authorization` header.

use crate::error::TransformError;
use crate::model::{AttrValue, ServerModel};

use super::Transform;

/// Environment variable Codex uses for the GitHub server's bearer token.
pub const CODEX_GITHUB_TOKEN_ENV: &str = "CODEX_GITHUB_PERSONAL_ACCESS_TOKEN";

const GITHUB_SERVER: &str = "github";
const TOKEN_ENV_KEY: &str = "bearer_token_env_var";

#[derive(Debug, Default, Clone, Copy)]
pub struct TokenRelocation;

impl Transform for TokenRelocation {
    fn name(&self) -> &'static str {
        "token-relocation"
    }

    fn apply(&self, servers: &mut ServerModel) -> Result<(), TransformError> {
        let Some(server) = servers.get_mut(GITHUB_SERVER) else {
            return Ok(());
        };

        let has_token_env = server.contains_key(TOKEN_ENV_KEY);
        let Some(headers) = server.get_mut("headers").and_then(AttrValue::as_map_mut) else {
            return Ok(());
        };

        let removed = headers.remove("Authorization").is_some();
        let headers_empty = headers.is_empty();

        if !removed && !has_token_env {
            return Ok(());
        }
        if !has_token_env {
            server.insert(TOKEN_ENV_KEY, CODEX_GITHUB_TOKEN_ENV);
        }
        if headers_empty {
            server.remove("headers");
        }
        Ok(())
    }
}
