use crate::{config::Commands, error::OcrError};
use serde::Serialize;

/// Ordered argv templates for one engine invocation.
///
/// Token 0 is the program; the rest are its arguments. Placeholders such as
/// `{source}` are substituted per page by the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommandTemplates {
    tokens: Vec<String>,
}

impl CommandTemplates {
    /// Splits on `;`, trims each segment and drops empty ones.
    pub fn parse(raw: &str) -> Self {
        let tokens = raw
            .split(';')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .collect();
        Self { tokens }
    }

    /// Picks the Windows or Unix string once, by host OS.
    pub fn for_host(commands: &Commands) -> Result<Self, OcrError> {
        let parsed = Self::parse(commands.for_host());
        if parsed.is_empty() {
            return Err(OcrError::NoCommandsConfigured);
        }
        Ok(parsed)
    }

    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}
