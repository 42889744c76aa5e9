use serde_json::{Map, Value};

use crate::server::response::WebDriverErrorResponse;

/// Decoded parameter mapping of a command
pub type Parameters = Map<String, Value>;

/// A decoded request: command name plus its parameters.
///
/// Built by the listener and consumed exactly once by the dispatch engine.
#[derive(Debug, Clone)]
pub struct Command {
    name: String,
    parameters: Parameters,
}

impl Command {
    pub fn new(name: impl Into<String>, parameters: Parameters) -> Self {
        Self {
            name: name.into(),
            parameters,
        }
    }

    /// Command that takes no parameters
    pub fn bare(name: impl Into<String>) -> Self {
        Self::new(name, Parameters::new())
    }

    /// Build a command from a decoded request body.
    ///
    /// `null` means "no parameters"; anything other than an object is rejected.
    pub fn from_value(
        name: impl Into<String>,
        body: Value,
    ) -> Result<Self, WebDriverErrorResponse> {
        match body {
            Value::Null => Ok(Self::bare(name)),
            Value::Object(parameters) => Ok(Self::new(name, parameters)),
            _ => Err(WebDriverErrorResponse::invalid_argument(
                "Command parameters must be a JSON object",
            )),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn parameters(&self) -> &Parameters {
        &self.parameters
    }
}

/// Fetch a required parameter, failing with a missing-parameter error
pub fn required<'a>(
    params: &'a Parameters,
    key: &str,
) -> Result<&'a Value, WebDriverErrorResponse> {
    params
        .get(key)
        .ok_or_else(|| WebDriverErrorResponse::missing_parameter(key))
}

/// Fetch a required string parameter
pub fn required_str<'a>(
    params: &'a Parameters,
    key: &str,
) -> Result<&'a str, WebDriverErrorResponse> {
    required(params, key)?.as_str().ok_or_else(|| {
        WebDriverErrorResponse::invalid_argument(&format!("Parameter {key} must be a string"))
    })
}
