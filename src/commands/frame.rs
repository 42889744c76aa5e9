use serde_json::{Number, Value};

use crate::dispatch::{CommandContext, CommandHandler};
use crate::server::response::{WebDriverErrorResponse, WebDriverResponse, WebDriverResult};
use crate::webdriver::command::required;
use crate::webdriver::element::reference_id;
use crate::webdriver::{FrameSelector, Parameters};

/// Decoded `id` parameter of switchToFrame
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FrameTarget {
    /// `null`: back to the top-level document
    Top,
    /// Element reference carrying this element ID
    Element(String),
    /// Object without a usable element reference
    Unresolvable,
    /// Frame name or id attribute
    Name(String),
    /// Position among the focused document's child frames
    Index(i64),
    /// Any other JSON shape
    Unsupported(&'static str),
}

impl FrameTarget {
    pub fn from_value(id: &Value) -> Self {
        match id {
            Value::Null => Self::Top,
            Value::Object(object) => match reference_id(object) {
                Some(Value::String(element_id)) => Self::Element(element_id.clone()),
                _ => Self::Unresolvable,
            },
            Value::String(name) => Self::Name(name.clone()),
            Value::Number(n) => {
                integral(n).map_or(Self::Unsupported("non-integral number"), Self::Index)
            }
            Value::Bool(_) => Self::Unsupported("boolean"),
            Value::Array(_) => Self::Unsupported("array"),
        }
    }
}

/// Integral value of `n`; values past `i64::MAX` saturate since no document has that many frames
#[allow(clippy::cast_possible_truncation)]
fn integral(n: &Number) -> Option<i64> {
    if let Some(i) = n.as_i64() {
        return Some(i);
    }
    if n.is_u64() {
        return Some(i64::MAX);
    }
    let f = n.as_f64()?;
    (f.is_finite() && f.fract() == 0.0).then_some(f as i64)
}

/// Focus a child frame of the current context, or the top-level document
pub struct SwitchToFrame;

impl CommandHandler for SwitchToFrame {
    // Parameter validation comes before the window check
    fn requires_window(&self) -> bool {
        false
    }

    fn execute(&self, ctx: &CommandContext<'_>, params: &Parameters) -> WebDriverResult {
        let target = FrameTarget::from_value(required(params, "id")?);
        let browser = ctx.browser()?;

        let selector = match target {
            FrameTarget::Top => {
                browser.switch_to_root();
                return Ok(WebDriverResponse::null());
            }
            FrameTarget::Element(element_id) => {
                let element = ctx.element(&element_id)?;
                FrameSelector::Element(element.node().clone())
            }
            FrameTarget::Unresolvable => return Err(WebDriverErrorResponse::no_such_frame()),
            FrameTarget::Name(name) => FrameSelector::Name(name),
            FrameTarget::Index(index) => {
                let index = usize::try_from(index)
                    .map_err(|_| WebDriverErrorResponse::no_such_frame())?;
                FrameSelector::Index(index)
            }
            FrameTarget::Unsupported(kind) => {
                return Err(WebDriverErrorResponse::invalid_argument(&format!(
                    "Frame id must be null, a string, an integer or an element reference, \
                     got {kind}"
                )));
            }
        };

        browser.switch_to_child(selector)?;
        Ok(WebDriverResponse::null())
    }
}

/// Move focus to the parent of the focused frame
pub struct SwitchToParentFrame;

impl CommandHandler for SwitchToParentFrame {
    fn execute(&self, ctx: &CommandContext<'_>, _params: &Parameters) -> WebDriverResult {
        ctx.browser()?.switch_to_parent()?;
        Ok(WebDriverResponse::null())
    }
}
