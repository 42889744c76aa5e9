use serde_json::{json, Map, Value};

use crate::platform::NodeRef;

/// Key identifying an object as a W3C element reference
pub const ELEMENT_KEY: &str = "element-6066-11e4-a52e-4f735466cecf";

/// Key older client bindings use for element references
pub const LEGACY_ELEMENT_KEY: &str = "ELEMENT";

/// Session-scoped reference to one DOM node.
///
/// Bound to the window and frame generation it was resolved in; it is only
/// usable while that generation is still the window's current one.
#[derive(Debug)]
pub struct ElementHandle {
    id: String,
    browser_id: String,
    generation: u64,
    node: NodeRef,
}

impl ElementHandle {
    pub(crate) fn new(id: String, browser_id: String, generation: u64, node: NodeRef) -> Self {
        Self {
            id,
            browser_id,
            generation,
            node,
        }
    }

    /// Element ID returned to the client
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Window the element was resolved in
    pub fn browser_id(&self) -> &str {
        &self.browser_id
    }

    /// Frame generation the element was resolved in
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn node(&self) -> &NodeRef {
        &self.node
    }

    /// Wire encoding of this element
    pub fn to_reference(&self) -> Value {
        json!({ ELEMENT_KEY: self.id })
    }
}

/// Pull the element ID out of a reference object.
///
/// The canonical key wins; the legacy key is consulted when the canonical one is
/// absent or null.
pub fn reference_id(object: &Map<String, Value>) -> Option<&Value> {
    object
        .get(ELEMENT_KEY)
        .filter(|value| !value.is_null())
        .or_else(|| object.get(LEGACY_ELEMENT_KEY).filter(|value| !value.is_null()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn object(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected an object"),
        }
    }

    #[test]
    fn test_reference_encoding() {
        let element = ElementHandle::new(
            "abc".to_string(),
            "window-1".to_string(),
            0,
            NodeRef::new("n1"),
        );
        assert_eq!(
            element.to_reference(),
            json!({"element-6066-11e4-a52e-4f735466cecf": "abc"})
        );
    }

    #[test]
    fn test_canonical_key_preferred() {
        let reference = object(json!({ELEMENT_KEY: "new", LEGACY_ELEMENT_KEY: "old"}));
        assert_eq!(reference_id(&reference), Some(&json!("new")));
    }

    #[test]
    fn test_legacy_key_fallback() {
        let reference = object(json!({LEGACY_ELEMENT_KEY: "old"}));
        assert_eq!(reference_id(&reference), Some(&json!("old")));

        let reference = object(json!({ELEMENT_KEY: null, LEGACY_ELEMENT_KEY: "old"}));
        assert_eq!(reference_id(&reference), Some(&json!("old")));
    }

    #[test]
    fn test_no_reference_key() {
        let reference = object(json!({"name": "frame"}));
        assert_eq!(reference_id(&reference), None);
    }
}
