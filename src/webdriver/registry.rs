use std::collections::{HashMap, HashSet};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use uuid::Uuid;

use super::browser::BrowserHandle;
use super::element::ElementHandle;
use crate::platform::{BrowserWindow, NodeRef};

/// Why a lookup found nothing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupError {
    /// The ID was never handed out by this registry
    Unknown,
    /// The ID belonged to a handle that has since been torn down
    Stale,
}

#[derive(Debug, Default)]
struct Inner {
    browsers: HashMap<String, Arc<BrowserHandle>>,
    /// Registration order of live browsers
    browser_order: Vec<String>,
    elements: HashMap<String, Arc<ElementHandle>>,
    /// Every ID ever torn down; never handed out again
    retired: HashSet<String>,
}

impl Inner {
    fn fresh_id(&self) -> String {
        loop {
            let id = Uuid::new_v4().to_string();
            if !self.retired.contains(&id)
                && !self.browsers.contains_key(&id)
                && !self.elements.contains_key(&id)
            {
                return id;
            }
        }
    }

    fn lookup_error(&self, id: &str) -> LookupError {
        if self.retired.contains(id) {
            LookupError::Stale
        } else {
            LookupError::Unknown
        }
    }

    fn retire_elements(&mut self, keep: impl Fn(&ElementHandle) -> bool) -> usize {
        let doomed: Vec<String> = self
            .elements
            .values()
            .filter(|element| !keep(element))
            .map(|element| element.id().to_string())
            .collect();
        for id in &doomed {
            self.elements.remove(id);
            self.retired.insert(id.clone());
        }
        doomed.len()
    }
}

/// Maps opaque session identifiers to live browser and element handles.
///
/// Mutated only from the automation thread; lookups may come from any thread.
#[derive(Debug, Default)]
pub struct HandleRegistry {
    inner: RwLock<Inner>,
}

impl HandleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a newly discovered window
    pub fn register_browser(&self, window: Box<dyn BrowserWindow>) -> Arc<BrowserHandle> {
        let mut inner = self.write();
        let id = inner.fresh_id();
        let handle = Arc::new(BrowserHandle::new(id.clone(), window));
        inner.browsers.insert(id.clone(), handle.clone());
        inner.browser_order.push(id);
        handle
    }

    /// Register a node resolved in `browser`'s current frame generation
    pub fn register_element(&self, browser: &BrowserHandle, node: NodeRef) -> Arc<ElementHandle> {
        let generation = browser.generation();
        let mut inner = self.write();
        let id = inner.fresh_id();
        let handle = Arc::new(ElementHandle::new(
            id.clone(),
            browser.id().to_string(),
            generation,
            node,
        ));
        inner.elements.insert(id, handle.clone());
        handle
    }

    pub fn browser(&self, id: &str) -> Result<Arc<BrowserHandle>, LookupError> {
        let inner = self.read();
        inner
            .browsers
            .get(id)
            .cloned()
            .ok_or_else(|| inner.lookup_error(id))
    }

    pub fn element(&self, id: &str) -> Result<Arc<ElementHandle>, LookupError> {
        let inner = self.read();
        inner
            .elements
            .get(id)
            .cloned()
            .ok_or_else(|| inner.lookup_error(id))
    }

    /// IDs of all live browsers in registration order
    pub fn browser_ids(&self) -> Vec<String> {
        self.read().browser_order.clone()
    }

    pub fn browsers(&self) -> Vec<Arc<BrowserHandle>> {
        let inner = self.read();
        inner
            .browser_order
            .iter()
            .filter_map(|id| inner.browsers.get(id).cloned())
            .collect()
    }

    pub fn element_count(&self) -> usize {
        self.read().elements.len()
    }

    /// Tear down a browser and every element scoped to it
    pub fn unregister_browser(&self, id: &str) -> Option<Arc<BrowserHandle>> {
        let mut inner = self.write();
        let handle = inner.browsers.remove(id)?;
        inner.browser_order.retain(|live| live != id);
        inner.retired.insert(id.to_string());
        let invalidated = inner.retire_elements(|element| element.browser_id() != id);
        tracing::debug!(window = %id, invalidated, "unregistered browser");
        Some(handle)
    }

    pub fn unregister_element(&self, id: &str) -> bool {
        let mut inner = self.write();
        if inner.elements.remove(id).is_some() {
            inner.retired.insert(id.to_string());
            true
        } else {
            false
        }
    }

    /// Retire elements of `browser_id` resolved in any generation other than
    /// `current_generation`
    pub fn retire_stale_elements(&self, browser_id: &str, current_generation: u64) -> usize {
        self.write().retire_elements(|element| {
            element.browser_id() != browser_id || element.generation() == current_generation
        })
    }

    fn read(&self) -> RwLockReadGuard<'_, Inner> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Inner> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::testing::{FakeDocument, FakeWindow};
    use crate::webdriver::frame::FrameSelector;

    fn window() -> Box<dyn BrowserWindow> {
        FakeWindow::new(FakeDocument::new().with_frame("f", FakeDocument::new())).boxed()
    }

    #[test]
    fn test_register_and_lookup() {
        let registry = HandleRegistry::new();
        let browser = registry.register_browser(window());
        let element = registry.register_element(&browser, NodeRef::new("n1"));

        assert_eq!(registry.browser(browser.id()).expect("live").id(), browser.id());
        assert_eq!(registry.element(element.id()).expect("live").node(), &NodeRef::new("n1"));
        assert_eq!(registry.browser_ids(), vec![browser.id().to_string()]);
    }

    #[test]
    fn test_unknown_id() {
        let registry = HandleRegistry::new();
        assert_eq!(registry.element("nope").unwrap_err(), LookupError::Unknown);
        assert_eq!(registry.browser("nope").unwrap_err(), LookupError::Unknown);
    }

    #[test]
    fn test_destroying_browser_invalidates_its_elements() {
        let registry = HandleRegistry::new();
        let doomed = registry.register_browser(window());
        let survivor = registry.register_browser(window());
        let a = registry.register_element(&doomed, NodeRef::new("a"));
        let b = registry.register_element(&doomed, NodeRef::new("b"));
        let c = registry.register_element(&survivor, NodeRef::new("c"));

        registry.unregister_browser(doomed.id()).expect("was live");

        assert_eq!(registry.browser(doomed.id()).unwrap_err(), LookupError::Stale);
        assert_eq!(registry.element(a.id()).unwrap_err(), LookupError::Stale);
        assert_eq!(registry.element(b.id()).unwrap_err(), LookupError::Stale);
        assert!(registry.element(c.id()).is_ok());
        assert_eq!(registry.browser_ids(), vec![survivor.id().to_string()]);
    }

    #[test]
    fn test_retire_stale_elements() {
        let registry = HandleRegistry::new();
        let browser = registry.register_browser(window());
        let old = registry.register_element(&browser, NodeRef::new("old"));
        browser
            .switch_to_child(FrameSelector::Name("f".into()))
            .expect("frame exists");
        let fresh = registry.register_element(&browser, NodeRef::new("fresh"));

        let retired = registry.retire_stale_elements(browser.id(), browser.generation());
        assert_eq!(retired, 1);
        assert_eq!(registry.element(old.id()).unwrap_err(), LookupError::Stale);
        assert!(registry.element(fresh.id()).is_ok());
    }

    #[test]
    fn test_unregister_element() {
        let registry = HandleRegistry::new();
        let browser = registry.register_browser(window());
        let element = registry.register_element(&browser, NodeRef::new("n"));
        assert!(registry.unregister_element(element.id()));
        assert!(!registry.unregister_element(element.id()));
        assert_eq!(registry.element(element.id()).unwrap_err(), LookupError::Stale);
        assert_eq!(registry.element_count(), 0);
    }
}
