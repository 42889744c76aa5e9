//! In-memory browser window with a frame tree.
//!
//! Stands in for a real automation backend in tests and in embedders that need a
//! scriptable window. Clones share state, so a test can keep one clone to inspect
//! the window after handing another to the driver.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use super::window::{BrowserWindow, FocusedContext, FrameError, NodeRef, WindowError};
use crate::webdriver::locator::LocatorStrategy;

static NEXT_NODE: AtomicU64 = AtomicU64::new(1);

fn next_node() -> NodeRef {
    NodeRef::new(format!("fake-node-{}", NEXT_NODE.fetch_add(1, Ordering::Relaxed)))
}

/// Plain element inside a fake document
#[derive(Debug, Clone)]
pub struct FakeElement {
    pub node: NodeRef,
    pub tag_name: String,
    pub selector: String,
}

/// Child frame inside a fake document
#[derive(Debug, Clone)]
pub struct FakeFrame {
    pub node: NodeRef,
    pub name: Option<String>,
    pub selector: String,
    pub document: FakeDocument,
}

/// Document tree: plain elements plus child frames in document order
#[derive(Debug, Clone, Default)]
pub struct FakeDocument {
    pub elements: Vec<FakeElement>,
    pub frames: Vec<FakeFrame>,
}

impl FakeDocument {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an element matched by `selector` (css) or `tag_name`
    #[must_use]
    pub fn with_element(mut self, selector: &str, tag_name: &str) -> Self {
        self.elements.push(FakeElement {
            node: next_node(),
            tag_name: tag_name.to_string(),
            selector: selector.to_string(),
        });
        self
    }

    /// Add a named child frame; it is findable as `#<name>` or by tag `iframe`
    #[must_use]
    pub fn with_frame(mut self, name: &str, document: FakeDocument) -> Self {
        self.frames.push(FakeFrame {
            node: next_node(),
            name: Some(name.to_string()),
            selector: format!("#{name}"),
            document,
        });
        self
    }

    /// Add a child frame with neither name nor id
    #[must_use]
    pub fn with_anonymous_frame(mut self, selector: &str, document: FakeDocument) -> Self {
        self.frames.push(FakeFrame {
            node: next_node(),
            name: None,
            selector: selector.to_string(),
            document,
        });
        self
    }

    fn find(&self, strategy: LocatorStrategy, value: &str) -> Option<NodeRef> {
        let frame = self.frames.iter().find(|frame| match strategy {
            LocatorStrategy::TagName => value.eq_ignore_ascii_case("iframe"),
            _ => frame.selector == value,
        });
        if let Some(frame) = frame {
            return Some(frame.node.clone());
        }
        self.elements
            .iter()
            .find(|element| match strategy {
                LocatorStrategy::TagName => element.tag_name.eq_ignore_ascii_case(value),
                _ => element.selector == value,
            })
            .map(|element| element.node.clone())
    }
}

#[derive(Debug)]
struct FakeState {
    url: String,
    document: FakeDocument,
    pages: HashMap<String, FakeDocument>,
    focus: Vec<usize>,
    detached: HashSet<NodeRef>,
    closed: bool,
}

impl FakeState {
    /// Frames along the focus path, outermost first
    fn focused_frames(&self) -> Vec<&FakeFrame> {
        let mut doc = &self.document;
        let mut frames = Vec::with_capacity(self.focus.len());
        for &index in &self.focus {
            let Some(frame) = doc.frames.get(index) else {
                break;
            };
            frames.push(frame);
            doc = &frame.document;
        }
        frames
    }

    fn focused_document(&self) -> &FakeDocument {
        self.focused_frames()
            .into_iter()
            .last()
            .map_or(&self.document, |frame| &frame.document)
    }

    fn enter(&mut self, index: usize) {
        self.focus.push(index);
    }
}

/// Scriptable [`BrowserWindow`] backed by a [`FakeDocument`]
#[derive(Debug, Clone)]
pub struct FakeWindow {
    state: Arc<Mutex<FakeState>>,
}

impl FakeWindow {
    pub fn new(document: FakeDocument) -> Self {
        Self {
            state: Arc::new(Mutex::new(FakeState {
                url: "about:blank".to_string(),
                document,
                pages: HashMap::new(),
                focus: Vec::new(),
                detached: HashSet::new(),
                closed: false,
            })),
        }
    }

    /// Document served when the window navigates to `url`
    #[must_use]
    pub fn with_page(self, url: &str, document: FakeDocument) -> Self {
        self.state().pages.insert(url.to_string(), document);
        self
    }

    /// A boxed clone sharing this window's state, ready for the driver
    pub fn boxed(&self) -> Box<dyn BrowserWindow> {
        Box::new(self.clone())
    }

    /// Names (or selectors for anonymous frames) along the focused frame path
    pub fn focused_path(&self) -> Vec<String> {
        self.state()
            .focused_frames()
            .into_iter()
            .map(|frame| frame.name.clone().unwrap_or_else(|| frame.selector.clone()))
            .collect()
    }

    /// Simulate `node` being removed from its document
    pub fn detach(&self, node: &NodeRef) {
        self.state().detached.insert(node.clone());
    }

    pub fn is_closed(&self) -> bool {
        self.state().closed
    }

    fn state(&self) -> MutexGuard<'_, FakeState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl BrowserWindow for FakeWindow {
    fn current_focused_frame(&self) -> FocusedContext {
        self.state()
            .focused_frames()
            .into_iter()
            .last()
            .map_or(FocusedContext::TopLevel, |frame| {
                FocusedContext::Frame(frame.node.clone())
            })
    }

    fn set_focused_frame_to_root(&mut self) {
        self.state().focus.clear();
    }

    fn set_focused_frame_by_element(&mut self, node: &NodeRef) -> Result<(), FrameError> {
        let mut state = self.state();
        if state.detached.contains(node) {
            return Err(FrameError::Detached);
        }
        let doc = state.focused_document();
        let frame_index = doc.frames.iter().position(|frame| &frame.node == node);
        let is_plain_element = doc.elements.iter().any(|element| &element.node == node);
        if let Some(index) = frame_index {
            state.enter(index);
            return Ok(());
        }
        if is_plain_element {
            Err(FrameError::NotAFrame)
        } else {
            Err(FrameError::Detached)
        }
    }

    fn set_focused_frame_by_name(&mut self, name: &str) -> Result<(), FrameError> {
        let mut state = self.state();
        let index = state
            .focused_document()
            .frames
            .iter()
            .position(|frame| {
                frame.name.as_deref() == Some(name) || frame.selector == format!("#{name}")
            })
            .ok_or(FrameError::NoSuchFrame)?;
        state.enter(index);
        Ok(())
    }

    fn set_focused_frame_by_index(&mut self, index: usize) -> Result<(), FrameError> {
        let mut state = self.state();
        if index >= state.focused_document().frames.len() {
            return Err(FrameError::NoSuchFrame);
        }
        state.enter(index);
        Ok(())
    }

    fn find_element(
        &mut self,
        strategy: LocatorStrategy,
        value: &str,
    ) -> Result<Option<NodeRef>, WindowError> {
        let state = self.state();
        if state.closed {
            return Err(WindowError::Closed);
        }
        Ok(state.focused_document().find(strategy, value))
    }

    fn navigate(&mut self, url: &str) -> Result<(), WindowError> {
        let mut state = self.state();
        if state.closed {
            return Err(WindowError::Closed);
        }
        let document = state.pages.get(url).cloned().unwrap_or_default();
        state.document = document;
        state.url = url.to_string();
        state.focus.clear();
        Ok(())
    }

    fn url(&self) -> Result<String, WindowError> {
        let state = self.state();
        if state.closed {
            return Err(WindowError::Closed);
        }
        Ok(state.url.clone())
    }

    fn close(&mut self) -> Result<(), WindowError> {
        let mut state = self.state();
        if state.closed {
            return Err(WindowError::Closed);
        }
        state.closed = true;
        Ok(())
    }
}
