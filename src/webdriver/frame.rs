//! Frame focus state of one top-level window.
//!
//! The window is either at the root document or inside a chain of frames
//! reached one selector at a time. Every transition that tears down the
//! current frame context moves to a fresh generation; element handles are bound
//! to the generation they were resolved in.

use crate::platform::NodeRef;

/// How a child frame was reached from its parent document
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FrameSelector {
    Element(NodeRef),
    Name(String),
    Index(usize),
}

/// Where element-scoped commands currently apply
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FocusedFrame {
    #[default]
    Root,
    /// Non-empty path of selectors from the root document to the focused frame
    InFrame(Vec<FrameSelector>),
}

#[derive(Debug, Clone)]
pub struct FrameContext {
    focused: FocusedFrame,
    generation: u64,
    /// Highest generation ever handed out; never goes backwards
    issued: u64,
    /// Bumped on every top-level navigation
    document: u64,
}

impl Default for FrameContext {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameContext {
    pub fn new() -> Self {
        Self {
            focused: FocusedFrame::Root,
            generation: 0,
            issued: 0,
            document: 0,
        }
    }

    pub fn focused(&self) -> &FocusedFrame {
        &self.focused
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Counter of top-level documents loaded in the window
    pub fn document(&self) -> u64 {
        self.document
    }

    pub fn path(&self) -> &[FrameSelector] {
        match &self.focused {
            FocusedFrame::Root => &[],
            FocusedFrame::InFrame(path) => path,
        }
    }

    pub fn is_root(&self) -> bool {
        matches!(self.focused, FocusedFrame::Root)
    }

    pub fn switch_to_root(&mut self) {
        if !self.is_root() {
            self.focused = FocusedFrame::Root;
            self.advance();
        }
    }

    /// Record a successful switch into a child of the focused frame
    pub fn switch_to_child(&mut self, selector: FrameSelector) {
        let mut path = match std::mem::take(&mut self.focused) {
            FocusedFrame::Root => Vec::new(),
            FocusedFrame::InFrame(path) => path,
        };
        path.push(selector);
        self.focused = FocusedFrame::InFrame(path);
        self.advance();
    }

    /// Record a successful switch to the parent frame. Root stays Root.
    pub fn switch_to_parent(&mut self) {
        let FocusedFrame::InFrame(mut path) = std::mem::take(&mut self.focused) else {
            return;
        };
        path.pop();
        if !path.is_empty() {
            self.focused = FocusedFrame::InFrame(path);
        }
        self.advance();
    }

    /// The top-level window loaded a new document
    pub fn reset_for_navigation(&mut self) {
        self.focused = FocusedFrame::Root;
        self.document += 1;
        self.advance();
    }

    /// Return to an earlier snapshot of the same document.
    ///
    /// Returns false (and changes nothing) when the window navigated since the
    /// snapshot was taken.
    pub(crate) fn restore(&mut self, snapshot: &FrameContext) -> bool {
        if snapshot.document != self.document {
            return false;
        }
        self.focused = snapshot.focused.clone();
        self.generation = snapshot.generation;
        true
    }

    /// Abandon the current context without a navigation
    pub(crate) fn discard(&mut self) {
        self.focused = FocusedFrame::Root;
        self.advance();
    }

    fn advance(&mut self) {
        self.issued += 1;
        self.generation = self.issued;
    }
}
