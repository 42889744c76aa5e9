use std::fmt;
use std::sync::{Mutex, MutexGuard, PoisonError};

use super::frame::{FrameContext, FrameSelector};
use crate::platform::{BrowserWindow, FrameError};

/// One top-level browser window plus its frame focus state.
///
/// Both locks are only taken on the automation thread; they exist so the
/// registry can hand out shared handles. Lock order is window, then frame.
pub struct BrowserHandle {
    id: String,
    window: Mutex<Box<dyn BrowserWindow>>,
    frame: Mutex<FrameContext>,
}

impl fmt::Debug for BrowserHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BrowserHandle")
            .field("id", &self.id)
            .finish_non_exhaustive()
    }
}

impl BrowserHandle {
    pub(crate) fn new(id: String, window: Box<dyn BrowserWindow>) -> Self {
        Self {
            id,
            window: Mutex::new(window),
            frame: Mutex::new(FrameContext::new()),
        }
    }

    /// Window handle returned to the client
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Snapshot of the current frame focus
    pub fn frame_context(&self) -> FrameContext {
        self.frame().clone()
    }

    pub fn generation(&self) -> u64 {
        self.frame().generation()
    }

    /// Run `f` against the underlying automation window
    pub fn with_window<T>(&self, f: impl FnOnce(&mut dyn BrowserWindow) -> T) -> T {
        let mut window = self.window();
        f(&mut **window)
    }

    pub fn switch_to_root(&self) {
        let mut window = self.window();
        window.set_focused_frame_to_root();
        self.frame().switch_to_root();
    }

    /// Enter a child of the focused frame. On failure nothing changes.
    pub fn switch_to_child(&self, selector: FrameSelector) -> Result<(), FrameError> {
        let mut window = self.window();
        apply(&mut **window, &selector)?;
        tracing::debug!(
            window = %self.id,
            focused = ?window.current_focused_frame(),
            "entered frame"
        );
        self.frame().switch_to_child(selector);
        Ok(())
    }

    /// Leave the focused frame for its parent. Root stays Root.
    ///
    /// The automation layer only moves downwards, so the parent is reached by
    /// replaying the path minus its last selector from the root document.
    pub fn switch_to_parent(&self) -> Result<(), FrameError> {
        let mut window = self.window();
        let mut frame = self.frame();
        let path = frame.path().to_vec();
        let Some((_, parent)) = path.split_last() else {
            return Ok(());
        };
        if let Err(err) = replay(&mut **window, parent) {
            if replay(&mut **window, &path).is_err() {
                tracing::warn!(window = %self.id, "lost frame context while switching to parent");
                window.set_focused_frame_to_root();
                frame.discard();
            }
            return Err(err);
        }
        frame.switch_to_parent();
        Ok(())
    }

    /// React to the top-level window loading a new document
    pub fn on_navigation(&self) {
        let mut window = self.window();
        window.set_focused_frame_to_root();
        self.frame().reset_for_navigation();
    }

    /// Put the frame focus back to `snapshot`, replaying its path against the
    /// window. Falls back to the root document if the path no longer resolves.
    pub(crate) fn restore_frame(&self, snapshot: &FrameContext) {
        let mut window = self.window();
        let mut frame = self.frame();
        if frame.generation() == snapshot.generation() {
            return;
        }
        if replay(&mut **window, snapshot.path()).is_ok() && frame.restore(snapshot) {
            return;
        }
        tracing::warn!(window = %self.id, "could not restore frame context, resetting to root");
        window.set_focused_frame_to_root();
        frame.discard();
    }

    fn window(&self) -> MutexGuard<'_, Box<dyn BrowserWindow>> {
        self.window.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn frame(&self) -> MutexGuard<'_, FrameContext> {
        self.frame.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn apply(window: &mut dyn BrowserWindow, selector: &FrameSelector) -> Result<(), FrameError> {
    match selector {
        FrameSelector::Element(node) => window.set_focused_frame_by_element(node),
        FrameSelector::Name(name) => window.set_focused_frame_by_name(name),
        FrameSelector::Index(index) => window.set_focused_frame_by_index(*index),
    }
}

fn replay(window: &mut dyn BrowserWindow, path: &[FrameSelector]) -> Result<(), FrameError> {
    window.set_focused_frame_to_root();
    for selector in path {
        apply(window, selector)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::testing::{FakeDocument, FakeWindow};
    use crate::webdriver::frame::FocusedFrame;

    fn handle() -> (BrowserHandle, FakeWindow) {
        let window = FakeWindow::new(
            FakeDocument::new()
                .with_frame(
                    "outer",
                    FakeDocument::new().with_frame("inner", FakeDocument::new()),
                )
                .with_frame("other", FakeDocument::new()),
        );
        (BrowserHandle::new("w1".into(), window.boxed()), window)
    }

    #[test]
    fn test_failed_switch_leaves_context_unchanged() {
        let (browser, window) = handle();
        browser
            .switch_to_child(FrameSelector::Name("outer".into()))
            .expect("outer exists");
        let before = browser.frame_context();

        let err = browser
            .switch_to_child(FrameSelector::Name("missing".into()))
            .unwrap_err();
        assert_eq!(err, FrameError::NoSuchFrame);
        assert_eq!(browser.frame_context().focused(), before.focused());
        assert_eq!(browser.generation(), before.generation());
        assert_eq!(window.focused_path(), vec!["outer"]);
    }

    #[test]
    fn test_switch_to_parent_replays_path() {
        let (browser, window) = handle();
        browser
            .switch_to_child(FrameSelector::Name("outer".into()))
            .expect("outer exists");
        browser
            .switch_to_child(FrameSelector::Index(0))
            .expect("inner exists");
        assert_eq!(window.focused_path(), vec!["outer", "inner"]);

        browser.switch_to_parent().expect("parent reachable");
        assert_eq!(window.focused_path(), vec!["outer"]);
        assert_eq!(
            browser.frame_context().focused(),
            &FocusedFrame::InFrame(vec![FrameSelector::Name("outer".into())])
        );
    }

    #[test]
    fn test_restore_frame() {
        let (browser, window) = handle();
        browser
            .switch_to_child(FrameSelector::Name("other".into()))
            .expect("other exists");
        let snapshot = browser.frame_context();

        browser.switch_to_root();
        browser
            .switch_to_child(FrameSelector::Name("outer".into()))
            .expect("outer exists");
        browser.restore_frame(&snapshot);

        assert_eq!(window.focused_path(), vec!["other"]);
        assert_eq!(browser.generation(), snapshot.generation());
    }

    #[test]
    fn test_navigation_resets_frame() {
        let (browser, _window) = handle();
        browser
            .switch_to_child(FrameSelector::Index(1))
            .expect("second frame exists");
        browser.on_navigation();
        assert!(browser.frame_context().is_root());
    }
}
