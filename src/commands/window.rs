use crate::dispatch::{CommandContext, CommandHandler};
use crate::server::response::{WebDriverErrorResponse, WebDriverResponse, WebDriverResult};
use crate::webdriver::command::required_str;
use crate::webdriver::Parameters;

pub struct GetWindowHandle;

impl CommandHandler for GetWindowHandle {
    fn execute(&self, ctx: &CommandContext<'_>, _params: &Parameters) -> WebDriverResult {
        Ok(WebDriverResponse::success(ctx.browser()?.id()))
    }
}

/// Handles of every open window, in the order they opened
pub struct GetWindowHandles;

impl CommandHandler for GetWindowHandles {
    fn requires_window(&self) -> bool {
        false
    }

    fn execute(&self, ctx: &CommandContext<'_>, _params: &Parameters) -> WebDriverResult {
        Ok(WebDriverResponse::success(ctx.session().registry().browser_ids()))
    }
}

/// Make another window current. Its focus starts at the top-level document.
pub struct SwitchToWindow;

impl CommandHandler for SwitchToWindow {
    fn requires_window(&self) -> bool {
        false
    }

    fn execute(&self, ctx: &CommandContext<'_>, params: &Parameters) -> WebDriverResult {
        let handle = required_str(params, "handle")?;
        let session = ctx.session();
        let browser = session
            .registry()
            .browser(handle)
            .map_err(|_| WebDriverErrorResponse::no_such_window())?;

        browser.switch_to_root();
        session.set_current_window(Some(browser.id().to_string()));
        tracing::debug!(window = %handle, "switched window");
        Ok(WebDriverResponse::null())
    }
}

/// Close the current window and return the handles still open
pub struct CloseWindow;

impl CommandHandler for CloseWindow {
    fn execute(&self, ctx: &CommandContext<'_>, _params: &Parameters) -> WebDriverResult {
        let browser = ctx.browser()?;
        let session = ctx.session();

        browser.with_window(|window| window.close())?;
        session.registry().unregister_browser(browser.id());
        session.set_current_window(None);
        tracing::info!(window = %browser.id(), "window closed");

        Ok(WebDriverResponse::success(session.registry().browser_ids()))
    }
}
