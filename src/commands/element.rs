use crate::dispatch::{CommandContext, CommandHandler};
use crate::server::response::{WebDriverErrorResponse, WebDriverResponse, WebDriverResult};
use crate::webdriver::command::required_str;
use crate::webdriver::locator::LocatorStrategy;
use crate::webdriver::Parameters;

/// Locate one element in the focused frame and hand out a reference to it
pub struct FindElement;

impl CommandHandler for FindElement {
    fn execute(&self, ctx: &CommandContext<'_>, params: &Parameters) -> WebDriverResult {
        let using = required_str(params, "using")?;
        let value = required_str(params, "value")?;
        let strategy = LocatorStrategy::from_string(using).ok_or_else(|| {
            WebDriverErrorResponse::invalid_argument(&format!("Unknown locator strategy: {using}"))
        })?;

        let browser = ctx.browser()?;
        let node = browser
            .with_window(|window| window.find_element(strategy, value))?
            .ok_or_else(WebDriverErrorResponse::no_such_element)?;

        let element = ctx.session().registry().register_element(browser, node);
        tracing::debug!(
            window = %browser.id(),
            element = %element.id(),
            strategy = strategy.as_str(),
            "element registered"
        );
        Ok(WebDriverResponse::success(element.to_reference()))
    }
}
