/// Locator strategies for finding elements
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocatorStrategy {
    CssSelector,
    LinkText,
    PartialLinkText,
    TagName,
    XPath,
}

impl LocatorStrategy {
    /// Parse locator strategy from WebDriver string
    pub fn from_string(s: &str) -> Option<Self> {
        match s {
            "css selector" => Some(Self::CssSelector),
            "link text" => Some(Self::LinkText),
            "partial link text" => Some(Self::PartialLinkText),
            "tag name" => Some(Self::TagName),
            "xpath" => Some(Self::XPath),
            _ => None,
        }
    }

    /// WebDriver name of the strategy
    pub fn as_str(self) -> &'static str {
        match self {
            Self::CssSelector => "css selector",
            Self::LinkText => "link text",
            Self::PartialLinkText => "partial link text",
            Self::TagName => "tag name",
            Self::XPath => "xpath",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_strategy() {
        assert_eq!(
            LocatorStrategy::from_string("css selector"),
            Some(LocatorStrategy::CssSelector)
        );
        assert_eq!(
            LocatorStrategy::from_string("xpath"),
            Some(LocatorStrategy::XPath)
        );
        assert_eq!(
            LocatorStrategy::from_string("tag name"),
            Some(LocatorStrategy::TagName)
        );
        assert_eq!(LocatorStrategy::from_string("invalid"), None);
    }

    #[test]
    fn test_name_round_trips() {
        for strategy in [
            LocatorStrategy::CssSelector,
            LocatorStrategy::LinkText,
            LocatorStrategy::PartialLinkText,
            LocatorStrategy::TagName,
            LocatorStrategy::XPath,
        ] {
            assert_eq!(LocatorStrategy::from_string(strategy.as_str()), Some(strategy));
        }
    }
}
