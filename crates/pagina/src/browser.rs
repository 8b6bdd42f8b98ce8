//! The browser facade: one shared handle tying the driver session to its
//! configuration.
//!
//! Everything else in the crate reaches the driver through a [`Browser`].
//! Cloning is cheap and every clone shares the same session, so pages,
//! modules and content initializers can each hold their own copy.

use std::rc::Rc;
use std::time::Duration;

use tracing::{debug, warn};
use url::Url;

use crate::config::Config;
use crate::driver::DriverRef;
use crate::element::{self, Element, ElementList, Resolved};
use crate::locator::{FetchMode, Locator};
use crate::page::{Module, Page};
use crate::result::{PaginaError, PaginaResult};
use crate::truthy::Truthy;
use crate::wait;

/// Shared handle to a driver session plus configuration
#[derive(Debug, Clone)]
pub struct Browser {
    inner: Rc<BrowserInner>,
}

#[derive(Debug)]
struct BrowserInner {
    driver: DriverRef,
    config: Config,
}

impl Browser {
    /// Wrap a driver session with the given configuration
    #[must_use]
    pub fn new(driver: DriverRef, config: Config) -> Self {
        Self {
            inner: Rc::new(BrowserInner { driver, config }),
        }
    }

    /// Run `block` against a fresh browser and quit the session afterwards,
    /// whether the block succeeded or not.
    ///
    /// # Errors
    ///
    /// The block's error wins over a quit failure; a quit failure after a
    /// successful block is reported as the result.
    pub fn drive<T>(
        driver: DriverRef,
        config: Config,
        block: impl FnOnce(&Self) -> PaginaResult<T>,
    ) -> PaginaResult<T> {
        let browser = Self::new(driver, config);
        let outcome = block(&browser);
        let quit_outcome = browser.quit();
        match outcome {
            Ok(value) => quit_outcome.map(|()| value),
            Err(err) => {
                if let Err(quit_err) = quit_outcome {
                    warn!(error = %quit_err, "failed to quit driver session");
                }
                Err(err)
            }
        }
    }

    /// The underlying driver session
    #[must_use]
    pub fn driver(&self) -> &DriverRef {
        &self.inner.driver
    }

    /// The configuration this browser was created with
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.inner.config
    }

    /// URL the driver currently displays
    ///
    /// # Errors
    ///
    /// Driver errors propagate unchanged.
    pub fn current_url(&self) -> PaginaResult<String> {
        self.inner.driver.current_url()
    }

    /// End the driver session
    ///
    /// # Errors
    ///
    /// Driver errors propagate unchanged.
    pub fn quit(&self) -> PaginaResult<()> {
        debug!("quitting driver session");
        self.inner.driver.quit()
    }

    /// First CSS match, or the empty sentinel
    ///
    /// # Errors
    ///
    /// Driver errors propagate unchanged.
    pub fn css(&self, selector: &str, scope: Option<&Element>) -> PaginaResult<Element> {
        element::resolve_single(&self.inner.driver, Locator::css(selector), scope)
    }

    /// All CSS matches, possibly none
    ///
    /// # Errors
    ///
    /// Driver errors propagate unchanged.
    pub fn css_list(&self, selector: &str, scope: Option<&Element>) -> PaginaResult<ElementList> {
        element::resolve_list(&self.inner.driver, Locator::css(selector), scope)
    }

    /// First tag-name match, or the empty sentinel
    ///
    /// # Errors
    ///
    /// Driver errors propagate unchanged.
    pub fn tag(&self, name: &str, scope: Option<&Element>) -> PaginaResult<Element> {
        element::resolve_single(&self.inner.driver, Locator::tag(name), scope)
    }

    /// All tag-name matches, possibly none
    ///
    /// # Errors
    ///
    /// Driver errors propagate unchanged.
    pub fn tag_list(&self, name: &str, scope: Option<&Element>) -> PaginaResult<ElementList> {
        element::resolve_list(&self.inner.driver, Locator::tag(name), scope)
    }

    /// First XPath match, or the empty sentinel
    ///
    /// # Errors
    ///
    /// Driver errors propagate unchanged.
    pub fn xpath(&self, expression: &str, scope: Option<&Element>) -> PaginaResult<Element> {
        element::resolve_single(&self.inner.driver, Locator::xpath(expression), scope)
    }

    /// All XPath matches, possibly none
    ///
    /// # Errors
    ///
    /// Driver errors propagate unchanged.
    pub fn xpath_list(&self, expression: &str, scope: Option<&Element>) -> PaginaResult<ElementList> {
        element::resolve_list(&self.inner.driver, Locator::xpath(expression), scope)
    }

    /// Mode-agnostic resolution using the configured default fetch mode
    ///
    /// # Errors
    ///
    /// Driver errors propagate unchanged.
    pub fn find(&self, locator: Locator, scope: Option<&Element>) -> PaginaResult<Resolved> {
        match self.inner.config.elements_fetch_type {
            FetchMode::Single => {
                element::resolve_single(&self.inner.driver, locator, scope).map(Resolved::Single)
            }
            FetchMode::List => {
                element::resolve_list(&self.inner.driver, locator, scope).map(Resolved::List)
            }
        }
    }

    /// A module resolving against the document root
    #[must_use]
    pub fn module(&self) -> Module {
        Module::new(self.clone())
    }

    /// A module resolving inside `scope`
    #[must_use]
    pub fn scoped_module(&self, scope: Element) -> Module {
        Module::scoped(self.clone(), scope)
    }

    /// Poll `probe` using the named preset, or the default preset when no
    /// name is given.
    ///
    /// # Errors
    ///
    /// [`PaginaError::PresetNotFound`] for an unknown preset name, raised
    /// before the first attempt; [`PaginaError::WaitTimeout`] at the
    /// deadline.
    pub fn wait_for<T, F>(
        &self,
        preset: Option<&str>,
        desc: Option<&str>,
        probe: F,
    ) -> PaginaResult<T>
    where
        T: Truthy,
        F: FnMut() -> PaginaResult<T>,
    {
        let preset = self.inner.config.preset_or_default(preset)?;
        wait::wait_for(preset.timeout, preset.retry_interval, desc, probe)
    }

    /// Poll `probe` with an explicit timeout and retry interval
    ///
    /// # Errors
    ///
    /// [`PaginaError::WaitTimeout`] at the deadline.
    pub fn wait_with<T, F>(
        &self,
        timeout: Duration,
        retry_interval: Duration,
        desc: Option<&str>,
        probe: F,
    ) -> PaginaResult<T>
    where
        T: Truthy,
        F: FnMut() -> PaginaResult<T>,
    {
        wait::wait_for(timeout, retry_interval, desc, probe)
    }

    /// Navigate to a page and hand it to `body` once its verify-at check
    /// passes.
    ///
    /// The page URL is resolved against the configured base URL before
    /// navigation. Returns the page so the caller can keep interacting with
    /// it.
    ///
    /// # Errors
    ///
    /// [`PaginaError::InvalidUrl`] when resolution fails,
    /// [`PaginaError::WaitTimeout`] when the verify-at check never passes,
    /// plus whatever `body` raises.
    pub fn to<P, F, B>(&self, factory: F, preset: Option<&str>, body: B) -> PaginaResult<P>
    where
        P: Page,
        F: FnOnce(Self) -> P,
        B: FnOnce(&P) -> PaginaResult<()>,
    {
        let page = factory(self.clone());
        let url = self.resolve_url(&page.url())?;
        debug!(%url, page = page.name(), "navigating");
        self.inner.driver.navigate(&url)?;
        self.at_page(page, preset, body)
    }

    /// Hand the current page to `body` once its verify-at check passes,
    /// without navigating first
    ///
    /// # Errors
    ///
    /// [`PaginaError::WaitTimeout`] when the verify-at check never passes,
    /// plus whatever `body` raises.
    pub fn at<P, F, B>(&self, factory: F, preset: Option<&str>, body: B) -> PaginaResult<P>
    where
        P: Page,
        F: FnOnce(Self) -> P,
        B: FnOnce(&P) -> PaginaResult<()>,
    {
        let page = factory(self.clone());
        self.at_page(page, preset, body)
    }

    fn at_page<P, B>(&self, page: P, preset: Option<&str>, body: B) -> PaginaResult<P>
    where
        P: Page,
        B: FnOnce(&P) -> PaginaResult<()>,
    {
        page.verify_at(preset)?;
        body(&page)?;
        Ok(page)
    }

    /// Run `action`, which is expected to open one new tab, then focus the
    /// tab to the right of the current one.
    ///
    /// # Errors
    ///
    /// Driver errors propagate unchanged, including the switch failing when
    /// `action` did not open a tab.
    pub fn with_new_tab<T>(&self, action: impl FnOnce() -> PaginaResult<T>) -> PaginaResult<T> {
        let index = self.current_tab_index()?;
        let value = action()?;
        self.switch_to_tab(index + 1)?;
        Ok(value)
    }

    /// Run `action`, which is expected to close the current tab, then focus
    /// the tab to the left of the closed one.
    ///
    /// # Errors
    ///
    /// Driver errors propagate unchanged; closing the leftmost tab leaves
    /// nothing to focus and is a driver error.
    pub fn with_closed_tab<T>(&self, action: impl FnOnce() -> PaginaResult<T>) -> PaginaResult<T> {
        let index = self.current_tab_index()?;
        let value = action()?;
        let target = index
            .checked_sub(1)
            .ok_or_else(|| PaginaError::driver("closed the leftmost tab, no tab to focus"))?;
        self.switch_to_tab(target)?;
        Ok(value)
    }

    fn current_tab_index(&self) -> PaginaResult<usize> {
        let current = self.inner.driver.current_window()?;
        let handles = self.inner.driver.window_handles()?;
        handles
            .iter()
            .position(|handle| *handle == current)
            .ok_or_else(|| PaginaError::driver("current window is not in the handle list"))
    }

    fn switch_to_tab(&self, index: usize) -> PaginaResult<()> {
        let handles = self.inner.driver.window_handles()?;
        let handle = handles
            .get(index)
            .ok_or_else(|| PaginaError::driver(format!("no tab at index {index}")))?;
        debug!(index, handle, "switching tab");
        self.inner.driver.switch_to_window(handle)
    }

    /// Resolve a page URL against the configured base URL.
    ///
    /// An empty base leaves the URL untouched, and an already-absolute URL
    /// ignores the base.
    fn resolve_url(&self, url: &str) -> PaginaResult<String> {
        let base = &self.inner.config.base_url;
        if base.is_empty() || Url::parse(url).is_ok() {
            return Ok(url.to_string());
        }
        let joined = format!(
            "{}/{}",
            base.trim_end_matches('/'),
            url.trim_start_matches('/')
        );
        let parsed = Url::parse(&joined).map_err(|err| PaginaError::InvalidUrl {
            url: joined.clone(),
            message: err.to_string(),
        })?;
        Ok(parsed.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::driver::Driver;
    use crate::mock::{MockDriver, MockElement};
    use crate::wait::WaitPreset;

    fn init_tracing() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    }

    fn browser_with(mock: &MockDriver, config: Config) -> Browser {
        Browser::new(mock.as_driver(), config)
    }

    #[derive(Debug)]
    struct HomePage {
        browser: Browser,
    }

    impl HomePage {
        fn new(browser: Browser) -> Self {
            Self { browser }
        }

        fn heading(&self) -> PaginaResult<String> {
            self.browser.tag("h1", None)?.text()
        }
    }

    impl Page for HomePage {
        fn browser(&self) -> &Browser {
            &self.browser
        }

        fn url(&self) -> String {
            "home".to_string()
        }

        fn at(&self) -> PaginaResult<bool> {
            Ok(self.browser.current_url()?.ends_with("/home"))
        }

        fn name(&self) -> &str {
            "HomePage"
        }
    }

    #[derive(Debug)]
    struct NeverPage {
        browser: Browser,
    }

    impl Page for NeverPage {
        fn browser(&self) -> &Browser {
            &self.browser
        }

        fn at(&self) -> PaginaResult<bool> {
            Ok(false)
        }

        fn name(&self) -> &str {
            "NeverPage"
        }
    }

    mod content_tests {
        use super::*;

        #[test]
        fn test_css_returns_first_match() {
            let mock = MockDriver::new();
            mock.install(
                Locator::css(".row"),
                vec![MockElement::new("one"), MockElement::new("two")],
            );
            let browser = browser_with(&mock, Config::new());
            assert_eq!(browser.css(".row", None).unwrap().text().unwrap(), "one");
            assert_eq!(browser.css_list(".row", None).unwrap().len(), 2);
        }

        #[test]
        fn test_find_follows_configured_fetch_mode() {
            let mock = MockDriver::new();
            mock.install(Locator::tag("li"), vec![MockElement::new("x")]);

            let single = browser_with(&mock, Config::new());
            assert!(matches!(
                single.find(Locator::tag("li"), None).unwrap(),
                Resolved::Single(_)
            ));

            let list = browser_with(
                &mock,
                Config::new().with_elements_fetch_type(FetchMode::List),
            );
            assert!(matches!(
                list.find(Locator::tag("li"), None).unwrap(),
                Resolved::List(_)
            ));
        }
    }

    mod wait_tests {
        use super::*;
        use std::time::Instant;

        #[test]
        fn test_unknown_preset_fails_without_sleeping() {
            let mock = MockDriver::new();
            let browser = browser_with(&mock, Config::new());
            let start = Instant::now();
            let err = browser
                .wait_for::<bool, _>(Some("nope"), None, || Ok(false))
                .unwrap_err();
            assert!(matches!(err, PaginaError::PresetNotFound { .. }));
            assert!(start.elapsed() < Duration::from_millis(100));
        }

        #[test]
        fn test_named_preset_governs_the_wait() {
            let mock = MockDriver::new();
            let browser = browser_with(
                &mock,
                Config::new().with_preset("quick", WaitPreset::from_secs(0.05, 0.01)),
            );
            let start = Instant::now();
            let err = browser
                .wait_for::<bool, _>(Some("QUICK"), None, || Ok(false))
                .unwrap_err();
            assert!(matches!(err, PaginaError::WaitTimeout { .. }));
            assert!(start.elapsed() < Duration::from_millis(500));
        }

        #[test]
        fn test_wait_with_uses_explicit_timing() {
            let mock = MockDriver::new();
            let browser = browser_with(&mock, Config::new());
            let value = browser
                .wait_with(
                    Duration::from_millis(100),
                    Duration::from_millis(10),
                    None,
                    || Ok(1),
                )
                .unwrap();
            assert_eq!(value, 1);
        }
    }

    mod drive_tests {
        use super::*;

        #[test]
        fn test_drive_quits_after_success() {
            let mock = MockDriver::new();
            let driver = mock.as_driver();
            let value = Browser::drive(driver, Config::new(), |_| Ok(7)).unwrap();
            assert_eq!(value, 7);
            assert!(mock.was_quit());
        }

        #[test]
        fn test_drive_quits_after_failure_and_keeps_the_block_error() {
            let mock = MockDriver::new();
            let driver = mock.as_driver();
            let err = Browser::drive(driver, Config::new(), |_| {
                Err::<(), _>(PaginaError::driver("assertion failed"))
            })
            .unwrap_err();
            assert!(err.to_string().contains("assertion failed"));
            assert!(mock.was_quit());
        }
    }

    mod navigation_tests {
        use super::*;

        fn quick_config() -> Config {
            Config::new()
                .with_base_url("https://example.com")
                .with_default_preset("quick", WaitPreset::from_secs(0.1, 0.02))
        }

        #[test]
        fn test_to_navigates_and_runs_the_body() {
            init_tracing();
            let mock = MockDriver::new();
            mock.install(Locator::tag("h1"), vec![MockElement::new("Welcome")]);
            let browser = browser_with(&mock, quick_config());

            let page = browser
                .to(HomePage::new, None, |page| {
                    assert_eq!(page.heading().unwrap(), "Welcome");
                    Ok(())
                })
                .unwrap();
            assert_eq!(mock.visited(), vec!["https://example.com/home"]);
            assert_eq!(page.heading().unwrap(), "Welcome");
        }

        #[test]
        fn test_at_verifies_without_navigating() {
            let mock = MockDriver::new();
            let browser = browser_with(&mock, quick_config());
            mock.navigate("https://example.com/home").unwrap();

            browser.at(HomePage::new, None, |_| Ok(())).unwrap();
            // only the manual navigation happened
            assert_eq!(mock.visited().len(), 1);
        }

        #[test]
        fn test_failed_at_check_is_a_wait_timeout_naming_the_page() {
            let mock = MockDriver::new();
            let browser = browser_with(&mock, quick_config());
            let err = browser
                .at(|browser| NeverPage { browser }, None, |_| Ok(()))
                .unwrap_err();
            let message = err.to_string();
            assert!(matches!(err, PaginaError::WaitTimeout { .. }));
            assert!(message.contains("at-check of NeverPage"), "{message}");
        }

        #[test]
        fn test_body_error_propagates_after_at_check() {
            let mock = MockDriver::new();
            let browser = browser_with(&mock, quick_config());
            mock.navigate("https://example.com/home").unwrap();
            let err = browser
                .at(HomePage::new, None, |_| {
                    Err(PaginaError::driver("body failed"))
                })
                .unwrap_err();
            assert!(err.to_string().contains("body failed"));
        }
    }

    mod url_tests {
        use super::*;

        #[test]
        fn test_empty_base_leaves_url_untouched() {
            let mock = MockDriver::new();
            let browser = browser_with(&mock, Config::new());
            assert_eq!(browser.resolve_url("login").unwrap(), "login");
        }

        #[test]
        fn test_base_is_prefixed_with_a_single_slash() {
            let mock = MockDriver::new();
            let browser = browser_with(
                &mock,
                Config::new().with_base_url("https://example.com/"),
            );
            assert_eq!(
                browser.resolve_url("/login").unwrap(),
                "https://example.com/login"
            );
        }

        #[test]
        fn test_absolute_url_ignores_the_base() {
            let mock = MockDriver::new();
            let browser = browser_with(
                &mock,
                Config::new().with_base_url("https://example.com"),
            );
            assert_eq!(
                browser.resolve_url("https://other.test/x").unwrap(),
                "https://other.test/x"
            );
        }

        #[test]
        fn test_unparsable_join_is_an_invalid_url_error() {
            let mock = MockDriver::new();
            let browser = browser_with(&mock, Config::new().with_base_url("not a scheme"));
            let err = browser.resolve_url("login").unwrap_err();
            assert!(matches!(err, PaginaError::InvalidUrl { .. }));
        }
    }

    mod tab_tests {
        use super::*;

        #[test]
        fn test_with_new_tab_focuses_the_opened_tab() {
            let mock = MockDriver::new();
            let browser = browser_with(&mock, Config::new());
            let opened = browser
                .with_new_tab(|| {
                    mock.open_tab("popup");
                    Ok("clicked")
                })
                .unwrap();
            assert_eq!(opened, "clicked");
            assert_eq!(mock.current_window().unwrap(), "popup");
        }

        #[test]
        fn test_with_closed_tab_focuses_the_tab_to_the_left() {
            let mock = MockDriver::new();
            mock.open_tab("popup");
            mock.switch_to_window("popup").unwrap();
            let browser = browser_with(&mock, Config::new());
            browser
                .with_closed_tab(|| {
                    mock.close_tab("popup");
                    Ok(())
                })
                .unwrap();
            assert_eq!(mock.current_window().unwrap(), "main");
        }

        #[test]
        fn test_closing_the_leftmost_tab_is_an_error() {
            let mock = MockDriver::new();
            let browser = browser_with(&mock, Config::new());
            let err = browser.with_closed_tab(|| Ok(())).unwrap_err();
            assert!(matches!(err, PaginaError::Driver { .. }));
        }

        #[test]
        fn test_with_new_tab_without_an_opened_tab_is_an_error() {
            let mock = MockDriver::new();
            let browser = browser_with(&mock, Config::new());
            let err = browser.with_new_tab(|| Ok(())).unwrap_err();
            assert!(err.to_string().contains("no tab at index"));
        }
    }
}
