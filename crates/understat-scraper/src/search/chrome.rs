//! [`BrowserDriver`] backed by a local Chrome/Chromium via `headless_chrome`.

use std::sync::Arc;

use headless_chrome::browser::tab::NoElementFound;
use headless_chrome::{Browser, Element, LaunchOptions, Tab};

use super::driver::{BrowserDriver, DriverSession, ElementSnapshot};
use crate::error::DriverError;

/// Launches a fresh browser process for every session.
#[derive(Debug, Clone, Copy)]
pub struct ChromeDriver {
    headless: bool,
}

impl ChromeDriver {
    #[must_use]
    pub fn new(headless: bool) -> Self {
        Self { headless }
    }
}

impl Default for ChromeDriver {
    fn default() -> Self {
        Self::new(true)
    }
}

impl BrowserDriver for ChromeDriver {
    type Session = ChromeSession;

    fn open(&self) -> Result<ChromeSession, DriverError> {
        let options = LaunchOptions::default_builder()
            .headless(self.headless)
            .build()
            .map_err(|e| DriverError::new("launch", e))?;
        let browser = Browser::new(options).map_err(|e| DriverError::new("launch", e))?;
        let tab = browser
            .new_tab()
            .map_err(|e| DriverError::new("open tab", e))?;
        tracing::debug!(headless = self.headless, "browser session started");
        Ok(ChromeSession {
            _browser: browser,
            tab,
        })
    }
}

/// One browser process and the tab the search runs in.
pub struct ChromeSession {
    // Dropping the browser kills the process, so it lives as long as the tab.
    _browser: Browser,
    tab: Arc<Tab>,
}

impl ChromeSession {
    fn element(&self, action: &'static str, selector: &str) -> Result<Element<'_>, DriverError> {
        self.tab
            .find_element(selector)
            .map_err(|e| DriverError::new(action, format!("{selector}: {e}")))
    }
}

impl DriverSession for ChromeSession {
    fn navigate(&mut self, url: &str) -> Result<(), DriverError> {
        self.tab
            .navigate_to(url)
            .and_then(|tab| tab.wait_until_navigated())
            .map_err(|e| DriverError::new("navigate", format!("{url}: {e}")))?;
        Ok(())
    }

    fn submit_text(&mut self, selector: &str, text: &str) -> Result<(), DriverError> {
        let input = self.element("type", selector)?;
        input
            .call_js_fn("function() { this.value = ''; }", vec![], false)
            .and_then(|_| input.click())
            .and_then(|input| input.type_into(text))
            .map_err(|e| DriverError::new("type", format!("{selector}: {e}")))?;
        Ok(())
    }

    fn click(&mut self, selector: &str) -> Result<(), DriverError> {
        self.element("click", selector)?
            .click()
            .map_err(|e| DriverError::new("click", format!("{selector}: {e}")))?;
        Ok(())
    }

    fn query_all(&mut self, selector: &str) -> Result<Vec<ElementSnapshot>, DriverError> {
        let elements = match self.tab.find_elements(selector) {
            Ok(elements) => elements,
            Err(e) if e.downcast_ref::<NoElementFound>().is_some() => return Ok(Vec::new()),
            Err(e) => return Err(DriverError::new("query", format!("{selector}: {e}"))),
        };

        elements
            .iter()
            .map(|element| {
                snapshot(element).map_err(|e| DriverError::new("read", format!("{selector}: {e}")))
            })
            .collect()
    }

    fn close(&mut self) -> Result<(), DriverError> {
        self.tab
            .close(true)
            .map_err(|e| DriverError::new("close", e))?;
        Ok(())
    }
}

fn snapshot(element: &Element<'_>) -> anyhow::Result<ElementSnapshot> {
    let text = element.get_inner_text()?;
    let link = match element.get_attribute_value("href")? {
        Some(href) => Some(href),
        None => match element.find_element("a") {
            Ok(anchor) => anchor.get_attribute_value("href")?,
            Err(_) => None,
        },
    };
    Ok(ElementSnapshot::new(text, link))
}
