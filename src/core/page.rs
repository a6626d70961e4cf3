//! The host page the controller drives.
//!
//! A page is a set of elements addressed by id: currency selectors, flag
//! images, the amount input, the result text and the chart canvas. Selection
//! state lives here and nowhere else; workflows read it back on every trigger.

use crate::core::error::PageError;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

pub const FROM: &str = "from";
pub const TO: &str = "to";
pub const FROM_FLAG: &str = "from-flag";
pub const TO_FLAG: &str = "to-flag";
pub const AMOUNT: &str = "amount";
pub const RESULT: &str = "result";
pub const FROM_CHART: &str = "fromChart";
pub const TO_CHART: &str = "toChart";
pub const FROM_CHART_FLAG: &str = "from-chart-flag";
pub const TO_CHART_FLAG: &str = "to-chart-flag";
pub const RATE_CHART: &str = "rateChart";

/// Invoked after the user changes a selector.
pub type ChangeListener = Arc<dyn Fn(&mut dyn Page) + Send + Sync>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectOption {
    pub label: String,
    pub value: String,
}

impl SelectOption {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }
}

/// Drawing surface handed to the chart renderer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanvasContext {
    pub canvas_id: String,
}

pub trait Page: Send {
    fn has_element(&self, id: &str) -> bool;

    fn add_option(&mut self, select_id: &str, option: SelectOption) -> Result<(), PageError>;

    fn options(&self, select_id: &str) -> Result<Vec<SelectOption>, PageError>;

    /// Current value of a selector or input.
    fn value(&self, id: &str) -> Result<String, PageError>;

    /// Programmatic assignment. Does not notify change listeners.
    fn set_value(&mut self, id: &str, value: &str) -> Result<(), PageError>;

    fn image_source(&self, id: &str) -> Result<Option<String>, PageError>;

    fn set_image_source(&mut self, id: &str, src: &str) -> Result<(), PageError>;

    fn text(&self, id: &str) -> Result<String, PageError>;

    fn set_text(&mut self, id: &str, text: &str) -> Result<(), PageError>;

    fn context(&self, canvas_id: &str) -> Result<CanvasContext, PageError>;

    fn add_change_listener(
        &mut self,
        select_id: &str,
        listener: ChangeListener,
    ) -> Result<(), PageError>;

    fn change_listeners(&self, select_id: &str) -> Vec<ChangeListener>;

    /// Blocking user-facing message.
    fn alert(&mut self, message: &str);
}

/// Simulates the user picking `value` in a selector: assigns it, then
/// dispatches every change listener registered on that selector.
pub fn choose(page: &mut dyn Page, select_id: &str, value: &str) -> Result<(), PageError> {
    page.set_value(select_id, value)?;
    let listeners = page.change_listeners(select_id);
    debug!(select_id, value, listeners = listeners.len(), "Dispatching change");
    for listener in listeners {
        listener(&mut *page);
    }
    Ok(())
}

#[derive(Debug, Clone)]
enum Element {
    Select {
        options: Vec<SelectOption>,
        value: String,
    },
    Image {
        src: Option<String>,
    },
    Input {
        value: String,
    },
    Text {
        content: String,
    },
    Canvas,
}

/// In-memory page used by the command line and in tests.
#[derive(Default)]
pub struct MemoryPage {
    elements: HashMap<String, Element>,
    listeners: HashMap<String, Vec<ChangeListener>>,
    alerts: Vec<String>,
}

impl MemoryPage {
    pub fn new() -> Self {
        Self::default()
    }

    /// A page carrying every element of both the converter and the chart view.
    pub fn standard() -> Self {
        let mut page = Self::new();
        page.add_converter_elements();
        page.add_chart_elements();
        page
    }

    pub fn add_converter_elements(&mut self) -> &mut Self {
        self.with_select(FROM)
            .with_select(TO)
            .with_image(FROM_FLAG)
            .with_image(TO_FLAG)
            .with_input(AMOUNT)
            .with_text(RESULT)
    }

    pub fn add_chart_elements(&mut self) -> &mut Self {
        self.with_select(FROM_CHART)
            .with_select(TO_CHART)
            .with_image(FROM_CHART_FLAG)
            .with_image(TO_CHART_FLAG)
            .with_canvas(RATE_CHART)
    }

    pub fn with_select(&mut self, id: &str) -> &mut Self {
        self.insert(
            id,
            Element::Select {
                options: Vec::new(),
                value: String::new(),
            },
        )
    }

    pub fn with_image(&mut self, id: &str) -> &mut Self {
        self.insert(id, Element::Image { src: None })
    }

    pub fn with_input(&mut self, id: &str) -> &mut Self {
        self.insert(
            id,
            Element::Input {
                value: String::new(),
            },
        )
    }

    pub fn with_text(&mut self, id: &str) -> &mut Self {
        self.insert(
            id,
            Element::Text {
                content: String::new(),
            },
        )
    }

    pub fn with_canvas(&mut self, id: &str) -> &mut Self {
        self.insert(id, Element::Canvas)
    }

    fn insert(&mut self, id: &str, element: Element) -> &mut Self {
        self.elements.insert(id.to_string(), element);
        self
    }

    pub fn alerts(&self) -> &[String] {
        &self.alerts
    }

    pub fn take_alerts(&mut self) -> Vec<String> {
        std::mem::take(&mut self.alerts)
    }

    fn element(&self, id: &str) -> Result<&Element, PageError> {
        self.elements
            .get(id)
            .ok_or_else(|| PageError::MissingElement(id.to_string()))
    }

    fn element_mut(&mut self, id: &str) -> Result<&mut Element, PageError> {
        self.elements
            .get_mut(id)
            .ok_or_else(|| PageError::MissingElement(id.to_string()))
    }
}

fn wrong_kind(id: &str, expected: &'static str) -> PageError {
    PageError::WrongKind {
        id: id.to_string(),
        expected,
    }
}

impl Page for MemoryPage {
    fn has_element(&self, id: &str) -> bool {
        self.elements.contains_key(id)
    }

    fn add_option(&mut self, select_id: &str, option: SelectOption) -> Result<(), PageError> {
        match self.element_mut(select_id)? {
            Element::Select { options, value } => {
                // A select with no explicit value shows its first option.
                if options.is_empty() {
                    *value = option.value.clone();
                }
                options.push(option);
                Ok(())
            }
            _ => Err(wrong_kind(select_id, "select")),
        }
    }

    fn options(&self, select_id: &str) -> Result<Vec<SelectOption>, PageError> {
        match self.element(select_id)? {
            Element::Select { options, .. } => Ok(options.clone()),
            _ => Err(wrong_kind(select_id, "select")),
        }
    }

    fn value(&self, id: &str) -> Result<String, PageError> {
        match self.element(id)? {
            Element::Select { value, .. } | Element::Input { value } => Ok(value.clone()),
            _ => Err(wrong_kind(id, "input")),
        }
    }

    fn set_value(&mut self, id: &str, new_value: &str) -> Result<(), PageError> {
        match self.element_mut(id)? {
            Element::Select { options, value } => {
                // Values outside the option list leave the selector blank.
                *value = if options.iter().any(|o| o.value == new_value) {
                    new_value.to_string()
                } else {
                    String::new()
                };
                Ok(())
            }
            Element::Input { value } => {
                *value = new_value.to_string();
                Ok(())
            }
            _ => Err(wrong_kind(id, "select")),
        }
    }

    fn image_source(&self, id: &str) -> Result<Option<String>, PageError> {
        match self.element(id)? {
            Element::Image { src } => Ok(src.clone()),
            _ => Err(wrong_kind(id, "image")),
        }
    }

    fn set_image_source(&mut self, id: &str, new_src: &str) -> Result<(), PageError> {
        match self.element_mut(id)? {
            Element::Image { src } => {
                *src = Some(new_src.to_string());
                Ok(())
            }
            _ => Err(wrong_kind(id, "image")),
        }
    }

    fn text(&self, id: &str) -> Result<String, PageError> {
        match self.element(id)? {
            Element::Text { content } => Ok(content.clone()),
            _ => Err(wrong_kind(id, "text")),
        }
    }

    fn set_text(&mut self, id: &str, text: &str) -> Result<(), PageError> {
        match self.element_mut(id)? {
            Element::Text { content } => {
                *content = text.to_string();
                Ok(())
            }
            _ => Err(wrong_kind(id, "text")),
        }
    }

    fn context(&self, canvas_id: &str) -> Result<CanvasContext, PageError> {
        match self.element(canvas_id)? {
            Element::Canvas => Ok(CanvasContext {
                canvas_id: canvas_id.to_string(),
            }),
            _ => Err(wrong_kind(canvas_id, "canvas")),
        }
    }

    fn add_change_listener(
        &mut self,
        select_id: &str,
        listener: ChangeListener,
    ) -> Result<(), PageError> {
        if !matches!(self.element(select_id)?, Element::Select { .. }) {
            return Err(wrong_kind(select_id, "select"));
        }
        self.listeners
            .entry(select_id.to_string())
            .or_default()
            .push(listener);
        Ok(())
    }

    fn change_listeners(&self, select_id: &str) -> Vec<ChangeListener> {
        self.listeners.get(select_id).cloned().unwrap_or_default()
    }

    fn alert(&mut self, message: &str) {
        debug!(message, "Alert raised");
        self.alerts.push(message.to_string());
    }
}
