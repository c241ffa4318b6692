use crate::generator::Generator;
use crate::messages::Locale;
use crate::options::{GeneratorOptions, Strategy};
use crate::viewer::Viewer;
use tracing::debug;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Tab {
    #[default]
    Create,
    Check,
}

/// Top-level state: which view is active plus the state of both views.
///
/// Switching tabs touches nothing but the active tab, so work started in one view
/// can still be resolved after the user moved to the other.
#[derive(Debug, Default)]
pub struct Editor {
    active: Tab,
    pub generator: Generator,
    pub viewer: Viewer,
}

impl Editor {
    pub fn new(options: GeneratorOptions, strategy: Strategy, locale: Locale) -> Self {
        Self {
            active: Tab::Create,
            generator: Generator::new(options, strategy, locale),
            viewer: Viewer::new(locale),
        }
    }

    pub fn active(&self) -> Tab {
        self.active
    }

    pub fn select(&mut self, tab: Tab) {
        if self.active != tab {
            debug!(from = ?self.active, to = ?tab, "switching tab");
            self.active = tab;
        }
    }
}
