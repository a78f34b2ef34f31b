//! Plugin list as given in configuration: a single plugin or a sequence of them.

use std::fmt;
use std::sync::Arc;

use skellington_core::Plugin;

/// Ordered plugins. Order is the display order of `help`.
#[derive(Clone, Default)]
pub struct Plugins(Vec<Arc<dyn Plugin>>);

impl Plugins {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, plugin: Arc<dyn Plugin>) {
        self.0.push(plugin);
    }

    pub fn as_slice(&self) -> &[Arc<dyn Plugin>] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Arc<dyn Plugin>> for Plugins {
    fn from(plugin: Arc<dyn Plugin>) -> Self {
        Self(vec![plugin])
    }
}

impl From<Vec<Arc<dyn Plugin>>> for Plugins {
    fn from(plugins: Vec<Arc<dyn Plugin>>) -> Self {
        Self(plugins)
    }
}

impl FromIterator<Arc<dyn Plugin>> for Plugins {
    fn from_iter<I: IntoIterator<Item = Arc<dyn Plugin>>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl fmt::Debug for Plugins {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.0.iter().map(|p| p.name()))
            .finish()
    }
}
