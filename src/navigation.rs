//! Navigation seam used to realize a redirect decision.

use std::sync::Mutex;

/// Redirect primitive of the host router.
///
/// Implementations are expected to stop the current render once called; the
/// gate never renders children on the redirect branch regardless.
pub trait Navigator {
    fn redirect(&self, path: &str);
}

impl<N: Navigator + ?Sized> Navigator for &N {
    fn redirect(&self, path: &str) {
        (**self).redirect(path);
    }
}

/// Navigator that records every redirect instead of performing it.
///
/// Useful for hosts that resolve navigation after the render pass, and in tests.
#[derive(Debug, Default)]
pub struct RecordingNavigator {
    redirects: Mutex<Vec<String>>,
}

impl RecordingNavigator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Paths redirected to so far, oldest first.
    #[must_use]
    pub fn redirects(&self) -> Vec<String> {
        self.redirects
            .lock()
            .map(|redirects| redirects.clone())
            .unwrap_or_default()
    }
}

impl Navigator for RecordingNavigator {
    fn redirect(&self, path: &str) {
        if let Ok(mut redirects) = self.redirects.lock() {
            redirects.push(path.to_string());
        }
    }
}
