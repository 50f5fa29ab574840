use std::sync::Arc;

use services::{Clock, TreatmentService};

pub trait UiApp: Send + Sync {
    fn clock(&self) -> Clock;
    fn treatments(&self) -> Arc<TreatmentService>;
}

#[derive(Clone)]
pub struct AppContext {
    clock: Clock,
    treatments: Arc<TreatmentService>,
}

impl AppContext {
    #[must_use]
    pub fn new(app: &Arc<dyn UiApp>) -> Self {
        Self {
            clock: app.clock(),
            treatments: app.treatments(),
        }
    }

    #[must_use]
    pub fn clock(&self) -> Clock {
        self.clock
    }

    #[must_use]
    pub fn treatments(&self) -> Arc<TreatmentService> {
        Arc::clone(&self.treatments)
    }
}

// This context is provided by the application composition root (`crates/app`).

/// Build an `AppContext` from a UI-facing app implementation.
#[must_use]
pub fn build_app_context(app: &Arc<dyn UiApp>) -> AppContext {
    AppContext::new(app)
}
