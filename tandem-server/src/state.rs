use anyhow::Result;
use tandem_core::household::Household;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    // We reload the household on each request to pick up filesystem changes
    // In the future, could add caching with file watching
}

impl AppState {
    pub fn new() -> Result<Self> {
        // Verify the household can be loaded at startup
        let _ = Household::load()?;
        Ok(AppState {})
    }

    pub fn household(&self) -> Result<Household> {
        Ok(Household::load()?)
    }
}
