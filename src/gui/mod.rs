//! Interactive GUI for tubegrab (eframe/egui)

pub mod app;
pub mod thumbnail;

pub use app::GrabApp;

use once_cell::sync::OnceCell;
use std::sync::Arc;
use tokio::runtime::Runtime;

static RUNTIME: OnceCell<Arc<Runtime>> = OnceCell::new();

/// Shared tokio runtime for background probe/download work.
///
/// Created on first use; the GUI event loop itself stays synchronous.
pub fn runtime() -> &'static Arc<Runtime> {
    RUNTIME.get_or_init(|| Arc::new(Runtime::new().expect("failed to start tokio runtime")))
}
