//! Route transitions requested by the engine

use std::cell::RefCell;
use std::rc::Rc;

/// One-shot navigation by path
pub trait Navigator {
    fn navigate(&mut self, path: &str);
}

/// Logs the request and stays put (native, tests)
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNavigator;

impl Navigator for LogNavigator {
    fn navigate(&mut self, path: &str) {
        log::info!("Navigation requested: {path}");
    }
}

impl<N: Navigator> Navigator for Rc<RefCell<N>> {
    fn navigate(&mut self, path: &str) {
        self.borrow_mut().navigate(path);
    }
}

/// Remembers requested paths
impl Navigator for Vec<String> {
    fn navigate(&mut self, path: &str) {
        self.push(path.to_string());
    }
}

#[cfg(target_arch = "wasm32")]
pub use web::LocationNavigator;

#[cfg(target_arch = "wasm32")]
mod web {
    use super::Navigator;

    /// `window.location.assign(path)`
    #[derive(Debug, Default, Clone, Copy)]
    pub struct LocationNavigator;

    impl Navigator for LocationNavigator {
        fn navigate(&mut self, path: &str) {
            let Some(window) = web_sys::window() else {
                return;
            };
            if let Err(e) = window.location().assign(path) {
                log::warn!("Navigation to {path} failed: {e:?}");
            }
        }
    }
}
