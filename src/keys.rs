//! Scoped key listeners for transient overlays.
//!
//! An overlay that wants keyboard input while it is visible installs a
//! listener on the shared [`KeyRouter`] and keeps the returned
//! [`KeyListener`] for as long as it is shown. Dropping the listener removes
//! it, so a closed or torn-down overlay can never keep receiving keys. Keys
//! are routed to the most recently installed listener only.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

/// Overlays that can claim the keyboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Overlay {
    Lightbox,
    Help,
}

#[derive(Debug, Default)]
struct Registry {
    next_id: u64,
    stack: Vec<(u64, Overlay)>,
}

/// Shared registry of installed listeners. Cloning shares the registry.
#[derive(Debug, Clone, Default)]
pub struct KeyRouter {
    registry: Rc<RefCell<Registry>>,
}

impl KeyRouter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install a listener for `overlay` on top of the stack.
    pub fn install(&self, overlay: Overlay) -> KeyListener {
        let mut registry = self.registry.borrow_mut();
        registry.next_id += 1;
        let id = registry.next_id;
        registry.stack.push((id, overlay));
        log::debug!("Key listener {id} installed for {overlay:?}");
        KeyListener {
            id,
            overlay,
            registry: Rc::downgrade(&self.registry),
        }
    }

    /// The overlay keys should currently go to.
    pub fn topmost(&self) -> Option<Overlay> {
        self.registry.borrow().stack.last().map(|(_, overlay)| *overlay)
    }

    pub fn is_installed(&self, overlay: Overlay) -> bool {
        self.registry
            .borrow()
            .stack
            .iter()
            .any(|(_, installed)| *installed == overlay)
    }

    pub fn len(&self) -> usize {
        self.registry.borrow().stack.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Handle for an installed listener; uninstalls itself on drop.
#[derive(Debug)]
pub struct KeyListener {
    id: u64,
    overlay: Overlay,
    registry: Weak<RefCell<Registry>>,
}

impl KeyListener {
    pub fn overlay(&self) -> Overlay {
        self.overlay
    }
}

impl Drop for KeyListener {
    fn drop(&mut self) {
        if let Some(registry) = self.registry.upgrade() {
            registry.borrow_mut().stack.retain(|(id, _)| *id != self.id);
            log::debug!("Key listener {} removed", self.id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_install_and_drop() {
        let router = KeyRouter::new();
        assert!(router.is_empty());

        let listener = router.install(Overlay::Lightbox);
        assert_eq!(router.topmost(), Some(Overlay::Lightbox));
        assert_eq!(listener.overlay(), Overlay::Lightbox);

        drop(listener);
        assert!(router.is_empty());
        assert_eq!(router.topmost(), None);
    }

    #[test]
    fn test_topmost_wins() {
        let router = KeyRouter::new();
        let lightbox = router.install(Overlay::Lightbox);
        let help = router.install(Overlay::Help);
        assert_eq!(router.topmost(), Some(Overlay::Help));

        drop(help);
        assert_eq!(router.topmost(), Some(Overlay::Lightbox));
        drop(lightbox);
    }

    #[test]
    fn test_out_of_order_removal() {
        let router = KeyRouter::new();
        let lightbox = router.install(Overlay::Lightbox);
        let help = router.install(Overlay::Help);

        drop(lightbox);
        assert_eq!(router.len(), 1);
        assert_eq!(router.topmost(), Some(Overlay::Help));
        assert!(!router.is_installed(Overlay::Lightbox));
        drop(help);
    }

    #[test]
    fn test_listener_outliving_router() {
        let router = KeyRouter::new();
        let listener = router.install(Overlay::Help);
        drop(router);
        drop(listener);
    }
}
