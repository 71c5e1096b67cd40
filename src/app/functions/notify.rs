//! Einzel-Abonnent-Benachrichtigung bei Änderungen einer Funktion.

use std::fmt;

/// Callback-Slot für den Host plus Revisionszähler.
///
/// Jede Mutation einer Funktion erhöht die Revision und ruft den Callback auf.
/// Es gibt höchstens einen Abonnenten (den Host-Chart).
#[derive(Default)]
pub struct ChangeNotifier {
    callback: Option<Box<dyn FnMut()>>,
    revision: u64,
}

impl ChangeNotifier {
    /// Erstellt einen Notifier ohne Abonnenten.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registriert den Callback; ein vorheriger wird ersetzt.
    pub fn subscribe(&mut self, callback: impl FnMut() + 'static) {
        self.callback = Some(Box::new(callback));
    }

    /// Entfernt den Callback.
    pub fn unsubscribe(&mut self) {
        self.callback = None;
    }

    /// `true` wenn ein Callback registriert ist
    pub fn has_subscriber(&self) -> bool {
        self.callback.is_some()
    }

    /// Meldet eine Änderung.
    pub fn notify(&mut self) {
        self.revision = self.revision.wrapping_add(1);
        if let Some(callback) = self.callback.as_mut() {
            callback();
        }
    }

    /// Anzahl bisher gemeldeter Änderungen
    pub fn revision(&self) -> u64 {
        self.revision
    }
}

impl fmt::Debug for ChangeNotifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChangeNotifier")
            .field("subscribed", &self.callback.is_some())
            .field("revision", &self.revision)
            .finish()
    }
}
