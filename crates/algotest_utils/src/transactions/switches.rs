//! Thread-scoped behavior switches.
//!
//! Every transaction operation declares per-call defaults for the five
//! pipeline switches; a scope guard can override them for the duration of a
//! block. Overrides are thread-local, so concurrently running tests never
//! observe each other's scopes. Guards save the previous override and put it
//! back on drop, which makes nesting and unwinding both behave: an inner
//! scope restores the outer scope's value, and a panic restores whatever was
//! active before the scope.

use std::cell::Cell;

/// The switch overrides active on this thread; `None` means "inherit the
/// operation's declared default".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct SwitchOverrides {
    pub no_log: Option<bool>,
    pub no_params: Option<bool>,
    pub no_send: Option<bool>,
    pub no_sign: Option<bool>,
    pub with_txn_id: Option<bool>,
}

thread_local! {
    static OVERRIDES: Cell<SwitchOverrides> = const {
        Cell::new(SwitchOverrides {
            no_log: None,
            no_params: None,
            no_send: None,
            no_sign: None,
            with_txn_id: None,
        })
    };
}

pub(crate) fn overrides() -> SwitchOverrides {
    OVERRIDES.get()
}

fn update(f: impl FnOnce(&mut SwitchOverrides)) {
    let mut current = OVERRIDES.get();
    f(&mut current);
    OVERRIDES.set(current);
}

/// While alive, every operation builds and returns its unsent
/// (signer, payload) element instead of submitting, and stays quiet.
///
/// This is how group transactions are assembled out of ordinary operation
/// calls:
///
/// ```no_run
/// # use algotest_utils::transactions::TxnElemsScope;
/// let scope = TxnElemsScope::new();
/// // ... collect unsent elements from operation calls ...
/// drop(scope);
/// // ... hand the elements to group_transaction ...
/// ```
pub struct TxnElemsScope {
    saved_no_send: Option<bool>,
    saved_no_log: Option<bool>,
}

impl TxnElemsScope {
    pub fn new() -> Self {
        let previous = overrides();
        update(|o| {
            o.no_send = Some(true);
            o.no_log = Some(true);
        });
        TxnElemsScope {
            saved_no_send: previous.no_send,
            saved_no_log: previous.no_log,
        }
    }
}

impl Default for TxnElemsScope {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for TxnElemsScope {
    fn drop(&mut self) {
        let saved_no_send = self.saved_no_send;
        let saved_no_log = self.saved_no_log;
        update(|o| {
            o.no_send = saved_no_send;
            o.no_log = saved_no_log;
        });
    }
}

/// While alive, every operation also reports the submitted transaction id.
pub struct TxnIdScope {
    saved_with_txn_id: Option<bool>,
}

impl TxnIdScope {
    pub fn new() -> Self {
        let previous = overrides();
        update(|o| o.with_txn_id = Some(true));
        TxnIdScope {
            saved_with_txn_id: previous.with_txn_id,
        }
    }
}

impl Default for TxnIdScope {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for TxnIdScope {
    fn drop(&mut self) {
        let saved = self.saved_with_txn_id;
        update(|o| o.with_txn_id = saved);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scope_sets_and_restores() {
        assert_eq!(overrides().no_send, None);
        {
            let _scope = TxnElemsScope::new();
            assert_eq!(overrides().no_send, Some(true));
            assert_eq!(overrides().no_log, Some(true));
        }
        assert_eq!(overrides().no_send, None);
        assert_eq!(overrides().no_log, None);
    }

    #[test]
    fn test_nested_scopes_restore_the_outer_value() {
        let outer = TxnElemsScope::new();
        assert_eq!(overrides().no_send, Some(true));
        {
            let _inner = TxnElemsScope::new();
            assert_eq!(overrides().no_send, Some(true));
        }
        // The inner scope's exit must keep the outer scope active.
        assert_eq!(overrides().no_send, Some(true));
        drop(outer);
        assert_eq!(overrides().no_send, None);
    }

    #[test]
    fn test_scope_restores_on_panic() {
        let result = std::panic::catch_unwind(|| {
            let _scope = TxnIdScope::new();
            panic!("boom");
        });
        assert!(result.is_err());
        assert_eq!(overrides().with_txn_id, None);
    }

    #[test]
    fn test_independent_switches_do_not_interfere() {
        let _elems = TxnElemsScope::new();
        {
            let _id = TxnIdScope::new();
            assert_eq!(overrides().no_send, Some(true));
            assert_eq!(overrides().with_txn_id, Some(true));
        }
        assert_eq!(overrides().no_send, Some(true));
        assert_eq!(overrides().with_txn_id, None);
    }
}
