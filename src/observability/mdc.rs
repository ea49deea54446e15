//! Mapped diagnostic context.
//!
//! # Responsibilities
//! - Hold the ambient key/value pairs of the current thread
//! - Open and close logging scopes that own a subset of those pairs
//! - Emit "Started {action}" / "Finished {action}" records per scope
//!
//! # Design Decisions
//! - One store per thread, empty on first use, gone when the thread ends
//! - `MdcScope` is `!Send`: it must be closed on the thread that opened it
//! - Cleanup runs in `Drop`, so `?`, early returns and panics all close
//! - Scopes nest LIFO; closing out of order is a caller bug, not detected
//! - An inner scope reusing an outer key removes that key on close
//! - Scope records take the opening module as their `tracing` target

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fmt;
use std::marker::PhantomData;

thread_local! {
    static CONTEXT: RefCell<BTreeMap<String, String>> = const { RefCell::new(BTreeMap::new()) };
}

/// Set `key` to `value` in the current thread's context.
pub fn insert(key: impl Into<String>, value: impl Into<String>) {
    let (key, value) = (key.into(), value.into());
    CONTEXT.with(|ctx| {
        ctx.borrow_mut().insert(key, value);
    });
}

/// Remove `key` from the current thread's context. Absent keys are ignored.
pub fn remove(key: &str) {
    CONTEXT.with(|ctx| {
        ctx.borrow_mut().remove(key);
    });
}

/// Current value of `key` on this thread, if set.
pub fn get(key: &str) -> Option<String> {
    CONTEXT.with(|ctx| ctx.borrow().get(key).cloned())
}

/// Copy of every pair currently set on this thread, ordered by key.
pub fn snapshot() -> BTreeMap<String, String> {
    CONTEXT.with(|ctx| ctx.borrow().clone())
}

/// Whether this thread's context holds no pairs.
pub fn is_empty() -> bool {
    CONTEXT.with(|ctx| ctx.borrow().is_empty())
}

/// Drop every pair from this thread's context.
pub fn clear() {
    CONTEXT.with(|ctx| ctx.borrow_mut().clear());
}

/// Severity a scope logs its start/finish records at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeLevel {
    /// Routed to `INFO`.
    Info,
    /// Routed to `DEBUG`.
    Debug,
}

/// Sink for a scope's start/finish records.
///
/// [`mdc_scope!`] generates one per callsite so the records carry the
/// caller's module as their `tracing` target.
///
/// [`mdc_scope!`]: crate::mdc_scope
pub type Emit = fn(ScopeLevel, fmt::Arguments<'_>);

/// Open an [`MdcScope`] whose records are emitted under the calling module's
/// target.
///
/// ```no_run
/// use notes_service::mdc_scope;
/// use notes_service::observability::mdc;
///
/// let mut scope = mdc_scope!(info, "importing notes", "source" => "backup.json");
/// scope.put("count", "12");
/// assert_eq!(mdc::get("count").as_deref(), Some("12"));
/// drop(scope);
/// assert!(mdc::get("source").is_none());
/// ```
#[macro_export]
macro_rules! mdc_scope {
    (info, $action:expr $(, $key:expr => $value:expr)* $(,)?) => {
        $crate::mdc_scope!(@begin Info, $action $(, $key => $value)*)
    };
    (debug, $action:expr $(, $key:expr => $value:expr)* $(,)?) => {
        $crate::mdc_scope!(@begin Debug, $action $(, $key => $value)*)
    };
    (@begin $level:ident, $action:expr $(, $key:expr => $value:expr)*) => {{
        fn emit(level: $crate::observability::ScopeLevel, message: ::std::fmt::Arguments<'_>) {
            match level {
                $crate::observability::ScopeLevel::Info => {
                    $crate::__private::tracing::info!(target: module_path!(), "{}", message)
                }
                $crate::observability::ScopeLevel::Debug => {
                    $crate::__private::tracing::debug!(target: module_path!(), "{}", message)
                }
            }
        }
        $crate::observability::MdcScope::begin(
            emit,
            $crate::observability::ScopeLevel::$level,
            $action,
            &[$(($key, ::std::convert::AsRef::<str>::as_ref(&$value))),*],
        )
    }};
}

/// A logging scope over the thread's diagnostic context.
///
/// Every key written through the scope (at construction or via [`put`]) is
/// removed again when the scope is dropped, right after the "Finished" record
/// is emitted. Usually opened with [`mdc_scope!`].
///
/// [`put`]: MdcScope::put
/// [`mdc_scope!`]: crate::mdc_scope
#[must_use = "the scope closes as soon as it is dropped"]
pub struct MdcScope {
    emit: Emit,
    level: ScopeLevel,
    action: String,
    keys: Vec<String>,
    _not_send: PhantomData<*const ()>,
}

impl MdcScope {
    /// Open a scope, writing `pairs` to the context before the "Started" record.
    pub fn begin(
        emit: Emit,
        level: ScopeLevel,
        action: impl Into<String>,
        pairs: &[(&str, &str)],
    ) -> Self {
        let mut scope = Self {
            emit,
            level,
            action: action.into(),
            keys: Vec::with_capacity(pairs.len()),
            _not_send: PhantomData,
        };
        for (key, value) in pairs {
            scope.put(*key, *value);
        }
        scope.log("Started");
        scope
    }

    /// Write a pair to the context and remove it again when this scope closes.
    pub fn put(&mut self, key: impl Into<String>, value: impl Into<String>) -> &mut Self {
        let key = key.into();
        insert(key.clone(), value);
        self.keys.push(key);
        self
    }

    pub fn action(&self) -> &str {
        &self.action
    }

    pub fn level(&self) -> ScopeLevel {
        self.level
    }

    /// Keys this scope wrote, in insertion order.
    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    /// Close the scope now instead of at the end of the enclosing block.
    pub fn close(self) {}

    fn log(&self, phase: &str) {
        (self.emit)(self.level, format_args!("{} {}", phase, self.action));
    }
}

impl fmt::Debug for MdcScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MdcScope")
            .field("level", &self.level)
            .field("action", &self.action)
            .field("keys", &self.keys)
            .finish()
    }
}

impl Drop for MdcScope {
    fn drop(&mut self) {
        self.log("Finished");
        for key in &self.keys {
            remove(key);
        }
    }
}
