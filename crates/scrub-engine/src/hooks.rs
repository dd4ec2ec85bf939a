//! Caller-supplied hook functions and their dispatch.
//!
//! A hook takes the current record and history and returns replacements
//! for both; the pipeline adopts whatever comes back, so hook effects are
//! fully visible to subsequent rules and hooks. Hooks are registered by
//! position token and validated at profile construction; behavior is not
//! checked, so a malformed hook surfaces only when invoked.

use indexmap::IndexMap;

use scrub_model::{ChangeHistory, HookPosition, Record, Violation};

use crate::error::EngineError;

/// Error type a hook may fail with; propagated unmodified inside
/// [`EngineError::Hook`].
pub type HookError = Box<dyn std::error::Error + Send + Sync + 'static>;

pub type HookResult = Result<(Record, ChangeHistory), HookError>;

pub type HookFn = Box<dyn Fn(Record, ChangeHistory) -> HookResult>;

/// Raw hook registrations, keyed by position token. Tokens are checked
/// against the hook-position vocabulary when the profile is built.
#[derive(Default)]
pub struct HookConfig {
    entries: Vec<(String, HookFn)>,
}

impl HookConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `hook` at `position`. Registering the same position twice
    /// keeps the later hook.
    pub fn on(
        mut self,
        position: impl Into<String>,
        hook: impl Fn(Record, ChangeHistory) -> HookResult + 'static,
    ) -> Self {
        self.entries.push((position.into(), Box::new(hook)));
        self
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub(crate) fn into_registry(self) -> (HookRegistry, Vec<Violation>) {
        let mut hooks = IndexMap::new();
        let mut violations = Vec::new();
        for (token, hook) in self.entries {
            match HookPosition::from_token(&token) {
                Some(position) => {
                    hooks.insert(position, hook);
                }
                None => violations.push(Violation::UnknownHookPosition { token }),
            }
        }
        (HookRegistry { hooks }, violations)
    }
}

impl std::fmt::Debug for HookConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let tokens: Vec<&str> = self.entries.iter().map(|(token, _)| token.as_str()).collect();
        f.debug_struct("HookConfig").field("entries", &tokens).finish()
    }
}

/// Validated hook registry, frozen with its profile.
#[derive(Default)]
pub struct HookRegistry {
    hooks: IndexMap<HookPosition, HookFn>,
}

impl HookRegistry {
    pub fn contains(&self, position: HookPosition) -> bool {
        self.hooks.contains_key(&position)
    }

    pub fn positions(&self) -> impl Iterator<Item = HookPosition> + '_ {
        self.hooks.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.hooks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hooks.is_empty()
    }

    /// Invoke the hook at `position` if one is registered, adopting its
    /// returned record and history. A no-op passthrough otherwise.
    pub(crate) fn dispatch(
        &self,
        position: HookPosition,
        record: Record,
        history: ChangeHistory,
    ) -> Result<(Record, ChangeHistory), EngineError> {
        match self.hooks.get(&position) {
            Some(hook) => {
                tracing::debug!(position = position.as_str(), "dispatching hook");
                hook(record, history).map_err(|source| EngineError::Hook { position, source })
            }
            None => Ok((record, history)),
        }
    }
}

impl std::fmt::Debug for HookRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let positions: Vec<HookPosition> = self.hooks.keys().copied().collect();
        f.debug_struct("HookRegistry")
            .field("positions", &positions)
            .finish()
    }
}
