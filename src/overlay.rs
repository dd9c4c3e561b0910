use std::collections::{BTreeMap, BTreeSet};

#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub enum OverlayKind {
    Project,
    Chat,
    Lightbox,
}

impl OverlayKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Project => "project",
            Self::Chat => "chat",
            Self::Lightbox => "lightbox",
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum LockTransition {
    Engaged,
    Released,
    Unchanged,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct ReleaseToken {
    kind: OverlayKind,
    generation: u64,
}

/// Page scroll lock shared by every overlay.
///
/// The page stays locked while at least one overlay holds it. Each acquire or release bumps
/// the overlay's generation so a deferred release issued earlier cannot drop a newer hold.
#[derive(Debug, Default)]
pub struct ScrollLock {
    holders: BTreeSet<OverlayKind>,
    generations: BTreeMap<OverlayKind, u64>,
}

impl ScrollLock {
    pub fn acquire(&mut self, kind: OverlayKind) -> LockTransition {
        let was_locked = self.is_locked();
        self.bump(kind);
        self.holders.insert(kind);
        self.transition_from(was_locked)
    }

    pub fn release(&mut self, kind: OverlayKind) -> LockTransition {
        let was_locked = self.is_locked();
        self.bump(kind);
        self.holders.remove(&kind);
        self.transition_from(was_locked)
    }

    pub fn release_later(&mut self, kind: OverlayKind) -> ReleaseToken {
        ReleaseToken {
            kind,
            generation: self.bump(kind),
        }
    }

    pub fn complete_release(&mut self, token: ReleaseToken) -> LockTransition {
        if self.generation(token.kind) != token.generation {
            return LockTransition::Unchanged;
        }

        let was_locked = self.is_locked();
        self.holders.remove(&token.kind);
        self.transition_from(was_locked)
    }

    pub fn is_locked(&self) -> bool {
        !self.holders.is_empty()
    }

    #[cfg(test)]
    pub fn holds(&self, kind: OverlayKind) -> bool {
        self.holders.contains(&kind)
    }

    fn generation(&self, kind: OverlayKind) -> u64 {
        self.generations.get(&kind).copied().unwrap_or(0)
    }

    fn bump(&mut self, kind: OverlayKind) -> u64 {
        let generation = self.generations.entry(kind).or_insert(0);
        *generation += 1;
        *generation
    }

    fn transition_from(&self, was_locked: bool) -> LockTransition {
        match (was_locked, self.is_locked()) {
            (false, true) => LockTransition::Engaged,
            (true, false) => LockTransition::Released,
            _ => LockTransition::Unchanged,
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct EscapeEffects {
    pub project_release: ReleaseToken,
    pub chat: Option<LockTransition>,
    pub lightbox: LockTransition,
}

#[derive(Debug, Default)]
pub struct OverlayState {
    project_open: bool,
    chat_open: bool,
    lightbox_open: bool,
    lock: ScrollLock,
}

impl OverlayState {
    pub fn open_project(&mut self, template_found: bool) -> Option<LockTransition> {
        if !template_found {
            return None;
        }

        self.project_open = true;
        Some(self.lock.acquire(OverlayKind::Project))
    }

    pub fn close_project(&mut self) -> ReleaseToken {
        self.project_open = false;
        self.lock.release_later(OverlayKind::Project)
    }

    pub fn complete_release(&mut self, token: ReleaseToken) -> LockTransition {
        self.lock.complete_release(token)
    }

    pub fn toggle_chat(&mut self) -> (bool, LockTransition) {
        self.chat_open = !self.chat_open;
        let transition = if self.chat_open {
            self.lock.acquire(OverlayKind::Chat)
        } else {
            self.lock.release(OverlayKind::Chat)
        };
        (self.chat_open, transition)
    }

    pub fn open_lightbox(&mut self) -> LockTransition {
        self.lightbox_open = true;
        self.lock.acquire(OverlayKind::Lightbox)
    }

    pub fn close_lightbox(&mut self) -> LockTransition {
        self.lightbox_open = false;
        self.lock.release(OverlayKind::Lightbox)
    }

    pub fn escape(&mut self) -> EscapeEffects {
        let project_release = self.close_project();
        let chat = self
            .chat_open
            .then(|| self.toggle_chat())
            .map(|(_, transition)| transition);
        let lightbox = self.close_lightbox();

        EscapeEffects {
            project_release,
            chat,
            lightbox,
        }
    }

    #[cfg(test)]
    pub fn project_open(&self) -> bool {
        self.project_open
    }

    #[cfg(test)]
    pub fn chat_open(&self) -> bool {
        self.chat_open
    }

    #[cfg(test)]
    pub fn lightbox_open(&self) -> bool {
        self.lightbox_open
    }

    #[cfg(test)]
    pub fn is_locked(&self) -> bool {
        self.lock.is_locked()
    }
}

pub fn accepted_chat_message(raw: &str) -> Option<&str> {
    let trimmed = raw.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn acquire_and_release_report_transitions() {
        let mut lock = ScrollLock::default();

        assert_eq!(lock.acquire(OverlayKind::Lightbox), LockTransition::Engaged);
        assert!(lock.is_locked());
        assert_eq!(lock.acquire(OverlayKind::Lightbox), LockTransition::Unchanged);
        assert_eq!(lock.release(OverlayKind::Lightbox), LockTransition::Released);
        assert!(!lock.is_locked());
        assert_eq!(lock.release(OverlayKind::Lightbox), LockTransition::Unchanged);
    }

    #[test]
    fn closing_one_overlay_keeps_lock_for_another() {
        let mut lock = ScrollLock::default();

        lock.acquire(OverlayKind::Project);
        lock.acquire(OverlayKind::Chat);

        assert_eq!(lock.release(OverlayKind::Chat), LockTransition::Unchanged);
        assert!(lock.is_locked());
        assert!(lock.holds(OverlayKind::Project));
    }

    #[test]
    fn deferred_release_keeps_page_locked_until_completed() {
        let mut lock = ScrollLock::default();
        lock.acquire(OverlayKind::Project);

        let token = lock.release_later(OverlayKind::Project);
        assert!(lock.is_locked());

        assert_eq!(lock.complete_release(token), LockTransition::Released);
        assert!(!lock.is_locked());
    }

    #[test]
    fn reopening_before_deferred_release_invalidates_it() {
        let mut lock = ScrollLock::default();
        lock.acquire(OverlayKind::Project);

        let stale = lock.release_later(OverlayKind::Project);
        lock.acquire(OverlayKind::Project);

        assert_eq!(lock.complete_release(stale), LockTransition::Unchanged);
        assert!(lock.holds(OverlayKind::Project));
    }

    #[test]
    fn deferred_release_without_hold_leaves_other_overlays_locked() {
        let mut lock = ScrollLock::default();
        lock.acquire(OverlayKind::Lightbox);

        let token = lock.release_later(OverlayKind::Project);

        assert_eq!(lock.complete_release(token), LockTransition::Unchanged);
        assert!(lock.holds(OverlayKind::Lightbox));
    }

    #[test]
    fn missing_template_leaves_overlays_untouched() {
        let mut state = OverlayState::default();

        assert_eq!(state.open_project(false), None);
        assert!(!state.project_open());
        assert!(!state.is_locked());
    }

    #[test]
    fn project_stays_locked_until_exit_release_completes() {
        let mut state = OverlayState::default();

        assert_eq!(state.open_project(true), Some(LockTransition::Engaged));
        assert!(state.project_open());

        let token = state.close_project();
        assert!(!state.project_open());
        assert!(state.is_locked());

        assert_eq!(state.complete_release(token), LockTransition::Released);
        assert!(!state.is_locked());
    }

    #[test]
    fn chat_toggle_twice_restores_original_state() {
        let mut state = OverlayState::default();

        assert_eq!(state.toggle_chat(), (true, LockTransition::Engaged));
        assert!(state.is_locked());
        assert_eq!(state.toggle_chat(), (false, LockTransition::Released));

        assert!(!state.chat_open());
        assert!(!state.is_locked());
    }

    #[test]
    fn escape_closes_every_open_overlay() {
        let mut state = OverlayState::default();
        state.open_project(true);
        state.toggle_chat();
        state.open_lightbox();

        let effects = state.escape();

        assert!(!state.project_open());
        assert!(!state.chat_open());
        assert!(!state.lightbox_open());
        assert_eq!(effects.chat, Some(LockTransition::Unchanged));
        assert_eq!(effects.lightbox, LockTransition::Unchanged);
        assert!(state.is_locked());

        assert_eq!(
            state.complete_release(effects.project_release),
            LockTransition::Released
        );
        assert!(!state.is_locked());
    }

    #[test]
    fn escape_leaves_closed_chat_closed() {
        let mut state = OverlayState::default();
        state.open_lightbox();

        let effects = state.escape();

        assert_eq!(effects.chat, None);
        assert!(!state.chat_open());
        assert_eq!(effects.lightbox, LockTransition::Released);
        assert_eq!(
            state.complete_release(effects.project_release),
            LockTransition::Unchanged
        );
    }

    #[test]
    fn escape_with_nothing_open_changes_nothing() {
        let mut state = OverlayState::default();

        let effects = state.escape();

        assert_eq!(effects.chat, None);
        assert_eq!(effects.lightbox, LockTransition::Unchanged);
        assert_eq!(
            state.complete_release(effects.project_release),
            LockTransition::Unchanged
        );
        assert!(!state.is_locked());
    }

    #[test]
    fn reopened_project_ignores_earlier_close() {
        let mut state = OverlayState::default();
        state.open_project(true);

        let stale = state.close_project();
        state.open_project(true);

        assert_eq!(state.complete_release(stale), LockTransition::Unchanged);
        assert!(state.project_open());
        assert!(state.is_locked());
    }

    #[test]
    fn chat_message_is_trimmed_and_blank_is_rejected() {
        assert_eq!(accepted_chat_message("  hello there \n"), Some("hello there"));
        assert_eq!(accepted_chat_message(" \t "), None);
        assert_eq!(accepted_chat_message(""), None);
    }
}
