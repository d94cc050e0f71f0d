use core::time::Duration;
use serde::{Deserialize, Serialize};

use crate::*;

/// Lifecycle of the game section.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SectionState {
    #[default]
    Disabled,
    /// Grid is built, waiting for the activation animation before picks are accepted.
    Enabling,
    Active,
    /// Everything is matched, waiting out the grace period before the terminal event.
    Ending,
}

impl SectionState {
    pub const fn is_enabled(self) -> bool {
        !matches!(self, Self::Disabled)
    }

    pub const fn accepts_picks(self) -> bool {
        matches!(self, Self::Active)
    }
}

/// What a single [`GameDriver::tick`] did.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TickReport {
    /// Cards whose reveal timer ran out and are flipping back.
    pub hidden: Expired,
    /// The terminal event fired on this tick.
    pub section_ended: bool,
}

impl TickReport {
    pub fn has_update(&self) -> bool {
        !self.hidden.is_empty() || self.section_ended
    }
}

#[derive(Clone, Debug, PartialEq)]
struct LiveSession {
    state: SessionState,
    open: OpenCards,
}

/// Drives one game section: restore or deal, picks, resolution, reveal timers, completion and persistence.
///
/// All collaborators are injected and owned for the lifetime of the driver. The driver is single threaded, every
/// method runs to completion before the next event is handled.
#[derive(Debug)]
pub struct GameDriver<G, S, P, N> {
    config: GameConfig,
    setup: SessionSetup,
    resolver: MatchResolver,
    generator: G,
    store: S,
    presentation: P,
    navigation: N,
    section: SectionState,
    live: Option<LiveSession>,
    ending: Deferred,
    /// The store is believed to hold a record for this section.
    has_save: bool,
    /// The save was already removed for the current session.
    save_discarded: bool,
}

impl<G, S, P, N> GameDriver<G, S, P, N>
where
    G: DeckGenerator,
    S: SessionStore,
    P: Presentation,
    N: Navigation,
{
    pub fn new(
        config: GameConfig,
        setup: SessionSetup,
        generator: G,
        store: S,
        presentation: P,
        navigation: N,
    ) -> Self {
        Self {
            config,
            resolver: MatchResolver::new(config.match_rule),
            generator,
            store,
            presentation,
            navigation,
            section: SectionState::Disabled,
            has_save: setup.prior_save_exists,
            setup,
            live: None,
            ending: Deferred::idle(),
            save_discarded: false,
        }
    }

    pub fn section_state(&self) -> SectionState {
        self.section
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn setup(&self) -> &SessionSetup {
        &self.setup
    }

    pub fn session(&self) -> Option<&SessionState> {
        self.live.as_ref().map(|live| &live.state)
    }

    pub fn open_cards(&self) -> Option<&OpenCards> {
        self.live.as_ref().map(|live| &live.open)
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn presentation(&self) -> &P {
        &self.presentation
    }

    pub fn presentation_mut(&mut self) -> &mut P {
        &mut self.presentation
    }

    pub fn navigation(&self) -> &N {
        &self.navigation
    }

    /// Starts the section: restores the saved session or deals a new one, then builds the grid.
    ///
    /// Picks are only accepted after [`on_activated`](Self::on_activated). Fails only when a fresh deck cannot be
    /// dealt for the configured card count.
    pub fn enable(&mut self) -> Result<()> {
        if self.section.is_enabled() {
            log::warn!("Section already enabled ({:?})", self.section);
            return Ok(());
        }

        let state = self.restore_or_deal()?;
        let open = OpenCards::new(&state);

        self.presentation.activate();
        self.presentation
            .build_grid(state.layout(), state.cell_values(), state.matched_flags());
        self.presentation.set_score(state.match_count());
        self.presentation.set_clicks(state.click_count());

        self.live = Some(LiveSession { state, open });
        self.ending.cancel();
        self.save_discarded = false;
        self.section = SectionState::Enabling;
        log::debug!("Section enabling");
        Ok(())
    }

    /// The activation animation finished, picks are accepted from now on.
    pub fn on_activated(&mut self) {
        if self.section != SectionState::Enabling {
            return;
        }
        self.section = SectionState::Active;
        log::debug!("Section active");

        if self.session().is_some_and(SessionState::is_complete) {
            self.begin_ending();
        }
    }

    /// Player picked `cell`. The card is locked and its reveal requested, it only joins the open set once
    /// [`on_revealed`](Self::on_revealed) reports the animation done.
    pub fn pick(&mut self, cell: CellIndex) -> PickOutcome {
        if !self.section.accepts_picks() {
            return PickOutcome::Ignored;
        }
        let Some(live) = self.live.as_mut() else {
            return PickOutcome::Ignored;
        };
        if !live.state.contains(cell) || live.state.is_matched(cell) || !live.open.begin_flip(cell) {
            log::trace!("Ignored pick on cell {}", cell);
            return PickOutcome::Ignored;
        }

        log::trace!("Picked cell {}", cell);
        self.presentation.set_interactable(cell, false);
        self.presentation.reveal(cell, true);
        PickOutcome::Flipping
    }

    /// Reveal animation of `cell` finished: commit it and re-evaluate the open set.
    pub fn on_revealed(&mut self, cell: CellIndex) -> ResolveOutcome {
        if !self.section.accepts_picks() {
            return ResolveOutcome::NoChange;
        }
        let Some(live) = self.live.as_mut() else {
            return ResolveOutcome::NoChange;
        };
        if !live.open.commit(cell, self.config.reveal_duration) {
            return ResolveOutcome::NoChange;
        }
        log::trace!("Committed cell {}", cell);

        let resolution = self.resolver.resolve(&mut live.state, &mut live.open);
        if resolution.pairs.is_empty() {
            return resolution.outcome();
        }
        self.presentation.set_clicks(live.state.click_count());

        for pair in resolution.matches() {
            for cell in [pair.first, pair.second] {
                self.presentation.set_interactable(cell, false);
                self.presentation.celebrate(cell);
            }
            self.presentation.set_score(live.state.match_count());
        }

        if self.config.mismatch == MismatchPolicy::HideImmediately {
            for pair in resolution.mismatches() {
                for cell in [pair.first, pair.second] {
                    live.open.begin_hide(cell);
                    self.presentation.hide(cell, true);
                }
            }
        }

        let completed = resolution.matches().next().is_some() && live.state.is_complete();
        if completed {
            self.begin_ending();
            resolution.outcome() | ResolveOutcome::Completed
        } else {
            resolution.outcome()
        }
    }

    /// Hide animation of `cell` finished, it becomes pickable again.
    pub fn on_hidden(&mut self, cell: CellIndex) -> bool {
        if !self.section.accepts_picks() {
            return false;
        }
        let Some(live) = self.live.as_mut() else {
            return false;
        };
        if !live.open.finish_hide(cell) {
            return false;
        }
        self.presentation.set_interactable(cell, true);
        true
    }

    /// Advances reveal timers, or the grace period once the game is complete. Skipped while disabled.
    pub fn tick(&mut self, elapsed: Duration) -> TickReport {
        let mut report = TickReport::default();
        match self.section {
            SectionState::Disabled | SectionState::Enabling => {}
            SectionState::Active => {
                let Some(live) = self.live.as_mut() else {
                    return report;
                };
                if live.open.timers().is_empty() {
                    return report;
                }
                for cell in live.open.advance_timers(elapsed) {
                    log::trace!("Reveal timer ran out on cell {}", cell);
                    live.open.begin_hide(cell);
                    self.presentation.hide(cell, true);
                    report.hidden.push(cell);
                }
            }
            SectionState::Ending => {
                if self.ending.advance(elapsed) {
                    self.finish();
                    report.section_ended = true;
                }
            }
        }
        report
    }

    /// Navigating away (return to menu or deactivation): saves the session and stops listening for events.
    ///
    /// A won game waiting out its grace period is not saved; its terminal event is cancelled and the save removed.
    pub fn disable(&mut self) {
        match self.section {
            SectionState::Disabled => return,
            SectionState::Enabling | SectionState::Active => self.save(),
            SectionState::Ending => {
                log::debug!("Section disabled during grace period, terminal event cancelled");
                self.ending.cancel();
                self.discard_save();
                self.live = None;
            }
        }
        self.section = SectionState::Disabled;
        self.presentation.deactivate();
        log::debug!("Section disabled");
    }

    /// The host process is shutting down, persist the session if it is still being played.
    pub fn on_exit(&mut self) {
        match self.section {
            SectionState::Disabled => {}
            SectionState::Enabling | SectionState::Active => self.save(),
            SectionState::Ending => self.discard_save(),
        }
    }

    /// Prefers the stored record, then a session left behind by a failed save, then a fresh deal.
    fn restore_or_deal(&mut self) -> Result<SessionState> {
        if self.has_save {
            match self.store.load() {
                Ok(Some(state)) => {
                    log::debug!(
                        "Restored session on layout {} ({} cards)",
                        state.layout(),
                        state.total_cards()
                    );
                    return Ok(state);
                }
                Ok(None) => {
                    log::debug!("No saved session");
                    self.has_save = false;
                }
                Err(err) => log::warn!("Discarding saved session: {}", err),
            }
        }
        if let Some(live) = self.live.take() {
            log::debug!("Resuming unsaved session on layout {}", live.state.layout());
            return Ok(live.state);
        }

        let deck = self.generator.generate(self.setup.total_cards)?;
        log::debug!(
            "Dealt new session on layout {} ({} cards)",
            self.setup.layout,
            deck.total_cards()
        );
        Ok(SessionState::new(deck, self.setup.layout.clone()))
    }

    fn begin_ending(&mut self) {
        if self.section != SectionState::Active {
            return;
        }
        log::debug!("All cards matched, ending in {:?}", self.config.grace_period);
        self.section = SectionState::Ending;
        self.ending.schedule(self.config.grace_period);
    }

    fn finish(&mut self) {
        log::debug!("Section ended");
        self.discard_save();
        self.live = None;
        self.section = SectionState::Disabled;
        self.presentation.deactivate();
        self.navigation.section_ended();
    }

    fn save(&mut self) {
        let Some(live) = self.live.as_ref() else {
            return;
        };
        match self.store.save(&live.state) {
            Ok(()) => self.has_save = true,
            Err(err) => log::warn!("Could not save session: {}", err),
        }
    }

    /// Deletes the saved record once per session.
    fn discard_save(&mut self) {
        if !self.save_discarded {
            self.store.delete();
            self.save_discarded = true;
        }
        self.has_save = false;
    }
}
