// Carousel engine: owns config, slide registry, navigation, autoplay timer and layout state.
// Every mutation goes through a transition method; there are no raw field setters.
// Rule: at most one autoplay timer is ever pending. Re-arming always cancels first.
// See DESIGN.md: Carousel engine

use log::{debug, trace};

use crate::config::{self, ConfigInput, ResolvedConfig};
use crate::error::CarouselError;
use crate::geometry::GeometryProvider;
use crate::layout;
use crate::timer::{Task, TimerHandle, TimerService, VirtualClock};
use crate::types::{CarouselEvent, Millis, MoveTarget, SlideSize, Styles};

/// Delay before a slide-set change re-validates the active index.
pub const SETTLE_DELAY: Millis = Millis::new(100);

#[derive(Debug, Clone, Default)]
struct NavState {
    active_index: i64,
    has_started: bool,
    /// Latched once a user move happens while `stop_after_action` is set.
    user_action: bool,
    /// Unset until the first hover pause/resume.
    paused_by_user: Option<bool>,
    is_centered: bool,
    playing: bool,
    is_ready: bool,
}

/// Stateful carousel engine.
///
/// `H` is the host's slide handle, `G` measures slides, `T` runs deferred work.
pub struct Carousel<H, G, T = VirtualClock> {
    input: ConfigInput,
    config: ResolvedConfig,
    geometry: G,
    timers: T,
    slides: Vec<H>,
    sizes: Vec<SlideSize>,
    nav: NavState,
    autoplay: Option<TimerHandle>,
    slider_margin: f64,
    should_hide_nav: bool,
    should_hide_pager: bool,
    hover_bound: bool,
    events: Vec<CarouselEvent>,
}

impl<H: PartialEq, G: GeometryProvider<H>> Carousel<H, G, VirtualClock> {
    pub fn new(geometry: G) -> Self {
        Self::with_timers(geometry, VirtualClock::new())
    }
}

impl<H: PartialEq, G: GeometryProvider<H>, T: TimerService> Carousel<H, G, T> {
    pub fn with_timers(geometry: G, timers: T) -> Self {
        let config = ResolvedConfig::default();
        Carousel {
            input: ConfigInput::default(),
            should_hide_nav: config.hide_nav,
            should_hide_pager: config.hide_pager,
            config,
            geometry,
            timers,
            slides: Vec::new(),
            sizes: Vec::new(),
            nav: NavState::default(),
            autoplay: None,
            slider_margin: 0.0,
            hover_bound: false,
            events: Vec::new(),
        }
    }

    /// Resolve `input` against the current slides and make it the active configuration.
    ///
    /// Replaces the previous configuration wholesale and resets the
    /// nav/pager hide flags to their configured values.
    pub fn configure(&mut self, input: ConfigInput) -> &ResolvedConfig {
        let geometry = &self.geometry;
        self.config = config::resolve(&input, self.slides.len(), || geometry.container_width());
        self.input = input;
        self.should_hide_nav = self.config.hide_nav;
        self.should_hide_pager = self.config.hide_pager;
        &self.config
    }

    /// Same as [`Carousel::configure`], from the JSON form of [`ConfigInput`].
    pub fn configure_json(&mut self, json: &str) -> Result<&ResolvedConfig, CarouselError> {
        let input: ConfigInput = serde_json::from_str(json)
            .map_err(|e| CarouselError::InvalidConfig(e.to_string()))?;
        Ok(self.configure(input))
    }

    /// Container or slides changed size: re-derive `displayed`/`per_slide`,
    /// re-measure, and re-layout in place.
    pub fn resize(&mut self) {
        let input = std::mem::take(&mut self.input);
        let (hide_nav, hide_pager) = (self.should_hide_nav, self.should_hide_pager);
        self.configure(input);
        // Hover state outlives a resize.
        self.should_hide_nav = hide_nav;
        self.should_hide_pager = hide_pager;
        self.relayout();
    }

    /// Replace the whole slide set, in display order.
    pub fn set_slides(&mut self, slides: Vec<H>) {
        self.slides = slides;
        self.update(false);
    }

    pub fn add_slide(&mut self, handle: H) {
        self.slides.push(handle);
        self.update(false);
    }

    /// Remove the first slide equal to `handle`. Unknown handles leave the
    /// registry alone but still refresh the layout.
    pub fn remove_slide(&mut self, handle: &H) {
        match self.slides.iter().position(|s| s == handle) {
            Some(pos) => {
                self.slides.remove(pos);
            }
            None => debug!("remove_slide: handle not registered"),
        }
        self.update(false);
    }

    /// Re-measure every slide into the size cache, positionally.
    pub fn update_sizes(&mut self) {
        let geometry = &self.geometry;
        self.sizes = self.slides.iter().map(|s| geometry.measure(s)).collect();
        trace!("measured {} slides", self.sizes.len());
    }

    /// React to a slide-set change.
    ///
    /// Optionally re-arms the timer, re-binds hover events, and once
    /// navigation has started schedules a settle move to the current index.
    pub fn update(&mut self, reset_timer: bool) {
        if reset_timer {
            let stop = self.should_stop();
            self.set_interval(stop);
        }
        self.bind_events(false);
        if self.nav.has_started {
            self.timers.schedule(Task::Resettle, SETTLE_DELAY);
        }
    }

    /// Move the selection.
    ///
    /// `Next`/`Prev` step by `per_slide` with wraparound; an explicit index is
    /// taken as is. Unless `suppress_callback`, an onSlide notification is
    /// scheduled once the transition has had time to finish.
    pub fn move_to(&mut self, target: MoveTarget, is_user_action: bool, suppress_callback: bool) {
        self.nav.has_started = true;

        if is_user_action && self.config.stop_after_action {
            self.nav.user_action = true;
        }

        let stop = self.should_stop();
        self.set_interval(stop);

        let count = self.slides.len();
        let per_slide = i64::try_from(self.config.per_slide).unwrap_or(i64::MAX);
        self.nav.active_index = match target {
            _ if count == 0 => 0,
            MoveTarget::Next => {
                layout::compute_index(
                    self.nav.active_index.saturating_add(per_slide),
                    count,
                    self.config.per_slide,
                )
            }
            MoveTarget::Prev => {
                layout::compute_index(
                    self.nav.active_index.saturating_sub(per_slide),
                    count,
                    self.config.per_slide,
                )
            }
            MoveTarget::Index(index) => index,
        };
        debug!("moved {:?} -> index {}", target, self.nav.active_index);

        self.relayout();

        if !suppress_callback && self.config.on_slide {
            self.timers.schedule(
                Task::NotifySlide {
                    index: self.nav.active_index,
                },
                self.config.transition_duration,
            );
        }
    }

    /// Parse a host-supplied target (`"next"`, `"prev"` or an index) and move.
    pub fn move_str(&mut self, target: &str, is_user_action: bool) -> Result<(), CarouselError> {
        let target = target
            .parse::<MoveTarget>()
            .map_err(|_| CarouselError::InvalidTarget {
                target: target.to_string(),
            })?;
        self.move_to(target, is_user_action, false);
        Ok(())
    }

    pub fn next(&mut self) {
        self.move_to(MoveTarget::Next, true, false);
    }

    pub fn prev(&mut self) {
        self.move_to(MoveTarget::Prev, true, false);
    }

    /// Cancel the running autoplay timer and, unless `stop` or sync mode,
    /// start a fresh one.
    pub fn set_interval(&mut self, stop: bool) {
        if let Some(handle) = self.autoplay.take() {
            self.timers.cancel(handle);
        }
        self.nav.playing = false;

        if stop || self.config.sync.is_enabled() {
            trace!("autoplay stopped (stop={}, sync={:?})", stop, self.config.sync);
            return;
        }

        let handle = self
            .timers
            .schedule_repeating(Task::AutoplayTick, self.config.time_interval);
        debug!("autoplay armed every {}ms", self.config.time_interval.as_millis());
        self.autoplay = Some(handle);
    }

    /// Whether autoplay should be held.
    pub fn should_stop(&self) -> bool {
        if !self.config.autoplay {
            return true;
        }
        (self.nav.user_action && self.config.stop_after_action)
            || self.nav.paused_by_user == Some(true)
    }

    pub fn pause(&mut self) {
        self.nav.paused_by_user = Some(true);
        self.set_interval(true);
    }

    pub fn resume(&mut self) {
        self.nav.paused_by_user = Some(false);
        let stop = self.should_stop();
        self.set_interval(stop);
    }

    /// Advance the clock by `elapsed`, running every task that falls due on the way.
    pub fn advance(&mut self, elapsed: Millis) {
        let deadline = self.timers.now().saturating_add(elapsed);
        while let Some(task) = self.timers.pop_due(deadline) {
            self.run_task(task);
        }
        self.timers.advance_to(deadline);
    }

    fn run_task(&mut self, task: Task) {
        trace!("running {:?}", task);
        match task {
            Task::AutoplayTick => {
                self.nav.playing = true;
                self.move_to(MoveTarget::Next, false, false);
            }
            Task::NotifySlide { index } => self.events.push(CarouselEvent::Slid { index }),
            Task::Resettle => {
                let index = self.nav.active_index;
                self.move_to(MoveTarget::Index(index), false, true);
            }
        }
    }

    pub fn mouse_enter(&mut self) {
        if self.config.pause_on_hover {
            self.pause();
        }
        if self.config.nav_on_hover {
            self.should_hide_nav = false;
        }
        if self.config.pager_on_hover {
            self.should_hide_pager = false;
        }
    }

    pub fn mouse_leave(&mut self) {
        self.events.push(CarouselEvent::TouchEnd);

        if !self.config.stop_after_hover && self.config.pause_on_hover {
            self.resume();
        }
        if self.config.nav_on_hover && self.config.hide_nav {
            self.should_hide_nav = true;
        }
        if self.config.pager_on_hover && self.config.hide_pager {
            self.should_hide_pager = true;
        }
    }

    /// Attach hover listeners when any hover option needs them, detach otherwise.
    /// Repeated calls with unchanged config emit nothing.
    pub fn bind_events(&mut self, remove: bool) {
        let needed = self.config.needs_hover_events();

        if (remove || !needed) && self.hover_bound {
            self.hover_bound = false;
            debug!("hover listeners unbound");
            self.events.push(CarouselEvent::HoverBinding { bound: false });
        }

        if !remove && needed && !self.hover_bound {
            self.hover_bound = true;
            debug!("hover listeners bound");
            self.events.push(CarouselEvent::HoverBinding { bound: true });
        }
    }

    /// Width of the slides scrolled off to the left of the active one.
    /// Re-measures slides first.
    pub fn margin(&mut self) -> f64 {
        self.update_sizes();
        let (reference, centered) = layout::loop_until(
            self.nav.active_index,
            self.config.displayed,
            self.config.center_active,
        );
        self.nav.is_centered = centered;
        layout::margin(&self.sizes, self.slides.len(), reference, self.config.displayed)
    }

    /// Override the track offset by an extra `offset`, e.g. while dragging.
    pub fn shift(&mut self, offset: f64) {
        let margin = self.margin();
        self.slider_margin = negate(margin + offset);
    }

    fn relayout(&mut self) {
        let margin = self.margin();
        self.slider_margin = negate(margin);
    }

    /// Fresh style values for the track. Re-measures slides first.
    pub fn styles(&mut self) -> Styles {
        self.update_sizes();
        layout::styles(
            &self.config.animation,
            self.slider_margin,
            self.nav.is_ready,
            &self.sizes,
            self.nav.active_index,
        )
    }

    /// Slides are rendered and measurable.
    pub fn mark_ready(&mut self) {
        self.nav.is_ready = true;
    }

    /// Side effects queued for the host since the last call.
    pub fn take_events(&mut self) -> Vec<CarouselEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn config(&self) -> &ResolvedConfig {
        &self.config
    }

    pub fn active_index(&self) -> i64 {
        self.nav.active_index
    }

    pub fn slide_count(&self) -> usize {
        self.slides.len()
    }

    pub fn slides(&self) -> &[H] {
        &self.slides
    }

    pub fn sizes(&self) -> &[SlideSize] {
        &self.sizes
    }

    pub fn slider_margin(&self) -> f64 {
        self.slider_margin
    }

    pub fn has_started(&self) -> bool {
        self.nav.has_started
    }

    pub fn is_centered(&self) -> bool {
        self.nav.is_centered
    }

    pub fn is_playing(&self) -> bool {
        self.nav.playing
    }

    pub fn is_ready(&self) -> bool {
        self.nav.is_ready
    }

    pub fn is_hover_bound(&self) -> bool {
        self.hover_bound
    }

    pub fn should_hide_nav(&self) -> bool {
        self.should_hide_nav
    }

    pub fn should_hide_pager(&self) -> bool {
        self.should_hide_pager
    }

    pub fn autoplay_timer(&self) -> Option<TimerHandle> {
        self.autoplay
    }

    pub fn timers(&self) -> &T {
        &self.timers
    }

    pub fn geometry(&self) -> &G {
        &self.geometry
    }

    pub fn geometry_mut(&mut self) -> &mut G {
        &mut self.geometry
    }
}

// Keeps a zero margin from rendering as "-0".
fn negate(px: f64) -> f64 {
    if px == 0.0 {
        0.0
    } else {
        -px
    }
}
