// Layered configuration: defaults < bulk options object < individually declared fields.
// Resolved once per setup into a plain immutable value; `displayed` and `per_slide`
// are always derived from the merged input, never copied verbatim.
// See DESIGN.md: Configuration Resolver

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::types::Millis;

pub const DEFAULT_DISPLAYED: f64 = 3.0;
pub const DEFAULT_PER_SLIDE: f64 = 1.0;
pub const DEFAULT_TIME_INTERVAL_MS: u64 = 3000;
pub const DEFAULT_TRANSITION_DURATION_MS: u64 = 500;
pub const DEFAULT_UPDATE_RATE_MS: u64 = 100;

/// Transition style. Only `Slide` pages by offset; every other mode swaps whole screens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(from = "String", into = "String")]
pub enum Animation {
    #[default]
    Slide,
    Fade,
    Other(String),
}

impl Animation {
    pub fn is_slide(&self) -> bool {
        matches!(self, Animation::Slide)
    }
}

impl From<String> for Animation {
    fn from(value: String) -> Self {
        match value.as_str() {
            "slide" => Animation::Slide,
            "fade" => Animation::Fade,
            _ => Animation::Other(value),
        }
    }
}

impl From<Animation> for String {
    fn from(value: Animation) -> Self {
        match value {
            Animation::Slide => "slide".to_string(),
            Animation::Fade => "fade".to_string(),
            Animation::Other(name) => name,
        }
    }
}

/// Whether this carousel is slaved to another one instead of running its own timer.
///
/// Any value other than `Disabled` suppresses autoplay, including `Value(0.0)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[serde(from = "SyncRepr", into = "SyncRepr")]
pub enum SyncMode {
    #[default]
    Disabled,
    Synced,
    Value(f64),
}

impl SyncMode {
    pub fn is_enabled(&self) -> bool {
        !matches!(self, SyncMode::Disabled)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(untagged)]
enum SyncRepr {
    Flag(bool),
    Value(f64),
}

impl From<SyncRepr> for SyncMode {
    fn from(repr: SyncRepr) -> Self {
        match repr {
            SyncRepr::Flag(false) => SyncMode::Disabled,
            SyncRepr::Flag(true) => SyncMode::Synced,
            SyncRepr::Value(v) => SyncMode::Value(v),
        }
    }
}

impl From<SyncMode> for SyncRepr {
    fn from(mode: SyncMode) -> Self {
        match mode {
            SyncMode::Disabled => SyncRepr::Flag(false),
            SyncMode::Synced => SyncRepr::Flag(true),
            SyncMode::Value(v) => SyncRepr::Value(v),
        }
    }
}

/// Unresolved options. Every field is optional; absent fields fall through to
/// the next layer down.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct RawOptions {
    pub displayed: Option<f64>,
    pub per_slide: Option<f64>,
    pub autoplay: Option<bool>,
    pub pause_on_hover: Option<bool>,
    pub center_active: Option<bool>,
    pub time_interval: Option<u64>,
    pub transition_duration: Option<u64>,
    pub stop_after_action: Option<bool>,
    pub stop_after_hover: Option<bool>,
    pub hide_nav: Option<bool>,
    pub hide_pager: Option<bool>,
    pub nav_on_hover: Option<bool>,
    pub pager_on_hover: Option<bool>,
    pub is_swipable: Option<bool>,
    pub sync: Option<SyncMode>,
    pub animation: Option<Animation>,
    #[serde(rename = "loop")]
    pub loop_slides: Option<bool>,
    pub on_slide: Option<bool>,
    pub min_width: Option<f64>,
    pub expand: Option<bool>,
    pub update_rate: Option<u64>,
}

macro_rules! overlay_fields {
    ($base:ident, $top:ident, $($field:ident),+ $(,)?) => {
        RawOptions {
            $($field: $top.$field.clone().or_else(|| $base.$field.clone()),)+
        }
    };
}

impl RawOptions {
    /// Layer `top` over `self`: fields defined in `top` win.
    pub fn overlay(&self, top: &RawOptions) -> RawOptions {
        let base = self;
        overlay_fields!(
            base,
            top,
            displayed,
            per_slide,
            autoplay,
            pause_on_hover,
            center_active,
            time_interval,
            transition_duration,
            stop_after_action,
            stop_after_hover,
            hide_nav,
            hide_pager,
            nav_on_hover,
            pager_on_hover,
            is_swipable,
            sync,
            animation,
            loop_slides,
            on_slide,
            min_width,
            expand,
            update_rate,
        )
    }

    /// Copy a single recognised attribute from `src`, if it holds a value.
    fn copy_key(&mut self, src: &RawOptions, key: OptionKey) {
        match key {
            OptionKey::Displayed => self.displayed = src.displayed,
            OptionKey::PerSlide => self.per_slide = src.per_slide,
            OptionKey::Autoplay => self.autoplay = src.autoplay,
            OptionKey::PauseOnHover => self.pause_on_hover = src.pause_on_hover,
            OptionKey::CenterActive => self.center_active = src.center_active,
            OptionKey::TimeInterval => self.time_interval = src.time_interval,
            OptionKey::StopAfterAction => self.stop_after_action = src.stop_after_action,
            OptionKey::HideNav => self.hide_nav = src.hide_nav,
            OptionKey::HidePager => self.hide_pager = src.hide_pager,
            OptionKey::NavOnHover => self.nav_on_hover = src.nav_on_hover,
            OptionKey::PagerOnHover => self.pager_on_hover = src.pager_on_hover,
            OptionKey::IsSwipable => self.is_swipable = src.is_swipable,
            OptionKey::Sync => self.sync = src.sync,
            OptionKey::Animation => self.animation = src.animation.clone(),
            OptionKey::Loop => self.loop_slides = src.loop_slides,
            OptionKey::MinWidth => self.min_width = src.min_width,
            OptionKey::Expand => self.expand = src.expand,
        }
    }
}

/// Option keys that may be declared one by one on the host element.
///
/// `transitionDuration`, `onSlide`, `updateRate` and `stopAfterHover` are only
/// reachable through the bulk options object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum OptionKey {
    Displayed,
    PerSlide,
    Autoplay,
    PauseOnHover,
    CenterActive,
    TimeInterval,
    StopAfterAction,
    HideNav,
    HidePager,
    NavOnHover,
    PagerOnHover,
    IsSwipable,
    Sync,
    Animation,
    Loop,
    MinWidth,
    Expand,
}

/// Individually declared fields: which keys the host declared, and their current values.
///
/// A key counts only if it is declared *and* its value is defined.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct DeclaredAttributes {
    pub present: BTreeSet<OptionKey>,
    pub values: RawOptions,
}

impl DeclaredAttributes {
    pub fn declare(&mut self, key: OptionKey) -> &mut Self {
        self.present.insert(key);
        self
    }

    fn interim(&self) -> RawOptions {
        let mut out = RawOptions::default();
        for key in &self.present {
            out.copy_key(&self.values, *key);
        }
        out
    }
}

/// Everything the host hands over at setup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ConfigInput {
    /// Bulk options object.
    pub options: Option<RawOptions>,
    pub declared: DeclaredAttributes,
}

/// Fully resolved configuration.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedConfig {
    pub displayed: usize,
    pub per_slide: usize,
    pub autoplay: bool,
    pub pause_on_hover: bool,
    pub center_active: bool,
    pub time_interval: Millis,
    pub transition_duration: Millis,
    pub stop_after_action: bool,
    pub stop_after_hover: bool,
    pub hide_nav: bool,
    pub hide_pager: bool,
    pub nav_on_hover: bool,
    pub pager_on_hover: bool,
    pub is_swipable: bool,
    pub sync: SyncMode,
    pub animation: Animation,
    /// Accepted but not consulted by any computation.
    #[serde(rename = "loop")]
    pub loop_slides: bool,
    pub on_slide: bool,
    pub min_width: Option<u32>,
    pub expand: bool,
    /// Accepted but not consulted by any computation.
    pub update_rate: Millis,
}

impl Default for ResolvedConfig {
    fn default() -> Self {
        resolve(&ConfigInput::default(), 0, || None)
    }
}

impl ResolvedConfig {
    /// True when any hover-driven behaviour needs mouse enter/leave events.
    pub fn needs_hover_events(&self) -> bool {
        self.pause_on_hover || self.pager_on_hover || self.nav_on_hover
    }
}

/// Merge the layers and derive `displayed` / `per_slide`.
///
/// `container_width` is only queried when a positive `minWidth` is set.
pub fn resolve(
    input: &ConfigInput,
    slide_count: usize,
    container_width: impl FnOnce() -> Option<f64>,
) -> ResolvedConfig {
    let interim = input.declared.interim();
    let merged = match &input.options {
        Some(bulk) => bulk.overlay(&interim),
        None => interim,
    };

    let min_width = merged
        .min_width
        .map(|w| w.trunc())
        .filter(|w| *w > 0.0)
        .map(|w| w as u32);
    let expand = merged.expand.unwrap_or(true);
    let animation = merged.animation.clone().unwrap_or_default();

    let displayed = compute_displayed(
        merged.displayed.unwrap_or(DEFAULT_DISPLAYED),
        min_width,
        expand,
        slide_count,
        min_width.and_then(|_| container_width()),
    );
    let per_slide = compute_per_slide(
        merged.per_slide.unwrap_or(DEFAULT_PER_SLIDE),
        &animation,
        displayed,
    );

    log::debug!(
        "resolved carousel config: displayed={} per_slide={} animation={:?}",
        displayed,
        per_slide,
        animation
    );

    ResolvedConfig {
        displayed,
        per_slide,
        autoplay: merged.autoplay.unwrap_or(true),
        pause_on_hover: merged.pause_on_hover.unwrap_or(true),
        center_active: merged.center_active.unwrap_or(false),
        time_interval: Millis::new(merged.time_interval.unwrap_or(DEFAULT_TIME_INTERVAL_MS)),
        transition_duration: Millis::new(
            merged
                .transition_duration
                .unwrap_or(DEFAULT_TRANSITION_DURATION_MS),
        ),
        stop_after_action: merged.stop_after_action.unwrap_or(false),
        stop_after_hover: merged.stop_after_hover.unwrap_or(false),
        hide_nav: merged.hide_nav.unwrap_or(false),
        hide_pager: merged.hide_pager.unwrap_or(false),
        nav_on_hover: merged.nav_on_hover.unwrap_or(false),
        pager_on_hover: merged.pager_on_hover.unwrap_or(false),
        is_swipable: merged.is_swipable.unwrap_or(true),
        sync: merged.sync.unwrap_or_default(),
        animation,
        loop_slides: merged.loop_slides.unwrap_or(false),
        on_slide: merged.on_slide.unwrap_or(false),
        min_width,
        expand,
        update_rate: Millis::new(merged.update_rate.unwrap_or(DEFAULT_UPDATE_RATE_MS)),
    }
}

/// How many slides fit on screen.
///
/// A width breakpoint (`min_width`) may lower the requested count but never
/// raise it; with `expand`, never report more slots than there are slides.
pub fn compute_displayed(
    requested: f64,
    min_width: Option<u32>,
    expand: bool,
    slide_count: usize,
    container_width: Option<f64>,
) -> usize {
    let requested = requested.ceil().abs() as usize;

    let fit = match (min_width, container_width) {
        (Some(min), Some(width)) if min > 0 => {
            let fit = (width / f64::from(min)).floor();
            Some(if fit >= 1.0 { fit as usize } else { 1 })
        }
        _ => None,
    };

    let out = match fit {
        Some(fit) if fit <= requested => fit,
        _ => requested,
    };

    // Unreachable after the clamp above; kept as an explicit guard.
    if slide_count > out && out > requested {
        return requested;
    }

    if out == requested && slide_count < out && expand {
        return slide_count;
    }

    out
}

/// Step size for next/prev. Never more than one screenful, and exactly one
/// screenful outside slide mode.
pub fn compute_per_slide(requested: f64, animation: &Animation, displayed: usize) -> usize {
    let mut out = requested.ceil().abs() as usize;
    if !animation.is_slide() || out > displayed {
        out = displayed;
    }
    out.max(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn declared(values: RawOptions, keys: &[OptionKey]) -> DeclaredAttributes {
        let mut attrs = DeclaredAttributes {
            present: BTreeSet::new(),
            values,
        };
        for key in keys {
            attrs.declare(*key);
        }
        attrs
    }

    #[test]
    fn defaults_fill_every_gap() {
        let config = resolve(&ConfigInput::default(), 5, || None);
        assert_eq!(config.displayed, 3);
        assert_eq!(config.per_slide, 1);
        assert!(config.autoplay);
        assert!(config.pause_on_hover);
        assert!(config.expand);
        assert_eq!(config.time_interval, Millis::new(3000));
        assert_eq!(config.transition_duration, Millis::new(500));
        assert_eq!(config.sync, SyncMode::Disabled);
        assert_eq!(config.animation, Animation::Slide);
        assert_eq!(config.min_width, None);
    }

    #[test]
    fn declared_fields_win_over_bulk_options() {
        let input = ConfigInput {
            options: Some(RawOptions {
                displayed: Some(4.0),
                autoplay: Some(false),
                transition_duration: Some(250),
                ..Default::default()
            }),
            declared: declared(
                RawOptions {
                    displayed: Some(2.0),
                    ..Default::default()
                },
                &[OptionKey::Displayed],
            ),
        };

        let config = resolve(&input, 10, || None);
        assert_eq!(config.displayed, 2);
        assert!(!config.autoplay);
        assert_eq!(config.transition_duration, Millis::new(250));
    }

    #[test]
    fn undeclared_or_undefined_fields_are_ignored() {
        // Value present but key not declared.
        let input = ConfigInput {
            options: None,
            declared: declared(
                RawOptions {
                    displayed: Some(5.0),
                    ..Default::default()
                },
                &[],
            ),
        };
        assert_eq!(resolve(&input, 10, || None).displayed, 3);

        // Key declared but value undefined: bulk value survives.
        let input = ConfigInput {
            options: Some(RawOptions {
                per_slide: Some(2.0),
                ..Default::default()
            }),
            declared: declared(RawOptions::default(), &[OptionKey::PerSlide]),
        };
        assert_eq!(resolve(&input, 10, || None).per_slide, 2);
    }

    #[test]
    fn displayed_expands_down_to_slide_count() {
        assert_eq!(compute_displayed(3.0, None, true, 2, None), 2);
        assert_eq!(compute_displayed(3.0, None, false, 2, None), 3);
    }

    #[test]
    fn displayed_takes_absolute_ceiling() {
        assert_eq!(compute_displayed(2.2, None, false, 10, None), 3);
        assert_eq!(compute_displayed(-2.5, None, false, 10, None), 2);
    }

    #[test]
    fn min_width_breakpoint_lowers_displayed() {
        // 500px / 200px -> 2 slots.
        assert_eq!(compute_displayed(3.0, Some(200), true, 10, Some(500.0)), 2);
        // Narrower than one slot still shows one.
        assert_eq!(compute_displayed(3.0, Some(200), true, 10, Some(120.0)), 1);
        // Wide containers never exceed the requested count.
        assert_eq!(compute_displayed(3.0, Some(100), true, 10, Some(2000.0)), 3);
        // No container width known: breakpoint ignored.
        assert_eq!(compute_displayed(3.0, Some(200), true, 10, None), 3);
    }

    #[test]
    fn per_slide_clamps_outside_slide_mode() {
        assert_eq!(compute_per_slide(5.0, &Animation::Fade, 3), 3);
        assert_eq!(compute_per_slide(1.0, &Animation::Fade, 3), 3);
        assert_eq!(compute_per_slide(2.0, &Animation::Slide, 3), 2);
        assert_eq!(compute_per_slide(5.0, &Animation::Slide, 3), 3);
        assert_eq!(compute_per_slide(1.0, &Animation::Slide, 0), 1);
    }

    #[test]
    fn sync_zero_counts_as_enabled() {
        let opts: RawOptions = serde_json::from_str(r#"{"sync":0}"#).unwrap();
        assert_eq!(opts.sync, Some(SyncMode::Value(0.0)));
        assert!(opts.sync.unwrap().is_enabled());

        let opts: RawOptions = serde_json::from_str(r#"{"sync":false}"#).unwrap();
        assert!(!opts.sync.unwrap().is_enabled());

        let opts: RawOptions = serde_json::from_str(r#"{"sync":true}"#).unwrap();
        assert_eq!(opts.sync, Some(SyncMode::Synced));
    }

    #[test]
    fn parses_camel_case_input() {
        let input: ConfigInput = serde_json::from_str(
            r#"{
                "options": {"animation": "fade", "perSlide": 4, "loop": true},
                "declared": {"present": ["centerActive"], "values": {"centerActive": true}}
            }"#,
        )
        .unwrap();

        let config = resolve(&input, 6, || None);
        assert_eq!(config.animation, Animation::Fade);
        assert_eq!(config.per_slide, 3);
        assert!(config.loop_slides);
        assert!(config.center_active);
    }

    #[test]
    fn unknown_animation_is_not_slide() {
        let animation = Animation::from("flip".to_string());
        assert_eq!(animation, Animation::Other("flip".to_string()));
        assert!(!animation.is_slide());
    }
}
