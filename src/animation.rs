use crate::config::InteractionConfig;
use serde::Serialize;

pub const REVEAL_START: &str = "top 95%";
pub const REVEAL_TOGGLE_ACTIONS: &str = "play none none none";

pub fn exponential_ease(t: f64) -> f64 {
    (1.001 - 2f64.powf(-10.0 * t)).min(1.0)
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SmoothScrollOptions {
    pub duration: f64,
    pub orientation: &'static str,
    pub gesture_orientation: &'static str,
    pub smooth_wheel: bool,
    pub wheel_multiplier: f64,
    pub smooth_touch: bool,
    pub touch_multiplier: f64,
    pub infinite: bool,
}

impl SmoothScrollOptions {
    pub fn from_config(config: &InteractionConfig) -> Self {
        Self {
            duration: config.smooth_scroll_duration,
            orientation: "vertical",
            gesture_orientation: "vertical",
            smooth_wheel: true,
            wheel_multiplier: 1.0,
            smooth_touch: false,
            touch_multiplier: 2.0,
            infinite: false,
        }
    }
}

#[derive(Clone, Copy, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnimationEngineSettings {
    pub null_target_warn: bool,
    pub trial_warn: bool,
}

impl AnimationEngineSettings {
    pub const QUIET: Self = Self {
        null_target_warn: false,
        trial_warn: false,
    };
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum RevealCategory {
    Headings,
    Cards,
    Paragraphs,
}

impl RevealCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Headings => "headings",
            Self::Cards => "cards",
            Self::Paragraphs => "paragraphs",
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub struct RevealPreset {
    pub category: RevealCategory,
    pub selector: &'static str,
    pub offset_y: f64,
    pub duration: f64,
    pub stagger: f64,
    pub ease: &'static str,
}

pub const REVEAL_PRESETS: [RevealPreset; 3] = [
    RevealPreset {
        category: RevealCategory::Headings,
        selector: "h1, h2, .hero-title, .case-title, .case-heading",
        offset_y: 21.0,
        duration: 0.5,
        stagger: 0.0,
        ease: "power2.out",
    },
    RevealPreset {
        category: RevealCategory::Cards,
        selector: ".project-card, .phi-section",
        offset_y: 21.0,
        duration: 0.4,
        stagger: 0.05,
        ease: "expo.out",
    },
    RevealPreset {
        category: RevealCategory::Paragraphs,
        selector: ".case-paragraph, .case-body",
        offset_y: 13.0,
        duration: 0.4,
        stagger: 0.0,
        ease: "power2.out",
    },
];

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RevealTrigger {
    pub start: &'static str,
    pub toggle_actions: &'static str,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RevealTween {
    pub scroll_trigger: RevealTrigger,
    pub y: f64,
    pub opacity: f64,
    pub duration: f64,
    #[serde(skip_serializing_if = "is_zero")]
    pub delay: f64,
    pub ease: &'static str,
}

fn is_zero(value: &f64) -> bool {
    *value == 0.0
}

impl RevealPreset {
    pub fn tween_for(&self, index: usize) -> RevealTween {
        RevealTween {
            scroll_trigger: RevealTrigger {
                start: REVEAL_START,
                toggle_actions: REVEAL_TOGGLE_ACTIONS,
            },
            y: self.offset_y,
            opacity: 0.0,
            duration: self.duration,
            delay: index as f64 * self.stagger,
            ease: self.ease,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn ease_is_clamped_to_one() {
        assert!((exponential_ease(0.0) - 0.001).abs() < 1e-12);
        assert_eq!(exponential_ease(1.0), 1.0);
        assert_eq!(exponential_ease(5.0), 1.0);
        assert!(exponential_ease(0.3) < exponential_ease(0.6));
    }

    #[test]
    fn smooth_scroll_options_use_engine_key_names() {
        let options = SmoothScrollOptions::from_config(&InteractionConfig::default());
        let value = serde_json::to_value(&options).expect("options serialize");

        assert_eq!(
            value,
            json!({
                "duration": 1.618,
                "orientation": "vertical",
                "gestureOrientation": "vertical",
                "smoothWheel": true,
                "wheelMultiplier": 1.0,
                "smoothTouch": false,
                "touchMultiplier": 2.0,
                "infinite": false,
            })
        );
    }

    #[test]
    fn card_tweens_are_staggered_by_index() {
        let cards = REVEAL_PRESETS
            .iter()
            .find(|preset| preset.category == RevealCategory::Cards)
            .expect("cards preset");

        assert_eq!(cards.tween_for(0).delay, 0.0);
        assert!((cards.tween_for(4).delay - 0.2).abs() < 1e-12);
    }

    #[test]
    fn heading_tween_plays_once_near_viewport_bottom() {
        let tween = REVEAL_PRESETS[0].tween_for(3);
        let value = serde_json::to_value(tween).expect("tween serializes");

        assert_eq!(
            value,
            json!({
                "scrollTrigger": {
                    "start": "top 95%",
                    "toggleActions": "play none none none",
                },
                "y": 21.0,
                "opacity": 0.0,
                "duration": 0.5,
                "ease": "power2.out",
            })
        );
    }

    #[test]
    fn paragraph_offset_is_shorter_than_headings() {
        let paragraphs = REVEAL_PRESETS[2];

        assert_eq!(paragraphs.category.as_str(), "paragraphs");
        assert_eq!(paragraphs.offset_y, 13.0);
        assert_eq!(paragraphs.duration, 0.4);
    }

    #[test]
    fn engine_settings_silence_warnings() {
        let value =
            serde_json::to_value(AnimationEngineSettings::QUIET).expect("settings serialize");

        assert_eq!(value, json!({ "nullTargetWarn": false, "trialWarn": false }));
    }
}
