use crate::{
    animation::{
        exponential_ease, AnimationEngineSettings, RevealPreset, SmoothScrollOptions,
        REVEAL_PRESETS,
    },
    config::InteractionConfig,
    frame::FrameLoop,
    telemetry::{log_event, LogLevel},
};
use js_sys::{Function, Reflect, JSON};
use serde::Serialize;
use serde_json::{json, Map, Value};
use std::rc::Rc;
use wasm_bindgen::{closure::Closure, prelude::wasm_bindgen, JsCast, JsValue};
use web_sys::{Document, Element};

#[wasm_bindgen]
extern "C" {
    #[derive(Clone)]
    type Lenis;

    #[wasm_bindgen(catch, constructor)]
    fn new(options: &JsValue) -> Result<Lenis, JsValue>;

    #[wasm_bindgen(method)]
    fn raf(this: &Lenis, time: f64);

    #[wasm_bindgen(method, catch)]
    fn on(this: &Lenis, event: &str, callback: &Function) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(method)]
    fn stop(this: &Lenis);

    #[wasm_bindgen(method)]
    fn start(this: &Lenis);

    #[wasm_bindgen(catch, js_namespace = gsap, js_name = config)]
    fn gsap_config(settings: &JsValue) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(catch, js_namespace = gsap, js_name = registerPlugin)]
    fn gsap_register_plugin(plugin: &JsValue) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(catch, js_namespace = gsap, js_name = from)]
    fn gsap_from(target: &Element, vars: &JsValue) -> Result<JsValue, JsValue>;
}

fn global_binding(name: &str) -> Option<JsValue> {
    Reflect::get(&js_sys::global(), &JsValue::from_str(name))
        .ok()
        .filter(|value| !value.is_undefined() && !value.is_null())
}

fn to_js_object<T: Serialize>(value: &T) -> Result<JsValue, JsValue> {
    let encoded =
        serde_json::to_string(value).map_err(|error| JsValue::from_str(&error.to_string()))?;
    JSON::parse(&encoded)
}

fn describe(error: &JsValue) -> String {
    error.as_string().unwrap_or_else(|| format!("{error:?}"))
}

#[derive(Clone)]
pub struct SmoothScroll {
    engine: Lenis,
    _easing: Rc<Closure<dyn Fn(f64) -> f64>>,
    log_level: LogLevel,
}

impl SmoothScroll {
    pub fn create(config: &InteractionConfig) -> Option<Self> {
        if global_binding("Lenis").is_none() {
            log_event(
                config.log_level,
                LogLevel::Warn,
                "smooth_scroll.unavailable",
                json!({ "engine": "Lenis" }),
            );
            return None;
        }

        let options = match to_js_object(&SmoothScrollOptions::from_config(config)) {
            Ok(options) => options,
            Err(error) => {
                log_event(
                    config.log_level,
                    LogLevel::Warn,
                    "smooth_scroll.options_failed",
                    json!({ "error": describe(&error) }),
                );
                return None;
            }
        };

        let easing = Closure::<dyn Fn(f64) -> f64>::new(|t: f64| exponential_ease(t));
        let _ = Reflect::set(&options, &JsValue::from_str("easing"), easing.as_ref());

        match Lenis::new(&options) {
            Ok(engine) => {
                log_event(
                    config.log_level,
                    LogLevel::Info,
                    "smooth_scroll.ready",
                    json!({ "duration": config.smooth_scroll_duration }),
                );
                Some(Self {
                    engine,
                    _easing: Rc::new(easing),
                    log_level: config.log_level,
                })
            }
            Err(error) => {
                log_event(
                    config.log_level,
                    LogLevel::Warn,
                    "smooth_scroll.construct_failed",
                    json!({ "error": describe(&error) }),
                );
                None
            }
        }
    }

    pub fn bridge_scroll_trigger(&self) -> bool {
        let Some(scroll_trigger) = global_binding("ScrollTrigger") else {
            return false;
        };

        let Some(update) = Reflect::get(&scroll_trigger, &JsValue::from_str("update"))
            .ok()
            .and_then(|value| value.dyn_into::<Function>().ok())
        else {
            return false;
        };

        let bridged = self
            .engine
            .on("scroll", &update.bind(&scroll_trigger))
            .is_ok();
        log_event(
            self.log_level,
            LogLevel::Debug,
            "smooth_scroll.bridged",
            json!({ "ok": bridged }),
        );
        bridged
    }

    pub fn drive(&self) -> FrameLoop {
        let engine = self.engine.clone();
        FrameLoop::start(move |time| engine.raf(time))
    }

    pub fn pause(&self) {
        self.engine.stop();
    }

    pub fn resume(&self) {
        self.engine.start();
    }
}

pub fn install_reveals(document: &Document, config: &InteractionConfig) {
    if global_binding("gsap").is_none() {
        log_event(
            config.log_level,
            LogLevel::Warn,
            "reveal.unavailable",
            json!({ "engine": "gsap" }),
        );
        return;
    }

    let configured = to_js_object(&AnimationEngineSettings::QUIET)
        .and_then(|settings| gsap_config(&settings));
    if let Err(error) = configured {
        log_event(
            config.log_level,
            LogLevel::Debug,
            "reveal.config_failed",
            json!({ "error": describe(&error) }),
        );
    }

    let Some(scroll_trigger) = global_binding("ScrollTrigger") else {
        log_event(
            config.log_level,
            LogLevel::Warn,
            "reveal.unavailable",
            json!({ "engine": "ScrollTrigger" }),
        );
        return;
    };

    if let Err(error) = gsap_register_plugin(&scroll_trigger) {
        log_event(
            config.log_level,
            LogLevel::Warn,
            "reveal.plugin_failed",
            json!({ "error": describe(&error) }),
        );
        return;
    }

    let mut registered = Map::new();
    for preset in &REVEAL_PRESETS {
        registered.insert(
            preset.category.as_str().to_string(),
            json!(register_preset(document, preset)),
        );
    }

    log_event(
        config.log_level,
        LogLevel::Info,
        "reveal.ready",
        Value::Object(registered),
    );
}

fn register_preset(document: &Document, preset: &RevealPreset) -> usize {
    let Ok(nodes) = document.query_selector_all(preset.selector) else {
        return 0;
    };

    let mut registered = 0;
    for index in 0..nodes.length() {
        let Some(element) = nodes
            .item(index)
            .and_then(|node| node.dyn_into::<Element>().ok())
        else {
            continue;
        };

        let Ok(vars) = to_js_object(&preset.tween_for(index as usize)) else {
            continue;
        };

        let attached =
            Reflect::get(&vars, &JsValue::from_str("scrollTrigger")).and_then(|trigger| {
                Reflect::set(&trigger, &JsValue::from_str("trigger"), &element)
            });

        if attached.is_ok() && gsap_from(&element, &vars).is_ok() {
            registered += 1;
        }
    }

    registered
}
