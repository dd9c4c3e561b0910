use crate::{
    config::{InteractionConfig, CONFIG_ELEMENT_ID},
    engines::{self, SmoothScroll},
    frame::FrameLoop,
    motion::{
        css_percent, css_px, halo_position, looped_content, CursorTrail, MarqueePlayback,
        Point, ScrollDirection,
    },
    overlay::{accepted_chat_message, LockTransition, OverlayKind, OverlayState, ReleaseToken},
    telemetry::{log_event, LogLevel},
};
use gloo::{
    events::{EventListener, EventListenerOptions},
    timers::callback::Timeout,
};
use js_sys::Reflect;
use serde_json::json;
use std::{cell::RefCell, rc::Rc};
use wasm_bindgen::{closure::Closure, JsCast, JsValue};
use web_sys::{
    window, Document, Element, Event, HtmlElement, HtmlImageElement, HtmlInputElement,
    KeyboardEvent, MouseEvent, ScrollBehavior, ScrollToOptions,
};

const MARQUEE_TRACK_SELECTOR: &str = ".skills-marquee-track";
const MARQUEE_WRAPPER_SELECTOR: &str = ".skills-marquee-wrapper";
const MARQUEE_LOOPED_ATTRIBUTE: &str = "data-marquee-looped";
const CHIP_CLASS: &str = "chip";
const HALO_SECTION_SELECTOR: &str = ".phi-section";
const PROJECT_MODAL_ID: &str = "project-modal";
const PROJECT_BODY_ID: &str = "modal-body";
const PROJECT_TEMPLATE_PREFIX: &str = "content-";
const CHAT_MODAL_ID: &str = "chat-modal";
const CHAT_FORM_SELECTOR: &str = ".chat-input-area";
const CHAT_INPUT_SELECTOR: &str = ".chat-input";
const LIGHTBOX_MODAL_ID: &str = "lightbox-modal";
const LIGHTBOX_IMAGE_ID: &str = "lightbox-image";
const CURSOR_ID: &str = "custom-cursor";
const ACTIVE_CLASS: &str = "active";
const ESCAPE_KEY: &str = "Escape";

type EntryPoint = Closure<dyn Fn(JsValue)>;

thread_local! {
    static MOUNTED: RefCell<Option<Page>> = const { RefCell::new(None) };
}

struct Page {
    _listeners: Vec<EventListener>,
    _frames: Vec<FrameLoop>,
    _entry_points: Vec<EntryPoint>,
    _reveal_timer: Timeout,
}

fn query_html(document: &Document, selector: &str) -> Option<HtmlElement> {
    document
        .query_selector(selector)
        .ok()
        .flatten()?
        .dyn_into::<HtmlElement>()
        .ok()
}

fn viewport_size() -> (f64, f64) {
    let Some(win) = window() else {
        return (1280.0, 720.0);
    };

    let width = win
        .inner_width()
        .ok()
        .and_then(|value| value.as_f64())
        .unwrap_or(1280.0);
    let height = win
        .inner_height()
        .ok()
        .and_then(|value| value.as_f64())
        .unwrap_or(720.0);

    (width, height)
}

fn load_config(document: &Document) -> InteractionConfig {
    let Some(raw) = document
        .get_element_by_id(CONFIG_ELEMENT_ID)
        .and_then(|element| element.text_content())
    else {
        return InteractionConfig::default();
    };

    match InteractionConfig::from_json(&raw) {
        Ok(config) => config,
        Err(error) => {
            let config = InteractionConfig::default();
            log_event(
                config.log_level,
                LogLevel::Warn,
                "config.invalid",
                json!({ "error": error.to_string() }),
            );
            config
        }
    }
}

fn loop_marquee(document: &Document, config: &InteractionConfig) {
    let Some(track) = document.query_selector(MARQUEE_TRACK_SELECTOR).ok().flatten() else {
        log_event(config.log_level, LogLevel::Debug, "marquee.absent", json!({}));
        return;
    };

    if track.has_attribute(MARQUEE_LOOPED_ATTRIBUTE) {
        return;
    }

    track.set_inner_html(&looped_content(&track.inner_html()));
    let _ = track.set_attribute(MARQUEE_LOOPED_ATTRIBUTE, "");
}

fn track_halo(document: &Document) -> Vec<EventListener> {
    let Ok(sections) = document.query_selector_all(HALO_SECTION_SELECTOR) else {
        return Vec::new();
    };

    (0..sections.length())
        .filter_map(|index| sections.item(index))
        .filter_map(|node| node.dyn_into::<HtmlElement>().ok())
        .map(|section| {
            let target = section.clone();
            EventListener::new(&target, "mousemove", move |event| {
                let Some(event) = event.dyn_ref::<MouseEvent>() else {
                    return;
                };

                let rect = section.get_bounding_client_rect();
                let Some(point) = halo_position(
                    f64::from(event.client_x()) - rect.left(),
                    f64::from(event.client_y()) - rect.top(),
                    rect.width(),
                    rect.height(),
                ) else {
                    return;
                };

                let style = section.style();
                let _ = style.set_property("--mouse-x", &css_percent(point.x));
                let _ = style.set_property("--mouse-y", &css_percent(point.y));
            })
        })
        .collect()
}

fn set_marquee_running(track: &HtmlElement, running: bool) {
    let state = if running { "running" } else { "paused" };
    let _ = track.style().set_property("animation-play-state", state);
}

fn bind_chip_scroll(document: &Document, config: &InteractionConfig) -> Option<EventListener> {
    let wrapper = query_html(document, MARQUEE_WRAPPER_SELECTOR)?;
    let track = query_html(document, MARQUEE_TRACK_SELECTOR)?;
    let _ = wrapper.style().set_property("cursor", "pointer");

    let playback = Rc::new(RefCell::new(MarqueePlayback::default()));
    let mut resume_timer: Option<Timeout> = None;
    let step = config.chip_scroll_step;
    let resume_delay_ms = config.chip_resume_delay_ms;
    let target = wrapper.clone();

    Some(EventListener::new(&target, "click", move |event| {
        let Some(event) = event.dyn_ref::<MouseEvent>() else {
            return;
        };

        let on_chip = event
            .target()
            .and_then(|target| target.dyn_into::<Element>().ok())
            .map(|element| element.class_list().contains(CHIP_CLASS))
            .unwrap_or(false);

        let token = playback.borrow_mut().on_click(on_chip);
        if let Some(token) = token {
            set_marquee_running(&track, false);

            let track = track.clone();
            let playback = Rc::clone(&playback);
            let timer = Timeout::new(resume_delay_ms, move || {
                if playback.borrow_mut().resume(token) {
                    set_marquee_running(&track, true);
                }
            });
            if let Some(previous) = resume_timer.replace(timer) {
                let _ = previous.cancel();
            }
        }

        let rect = wrapper.get_bounding_client_rect();
        let click_x = f64::from(event.client_x()) - rect.left();
        let direction = ScrollDirection::from_click(click_x, rect.width());

        let options = ScrollToOptions::new();
        options.set_left(direction.offset(step));
        options.set_behavior(ScrollBehavior::Smooth);
        wrapper.scroll_by_with_scroll_to_options(&options);
    }))
}

fn is_touch_device() -> bool {
    let Some(win) = window() else {
        return false;
    };

    let touch_start = JsValue::from_str("ontouchstart");
    let has_touch_start = Reflect::has(&win, &touch_start).unwrap_or(false);
    let navigator = win.navigator();
    let legacy_touch_points = Reflect::get(&navigator, &JsValue::from_str("msMaxTouchPoints"))
        .ok()
        .and_then(|value| value.as_f64())
        .unwrap_or(0.0);

    has_touch_start || navigator.max_touch_points() > 0 || legacy_touch_points > 0.0
}

fn place_cursor(cursor: &HtmlElement, position: Point) {
    let style = cursor.style();
    let _ = style.set_property("left", &css_px(position.x));
    let _ = style.set_property("top", &css_px(position.y));
}

fn render_cursor(
    document: &Document,
    config: &InteractionConfig,
) -> Option<(Vec<EventListener>, FrameLoop)> {
    let cursor = document
        .get_element_by_id(CURSOR_ID)
        .and_then(|element| element.dyn_into::<HtmlElement>().ok());

    if is_touch_device() {
        if let Some(cursor) = cursor.as_ref() {
            let _ = cursor.style().set_property("display", "none");
        }
        if let Some(body) = document.body() {
            let _ = body.style().set_property("cursor", "auto");
        }
        log_event(config.log_level, LogLevel::Debug, "cursor.touch_device", json!({}));
        return None;
    }

    let Some(cursor) = cursor else {
        log_event(
            config.log_level,
            LogLevel::Warn,
            "cursor.absent",
            json!({ "id": CURSOR_ID }),
        );
        return None;
    };

    let (viewport_width, viewport_height) = viewport_size();
    let trail = Rc::new(RefCell::new(CursorTrail::centered(
        viewport_width,
        viewport_height,
        config.cursor_lag,
    )));

    let follow = {
        let trail = Rc::clone(&trail);
        EventListener::new(document, "mousemove", move |event| {
            if let Some(event) = event.dyn_ref::<MouseEvent>() {
                trail
                    .borrow_mut()
                    .set_target(f64::from(event.client_x()), f64::from(event.client_y()));
            }
        })
    };

    let hide = {
        let cursor = cursor.clone();
        EventListener::new(document, "mouseleave", move |_| {
            let _ = cursor.style().set_property("opacity", "0");
        })
    };

    let show = {
        let cursor = cursor.clone();
        EventListener::new(document, "mouseenter", move |_| {
            let _ = cursor.style().set_property("opacity", "1");
        })
    };

    place_cursor(&cursor, trail.borrow().rendered());
    let frame = FrameLoop::start(move |_| {
        let position = trail.borrow_mut().step();
        place_cursor(&cursor, position);
    });

    log_event(config.log_level, LogLevel::Info, "cursor.ready", json!({}));
    Some((vec![follow, hide, show], frame))
}

struct Overlays {
    document: Document,
    config: Rc<InteractionConfig>,
    state: RefCell<OverlayState>,
    pending_release: RefCell<Option<Timeout>>,
    smooth_scroll: Option<SmoothScroll>,
}

impl Overlays {
    fn new(
        document: Document,
        config: Rc<InteractionConfig>,
        smooth_scroll: Option<SmoothScroll>,
    ) -> Self {
        Self {
            document,
            config,
            state: RefCell::new(OverlayState::default()),
            pending_release: RefCell::new(None),
            smooth_scroll,
        }
    }

    fn element(&self, id: &str) -> Option<Element> {
        self.document.get_element_by_id(id)
    }

    fn set_active(&self, id: &str, active: bool) {
        if let Some(element) = self.element(id) {
            let _ = element.class_list().toggle_with_force(ACTIVE_CLASS, active);
        }
    }

    fn apply(&self, kind: OverlayKind, transition: LockTransition) {
        if transition != LockTransition::Unchanged {
            let locked = transition == LockTransition::Engaged;
            log_event(
                self.config.log_level,
                LogLevel::Debug,
                "scroll_lock.changed",
                json!({ "overlay": kind.as_str(), "locked": locked }),
            );
        }

        let Some(body) = self.document.body() else {
            return;
        };

        match transition {
            LockTransition::Engaged => {
                let _ = body.style().set_property("overflow", "hidden");
                if let Some(smooth_scroll) = self.smooth_scroll.as_ref() {
                    smooth_scroll.pause();
                }
            }
            LockTransition::Released => {
                let _ = body.style().remove_property("overflow");
                if let Some(smooth_scroll) = self.smooth_scroll.as_ref() {
                    smooth_scroll.resume();
                }
            }
            LockTransition::Unchanged => {}
        }
    }

    fn open_project(&self, project_id: &str) {
        let template_id = format!("{PROJECT_TEMPLATE_PREFIX}{project_id}");
        let elements = self
            .element(PROJECT_MODAL_ID)
            .zip(self.element(PROJECT_BODY_ID))
            .zip(self.element(&template_id));

        let transition = self.state.borrow_mut().open_project(elements.is_some());
        let (Some(transition), Some(((modal, body), template))) = (transition, elements) else {
            log_event(
                self.config.log_level,
                LogLevel::Debug,
                "project.unavailable",
                json!({ "project": project_id }),
            );
            return;
        };

        drop(self.pending_release.borrow_mut().take());
        body.set_inner_html(&template.inner_html());
        let _ = modal.class_list().add_1(ACTIVE_CLASS);
        self.apply(OverlayKind::Project, transition);
        body.set_scroll_top(0);
    }

    fn close_project(self: &Rc<Self>) {
        let token = self.state.borrow_mut().close_project();
        self.set_active(PROJECT_MODAL_ID, false);
        self.schedule_release(token);
    }

    // Replacing the pending timeout drops, and so cancels, the previous one.
    fn schedule_release(self: &Rc<Self>, token: ReleaseToken) {
        let overlays = Rc::downgrade(self);
        let timer = Timeout::new(self.config.project_exit_ms, move || {
            let Some(overlays) = overlays.upgrade() else {
                return;
            };

            let transition = overlays.state.borrow_mut().complete_release(token);
            overlays.apply(OverlayKind::Project, transition);
        });

        *self.pending_release.borrow_mut() = Some(timer);
    }

    fn toggle_chat(&self) {
        let Some(chat) = self.element(CHAT_MODAL_ID) else {
            return;
        };

        let (open, transition) = self.state.borrow_mut().toggle_chat();
        let _ = chat.class_list().toggle_with_force(ACTIVE_CLASS, open);
        self.apply(OverlayKind::Chat, transition);
    }

    fn open_lightbox(&self, src: &str) {
        let (Some(lightbox), Some(image)) = (
            self.element(LIGHTBOX_MODAL_ID),
            self.element(LIGHTBOX_IMAGE_ID)
                .and_then(|element| element.dyn_into::<HtmlImageElement>().ok()),
        ) else {
            return;
        };

        image.set_src(src);
        let _ = lightbox.class_list().add_1(ACTIVE_CLASS);
        let transition = self.state.borrow_mut().open_lightbox();
        self.apply(OverlayKind::Lightbox, transition);
    }

    fn close_lightbox(&self) {
        let transition = self.state.borrow_mut().close_lightbox();
        self.set_active(LIGHTBOX_MODAL_ID, false);
        self.apply(OverlayKind::Lightbox, transition);
    }

    fn escape(self: &Rc<Self>) {
        let effects = self.state.borrow_mut().escape();

        self.set_active(PROJECT_MODAL_ID, false);
        self.schedule_release(effects.project_release);

        if let Some(transition) = effects.chat {
            self.set_active(CHAT_MODAL_ID, false);
            self.apply(OverlayKind::Chat, transition);
        }

        self.set_active(LIGHTBOX_MODAL_ID, false);
        self.apply(OverlayKind::Lightbox, effects.lightbox);
    }
}

fn is_escape(event: &Event) -> bool {
    event
        .dyn_ref::<KeyboardEvent>()
        .map(|event| event.key() == ESCAPE_KEY)
        .unwrap_or(false)
}

fn bind_escape(document: &Document, overlays: &Rc<Overlays>) -> EventListener {
    let overlays = Rc::clone(overlays);
    EventListener::new(document, "keydown", move |event| {
        if is_escape(event) {
            overlays.escape();
        }
    })
}

fn bind_chat_form(document: &Document, config: &InteractionConfig) -> Option<EventListener> {
    let form = document.query_selector(CHAT_FORM_SELECTOR).ok().flatten()?;
    let target = form.clone();
    let notice = config.chat_notice.clone();

    Some(EventListener::new_with_options(
        &target,
        "submit",
        EventListenerOptions::enable_prevent_default(),
        move |event| {
            event.prevent_default();

            let Some(input) = form
                .query_selector(CHAT_INPUT_SELECTOR)
                .ok()
                .flatten()
                .and_then(|element| element.dyn_into::<HtmlInputElement>().ok())
            else {
                return;
            };

            if accepted_chat_message(&input.value()).is_none() {
                return;
            }

            input.set_value("");
            gloo::dialogs::alert(&notice);
        },
    ))
}

fn publish_entry_points(overlays: &Rc<Overlays>) -> Vec<EntryPoint> {
    let Some(win) = window() else {
        return Vec::new();
    };

    let entries: Vec<(&str, EntryPoint)> = vec![
        ("openProject", {
            let overlays = Rc::clone(overlays);
            Closure::<dyn Fn(JsValue)>::new(move |project_id: JsValue| {
                if let Some(project_id) = project_id.as_string() {
                    overlays.open_project(&project_id);
                }
            })
        }),
        ("closeProject", {
            let overlays = Rc::clone(overlays);
            Closure::<dyn Fn(JsValue)>::new(move |_: JsValue| overlays.close_project())
        }),
        ("toggleChatModal", {
            let overlays = Rc::clone(overlays);
            Closure::<dyn Fn(JsValue)>::new(move |_: JsValue| overlays.toggle_chat())
        }),
        ("openLightbox", {
            let overlays = Rc::clone(overlays);
            Closure::<dyn Fn(JsValue)>::new(move |src: JsValue| {
                if let Some(src) = src.as_string() {
                    overlays.open_lightbox(&src);
                }
            })
        }),
        ("closeLightbox", {
            let overlays = Rc::clone(overlays);
            Closure::<dyn Fn(JsValue)>::new(move |_: JsValue| overlays.close_lightbox())
        }),
    ];

    entries
        .into_iter()
        .filter_map(|(name, callback)| {
            Reflect::set(&win, &JsValue::from_str(name), callback.as_ref())
                .ok()
                .map(|_| callback)
        })
        .collect()
}

fn mount(document: &Document) {
    let config = Rc::new(load_config(document));
    let mut listeners = Vec::new();
    let mut frames = Vec::new();

    loop_marquee(document, &config);
    listeners.extend(track_halo(document));
    listeners.extend(bind_chip_scroll(document, &config));

    let smooth_scroll = SmoothScroll::create(&config);
    if let Some(smooth_scroll) = smooth_scroll.as_ref() {
        smooth_scroll.bridge_scroll_trigger();
        frames.push(smooth_scroll.drive());
    }
    let smooth_scroll_ready = smooth_scroll.is_some();

    if let Some((cursor_listeners, cursor_frame)) = render_cursor(document, &config) {
        listeners.extend(cursor_listeners);
        frames.push(cursor_frame);
    }

    let overlays = Rc::new(Overlays::new(
        document.clone(),
        Rc::clone(&config),
        smooth_scroll,
    ));
    listeners.push(bind_escape(document, &overlays));
    listeners.extend(bind_chat_form(document, &config));
    let entry_points = publish_entry_points(&overlays);

    let reveal_timer = {
        let document = document.clone();
        let config = Rc::clone(&config);
        Timeout::new(config.reveal_delay_ms, move || {
            engines::install_reveals(&document, &config)
        })
    };

    log_event(
        config.log_level,
        LogLevel::Info,
        "page.mounted",
        json!({
            "listeners": listeners.len(),
            "frame_loops": frames.len(),
            "entry_points": entry_points.len(),
            "smooth_scroll": smooth_scroll_ready,
        }),
    );

    let page = Page {
        _listeners: listeners,
        _frames: frames,
        _entry_points: entry_points,
        _reveal_timer: reveal_timer,
    };

    // A previously mounted page is dropped here, detaching everything it attached.
    MOUNTED.with(|mounted| drop(mounted.replace(Some(page))));
}

pub fn run() {
    console_error_panic_hook::set_once();

    let Some(document) = window().and_then(|w| w.document()) else {
        return;
    };

    if document.ready_state() == "loading" {
        let ready_document = document.clone();
        EventListener::once(&document, "DOMContentLoaded", move |_| mount(&ready_document))
            .forget();
    } else {
        mount(&document);
    }
}
