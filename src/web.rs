//! Browser bootstrap.
//!
//! Exposes the wasm-bindgen entry points and wires the presentation
//! controller to the real document: a DOM-backed [`Stage`], image
//! `load`/`error` listeners, transition-end listeners and timers. Everything
//! here runs on the page's main thread; the controller lives in a
//! thread-local for the lifetime of the page.

use std::cell::RefCell;
use std::rc::Rc;

use gloo::events::{EventListener, EventListenerOptions};
use gloo::timers::callback::{Interval, Timeout};
use js_sys::{Array, Function, Object, Reflect};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Document, Element, HtmlElement, HtmlImageElement, Window, console};

use crate::auth;
use crate::capability;
use crate::config::{CardConfig, PageGlobal};
use crate::cycle;
use crate::presentation::{Effect, Presentation};
use crate::provision::ImagePlan;
use crate::shuffle;
use crate::stage::{Flag, ImageLayout, Stage, Target};
use crate::standalone::{self, LinkAction};
use crate::state::TransitionError;
use crate::types::Viewport;

thread_local! {
    static CARD: RefCell<Option<Rc<Card>>> = const { RefCell::new(None) };
}

fn js_error(message: impl std::fmt::Display) -> JsValue {
    js_sys::Error::new(&message.to_string()).into()
}

fn window() -> Result<Window, JsValue> {
    web_sys::window().ok_or_else(|| js_error("no global window"))
}

fn document(window: &Window) -> Result<Document, JsValue> {
    window.document().ok_or_else(|| js_error("window has no document"))
}

fn select(document: &Document, selector: &str) -> Result<HtmlElement, JsValue> {
    document
        .query_selector(selector)?
        .ok_or_else(|| js_error(format!("{selector} element not found")))?
        .dyn_into::<HtmlElement>()
        .map_err(|_| js_error(format!("{selector} is not an HTML element")))
}

/// Run `f` once the DOM is parsed.
///
/// When the document is already past `loading`, `f` runs immediately and its
/// error is returned to the caller; otherwise it is reported on the console.
fn ready(f: impl FnOnce() -> Result<(), JsValue> + 'static) -> Result<(), JsValue> {
    let document = document(&window()?)?;
    if document.ready_state() != "loading" {
        return f();
    }
    EventListener::once(&document, "DOMContentLoaded", move |_| {
        if let Err(err) = f() {
            console::error_1(&err);
        }
    })
    .forget();
    Ok(())
}

// ============================================================================
// DOM stage
// ============================================================================

struct DomStage {
    cover: HtmlElement,
    images: HtmlElement,
    elements: Vec<HtmlImageElement>,
    viewport: Viewport,
    transform: &'static str,
}

impl DomStage {
    fn element(&self, target: Target) -> Option<&Element> {
        let el: &Element = match target {
            Target::Cover => &self.cover,
            Target::Images => &self.images,
            Target::Image(index) => self.elements.get(index)?,
        };
        Some(el)
    }
}

impl Stage for DomStage {
    fn viewport(&self) -> Viewport {
        self.viewport
    }

    fn append_image(&mut self, plan: &ImagePlan) -> usize {
        let img = match HtmlImageElement::new() {
            Ok(img) => img,
            Err(err) => {
                console::error_2(&"could not create image element".into(), &err);
                return self.elements.len();
            }
        };
        img.set_srcset(&plan.srcset);
        img.set_sizes(&plan.sizes);
        let _ = img.class_list().add_1("image");
        // An explicit pixel height instead of `height: 100%`: old iOS Safari
        // zooms further on every transform otherwise.
        img.style().set_css_text(&format!("height: {}px;", plan.height));
        if let Err(err) = self.images.append_child(&img) {
            console::error_2(&"could not append image element".into(), &err);
        }
        self.elements.push(img);
        self.elements.len() - 1
    }

    fn add_flag(&mut self, target: Target, flag: Flag) {
        if let Some(el) = self.element(target) {
            let _ = el.class_list().add_1(flag.class_name());
        }
    }

    fn remove_flag(&mut self, target: Target, flag: Flag) {
        if let Some(el) = self.element(target) {
            let _ = el.class_list().remove_1(flag.class_name());
        }
    }

    fn image_layout(&self, index: usize) -> ImageLayout {
        self.elements
            .get(index)
            .map(|img| ImageLayout {
                offset_left: img.offset_left() as f64,
                width: img.width() as f64,
            })
            .unwrap_or(ImageLayout {
                offset_left: 0.0,
                width: 0.0,
            })
    }

    fn translate_images(&mut self, x: f64) {
        self.images
            .style()
            .set_css_text(&cycle::translate_css(self.transform, x));
    }
}

// ============================================================================
// Card runtime
// ============================================================================

type Handler = fn(&mut Presentation<DomStage>) -> Result<Vec<Effect>, TransitionError>;

struct Card {
    presentation: RefCell<Presentation<DomStage>>,
    transition_event: &'static str,
    listeners: RefCell<Vec<EventListener>>,
    cycling: RefCell<Option<Interval>>,
    /// Pending focus release per image. A new timer replaces (and frees) the
    /// one from the previous lap.
    focus_timers: RefCell<Vec<Option<Timeout>>>,
}

impl Card {
    fn apply(self: &Rc<Self>, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::ScheduleCoverTimeout { after } => {
                    let card = Rc::clone(self);
                    Timeout::new(millis(after), move || {
                        let result = card.presentation.borrow_mut().on_cover_timeout();
                        card.settle(result);
                    })
                    .forget();
                }
                Effect::ScheduleReload { after } => {
                    Timeout::new(millis(after), || {
                        if let Some(window) = web_sys::window() {
                            let _ = window.location().reload();
                        }
                    })
                    .forget();
                }
                Effect::AwaitCoverFade => {
                    let cover = self.presentation.borrow().stage().cover.clone();
                    self.once_transition_end(&cover, Presentation::on_cover_faded);
                }
                Effect::AwaitImagesFade => {
                    let images = self.presentation.borrow().stage().images.clone();
                    self.once_transition_end(&images, Presentation::on_images_faded);
                }
                Effect::StartCycling { interval } => {
                    let card = Rc::clone(self);
                    let handle = Interval::new(millis(interval), move || {
                        let effects = card.presentation.borrow_mut().tick();
                        card.apply(effects);
                    });
                    *self.cycling.borrow_mut() = Some(handle);
                }
                Effect::ReleaseFocus { index, after } => {
                    let card = Rc::clone(self);
                    let timer = Timeout::new(millis(after), move || {
                        card.presentation.borrow_mut().release_focus(index);
                    });
                    let mut timers = self.focus_timers.borrow_mut();
                    if timers.len() <= index {
                        timers.resize_with(index + 1, || None);
                    }
                    timers[index] = Some(timer);
                }
            }
        }
    }

    fn settle(self: &Rc<Self>, result: Result<Vec<Effect>, TransitionError>) {
        match result {
            Ok(effects) => self.apply(effects),
            Err(err) => tracing::debug!(%err, "ignored event"),
        }
    }

    fn once_transition_end(self: &Rc<Self>, target: &HtmlElement, handler: Handler) {
        let card = Rc::clone(self);
        let listener = EventListener::once(target, self.transition_event, move |_| {
            let result = handler(&mut card.presentation.borrow_mut());
            card.settle(result);
        });
        self.listeners.borrow_mut().push(listener);
    }

    fn watch_images(self: &Rc<Self>) {
        let elements = self.presentation.borrow().stage().elements.clone();
        let mut listeners = self.listeners.borrow_mut();
        for (index, img) in elements.iter().enumerate() {
            let card = Rc::clone(self);
            listeners.push(EventListener::new(img, "load", move |_| {
                let result = card.presentation.borrow_mut().on_image_loaded();
                card.settle(result);
            }));

            let card = Rc::clone(self);
            let src = img.srcset();
            listeners.push(EventListener::new(img, "error", move |_| {
                console::warn_1(&format!("image {index} failed to load: {src}").into());
                card.presentation.borrow_mut().on_image_failed(index);
            }));
        }
    }
}

fn millis(ms: u64) -> u32 {
    u32::try_from(ms).unwrap_or(u32::MAX)
}

/// Hand the new elements to `window.picturefill`, when the polyfill is loaded.
fn run_picturefill(window: &Window, elements: &[HtmlImageElement]) -> Result<(), JsValue> {
    let Ok(polyfill) = Reflect::get(window, &"picturefill".into())?.dyn_into::<Function>() else {
        return Ok(());
    };
    let options = Object::new();
    Reflect::set(&options, &"reevaluate".into(), &JsValue::TRUE)?;
    let list: Array = elements.iter().collect();
    Reflect::set(&options, &"elements".into(), &list)?;
    polyfill.call1(&JsValue::NULL, &options)?;
    Ok(())
}

fn read_page_global(window: &Window) -> Result<CardConfig, JsValue> {
    let global = Reflect::get(window, &"Gallo".into())?;
    if global.is_undefined() || global.is_null() {
        return Err(js_error("Gallo page global not set"));
    }
    let json: String = js_sys::JSON::stringify(&global)?.into();
    PageGlobal::from_json(&json)
        .and_then(PageGlobal::into_card_config)
        .map_err(js_error)
}

fn bootstrap() -> Result<(), JsValue> {
    let window = window()?;
    let document = document(&window)?;

    let images = select(&document, ".images")?;
    let cover = select(&document, ".cover")?;
    let mut config = read_page_global(&window)?;

    let body = document
        .body()
        .ok_or_else(|| js_error("document has no body"))?;
    let height = window.inner_height()?.as_f64().unwrap_or(body.offset_height() as f64);
    let viewport = Viewport::new(body.offset_width() as f64, height);

    let probe = document
        .create_element("fakeelement")?
        .dyn_into::<HtmlElement>()?
        .style();
    let supports = |property: &str| {
        Reflect::get(&probe, &JsValue::from_str(property))
            .map(|value| !value.is_undefined())
            .unwrap_or(false)
    };
    let transform = capability::transform_property(&supports);
    let transition_event = capability::transition_end_event(&supports);

    let seed = (js_sys::Math::random() * u64::MAX as f64) as u64;
    config.images = shuffle::shuffle(config.images, &mut shuffle::seeded_rng(seed));

    let stage = DomStage {
        cover,
        images,
        elements: Vec::new(),
        viewport,
        transform,
    };
    let presentation = Presentation::new(stage, config).map_err(js_error)?;
    let start = presentation.start();

    let card = Rc::new(Card {
        presentation: RefCell::new(presentation),
        transition_event,
        listeners: RefCell::new(Vec::new()),
        cycling: RefCell::new(None),
        focus_timers: RefCell::new(Vec::new()),
    });
    card.watch_images();
    run_picturefill(&window, &card.presentation.borrow().stage().elements)?;
    card.apply(start);

    CARD.with(|slot| *slot.borrow_mut() = Some(card));
    Ok(())
}

// ============================================================================
// Entry points
// ============================================================================

/// Start the slideshow card on this page.
///
/// Requires `.cover` and `.images` elements and the `window.Gallo` page
/// global; throws when any of them is missing.
#[wasm_bindgen]
pub fn present() -> Result<(), JsValue> {
    ready(bootstrap)
}

/// Forward a provider token found in the URL fragment to the auth endpoint.
#[wasm_bindgen(js_name = redeemAuthToken)]
pub fn redeem_auth_token() -> Result<(), JsValue> {
    ready(|| {
        let location = window()?.location();
        if let Some(url) = auth::redirect_for_hash(&location.hash()?) {
            location.set_href(&url)?;
        }
        Ok(())
    })
}

/// Keep link navigation inside the home-screen app shell.
#[wasm_bindgen(js_name = installStandalone)]
pub fn install_standalone() -> Result<(), JsValue> {
    let window = window()?;
    let standalone = Reflect::get(&window.navigator(), &"standalone".into())?;
    if standalone.as_bool() != Some(true) {
        return Ok(());
    }
    ready(move || {
        let document = document(&window)?;
        let links = document.query_selector_all("a")?;
        for i in 0..links.length() {
            let Some(link) = links.get(i).and_then(|node| node.dyn_into::<Element>().ok()) else {
                continue;
            };
            let target = link.clone();
            EventListener::new_with_options(
                &target,
                "click",
                EventListenerOptions::enable_prevent_default(),
                move |event| {
                    event.prevent_default();
                    let action = standalone::link_action(
                        link.get_attribute("href").as_deref(),
                        link.get_attribute("target").as_deref(),
                    );
                    let Some(window) = web_sys::window() else {
                        return;
                    };
                    let result = match action {
                        LinkAction::Open { href, target } => window
                            .open_with_url_and_target(&href, &target)
                            .map(|_| ()),
                        LinkAction::Navigate { href } => window.location().set_href(&href),
                    };
                    if let Err(err) = result {
                        console::error_1(&err);
                    }
                },
            )
            .forget();
        }
        if let Some(body) = document.body() {
            body.class_list().add_1(standalone::STANDALONE_CLASS)?;
        }
        Ok(())
    })
}

/// Runs on module instantiation.
#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    install_standalone()?;
    redeem_auth_token()
}
