//! WebAssembly entry point and DOM glue.

use crate::page::{self, BOARD_ID, CLEAR_BUTTON_ID, LAYER_ID, TOOL_BUTTON_SELECTOR};
use kurbo::{Point, Rect};
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use tokenboard_core::storage::{KeyValueStore, LocalStorageStore, MemoryStore};
use tokenboard_core::{
    BoardController, BoardSurface, PointerEvent, TokenId, TokenVisual, VisualSink, VisualState,
};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, EventTarget, HtmlElement};

type Controller = BoardController<Box<dyn KeyValueStore>, DomSink>;

/// Controls drawn inside every token: (class, label, title).
const CONTROLS: [(&str, &str, &str); 3] = [
    ("token-del", "✕", "Remove"),
    ("token-rot", "R", "Drag to rotate"),
    ("token-size", "<>", "Drag to resize"),
];

/// The board element, measured fresh on every call.
struct DomSurface {
    board: Element,
}

impl BoardSurface for DomSurface {
    fn bounds(&self) -> Rect {
        let rect = self.board.get_bounding_client_rect();
        Rect::new(rect.left(), rect.top(), rect.right(), rect.bottom())
    }
}

/// Renders token visuals as absolutely positioned elements.
pub struct DomSink {
    document: Document,
    layer: Element,
    elements: HashMap<TokenId, HtmlElement>,
}

impl DomSink {
    fn new(document: Document, layer: Element) -> Self {
        Self {
            document,
            layer,
            elements: HashMap::new(),
        }
    }

    fn create(&self, visual: &TokenVisual) -> Result<HtmlElement, JsValue> {
        let token: HtmlElement = self.document.create_element("div")?.dyn_into()?;
        token.set_class_name("token");

        let inner = self.document.create_element("div")?;
        inner.set_class_name("token-inner");

        let img = self.document.create_element("img")?;
        img.set_class_name("token-img");
        img.set_attribute("src", &visual.src)?;
        img.set_attribute("alt", &visual.kind)?;
        img.set_attribute("draggable", "false")?;
        inner.append_child(&img)?;

        for (class, label, title) in CONTROLS {
            let control = self.document.create_element("div")?;
            control.set_class_name(class);
            control.set_text_content(Some(label));
            control.set_attribute("title", title)?;
            inner.append_child(&control)?;
        }

        token.append_child(&inner)?;
        self.layer.append_child(&token)?;
        Ok(token)
    }

    fn render(&mut self, visual: &TokenVisual) -> Result<(), JsValue> {
        let element = match self.elements.get(&visual.id) {
            Some(element) => element.clone(),
            None => {
                let element = self.create(visual)?;
                self.elements.insert(visual.id.clone(), element.clone());
                element
            }
        };

        element.set_attribute("data-id", visual.id.as_str())?;
        element.set_attribute("data-type", &visual.kind)?;

        let style = element.style();
        style.set_property("left", &format!("{}%", visual.left_percent))?;
        style.set_property("top", &format!("{}%", visual.top_percent))?;
        style.set_property("transform", &visual.transform())?;
        style.set_property(
            "opacity",
            if visual.state == VisualState::Placing { "0.85" } else { "1" },
        )?;
        element
            .class_list()
            .toggle_with_force("selected", visual.state.shows_handles())?;

        if let Some(img) = element.query_selector(".token-img")? {
            if let Some(img) = img.dyn_ref::<HtmlElement>() {
                let edge = format!("{}px", visual.edge_px);
                img.style().set_property("width", &edge)?;
                img.style().set_property("height", &edge)?;
            }
        }
        Ok(())
    }
}

impl VisualSink for DomSink {
    fn upsert(&mut self, visual: &TokenVisual) {
        if let Err(e) = self.render(visual) {
            log::warn!("Failed to render token {}: {:?}", visual.id, e);
        }
    }

    fn remove(&mut self, id: &TokenId) {
        if let Some(element) = self.elements.remove(id) {
            element.remove();
        }
    }

    fn clear(&mut self) {
        self.elements.clear();
        self.layer.set_inner_html("");
    }
}

fn client_point(event: &web_sys::PointerEvent) -> Point {
    Point::new(f64::from(event.client_x()), f64::from(event.client_y()))
}

/// Attach a typed event listener for the lifetime of the page.
fn listen<E, F>(target: &EventTarget, kind: &str, mut handler: F) -> Result<(), JsValue>
where
    E: JsCast + 'static,
    F: FnMut(E) + 'static,
{
    let closure = Closure::<dyn FnMut(web_sys::Event)>::new(move |event: web_sys::Event| {
        if let Ok(event) = event.dyn_into::<E>() {
            handler(event);
        }
    });
    target.add_event_listener_with_callback(kind, closure.as_ref().unchecked_ref())?;
    closure.forget();
    Ok(())
}

/// Run `f` against the controller unless a handler is already running.
fn with_controller<R>(controller: &RefCell<Controller>, f: impl FnOnce(&mut Controller) -> R) -> Option<R> {
    match controller.try_borrow_mut() {
        Ok(mut controller) => Some(f(&mut controller)),
        Err(_) => {
            log::debug!("Skipping re-entrant board event");
            None
        }
    }
}

fn open_store() -> Box<dyn KeyValueStore> {
    match LocalStorageStore::open() {
        Ok(store) => Box::new(store),
        Err(e) => {
            log::warn!("{}; this board will not be saved", e);
            Box::new(MemoryStore::new())
        }
    }
}

fn tool_buttons(document: &Document) -> Result<Vec<Element>, JsValue> {
    let nodes = document.query_selector_all(TOOL_BUTTON_SELECTOR)?;
    Ok((0..nodes.length())
        .filter_map(|i| nodes.get(i))
        .filter_map(|node| node.dyn_into::<Element>().ok())
        .collect())
}

fn mount() -> Result<(), JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("No window object"))?;
    let document = window
        .document()
        .ok_or_else(|| JsValue::from_str("No document"))?;

    let (Some(board), Some(layer)) = (
        document.get_element_by_id(BOARD_ID),
        document.get_element_by_id(LAYER_ID),
    ) else {
        log::info!("No board on this page");
        return Ok(());
    };

    let config = page::board_config(
        board.get_attribute("data-scenario-key").as_deref(),
        board.get_attribute("data-config").as_deref(),
    );
    let buttons = tool_buttons(&document)?;
    let registry = page::tool_registry(
        buttons
            .iter()
            .map(|button| (button.get_attribute("data-type"), button.get_attribute("data-src"))),
    );
    log::info!("Board {} with {} tools", config.board_key, registry.len());

    let sink = DomSink::new(document.clone(), layer);
    let controller = Rc::new(RefCell::new(BoardController::open(
        open_store(),
        sink,
        registry,
        config,
    )));
    let surface = Rc::new(DomSurface {
        board: board.clone(),
    });

    for button in buttons {
        let Some(kind) = button.get_attribute("data-type") else {
            continue;
        };
        let controller = controller.clone();
        let surface = surface.clone();
        listen(&button, "pointerdown", move |event: web_sys::PointerEvent| {
            event.prevent_default();
            let position = client_point(&event);
            with_controller(&controller, |c| {
                c.dispatch(
                    surface.as_ref(),
                    PointerEvent::ToolPressed {
                        kind: kind.clone(),
                        position,
                    },
                )
            });
        })?;
    }

    {
        let controller = controller.clone();
        let surface = surface.clone();
        listen(&board, "pointerdown", move |event: web_sys::PointerEvent| {
            let position = client_point(&event);
            let gesture_started = with_controller(&controller, |c| {
                c.dispatch(surface.as_ref(), PointerEvent::Down { position });
                !c.session().mode().is_idle()
            });
            if gesture_started == Some(true) {
                event.prevent_default();
            }
        })?;
    }

    // Window-level listeners keep gestures alive when the pointer leaves the board.
    let events: [(&str, fn(Point) -> PointerEvent); 2] = [
        ("pointermove", |position| PointerEvent::Move { position }),
        ("pointerup", |position| PointerEvent::Up { position }),
    ];
    for (kind, make_event) in events {
        let controller = controller.clone();
        let surface = surface.clone();
        listen(&window, kind, move |event: web_sys::PointerEvent| {
            let position = client_point(&event);
            with_controller(&controller, |c| c.dispatch(surface.as_ref(), make_event(position)));
        })?;
    }
    {
        let controller = controller.clone();
        let surface = surface.clone();
        listen(&window, "pointercancel", move |_: web_sys::PointerEvent| {
            with_controller(&controller, |c| c.dispatch(surface.as_ref(), PointerEvent::Cancel));
        })?;
    }

    if let Some(clear) = document.get_element_by_id(CLEAR_BUTTON_ID) {
        let controller = controller.clone();
        listen(&clear, "click", move |_: web_sys::MouseEvent| {
            with_controller(&controller, |c| c.clear());
        })?;
    }

    Ok(())
}

/// Initialize and run the WASM application.
#[wasm_bindgen(start)]
pub fn run_wasm() {
    // Set up panic hook for better error messages
    console_error_panic_hook::set_once();

    if let Err(e) = console_log::init_with_level(log::Level::Info) {
        web_sys::console::warn_1(&JsValue::from_str(&format!("Logger unavailable: {}", e)));
    }

    log::info!("Starting token board (WASM)");
    if let Err(e) = mount() {
        log::error!("Token board failed to start: {:?}", e);
    }
}
