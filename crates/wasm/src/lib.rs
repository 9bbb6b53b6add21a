use std::sync::Mutex;

use profile_svg_core::interaction::{Gesture, PointerMapping, Response};
use profile_svg_core::model::{Figure, FigureError, FigureSource};
use profile_svg_protocol::{Transform, ViewportCommand};
use serde::Serialize;
use wasm_bindgen::prelude::*;

/// Disposed figures leave a `None` so that live handles keep their index.
static FIGURES: Mutex<Vec<Option<Figure>>> = Mutex::new(Vec::new());

#[derive(Serialize)]
struct Initialized<'a> {
    handle: usize,
    commands: &'a [ViewportCommand],
}

#[derive(Serialize)]
struct GestureResult<'a> {
    commands: &'a [ViewportCommand],
    prevent_default: bool,
}

fn js_error(e: impl std::fmt::Display) -> JsError {
    JsError::new(&e.to_string())
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String, JsError> {
    serde_json::to_string(value).map_err(js_error)
}

fn live(figures: &mut [Option<Figure>], handle: usize) -> Option<&mut Figure> {
    figures.get_mut(handle).and_then(Option::as_mut)
}

fn release(figures: &mut [Option<Figure>], handle: usize) -> Option<Figure> {
    figures.get_mut(handle).and_then(Option::take)
}

fn with_figure<T>(
    handle: usize,
    f: impl FnOnce(&mut Figure) -> Result<T, FigureError>,
) -> Result<T, JsError> {
    let mut figures = FIGURES
        .lock()
        .map_err(|_| JsError::new("figure registry poisoned"))?;
    let figure = live(&mut figures, handle).ok_or_else(|| JsError::new("invalid figure handle"))?;
    f(figure).map_err(js_error)
}

fn response_json(response: &Response) -> Result<String, JsError> {
    to_json(&GestureResult {
        commands: &response.commands,
        prevent_default: response.prevent_default,
    })
}

/// Build a figure from its JSON description. Returns
/// `{"handle": n, "commands": [...]}`; the commands start the initial fit.
#[wasm_bindgen]
pub fn initialize(description: &[u8], now_ms: f64) -> Result<String, JsError> {
    let source = FigureSource::from_json(description).map_err(js_error)?;
    let (figure, commands) = Figure::initialize(source, now_ms).map_err(js_error)?;
    let mut figures = FIGURES
        .lock()
        .map_err(|_| JsError::new("figure registry poisoned"))?;
    let handle = figures.len();
    figures.push(Some(figure));
    to_json(&Initialized {
        handle,
        commands: &commands,
    })
}

/// Drop a figure whose SVG left the page. Its handle becomes invalid.
#[wasm_bindgen]
pub fn dispose(handle: usize) -> Result<(), JsError> {
    let mut figures = FIGURES
        .lock()
        .map_err(|_| JsError::new("figure registry poisoned"))?;
    match release(&mut figures, handle) {
        Some(_) => Ok(()),
        None => Err(JsError::new("invalid figure handle")),
    }
}

/// Advance the figure's animation; call from `requestAnimationFrame`.
#[wasm_bindgen]
pub fn tick(handle: usize, now_ms: f64) -> Result<String, JsError> {
    let commands = with_figure(handle, |fig| Ok(fig.tick(now_ms)))?;
    to_json(&commands)
}

#[wasm_bindgen]
pub fn is_animating(handle: usize) -> Result<bool, JsError> {
    with_figure(handle, |fig| Ok(fig.is_animating()))
}

#[wasm_bindgen]
pub fn reset(handle: usize, now_ms: f64) -> Result<String, JsError> {
    let response = with_figure(handle, |fig| fig.handle(Gesture::DoubleClickBackground, now_ms))?;
    response_json(&response)
}

#[wasm_bindgen]
pub fn zoom_to_rect(handle: usize, index: usize, now_ms: f64) -> Result<String, JsError> {
    let response = with_figure(handle, |fig| {
        fig.handle(Gesture::DoubleClickRect { index }, now_ms)
    })?;
    response_json(&response)
}

/// Wheel event in client coordinates. `ctm_a`/`ctm_e` are the horizontal
/// scale and translation of the SVG's screen CTM, when the page has one.
#[wasm_bindgen]
pub fn wheel(
    handle: usize,
    delta_y: f64,
    client_x: f64,
    svg_left: f64,
    ctm_a: Option<f64>,
    ctm_e: Option<f64>,
    now_ms: f64,
) -> Result<String, JsError> {
    let mapping = PointerMapping {
        svg_left,
        ctm: ctm_a.map(|a| Transform::new(a, 1.0, ctm_e.unwrap_or(0.0), 0.0)),
    };
    let pointer_x = mapping.to_figure_x(client_x);
    let response = with_figure(handle, |fig| {
        fig.handle(Gesture::Wheel { delta_y, pointer_x }, now_ms)
    })?;
    response_json(&response)
}

#[wasm_bindgen]
pub fn hover(handle: usize, index: usize) -> Result<String, JsError> {
    let commands = with_figure(handle, |fig| fig.hover_enter(index))?;
    to_json(&commands)
}

#[wasm_bindgen]
pub fn unhover(handle: usize, index: usize) -> Result<String, JsError> {
    let commands = with_figure(handle, |fig| fig.hover_leave(index))?;
    to_json(&commands)
}

/// Rectangle under a point in figure coordinates, if any.
#[wasm_bindgen]
pub fn hit_test(handle: usize, x: f64, y: f64) -> Result<Option<usize>, JsError> {
    with_figure(handle, |fig| Ok(fig.hit_test(x, y)))
}
