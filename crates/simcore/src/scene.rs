//! Ordered components stepped and drawn by the tick driver, plus the
//! backend-neutral display list they draw into.

use crate::config::WorldBounds;
use crate::traits::StepData;
use crate::vector::Vec2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgba(pub u8, pub u8, pub u8, pub u8);

impl Rgba {
    pub const BLACK: Rgba = Rgba(0, 0, 0, 255);
    pub const RED: Rgba = Rgba(220, 40, 40, 255);
    pub const GREEN: Rgba = Rgba(40, 160, 60, 255);
    pub const BLUE: Rgba = Rgba(50, 80, 220, 255);
    pub const BROWN: Rgba = Rgba(140, 90, 40, 255);
}

/// Drawing primitive in world coordinates.
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Polygon { points: Vec<Vec2>, fill: Rgba },
    Segment { from: Vec2, to: Vec2, color: Rgba },
    Text { at: Vec2, text: String, color: Rgba },
}

#[derive(Debug, Clone, Default)]
pub struct DrawList {
    pub shapes: Vec<Shape>,
}

impl DrawList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.shapes.clear();
    }

    pub fn polygon(&mut self, points: Vec<Vec2>, fill: Rgba) {
        self.shapes.push(Shape::Polygon { points, fill });
    }

    pub fn segment(&mut self, from: Vec2, to: Vec2, color: Rgba) {
        self.shapes.push(Shape::Segment { from, to, color });
    }

    pub fn text(&mut self, at: Vec2, text: impl Into<String>, color: Rgba) {
        self.shapes.push(Shape::Text {
            at,
            text: text.into(),
            color,
        });
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }
}

/// Maps world coordinates, y pointing up, onto a y-down screen rectangle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    /// Screen position of the top-left corner of the world.
    pub origin: (f64, f64),
    /// Screen units per world unit.
    pub scale: f64,
    pub world_height: f64,
}

impl Viewport {
    /// Largest uniform scale that fits the whole world into `size`.
    pub fn fit(bounds: &WorldBounds, origin: (f64, f64), size: (f64, f64)) -> Self {
        Viewport {
            origin,
            scale: (size.0 / bounds.width).min(size.1 / bounds.height),
            world_height: bounds.height,
        }
    }

    pub fn to_screen(&self, p: &Vec2) -> (f64, f64) {
        (
            self.origin.0 + p.x * self.scale,
            self.origin.1 + (self.world_height - p.y) * self.scale,
        )
    }

    /// Text anchors keep screen orientation: rows grow downward from the top.
    pub fn text_to_screen(&self, p: &Vec2) -> (f64, f64) {
        (self.origin.0 + p.x * self.scale, self.origin.1 + p.y * self.scale)
    }
}

/// A participant in the tick loop over shared state `S`.
///
/// `step` may mutate the state; `render` only reads it and is only ever
/// called after every component has stepped.
pub trait Component<S> {
    fn step(&mut self, data: &StepData<'_>, state: &mut S);

    fn render(&self, _state: &S, _out: &mut DrawList) {}
}

/// Flat, ordered list of components. Children step in insertion order.
pub struct SceneGraph<S> {
    children: Vec<Box<dyn Component<S>>>,
}

impl<S> Default for SceneGraph<S> {
    fn default() -> Self {
        SceneGraph { children: Vec::new() }
    }
}

impl<S> SceneGraph<S> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, child: Box<dyn Component<S>>) {
        self.children.push(child);
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    pub fn step(&mut self, data: &StepData<'_>, state: &mut S) {
        for child in &mut self.children {
            child.step(data, state);
        }
    }

    pub fn render(&self, state: &S, out: &mut DrawList) {
        for child in &self.children {
            child.render(state, out);
        }
    }
}
