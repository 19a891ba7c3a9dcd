/// Linear RGBA color.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const WHITE: Color = Color::rgb(1.0, 1.0, 1.0);
    pub const BLACK: Color = Color::rgb(0.0, 0.0, 0.0);
    pub const TRANSPARENT: Color = Color { r: 0.0, g: 0.0, b: 0.0, a: 0.0 };

    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Color from `0xRRGGBB`.
    pub fn from_hex(hex: u32) -> Self {
        let r = ((hex >> 16) & 0xff) as f32 / 255.0;
        let g = ((hex >> 8) & 0xff) as f32 / 255.0;
        let b = (hex & 0xff) as f32 / 255.0;
        Self::rgb(r, g, b)
    }

    /// HSV to RGB. `h` is in degrees (wrapped into 0..360), `s`/`v` in 0..=1.
    pub fn from_hsv(h: f32, s: f32, v: f32) -> Self {
        let h = h.rem_euclid(360.0) / 60.0;
        let c = v * s;
        let x = c * (1.0 - (h % 2.0 - 1.0).abs());
        let m = v - c;
        let (r, g, b) = match h as u32 {
            0 => (c, x, 0.0),
            1 => (x, c, 0.0),
            2 => (0.0, c, x),
            3 => (0.0, x, c),
            4 => (x, 0.0, c),
            _ => (c, 0.0, x),
        };
        Self::rgb(r + m, g + m, b + m)
    }

    pub fn to_array(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

impl Default for Color {
    fn default() -> Self {
        Color::WHITE
    }
}

/// Flat 2D primitive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Shape {
    Circle { radius: f32 },
    Box { width: f32, height: f32 },
}

/// Component for entities drawn as a filled and/or stroked primitive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShapeComponent {
    pub shape: Shape,
    pub fill: Color,
    pub stroke: Color,
    /// Outline width in world units (0 = no outline).
    pub stroke_width: f32,
    /// Draw order; higher layers are drawn later.
    pub layer: u8,
}

impl ShapeComponent {
    pub fn new(shape: Shape, fill: Color) -> Self {
        Self {
            shape,
            fill,
            stroke: Color::TRANSPARENT,
            stroke_width: 0.0,
            layer: 0,
        }
    }

    pub fn circle(radius: f32, fill: Color) -> Self {
        Self::new(Shape::Circle { radius }, fill)
    }

    pub fn rect(width: f32, height: f32, fill: Color) -> Self {
        Self::new(Shape::Box { width, height }, fill)
    }

    pub fn with_stroke(mut self, stroke: Color, width: f32) -> Self {
        self.stroke = stroke;
        self.stroke_width = width;
        self
    }

    pub fn with_layer(mut self, layer: u8) -> Self {
        self.layer = layer;
        self
    }
}
