#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Takes the alpha channel as a value between 0 and 1.
    pub const fn with_alpha_01(r: u8, g: u8, b: u8, alpha_01: f32) -> Self {
        Self::new(r, g, b, (alpha_01 * 255.0) as u8)
    }
}

/// A 2D drawing target. Paths are built with `begin_path`, `move_to` and
/// `line_to` and are drawn when `stroke` is called.
pub trait Surface {
    fn width(&self) -> u32;
    fn height(&self) -> u32;
    fn clear(&mut self);
    fn begin_path(&mut self);
    fn move_to(&mut self, x: f64, y: f64);
    fn line_to(&mut self, x: f64, y: f64);
    fn stroke(&mut self, color: Rgba, width: f32);
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SurfaceEvent {
    Resized { width: u32, height: u32 },
    Quit,
}

/// A surface attached to a display which produces events and paces the
/// render loop.
pub trait Display: Surface {
    /// Collect any events that arrived since the last call.
    fn poll_events(&mut self, events: &mut Vec<SurfaceEvent>);

    /// Show the finished frame. Implementations are expected to return once
    /// the display is ready for the next frame.
    fn present(&mut self) -> anyhow::Result<()>;
}
