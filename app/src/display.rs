use crate::status::SensorStatus;
use anyhow::anyhow;
use line_2d::Coord;
use sdl2::{
    EventPump,
    event::{Event, WindowEvent},
    keyboard::Keycode,
    pixels::Color,
    rect::Rect,
    render::{BlendMode, Canvas},
    video::Window,
};
use std::{
    sync::mpsc,
    thread,
    time::{Duration, Instant},
};
use undulate_engine::{Display, Rgba, Surface, SurfaceEvent};
use undulate_sensor::SensorEvent;

// Frames are paced to at most this rate in case vsync isn't available.
const FRAME_DURATION: Duration = Duration::from_micros(1_000_000 / 60);

/// An sdl2 window implementing the drawing surface. The window title shows
/// the state of the sensor.
pub struct SdlDisplay {
    canvas: Canvas<Window>,
    event_pump: EventPump,
    width_px: u32,
    height_px: u32,
    path: Vec<Coord>,
    prev_tick_complete: Instant,
    status: SensorStatus,
    sensor_events: Option<mpsc::Receiver<SensorEvent>>,
}

impl SdlDisplay {
    pub fn new(
        width_px: u32,
        height_px: u32,
        status: SensorStatus,
        sensor_events: Option<mpsc::Receiver<SensorEvent>>,
    ) -> anyhow::Result<Self> {
        let sdl_context = sdl2::init().map_err(|e| anyhow!(e))?;
        let video_subsystem = sdl_context.video().map_err(|e| anyhow!(e))?;
        let window = video_subsystem
            .window(status.to_string().as_str(), width_px, height_px)
            .resizable()
            .position_centered()
            .build()?;
        let mut canvas = window.into_canvas().present_vsync().build()?;
        canvas.set_blend_mode(BlendMode::Blend);
        let (width_px, height_px) =
            canvas.output_size().map_err(|e| anyhow!(e))?;
        let event_pump = sdl_context.event_pump().map_err(|e| anyhow!(e))?;
        Ok(Self {
            canvas,
            event_pump,
            width_px,
            height_px,
            path: Vec::new(),
            prev_tick_complete: Instant::now(),
            status,
            sensor_events,
        })
    }

    fn wait_until_next_frame(&self) {
        if let Some(period_to_sleep) = (self.prev_tick_complete
            + FRAME_DURATION)
            .checked_duration_since(Instant::now())
        {
            thread::sleep(period_to_sleep);
        }
    }

    fn update_title(&mut self) {
        let Some(sensor_events) = self.sensor_events.as_ref() else {
            return;
        };
        let mut changed = false;
        for event in sensor_events.try_iter() {
            changed |= self.status.apply(&event);
        }
        if changed {
            let title = self.status.to_string();
            if let Err(e) = self.canvas.window_mut().set_title(title.as_str())
            {
                log::warn!("Failed to set window title: {}", e);
            }
        }
    }

    fn update_size(&mut self) -> Option<SurfaceEvent> {
        match self.canvas.output_size() {
            Ok((width_px, height_px)) => {
                self.width_px = width_px;
                self.height_px = height_px;
                Some(SurfaceEvent::Resized {
                    width: width_px,
                    height: height_px,
                })
            }
            Err(e) => {
                log::error!("Failed to query window size: {}", e);
                None
            }
        }
    }
}

impl Surface for SdlDisplay {
    fn width(&self) -> u32 {
        self.width_px
    }

    fn height(&self) -> u32 {
        self.height_px
    }

    fn clear(&mut self) {
        self.canvas.set_draw_color(Color::RGB(0, 0, 0));
        self.canvas.clear();
    }

    fn begin_path(&mut self) {
        self.path.clear();
    }

    fn move_to(&mut self, x: f64, y: f64) {
        self.path.push(Coord::new(x.round() as i32, y.round() as i32));
    }

    fn line_to(&mut self, x: f64, y: f64) {
        self.move_to(x, y);
    }

    fn stroke(&mut self, color: Rgba, width: f32) {
        let Rgba { r, g, b, a } = color;
        self.canvas.set_draw_color(Color::RGBA(r, g, b, a));
        let line_width = width.round().max(1.0) as u32;
        for coord in path_coords(&self.path) {
            fill_point(&mut self.canvas, coord, line_width);
        }
    }
}

/// Every coord along a polyline, each visited once.
fn path_coords(path: &[Coord]) -> impl Iterator<Item = Coord> + '_ {
    let segments = path.windows(2).flat_map(|segment| {
        // The first coord of each segment is the last coord of the previous
        // one.
        line_2d::coords_between(segment[0], segment[1]).skip(1)
    });
    path.first().copied().into_iter().chain(segments)
}

/// Fills a square of side `line_width` centred on `coord`.
fn fill_point(canvas: &mut Canvas<Window>, coord: Coord, line_width: u32) {
    let half_width = line_width as i32 / 2;
    let rect = Rect::new(
        coord.x - half_width,
        coord.y - half_width,
        line_width,
        line_width,
    );
    let _ = canvas.fill_rect(rect);
}

impl Display for SdlDisplay {
    fn poll_events(&mut self, events: &mut Vec<SurfaceEvent>) {
        let mut resized = false;
        for event in self.event_pump.poll_iter() {
            match event {
                Event::Quit { .. }
                | Event::KeyDown {
                    keycode: Some(Keycode::Escape),
                    ..
                } => events.push(SurfaceEvent::Quit),
                Event::Window {
                    win_event: WindowEvent::SizeChanged(..),
                    ..
                } => resized = true,
                _ => (),
            }
        }
        // Several size changes may arrive at once while the window is being
        // dragged. Only the final size matters.
        if resized {
            events.extend(self.update_size());
        }
    }

    fn present(&mut self) -> anyhow::Result<()> {
        self.canvas.present();
        self.update_title();
        self.wait_until_next_frame();
        self.prev_tick_complete = Instant::now();
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn path_includes_first_point_once() {
        let path = [Coord::new(0, 0), Coord::new(3, 0), Coord::new(3, 2)];
        let coords = path_coords(&path).collect::<Vec<_>>();
        assert_eq!(
            coords,
            vec![
                Coord::new(0, 0),
                Coord::new(1, 0),
                Coord::new(2, 0),
                Coord::new(3, 0),
                Coord::new(3, 1),
                Coord::new(3, 2),
            ]
        );
    }

    #[test]
    fn single_point_path_is_drawn() {
        let path = [Coord::new(4, 5)];
        assert_eq!(path_coords(&path).collect::<Vec<_>>(), path.to_vec());
        assert_eq!(path_coords(&[]).count(), 0);
    }
}
