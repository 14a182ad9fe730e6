use crate::chip::{chip8::DISPLAY_HEIGHT, chip8::DISPLAY_WIDTH, io::OutputSink, Error, FrameBuffer};

use cursive::{
    theme::{BaseColor, Color, ColorStyle},
    view::View,
    CbSink, Printer, Vec2,
};

/// Represents the display of the Chip 8, plus a status line below it showing whether the
/// tone is playing.
pub struct Display {
    pixels: FrameBuffer,
    tone: bool,
}

impl Display {
    /// Creates a new display from a copy of `pixels`.
    pub fn new(pixels: &FrameBuffer, tone: bool) -> Self {
        Display {
            pixels: *pixels,
            tone,
        }
    }
}

impl Default for Display {
    fn default() -> Self {
        Self::new(&[[false; DISPLAY_WIDTH]; DISPLAY_HEIGHT], false)
    }
}

/// Implements cursive::view::View for Display to enable drawing it
/// as a View out of the box.
impl View for Display {
    fn draw(&self, printer: &Printer) {
        printer.with_color(
            ColorStyle::new(Color::Dark(BaseColor::Black), Color::RgbLowRes(0, 0, 0)),
            |printer| {
                for (y, row) in self.pixels.iter().enumerate() {
                    for (x, lit) in row.iter().enumerate() {
                        if *lit {
                            printer.print((x, y), " ");
                        }
                    }
                }
            },
        );

        if self.tone {
            printer.print((0, DISPLAY_HEIGHT), "\u{266a} beep");
        }
    }

    fn required_size(&mut self, _: Vec2) -> Vec2 {
        Vec2 {
            x: DISPLAY_WIDTH,
            y: DISPLAY_HEIGHT + 1,
        }
    }
}

/// An output sink replacing the top layer of a running cursive UI with a fresh [`Display`]
/// on every refresh. The tone is shown, not played.
pub struct CursiveOutput {
    gfx_sink: CbSink,
    tone: bool,
}

impl CursiveOutput {
    pub fn new(gfx_sink: CbSink) -> Self {
        CursiveOutput {
            gfx_sink,
            tone: false,
        }
    }
}

impl OutputSink for CursiveOutput {
    fn refresh(&mut self, frame: &FrameBuffer) -> Result<(), Error> {
        let display = Display::new(frame, self.tone);
        self.gfx_sink
            .send(Box::new(move |s: &mut cursive::Cursive| {
                s.pop_layer();
                s.add_layer(display);
            }))
            .map_err(|_| Error::OutputDisconnected)
    }

    fn start_tone(&mut self) -> Result<(), Error> {
        self.tone = true;
        Ok(())
    }

    fn stop_tone(&mut self) -> Result<(), Error> {
        self.tone = false;
        Ok(())
    }
}
