//! Synthesis chip abstraction.
//!
//! Players drive the chip by writing registers during each tick; the session
//! then pulls rendered PCM from the chip between ticks.

/// A register-driven sound chip that renders interleaved stereo PCM.
pub trait SynthChip {
    /// Reset every register to its power-on state.
    fn init(&mut self);

    /// Write `value` to register `register`.
    fn write(&mut self, register: u16, value: u8);

    /// Render `out.len() / 2` stereo frames into `out` (interleaved L/R).
    fn render(&mut self, out: &mut [i16]);
}

/// Chip that accepts writes and renders silence.
///
/// Used to simulate a song (length estimation) without disturbing the real
/// chip state.
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentChip;

impl SynthChip for SilentChip {
    fn init(&mut self) {}

    fn write(&mut self, _register: u16, _value: u8) {}

    fn render(&mut self, out: &mut [i16]) {
        out.fill(0);
    }
}

impl<C: SynthChip + ?Sized> SynthChip for Box<C> {
    fn init(&mut self) {
        (**self).init();
    }

    fn write(&mut self, register: u16, value: u8) {
        (**self).write(register, value);
    }

    fn render(&mut self, out: &mut [i16]) {
        (**self).render(out);
    }
}
