//! Fake engines shared by the surface suites.

#![allow(dead_code)]

use modbridge_chip::{ChipBackend, PlayerDescriptor, PlayerRegistry, SynthChip, TickPlayer};
use modbridge_module::{ModuleError, ModuleLoader, RepeatCount, TrackerModule};
use modbridge_vfs::MemoryProvider;

/// Chip that outputs the last value written to any register.
#[derive(Default)]
pub struct EchoChip {
    last: i16,
}

impl SynthChip for EchoChip {
    fn init(&mut self) {
        self.last = 0;
    }

    fn write(&mut self, _register: u16, value: u8) {
        self.last = i16::from(value);
    }

    fn render(&mut self, out: &mut [i16]) {
        out.fill(self.last);
    }
}

/// `D00` + tick count: plays `ticks` ticks at 50 Hz.
#[derive(Default)]
pub struct TickTune {
    ticks: u32,
    played: u32,
    level: u8,
}

impl TickPlayer for TickTune {
    fn load(
        &mut self,
        filename: &str,
        provider: &MemoryProvider,
        chip: &mut dyn SynthChip,
    ) -> bool {
        let Some(stream) = provider.open(filename) else {
            return false;
        };
        let bytes = stream.bytes().to_vec();
        provider.close(stream);
        if bytes.len() != 4 || &bytes[..3] != b"D00" {
            return false;
        }
        self.ticks = u32::from(bytes[3]);
        self.level = 1;
        self.rewind(None, chip);
        true
    }

    fn update(&mut self, chip: &mut dyn SynthChip) -> bool {
        self.played += 1;
        chip.write(0x40, self.level);
        self.played < self.ticks
    }

    fn rewind(&mut self, _: Option<usize>, chip: &mut dyn SynthChip) {
        chip.init();
        self.played = 0;
    }

    fn refresh_rate(&self) -> f32 {
        50.0
    }

    fn kind(&self) -> String {
        "EdLib packed".into()
    }

    fn title(&self) -> String {
        "Dune".into()
    }

    fn author(&self) -> String {
        "Stephane Picq".into()
    }

    fn description(&self) -> String {
        "Arrakis".into()
    }
}

/// `BNK?` song that reads its level from `standard.bnk`.
#[derive(Default)]
pub struct BankTune {
    level: u8,
    played: u32,
}

impl TickPlayer for BankTune {
    fn load(
        &mut self,
        filename: &str,
        provider: &MemoryProvider,
        chip: &mut dyn SynthChip,
    ) -> bool {
        let Some(stream) = provider.open(filename) else {
            return false;
        };
        let is_song = stream.bytes().starts_with(b"BNK?");
        provider.close(stream);
        if !is_song {
            return false;
        }
        let Some(mut bank) = provider.open("standard.bnk") else {
            return false;
        };
        self.level = bank.read_u8().unwrap_or(0);
        provider.close(bank);
        chip.init();
        true
    }

    fn update(&mut self, chip: &mut dyn SynthChip) -> bool {
        self.played += 1;
        chip.write(0x40, self.level);
        self.played < 10
    }

    fn rewind(&mut self, _: Option<usize>, chip: &mut dyn SynthChip) {
        chip.init();
        self.played = 0;
    }

    fn refresh_rate(&self) -> f32 {
        -1.0
    }

    fn kind(&self) -> String {
        "AdLib Visual Composer".into()
    }
}

pub struct FakeOpl;

impl ChipBackend for FakeOpl {
    type Chip = EchoChip;

    fn create_chip(&self, _sample_rate: u32) -> modbridge_chip::Result<EchoChip> {
        Ok(EchoChip::default())
    }

    fn players(&self) -> PlayerRegistry {
        [
            PlayerDescriptor::new("d00", &[".d00"], || Box::<TickTune>::default()),
            PlayerDescriptor::new("rol", &[".rol"], || Box::<BankTune>::default()),
        ]
        .into_iter()
        .collect()
    }
}

/// Backend whose chip can never be created.
pub struct BrokenOpl;

impl ChipBackend for BrokenOpl {
    type Chip = EchoChip;

    fn create_chip(&self, _sample_rate: u32) -> modbridge_chip::Result<EchoChip> {
        Err(modbridge_chip::ChipError::ChipUnavailable {
            reason: "no emulator".into(),
        })
    }

    fn players(&self) -> PlayerRegistry {
        PlayerRegistry::new()
    }
}

pub fn d00(ticks: u8) -> Vec<u8> {
    vec![b'D', b'0', b'0', ticks]
}

/// Module of `seconds` seconds of constant 0.5 output.
pub struct HoldModule {
    frames: usize,
    cursor: usize,
    loops_left: Option<u32>,
    rate: u32,
}

impl TrackerModule for HoldModule {
    fn set_repeat_count(&mut self, repeat: RepeatCount) {
        self.loops_left = match repeat {
            RepeatCount::Infinite => None,
            RepeatCount::Times(n) => Some(n),
        };
    }

    fn read_interleaved_stereo(&mut self, sample_rate: u32, out: &mut [f32]) -> usize {
        self.rate = sample_rate;
        let mut produced = 0;
        let wanted = out.len() / 2;
        while produced < wanted {
            if self.cursor >= self.frames {
                match self.loops_left.as_mut() {
                    None => self.cursor = 0,
                    Some(0) => break,
                    Some(left) => {
                        *left -= 1;
                        self.cursor = 0;
                    }
                }
            }
            let count = (self.frames - self.cursor).min(wanted - produced);
            out[produced * 2..(produced + count) * 2].fill(0.5);
            produced += count;
            self.cursor += count;
        }
        produced
    }

    fn position_seconds(&self) -> f64 {
        self.cursor as f64 / f64::from(self.rate)
    }

    fn duration_seconds(&self) -> f64 {
        self.frames as f64 / f64::from(self.rate)
    }

    fn set_position_seconds(&mut self, seconds: f64) -> f64 {
        self.cursor = ((seconds * f64::from(self.rate)) as usize).min(self.frames);
        self.position_seconds()
    }

    fn metadata(&self, key: &str) -> Option<String> {
        match key {
            "title" => Some("Elysium".into()),
            "artist" => Some("Jester".into()),
            "type_long" => Some("ProTracker MOD".into()),
            _ => None,
        }
    }
}

/// `M.K.` + seconds; renders at whatever rate the session asks for.
#[derive(Clone, Copy)]
pub struct HoldLoader;

impl ModuleLoader for HoldLoader {
    type Module = HoldModule;

    fn load(&self, filename: &str, data: &[u8]) -> modbridge_module::Result<HoldModule> {
        match data {
            [b'M', b'.', b'K', b'.', seconds] => Ok(HoldModule {
                frames: usize::from(*seconds) * 48_000,
                cursor: 0,
                loops_left: Some(0),
                rate: 48_000,
            }),
            _ => Err(ModuleError::unrecognized(filename, "not a M.K. module")),
        }
    }
}
