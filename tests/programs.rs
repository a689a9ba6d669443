use std::time::Duration;

use chip8_cpu::constants::KEY_COUNT;
use chip8_cpu::{
    AudioSink, Chip8, Config, DisplaySink, Fault, FrameBuffer, Headless, InputSource, Mute,
    NoInput, Quirks, Region,
};
use rand::rngs::mock::StepRng;

fn chip8_with(config: Config, rom: &[u8]) -> Chip8 {
    let mut chip8 = Chip8::with_rng(config, Box::new(StepRng::new(0xAB, 0)));
    chip8.load_rom(rom).unwrap();
    chip8
}

fn chip8(rom: &[u8]) -> Chip8 {
    chip8_with(Config::default(), rom)
}

fn cycle() -> Duration {
    Config::default().cycle_length
}

#[test]
fn load_add_then_clear() {
    let mut chip8 = chip8(&[0x60, 0x05, 0x70, 0x01, 0x00, 0xE0]);
    for _ in 0..3 {
        assert_eq!(chip8.tick(cycle()), Ok(true));
    }
    let state = chip8.state();
    assert_eq!(state.v[0x0], 0x06);
    assert_eq!(state.pc, 0x206);
    assert!(chip8.frame_buffer().cells().iter().all(|&lit| !lit));
    assert!(chip8.is_dirty());
    assert_eq!(chip8.last_instruction(), Some("CLS"));
}

#[test]
fn subroutine_call_and_return() {
    // 200: CALL 206; 202: LD V0, 1; 204: JP 204; 206: LD V1, 2; 208: RET
    let mut chip8 = chip8(&[
        0x22, 0x06, 0x60, 0x01, 0x12, 0x04, 0x61, 0x02, 0x00, 0xEE,
    ]);
    chip8.step().unwrap();
    assert_eq!(chip8.state().pc, 0x206);
    assert_eq!(chip8.state().stack.frames(), &[0x200]);
    chip8.step().unwrap();
    chip8.step().unwrap();
    assert_eq!(chip8.state().pc, 0x202);
    assert!(chip8.state().stack.frames().is_empty());
    chip8.step().unwrap();
    assert_eq!(chip8.state().v[0x0], 0x1);
    assert_eq!(chip8.state().v[0x1], 0x2);
}

#[test]
fn recursion_overflows_the_stack() {
    // 200: CALL 200
    let mut chip8 = chip8(&[0x22, 0x00]);
    for _ in 0..16 {
        chip8.step().unwrap();
    }
    assert_eq!(
        chip8.step(),
        Err(Fault::OutOfRangeAccess {
            region: Region::Stack,
            index: 16
        })
    );
    assert_eq!(chip8.state().stack.pointer(), 16);
}

#[test]
fn wait_for_key_blocks_ticks() {
    // 200: LD V4, K; 202: LD V5, 9
    let mut chip8 = chip8(&[0xF4, 0x0A, 0x65, 0x09]);
    assert_eq!(chip8.tick(cycle()), Ok(true));
    assert!(chip8.is_awaiting_key());
    for _ in 0..20 {
        assert_eq!(chip8.tick(cycle()), Ok(false));
    }
    assert_eq!(chip8.state().pc, 0x200);

    chip8.key_press(0xB).unwrap();
    assert!(!chip8.is_awaiting_key());
    assert_eq!(chip8.state().v[0x4], 0xB);
    assert_eq!(chip8.state().pc, 0x202);

    assert_eq!(chip8.tick(cycle()), Ok(true));
    assert_eq!(chip8.state().v[0x5], 0x9);
}

#[test]
fn delay_timer_counts_down_in_real_time() {
    // 200: LD V0, 3; 202: LD DT, V0; 204: JP 204
    let mut chip8 = chip8(&[0x60, 0x03, 0xF0, 0x15, 0x12, 0x04]);
    chip8.tick(cycle()).unwrap();
    chip8.tick(cycle()).unwrap();
    assert_eq!(chip8.delay_timer(), 3);

    // one period is 8.33 cycles
    for _ in 0..8 {
        chip8.tick(cycle()).unwrap();
    }
    assert_eq!(chip8.delay_timer(), 3);
    chip8.tick(cycle()).unwrap();
    assert_eq!(chip8.delay_timer(), 2);

    for _ in 0..15 {
        chip8.tick(cycle()).unwrap();
    }
    assert_eq!(chip8.delay_timer(), 1);
    chip8.tick(cycle()).unwrap();
    assert_eq!(chip8.delay_timer(), 0);

    for _ in 0..50 {
        chip8.tick(cycle()).unwrap();
    }
    assert_eq!(chip8.delay_timer(), 0);
}

#[test]
fn custom_cycle_length() {
    let config = Config::with_cycle_length(Duration::from_millis(1));
    let mut chip8 = chip8_with(config, &[0x70, 0x01, 0x70, 0x01]);
    assert_eq!(chip8.tick(Duration::from_micros(999)), Ok(false));
    assert_eq!(chip8.tick(Duration::from_micros(1)), Ok(true));
    assert_eq!(chip8.state().v[0x0], 0x1);
}

#[test]
fn random_byte_is_masked() {
    // 200: RND V0, 0x0F
    let mut chip8 = chip8(&[0xC0, 0x0F]);
    chip8.step().unwrap();
    assert_eq!(chip8.state().v[0x0], 0x0B);
}

#[test]
fn shift_quirk() {
    // 200: LD V0, 3; 202: LD V1, 0x80; 204: SHR V0, V1
    let rom = [0x60, 0x03, 0x61, 0x80, 0x80, 0x16];

    let mut chip8 = chip8(&rom);
    for _ in 0..3 {
        chip8.step().unwrap();
    }
    assert_eq!(chip8.state().v[0x0], 0x40);
    assert_eq!(chip8.state().v[0x1], 0x40);
    assert_eq!(chip8.state().v[0xF], 0x0);

    let quirks = Quirks {
        shift_source_y: false,
        ..Quirks::default()
    };
    let mut chip8 = chip8_with(Config::default().with_quirks(quirks), &rom);
    for _ in 0..3 {
        chip8.step().unwrap();
    }
    assert_eq!(chip8.state().v[0x0], 0x01);
    assert_eq!(chip8.state().v[0x1], 0x80);
    assert_eq!(chip8.state().v[0xF], 0x1);
}

#[test]
fn oversized_rom_is_rejected() {
    let mut chip8 = Chip8::new();
    let rom = vec![0xFF; 4096];
    assert_eq!(
        chip8.load_rom(&rom),
        Err(Fault::InvalidLoadSize {
            len: 4096,
            capacity: 3584
        })
    );
    // nothing was written
    assert_eq!(chip8.state().memory.read(0x200), Ok(0x00));
}

#[test]
fn fault_then_skip() {
    // 200: LD I, 0xFFF; 202: LD [I], V1 (two bytes past the end); 204: LD V2, 1
    let mut chip8 = chip8(&[0xAF, 0xFF, 0xF1, 0x55, 0x62, 0x01]);
    chip8.step().unwrap();
    let fault = chip8.step().unwrap_err();
    assert!(matches!(
        fault,
        Fault::OutOfRangeAccess {
            region: Region::Memory,
            ..
        }
    ));
    assert_eq!(chip8.state().pc, 0x202);
    assert_eq!(chip8.state().memory.read(0xFFF), Ok(0x00));

    chip8.skip_instruction();
    chip8.step().unwrap();
    assert_eq!(chip8.state().v[0x2], 0x1);
}

#[test]
fn rewind_restores_previous_instructions() {
    // 200: LD V0, 1; 202: ADD V0, 1; 204: ADD V0, 1
    let mut chip8 = chip8(&[0x60, 0x01, 0x70, 0x01, 0x70, 0x01]);
    for _ in 0..3 {
        chip8.step().unwrap();
    }
    assert_eq!(chip8.state().v[0x0], 0x3);
    assert!(chip8.reverse_cpu());
    assert!(chip8.reverse_cpu());
    assert_eq!(chip8.state().v[0x0], 0x1);
    assert_eq!(chip8.state().pc, 0x202);
    chip8.step().unwrap();
    assert_eq!(chip8.state().v[0x0], 0x2);
}

#[derive(Default)]
struct Keys([bool; KEY_COUNT]);

impl InputSource for Keys {
    fn keys(&mut self) -> [bool; KEY_COUNT] {
        self.0
    }
}

#[derive(Default)]
struct Screen {
    frames: Vec<FrameBuffer>,
}

impl DisplaySink for Screen {
    fn render(&mut self, frame: &FrameBuffer) {
        self.frames.push(*frame);
    }
}

#[derive(Default)]
struct Speaker {
    beeps: usize,
    remaining: Vec<u8>,
}

impl AudioSink for Speaker {
    fn start(&mut self) {
        self.beeps += 1;
    }

    fn remaining(&mut self, sound_timer: u8) {
        self.remaining.push(sound_timer);
    }
}

#[test]
fn update_drives_collaborators() {
    // 200: LD I, 0; 202: DRW V0, V0, 5; 204: LD V0, 4; 206: LD ST, V0; 208: LD V1, K; 20A: JP 20A
    let mut chip8 = chip8(&[
        0xA0, 0x00, 0xD0, 0x05, 0x60, 0x04, 0xF0, 0x18, 0xF1, 0x0A, 0x12, 0x0A,
    ]);
    let mut keys = Keys::default();
    let mut screen = Screen::default();
    let mut speaker = Speaker::default();

    for _ in 0..5 {
        let executed = chip8
            .update(cycle(), &mut keys, &mut screen, &mut speaker)
            .unwrap();
        assert!(executed);
    }
    assert_eq!(screen.frames.len(), 1);
    // the "0" glyph's top row
    assert!(screen.frames[0].pixel(0, 0));
    assert!(screen.frames[0].pixel(3, 0));
    assert!(!screen.frames[0].pixel(4, 0));
    assert_eq!(speaker.beeps, 1);
    assert_eq!(speaker.remaining.last(), Some(&4));
    assert!(!chip8.is_dirty());

    assert!(chip8.is_awaiting_key());
    let executed = chip8
        .update(cycle(), &mut keys, &mut screen, &mut speaker)
        .unwrap();
    assert!(!executed);

    keys.0[0x7] = true;
    let executed = chip8
        .update(cycle(), &mut keys, &mut screen, &mut speaker)
        .unwrap();
    assert!(executed);
    assert_eq!(chip8.state().v[0x1], 0x7);
    assert_eq!(chip8.state().pc, 0x20A);
    assert_eq!(speaker.beeps, 1);
    assert_eq!(screen.frames.len(), 1);
}

#[test]
fn headless_run() {
    // 200: ADD V0, 1; 202: JP 200
    let mut chip8 = chip8(&[0x70, 0x01, 0x12, 0x00]);
    for _ in 0..20 {
        chip8
            .update(cycle(), &mut NoInput, &mut Headless, &mut Mute)
            .unwrap();
    }
    assert_eq!(chip8.state().v[0x0], 10);
}
