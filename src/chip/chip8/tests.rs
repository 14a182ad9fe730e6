use ux::u4;

use crate::chip::chip8::{opcodes::Instruction, Chip8};
use crate::chip::io::Keypad;
use crate::chip::{Chip, CycleOutcome, Error};

fn v(index: u8) -> u4 {
    u4::new(index)
}

fn prepare_state_with_single_instruction(instruction: u16) -> Chip8 {
    let mut chip8 = Chip8::with_seed(0);
    chip8
        .memory
        .write_range(0x200, &instruction.to_be_bytes())
        .unwrap();
    chip8
}

fn do_cycle(instruction: u16, before_cycle: fn(&mut Chip8), after_cycle: fn(&mut Chip8)) {
    do_cycle_with_key(instruction, None, before_cycle, after_cycle)
}

fn do_cycle_with_key(
    instruction: u16,
    key: Option<u8>,
    before_cycle: fn(&mut Chip8),
    after_cycle: fn(&mut Chip8),
) {
    let mut state = prepare_state_with_single_instruction(instruction);
    let mut keypad = Keypad::new();
    if let Some(key) = key {
        keypad.press(u4::new(key));
    }

    before_cycle(&mut state);
    state.cycle(&mut keypad).unwrap();
    after_cycle(&mut state);
}

fn lit_pixels(state: &Chip8) -> usize {
    state
        .read_output_pins()
        .iter()
        .map(|row| row.iter().filter(|lit| **lit).count())
        .sum()
}

#[test]
fn test_clear_screen() {
    do_cycle(
        0x00E0,
        |state| {
            state.memory.set_pixel(3, 4, true);
            state.memory.set_pixel(63, 31, true);
        },
        |state| {
            assert_eq!(lit_pixels(state), 0);
            assert_eq!(state.registers.pc(), 0x202);
        },
    )
}

#[test]
fn test_return() {
    do_cycle(
        0x00EE,
        |state| {
            state.registers.set_sp(1);
            state.memory.write_stack(1, 0x345);
        },
        |state| {
            assert_eq!(state.registers.pc(), 0x345);
            assert_eq!(state.registers.sp(), 0);
        },
    )
}

#[test]
fn test_return_outside_of_stack_fails() {
    let mut state = prepare_state_with_single_instruction(0x00EE);
    state.registers.set_sp(0xFF);
    let result = state.cycle(&mut Keypad::new());
    assert!(matches!(
        result,
        Err(Error::StackOutOfRange { pointer: 0xFF })
    ));
    assert_eq!(state.registers.pc(), 0x200);
    assert_eq!(state.registers.sp(), 0xFF);
}

#[test]
fn test_jump() {
    do_cycle(
        0x1CAF,
        |state| {
            assert_eq!(state.registers.pc(), 0x200);
        },
        |state| {
            assert_eq!(state.registers.pc(), 0xCAF);
        },
    )
}

#[test]
fn test_call() {
    do_cycle(
        0x2CAF,
        |state| {
            assert_eq!(state.registers.pc(), 0x200);
        },
        |state| {
            assert_eq!(state.registers.pc(), 0xCAF);
            assert_eq!(state.registers.sp(), 1);
            assert_eq!(state.memory.read_stack(1).unwrap(), 0x202);
        },
    )
}

#[test]
fn test_call_beyond_stack_depth_keeps_running() {
    do_cycle(
        0x2CAF,
        |state| {
            state.registers.set_sp(15);
        },
        |state| {
            assert_eq!(state.registers.pc(), 0xCAF);
            assert_eq!(state.registers.sp(), 16);
        },
    )
}

#[test]
fn test_call_then_return() {
    let mut state = Chip8::with_seed(0);
    // 0x200: CALL 0x206, 0x206: RET
    state
        .load_program_bytes(&[0x22, 0x06, 0x00, 0x00, 0x00, 0x00, 0x00, 0xEE])
        .unwrap();
    let mut keypad = Keypad::new();

    state.cycle(&mut keypad).unwrap();
    assert_eq!(state.registers.pc(), 0x206);
    state.cycle(&mut keypad).unwrap();
    assert_eq!(state.registers.pc(), 0x202);
    assert_eq!(state.registers.sp(), 0);
}

#[test]
fn test_skip_if_equal() {
    do_cycle(
        0x34AF,
        |state| state.registers.set_v(v(4), 0xAF),
        |state| assert_eq!(state.registers.pc(), 0x204),
    );

    do_cycle(
        0x34BF,
        |state| state.registers.set_v(v(4), 0xAF),
        |state| assert_eq!(state.registers.pc(), 0x202),
    );
}

#[test]
fn test_skip_if_equal_without_advancing() {
    // The skip on its own moves the program counter by exactly one instruction.
    let mut state = Chip8::with_seed(0);
    state.registers.reset_all();
    state.registers.set_v(v(2), 0x4D);
    Instruction::decode(0x324D)
        .unwrap()
        .execute(&mut state, &mut Keypad::new())
        .unwrap();
    assert_eq!(state.registers.pc(), 0x202);
}

#[test]
fn test_skip_if_not_equal() {
    do_cycle(
        0x424D,
        |state| state.registers.set_v(v(2), 0x3F),
        |state| assert_eq!(state.registers.pc(), 0x204),
    );

    do_cycle(
        0x424D,
        |state| state.registers.set_v(v(2), 0x4D),
        |state| assert_eq!(state.registers.pc(), 0x202),
    );
}

#[test]
fn test_skip_if_registers_equal() {
    do_cycle(
        0x5120,
        |state| {
            state.registers.set_v(v(1), 0x11);
            state.registers.set_v(v(2), 0x11);
        },
        |state| assert_eq!(state.registers.pc(), 0x204),
    );

    do_cycle(
        0x5120,
        |state| {
            state.registers.set_v(v(1), 0x11);
            state.registers.set_v(v(2), 0x12);
        },
        |state| assert_eq!(state.registers.pc(), 0x202),
    );
}

#[test]
fn test_skip_if_registers_not_equal() {
    do_cycle(
        0x9120,
        |state| {
            state.registers.set_v(v(1), 0x11);
            state.registers.set_v(v(2), 0x12);
        },
        |state| assert_eq!(state.registers.pc(), 0x204),
    );

    do_cycle(
        0x9120,
        |state| {
            state.registers.set_v(v(1), 0x11);
            state.registers.set_v(v(2), 0x11);
        },
        |state| assert_eq!(state.registers.pc(), 0x202),
    );
}

#[test]
fn test_load_value() {
    do_cycle(
        0x6A12,
        |_| {},
        |state| {
            assert_eq!(state.registers.v(v(0xA)), 0x12);
            assert_eq!(state.registers.pc(), 0x202);
        },
    )
}

#[test]
fn test_add_value_wraps_and_keeps_flag() {
    do_cycle(
        0x7302,
        |state| {
            state.registers.set_v(v(3), 0xFF);
            state.registers.set_v(v(0xF), 0x55);
        },
        |state| {
            assert_eq!(state.registers.v(v(3)), 0x01);
            assert_eq!(state.registers.flag(), 0x55);
        },
    )
}

#[test]
fn test_mov_or_and_xor() {
    fn before(state: &mut Chip8) {
        state.registers.set_v(v(1), 0b1100);
        state.registers.set_v(v(2), 0b1010);
    }

    do_cycle(0x8120, before, |state| {
        assert_eq!(state.registers.v(v(1)), 0b1010)
    });
    do_cycle(0x8121, before, |state| {
        assert_eq!(state.registers.v(v(1)), 0b1110)
    });
    do_cycle(0x8122, before, |state| {
        assert_eq!(state.registers.v(v(1)), 0b1000)
    });
    do_cycle(0x8123, before, |state| {
        assert_eq!(state.registers.v(v(1)), 0b0110)
    });
}

#[test]
fn test_add_registers() {
    do_cycle(
        0x8124,
        |state| {
            state.registers.set_v(v(1), 0xFF);
            state.registers.set_v(v(2), 0x02);
        },
        |state| {
            assert_eq!(state.registers.v(v(1)), 0x01);
            assert_eq!(state.registers.flag(), 1);
        },
    );

    do_cycle(
        0x8124,
        |state| {
            state.registers.set_v(v(1), 0x10);
            state.registers.set_v(v(2), 0x02);
        },
        |state| {
            assert_eq!(state.registers.v(v(1)), 0x12);
            assert_eq!(state.registers.flag(), 0);
        },
    );
}

#[test]
fn test_result_wins_over_flag_in_vf() {
    do_cycle(
        0x8F14,
        |state| {
            state.registers.set_v(v(0xF), 0x10);
            state.registers.set_v(v(1), 0x20);
        },
        |state| assert_eq!(state.registers.flag(), 0x30),
    )
}

#[test]
fn test_sub_registers() {
    do_cycle(
        0x8125,
        |state| {
            state.registers.set_v(v(1), 5);
            state.registers.set_v(v(2), 2);
        },
        |state| {
            assert_eq!(state.registers.v(v(1)), 3);
            assert_eq!(state.registers.flag(), 1);
        },
    );

    do_cycle(
        0x8125,
        |state| {
            state.registers.set_v(v(1), 5);
            state.registers.set_v(v(2), 5);
        },
        |state| {
            assert_eq!(state.registers.v(v(1)), 0);
            assert_eq!(state.registers.flag(), 0);
        },
    );

    do_cycle(
        0x8125,
        |state| {
            state.registers.set_v(v(1), 2);
            state.registers.set_v(v(2), 5);
        },
        |state| {
            assert_eq!(state.registers.v(v(1)), 0xFD);
            assert_eq!(state.registers.flag(), 0);
        },
    );
}

#[test]
fn test_subn_registers() {
    do_cycle(
        0x8127,
        |state| {
            state.registers.set_v(v(1), 5);
            state.registers.set_v(v(2), 2);
        },
        |state| {
            assert_eq!(state.registers.v(v(1)), 3);
            assert_eq!(state.registers.flag(), 0);
        },
    );

    do_cycle(
        0x8127,
        |state| {
            state.registers.set_v(v(1), 0x1);
            state.registers.set_v(v(2), 0xA);
        },
        |state| {
            assert_eq!(state.registers.v(v(1)), 0xF7);
            assert_eq!(state.registers.flag(), 1);
        },
    );
}

#[test]
fn test_shifts() {
    do_cycle(
        0x8126,
        |state| state.registers.set_v(v(1), 0x05),
        |state| {
            assert_eq!(state.registers.v(v(1)), 0x02);
            assert_eq!(state.registers.flag(), 1);
        },
    );

    do_cycle(
        0x812E,
        |state| state.registers.set_v(v(1), 0x81),
        |state| {
            assert_eq!(state.registers.v(v(1)), 0x02);
            assert_eq!(state.registers.flag(), 1);
        },
    );

    do_cycle(
        0x812E,
        |state| state.registers.set_v(v(1), 0x41),
        |state| {
            assert_eq!(state.registers.v(v(1)), 0x82);
            assert_eq!(state.registers.flag(), 0);
        },
    );
}

#[test]
fn test_load_index() {
    do_cycle(
        0xA2F0,
        |_| {},
        |state| assert_eq!(state.registers.i(), 0x2F0),
    )
}

#[test]
fn test_jump_with_offset() {
    do_cycle(
        0xB300,
        |state| state.registers.set_v(v(0), 0x10),
        |state| assert_eq!(state.registers.pc(), 0x310),
    )
}

#[test]
fn test_random_with_override() {
    do_cycle(
        0xC30F,
        |state| state.set_random_override(Some(0xAB)),
        |state| assert_eq!(state.registers.v(v(3)), 0x0B),
    )
}

#[test]
fn test_random_is_masked() {
    do_cycle(
        0xC300,
        |state| state.registers.set_v(v(3), 0xFF),
        |state| assert_eq!(state.registers.v(v(3)), 0),
    );

    let mut first = prepare_state_with_single_instruction(0xC3FF);
    let mut second = prepare_state_with_single_instruction(0xC3FF);
    first.cycle(&mut Keypad::new()).unwrap();
    second.cycle(&mut Keypad::new()).unwrap();
    assert_eq!(first.registers.v(v(3)), second.registers.v(v(3)));
}

#[test]
fn test_draw_twice_collides() {
    let mut state = Chip8::with_seed(0);
    // I = 0 is the glyph for 0, drawn twice at (0, 0).
    state.load_program_bytes(&[0xD0, 0x15, 0xD0, 0x15]).unwrap();
    let mut keypad = Keypad::new();

    state.cycle(&mut keypad).unwrap();
    assert_eq!(state.registers.flag(), 0);
    assert_eq!(lit_pixels(&state), 14);
    assert!(state.memory.get_pixel(0, 0));
    assert!(state.memory.get_pixel(3, 0));
    assert!(!state.memory.get_pixel(1, 1));

    state.cycle(&mut keypad).unwrap();
    assert_eq!(state.registers.flag(), 1);
    assert_eq!(lit_pixels(&state), 0);
}

#[test]
fn test_draw_partial_overlap_collides() {
    let mut state = Chip8::with_seed(0);
    // Glyph 0 then glyph 1 at (0, 0), then glyph 1 again at (8, 0).
    state
        .load_program_bytes(&[
            0xA0, 0x00, 0xD0, 0x15, 0xA0, 0x05, 0xD0, 0x15, 0x60, 0x08, 0xD0, 0x15,
        ])
        .unwrap();
    let mut keypad = Keypad::new();

    for _ in 0..4 {
        state.cycle(&mut keypad).unwrap();
    }
    assert_eq!(state.registers.flag(), 1);
    // 0xF0 ^ 0x20 turns (2, 0) off, 0x90 ^ 0x60 turns (1, 1) on.
    assert!(!state.memory.get_pixel(2, 0));
    assert!(state.memory.get_pixel(1, 1));

    state.cycle(&mut keypad).unwrap();
    state.cycle(&mut keypad).unwrap();
    assert_eq!(state.registers.flag(), 0);
    assert!(state.memory.get_pixel(10, 0));
}

#[test]
fn test_draw_wraps_around_edges() {
    do_cycle(
        0xD012,
        |state| {
            state.memory.write_range(0x300, &[0xFF, 0x80]).unwrap();
            state.registers.set_i(0x300);
            state.registers.set_v(v(0), 60);
            state.registers.set_v(v(1), 31);
        },
        |state| {
            for x in [60, 61, 62, 63, 0, 1, 2, 3] {
                assert!(state.memory.get_pixel(x, 31));
            }
            assert!(!state.memory.get_pixel(4, 31));
            assert!(state.memory.get_pixel(60, 0));
            assert_eq!(lit_pixels(state), 9);
            assert_eq!(state.registers.flag(), 0);
        },
    )
}

#[test]
fn test_draw_out_of_range_changes_nothing() {
    let mut state = prepare_state_with_single_instruction(0xD012);
    state.registers.set_i(0xFFF);
    state.registers.set_v(v(0xF), 0x7);
    let result = state.cycle(&mut Keypad::new());
    assert!(matches!(
        result,
        Err(Error::OutOfRangeAddress { address: 0x1000 })
    ));
    assert_eq!(lit_pixels(&state), 0);
    assert_eq!(state.registers.flag(), 0x7);
    assert_eq!(state.registers.pc(), 0x200);
}

#[test]
fn test_skip_if_key() {
    do_cycle_with_key(
        0xE19E,
        Some(5),
        |state| state.registers.set_v(v(1), 5),
        |state| assert_eq!(state.registers.pc(), 0x204),
    );

    do_cycle_with_key(
        0xE19E,
        Some(6),
        |state| state.registers.set_v(v(1), 5),
        |state| assert_eq!(state.registers.pc(), 0x202),
    );

    do_cycle_with_key(
        0xE19E,
        None,
        |state| state.registers.set_v(v(1), 5),
        |state| assert_eq!(state.registers.pc(), 0x202),
    );
}

#[test]
fn test_skip_unless_key() {
    do_cycle_with_key(
        0xE1A1,
        Some(5),
        |state| state.registers.set_v(v(1), 5),
        |state| assert_eq!(state.registers.pc(), 0x202),
    );

    do_cycle_with_key(
        0xE1A1,
        None,
        |state| state.registers.set_v(v(1), 5),
        |state| assert_eq!(state.registers.pc(), 0x204),
    );
}

#[test]
fn test_timers() {
    do_cycle(
        0xF207,
        |state| state.registers.set_delay_timer(0x42),
        |state| assert_eq!(state.registers.v(v(2)), 0x42),
    );

    do_cycle(
        0xF215,
        |state| state.registers.set_v(v(2), 0x33),
        |state| assert_eq!(state.registers.delay_timer(), 0x33),
    );

    do_cycle(
        0xF218,
        |state| state.registers.set_v(v(2), 0x21),
        |state| {
            assert_eq!(state.registers.sound_timer(), 0x21);
            assert!(state.sound_active());
        },
    );
}

#[test]
fn test_decay_timers() {
    let mut state = Chip8::with_seed(0);
    state.registers.set_delay_timer(2);
    state.registers.set_sound_timer(1);
    state.decay_timers();
    assert_eq!(state.registers.delay_timer(), 1);
    assert_eq!(state.registers.sound_timer(), 0);
    assert!(!state.sound_active());
    state.decay_timers();
    state.decay_timers();
    assert_eq!(state.registers.delay_timer(), 0);
    assert_eq!(state.registers.sound_timer(), 0);
}

#[test]
fn test_wait_for_key_already_pressed() {
    do_cycle_with_key(
        0xF30A,
        Some(0xC),
        |_| {},
        |state| {
            assert_eq!(state.registers.v(v(3)), 0xC);
            assert!(!state.is_awaiting_key());
            assert_eq!(state.registers.pc(), 0x202);
        },
    )
}

#[test]
fn test_wait_for_key_blocks_until_pressed() {
    let mut state = prepare_state_with_single_instruction(0xF30A);
    let mut keypad = Keypad::new();

    assert_eq!(
        state.cycle(&mut keypad).unwrap(),
        CycleOutcome::Executed(0xF30A)
    );
    assert_eq!(state.awaiting_key(), Some(v(3)));

    for _ in 0..3 {
        assert_eq!(state.cycle(&mut keypad).unwrap(), CycleOutcome::AwaitingKey);
        assert_eq!(state.registers.pc(), 0x202);
    }

    keypad.press(v(7));
    assert_eq!(
        state.cycle(&mut keypad).unwrap(),
        CycleOutcome::KeyReceived(v(7))
    );
    assert_eq!(state.registers.v(v(3)), 7);
    assert!(!state.is_awaiting_key());
    assert_eq!(state.registers.pc(), 0x202);
}

#[test]
fn test_add_index() {
    do_cycle(
        0xF11E,
        |state| {
            state.registers.set_i(0x2FF);
            state.registers.set_v(v(1), 0x02);
        },
        |state| assert_eq!(state.registers.i(), 0x301),
    )
}

#[test]
fn test_add_index_wraps() {
    do_cycle(
        0xF11E,
        |state| {
            state.registers.set_i(0xFFFF);
            state.registers.set_v(v(1), 0x02);
        },
        |state| assert_eq!(state.registers.i(), 0x0001),
    )
}

#[test]
fn test_glyph() {
    do_cycle(
        0xF029,
        |state| state.registers.set_v(v(0), 0xB),
        |state| {
            assert_eq!(state.registers.i(), 0xB * 5);
            assert_eq!(state.memory.read(state.registers.i()).unwrap(), 0xE0);
        },
    )
}

#[test]
fn test_bcd() {
    do_cycle(
        0xF533,
        |state| {
            state.registers.set_v(v(5), 254);
            state.registers.set_i(0x300);
        },
        |state| {
            assert_eq!(state.memory.read_range(0x300, 3).unwrap(), &[2, 5, 4]);
            assert_eq!(state.registers.i(), 0x300);
        },
    )
}

#[test]
fn test_bcd_out_of_range_writes_nothing() {
    let mut state = prepare_state_with_single_instruction(0xF533);
    state.registers.set_v(v(5), 123);
    state.registers.set_i(0xFFE);
    assert!(matches!(
        state.cycle(&mut Keypad::new()),
        Err(Error::OutOfRangeAddress { address: 0x1000 })
    ));
    assert_eq!(state.memory.read_range(0xFFE, 2).unwrap(), &[0, 0]);
    assert_eq!(state.registers.pc(), 0x200);
}

#[test]
fn test_store_registers() {
    do_cycle(
        0xF355,
        |state| {
            for (x, value) in [1, 2, 3, 4, 5].iter().enumerate() {
                state.registers.set_v(v(x as u8), *value);
            }
            state.registers.set_i(0x300);
        },
        |state| {
            assert_eq!(state.memory.read_range(0x300, 5).unwrap(), &[1, 2, 3, 4, 0]);
            assert_eq!(state.registers.i(), 0x300);
        },
    )
}

#[test]
fn test_load_registers() {
    do_cycle(
        0xF265,
        |state| {
            state.memory.write_range(0x300, &[9, 8, 7, 6]).unwrap();
            state.registers.set_i(0x300);
        },
        |state| {
            assert_eq!(state.registers.v_range(v(3)), &[9, 8, 7, 0]);
        },
    )
}

#[test]
fn test_unknown_opcode_leaves_state_untouched() {
    let mut state = prepare_state_with_single_instruction(0xFFFF);
    let before = state.registers.clone();
    let result = state.cycle(&mut Keypad::new());
    assert!(matches!(result, Err(Error::UnknownOpcode { opcode: 0xFFFF })));
    assert_eq!(state.registers, before);
}

#[test]
fn test_fetch_beyond_memory_fails() {
    let mut state = Chip8::with_seed(0);
    state.registers.set_pc(0xFFF);
    assert!(matches!(
        state.cycle(&mut Keypad::new()),
        Err(Error::OutOfRangeAddress { address: 0x1000 })
    ));
}

#[test]
fn test_load_program_from_file() {
    let path = std::env::temp_dir().join(format!("chip8-load-{}.ch8", std::process::id()));
    std::fs::write(&path, [0x60u8, 0x2A]).unwrap();

    let mut state = Chip8::with_seed(0);
    let size = state.load_program(path.to_str().unwrap()).unwrap();
    std::fs::remove_file(&path).unwrap();

    assert_eq!(size, 2);
    state.cycle(&mut Keypad::new()).unwrap();
    assert_eq!(state.registers.v(v(0)), 0x2A);
}

#[test]
fn test_load_missing_program_fails() {
    let mut state = Chip8::with_seed(0);
    let result = state.load_program("/nonexistent/program.ch8");
    assert!(matches!(result, Err(Error::CouldNotReadProgram { .. })));
}

#[test]
fn test_reset() {
    let mut state = prepare_state_with_single_instruction(0xF30A);
    state.cycle(&mut Keypad::new()).unwrap();
    state.registers.set_v(v(1), 9);
    state.reset();
    assert!(!state.is_awaiting_key());
    assert_eq!(state.registers, crate::chip::chip8::Registers::new());
    assert_eq!(state.memory.read(0x200).unwrap(), 0);
}
