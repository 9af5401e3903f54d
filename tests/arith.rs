use pretty_assertions::assert_eq;
use sim8086::exec::IntExecutor;
use sim8086::isa::i8086::I8086Decoder;
use sim8086::{Cpu, CpuConfig, Flags};

fn run_all(program: &[u8]) -> Cpu {
    let mut cpu = Cpu::load(CpuConfig::default(), program).unwrap();
    let dec = I8086Decoder::new();
    let exec = IntExecutor;
    while cpu.step(&dec, &exec).unwrap().is_some() {}
    cpu
}

#[test]
fn add_immediate_clears_flags() {
    let cpu = run_all(&[0xB8, 0x01, 0x00, 0x83, 0xC0, 0x02]); // mov ax, 1; add ax, 2
    assert_eq!(cpu.regs[0], 3);
    assert_eq!(cpu.flags, Flags::empty());
}

#[test]
fn sub_to_zero_sets_z() {
    let cpu = run_all(&[0xBB, 0x05, 0x00, 0x83, 0xEB, 0x05]); // mov bx, 5; sub bx, 5
    assert_eq!(cpu.regs[3], 0);
    assert_eq!(cpu.flags, Flags::Z);
}

#[test]
fn sub_below_zero_wraps_and_sets_s() {
    let cpu = run_all(&[0xB8, 0x01, 0x00, 0x83, 0xE8, 0x02]); // mov ax, 1; sub ax, 2
    assert_eq!(cpu.regs[0], 0xFFFF);
    assert_eq!(cpu.flags, Flags::S);
}

#[test]
fn add_wraps_at_sixteen_bits() {
    let cpu = run_all(&[
        0xB8, 0xFF, 0xFF, // mov ax, 0xffff
        0x05, 0x01, 0x00, // add ax, 1
    ]);
    assert_eq!(cpu.regs[0], 0);
    assert_eq!(cpu.flags, Flags::Z);
}

#[test]
fn sign_extended_immediate_subtracts() {
    let cpu = run_all(&[0xB9, 0x0A, 0x00, 0x83, 0xC1, 0xFE]); // mov cx, 10; add cx, -2
    assert_eq!(cpu.regs[1], 8);
    assert_eq!(cpu.flags, Flags::empty());
}

#[test]
fn cmp_sets_flags_without_writing_back() {
    let cpu = run_all(&[
        0xB8, 0x05, 0x00, // mov ax, 5
        0xBB, 0x05, 0x00, // mov bx, 5
        0x39, 0xD8, // cmp ax, bx
    ]);
    assert_eq!((cpu.regs[0], cpu.regs[3]), (5, 5));
    assert_eq!(cpu.flags, Flags::Z);

    let cpu = run_all(&[0xB8, 0x05, 0x00, 0x3D, 0x06, 0x00]); // mov ax, 5; cmp ax, 6
    assert_eq!(cpu.regs[0], 5);
    assert_eq!(cpu.flags, Flags::S);
}

#[test]
fn flags_are_recomputed_each_time() {
    let cpu = run_all(&[
        0xB8, 0x00, 0x00, // mov ax, 0
        0x83, 0xE8, 0x01, // sub ax, 1 -> S
        0x83, 0xC0, 0x01, // add ax, 1 -> Z
        0x83, 0xC0, 0x01, // add ax, 1 -> none
    ]);
    assert_eq!(cpu.regs[0], 1);
    assert_eq!(cpu.flags, Flags::empty());
}

#[test]
fn register_forms_honour_direction() {
    let cpu = run_all(&[
        0xB8, 0x0A, 0x00, // mov ax, 10
        0xBB, 0x03, 0x00, // mov bx, 3
        0x29, 0xD8, // sub ax, bx
        0x2B, 0xD8, // sub bx, ax
    ]);
    assert_eq!(cpu.regs[0], 7);
    assert_eq!(cpu.regs[3], 0xFFFC);
    assert_eq!(cpu.flags, Flags::S);
}

#[test]
fn byte_arithmetic_touches_one_half() {
    let cpu = run_all(&[
        0xB8, 0x10, 0x20, // mov ax, 0x2010
        0x04, 0x05, // add al, 5
        0x80, 0xC4, 0x01, // add ah, 1
    ]);
    assert_eq!(cpu.regs[0], 0x2115);
}

#[test]
fn flag_display_orders_z_before_s() {
    assert_eq!((Flags::Z | Flags::S).to_string(), "ZS");
    assert_eq!(Flags::S.to_string(), "S");
    assert_eq!(Flags::empty().to_string(), "");
}
