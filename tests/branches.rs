use pretty_assertions::assert_eq;
use sim8086::exec::IntExecutor;
use sim8086::isa::i8086::I8086Decoder;
use sim8086::{Cpu, CpuConfig, Flags};

#[test]
fn jz_taken_when_zero_set() {
    let mut cpu = Cpu::load(CpuConfig::default(), &[0x74, 0x02, 0x90, 0x90]).unwrap();
    cpu.flags = Flags::Z;
    let (_, trace) = cpu.step(&I8086Decoder::new(), &IntExecutor).unwrap().unwrap();
    assert_eq!(cpu.ip, 4);
    assert_eq!(trace.ip, (0, 4));
    assert!(cpu.is_done());
}

#[test]
fn jz_falls_through_when_zero_clear() {
    let mut cpu = Cpu::load(CpuConfig::default(), &[0x74, 0x02, 0xB3, 0x01]).unwrap();
    cpu.step(&I8086Decoder::new(), &IntExecutor).unwrap();
    assert_eq!(cpu.ip, 2);
}

#[test]
fn jz_skips_an_instruction() {
    let program = [
        0xB8, 0x01, 0x00, // mov ax, 1
        0x83, 0xE8, 0x01, // sub ax, 1
        0x74, 0x02, // jz $+2+2
        0xB3, 0x01, // mov bl, 1
        0xB1, 0x02, // mov cl, 2
    ];
    let mut cpu = Cpu::load(CpuConfig::default(), &program).unwrap();
    let (dec, exec) = (I8086Decoder::new(), IntExecutor);
    let mut visited = Vec::new();
    while let Some((fetched, _)) = cpu.step(&dec, &exec).unwrap() {
        visited.push(fetched.offset);
    }
    assert_eq!(visited, vec![0, 3, 6, 10]);
    assert_eq!(cpu.regs[3], 0);
    assert_eq!(cpu.regs[1], 2);
}

#[test]
fn jnz_loop_counts_down() {
    let program = [
        0xB9, 0x03, 0x00, // mov cx, 3
        0xBB, 0xE8, 0x03, // mov bx, 1000
        0x83, 0xC3, 0x0A, // add bx, 10
        0x83, 0xE9, 0x01, // sub cx, 1
        0x75, 0xF8, // jnz $+2-8
    ];
    let mut cpu = Cpu::load(CpuConfig::default(), &program).unwrap();
    let (dec, exec) = (I8086Decoder::new(), IntExecutor);
    let mut steps = 0;
    while cpu.step(&dec, &exec).unwrap().is_some() {
        steps += 1;
    }
    assert_eq!(steps, 11);
    assert_eq!(cpu.regs[1], 0);
    assert_eq!(cpu.regs[3], 1030);
    assert_eq!(cpu.flags, Flags::Z);
    assert_eq!(cpu.ip, 14);
}

#[test]
fn other_conditions_fall_through() {
    // jl, js, loop and jcxz are decoded but never taken
    for op in [0x7C, 0x78, 0xE2, 0xE3] {
        let mut cpu = Cpu::load(CpuConfig::default(), &[op, 0x10]).unwrap();
        cpu.flags = Flags::S;
        cpu.step(&I8086Decoder::new(), &IntExecutor).unwrap();
        assert_eq!(cpu.ip, 2, "opcode {op:#04x}");
    }
}

#[test]
fn jump_target_can_be_behind_the_start() {
    let mut cpu = Cpu::load(CpuConfig::default(), &[0x75, 0xFC]).unwrap();
    cpu.step(&I8086Decoder::new(), &IntExecutor).unwrap();
    assert_eq!(cpu.ip, 0xFFFE);
    assert!(cpu.is_done());
}
