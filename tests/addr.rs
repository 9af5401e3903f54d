use pretty_assertions::assert_eq;
use sim8086::addressing::{resolve, Operand, Register};
use sim8086::decoder::CommonFields;
use sim8086::disasm::disassemble;

const BASES: [&str; 8] = [
    "bx + si", "bx + di", "bp + si", "bp + di", "si", "di", "bp", "bx",
];

#[test]
fn every_base_without_displacement() {
    let mut bytes = Vec::new();
    let mut expected = String::from("bits 16\n");
    for rm in 0u8..8 {
        if rm == 0b110 {
            continue;
        }
        bytes.extend_from_slice(&[0x8B, 0b00_001_000 | rm]);
        expected.push_str(&format!("mov cx, [{}]\n", BASES[rm as usize]));
    }
    assert_eq!(disassemble(&bytes).unwrap(), expected);
}

#[test]
fn every_base_with_byte_and_word_displacement() {
    let mut bytes = Vec::new();
    let mut expected = String::from("bits 16\n");
    for rm in 0u8..8 {
        bytes.extend_from_slice(&[0x8A, 0b01_010_000 | rm, 0x7F]);
        expected.push_str(&format!("mov dl, [{} + 127]\n", BASES[rm as usize]));
        bytes.extend_from_slice(&[0x8A, 0b10_010_000 | rm, 0x00, 0x80]);
        expected.push_str(&format!("mov dl, [{} - 32768]\n", BASES[rm as usize]));
    }
    assert_eq!(disassemble(&bytes).unwrap(), expected);
}

#[test]
fn bp_with_zero_byte_displacement_prints_bare() {
    assert_eq!(disassemble(&[0x8B, 0x46, 0x00]).unwrap(), "bits 16\nmov ax, [bp]\n");
}

#[test]
fn negative_byte_displacement_is_sign_extended() {
    assert_eq!(
        disassemble(&[0x89, 0x4F, 0x80]).unwrap(),
        "bits 16\nmov [bx - 128], cx\n"
    );
}

#[test]
fn direct_address_prints_unsigned() {
    assert_eq!(
        disassemble(&[0x8B, 0x0E, 0xFF, 0xFF]).unwrap(),
        "bits 16\nmov cx, [65535]\n"
    );
}

#[test]
fn register_mode_resolves_to_register() {
    let f = CommonFields { mode: 0b11, reg: 0, rm: 0b100, disp: 0 };
    assert_eq!(resolve(&f, true), Operand::Register(Register::new(4, true)));
    assert_eq!(resolve(&f, false).to_string(), "ah");
    assert_eq!(resolve(&f, true).to_string(), "sp");
}
