//! Checking emitted code with the [iced_x86] decoder.

use iced_x86::{
    Code, Decoder, DecoderOptions, Formatter, Instruction, IntelFormatter
};
use itertools::Itertools;

use crate::error::EncodeError;
use crate::seq::{ SeqOp, SEQUENCE, reference_encoding };

fn describe(instr: &Instruction, formatter: &mut IntelFormatter) -> String {
    let mut output = String::new();
    formatter.format(instr, &mut output);
    output
}

/// Decode `bytes` and check that they contain exactly [SEQUENCE].
///
/// This checks mnemonics and register operands first, so a backend that
/// picks a different (but equivalent) encoding gets a useful error. After
/// that the bytes must also match [reference_encoding].
pub fn verify_sequence(bytes: &[u8]) -> Result<(), EncodeError> {
    let mut decoder = Decoder::new(64, bytes, DecoderOptions::NONE);
    let mut formatter = IntelFormatter::new();
    let mut instr = Instruction::default();
    let mut idx = 0;

    while decoder.can_decode() {
        let offset = decoder.position();
        decoder.decode_out(&mut instr);
        if instr.code() == Code::INVALID {
            return Err(EncodeError::Invalid { offset });
        }
        let expected = match SEQUENCE.get(idx) {
            Some(op) => op,
            None => {
                return Err(EncodeError::Count {
                    expected: SEQUENCE.len(),
                    found: idx + 1 + count_remaining(&mut decoder),
                });
            },
        };
        if !matches_op(&instr, expected) {
            return Err(EncodeError::Mismatch {
                idx,
                expected: expected.to_string(),
                found: describe(&instr, &mut formatter),
            });
        }
        idx += 1;
    }

    if idx != SEQUENCE.len() {
        return Err(EncodeError::Count { expected: SEQUENCE.len(), found: idx });
    }

    let reference = reference_encoding();
    if let Some(offset) = bytes.iter().zip(reference.iter())
        .position(|(x, y)| x != y)
    {
        return Err(EncodeError::Bytes { offset });
    }
    Ok(())
}

fn count_remaining(decoder: &mut Decoder) -> usize {
    let mut instr = Instruction::default();
    let mut n = 0;
    while decoder.can_decode() {
        decoder.decode_out(&mut instr);
        n += 1;
    }
    n
}

fn matches_op(instr: &Instruction, op: &SeqOp) -> bool {
    // Redundant prefixes decode to the same instruction
    if instr.code() != op.code() || instr.len() != op.len() {
        return false;
    }
    match op.reg() {
        Some(r) => instr.op_count() == 1 && instr.op0_register() == r.iced(),
        None => true,
    }
}

/// Disassemble `bytes` (assumed to live at `ip`) into a listing.
///
/// Each line looks like `<address>: <bytes> <instruction>`.
pub fn disassemble(bytes: &[u8], ip: u64) -> Vec<String> {
    let mut decoder = Decoder::with_ip(64, bytes, ip, DecoderOptions::NONE);
    let mut formatter = IntelFormatter::new();
    formatter.options_mut().set_digit_separator("_");
    let mut output = String::new();
    let mut instr  = Instruction::default();
    let mut lines = Vec::new();

    while decoder.can_decode() {
        decoder.decode_out(&mut instr);
        output.clear();
        formatter.format(&instr, &mut output);

        let start_idx = (instr.ip() - ip) as usize;
        let instr_bytes = &bytes[start_idx..start_idx + instr.len()];
        let bytestr = instr_bytes.iter().map(|b| format!("{:02x}", b)).join("");
        lines.push(format!("{:016x}: {:16} {}", instr.ip(), bytestr, output));
    }
    lines
}
