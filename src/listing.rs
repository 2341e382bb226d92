//! `luac -l` style listing of a decoded function tree.
//!
//! Instructions are printed as raw words; only the surrounding metadata
//! (constants, locals, upvalues) is rendered symbolically.

use std::fmt::{self, Write};

use crate::parser::{Constant, LuaString, Prototype};

/// Displays a prototype and everything nested in it, depth first
pub struct Listing<'a>(pub &'a Prototype);

impl fmt::Display for Listing<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_listing(f, self.0)
    }
}

pub fn render(proto: &Prototype) -> String {
    Listing(proto).to_string()
}

/// Writes the listing of `proto` followed by its nested functions
pub fn write_listing<W: Write>(out: &mut W, proto: &Prototype) -> fmt::Result {
    write_banner(out, proto)?;
    write_code(out, proto)?;
    write_details(out, proto)?;

    for child in &proto.prototypes {
        write_listing(out, child)?;
    }
    Ok(())
}

fn write_banner<W: Write>(out: &mut W, proto: &Prototype) -> fmt::Result {
    let kind = if proto.is_main() { "main" } else { "function" };
    let vararg = if proto.is_vararg() { "+" } else { "" };

    writeln!(out)?;
    writeln!(
        out,
        "{} <{}:{},{}> ({} instructions)",
        kind,
        chunk_name(&proto.source_name),
        proto.line_defined,
        proto.last_line_defined,
        proto.code.len()
    )?;
    writeln!(out)?;
    writeln!(
        out,
        "{}{} params, {} slots, {} upvalues, {} locals, {} constants, {} functions",
        proto.num_params,
        vararg,
        proto.max_stack_size,
        proto.upvalues.len(),
        proto.debug_info.locals.len(),
        proto.constants.len(),
        proto.prototypes.len()
    )
}

fn write_code<W: Write>(out: &mut W, proto: &Prototype) -> fmt::Result {
    for (pc, word) in proto.code.iter().enumerate() {
        match proto.debug_info.line(pc) {
            Some(line) => writeln!(out, "\t{}\t[{}]\t0x{:08X}", pc + 1, line, word)?,
            None => writeln!(out, "\t{}\t[_]\t0x{:08X}", pc + 1, word)?,
        }
    }
    Ok(())
}

fn write_details<W: Write>(out: &mut W, proto: &Prototype) -> fmt::Result {
    writeln!(out, "constants ({}):", proto.constants.len())?;
    for (i, constant) in proto.constants.iter().enumerate() {
        write!(out, "\t{}\t", i + 1)?;
        write_constant(out, constant)?;
        writeln!(out)?;
    }

    let locals = &proto.debug_info.locals;
    writeln!(out, "locals ({}):", locals.len())?;
    for (i, local) in locals.iter().enumerate() {
        writeln!(
            out,
            "\t{}\t{}\t{}\t{}",
            i,
            local.varname,
            u64::from(local.startpc) + 1,
            u64::from(local.endpc) + 1
        )?;
    }

    writeln!(out, "upvalues ({}):", proto.upvalues.len())?;
    for (i, upvalue) in proto.upvalues.iter().enumerate() {
        // Stripped chunks may carry fewer names than upvalues.
        match proto.debug_info.upvalue_name(i) {
            Some(name) => write!(out, "\t{}\t{}", i, name)?,
            None => write!(out, "\t{}\t-", i)?,
        }
        writeln!(out, "\t{}\t{}", upvalue.instack, upvalue.idx)?;
    }
    Ok(())
}

/// Chunk name as luac shows it: `@file` and `=name` lose their prefix
fn chunk_name(source: &LuaString) -> String {
    match source.as_bytes().first().copied() {
        None => "?".to_owned(),
        Some(b'@' | b'=') => String::from_utf8_lossy(&source.as_bytes()[1..]).into_owned(),
        Some(0x1b) => "(bstring)".to_owned(),
        Some(_) => "(string)".to_owned(),
    }
}

fn write_constant<W: Write>(out: &mut W, constant: &Constant) -> fmt::Result {
    match constant {
        Constant::Nil => out.write_str("nil"),
        Constant::Boolean(b) => write!(out, "{}", b),
        Constant::Integer(i) => write!(out, "{}", i),
        Constant::Number(n) => out.write_str(&format_number(*n)),
        Constant::String(s) => write_quoted(out, s),
    }
}

/// Float constants always look like floats, so `1.0` never reads as the integer `1`
fn format_number(n: f64) -> String {
    if n.is_nan() {
        return "nan".to_owned();
    }
    if n.is_infinite() {
        return if n > 0.0 { "inf" } else { "-inf" }.to_owned();
    }

    let magnitude = n.abs();
    if magnitude >= 1e16 || (magnitude != 0.0 && magnitude < 1e-4) {
        format!("{:e}", n)
    } else if n.fract() == 0.0 {
        format!("{:.1}", n)
    } else {
        n.to_string()
    }
}

fn write_quoted<W: Write>(out: &mut W, s: &LuaString) -> fmt::Result {
    out.write_char('"')?;
    for &byte in s.as_bytes() {
        match byte {
            b'"' => out.write_str("\\\"")?,
            b'\\' => out.write_str("\\\\")?,
            0x07 => out.write_str("\\a")?,
            0x08 => out.write_str("\\b")?,
            0x0c => out.write_str("\\f")?,
            b'\n' => out.write_str("\\n")?,
            b'\r' => out.write_str("\\r")?,
            b'\t' => out.write_str("\\t")?,
            0x0b => out.write_str("\\v")?,
            0x20..=0x7e => out.write_char(char::from(byte))?,
            _ => write!(out, "\\{:03}", byte)?,
        }
    }
    out.write_char('"')
}
