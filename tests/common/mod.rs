//! Test-only writer producing chunks byte-for-byte the way luac 5.3 dumps them.

#![allow(dead_code)]

pub const HEADER: [u8; 33] = [
    0x1b, b'L', b'u', b'a', // signature
    0x53, // version
    0x00, // format
    0x19, 0x93, b'\r', b'\n', 0x1a, b'\n', // luac data
    4, 8, 4, 8, 8, // int, size_t, Instruction, lua_Integer, lua_Number
    0x78, 0x56, 0, 0, 0, 0, 0, 0, // 0x5678
    0, 0, 0, 0, 0, 0x28, 0x77, 0x40, // 370.5
];

pub enum K {
    Nil,
    Bool(bool),
    Int(i64),
    Num(f64),
    Short(&'static str),
    Long(Vec<u8>),
    /// Arbitrary tag byte with no payload
    Tag(u8),
}

#[derive(Default)]
pub struct Func {
    pub source: Option<&'static str>,
    pub line_defined: u32,
    pub last_line_defined: u32,
    pub num_params: u8,
    pub is_vararg: u8,
    pub max_stack_size: u8,
    pub code: Vec<u32>,
    pub constants: Vec<K>,
    pub upvalues: Vec<(u8, u8)>,
    pub protos: Vec<Func>,
    pub lineinfo: Vec<u32>,
    pub locals: Vec<(&'static str, u32, u32)>,
    pub upvalue_names: Vec<&'static str>,
}

pub fn write_string(out: &mut Vec<u8>, s: Option<&[u8]>) {
    let Some(bytes) = s else {
        out.push(0);
        return;
    };
    let size = bytes.len() + 1;
    if size < 0xFF {
        out.push(size as u8);
    } else {
        out.push(0xFF);
        out.extend_from_slice(&(size as u64).to_le_bytes());
    }
    out.extend_from_slice(bytes);
}

fn write_u32(out: &mut Vec<u8>, v: u32) {
    out.extend_from_slice(&v.to_le_bytes());
}

fn write_len(out: &mut Vec<u8>, len: usize) {
    write_u32(out, len as u32);
}

impl Func {
    pub fn write(&self, out: &mut Vec<u8>) {
        write_string(out, self.source.map(str::as_bytes));
        write_u32(out, self.line_defined);
        write_u32(out, self.last_line_defined);
        out.extend_from_slice(&[self.num_params, self.is_vararg, self.max_stack_size]);

        write_len(out, self.code.len());
        for &word in &self.code {
            write_u32(out, word);
        }

        write_len(out, self.constants.len());
        for k in &self.constants {
            match k {
                K::Nil => out.push(0x00),
                K::Bool(b) => out.extend_from_slice(&[0x01, u8::from(*b)]),
                K::Int(i) => {
                    out.push(0x13);
                    out.extend_from_slice(&i.to_le_bytes());
                }
                K::Num(n) => {
                    out.push(0x03);
                    out.extend_from_slice(&n.to_le_bytes());
                }
                K::Short(s) => {
                    out.push(0x04);
                    write_string(out, Some(s.as_bytes()));
                }
                K::Long(bytes) => {
                    out.push(0x14);
                    write_string(out, Some(bytes));
                }
                K::Tag(tag) => out.push(*tag),
            }
        }

        write_len(out, self.upvalues.len());
        for &(instack, idx) in &self.upvalues {
            out.extend_from_slice(&[instack, idx]);
        }

        write_len(out, self.protos.len());
        for proto in &self.protos {
            proto.write(out);
        }

        write_len(out, self.lineinfo.len());
        for &line in &self.lineinfo {
            write_u32(out, line);
        }

        write_len(out, self.locals.len());
        for &(name, startpc, endpc) in &self.locals {
            write_string(out, Some(name.as_bytes()));
            write_u32(out, startpc);
            write_u32(out, endpc);
        }

        write_len(out, self.upvalue_names.len());
        for name in &self.upvalue_names {
            write_string(out, Some(name.as_bytes()));
        }
    }
}

/// Full chunk: header, main closure upvalue count, main function
pub fn chunk(main: &Func) -> Vec<u8> {
    let mut out = HEADER.to_vec();
    out.push(main.upvalues.len() as u8);
    main.write(&mut out);
    out
}

/// Chunk laid out like `luac` output for
///
/// ```lua
/// local greet = function(name) return "hello " .. name end
/// print(greet("world"))
/// ```
pub fn hello_main() -> Func {
    let greet = Func {
        line_defined: 1,
        last_line_defined: 1,
        num_params: 1,
        max_stack_size: 3,
        code: vec![0x0000_0041, 0x0000_8081, 0x0080_405D, 0x0100_0026, 0x0080_0026],
        constants: vec![K::Short("hello ")],
        lineinfo: vec![1, 1, 1, 1, 1],
        locals: vec![("name", 0, 5)],
        ..Default::default()
    };

    Func {
        source: Some("@hello.lua"),
        is_vararg: 1,
        max_stack_size: 4,
        code: vec![
            0x0000_002C, 0x0000_4046, 0x0000_00C0, 0x0000_C101, 0x0100_80A4,
            0x0100_0064, 0x0080_0026,
        ],
        constants: vec![K::Short("print"), K::Short("world")],
        upvalues: vec![(1, 0)],
        protos: vec![greet],
        lineinfo: vec![1, 2, 2, 2, 2, 2, 2],
        locals: vec![("greet", 1, 7)],
        upvalue_names: vec!["_ENV"],
        ..Default::default()
    }
}
