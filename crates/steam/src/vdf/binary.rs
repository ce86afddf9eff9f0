//! Binary VDF codec, as used by `shortcuts.vdf`.

use std::fs;
use std::path::Path;

use super::{Object, Value, Vdf};
use crate::SteamError;

/// Binary VDF type markers.
const TYPE_OBJECT: u8 = 0x00;
const TYPE_STRING: u8 = 0x01;
const TYPE_INT32: u8 = 0x02;
const TYPE_FLOAT32: u8 = 0x03;
const TYPE_POINTER: u8 = 0x04;
const TYPE_COLOR: u8 = 0x06;
const TYPE_UINT64: u8 = 0x07;
const TYPE_END: u8 = 0x08;
const TYPE_INT64: u8 = 0x0A;

/// Reads and parses a binary VDF file.
pub fn load(path: &Path) -> Result<Vdf, SteamError> {
    let data = fs::read(path).map_err(|e| {
        SteamError::Io(format!("failed to read {}: {e}", path.display()))
    })?;
    parse(&data)
}

/// Parses binary VDF data into a tree.
pub fn parse(data: &[u8]) -> Result<Vdf, SteamError> {
    if data.len() < 3 {
        return Err(SteamError::Vdf("binary VDF too small".into()));
    }

    if data[0] != TYPE_OBJECT {
        return Err(SteamError::Vdf(format!(
            "expected object marker at start, got 0x{:02x}",
            data[0]
        )));
    }

    let (key, pos) = read_string(data, 1)?;
    let (root, pos) = parse_object(data, pos)?;

    // Steam terminates the file with one extra end marker.
    let rest = &data[pos..];
    if !rest.iter().all(|&b| b == TYPE_END) {
        tracing::debug!(
            trailing = rest.len(),
            "ignoring trailing bytes after binary VDF root"
        );
    }

    Ok(Vdf::new(key, root))
}

/// Parses object entries up to and including the matching end marker.
fn parse_object(data: &[u8], mut pos: usize) -> Result<(Object, usize), SteamError> {
    let mut obj = Object::new();

    while pos < data.len() {
        let type_byte = data[pos];
        pos += 1;

        if type_byte == TYPE_END {
            return Ok((obj, pos));
        }

        let (key, new_pos) = read_string(data, pos)?;
        pos = new_pos;

        let value = match type_byte {
            TYPE_OBJECT => {
                let (child, new_pos) = parse_object(data, pos)?;
                pos = new_pos;
                Value::Obj(child)
            }
            TYPE_STRING => {
                let (s, new_pos) = read_string(data, pos)?;
                pos = new_pos;
                Value::Str(s)
            }
            TYPE_INT32 | TYPE_POINTER | TYPE_COLOR => {
                let bytes = take::<4>(data, pos, &key)?;
                pos += 4;
                let v = i32::from_le_bytes(bytes);
                match type_byte {
                    TYPE_INT32 => Value::Int32(v),
                    TYPE_POINTER => Value::Pointer(v),
                    _ => Value::Color(v),
                }
            }
            TYPE_FLOAT32 => {
                let bytes = take::<4>(data, pos, &key)?;
                pos += 4;
                Value::Float32(f32::from_le_bytes(bytes))
            }
            TYPE_UINT64 => {
                let bytes = take::<8>(data, pos, &key)?;
                pos += 8;
                Value::UInt64(u64::from_le_bytes(bytes))
            }
            TYPE_INT64 => {
                let bytes = take::<8>(data, pos, &key)?;
                pos += 8;
                Value::Int64(i64::from_le_bytes(bytes))
            }
            _ => {
                return Err(SteamError::Vdf(format!(
                    "unknown type marker 0x{type_byte:02x} for key '{key}' at pos {}",
                    pos - 1
                )));
            }
        };

        obj.push(key, value);
    }

    Err(SteamError::Vdf("unexpected end of data in object".into()))
}

/// Copies `N` bytes starting at `pos`.
fn take<const N: usize>(data: &[u8], pos: usize, key: &str) -> Result<[u8; N], SteamError> {
    data.get(pos..pos + N)
        .and_then(|s| <[u8; N]>::try_from(s).ok())
        .ok_or_else(|| {
            SteamError::Vdf(format!(
                "unexpected end of data reading {N}-byte value for '{key}'"
            ))
        })
}

/// Reads a null-terminated string from data starting at pos.
fn read_string(data: &[u8], pos: usize) -> Result<(String, usize), SteamError> {
    let tail = data.get(pos..).unwrap_or_default();
    match tail.iter().position(|&b| b == 0x00) {
        Some(len) => {
            let s = String::from_utf8_lossy(&tail[..len]).into_owned();
            Ok((s, pos + len + 1))
        }
        None => Err(SteamError::Vdf(format!(
            "unterminated string starting at pos {pos}"
        ))),
    }
}

/// Serializes a tree into binary VDF, including Steam's trailing end marker.
pub fn write(vdf: &Vdf) -> Vec<u8> {
    let mut out = Vec::new();
    out.push(TYPE_OBJECT);
    write_string(&mut out, &vdf.key);
    write_object(&mut out, &vdf.root);
    out.push(TYPE_END);
    out
}

fn write_object(out: &mut Vec<u8>, obj: &Object) {
    for (key, value) in obj.iter() {
        match value {
            Value::Obj(child) => {
                out.push(TYPE_OBJECT);
                write_string(out, key);
                write_object(out, child);
            }
            Value::Str(s) => {
                out.push(TYPE_STRING);
                write_string(out, key);
                write_string(out, s);
            }
            Value::Int32(v) => {
                out.push(TYPE_INT32);
                write_string(out, key);
                out.extend_from_slice(&v.to_le_bytes());
            }
            Value::Pointer(v) => {
                out.push(TYPE_POINTER);
                write_string(out, key);
                out.extend_from_slice(&v.to_le_bytes());
            }
            Value::Color(v) => {
                out.push(TYPE_COLOR);
                write_string(out, key);
                out.extend_from_slice(&v.to_le_bytes());
            }
            Value::Float32(v) => {
                out.push(TYPE_FLOAT32);
                write_string(out, key);
                out.extend_from_slice(&v.to_le_bytes());
            }
            Value::UInt64(v) => {
                out.push(TYPE_UINT64);
                write_string(out, key);
                out.extend_from_slice(&v.to_le_bytes());
            }
            Value::Int64(v) => {
                out.push(TYPE_INT64);
                write_string(out, key);
                out.extend_from_slice(&v.to_le_bytes());
            }
        }
    }
    out.push(TYPE_END);
}

fn write_string(out: &mut Vec<u8>, s: &str) {
    out.extend_from_slice(s.as_bytes());
    out.push(0x00);
}
