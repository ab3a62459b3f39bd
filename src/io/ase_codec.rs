// src/io/ase_codec.rs
//
// Decoding of the array encodings ASE databases use:
//   * raw little-endian blobs (sqlite `numbers`, `positions`, `cell`)
//   * `{"__ndarray__": [shape, dtype, flat]}` objects in JSON text
//   * the binary object format of the sqlite `data` column: an i64 offset
//     header, raw array buffers, then a JSON tail whose `__ndarray__`
//     entries carry buffer offsets instead of values.

use serde_json::{Map, Number, Value};

const NDARRAY: &str = "__ndarray__";

pub fn f64s_from_le(bytes: &[u8]) -> Result<Vec<f64>, String> {
    if bytes.len() % 8 != 0 {
        return Err(format!("{} bytes is not a float64 buffer", bytes.len()));
    }
    Ok(bytes
        .chunks_exact(8)
        .map(|c| f64::from_le_bytes([c[0], c[1], c[2], c[3], c[4], c[5], c[6], c[7]]))
        .collect())
}

pub fn i32s_from_le(bytes: &[u8]) -> Result<Vec<i32>, String> {
    if bytes.len() % 4 != 0 {
        return Err(format!("{} bytes is not an int32 buffer", bytes.len()));
    }
    Ok(bytes
        .chunks_exact(4)
        .map(|c| i32::from_le_bytes([c[0], c[1], c[2], c[3]]))
        .collect())
}

/// Groups a flat buffer into [x, y, z] triples.
pub fn triples(flat: &[f64]) -> Result<Vec<[f64; 3]>, String> {
    if flat.len() % 3 != 0 {
        return Err(format!("{} values do not form 3-vectors", flat.len()));
    }
    Ok(flat.chunks_exact(3).map(|c| [c[0], c[1], c[2]]).collect())
}

pub fn lattice_from_flat(flat: &[f64]) -> Result<[[f64; 3]; 3], String> {
    match flat.len() {
        9 => Ok([
            [flat[0], flat[1], flat[2]],
            [flat[3], flat[4], flat[5]],
            [flat[6], flat[7], flat[8]],
        ]),
        // cell-less rows are stored as zeros or not at all
        0 => Ok([[0.0; 3]; 3]),
        n => Err(format!("cell has {} values, expected 9", n)),
    }
}

/// Decodes the ASE binary object encoding.
pub fn bytes_to_value(bytes: &[u8]) -> Result<Value, String> {
    if bytes.len() < 8 {
        return Err("binary object shorter than its header".to_string());
    }
    let mut head = [0u8; 8];
    head.copy_from_slice(&bytes[..8]);
    let offset = i64::from_le_bytes(head);
    let offset = usize::try_from(offset)
        .ok()
        .filter(|&o| o >= 8 && o <= bytes.len())
        .ok_or_else(|| format!("JSON offset {} outside the {}-byte object", offset, bytes.len()))?;

    let text = std::str::from_utf8(&bytes[offset..]).map_err(|e| e.to_string())?;
    let tree: Value = serde_json::from_str(text).map_err(|e| e.to_string())?;
    resolve(tree, Some(bytes))
}

/// Replaces every `__ndarray__` object with nested JSON arrays. `buffer` is
/// the enclosing binary object when offsets rather than values are stored.
pub fn resolve(value: Value, buffer: Option<&[u8]>) -> Result<Value, String> {
    match value {
        Value::Object(map) => {
            if map.len() == 1 {
                if let Some(spec) = map.get(NDARRAY) {
                    return decode_ndarray(spec, buffer);
                }
            }
            let mut out = Map::with_capacity(map.len());
            for (k, v) in map {
                out.insert(k, resolve(v, buffer)?);
            }
            Ok(Value::Object(out))
        }
        Value::Array(items) => items
            .into_iter()
            .map(|v| resolve(v, buffer))
            .collect::<Result<Vec<_>, _>>()
            .map(Value::Array),
        other => Ok(other),
    }
}

/// Flattens a (possibly nested) numeric JSON array.
pub fn flatten_f64(value: &Value) -> Result<Vec<f64>, String> {
    let mut out = Vec::new();
    collect_f64(value, &mut out)?;
    Ok(out)
}

fn collect_f64(value: &Value, out: &mut Vec<f64>) -> Result<(), String> {
    match value {
        Value::Number(n) => {
            out.push(n.as_f64().ok_or("non-finite number")?);
            Ok(())
        }
        Value::Bool(b) => {
            out.push(if *b { 1.0 } else { 0.0 });
            Ok(())
        }
        Value::Array(items) => items.iter().try_for_each(|v| collect_f64(v, out)),
        other => Err(format!("expected numbers, found {}", other)),
    }
}

fn decode_ndarray(spec: &Value, buffer: Option<&[u8]>) -> Result<Value, String> {
    let parts = spec.as_array().filter(|p| p.len() == 3).ok_or("malformed __ndarray__")?;
    let shape: Vec<usize> = parts[0]
        .as_array()
        .ok_or("ndarray shape is not a list")?
        .iter()
        .map(|d| d.as_u64().map(|d| d as usize).ok_or("ndarray dimension is not an integer"))
        .collect::<Result<_, _>>()?;
    let dtype = parts[1].as_str().ok_or("ndarray dtype is not a string")?;
    let count = shape
        .iter()
        .try_fold(1usize, |acc, &d| acc.checked_mul(d))
        .ok_or("ndarray shape overflows")?;

    let flat = match (&parts[2], buffer) {
        (Value::Array(values), _) => {
            let mut flat = Vec::new();
            for v in values {
                flat.push(resolve(v.clone(), buffer)?);
            }
            flat
        }
        (Value::Number(offset), Some(bytes)) => {
            let offset = offset.as_u64().ok_or("ndarray offset is not an integer")? as usize;
            read_buffer(bytes, offset, count, dtype)?
        }
        _ => return Err("ndarray payload is neither values nor an offset".to_string()),
    };

    if flat.len() != count {
        return Err(format!("ndarray holds {} values, shape needs {}", flat.len(), count));
    }
    Ok(nest(flat, &shape))
}

fn read_buffer(bytes: &[u8], offset: usize, count: usize, dtype: &str) -> Result<Vec<Value>, String> {
    let width = match dtype {
        "float64" | "int64" | "uint64" => 8,
        "float32" | "int32" | "uint32" => 4,
        "int16" | "uint16" => 2,
        "int8" | "uint8" | "bool" => 1,
        other => return Err(format!("unsupported dtype {}", other)),
    };
    let end = count
        .checked_mul(width)
        .and_then(|len| offset.checked_add(len))
        .ok_or_else(|| format!("ndarray of {} x {} bytes at {} overflows", count, width, offset))?;
    let raw = bytes
        .get(offset..end)
        .ok_or_else(|| format!("ndarray [{}, {}) outside the object", offset, end))?;

    let values = raw
        .chunks_exact(width)
        .map(|c| match dtype {
            "float64" => float(f64::from_le_bytes(c.try_into().unwrap_or([0; 8]))),
            "float32" => float(f32::from_le_bytes(c.try_into().unwrap_or([0; 4])) as f64),
            "int64" => Value::from(i64::from_le_bytes(c.try_into().unwrap_or([0; 8]))),
            "uint64" => Value::from(u64::from_le_bytes(c.try_into().unwrap_or([0; 8]))),
            "int32" => Value::from(i32::from_le_bytes(c.try_into().unwrap_or([0; 4]))),
            "uint32" => Value::from(u32::from_le_bytes(c.try_into().unwrap_or([0; 4]))),
            "int16" => Value::from(i16::from_le_bytes(c.try_into().unwrap_or([0; 2]))),
            "uint16" => Value::from(u16::from_le_bytes(c.try_into().unwrap_or([0; 2]))),
            "int8" => Value::from(c[0] as i8),
            "bool" => Value::Bool(c[0] != 0),
            _ => Value::from(c[0]),
        })
        .collect();
    Ok(values)
}

fn float(x: f64) -> Value {
    Number::from_f64(x).map_or(Value::Null, Value::Number)
}

fn nest(flat: Vec<Value>, shape: &[usize]) -> Value {
    if shape.len() <= 1 {
        return Value::Array(flat);
    }
    let inner: usize = shape[1..].iter().product();
    if inner == 0 {
        return Value::Array(Vec::new());
    }
    let mut rows = Vec::with_capacity(shape[0]);
    let mut iter = flat.into_iter();
    for _ in 0..shape[0] {
        let chunk: Vec<Value> = iter.by_ref().take(inner).collect();
        rows.push(nest(chunk, &shape[1..]));
    }
    Value::Array(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    /// Builds an object the way ASE's `object_to_bytes` lays it out.
    fn encode(arrays: &[&[f64]], tree: impl Fn(&[usize]) -> Value) -> Vec<u8> {
        let mut body = Vec::new();
        let mut offsets = Vec::new();
        for a in arrays {
            offsets.push(8 + body.len());
            for x in a.iter() {
                body.extend_from_slice(&x.to_le_bytes());
            }
        }
        let text = serde_json::to_string(&tree(&offsets)).unwrap();
        let mut out = ((8 + body.len()) as i64).to_le_bytes().to_vec();
        out.extend(body);
        out.extend(text.as_bytes());
        out
    }

    #[test]
    fn test_binary_object() {
        let bytes = encode(&[&[-0.1, -0.2, -0.05]], |off| {
            json!({"extrapolation": {"dFdG": {"__ndarray__": [[3], "float64", off[0]]}, "n": 3}})
        });
        let v = bytes_to_value(&bytes).unwrap();
        assert_eq!(v["extrapolation"]["dFdG"], json!([-0.1, -0.2, -0.05]));
        assert_eq!(v["extrapolation"]["n"], json!(3));
    }

    #[test]
    fn test_binary_object_2d() {
        let bytes = encode(&[&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]], |off| {
            json!({"m": {"__ndarray__": [[2, 3], "float64", off[0]]}})
        });
        let v = bytes_to_value(&bytes).unwrap();
        assert_eq!(v["m"], json!([[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]]));
    }

    #[test]
    fn test_bad_header() {
        let mut bytes = 4096i64.to_le_bytes().to_vec();
        bytes.extend(b"{}");
        assert!(bytes_to_value(&bytes).is_err());
        assert!(bytes_to_value(b"abc").is_err());
    }

    #[test]
    fn test_huge_ndarray_is_rejected() {
        let bytes = encode(&[&[1.0]], |_| json!({"a": {"__ndarray__": [[u64::MAX / 4], "float64", 8]}}));
        assert!(bytes_to_value(&bytes).is_err());
        let bytes = encode(&[&[1.0]], |_| json!({"a": {"__ndarray__": [[1], "float64", u64::MAX - 2]}}));
        assert!(bytes_to_value(&bytes).is_err());
        let bytes = encode(&[&[1.0]], |_| json!({"a": {"__ndarray__": [[u64::MAX, 2], "float64", 8]}}));
        assert!(bytes_to_value(&bytes).is_err());
    }

    #[test]
    fn test_inline_ndarray() {
        let v = resolve(json!({"cell": {"__ndarray__": [[3, 3], "float64", [1, 0, 0, 0, 1, 0, 0, 0, 1]]}}), None).unwrap();
        let flat = flatten_f64(&v["cell"]).unwrap();
        assert_eq!(lattice_from_flat(&flat).unwrap()[1], [0.0, 1.0, 0.0]);
    }

    #[test]
    fn test_raw_blobs() {
        let numbers: Vec<u8> = [27i32, 8].iter().flat_map(|n| n.to_le_bytes()).collect();
        assert_eq!(i32s_from_le(&numbers).unwrap(), vec![27, 8]);
        assert!(i32s_from_le(&numbers[..5]).is_err());

        let pos: Vec<u8> = [0.0f64, 1.0, 2.0, 3.0, 4.0, 5.0].iter().flat_map(|x| x.to_le_bytes()).collect();
        let flat = f64s_from_le(&pos).unwrap();
        assert_eq!(triples(&flat).unwrap()[1], [3.0, 4.0, 5.0]);
    }
}
