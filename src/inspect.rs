//! Human-readable views of tables, trees and files.

use std::fmt::Write as _;

use crate::engine::{EncodingMap, FrequencyTable, HuffmanNode, HuffmanTree, Symbol};

/// Quoted display form of a symbol: `'a'`, `'\n'`, `' '`, `EOF`.
pub fn symbol_label(symbol: Symbol) -> String {
    let byte = match symbol {
        Symbol::EndOfStream => return "EOF".to_string(),
        Symbol::Byte(b) => b,
    };
    match byte {
        b'\n' => "'\\n'".to_string(),
        b'\t' => "'\\t'".to_string(),
        b'\r' => "'\\r'".to_string(),
        0x0C => "'\\f'".to_string(),
        0x08 => "'\\b'".to_string(),
        0 => "'\\0'".to_string(),
        b' ' => "' '".to_string(),
        b if b.is_ascii_graphic() => format!("'{}'", b as char),
        b => format!("'\\x{:02x}'", b),
    }
}

pub fn render_frequencies(table: &FrequencyTable) -> String {
    let mut out = String::new();
    for (symbol, count) in table.iter() {
        let _ = writeln!(out, "{}: \t{}\t-->\t{}", symbol.code(), symbol_label(symbol), count);
    }
    out
}

pub fn render_encoding_map(map: &EncodingMap) -> String {
    let mut out = String::new();
    for (symbol, code) in map.iter() {
        let _ = writeln!(out, "{}: \t{}\t-->\t{}", symbol.code(), symbol_label(symbol), code);
    }
    out
}

/// One node per line, children indented one space deeper, zero-branch first.
pub fn render_tree(tree: &HuffmanTree) -> String {
    fn walk(node: &HuffmanNode, indent: usize, out: &mut String) {
        let pad = " ".repeat(indent);
        match node {
            HuffmanNode::Leaf { symbol, count } => {
                let _ = writeln!(
                    out,
                    "{}{{{}({}), count={}}}",
                    pad,
                    symbol_label(*symbol),
                    symbol.code(),
                    count
                );
            }
            HuffmanNode::Internal { count, zero, one } => {
                let _ = writeln!(out, "{}{{N/A, count={}}}", pad, count);
                walk(zero, indent + 1, out);
                walk(one, indent + 1, out);
            }
        }
    }

    let mut out = String::new();
    walk(tree.root(), 0, &mut out);
    out
}

/// Bits MSB-first, a space after every byte and a newline after every 8 bytes.
pub fn render_binary(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() * 9 + bytes.len() / 8 + 1);
    for (i, byte) in bytes.iter().enumerate() {
        let _ = write!(out, "{:08b} ", byte);
        if (i + 1) % 8 == 0 {
            out.push('\n');
        }
    }
    if !out.ends_with('\n') {
        out.push('\n');
    }
    out
}

pub fn render_text(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}
