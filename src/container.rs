//! Self-describing container: `<escaped header><LF><bit-packed payload>`.
//!
//! The header lists every `symbol:code` pair joined by a caller-chosen
//! separator, which is enough to rebuild the tree on the decoding side. The
//! payload ends with the code of the NUL marker followed by zero padding.

use std::collections::HashSet;
use std::fmt;
use std::io::{BufRead, Write};
use std::str::FromStr;

use log::{debug, info, trace};

use crate::bits::{BitReader, BitWriter};
use crate::codes::CodeTable;
use crate::error::{HuffmanError, Result};
use crate::tree::CodeTree;
use crate::{SENTINEL, Symbol};

pub const HEADER_TERMINATOR: u8 = b'\n';

const DEFAULT_SEPARATOR: &str = ";";
const SEPARATOR_ESCAPE: &str = "\\SEP";
const FIXED_ESCAPES: [(Symbol, &str); 5] = [
    ('\n', "\\n"),
    ('\r', "\\r"),
    ('\t', "\\t"),
    ('\\', "\\\\"),
    ('\0', "\\0"),
];

/// String placed between header entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Separator(String);

impl Separator {
    /// Accepts any separator the header parser can split on unambiguously.
    pub fn new(separator: impl Into<String>) -> Result<Self> {
        let separator = separator.into();
        let reject = |reason: &str| HuffmanError::InvalidSeparator {
            separator: separator.clone(),
            reason: reason.to_string(),
        };

        if separator.is_empty() {
            return Err(reject("separator is empty"));
        }
        if let Some(c) = separator
            .chars()
            .find(|&c| matches!(c, '\n' | ':' | '\\' | '0' | '1'))
        {
            return Err(reject(&format!(
                "{c:?} is reserved by the header syntax"
            )));
        }
        if FIXED_ESCAPES
            .iter()
            .map(|(_, token)| *token)
            .chain([SEPARATOR_ESCAPE])
            .any(|token| token.contains(separator.as_str()))
        {
            return Err(reject("separator occurs inside an escape sequence"));
        }

        Ok(Separator(separator))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn first_char(&self) -> Symbol {
        // Non-empty by construction.
        self.0.chars().next().unwrap_or(';')
    }
}

impl Default for Separator {
    fn default() -> Self {
        Separator(DEFAULT_SEPARATOR.to_string())
    }
}

impl FromStr for Separator {
    type Err = HuffmanError;

    fn from_str(s: &str) -> Result<Self> {
        Separator::new(s)
    }
}

impl fmt::Display for Separator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

pub fn escape_symbol(symbol: Symbol, separator: &Separator) -> String {
    if let Some((_, token)) = FIXED_ESCAPES.iter().find(|(s, _)| *s == symbol) {
        return (*token).to_string();
    }

    let mut buf = [0u8; 4];
    let text = symbol.encode_utf8(&mut buf);
    if text == separator.as_str() {
        return SEPARATOR_ESCAPE.to_string();
    }
    text.to_string()
}

pub fn unescape_symbol(text: &str, separator: &Separator) -> Result<Symbol> {
    if let Some((symbol, _)) = FIXED_ESCAPES.iter().find(|(_, token)| *token == text) {
        return Ok(*symbol);
    }
    if text == SEPARATOR_ESCAPE {
        return Ok(separator.first_char());
    }

    let mut chars = text.chars();
    match (chars.next(), chars.next()) {
        (Some('\\'), _) => Err(HuffmanError::header(text, "unknown escape sequence")),
        (Some(symbol), None) => Ok(symbol),
        (None, _) => Err(HuffmanError::header(text, "empty symbol")),
        (Some(_), Some(_)) => Err(HuffmanError::header(
            text,
            "symbol is longer than one character",
        )),
    }
}

/// Renders the code table as `escaped:code` entries joined by `separator`.
pub fn generate_header(table: &CodeTable, separator: &Separator) -> String {
    table
        .iter()
        .map(|(symbol, code)| format!("{}:{}", escape_symbol(symbol, separator), code))
        .collect::<Vec<_>>()
        .join(separator.as_str())
}

/// Rebuilds the coding tree from header text.
///
/// Tokens are split on the separator (empty ones are skipped), then on their
/// last colon.
pub fn parse_header(header: &str, separator: &Separator) -> Result<CodeTree> {
    let mut tree = CodeTree::empty();
    let mut seen = HashSet::new();

    for token in header.split(separator.as_str()).filter(|t| !t.is_empty()) {
        let (escaped, code) = token
            .rsplit_once(':')
            .ok_or_else(|| HuffmanError::header(token, "missing ':' between symbol and code"))?;

        let symbol = unescape_symbol(escaped, separator).map_err(|e| match e {
            HuffmanError::HeaderParse { reason, .. } => HuffmanError::header(token, reason),
            other => other,
        })?;
        if !seen.insert(symbol) {
            return Err(HuffmanError::header(token, "symbol listed twice"));
        }

        tree.insert_path(symbol, code)?;
    }

    if seen.is_empty() {
        return Err(HuffmanError::header(header, "header has no entries"));
    }

    debug!("Rebuilt tree for {} symbols from header", seen.len());
    Ok(tree)
}

/// Writes the container for `text` into `out` and returns the sink.
///
/// The NUL marker is appended to the text before the tree is built, so the
/// input itself must not contain one.
pub fn write_container<W: Write>(text: &str, separator: &Separator, mut out: W) -> Result<W> {
    if let Some(position) = text.find(SENTINEL) {
        return Err(HuffmanError::SentinelInInput { position });
    }

    let mut content = String::with_capacity(text.len() + 1);
    content.push_str(text);
    content.push(SENTINEL);

    let tree = CodeTree::build(&content)?;
    let table = CodeTable::generate(&tree);
    let header = generate_header(&table, separator);
    debug!("Header generated: {} bytes", header.len());
    trace!("Header: {:?}", header);

    out.write_all(header.as_bytes())?;
    out.write_all(&[HEADER_TERMINATOR])?;

    let bits = table.encode(&content)?;
    let mut writer = BitWriter::new(out);
    writer.write_code(&bits)?;
    info!(
        "Encoded {} symbols into {} payload bits",
        content.chars().count(),
        writer.bits_written()
    );

    writer.finish()
}

/// Reads a container, stopping at the NUL marker. Padding after the marker
/// is never looked at.
pub fn read_container<R: BufRead>(mut input: R, separator: &Separator) -> Result<String> {
    let mut header = Vec::new();
    input.read_until(HEADER_TERMINATOR, &mut header)?;
    if header.pop() != Some(HEADER_TERMINATOR) {
        return Err(HuffmanError::header(
            String::from_utf8_lossy(&header),
            "header is not terminated by a line feed",
        ));
    }
    let header = String::from_utf8(header).map_err(|e| {
        HuffmanError::header(
            String::from_utf8_lossy(e.as_bytes()),
            "header is not valid UTF-8",
        )
    })?;
    debug!("Read header: {} bytes", header.len());

    let tree = parse_header(&header, separator)?;
    let has_marker = tree
        .leaves()
        .into_iter()
        .any(|(id, _)| tree.node(id).symbol == Some(SENTINEL));
    if !has_marker {
        return Err(HuffmanError::header(header, "no end-of-message marker"));
    }

    let root = tree.root();
    if tree.node(root).is_leaf() {
        // Only the marker is present: the text was empty.
        return Ok(String::new());
    }

    let mut reader = BitReader::new(input);
    let mut decoded = String::new();
    let mut current = root;
    loop {
        let bit = reader.read_bit()?.ok_or_else(|| {
            HuffmanError::CorruptPayload(
                "payload ended before the end-of-message marker".to_string(),
            )
        })?;
        current = tree.step(current, bit)?;

        let node = tree.node(current);
        if !node.is_leaf() {
            continue;
        }
        match node.symbol {
            Some(SENTINEL) => break,
            Some(symbol) => {
                decoded.push(symbol);
                current = root;
            }
            None => {
                return Err(HuffmanError::CorruptPayload(format!(
                    "leaf {current} carries no symbol"
                )));
            }
        }
    }

    info!("Decoded {} symbols", decoded.chars().count());
    Ok(decoded)
}

pub fn compress(text: &str, separator: &Separator) -> Result<Vec<u8>> {
    write_container(text, separator, Vec::new())
}

pub fn decompress(data: &[u8], separator: &Separator) -> Result<String> {
    read_container(data, separator)
}
