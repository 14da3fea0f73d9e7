use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::error::Result;

/// Splits already-tokenized text on whitespace.
///
/// Tokens are kept verbatim: no case folding, no punctuation splitting.
pub fn tokenize(text: &str) -> Vec<String> {
	text.split_whitespace().map(str::to_owned).collect()
}

/// Reads a corpus file and returns its whitespace-separated tokens.
///
/// - Reads the entire file into memory
/// - Line breaks are treated like any other whitespace
///
/// # Errors
/// Returns `MtgError::Io` if the file cannot be opened or is not UTF-8.
pub fn read_corpus<P: AsRef<Path>>(filename: P) -> Result<Vec<String>> {
	let mut contents = String::new();
	File::open(filename)?.read_to_string(&mut contents)?;
	Ok(tokenize(&contents))
}
