//! Name-index match patterns: `*` matches any run, `?` one character, everything else is
//! literal.

use regex::Regex;

use crate::{Error, Result};

pub fn compile(pattern: &str) -> Result<Regex> {
	let mut source = String::with_capacity(pattern.len() + 8);

	source.push_str("(?s)^");

	for ch in pattern.chars() {
		match ch {
			'*' => source.push_str(".*"),
			'?' => source.push('.'),
			_ => source.push_str(&regex::escape(ch.encode_utf8(&mut [0; 4]))),
		}
	}

	source.push('$');

	Regex::new(&source)
		.map_err(|err| Error::InvalidArgument(format!("Invalid match pattern {pattern:?}: {err}.")))
}
