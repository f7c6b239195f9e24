/// Incremental UTF-8 decoder for output that arrives in arbitrary chunks.
///
/// Complete characters are released as soon as they arrive. A multi-byte
/// sequence split across two reads is held back until the rest shows up.
/// Invalid sequences become U+FFFD instead of failing the read.
#[derive(Debug, Default)]
pub struct Utf8Decoder {
    pending: Vec<u8>,
}

impl Utf8Decoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode `chunk`, returning every character that is complete so far.
    pub fn push(&mut self, chunk: &[u8]) -> String {
        self.pending.extend_from_slice(chunk);

        let mut decoded = String::with_capacity(self.pending.len());
        let mut rest: &[u8] = &self.pending;

        loop {
            match std::str::from_utf8(rest) {
                Ok(valid) => {
                    decoded.push_str(valid);
                    rest = &[];
                    break;
                }
                Err(error) => {
                    let (valid, after_valid) = rest.split_at(error.valid_up_to());
                    // `valid_up_to` marks a verified UTF-8 prefix.
                    decoded.push_str(&String::from_utf8_lossy(valid));
                    match error.error_len() {
                        Some(invalid_len) => {
                            decoded.push(char::REPLACEMENT_CHARACTER);
                            rest = after_valid.get(invalid_len..).unwrap_or_default();
                        }
                        None => {
                            // Truncated sequence at the end of the buffer.
                            rest = after_valid;
                            break;
                        }
                    }
                }
            }
        }

        self.pending = rest.to_vec();
        decoded
    }

    /// Flush whatever is still buffered, replacing an unfinished sequence.
    pub fn finish(&mut self) -> String {
        let remainder = String::from_utf8_lossy(&self.pending).into_owned();
        self.pending.clear();
        remainder
    }
}
