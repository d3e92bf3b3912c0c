use anyhow::{Result, anyhow};
use encoding::DecoderTrap;
use encoding::label::encoding_from_whatwg_label;

/// read to end, detect the char-encoding and decode to utf-8
/// (undecodable bytes are dropped)
/// ref. https://github.com/thuleqaid/rust-chardet
pub fn encode_to_utf8<R>(input: &mut R) -> Result<String>
where
    R: std::io::Read,
{
    let mut buf: Vec<u8> = Vec::new();
    input
        .read_to_end(&mut buf)
        .map_err(|e| anyhow!("Could not read input: {}", e))?;

    encode_to_utf8_raw(&buf)
}

pub fn encode_to_utf8_raw(input: &[u8]) -> Result<String> {
    // valid utf-8 (crawler/extractor output) needs no detection
    if let Ok(text) = std::str::from_utf8(input) {
        return Ok(text.strip_prefix('\u{feff}').unwrap_or(text).to_string());
    }

    // (encoding, confidence, language)
    let result = chardet::detect(input);
    let coder = encoding_from_whatwg_label(chardet::charset2encoding(&result.0));
    if let Some(c) = coder {
        c.decode(input, DecoderTrap::Ignore)
            .map_err(|e| anyhow!("Error:{:?}", e))
    } else {
        Err(anyhow!("cannot find character encodings: {:?}", &result))
    }
}
