use std::io::{self, Read};

/// Reads a bearer token, dropping the trailing newline token files usually carry.
pub fn read_token<R: Read>(reader: &mut R) -> Result<String, io::Error> {
    let mut buf = String::new();
    reader.read_to_string(&mut buf)?;
    Ok(buf.trim().to_string())
}
