use std::io::{BufWriter, Write};

use miette::{IntoDiagnostic, Result, WrapErr};

/// Write the assembled bytes as one decimal value per line, in emission order.
pub fn write_bytes(bytes: &[u8], dest: impl Write) -> Result<()> {
    let mut dest = BufWriter::new(dest);
    for byte in bytes {
        writeln!(dest, "{byte}")
            .into_diagnostic()
            .wrap_err("Failed to write output")?;
    }
    dest.flush().into_diagnostic().wrap_err("Failed to write output")
}
