use flate2::write::GzEncoder;
use flate2::Compression;
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Write};
use std::path::Path;
use tracing::debug;

/// Gzip `src` into `dst` at the default compression level, returning the
/// number of uncompressed bytes consumed.
pub fn gzip_file(src: &Path, dst: &Path) -> io::Result<u64> {
    let mut reader = BufReader::new(File::open(src)?);
    let writer = BufWriter::new(File::create(dst)?);
    let mut encoder = GzEncoder::new(writer, Compression::default());
    let consumed = io::copy(&mut reader, &mut encoder)?;
    let mut writer = encoder.finish()?;
    writer.flush()?;
    debug!(
        src = %src.display(),
        dst = %dst.display(),
        consumed,
        "Compressed artifact"
    );
    Ok(consumed)
}
