use crate::Fingerprint;
use sha2::Digest;

/// Fingerprint the exact byte sequence of a document.  Any byte-level change, including
/// changes to non-semantic PDF metadata, produces a different fingerprint.
pub fn fingerprint_bytes(bytes: &[u8]) -> Fingerprint {
    let digest = sha2::Sha256::digest(bytes);
    Fingerprint::from_bytes(digest.into())
}

/// Streaming form of fingerprint_bytes.  I/O errors from the reader are returned as-is.
pub fn fingerprint_reader<R: std::io::Read>(mut reader: R) -> std::io::Result<Fingerprint> {
    let mut hasher = sha2::Sha256::new();
    let mut buffer = vec![0u8; 64 * 1024];
    loop {
        let n = match reader.read(&mut buffer) {
            Ok(0) => break,
            Ok(n) => n,
            Err(err) if err.kind() == std::io::ErrorKind::Interrupted => continue,
            Err(err) => return Err(err),
        };
        hasher.update(&buffer[..n]);
    }
    Ok(Fingerprint::from_bytes(hasher.finalize().into()))
}
