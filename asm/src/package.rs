//! Serialized output: the main stream as raw bytes.

use crate::error::Error;
use arch::marker::MAGIC;
use std::fs;
use std::io::Write;
use std::path::Path;

/// Finished main stream, header included.
#[derive(Debug, Clone, PartialEq)]
pub struct Package(Vec<i64>);

impl Package {
    pub fn new(items: Vec<i64>) -> Self {
        Package(items)
    }

    pub fn items(&self) -> &[i64] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// One byte per item. Anything outside 0..=255 is an error, not truncated.
    pub fn to_bytes(&self) -> Result<Vec<u8>, Error> {
        self.0
            .iter()
            .enumerate()
            .map(|(idx, &val)| u8::try_from(val).map_err(|_| Error::SerializationRange(idx, val)))
            .collect()
    }

    /// Write to `path`. Nothing is left behind at `path` on failure.
    pub fn write(&self, path: &Path) -> Result<(), Error> {
        let bytes = self.to_bytes()?;

        let mut tmp = path.as_os_str().to_owned();
        tmp.push(".tmp");
        let tmp = Path::new(&tmp);

        let result = fs::File::create(tmp)
            .and_then(|mut file| {
                file.write_all(&bytes)?;
                file.flush()
            })
            .and_then(|_| fs::rename(tmp, path));
        if let Err(err) = result {
            let _ = fs::remove_file(tmp);
            return Err(err.into());
        }
        Ok(())
    }

    /// Load a package back, checking the header
    pub fn read(path: &Path) -> Result<Self, Error> {
        let bytes = fs::read(path)?;
        if !bytes.starts_with(&MAGIC) {
            return Err(Error::BadMagic);
        }
        Ok(Package(bytes.into_iter().map(i64::from).collect()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bytes_in_range() {
        let package = Package::new(vec![0x70, 0x6b, 0x67, 0, 255]);
        assert_eq!(package.to_bytes().unwrap(), vec![0x70, 0x6b, 0x67, 0, 255]);
    }

    #[test]
    fn first_bad_byte_is_reported() {
        let package = Package::new(vec![0x70, 0x6b, 0x67, 256, -1]);
        let err = package.to_bytes().unwrap_err();
        assert!(matches!(err, Error::SerializationRange(3, 256)));
    }
}
