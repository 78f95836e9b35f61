//! Blob object
//!
//! Blobs store file content. They contain only the raw bytes, without the
//! file name (that lives in the commit snapshot).
//!
//! ## Format
//!
//! On disk: `blob <size>\0<content>`

use crate::artifacts::objects::object::{Object, Packable, Unpackable, wrap_envelope};
use crate::artifacts::objects::object_type::ObjectType;
use bytes::Bytes;
use derive_new::new;
use std::io::{BufRead, Read};

/// Blob object representing file content
///
/// Each unique file content is stored once, identified by its SHA-1 hash.
#[derive(Debug, Clone, PartialEq, Eq, new)]
pub struct Blob {
    content: Bytes,
}

impl Blob {
    pub fn content(&self) -> &Bytes {
        &self.content
    }

    pub fn into_content(self) -> Bytes {
        self.content
    }
}

impl Packable for Blob {
    fn serialize(&self) -> anyhow::Result<Bytes> {
        wrap_envelope(self.object_type(), &self.content)
    }
}

impl Unpackable for Blob {
    fn deserialize(reader: impl BufRead) -> anyhow::Result<Self> {
        // the header has already been read
        let content = reader
            .bytes()
            .collect::<Result<Vec<u8>, std::io::Error>>()?;

        Ok(Self::new(content.into()))
    }
}

impl Object for Blob {
    fn object_type(&self) -> ObjectType {
        ObjectType::Blob
    }

    fn display(&self) -> String {
        String::from_utf8_lossy(&self.content).into_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn identical_content_shares_an_id() {
        let first = Blob::new(Bytes::from_static(b"hello\n"));
        let second = Blob::new(Bytes::from(b"hello\n".to_vec()));

        assert_eq!(first.object_id().unwrap(), second.object_id().unwrap());
        assert_ne!(
            first.object_id().unwrap(),
            Blob::new(Bytes::from_static(b"hello")).object_id().unwrap()
        );
    }

    #[test]
    fn keeps_binary_content_intact() {
        let blob = Blob::new(Bytes::from_static(&[0, 159, 146, 150, 10]));
        let serialized = blob.serialize().unwrap();

        let mut reader = Cursor::new(serialized.to_vec());
        ObjectType::parse_object_type(&mut reader).unwrap();

        assert_eq!(Blob::deserialize(reader).unwrap(), blob);
    }
}
