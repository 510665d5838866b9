//! Growable output buffer.
use bytes::{BufMut, BytesMut};

/// Append only bytes with the ability to back-patch written bytes.
///
/// Appending is provided by [`BufMut`].
pub trait WriteBuffer: BufMut {
    /// Number of bytes written.
    fn len(&self) -> usize;

    /// Grow by `additional` zeroed bytes, returns the offset of the new bytes.
    fn grow(&mut self, additional: usize) -> usize;

    /// Overwrite previously written bytes at `offset`.
    ///
    /// # Panics
    ///
    /// Panics if `offset + bytes.len()` is greater than [`WriteBuffer::len`].
    fn patch(&mut self, offset: usize, bytes: &[u8]);

    /// Discard bytes written after `len`.
    fn truncate(&mut self, len: usize);
}

impl WriteBuffer for Vec<u8> {
    fn len(&self) -> usize {
        Vec::len(self)
    }

    fn grow(&mut self, additional: usize) -> usize {
        let offset = Vec::len(self);
        self.resize(offset + additional, 0);
        offset
    }

    fn patch(&mut self, offset: usize, bytes: &[u8]) {
        self[offset..offset + bytes.len()].copy_from_slice(bytes);
    }

    fn truncate(&mut self, len: usize) {
        Vec::truncate(self, len);
    }
}

impl WriteBuffer for BytesMut {
    fn len(&self) -> usize {
        BytesMut::len(self)
    }

    fn grow(&mut self, additional: usize) -> usize {
        let offset = BytesMut::len(self);
        self.resize(offset + additional, 0);
        offset
    }

    fn patch(&mut self, offset: usize, bytes: &[u8]) {
        self[offset..offset + bytes.len()].copy_from_slice(bytes);
    }

    fn truncate(&mut self, len: usize) {
        BytesMut::truncate(self, len);
    }
}

impl<B: WriteBuffer + ?Sized> WriteBuffer for &mut B {
    fn len(&self) -> usize {
        (**self).len()
    }

    fn grow(&mut self, additional: usize) -> usize {
        (**self).grow(additional)
    }

    fn patch(&mut self, offset: usize, bytes: &[u8]) {
        (**self).patch(offset, bytes);
    }

    fn truncate(&mut self, len: usize) {
        (**self).truncate(len);
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn reserve_then_patch<B: WriteBuffer>(mut buf: B) -> B {
        buf.put_u8(9);
        let offset = buf.grow(4);
        assert_eq!(offset, 1);
        buf.put_slice(b"abc");
        buf.patch(offset, &3i32.to_be_bytes());
        buf
    }

    #[test]
    fn vec_back_patch() {
        let buf = reserve_then_patch(Vec::new());
        assert_eq!(buf, [9, 0, 0, 0, 3, b'a', b'b', b'c']);
    }

    #[test]
    fn bytes_back_patch() {
        let mut buf = reserve_then_patch(BytesMut::new());
        assert_eq!(&buf[..], [9, 0, 0, 0, 3, b'a', b'b', b'c']);
        WriteBuffer::truncate(&mut buf, 1);
        assert_eq!(&buf[..], [9]);
    }
}
