//! Packet buffer implementation
//!
//! Provides a byte buffer with the client's wire encodings:
//! - Little-endian integers and floats
//! - String16L (16-bit length prefix, single-byte code page, padded to 4 bytes)
//! - Packed dwords (2 or 4 bytes depending on magnitude)
//! - Alignment padding to 4-byte boundaries

use bytes::{BufMut, Bytes, BytesMut};

/// Maximum string length a String16L can carry
pub const MAX_STRING16L_LEN: usize = u16::MAX as usize;

/// Largest value a packed dword writes as a single word
pub const PACKED_DWORD_SHORT_MAX: u32 = 0x7FFF;

/// Packet buffer for reading and writing game message payloads
#[derive(Debug, Clone)]
pub struct PacketBuffer {
    /// Internal byte buffer
    data: BytesMut,
    /// Current read position
    read_pos: usize,
}

impl PacketBuffer {
    /// Create a new empty packet buffer
    pub fn new() -> Self {
        Self {
            data: BytesMut::new(),
            read_pos: 0,
        }
    }

    /// Create a packet buffer with a specific capacity
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            data: BytesMut::with_capacity(capacity),
            read_pos: 0,
        }
    }

    /// Create a packet buffer from existing bytes
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self {
            data: BytesMut::from(bytes),
            read_pos: 0,
        }
    }

    // ============ Properties ============

    /// Get the current read position
    #[inline]
    pub fn read_position(&self) -> usize {
        self.read_pos
    }

    /// Set the read position
    #[inline]
    pub fn set_read_position(&mut self, pos: usize) {
        self.read_pos = pos.min(self.data.len());
    }

    /// Get the total length of the buffer
    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Check if the buffer is empty
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Get the number of bytes remaining to read
    #[inline]
    pub fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.read_pos)
    }

    /// Check if there are bytes remaining to read
    #[inline]
    pub fn has_remaining(&self) -> bool {
        self.remaining() > 0
    }

    /// Get a reference to the underlying bytes
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Freeze the written bytes into an immutable payload
    #[inline]
    pub fn freeze(self) -> Bytes {
        self.data.freeze()
    }

    /// Clear the buffer and reset the read position
    pub fn clear(&mut self) {
        self.data.clear();
        self.read_pos = 0;
    }

    /// Reset read position to start
    pub fn reset(&mut self) {
        self.read_pos = 0;
    }

    /// Skip a number of bytes when reading
    pub fn skip(&mut self, count: usize) {
        self.read_pos = (self.read_pos + count).min(self.data.len());
    }

    // ============ Reading Methods ============

    /// Read an unsigned byte (0 past the end)
    pub fn read_u8(&mut self) -> u8 {
        if self.read_pos >= self.data.len() {
            return 0;
        }
        let value = self.data[self.read_pos];
        self.read_pos += 1;
        value
    }

    /// Read a little-endian u16
    pub fn read_u16(&mut self) -> u16 {
        let b1 = self.read_u8() as u16;
        let b2 = self.read_u8() as u16;
        (b2 << 8) | b1
    }

    /// Read a little-endian u32
    pub fn read_u32(&mut self) -> u32 {
        let low = self.read_u16() as u32;
        let high = self.read_u16() as u32;
        (high << 16) | low
    }

    /// Read a little-endian f32
    pub fn read_f32(&mut self) -> f32 {
        f32::from_bits(self.read_u32())
    }

    /// Read a packed dword (continuation bit lives in the first word)
    pub fn read_packed_dword(&mut self) -> u32 {
        let first = self.read_u16() as u32;
        if first & 0x8000 == 0 {
            return first;
        }
        let second = self.read_u16() as u32;
        ((first & 0x7FFF) << 16) | second
    }

    /// Read a packed dword and restore its known type prefix
    pub fn read_packed_dword_of_known_type(&mut self, known_type: u32) -> u32 {
        self.read_packed_dword() | known_type
    }

    /// Read a String16L, consuming its alignment padding
    pub fn read_string16l(&mut self) -> String {
        let len = self.read_u16() as usize;
        let bytes = self.read_bytes(len);
        self.skip(string16l_padding(len));
        bytes.into_iter().map(char::from).collect()
    }

    /// Read a specific number of bytes
    pub fn read_bytes(&mut self, length: usize) -> Vec<u8> {
        let end = (self.read_pos + length).min(self.data.len());
        let bytes = self.data[self.read_pos..end].to_vec();
        self.read_pos = end;
        bytes
    }

    // ============ Writing Methods ============

    /// Write an unsigned byte
    pub fn write_u8(&mut self, value: u8) {
        self.data.put_u8(value);
    }

    /// Write a little-endian u16
    pub fn write_u16(&mut self, value: u16) {
        self.data.put_u16_le(value);
    }

    /// Write a little-endian u32
    pub fn write_u32(&mut self, value: u32) {
        self.data.put_u32_le(value);
    }

    /// Write a little-endian f32
    pub fn write_f32(&mut self, value: f32) {
        self.data.put_f32_le(value);
    }

    /// Write a packed dword
    ///
    /// Values up to `0x7FFF` take one word. Larger values are written as two
    /// words, high word first with bit 15 set, so a reader can tell them apart
    /// from the first word alone.
    pub fn write_packed_dword(&mut self, value: u32) {
        if value <= PACKED_DWORD_SHORT_MAX {
            self.write_u16(value as u16);
        } else {
            self.write_u32((value << 16) | ((value >> 16) | 0x8000));
        }
    }

    /// Write a packed dword with its known type prefix stripped
    ///
    /// The prefix is subtracted whenever any of its bits are present. A value
    /// carrying only part of the prefix wraps, as the client expects.
    pub fn write_packed_dword_of_known_type(&mut self, value: u32, known_type: u32) {
        let value = if value & known_type != 0 {
            value.wrapping_sub(known_type)
        } else {
            value
        };
        self.write_packed_dword(value);
    }

    /// Write a String16L
    ///
    /// Characters outside the single-byte code page are written as `?`.
    /// Strings longer than [`MAX_STRING16L_LEN`] bytes are truncated.
    pub fn write_string16l(&mut self, value: &str) {
        let mut bytes = encode_single_byte(value);
        bytes.truncate(MAX_STRING16L_LEN);
        self.write_u16(bytes.len() as u16);
        self.data.extend_from_slice(&bytes);
        self.pad(string16l_padding(bytes.len()));
    }

    /// Write raw bytes
    pub fn write_bytes(&mut self, bytes: &[u8]) {
        self.data.extend_from_slice(bytes);
    }

    /// Write `count` zero bytes
    pub fn pad(&mut self, count: usize) {
        self.data.put_bytes(0, count);
    }

    /// Pad with zero bytes up to the next 4-byte boundary
    pub fn align(&mut self) {
        self.pad(align_padding(self.data.len()));
    }
}

/// Zero bytes needed to bring `len` up to a multiple of 4
#[inline]
pub fn align_padding(len: usize) -> usize {
    (4 - len % 4) % 4
}

/// Padding after a String16L body of `len` bytes (the prefix counts too)
#[inline]
pub fn string16l_padding(len: usize) -> usize {
    align_padding(2 + len)
}

/// Total wire size of a String16L carrying `value`
pub fn string16l_size(value: &str) -> usize {
    let len = value.chars().count().min(MAX_STRING16L_LEN);
    2 + len + string16l_padding(len)
}

/// Map a string onto the client's single-byte code page
fn encode_single_byte(value: &str) -> Vec<u8> {
    value
        .chars()
        .map(|c| u8::try_from(u32::from(c)).unwrap_or(b'?'))
        .collect()
}

impl Default for PacketBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl From<&[u8]> for PacketBuffer {
    fn from(slice: &[u8]) -> Self {
        Self::from_bytes(slice)
    }
}

impl AsRef<[u8]> for PacketBuffer {
    fn as_ref(&self) -> &[u8] {
        &self.data
    }
}
