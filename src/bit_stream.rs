use std::io::{self, Read, Write};

use bitstream_io::{BigEndian, BitRead, BitReader, BitWrite, BitWriter};

use crate::code_table::Code;

/// Destination for an encoded artifact: one header line, then codes.
pub trait CodeSink {
    fn write_header(&mut self, line: &str) -> io::Result<()>;

    fn write_code(&mut self, code: &Code) -> io::Result<()>;
}

/// Packs codes into bytes, most significant bit first.
pub struct BitSink<W: Write> {
    inner: BitWriter<W, BigEndian>,
    bits: u64,
}

impl<W: Write> BitSink<W> {
    pub fn new(writer: W) -> Self {
        BitSink {
            inner: BitWriter::endian(writer, BigEndian),
            bits: 0,
        }
    }

    pub fn write_bit(&mut self, bit: bool) -> io::Result<()> {
        self.inner.write_bit(bit)?;
        self.bits += 1;
        Ok(())
    }

    /// Bytes produced so far, counting a trailing partial byte as whole.
    pub fn bytes_written(&self) -> u64 {
        self.bits.div_ceil(8)
    }

    /// Pads the final partial byte with zero bits and hands back the writer.
    pub fn finish(mut self) -> io::Result<W> {
        self.inner.byte_align()?;
        let mut writer = self.inner.into_writer();
        writer.flush()?;
        Ok(writer)
    }
}

impl<W: Write> CodeSink for BitSink<W> {
    fn write_header(&mut self, line: &str) -> io::Result<()> {
        // the header always starts on a byte boundary
        self.inner.byte_align()?;
        self.bits = self.bits.div_ceil(8) * 8;
        self.inner.write_bytes(line.as_bytes())?;
        self.bits += 8 * line.len() as u64;
        Ok(())
    }

    fn write_code(&mut self, code: &Code) -> io::Result<()> {
        for &bit in code.bits() {
            self.write_bit(bit)?;
        }
        Ok(())
    }
}

/// Writes codes as literal '0'/'1' characters, for inspection.
pub struct TextSink<W: Write> {
    inner: W,
}

impl<W: Write> TextSink<W> {
    pub fn new(writer: W) -> Self {
        TextSink { inner: writer }
    }

    pub fn finish(mut self) -> io::Result<W> {
        self.inner.flush()?;
        Ok(self.inner)
    }
}

impl<W: Write> CodeSink for TextSink<W> {
    fn write_header(&mut self, line: &str) -> io::Result<()> {
        self.inner.write_all(line.as_bytes())
    }

    fn write_code(&mut self, code: &Code) -> io::Result<()> {
        write!(self.inner, "{code}")
    }
}

impl<A: CodeSink, B: CodeSink> CodeSink for (A, B) {
    fn write_header(&mut self, line: &str) -> io::Result<()> {
        self.0.write_header(line)?;
        self.1.write_header(line)
    }

    fn write_code(&mut self, code: &Code) -> io::Result<()> {
        self.0.write_code(code)?;
        self.1.write_code(code)
    }
}

/// Yields the bits of a byte stream one at a time, most significant first.
pub struct BitSource<R: Read> {
    inner: BitReader<R, BigEndian>,
}

impl<R: Read> BitSource<R> {
    pub fn new(reader: R) -> Self {
        BitSource {
            inner: BitReader::endian(reader, BigEndian),
        }
    }

    /// `Ok(None)` once the last available bit has been read.
    pub fn read_bit(&mut self) -> io::Result<Option<bool>> {
        match self.inner.read_bit() {
            Ok(bit) => Ok(Some(bit)),
            Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Hands back the reader; bits left in a partially read byte are dropped.
    pub fn into_inner(self) -> R {
        self.inner.into_reader()
    }
}
