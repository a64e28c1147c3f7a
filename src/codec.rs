//! Encode and decode pipelines.
//!
//! Encoding walks COUNT_FREQ -> BUILD_TREE -> GEN_CODES -> WRITE_HEADER ->
//! WRITE_BODY -> CLOSE, skipping the body when the source is empty or holds a
//! single distinct byte. Decoding reads the header, picks one of the three
//! payload cases, and for a coded body matches bits against the code table
//! until the end-of-data code comes up.

use std::fs::{self, File};
use std::io::{self, BufRead, BufReader, BufWriter, Cursor, Read, Seek, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, trace, warn};

use crate::bit_stream::{BitSink, BitSource, CodeSink, TextSink};
use crate::code_table::{Code, CodeTable};
use crate::error::{HuffError, Result};
use crate::freq::{FrequencyTable, SENTINEL};
use crate::header::{Header, Payload};

const TEMP_EXT: &str = "tmp";
const IO_CHUNK: usize = 8 * 1024;

/// Sizes observed by one encode or decode call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Summary {
    pub input_bytes: u64,
    pub output_bytes: u64,
    pub distinct_symbols: usize,
}

/// Encodes `source` into `output`. The source is read twice, so it must be
/// seekable.
pub fn encode<R, W>(source: &mut R, output: W) -> Result<Summary>
where
    R: Read + Seek,
    W: Write,
{
    let mut sink = BitSink::new(output);
    let (input_bytes, distinct_symbols) = encode_into(source, &mut sink)?;
    let output_bytes = sink.bytes_written();
    sink.finish()?;
    Ok(Summary {
        input_bytes,
        output_bytes,
        distinct_symbols,
    })
}

/// Like [`encode`], also writing the '0'/'1' text rendition to `text`.
pub fn encode_with_text<R, W, T>(source: &mut R, output: W, text: T) -> Result<Summary>
where
    R: Read + Seek,
    W: Write,
    T: Write,
{
    let mut sinks = (BitSink::new(output), TextSink::new(text));
    let (input_bytes, distinct_symbols) = encode_into(source, &mut sinks)?;
    let (bits, text) = sinks;
    let output_bytes = bits.bytes_written();
    text.finish()?;
    bits.finish()?;
    Ok(Summary {
        input_bytes,
        output_bytes,
        distinct_symbols,
    })
}

fn encode_into<R, S>(source: &mut R, sink: &mut S) -> Result<(u64, usize)>
where
    R: Read + Seek,
    S: CodeSink,
{
    debug!("counting frequencies");
    let counted = FrequencyTable::from_reader(source)?;
    let input_bytes = counted.total();
    let distinct = counted.distinct();
    let header = Header::new(counted.with_sentinel());

    let payload = header.payload();
    let codes = match &payload {
        Payload::Coded(table) => {
            debug!(distinct, "building code tree");
            let codes = CodeTable::from_frequencies(table)?;
            for (byte, code) in codes.iter() {
                trace!(byte, %code, "assigned code");
            }
            Some(codes)
        }
        Payload::Empty | Payload::Repeated { .. } => None,
    };

    debug!(fields = header.field_count(), "writing header");
    sink.write_header(&header.to_line())?;

    if let Some(codes) = codes {
        debug!("writing body");
        source.rewind()?;
        write_body(source, &codes, input_bytes, sink)?;
    } else {
        debug!(?payload, "no body to write");
    }
    Ok((input_bytes, distinct))
}

fn write_body<R, S>(source: &mut R, codes: &CodeTable, expected: u64, sink: &mut S) -> Result<()>
where
    R: Read,
    S: CodeSink,
{
    let mut buf = [0u8; IO_CHUNK];
    let mut seen = 0u64;
    loop {
        let n = match source.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        };
        for &byte in &buf[..n] {
            let code = codes.get(byte).ok_or(HuffError::SourceChanged)?;
            sink.write_code(code)?;
        }
        seen += n as u64;
    }
    if seen != expected {
        return Err(HuffError::SourceChanged);
    }

    let end = codes.get(SENTINEL).ok_or(HuffError::MissingEndCode)?;
    sink.write_code(end)?;
    Ok(())
}

/// Decodes an artifact produced by [`encode`] from `source` into `output`.
pub fn decode<R, W>(source: &mut R, output: &mut W) -> Result<Summary>
where
    R: BufRead,
    W: Write,
{
    debug!("reading header");
    let header = Header::read_from(source)?;
    let header_len = if header == Header::default() {
        0
    } else {
        header.to_line().len() as u64
    };
    let mut summary = Summary {
        input_bytes: header_len,
        output_bytes: 0,
        distinct_symbols: header
            .table()
            .without_sentinel()
            .map_or(0, |real| real.distinct()),
    };

    match header.payload() {
        Payload::Empty => {
            debug!("empty source");
        }
        Payload::Repeated { byte, count } => {
            debug!(byte, count, "single repeated byte");
            write_repeated(output, byte, count)?;
            summary.output_bytes = count;
        }
        Payload::Coded(table) => {
            debug!("rebuilding code tree");
            let codes = CodeTable::from_frequencies(&table)?;
            let mut bits = BitSource::new(CountingReader::new(&mut *source));
            summary.output_bytes = decode_body(&mut bits, &codes, &table, output)?;
            summary.input_bytes += bits.into_inner().count;
        }
    }
    output.flush()?;
    Ok(summary)
}

fn write_repeated<W: Write>(output: &mut W, byte: u8, count: u64) -> Result<()> {
    let chunk = [byte; IO_CHUNK];
    let mut left = count;
    while left > 0 {
        let n = left.min(IO_CHUNK as u64) as usize;
        output.write_all(&chunk[..n])?;
        left -= n as u64;
    }
    Ok(())
}

fn decode_body<R, W>(
    bits: &mut BitSource<R>,
    codes: &CodeTable,
    table: &FrequencyTable,
    output: &mut W,
) -> Result<u64>
where
    R: Read,
    W: Write,
{
    // every occurrence of byte 0 but the last is real data
    let mut real_zeros = table.get(SENTINEL).saturating_sub(1);
    let expected = table.total().saturating_sub(1);
    let mut written = 0u64;
    let mut candidate = Code::new();

    loop {
        let bit = bits.read_bit()?.ok_or(HuffError::TruncatedStream)?;
        candidate.push(bit);
        let Some(byte) = codes.symbol(&candidate) else {
            continue;
        };
        candidate.clear();

        if byte == SENTINEL {
            if real_zeros == 0 {
                break;
            }
            real_zeros -= 1;
        }
        output.write_all(&[byte])?;
        written += 1;
        if written > expected {
            return Err(HuffError::LengthMismatch {
                expected,
                actual: written,
            });
        }
    }

    if written != expected {
        return Err(HuffError::LengthMismatch {
            expected,
            actual: written,
        });
    }
    Ok(written)
}

/// Tracks how many body bytes the bit reader pulled.
struct CountingReader<R> {
    inner: R,
    count: u64,
}

impl<R> CountingReader<R> {
    fn new(inner: R) -> Self {
        CountingReader { inner, count: 0 }
    }
}

impl<R: Read> Read for CountingReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.inner.read(buf)?;
        self.count += n as u64;
        Ok(n)
    }
}

pub fn encode_bytes(data: &[u8]) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    encode(&mut Cursor::new(data), &mut out)?;
    Ok(out)
}

pub fn decode_bytes(data: &[u8]) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    decode(&mut Cursor::new(data), &mut out)?;
    Ok(out)
}

/// Encodes the file at `input` into `output`, and the text rendition into
/// `text` when given. Outputs appear only if encoding succeeds.
pub fn encode_file(input: &Path, output: &Path, text: Option<&Path>) -> Result<Summary> {
    let mut source = BufReader::new(open_source(input)?);
    let mut out = Staged::create(output)?;

    let Some(text) = text else {
        let summary = encode(&mut source, out.writer())?;
        out.sync()?;
        out.commit()?;
        return Ok(summary);
    };

    let mut txt = Staged::create(text)?;
    let summary = encode_with_text(&mut source, out.writer(), txt.writer())?;
    out.sync()?;
    txt.sync()?;

    txt.commit()?;
    if let Err(e) = out.commit() {
        // take the rendition back out so neither output is left behind
        if let Err(rm) = fs::remove_file(text) {
            warn!(path = %text.display(), error = %rm, "could not remove text rendition");
        }
        return Err(e);
    }
    Ok(summary)
}

pub fn decode_file(input: &Path, output: &Path) -> Result<Summary> {
    let mut source = BufReader::new(open_source(input)?);
    let mut out = Staged::create(output)?;
    let summary = decode(&mut source, out.writer())?;
    out.sync()?;
    out.commit()?;
    Ok(summary)
}

/// The header and code table `encode_file` would use for `input`. The code
/// table is empty when the source needs no body.
pub fn inspect_file(input: &Path) -> Result<(Header, CodeTable)> {
    let mut source = BufReader::new(open_source(input)?);
    let header = Header::new(FrequencyTable::from_reader(&mut source)?.with_sentinel());
    let codes = match header.payload() {
        Payload::Coded(table) => CodeTable::from_frequencies(&table)?,
        Payload::Empty | Payload::Repeated { .. } => CodeTable::default(),
    };
    Ok((header, codes))
}

fn open_source(path: &Path) -> Result<File> {
    File::open(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => HuffError::SourceNotFound(path.to_path_buf()),
        _ => HuffError::Io(e),
    })
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".");
    name.push(TEMP_EXT);
    PathBuf::from(name)
}

/// An output written to a temp file next to its destination. It is renamed
/// into place by `commit`; dropping it uncommitted removes the temp file.
struct Staged {
    temp: PathBuf,
    dest: PathBuf,
    out: BufWriter<File>,
    committed: bool,
}

impl Staged {
    fn create(dest: &Path) -> Result<Self> {
        let temp = temp_path(dest);
        let file = File::create(&temp)?;
        Ok(Staged {
            temp,
            dest: dest.to_path_buf(),
            out: BufWriter::new(file),
            committed: false,
        })
    }

    fn writer(&mut self) -> &mut BufWriter<File> {
        &mut self.out
    }

    fn sync(&mut self) -> Result<()> {
        self.out.flush()?;
        self.out.get_ref().sync_all()?;
        Ok(())
    }

    fn commit(&mut self) -> Result<()> {
        fs::rename(&self.temp, &self.dest)?;
        self.committed = true;
        Ok(())
    }
}

impl Drop for Staged {
    fn drop(&mut self) {
        if self.committed {
            return;
        }
        if let Err(e) = fs::remove_file(&self.temp) {
            if e.kind() != io::ErrorKind::NotFound {
                warn!(path = %self.temp.display(), error = %e, "could not remove temp file");
            }
        }
    }
}
