const DEFAULT_CHUNK: usize = 128;

/// Append-only byte buffer backed by fixed-size chunks.
///
/// Appending never re-copies previously written bytes; the single copy into
/// one contiguous allocation happens in [`Buffer::into_vec`].
#[derive(Debug)]
pub struct Buffer {
    chunk: usize,
    sealed: Vec<Vec<u8>>,
    head: Vec<u8>,
    len: usize,
}

impl Default for Buffer {
    fn default() -> Self {
        Self::new()
    }
}

impl Buffer {
    pub fn new() -> Self {
        Self::with_chunk_size(DEFAULT_CHUNK)
    }

    pub fn with_chunk_size(chunk: usize) -> Self {
        Self {
            chunk: chunk.max(1),
            sealed: Vec::new(),
            head: Vec::with_capacity(chunk.max(1)),
            len: 0,
        }
    }

    pub fn push(&mut self, mut data: &[u8]) {
        self.len += data.len();
        while !data.is_empty() {
            let space = self.chunk - self.head.len();
            let take = space.min(data.len());
            self.head.extend_from_slice(&data[..take]);
            data = &data[take..];
            if self.head.len() == self.chunk {
                let full = core::mem::replace(&mut self.head, Vec::with_capacity(self.chunk));
                self.sealed.push(full);
            }
        }
    }

    pub fn push_byte(&mut self, byte: u8) {
        self.push(&[byte]);
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn clear(&mut self) {
        self.sealed.clear();
        self.head.clear();
        self.len = 0;
    }

    /// Materialize into a single contiguous buffer.
    pub fn into_vec(self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.len);
        for chunk in &self.sealed {
            out.extend_from_slice(chunk);
        }
        out.extend_from_slice(&self.head);
        out
    }
}
