/// Chunk size for large uploads.
pub const CHUNK_SIZE_BYTES: usize = 5 * 1024 * 1024;

/// Files at or below this size are uploaded as a single chunk.
pub const SINGLE_UPLOAD_LIMIT_BYTES: usize = 10 * 1024 * 1024;

/// A contiguous byte range of the source file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkSpec {
    pub index: u32,
    pub offset: usize,
    pub len: usize,
}

/// Split a file into upload chunks. Small files stay whole; larger files are
/// cut into exact 5 MiB ranges with the remainder in the last chunk.
pub fn plan_chunks(total_len: usize) -> Vec<ChunkSpec> {
    if total_len <= SINGLE_UPLOAD_LIMIT_BYTES {
        return vec![ChunkSpec {
            index: 0,
            offset: 0,
            len: total_len,
        }];
    }

    let mut chunks = Vec::new();
    let mut offset = 0;
    let mut index = 0u32;

    while offset < total_len {
        let len = CHUNK_SIZE_BYTES.min(total_len - offset);
        chunks.push(ChunkSpec { index, offset, len });
        offset += len;
        index += 1;
    }

    chunks
}
