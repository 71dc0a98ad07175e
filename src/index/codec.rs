use super::state::Posting;

/// Delta + varint encoding of a posting list: doc ids sort ascending
/// and gap-encode, then each gap and term frequency is an LEB128
/// varint.
pub fn encode_postings(postings: &[Posting]) -> Vec<u8> {
    let mut sorted: Vec<Posting> = postings.to_vec();
    sorted.sort_unstable_by_key(|p| p.doc_id);

    let mut result = Vec::with_capacity(sorted.len() * 4);
    let mut prev_doc_id = 0u32;

    for posting in sorted {
        encode_varint(posting.doc_id - prev_doc_id, &mut result);
        encode_varint(posting.term_frequency, &mut result);
        prev_doc_id = posting.doc_id;
    }
    result
}

/// Inverse of [`encode_postings`]. Truncated or malformed input yields
/// a short list rather than a panic; callers validate the count.
pub fn decode_postings(data: &[u8]) -> Vec<Posting> {
    let mut result = Vec::new();
    let mut pos = 0;
    let mut doc_id = 0u32;

    while pos < data.len() {
        let (delta, new_pos) = decode_varint(data, pos);
        pos = new_pos;
        if pos >= data.len() {
            break;
        }
        let (term_frequency, new_pos) = decode_varint(data, pos);
        pos = new_pos;
        doc_id = doc_id.wrapping_add(delta);
        result.push(Posting {
            doc_id,
            term_frequency,
        });
    }
    result
}

fn encode_varint(mut value: u32, buf: &mut Vec<u8>) {
    while value >= 0x80 {
        buf.push((value as u8) | 0x80);
        value >>= 7;
    }
    buf.push(value as u8);
}

fn decode_varint(data: &[u8], mut pos: usize) -> (u32, usize) {
    let mut result = 0u32;
    let mut shift = 0u32;

    while pos < data.len() {
        let byte = data[pos];
        pos += 1;
        result |= ((byte & 0x7F) as u32) << shift;
        if byte & 0x80 == 0 {
            break;
        }
        shift += 7;
        if shift >= 32 {
            break;
        }
    }
    (result, pos)
}
