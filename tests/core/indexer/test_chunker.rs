// Chunking scenarios through the public API

use cvrag::{chunk, ChunkConfigError, Chunker};

fn texts(text: &str, size: usize, overlap: usize) -> Vec<String> {
    chunk(text, size, overlap)
        .unwrap()
        .into_iter()
        .map(|c| c.text)
        .collect()
}

#[test]
fn test_empty_text_yields_nothing() {
    assert!(chunk("", 500, 50).unwrap().is_empty());
}

#[test]
fn test_overlapping_windows() {
    assert_eq!(
        texts("abcdefghij", 4, 2),
        ["abcd", "cdef", "efgh", "ghij", "ij"]
    );
}

#[test]
fn test_short_text_is_one_chunk() {
    let chunks = chunk("hello", 10, 2).unwrap();
    assert_eq!(chunks.len(), 1);
    assert_eq!(chunks[0].text, "hello");
    assert_eq!((chunks[0].start, chunks[0].end), (0, 5));
}

#[test]
fn test_zero_overlap_partitions() {
    assert_eq!(texts("abcdef", 3, 0), ["abc", "def"]);
}

#[test]
fn test_no_spurious_trailing_chunk() {
    assert_eq!(texts("abcdef", 4, 1), ["abcd", "def"]);
}

#[test]
fn test_invalid_configuration() {
    assert_eq!(
        chunk("x", 1, 1).unwrap_err(),
        ChunkConfigError::OverlapTooLarge {
            overlap: 1,
            size: 1
        }
    );
    assert_eq!(chunk("x", 0, 0).unwrap_err(), ChunkConfigError::ZeroSize);
}

#[test]
fn test_offsets_are_contiguous_with_overlap() {
    let chunker = Chunker::new(5, 2).unwrap();
    let chunks = chunker.chunk_text("The quick brown fox jumps");

    for pair in chunks.windows(2) {
        assert_eq!(pair[1].start, pair[0].start + chunker.stride());
        assert_eq!(pair[1].overlap_with(&pair[0]), 2.min(pair[1].len()));
    }
    assert_eq!(chunks.last().unwrap().end, 25);
}

#[test]
fn test_lazy_iteration_matches_vector() {
    let chunker = Chunker::new(7, 3).unwrap();
    let text = "Curriculum vitae of a senior engineer";

    let eager = chunker.chunk_text(text);
    let lazy: Vec<_> = chunker.chunks(text).collect();
    assert_eq!(eager, lazy);

    let mut iter = chunker.chunks(text);
    assert_eq!(iter.len(), chunker.chunk_count(text.chars().count()));
    iter.next();
    assert_eq!(iter.len(), eager.len() - 1);
}

#[test]
fn test_large_document_bounds() {
    let text = "word ".repeat(10_000);
    let chunker = Chunker::new(500, 50).unwrap();
    let chunks = chunker.chunk_text(&text);

    assert_eq!(chunks.len(), 50_000usize.div_ceil(450));
    assert!(chunks.iter().all(|c| c.len() <= 500));
    assert!(chunks[..chunks.len() - 1].iter().all(|c| c.len() == 500));
}
