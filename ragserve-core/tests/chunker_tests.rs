//! Property tests for fixed-size chunking.

use std::collections::HashMap;

use proptest::prelude::*;
use ragserve_core::chunking::{Chunker, FixedSizeChunker};
use ragserve_core::document::Document;

fn doc(text: String) -> Document {
    Document::new(text, HashMap::new())
}

/// Generate (chunk_size, overlap) pairs with `overlap < chunk_size`.
fn arb_split_params() -> impl Strategy<Value = (usize, usize)> {
    (1usize..64).prop_flat_map(|size| (Just(size), 0..size))
}

/// For any text and any valid (chunk_size, overlap), stripping the
/// overlapping prefix from every chunk after the first and concatenating
/// the remainder reconstructs the original text exactly.
mod prop_reconstruction {
    use super::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(256))]

        #[test]
        fn overlap_stripped_concatenation_equals_source(
            text in ".{0,200}",
            (chunk_size, overlap) in arb_split_params(),
        ) {
            let chunker = FixedSizeChunker::new(chunk_size, overlap).unwrap();
            let chunks = chunker.chunk(&doc(text.clone()));

            let mut rebuilt = String::new();
            for (i, chunk) in chunks.iter().enumerate() {
                if i == 0 {
                    rebuilt.push_str(&chunk.text);
                } else {
                    rebuilt.extend(chunk.text.chars().skip(overlap));
                }
            }
            prop_assert_eq!(rebuilt, text);
        }

        #[test]
        fn chunks_respect_size_bound(
            text in ".{0,200}",
            (chunk_size, overlap) in arb_split_params(),
        ) {
            let chunker = FixedSizeChunker::new(chunk_size, overlap).unwrap();
            for chunk in chunker.chunk(&doc(text.clone())) {
                prop_assert!(chunk.text.chars().count() <= chunk_size);
            }
        }
    }
}

/// Splitting the same input twice yields the identical chunk sequence.
mod prop_determinism {
    use super::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(128))]

        #[test]
        fn identical_arguments_identical_chunks(
            text in ".{0,200}",
            (chunk_size, overlap) in arb_split_params(),
        ) {
            let chunker = FixedSizeChunker::new(chunk_size, overlap).unwrap();
            let first = chunker.chunk(&doc(text.clone()));
            let second = chunker.chunk(&doc(text));
            prop_assert_eq!(first, second);
        }

        #[test]
        fn chunk_indices_are_sequential(
            text in ".{1,200}",
            (chunk_size, overlap) in arb_split_params(),
        ) {
            let chunker = FixedSizeChunker::new(chunk_size, overlap).unwrap();
            for (i, chunk) in chunker.chunk(&doc(text.clone())).iter().enumerate() {
                prop_assert_eq!(&chunk.metadata["chunk_index"], &i.to_string());
            }
        }
    }
}
