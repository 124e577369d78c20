//! Property tests for the semantic retrieval strategies.

mod common;

use std::collections::HashSet;
use std::sync::Arc;

use common::TableEmbedder;
use proptest::prelude::*;
#[cfg(feature = "hnsw")]
use sunrise_rag::VectorIndexStrategy;
use sunrise_rag::{BruteForceCosineStrategy, Corpus, RetrievalStrategy, cosine_similarity};

const DIM: usize = 8;
const QUERY: &str = "query";

/// Generate a non-zero embedding of the given dimension.
fn arb_embedding(dim: usize) -> impl Strategy<Value = Vec<f32>> {
    proptest::collection::vec(-1.0f32..1.0f32, dim).prop_filter("non-zero embedding", |v| {
        v.iter().map(|x| x * x).sum::<f32>().sqrt() > 1e-3
    })
}

fn corpus_of(embeddings: Vec<Vec<f32>>) -> Arc<Corpus> {
    let texts: Vec<String> = (0..embeddings.len()).map(|i| format!("doc {i}")).collect();
    Arc::new(Corpus::with_embeddings(texts, embeddings).unwrap())
}

fn embedder_for(query: Vec<f32>) -> Arc<TableEmbedder> {
    Arc::new(TableEmbedder::new([(QUERY, query)]))
}

#[test]
fn zero_magnitude_scores_zero() {
    assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 0.0]), 0.0);
    assert_eq!(cosine_similarity(&[1.0, 0.0], &[0.0, 0.0]), 0.0);
}

#[test]
fn parallel_and_opposite_vectors() {
    assert!((cosine_similarity(&[1.0, 2.0], &[2.0, 4.0]) - 1.0).abs() < 1e-6);
    assert!((cosine_similarity(&[1.0, 2.0], &[-1.0, -2.0]) + 1.0).abs() < 1e-6);
}

#[tokio::test]
async fn ties_keep_corpus_order() {
    let corpus = corpus_of(vec![vec![1.0, 0.0], vec![0.0, 1.0], vec![2.0, 0.0], vec![3.0, 0.0]]);
    let strategy = BruteForceCosineStrategy::new(corpus, embedder_for(vec![1.0, 0.0])).unwrap();

    let results = strategy.rank(QUERY, 3).await.unwrap();
    let indices: Vec<usize> = results.iter().map(|r| r.index).collect();
    assert_eq!(indices, vec![0, 2, 3]);
}

#[test]
fn large_components_do_not_overflow() {
    let expected = std::f32::consts::FRAC_1_SQRT_2;
    assert!((cosine_similarity(&[1e20, 1e20], &[1.0, 0.0]) - expected).abs() < 1e-6);
    assert!((cosine_similarity(&[1e20, 1e20], &[1e20, 0.0]) - expected).abs() < 1e-6);
    assert!((cosine_similarity(&[3e38, -3e38], &[1.0, -1.0]) - 1.0).abs() < 1e-6);
}

#[test]
fn orthogonal_scores_positive_zero() {
    let score = cosine_similarity(&[-1.0, 0.0], &[0.0, -1.0]);
    assert_eq!(score, 0.0);
    assert!(score.is_sign_positive());
}

#[tokio::test]
async fn zero_scores_tie_regardless_of_sign() {
    let corpus = corpus_of(vec![vec![-1.0, 0.0], vec![1.0, 0.0]]);
    let strategy = BruteForceCosineStrategy::new(corpus, embedder_for(vec![0.0, -1.0])).unwrap();

    let results = strategy.rank(QUERY, 2).await.unwrap();
    let indices: Vec<usize> = results.iter().map(|r| r.index).collect();
    assert_eq!(indices, vec![0, 1]);
}

#[tokio::test]
async fn mixed_magnitudes_rank_by_direction() {
    let corpus =
        corpus_of(vec![vec![-1.0, 0.0], vec![1.0, 0.0], vec![0.1, -1.0], vec![1e20, 1e20]]);
    let strategy = BruteForceCosineStrategy::new(corpus, embedder_for(vec![0.0, -1.0])).unwrap();

    let results = strategy.rank(QUERY, 4).await.unwrap();
    let indices: Vec<usize> = results.iter().map(|r| r.index).collect();
    assert_eq!(indices, vec![2, 0, 1, 3]);
    assert!(results.iter().all(|r| r.score.is_finite()));
    assert!((results[3].score + std::f32::consts::FRAC_1_SQRT_2).abs() < 1e-6);
}

#[tokio::test]
async fn dimension_mismatch_is_an_embedding_error() {
    let corpus = corpus_of(vec![vec![1.0, 0.0, 0.0]]);
    let strategy = BruteForceCosineStrategy::new(corpus, embedder_for(vec![1.0, 0.0])).unwrap();
    assert!(strategy.rank(QUERY, 5).await.is_err());
}

#[test]
fn strategies_require_embeddings() {
    let corpus = Arc::new(Corpus::new(["no vectors here"]));
    let embedder = embedder_for(vec![1.0]);
    assert!(BruteForceCosineStrategy::new(corpus.clone(), embedder.clone()).is_err());
    #[cfg(feature = "hnsw")]
    assert!(VectorIndexStrategy::build(corpus, embedder).is_err());
}

#[cfg(feature = "hnsw")]
#[tokio::test]
async fn index_matches_brute_force_on_signed_zeros_and_zero_vectors() {
    let corpus = corpus_of(vec![
        vec![-1.0, 0.0],
        vec![0.0, 0.0],
        vec![1.0, 0.0],
        vec![0.1, -1.0],
        vec![1e20, 1e20],
    ]);
    let embedder = embedder_for(vec![0.0, -1.0]);
    let brute = BruteForceCosineStrategy::new(corpus.clone(), embedder.clone()).unwrap();
    let index = VectorIndexStrategy::build(corpus, embedder).unwrap();

    let expected = brute.rank(QUERY, 5).await.unwrap();
    let actual = index.rank(QUERY, 5).await.unwrap();
    assert_eq!(actual, expected);
    let indices: Vec<usize> = actual.iter().map(|r| r.index).collect();
    assert_eq!(indices, vec![3, 0, 1, 2, 4]);
}

/// Scaling a document embedding by a positive constant leaves its
/// similarity to any query unchanged.
mod prop_cosine_scale_invariance {
    use super::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn positive_rescaling_preserves_score(
            doc in arb_embedding(DIM),
            query in arb_embedding(DIM),
            mantissa in 1.0f32..10.0f32,
            exponent in -2i32..30,
        ) {
            let factor = mantissa * 10f32.powi(exponent);
            let scaled: Vec<f32> = doc.iter().map(|x| x * factor).collect();
            let original = cosine_similarity(&doc, &query);
            let rescaled = cosine_similarity(&scaled, &query);
            prop_assert!((original - rescaled).abs() < 1e-4, "{original} vs {rescaled}");
        }
    }
}

/// Brute-force results are bounded by k and the corpus, distinct, and
/// ordered by descending score.
mod prop_semantic_ranking {
    use super::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn results_bounded_distinct_and_descending(
            embeddings in proptest::collection::vec(arb_embedding(DIM), 1..20),
            query in arb_embedding(DIM),
            top_k in 1usize..25,
        ) {
            let rt = tokio::runtime::Runtime::new().unwrap();
            let count = embeddings.len();
            let strategy =
                BruteForceCosineStrategy::new(corpus_of(embeddings), embedder_for(query)).unwrap();
            let results = rt.block_on(strategy.rank(QUERY, top_k)).unwrap();

            // Cosine is always defined, so semantic mode fills k up to the corpus size.
            prop_assert_eq!(results.len(), top_k.min(count));

            let distinct: HashSet<usize> = results.iter().map(|r| r.index).collect();
            prop_assert_eq!(distinct.len(), results.len());
            prop_assert!(results.iter().all(|r| r.index < count));

            for window in results.windows(2) {
                prop_assert!(
                    window[0].score >= window[1].score,
                    "results not in descending order: {} < {}",
                    window[0].score,
                    window[1].score,
                );
            }
        }
    }
}

/// On small corpora the HNSW search visits every node, so the index returns
/// the same ranking as brute force.
#[cfg(feature = "hnsw")]
mod prop_index_agreement {
    use super::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn index_agrees_with_brute_force(
            embeddings in proptest::collection::vec(arb_embedding(DIM), 1..20),
            query in arb_embedding(DIM),
            top_k in 1usize..25,
        ) {
            let rt = tokio::runtime::Runtime::new().unwrap();
            let corpus = corpus_of(embeddings);
            let embedder = embedder_for(query);

            let brute = BruteForceCosineStrategy::new(corpus.clone(), embedder.clone()).unwrap();
            let index = VectorIndexStrategy::build(corpus, embedder).unwrap();
            let (expected, actual) = rt.block_on(async {
                (brute.rank(QUERY, top_k).await.unwrap(), index.rank(QUERY, top_k).await.unwrap())
            });

            prop_assert_eq!(actual.len(), expected.len());
            for (a, b) in expected.iter().zip(actual.iter()) {
                prop_assert!((a.score - b.score).abs() < 1e-6);
            }
        }
    }
}
