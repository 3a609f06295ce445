// SPDX-License-Identifier: Apache-2.0
// Copyright 2024-2026 Dragonscale Team

//! Worker-pool graph loading.
//!
//! The producer drains the record source into a bounded channel; workers
//! drain the channel and insert under the writer's lock. Closing the channel
//! is what ends the pool, and the thread scope joins everyone before the
//! stats are read.

use crate::source::PostSource;
use pixie_common::{PixieError, Result};
use pixie_graph::GraphWriter;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, mpsc};
use tracing::{debug, warn};

#[derive(Clone, Copy, Debug)]
pub struct LoaderConfig {
    /// Insertion worker threads (default: 4)
    pub workers: usize,
    /// Bounded record channel capacity (default: 1024)
    pub channel_capacity: usize,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            workers: 4,
            channel_capacity: 1024,
        }
    }
}

/// Outcome of one load pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LoadStats {
    /// Records inserted.
    pub posts: u64,
    /// New edges the pass added to the graph.
    pub edges: u64,
    /// Undecodable records skipped.
    pub skipped: u64,
}

/// Streams `source` into `writer` on a worker pool.
///
/// Undecodable records are counted and skipped; duplicate posts are no-ops
/// by edge idempotence. Any non-decode source error aborts the load.
pub fn load_posts<S: PostSource + Send>(
    mut source: S,
    writer: &GraphWriter,
    config: &LoaderConfig,
) -> Result<LoadStats> {
    let (tx, rx) = mpsc::sync_channel(config.channel_capacity.max(1));
    let rx = Mutex::new(rx);
    let posts = AtomicU64::new(0);
    let skipped = AtomicU64::new(0);
    let failure: Mutex<Option<PixieError>> = Mutex::new(None);
    let edges_before = writer.edge_count() as u64;

    std::thread::scope(|scope| -> Result<()> {
        for _ in 0..config.workers.max(1) {
            scope.spawn(|| {
                loop {
                    let post = match rx.lock().unwrap_or_else(|e| e.into_inner()).recv() {
                        Ok(post) => post,
                        Err(_) => break, // channel closed and drained
                    };
                    match writer.tag_post(&post) {
                        Ok(_) => {
                            posts.fetch_add(1, Ordering::Relaxed);
                        }
                        Err(err) => {
                            // Record the first failure but keep draining, or
                            // a full channel would wedge the producer.
                            let mut slot = failure.lock().unwrap_or_else(|e| e.into_inner());
                            slot.get_or_insert(err);
                        }
                    }
                }
            });
        }

        // The producer owns the sender; the channel closes when it exits,
        // on success and on failure alike, which is what ends the pool.
        let skipped = &skipped;
        let producer = scope.spawn(move || -> Result<()> {
            while let Some(item) = source.next_post() {
                match item {
                    Ok(post) => {
                        if tx.send(post).is_err() {
                            // Workers are gone; the failure slot says why.
                            break;
                        }
                    }
                    Err(PixieError::Decode { message }) => {
                        skipped.fetch_add(1, Ordering::Relaxed);
                        warn!(error = %message, "skipping undecodable post record");
                    }
                    Err(other) => return Err(other),
                }
            }
            Ok(())
        });
        producer.join().expect("producer thread panicked")
    })?;

    if let Some(err) = failure.into_inner().unwrap_or_else(|e| e.into_inner()) {
        return Err(err);
    }

    let stats = LoadStats {
        posts: posts.into_inner(),
        edges: writer.edge_count() as u64 - edges_before,
        skipped: skipped.into_inner(),
    };
    debug!(
        posts = stats.posts,
        edges = stats.edges,
        skipped = stats.skipped,
        "post load complete"
    );
    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::JsonPostReader;
    use pixie_common::core::model::{Post, Tag};
    use pixie_common::{Id, NodeKind};
    use std::io::Cursor;

    fn post(id: i64, tag_ids: &[i64]) -> Post {
        Post {
            id,
            rating: Default::default(),
            tags: tag_ids
                .iter()
                .map(|&t| Tag {
                    id: t,
                    category: Default::default(),
                    name: format!("tag-{t}"),
                })
                .collect(),
        }
    }

    #[test]
    fn test_load_from_json_lines_counts_and_skips() {
        let data = "\
{\"id\": \"1\", \"tags\": [{\"id\": \"10\", \"name\": \"a\"}, {\"id\": \"11\", \"name\": \"b\"}]}\n\
this line is not a record\n\
{\"id\": \"2\", \"tags\": [{\"id\": \"10\", \"name\": \"a\"}]}\n";
        let writer = GraphWriter::new();
        let stats = load_posts(
            JsonPostReader::new(Cursor::new(data)),
            &writer,
            &LoaderConfig::default(),
        )
        .unwrap();

        assert_eq!(stats.posts, 2);
        assert_eq!(stats.edges, 3);
        assert_eq!(stats.skipped, 1);

        let graph = writer.seal();
        assert!(graph.has_edge(Id::post(1), Id::tag(10)));
        assert!(graph.has_edge(Id::post(2), Id::tag(10)));
        assert_eq!(graph.degree(Id::tag(10)), 2);
        assert_eq!(graph.tag_name(Id::tag(10)), Some("a"));
    }

    #[test]
    fn test_duplicate_posts_are_noops() {
        let posts: Vec<_> = (0..4).map(|_| Ok(post(1, &[10, 11]))).collect();
        let writer = GraphWriter::new();
        let stats = load_posts(posts.into_iter(), &writer, &LoaderConfig::default()).unwrap();

        assert_eq!(stats.posts, 4);
        assert_eq!(stats.edges, 2);
        assert_eq!(writer.edge_count(), 2);
    }

    #[test]
    fn test_parallel_load_matches_sequential() {
        let make = |i: i64| post(i, &[i % 7, i % 11, 100]);

        let writer = GraphWriter::new();
        let posts: Vec<_> = (0..300).map(|i| Ok(make(i))).collect();
        load_posts(
            posts.into_iter(),
            &writer,
            &LoaderConfig {
                workers: 8,
                channel_capacity: 16,
            },
        )
        .unwrap();
        let parallel = writer.seal();

        let mut sequential = pixie_graph::BipartiteGraph::new();
        for i in 0..300 {
            sequential.tag_post(&make(i)).unwrap();
        }

        assert_eq!(parallel.node_count(), sequential.node_count());
        assert_eq!(parallel.edge_count(), sequential.edge_count());
        assert_eq!(
            parallel.max_degree(NodeKind::Tag),
            sequential.max_degree(NodeKind::Tag)
        );
        assert_eq!(
            parallel.max_degree(NodeKind::Post),
            sequential.max_degree(NodeKind::Post)
        );
    }

    #[test]
    fn test_source_failure_aborts_load() {
        let io = std::io::Error::new(std::io::ErrorKind::ConnectionReset, "gone");
        let posts = vec![
            Ok(post(1, &[10])),
            Err(PixieError::external("hydrate post records", io)),
        ];
        let writer = GraphWriter::new();
        let got = load_posts(posts.into_iter(), &writer, &LoaderConfig::default());
        assert!(matches!(got, Err(PixieError::External { .. })));
    }
}
