// SPDX-License-Identifier: Apache-2.0
// Copyright 2024-2026 Dragonscale Team

//! MovieLens evaluation-dataset decoding.
//!
//! `tags.csv` rows (`userId,movieId,tag,timestamp`) become post/tag edges:
//! movie ids are taken verbatim, tag strings are interned to consecutive
//! ids. `ratings.csv` rows (`userId,movieId,rating,timestamp`) become nested
//! per-user rating maps. Archive retrieval is the caller's problem; both
//! entry points take any `Read`.

use anyhow::anyhow;
use fxhash::FxHashMap;
use pixie_common::{Id, PixieError, Result};
use pixie_graph::BipartiteGraph;
use std::io::Read;
use tracing::debug;

pub type MovieRatings = FxHashMap<i64, i64>;
pub type UserRatings = FxHashMap<i64, MovieRatings>;

fn get_cell<'r>(record: &'r csv::StringRecord, index: usize, op: &str) -> Result<&'r str> {
    record.get(index).ok_or_else(|| {
        PixieError::external(
            op,
            anyhow!("row has {} fields, expected at least {}", record.len(), index + 1),
        )
    })
}

/// Builds a bipartite graph from a taggings table.
pub fn graph_from_taggings<R: Read>(reader: R) -> Result<BipartiteGraph> {
    const OP: &str = "unarchive taggings";

    let mut rows = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(reader);
    let mut graph = BipartiteGraph::new();
    let mut tag_ids: FxHashMap<String, i64> = FxHashMap::default();

    for record in rows.records() {
        let record = record.map_err(|e| PixieError::external(OP, e))?;
        let movie_raw = get_cell(&record, 1, OP)?;
        let movie: i64 = movie_raw
            .parse()
            .map_err(|e| PixieError::external(format!("{OP}: parse movie id `{movie_raw}`"), e))?;
        let tag = get_cell(&record, 2, OP)?;

        let next = tag_ids.len() as i64;
        let tag_value = *tag_ids.entry(tag.to_string()).or_insert(next);
        graph.add_edge(Id::post(movie), Id::tag(tag_value))?;
        graph.label_vertex(Id::tag(tag_value), tag);
    }

    debug!(
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        tags = tag_ids.len(),
        "decoded taggings"
    );
    Ok(graph)
}

/// Decodes a ratings table into `user -> movie -> rating` maps.
pub fn load_ratings<R: Read>(reader: R) -> Result<UserRatings> {
    const OP: &str = "unarchive ratings";

    let mut rows = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(reader);
    let mut ratings: UserRatings = FxHashMap::default();

    for record in rows.records() {
        let record = record.map_err(|e| PixieError::external(OP, e))?;
        let fields = ["user id", "movie id", "rating"];
        let mut values = [0i64; 3];
        for (i, name) in fields.iter().enumerate() {
            let cell = get_cell(&record, i, OP)?;
            values[i] = cell
                .parse()
                .map_err(|e| PixieError::external(format!("{OP}: parse {name} `{cell}`"), e))?;
        }
        let [user, movie, rating] = values;
        ratings.entry(user).or_default().insert(movie, rating);
    }

    Ok(ratings)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TAGS_CSV: &str = "\
userId,movieId,tag,timestamp
1,100,funny,1445714994
2,100,quirky,1445714996
1,200,funny,1445715000
3,300,dark,1445715100
";

    #[test]
    fn test_taggings_build_graph() {
        let graph = graph_from_taggings(TAGS_CSV.as_bytes()).unwrap();

        // "funny" is interned once and shared by movies 100 and 200
        assert!(graph.has_edge(Id::post(100), Id::tag(0)));
        assert!(graph.has_edge(Id::post(200), Id::tag(0)));
        assert_eq!(graph.degree(Id::tag(0)), 2);
        assert_eq!(graph.tag_name(Id::tag(0)), Some("funny"));

        assert_eq!(graph.degree(Id::post(100)), 2); // funny + quirky
        assert_eq!(graph.tag_name(Id::tag(2)), Some("dark"));
        assert_eq!(graph.edge_count(), 4);
    }

    #[test]
    fn test_header_only_is_empty() {
        let graph = graph_from_taggings("userId,movieId,tag,timestamp\n".as_bytes()).unwrap();
        assert_eq!(graph.node_count(), 0);
    }

    #[test]
    fn test_bad_movie_id_is_tagged() {
        let csv = "userId,movieId,tag,timestamp\n1,not-a-number,funny,0\n";
        let err = graph_from_taggings(csv.as_bytes()).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("unarchive taggings"), "{message}");
        assert!(message.contains("not-a-number"), "{message}");
    }

    #[test]
    fn test_ratings_nest_by_user() {
        let csv = "\
userId,movieId,rating,timestamp
1,100,4,1445714994
1,200,2,1445714996
2,100,5,1445715000
";
        let ratings = load_ratings(csv.as_bytes()).unwrap();
        assert_eq!(ratings[&1][&100], 4);
        assert_eq!(ratings[&1][&200], 2);
        assert_eq!(ratings[&2][&100], 5);
        assert_eq!(ratings.len(), 2);
    }

    #[test]
    fn test_bad_rating_cell_is_tagged() {
        let csv = "userId,movieId,rating,timestamp\n1,100,great,0\n";
        let err = load_ratings(csv.as_bytes()).unwrap_err();
        assert!(err.to_string().contains("parse rating `great`"));
    }
}
