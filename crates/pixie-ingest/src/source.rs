// SPDX-License-Identifier: Apache-2.0
// Copyright 2024-2026 Dragonscale Team

//! Sources of post records.

use pixie_common::core::model::Post;
use pixie_common::{PixieError, Result};
use std::io::BufRead;

/// A stream of decoded post records.
///
/// `Decode` items mark individual records the loader may skip; any other
/// error terminates the load. Every `Iterator<Item = Result<Post>>` is a
/// source.
pub trait PostSource {
    fn next_post(&mut self) -> Option<Result<Post>>;
}

impl<I> PostSource for I
where
    I: Iterator<Item = Result<Post>>,
{
    fn next_post(&mut self) -> Option<Result<Post>> {
        self.next()
    }
}

/// Decodes one JSON post record per line; blank lines are ignored.
///
/// This is the shape table exports come in: newline-delimited objects with
/// string-encoded integer ids.
pub struct JsonPostReader<R> {
    reader: R,
    buf: String,
}

impl<R: BufRead> JsonPostReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            buf: String::new(),
        }
    }
}

impl<R: BufRead> Iterator for JsonPostReader<R> {
    type Item = Result<Post>;

    fn next(&mut self) -> Option<Result<Post>> {
        loop {
            self.buf.clear();
            match self.reader.read_line(&mut self.buf) {
                Ok(0) => return None,
                Ok(_) => {
                    let line = self.buf.trim();
                    if line.is_empty() {
                        continue;
                    }
                    return Some(
                        serde_json::from_str(line)
                            .map_err(|e| PixieError::decode(format!("post record: {e}"))),
                    );
                }
                Err(e) => return Some(Err(PixieError::external("hydrate post records", e))),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_reads_one_record_per_line() {
        let data = "\
{\"id\": \"1\", \"rating\": \"s\", \"tags\": [{\"id\": \"10\", \"name\": \"a\"}]}\n\
\n\
{\"id\": \"2\", \"tags\": []}\n";
        let mut reader = JsonPostReader::new(Cursor::new(data));

        let first = reader.next_post().unwrap().unwrap();
        assert_eq!(first.id, 1);
        assert_eq!(first.tags.len(), 1);

        let second = reader.next_post().unwrap().unwrap();
        assert_eq!(second.id, 2);

        assert!(reader.next_post().is_none());
    }

    #[test]
    fn test_malformed_line_is_a_decode_error() {
        let mut reader = JsonPostReader::new(Cursor::new("{not json}\n"));
        assert!(matches!(
            reader.next_post(),
            Some(Err(PixieError::Decode { .. }))
        ));
    }

    #[test]
    fn test_vec_iterator_is_a_source() {
        let posts = vec![Ok(Post {
            id: 5,
            rating: Default::default(),
            tags: Vec::new(),
        })];
        let mut source = posts.into_iter();
        assert_eq!(source.next_post().unwrap().unwrap().id, 5);
        assert!(source.next_post().is_none());
    }
}
