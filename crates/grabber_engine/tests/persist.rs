use std::fs;
use std::io;

use bytes::Bytes;
use futures_util::stream;
use grabber_engine::{
    ensure_output_dir, resolve_collision, CollisionPolicy, CollisionSafeWriter, PersistError,
    WriteOutcome, REQUEST_CHUNK_SIZE,
};
use pretty_assertions::assert_eq;
use tempfile::TempDir;

fn body(data: &'static [u8]) -> impl futures_util::Stream<Item = Result<Bytes, io::Error>> {
    stream::iter(vec![Ok(Bytes::from_static(data))])
}

#[test]
fn creates_missing_output_dir_idempotently() {
    let temp = TempDir::new().unwrap();
    let nested = temp.path().join("net").join("#chan").join("nick");
    ensure_output_dir(&nested).unwrap();
    ensure_output_dir(&nested).unwrap();
    assert!(nested.is_dir());
}

#[test]
fn output_dir_that_is_a_file_is_rejected() {
    let temp = TempDir::new().unwrap();
    let file_path = temp.path().join("not_a_dir");
    fs::write(&file_path, "x").unwrap();

    assert!(matches!(
        ensure_output_dir(&file_path),
        Err(PersistError::OutputDir(_))
    ));
    assert!(ensure_output_dir(&file_path.join("child")).is_err());
}

#[tokio::test]
async fn rename_appends_increasing_suffix() {
    let temp = TempDir::new().unwrap();
    let target = temp.path().join("a.jpg");
    fs::write(&target, "original").unwrap();
    let writer = CollisionSafeWriter::new(CollisionPolicy::Rename);

    let second = writer.write_stream(&target, body(b"two")).await.unwrap();
    let third = writer.write_stream(&target, body(b"three")).await.unwrap();

    assert_eq!(
        second,
        WriteOutcome::Written {
            path: temp.path().join("a_2.jpg"),
            bytes: 3
        }
    );
    assert_eq!(
        third,
        WriteOutcome::Written {
            path: temp.path().join("a_3.jpg"),
            bytes: 5
        }
    );
    assert_eq!(fs::read_to_string(&target).unwrap(), "original");
    assert_eq!(fs::read_to_string(temp.path().join("a_3.jpg")).unwrap(), "three");
}

#[tokio::test]
async fn rename_fills_the_first_gap() {
    let temp = TempDir::new().unwrap();
    for name in ["a.jpg", "a_2.jpg", "a_3.jpg", "a_5.jpg", "a_6.jpg"] {
        fs::write(temp.path().join(name), name).unwrap();
    }
    let target = temp.path().join("a.jpg");

    assert_eq!(
        resolve_collision(&target, CollisionPolicy::Rename),
        Some(temp.path().join("a_4.jpg"))
    );

    let writer = CollisionSafeWriter::new(CollisionPolicy::Rename);
    writer.write_stream(&target, body(b"4")).await.unwrap();
    let next = writer.write_stream(&target, body(b"7")).await.unwrap();
    assert_eq!(
        next,
        WriteOutcome::Written {
            path: temp.path().join("a_7.jpg"),
            bytes: 1
        }
    );
}

#[tokio::test]
async fn missing_target_is_written_in_place() {
    let temp = TempDir::new().unwrap();
    let target = temp.path().join("fresh.png");
    for policy in [
        CollisionPolicy::Skip,
        CollisionPolicy::Rename,
        CollisionPolicy::Overwrite,
    ] {
        assert_eq!(resolve_collision(&target, policy), Some(target.clone()));
    }
}

#[tokio::test]
async fn skip_leaves_existing_bytes_untouched() {
    let temp = TempDir::new().unwrap();
    let target = temp.path().join("a.jpg");
    fs::write(&target, "original").unwrap();
    let writer = CollisionSafeWriter::new(CollisionPolicy::Skip);

    for _ in 0..2 {
        let outcome = writer.write_stream(&target, body(b"replacement")).await.unwrap();
        assert_eq!(
            outcome,
            WriteOutcome::Skipped {
                path: target.clone()
            }
        );
    }
    assert_eq!(fs::read_to_string(&target).unwrap(), "original");
    assert_eq!(fs::read_dir(temp.path()).unwrap().count(), 1);
}

#[tokio::test]
async fn overwrite_replaces_content() {
    let temp = TempDir::new().unwrap();
    let target = temp.path().join("a.jpg");
    fs::write(&target, "original content").unwrap();
    let writer = CollisionSafeWriter::new(CollisionPolicy::Overwrite);

    writer.write_stream(&target, body(b"new")).await.unwrap();
    assert_eq!(fs::read_to_string(&target).unwrap(), "new");
}

#[tokio::test]
async fn large_streams_are_written_across_many_chunks() {
    let temp = TempDir::new().unwrap();
    let target = temp.path().join("big.bin");
    let chunk = vec![7u8; 64 * 1024];
    let chunk_count = (3 * REQUEST_CHUNK_SIZE) / chunk.len() + 1;
    let chunks: Vec<Result<Bytes, io::Error>> = (0..chunk_count)
        .map(|_| Ok(Bytes::from(chunk.clone())))
        .collect();

    let writer = CollisionSafeWriter::new(CollisionPolicy::Rename);
    let outcome = writer
        .write_stream(&target, stream::iter(chunks))
        .await
        .unwrap();

    let expected = (chunk_count * chunk.len()) as u64;
    assert_eq!(
        outcome,
        WriteOutcome::Written {
            path: target.clone(),
            bytes: expected
        }
    );
    assert_eq!(fs::metadata(&target).unwrap().len(), expected);
}

#[tokio::test]
async fn interrupted_stream_leaves_partial_file_and_reports() {
    let temp = TempDir::new().unwrap();
    let target = temp.path().join("partial.jpg");
    let chunks = vec![
        Ok(Bytes::from_static(b"head")),
        Err(io::Error::new(io::ErrorKind::ConnectionReset, "reset")),
        Ok(Bytes::from_static(b"never")),
    ];

    let writer = CollisionSafeWriter::new(CollisionPolicy::Rename);
    let err = writer
        .write_stream(&target, stream::iter(chunks))
        .await
        .unwrap_err();

    match err {
        PersistError::Interrupted { path, .. } => assert_eq!(path, target),
        other => panic!("unexpected error {other:?}"),
    }
    assert_eq!(fs::read_to_string(&target).unwrap(), "head");
}
