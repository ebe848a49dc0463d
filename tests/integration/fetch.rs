use crate::*;

use courier::transfer::Outcome;

/// End-to-end: one segment, odd length, checksum verifies, file written.
#[tokio::test]
async fn single_segment_file_is_delivered() {
    let content = b"Hello!\n";
    let storage = test_storage("single");

    let server = spawn_mock_server(vec![vec![
        handshake_datagram(content.len(), wire_checksum(content), "poem.txt"),
        segment_datagram(0, content),
    ]])
    .await
    .unwrap();

    let outcome = run_exchange(server, "someuser", &storage).await.unwrap();
    match outcome {
        Outcome::Delivered { path, bytes } => {
            assert_eq!(bytes, 7);
            assert_eq!(std::fs::read(&path).unwrap(), content);
            assert_eq!(path, storage.join("poem.txt"));
        }
        other => panic!("expected delivery, got {other:?}"),
    }

    let _ = std::fs::remove_dir_all(&storage);
}

/// Segments arriving out of order land by index, not arrival position.
#[tokio::test]
async fn out_of_order_segments_reassemble() {
    let mut content = vec![b'a'; 100];
    content.extend_from_slice(&[b'b'; 50]);
    let storage = test_storage("ooo");

    let server = spawn_mock_server(vec![vec![
        handshake_datagram(150, wire_checksum(&content), "two.txt"),
        segment_datagram(1, &content[100..]),
        segment_datagram(0, &content[..100]),
    ]])
    .await
    .unwrap();

    let outcome = run_exchange(server, "someuser", &storage).await.unwrap();
    match outcome {
        Outcome::Delivered { path, bytes } => {
            assert_eq!(bytes, 150);
            let written = std::fs::read(&path).unwrap();
            // 150 is even: no pad byte, exactly the declared size.
            assert_eq!(written.len(), 150);
            assert_eq!(written, content);
        }
        other => panic!("expected delivery, got {other:?}"),
    }

    let _ = std::fs::remove_dir_all(&storage);
}

/// A zero-size transfer has no segments and folds to 0xFFFF.
#[tokio::test]
async fn empty_file_declares_zero_segments() {
    let storage = test_storage("empty");

    let server = spawn_mock_server(vec![vec![handshake_datagram(0, 0xFFFF, "empty.txt")]])
        .await
        .unwrap();

    let outcome = run_exchange(server, "someuser", &storage).await.unwrap();
    match outcome {
        Outcome::Delivered { path, bytes } => {
            assert_eq!(bytes, 0);
            assert_eq!(std::fs::read(&path).unwrap().len(), 0);
        }
        other => panic!("expected delivery, got {other:?}"),
    }

    let _ = std::fs::remove_dir_all(&storage);
}

/// A mismatch writes nothing; redoing the whole exchange from the
/// identifier send recovers when the server gets it right.
#[tokio::test]
async fn full_exchange_retry_recovers() {
    let content = b"retry me";
    let storage = test_storage("retry");

    let good = wire_checksum(content);
    let bad = good.wrapping_add(1);

    let server = spawn_mock_server(vec![
        vec![
            handshake_datagram(content.len(), bad, "retry.txt"),
            segment_datagram(0, content),
        ],
        vec![
            handshake_datagram(content.len(), good, "retry.txt"),
            segment_datagram(0, content),
        ],
    ])
    .await
    .unwrap();

    let first = run_exchange(server, "someuser", &storage).await.unwrap();
    match first {
        Outcome::ChecksumMismatch { expected, computed } => {
            assert_eq!(expected, bad);
            assert_eq!(computed, good);
        }
        other => panic!("expected mismatch, got {other:?}"),
    }
    assert!(
        !storage.join("retry.txt").exists(),
        "mismatch must not write a file"
    );

    let second = run_exchange(server, "replacement-id", &storage)
        .await
        .unwrap();
    match second {
        Outcome::Delivered { path, .. } => {
            assert_eq!(std::fs::read(&path).unwrap(), content);
        }
        other => panic!("expected delivery on retry, got {other:?}"),
    }

    let _ = std::fs::remove_dir_all(&storage);
}
