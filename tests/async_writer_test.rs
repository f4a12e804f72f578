mod common;

use common::FakeJournald;
use journald_native::{AsyncJournalWriter, CallerLocation, JournalEntry, SocketPath, TransportError};

fn writer_for(journald: &FakeJournald) -> AsyncJournalWriter {
    AsyncJournalWriter::new(SocketPath::custom(&journald.path).unwrap())
}

#[tokio::test]
async fn test_async_datagram_matches_serialized_entry() {
    let journald = FakeJournald::bind();
    let writer = writer_for(&journald);
    let entry = JournalEntry::from_message("hello", &CallerLocation::unknown()).unwrap();

    let delivery = writer.write(&entry).await.unwrap();

    assert_eq!(journald.recv(), entry.serialize().to_vec());
    assert_eq!(delivery.bytes_sent, entry.encoded_len());
}

#[tokio::test]
async fn test_async_closed_listener_is_a_connect_failure() {
    let journald = FakeJournald::bind();
    let writer = writer_for(&journald);
    drop(journald.socket);

    let err = writer.send_payload(b"MESSAGE=x\n").await.unwrap_err();
    assert!(matches!(err, TransportError::ConnectFailed { .. }));
}

#[tokio::test]
async fn test_async_oversized_entry_is_rejected() {
    let journald = FakeJournald::bind();
    let writer = writer_for(&journald);

    let entry =
        JournalEntry::from_message(vec![b'x'; 4 * 1024 * 1024], &CallerLocation::unknown()).unwrap();

    let err = writer.write(&entry).await.unwrap_err();
    assert!(matches!(err, TransportError::SendFailed { written: 0, .. }));
    assert!(journald.is_empty());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_async_writer_is_shareable_across_tasks() {
    let journald = FakeJournald::bind();
    let writer = writer_for(&journald);

    let tasks: Vec<_> = (0..4)
        .map(|i| {
            let writer = writer.clone();
            tokio::spawn(async move {
                let mut entry = JournalEntry::new().unwrap();
                entry.add_value("TASK", i.to_string()).unwrap();
                writer.write(&entry).await.map(|delivery| delivery.bytes_sent)
            })
        })
        .collect();

    for task in tasks {
        assert!(task.await.unwrap().unwrap() > 0);
    }

    for _ in 0..4 {
        let fields = common::decode(&journald.recv());
        assert_eq!(fields.last().unwrap().0, "TASK");
    }
}
