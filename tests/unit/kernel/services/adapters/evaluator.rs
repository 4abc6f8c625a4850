use super::*;
use crate::kernel::protocol::EvalEvent;
use std::io;
use std::pin::Pin;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::task::{Context, Poll};
use std::time::Duration;

fn empty_doc() -> DocumentV3 {
    DocumentV3 {
        version: 3,
        language: "javascript".to_string(),
        nodejs: None,
        description: None,
        cells: Vec::new(),
    }
}

#[test]
fn test_spawn_rejects_empty_command() {
    let (tx, _rx) = unbounded_channel();
    let result = ProcessEvaluator::spawn(&[], tx);
    assert!(matches!(result, Err(EvalError::Spawn(_))));
}

#[tokio::test]
async fn test_spawn_missing_program_fails() {
    let (tx, _rx) = unbounded_channel();
    let result = ProcessEvaluator::spawn(&["zbook-no-such-engine-binary".to_string()], tx);
    assert!(matches!(result, Err(EvalError::Spawn(_))));
}

#[cfg(unix)]
#[tokio::test]
async fn test_request_line_round_trips_through_engine() {
    // Engine that answers one request with a completion for the same instance.
    let script = r#"read line; case "$line" in *'"request":"eval-notebook"'*) echo '{"instanceId":"nb-1","type":"notebook-eval-completed"}';; esac"#;
    let command = vec!["sh".to_string(), "-c".to_string(), script.to_string()];
    let (tx, mut rx) = unbounded_channel();
    let evaluator = ProcessEvaluator::spawn(&command, tx).unwrap();

    let instance = InstanceId::from("nb-1");
    evaluator
        .eval_notebook(&instance, &empty_doc(), None)
        .await
        .unwrap();

    let message = tokio::time::timeout(Duration::from_secs(5), rx.recv())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(message.instance_id, Some(instance));
    assert_eq!(message.event, EvalEvent::NotebookEvalCompleted);
}

#[cfg(unix)]
#[tokio::test]
async fn test_invalid_lines_are_skipped() {
    let script = r#"echo 'garbage'; echo ''; echo '{"type":"output-capped","limit":10}'"#;
    let command = vec!["sh".to_string(), "-c".to_string(), script.to_string()];
    let (tx, mut rx) = unbounded_channel();
    let _evaluator = ProcessEvaluator::spawn(&command, tx).unwrap();

    let message = tokio::time::timeout(Duration::from_secs(5), rx.recv())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(message.instance_id, None);
    assert_eq!(message.event, EvalEvent::OutputCapped { limit: Some(10) });
}

/// Accepts every write, fails every flush.
struct BrokenFlush {
    writes: Arc<AtomicUsize>,
}

impl AsyncWrite for BrokenFlush {
    fn poll_write(
        self: Pin<&mut Self>,
        _cx: &mut Context<'_>,
        buf: &[u8],
    ) -> Poll<io::Result<usize>> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        Poll::Ready(Ok(buf.len()))
    }

    fn poll_flush(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Poll::Ready(Err(io::Error::from(io::ErrorKind::BrokenPipe)))
    }

    fn poll_shutdown(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Poll::Ready(Ok(()))
    }
}

#[tokio::test]
async fn test_writer_stops_when_flush_fails() {
    let writes = Arc::new(AtomicUsize::new(0));
    let (tx, rx) = unbounded_channel::<Vec<u8>>();
    tx.send(b"first\n".to_vec()).unwrap();
    tx.send(b"second\n".to_vec()).unwrap();

    let writer = BrokenFlush {
        writes: Arc::clone(&writes),
    };
    // The sender stays open, so only the flush failure can end the loop.
    tokio::time::timeout(Duration::from_secs(5), writer_loop(writer, rx))
        .await
        .unwrap();

    assert_eq!(writes.load(Ordering::SeqCst), 1);
    drop(tx);
}

#[tokio::test]
async fn test_null_evaluator_accepts_everything() {
    let evaluator = NullEvaluator;
    let instance = InstanceId::from("nb");
    let cell = CellId::from("c");
    let doc = empty_doc();

    assert!(evaluator.install_notebook(&instance, &doc, None).await.is_ok());
    assert!(evaluator.eval_notebook(&instance, &doc, None).await.is_ok());
    assert!(evaluator.eval_to_cell(&instance, &doc, &cell, None).await.is_ok());
    assert!(evaluator
        .eval_single_cell(&instance, &doc, &cell, None)
        .await
        .is_ok());
    assert!(evaluator.stop_evaluation(&instance).await.is_ok());
}
